/// One-shot events that fire after a delay measured in simulation time.
///
/// Time only advances through [`DeferredTimers::tick`], so timers scheduled by a paused scene wait
/// for as long as the scene stops ticking them.
#[derive(Debug, Clone)]
pub struct DeferredTimers<E> {
    pending: Vec<PendingTimer<E>>,
}

#[derive(Debug, Clone)]
struct PendingTimer<E> {
    remaining_seconds: f32,
    event: E,
}

impl<E> Default for DeferredTimers<E> {
    fn default() -> Self {
        Self {
            pending: Vec::new(),
        }
    }
}

impl<E> DeferredTimers<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, delay_seconds: f32, event: E) {
        self.pending.push(PendingTimer {
            remaining_seconds: delay_seconds.max(0.0),
            event,
        });
    }

    /// Advances every timer and returns the events that came due, in scheduling order.
    pub fn tick(&mut self, dt_seconds: f32) -> Vec<E> {
        let mut due = Vec::new();
        let mut waiting = Vec::with_capacity(self.pending.len());
        for mut timer in self.pending.drain(..) {
            timer.remaining_seconds -= dt_seconds;
            if timer.remaining_seconds <= 0.0 {
                due.push(timer.event);
            } else {
                waiting.push(timer);
            }
        }
        self.pending = waiting;
        due
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Event {
        Music,
        Resume,
    }

    #[test]
    fn events_fire_once_after_their_delay() {
        let mut timers = DeferredTimers::new();
        timers.schedule(0.1, Event::Music);
        timers.schedule(0.5, Event::Resume);

        assert!(timers.tick(0.05).is_empty());
        assert_eq!(timers.tick(0.05), vec![Event::Music]);
        assert!(timers.tick(0.3).is_empty());
        assert_eq!(timers.tick(0.2), vec![Event::Resume]);
        assert!(timers.tick(1.0).is_empty());
        assert!(timers.is_empty());
    }

    #[test]
    fn simultaneous_events_keep_schedule_order() {
        let mut timers = DeferredTimers::new();
        timers.schedule(0.2, Event::Resume);
        timers.schedule(0.1, Event::Music);

        assert_eq!(timers.tick(1.0), vec![Event::Resume, Event::Music]);
    }

    #[test]
    fn zero_delay_fires_on_next_tick() {
        let mut timers = DeferredTimers::new();
        timers.schedule(-1.0, Event::Music);
        assert_eq!(timers.len(), 1);
        assert_eq!(timers.tick(0.0), vec![Event::Music]);
    }

    #[test]
    fn clear_drops_pending_events() {
        let mut timers = DeferredTimers::new();
        timers.schedule(0.1, Event::Music);
        timers.clear();
        assert!(timers.tick(1.0).is_empty());
    }
}
