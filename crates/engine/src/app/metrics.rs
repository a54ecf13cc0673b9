use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LoopMetricsSnapshot {
    pub fps: f32,
    pub tps: f32,
    pub frame_time_ms: f32,
    pub worst_frame_ms: f32,
}

/// Counts frames and ticks over a fixed reporting window.
#[derive(Debug)]
pub(crate) struct MetricsWindow {
    window_start: Instant,
    interval: Duration,
    frames: u32,
    ticks: u32,
    frame_time_total: Duration,
    worst_frame: Duration,
}

impl MetricsWindow {
    pub(crate) fn starting_at(window_start: Instant, interval: Duration) -> Self {
        Self {
            window_start,
            interval,
            frames: 0,
            ticks: 0,
            frame_time_total: Duration::ZERO,
            worst_frame: Duration::ZERO,
        }
    }

    pub(crate) fn record_frame(&mut self, frame_dt: Duration) {
        self.frames = self.frames.saturating_add(1);
        self.frame_time_total = self.frame_time_total.saturating_add(frame_dt);
        self.worst_frame = self.worst_frame.max(frame_dt);
    }

    pub(crate) fn record_tick(&mut self) {
        self.ticks = self.ticks.saturating_add(1);
    }

    /// Closes the window once `interval` has elapsed and starts a fresh one at `now`.
    pub(crate) fn roll_over(&mut self, now: Instant) -> Option<LoopMetricsSnapshot> {
        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed < self.interval {
            return None;
        }
        let seconds = elapsed.as_secs_f32().max(f32::EPSILON);
        let frame_time_ms = match self.frames {
            0 => 0.0,
            frames => self.frame_time_total.as_secs_f32() * 1000.0 / frames as f32,
        };
        let snapshot = LoopMetricsSnapshot {
            fps: self.frames as f32 / seconds,
            tps: self.ticks as f32 / seconds,
            frame_time_ms,
            worst_frame_ms: self.worst_frame.as_secs_f32() * 1000.0,
        };
        *self = Self::starting_at(now, self.interval);
        Some(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rates_cover_the_whole_window() {
        let start = Instant::now();
        let mut window = MetricsWindow::starting_at(start, Duration::from_secs(1));
        window.record_frame(Duration::from_millis(10));
        window.record_frame(Duration::from_millis(30));
        for _ in 0..4 {
            window.record_tick();
        }

        let snapshot = window
            .roll_over(start + Duration::from_secs(2))
            .expect("window elapsed");

        assert!((snapshot.fps - 1.0).abs() < 0.01);
        assert!((snapshot.tps - 2.0).abs() < 0.01);
        assert!((snapshot.frame_time_ms - 20.0).abs() < 0.01);
        assert!((snapshot.worst_frame_ms - 30.0).abs() < 0.01);
    }

    #[test]
    fn window_stays_open_until_interval_elapses() {
        let start = Instant::now();
        let mut window = MetricsWindow::starting_at(start, Duration::from_secs(1));
        window.record_tick();
        assert!(window.roll_over(start + Duration::from_millis(999)).is_none());
    }

    #[test]
    fn roll_over_resets_counters() {
        let start = Instant::now();
        let mut window = MetricsWindow::starting_at(start, Duration::from_secs(1));
        window.record_frame(Duration::from_millis(16));
        let later = start + Duration::from_secs(1);
        assert!(window.roll_over(later).is_some());

        let empty = window
            .roll_over(later + Duration::from_secs(1))
            .expect("second window");
        assert_eq!(empty, LoopMetricsSnapshot::default());
    }
}
