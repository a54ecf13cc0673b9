use winit::event::ElementState;
use winit::keyboard::{KeyCode, PhysicalKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    Melee,
    Ranged,
    Cannon,
    Pause,
    Save,
    ToggleSound,
    ToggleMusic,
    Confirm,
    Quit,
}

const ACTION_COUNT: usize = 13;

impl InputAction {
    pub const ALL: [InputAction; ACTION_COUNT] = [
        InputAction::MoveUp,
        InputAction::MoveDown,
        InputAction::MoveLeft,
        InputAction::MoveRight,
        InputAction::Melee,
        InputAction::Ranged,
        InputAction::Cannon,
        InputAction::Pause,
        InputAction::Save,
        InputAction::ToggleSound,
        InputAction::ToggleMusic,
        InputAction::Confirm,
        InputAction::Quit,
    ];

    const fn index(self) -> usize {
        match self {
            InputAction::MoveUp => 0,
            InputAction::MoveDown => 1,
            InputAction::MoveLeft => 2,
            InputAction::MoveRight => 3,
            InputAction::Melee => 4,
            InputAction::Ranged => 5,
            InputAction::Cannon => 6,
            InputAction::Pause => 7,
            InputAction::Save => 8,
            InputAction::ToggleSound => 9,
            InputAction::ToggleMusic => 10,
            InputAction::Confirm => 11,
            InputAction::Quit => 12,
        }
    }

    /// Default key bindings. WASD and the arrow keys both move.
    pub fn from_physical_key(key: PhysicalKey) -> Option<InputAction> {
        let PhysicalKey::Code(code) = key else {
            return None;
        };
        let action = match code {
            KeyCode::KeyW | KeyCode::ArrowUp => InputAction::MoveUp,
            KeyCode::KeyS | KeyCode::ArrowDown => InputAction::MoveDown,
            KeyCode::KeyA | KeyCode::ArrowLeft => InputAction::MoveLeft,
            KeyCode::KeyD | KeyCode::ArrowRight => InputAction::MoveRight,
            KeyCode::KeyJ => InputAction::Melee,
            KeyCode::KeyU => InputAction::Ranged,
            KeyCode::KeyI => InputAction::Cannon,
            KeyCode::KeyP => InputAction::Pause,
            KeyCode::F12 => InputAction::Save,
            KeyCode::KeyM => InputAction::ToggleSound,
            KeyCode::KeyN => InputAction::ToggleMusic,
            KeyCode::Enter | KeyCode::NumpadEnter => InputAction::Confirm,
            KeyCode::Escape => InputAction::Quit,
            _ => return None,
        };
        Some(action)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct ActionStates {
    down: [bool; ACTION_COUNT],
}

impl ActionStates {
    pub(crate) fn set(&mut self, action: InputAction, is_down: bool) {
        self.down[action.index()] = is_down;
    }

    pub(crate) fn is_down(&self, action: InputAction) -> bool {
        self.down[action.index()]
    }
}

/// Input as seen by one simulation tick: which actions are held, and which went down since the
/// previous tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputSnapshot {
    quit_requested: bool,
    held: ActionStates,
    pressed: ActionStates,
}

impl InputSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    pub fn is_down(&self, action: InputAction) -> bool {
        self.held.is_down(action)
    }

    /// True for exactly one tick per physical key press.
    pub fn was_pressed(&self, action: InputAction) -> bool {
        self.pressed.is_down(action)
    }

    pub fn with_action_down(mut self, action: InputAction, is_down: bool) -> Self {
        self.held.set(action, is_down);
        self
    }

    /// Marks `action` as both held and freshly pressed.
    pub fn with_action_pressed(mut self, action: InputAction) -> Self {
        self.held.set(action, true);
        self.pressed.set(action, true);
        self
    }

    pub fn with_quit_requested(mut self, quit_requested: bool) -> Self {
        self.quit_requested = quit_requested;
        self
    }
}

/// Folds window key events into per-tick snapshots. Press edges survive until the next snapshot so
/// a tap shorter than one tick is never lost.
#[derive(Debug, Default)]
pub(crate) struct InputCollector {
    quit_requested: bool,
    held: ActionStates,
    pressed_edges: ActionStates,
}

impl InputCollector {
    pub(crate) fn mark_quit_requested(&mut self) {
        self.quit_requested = true;
    }

    pub(crate) fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    pub(crate) fn handle_key(&mut self, key: PhysicalKey, state: ElementState) {
        if let Some(action) = InputAction::from_physical_key(key) {
            self.handle_action_state(action, state);
        }
    }

    pub(crate) fn handle_action_state(&mut self, action: InputAction, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if action == InputAction::Quit {
                    self.mark_quit_requested();
                }
                if !self.held.is_down(action) {
                    self.pressed_edges.set(action, true);
                }
                self.held.set(action, true);
            }
            ElementState::Released => self.held.set(action, false),
        }
    }

    pub(crate) fn snapshot_for_tick(&mut self) -> InputSnapshot {
        let snapshot = InputSnapshot {
            quit_requested: self.quit_requested,
            held: self.held,
            pressed: self.pressed_edges,
        };
        self.pressed_edges = ActionStates::default();
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(input: &mut InputCollector, code: KeyCode) {
        input.handle_key(PhysicalKey::Code(code), ElementState::Pressed);
    }

    fn release(input: &mut InputCollector, code: KeyCode) {
        input.handle_key(PhysicalKey::Code(code), ElementState::Released);
    }

    #[test]
    fn action_indices_are_dense_and_unique() {
        let mut seen = [false; ACTION_COUNT];
        for action in InputAction::ALL {
            assert!(!seen[action.index()], "{action:?}");
            seen[action.index()] = true;
        }
        assert!(seen.iter().all(|slot| *slot));
    }

    #[test]
    fn wasd_and_arrow_keys_map_to_movement() {
        let mut input = InputCollector::default();
        press(&mut input, KeyCode::KeyW);
        press(&mut input, KeyCode::ArrowLeft);

        let snapshot = input.snapshot_for_tick();
        assert!(snapshot.is_down(InputAction::MoveUp));
        assert!(snapshot.is_down(InputAction::MoveLeft));
        assert!(!snapshot.is_down(InputAction::MoveRight));
    }

    #[test]
    fn attack_and_toggle_keys_are_bound() {
        let bindings = [
            (KeyCode::KeyJ, InputAction::Melee),
            (KeyCode::KeyU, InputAction::Ranged),
            (KeyCode::KeyI, InputAction::Cannon),
            (KeyCode::KeyP, InputAction::Pause),
            (KeyCode::F12, InputAction::Save),
            (KeyCode::KeyM, InputAction::ToggleSound),
            (KeyCode::KeyN, InputAction::ToggleMusic),
            (KeyCode::Enter, InputAction::Confirm),
            (KeyCode::Escape, InputAction::Quit),
        ];
        for (code, action) in bindings {
            assert_eq!(
                InputAction::from_physical_key(PhysicalKey::Code(code)),
                Some(action)
            );
        }
        assert_eq!(
            InputAction::from_physical_key(PhysicalKey::Code(KeyCode::KeyZ)),
            None
        );
    }

    #[test]
    fn press_edge_lasts_one_tick_while_hold_persists() {
        let mut input = InputCollector::default();
        press(&mut input, KeyCode::KeyP);

        let first = input.snapshot_for_tick();
        let second = input.snapshot_for_tick();

        assert!(first.was_pressed(InputAction::Pause));
        assert!(!second.was_pressed(InputAction::Pause));
        assert!(second.is_down(InputAction::Pause));
    }

    #[test]
    fn key_repeat_does_not_retrigger_edge() {
        let mut input = InputCollector::default();
        press(&mut input, KeyCode::KeyM);
        assert!(input.snapshot_for_tick().was_pressed(InputAction::ToggleSound));

        press(&mut input, KeyCode::KeyM);
        assert!(!input.snapshot_for_tick().was_pressed(InputAction::ToggleSound));

        release(&mut input, KeyCode::KeyM);
        press(&mut input, KeyCode::KeyM);
        assert!(input.snapshot_for_tick().was_pressed(InputAction::ToggleSound));
    }

    #[test]
    fn tap_between_ticks_is_not_lost() {
        let mut input = InputCollector::default();
        press(&mut input, KeyCode::Enter);
        release(&mut input, KeyCode::Enter);

        let snapshot = input.snapshot_for_tick();
        assert!(snapshot.was_pressed(InputAction::Confirm));
        assert!(!snapshot.is_down(InputAction::Confirm));
    }

    #[test]
    fn escape_requests_quit() {
        let mut input = InputCollector::default();
        assert!(!input.quit_requested());
        press(&mut input, KeyCode::Escape);
        assert!(input.quit_requested());
        assert!(input.snapshot_for_tick().quit_requested());
    }

    #[test]
    fn snapshot_builders_compose() {
        let snapshot = InputSnapshot::empty()
            .with_action_down(InputAction::MoveRight, true)
            .with_action_pressed(InputAction::Melee)
            .with_quit_requested(true);

        assert!(snapshot.is_down(InputAction::MoveRight));
        assert!(!snapshot.was_pressed(InputAction::MoveRight));
        assert!(snapshot.is_down(InputAction::Melee));
        assert!(snapshot.was_pressed(InputAction::Melee));
        assert!(snapshot.quit_requested());
    }
}
