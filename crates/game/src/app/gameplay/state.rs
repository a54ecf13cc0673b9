/// Session state exported to and imported from a save. Everything else the orchestrator holds is
/// rebuilt on load.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
struct SessionStateTransfer {
    version: u32,
    game_timer: f32,
    game_ended: bool,
    game_won: bool,
    boss_spawned: bool,
}

impl Default for SessionStateTransfer {
    fn default() -> Self {
        Self {
            version: SAVE_VERSION,
            game_timer: 0.0,
            game_ended: false,
            game_won: false,
            boss_spawned: false,
        }
    }
}

/// Countdown before one class of persisted entities is put back into the world.
#[derive(Debug, Clone, Copy, PartialEq)]
struct RestoreWindow {
    elapsed: f32,
    done: bool,
}

impl RestoreWindow {
    fn armed() -> Self {
        Self {
            elapsed: 0.0,
            done: false,
        }
    }

    fn completed() -> Self {
        Self {
            elapsed: 0.0,
            done: true,
        }
    }

    fn advance(&mut self, dt_seconds: f32) {
        if !self.done {
            self.elapsed += dt_seconds;
        }
    }

    fn is_due(&self) -> bool {
        !self.done && self.elapsed >= RESTORE_DELAY_SECONDS
    }
}

#[derive(Debug, Clone)]
struct GameStateManager {
    duration: f32,
    timer: f32,
    paused: bool,
    loading: bool,
    outcome: Option<Outcome>,
    end_delay_remaining: f32,
    end_action_fired: bool,
    projectiles: RestoreWindow,
    enemies: RestoreWindow,
    restored_entities: usize,
    empty_restore_settled: bool,
}

impl GameStateManager {
    fn new(duration: f32) -> Self {
        Self {
            duration,
            timer: 0.0,
            paused: false,
            loading: false,
            outcome: None,
            end_delay_remaining: 0.0,
            end_action_fired: false,
            projectiles: RestoreWindow::completed(),
            enemies: RestoreWindow::completed(),
            restored_entities: 0,
            empty_restore_settled: false,
        }
    }

    fn reset(&mut self) {
        *self = Self::new(self.duration);
    }

    /// Enters `Loading` and arms both restoration windows.
    fn begin_restore(&mut self) {
        self.loading = true;
        self.projectiles = RestoreWindow::armed();
        self.enemies = RestoreWindow::armed();
        self.restored_entities = 0;
        self.empty_restore_settled = false;
    }

    fn update(&mut self, dt_seconds: f32) {
        if self.outcome.is_none() && !self.paused {
            self.timer += dt_seconds;
        }
        self.projectiles.advance(dt_seconds);
        self.enemies.advance(dt_seconds);
        if self.outcome.is_some() && self.end_delay_remaining > 0.0 {
            self.end_delay_remaining -= dt_seconds;
        }
    }

    fn should_restore_projectiles(&self) -> bool {
        self.projectiles.is_due()
    }

    fn mark_projectiles_restored(&mut self, count: usize) {
        self.projectiles.done = true;
        self.restored_entities += count;
    }

    fn should_restore_enemies(&self) -> bool {
        self.enemies.is_due()
    }

    fn mark_enemies_restored(&mut self, count: usize) {
        self.enemies.done = true;
        self.restored_entities += count;
    }

    fn restorations_complete(&self) -> bool {
        self.projectiles.done && self.enemies.done
    }

    /// Clears `Loading` once restored entities are visible in the live set. With nothing restored
    /// there is nothing to wait for, so it clears one tick after both restorations complete.
    /// Returns true on the tick it clears.
    fn settle_loading(&mut self, restored_visible: bool) -> bool {
        if !self.loading || !self.restorations_complete() {
            return false;
        }
        let ready = if self.restored_entities == 0 {
            std::mem::replace(&mut self.empty_restore_settled, true)
        } else {
            restored_visible
        };
        if ready {
            self.loading = false;
        }
        ready
    }

    fn set_won(&mut self) {
        self.end(Outcome::Won);
    }

    fn set_lost(&mut self) {
        self.end(Outcome::Lost);
    }

    fn end(&mut self, outcome: Outcome) {
        if self.outcome.is_some() {
            return;
        }
        self.outcome = Some(outcome);
        self.end_delay_remaining = END_ACTION_DELAY_SECONDS;
        info!(outcome = ?outcome, game_timer = self.timer, "game_ended");
    }

    /// Yields the outcome exactly once, after it has held for the post-end delay.
    fn take_end_action(&mut self) -> Option<Outcome> {
        let outcome = self.outcome?;
        if self.end_action_fired || self.end_delay_remaining > 0.0 {
            return None;
        }
        self.end_action_fired = true;
        Some(outcome)
    }

    fn phase(&self) -> SessionPhase {
        if let Some(outcome) = self.outcome {
            SessionPhase::Ended(outcome)
        } else if self.loading {
            SessionPhase::Loading
        } else if self.paused {
            SessionPhase::Paused
        } else {
            SessionPhase::Running
        }
    }

    fn timer(&self) -> f32 {
        self.timer
    }

    fn duration(&self) -> f32 {
        self.duration
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    fn is_loading(&self) -> bool {
        self.loading
    }

    fn is_ended(&self) -> bool {
        self.outcome.is_some()
    }

    fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    fn export_state(&self, boss_spawned: bool) -> SessionStateTransfer {
        SessionStateTransfer {
            version: SAVE_VERSION,
            game_timer: self.timer,
            game_ended: self.outcome.is_some(),
            game_won: self.outcome == Some(Outcome::Won),
            boss_spawned,
        }
    }

    fn import_state(&mut self, state: &SessionStateTransfer) {
        self.timer = state.game_timer.max(0.0);
        self.outcome = None;
        self.end_action_fired = false;
        if state.game_ended {
            self.end(if state.game_won {
                Outcome::Won
            } else {
                Outcome::Lost
            });
        }
    }
}
