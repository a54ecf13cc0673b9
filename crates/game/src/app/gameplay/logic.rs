#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogicSystemId {
    Spawner,
    Physics,
    Combat,
}

impl LogicSystemId {
    #[cfg(test)]
    fn name(self) -> &'static str {
        match self {
            Self::Spawner => "Spawner",
            Self::Physics => "Physics",
            Self::Combat => "Combat",
        }
    }
}

const LOGIC_SYSTEM_ORDER: [LogicSystemId; 3] = [
    LogicSystemId::Spawner,
    LogicSystemId::Physics,
    LogicSystemId::Combat,
];

/// Per-tick orchestrator over the session state machine and the gameplay systems.
#[derive(Debug)]
struct AdvancedGameLogic {
    state: GameStateManager,
    spawner: EnemySpawnManager,
    physics: PhysicsManager,
    combat: CombatSystem,
    last_tick_order: Vec<LogicSystemId>,
}

impl AdvancedGameLogic {
    fn new(config: &GameConfig) -> Self {
        Self {
            state: GameStateManager::new(config.session_duration_seconds),
            spawner: EnemySpawnManager::new(config),
            physics: PhysicsManager::new(config.arena),
            combat: CombatSystem::new(config.rng_seed.wrapping_add(1)),
            last_tick_order: Vec::with_capacity(LOGIC_SYSTEM_ORDER.len()),
        }
    }

    fn update(
        &mut self,
        dt_seconds: f32,
        input: &InputSnapshot,
        world: &mut SceneWorld,
        persistence: &mut SessionPersistence,
        audio: &mut Audio,
    ) {
        self.last_tick_order.clear();
        if menu_is_active(world) || world.find_by_tag(PLAYER_TAG).is_none() {
            return;
        }

        self.state.update(dt_seconds);

        if self.state.should_restore_projectiles() {
            let count = persistence.restore_pending_projectiles(world);
            self.state.mark_projectiles_restored(count);
            info!(count, "projectiles_restored");
        }
        if self.state.should_restore_enemies() {
            let count = persistence.restore_pending_enemies(world);
            self.state.mark_enemies_restored(count);
            info!(count, "enemies_restored");
        }
        if self.state.settle_loading(restored_entities_visible(world)) {
            info!(entity_count = world.entity_count(), "loading_cleared");
        }

        if self.state.is_paused() || self.state.is_ended() {
            return;
        }

        for system_id in LOGIC_SYSTEM_ORDER {
            self.last_tick_order.push(system_id);
            match system_id {
                LogicSystemId::Spawner => {
                    let game_timer = self.state.timer();
                    let duration = self.state.duration();
                    let report = self.spawner.update(dt_seconds, game_timer, duration, world);
                    if let Some(report) = report {
                        info!(
                            minions = report.minions,
                            boss = report.boss,
                            game_timer,
                            "wave_spawned"
                        );
                    }
                }
                LogicSystemId::Physics => self.physics.update(input, world),
                LogicSystemId::Combat => self.combat.update(input, world, audio),
            }
        }

        if !self.state.is_loading() {
            self.check_end_conditions(world);
        }
    }

    /// Loss when the player is dead. Win once the timer has run out with no living enemy left.
    fn check_end_conditions(&mut self, world: &SceneWorld) {
        if world
            .find_by_tag(PLAYER_TAG)
            .is_some_and(|player| !is_alive(player))
        {
            self.state.set_lost();
            return;
        }
        if self.state.timer() >= self.state.duration()
            && living_enemies(world).is_empty()
            && !self.state.is_ended()
        {
            self.state.set_won();
        }
    }

    fn reset(&mut self) {
        self.state.reset();
        self.spawner.reset();
    }

    fn begin_restore(&mut self) {
        self.state.begin_restore();
    }

    fn export_state(&self) -> SessionStateTransfer {
        self.state.export_state(self.spawner.is_boss_spawned())
    }

    fn import_state(&mut self, transfer: &SessionStateTransfer) {
        self.state.import_state(transfer);
        self.spawner.set_boss_spawned(transfer.boss_spawned);
    }

    fn set_paused(&mut self, paused: bool) {
        self.state.set_paused(paused);
    }

    fn state(&self) -> &GameStateManager {
        &self.state
    }

    fn state_mut(&mut self) -> &mut GameStateManager {
        &mut self.state
    }

    fn spawner_mut(&mut self) -> &mut EnemySpawnManager {
        &mut self.spawner
    }
}

fn menu_is_active(world: &SceneWorld) -> bool {
    world
        .find_by_tag(MAIN_MENU_TAG)
        .and_then(|entity| entity.get_component::<MainMenu>())
        .is_some_and(MainMenu::is_active)
}

fn restored_entities_visible(world: &SceneWorld) -> bool {
    world
        .entities()
        .iter()
        .any(|entity| {
            entity.is_active() && EntityKind::of(entity).is_some_and(EntityKind::is_restorable)
        })
}
