#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GameEvent {
    StartMusic,
    ResumeAfterSave,
}

/// The one scene of the game: main menu, then a timed survival session.
struct GameScene {
    config: GameConfig,
    logic: AdvancedGameLogic,
    persistence: SessionPersistence,
    audio: Audio,
    timers: DeferredTimers<GameEvent>,
}

impl GameScene {
    fn new(config: GameConfig, store: Box<dyn SaveStore>, audio: Audio) -> Self {
        Self {
            logic: AdvancedGameLogic::new(&config),
            persistence: SessionPersistence::new(store),
            audio,
            timers: DeferredTimers::new(),
            config,
        }
    }

    fn handle_event(&mut self, event: GameEvent, world: &mut SceneWorld) {
        match event {
            GameEvent::StartMusic => self.audio.start_music(),
            GameEvent::ResumeAfterSave => {
                if self.logic.state().is_paused() {
                    self.set_paused(world, false);
                }
            }
        }
    }

    fn set_paused(&mut self, world: &mut SceneWorld, paused: bool) {
        self.logic.set_paused(paused);
        world.set_paused(paused);
        if paused {
            info!(game_timer = self.logic.state().timer(), "game_paused");
        } else {
            info!(game_timer = self.logic.state().timer(), "game_resumed");
        }
    }

    fn handle_menu(&mut self, input: &InputSnapshot, world: &mut SceneWorld) -> SceneCommand {
        let choice = world
            .find_by_tag_mut(MAIN_MENU_TAG)
            .and_then(|entity| entity.get_component_mut::<MainMenu>())
            .and_then(|menu| menu.handle_input(input));
        match choice {
            Some(MenuOption::NewGame) => self.start_new_game(world),
            Some(MenuOption::LoadGame) => self.load_saved_game(world),
            Some(MenuOption::Quit) => {
                info!("menu_quit");
                return SceneCommand::Quit;
            }
            None => {}
        }
        SceneCommand::None
    }

    fn start_new_game(&mut self, world: &mut SceneWorld) {
        self.logic.reset();
        self.persistence.discard_pending();
        clear_session_entities(world);
        world.set_paused(false);

        world.add_game_object(player_entity(self.config.player_start));
        let minions = self
            .logic
            .spawner_mut()
            .spawn_wave(world, self.config.wave_size);
        set_menu_active(world, false);
        info!(minions, "new_game_started");
    }

    fn load_saved_game(&mut self, world: &mut SceneWorld) {
        self.logic.reset();
        clear_session_entities(world);
        world.set_paused(false);

        let Some(transfer) = self.persistence.load_game(world) else {
            warn!("load_game_unavailable");
            return;
        };
        self.logic.import_state(&transfer);
        self.logic.begin_restore();
        set_menu_active(world, false);
        info!(game_timer = transfer.game_timer, "saved_game_started");
    }

    /// Saving while running pauses for the write and resumes shortly after it succeeds.
    fn save_session(&mut self, world: &mut SceneWorld) {
        let was_running = !self.logic.state().is_paused();
        if was_running {
            self.set_paused(world, true);
        }
        let saved = self.persistence.save_game(world, self.logic.export_state());
        if !was_running {
            return;
        }
        if saved {
            self.timers
                .schedule(SAVE_RESUME_DELAY_SECONDS, GameEvent::ResumeAfterSave);
        } else {
            self.set_paused(world, false);
        }
    }
}

impl Scene for GameScene {
    fn load(&mut self, world: &mut SceneWorld) {
        world.watch_tag(PLAYER_TAG);
        world.add_game_object(main_menu_entity(self.persistence.has_save()));
        self.timers
            .schedule(MUSIC_START_DELAY_SECONDS, GameEvent::StartMusic);
        info!(
            has_save = self.persistence.has_save(),
            duration = self.config.session_duration_seconds,
            "scene_loaded"
        );
    }

    fn update(
        &mut self,
        fixed_dt_seconds: f32,
        input: &InputSnapshot,
        world: &mut SceneWorld,
    ) -> SceneCommand {
        for event in self.timers.tick(fixed_dt_seconds) {
            self.handle_event(event, world);
        }
        world.update(fixed_dt_seconds);

        if input.was_pressed(InputAction::ToggleSound) {
            self.audio.toggle_sound();
        }
        if input.was_pressed(InputAction::ToggleMusic) {
            self.audio.toggle_music();
        }

        if menu_is_active(world) {
            return self.handle_menu(input, world);
        }

        if input.was_pressed(InputAction::Pause) && !self.logic.state().is_ended() {
            let paused = !self.logic.state().is_paused();
            self.set_paused(world, paused);
        }
        if input.was_pressed(InputAction::Save) {
            self.save_session(world);
        }
        if self.logic.state().is_paused() {
            return SceneCommand::None;
        }

        self.logic.update(
            fixed_dt_seconds,
            input,
            world,
            &mut self.persistence,
            &mut self.audio,
        );
        world.reap(|entity| {
            entity.tag() != PLAYER_TAG
                && entity
                    .get_component::<Health>()
                    .is_some_and(|health| !health.is_alive())
        });

        match self.logic.state_mut().take_end_action() {
            Some(outcome) => {
                info!(outcome = ?outcome, "end_action_fired");
                SceneCommand::Quit
            }
            None => SceneCommand::None,
        }
    }

    fn render(&mut self, world: &SceneWorld, renderer: &mut dyn Renderer) {
        render_arena_background(self.config.arena, renderer);
        world.render(renderer);
        if menu_is_active(world) {
            return;
        }
        render_health_bars(world, renderer);

        let state = self.logic.state();
        let cooldowns = world
            .find_by_tag(PLAYER_TAG)
            .and_then(|player| player.get_component::<AttackCooldowns>())
            .copied()
            .unwrap_or_default();
        let view = HudView {
            timer: state.timer(),
            duration: state.duration(),
            cooldowns,
            audio: self.audio.settings(),
            paused: state.is_paused(),
            outcome: state.outcome(),
        };
        render_hud(&view, renderer);
    }

    fn unload(&mut self, world: &mut SceneWorld) {
        self.audio.stop_music();
        self.timers.clear();
        self.persistence.discard_pending();
        world.clear();
        info!("scene_unloaded");
    }

    fn debug_title(&self, world: &SceneWorld) -> Option<String> {
        let state = self.logic.state();
        Some(format!(
            "Siege | {:?} | t={:.1}s | entities={}",
            state.phase(),
            state.timer(),
            world.entity_count()
        ))
    }
}

/// Destroys every live entity except the main menu.
fn clear_session_entities(world: &mut SceneWorld) {
    world.reap(|entity| entity.tag() != MAIN_MENU_TAG);
}

fn set_menu_active(world: &mut SceneWorld, active: bool) {
    if let Some(menu) = world
        .find_by_tag_mut(MAIN_MENU_TAG)
        .and_then(|entity| entity.get_component_mut::<MainMenu>())
    {
        menu.set_active(active);
    }
}
