#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct WaveReport {
    minions: usize,
    boss: bool,
}

/// Timed wave spawner. The boss joins the last wave that fits before the session ends, and
/// nothing spawns after it.
#[derive(Debug, Clone)]
struct EnemySpawnManager {
    interval: f32,
    wave_size: usize,
    arena: Vec2,
    timer: f32,
    boss_spawned: bool,
    rng: StdRng,
}

impl EnemySpawnManager {
    fn new(config: &GameConfig) -> Self {
        Self {
            interval: config.spawn_interval_seconds,
            wave_size: config.wave_size,
            arena: config.arena,
            timer: 0.0,
            boss_spawned: false,
            rng: StdRng::seed_from_u64(config.rng_seed),
        }
    }

    fn update(
        &mut self,
        dt_seconds: f32,
        game_timer: f32,
        duration: f32,
        world: &mut SceneWorld,
    ) -> Option<WaveReport> {
        self.timer += dt_seconds;
        if game_timer >= duration || self.timer <= self.interval {
            return None;
        }
        self.timer = 0.0;
        if self.boss_spawned {
            return None;
        }

        let minions = self.spawn_wave(world, self.wave_size);
        let boss = game_timer >= duration - self.interval;
        if boss {
            let position = self.random_edge_position();
            let seed = self.rng.gen();
            world.add_game_object(enemy_entity(EnemyArchetypeId::Boss, position, seed));
            self.boss_spawned = true;
            info!(x = position.x, y = position.y, "boss_spawned");
        }
        Some(WaveReport { minions, boss })
    }

    fn spawn_wave(&mut self, world: &mut SceneWorld, count: usize) -> usize {
        for _ in 0..count {
            let position = self.random_edge_position();
            let seed = self.rng.gen();
            world.add_game_object(enemy_entity(EnemyArchetypeId::Minion, position, seed));
        }
        count
    }

    /// A point just outside one of the four arena edges, picked uniformly.
    fn random_edge_position(&mut self) -> Vec2 {
        let along_x = self.rng.gen::<f32>() * self.arena.x;
        let along_y = self.rng.gen::<f32>() * self.arena.y;
        match self.rng.gen_range(0..4) {
            0 => Vec2::new(along_x, -SPAWN_EDGE_MARGIN),
            1 => Vec2::new(self.arena.x + SPAWN_EDGE_MARGIN, along_y),
            2 => Vec2::new(along_x, self.arena.y + SPAWN_EDGE_MARGIN),
            _ => Vec2::new(-SPAWN_EDGE_MARGIN, along_y),
        }
    }

    fn reset(&mut self) {
        self.timer = 0.0;
        self.boss_spawned = false;
    }

    fn is_boss_spawned(&self) -> bool {
        self.boss_spawned
    }

    fn set_boss_spawned(&mut self, boss_spawned: bool) {
        self.boss_spawned = boss_spawned;
    }
}
