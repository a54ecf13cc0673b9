#[derive(Debug, Error)]
enum PersistenceError {
    #[error("create save dir '{}': {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("write save '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("read save '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("encode save json: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("parse save json{location}: {source}")]
    Parse {
        location: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("validation failed at {path}: {message}")]
    Validation { path: String, message: String },
}

type PersistenceResult<T> = Result<T, PersistenceError>;

/// Backing slot for the single session save.
trait SaveStore {
    fn exists(&self) -> bool;
    fn write(&mut self, contents: &str) -> PersistenceResult<()>;
    fn read(&self) -> PersistenceResult<String>;
    fn describe(&self) -> String;
}

#[derive(Debug, Clone)]
struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl SaveStore for JsonFileStore {
    fn exists(&self) -> bool {
        self.path.is_file()
    }

    fn write(&mut self, contents: &str) -> PersistenceResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| PersistenceError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(&self.path, contents).map_err(|source| PersistenceError::Write {
            path: self.path.clone(),
            source,
        })
    }

    fn read(&self) -> PersistenceResult<String> {
        fs::read_to_string(&self.path).map_err(|source| PersistenceError::Read {
            path: self.path.clone(),
            source,
        })
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
struct SavedVec2 {
    x: f32,
    y: f32,
}

impl From<Vec2> for SavedVec2 {
    fn from(value: Vec2) -> Self {
        Self {
            x: value.x,
            y: value.y,
        }
    }
}

impl From<SavedVec2> for Vec2 {
    fn from(value: SavedVec2) -> Self {
        Vec2::new(value.x, value.y)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
struct PlayerRecord {
    position: SavedVec2,
    health: i32,
    max_health: i32,
    melee_cooldown: f32,
    ranged_cooldown: f32,
    cannon_cooldown: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
struct EnemyRecord {
    tag: String,
    kind: EnemyArchetypeId,
    position: SavedVec2,
    health: i32,
    max_health: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
struct ProjectileRecord {
    tag: String,
    kind: ProjectileKind,
    position: SavedVec2,
    velocity: SavedVec2,
    lifetime: f32,
    remaining_lifetime: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
struct SessionSnapshot {
    session: SessionStateTransfer,
    player: Option<PlayerRecord>,
    enemies: Vec<EnemyRecord>,
    projectiles: Vec<ProjectileRecord>,
}

/// Save/load front. The player comes back immediately on load; enemies and projectiles wait in
/// pending queues until the orchestrator's restore hooks run.
struct SessionPersistence {
    store: Box<dyn SaveStore>,
    pending_enemies: Vec<EnemyRecord>,
    pending_projectiles: Vec<ProjectileRecord>,
}

impl SessionPersistence {
    fn new(store: Box<dyn SaveStore>) -> Self {
        Self {
            store,
            pending_enemies: Vec::new(),
            pending_projectiles: Vec::new(),
        }
    }

    fn has_save(&self) -> bool {
        self.store.exists()
    }

    fn save_game(&mut self, world: &SceneWorld, session: SessionStateTransfer) -> bool {
        let mut snapshot = capture_snapshot(world, session);
        // Records still waiting out the restore window are part of the session too.
        snapshot.enemies.extend(self.pending_enemies.iter().cloned());
        snapshot
            .projectiles
            .extend(self.pending_projectiles.iter().cloned());
        match self.write_snapshot(&snapshot) {
            Ok(()) => {
                info!(
                    path = %self.store.describe(),
                    enemies = snapshot.enemies.len(),
                    projectiles = snapshot.projectiles.len(),
                    "save_written"
                );
                true
            }
            Err(error) => {
                warn!(error = %error, "save_failed");
                false
            }
        }
    }

    /// Reads and validates the save, restores the player into `world` and queues the rest.
    fn load_game(&mut self, world: &mut SceneWorld) -> Option<SessionStateTransfer> {
        let snapshot = match self.read_snapshot() {
            Ok(snapshot) => snapshot,
            Err(error) => {
                warn!(error = %error, "load_failed");
                return None;
            }
        };

        if let Some(record) = &snapshot.player {
            world.add_game_object(restore_player(record));
        }
        info!(
            path = %self.store.describe(),
            enemies = snapshot.enemies.len(),
            projectiles = snapshot.projectiles.len(),
            game_timer = snapshot.session.game_timer,
            "load_succeeded"
        );
        self.pending_enemies = snapshot.enemies;
        self.pending_projectiles = snapshot.projectiles;
        Some(snapshot.session)
    }

    fn restore_pending_enemies(&mut self, world: &mut SceneWorld) -> usize {
        let mut restored = 0;
        for record in std::mem::take(&mut self.pending_enemies) {
            match restore_enemy(&record, world.entity_count() as u64 + restored as u64) {
                Some(entity) => {
                    world.add_game_object(entity);
                    restored += 1;
                }
                None => warn!(tag = %record.tag, "enemy_record_skipped"),
            }
        }
        restored
    }

    fn restore_pending_projectiles(&mut self, world: &mut SceneWorld) -> usize {
        let mut restored = 0;
        for record in std::mem::take(&mut self.pending_projectiles) {
            match restore_projectile(&record) {
                Some(entity) => {
                    world.add_game_object(entity);
                    restored += 1;
                }
                None => warn!(tag = %record.tag, kind = ?record.kind, "projectile_record_skipped"),
            }
        }
        restored
    }

    fn discard_pending(&mut self) {
        self.pending_enemies.clear();
        self.pending_projectiles.clear();
    }

    fn write_snapshot(&mut self, snapshot: &SessionSnapshot) -> PersistenceResult<()> {
        let json = serde_json::to_string_pretty(snapshot).map_err(PersistenceError::Encode)?;
        self.store.write(&json)
    }

    fn read_snapshot(&self) -> PersistenceResult<SessionSnapshot> {
        let raw = self.store.read()?;
        let snapshot = parse_snapshot_json(&raw)?;
        validate_snapshot(&snapshot)?;
        Ok(snapshot)
    }
}

fn parse_snapshot_json(raw: &str) -> PersistenceResult<SessionSnapshot> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    serde_path_to_error::deserialize::<_, SessionSnapshot>(&mut deserializer).map_err(|error| {
        let path = error.path().to_string();
        let location = if path.is_empty() || path == "." {
            String::new()
        } else {
            format!(" at {path}")
        };
        PersistenceError::Parse {
            location,
            source: error.into_inner(),
        }
    })
}

fn expected_actual(path: &str, expected: impl Display, actual: impl Display) -> PersistenceError {
    PersistenceError::Validation {
        path: path.to_string(),
        message: format!("expected {expected}, got {actual}"),
    }
}

fn require_finite(path: &str, value: f32) -> PersistenceResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(expected_actual(path, "finite number", value))
    }
}

fn validate_snapshot(snapshot: &SessionSnapshot) -> PersistenceResult<()> {
    if snapshot.session.version != SAVE_VERSION {
        return Err(expected_actual(
            "session.version",
            SAVE_VERSION,
            snapshot.session.version,
        ));
    }
    require_finite("session.game_timer", snapshot.session.game_timer)?;
    if let Some(player) = &snapshot.player {
        require_finite("player.position.x", player.position.x)?;
        require_finite("player.position.y", player.position.y)?;
    }
    for (index, enemy) in snapshot.enemies.iter().enumerate() {
        require_finite(&format!("enemies[{index}].position.x"), enemy.position.x)?;
        require_finite(&format!("enemies[{index}].position.y"), enemy.position.y)?;
    }
    for (index, projectile) in snapshot.projectiles.iter().enumerate() {
        require_finite(&format!("projectiles[{index}].position.x"), projectile.position.x)?;
        require_finite(&format!("projectiles[{index}].position.y"), projectile.position.y)?;
        require_finite(&format!("projectiles[{index}].velocity.x"), projectile.velocity.x)?;
        require_finite(&format!("projectiles[{index}].velocity.y"), projectile.velocity.y)?;
    }
    Ok(())
}

/// Captures the live session. Tags are stable classifications, so they are written as-is.
fn capture_snapshot(world: &SceneWorld, session: SessionStateTransfer) -> SessionSnapshot {
    let mut snapshot = SessionSnapshot {
        session,
        ..SessionSnapshot::default()
    };

    for entity in world.entities().iter().filter(|entity| entity.is_active()) {
        let Some(position) = entity.position() else {
            continue;
        };
        if entity.tag() == PLAYER_TAG {
            let health = entity.get_component::<Health>().copied().unwrap_or(Health::new(0));
            let cooldowns = entity
                .get_component::<AttackCooldowns>()
                .copied()
                .unwrap_or_default();
            snapshot.player = Some(PlayerRecord {
                position: position.into(),
                health: health.current(),
                max_health: health.max(),
                melee_cooldown: cooldowns.remaining(PlayerAttack::Melee),
                ranged_cooldown: cooldowns.remaining(PlayerAttack::Ranged),
                cannon_cooldown: cooldowns.remaining(PlayerAttack::Cannon),
            });
        } else if let Some(brain) = entity.get_component::<EnemyBrain>() {
            let Some(health) = entity.get_component::<Health>().filter(|health| health.is_alive())
            else {
                continue;
            };
            snapshot.enemies.push(EnemyRecord {
                tag: entity.tag().to_string(),
                kind: brain.archetype(),
                position: position.into(),
                health: health.current(),
                max_health: health.max(),
            });
        } else if let Some(projectile) = entity.get_component::<Projectile>() {
            let (Some(body), Some(lifetime)) = (
                entity.get_component::<PhysicsBody>(),
                entity.get_component::<Lifetime>(),
            ) else {
                continue;
            };
            snapshot.projectiles.push(ProjectileRecord {
                tag: entity.tag().to_string(),
                kind: projectile.kind,
                position: position.into(),
                velocity: body.velocity.into(),
                lifetime: lifetime.total(),
                remaining_lifetime: lifetime.remaining(),
            });
        }
    }
    snapshot
}

fn restore_player(record: &PlayerRecord) -> Entity {
    let mut player = player_entity(record.position.into());
    if let Some(health) = player.get_component_mut::<Health>() {
        if record.max_health > 0 {
            *health = Health::new(record.max_health);
        }
        health.set_health(record.health);
    }
    if let Some(cooldowns) = player.get_component_mut::<AttackCooldowns>() {
        cooldowns.set_remaining(PlayerAttack::Melee, record.melee_cooldown);
        cooldowns.set_remaining(PlayerAttack::Ranged, record.ranged_cooldown);
        cooldowns.set_remaining(PlayerAttack::Cannon, record.cannon_cooldown);
    }
    player
}

fn restore_enemy(record: &EnemyRecord, brain_seed: u64) -> Option<Entity> {
    let archetype = record.kind.archetype();
    if EntityKind::from_tag(&record.tag) != Some(archetype.kind) {
        return None;
    }
    let mut enemy = enemy_entity(record.kind, record.position.into(), brain_seed);
    if let Some(health) = enemy.get_component_mut::<Health>() {
        if record.max_health > 0 {
            *health = Health::new(record.max_health);
        }
        health.set_health(record.health);
    }
    Some(enemy)
}

/// Rebuilds a projectile from its record. The stored direction is kept, the speed snaps back to
/// the kind's speed when it drifted, and a zero velocity aims straight up.
fn restore_projectile(record: &ProjectileRecord) -> Option<Entity> {
    let kind = EntityKind::from_tag(&record.tag)?;
    if kind.projectile_kind()? != record.kind {
        return None;
    }
    let spec = record.kind.spec();

    let stored: Vec2 = record.velocity.into();
    let speed = stored.length();
    let velocity = if speed <= f32::EPSILON {
        Vec2::new(0.0, -1.0) * spec.speed
    } else if (speed - spec.speed).abs() > RESTORED_SPEED_TOLERANCE {
        stored.normalized() * spec.speed
    } else {
        stored
    };
    let remaining = record.remaining_lifetime.max(MIN_RESTORED_LIFETIME_SECONDS);

    let mut projectile = projectile_entity(kind, record.position.into(), velocity, remaining)?;
    if record.lifetime > 0.0 {
        if let Some(lifetime) = projectile.get_component_mut::<Lifetime>() {
            *lifetime = Lifetime::new(record.lifetime).with_remaining(remaining);
        }
    }
    Some(projectile)
}
