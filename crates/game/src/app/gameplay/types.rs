/// Stable classification of every gameplay entity. The string form is the entity tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum EntityKind {
    Player,
    Minion,
    Boss,
    PlayerMeleeHitbox,
    EnemyMeleeHitbox,
    PlayerBullet,
    PlayerCannonball,
    EnemyBullet,
    BossBomb,
    PlayerAttackEffect,
    EnemyAttackEffect,
    CannonballExplosion,
    BombExplosion,
    MainMenu,
}

impl EntityKind {
    const ALL: [EntityKind; 14] = [
        EntityKind::Player,
        EntityKind::Minion,
        EntityKind::Boss,
        EntityKind::PlayerMeleeHitbox,
        EntityKind::EnemyMeleeHitbox,
        EntityKind::PlayerBullet,
        EntityKind::PlayerCannonball,
        EntityKind::EnemyBullet,
        EntityKind::BossBomb,
        EntityKind::PlayerAttackEffect,
        EntityKind::EnemyAttackEffect,
        EntityKind::CannonballExplosion,
        EntityKind::BombExplosion,
        EntityKind::MainMenu,
    ];

    fn tag(self) -> &'static str {
        match self {
            Self::Player => PLAYER_TAG,
            Self::Minion => "Minion",
            Self::Boss => "Boss",
            Self::PlayerMeleeHitbox => "MeleeAttack",
            Self::EnemyMeleeHitbox => "EnemyMeleeAttack",
            Self::PlayerBullet => "PlayerProjectile",
            Self::PlayerCannonball => "PlayerCannonball",
            Self::EnemyBullet => "EnemyProjectile",
            Self::BossBomb => "BossBomb",
            Self::PlayerAttackEffect => "AttackRange",
            Self::EnemyAttackEffect => "EnemyAttackRange",
            Self::CannonballExplosion => "CannonballExplosion",
            Self::BombExplosion => "BombExplosion",
            Self::MainMenu => MAIN_MENU_TAG,
        }
    }

    fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.tag() == tag)
    }

    fn of(entity: &Entity) -> Option<Self> {
        Self::from_tag(entity.tag())
    }

    fn is_enemy(self) -> bool {
        matches!(self, Self::Minion | Self::Boss)
    }

    fn projectile_kind(self) -> Option<ProjectileKind> {
        match self {
            Self::PlayerBullet | Self::EnemyBullet => Some(ProjectileKind::Bullet),
            Self::PlayerCannonball => Some(ProjectileKind::Cannonball),
            Self::BossBomb => Some(ProjectileKind::Bomb),
            _ => None,
        }
    }

    /// Kinds the persistence hooks bring back after a load.
    fn is_restorable(self) -> bool {
        self.is_enemy() || self.projectile_kind().is_some()
    }
}

/// One-shot attack request raised by an enemy brain and consumed by the combat pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum PendingAction {
    #[default]
    None,
    MeleeRequest,
    RangedRequest,
    BombRequest,
}

impl PendingAction {
    fn is_none(self) -> bool {
        self == Self::None
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
enum ProjectileKind {
    #[default]
    Bullet,
    Cannonball,
    Bomb,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ProjectileSpec {
    speed: f32,
    lifetime_seconds: f32,
    mass: f32,
    damage: i32,
    sprite_key: &'static str,
    sprite_size: f32,
}

impl ProjectileKind {
    fn spec(self) -> ProjectileSpec {
        match self {
            Self::Bullet => ProjectileSpec {
                speed: 250.0,
                lifetime_seconds: 3.0,
                mass: 0.2,
                damage: 15,
                sprite_key: "projectile",
                sprite_size: 15.0,
            },
            Self::Cannonball => ProjectileSpec {
                speed: 200.0,
                lifetime_seconds: 4.0,
                mass: 0.5,
                damage: 50,
                sprite_key: "cannonball",
                sprite_size: 25.0,
            },
            Self::Bomb => ProjectileSpec {
                speed: 150.0,
                lifetime_seconds: 4.0,
                mass: 1.0,
                damage: 80,
                sprite_key: "bomb",
                sprite_size: 20.0,
            },
        }
    }
}

/// How an enemy picks its next attack once cooldowns allow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EnemyBehavior {
    /// Melee when in reach, otherwise ranged.
    Skirmisher,
    /// Bomb first, then melee, then ranged.
    Bombardier,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
enum EnemyArchetypeId {
    #[default]
    Minion,
    Boss,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct EnemyArchetype {
    kind: EntityKind,
    max_health: i32,
    mass: f32,
    move_force: f32,
    sprite_key: &'static str,
    sprite_size: f32,
    behavior: EnemyBehavior,
}

const MINION_ARCHETYPE: EnemyArchetype = EnemyArchetype {
    kind: EntityKind::Minion,
    max_health: 30,
    mass: 0.8,
    move_force: 50.0,
    sprite_key: "enemy",
    sprite_size: 40.0,
    behavior: EnemyBehavior::Skirmisher,
};

const BOSS_ARCHETYPE: EnemyArchetype = EnemyArchetype {
    kind: EntityKind::Boss,
    max_health: 150,
    mass: 1.5,
    move_force: 30.0,
    sprite_key: "boss",
    sprite_size: 60.0,
    behavior: EnemyBehavior::Bombardier,
};

impl EnemyArchetypeId {
    fn archetype(self) -> &'static EnemyArchetype {
        match self {
            Self::Minion => &MINION_ARCHETYPE,
            Self::Boss => &BOSS_ARCHETYPE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PlayerAttack {
    Melee,
    Ranged,
    Cannon,
}

impl PlayerAttack {
    fn cooldown_seconds(self) -> f32 {
        match self {
            Self::Melee => MELEE_COOLDOWN_SECONDS,
            Self::Ranged => RANGED_COOLDOWN_SECONDS,
            Self::Cannon => CANNON_COOLDOWN_SECONDS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Won,
    Lost,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionPhase {
    Running,
    Paused,
    Loading,
    Ended(Outcome),
}

/// Session constants fixed when the scene is built.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct GameConfig {
    pub(crate) arena: Vec2,
    pub(crate) spawn_interval_seconds: f32,
    pub(crate) wave_size: usize,
    pub(crate) session_duration_seconds: f32,
    pub(crate) player_start: Vec2,
    pub(crate) rng_seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            arena: Vec2::new(ARENA_WIDTH, ARENA_HEIGHT),
            spawn_interval_seconds: 10.0,
            wave_size: 5,
            session_duration_seconds: 60.0,
            player_start: Vec2::new(400.0, 300.0),
            rng_seed: 0x5eed,
        }
    }
}
