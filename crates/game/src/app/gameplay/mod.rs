use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use siege_engine::components::{
    apply_damage, AttackRange, Health, Lifetime, PhysicsBody, Sprite, Transform,
};
use siege_engine::{
    Color, Component, ComponentContext, DeferredTimers, Entity, EntityId, InputAction,
    InputSnapshot, Renderer, Scene, SceneCommand, SceneWorld, Vec2,
};
use thiserror::Error;
use tracing::{debug, info, warn};

const ARENA_WIDTH: f32 = 800.0;
const ARENA_HEIGHT: f32 = 600.0;
const SPAWN_EDGE_MARGIN: f32 = 50.0;

const PLAYER_MAX_HEALTH: i32 = 200;
const PLAYER_MASS: f32 = 1.0;
const PLAYER_FRICTION: f32 = 0.9;
const PLAYER_SPRITE_SIZE: f32 = 40.0;
const PLAYER_MOVE_FORCE: f32 = 500.0;

const MELEE_COOLDOWN_SECONDS: f32 = 0.5;
const RANGED_COOLDOWN_SECONDS: f32 = 0.8;
const CANNON_COOLDOWN_SECONDS: f32 = 3.0;

const PLAYER_MELEE_RANGE: f32 = 60.0;
const PLAYER_MELEE_DAMAGE: i32 = 30;
const MELEE_VISUAL_SECONDS: f32 = 0.3;
const MELEE_HITBOX_SECONDS: f32 = MELEE_VISUAL_SECONDS / 6.0;

const ENEMY_FRICTION: f32 = 0.95;
const ENEMY_MELEE_RANGE: f32 = 40.0;
const ENEMY_MELEE_DAMAGE: i32 = 15;
const ENEMY_MELEE_COOLDOWN_SECONDS: f32 = 1.5;
const ENEMY_RANGED_COOLDOWN_SECONDS: f32 = 2.0;
const ENEMY_RANGED_REARM_JITTER_SECONDS: f32 = 2.0;
const BOSS_BOMB_COOLDOWN_SECONDS: f32 = 3.0;

const BULLET_COLLISION_RADIUS: f32 = 20.0;
const AOE_SCAN_RADIUS: f32 = 30.0;
const AOE_ATTACK_RADIUS: f32 = 100.0;
const CANNONBALL_EXPLOSION_SECONDS: f32 = 0.5;
const BOMB_EXPLOSION_SECONDS: f32 = 0.8;

const RESTORE_DELAY_SECONDS: f32 = 0.5;
const END_ACTION_DELAY_SECONDS: f32 = 2.0;
const MUSIC_START_DELAY_SECONDS: f32 = 0.1;
const SAVE_RESUME_DELAY_SECONDS: f32 = 0.5;

const SAVE_VERSION: u32 = 1;
const SAVE_FILE_NAME: &str = "session.json";
const MIN_RESTORED_LIFETIME_SECONDS: f32 = 0.1;
const RESTORED_SPEED_TOLERANCE: f32 = 10.0;

const PLAYER_TAG: &str = "Player";
const MAIN_MENU_TAG: &str = "MainMenu";

include!("types.rs");
include!("components.rs");
include!("factory.rs");
include!("state.rs");
include!("spawning.rs");
include!("physics.rs");
include!("combat.rs");
include!("logic.rs");
include!("persistence.rs");
include!("audio.rs");
include!("menu.rs");
include!("hud.rs");
include!("scene_impl.rs");

/// Builds the session scene with its save slot under `saves_dir`.
pub(crate) fn build_game_scene(config: GameConfig, saves_dir: &Path) -> Box<dyn Scene> {
    let store = JsonFileStore::new(saves_dir.join(SAVE_FILE_NAME));
    let audio = Audio::new(AudioSettings::default(), Box::new(TracingAudio));
    Box::new(GameScene::new(config, Box::new(store), audio))
}

#[cfg(test)]
mod tests {
    include!("tests.rs");
}
