use siege_engine::LoopConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

use super::gameplay::GameConfig;

pub(crate) struct AppWiring {
    pub(crate) config: LoopConfig,
    pub(crate) game: GameConfig,
}

pub(crate) fn build_app() -> AppWiring {
    init_tracing();
    info!("=== Siege Startup ===");

    let game = GameConfig {
        rng_seed: rand::random(),
        ..GameConfig::default()
    };
    let config = LoopConfig::default();
    info!(
        window_width = config.window_width,
        window_height = config.window_height,
        spawn_interval = game.spawn_interval_seconds,
        wave_size = game.wave_size,
        duration = game.session_duration_seconds,
        rng_seed = game.rng_seed,
        "game_configured"
    );

    AppWiring { config, game }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}
