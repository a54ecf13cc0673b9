use std::process::ExitCode;

use siege_engine::{resolve_app_paths, run_app};
use tracing::{error, info};

use super::bootstrap::AppWiring;
use super::gameplay;

pub(crate) fn run(app: AppWiring) -> ExitCode {
    let paths = match resolve_app_paths() {
        Ok(paths) => paths,
        Err(err) => {
            error!(error = %err, "startup_failed");
            return ExitCode::FAILURE;
        }
    };
    info!(root = %paths.root.display(), saves = %paths.saves_dir.display(), "paths_resolved");

    let scene = gameplay::build_game_scene(app.game, &paths.saves_dir);
    if let Err(err) = run_app(app.config, &paths, scene) {
        error!(error = %err, "startup_failed");
        return ExitCode::FAILURE;
    }

    info!("shutdown");
    ExitCode::SUCCESS
}
