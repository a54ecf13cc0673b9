use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub mod app;

pub use app::components;
pub use app::{
    run_app, AppError, AsAny, Color, Component, ComponentContext, DeferredTimers, DrawCommand,
    Entity, EntityId, FrameRenderer, InputAction, InputSnapshot, LoopConfig, LoopMetricsSnapshot,
    Particle, PixelCanvas, RecordingRenderer, Renderer, Scene, SceneCommand, SceneWorld,
    SpriteCache, SpriteKeyError, Vec2, WorldView,
};

pub const ROOT_ENV_VAR: &str = "SIEGE_ROOT";

#[derive(Debug, Clone)]
pub struct AppPaths {
    pub root: PathBuf,
    pub sprites_dir: PathBuf,
    pub saves_dir: PathBuf,
}

impl AppPaths {
    /// Lays out the standard directories under an already-known root without touching the disk.
    pub fn under_root(root: PathBuf) -> Self {
        Self {
            sprites_dir: root.join("assets").join("sprites"),
            saves_dir: root.join("saves"),
            root,
        }
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to read environment variable {var}: {source}")]
    EnvVar {
        var: &'static str,
        #[source]
        source: env::VarError,
    },
    #[error("failed to resolve current executable path: {0}")]
    CurrentExe(#[source] std::io::Error),
    #[error("current executable path has no parent directory: {0}")]
    ExeHasNoParent(PathBuf),
    #[error("failed to create saves directory at {path}: {source}")]
    CreateSavesDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(
        "SIEGE_ROOT is set but does not point to a valid project root: {path}\n\
A valid root must contain Cargo.toml and either crates/ or assets/."
    )]
    InvalidEnvRoot { path: PathBuf },
    #[error(
        "Could not detect project root by walking upward from executable directory: {start_dir}\n\
Expected a directory containing Cargo.toml and either crates/ or assets/.\n\
Set {env_var} explicitly, for example: export {env_var}=\"/path/to/siege\""
    )]
    RootNotFound {
        start_dir: PathBuf,
        env_var: &'static str,
    },
}

/// Finds the project root and makes sure the saves directory exists.
pub fn resolve_app_paths() -> Result<AppPaths, StartupError> {
    let paths = AppPaths::under_root(resolve_root()?);
    fs::create_dir_all(&paths.saves_dir).map_err(|source| StartupError::CreateSavesDir {
        path: paths.saves_dir.clone(),
        source,
    })?;
    Ok(paths)
}

fn resolve_root() -> Result<PathBuf, StartupError> {
    match env::var(ROOT_ENV_VAR) {
        Ok(value) => {
            let normalized = normalize_path(&PathBuf::from(value));
            if is_repo_marker(&normalized) {
                Ok(normalized)
            } else {
                Err(StartupError::InvalidEnvRoot { path: normalized })
            }
        }
        Err(env::VarError::NotPresent) => {
            let exe = env::current_exe().map_err(StartupError::CurrentExe)?;
            let exe_dir = exe
                .parent()
                .map(Path::to_path_buf)
                .ok_or_else(|| StartupError::ExeHasNoParent(exe.clone()))?;
            find_root_above(&exe_dir).ok_or_else(|| StartupError::RootNotFound {
                start_dir: normalize_path(&exe_dir),
                env_var: ROOT_ENV_VAR,
            })
        }
        Err(source) => Err(StartupError::EnvVar {
            var: ROOT_ENV_VAR,
            source,
        }),
    }
}

fn find_root_above(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|candidate| is_repo_marker(candidate))
        .map(normalize_path)
}

fn is_repo_marker(path: &Path) -> bool {
    path.join("Cargo.toml").is_file() && (path.join("crates").is_dir() || path.join("assets").is_dir())
}

fn normalize_path(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn repo_marker_requires_cargo_toml() {
        let temp = TempDir::new().expect("temp dir");
        fs::create_dir(temp.path().join("assets")).expect("assets dir");
        assert!(!is_repo_marker(temp.path()));

        fs::write(temp.path().join("Cargo.toml"), "[workspace]\n").expect("manifest");
        assert!(is_repo_marker(temp.path()));
    }

    #[test]
    fn root_is_found_from_nested_directory() {
        let temp = TempDir::new().expect("temp dir");
        fs::write(temp.path().join("Cargo.toml"), "[workspace]\n").expect("manifest");
        let nested = temp.path().join("crates").join("game").join("target");
        fs::create_dir_all(&nested).expect("nested dirs");

        let found = find_root_above(&nested).expect("root");
        assert_eq!(found, normalize_path(temp.path()));
    }

    #[test]
    fn paths_follow_root_layout() {
        let paths = AppPaths::under_root(PathBuf::from("/srv/siege"));
        assert_eq!(paths.sprites_dir, PathBuf::from("/srv/siege/assets/sprites"));
        assert_eq!(paths.saves_dir, PathBuf::from("/srv/siege/saves"));
    }
}
