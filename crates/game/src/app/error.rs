use engine::{LevelLoadError, StartupError};
use thiserror::Error;

use super::config::ConfigError;

#[derive(Debug, Error)]
pub(crate) enum GameError {
    #[error(transparent)]
    Startup(#[from] StartupError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Level(#[from] LevelLoadError),
}
