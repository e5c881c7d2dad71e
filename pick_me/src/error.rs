//! Application errors.

use pick_session::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("window error: {0}")]
    Window(#[from] minifb::Error),

    #[error("invalid session configuration: {0}")]
    Config(#[from] ConfigError),
}
