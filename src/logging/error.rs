use thiserror::Error;
use tracing_subscriber::{filter::ParseError, reload, util::TryInitError};

/// Ошибки настройки логирования.
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("invalid log filter directive: {0}")]
    InvalidDirective(#[from] ParseError),

    #[error("global subscriber already installed: {0}")]
    AlreadyInitialized(#[from] TryInitError),

    #[error("log filter reload failed: {0}")]
    Reload(#[from] reload::Error),
}
