//! Логирование на базе `tracing`.
//!
//! Библиотека сама подписчика не ставит: это делает приложение через
//! [`init_logging`]. Все события крейта пишутся с target `smuggler::*`.

pub mod config;
mod error;
mod filters;
mod formatter;
pub mod handle;
mod status;

pub use config::{LogFormat, LoggingConfig};
pub use error::LoggingError;
pub use handle::LoggingHandle;
pub(crate) use status::status_event;
#[cfg(test)]
pub(crate) use status::capture_events;
use tracing_subscriber::{
    layer::{Layered, SubscriberExt},
    reload,
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

type FilteredRegistry = Layered<reload::Layer<EnvFilter, Registry>, Registry>;

/// Инициализация логирования с конфигурацией.
///
/// Устанавливает глобальный подписчик. Повторный вызов возвращает ошибку,
/// уже установленный подписчик при этом не меняется.
pub fn init_logging(config: LoggingConfig) -> Result<LoggingHandle, LoggingError> {
    let env_filter = filters::build_filter_from_config(&config);
    let (filter_layer, reload_handle) = reload::Layer::new(env_filter);
    let fmt_layer: Box<dyn Layer<FilteredRegistry> + Send + Sync> =
        formatter::build_formatter_from_config(&config);

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .try_init()?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        log_level = %config.level,
        log_format = %config.format,
        "Logging system initialized"
    );

    Ok(LoggingHandle::new(reload_handle))
}

/// Инициализация из общих настроек крейта.
pub fn init_from_settings(
    settings: &crate::config::Settings
) -> Result<LoggingHandle, LoggingError> {
    init_logging(LoggingConfig::from_settings(settings))
}
