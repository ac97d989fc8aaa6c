use serde::{Deserialize, Serialize};

use ::config::{Config, ConfigError, Environment};

/// Настройки библиотеки.
///
/// Источники (по возрастанию приоритета): значения по умолчанию, переменные
/// окружения с префиксом `SMUGGLER_`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Ёмкость кольцевого буфера каждого канала.
    pub channel_capacity: usize,
    /// Директива уровня логирования (`info`, `smuggler=debug`, ...).
    pub log_level: String,
    /// Формат логов: `compact`, `pretty` или `json`.
    pub log_format: String,
}

impl Settings {
    pub const ENV_PREFIX: &'static str = "SMUGGLER";

    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(Environment::with_prefix(Self::ENV_PREFIX).try_parsing(true))
    }

    /// Загружает настройки с явно заданным источником окружения.
    pub fn load_with(env: Environment) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let cfg = Config::builder()
            // Добавляем значения по умолчанию
            .set_default("channel_capacity", defaults.channel_capacity as u64)?
            .set_default("log_level", defaults.log_level)?
            .set_default("log_format", defaults.log_format)?
            // Переменные окружения перекрывают значения по умолчанию
            .add_source(env)
            .build()?;

        // Десериализуем конфигурацию в нашу структуру
        cfg.try_deserialize()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            channel_capacity: 1024,
            log_level: "info".to_string(),
            log_format: "compact".to_string(),
        }
    }
}
