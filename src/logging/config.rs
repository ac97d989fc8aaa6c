use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::config::Settings;

/// Формат вывода логов.
#[derive(Debug, Default, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format '{other}'")),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let name = match self {
            Self::Compact => "compact",
            Self::Pretty => "pretty",
            Self::Json => "json",
        };
        f.write_str(name)
    }
}

/// Конфигурация логирования.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Уровень или полная директива `EnvFilter`.
    pub level: String,
    pub format: LogFormat,
    pub with_ansi: bool,
    pub with_target: bool,
    pub with_thread_ids: bool,
    pub with_line_numbers: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Compact,
            with_ansi: true,
            with_target: true,
            with_thread_ids: false,
            with_line_numbers: false,
        }
    }
}

impl LoggingConfig {
    /// Строит конфигурацию из общих настроек.
    ///
    /// Неизвестный формат не считается ошибкой: используется `compact`.
    pub fn from_settings(settings: &Settings) -> Self {
        let format = settings.log_format.parse().unwrap_or_else(|e| {
            eprintln!("{e}; falling back to 'compact'");
            LogFormat::Compact
        });
        Self {
            level: settings.log_level.clone(),
            format,
            ..Default::default()
        }
    }

    /// Директива для `EnvFilter`.
    ///
    /// Голый уровень (`debug`) применяется ко всему; директива с `=` или `,`
    /// передаётся как есть.
    pub fn build_filter_directive(&self) -> String {
        let level = self.level.trim();
        if level.is_empty() {
            "info".to_string()
        } else {
            level.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Тест проверяет разбор формата без учёта регистра.
    #[test]
    fn test_log_format_from_str() {
        assert_eq!("JSON".parse::<LogFormat>(), Ok(LogFormat::Json));
        assert_eq!(" pretty ".parse::<LogFormat>(), Ok(LogFormat::Pretty));
        assert!("xml".parse::<LogFormat>().is_err());
        assert_eq!(LogFormat::Compact.to_string(), "compact");
    }

    /// Тест проверяет перенос уровня и формата из Settings.
    #[test]
    fn test_from_settings() {
        let settings = Settings {
            log_level: "smuggler=debug".to_string(),
            log_format: "json".to_string(),
            ..Default::default()
        };
        let cfg = LoggingConfig::from_settings(&settings);
        assert_eq!(cfg.format, LogFormat::Json);
        assert_eq!(cfg.build_filter_directive(), "smuggler=debug");
    }

    /// Тест проверяет fallback для пустого уровня и неизвестного формата.
    #[test]
    fn test_fallbacks() {
        let settings = Settings {
            log_level: "  ".to_string(),
            log_format: "yaml".to_string(),
            ..Default::default()
        };
        let cfg = LoggingConfig::from_settings(&settings);
        assert_eq!(cfg.format, LogFormat::Compact);
        assert_eq!(cfg.build_filter_directive(), "info");
    }
}
