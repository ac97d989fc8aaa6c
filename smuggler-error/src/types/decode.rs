use thiserror::Error;

use crate::{ErrorExt, StatusCode};

/// Ошибка извлечения типизированного значения из сообщения.
///
/// Никогда не пробрасывается в потоки наблюдения: сообщение с такой
/// ошибкой логируется и пропускается.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// В карте полезной нагрузки нет ожидаемого ключа.
    #[error("missing payload for key '{key}' on channel '{channel}'")]
    MissingPayload { key: String, channel: String },

    /// Ключ есть, но значение другого типа.
    #[error("payload on channel '{channel}' has type '{found}', expected '{expected}'")]
    TypeMismatch {
        channel: String,
        expected: String,
        found: String,
    },
}

impl DecodeError {
    /// Короткая стабильная метка для логов/метрик.
    pub fn as_label(&self) -> &'static str {
        match self {
            Self::MissingPayload { .. } => "missing_payload",
            Self::TypeMismatch { .. } => "type_mismatch",
        }
    }

    /// Канал сообщения, на котором произошла ошибка.
    pub fn channel(&self) -> &str {
        match self {
            Self::MissingPayload { channel, .. } | Self::TypeMismatch { channel, .. } => channel,
        }
    }
}

impl ErrorExt for DecodeError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingPayload { .. } => StatusCode::MissingPayload,
            Self::TypeMismatch { .. } => StatusCode::TypeMismatch,
        }
    }

    fn metrics_tags(&self) -> Vec<(&'static str, String)> {
        let mut tags = vec![
            ("error_type", self.as_label().to_string()),
            ("status_code", self.status_code().to_string()),
            ("channel", self.channel().to_string()),
        ];

        match self {
            Self::MissingPayload { key, .. } => {
                tags.push(("key", key.clone()));
            }
            Self::TypeMismatch {
                expected, found, ..
            } => {
                tags.push(("expected", expected.clone()));
                tags.push(("found", found.clone()));
            }
        }

        tags
    }
}
