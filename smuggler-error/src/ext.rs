use std::error::Error;

use crate::StatusCode;

/// Общие сведения об ошибках крейта, нужные для логов и метрик.
pub trait ErrorExt: Error + Send + Sync + 'static {
    /// Категория ошибки.
    fn status_code(&self) -> StatusCode;

    /// Можно ли продолжать наблюдение после такой ошибки.
    fn is_recoverable(&self) -> bool {
        self.status_code().is_recoverable()
    }

    /// Пары ключ/значение для структурных логов и метрик.
    fn metrics_tags(&self) -> Vec<(&'static str, String)> {
        vec![("status_code", self.status_code().to_string())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DecodeError, RecvError};

    #[derive(Debug, thiserror::Error)]
    #[error("gone")]
    struct Gone;

    impl ErrorExt for Gone {
        fn status_code(&self) -> StatusCode {
            StatusCode::ChannelClosed
        }
    }

    /// Тест проверяет реализации по умолчанию.
    #[test]
    fn test_default_methods() {
        assert!(!Gone.is_recoverable());
        assert_eq!(
            Gone.metrics_tags(),
            vec![("status_code", StatusCode::ChannelClosed.to_string())]
        );
    }

    /// Тест проверяет, что ошибки извлечения и отставание восстановимы, а
    /// закрытие канала нет.
    #[test]
    fn test_recoverable_through_trait_object() {
        let errors: Vec<Box<dyn ErrorExt>> = vec![
            Box::new(DecodeError::MissingPayload {
                key: "k".into(),
                channel: "c".into(),
            }),
            Box::new(RecvError::Lagged(1)),
            Box::new(RecvError::Closed),
        ];
        let recoverable: Vec<bool> = errors.iter().map(|e| e.is_recoverable()).collect();
        assert_eq!(recoverable, vec![true, true, false]);
        assert_eq!(errors[2].to_string(), "channel is closed");
    }
}
