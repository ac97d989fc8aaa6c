use thiserror::Error;

use crate::{ErrorExt, StatusCode};

/// Ошибка при получении сообщений (блокирующая операция).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecvError {
    /// Канал закрыт, новых сообщений не будет.
    #[error("channel is closed")]
    Closed,

    /// Получатель отстал, пропущено `n` сообщений.
    #[error("receiver lagged behind by {0} messages")]
    Lagged(u64),
}

/// Ошибка при неблокирующем получении сообщений.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TryRecvError {
    #[error("no messages available")]
    Empty,

    #[error("channel is closed")]
    Closed,

    #[error("receiver lagged behind by {0} messages")]
    Lagged(u64),
}

impl ErrorExt for RecvError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Closed => StatusCode::ChannelClosed,
            Self::Lagged(_) => StatusCode::Lagged,
        }
    }

    fn metrics_tags(&self) -> Vec<(&'static str, String)> {
        let mut tags = vec![
            ("error_type", "pubsub_recv".to_string()),
            ("status_code", self.status_code().to_string()),
        ];
        if let Self::Lagged(count) = self {
            tags.push(("lagged_count", count.to_string()));
        }
        tags
    }
}

impl ErrorExt for TryRecvError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Empty => StatusCode::Empty,
            Self::Closed => StatusCode::ChannelClosed,
            Self::Lagged(_) => StatusCode::Lagged,
        }
    }
}

// === Преобразования ===

impl From<TryRecvError> for RecvError {
    fn from(err: TryRecvError) -> Self {
        match err {
            TryRecvError::Empty | TryRecvError::Closed => RecvError::Closed,
            TryRecvError::Lagged(n) => RecvError::Lagged(n),
        }
    }
}

#[cfg(feature = "tokio")]
impl From<tokio::sync::broadcast::error::RecvError> for RecvError {
    fn from(err: tokio::sync::broadcast::error::RecvError) -> Self {
        match err {
            tokio::sync::broadcast::error::RecvError::Closed => RecvError::Closed,
            tokio::sync::broadcast::error::RecvError::Lagged(n) => RecvError::Lagged(n),
        }
    }
}

#[cfg(feature = "tokio")]
impl From<tokio::sync::broadcast::error::TryRecvError> for TryRecvError {
    fn from(err: tokio::sync::broadcast::error::TryRecvError) -> Self {
        match err {
            tokio::sync::broadcast::error::TryRecvError::Empty => TryRecvError::Empty,
            tokio::sync::broadcast::error::TryRecvError::Closed => TryRecvError::Closed,
            tokio::sync::broadcast::error::TryRecvError::Lagged(n) => TryRecvError::Lagged(n),
        }
    }
}
