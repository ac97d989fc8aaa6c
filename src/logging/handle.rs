use tracing_subscriber::{reload, EnvFilter, Registry};

use super::LoggingError;

/// Дескриптор установленной системы логирования.
///
/// Позволяет менять фильтр уровней во время работы без переустановки
/// глобального подписчика.
#[derive(Clone)]
pub struct LoggingHandle {
    filter: reload::Handle<EnvFilter, Registry>,
}

impl LoggingHandle {
    pub(crate) fn new(filter: reload::Handle<EnvFilter, Registry>) -> Self {
        Self { filter }
    }

    /// Заменяет текущий фильтр новой директивой (`debug`,
    /// `smuggler=trace,info` и т.п.).
    pub fn set_level(
        &self,
        directive: &str,
    ) -> Result<(), LoggingError> {
        let filter = EnvFilter::try_new(directive)?;
        self.filter.reload(filter)?;
        tracing::info!(directive, "Log filter reloaded");
        Ok(())
    }

    /// Текущая директива фильтра. `None`, если подписчик уже снят.
    pub fn current_directive(&self) -> Option<String> {
        self.filter.with_current(|f| f.to_string()).ok()
    }
}

impl std::fmt::Debug for LoggingHandle {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("LoggingHandle")
            .field("directive", &self.current_directive())
            .finish()
    }
}
