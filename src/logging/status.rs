/// Пишет событие `tracing` с уровнем, который рекомендует код статуса
/// ([`StatusCode::log_level`](smuggler_error::StatusCode::log_level)).
///
/// ```ignore
/// status_event!(err.status_code(), channel = %channel, "Message dropped");
/// ```
macro_rules! status_event {
    ($status:expr, $($arg:tt)+) => {
        match $status.log_level() {
            ::smuggler_error::LogLevel::Trace => ::tracing::trace!($($arg)+),
            ::smuggler_error::LogLevel::Debug => ::tracing::debug!($($arg)+),
            ::smuggler_error::LogLevel::Info => ::tracing::info!($($arg)+),
            ::smuggler_error::LogLevel::Warn => ::tracing::warn!($($arg)+),
            ::smuggler_error::LogLevel::Error => ::tracing::error!($($arg)+),
        }
    };
}

pub(crate) use status_event;

/// Собирает текст событий, записанных внутри `f`, начиная с уровня `DEBUG`.
#[cfg(test)]
pub(crate) fn capture_events<F: FnOnce()>(f: F) -> String {
    use std::sync::{Arc, Mutex};

    use tracing_subscriber::{filter::LevelFilter, fmt, prelude::*, registry::Registry};

    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for Captured {
        fn write(
            &mut self,
            buf: &[u8],
        ) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    let buffer = Arc::new(Mutex::new(Vec::new()));
    let writer = buffer.clone();
    let layer = fmt::layer()
        .with_writer(move || Captured(writer.clone()))
        .with_ansi(false)
        .with_filter(LevelFilter::DEBUG);
    let subscriber = Registry::default().with(layer);

    tracing::subscriber::with_default(subscriber, f);

    let out = String::from_utf8_lossy(&buffer.lock().unwrap()).to_string();
    out
}

#[cfg(test)]
mod tests {
    use smuggler_error::StatusCode;

    use super::capture_events;

    /// Тест проверяет, что уровень события берётся из кода статуса.
    #[test]
    fn test_level_follows_status_code() {
        let out = capture_events(|| {
            status_event!(StatusCode::TypeMismatch, "mismatch event");
            status_event!(StatusCode::ChannelClosed, "closed event");
            status_event!(StatusCode::Empty, "empty event");
        });

        let line = |needle: &str| {
            out.lines()
                .find(|l| l.contains(needle))
                .map(str::to_string)
                .unwrap_or_default()
        };
        assert!(line("mismatch event").contains("WARN"));
        assert!(line("closed event").contains("DEBUG"));
        assert!(!out.contains("empty event"));
    }
}
