use std::{future::Future, sync::Arc};

use smuggler_error::ErrorExt;
use tokio::task::JoinHandle;
use tracing::debug;

use super::{Broker, Message, SenderRef, Subscription};
use crate::logging::status_event;

/// Push-поток сообщений одного канала.
///
/// Сам по себе ничего не читает: каждая регистрация ([`subscribe`] или
/// [`sink`]) создаёт собственную подписку с собственным курсором, поэтому
/// подписчики не конкурируют за сообщения и не влияют друг на друга.
///
/// [`subscribe`]: MessageStream::subscribe
/// [`sink`]: MessageStream::sink
#[derive(Clone)]
pub struct MessageStream {
    broker: Broker,
    channel: Arc<str>,
    sender: Option<SenderRef>,
}

impl MessageStream {
    pub(crate) fn new(
        broker: Broker,
        channel: Arc<str>,
        sender: Option<SenderRef>,
    ) -> Self {
        Self {
            broker,
            channel,
            sender,
        }
    }

    /// Регистрирует нового независимого подписчика.
    pub fn subscribe(&self) -> Subscription {
        self.broker.subscribe(&self.channel, self.sender.as_ref())
    }

    /// Регистрирует callback, который синхронно вызывается на каждое
    /// доставленное сообщение.
    ///
    /// Регистрация создаётся сразу, до возврата из функции: всё, что
    /// опубликовано после вызова, будет доставлено. Требует запущенного
    /// runtime tokio.
    pub fn sink<F>(
        &self,
        mut callback: F,
    ) -> SinkHandle
    where
        F: FnMut(Message) + Send + 'static,
    {
        let mut subscription = self.subscribe();
        SinkHandle::spawn(self.channel.clone(), async move {
            loop {
                match subscription.recv().await {
                    Ok(message) => callback(message),
                    Err(err) if err.is_recoverable() => {
                        status_event!(
                            err.status_code(),
                            channel = %subscription.channel,
                            error = %err,
                            "Sink lagged, some messages dropped"
                        );
                    }
                    Err(_) => break,
                }
            }
        })
    }

    pub fn channel_name(&self) -> &Arc<str> {
        &self.channel
    }

    pub fn sender_filter(&self) -> Option<&SenderRef> {
        self.sender.as_ref()
    }
}

/// Регистрация push-подписчика.
///
/// Пока handle жив, фоновая задача доставляет сообщения в callback.
/// `Drop` или [`cancel`](SinkHandle::cancel) снимает только эту регистрацию.
pub struct SinkHandle {
    channel: Arc<str>,
    task: JoinHandle<()>,
}

impl SinkHandle {
    pub(crate) fn spawn<F>(
        channel: Arc<str>,
        delivery: F,
    ) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        debug!(channel = %channel, "Sink attached");
        Self {
            channel,
            task: tokio::spawn(delivery),
        }
    }

    /// Явно снять регистрацию. Аналогично `drop(self)`.
    pub fn cancel(self) {}

    /// Завершилась ли доставка (канал закрыт или задача отменена).
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Ожидает, пока канал не будет закрыт и доставка не завершится.
    pub async fn closed(mut self) {
        let _ = (&mut self.task).await;
    }

    pub fn channel_name(&self) -> &Arc<str> {
        &self.channel
    }
}

impl Drop for SinkHandle {
    fn drop(&mut self) {
        if !self.task.is_finished() {
            self.task.abort();
            debug!(channel = %self.channel, "Sink detached");
        }
    }
}
