use std::sync::Arc;

use smuggler_error::{RecvError, TryRecvError};
use tokio::sync::broadcast;
use tracing::trace;

use super::{Message, SenderRef};

/// Подписка на конкретный канал по имени (pull-последовательность).
///
/// Каждая подписка является независимым курсор по каналу: все подписки получают
/// свою копию каждого сообщения, опубликованного после их создания.
///
/// Если задан фильтр отправителя, сообщения без отправителя или от другого
/// отправителя пропускаются ещё до выдачи наружу.
///
/// Отписка происходит автоматически при `Drop`.
pub struct Subscription {
    /// Название канала, на который подписаны.
    pub channel: Arc<str>,
    /// Фильтр по идентичности отправителя.
    pub(crate) sender: Option<SenderRef>,
    /// Внутренний приёмник для входящих сообщений.
    pub(crate) inner: broadcast::Receiver<Message>,
}

impl Subscription {
    pub(crate) fn new(
        channel: Arc<str>,
        sender: Option<SenderRef>,
        inner: broadcast::Receiver<Message>,
    ) -> Self {
        Self {
            channel,
            sender,
            inner,
        }
    }

    /// Асинхронно ожидает следующее сообщение, прошедшее фильтр отправителя.
    ///
    /// # Возвращает
    /// - `Ok(Message)` при успешном получении сообщения
    /// - `Err(RecvError::Closed)` если канал закрыт
    /// - `Err(RecvError::Lagged(n))` если приёмник отстал на `n` сообщений;
    ///   подписка остаётся рабочей, следующий вызов вернёт самое старое
    ///   сохранённое сообщение
    pub async fn recv(&mut self) -> Result<Message, RecvError> {
        loop {
            let message = self.inner.recv().await?;
            if self.accepts(&message) {
                return Ok(message);
            }
            trace!(channel = %self.channel, "Message from foreign sender skipped");
        }
    }

    /// Пытается получить сообщение без ожидания.
    ///
    /// # Возвращает
    /// - `Ok(Message)` если подходящее сообщение доступно немедленно
    /// - `Err(TryRecvError::Empty)` если подходящих сообщений нет
    /// - `Err(TryRecvError::Closed)` если канал закрыт
    /// - `Err(TryRecvError::Lagged(n))` если приёмник отстал на `n` сообщений
    pub fn try_recv(&mut self) -> Result<Message, TryRecvError> {
        loop {
            let message = self.inner.try_recv()?;
            if self.accepts(&message) {
                return Ok(message);
            }
        }
    }

    /// Проходит ли сообщение фильтр отправителя этой подписки.
    pub fn accepts(
        &self,
        message: &Message,
    ) -> bool {
        match &self.sender {
            Some(sender) => message.is_from(sender),
            None => true,
        }
    }

    /// Явно отписаться от канала. Аналогично `drop(self)`.
    pub fn unsubscribe(self) {
        // При drop Receiver отписывается сам
    }

    /// Возвращает имя канала, на который подписались.
    pub fn channel_name(&self) -> &Arc<str> {
        &self.channel
    }

    /// Фильтр отправителя, если он задан.
    pub fn sender_filter(&self) -> Option<&SenderRef> {
        self.sender.as_ref()
    }

    /// Проверяет, закрыт ли канал (нет активных отправителей).
    pub fn is_closed(&self) -> bool {
        self.inner.is_closed()
    }

    /// Количество сообщений в очереди (до применения фильтра отправителя).
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
