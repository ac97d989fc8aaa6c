use std::{fmt, marker::PhantomData, sync::Arc};

use futures::stream::{self, BoxStream, StreamExt};
use smuggler_error::{ErrorExt, TryRecvError};

use super::{envelope, publish::SmugglerStats, Smuggled, Smuggler};
use crate::{
    logging::status_event,
    pubsub::{MessageStream, SenderRef, SinkHandle, Subscription},
};

/// Pull-наблюдение за значениями типа `T`.
///
/// Обёртка над [`Subscription`]: каждое сырое сообщение канала проходит
/// фильтр отправителя и извлечение. Сообщения, которые не удалось извлечь,
/// пропускаются и не прерывают наблюдение.
///
/// Drop снимает подписку сразу же.
pub struct Observation<T> {
    subscription: Subscription,
    stats: Arc<SmugglerStats>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Smuggled> Observation<T> {
    pub(crate) fn new(
        subscription: Subscription,
        stats: Arc<SmugglerStats>,
    ) -> Self {
        Self {
            subscription,
            stats,
            _marker: PhantomData,
        }
    }

    /// Ожидает следующее успешно извлечённое значение.
    ///
    /// Возвращает `None`, только когда канал закрыт. Отставание от буфера
    /// логируется, после чего наблюдение продолжается с самого старого
    /// сохранённого сообщения.
    pub async fn next(&mut self) -> Option<T> {
        loop {
            match self.subscription.recv().await {
                Ok(message) => {
                    if let Some(value) = envelope::decode(&message) {
                        return Some(value);
                    }
                    self.stats.record_drop();
                }
                Err(err) if err.is_recoverable() => {
                    status_event!(
                        err.status_code(),
                        channel = %self.subscription.channel,
                        error = %err,
                        "Observation lagged, some messages dropped"
                    );
                }
                Err(_) => return None,
            }
        }
    }

    /// Неблокирующий вариант [`next`](Self::next).
    ///
    /// # Возвращает
    /// - `Ok(T)` если подходящее значение уже доступно
    /// - `Err(TryRecvError::Empty)` если значений пока нет
    /// - `Err(TryRecvError::Closed)` если канал закрыт
    pub fn try_next(&mut self) -> Result<T, TryRecvError> {
        loop {
            match self.subscription.try_recv() {
                Ok(message) => {
                    if let Some(value) = envelope::decode(&message) {
                        return Ok(value);
                    }
                    self.stats.record_drop();
                }
                Err(err @ TryRecvError::Lagged(_)) => {
                    status_event!(
                        err.status_code(),
                        channel = %self.subscription.channel,
                        error = %err,
                        "Observation lagged, some messages dropped"
                    );
                }
                Err(err) => return Err(err),
            }
        }
    }

    pub fn channel_name(&self) -> &Arc<str> {
        self.subscription.channel_name()
    }

    pub fn sender_filter(&self) -> Option<&SenderRef> {
        self.subscription.sender_filter()
    }

    /// Явно прекратить наблюдение. Аналогично `drop(self)`.
    pub fn unsubscribe(self) {}

    /// Превращает наблюдение в [`futures::Stream`].
    ///
    /// Поток заканчивается вместе с каналом. Drop потока снимает подписку.
    pub fn into_stream(self) -> BoxStream<'static, T> {
        stream::unfold(self, |mut observation| async move {
            observation.next().await.map(|value| (value, observation))
        })
        .boxed()
    }
}

impl<T> fmt::Debug for Observation<T> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("Observation")
            .field("channel", &self.subscription.channel)
            .field("type", &std::any::type_name::<T>())
            .finish()
    }
}

/// Push-поток значений типа `T` с произвольным числом независимых
/// подписчиков.
///
/// Каждая регистрация получает собственную копию каждого значения,
/// опубликованного после её создания. Отмена одной регистрации не влияет на
/// остальные.
pub struct Observable<T> {
    stream: MessageStream,
    stats: Arc<SmugglerStats>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            stream: self.stream.clone(),
            stats: self.stats.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T: Smuggled> Observable<T> {
    /// Новая независимая pull-регистрация.
    pub fn subscribe(&self) -> Observation<T> {
        Observation::new(self.stream.subscribe(), self.stats.clone())
    }

    /// Регистрирует callback, вызываемый на каждое извлечённое значение.
    ///
    /// Регистрация создаётся до возврата из функции. Требует запущенного
    /// runtime tokio.
    pub fn sink<F>(
        &self,
        mut callback: F,
    ) -> SinkHandle
    where
        F: FnMut(T) + Send + 'static,
    {
        let mut observation = self.subscribe();
        SinkHandle::spawn(self.stream.channel_name().clone(), async move {
            while let Some(value) = observation.next().await {
                callback(value);
            }
        })
    }

    pub fn channel_name(&self) -> &Arc<str> {
        self.stream.channel_name()
    }
}

impl Smuggler {
    /// Наблюдение за значениями `T` от любых отправителей.
    pub fn observe<T: Smuggled>(&self) -> Observation<T> {
        self.observe_scoped(None)
    }

    /// Наблюдение за значениями `T`, опубликованными именно `sender`.
    pub fn observe_from<T: Smuggled>(
        &self,
        sender: &SenderRef,
    ) -> Observation<T> {
        self.observe_scoped(Some(sender))
    }

    /// Push-поток значений `T` от любых отправителей.
    pub fn observable<T: Smuggled>(&self) -> Observable<T> {
        self.observable_scoped(None)
    }

    /// Push-поток значений `T`, опубликованных именно `sender`.
    pub fn observable_from<T: Smuggled>(
        &self,
        sender: &SenderRef,
    ) -> Observable<T> {
        self.observable_scoped(Some(sender))
    }

    fn observe_scoped<T: Smuggled>(
        &self,
        sender: Option<&SenderRef>,
    ) -> Observation<T> {
        let subscription = self.broker.subscribe(&T::channel_name(), sender);
        Observation::new(subscription, self.stats.clone())
    }

    fn observable_scoped<T: Smuggled>(
        &self,
        sender: Option<&SenderRef>,
    ) -> Observable<T> {
        Observable {
            stream: self.broker.stream(&T::channel_name(), sender),
            stats: self.stats.clone(),
            _marker: PhantomData,
        }
    }
}
