use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use dashmap::DashMap;
use tokio::sync::broadcast;
use tracing::{debug, trace};

use super::{intern_channel, Message, MessageStream, SenderRef, Subscription};
use crate::config::Settings;

type ChannelKey = Arc<str>;

/// Счётчики брокера.
#[derive(Debug, Default)]
pub struct BrokerStats {
    /// Общее количество вызовов `post`
    pub publish_count: AtomicUsize,
    /// Количество неудачных `send` (канал есть, но подписчиков нет)
    pub send_error_count: AtomicUsize,
}

/// Внутрипроцессный диспетчер сообщений.
///
/// Поддерживает:
/// - Подписки по точному имени канала, с необязательным фильтром отправителя
/// - Pull-подписки ([`Subscription`]) и push-потоки ([`MessageStream`])
/// - Автоматическое удаление каналов без подписчиков
/// - Статистику публикаций и ошибок отправки
///
/// Доставка best-effort: сообщение получают только те, кто подписан в
/// момент публикации; ничего не сохраняется. Клонирование дёшево: все
/// клоны работают с одним и тем же набором каналов.
#[derive(Clone)]
pub struct Broker {
    /// Точные каналы → `Sender`
    channels: Arc<DashMap<ChannelKey, broadcast::Sender<Message>>>,
    /// Ёмкость буфера каждого `broadcast::channel`
    capacity: usize,
    stats: Arc<BrokerStats>,
}

impl Broker {
    /// Ёмкость канала по умолчанию.
    pub const DEFAULT_CAPACITY: usize = 1024;

    /// Создаёт новый `Broker` с заданной буферной ёмкостью (минимум 1).
    pub fn new(capacity: usize) -> Self {
        Self {
            channels: Arc::new(DashMap::new()),
            capacity: capacity.max(1),
            stats: Arc::new(BrokerStats::default()),
        }
    }

    /// Создаёт `Broker` из загруженных настроек.
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.channel_capacity)
    }

    /// Подписка на конкретный канал (точное совпадение).
    ///
    /// Если передан `sender`, подписка получит только сообщения, у которых
    /// отправитель идентичен ему. Receiver создаётся под блокировкой записи
    /// канала, поэтому одновременная очистка пустого канала его не потеряет.
    pub fn subscribe(
        &self,
        channel: &str,
        sender: Option<&SenderRef>,
    ) -> Subscription {
        let key = intern_channel(channel);
        let entry = self
            .channels
            .entry(key.clone())
            .or_insert_with(|| broadcast::channel(self.capacity).0);
        let rx = entry.subscribe();
        let receivers = entry.receiver_count();
        drop(entry);

        debug!(
            channel = %key,
            filtered = sender.is_some(),
            receivers,
            "New subscription created"
        );
        Subscription::new(key, sender.cloned(), rx)
    }

    /// Push-поток по каналу: каждая регистрация получает независимую копию
    /// всех подходящих сообщений.
    pub fn stream(
        &self,
        channel: &str,
        sender: Option<&SenderRef>,
    ) -> MessageStream {
        MessageStream::new(self.clone(), intern_channel(channel), sender.cloned())
    }

    /// Публикация сообщения в его канал.
    ///
    /// Никогда не блокирует и не возвращает ошибку. Возвращает количество
    /// подписчиков, до которых дошло сообщение.
    ///
    /// Если у канала не осталось подписчиков, увеличивает
    /// `send_error_count` и удаляет канал.
    pub fn post(
        &self,
        message: Message,
    ) -> usize {
        self.stats.publish_count.fetch_add(1, Ordering::Relaxed);

        let Some(tx) = self
            .channels
            .get(&*message.channel)
            .map(|entry| entry.value().clone())
        else {
            trace!(channel = %message.channel, "Message dropped (no channel)");
            return 0;
        };

        match tx.send(message) {
            Ok(receivers) => {
                trace!(receivers, "Message posted");
                receivers
            }
            Err(broadcast::error::SendError(message)) => {
                self.stats.send_error_count.fetch_add(1, Ordering::Relaxed);
                self.channels
                    .remove_if(&*message.channel, |_, tx| tx.receiver_count() == 0);
                debug!(channel = %message.channel, "Message dropped (no receivers)");
                0
            }
        }
    }

    /// Удаляет канал вместе со всеми подписками.
    ///
    /// Все текущие подписки получат `Closed` после того, как вычитают
    /// накопленные сообщения. Следующий `post` канал заново не создаст.
    pub fn unsubscribe_all(
        &self,
        channel: &str,
    ) {
        if self.channels.remove(channel).is_some() {
            debug!(channel, "Channel torn down");
        }
    }

    /// Количество активных получателей на канале.
    pub fn receiver_count(
        &self,
        channel: &str,
    ) -> usize {
        self.channels
            .get(channel)
            .map_or(0, |entry| entry.receiver_count())
    }

    /// Существует ли запись канала.
    pub fn has_channel(
        &self,
        channel: &str,
    ) -> bool {
        self.channels.contains_key(channel)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn stats(&self) -> &BrokerStats {
        &self.stats
    }

    pub fn publish_count(&self) -> usize {
        self.stats.publish_count.load(Ordering::Relaxed)
    }

    pub fn send_error_count(&self) -> usize {
        self.stats.send_error_count.load(Ordering::Relaxed)
    }
}

impl Default for Broker {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}
