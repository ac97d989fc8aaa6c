use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use tracing::trace;

use super::{envelope, Smuggled};
use crate::{
    config::Settings,
    pubsub::{Broker, Message, SenderRef},
};

/// Счётчики типизированного слоя.
#[derive(Debug, Default)]
pub struct SmugglerStats {
    /// Количество типизированных публикаций
    pub published: AtomicU64,
    /// Количество сообщений, пропущенных из-за ошибки извлечения
    pub dropped: AtomicU64,
}

impl SmugglerStats {
    pub(crate) fn record_drop(&self) {
        self.dropped.fetch_add(1, Ordering::Relaxed);
    }
}

/// Типизированный фасад над [`Broker`].
///
/// Производители публикуют значения типов [`Smuggled`], потребители
/// наблюдают за ними через [`observe`](Smuggler::observe) и
/// [`observable`](Smuggler::observable). Клонирование дёшево: клоны
/// разделяют брокер и счётчики.
#[derive(Clone, Default)]
pub struct Smuggler {
    pub(crate) broker: Broker,
    pub(crate) stats: Arc<SmugglerStats>,
}

impl Smuggler {
    pub fn new(broker: Broker) -> Self {
        Self {
            broker,
            stats: Arc::new(SmugglerStats::default()),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(Broker::from_settings(settings))
    }

    /// Нижележащий нетипизированный диспетчер.
    pub fn broker(&self) -> &Broker {
        &self.broker
    }

    /// Собирает конверт без отправителя, ничего не публикуя.
    pub fn envelope<T: Smuggled>(
        &self,
        value: T,
    ) -> Message {
        envelope::build_envelope(value, None)
    }

    /// Собирает конверт от имени `sender`, ничего не публикуя.
    pub fn envelope_from<T: Smuggled>(
        &self,
        value: T,
        sender: &SenderRef,
    ) -> Message {
        envelope::build_envelope(value, Some(sender))
    }

    /// Публикует значение без отправителя.
    ///
    /// Не блокирует и не может завершиться ошибкой. Возвращает число
    /// получателей канала в момент отправки. Число носит справочный
    /// характер: в него входят подписки, которые отбросят сообщение
    /// фильтром отправителя или при извлечении, а `0` означает лишь, что
    /// сейчас никто не слушает. Гарантией доставки оно не является.
    pub fn publish<T: Smuggled>(
        &self,
        value: T,
    ) -> usize {
        self.post(envelope::build_envelope(value, None))
    }

    /// Публикует значение от имени `sender`.
    ///
    /// Возвращаемое число справочное, как и у [`publish`](Self::publish):
    /// оно считает и те подписки, чей фильтр отправителя не совпадает с
    /// `sender`.
    pub fn publish_from<T: Smuggled>(
        &self,
        value: T,
        sender: &SenderRef,
    ) -> usize {
        self.post(envelope::build_envelope(value, Some(sender)))
    }

    /// Разовое извлечение значения из уже полученного сообщения.
    ///
    /// Ошибка логируется и учитывается в [`dropped_count`](Self::dropped_count).
    pub fn decode<T: Smuggled>(
        &self,
        message: &Message,
    ) -> Option<T> {
        let value = envelope::decode(message);
        if value.is_none() {
            self.stats.record_drop();
        }
        value
    }

    pub fn stats(&self) -> &SmugglerStats {
        &self.stats
    }

    pub fn published_count(&self) -> u64 {
        self.stats.published.load(Ordering::Relaxed)
    }

    pub fn dropped_count(&self) -> u64 {
        self.stats.dropped.load(Ordering::Relaxed)
    }

    fn post(
        &self,
        message: Message,
    ) -> usize {
        self.stats.published.fetch_add(1, Ordering::Relaxed);
        let channel = message.channel.clone();
        let receivers = self.broker.post(message);
        trace!(channel = %channel, receivers, "Value published");
        receivers
    }
}
