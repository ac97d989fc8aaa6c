use std::{
    any::{self, Any},
    collections::HashMap,
    fmt,
    sync::Arc,
};

use super::SenderRef;

/// Нетипизированная карта полезной нагрузки: ключ → значение.
pub type PayloadMap = HashMap<Arc<str>, PayloadValue>;

/// Значение со стёртым типом внутри [`PayloadMap`].
///
/// Вместе со значением хранится имя исходного типа, только для
/// диагностики, на проверку типа оно не влияет.
#[derive(Clone)]
pub struct PayloadValue {
    value: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl PayloadValue {
    pub fn new<V: Any + Send + Sync>(value: V) -> Self {
        Self {
            value: Arc::new(value),
            type_name: any::type_name::<V>(),
        }
    }

    /// Имя типа, с которым значение было положено в карту.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Проверенное приведение к `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    pub fn is<T: Any>(&self) -> bool {
        self.value.is::<T>()
    }
}

impl fmt::Debug for PayloadValue {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "PayloadValue<{}>", self.type_name)
    }
}

/// Сообщение диспетчера: имя канала, необязательный отправитель и
/// нетипизированная полезная нагрузка.
///
/// Диспетчер не делает предположений о содержимом `payload`: в нём может
/// быть ноль, одна или несколько записей.
///
/// Имена и ключи сырых сообщений в пул имён не попадают: произвольные
/// ключи живут ровно столько, сколько само сообщение.
#[derive(Debug, Clone)]
pub struct Message {
    pub channel: Arc<str>,
    pub sender: Option<SenderRef>,
    pub payload: PayloadMap,
}

impl Message {
    /// Создаёт сообщение без отправителя и с пустой полезной нагрузкой.
    pub fn new(channel: impl Into<Arc<str>>) -> Self {
        Self {
            channel: channel.into(),
            sender: None,
            payload: PayloadMap::new(),
        }
    }

    pub fn with_sender(
        mut self,
        sender: SenderRef,
    ) -> Self {
        self.sender = Some(sender);
        self
    }

    pub fn with_entry<V: Any + Send + Sync>(
        mut self,
        key: impl Into<Arc<str>>,
        value: V,
    ) -> Self {
        self.insert(key, value);
        self
    }

    /// Кладёт значение под ключ, заменяя предыдущее.
    pub fn insert<V: Any + Send + Sync>(
        &mut self,
        key: impl Into<Arc<str>>,
        value: V,
    ) {
        self.payload.insert(key.into(), PayloadValue::new(value));
    }

    pub fn get(
        &self,
        key: &str,
    ) -> Option<&PayloadValue> {
        self.payload.get(key)
    }

    /// Отправлено ли сообщение именно этим отправителем (по идентичности).
    pub fn is_from(
        &self,
        sender: &SenderRef,
    ) -> bool {
        self.sender.as_ref().is_some_and(|s| s.is(sender))
    }
}
