use std::{any::TypeId, sync::Arc};

use dashmap::{mapref::entry::Entry, DashMap};
use once_cell::sync::Lazy;
use tracing::warn;

use crate::pubsub::intern_channel;

/// Пространство имён каналов по умолчанию.
pub const SMUGGLER_NAMESPACE: &str = "NotificationSmuggler";

/// Пространство имён первого поколения протокола.
///
/// Используется типами, которые должны общаться с производителями и
/// потребителями, всё ещё работающими по старой схеме имён.
pub const LEGACY_NAMESPACE: &str = "BetterNotification";

/// Готовые имена каналов по типу полезной нагрузки.
static CHANNEL_NAMES: Lazy<DashMap<TypeId, Arc<str>>> = Lazy::new(DashMap::new);

/// Владелец каждого выданного имени канала.
static CLAIMED_NAMES: Lazy<DashMap<Arc<str>, TypeId>> = Lazy::new(DashMap::new);

/// Закрепляет имя `base` за типом `id`.
///
/// Если имя уже занято другим типом (например, два типа `Event`, объявленные
/// в разных функциях одного модуля), к нему добавляется суффикс `#2`, `#3`
/// и т.д. Один и тот же тип всегда получает одно и то же имя.
fn claim_channel_name(
    id: TypeId,
    base: String,
) -> Arc<str> {
    let mut candidate = intern_channel(&base);
    let mut attempt = 1;
    loop {
        match CLAIMED_NAMES.entry(candidate.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(id);
                if attempt > 1 {
                    warn!(
                        base = %base,
                        channel = %candidate,
                        "Channel name already owned by another type, disambiguated"
                    );
                }
                return candidate;
            }
            Entry::Occupied(owner) if *owner.get() == id => return candidate,
            Entry::Occupied(_) => {
                attempt += 1;
                candidate = intern_channel(format!("{base}#{attempt}"));
            }
        }
    }
}

/// Маркер типа полезной нагрузки, который может путешествовать через
/// диспетчер.
///
/// Тип объявляет своё полное имя, а из него выводятся имя канала и ключ в
/// карте полезной нагрузки: `"<NAMESPACE>:<TYPE_NAME>"`. Обе строки
/// совпадают, и производители с потребителями полагаются на это.
///
/// Обычно реализуется через [`smuggled!`](crate::smuggled):
///
/// ```
/// use smuggler::{smuggled, Smuggled};
///
/// #[derive(Debug, Clone, PartialEq)]
/// struct Answer {
///     value: i64,
/// }
///
/// smuggled!(Answer);
///
/// assert!(Answer::channel_name().starts_with("NotificationSmuggler:"));
/// assert!(Answer::channel_name().ends_with("::Answer"));
/// ```
///
/// Для обобщённых типов или своего имени канала трейт реализуется вручную.
/// Два разных типа никогда не делят канал: если `"<NAMESPACE>:<TYPE_NAME>"`
/// уже занят другим типом, второй получает имя с суффиксом `#N` и
/// предупреждение в логе. Такое имя зависит от порядка первого обращения,
/// поэтому стабильным его считать нельзя; уникальный `TYPE_NAME` этого
/// избегает.
pub trait Smuggled: Clone + Send + Sync + 'static {
    /// Полное имя типа.
    const TYPE_NAME: &'static str;

    /// Пространство имён (префикс канала).
    const NAMESPACE: &'static str = SMUGGLER_NAMESPACE;

    /// Имя канала для этого типа.
    ///
    /// Вычисляется один раз на тип, далее возвращается тот же `Arc`.
    fn channel_name() -> Arc<str> {
        let id = TypeId::of::<Self>();
        if let Some(name) = CHANNEL_NAMES.get(&id) {
            return name.clone();
        }
        let name = claim_channel_name(id, format!("{}:{}", Self::NAMESPACE, Self::TYPE_NAME));
        CHANNEL_NAMES.entry(id).or_insert(name).clone()
    }

    /// Ключ значения в карте полезной нагрузки. Совпадает с именем канала.
    fn payload_key() -> Arc<str> {
        Self::channel_name()
    }
}

/// Реализует [`Smuggled`](crate::Smuggled) для одного или нескольких типов.
///
/// `TYPE_NAME` собирается из `module_path!()` места вызова и имени типа.
/// Функция, внутри которой объявлен тип, в путь не входит: одноимённые типы
/// из разных функций одного модуля разводятся суффиксом (см. [`Smuggled`]).
///
/// ```
/// use smuggler::{smuggled, Smuggled, LEGACY_NAMESPACE};
///
/// #[derive(Clone)]
/// struct Ping;
/// #[derive(Clone)]
/// struct Pong;
/// #[derive(Clone)]
/// struct Old;
///
/// smuggled!(Ping, Pong);
/// smuggled!(Old, namespace = LEGACY_NAMESPACE);
///
/// assert_ne!(Ping::channel_name(), Pong::channel_name());
/// assert!(Old::channel_name().starts_with("BetterNotification:"));
/// ```
#[macro_export]
macro_rules! smuggled {
    ($ty:ty, namespace = $ns:expr) => {
        impl $crate::Smuggled for $ty {
            const TYPE_NAME: &'static str = concat!(module_path!(), "::", stringify!($ty));
            const NAMESPACE: &'static str = $ns;
        }
    };
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::Smuggled for $ty {
                const TYPE_NAME: &'static str = concat!(module_path!(), "::", stringify!($ty));
            }
        )+
    };
}
