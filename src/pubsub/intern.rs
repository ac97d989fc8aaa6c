use std::sync::Arc;

use dashmap::DashMap;
use once_cell::sync::Lazy;

/// Пул `Arc<str>` для имён каналов.
///
/// Имя канала живёт всё время работы процесса, поэтому пул никогда не
/// очищается. Crate-private.
static CHANNEL_INTERN: Lazy<DashMap<Box<str>, Arc<str>>> = Lazy::new(DashMap::new);

/// Возвращает interned `Arc<str>` для данного имени канала.
///
/// Одинаковые имена всегда дают один и тот же `Arc` (сравнение по указателю
/// эквивалентно сравнению строк).
#[inline]
pub(crate) fn intern_channel<S: AsRef<str>>(chan: S) -> Arc<str> {
    let key = chan.as_ref();
    if let Some(existing) = CHANNEL_INTERN.get(key) {
        return existing.clone();
    }
    CHANNEL_INTERN
        .entry(Box::from(key))
        .or_insert_with(|| Arc::from(key))
        .clone()
}

/// Есть ли имя в пуле.
#[cfg(test)]
pub(crate) fn is_interned(chan: &str) -> bool {
    CHANNEL_INTERN.contains_key(chan)
}
