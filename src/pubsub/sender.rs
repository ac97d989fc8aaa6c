use std::{
    any::Any,
    fmt,
    hash::{Hash, Hasher},
    sync::Arc,
};

/// Идентичность отправителя сообщения.
///
/// Непрозрачная ссылка на произвольный объект. Два `SenderRef` равны только
/// если указывают на **один и тот же** объект (сравнение по адресу, а не по
/// значению). Клонирование сохраняет идентичность.
#[derive(Clone)]
pub struct SenderRef(Arc<dyn Any + Send + Sync>);

impl SenderRef {
    /// Оборачивает объект в новую идентичность.
    ///
    /// Два вызова `new` с равными значениями дают **разных** отправителей.
    pub fn new<S: Any + Send + Sync>(sender: S) -> Self {
        Self(Arc::new(sender))
    }

    /// Использует уже существующий `Arc` как идентичность.
    ///
    /// Все `SenderRef`, созданные из клонов одного `Arc`, равны между собой.
    pub fn from_arc<S: Any + Send + Sync>(sender: Arc<S>) -> Self {
        Self(sender)
    }

    /// Анонимный отправитель без данных, уникальный для каждого вызова.
    pub fn anonymous() -> Self {
        // `Arc<()>` всё равно выделяет собственный блок со счётчиками,
        // поэтому адреса различны.
        Self(Arc::new(()))
    }

    /// Проверяет идентичность двух отправителей.
    pub fn is(
        &self,
        other: &SenderRef,
    ) -> bool {
        self.addr() == other.addr()
    }

    /// Пытается получить ссылку на исходный объект.
    pub fn downcast_ref<S: Any>(&self) -> Option<&S> {
        self.0.downcast_ref::<S>()
    }

    fn addr(&self) -> *const () {
        Arc::as_ptr(&self.0) as *const ()
    }
}

impl PartialEq for SenderRef {
    fn eq(
        &self,
        other: &Self,
    ) -> bool {
        self.is(other)
    }
}

impl Eq for SenderRef {}

impl Hash for SenderRef {
    fn hash<H: Hasher>(
        &self,
        state: &mut H,
    ) {
        (self.addr() as usize).hash(state);
    }
}

impl fmt::Debug for SenderRef {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "SenderRef({:p})", self.addr())
    }
}
