//! Подсистема Publish–Subscribe: нетипизированный диспетчер сообщений.
//!
//! Этот модуль реализует лёгкое внутрипроцессное вещание, поверх которого
//! работает типизированный слой [`crate::smuggle`]:
//!
//! - `broker`: каналы, подписки и доставка сообщений.
//! - `intern` (приватный): пул имён каналов.
//! - `message`: сообщение и нетипизированная карта полезной нагрузки.
//! - `sender`: идентичность отправителя (сравнение по указателю).
//! - `stream`: push-потоки с независимыми регистрациями.
//! - `subscriber`: pull-подписки.

pub mod broker;
mod intern;
pub mod message;
pub mod sender;
pub mod stream;
pub mod subscriber;

pub use broker::*;
pub(crate) use intern::intern_channel;
pub use message::*;
pub use sender::*;
pub use stream::*;
pub use subscriber::*;
