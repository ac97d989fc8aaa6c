pub mod decode;
pub mod pubsub;

// Публичный экспорт всех типов ошибок из вложенных модулей.
pub use decode::*;
pub use pubsub::*;
