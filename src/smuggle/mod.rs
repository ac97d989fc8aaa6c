//! Типизированный слой поверх [`crate::pubsub`].
//!
//! - `identity`: трейт [`Smuggled`] и вывод имён каналов из типа.
//! - `envelope`: сборка конверта и извлечение значения.
//! - `publish`: фасад [`Smuggler`] для производителей.
//! - `observe`: [`Observation`] (pull) и [`Observable`] (push) для
//!   потребителей.

pub mod envelope;
pub mod identity;
pub mod observe;
pub mod publish;

pub use envelope::{build_envelope, decode, try_decode};
pub use identity::*;
pub use observe::*;
pub use publish::*;
