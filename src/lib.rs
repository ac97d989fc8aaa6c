//! Type-safe publish/subscribe over an untyped broadcast dispatcher.
//!
//! A payload type opts in by implementing [`Smuggled`] (usually through the
//! [`smuggled!`] macro). Its channel name and payload key are derived from the
//! type's fully qualified name, so producers and consumers never agree on
//! string constants by hand:
//!
//! ```
//! use smuggler::{smuggled, Smuggler};
//!
//! #[derive(Debug, Clone, PartialEq)]
//! struct Answer {
//!     value: i64,
//! }
//!
//! smuggled!(Answer);
//!
//! # #[tokio::main(flavor = "multi_thread", worker_threads = 2)]
//! # async fn main() {
//! let smuggler = Smuggler::default();
//! let mut answers = smuggler.observe::<Answer>();
//!
//! smuggler.publish(Answer { value: 42 });
//!
//! assert_eq!(answers.next().await, Some(Answer { value: 42 }));
//! # }
//! ```
//!
//! Messages that cannot be decoded into the observed type are logged at
//! `warn` and skipped; they never end an observation.
//!
//! # Scheduling
//!
//! Publishing never waits for subscribers. An observer waiting in
//! [`Observation::next`] holds its task until a value arrives, so a producer
//! and its observer must not share one serial context where the observer
//! blocks the producer. Run them as separate tasks, and prefer the
//! multi-thread runtime when pushing values through
//! [`Observable::sink`].

/// Settings loaded from defaults and `SMUGGLER_*` environment variables.
pub mod config;
/// `tracing-subscriber` initialization (filters, formats, runtime reload).
pub mod logging;
/// Untyped dispatcher: Broker, Subscription, MessageStream, Message.
pub mod pubsub;
/// Typed layer: identity derivation, envelope codec, publish/observe.
pub mod smuggle;

// -----------------------------------------------------------------------------
//  Frequently used public types
// -----------------------------------------------------------------------------

/// config
pub use self::config::Settings;
/// Logging setup.
pub use logging::{
    init_from_settings, init_logging, LogFormat, LoggingConfig, LoggingError, LoggingHandle,
};
/// Untyped dispatcher API.
pub use pubsub::{
    Broker, BrokerStats, Message, MessageStream, PayloadMap, PayloadValue, SenderRef, SinkHandle,
    Subscription,
};
/// Decode and receive errors.
pub use smuggler_error::{DecodeError, ErrorExt, RecvError, StatusCode, TryRecvError};
/// Typed API.
pub use smuggle::{
    build_envelope, decode, try_decode, Observable, Observation, Smuggled, Smuggler,
    SmugglerStats, LEGACY_NAMESPACE, SMUGGLER_NAMESPACE,
};
