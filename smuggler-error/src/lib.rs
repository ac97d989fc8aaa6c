pub mod ext;
pub mod status_code;
pub mod types;

// Publicly re-export all error types so callers can reach them from the crate
// root.
pub use ext::*;
pub use status_code::*;
pub use types::*;
