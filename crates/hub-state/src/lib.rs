//! # Hub State
//!
//! The adapter's model of the router: port entities, the routing history
//! used for return-to-previous, the resizable state store, and the
//! interpreters that fold inbound protocol blocks into it.
//!
//! Pure data and logic; no I/O, no async, no logging. Skipped lines come
//! back as warnings for the owning actor to report.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing,
    clippy::todo
)]

pub mod fallback;
pub mod interpret;
pub mod ports;
pub mod store;

pub use fallback::{FallbackStack, DEFAULT_FALLBACK_CAP};
pub use interpret::{apply, Applied, Outcome};
pub use ports::{InputPort, OutputKind, OutputPort, SerialPort};
pub use store::HubState;
