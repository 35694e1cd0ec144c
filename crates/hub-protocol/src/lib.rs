//! # Hub Protocol
//!
//! Wire vocabulary and message definitions for the Videohub actor system.
//!
//! This crate defines the block names and command text the router speaks,
//! the lock-state codes, the bulk route file codec, and the typed messages
//! exchanged between the hosting shell and the actors. It has no I/O and
//! no async machinery, making it fully testable without a device.
//!
//! ## Message Flow
//!
//! ```text
//! Shell → HubCommand → HubActor → encoded block text → SocketActor → TCP
//!                          ↓
//!                    SystemEvent → Shell
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing,
    clippy::todo
)]

pub mod encode;
pub mod errors;
pub mod lock;
pub mod messages;
pub mod routefile;

pub use errors::HubError;
pub use lock::LockState;
pub use messages::{DeviceInfo, HubCommand, PortCounts, RouteEntry, SystemEvent};
