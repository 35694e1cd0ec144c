//! # Hub Actors
//!
//! The three actors that run the adapter, plus the caller-facing write
//! path:
//! - **HubActor**: owns the device model; folds inbound blocks into state
//!   and dispatches caller commands
//! - **SocketActor**: owns the TCP session, read loop, and keep-alive
//! - **ReconnectActor**: redials after unplanned drops with exponential
//!   backoff
//! - **RoutingApi**: validates, lock-gates, encodes, and transmits

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing,
    clippy::todo
)]

pub mod api;
pub mod backoff;
pub mod constants;
pub mod hub_actor;
pub mod queue;
pub mod reconnect_actor;
pub mod socket_actor;

pub use api::RoutingApi;
pub use hub_actor::{shared_hub, HubActor, SharedHandle, SharedHub};
pub use queue::QueueTake;
pub use reconnect_actor::ReconnectActor;
pub use socket_actor::SocketActor;
