//! # Hub Runtime
//!
//! Runtime infrastructure for the Videohub actor system.
//!
//! This crate defines:
//! - **Actor trait**: Base trait for all actors with lifecycle methods
//! - **Channel management**: Type-safe message routing between actors
//! - **Logging macros**: Consistent output across actors
//!
//! ## Architecture
//!
//! The actor runtime follows these principles:
//! - **Message passing**: Actors communicate via typed messages
//! - **Sequential processing**: Messages are handled one at a time
//! - **Failure isolation**: Actor errors don't crash the system
//!
//! ## Example
//!
//! ```ignore
//! use hub_runtime::{spawn_actor, ChannelManager};
//!
//! // Create channel infrastructure
//! let (manager, handles) = ChannelManager::new();
//!
//! // Create and spawn actors
//! let hub_actor = HubActor::new(/* ... */);
//! spawn_actor(hub_actor, handles.hub_rx, handles.event_tx.clone());
//!
//! // Send commands from the shell
//! manager.send_command(HubCommand::Route { output: 0, source: 3, force: false });
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing,
    clippy::todo
)]

pub mod actor;
pub mod channels;
pub mod logging;

pub use actor::{spawn_actor, Actor};
pub use channels::{ActorHandles, ChannelManager, HubMessage, ReconnectMessage, SocketMessage};
