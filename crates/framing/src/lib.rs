//! Streaming reconstruction of Videohub protocol messages.
//!
//! The device speaks an unframed, newline-terminated text protocol over a
//! persistent TCP connection. Bytes arrive in arbitrary chunks, so message
//! boundaries have to be rebuilt in two stages:
//!
//! - [`LineFramer`]: bytes → complete lines (partial line carried across
//!   chunk boundaries)
//! - [`BlockAssembler`]: lines → protocol blocks (header line + data lines,
//!   terminated by a blank line)
//!
//! [`BlockReader`] composes both for the common case of feeding raw socket
//! chunks and receiving finished [`Block`]s.
//!
//! This crate is deliberately dependency-free and does no I/O or logging of
//! its own; malformed input is reported through typed results and counters
//! so the owning actor can decide how loudly to complain.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing,
    clippy::todo
)]

pub mod blocks;
pub mod lines;

pub use blocks::{Block, BlockAssembler, BlockReader, Fed};
pub use lines::LineFramer;
