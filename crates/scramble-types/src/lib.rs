//! Core types for Memory Scramble.
//!
//! This crate is the leaf of the workspace: every other crate depends on
//! it and it depends on nothing but serde.
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │  scramble-sim   : simulation harness (binary)   │
//! ├─────────────────────────────────────────────────┤
//! │  scramble-board : board concurrency engine      │
//! ├─────────────────────────────────────────────────┤
//! │  scramble-types : PlayerId, Position, ErrorCode │  ◄── HERE
//! └─────────────────────────────────────────────────┘
//! ```
//!
//! # Contents
//!
//! - [`PlayerId`] - opaque string identity of a player
//! - [`Position`] - zero-based `(row, col)` grid coordinate
//! - [`ErrorCode`] - unified machine-readable error interface, with
//!   the [`assert_error_codes`] test helper

mod error;
mod id;
mod position;

pub use error::{assert_error_codes, ErrorCode};
pub use id::PlayerId;
pub use position::Position;
