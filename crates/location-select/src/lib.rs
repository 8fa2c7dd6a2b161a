//! Location selection backed by a normalized area directory.
//!
//! The [`location`] module holds the resolver that turns list picks and map
//! picks into selection commands, the in-memory state container those
//! commands are applied to, and the view derived from both.

pub mod config;
pub mod error;
pub mod location;
pub mod telemetry;
