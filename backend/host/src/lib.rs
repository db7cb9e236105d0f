//! Host process for the launchpad pool engine.
//!
//! Reads commands, hands them to the engine one at a time with an explicit
//! clock and caller, and persists every committed change to SQLite.

pub mod commands;
pub mod config;
pub mod db;
pub mod errors;
pub mod events;
pub mod host;
