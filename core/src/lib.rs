//! Core library entry point that wires together the StoryForge subsystems.
//!
//! Module boundaries follow responsibilities:
//! - [`agents`] builds the chat-completion client from explicit settings.
//! - [`story`] parses model output into a story tree and materializes it.
//! - [`api`] exposes the service functions an embedding host calls.
//! - [`db`] initialises the SQLite database and applies migrations.
//! - [`errors`] keeps the central error catalogue with human friendly metadata.
//! - [`logging`] writes structured diagnostics to the event log table.

pub mod agents;
pub mod api;
pub mod db;
pub mod errors;
pub mod logging;
pub mod story;

pub use errors::{Result, StoryForgeError};
