//! Shared utilities, configuration, and error handling for Roster
//!
//! This crate provides common functionality used across the Roster workspace:
//! - Configuration loaded from the environment
//! - Error types and handling
//! - Tracing subscriber setup
//! - State machine error types

pub mod config;
pub mod db;
pub mod error;
pub mod state;
pub mod telemetry;

pub use config::{Config, LogFormat};
pub use db::RepositoryError;
pub use error::{Error, Result};
pub use state::StateError;
pub use telemetry::init_tracing;
