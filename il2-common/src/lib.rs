//! IL2 Common
//!
//! Common utilities shared by the InterlockLedger IL2 client crates.
//!
//! This crate provides:
//! - Component-based structured logging with a client context id
//! - A small logging configuration layer on top of `env_logger`

pub mod logging;
pub mod macros;

// Re-export traits and types at the root level
pub use logging::{Component, ComponentKey, LogLevel, Logger, LoggingConfig};
