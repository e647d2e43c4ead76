// Logging utilities for the IL2 client crates
//
// This module provides:
// - Component-based structured logging
// - Context id tracking through logger inheritance (usually the certificate
//   common name or the node host the client talks to)
// - Request path tracing for REST calls
// - A level configuration applied through env_logger

use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::{self, Arguments, Display, Formatter};

/// Predefined components for logging categorization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Component {
    Client,
    Keys,
    NodeApi,
    ChainApi,
    RecordApi,
    JsonApi,
    OpaqueApi,
    Custom(&'static str),
}

impl Component {
    /// Get the string representation of the component
    pub fn as_str(&self) -> &str {
        match self {
            Component::Client => "Client",
            Component::Keys => "Keys",
            Component::NodeApi => "NodeApi",
            Component::ChainApi => "ChainApi",
            Component::RecordApi => "RecordApi",
            Component::JsonApi => "JsonApi",
            Component::OpaqueApi => "OpaqueApi",
            Component::Custom(name) => name,
        }
    }

    /// Log target used for this component, so env_logger can filter per component
    pub fn target(&self) -> &'static str {
        match self {
            Component::Client => "il2::client",
            Component::Keys => "il2::keys",
            Component::NodeApi => "il2::api::node",
            Component::ChainApi => "il2::api::chain",
            Component::RecordApi => "il2::api::record",
            Component::JsonApi => "il2::api::json",
            Component::OpaqueApi => "il2::api::opaque",
            Component::Custom(_) => "il2",
        }
    }
}

// Lightweight Display helpers to avoid prefix String allocations
struct ComponentPrefixDisplay {
    parent: Option<Component>,
    component: Component,
}

impl Display for ComponentPrefixDisplay {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.parent {
            Some(parent) if parent != Component::Client => {
                write!(f, "{}.{}", parent.as_str(), self.component.as_str())
            }
            _ => write!(f, "{}", self.component.as_str()),
        }
    }
}

struct MaybeRequestDisplay<'a>(Option<&'a str>);

impl Display for MaybeRequestDisplay<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if let Some(path) = self.0 {
            write!(f, "|request={path}")
        } else {
            Ok(())
        }
    }
}

/// A helper for creating component-specific loggers with context id tracking
#[derive(Clone, Debug)]
pub struct Logger {
    /// Component this logger is for
    component: Component,
    /// Context id shown in every line
    context_id: String,
    /// Parent component for hierarchical logging (if any)
    parent_component: Option<Component>,
    /// Request path for REST call tracing
    request_path: Option<String>,
}

impl Logger {
    /// Create a new root logger for a specific component and context id
    pub fn new_root(component: Component, context_id: &str) -> Self {
        Self {
            component,
            context_id: context_id.to_string(),
            parent_component: None,
            request_path: None,
        }
    }

    /// Create a child logger with the same context id but different component
    pub fn with_component(&self, component: Component) -> Self {
        Self {
            component,
            context_id: self.context_id.clone(),
            parent_component: Some(self.component),
            request_path: self.request_path.clone(),
        }
    }

    /// Create a logger with a request path
    pub fn with_request_path(&self, path: impl Into<String>) -> Self {
        Self {
            component: self.component,
            context_id: self.context_id.clone(),
            parent_component: self.parent_component,
            request_path: Some(path.into()),
        }
    }

    /// Get a reference to the context id
    pub fn context_id(&self) -> &str {
        &self.context_id
    }

    /// Get the component of this logger
    pub fn component(&self) -> Component {
        self.component
    }

    /// Get a reference to the request path if available
    pub fn request_path(&self) -> Option<&str> {
        self.request_path.as_deref()
    }

    fn prefix(&self) -> ComponentPrefixDisplay {
        ComponentPrefixDisplay {
            parent: self.parent_component,
            component: self.component,
        }
    }

    /// Log a debug message
    pub fn debug(&self, message: impl Into<String>) {
        self.debug_args(format_args!("{}", message.into()));
    }

    /// Log a debug message using fmt::Arguments (avoids allocating message String)
    pub fn debug_args(&self, args: Arguments) {
        let target = self.component.target();
        if log::log_enabled!(target: target, log::Level::Debug) {
            debug!(
                target: target,
                "[{}][{}{}] {}",
                self.context_id,
                self.prefix(),
                MaybeRequestDisplay(self.request_path()),
                args
            );
        }
    }

    /// Log an info message
    pub fn info(&self, message: impl Into<String>) {
        self.info_args(format_args!("{}", message.into()));
    }

    /// Log an info message using fmt::Arguments
    pub fn info_args(&self, args: Arguments) {
        let target = self.component.target();
        if log::log_enabled!(target: target, log::Level::Info) {
            info!(
                target: target,
                "[{}][{}{}] {}",
                self.context_id,
                self.prefix(),
                MaybeRequestDisplay(self.request_path()),
                args
            );
        }
    }

    /// Log a warning message
    pub fn warn(&self, message: impl Into<String>) {
        self.warn_args(format_args!("{}", message.into()));
    }

    /// Log a warning using fmt::Arguments
    pub fn warn_args(&self, args: Arguments) {
        let target = self.component.target();
        if log::log_enabled!(target: target, log::Level::Warn) {
            warn!(
                target: target,
                "[{}][{}{}] {}",
                self.context_id,
                self.prefix(),
                MaybeRequestDisplay(self.request_path()),
                args
            );
        }
    }

    /// Log an error message
    pub fn error(&self, message: impl Into<String>) {
        self.error_args(format_args!("{}", message.into()));
    }

    /// Log an error using fmt::Arguments
    pub fn error_args(&self, args: Arguments) {
        let target = self.component.target();
        if log::log_enabled!(target: target, log::Level::Error) {
            error!(
                target: target,
                "[{}][{}{}] {}",
                self.context_id,
                self.prefix(),
                MaybeRequestDisplay(self.request_path()),
                args
            );
        }
    }
}

/* -------------------------------------------------------------------------
 * Configuration
 * ---------------------------------------------------------------------- */

/// Log levels accepted by [`LoggingConfig`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => log::LevelFilter::Off,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Key identifying a component in per-component level overrides
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ComponentKey(&'static str);

impl From<Component> for ComponentKey {
    fn from(component: Component) -> Self {
        ComponentKey(component.target())
    }
}

impl ComponentKey {
    pub fn target(&self) -> &'static str {
        self.0
    }
}

/// Logging configuration, applied once per process through env_logger.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    default_level: LogLevel,
    component_levels: HashMap<ComponentKey, LogLevel>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self::default_info()
    }
}

impl LoggingConfig {
    pub fn new() -> Self {
        Self::default_info()
    }

    pub fn default_info() -> Self {
        Self {
            default_level: LogLevel::Info,
            component_levels: HashMap::new(),
        }
    }

    pub fn with_default_level(mut self, level: LogLevel) -> Self {
        self.default_level = level;
        self
    }

    pub fn with_component_level(mut self, component: Component, level: LogLevel) -> Self {
        self.component_levels.insert(component.into(), level);
        self
    }

    pub fn default_level(&self) -> LogLevel {
        self.default_level
    }

    pub fn component_level(&self, component: Component) -> LogLevel {
        self.component_levels
            .get(&component.into())
            .copied()
            .unwrap_or(self.default_level)
    }

    /// Install the global logger. A logger that is already installed is left in place.
    pub fn apply(&self) {
        let mut builder = env_logger::Builder::new();
        builder.filter_level(self.default_level.into());
        for (key, level) in &self.component_levels {
            builder.filter_module(key.target(), (*level).into());
        }
        // RUST_LOG still wins when set
        if let Ok(spec) = std::env::var("RUST_LOG") {
            builder.parse_filters(&spec);
        }
        let _ = builder.try_init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn component_levels_fall_back_to_default() {
        let config = LoggingConfig::new()
            .with_default_level(LogLevel::Warn)
            .with_component_level(Component::Keys, LogLevel::Debug);

        assert_eq!(config.component_level(Component::Keys), LogLevel::Debug);
        assert_eq!(config.component_level(Component::Client), LogLevel::Warn);
    }

    #[test]
    fn prefix_includes_parent_component() {
        let root = Logger::new_root(Component::Client, "test");
        let child = root.with_component(Component::Keys);
        let nested = child.with_component(Component::JsonApi);

        assert_eq!(child.prefix().to_string(), "Keys");
        assert_eq!(nested.prefix().to_string(), "Keys.JsonApi");
    }

    #[test]
    fn log_level_deserializes_lowercase() {
        let level: LogLevel = serde_json::from_str("\"debug\"").unwrap();
        assert_eq!(level, LogLevel::Debug);
    }

    #[test]
    fn apply_twice_is_harmless() {
        LoggingConfig::default_info().apply();
        LoggingConfig::new().with_default_level(LogLevel::Debug).apply();
    }
}
