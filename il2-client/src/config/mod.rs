// Configuration Module
//
// Connection settings for an IL2 node: host, the client certificate used for
// mutual TLS, timeouts and logging.
//
// ## Examples
//
// ```rust,no_run
// use il2_client::config::{ClientConfig, LogLevel, LoggingConfig};
//
// let config = ClientConfig::new("https://node.example:32020", "~/certs/rest.api.pfx", "secret")
//     .with_verify_ca(false)
//     .with_timeout_ms(10_000)
//     .with_logging_config(LoggingConfig::new().with_default_level(LogLevel::Debug));
// ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use crate::error::{ClientError, Result};

// Re-export configuration types from il2_common::logging
pub use il2_common::logging::{ComponentKey, LogLevel, LoggingConfig};

pub const ENV_HOST: &str = "IL2_HOST";
pub const ENV_CERT_PATH: &str = "IL2_CERT_PATH";
pub const ENV_CERT_PASSWORD: &str = "IL2_CERT_PASSWORD";
pub const ENV_VERIFY_CA: &str = "IL2_VERIFY_CA";

const DEFAULT_TIMEOUT_MS: u64 = 30_000;
const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 5_000;

/// Settings for [`crate::IL2Client`]
#[derive(Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Node address, `scheme://hostname[:port][/]`
    pub host: String,

    /// Path to the PKCS#12 (.pfx) client certificate
    pub cert_path: PathBuf,

    pub cert_password: String,

    /// Verify the node's TLS certificate against the trusted CAs
    #[serde(default = "default_verify_ca")]
    pub verify_ca: bool,

    /// Whole request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,

    /// Logging configuration options
    #[serde(skip)]
    pub logging_config: Option<LoggingConfig>,
}

fn default_verify_ca() -> bool {
    true
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

fn default_connect_timeout_ms() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_MS
}

impl ClientConfig {
    pub fn new(
        host: impl Into<String>,
        cert_path: impl Into<PathBuf>,
        cert_password: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            cert_path: cert_path.into(),
            cert_password: cert_password.into(),
            verify_ca: true,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            connect_timeout_ms: DEFAULT_CONNECT_TIMEOUT_MS,
            logging_config: Some(LoggingConfig::default_info()), // Default to Info logging
        }
    }

    /// Read `IL2_HOST`, `IL2_CERT_PATH`, `IL2_CERT_PASSWORD` and the optional
    /// `IL2_VERIFY_CA` from the environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = |name: &str| {
            lookup(name)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| ClientError::Configuration(format!("{} is not set", name)))
        };

        let mut config = Self::new(
            required(ENV_HOST)?,
            required(ENV_CERT_PATH)?,
            lookup(ENV_CERT_PASSWORD).unwrap_or_default(),
        );
        if let Some(value) = lookup(ENV_VERIFY_CA) {
            config.verify_ca = parse_bool(&value).ok_or_else(|| {
                ClientError::Configuration(format!(
                    "{} must be true or false, got {:?}",
                    ENV_VERIFY_CA, value
                ))
            })?;
        }
        Ok(config)
    }

    pub fn with_verify_ca(mut self, verify_ca: bool) -> Self {
        self.verify_ca = verify_ca;
        self
    }

    /// Set the request timeout in milliseconds
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn with_connect_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.connect_timeout_ms = timeout_ms;
        self
    }

    /// Add logging configuration
    pub fn with_logging_config(mut self, config: LoggingConfig) -> Self {
        self.logging_config = Some(config);
        self
    }

    /// Host with a trailing `/`, so relative API paths join under it
    pub fn normalized_host(&self) -> String {
        let host = self.host.trim();
        if host.ends_with('/') {
            host.to_string()
        } else {
            format!("{}/", host)
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("host", &self.host)
            .field("cert_path", &self.cert_path)
            .field("cert_password", &"<redacted>")
            .field("verify_ca", &self.verify_ca)
            .field("timeout_ms", &self.timeout_ms)
            .field("connect_timeout_ms", &self.connect_timeout_ms)
            .field("logging_config", &self.logging_config)
            .finish()
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
