// ABOUTME: Immutable session configuration with builder-style constructors per bind role
// ABOUTME: Supports parsing the recognized smsc.server.* / smpp.session.* option keys

use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

/// Role requested during the bind handshake
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindMode {
    /// Can send submit requests
    Transmitter,
    /// Can receive mobile-originated deliveries
    Receiver,
    /// Both transmitter and receiver capabilities
    Transceiver,
}

/// Error raised when parsing configuration options
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required option key is absent
    #[error("Missing required option: {0}")]
    MissingOption(&'static str),

    /// An option value could not be parsed
    #[error("Invalid value for {key}: {value}")]
    InvalidOption { key: &'static str, value: String },
}

/// Immutable configuration for one SMPP session
///
/// Created once at startup and never mutated after
/// [`crate::session::SessionManager::initialize`]. Timeouts not exposed to
/// the host (connect, request expiry) default to the values the SMSC
/// integration has always used.
///
/// # Example
///
/// ```rust
/// use smpp_session::{BindMode, SessionConfig};
/// use std::time::Duration;
///
/// let config = SessionConfig::transceiver("10.5.210.201", 5815, "ZenithFree", "ztpass")
///     .with_keep_alive_interval(Duration::from_secs(30))
///     .with_delivery_receipts();
///
/// assert_eq!(config.bind_mode, BindMode::Transceiver);
/// assert_eq!(config.window_size, 1);
/// ```
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// SMSC hostname or IP address
    pub host: String,
    /// SMSC port
    pub port: u16,
    /// System identifier for authentication
    pub system_id: String,
    /// Password for authentication
    pub password: String,
    /// Role requested during bind
    pub bind_mode: BindMode,
    /// Maximum outstanding requests on the wire
    pub window_size: usize,
    /// TCP connect timeout
    pub connect_timeout: Duration,
    /// How long the engine keeps an unanswered request before expiring it
    pub request_expiry_timeout: Duration,
    /// Interval between liveness probes
    pub keep_alive_interval: Duration,
    /// Request an SMSC delivery receipt for every submitted message
    pub request_delivery_receipt: bool,
}

const DEFAULT_WINDOW_SIZE: usize = 1;
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_REQUEST_EXPIRY_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_KEEP_ALIVE_INTERVAL: Duration = Duration::from_secs(30);

impl SessionConfig {
    fn new(
        host: impl Into<String>,
        port: u16,
        system_id: impl Into<String>,
        password: impl Into<String>,
        bind_mode: BindMode,
    ) -> Self {
        Self {
            host: host.into(),
            port,
            system_id: system_id.into(),
            password: password.into(),
            bind_mode,
            window_size: DEFAULT_WINDOW_SIZE,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            request_expiry_timeout: DEFAULT_REQUEST_EXPIRY_TIMEOUT,
            keep_alive_interval: DEFAULT_KEEP_ALIVE_INTERVAL,
            request_delivery_receipt: false,
        }
    }

    /// Configuration for a transmitter session
    pub fn transmitter(
        host: impl Into<String>,
        port: u16,
        system_id: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self::new(host, port, system_id, password, BindMode::Transmitter)
    }

    /// Configuration for a receiver session
    pub fn receiver(
        host: impl Into<String>,
        port: u16,
        system_id: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self::new(host, port, system_id, password, BindMode::Receiver)
    }

    /// Configuration for a transceiver session
    pub fn transceiver(
        host: impl Into<String>,
        port: u16,
        system_id: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self::new(host, port, system_id, password, BindMode::Transceiver)
    }

    /// Set the request window size
    pub fn with_window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size;
        self
    }

    /// Set the TCP connect timeout
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the request expiry timeout
    pub fn with_request_expiry_timeout(mut self, timeout: Duration) -> Self {
        self.request_expiry_timeout = timeout;
        self
    }

    /// Set the interval between liveness probes
    pub fn with_keep_alive_interval(mut self, interval: Duration) -> Self {
        self.keep_alive_interval = interval;
        self
    }

    /// Request SMSC delivery receipts for submitted messages
    pub fn with_delivery_receipts(mut self) -> Self {
        self.request_delivery_receipt = true;
        self
    }

    /// Build a transceiver configuration from string options
    ///
    /// Recognized keys:
    ///
    /// * `smsc.server.host` (required)
    /// * `smsc.server.port` (required)
    /// * `smsc.server.systemid` (required)
    /// * `smsc.server.password` (required)
    /// * `smsc.server.requestdeliveryreceipt` (optional bool, default false)
    /// * `smpp.session.enquirelink.interval` (optional milliseconds, default 30000)
    pub fn from_options(options: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let host = required(options, "smsc.server.host")?;
        let port = parse(options, "smsc.server.port")?
            .ok_or(ConfigError::MissingOption("smsc.server.port"))?;
        let system_id = required(options, "smsc.server.systemid")?;
        let password = required(options, "smsc.server.password")?;

        let mut config = Self::transceiver(host, port, system_id, password);

        if let Some(receipts) = parse(options, "smsc.server.requestdeliveryreceipt")? {
            config.request_delivery_receipt = receipts;
        }
        if let Some(millis) = parse::<u64>(options, "smpp.session.enquirelink.interval")? {
            config.keep_alive_interval = Duration::from_millis(millis);
        }

        Ok(config)
    }
}

fn required(options: &HashMap<String, String>, key: &'static str) -> Result<String, ConfigError> {
    options
        .get(key)
        .cloned()
        .ok_or(ConfigError::MissingOption(key))
}

fn parse<T: std::str::FromStr>(
    options: &HashMap<String, String>,
    key: &'static str,
) -> Result<Option<T>, ConfigError> {
    match options.get(key) {
        None => Ok(None),
        Some(value) => value.parse().map(Some).map_err(|_| ConfigError::InvalidOption {
            key,
            value: value.clone(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_options() -> HashMap<String, String> {
        let mut options = HashMap::new();
        options.insert("smsc.server.host".to_string(), "10.5.210.201".to_string());
        options.insert("smsc.server.port".to_string(), "5815".to_string());
        options.insert("smsc.server.systemid".to_string(), "ZenithFree".to_string());
        options.insert("smsc.server.password".to_string(), "ztpass".to_string());
        options
    }

    #[test]
    fn test_defaults() {
        let config = SessionConfig::transceiver("localhost", 2775, "id", "pass");
        assert_eq!(config.window_size, 1);
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert_eq!(config.request_expiry_timeout, Duration::from_secs(30));
        assert_eq!(config.keep_alive_interval, Duration::from_secs(30));
        assert!(!config.request_delivery_receipt);
    }

    #[test]
    fn test_from_options_defaults() {
        let config = SessionConfig::from_options(&base_options()).unwrap();
        assert_eq!(config.host, "10.5.210.201");
        assert_eq!(config.port, 5815);
        assert_eq!(config.bind_mode, BindMode::Transceiver);
        assert_eq!(config.keep_alive_interval, Duration::from_secs(30));
        assert!(!config.request_delivery_receipt);
    }

    #[test]
    fn test_from_options_optional_keys() {
        let mut options = base_options();
        options.insert(
            "smsc.server.requestdeliveryreceipt".to_string(),
            "true".to_string(),
        );
        options.insert(
            "smpp.session.enquirelink.interval".to_string(),
            "60000".to_string(),
        );

        let config = SessionConfig::from_options(&options).unwrap();
        assert!(config.request_delivery_receipt);
        assert_eq!(config.keep_alive_interval, Duration::from_secs(60));
    }

    #[test]
    fn test_from_options_missing_key() {
        let mut options = base_options();
        options.remove("smsc.server.password");

        let err = SessionConfig::from_options(&options).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingOption("smsc.server.password")
        ));
    }

    #[test]
    fn test_from_options_invalid_port() {
        let mut options = base_options();
        options.insert("smsc.server.port".to_string(), "not-a-port".to_string());

        let err = SessionConfig::from_options(&options).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidOption {
                key: "smsc.server.port",
                ..
            }
        ));
    }
}
