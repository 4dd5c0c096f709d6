//! Client configuration: node address, call log location, pacing strategy
//! and failure-normalization behavior, with validation helpers so callers
//! can reject bad settings before any request is made.

use std::num::NonZeroU32;
use std::path::PathBuf;
use std::time::Duration;

use reqwest::Url;

use crate::error::CoreError;

pub const DEFAULT_LOG_FILE: &str = "./nrpc.log";
pub const DEFAULT_PACING_INCREMENT_MS: u64 = 2_000;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// How outbound calls are spaced out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacingStrategy {
    /// Dispatch immediately.
    None,
    /// Each in-flight call pushes the next one `increment` further out.
    FixedIncrement(Duration),
    /// Hard local quota of dispatches per second.
    PerSecond(NonZeroU32),
}

impl Default for PacingStrategy {
    fn default() -> Self {
        PacingStrategy::FixedIncrement(Duration::from_millis(DEFAULT_PACING_INCREMENT_MS))
    }
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub node_address: String,
    /// Append-only call log. `None` disables file logging.
    pub log_file: Option<PathBuf>,
    pub pacing: PacingStrategy,
    /// Map node-reported failures to structured errors. When off, any
    /// non-2xx reply is surfaced raw and 2xx bodies are returned as-is.
    pub error_normalization: bool,
    /// Include the request payload in each log line.
    pub log_payloads: bool,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl ClientConfig {
    pub fn new(node_address: impl Into<String>) -> Self {
        Self {
            node_address: node_address.into(),
            log_file: Some(PathBuf::from(DEFAULT_LOG_FILE)),
            pacing: PacingStrategy::default(),
            error_normalization: true,
            log_payloads: true,
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }

    pub fn with_pacing(mut self, pacing: PacingStrategy) -> Self {
        self.pacing = pacing;
        self
    }

    pub fn with_log_file(mut self, log_file: Option<PathBuf>) -> Self {
        self.log_file = log_file;
        self
    }

    pub fn with_error_normalization(mut self, enabled: bool) -> Self {
        self.error_normalization = enabled;
        self
    }

    pub fn with_log_payloads(mut self, enabled: bool) -> Self {
        self.log_payloads = enabled;
        self
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        parse_node_address(&self.node_address)?;
        if let PacingStrategy::FixedIncrement(increment) = self.pacing {
            if increment < Duration::from_millis(1) {
                return Err(CoreError::Config(
                    "pacing increment must be at least 1 ms".to_owned(),
                ));
            }
        }
        if self.connect_timeout.is_zero() {
            return Err(CoreError::Config(
                "connect_timeout must be greater than 0".to_owned(),
            ));
        }
        if self.request_timeout.is_zero() {
            return Err(CoreError::Config(
                "request_timeout must be greater than 0".to_owned(),
            ));
        }
        Ok(())
    }
}

/// Convert a requests-per-second knob into a pacing strategy.
pub fn per_second(limit: u32) -> Result<PacingStrategy, CoreError> {
    NonZeroU32::new(limit)
        .map(PacingStrategy::PerSecond)
        .ok_or_else(|| CoreError::Config("requests_per_second must be at least 1".to_owned()))
}

pub(crate) fn parse_node_address(address: &str) -> Result<Url, CoreError> {
    let parsed = Url::parse(address).map_err(|e| {
        CoreError::Config(format!(
            "invalid node address `{address}`: expected HTTP(S) URL ({e})"
        ))
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(CoreError::Config(format!(
            "unsupported node address scheme `{other}`; expected http or https"
        ))),
    }
}
