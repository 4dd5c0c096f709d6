use std::collections::HashMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ==============================================================================
// Endpoint State
// ==============================================================================

/// Rate-limit telemetry reported by the node with each successful reply.
///
/// Serialized with the node's field names so log lines read the same as
/// the envelope they were taken from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointState {
    pub address: String,
    pub requests_limit: Option<u64>,
    pub requests_remaining: Option<u64>,
    pub request_limit_reset: Option<u64>,
}

impl EndpointState {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            ..Self::default()
        }
    }

    /// True once any successful call has reported limit fields.
    pub fn has_limits(&self) -> bool {
        self.requests_limit.is_some()
            || self.requests_remaining.is_some()
            || self.request_limit_reset.is_some()
    }
}

// ==============================================================================
// Receivable Blocks
// ==============================================================================

/// One pending block as returned by `blocks_info`, tagged with its hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceivableBlock {
    pub block_hash: String,
    #[serde(flatten)]
    pub info: serde_json::Map<String, serde_json::Value>,
}

impl ReceivableBlock {
    pub fn new(block_hash: impl Into<String>, info: serde_json::Map<String, serde_json::Value>) -> Self {
        Self {
            block_hash: block_hash.into(),
            info,
        }
    }

    /// `local_timestamp` as seconds; the node sends it as a decimal string.
    pub fn local_timestamp(&self) -> Option<u64> {
        match self.info.get("local_timestamp")? {
            serde_json::Value::Number(n) => n.as_u64(),
            serde_json::Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// The account that can receive this block (`contents.link_as_account`).
    pub fn receiving_account(&self) -> Option<&str> {
        self.info
            .get("contents")?
            .get("link_as_account")?
            .as_str()
    }
}

/// Pending blocks keyed by receiving account.
pub type ReceivableBlocks = HashMap<String, Vec<ReceivableBlock>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Oldest first.
    Ascending,
    /// Newest first.
    Descending,
}

impl FromStr for SortOrder {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ascending" => Ok(SortOrder::Ascending),
            "descending" => Ok(SortOrder::Descending),
            other => Err(CoreError::Validation(format!(
                "unknown sort order `{other}`; expected ascending or descending"
            ))),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReceivableOptions {
    pub sort: Option<SortOrder>,
}
