//! Action payload builders.
//!
//! Each builder turns positional arguments and a typed options struct into
//! the JSON object the node expects. Options left as `None` are omitted
//! from the payload entirely; `Some(false)` or `Some(0)` are sent.

use serde_json::{Map, Value};

use crate::error::CoreError;

/// A JSON object carrying an `action` discriminator plus its parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionPayload {
    fields: Map<String, Value>,
}

impl ActionPayload {
    fn new(action: &str) -> Self {
        let mut fields = Map::new();
        fields.insert("action".to_owned(), Value::String(action.to_owned()));
        Self { fields }
    }

    fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(key.to_owned(), value.into());
        self
    }

    fn with_opt<T: Into<Value>>(self, key: &str, value: Option<T>) -> Self {
        match value {
            Some(value) => self.with(key, value),
            None => self,
        }
    }

    /// Accept a caller-built payload. It must be a JSON object with a
    /// string `action` field; nothing else is checked.
    pub fn from_value(value: Value) -> Result<Self, CoreError> {
        let Value::Object(fields) = value else {
            return Err(CoreError::Validation(
                "payload must be a JSON object".to_owned(),
            ));
        };
        match fields.get("action") {
            Some(Value::String(action)) if !action.is_empty() => Ok(Self { fields }),
            _ => Err(CoreError::Validation(
                "payload must carry a non-empty string `action` field".to_owned(),
            )),
        }
    }

    pub fn action(&self) -> &str {
        self.fields
            .get("action")
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.fields.clone())
    }
}

// ==============================================================================
// Options
// ==============================================================================

#[derive(Debug, Clone, Default)]
pub struct AccountInfoOptions {
    /// Include the receivable balance.
    pub receivable: Option<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct AccountHistoryOptions {
    /// Return raw block fields instead of the summarized history.
    pub raw: Option<bool>,
    /// Maximum number of history entries.
    pub count: Option<u64>,
}

#[derive(Debug, Clone, Default)]
pub struct AccountsPendingOptions {
    pub count: Option<u64>,
    /// Minimum amount in raw; amounts exceed `u64` so they travel as strings.
    pub threshold: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct BlockInfoOptions {
    /// Return `contents` as a JSON object instead of a string.
    pub json_block: Option<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct BlocksInfoOptions {
    pub json_block: Option<bool>,
    /// Include the sending account of receivable blocks.
    pub source: Option<bool>,
    /// Include whether each block is still pending.
    pub pending: Option<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct WorkGenerateOptions {
    /// Hex difficulty threshold; the node default applies when unset.
    pub difficulty: Option<String>,
}

// ==============================================================================
// Builders
// ==============================================================================

pub fn account_balance(account: &str) -> ActionPayload {
    ActionPayload::new("account_balance").with("account", account)
}

pub fn account_info(account: &str, options: &AccountInfoOptions) -> ActionPayload {
    ActionPayload::new("account_info")
        .with("account", account)
        .with_opt("receivable", options.receivable)
}

pub fn account_history(account: &str, options: &AccountHistoryOptions) -> ActionPayload {
    ActionPayload::new("account_history")
        .with("account", account)
        .with_opt("raw", options.raw)
        .with_opt("count", options.count)
}

pub fn accounts_pending(
    accounts: &[String],
    options: &AccountsPendingOptions,
) -> Result<ActionPayload, CoreError> {
    require_entries("accounts", accounts)?;
    Ok(ActionPayload::new("accounts_pending")
        .with("accounts", accounts.to_vec())
        .with_opt("count", options.count)
        .with_opt("threshold", options.threshold.clone()))
}

pub fn block_info(hash: &str, options: &BlockInfoOptions) -> ActionPayload {
    ActionPayload::new("block_info")
        .with("hash", hash)
        .with_opt("json_block", options.json_block)
}

pub fn blocks_info(
    hashes: &[String],
    options: &BlocksInfoOptions,
) -> Result<ActionPayload, CoreError> {
    require_entries("hashes", hashes)?;
    Ok(ActionPayload::new("blocks_info")
        .with("hashes", hashes.to_vec())
        .with_opt("json_block", options.json_block)
        .with_opt("source", options.source)
        .with_opt("pending", options.pending))
}

pub fn work_generate(hash: &str, options: &WorkGenerateOptions) -> ActionPayload {
    ActionPayload::new("work_generate")
        .with("hash", hash)
        .with_opt("difficulty", options.difficulty.clone())
}

pub fn work_validate(hash: &str, work: &str, difficulty: &str) -> ActionPayload {
    ActionPayload::new("work_validate")
        .with("hash", hash)
        .with("work", work)
        .with("difficulty", difficulty)
}

/// Submit a block given as JSON; `subtype` is `send`, `receive`, `open`,
/// `change` or `epoch`.
pub fn process(subtype: &str, block: &Value) -> ActionPayload {
    ActionPayload::new("process")
        .with("json_block", true)
        .with("subtype", subtype)
        .with("block", block.clone())
}

fn require_entries(field: &str, entries: &[String]) -> Result<(), CoreError> {
    if let Some(idx) = entries.iter().position(|entry| entry.trim().is_empty()) {
        return Err(CoreError::Validation(format!(
            "{field}[{idx}] must be a non-empty string"
        )));
    }
    Ok(())
}
