//! Append-only call log.
//!
//! Every completed RPC call (success or failure) produces one line of the
//! form `<timestamp>: [<payload>: ]<endpoint state | error>`. Sinks are
//! best effort from the caller's point of view: the governor reports an
//! append failure through `tracing` and carries on.

use std::path::PathBuf;

use async_trait::async_trait;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tokio::io::AsyncWriteExt;

use crate::error::CoreError;

#[async_trait]
pub trait LogSink: Send + Sync {
    async fn append_line(&self, line: &str) -> Result<(), CoreError>;
}

/// Appends lines to a file, creating it on first use.
pub struct FileLog {
    path: PathBuf,
}

impl FileLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl LogSink for FileLog {
    async fn append_line(&self, line: &str) -> Result<(), CoreError> {
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        let mut buf = String::with_capacity(line.len() + 1);
        buf.push_str(line);
        buf.push('\n');
        file.write_all(buf.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}

/// Discards every line.
pub struct NullLog;

#[async_trait]
impl LogSink for NullLog {
    async fn append_line(&self, _line: &str) -> Result<(), CoreError> {
        Ok(())
    }
}

/// Build one log line. `outcome` is the endpoint state JSON on success or
/// the error text on failure.
pub(crate) fn format_entry(payload: Option<&serde_json::Value>, outcome: &str) -> String {
    let timestamp = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| OffsetDateTime::now_utc().unix_timestamp().to_string());
    match payload {
        Some(payload) => format!("{timestamp}: {payload}: {outcome}"),
        None => format!("{timestamp}: {outcome}"),
    }
}
