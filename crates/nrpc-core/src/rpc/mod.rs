//! Nano node RPC layer.
//!
//! Defines the [`NanoRpc`] trait and provides a governed HTTP
//! implementation ([`NodeClient`]) plus test mocks (`mock::MockRpc`,
//! `mock::MockTransport`).

pub mod actions;
mod client;
mod governor;
#[cfg(test)]
pub mod mock;
mod pacing;
mod transport;

pub use actions::{
    AccountHistoryOptions, AccountInfoOptions, AccountsPendingOptions, ActionPayload,
    BlockInfoOptions, BlocksInfoOptions, WorkGenerateOptions,
};
pub use client::NodeClient;
pub use governor::Governor;
pub use transport::{HttpTransport, NodeReply, NodeTransport};

use async_trait::async_trait;
use serde_json::Value;

use crate::error::CoreError;

/// The node actions this client exposes, one method per RPC action.
///
/// Responses are returned as the node's JSON document. Argument problems
/// are reported as [`CoreError::Validation`] before anything is sent.
#[async_trait]
pub trait NanoRpc: Send + Sync {
    async fn account_balance(&self, account: &str) -> Result<Value, CoreError>;

    async fn account_info(
        &self,
        account: &str,
        options: &AccountInfoOptions,
    ) -> Result<Value, CoreError>;

    async fn account_history(
        &self,
        account: &str,
        options: &AccountHistoryOptions,
    ) -> Result<Value, CoreError>;

    /// Pending block hashes for several accounts in one request. The
    /// node's `blocks` field is the empty string when nothing is pending.
    async fn accounts_pending(
        &self,
        accounts: &[String],
        options: &AccountsPendingOptions,
    ) -> Result<Value, CoreError>;

    async fn block_info(&self, hash: &str, options: &BlockInfoOptions) -> Result<Value, CoreError>;

    /// Details of several blocks; returns the node's `blocks` map keyed by
    /// hash.
    async fn blocks_info(
        &self,
        hashes: &[String],
        options: &BlocksInfoOptions,
    ) -> Result<Value, CoreError>;

    async fn work_generate(
        &self,
        hash: &str,
        options: &WorkGenerateOptions,
    ) -> Result<Value, CoreError>;

    async fn work_validate(
        &self,
        hash: &str,
        work: &str,
        difficulty: &str,
    ) -> Result<Value, CoreError>;

    /// Publish a JSON block.
    async fn process(&self, subtype: &str, block: &Value) -> Result<Value, CoreError>;
}
