use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::{ApplicationError, CoreError};
use crate::receivable::receivable_blocks_info;
use crate::types::{EndpointState, ReceivableBlocks, ReceivableOptions};

use super::actions::{
    self, AccountHistoryOptions, AccountInfoOptions, AccountsPendingOptions, BlockInfoOptions,
    BlocksInfoOptions, WorkGenerateOptions,
};
use super::governor::Governor;
use super::NanoRpc;

/// Nano node client. Cheap to clone; clones share one [`Governor`], so
/// pacing and endpoint state are per node, not per handle.
#[derive(Clone)]
pub struct NodeClient {
    governor: Arc<Governor>,
}

impl NodeClient {
    pub fn new(config: &ClientConfig) -> Result<Self, CoreError> {
        Ok(Self::from_governor(Arc::new(Governor::new(config)?)))
    }

    pub fn from_governor(governor: Arc<Governor>) -> Self {
        Self { governor }
    }

    pub async fn state(&self) -> EndpointState {
        self.governor.state().await
    }

    /// Send a caller-built payload (any action) through the governor.
    pub async fn submit_raw(&self, payload: Value) -> Result<Value, CoreError> {
        self.governor.submit_value(payload).await
    }

    /// All pending blocks for `accounts`, with full block details.
    pub async fn receivable_blocks_info(
        &self,
        accounts: &[String],
        options: &ReceivableOptions,
    ) -> Result<ReceivableBlocks, CoreError> {
        receivable_blocks_info(self, accounts, options).await
    }
}

#[async_trait]
impl NanoRpc for NodeClient {
    async fn account_balance(&self, account: &str) -> Result<Value, CoreError> {
        self.governor
            .submit(&actions::account_balance(account))
            .await
    }

    async fn account_info(
        &self,
        account: &str,
        options: &AccountInfoOptions,
    ) -> Result<Value, CoreError> {
        self.governor
            .submit(&actions::account_info(account, options))
            .await
    }

    async fn account_history(
        &self,
        account: &str,
        options: &AccountHistoryOptions,
    ) -> Result<Value, CoreError> {
        self.governor
            .submit(&actions::account_history(account, options))
            .await
    }

    async fn accounts_pending(
        &self,
        accounts: &[String],
        options: &AccountsPendingOptions,
    ) -> Result<Value, CoreError> {
        let payload = actions::accounts_pending(accounts, options)?;
        self.governor.submit(&payload).await
    }

    async fn block_info(&self, hash: &str, options: &BlockInfoOptions) -> Result<Value, CoreError> {
        self.governor
            .submit(&actions::block_info(hash, options))
            .await
    }

    async fn blocks_info(
        &self,
        hashes: &[String],
        options: &BlocksInfoOptions,
    ) -> Result<Value, CoreError> {
        let payload = actions::blocks_info(hashes, options)?;
        let response = self.governor.submit(&payload).await?;
        match response {
            Value::Object(mut fields) => fields.remove("blocks").ok_or_else(|| {
                CoreError::from(ApplicationError::Unexpected(
                    "blocks_info response has no `blocks` field".into(),
                ))
            }),
            other => Err(ApplicationError::Unexpected(format!(
                "blocks_info response is not an object: {other}"
            ))
            .into()),
        }
    }

    async fn work_generate(
        &self,
        hash: &str,
        options: &WorkGenerateOptions,
    ) -> Result<Value, CoreError> {
        self.governor
            .submit(&actions::work_generate(hash, options))
            .await
    }

    async fn work_validate(
        &self,
        hash: &str,
        work: &str,
        difficulty: &str,
    ) -> Result<Value, CoreError> {
        self.governor
            .submit(&actions::work_validate(hash, work, difficulty))
            .await
    }

    async fn process(&self, subtype: &str, block: &Value) -> Result<Value, CoreError> {
        self.governor
            .submit(&actions::process(subtype, block))
            .await
    }
}
