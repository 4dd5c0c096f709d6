use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tokio::time::Instant;

use crate::error::{ApplicationError, CoreError, TransportError};

use super::actions::{
    AccountHistoryOptions, AccountInfoOptions, AccountsPendingOptions, BlockInfoOptions,
    BlocksInfoOptions, WorkGenerateOptions,
};
use super::transport::{NodeReply, NodeTransport};
use super::NanoRpc;

// ==============================================================================
// MockTransport: scripted HTTP replies for governor tests
// ==============================================================================

enum Scripted {
    Reply(NodeReply),
    Fail(String),
}

/// Returns scripted replies in order, one per request, and records every
/// body it was sent along with the (tokio) instant it arrived.
pub struct MockTransport {
    script: Mutex<VecDeque<Scripted>>,
    latency: Duration,
    sent: Mutex<Vec<(Instant, Value)>>,
}

impl MockTransport {
    pub fn builder() -> MockTransportBuilder {
        MockTransportBuilder {
            script: VecDeque::new(),
            latency: Duration::ZERO,
        }
    }

    pub fn requests(&self) -> Vec<Value> {
        self.sent
            .lock()
            .expect("mock transport poisoned")
            .iter()
            .map(|(_, body)| body.clone())
            .collect()
    }

    pub fn dispatch_times(&self) -> Vec<Instant> {
        self.sent
            .lock()
            .expect("mock transport poisoned")
            .iter()
            .map(|(at, _)| *at)
            .collect()
    }
}

pub struct MockTransportBuilder {
    script: VecDeque<Scripted>,
    latency: Duration,
}

impl MockTransportBuilder {
    pub fn reply(mut self, status: u16, body: Value) -> Self {
        self.script.push_back(Scripted::Reply(NodeReply {
            status,
            body: body.to_string(),
        }));
        self
    }

    pub fn reply_text(mut self, status: u16, body: &str) -> Self {
        self.script.push_back(Scripted::Reply(NodeReply {
            status,
            body: body.to_owned(),
        }));
        self
    }

    pub fn fail(mut self, message: &str) -> Self {
        self.script.push_back(Scripted::Fail(message.to_owned()));
        self
    }

    pub fn latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn build(self) -> MockTransport {
        MockTransport {
            script: Mutex::new(self.script),
            latency: self.latency,
            sent: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl NodeTransport for MockTransport {
    async fn post_json(&self, _url: &str, body: &Value) -> Result<NodeReply, TransportError> {
        self.sent
            .lock()
            .expect("mock transport poisoned")
            .push((Instant::now(), body.clone()));
        let next = self
            .script
            .lock()
            .expect("mock transport poisoned")
            .pop_front();
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        match next {
            Some(Scripted::Reply(reply)) => Ok(reply),
            Some(Scripted::Fail(message)) => Err(message.into()),
            None => Err("mock transport has no scripted reply left".into()),
        }
    }
}

// ==============================================================================
// MockRpc: canned per-action responses for composer tests
// ==============================================================================

/// A mock node backend. `accounts_pending` and `blocks_info` return the
/// configured bodies; every call is recorded as `(action, argument list)`.
pub struct MockRpc {
    pending: Value,
    blocks: Value,
    fail_action: Option<&'static str>,
    calls: Mutex<Vec<(String, Vec<String>)>>,
}

impl MockRpc {
    pub fn builder() -> MockRpcBuilder {
        MockRpcBuilder {
            pending: serde_json::json!({"blocks": ""}),
            blocks: serde_json::json!({}),
            fail_action: None,
        }
    }

    pub fn calls(&self) -> Vec<(String, Vec<String>)> {
        self.calls.lock().expect("mock rpc poisoned").clone()
    }

    fn record(&self, action: &'static str, args: Vec<String>) -> Result<(), CoreError> {
        self.calls
            .lock()
            .expect("mock rpc poisoned")
            .push((action.to_owned(), args));
        if self.fail_action == Some(action) {
            return Err(ApplicationError::Structured(serde_json::json!({
                "error": format!("{action} failed")
            }))
            .into());
        }
        Ok(())
    }
}

pub struct MockRpcBuilder {
    pending: Value,
    blocks: Value,
    fail_action: Option<&'static str>,
}

impl MockRpcBuilder {
    /// Body returned by `accounts_pending`.
    pub fn with_pending(mut self, pending: Value) -> Self {
        self.pending = pending;
        self
    }

    /// The `blocks` map returned by `blocks_info`.
    pub fn with_blocks(mut self, blocks: Value) -> Self {
        self.blocks = blocks;
        self
    }

    pub fn failing_on(mut self, action: &'static str) -> Self {
        self.fail_action = Some(action);
        self
    }

    pub fn build(self) -> MockRpc {
        MockRpc {
            pending: self.pending,
            blocks: self.blocks,
            fail_action: self.fail_action,
            calls: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl NanoRpc for MockRpc {
    async fn account_balance(&self, account: &str) -> Result<Value, CoreError> {
        self.record("account_balance", vec![account.to_owned()])?;
        Ok(serde_json::json!({"balance": "0", "pending": "0"}))
    }

    async fn account_info(
        &self,
        account: &str,
        _options: &AccountInfoOptions,
    ) -> Result<Value, CoreError> {
        self.record("account_info", vec![account.to_owned()])?;
        Ok(serde_json::json!({}))
    }

    async fn account_history(
        &self,
        account: &str,
        _options: &AccountHistoryOptions,
    ) -> Result<Value, CoreError> {
        self.record("account_history", vec![account.to_owned()])?;
        Ok(serde_json::json!({"history": []}))
    }

    async fn accounts_pending(
        &self,
        accounts: &[String],
        _options: &AccountsPendingOptions,
    ) -> Result<Value, CoreError> {
        self.record("accounts_pending", accounts.to_vec())?;
        Ok(self.pending.clone())
    }

    async fn block_info(&self, hash: &str, _options: &BlockInfoOptions) -> Result<Value, CoreError> {
        self.record("block_info", vec![hash.to_owned()])?;
        Ok(serde_json::json!({}))
    }

    async fn blocks_info(
        &self,
        hashes: &[String],
        _options: &BlocksInfoOptions,
    ) -> Result<Value, CoreError> {
        self.record("blocks_info", hashes.to_vec())?;
        Ok(self.blocks.clone())
    }

    async fn work_generate(
        &self,
        hash: &str,
        _options: &WorkGenerateOptions,
    ) -> Result<Value, CoreError> {
        self.record("work_generate", vec![hash.to_owned()])?;
        Ok(serde_json::json!({"work": "0000000000000000"}))
    }

    async fn work_validate(
        &self,
        hash: &str,
        work: &str,
        difficulty: &str,
    ) -> Result<Value, CoreError> {
        self.record(
            "work_validate",
            vec![hash.to_owned(), work.to_owned(), difficulty.to_owned()],
        )?;
        Ok(serde_json::json!({"valid_all": "1"}))
    }

    async fn process(&self, subtype: &str, _block: &Value) -> Result<Value, CoreError> {
        self.record("process", vec![subtype.to_owned()])?;
        Ok(serde_json::json!({"hash": "00"}))
    }
}
