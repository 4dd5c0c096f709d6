use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tracing::{debug, trace, warn};

use crate::config::ClientConfig;
use crate::error::{ApplicationError, CoreError};
use crate::log::{format_entry, FileLog, LogSink, NullLog};
use crate::types::EndpointState;

use super::actions::ActionPayload;
use super::pacing::Pacer;
use super::transport::{HttpTransport, NodeReply, NodeTransport};

// ==============================================================================
// Governor: paced, logged single-call primitive
// ==============================================================================

/// Owns the node address, the last reported rate-limit state, the pacing
/// strategy and the call log. Every RPC goes through [`Governor::submit`].
///
/// Share one instance (behind `Arc`) between all callers talking to the
/// same node; concurrent calls update the endpoint state in completion
/// order, last writer wins.
pub struct Governor {
    transport: Arc<dyn NodeTransport>,
    address: String,
    state: RwLock<EndpointState>,
    pacer: Pacer,
    log: Arc<dyn LogSink>,
    error_normalization: bool,
    log_payloads: bool,
    next_id: AtomicU64,
}

impl Governor {
    /// Build a governor with the HTTP transport and the configured file log.
    pub fn new(config: &ClientConfig) -> Result<Self, CoreError> {
        let transport = Arc::new(HttpTransport::from_config(config)?);
        let log: Arc<dyn LogSink> = match &config.log_file {
            Some(path) => Arc::new(FileLog::new(path)),
            None => Arc::new(NullLog),
        };
        Self::with_parts(config, transport, log)
    }

    pub fn with_parts(
        config: &ClientConfig,
        transport: Arc<dyn NodeTransport>,
        log: Arc<dyn LogSink>,
    ) -> Result<Self, CoreError> {
        config.validate()?;

        Ok(Self {
            transport,
            address: config.node_address.clone(),
            state: RwLock::new(EndpointState::new(&config.node_address)),
            pacer: Pacer::new(config.pacing),
            log,
            error_normalization: config.error_normalization,
            log_payloads: config.log_payloads,
            next_id: AtomicU64::new(1),
        })
    }

    /// Snapshot of the endpoint state from the latest successful call.
    pub async fn state(&self) -> EndpointState {
        self.state.read().await.clone()
    }

    /// Delay the next enqueued call would add on top of its own increment.
    pub fn pacing_delay(&self) -> Duration {
        self.pacer.pending_delay()
    }

    /// Unix milliseconds of the most recent paced enqueue, if pacing by
    /// fixed increment.
    pub fn last_called_ms(&self) -> Option<u64> {
        self.pacer.last_called_ms()
    }

    /// Submit a caller-built JSON payload.
    pub async fn submit_value(
        &self,
        payload: serde_json::Value,
    ) -> Result<serde_json::Value, CoreError> {
        let payload = ActionPayload::from_value(payload)?;
        self.submit(&payload).await
    }

    /// Send one action to the node and return the decoded response body.
    pub async fn submit(&self, payload: &ActionPayload) -> Result<serde_json::Value, CoreError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let action = payload.action();
        let body = payload.to_value();

        let slot = self.pacer.admit().await;
        debug!(rpc.id = id, rpc.action = action, "rpc call");
        let sent = self.transport.post_json(&self.address, &body).await;
        drop(slot);

        let outcome = match sent {
            Ok(reply) => {
                debug!(
                    rpc.id = id,
                    rpc.action = action,
                    status = reply.status,
                    body_len = reply.body.len(),
                    "rpc response"
                );
                trace!(rpc.id = id, rpc.action = action, body = %reply.body, "rpc response body");
                self.interpret(reply)
            }
            Err(err) => {
                debug!(rpc.id = id, rpc.action = action, error = %err, "rpc transport failure");
                Err(CoreError::Transport(err))
            }
        };

        match outcome {
            Ok(response) => {
                let snapshot = EndpointState {
                    address: self.address.clone(),
                    requests_limit: parse_limit(response.get("requestsLimit")),
                    requests_remaining: parse_limit(response.get("requestsRemaining")),
                    request_limit_reset: parse_limit(response.get("requestLimitReset")),
                };
                let state_json = serde_json::to_string(&snapshot).unwrap_or_default();
                *self.state.write().await = snapshot;
                self.record(&body, &state_json).await;
                Ok(response)
            }
            Err(err) => {
                self.record(&body, &failure_text(&err)).await;
                Err(err)
            }
        }
    }

    fn interpret(&self, reply: NodeReply) -> Result<serde_json::Value, CoreError> {
        let decoded = serde_json::from_str::<serde_json::Value>(&reply.body).ok();

        if !reply.is_success() {
            let err = match decoded {
                Some(body) if self.error_normalization => ApplicationError::Structured(body),
                _ => ApplicationError::Raw {
                    status: reply.status,
                    body: reply.body,
                },
            };
            return Err(err.into());
        }

        let Some(body) = decoded else {
            return Err(ApplicationError::Raw {
                status: reply.status,
                body: reply.body,
            }
            .into());
        };

        // The node reports most failures as 200 with an `error` field.
        if self.error_normalization && body.get("error").is_some() {
            return Err(ApplicationError::Structured(body).into());
        }

        Ok(body)
    }

    async fn record(&self, payload: &serde_json::Value, outcome: &str) {
        let payload = self.log_payloads.then_some(payload);
        let line = format_entry(payload, outcome);
        if let Err(err) = self.log.append_line(&line).await {
            warn!(error = %err, "failed to append rpc call log entry");
        }
    }
}

fn failure_text(err: &CoreError) -> String {
    match err {
        CoreError::Application(ApplicationError::Structured(body)) => body.to_string(),
        other => other.to_string(),
    }
}

/// Limit fields arrive as numbers or decimal strings; anything else is
/// treated as unset.
fn parse_limit(value: Option<&serde_json::Value>) -> Option<u64> {
    match value? {
        serde_json::Value::Number(n) => n.as_u64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
