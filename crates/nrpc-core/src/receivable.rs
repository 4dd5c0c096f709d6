use std::collections::HashMap;

use serde_json::Value;
use tracing::debug;

use crate::error::{ApplicationError, CoreError};
use crate::rpc::{AccountsPendingOptions, BlocksInfoOptions, NanoRpc};
use crate::types::{ReceivableBlock, ReceivableBlocks, ReceivableOptions, SortOrder};

// ==============================================================================
// Receivable Blocks Aggregation
// ==============================================================================

/// Collect every pending block for `accounts`, with full block details.
///
/// Issues one `accounts_pending` call for the whole account set, then one
/// `blocks_info` call for all returned hashes. Each block lands under the
/// account that can receive it (`contents.link_as_account`) and carries its
/// hash as `block_hash`. Every requested account is a key of the result,
/// even with nothing pending.
///
/// Errors from either call are returned unchanged; there is no partial
/// result.
pub async fn receivable_blocks_info(
    rpc: &dyn NanoRpc,
    accounts: &[String],
    options: &ReceivableOptions,
) -> Result<ReceivableBlocks, CoreError> {
    let mut result: ReceivableBlocks = accounts
        .iter()
        .map(|account| (account.clone(), Vec::new()))
        .collect();

    let pending = rpc
        .accounts_pending(accounts, &AccountsPendingOptions::default())
        .await?;
    let Some(owners) = pending_hashes(&pending, accounts)? else {
        debug!(accounts = accounts.len(), "no pending blocks");
        return Ok(result);
    };
    if owners.is_empty() {
        return Ok(result);
    }

    let hashes: Vec<String> = owners.iter().map(|(hash, _)| hash.clone()).collect();
    let owner_of: HashMap<&str, &str> = owners
        .iter()
        .map(|(hash, owner)| (hash.as_str(), owner.as_str()))
        .collect();
    debug!(
        accounts = accounts.len(),
        hashes = hashes.len(),
        "fetching pending block details"
    );

    let blocks = rpc
        .blocks_info(
            &hashes,
            &BlocksInfoOptions {
                json_block: Some(true),
                source: Some(true),
                pending: Some(true),
            },
        )
        .await?;
    let Value::Object(blocks) = blocks else {
        return Err(ApplicationError::Unexpected(format!(
            "blocks_info returned a non-object blocks map: {blocks}"
        ))
        .into());
    };

    for (hash, info) in blocks {
        let Value::Object(info) = info else {
            return Err(ApplicationError::Unexpected(format!(
                "block {hash} has a non-object info record"
            ))
            .into());
        };
        let block = ReceivableBlock::new(hash, info);

        let receiver = block
            .receiving_account()
            .filter(|account| result.contains_key(*account))
            .or_else(|| owner_of.get(block.block_hash.as_str()).copied())
            .map(str::to_owned);
        let Some(account) = receiver else {
            return Err(ApplicationError::Unexpected(format!(
                "blocks_info returned block {} that no requested account can receive",
                block.block_hash
            ))
            .into());
        };
        result.entry(account).or_default().push(block);
    }

    if let Some(order) = options.sort {
        for blocks in result.values_mut() {
            sort_by_local_timestamp(blocks, order);
        }
    }

    Ok(result)
}

/// Flatten the `accounts_pending` response into `(hash, owner)` pairs in
/// account order, then per-account order. `None` means the node reported
/// nothing pending (its `blocks` field is the empty string).
fn pending_hashes(
    pending: &Value,
    accounts: &[String],
) -> Result<Option<Vec<(String, String)>>, CoreError> {
    let blocks = match pending.get("blocks") {
        Some(Value::String(s)) if s.is_empty() => return Ok(None),
        Some(Value::Object(blocks)) => blocks,
        Some(other) => {
            return Err(ApplicationError::Unexpected(format!(
                "accounts_pending returned unexpected blocks value: {other}"
            ))
            .into())
        }
        None => {
            return Err(ApplicationError::Unexpected(
                "accounts_pending response has no `blocks` field".into(),
            )
            .into())
        }
    };

    let mut owners = Vec::new();
    for account in accounts {
        match blocks.get(account) {
            // Plain form: a list of hashes.
            Some(Value::Array(hashes)) => owners.extend(
                hashes
                    .iter()
                    .filter_map(Value::as_str)
                    .map(|hash| (hash.to_owned(), account.clone())),
            ),
            // Threshold/source form: an object keyed by hash.
            Some(Value::Object(by_hash)) => owners.extend(
                by_hash
                    .keys()
                    .map(|hash| (hash.clone(), account.clone())),
            ),
            _ => {}
        }
    }
    Ok(Some(owners))
}

/// Stable sort; blocks without a readable timestamp sort as oldest.
fn sort_by_local_timestamp(blocks: &mut [ReceivableBlock], order: SortOrder) {
    match order {
        SortOrder::Ascending => blocks.sort_by_key(|block| block.local_timestamp().unwrap_or(0)),
        SortOrder::Descending => blocks.sort_by(|a, b| {
            b.local_timestamp()
                .unwrap_or(0)
                .cmp(&a.local_timestamp().unwrap_or(0))
        }),
    }
}
