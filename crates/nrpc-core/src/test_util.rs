//! Shared test helpers for `nrpc-core` unit tests.

use serde_json::{json, Value};

use crate::types::ReceivableBlock;

pub fn accounts(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| (*name).to_owned()).collect()
}

/// A `blocks_info` record (with `json_block`, `source`, `pending`) for a
/// send whose receiving account is `receiver`. The node reports
/// `local_timestamp` as a decimal string.
pub fn block_info(receiver: &str, local_timestamp: u64) -> Value {
    json!({
        "block_account": "nano_3sender",
        "amount": "1000000000000000000000000",
        "balance": "5606157000000000000000000000000000000",
        "height": "58",
        "local_timestamp": local_timestamp.to_string(),
        "confirmed": "true",
        "contents": {
            "type": "state",
            "account": "nano_3sender",
            "previous": "CE898C131AAEE25E05362F247760F8A3ACF34A9796A5AE0D9204E86B0637965E",
            "representative": "nano_1stofnrxuz3cai7ze75o174bpm7scwj9jn3nxsn8ntzg784jf1gzn1jjdkou",
            "balance": "5606157000000000000000000000000000000",
            "link": "5D1AA8A45F8736519D707FCB375976A7F9AF795091021D7E9C7548D6F45DD8D5",
            "link_as_account": receiver,
            "signature": "82D41BC16F313E4B2243D14DFFA2FB04679C540C2095FEE7EAE0F2F26880AD56DD48D87A7CC5DD760C5B2D76EE2C205506AA557BF00B60D8DEE312EC7343A501",
            "work": "8a142e07a10996d5"
        },
        "subtype": "send",
        "pending": "1",
        "source_account": "0"
    })
}

pub fn timestamps(blocks: &[ReceivableBlock]) -> Vec<u64> {
    blocks
        .iter()
        .map(|block| block.local_timestamp().unwrap_or_default())
        .collect()
}
