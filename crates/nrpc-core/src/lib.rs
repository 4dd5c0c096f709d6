pub mod config;
pub mod error;
pub mod log;
pub mod receivable;
pub mod rpc;
#[cfg(test)]
pub(crate) mod test_util;
pub mod types;

pub use config::{ClientConfig, PacingStrategy};
pub use error::{ApplicationError, CoreError, ErrorKind};
pub use rpc::{NanoRpc, NodeClient};
pub use types::{EndpointState, ReceivableBlock, ReceivableBlocks, ReceivableOptions, SortOrder};
