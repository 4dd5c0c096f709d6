use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Nano node RPC client with request pacing and an append-only call log.
#[derive(Parser)]
#[command(version, about)]
pub struct Cli {
    /// Node RPC URL.
    #[arg(long, default_value = "http://127.0.0.1:7076", env = "NRPC_NODE_URL")]
    pub node_url: String,

    /// Append-only call log.
    #[arg(long, default_value = "./nrpc.log", env = "NRPC_LOG_FILE")]
    pub log_file: PathBuf,

    /// Do not write the call log. Wins over `--log-file`.
    #[arg(long)]
    pub no_log_file: bool,

    /// Milliseconds each in-flight call pushes the next one back.
    #[arg(long, default_value = "2000", env = "NRPC_PACING_INCREMENT_MS")]
    pub pacing_increment_ms: u64,

    /// Dispatch calls immediately. Wins over the other pacing settings.
    #[arg(long)]
    pub no_pacing: bool,

    /// Hard local quota instead of the incremental stagger.
    #[arg(long, env = "NRPC_REQUESTS_PER_SECOND")]
    pub requests_per_second: Option<u32>,

    /// Report node failures as raw replies instead of structured errors.
    #[arg(long)]
    pub raw_errors: bool,

    /// Leave request payloads out of the call log.
    #[arg(long)]
    pub no_log_payloads: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Balance and pending amount of an account.
    AccountBalance { account: String },

    /// Frontier, balance and block count of an account.
    AccountInfo {
        account: String,
        #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
        receivable: Option<bool>,
    },

    /// Recent history of an account.
    AccountHistory {
        account: String,
        #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
        raw: Option<bool>,
        #[arg(long)]
        count: Option<u64>,
    },

    /// Pending block hashes for several accounts.
    AccountsPending {
        #[arg(required = true)]
        accounts: Vec<String>,
        #[arg(long)]
        count: Option<u64>,
        /// Minimum amount in raw.
        #[arg(long)]
        threshold: Option<String>,
    },

    /// Details of one block.
    BlockInfo {
        hash: String,
        #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
        json_block: Option<bool>,
    },

    /// Details of several blocks.
    BlocksInfo {
        #[arg(required = true)]
        hashes: Vec<String>,
        #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
        json_block: Option<bool>,
        #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
        source: Option<bool>,
        #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
        pending: Option<bool>,
    },

    /// All pending blocks for the given accounts, with block details.
    Receivable {
        #[arg(required = true)]
        accounts: Vec<String>,
        #[arg(long, value_enum)]
        sort: Option<Sort>,
    },

    /// Ask the node to generate work for a hash.
    WorkGenerate {
        hash: String,
        #[arg(long)]
        difficulty: Option<String>,
    },

    /// Check work against a difficulty.
    WorkValidate {
        hash: String,
        work: String,
        difficulty: String,
    },

    /// Publish a JSON block.
    Process {
        /// send, receive, open, change or epoch.
        subtype: String,
        /// The block as a JSON object.
        block: String,
    },

    /// Send an arbitrary JSON payload (must carry an `action` field).
    Raw { payload: String },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum Sort {
    Ascending,
    Descending,
}
