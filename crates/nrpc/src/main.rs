mod cli;

use std::time::Duration;

use clap::Parser;
use eyre::{eyre, WrapErr};
use serde_json::Value;

use nrpc_core::config::per_second;
use nrpc_core::rpc::{
    AccountHistoryOptions, AccountInfoOptions, AccountsPendingOptions, BlockInfoOptions,
    BlocksInfoOptions, WorkGenerateOptions,
};
use nrpc_core::{
    ApplicationError, ClientConfig, CoreError, ErrorKind, NanoRpc, NodeClient, PacingStrategy,
    ReceivableOptions, SortOrder,
};

use cli::{Cli, Command, Sort};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let args = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_file(true)
        .with_line_number(true)
        .with_level(true)
        .init();

    let config = build_config(&args)?;
    let client = NodeClient::new(&config).wrap_err("configure node client")?;

    let output = run(&client, args.command)
        .await
        .map_err(|err| eyre!(describe_failure(&config.node_address, &err)))?;
    println!("{}", serde_json::to_string_pretty(&output)?);

    let state = client.state().await;
    if state.has_limits() {
        tracing::info!(
            node = %state.address,
            requests_limit = ?state.requests_limit,
            requests_remaining = ?state.requests_remaining,
            request_limit_reset = ?state.request_limit_reset,
            "node rate limit"
        );
    }

    Ok(())
}

fn build_config(args: &Cli) -> eyre::Result<ClientConfig> {
    let pacing = if args.no_pacing {
        PacingStrategy::None
    } else if let Some(limit) = args.requests_per_second {
        per_second(limit)?
    } else {
        PacingStrategy::FixedIncrement(Duration::from_millis(args.pacing_increment_ms))
    };

    let log_file = (!args.no_log_file).then(|| args.log_file.clone());
    let config = ClientConfig::new(&args.node_url)
        .with_pacing(pacing)
        .with_log_file(log_file)
        .with_error_normalization(!args.raw_errors)
        .with_log_payloads(!args.no_log_payloads);
    config.validate()?;
    Ok(config)
}

async fn run(client: &NodeClient, command: Command) -> Result<Value, CoreError> {
    match command {
        Command::AccountBalance { account } => client.account_balance(&account).await,
        Command::AccountInfo {
            account,
            receivable,
        } => {
            client
                .account_info(&account, &AccountInfoOptions { receivable })
                .await
        }
        Command::AccountHistory {
            account,
            raw,
            count,
        } => {
            client
                .account_history(&account, &AccountHistoryOptions { raw, count })
                .await
        }
        Command::AccountsPending {
            accounts,
            count,
            threshold,
        } => {
            client
                .accounts_pending(&accounts, &AccountsPendingOptions { count, threshold })
                .await
        }
        Command::BlockInfo { hash, json_block } => {
            client
                .block_info(&hash, &BlockInfoOptions { json_block })
                .await
        }
        Command::BlocksInfo {
            hashes,
            json_block,
            source,
            pending,
        } => {
            client
                .blocks_info(
                    &hashes,
                    &BlocksInfoOptions {
                        json_block,
                        source,
                        pending,
                    },
                )
                .await
        }
        Command::Receivable { accounts, sort } => {
            let options = ReceivableOptions {
                sort: sort.map(|sort| match sort {
                    Sort::Ascending => SortOrder::Ascending,
                    Sort::Descending => SortOrder::Descending,
                }),
            };
            let blocks = client.receivable_blocks_info(&accounts, &options).await?;
            serde_json::to_value(blocks).map_err(|e| {
                CoreError::from(ApplicationError::Unexpected(format!(
                    "encode receivable blocks: {e}"
                )))
            })
        }
        Command::WorkGenerate { hash, difficulty } => {
            client
                .work_generate(&hash, &WorkGenerateOptions { difficulty })
                .await
        }
        Command::WorkValidate {
            hash,
            work,
            difficulty,
        } => client.work_validate(&hash, &work, &difficulty).await,
        Command::Process { subtype, block } => {
            let block = parse_json_arg("block", &block)?;
            client.process(&subtype, &block).await
        }
        Command::Raw { payload } => {
            let payload = parse_json_arg("payload", &payload)?;
            client.submit_raw(payload).await
        }
    }
}

fn parse_json_arg(name: &str, raw: &str) -> Result<Value, CoreError> {
    serde_json::from_str(raw)
        .map_err(|e| CoreError::Validation(format!("{name} is not valid JSON: {e}")))
}

fn describe_failure(node: &str, err: &CoreError) -> String {
    let hint = match err.kind() {
        ErrorKind::Transport => {
            "hint: no reply from the node; check the URL and that the node RPC is enabled and reachable"
        }
        ErrorKind::Validation => "hint: fix the arguments and try again",
        ErrorKind::Application => "hint: the node rejected the request; see the error above",
        ErrorKind::Config => "hint: check the command-line flags and NRPC_* environment",
        ErrorKind::Io => "hint: local I/O failed",
    };

    let detail = match err.node_error_body() {
        Some(body) => format!("node error: {body}"),
        None => err.to_string(),
    };
    let mut lines = vec![format!("request to `{node}` failed"), detail];
    if let ErrorKind::Transport = err.kind() {
        if let Some(source) = std::error::Error::source(err) {
            lines.push(format!("cause: {source}"));
        }
    }
    lines.push(hint.to_owned());
    lines.join("\n")
}
