//! Swap Extractor Binary
//!
//! Extracts swap path and deadline from router transactions: a single
//! transaction by hash, raw call data, or every pending transaction seen by
//! the node.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dex::{parse_address, SwapExtraction, TransactionCallData};
use swap_extractor::output::to_pretty_json;
use swap_extractor::rpc_client::parse_tx_hash;
use swap_extractor::{
    build_extractor, AbiFetcher, AbiSource, EtherscanClient, RpcClient, SwapWriter, Watcher,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "swap_extractor")]
#[command(about = "Extract swap paths and deadlines from DEX router transactions")]
#[command(version)]
struct Args {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output file, overrides the configured path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Use bundled router ABIs only, without querying the block explorer
    #[arg(long)]
    offline: bool,

    /// Log as JSON lines
    #[arg(long)]
    log_json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract from a mined or pending transaction by hash
    Tx { hash: String },

    /// Extract from raw call data
    Calldata {
        /// Router address the call is sent to
        #[arg(long)]
        to: String,

        /// Hex call data, `0x` prefix optional
        #[arg(long)]
        data: String,
    },

    /// Watch pending transactions and extract router swaps
    Watch,
}

fn init_logging(args: &Args) -> Result<()> {
    let default_level = if args.debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))?
        .add_directive(format!("swap_extractor={}", default_level).parse()?);

    let subscriber = tracing_subscriber::fmt().with_env_filter(filter);
    if args.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args)?;

    let mut config = config::load_config(args.config.as_deref())?;
    if let Some(output) = &args.output {
        config.output.path = output.clone();
    }

    let fetcher: Option<Box<dyn AbiFetcher>> = if args.offline {
        None
    } else if config.etherscan.api_key.is_some() {
        Some(Box::new(EtherscanClient::new(&config.etherscan)?))
    } else {
        warn!("No Etherscan API key configured, using bundled router ABIs");
        None
    };

    let loaded = AbiSource::new(fetcher)
        .load_routers(&config.routers)
        .await;
    if loaded.registry.is_empty() {
        anyhow::bail!("No router could be registered");
    }

    let extractor = build_extractor(loaded, config.extraction.max_recursion_depth);
    let writer = SwapWriter::new(config.output.path.clone());

    match args.command {
        Command::Tx { hash } => {
            let http_url = config
                .rpc
                .http_url
                .as_deref()
                .context("rpc.http_url is not configured")?;
            let rpc = RpcClient::new(http_url)?;

            let call = rpc.fetch_call_data(parse_tx_hash(&hash)?).await?;
            let extraction = extractor.extract(&call)?;
            report(&writer, &extraction).await?;
        }
        Command::Calldata { to, data } => {
            let destination = parse_address(&to)?;
            let data = hex::decode(data.trim().trim_start_matches("0x"))
                .context("Call data is not valid hex")?;

            let extraction = extractor.extract(&TransactionCallData::new(destination, data))?;
            report(&writer, &extraction).await?;
        }
        Command::Watch => {
            let http_url = config
                .rpc
                .http_url
                .clone()
                .context("rpc.http_url is not configured")?;
            let ws_url = config
                .rpc
                .ws_url
                .clone()
                .context("rpc.ws_url is not configured")?;
            let reconnect_delay = Duration::from_millis(config.rpc.reconnect_delay_ms);

            let watcher = Watcher::new(extractor, RpcClient::new(&http_url)?, writer)
                .with_max_in_flight(config.rpc.max_in_flight);
            info!("Watching pending transactions");

            tokio::select! {
                _ = watcher.run(ws_url, reconnect_delay) => {}
                _ = tokio::signal::ctrl_c() => info!("Received shutdown signal"),
            }
        }
    }

    Ok(())
}

async fn report(writer: &SwapWriter, extraction: &SwapExtraction) -> Result<()> {
    for issue in &extraction.issues {
        warn!("Incomplete swap record: {}", issue);
    }
    println!("{}", to_pretty_json(extraction)?);
    writer.write(extraction).await
}
