//! fortinv
//!
//! Ansible dynamic inventory for FortiGate managed switches and access points

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use color_eyre::Result;
use fortinv_client::HttpClient;
use fortinv_inventory::InventoryCollector;
use tracing::debug;

mod config;
mod logging;

use config::Config;

/// FortiGate inventory source for Ansible
#[derive(Parser, Debug)]
#[command(name = "fortinv", version, about, long_about = None)]
struct Args {
    /// Print the whole inventory (the default)
    #[arg(long, conflicts_with = "host")]
    list: bool,

    /// Print the variables of a single host
    #[arg(long, value_name = "NAME")]
    host: Option<String>,

    /// Configuration file (must be named *fortigate.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// Enable debug logging on stderr
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::load_default()?,
    };

    logging::init(&config.logging, args.verbose)?;
    debug!(
        source = ?config.source,
        api_host = %config.api_host,
        api_version = ?config.api_version,
        "configuration loaded"
    );

    let client = HttpClient::new(&config.client_settings())?;
    let collector = InventoryCollector::new(Arc::new(client), config.mapper());
    let inventory = collector.collect().await?;

    let document = match (&args.host, args.list) {
        (Some(host), false) => inventory.to_host_json(host),
        _ => inventory.to_list_json(),
    };

    let output = if args.pretty {
        serde_json::to_string_pretty(&document)?
    } else {
        serde_json::to_string(&document)?
    };
    println!("{output}");

    Ok(())
}
