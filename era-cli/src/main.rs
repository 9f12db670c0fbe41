//! Era Airdrop CLI
//!
//! Runs the dashboard API, or looks up a single wallet from the terminal.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use era_api::{ApiConfig, ApiServer};
use era_core::constants::DEFAULT_PORT;
use era_core::types::{AirdropRecord, WalletAddress};
use era_lookup::{LookupOutcome, RecordOrigin};

/// Era Airdrop - claim and vesting status for Ethereum wallets
#[derive(Parser)]
#[command(name = "era-airdrop")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the API server
    Serve {
        /// Port to listen on
        #[arg(short, long, env = "PORT", default_value_t = DEFAULT_PORT)]
        port: u16,
        /// Bind address
        #[arg(short, long, default_value = "0.0.0.0")]
        bind: String,
    },

    /// Look up one wallet and print its airdrop status
    Lookup {
        /// Wallet address (0x followed by 40 hex digits)
        address: String,
        /// Print the record as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "era=debug,info"
    } else {
        "era=info,warn"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Serve { port, bind } => cmd_serve(port, &bind).await,
        Commands::Lookup { address, json } => cmd_lookup(&address, json).await,
    }
}

/// Run the API server
async fn cmd_serve(port: u16, bind: &str) -> Result<()> {
    let config = ApiConfig::from_env();

    println!("{}", "🚀 Starting Era Airdrop API...".cyan().bold());
    println!("   {} http://{}:{}", "Dashboard:".green(), bind, port);
    println!("   {} http://{}:{}/api/stats", "Stats:".dimmed(), bind, port);
    println!("   {} {}h", "Cache TTL:".dimmed(), config.cache_hours);
    if config.dune_api_key.is_none() {
        println!(
            "   {} DUNE_API_KEY not set, every lookup returns an empty record",
            "⚠".yellow()
        );
    }
    println!("\n   Press Ctrl+C to stop.\n");

    let addr: SocketAddr = format!("{}:{}", bind, port)
        .parse()
        .with_context(|| format!("invalid bind address {}:{}", bind, port))?;

    ApiServer::new(config)
        .run(addr)
        .await
        .context("API server stopped")?;

    Ok(())
}

/// Look up a single wallet
async fn cmd_lookup(address: &str, json: bool) -> Result<()> {
    let wallet = WalletAddress::parse(address).context("Invalid Ethereum wallet address format")?;

    let config = ApiConfig::from_env();
    let lookup = config.lookup_service();
    debug!(upstream = lookup.has_source(), "Lookup service ready");

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg} [{elapsed}]")?);
    spinner.set_message(format!("Querying Dune for {}", wallet));
    spinner.enable_steady_tick(Duration::from_millis(120));

    let outcome = lookup.lookup(&wallet).await;

    spinner.finish_and_clear();

    if json {
        let body = serde_json::json!({
            "record": outcome.record,
            "origin": outcome.origin,
        });
        println!("{}", serde_json::to_string_pretty(&body)?);
    } else {
        print_outcome(&wallet, &outcome);
    }

    Ok(())
}

fn print_outcome(wallet: &WalletAddress, outcome: &LookupOutcome) {
    let record = &outcome.record;

    println!("{} {}", "🪂 Era airdrop for".cyan().bold(), wallet.to_checksum_string());

    match outcome.origin {
        RecordOrigin::Unavailable => {
            println!("   {}", "Dune is not configured (set DUNE_API_KEY).".yellow());
        }
        RecordOrigin::UpstreamError => {
            println!("   {}", "Dune query failed; showing an empty record.".red());
        }
        RecordOrigin::NoRows => {
            println!("   {}", "No allocation found for this wallet.".yellow());
        }
        RecordOrigin::Upstream | RecordOrigin::Cache => print_record(record),
    }
}

fn print_record(record: &AirdropRecord) {
    let claimed = if record.is_claimed {
        "yes".green()
    } else {
        "no".yellow()
    };

    println!("   {} {}", "Total allocation:".green(), record.total_allocation);
    println!("   {} {}", "Claimed:".green(), claimed);
    println!("   {} {}", "Claimed amount:".green(), record.claimed_amount);
    println!("   {} {}", "Unclaimed:".green(), record.unclaimed_amount());
    println!("   {} {}", "Pre-claim eligible:".green(), record.pre_claim_status);

    match record.vesting_end_date {
        Some(end) => println!(
            "   {} {} ({} days left)",
            "Vesting ends:".green(),
            end.format("%Y-%m-%d"),
            record.days_left_vesting.unwrap_or(0)
        ),
        None => println!("   {} {}", "Vesting ends:".green(), "unknown".dimmed()),
    }

    if let Some(hash) = &record.claim_transaction_hash {
        println!("   {} {}", "Claim tx:".green(), hash);
    }
}
