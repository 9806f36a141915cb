//! Deposit agent CLI
//!
//! Lists the deposit actions, invokes them against a signing wallet, and
//! prints protocol stats.

use clap::{Parser, Subcommand};
use restake_deposit_actions::audit::AuditLog;
use restake_deposit_actions::executor;
use restake_deposit_actions::stats::StatsClient;
use restake_deposit_actions::wallet::{AlloyWalletClient, SecureWallet};
use restake_deposit_actions::{
    ActionRegistry, Config, DepositRequest, Error, Network, Result, RpcConfig, PRIVATE_KEY_ENV,
};
use serde_json::json;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "deposit-agent")]
#[command(about = "Deposit ETH into restaking protocols")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List available actions with their input schemas
    Actions,

    /// Invoke a deposit action
    Deposit {
        /// Action name (renzo_deposit, etherfi_deposit, kelpdao_deposit)
        #[arg(short, long)]
        action: String,

        /// Amount of ETH, as a decimal (e.g. 0.01)
        #[arg(long)]
        amount: String,

        /// Network the wallet is on (defaults to the config value, then to
        /// the network the action's contract is deployed on)
        #[arg(short, long)]
        network: Option<String>,

        /// Print the prepared contract call without sending it
        #[arg(long)]
        dry_run: bool,
    },

    /// Fetch TVL and APY figures from protocol APIs
    Stats,

    /// Show current configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (ignore if not found)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    match cli.command {
        Commands::Actions => {
            let registry = ActionRegistry::deposit_actions();
            println!("{}", serde_json::to_string_pretty(&registry.describe())?);
        }
        Commands::Deposit {
            action,
            amount,
            network,
            dry_run,
        } => {
            let network = network.map(|n| n.parse()).transpose()?;
            run_deposit(&config, network, &action, &amount, dry_run).await?;
        }
        Commands::Stats => {
            run_stats(&config).await?;
        }
        Commands::Config => {
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }

    Ok(())
}

async fn run_deposit(
    config: &Config,
    network: Option<Network>,
    action: &str,
    amount: &str,
    dry_run: bool,
) -> Result<()> {
    let mut registry = ActionRegistry::deposit_actions();
    let descriptor = *registry
        .get(action)
        .ok_or_else(|| Error::UnknownAction(action.to_string()))?;
    let input = json!({ "amount": amount });

    if dry_run {
        let request = DepositRequest::from_input(&input)
            .map_err(|e| Error::InvalidArgument(e.to_string()))?;
        let call = executor::prepare(descriptor.protocol(), &request, chrono::Utc::now())
            .map_err(|e| Error::InvalidArgument(e.to_string()))?;
        println!("{}", serde_json::to_string_pretty(&call)?);
        return Ok(());
    }

    if let Some(path) = &config.audit_log_path {
        registry = registry.with_audit_log(AuditLog::new(path));
    }

    let network = config.wallet_network(network, descriptor.protocol().network);
    let wallet = SecureWallet::from_env(PRIVATE_KEY_ENV)?;
    tracing::info!(address = %wallet.address(), %network, "Loaded wallet from {}", PRIVATE_KEY_ENV);
    let client = AlloyWalletClient::from_rpc_config(wallet, network, &RpcConfig::from_env())?;

    let result = registry.invoke(action, &client, &input).await?;
    println!("{}", result);
    Ok(())
}

async fn run_stats(config: &Config) -> Result<()> {
    let client = StatsClient::new(Duration::from_secs(config.stats.timeout_secs))?;
    for line in client.all().await {
        println!("{}", line);
    }
    Ok(())
}
