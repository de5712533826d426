//! Coin Space wallet command line
//!
//! Drives the session manager against the configured site API and the local
//! wallet database:
//! - create (or recover) a wallet and protect it with a PIN
//! - open the stored wallet with its PIN
//! - query dynamic fees and validate sends on the opened network

use clap::{Parser, Subcommand};
use coinspace_core::{Direction, DynamicFees};
use coinspace_wallet_service::{build_manager, Completion, WalletConfig, WalletManager};
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "coinspace")]
#[command(about = "Coin Space wallet session manager", long_about = None)]
struct Cli {
    /// JSON configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a wallet (or recover one from a passphrase) and set its PIN
    Create {
        /// Recovery phrase; a fresh seed is generated when omitted
        #[arg(long)]
        passphrase: Option<String>,

        /// PIN registered with the auth service
        #[arg(short, long)]
        pin: String,

        /// Network to open after setup
        #[arg(short, long)]
        network: Option<String>,
    },

    /// Open the stored wallet and print its history
    Open {
        /// PIN
        #[arg(short, long)]
        pin: String,

        /// Network to open
        #[arg(short, long)]
        network: Option<String>,
    },

    /// Show dynamic fee levels for a network
    Fees {
        /// PIN
        #[arg(short, long)]
        pin: String,

        /// Network to query
        #[arg(short, long)]
        network: Option<String>,
    },

    /// Check a send request against the opened wallet
    ValidateSend {
        /// PIN
        #[arg(short, long)]
        pin: String,

        /// Network to send on
        #[arg(short, long)]
        network: Option<String>,

        /// Recipient address
        #[arg(long)]
        to: String,

        /// Amount in the smallest unit
        #[arg(long)]
        amount: u64,

        /// Spendable balance, if known
        #[arg(long)]
        spendable: Option<u64>,
    },

    /// Set the display name of the stored wallet
    Username {
        /// PIN
        #[arg(short, long)]
        pin: String,

        /// New display name
        name: String,
    },

    /// Whether a wallet is stored on this device
    Exists,

    /// Delete the stored wallet
    Reset,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = WalletConfig::load(cli.config.as_deref())?;
    let default_network = config.default_network.to_string();
    let manager = build_manager(&config)?;

    match cli.command {
        Commands::Create {
            passphrase,
            pin,
            network,
        } => {
            let network = network.unwrap_or(default_network);
            run_create(&manager, passphrase.as_deref(), &pin, &network).await?;
        }
        Commands::Open { pin, network } => {
            let network = network.unwrap_or(default_network);
            run_open(&manager, &pin, &network).await?;
        }
        Commands::Fees { pin, network } => {
            let network = network.unwrap_or(default_network);
            manager.open_wallet_with_pin(&pin, &network, Completion::none()).await?;
            match manager.get_dynamic_fees().await? {
                DynamicFees::NotRequired => println!("{} does not use dynamic fees", network),
                DynamicFees::Unavailable => warn!("Fee service unavailable"),
                DynamicFees::Available(schedule) => {
                    for (level, rate) in schedule.levels() {
                        println!("{:<12} {}", level, rate);
                    }
                }
            }
        }
        Commands::ValidateSend {
            pin,
            network,
            to,
            amount,
            spendable,
        } => {
            let network = network.unwrap_or(default_network);
            manager.open_wallet_with_pin(&pin, &network, Completion::none()).await?;
            match manager.validate_send(&to, amount, spendable) {
                Ok(()) => println!("ok"),
                Err(e) => println!("rejected: {}", e.user_message()),
            }
        }
        Commands::Username { pin, name } => {
            manager.open_wallet_with_pin(&pin, &default_network, Completion::none()).await?;
            manager.set_username(&name).await?;
            info!("Username updated");
        }
        Commands::Exists => {
            println!("{}", manager.wallet_exists()?);
        }
        Commands::Reset => {
            manager.reset()?;
            info!("Stored wallet deleted");
        }
    }

    Ok(())
}

async fn run_create(
    manager: &WalletManager,
    passphrase: Option<&str>,
    pin: &str,
    network: &str,
) -> anyhow::Result<()> {
    let created = manager.create_wallet(passphrase).await?;
    if created.user_exists {
        info!("Recovered a registered wallet");
    }
    if passphrase.is_none() {
        println!("Write down your passphrase:");
        println!("{}", created.mnemonic.phrase());
    }

    manager.set_pin(pin, network, Completion::none()).await?;
    if let Some(id) = manager.get_id() {
        println!("Wallet id: {}", id);
    }
    Ok(())
}

async fn run_open(manager: &WalletManager, pin: &str, network: &str) -> anyhow::Result<()> {
    let (completion, rx) = Completion::channels();
    manager.open_wallet_with_pin(pin, network, completion).await?;

    if let Some(session) = manager.get_wallet() {
        println!(
            "Opened {} wallet ({})",
            session.wallet.network().display_name,
            session.denomination.symbol
        );
    }

    match rx.tx_done.await? {
        Ok(transactions) => {
            for tx in transactions {
                let direction = match tx.direction {
                    Direction::Incoming => "in",
                    Direction::Outgoing => "out",
                    Direction::SelfTransfer => "self",
                };
                println!(
                    "{} {:>4} {:>16} {}",
                    tx.id,
                    direction,
                    tx.amount,
                    if tx.is_confirmed { "confirmed" } else { "pending" }
                );
            }
        }
        Err(e) => warn!("History unavailable: {}", e),
    }
    Ok(())
}
