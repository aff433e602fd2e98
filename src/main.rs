//! AutomateCrypto - Main Entry Point
//!
//! Buys crypto with a fiat budget and withdraws it once the withdrawal fee
//! is acceptable.

use anyhow::{Context, Result};
use automate_crypto::config::{apply_env, load_config};
use automate_crypto::sizing::{DEFAULT_MAX_FEE_PERCENT, FEE_CURRENCY_CRYPTO, FEE_CURRENCY_FIAT};
use automate_crypto::{
    buy_crypto, withdraw_crypto, BuyRequest, KrakenClient, OrderType, QuantizationContext,
    WithdrawRequest, WithdrawalDecision,
};
use clap::{Args, Parser, Subcommand};
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// CLI arguments for the application
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    platform: Platform,
}

#[derive(Subcommand, Debug)]
enum Platform {
    /// Trade and withdraw on Kraken
    Kraken {
        #[command(subcommand)]
        command: KrakenCommand,
    },
}

#[derive(Subcommand, Debug)]
enum KrakenCommand {
    /// Spend a fiat amount on crypto, fee included
    Buy(BuyArgs),
    /// Withdraw crypto to a saved address if the fee is low enough
    Withdraw(WithdrawArgs),
}

#[derive(Args, Debug)]
struct BuyArgs {
    /// Trading pair, e.g. XXBTZUSD
    #[arg(long)]
    pair: String,

    /// Order type (limit or market)
    #[arg(long, default_value = "limit")]
    ordertype: String,

    /// Absolute limit price
    #[arg(long, conflicts_with = "limit_percentage")]
    limit_price: Option<String>,

    /// Limit price as a fraction of the bid, 0.9995 when omitted
    #[arg(long)]
    limit_percentage: Option<String>,

    /// Fiat amount to spend, fee included
    #[arg(long)]
    amount: String,

    /// Currency the fee is paid in
    #[arg(long, default_value = FEE_CURRENCY_FIAT, value_parser = [FEE_CURRENCY_FIAT, FEE_CURRENCY_CRYPTO])]
    fee_currency: String,

    /// Compute and print the order without submitting it
    #[arg(long)]
    validate: bool,
}

#[derive(Args, Debug)]
struct WithdrawArgs {
    /// Asset to withdraw, e.g. XBT
    #[arg(long)]
    asset: String,

    /// Amount to withdraw, the exchange minimum when omitted
    #[arg(long)]
    amount: Option<String>,

    /// Name of the withdrawal address saved on Kraken
    #[arg(long)]
    withdrawal_key: String,

    /// Highest acceptable fee in percent of the amount
    #[arg(long, default_value_t = DEFAULT_MAX_FEE_PERCENT.to_string())]
    max_fee: String,

    /// Compute and print the withdrawal without requesting it
    #[arg(long)]
    validate: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    let mut config = load_config(Some(&cli.config))
        .with_context(|| format!("Failed to load configuration from {}", cli.config))?;
    apply_env(&mut config);

    // Initialize logging
    let level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let log_path = config.settings.logging_file_path();
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file {}", log_path.display()))?;

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting AutomateCrypto");
    info!("Configuration file: {}", cli.config);

    let ctx = config
        .decimal
        .context()
        .context("Invalid decimal configuration")?;

    match cli.platform {
        Platform::Kraken { command } => {
            let client = KrakenClient::new(&config.kraken).context("Failed to create Kraken client")?;
            match command {
                KrakenCommand::Buy(args) => run_buy(&client, &ctx, args).await,
                KrakenCommand::Withdraw(args) => run_withdraw(&client, &ctx, args).await,
            }
        }
    }
}

async fn run_buy(client: &KrakenClient, ctx: &QuantizationContext, args: BuyArgs) -> Result<()> {
    let order_type: OrderType = args.ordertype.parse()?;
    let request = BuyRequest {
        pair: args.pair,
        order_type,
        limit_price: args.limit_price,
        limit_percentage: args.limit_percentage,
        amount: args.amount,
        fee_currency: args.fee_currency,
        validate: args.validate,
    };

    let outcome = buy_crypto(client, ctx, &request)
        .await
        .with_context(|| format!("Failed to buy on {}", request.pair))?;

    let sizing = &outcome.plan.sizing;
    println!("Order:   {}", outcome.plan.order);
    println!(
        "Spend:   {} = fee {} + net {}",
        sizing.amount, sizing.fee_paid, sizing.net_fiat
    );
    match outcome.confirmation {
        Some(confirmation) => println!(
            "Placed:  {} (txids: {})",
            confirmation.description,
            confirmation.txids.join(", ")
        ),
        None => println!("Validate only, order not submitted"),
    }

    Ok(())
}

async fn run_withdraw(client: &KrakenClient, ctx: &QuantizationContext, args: WithdrawArgs) -> Result<()> {
    let request = WithdrawRequest {
        asset: args.asset,
        amount: args.amount,
        withdrawal_key: args.withdrawal_key,
        max_fee: args.max_fee,
        validate: args.validate,
    };

    let outcome = withdraw_crypto(client, ctx, &request)
        .await
        .with_context(|| format!("Failed to withdraw {}", request.asset))?;

    let withdrawal = &outcome.withdrawal;
    println!("Withdrawal: {}", withdrawal);
    match (withdrawal.decision, outcome.reference) {
        (WithdrawalDecision::Blocked, _) => println!(
            "Blocked: fee {}% is above the maximum of {}%",
            withdrawal.fee_percent, withdrawal.max_fee_percent
        ),
        (WithdrawalDecision::Proceed, Some(reference)) => {
            println!("Requested: reference {}", reference)
        }
        (WithdrawalDecision::Proceed, None) => println!("Validate only, withdrawal not requested"),
    }

    Ok(())
}
