//! DEX Order Entry - Entry Point
//!
//! Command-line order preview. Loads configuration, fetches the market,
//! balances and order book, validates the order and prints the ticket
//! (adjustments or rejection, fee and fill estimates, payload) as JSON.
//! Nothing is signed or submitted.
//!
//! Usage:
//!   dex-order-entry <market_id> <buy|sell> <price> <size>
//!   dex-order-entry percent <market_id> <buy|sell> <price> <percent>
//!
//! Wiring sequence:
//! 1. Load config (path from ORDER_ENTRY_CONFIG, default config.toml)
//! 2. Init tracing (JSON structured logging)
//! 3. Create ApiClient (HTTP + retry + concurrency limit)
//! 4. Wire market/balance adapters and payload builder into OrderEntry
//! 5. Run the requested command

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use std::sync::Arc;

use anyhow::{Context, Result, bail};
use tracing::info;

use dex_order_entry::adapters::api::{ApiBalances, ApiClient, ApiClientConfig, ApiMarketData};
use dex_order_entry::adapters::chain::EconiaPayloadBuilder;
use dex_order_entry::config;
use dex_order_entry::domain::order::{OrderRequest, Side};
use dex_order_entry::domain::units::parse_decimal;
use dex_order_entry::usecases::OrderEntry;

const CONFIG_ENV: &str = "ORDER_ENTRY_CONFIG";
const USAGE: &str = "usage: dex-order-entry <market_id> <buy|sell> <price> <size>\n       \
                     dex-order-entry percent <market_id> <buy|sell> <price> <percent>";

/// Parsed command line.
enum Command {
    Prepare {
        market_id: u64,
        request: OrderRequest,
    },
    Percent {
        market_id: u64,
        side: Side,
        price: String,
        percent: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = parse_args(&args)?;

    // ── 1. Load configuration ───────────────────────────────
    let config_path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| "config.toml".to_string());
    let config = config::loader::load_config(&config_path)
        .context("Failed to load configuration")?;

    // ── 2. Initialize structured JSON logging ───────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.app.log_level)),
        )
        .with_writer(std::io::stderr)
        .json()
        .init();

    info!(
        name = %config.app.name,
        version = env!("CARGO_PKG_VERSION"),
        api = %config.api.base_url,
        "Starting order entry"
    );

    // ── 3. Create REST client with retry ────────────────────
    let client = Arc::new(
        ApiClient::new(ApiClientConfig::from(&config.api))
            .context("Failed to create API client")?,
    );

    // ── 4. Wire ports into the use case ─────────────────────
    let entry = OrderEntry::new(
        Arc::new(ApiMarketData::new(Arc::clone(&client))),
        Arc::new(ApiBalances::new(Arc::clone(&client))),
        Arc::new(EconiaPayloadBuilder::from_config(&config)),
        &config,
    );
    let account = config.account.address.as_str();

    // ── 5. Run ──────────────────────────────────────────────
    match command {
        Command::Prepare { market_id, request } => {
            let ticket = entry.prepare(market_id, account, &request).await?;
            println!("{}", serde_json::to_string_pretty(&ticket)?);
        }
        Command::Percent {
            market_id,
            side,
            price,
            percent,
        } => {
            let price = parse_decimal(&price).context("Invalid price")?;
            let percent = parse_decimal(&percent).context("Invalid percent")?;
            let size = entry
                .size_for_percent(market_id, account, side, price, percent)
                .await?;
            println!("{size}");
        }
    }

    Ok(())
}

fn parse_args(args: &[String]) -> Result<Command> {
    match args {
        [cmd, market_id, side, price, percent] if cmd == "percent" => Ok(Command::Percent {
            market_id: parse_market_id(market_id)?,
            side: parse_side(side)?,
            price: price.clone(),
            percent: percent.clone(),
        }),
        [market_id, side, price, size] => Ok(Command::Prepare {
            market_id: parse_market_id(market_id)?,
            request: OrderRequest::parse(parse_side(side)?, price, size)
                .context("Invalid order input")?,
        }),
        _ => bail!("{USAGE}"),
    }
}

fn parse_market_id(raw: &str) -> Result<u64> {
    raw.parse()
        .with_context(|| format!("Invalid market id: {raw}"))
}

fn parse_side(raw: &str) -> Result<Side> {
    raw.parse::<Side>().map_err(anyhow::Error::msg)
}
