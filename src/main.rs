//! roster — multi-source market data aggregator.
//!
//! Entry point. Loads configuration, initialises structured logging,
//! constructs one fetcher per source, performs an initial concurrent
//! load, then refreshes all sources on an interval until Ctrl+C.
//! Sources are independent: one failing never stalls the others.

use anyhow::Result;
use std::time::Duration;
use tracing::{info, warn};

use roster::config::AppConfig;
use roster::fetcher::SourceFetcher;
use roster::sources::coingecko::CoinGeckoSource;
use roster::sources::cryptocompare::CryptoCompareSource;
use roster::sources::hyperliquid::HyperliquidSource;
use roster::sources::polymarket::PolymarketSource;
use roster::sources::MarketSource;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    let cfg = AppConfig::load("config.toml")?;

    init_logging();

    info!(
        refresh_interval_secs = cfg.refresh_interval_secs,
        team_capacity = cfg.team.capacity,
        "roster starting up"
    );

    // One fetcher per source, all driving the same lifecycle.
    let mut spot = SourceFetcher::new(CoinGeckoSource::new(cfg.sources.coingecko.clone())?);
    let mut perps = SourceFetcher::new(HyperliquidSource::new(cfg.sources.hyperliquid.clone())?);
    let mut predictions =
        SourceFetcher::new(PolymarketSource::new(cfg.sources.polymarket.clone())?);
    let mut news = SourceFetcher::new(CryptoCompareSource::new(cfg.sources.news.clone())?);

    // Initial load, all sources concurrently.
    tokio::join!(spot.load(), perps.load(), predictions.load(), news.load());
    report(&spot);
    report(&perps);
    report(&predictions);
    report(&news);

    let mut interval = tokio::time::interval(Duration::from_secs(cfg.refresh_interval_secs));
    interval.tick().await; // first tick fires immediately; the load above covered it

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    info!(
        interval_secs = cfg.refresh_interval_secs,
        "Entering refresh loop. Press Ctrl+C to stop."
    );

    loop {
        tokio::select! {
            _ = interval.tick() => {
                tokio::join!(
                    spot.refresh(),
                    perps.refresh(),
                    predictions.refresh(),
                    news.refresh(),
                );
                report(&spot);
                report(&perps);
                report(&predictions);
                report(&news);
            }
            _ = &mut shutdown => {
                info!("Shutdown signal received.");
                break;
            }
        }
    }

    info!("roster shut down cleanly.");
    Ok(())
}

/// Log one source's current state after a cycle.
fn report<S: MarketSource>(fetcher: &SourceFetcher<S>) {
    match fetcher.error() {
        Some(error) => warn!(
            source = fetcher.name(),
            error,
            stale_records = fetcher.data().len(),
            "Source in error state"
        ),
        None => info!(
            source = fetcher.name(),
            records = fetcher.data().len(),
            "Source up to date"
        ),
    }
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("roster=info"));

    let json_logging = std::env::var("ROSTER_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    } else {
        fmt().with_env_filter(env_filter).with_target(true).init();
    }
}
