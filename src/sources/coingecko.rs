//! Spot crypto prices from the CoinGecko markets API.
//!
//! API: `https://api.coingecko.com/api/v3/coins/markets`
//! No auth required. One paginated market-listing query per fetch
//! (currency, ordering, page size from config).

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::MarketSource;
use crate::config::CoinGeckoConfig;
use crate::types::{FetchError, SpotAsset};

// ---------------------------------------------------------------------------
// Raw response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Clone)]
pub struct RawListing {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub current_price: Option<f64>,
    #[serde(default)]
    pub price_change_percentage_24h: Option<f64>,
}

// ---------------------------------------------------------------------------
// Normalizer
// ---------------------------------------------------------------------------

/// Map raw listings into canonical spot assets.
///
/// Missing prices default to 0; negative prices are clamped to 0 to hold
/// the `price_usd >= 0` invariant. Never fails.
pub fn normalize(raw: &[RawListing]) -> Vec<SpotAsset> {
    raw.iter()
        .map(|listing| SpotAsset {
            id: listing.id.clone(),
            display_name: listing.name.clone(),
            symbol_upper: listing.symbol.to_uppercase(),
            price_usd: listing.current_price.unwrap_or(0.0).max(0.0),
            change_pct_24h: listing.price_change_percentage_24h.unwrap_or(0.0),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Source
// ---------------------------------------------------------------------------

pub struct CoinGeckoSource {
    http: Client,
    cfg: CoinGeckoConfig,
}

impl CoinGeckoSource {
    pub fn new(cfg: CoinGeckoConfig) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(15))
            .user_agent("roster/0.1.0")
            .build()?;
        Ok(Self { http, cfg })
    }
}

#[async_trait]
impl MarketSource for CoinGeckoSource {
    type Record = SpotAsset;

    fn display_name(&self) -> &str {
        "crypto"
    }

    async fn fetch(&self) -> Result<Vec<SpotAsset>, FetchError> {
        let url = format!("{}/coins/markets", self.cfg.api_url);
        debug!(url = %url, "Fetching spot crypto listings");

        let resp = self
            .http
            .get(&url)
            .query(&[
                ("vs_currency", self.cfg.vs_currency.as_str()),
                ("order", self.cfg.order.as_str()),
                ("per_page", &self.cfg.per_page.to_string()),
                ("page", &self.cfg.page.to_string()),
                ("sparkline", "false"),
            ])
            .send()
            .await?
            .error_for_status()?;

        let raw: Vec<RawListing> = resp.json().await.map_err(FetchError::schema)?;
        Ok(normalize(&raw))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
