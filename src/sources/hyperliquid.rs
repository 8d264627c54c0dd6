//! Perpetual futures market data from the Hyperliquid info API.
//!
//! API: `https://api.hyperliquid.xyz/info` — a single POST endpoint
//! dispatching on the JSON body's `type` field. No auth required.
//!
//! One fetch issues three queries concurrently: `allMids` (current mid
//! prices), `meta` (universe metadata incl. max leverage), and
//! `metaAndAssetCtxs` (per-asset 24h context). Any of the three failing
//! fails the whole fetch. Universe and context arrays are positionally
//! joined; upstream guarantees aligned ordering, and a length divergence
//! is logged rather than silently mis-attributed.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;
use tracing::{debug, warn};

use super::MarketSource;
use crate::config::HyperliquidConfig;
use crate::types::{FetchError, PerpMarket};

// ---------------------------------------------------------------------------
// Raw response types
// ---------------------------------------------------------------------------

/// `allMids` response: asset name → mid price as a decimal string.
pub type AllMids = HashMap<String, String>;

#[derive(Debug, Deserialize, Clone)]
pub struct Meta {
    #[serde(default)]
    pub universe: Vec<UniverseAsset>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UniverseAsset {
    #[serde(default)]
    pub name: String,
    /// Positive by contract; a missing field degrades to 1x.
    #[serde(default = "default_leverage", rename = "maxLeverage")]
    pub max_leverage: u32,
}

fn default_leverage() -> u32 {
    1
}

/// Per-asset 24h context. All numerics arrive as decimal strings.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AssetCtx {
    #[serde(default, rename = "markPx")]
    pub mark_px: String,
    #[serde(default, rename = "prevDayPx")]
    pub prev_day_px: String,
    #[serde(default, rename = "dayNtlVlm")]
    pub day_ntl_vlm: String,
    #[serde(default)]
    pub funding: String,
    #[serde(default, rename = "openInterest")]
    pub open_interest: String,
}

// ---------------------------------------------------------------------------
// Normalizer
// ---------------------------------------------------------------------------

/// Parse a decimal string, defaulting to 0 when unparseable or empty.
fn parse_or_zero(s: &str) -> f64 {
    s.trim().parse::<f64>().unwrap_or(0.0)
}

/// Format a value with comma thousands grouping and up to two fractional
/// digits (trailing zeros trimmed), e.g. `500000.0 → "500,000"`.
pub fn group_thousands(value: f64) -> String {
    let rounded = (value.abs() * 100.0).round() / 100.0;
    let int_part = rounded.trunc() as u64;

    let digits = int_part.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let frac = rounded - rounded.trunc();
    if frac > 0.0 {
        let frac_str = format!("{frac:.2}");
        let trimmed = frac_str.trim_start_matches('0').trim_end_matches('0');
        grouped.push_str(trimmed);
    }

    if value < 0.0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// Join mids, universe, and contexts positionally into canonical records.
///
/// A universe entry with no matching context (index out of range) still
/// produces a record with all context-derived fields at their defaults.
/// The 24h change is `"0.00"` when the previous-day price is zero or
/// absent — a safe default, not a market fact.
pub fn normalize(
    mids: &AllMids,
    universe: &[UniverseAsset],
    contexts: &[AssetCtx],
) -> Vec<PerpMarket> {
    universe
        .iter()
        .enumerate()
        .map(|(i, asset)| {
            let ctx = contexts.get(i);

            let mark_price_usd = mids
                .get(&asset.name)
                .map(|s| parse_or_zero(s))
                .or_else(|| ctx.map(|c| parse_or_zero(&c.mark_px)))
                .unwrap_or(0.0);

            let (change, volume, funding, oi) = match ctx {
                Some(c) => {
                    let mark = parse_or_zero(&c.mark_px);
                    let prev = parse_or_zero(&c.prev_day_px);
                    let change = if prev == 0.0 {
                        "0.00".to_string()
                    } else {
                        format!("{:.2}", (mark - prev) / prev * 100.0)
                    };
                    (
                        change,
                        group_thousands(parse_or_zero(&c.day_ntl_vlm)),
                        format!("{:.4}", parse_or_zero(&c.funding) * 100.0),
                        group_thousands(parse_or_zero(&c.open_interest)),
                    )
                }
                None => (
                    "0.00".to_string(),
                    "0".to_string(),
                    "0.0000".to_string(),
                    "0".to_string(),
                ),
            };

            PerpMarket {
                id: asset.name.clone(),
                display_name: asset.name.clone(),
                mark_price_usd,
                change_pct_24h: change,
                volume_24h: volume,
                funding_rate_pct: funding,
                open_interest: oi,
                max_leverage: asset.max_leverage,
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Source
// ---------------------------------------------------------------------------

pub struct HyperliquidSource {
    http: Client,
    cfg: HyperliquidConfig,
}

impl HyperliquidSource {
    pub fn new(cfg: HyperliquidConfig) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(15))
            .user_agent("roster/0.1.0")
            .build()?;
        Ok(Self { http, cfg })
    }

    async fn info_query<T: DeserializeOwned>(
        &self,
        body: serde_json::Value,
    ) -> Result<T, FetchError> {
        let url = format!("{}/info", self.cfg.api_url);
        let resp = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;
        resp.json().await.map_err(FetchError::schema)
    }
}

#[async_trait]
impl MarketSource for HyperliquidSource {
    type Record = PerpMarket;

    fn display_name(&self) -> &str {
        "Hyperliquid"
    }

    async fn fetch(&self) -> Result<Vec<PerpMarket>, FetchError> {
        debug!(url = %self.cfg.api_url, "Fetching Hyperliquid perp data");

        // `metaAndAssetCtxs` returns a two-element array [meta, contexts].
        let (mids, meta, (_, contexts)) = tokio::try_join!(
            self.info_query::<AllMids>(json!({"type": "allMids"})),
            self.info_query::<Meta>(json!({"type": "meta"})),
            self.info_query::<(Meta, Vec<AssetCtx>)>(json!({"type": "metaAndAssetCtxs"})),
        )?;

        if meta.universe.len() != contexts.len() {
            warn!(
                universe = meta.universe.len(),
                contexts = contexts.len(),
                "Universe/context arrays diverge; unmatched assets get default context"
            );
        }

        Ok(normalize(&mids, &meta.universe, &contexts))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
