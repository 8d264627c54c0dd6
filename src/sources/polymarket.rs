//! Prediction market listings from the Polymarket Gamma API.
//!
//! API: `https://gamma-api.polymarket.com/markets` (no auth required).
//! One filtered listing query per fetch: `active=true&closed=false&limit=N`.
//!
//! `outcomes` and `outcomePrices` arrive as JSON-encoded strings inside the
//! JSON payload, positionally paired. Only the first two pairs are ever
//! surfaced, regardless of how many outcomes exist upstream — an explicit
//! truncation.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::MarketSource;
use crate::config::PolymarketConfig;
use crate::types::{FetchError, Outcome, PredictionMarket};

// ---------------------------------------------------------------------------
// Raw response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Clone)]
#[allow(dead_code)]
pub struct RawMarket {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub category: String,
    #[serde(default, rename = "volumeNum")]
    pub volume_num: f64,
    /// JSON-encoded string, e.g. `"[\"Yes\",\"No\"]"`.
    #[serde(default)]
    pub outcomes: String,
    /// JSON-encoded string, e.g. `"[\"0.65\",\"0.35\"]"`.
    #[serde(default, rename = "outcomePrices")]
    pub outcome_prices: String,
    #[serde(default)]
    pub image: Option<String>,
}

// ---------------------------------------------------------------------------
// Normalizer
// ---------------------------------------------------------------------------

/// Parse the JSON-encoded outcomes array, defaulting to `["Yes","No"]`
/// when it fails to parse as an array of strings.
fn parse_outcomes(raw: &str) -> Vec<String> {
    serde_json::from_str::<Vec<String>>(raw)
        .unwrap_or_else(|_| vec!["Yes".to_string(), "No".to_string()])
}

/// Parse the JSON-encoded prices array (numbers or numeric strings in
/// `[0,1]`), defaulting to `[0, 0]` when it fails to parse as an array.
/// Individual unparseable elements degrade to 0.
fn parse_prices(raw: &str) -> Vec<f64> {
    match serde_json::from_str::<Vec<serde_json::Value>>(raw) {
        Ok(values) => values
            .iter()
            .map(|v| {
                v.as_f64()
                    .or_else(|| v.as_str().and_then(|s| s.trim().parse().ok()))
                    .unwrap_or(0.0)
            })
            .collect(),
        Err(_) => vec![0.0, 0.0],
    }
}

/// Abbreviate a volume figure: `1_500_000 → "1.5M"`, `2_300 → "2.3K"`,
/// otherwise the rounded integer.
pub fn format_volume(volume: f64) -> String {
    if volume >= 1_000_000.0 {
        format!("{:.1}M", volume / 1_000_000.0)
    } else if volume >= 1_000.0 {
        format!("{:.1}K", volume / 1_000.0)
    } else {
        format!("{}", volume.round() as i64)
    }
}

/// Map one raw market into a canonical record. Never fails; malformed
/// sub-fields degrade to the documented defaults.
pub fn normalize_market(raw: &RawMarket) -> PredictionMarket {
    let labels = parse_outcomes(&raw.outcomes);
    let prices = parse_prices(&raw.outcome_prices);

    let outcomes = labels
        .iter()
        .take(2)
        .enumerate()
        .map(|(i, label)| {
            let price = prices.get(i).copied().unwrap_or(0.0);
            Outcome {
                label: label.clone(),
                implied_pct: (price * 100.0).round().clamp(0.0, 100.0) as u8,
            }
        })
        .collect();

    PredictionMarket {
        id: raw.id.clone(),
        question: raw.question.clone(),
        category: raw.category.clone(),
        volume_formatted: format_volume(raw.volume_num),
        outcomes,
    }
}

pub fn normalize(raw: &[RawMarket]) -> Vec<PredictionMarket> {
    raw.iter().map(normalize_market).collect()
}

// ---------------------------------------------------------------------------
// Source
// ---------------------------------------------------------------------------

pub struct PolymarketSource {
    http: Client,
    cfg: PolymarketConfig,
}

impl PolymarketSource {
    pub fn new(cfg: PolymarketConfig) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(15))
            .user_agent("roster/0.1.0")
            .build()?;
        Ok(Self { http, cfg })
    }
}

#[async_trait]
impl MarketSource for PolymarketSource {
    type Record = PredictionMarket;

    fn display_name(&self) -> &str {
        "Polymarket"
    }

    async fn fetch(&self) -> Result<Vec<PredictionMarket>, FetchError> {
        let url = format!("{}/markets", self.cfg.api_url);
        debug!(url = %url, limit = self.cfg.limit, "Fetching Polymarket listings");

        let resp = self
            .http
            .get(&url)
            .query(&[
                ("active", "true"),
                ("closed", "false"),
                ("limit", &self.cfg.limit.to_string()),
            ])
            .send()
            .await?
            .error_for_status()?;

        let raw: Vec<RawMarket> = resp.json().await.map_err(FetchError::schema)?;
        Ok(normalize(&raw))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(outcomes: &str, prices: &str) -> RawMarket {
        RawMarket {
            id: "m1".into(),
            question: "Will it happen?".into(),
            category: "Politics".into(),
            volume_num: 1_500_000.0,
            outcomes: outcomes.into(),
            outcome_prices: prices.into(),
            image: None,
        }
    }

    #[test]
    fn test_normalize_two_outcomes() {
        let market = normalize_market(&raw(r#"["Yes","No"]"#, r#"["0.65","0.35"]"#));
        assert_eq!(market.id, "m1");
        assert_eq!(market.volume_formatted, "1.5M");
        assert_eq!(market.outcomes.len(), 2);
        assert_eq!(market.outcomes[0], Outcome { label: "Yes".into(), implied_pct: 65 });
        assert_eq!(market.outcomes[1], Outcome { label: "No".into(), implied_pct: 35 });
    }

    #[test]
    fn test_normalize_truncates_to_two_outcomes() {
        let market = normalize_market(&raw(
            r#"["A","B","C","D"]"#,
            r#"["0.4","0.3","0.2","0.1"]"#,
        ));
        assert_eq!(market.outcomes.len(), 2);
        assert_eq!(market.outcomes[0].label, "A");
        assert_eq!(market.outcomes[1].label, "B");
    }

    #[test]
    fn test_normalize_unparseable_outcomes_defaults() {
        let market = normalize_market(&raw("not json at all", "also not json"));
        assert_eq!(market.outcomes.len(), 2);
        assert_eq!(market.outcomes[0], Outcome { label: "Yes".into(), implied_pct: 0 });
        assert_eq!(market.outcomes[1], Outcome { label: "No".into(), implied_pct: 0 });
    }

    #[test]
    fn test_normalize_prices_shorter_than_outcomes() {
        let market = normalize_market(&raw(r#"["Yes","No"]"#, r#"["0.8"]"#));
        assert_eq!(market.outcomes[0].implied_pct, 80);
        assert_eq!(market.outcomes[1].implied_pct, 0);
    }

    #[test]
    fn test_normalize_numeric_prices() {
        let market = normalize_market(&raw(r#"["Yes","No"]"#, "[0.725, 0.275]"));
        // round(0.725 * 100) = 73
        assert_eq!(market.outcomes[0].implied_pct, 73);
        assert_eq!(market.outcomes[1].implied_pct, 28);
    }

    #[test]
    fn test_normalize_out_of_range_price_clamped() {
        let market = normalize_market(&raw(r#"["Yes","No"]"#, r#"["1.5","-0.2"]"#));
        assert_eq!(market.outcomes[0].implied_pct, 100);
        assert_eq!(market.outcomes[1].implied_pct, 0);
    }

    #[test]
    fn test_normalize_missing_fields() {
        let raw: Vec<RawMarket> = serde_json::from_str(r#"[{"id": "bare"}]"#).unwrap();
        let markets = normalize(&raw);
        assert_eq!(markets[0].id, "bare");
        assert_eq!(markets[0].volume_formatted, "0");
        // Empty strings fail to parse as arrays: full defaults apply.
        assert_eq!(markets[0].outcomes.len(), 2);
        assert_eq!(markets[0].outcomes[0].label, "Yes");
    }

    #[test]
    fn test_format_volume() {
        assert_eq!(format_volume(1_500_000.0), "1.5M");
        assert_eq!(format_volume(2_300.0), "2.3K");
        assert_eq!(format_volume(999.0), "999");
        assert_eq!(format_volume(999.6), "1000");
        assert_eq!(format_volume(0.0), "0");
    }
}
