//! Shared types for the roster core.
//!
//! These are the canonical, source-agnostic records each screen renders,
//! plus the selection types and the fetch error taxonomy. Each source's
//! normalizer produces exactly one of the record types below; no attempt
//! is made to merge records across sources.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Canonical records
// ---------------------------------------------------------------------------

/// A spot cryptocurrency listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotAsset {
    /// Source-assigned unique identifier (e.g. "bitcoin").
    pub id: String,
    pub display_name: String,
    pub symbol_upper: String,
    /// Current price in USD. Never negative.
    pub price_usd: f64,
    pub change_pct_24h: f64,
}

impl fmt::Display for SpotAsset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}) ${:.2} {}{:.2}%",
            self.display_name,
            self.symbol_upper,
            self.price_usd,
            if self.change_pct_24h >= 0.0 { "+" } else { "" },
            self.change_pct_24h,
        )
    }
}

/// A perpetual futures market.
///
/// The string fields are display-formatted at normalization time (fixed
/// decimals, thousands grouping) to match what the screen renders directly.
/// `change_pct_24h` is `"0.00"` when the previous-day price is zero or the
/// asset context is missing — a safe default, not a market fact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerpMarket {
    pub id: String,
    pub display_name: String,
    pub mark_price_usd: f64,
    /// 24h change in percent, two decimals (e.g. "25.00").
    pub change_pct_24h: String,
    /// 24h notional volume in USD, comma-grouped (e.g. "500,000").
    pub volume_24h: String,
    /// Hourly funding rate in percent, four decimals (e.g. "0.0100").
    pub funding_rate_pct: String,
    /// Open interest in USD, comma-grouped (e.g. "2,000").
    pub open_interest: String,
    pub max_leverage: u32,
}

impl PerpMarket {
    /// Display ticker with the conventional perp suffix.
    pub fn ticker(&self) -> String {
        format!("{}-PERP", self.display_name)
    }
}

impl fmt::Display for PerpMarket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ${:.2} ({}%) vol=${} funding={}% OI=${} {}x",
            self.ticker(),
            self.mark_price_usd,
            self.change_pct_24h,
            self.volume_24h,
            self.funding_rate_pct,
            self.open_interest,
            self.max_leverage,
        )
    }
}

/// One outcome of a prediction market.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub label: String,
    /// Implied probability in whole percent, 0..=100.
    pub implied_pct: u8,
}

/// A prediction market listing.
///
/// At most the first two outcome/price pairs are surfaced regardless of how
/// many outcomes exist upstream — an explicit truncation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionMarket {
    pub id: String,
    pub question: String,
    pub category: String,
    /// Abbreviated volume, e.g. "1.5M", "2.3K", "999".
    pub volume_formatted: String,
    pub outcomes: Vec<Outcome>,
}

impl fmt::Display for PredictionMarket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let outcomes: Vec<String> = self
            .outcomes
            .iter()
            .map(|o| format!("{} {}%", o.label, o.implied_pct))
            .collect();
        write!(
            f,
            "[{}] {} (vol: {}) {}",
            self.category,
            self.question,
            self.volume_formatted,
            outcomes.join(" | "),
        )
    }
}

/// A news article.
///
/// `id` is the fetch-order index within one response, not a source-stable
/// identifier — it is only meaningful relative to a single fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsArticle {
    pub id: String,
    pub title: String,
    pub body: String,
    pub image_url: Option<String>,
    pub source_name: String,
    pub published_at: DateTime<Utc>,
}

impl fmt::Display for NewsArticle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} ({})",
            self.source_name,
            self.title,
            self.published_at.format("%Y-%m-%d"),
        )
    }
}

// ---------------------------------------------------------------------------
// Selection types
// ---------------------------------------------------------------------------

/// Direction of a user's bet on an asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    /// The opposite direction.
    pub fn opposite(&self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => write!(f, "UP"),
            Direction::Down => write!(f, "DOWN"),
        }
    }
}

/// One selected asset with its chosen direction.
///
/// Lives only for the current session; owned exclusively by the
/// selection engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionEntry {
    /// References a `SpotAsset::id`.
    pub asset_id: String,
    pub direction: Direction,
}

// ---------------------------------------------------------------------------
// Fetch error taxonomy
// ---------------------------------------------------------------------------

/// Failure modes of one source fetch.
///
/// All three collapse to a single human-readable error string at the
/// fetcher boundary; the taxonomy is preserved for logging only.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Network or HTTP-level failure (includes non-2xx statuses).
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    /// Payload delivered but unparseable beyond what defaults cover.
    #[error("schema failure: {0}")]
    Schema(String),

    /// Payload itself signals failure (e.g. an embedded status code)
    /// despite a successful transport exchange.
    #[error("source reported failure: {0}")]
    SourceReported(String),
}

impl FetchError {
    /// Short kind tag for structured log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Transport(_) => "transport",
            FetchError::Schema(_) => "schema",
            FetchError::SourceReported(_) => "source_reported",
        }
    }

    pub fn schema(err: impl fmt::Display) -> Self {
        FetchError::Schema(err.to_string())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
