//! Crypto news from the CryptoCompare news feed.
//!
//! API: `https://min-api.cryptocompare.com/data/v2/news/?lang=EN`
//! No auth required for the public feed.
//!
//! The envelope carries its own status: `Type` must equal 100 for a
//! successful response. Anything else is a source-reported failure even
//! when the HTTP exchange itself succeeded.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::MarketSource;
use crate::config::NewsConfig;
use crate::types::{FetchError, NewsArticle};

const SUCCESS_TYPE: i64 = 100;

// ---------------------------------------------------------------------------
// Raw response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct RawFeed {
    #[serde(default, rename = "Type")]
    pub type_code: i64,
    #[serde(default, rename = "Message")]
    pub message: String,
    #[serde(default, rename = "Data")]
    pub data: Vec<RawArticle>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RawArticle {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub imageurl: String,
    #[serde(default)]
    pub published_on: i64,
    #[serde(default)]
    pub source_info: RawSourceInfo,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct RawSourceInfo {
    #[serde(default)]
    pub name: String,
}

// ---------------------------------------------------------------------------
// Normalizer
// ---------------------------------------------------------------------------

/// Map raw articles into canonical records.
///
/// Ids are fetch-order indices (the feed carries no stable id we consume).
/// A missing `source_info` degrades to an empty source name; an empty
/// image URL becomes `None`. Never fails.
pub fn normalize(raw: &[RawArticle]) -> Vec<NewsArticle> {
    raw.iter()
        .enumerate()
        .map(|(i, article)| NewsArticle {
            id: i.to_string(),
            title: article.title.clone(),
            body: article.body.clone(),
            image_url: if article.imageurl.is_empty() {
                None
            } else {
                Some(article.imageurl.clone())
            },
            source_name: article.source_info.name.clone(),
            published_at: DateTime::<Utc>::from_timestamp(article.published_on, 0)
                .unwrap_or(DateTime::UNIX_EPOCH),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Source
// ---------------------------------------------------------------------------

pub struct CryptoCompareSource {
    http: Client,
    cfg: NewsConfig,
}

impl CryptoCompareSource {
    pub fn new(cfg: NewsConfig) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(15))
            .user_agent("roster/0.1.0")
            .build()?;
        Ok(Self { http, cfg })
    }
}

#[async_trait]
impl MarketSource for CryptoCompareSource {
    type Record = NewsArticle;

    fn display_name(&self) -> &str {
        "crypto news"
    }

    async fn fetch(&self) -> Result<Vec<NewsArticle>, FetchError> {
        debug!(url = %self.cfg.api_url, lang = %self.cfg.lang, "Fetching news feed");

        let resp = self
            .http
            .get(&self.cfg.api_url)
            .query(&[("lang", self.cfg.lang.as_str())])
            .send()
            .await?
            .error_for_status()?;

        let feed: RawFeed = resp.json().await.map_err(FetchError::schema)?;

        if feed.type_code != SUCCESS_TYPE {
            return Err(FetchError::SourceReported(format!(
                "news feed returned Type {}: {}",
                feed.type_code,
                if feed.message.is_empty() { "no message" } else { feed.message.as_str() },
            )));
        }

        Ok(normalize(&feed.data))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
