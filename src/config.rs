//! Configuration loading from TOML.
//!
//! Reads `config.toml` and deserializes into strongly-typed structs.
//! All sources are public and unauthenticated, so there are no secrets
//! here — just endpoints and request parameters. The loaded config is
//! constructed once at startup and passed down explicitly.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// Seconds between refresh cycles in the binary's main loop.
    pub refresh_interval_secs: u64,
    pub team: TeamConfig,
    pub sources: SourcesConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TeamConfig {
    /// Maximum number of distinct assets in the team.
    pub capacity: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SourcesConfig {
    pub coingecko: CoinGeckoConfig,
    pub hyperliquid: HyperliquidConfig,
    pub polymarket: PolymarketConfig,
    pub news: NewsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CoinGeckoConfig {
    pub api_url: String,
    pub vs_currency: String,
    pub order: String,
    pub per_page: u32,
    pub page: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct HyperliquidConfig {
    pub api_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PolymarketConfig {
    pub api_url: String,
    pub limit: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct NewsConfig {
    pub api_url: String,
    pub lang: String,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        let config: AppConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {path}"))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let toml_str = r#"
            refresh_interval_secs = 60

            [team]
            capacity = 5

            [sources.coingecko]
            api_url = "https://api.coingecko.com/api/v3"
            vs_currency = "usd"
            order = "market_cap_desc"
            per_page = 50
            page = 1

            [sources.hyperliquid]
            api_url = "https://api.hyperliquid.xyz"

            [sources.polymarket]
            api_url = "https://gamma-api.polymarket.com"
            limit = 10

            [sources.news]
            api_url = "https://min-api.cryptocompare.com/data/v2/news/"
            lang = "EN"
        "#;
        let cfg: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(cfg.refresh_interval_secs, 60);
        assert_eq!(cfg.team.capacity, 5);
        assert_eq!(cfg.sources.coingecko.per_page, 50);
        assert_eq!(cfg.sources.polymarket.limit, 10);
        assert_eq!(cfg.sources.news.lang, "EN");
    }

    #[test]
    fn test_parse_config_missing_section_fails() {
        let result: std::result::Result<AppConfig, _> =
            toml::from_str("refresh_interval_secs = 60");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_file() {
        // Requires config.toml in the working directory (present in the repo
        // root; cargo runs unit tests from there).
        if let Ok(cfg) = AppConfig::load("config.toml") {
            assert_eq!(cfg.team.capacity, 5);
            assert!(cfg.sources.coingecko.api_url.starts_with("https://"));
        }
    }
}
