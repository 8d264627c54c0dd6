//! External market data sources.
//!
//! Defines the `MarketSource` trait and provides one implementation per
//! source: spot crypto (CoinGecko), perpetual futures (Hyperliquid),
//! prediction markets (Polymarket Gamma), and news (CryptoCompare).
//!
//! Each module owns its raw payload types and a pure `normalize` function
//! so the mapping into canonical records is testable without network
//! access. Sources are fully independent of one another.

pub mod coingecko;
pub mod cryptocompare;
pub mod hyperliquid;
pub mod polymarket;

use async_trait::async_trait;

use crate::types::FetchError;

/// Abstraction over one external market data source.
///
/// Implementors own the request/response round-trip and delegate payload
/// mapping to their normalizer. The generic `SourceFetcher` drives the
/// loading/refreshing/error lifecycle on top of this.
#[async_trait]
pub trait MarketSource: Send + Sync {
    /// The canonical record type this source produces.
    type Record: Send;

    /// Human-readable source name used in logs and error messages.
    fn display_name(&self) -> &str;

    /// Perform one full fetch: request, decode, normalize.
    async fn fetch(&self) -> Result<Vec<Self::Record>, FetchError>;
}
