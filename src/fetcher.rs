//! Generic per-source fetch lifecycle.
//!
//! One `SourceFetcher` instance owns one source's asynchronous round-trip
//! and its loading/refreshing/error/data state. The same lifecycle is
//! instantiated once per source instead of hand-duplicated per screen.
//!
//! Failure semantics: transport, schema, and source-reported failures are
//! all caught here and collapsed to one human-readable error string; the
//! taxonomy survives only in the logs. Nothing propagates past this layer,
//! and a failure in one fetcher never touches another's state.

use tracing::{debug, info, warn};

use crate::sources::MarketSource;

/// Per-source fetch state.
///
/// `error` being set implies `data` still reflects the last successful
/// fetch (stale but valid), unless no fetch has ever succeeded.
#[derive(Debug, Clone)]
pub struct FetchState<T> {
    pub data: Vec<T>,
    pub loading: bool,
    pub refreshing: bool,
    pub error: Option<String>,
}

impl<T> Default for FetchState<T> {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            loading: false,
            refreshing: false,
            error: None,
        }
    }
}

impl<T> FetchState<T> {
    /// Whether a fetch is currently outstanding on either trigger path.
    pub fn in_flight(&self) -> bool {
        self.loading || self.refreshing
    }
}

/// Owner of one external source's fetch lifecycle.
pub struct SourceFetcher<S: MarketSource> {
    source: S,
    state: FetchState<S::Record>,
}

impl<S: MarketSource> SourceFetcher<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            state: FetchState::default(),
        }
    }

    pub fn name(&self) -> &str {
        self.source.display_name()
    }

    pub fn state(&self) -> &FetchState<S::Record> {
        &self.state
    }

    pub fn data(&self) -> &[S::Record] {
        &self.state.data
    }

    pub fn error(&self) -> Option<&str> {
        self.state.error.as_deref()
    }

    /// Initial load. No-op while a fetch is already in flight, so two
    /// triggers cannot interleave into a mixed state.
    pub async fn load(&mut self) {
        if self.state.in_flight() {
            debug!(source = self.name(), "Fetch already in flight, ignoring load");
            return;
        }
        self.state.loading = true;
        self.run().await;
    }

    /// Pull-to-refresh variant of `load()`: sets `refreshing` instead of
    /// `loading` so stale data keeps rendering underneath.
    pub async fn refresh(&mut self) {
        if self.state.in_flight() {
            debug!(source = self.name(), "Fetch already in flight, ignoring refresh");
            return;
        }
        self.state.refreshing = true;
        self.run().await;
    }

    /// User-initiated re-load from the error state. No-op unless an error
    /// is currently set.
    pub async fn retry(&mut self) {
        if self.state.error.is_none() {
            return;
        }
        self.load().await;
    }

    async fn run(&mut self) {
        match self.source.fetch().await {
            Ok(records) => {
                info!(source = self.name(), count = records.len(), "Fetch succeeded");
                self.state.data = records;
                self.state.error = None;
            }
            Err(e) => {
                warn!(
                    source = self.name(),
                    kind = e.kind(),
                    error = %e,
                    "Fetch failed"
                );
                // Prior data stays untouched: stale but valid.
                self.state.error = Some(format!(
                    "Failed to fetch {} data. Please try again.",
                    self.name(),
                ));
            }
        }
        // Unconditional on both paths.
        self.state.loading = false;
        self.state.refreshing = false;
    }

    #[cfg(test)]
    fn state_mut(&mut self) -> &mut FetchState<S::Record> {
        &mut self.state
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
