//! roster — multi-source market data core with team selection.
//!
//! Library crate exposing all modules for use by integration tests
//! and the binary entry point.

pub mod config;
pub mod fetcher;
pub mod sources;
pub mod team;
pub mod types;
