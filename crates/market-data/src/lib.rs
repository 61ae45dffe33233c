//! Historical market data adapters
//!
//! This crate fetches and parses historical price data from three vendors —
//! Yahoo! Finance, the European Central Bank exchange-rate feed, and the
//! MEFF derivatives exchange — and exposes the results as typed records for
//! a host application to map into its own market-data representations.
//!
//! # Architecture
//!
//! ```text
//! +-----------------+     +------------------+
//! |  HttpFetcher    | --> |  PayloadCache    |  (MEFF only: memory + disk)
//! +-----------------+     +------------------+
//!          |                       |
//!          v                       v
//! +-----------------+     +------------------+
//! |  raw payload    | --> |  ZIP entries     |  (MEFF only)
//! +-----------------+     +------------------+
//!          |
//!          v
//! +-----------------+     +------------------+
//! |  LineSplitter   | --> |  record parsers  |  (per vendor, per era)
//! +-----------------+     +------------------+
//!          |
//!          v
//! +-----------------+
//! |  range filter   | --> ordered Vec of vendor records
//! +-----------------+
//! ```
//!
//! # Core Types
//!
//! - [`QuoteSource`] - Provider seam: `historical_quotes(ticker, range)`
//! - [`YahooHistoricalQuote`], [`EcbQuote`], [`MeffHistoricalQuote`] - Vendor records
//! - [`QuoteFormat`] - MEFF file-layout eras
//! - [`DateRange`] - Closed date interval, inclusive on both ends
//! - [`PayloadCache`] - Injected two-tier byte cache for MEFF archives
//! - [`OptionQuote`] - Polymorphic read access to option rows
//! - [`MarketDataError`] - Contact / malformed-data / cache-IO error kinds
//!
//! Retrieval is sequential: one request at a time, periods in chronological
//! order, and a fully materialized list (or an error) at the end. Zero
//! matching records is returned as an empty list, not an error.

pub mod cache;
pub mod errors;
pub mod models;
pub mod provider;
pub mod transport;

// Re-export the public surface from the submodules
pub use cache::PayloadCache;
pub use errors::MarketDataError;
pub use models::{DateRange, OptionQuote, OptionStyle, OptionType};
pub use provider::ecb::{EcbProvider, EcbQuote};
pub use provider::meff::{MeffHistoricalQuote, MeffProvider, QuoteFormat};
pub use provider::yahoo::{YahooHistoricalQuote, YahooProvider};
pub use provider::QuoteSource;
pub use transport::{HttpFetcher, LineSplitter};
