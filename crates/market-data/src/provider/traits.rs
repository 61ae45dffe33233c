use async_trait::async_trait;

use crate::errors::MarketDataError;
use crate::models::DateRange;

/// A source of historical quotes for one vendor.
///
/// Each vendor produces its own record type; the host adapter maps those
/// records into its scalar / time-series representations. Zero matching
/// records is not an error — the empty vec is returned and the caller
/// decides whether that constitutes a failure.
#[async_trait]
pub trait QuoteSource: Send + Sync {
    /// The vendor-specific record this source produces.
    type Quote;

    /// Display name used in logs and error messages.
    fn id(&self) -> &'static str;

    /// Fetches every quote for `ticker` whose date falls inside `range`
    /// (both endpoints inclusive).
    ///
    /// The whole requested slice is returned or the call fails; there is no
    /// partial-success mode.
    async fn historical_quotes(
        &self,
        ticker: &str,
        range: DateRange,
    ) -> Result<Vec<Self::Quote>, MarketDataError>;
}
