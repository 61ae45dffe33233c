//! Yahoo! Finance historical quotes provider.
//!
//! Implements the CSV historical-quotes download API: one GET per request
//! with the date range decomposed into query parameters, a header line, then
//! one `Date,Open,High,Low,Close,Volume,Adj Close` row per session. Rows
//! arrive newest first and are returned in that order.

mod quote;

pub use quote::YahooHistoricalQuote;

use async_trait::async_trait;
use chrono::Datelike;
use tracing::debug;
use urlencoding::encode;

use crate::errors::MarketDataError;
use crate::models::DateRange;
use crate::provider::QuoteSource;
use crate::transport::{HttpFetcher, LineSplitter};

const BASE_URL: &str = "http://ichart.yahoo.com";
const PROVIDER_ID: &str = "Yahoo! Finance";

/// Provider for Yahoo! Finance historical daily quotes.
pub struct YahooProvider {
    fetcher: HttpFetcher,
    base_url: String,
}

impl Default for YahooProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl YahooProvider {
    /// A provider talking to the real Yahoo! Finance host.
    pub fn new() -> Self {
        Self::with_base_url(BASE_URL)
    }

    /// A provider pointed at a different host (used by tests).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            fetcher: HttpFetcher::new(PROVIDER_ID),
            base_url: base_url.into(),
        }
    }

    // Months are zero-based in this API.
    fn history_url(&self, ticker: &str, range: &DateRange) -> String {
        let (start, end) = (range.start(), range.end());
        format!(
            "{}/table.csv?s={}&a={}&b={}&c={}&d={}&e={}&f={}&ignore=.csv",
            self.base_url,
            encode(ticker),
            start.month0(),
            start.day(),
            start.year(),
            end.month0(),
            end.day(),
            end.year(),
        )
    }
}

#[async_trait]
impl QuoteSource for YahooProvider {
    type Quote = YahooHistoricalQuote;

    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn historical_quotes(
        &self,
        ticker: &str,
        range: DateRange,
    ) -> Result<Vec<YahooHistoricalQuote>, MarketDataError> {
        debug!(
            "fetching historical quotes for {ticker} from {} to {}",
            range.start(),
            range.end()
        );

        let body = self.fetcher.fetch(&self.history_url(ticker, &range)).await?;

        let mut splitter = LineSplitter::utf8();
        splitter.push(&body);

        let mut quotes = Vec::new();
        let mut header_seen = false;
        let mut take = |line: &str| -> Result<(), MarketDataError> {
            let quote = YahooHistoricalQuote::parse(line)?;
            if range.contains(quote.date) {
                quotes.push(quote);
            }
            Ok(())
        };

        while let Some(line) = splitter.pop_line() {
            if !header_seen {
                header_seen = true;
                continue;
            }
            take(&line)?;
        }
        if let Some(line) = splitter.finish() {
            if header_seen {
                take(&line)?;
            }
        }

        Ok(quotes)
    }
}
