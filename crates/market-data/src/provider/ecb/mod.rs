//! European Central Bank exchange-rate provider.
//!
//! Reads the `eurofxref` historical XML feed: one document per target
//! currency, with an `Obs` element per session carrying `TIME_PERIOD` and
//! `OBS_VALUE` attributes. Only EUR-to-currency rates exist; the host
//! addresses them as `EUCF<CUR>`, `EUR<CUR>` or a bare currency code.

mod quote;

pub use quote::EcbQuote;

use async_trait::async_trait;
use quick_xml::events::BytesStart;
use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::debug;

use crate::errors::MarketDataError;
use crate::models::DateRange;
use crate::provider::{convert, QuoteSource};
use crate::transport::HttpFetcher;

const BASE_URL: &str = "http://www.ecb.int";
const PROVIDER_ID: &str = "European Central Bank";

/// Provider for the ECB euro foreign-exchange reference rates.
pub struct EcbProvider {
    fetcher: HttpFetcher,
    base_url: String,
}

impl Default for EcbProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl EcbProvider {
    /// A provider talking to the real ECB host.
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

    fn rates_url(&self, currency: &str) -> String {
        format!(
            "{}/stats/exchange/eurofxref/html/{}.xml",
            self.base_url,
            currency.to_lowercase()
        )
    }
}

/// Maps the host's ticker conventions to the feed's currency code.
fn currency_code(ticker: &str) -> Result<&str, MarketDataError> {
    if let Some(currency) = ticker.strip_prefix("EUCF") {
        if !currency.is_empty() {
            return Ok(currency);
        }
    }
    if let Some(currency) = ticker.strip_prefix("EUR") {
        if !currency.is_empty() {
            return Ok(currency);
        }
    }
    if ticker.len() == 3 {
        return Ok(ticker);
    }
    Err(MarketDataError::unavailable(format!(
        "only conversion rates from EUR to another currency are available, \
         {ticker} was requested"
    )))
}

/// Pulls every `Obs` element in `range` out of the feed document.
///
/// The feed lists observations newest first; the collected list is reversed
/// so callers always receive ascending dates.
fn parse_observations(xml: &[u8], range: &DateRange) -> Result<Vec<EcbQuote>, MarketDataError> {
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();
    let mut quotes = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(element)) | Ok(Event::Empty(element))
                if element.local_name().as_ref() == b"Obs" =>
            {
                let date = required_attribute(&element, "TIME_PERIOD")?;
                let value = required_attribute(&element, "OBS_VALUE")?;
                let quote = EcbQuote {
                    date: convert::date(&date, "%Y-%m-%d")?,
                    value: convert::point_decimal(&value)?,
                };
                if range.contains(quote.date) {
                    quotes.push(quote);
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(MarketDataError::malformed(format!(
                    "the data format is not valid: {e}"
                )))
            }
        }
        buf.clear();
    }

    quotes.reverse();
    Ok(quotes)
}

fn required_attribute(element: &BytesStart<'_>, name: &str) -> Result<String, MarketDataError> {
    let attribute = element
        .try_get_attribute(name)
        .map_err(|e| MarketDataError::malformed(format!("the data format is not valid: {e}")))?
        .ok_or_else(|| {
            MarketDataError::malformed(format!(
                "the data format is not valid: Obs element without {name}"
            ))
        })?;
    let value = attribute
        .unescape_value()
        .map_err(|e| MarketDataError::malformed(format!("the data format is not valid: {e}")))?;
    Ok(value.into_owned())
}

#[async_trait]
impl QuoteSource for EcbProvider {
    type Quote = EcbQuote;

    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn historical_quotes(
        &self,
        ticker: &str,
        range: DateRange,
    ) -> Result<Vec<EcbQuote>, MarketDataError> {
        let currency = currency_code(ticker)?;
        debug!(
            "fetching EUR/{currency} rates from {} to {}",
            range.start(),
            range.end()
        );

        let body = self.fetcher.fetch(&self.rates_url(currency)).await?;
        parse_observations(&body, &range)
    }
}
