//! MEFF derivatives exchange historical quotes provider.
//!
//! The download area distributes one ZIP archive per period; the period
//! granularity and the row layout inside depend on the era (see
//! [`QuoteFormat`]). Retrieval walks every period covering the requested
//! range in chronological order, funnels each archive through the payload
//! cache, decompresses every entry, and keeps the rows matching the
//! requested contract and dates.
//!
//! Archives exist in two datasets: equity ("acciones") and index (IBEX)
//! files. When the equity dataset yields nothing for the first scanned
//! year, the same year is retried against the index dataset before giving
//! up.

mod archive;
mod quote;

pub use quote::{MeffHistoricalQuote, QuoteFormat};

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use tracing::debug;

use crate::cache::PayloadCache;
use crate::errors::MarketDataError;
use crate::models::DateRange;
use crate::provider::QuoteSource;
use crate::transport::{HttpFetcher, LineSplitter};

const BASE_URL: &str = "http://www.meff.es";
const PROVIDER_ID: &str = "MEFF";

/// CFI codes of the equity option rows an option-surface assembler consumes.
const OPTION_CFI_CODES: [&str; 2] = ["OPASPS", "OCASPS"];

/// Which download dataset an archive belongs to.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Dataset {
    /// Equity ("acciones") archives.
    Actions,
    /// Index (IBEX) archives.
    Index,
}

impl Dataset {
    fn current_tag(self) -> &'static str {
        match self {
            Self::Actions => "ACO",
            Self::Index => "FIE",
        }
    }

    fn legacy_tag(self) -> &'static str {
        match self {
            Self::Actions => "a",
            Self::Index => "i",
        }
    }
}

/// Provider for MEFF historical contract sessions.
///
/// The payload cache is injected so the caller scopes its lifetime; the
/// same monthly archive is re-requested for every ticker in an outer loop,
/// which the memory tier absorbs.
pub struct MeffProvider {
    fetcher: HttpFetcher,
    cache: PayloadCache,
    base_url: String,
}

impl MeffProvider {
    /// A provider talking to the real MEFF host.
    pub fn new(cache: PayloadCache) -> Self {
        Self::with_base_url(BASE_URL, cache)
    }

    /// A provider pointed at a different host (used by tests).
    pub fn with_base_url(base_url: impl Into<String>, cache: PayloadCache) -> Self {
        Self {
            fetcher: HttpFetcher::new(PROVIDER_ID),
            cache,
            base_url: base_url.into(),
        }
    }

    /// Option rows for one session date, for an external option-surface
    /// assembler. Scans the equity archives first and falls back to the
    /// index archives only when no option row matches.
    pub async fn options_for_date(
        &self,
        ticker: &str,
        date: NaiveDate,
    ) -> Result<Vec<MeffHistoricalQuote>, MarketDataError> {
        let format = QuoteFormat::for_year(date.year())?;
        let mut quotes = Vec::new();

        for dataset in [Dataset::Actions, Dataset::Index] {
            let url = self.archive_url(date.year(), date.month(), format, dataset);
            let payload = self.cache.resolve(&self.fetcher, &url).await?;
            scan_payload(&payload, format, |quote| {
                if quote.session_date == date
                    && OPTION_CFI_CODES.contains(&quote.cfi_code.as_str())
                    && quote
                        .contract_code
                        .get(1..)
                        .is_some_and(|rest| rest.starts_with(ticker))
                {
                    quotes.push(quote);
                }
            })?;

            if !quotes.is_empty() {
                break;
            }
        }

        Ok(quotes)
    }

    async fn collect_month(
        &self,
        ticker: &str,
        range: &DateRange,
        year: i32,
        month: u32,
        format: QuoteFormat,
        dataset: Dataset,
        quotes: &mut Vec<MeffHistoricalQuote>,
    ) -> Result<(), MarketDataError> {
        let url = self.archive_url(year, month, format, dataset);
        let payload = self.cache.resolve(&self.fetcher, &url).await?;
        scan_payload(&payload, format, |quote| {
            if quote.contract_code == ticker && range.contains(quote.session_date) {
                quotes.push(quote);
            }
        })
    }

    fn archive_url(&self, year: i32, month: u32, format: QuoteFormat, dataset: Dataset) -> String {
        let yy = year.rem_euclid(100);
        let name = match format {
            QuoteFormat::Current => {
                format!("HP{yy:02}{month:02}{}.zip", dataset.current_tag())
            }
            QuoteFormat::OldestLegacy => {
                // One archive covers the whole year.
                format!("HP{yy:02}000{}.zip", dataset.legacy_tag())
            }
            QuoteFormat::Legacy => {
                // Semester archives: "1s" covers January-June, "00" the rest.
                format!(
                    "HP{yy:02}{}0{}.zip",
                    if month <= 6 { "1s" } else { "00" },
                    dataset.legacy_tag()
                )
            }
        };
        format!("{}/docs/Ficheros/Descarga/dRV/{}", self.base_url, name)
    }
}

/// Months to request for one year of the range, matching the era's archive
/// granularity. Periods come out in increasing order so concatenated
/// results stay chronological.
fn months_for_year(format: QuoteFormat, year: i32, range: &DateRange) -> Vec<u32> {
    let start = if year == range.start().year() {
        range.start().month()
    } else {
        1
    };
    let end = if year == range.end().year() {
        range.end().month()
    } else {
        12
    };

    match format {
        QuoteFormat::OldestLegacy => vec![1],
        QuoteFormat::Legacy => (start..=end).step_by(6).collect(),
        QuoteFormat::Current => (start..=end).collect(),
    }
}

/// Runs every line of every archive entry through the parser and hands the
/// resulting rows to `consider`.
fn scan_payload(
    payload: &[u8],
    format: QuoteFormat,
    mut consider: impl FnMut(MeffHistoricalQuote),
) -> Result<(), MarketDataError> {
    for entry in archive::entries(payload)? {
        debug!("scanning archive entry {}", entry.name);

        let mut splitter = LineSplitter::windows_1252();
        splitter.push(&entry.data);
        while let Some(line) = splitter.pop_line() {
            consider(MeffHistoricalQuote::parse(&line, format)?);
        }
        if let Some(line) = splitter.finish() {
            consider(MeffHistoricalQuote::parse(&line, format)?);
        }
    }
    Ok(())
}

#[async_trait]
impl QuoteSource for MeffProvider {
    type Quote = MeffHistoricalQuote;

    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn historical_quotes(
        &self,
        ticker: &str,
        range: DateRange,
    ) -> Result<Vec<MeffHistoricalQuote>, MarketDataError> {
        debug!(
            "fetching historical quotes for {ticker} from {} to {}",
            range.start(),
            range.end()
        );

        let mut dataset = Dataset::Actions;
        let mut quotes = Vec::new();
        let mut year = range.start().year();

        while year <= range.end().year() {
            let format = QuoteFormat::for_year(year)?;
            for month in months_for_year(format, year, &range) {
                self.collect_month(ticker, &range, year, month, format, dataset, &mut quotes)
                    .await?;
            }

            // Era boundaries sometimes leave the equity dataset without any
            // rows; retry the same year from the index archives before
            // concluding there is nothing.
            if quotes.is_empty() {
                match dataset {
                    Dataset::Actions => {
                        dataset = Dataset::Index;
                        continue;
                    }
                    Dataset::Index => break,
                }
            }
            year += 1;
        }

        Ok(quotes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range_of(start: (i32, u32, u32), end: (i32, u32, u32)) -> DateRange {
        DateRange::new(
            NaiveDate::from_ymd_opt(start.0, start.1, start.2).unwrap(),
            NaiveDate::from_ymd_opt(end.0, end.1, end.2).unwrap(),
        )
    }

    fn provider() -> MeffProvider {
        MeffProvider::new(PayloadCache::new("unused"))
    }

    #[test]
    fn current_archive_urls_are_monthly() {
        let provider = provider();
        assert_eq!(
            provider.archive_url(2013, 7, QuoteFormat::Current, Dataset::Actions),
            "http://www.meff.es/docs/Ficheros/Descarga/dRV/HP1307ACO.zip"
        );
        assert_eq!(
            provider.archive_url(2013, 7, QuoteFormat::Current, Dataset::Index),
            "http://www.meff.es/docs/Ficheros/Descarga/dRV/HP1307FIE.zip"
        );
    }

    #[test]
    fn oldest_archive_urls_cover_the_year() {
        let provider = provider();
        assert_eq!(
            provider.archive_url(1997, 4, QuoteFormat::OldestLegacy, Dataset::Actions),
            "http://www.meff.es/docs/Ficheros/Descarga/dRV/HP97000a.zip"
        );
        assert_eq!(
            provider.archive_url(2000, 11, QuoteFormat::OldestLegacy, Dataset::Index),
            "http://www.meff.es/docs/Ficheros/Descarga/dRV/HP00000i.zip"
        );
    }

    #[test]
    fn legacy_archive_urls_cover_semesters() {
        let provider = provider();
        assert_eq!(
            provider.archive_url(2004, 3, QuoteFormat::Legacy, Dataset::Actions),
            "http://www.meff.es/docs/Ficheros/Descarga/dRV/HP041s0a.zip"
        );
        assert_eq!(
            provider.archive_url(2004, 9, QuoteFormat::Legacy, Dataset::Actions),
            "http://www.meff.es/docs/Ficheros/Descarga/dRV/HP04000a.zip"
        );
    }

    #[test]
    fn current_era_visits_every_month_exactly_once() {
        let range = range_of((2013, 3, 15), (2013, 7, 2));
        assert_eq!(
            months_for_year(QuoteFormat::Current, 2013, &range),
            vec![3, 4, 5, 6, 7]
        );
    }

    #[test]
    fn middle_years_of_a_range_cover_january_to_december() {
        let range = range_of((2012, 11, 1), (2014, 2, 28));
        assert_eq!(
            months_for_year(QuoteFormat::Current, 2013, &range),
            (1..=12).collect::<Vec<_>>()
        );
        assert_eq!(
            months_for_year(QuoteFormat::Current, 2012, &range),
            vec![11, 12]
        );
        assert_eq!(
            months_for_year(QuoteFormat::Current, 2014, &range),
            vec![1, 2]
        );
    }

    #[test]
    fn legacy_era_steps_by_semester() {
        let range = range_of((2004, 1, 1), (2004, 12, 31));
        assert_eq!(
            months_for_year(QuoteFormat::Legacy, 2004, &range),
            vec![1, 7]
        );

        let partial = range_of((2004, 3, 1), (2004, 10, 31));
        assert_eq!(
            months_for_year(QuoteFormat::Legacy, 2004, &partial),
            vec![3, 9]
        );
    }

    #[test]
    fn oldest_era_requests_a_single_archive() {
        let range = range_of((1999, 2, 1), (1999, 11, 30));
        assert_eq!(
            months_for_year(QuoteFormat::OldestLegacy, 1999, &range),
            vec![1]
        );
    }
}
