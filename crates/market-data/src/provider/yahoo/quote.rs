use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::MarketDataError;
use crate::provider::convert;

/// One row of the Yahoo! Finance historical CSV
/// (`Date,Open,High,Low,Close,Volume,Adj Close`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct YahooHistoricalQuote {
    pub date: NaiveDate,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: i64,
    /// Close adjusted for splits and dividends.
    pub adj_close: Decimal,
}

impl YahooHistoricalQuote {
    /// Parses one CSV line. The layout is taken as fixed: exactly 7
    /// comma-separated fields, dates as `yyyy-MM-dd`, point decimals.
    pub fn parse(line: &str) -> Result<Self, MarketDataError> {
        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() != 7 {
            return Err(MarketDataError::malformed(format!(
                "the csv line has a wrong number of items: 7 expected, {} found",
                fields.len()
            )));
        }

        Ok(Self {
            date: convert::date(fields[0], "%Y-%m-%d")?,
            open: convert::point_decimal(fields[1])?,
            high: convert::point_decimal(fields[2])?,
            low: convert::point_decimal(fields[3])?,
            close: convert::point_decimal(fields[4])?,
            volume: convert::integer(fields[5])?,
            adj_close: convert::point_decimal(fields[6])?,
        })
    }
}
