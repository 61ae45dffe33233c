//! Field conversions shared by the vendor parsers.
//!
//! Vendors disagree on locale: Yahoo and the ECB write `1,234.56` while the
//! current MEFF format writes `1.234,56`. Every failure maps to
//! [`MarketDataError::MalformedData`], indistinguishable from a wrong field
//! count, so a bad line always aborts the retrieval the same way.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::errors::MarketDataError;

/// Parses a date field after trimming padding, using a `chrono` format
/// string (`%Y-%m-%d`, `%Y%m%d` or `%y%m%d` depending on vendor and era).
pub(crate) fn date(field: &str, format: &str) -> Result<NaiveDate, MarketDataError> {
    let field = field.trim();
    NaiveDate::parse_from_str(field, format)
        .map_err(|e| MarketDataError::malformed(format!("unparseable date {field:?}: {e}")))
}

/// Parses a decimal written with `.` as decimal separator and `,` as group
/// separator (Yahoo, ECB, legacy MEFF).
pub(crate) fn point_decimal(field: &str) -> Result<Decimal, MarketDataError> {
    let cleaned = field.trim().replace(',', "");
    Decimal::from_str(&cleaned)
        .map_err(|e| MarketDataError::malformed(format!("unparseable number {field:?}: {e}")))
}

/// Parses a decimal written with `,` as decimal separator and `.` as group
/// separator (current MEFF format).
pub(crate) fn comma_decimal(field: &str) -> Result<Decimal, MarketDataError> {
    let cleaned = field.trim().replace('.', "").replace(',', ".");
    Decimal::from_str(&cleaned)
        .map_err(|e| MarketDataError::malformed(format!("unparseable number {field:?}: {e}")))
}

/// Parses an integer field after trimming padding.
pub(crate) fn integer(field: &str) -> Result<i64, MarketDataError> {
    let field = field.trim();
    field
        .parse()
        .map_err(|e| MarketDataError::malformed(format!("unparseable integer {field:?}: {e}")))
}
