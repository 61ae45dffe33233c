use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One daily EUR reference rate from the European Central Bank feed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EcbQuote {
    pub date: NaiveDate,
    /// Units of the target currency per one euro.
    pub value: Decimal,
}
