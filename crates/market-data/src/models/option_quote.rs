use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Call/put side of an option row.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum OptionType {
    Call,
    Put,
}

/// Exercise style of an option row.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum OptionStyle {
    European,
    American,
}

/// Read access shared by vendor option rows.
///
/// An option-surface assembler can consume any vendor's quotes through this
/// trait without knowing which provider produced them.
pub trait OptionQuote {
    /// Reference price of the option (the settlement price for MEFF rows).
    fn price(&self) -> Decimal;

    /// Strike price.
    fn strike(&self) -> Decimal;

    /// Expiration date of the contract.
    fn maturity(&self) -> NaiveDate;

    /// Call or put; `None` when the row is not an option (e.g. a future).
    fn option_type(&self) -> Option<OptionType>;

    /// End-of-day settlement volatility; zero when the vendor omits it.
    fn volatility(&self) -> Decimal;

    /// Registered volume for the session.
    fn volume(&self) -> Decimal;

    /// Exercise style; MEFF equity options are European.
    fn style(&self) -> OptionStyle {
        OptionStyle::European
    }
}
