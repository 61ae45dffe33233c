use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::MarketDataError;
use crate::models::{OptionQuote, OptionType};
use crate::provider::convert;

/// File layout eras used by the MEFF download area.
///
/// The era decides both how archives are grouped on the server and how each
/// line is laid out, so it is chosen once per session year and passed to the
/// single [`MeffHistoricalQuote::parse`] entry point.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum QuoteFormat {
    /// 2007 onwards: monthly archives, semicolon-delimited 18-field rows.
    /// Text fields are quote-wrapped; decimals use Spanish separators
    /// (`1.234,56`).
    Current,
    /// 1998 and 2001-2006: semester archives, comma-delimited 16-field
    /// rows with point decimals.
    Legacy,
    /// 1993-1997 and 1999-2000: one archive per year. Same 16-field rows
    /// as [`Legacy`](Self::Legacy), with heavier space padding.
    OldestLegacy,
}

impl QuoteFormat {
    /// The era covering a given session year. Data starts in 1993.
    pub fn for_year(year: i32) -> Result<Self, MarketDataError> {
        if year < 1993 {
            return Err(MarketDataError::unavailable(
                "data is only available from year 1993 when using this market data provider",
            ));
        }
        Ok(match year {
            1993..=1997 | 1999..=2000 => Self::OldestLegacy,
            1998 | 2001..=2006 => Self::Legacy,
            _ => Self::Current,
        })
    }
}

/// A single historical session row from a MEFF archive.
///
/// The legacy eras simply do not distribute some of the fields; those keep
/// their defaults (see the field docs) instead of carrying stale data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MeffHistoricalQuote {
    /// Trading day the row pertains to.
    pub session_date: NaiveDate,
    /// Clearing-house / contract group code.
    pub contract_group: String,
    /// Contract identifier; the lookup key within a session date.
    pub contract_code: String,
    /// Subgroup code; not distributed in the legacy eras.
    pub contract_subgroup_code: Option<String>,
    /// ISO 10962 classification. Legacy rows only carry the instrument
    /// class letter, mapped to `F` for futures and `O` + class for options.
    pub cfi_code: String,
    pub strike_price: Decimal,
    pub maturity_date: NaiveDate,
    pub bid_price: Decimal,
    pub ask_price: Decimal,
    pub high_price: Decimal,
    pub low_price: Decimal,
    pub last_price: Decimal,
    /// Official end-of-day settlement price.
    pub settl_price: Decimal,
    /// Missing for some large options; zero in that case.
    pub settl_volatility: Decimal,
    /// Missing for some large options and in the legacy eras; zero then.
    pub settl_delta: Decimal,
    pub total_reg_volume: i64,
    /// Not distributed in the legacy eras.
    pub number_of_trades: i64,
    pub open_interest: i64,
}

impl MeffHistoricalQuote {
    /// Parses one archive line according to the era layout.
    ///
    /// A row is fully formed or this fails with
    /// [`MarketDataError::MalformedData`]; no partial record escapes.
    pub fn parse(line: &str, format: QuoteFormat) -> Result<Self, MarketDataError> {
        match format {
            QuoteFormat::Current => Self::parse_current(line),
            QuoteFormat::Legacy | QuoteFormat::OldestLegacy => Self::parse_legacy(line),
        }
    }

    fn parse_current(line: &str) -> Result<Self, MarketDataError> {
        let fields: Vec<&str> = line.split(';').collect();
        if fields.len() != 18 {
            return Err(MarketDataError::malformed(format!(
                "the csv line has a wrong number of items: 18 expected, {} found",
                fields.len()
            )));
        }

        Ok(Self {
            session_date: convert::date(unquote(fields[0])?, "%Y%m%d")?,
            contract_group: unquote(fields[1])?.to_string(),
            contract_code: unquote(fields[2])?.to_string(),
            contract_subgroup_code: Some(unquote(fields[3])?.to_string()),
            cfi_code: unquote(fields[4])?.to_string(),
            strike_price: convert::comma_decimal(fields[5])?,
            maturity_date: convert::date(unquote(fields[6])?, "%Y%m%d")?,
            bid_price: convert::comma_decimal(fields[7])?,
            ask_price: convert::comma_decimal(fields[8])?,
            high_price: convert::comma_decimal(fields[9])?,
            low_price: convert::comma_decimal(fields[10])?,
            last_price: convert::comma_decimal(fields[11])?,
            settl_price: convert::comma_decimal(fields[12])?,
            settl_volatility: blank_or_comma_decimal(fields[13])?,
            settl_delta: blank_or_comma_decimal(fields[14])?,
            total_reg_volume: convert::integer(fields[15])?,
            number_of_trades: convert::integer(fields[16])?,
            open_interest: convert::integer(fields[17])?,
        })
    }

    fn parse_legacy(line: &str) -> Result<Self, MarketDataError> {
        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() != 16 {
            return Err(MarketDataError::malformed(format!(
                "the csv line has a wrong number of items: 16 expected, {} found",
                fields.len()
            )));
        }

        // The class letter (C call, P put, F future) stands in for the CFI
        // code this era never carried.
        let class = fields[2].trim();
        let cfi_code = if class == "F" {
            class.to_string()
        } else {
            format!("O{class}")
        };

        Ok(Self {
            session_date: convert::date(fields[0], "%Y%m%d")?,
            contract_group: fields[1].trim().to_string(),
            cfi_code,
            maturity_date: convert::date(fields[3], "%y%m%d")?,
            strike_price: convert::point_decimal(fields[4])?,
            contract_code: fields[5].trim().to_string(),
            bid_price: convert::point_decimal(fields[6])?,
            ask_price: convert::point_decimal(fields[7])?,
            high_price: convert::point_decimal(fields[8])?,
            low_price: convert::point_decimal(fields[9])?,
            last_price: convert::point_decimal(fields[10])?,
            total_reg_volume: convert::integer(fields[11])?,
            settl_price: convert::point_decimal(fields[12])?,
            open_interest: convert::integer(fields[13])?,
            settl_volatility: convert::point_decimal(fields[14])?,
            // Not distributed in this era.
            contract_subgroup_code: None,
            settl_delta: Decimal::ZERO,
            number_of_trades: 0,
        })
    }
}

impl OptionQuote for MeffHistoricalQuote {
    fn price(&self) -> Decimal {
        self.settl_price
    }

    fn strike(&self) -> Decimal {
        self.strike_price
    }

    fn maturity(&self) -> NaiveDate {
        self.maturity_date
    }

    fn option_type(&self) -> Option<OptionType> {
        match self.contract_code.chars().next() {
            Some('C') => Some(OptionType::Call),
            Some('P') => Some(OptionType::Put),
            _ => None,
        }
    }

    fn volatility(&self) -> Decimal {
        self.settl_volatility
    }

    fn volume(&self) -> Decimal {
        Decimal::from(self.total_reg_volume)
    }
}

/// Strips the wrapping quotes the current format puts around text fields.
fn unquote(field: &str) -> Result<&str, MarketDataError> {
    if field.len() < 2 {
        return Err(MarketDataError::malformed(format!(
            "field {field:?} is too short to be quote-wrapped"
        )));
    }
    Ok(&field[1..field.len() - 1])
}

/// Blank fields mean "data missing for this contract"; everything else must
/// parse.
fn blank_or_comma_decimal(field: &str) -> Result<Decimal, MarketDataError> {
    if field.is_empty() {
        Ok(Decimal::ZERO)
    } else {
        convert::comma_decimal(field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const CURRENT_LINE: &str = "\"20130701\";\"C2\";\"AAABC\";\"12\";\"XIINAA\";0,000000;\"20301231\";6,789500;9,147000;12,254200;1,874500;9,125400;9,125400;0;1,00;0;0;0";
    const LEGACY_LINE: &str = "20040701,AAB ,F,040702,    0.00,AAAAAEXE   ,    0.00,    0.00,    0.00,    0.00,    0.00,       0,   34.44,           0, 15.75,";
    const OLDEST_LINE: &str = "19990104,AAB ,C,990105,   22.02,AC 4578C   ,    0.00,    0.00,    0.00,    0.00,    0.00,       0,   22.32,           0, 19.00,";

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn era_selection_by_year() {
        assert!(QuoteFormat::for_year(1992).is_err());
        assert_eq!(QuoteFormat::for_year(1993).unwrap(), QuoteFormat::OldestLegacy);
        assert_eq!(QuoteFormat::for_year(1997).unwrap(), QuoteFormat::OldestLegacy);
        assert_eq!(QuoteFormat::for_year(1998).unwrap(), QuoteFormat::Legacy);
        assert_eq!(QuoteFormat::for_year(1999).unwrap(), QuoteFormat::OldestLegacy);
        assert_eq!(QuoteFormat::for_year(2000).unwrap(), QuoteFormat::OldestLegacy);
        assert_eq!(QuoteFormat::for_year(2001).unwrap(), QuoteFormat::Legacy);
        assert_eq!(QuoteFormat::for_year(2006).unwrap(), QuoteFormat::Legacy);
        assert_eq!(QuoteFormat::for_year(2007).unwrap(), QuoteFormat::Current);
        assert_eq!(QuoteFormat::for_year(2013).unwrap(), QuoteFormat::Current);
    }

    #[test]
    fn parses_a_current_format_line() {
        let quote = MeffHistoricalQuote::parse(CURRENT_LINE, QuoteFormat::Current).unwrap();
        assert_eq!(quote.session_date, date(2013, 7, 1));
        assert_eq!(quote.contract_group, "C2");
        assert_eq!(quote.contract_code, "AAABC");
        assert_eq!(quote.contract_subgroup_code.as_deref(), Some("12"));
        assert_eq!(quote.cfi_code, "XIINAA");
        assert_eq!(quote.strike_price, dec!(0));
        assert_eq!(quote.maturity_date, date(2030, 12, 31));
        assert_eq!(quote.bid_price, dec!(6.7895));
        assert_eq!(quote.ask_price, dec!(9.147));
        assert_eq!(quote.high_price, dec!(12.2542));
        assert_eq!(quote.low_price, dec!(1.8745));
        assert_eq!(quote.last_price, dec!(9.1254));
        assert_eq!(quote.settl_price, dec!(9.1254));
        assert_eq!(quote.settl_volatility, dec!(0));
        assert_eq!(quote.settl_delta, dec!(1));
        assert_eq!(quote.total_reg_volume, 0);
        assert_eq!(quote.number_of_trades, 0);
        assert_eq!(quote.open_interest, 0);
    }

    #[test]
    fn parses_a_legacy_format_line() {
        let quote = MeffHistoricalQuote::parse(LEGACY_LINE, QuoteFormat::Legacy).unwrap();
        assert_eq!(quote.session_date, date(2004, 7, 1));
        assert_eq!(quote.contract_group, "AAB");
        assert_eq!(quote.cfi_code, "F");
        assert_eq!(quote.maturity_date, date(2004, 7, 2));
        assert_eq!(quote.strike_price, dec!(0));
        assert_eq!(quote.contract_code, "AAAAAEXE");
        assert_eq!(quote.total_reg_volume, 0);
        assert_eq!(quote.settl_price, dec!(34.44));
        assert_eq!(quote.open_interest, 0);
        assert_eq!(quote.settl_volatility, dec!(15.75));

        // Fields the era does not distribute stay at their defaults.
        assert_eq!(quote.contract_subgroup_code, None);
        assert_eq!(quote.settl_delta, dec!(0));
        assert_eq!(quote.number_of_trades, 0);
    }

    #[test]
    fn parses_an_oldest_format_line_with_awkward_strings() {
        let quote = MeffHistoricalQuote::parse(OLDEST_LINE, QuoteFormat::OldestLegacy).unwrap();
        assert_eq!(quote.session_date, date(1999, 1, 4));
        assert_eq!(quote.contract_group, "AAB");
        // A call option: class letter prefixed with O.
        assert_eq!(quote.cfi_code, "OC");
        assert_eq!(quote.maturity_date, date(1999, 1, 5));
        assert_eq!(quote.strike_price, dec!(22.02));
        // Inner spacing survives the trim.
        assert_eq!(quote.contract_code, "AC 4578C");
        assert_eq!(quote.settl_price, dec!(22.32));
        assert_eq!(quote.settl_volatility, dec!(19));
        assert_eq!(quote.contract_subgroup_code, None);
        assert_eq!(quote.number_of_trades, 0);
    }

    #[test]
    fn wrong_field_count_is_malformed_and_returns_no_record() {
        assert!(matches!(
            MeffHistoricalQuote::parse("\"20130701\";\"C2\";\"AAABC\"", QuoteFormat::Current),
            Err(MarketDataError::MalformedData { .. })
        ));
        assert!(matches!(
            MeffHistoricalQuote::parse(CURRENT_LINE, QuoteFormat::Legacy),
            Err(MarketDataError::MalformedData { .. })
        ));
        assert!(matches!(
            MeffHistoricalQuote::parse(LEGACY_LINE, QuoteFormat::Current),
            Err(MarketDataError::MalformedData { .. })
        ));
    }

    #[test]
    fn bad_numeric_field_is_malformed() {
        let line = CURRENT_LINE.replace("6,789500", "not-a-number");
        assert!(matches!(
            MeffHistoricalQuote::parse(&line, QuoteFormat::Current),
            Err(MarketDataError::MalformedData { .. })
        ));
    }

    #[test]
    fn blank_optional_fields_default_to_zero() {
        // Blank out SettlVolatility and SettlDelta (fields 13 and 14).
        let line = CURRENT_LINE.replace(";0;1,00;", ";;;");
        let quote = MeffHistoricalQuote::parse(&line, QuoteFormat::Current).unwrap();
        assert_eq!(quote.settl_volatility, dec!(0));
        assert_eq!(quote.settl_delta, dec!(0));
    }

    #[test]
    fn option_quote_view_of_a_current_row() {
        let line = CURRENT_LINE.replace("\"AAABC\"", "\"C4578\"");
        let quote = MeffHistoricalQuote::parse(&line, QuoteFormat::Current).unwrap();
        assert_eq!(quote.option_type(), Some(OptionType::Call));
        assert_eq!(quote.price(), dec!(9.1254));
        assert_eq!(quote.strike(), dec!(0));
        assert_eq!(quote.maturity(), date(2030, 12, 31));
        assert_eq!(quote.style(), crate::models::OptionStyle::European);
    }

    #[test]
    fn futures_are_not_options() {
        let quote = MeffHistoricalQuote::parse(LEGACY_LINE, QuoteFormat::Legacy).unwrap();
        assert_eq!(quote.option_type(), None);
    }
}
