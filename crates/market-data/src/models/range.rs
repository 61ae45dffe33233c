use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A closed calendar-date interval; both endpoints are inclusive.
///
/// All providers filter candidate records through [`DateRange::contains`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Builds the interval `[start, end]`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// The single-day interval `[date, date]`.
    pub fn single(date: NaiveDate) -> Self {
        Self::new(date, date)
    }

    /// First date of the interval.
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last date of the interval.
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Whether `date` falls inside the interval, endpoints included.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn both_endpoints_are_inclusive() {
        let range = DateRange::new(date(2011, 1, 31), date(2011, 2, 1));
        assert!(range.contains(date(2011, 1, 31)));
        assert!(range.contains(date(2011, 2, 1)));
        assert!(!range.contains(date(2011, 1, 30)));
        assert!(!range.contains(date(2011, 2, 2)));
    }

    #[test]
    fn single_day_range_contains_only_that_day() {
        let range = DateRange::single(date(2013, 7, 1));
        assert!(range.contains(date(2013, 7, 1)));
        assert!(!range.contains(date(2013, 7, 2)));
    }
}
