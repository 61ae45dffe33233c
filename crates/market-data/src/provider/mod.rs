//! Market data provider implementations.
//!
//! Each vendor gets its own module and its own record type; the
//! [`QuoteSource`] trait is the seam the host adapter consumes. Vendors
//! differ in transport payload (CSV, XML, CSV-in-ZIP) and in field layout,
//! but all follow the same shape: build the request URL, obtain the raw
//! bytes, parse rows, filter by ticker and date range, return the ordered
//! list.

mod convert;
mod traits;

pub mod ecb;
pub mod meff;
pub mod yahoo;

pub use traits::QuoteSource;
