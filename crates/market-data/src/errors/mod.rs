//! Error types for the market data crate.
//!
//! Every retrieval either returns the full requested slice or fails with one
//! of these variants; there is no partial-success mode. An empty result is
//! not an error here — whether "no data" is a failure is the caller's policy.

use thiserror::Error;

/// Errors that can occur while fetching or decoding vendor data.
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// Network failure, timeout or non-success HTTP status while talking to
    /// a vendor. Historical fetches are never retried.
    #[error("there was an error while attempting to contact the {provider} servers: {message}")]
    Contact {
        /// Display name of the vendor that was being contacted.
        provider: String,
        /// The underlying cause, including the HTTP status when one was received.
        message: String,
    },

    /// The vendor payload did not match the expected layout: wrong field
    /// count, unparseable date or number, or a missing XML attribute.
    /// Aborts the whole retrieval for the request immediately.
    #[error("malformed data: {message}")]
    MalformedData {
        /// Description of the offending field or line.
        message: String,
    },

    /// Disk failure while managing the raw payload cache.
    #[error("cache I/O failure: {0}")]
    CacheIo(#[from] std::io::Error),

    /// The request falls outside what the provider can serve at all
    /// (e.g. MEFF sessions before 1993, or a ticker shape the ECB feed
    /// does not cover).
    #[error("{message}")]
    Unavailable {
        /// Why the request cannot be served.
        message: String,
    },
}

impl MarketDataError {
    /// A contact error for `provider`, embedding the upstream cause.
    pub fn contact(provider: impl Into<String>, message: impl ToString) -> Self {
        Self::Contact {
            provider: provider.into(),
            message: message.to_string(),
        }
    }

    /// A malformed-data error with the given description.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedData {
            message: message.into(),
        }
    }

    /// An unavailability error with the given description.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }
}
