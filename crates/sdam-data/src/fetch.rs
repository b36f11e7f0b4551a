//! Outcome types shared by the per-company fetchers.
//!
//! Upstream sources answer "nothing for this period" far more often than
//! they fail, and the two cases must not be conflated. Strict fetchers
//! return `Result<Fetched<T>>`; batch code goes through the lenient
//! wrappers, which fold both cases into a default value and a
//! [`FetchOutcome`] that can be tallied.

use std::fmt;

/// Successful reply from an upstream source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fetched<T> {
    /// The upstream returned data.
    Data(T),
    /// The upstream answered but reported that it has nothing to return.
    NoData {
        /// Upstream status code.
        status: String,
        /// Upstream status message.
        message: String,
    },
}

impl<T> Fetched<T> {
    /// Returns the data, if any.
    pub fn into_data(self) -> Option<T> {
        match self {
            Self::Data(data) => Some(data),
            Self::NoData { .. } => None,
        }
    }

    /// Returns true if the upstream returned data.
    pub const fn is_data(&self) -> bool {
        matches!(self, Self::Data(_))
    }

    /// Maps the contained data.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Fetched<U> {
        match self {
            Self::Data(data) => Fetched::Data(f(data)),
            Self::NoData { status, message } => Fetched::NoData { status, message },
        }
    }
}

/// How a lenient fetch ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchOutcome {
    /// Data was returned.
    Found,
    /// The upstream reported no data, or the value was not disclosed.
    NoData,
    /// Transport or parse failure.
    Failed,
}

impl fmt::Display for FetchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Found => write!(f, "found"),
            Self::NoData => write!(f, "no data"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// A value produced by a lenient fetch together with how it was obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collected<T> {
    /// The fetched value, or the default substituted for it.
    pub value: T,
    /// How the fetch ended.
    pub outcome: FetchOutcome,
}

impl<T> Collected<T> {
    /// Wrap a value that was actually fetched.
    pub const fn found(value: T) -> Self {
        Self {
            value,
            outcome: FetchOutcome::Found,
        }
    }

    /// Wrap a default that stands in for missing data.
    pub const fn no_data(value: T) -> Self {
        Self {
            value,
            outcome: FetchOutcome::NoData,
        }
    }

    /// Wrap a default that stands in for a failed fetch.
    pub const fn failed(value: T) -> Self {
        Self {
            value,
            outcome: FetchOutcome::Failed,
        }
    }
}

/// Per-stage counters of fetch outcomes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchTally {
    /// Fetches that returned data.
    pub found: usize,
    /// Fetches the upstream answered without data.
    pub no_data: usize,
    /// Fetches that failed in transport or parsing.
    pub failed: usize,
}

impl FetchTally {
    /// Count one outcome.
    pub const fn record(&mut self, outcome: FetchOutcome) {
        match outcome {
            FetchOutcome::Found => self.found += 1,
            FetchOutcome::NoData => self.no_data += 1,
            FetchOutcome::Failed => self.failed += 1,
        }
    }

    /// Total number of recorded outcomes.
    pub const fn total(&self) -> usize {
        self.found + self.no_data + self.failed
    }
}

impl FromIterator<FetchOutcome> for FetchTally {
    fn from_iter<I: IntoIterator<Item = FetchOutcome>>(iter: I) -> Self {
        let mut tally = Self::default();
        for outcome in iter {
            tally.record(outcome);
        }
        tally
    }
}
