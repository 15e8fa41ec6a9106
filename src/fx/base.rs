//! Base FX types - RateTable and the RateLookup trait

use crate::error::Result;
use std::collections::BTreeMap;

/// USD/JPY rates keyed by `YYYYMMDD`
///
/// Keys are unique; inserting an existing key replaces its rate.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RateTable {
    rates: BTreeMap<String, f64>,
}

impl RateTable {
    /// Create an empty rate table
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a rate, returning the value it replaced
    pub fn insert(&mut self, date_key: impl Into<String>, rate: f64) -> Option<f64> {
        self.rates.insert(date_key.into(), rate)
    }

    /// Exact lookup by `YYYYMMDD` key
    pub fn get(&self, date_key: &str) -> Option<f64> {
        self.rates.get(date_key).copied()
    }

    /// Merge another table into this one; rates from `other` win
    pub fn merge(&mut self, other: RateTable) {
        self.rates.extend(other.rates);
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// Iterate rates in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.rates.iter().map(|(key, rate)| (key.as_str(), *rate))
    }
}

impl FromIterator<(String, f64)> for RateTable {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self {
            rates: iter.into_iter().collect(),
        }
    }
}

/// Trait for resolving the JPY-per-USD rate of a vest date
pub trait RateLookup: Send + Sync {
    /// Get the rate for a `YYYYMMDD` key
    ///
    /// `Ok(None)` means no rate is published for that date. `Err` is reserved
    /// for conditions that make every lookup meaningless, such as a rate
    /// document without a table.
    fn get_rate(&self, date_key: &str) -> Result<Option<f64>>;

    /// Check if a rate is available
    fn has_rate(&self, date_key: &str) -> bool {
        matches!(self.get_rate(date_key), Ok(Some(_)))
    }
}

impl RateLookup for RateTable {
    fn get_rate(&self, date_key: &str) -> Result<Option<f64>> {
        Ok(self.get(date_key))
    }
}
