//! Rate table type and the provider seam.

use async_trait::async_trait;
use std::collections::HashMap;

use crate::error::ConvertError;

/// Conversion multipliers for one fixed base currency.
///
/// Immutable once fetched. A new fetch replaces the table in full;
/// tables are never merged.
#[derive(Debug, Clone, PartialEq)]
pub struct RateTable {
    rates: HashMap<String, f64>,
}

impl RateTable {
    pub fn new(rates: HashMap<String, f64>) -> Self {
        Self { rates }
    }

    /// Multiplier for `code`, or `None` when the API omitted it.
    pub fn rate(&self, code: &str) -> Option<f64> {
        self.rates.get(code).copied()
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

impl<const N: usize> From<[(&str, f64); N]> for RateTable {
    fn from(entries: [(&str, f64); N]) -> Self {
        Self::new(
            entries
                .into_iter()
                .map(|(code, rate)| (code.to_string(), rate))
                .collect(),
        )
    }
}

/// Fetches the full rate table for a base currency.
#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Suspends the caller until the network round trip completes.
    /// Failures are surfaced to the caller, never retried internally.
    async fn fetch_rates(&self, base: &str) -> Result<RateTable, ConvertError>;
}
