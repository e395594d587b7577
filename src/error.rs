//! Error taxonomy for the rate fetch and conversion pipeline.

use thiserror::Error;

/// Errors surfaced by the rate provider and the conversion engine.
///
/// Invalid amounts are not represented here: an empty or non-positive
/// amount resets the display instead of producing an error.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// Transport-level failure reaching the rate API.
    #[error("Network error: {0}")]
    Network(String),

    /// The rate API answered with a non-success HTTP status.
    #[error("HTTP error! status: {0}")]
    Http(u16),

    /// The rate API answered successfully but flagged the request as failed.
    #[error("{0}")]
    Api(String),

    /// Target currency missing from an otherwise valid rate table.
    #[error("Exchange rate not available")]
    RateUnavailable,
}
