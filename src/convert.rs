//! Pure conversion math over a fetched rate table.

use tracing::debug;

use crate::error::ConvertError;
use crate::rates::RateTable;

/// A single user-initiated conversion. Transient, never persisted.
#[derive(Debug, Clone)]
pub struct ConversionRequest {
    pub amount: f64,
    pub from: String,
    pub to: String,
}

/// Outcome of a conversion, ready for display.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionResult {
    /// Converted amount, rounded to 2 fractional digits.
    pub converted_amount: f64,
    /// Rate applied, rounded to 4 fractional digits.
    pub display_rate: f64,
}

impl ConversionResult {
    pub fn amount_text(&self) -> String {
        format!("{:.2}", self.converted_amount)
    }

    /// Rate line as rendered next to the result, e.g. `1 USD = 0.9200 EUR`.
    pub fn rate_text(&self, from: &str, to: &str) -> String {
        format!("1 {} = {:.4} {}", from, self.display_rate, to)
    }
}

fn round_to(value: f64, digits: i32) -> f64 {
    let factor = 10f64.powi(digits);
    (value * factor).round() / factor
}

/// Converts `request.amount` using the multiplier for `request.to`.
///
/// The table's implicit base must be `request.from`; the controller
/// guarantees that before calling in. A source equal to the target is
/// converted like any other pair with whatever rate the table carries.
pub fn convert(
    request: &ConversionRequest,
    table: &RateTable,
) -> Result<ConversionResult, ConvertError> {
    let rate = table
        .rate(&request.to)
        .ok_or(ConvertError::RateUnavailable)?;
    debug!(
        from = %request.from,
        to = %request.to,
        rate,
        "Converting amount"
    );

    Ok(ConversionResult {
        converted_amount: round_to(request.amount * rate, 2),
        display_rate: round_to(rate, 4),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(amount: f64, from: &str, to: &str) -> ConversionRequest {
        ConversionRequest {
            amount,
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    #[test]
    fn test_converts_and_rounds_to_two_digits() {
        let table = RateTable::from([("EUR", 0.92)]);
        let result = convert(&request(100.0, "USD", "EUR"), &table).unwrap();

        assert_eq!(result.amount_text(), "92.00");
        assert_eq!(result.rate_text("USD", "EUR"), "1 USD = 0.9200 EUR");
    }

    #[test]
    fn test_display_rate_rounds_to_four_digits() {
        let table = RateTable::from([("INR", 83.123456)]);
        let result = convert(&request(1.0, "USD", "INR"), &table).unwrap();

        assert_eq!(result.display_rate, 83.1235);
        assert_eq!(result.converted_amount, 83.12);
    }

    #[test]
    fn test_missing_target_is_rate_unavailable() {
        let table = RateTable::from([("EUR", 0.92)]);
        let err = convert(&request(10.0, "USD", "XYZ"), &table).unwrap_err();
        assert!(matches!(err, ConvertError::RateUnavailable));
    }

    #[test]
    fn test_pure_and_idempotent() {
        let table = RateTable::from([("JPY", 151.37)]);
        let req = request(42.5, "USD", "JPY");
        let first = convert(&req, &table).unwrap();
        let second = convert(&req, &table).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_self_conversion_uses_table_rate_verbatim() {
        // No hard-coded 1.0 short-circuit; whatever the API said wins.
        let table = RateTable::from([("USD", 1.0002)]);
        let result = convert(&request(50.0, "USD", "USD"), &table).unwrap();
        assert_eq!(result.converted_amount, 50.01);
        assert_eq!(result.display_rate, 1.0002);
    }
}
