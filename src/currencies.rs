//! Currency metadata used to populate the selectors.
//!
//! The catalog only supplies display names and membership. A code
//! present here may still be absent from a fetched rate table; that is
//! surfaced as a conversion error, never a crash.

use std::collections::BTreeMap;

const BUILTIN: &[(&str, &str)] = &[
    ("AED", "UAE Dirham"),
    ("AUD", "Australian Dollar"),
    ("BRL", "Brazilian Real"),
    ("CAD", "Canadian Dollar"),
    ("CHF", "Swiss Franc"),
    ("CNY", "Chinese Yuan"),
    ("CZK", "Czech Koruna"),
    ("DKK", "Danish Krone"),
    ("EUR", "Euro"),
    ("GBP", "British Pound"),
    ("HKD", "Hong Kong Dollar"),
    ("HUF", "Hungarian Forint"),
    ("IDR", "Indonesian Rupiah"),
    ("ILS", "Israeli New Shekel"),
    ("INR", "Indian Rupee"),
    ("JPY", "Japanese Yen"),
    ("KRW", "South Korean Won"),
    ("MXN", "Mexican Peso"),
    ("MYR", "Malaysian Ringgit"),
    ("NOK", "Norwegian Krone"),
    ("NZD", "New Zealand Dollar"),
    ("PHP", "Philippine Peso"),
    ("PLN", "Polish Zloty"),
    ("RUB", "Russian Ruble"),
    ("SAR", "Saudi Riyal"),
    ("SEK", "Swedish Krona"),
    ("SGD", "Singapore Dollar"),
    ("THB", "Thai Baht"),
    ("TRY", "Turkish Lira"),
    ("USD", "US Dollar"),
    ("ZAR", "South African Rand"),
];

/// Selectable currencies and their human-readable names, kept sorted
/// by code.
#[derive(Debug, Clone)]
pub struct CurrencyCatalog {
    names: BTreeMap<String, String>,
}

impl CurrencyCatalog {
    /// Catalog shipped with the binary.
    pub fn builtin() -> Self {
        Self {
            names: BUILTIN
                .iter()
                .map(|(code, name)| (code.to_string(), name.to_string()))
                .collect(),
        }
    }

    pub fn contains(&self, code: &str) -> bool {
        self.names.contains_key(code)
    }

    pub fn display_name(&self, code: &str) -> Option<&str> {
        self.names.get(code).map(String::as_str)
    }

    /// Selector label, e.g. `USD - US Dollar`. Falls back to the bare
    /// code when the name is unknown.
    pub fn label(&self, code: &str) -> String {
        match self.display_name(code) {
            Some(name) => format!("{code} - {name}"),
            None => code.to_string(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.names
            .iter()
            .map(|(code, name)| (code.as_str(), name.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_lookup() {
        let catalog = CurrencyCatalog::builtin();
        assert!(catalog.iter().count() > 0);
        assert!(catalog.contains("USD"));
        assert!(!catalog.contains("XYZ"));
        assert_eq!(catalog.display_name("EUR"), Some("Euro"));
    }

    #[test]
    fn test_labels() {
        let catalog = CurrencyCatalog::builtin();
        assert_eq!(catalog.label("USD"), "USD - US Dollar");
        assert_eq!(catalog.label("XYZ"), "XYZ");
    }

    #[test]
    fn test_iteration_is_sorted_by_code() {
        let catalog = CurrencyCatalog::builtin();
        let codes: Vec<&str> = catalog.iter().map(|(code, _)| code).collect();
        let mut sorted = codes.clone();
        sorted.sort_unstable();
        assert_eq!(codes, sorted);
    }
}
