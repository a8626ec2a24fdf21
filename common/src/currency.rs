//! Currency identity values.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A currency as offered by the caller's catalog.
///
/// Two currencies are equal only when both code and display name match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Currency {
    code: String,
    name: String,
}

impl Currency {
    /// Create a new currency. The code is normalized to upper case.
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: normalize_code(&code.into()),
            name: name.into(),
        }
    }

    /// Get the currency code.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Get the display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the standard decimal places for this currency.
    pub fn decimal_places(&self) -> u32 {
        decimal_places(&self.code)
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code)
    }
}

/// Standard decimal places for a currency code.
pub fn decimal_places(code: &str) -> u32 {
    match code {
        "JPY" | "KRW" | "VND" => 0,
        "BHD" | "KWD" | "OMR" => 3,
        "BTC" | "ETH" | "LTC" => 8,
        _ => 2,
    }
}

/// Canonical form of a currency code: trimmed and uppercased.
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_uses_code_and_name() {
        let a = Currency::new("usd", "Dollar");
        let b = Currency::new("USD", "Dollar");
        let c = Currency::new("USD", "US Dollar");

        assert_eq!(a, b);
        assert_ne!(b, c);
        assert_eq!(a.code(), "USD");
    }

    #[test]
    fn test_normalize_code() {
        assert_eq!(normalize_code(" brl "), "BRL");
        assert_eq!(Currency::new(" eur", "Euro").code(), "EUR");
    }

    #[test]
    fn test_decimal_places() {
        assert_eq!(Currency::new("BRL", "Real").decimal_places(), 2);
        assert_eq!(Currency::new("JPY", "Yen").decimal_places(), 0);
        assert_eq!(Currency::new("BTC", "Bitcoin").decimal_places(), 8);
    }
}
