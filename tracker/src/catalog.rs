//! Currencies the tracker knows about.

use anyhow::{bail, Result};
use currency_tracker_common::Currency;

/// Fixed currency catalog.
pub fn catalog() -> Vec<Currency> {
    vec![
        Currency::new("BRL", "Real"),
        Currency::new("USD", "Dollar"),
        Currency::new("EUR", "Euro"),
        Currency::new("GBP", "Pound Sterling"),
        Currency::new("JPY", "Yen"),
        Currency::new("BTC", "Bitcoin"),
    ]
}

/// Look up one code in the catalog, case-insensitively.
pub fn lookup(code: &str) -> Result<Currency> {
    let code = code.trim().to_uppercase();
    match catalog().into_iter().find(|currency| currency.code() == code) {
        Some(currency) => Ok(currency),
        None => bail!("Unknown currency: {code}"),
    }
}

/// Resolve codes in order, skipping duplicates.
pub fn resolve(codes: &[String]) -> Result<Vec<Currency>> {
    let mut currencies: Vec<Currency> = Vec::with_capacity(codes.len());
    for code in codes {
        let currency = lookup(code)?;
        if !currencies.contains(&currency) {
            currencies.push(currency);
        }
    }

    if currencies.is_empty() {
        bail!("At least one source currency is required");
    }
    Ok(currencies)
}
