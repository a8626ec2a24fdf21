//! Point-in-time price observations.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Reasons a quote fails validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidQuote {
    #[error("quote has an empty source code")]
    EmptyCode,

    #[error("quote has an empty target code")]
    EmptyCodeIn,

    #[error("quote price {0} is negative")]
    NegativeQuote(Decimal),
}

/// A price observation for one source currency, denominated in `code_in`.
///
/// Quotes are immutable. A newer quote set for the same `code_in` supersedes
/// the old one as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyQuote {
    name: String,
    code: String,
    code_in: String,
    quote: Decimal,
    quote_date: DateTime<Utc>,
}

impl CurrencyQuote {
    /// Create a validated quote.
    pub fn new(
        name: impl Into<String>,
        code: impl Into<String>,
        code_in: impl Into<String>,
        quote: Decimal,
        quote_date: DateTime<Utc>,
    ) -> Result<Self, InvalidQuote> {
        let code = code.into();
        let code_in = code_in.into();

        if code.trim().is_empty() {
            return Err(InvalidQuote::EmptyCode);
        }
        if code_in.trim().is_empty() {
            return Err(InvalidQuote::EmptyCodeIn);
        }
        if quote.is_sign_negative() && !quote.is_zero() {
            return Err(InvalidQuote::NegativeQuote(quote));
        }

        Ok(Self {
            name: name.into(),
            code,
            code_in,
            quote,
            quote_date,
        })
    }

    /// Pair display name, e.g. "Euro/Real Brasileiro".
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Source currency code.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Target currency code the price is denominated in.
    pub fn code_in(&self) -> &str {
        &self.code_in
    }

    /// Price of one unit of `code` in `code_in`.
    pub fn quote(&self) -> Decimal {
        self.quote
    }

    /// Observation time reported by the feed.
    pub fn quote_date(&self) -> DateTime<Utc> {
        self.quote_date
    }

    /// Pair expression as used in feed request paths.
    pub fn pair_expression(&self) -> String {
        format!("{}-{}", self.code, self.code_in)
    }
}

impl fmt::Display for CurrencyQuote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} {}", self.code, self.code_in, self.quote)
    }
}
