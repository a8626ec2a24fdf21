//! Currency conversion over cached quotes.

use chrono::{DateTime, Utc};
use currency_tracker_common::{Currency, CurrencyQuote, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::cache::LocalQuoteCache;
use crate::error::{QuoteError, QuoteResult};

/// Represents a completed currency conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversion {
    /// Source currency code.
    pub from: String,
    /// Target currency code.
    pub to: String,
    /// Input amount.
    pub amount: Decimal,
    /// Output amount, rounded to the target currency's decimal places.
    pub converted: Decimal,
    /// Rate applied (price of one `from` in `to`).
    pub rate: Decimal,
    /// Feed time of the quote used, `None` for same-currency conversions.
    pub quote_date: Option<Timestamp>,
    /// When the conversion was executed.
    pub executed_at: DateTime<Utc>,
}

/// How the rate was derived from the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateSource {
    /// Same currency, rate 1.
    Identity,
    /// A quote of `from` in the `to` bucket.
    Direct,
    /// A quote of `to` in the `from` bucket, inverted.
    Inverse,
}

/// Converts amounts using the quotes held in the local cache.
///
/// Never calls the feed. A pair with no cached quote in either direction
/// fails with [`QuoteError::QuoteNotAvailable`].
pub struct CurrencyConverter {
    cache: LocalQuoteCache,
}

impl CurrencyConverter {
    pub fn new(cache: LocalQuoteCache) -> Self {
        Self { cache }
    }

    /// Convert `amount` of `from` into `to`.
    #[instrument(skip(self, from, to), fields(from = %from, to = %to))]
    pub async fn convert(&self, from: &Currency, to: &Currency, amount: Decimal) -> QuoteResult<Conversion> {
        let (rate, quote_date, source) = self.find_rate(from, to).await?;
        let converted = (amount * rate).round_dp(to.decimal_places());

        debug!(?source, rate = %rate, converted = %converted, "Conversion completed");

        Ok(Conversion {
            from: from.code().to_string(),
            to: to.code().to_string(),
            amount,
            converted,
            rate,
            quote_date,
            executed_at: Utc::now(),
        })
    }

    async fn find_rate(
        &self,
        from: &Currency,
        to: &Currency,
    ) -> QuoteResult<(Decimal, Option<Timestamp>, RateSource)> {
        if from.code() == to.code() {
            return Ok((Decimal::ONE, None, RateSource::Identity));
        }

        let direct = self.cache.load(to.code()).await?;
        if let Some(quote) = find_quote(&direct, from.code()) {
            return Ok((quote.quote(), Some(quote.quote_date()), RateSource::Direct));
        }

        let inverse = self.cache.load(from.code()).await?;
        if let Some(quote) = find_quote(&inverse, to.code()) {
            if let Some(rate) = Decimal::ONE.checked_div(quote.quote()) {
                return Ok((rate, Some(quote.quote_date()), RateSource::Inverse));
            }
        }

        Err(QuoteError::QuoteNotAvailable {
            code: from.code().to_string(),
            code_in: to.code().to_string(),
        })
    }
}

fn find_quote<'a>(bucket: &'a [CurrencyQuote], code: &str) -> Option<&'a CurrencyQuote> {
    bucket.iter().find(|quote| quote.code() == code)
}
