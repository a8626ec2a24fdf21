//! Plain-text rendering of quotes and conversions.

use currency_tracker_common::{age, CurrencyQuote};
use currency_tracker_quotes::Conversion;

/// One line per quote: pair, price, feed time, name.
pub fn quote_line(quote: &CurrencyQuote) -> String {
    format!(
        "{:<9} {:>16} {} {}",
        format!("{}/{}", quote.code(), quote.code_in()),
        quote.quote(),
        quote.quote_date().format("%Y-%m-%d %H:%M:%S UTC"),
        quote.name()
    )
}

/// Quote line followed by how old the observation is.
pub fn cached_quote_line(quote: &CurrencyQuote) -> String {
    format!("{} ({}m old)", quote_line(quote), age(quote.quote_date()).num_minutes())
}

pub fn conversion_line(conversion: &Conversion) -> String {
    let mut line = format!(
        "{} {} = {} {} (rate {})",
        conversion.amount, conversion.from, conversion.converted, conversion.to, conversion.rate
    );
    if let Some(date) = conversion.quote_date {
        line.push_str(&format!(", quoted {}", date.format("%Y-%m-%d %H:%M:%S UTC")));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    #[test]
    fn test_quote_line() {
        let quote = CurrencyQuote::new(
            "Euro/Real Brasileiro",
            "EUR",
            "BRL",
            dec!(5.3844),
            Utc.timestamp_opt(1709772809, 0).unwrap(),
        )
        .unwrap();

        let line = quote_line(&quote);

        assert!(line.starts_with("EUR/BRL"));
        assert!(line.contains("5.3844"));
        assert!(line.contains("2024-03-07 00:53:29 UTC"));
        assert!(line.ends_with("Euro/Real Brasileiro"));
    }

    #[test]
    fn test_conversion_line_without_quote_date() {
        let conversion = Conversion {
            from: "USD".into(),
            to: "USD".into(),
            amount: dec!(10),
            converted: dec!(10),
            rate: dec!(1),
            quote_date: None,
            executed_at: Utc::now(),
        };

        assert_eq!(conversion_line(&conversion), "10 USD = 10 USD (rate 1)");
    }
}
