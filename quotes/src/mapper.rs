//! Decoding of raw feed responses into validated quotes.
//!
//! The feed answers with a JSON object keyed by pair (`"USDBRL"`, ...), each
//! value carrying `code`, `codein`, `name`, `bid` and the observation time in
//! `timestamp` (epoch seconds) and/or `create_date`. Decimal fields are
//! strings that always use `.` as separator, so they are parsed with
//! [`Decimal::from_str`] and never with anything locale aware.

use std::str::FromStr;

use currency_tracker_common::{from_epoch_seconds, from_feed_datetime, CurrencyQuote, Timestamp};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{QuoteError, QuoteResult};

/// One pair record as sent by the feed. Unknown fields are ignored.
#[derive(Debug, Deserialize)]
struct FeedRecord {
    code: String,
    codein: String,
    name: String,
    bid: Value,
    #[serde(default)]
    timestamp: Option<Value>,
    #[serde(default)]
    create_date: Option<String>,
}

/// Decode a feed response.
///
/// Fails with [`QuoteError::InvalidData`] when the status is not 2xx
/// (whatever the body holds), when the body is not an object of records, or
/// when any record is incomplete or carries an unusable price. An empty
/// object decodes to an empty vector. Quotes come back in feed order.
pub fn map(body: &[u8], status: u16) -> QuoteResult<Vec<CurrencyQuote>> {
    if !(200..300).contains(&status) {
        return Err(QuoteError::InvalidData(format!(
            "unexpected HTTP status {status}"
        )));
    }

    let records: Map<String, Value> = serde_json::from_slice(body)
        .map_err(|e| QuoteError::InvalidData(format!("malformed body: {e}")))?;

    records
        .into_iter()
        .map(|(key, value)| map_record(&key, value))
        .collect()
}

fn map_record(key: &str, value: Value) -> QuoteResult<CurrencyQuote> {
    let record: FeedRecord = serde_json::from_value(value)
        .map_err(|e| QuoteError::InvalidData(format!("record {key}: {e}")))?;

    let quote = parse_price(&record.bid)
        .ok_or_else(|| QuoteError::InvalidData(format!("record {key}: non-numeric bid")))?;

    let quote_date = parse_quote_date(&record)
        .ok_or_else(|| QuoteError::InvalidData(format!("record {key}: missing quote date")))?;

    CurrencyQuote::new(record.name, record.code, record.codein, quote, quote_date)
        .map_err(|e| QuoteError::InvalidData(format!("record {key}: {e}")))
}

fn parse_price(value: &Value) -> Option<Decimal> {
    match value {
        Value::String(s) => Decimal::from_str(s.trim()).ok(),
        Value::Number(n) => Decimal::from_str(&n.to_string()).ok(),
        _ => None,
    }
}

/// `timestamp` wins when usable, `create_date` is the fallback.
fn parse_quote_date(record: &FeedRecord) -> Option<Timestamp> {
    let from_timestamp = match &record.timestamp {
        Some(Value::String(s)) => from_epoch_seconds(s),
        Some(Value::Number(n)) => n
            .as_i64()
            .and_then(|seconds| chrono::DateTime::from_timestamp(seconds, 0)),
        _ => None,
    };

    from_timestamp.or_else(|| record.create_date.as_deref().and_then(from_feed_datetime))
}
