//! Currency Tracker Common Types
//!
//! Shared value types used across the quote pipeline: currencies picked from
//! a caller-supplied catalog, validated quotes as decoded from the price feed,
//! and the timestamp helpers the feed format needs.

pub mod currency;
pub mod quote;
pub mod time;

pub use currency::*;
pub use quote::*;
pub use time::*;
