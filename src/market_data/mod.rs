pub mod source;
pub mod yahoo;

pub use source::{BarListing, BarSource, LatestCandles, LATEST_CANDLES};
pub use yahoo::YahooBarSource;
