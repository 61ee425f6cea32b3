use chrono::{DateTime, Utc};

pub mod decode;
pub mod history;

pub use decode::parse_chart_payload;
pub use history::HistoryClient;

/// One OHLCV bar as returned by the chart endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct Candle {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl Candle {
    pub fn is_bullish(&self) -> bool {
        self.close >= self.open
    }
}
