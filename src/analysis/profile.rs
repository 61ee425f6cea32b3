use chrono::{DateTime, Utc};

use crate::fetch::Candle;

/// Descriptive statistics over a prepared price series.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceProfile {
    pub bars: usize,
    pub first: DateTime<Utc>,
    pub last: DateTime<Utc>,
    pub first_open: f64,
    pub last_close: f64,
    pub change_pct: f64,
    pub high: f64,
    pub high_at: DateTime<Utc>,
    pub low: f64,
    pub low_at: DateTime<Utc>,
    pub mean_volume: f64,
    /// Mean of (high - low) / close, in percent.
    pub mean_range_pct: f64,
}

impl PriceProfile {
    /// `None` for an empty series.
    pub fn from_candles(candles: &[Candle]) -> Option<Self> {
        let first = candles.first()?;
        let last = candles.last()?;

        let mut highest = first;
        let mut lowest = first;
        let mut volume_sum = 0.0;
        let mut range_sum = 0.0;
        let mut range_samples = 0usize;

        for candle in candles {
            if candle.high > highest.high {
                highest = candle;
            }
            if candle.low < lowest.low {
                lowest = candle;
            }
            volume_sum += candle.volume as f64;
            if candle.close.abs() > f64::EPSILON {
                range_sum += (candle.high - candle.low) / candle.close * 100.0;
                range_samples += 1;
            }
        }

        let change_pct = if first.open.abs() > f64::EPSILON {
            (last.close - first.open) / first.open * 100.0
        } else {
            0.0
        };

        Some(Self {
            bars: candles.len(),
            first: first.timestamp,
            last: last.timestamp,
            first_open: first.open,
            last_close: last.close,
            change_pct,
            high: highest.high,
            high_at: highest.timestamp,
            low: lowest.low,
            low_at: lowest.timestamp,
            mean_volume: volume_sum / candles.len() as f64,
            mean_range_pct: if range_samples == 0 {
                0.0
            } else {
                range_sum / range_samples as f64
            },
        })
    }

    /// Compact single-line form shown under charts.
    pub fn headline(&self) -> String {
        format!(
            "{} bars • {} -> {} • Last {:.2} ({:+.2}%) • High {:.2} on {} • Low {:.2} on {}",
            self.bars,
            self.first.format("%Y-%m-%d"),
            self.last.format("%Y-%m-%d"),
            self.last_close,
            self.change_pct,
            self.high,
            self.high_at.format("%Y-%m-%d"),
            self.low,
            self.low_at.format("%Y-%m-%d"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn candle(day: u32, open: f64, high: f64, low: f64, close: f64, volume: u64) -> Candle {
        Candle {
            timestamp: Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap(),
            open,
            high,
            low,
            close,
            volume,
        }
    }

    #[test]
    fn empty_series_has_no_profile() {
        assert!(PriceProfile::from_candles(&[]).is_none());
    }

    #[test]
    fn computes_extremes_and_change() {
        let candles = vec![
            candle(2, 100.0, 105.0, 98.0, 104.0, 1_000),
            candle(3, 104.0, 112.0, 103.0, 110.0, 3_000),
            candle(4, 110.0, 111.0, 95.0, 110.0, 2_000),
        ];

        let profile = PriceProfile::from_candles(&candles).unwrap();

        assert_eq!(profile.bars, 3);
        assert!((profile.change_pct - 10.0).abs() < 1e-9);
        assert!((profile.high - 112.0).abs() < 1e-9);
        assert_eq!(profile.high_at, candles[1].timestamp);
        assert!((profile.low - 95.0).abs() < 1e-9);
        assert_eq!(profile.low_at, candles[2].timestamp);
        assert!((profile.mean_volume - 2_000.0).abs() < 1e-9);
        assert!(profile.headline().contains("2024-01-02 -> 2024-01-04"));
    }
}
