use chrono::DateTime;
use serde::Deserialize;

use crate::error::{AppError, Context, Result};

use super::Candle;

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
    #[serde(default)]
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    #[serde(default)]
    code: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Vec<i64>,
    #[serde(default)]
    indicators: Indicators,
}

#[derive(Debug, Default, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<QuoteSeries>,
}

#[derive(Debug, Default, Deserialize)]
struct QuoteSeries {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<u64>>,
}

/// Decode a chart response body into candles in payload order.
///
/// Rows with any missing price are skipped, a missing volume counts as zero.
/// A provider-reported error becomes an `AppError` carrying its code.
/// Messages leave the symbol out; callers already report which ticker failed.
pub fn parse_chart_payload(body: &str) -> Result<Vec<Candle>> {
    let envelope: ChartEnvelope =
        serde_json::from_str(body).context("Failed to parse chart JSON")?;

    if let Some(error) = envelope.chart.error {
        return Err(AppError::message(format!(
            "Chart request rejected: {} ({})",
            error.description, error.code
        )));
    }

    let Some(result) = envelope
        .chart
        .result
        .and_then(|results| results.into_iter().next())
    else {
        return Ok(Vec::new());
    };

    let Some(series) = result.indicators.quote.into_iter().next() else {
        return Ok(Vec::new());
    };

    let mut candles = Vec::with_capacity(result.timestamp.len());
    for (idx, &seconds) in result.timestamp.iter().enumerate() {
        let (Some(open), Some(high), Some(low), Some(close)) = (
            value_at(&series.open, idx),
            value_at(&series.high, idx),
            value_at(&series.low, idx),
            value_at(&series.close, idx),
        ) else {
            continue;
        };

        let Some(timestamp) = DateTime::from_timestamp(seconds, 0) else {
            continue;
        };

        let volume = value_at(&series.volume, idx).unwrap_or(0);

        candles.push(Candle {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        });
    }

    Ok(candles)
}

fn value_at<T: Copy>(values: &[Option<T>], idx: usize) -> Option<T> {
    values.get(idx).copied().flatten()
}
