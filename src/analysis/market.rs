use async_trait::async_trait;
use log::debug;

use crate::error::{AppError, Result};
use crate::fetch::{Candle, HistoryClient};
use crate::ui;

use super::{Analysis, AnalysisFactory, PriceProfile};

/// Creates `MarketAnalysis` handles that share one HTTP client.
pub struct MarketAnalysisFactory {
    client: HistoryClient,
}

impl MarketAnalysisFactory {
    pub fn new(client: HistoryClient) -> Self {
        Self { client }
    }
}

impl AnalysisFactory for MarketAnalysisFactory {
    type Handle = MarketAnalysis;

    fn create(&self, ticker: &str, period: &str, interval: &str) -> MarketAnalysis {
        MarketAnalysis::new(self.client.clone(), ticker, period, interval)
    }
}

/// Default analysis handle: downloads OHLCV history and profiles it.
pub struct MarketAnalysis {
    client: HistoryClient,
    ticker: String,
    period: String,
    interval: String,
    candles: Vec<Candle>,
    prepared: bool,
    profile: Option<PriceProfile>,
}

impl MarketAnalysis {
    pub fn new(client: HistoryClient, ticker: &str, period: &str, interval: &str) -> Self {
        Self {
            client,
            ticker: ticker.to_string(),
            period: period.to_string(),
            interval: interval.to_string(),
            candles: Vec::new(),
            prepared: false,
            profile: None,
        }
    }

    fn require_profile(&self) -> Result<&PriceProfile> {
        self.profile
            .as_ref()
            .ok_or_else(|| AppError::message("Analysis has not been run"))
    }
}

#[async_trait]
impl Analysis for MarketAnalysis {
    fn ticker(&self) -> &str {
        &self.ticker
    }

    async fn fetch(&mut self) -> Result<bool> {
        let candles = self
            .client
            .fetch_history(&self.ticker, &self.period, &self.interval)
            .await?;
        debug!("{}: received {} bars", self.ticker, candles.len());

        self.candles = candles;
        self.prepared = false;
        self.profile = None;
        Ok(!self.candles.is_empty())
    }

    fn prepare_data(&mut self) -> Result<()> {
        self.candles = prepare_candles(std::mem::take(&mut self.candles));
        if self.candles.is_empty() {
            return Err(AppError::message("No usable bars after preparation"));
        }
        self.prepared = true;
        Ok(())
    }

    fn run_analysis(&mut self) -> Result<()> {
        if !self.prepared {
            return Err(AppError::message("Data must be prepared before analysis"));
        }
        let profile = PriceProfile::from_candles(&self.candles)
            .ok_or_else(|| AppError::message("No historical data"))?;
        self.profile = Some(profile);
        Ok(())
    }

    fn visualize(&self, bars_to_show: usize) -> Result<()> {
        let profile = self.require_profile()?;
        let start = self.candles.len().saturating_sub(bars_to_show);
        let recent = &self.candles[start..];

        let title = format!(
            "{} | {} / {} | last {} bars",
            self.ticker,
            self.period,
            self.interval,
            recent.len()
        );
        ui::print_chart(&title, recent)?;
        println!("{}", profile.headline());
        Ok(())
    }

    fn print_summary(&self) -> Result<()> {
        let profile = self.require_profile()?;
        ui::print_profile(&self.ticker, &self.period, &self.interval, profile);
        Ok(())
    }
}

/// Sort by time, keep the last bar per timestamp, drop malformed bars.
fn prepare_candles(mut candles: Vec<Candle>) -> Vec<Candle> {
    // Stable sort keeps payload order among equal timestamps, so "last" is well defined.
    candles.sort_by_key(|candle| candle.timestamp);

    let mut prepared: Vec<Candle> = Vec::with_capacity(candles.len());
    for candle in candles {
        let finite = [candle.open, candle.high, candle.low, candle.close]
            .iter()
            .all(|value| value.is_finite());
        if !finite || candle.high < candle.low {
            continue;
        }
        match prepared.last_mut() {
            Some(previous) if previous.timestamp == candle.timestamp => *previous = candle,
            _ => prepared.push(candle),
        }
    }
    prepared
}
