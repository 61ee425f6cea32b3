use async_trait::async_trait;

use crate::error::Result;

pub mod market;
pub mod profile;

pub use market::{MarketAnalysis, MarketAnalysisFactory};
pub use profile::PriceProfile;

/// Per-ticker analysis handle driven by the batch runner.
///
/// A handle lives for one loop iteration: it is created, fetched (possibly
/// several times when throttled), analysed, rendered and dropped.
#[async_trait]
pub trait Analysis: Send {
    fn ticker(&self) -> &str;

    /// `Ok(false)` means the provider answered but had nothing to analyse.
    async fn fetch(&mut self) -> Result<bool>;

    fn prepare_data(&mut self) -> Result<()>;

    fn run_analysis(&mut self) -> Result<()>;

    /// Render the most recent `bars_to_show` bars.
    fn visualize(&self, bars_to_show: usize) -> Result<()>;

    fn print_summary(&self) -> Result<()>;
}

/// Builds one analysis handle per ticker.
pub trait AnalysisFactory: Send + Sync {
    type Handle: Analysis;

    fn create(&self, ticker: &str, period: &str, interval: &str) -> Self::Handle;
}
