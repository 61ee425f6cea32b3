use log::{debug, info, warn};

use crate::analysis::{Analysis, AnalysisFactory};
use crate::config::{RunSettings, DEFAULT_TICKER};
use crate::error::{classify, FailureKind, Result};

use super::pacing::{PauseReason, Pacer};

/// Terminal state of one ticker.
#[derive(Debug, Clone, PartialEq)]
pub enum TickerOutcome {
    Completed,
    /// The provider answered without usable data.
    NoData,
    /// A non rate-limit failure; the ticker was abandoned.
    Failed { error: String },
    /// Every attempt was rate limited.
    Exhausted,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TickerReport {
    pub ticker: String,
    pub attempts: usize,
    pub outcome: TickerOutcome,
}

impl TickerReport {
    fn new(ticker: &str, attempts: usize, outcome: TickerOutcome) -> Self {
        Self {
            ticker: ticker.to_string(),
            attempts,
            outcome,
        }
    }

    pub fn succeeded(&self) -> bool {
        self.outcome == TickerOutcome::Completed
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunReport {
    pub reports: Vec<TickerReport>,
}

impl RunReport {
    pub fn total(&self) -> usize {
        self.reports.len()
    }

    pub fn succeeded(&self) -> usize {
        self.reports.iter().filter(|report| report.succeeded()).count()
    }

    pub fn failed(&self) -> usize {
        self.total() - self.succeeded()
    }
}

/// Drives tickers through their analysis handles one at a time.
pub struct BatchRunner<F, P> {
    factory: F,
    pacer: P,
    settings: RunSettings,
    default_tickers: Vec<String>,
}

impl<F, P> BatchRunner<F, P>
where
    F: AnalysisFactory,
    P: Pacer,
{
    pub fn new(factory: F, pacer: P, settings: RunSettings, default_tickers: Vec<String>) -> Self {
        let default_tickers = if default_tickers.is_empty() {
            vec![DEFAULT_TICKER.to_string()]
        } else {
            default_tickers
        };
        Self {
            factory,
            pacer,
            settings,
            default_tickers,
        }
    }

    /// Process every ticker in order. Per-ticker failures are reported, never returned.
    pub async fn run(&self, tickers: &[String]) -> RunReport {
        let tickers: &[String] = if tickers.is_empty() {
            info!(
                "no tickers supplied, using defaults: {}",
                self.default_tickers.join(", ")
            );
            &self.default_tickers
        } else {
            tickers
        };

        let total = tickers.len();
        let batch_size = self.settings.batch_size.max(1);
        let mut report = RunReport {
            reports: Vec::with_capacity(total),
        };

        for (idx, ticker) in tickers.iter().enumerate() {
            print_ticker_header(ticker);
            report.reports.push(self.process_ticker(ticker).await);

            let processed = idx + 1;
            if processed % batch_size == 0 && processed < total {
                println!(
                    "Pausing for {} seconds after processing {} stocks...",
                    self.settings.delay.as_secs_f64(),
                    batch_size
                );
                self.pacer
                    .pause(PauseReason::BatchBoundary, self.settings.delay)
                    .await;
            }
        }

        println!(
            "\nSucceeded: {}  Failed: {} (Total: {})",
            report.succeeded(),
            report.failed(),
            report.total()
        );
        report
    }

    /// Run the bounded retry loop for a single ticker.
    pub async fn process_ticker(&self, ticker: &str) -> TickerReport {
        let mut analysis = self
            .factory
            .create(ticker, &self.settings.period, &self.settings.interval);
        let max_retries = self.settings.max_retries.max(1);

        for attempt in 1..=max_retries {
            debug!("{}: attempt {attempt}/{max_retries}", analysis.ticker());

            match self.attempt(&mut analysis).await {
                Ok(true) => return TickerReport::new(ticker, attempt, TickerOutcome::Completed),
                Ok(false) => {
                    println!("Analysis failed for {ticker}!");
                    return TickerReport::new(ticker, attempt, TickerOutcome::NoData);
                }
                Err(err) => match classify(&err) {
                    FailureKind::RateLimited => {
                        warn!("{ticker}: rate limited on attempt {attempt}: {err}");
                        if attempt < max_retries {
                            println!(
                                "Rate limit hit for {ticker}. Retrying ({attempt}/{max_retries}) after delay..."
                            );
                            self.pacer
                                .pause(
                                    PauseReason::RateLimitBackoff,
                                    self.settings.rate_limit_backoff,
                                )
                                .await;
                        } else {
                            println!("Rate limit hit for {ticker} ({attempt}/{max_retries}).");
                        }
                    }
                    FailureKind::Other => {
                        println!("Error for {ticker}: {err}");
                        return TickerReport::new(
                            ticker,
                            attempt,
                            TickerOutcome::Failed {
                                error: err.to_string(),
                            },
                        );
                    }
                },
            }
        }

        println!("Failed to fetch data for {ticker} after {max_retries} attempts.");
        TickerReport::new(ticker, max_retries, TickerOutcome::Exhausted)
    }

    /// One fetch plus the downstream steps. `Ok(false)` when there was nothing to analyse.
    async fn attempt(&self, analysis: &mut F::Handle) -> Result<bool> {
        if !analysis.fetch().await? {
            return Ok(false);
        }

        analysis.prepare_data()?;
        analysis.run_analysis()?;
        if self.settings.visualize {
            analysis.visualize(self.settings.bars_to_show)?;
        } else {
            analysis.print_summary()?;
        }
        Ok(true)
    }
}

fn print_ticker_header(ticker: &str) {
    println!("\n==============================");
    println!("Analyzing stock: {ticker}");
    println!("==============================");
}
