use std::path::PathBuf;

use clap::Parser;

use crate::config::Overrides;
use crate::utils::current_human_timestamp;

#[derive(Parser, Debug)]
#[command(name = "smc-batch")]
#[command(about = "Fetch price history for a list of tickers and analyse each in turn")]
#[command(version)]
pub struct Cli {
    /// Exchange-qualified tickers (e.g. RELIANCE.NS TCS.NS ^NSEI)
    pub tickers: Vec<String>,

    /// CSV file with one ticker per line, appended after the positional tickers
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// JSON configuration file layered over the builtin defaults
    #[arg(short, long)]
    pub config: Option<String>,

    /// How much history to fetch (1d, 5d, 1mo, 3mo, 6mo, 1y, 2y, 5y, 10y, ytd, max)
    #[arg(short, long)]
    pub period: Option<String>,

    /// Bar granularity (1m, 2m, 5m, 15m, 30m, 60m, 90m, 1h, 1d, 5d, 1wk, 1mo, 3mo)
    #[arg(short, long)]
    pub interval: Option<String>,

    /// Number of tickers processed between pauses
    #[arg(short = 'b', long)]
    pub batch_size: Option<usize>,

    /// Pause between batches, in seconds
    #[arg(short, long, value_parser = parse_seconds)]
    pub delay: Option<f64>,

    /// Attempts per ticker before giving up on rate limits
    #[arg(short = 'r', long)]
    pub max_retries: Option<usize>,

    /// Most recent bars included in the chart
    #[arg(long)]
    pub bars: Option<usize>,

    /// Print a textual summary instead of drawing a chart
    #[arg(short, long)]
    pub summary: bool,
}

impl Cli {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            period: self.period.clone(),
            interval: self.interval.clone(),
            batch_size: self.batch_size,
            delay_secs: self.delay,
            max_retries: self.max_retries,
            bars_to_show: self.bars,
            summary_only: self.summary,
        }
    }
}

fn parse_seconds(raw: &str) -> Result<f64, String> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| format!("`{raw}` is not a number of seconds"))?;
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(format!("`{raw}` must be a finite, non-negative number of seconds"))
    }
}

pub fn show_banner() {
    println!("# ------------------------------------------------------------------------ #");
    println!("# Smart Money Concepts batch analyser");
    println!("# Executing date: {}", current_human_timestamp());
    println!("# ------------------------------------------------------------------------ #");
}
