use std::time::Duration;

pub mod loader;
pub mod validator;

pub use loader::load_config_file;
pub use validator::{advisories, validate_config};

/// Periods accepted by the chart endpoint (how much history to fetch).
pub const KNOWN_PERIODS: &[&str] = &[
    "1d", "5d", "1mo", "3mo", "6mo", "1y", "2y", "5y", "10y", "ytd", "max",
];

/// Intervals accepted by the chart endpoint (bar granularity).
pub const KNOWN_INTERVALS: &[&str] = &[
    "1m", "2m", "5m", "15m", "30m", "60m", "90m", "1h", "1d", "5d", "1wk", "1mo", "3mo",
];

pub const DEFAULT_TICKER: &str = "RELIANCE.NS";

const DEFAULT_CHART_ENDPOINT: &str = "https://query1.finance.yahoo.com/v8/finance/chart";
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Knobs consumed by the batch runner.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSettings {
    pub period: String,
    pub interval: String,
    pub batch_size: usize,
    /// Pause applied after every full batch.
    pub delay: Duration,
    pub visualize: bool,
    pub max_retries: usize,
    /// Wait applied before retrying a rate-limited attempt.
    pub rate_limit_backoff: Duration,
    pub bars_to_show: usize,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            period: "1y".to_string(),
            interval: "1d".to_string(),
            batch_size: 10,
            delay: Duration::from_secs(2),
            visualize: true,
            max_retries: 3,
            rate_limit_backoff: Duration::from_secs(5),
            bars_to_show: 250,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProviderSettings {
    pub endpoint: String,
    pub user_agent: String,
    pub timeout: Duration,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_CHART_ENDPOINT.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// Overrides collected from the command line. `None` keeps the configured value.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub period: Option<String>,
    pub interval: Option<String>,
    pub batch_size: Option<usize>,
    pub delay_secs: Option<f64>,
    pub max_retries: Option<usize>,
    pub bars_to_show: Option<usize>,
    pub summary_only: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub run: RunSettings,
    pub provider: ProviderSettings,
    /// Substituted when the caller supplies no tickers.
    pub default_tickers: Vec<String>,
}

impl Config {
    pub fn builtin() -> Self {
        Self {
            run: RunSettings::default(),
            provider: ProviderSettings::default(),
            default_tickers: vec![DEFAULT_TICKER.to_string()],
        }
    }

    pub fn apply_overrides(&mut self, overrides: &Overrides) {
        if let Some(period) = &overrides.period {
            self.run.period = period.clone();
        }
        if let Some(interval) = &overrides.interval {
            self.run.interval = interval.clone();
        }
        if let Some(batch_size) = overrides.batch_size {
            self.run.batch_size = batch_size;
        }
        if let Some(delay) = overrides.delay_secs {
            self.run.delay = seconds_to_duration(delay);
        }
        if let Some(max_retries) = overrides.max_retries {
            self.run.max_retries = max_retries;
        }
        if let Some(bars) = overrides.bars_to_show {
            self.run.bars_to_show = bars;
        }
        if overrides.summary_only {
            self.run.visualize = false;
        }
    }
}

/// Negative or non-finite inputs collapse to zero; validation reports them separately.
pub fn seconds_to_duration(secs: f64) -> Duration {
    if secs.is_finite() && secs > 0.0 {
        Duration::from_secs_f64(secs)
    } else {
        Duration::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_matches_documented_defaults() {
        let config = Config::builtin();
        assert_eq!(config.run.batch_size, 10);
        assert_eq!(config.run.max_retries, 3);
        assert_eq!(config.run.delay, Duration::from_secs(2));
        assert_eq!(config.run.rate_limit_backoff, Duration::from_secs(5));
        assert_eq!(config.run.bars_to_show, 250);
        assert!(config.run.visualize);
        assert_eq!(config.default_tickers, vec!["RELIANCE.NS".to_string()]);
    }

    #[test]
    fn overrides_replace_only_provided_fields() {
        let mut config = Config::builtin();
        config.apply_overrides(&Overrides {
            period: Some("6mo".to_string()),
            delay_secs: Some(0.5),
            summary_only: true,
            ..Overrides::default()
        });

        assert_eq!(config.run.period, "6mo");
        assert_eq!(config.run.interval, "1d");
        assert_eq!(config.run.delay, Duration::from_millis(500));
        assert!(!config.run.visualize);
        assert_eq!(config.run.batch_size, 10);
    }
}
