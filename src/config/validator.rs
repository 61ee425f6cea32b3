use crate::error::{AppError, Result};

use super::{Config, RunSettings, KNOWN_INTERVALS, KNOWN_PERIODS};

const INTRADAY_INTERVALS: &[&str] = &["1m", "2m", "5m", "15m", "30m", "60m", "90m", "1h"];
const ONE_MINUTE_PERIODS: &[&str] = &["1d", "5d"];
const INTRADAY_PERIODS: &[&str] = &["1d", "5d", "1mo"];

/// Validate the merged configuration and surface every problem at once.
pub fn validate_config(config: &Config) -> Result<()> {
    let mut issues = Vec::new();

    validate_run(&config.run, &mut issues);

    if config.provider.endpoint.trim().is_empty() {
        issues.push("provider.endpoint must not be empty".to_string());
    }
    if config.provider.timeout.is_zero() {
        issues.push("provider.timeout must be greater than zero".to_string());
    }
    if config.default_tickers.is_empty() {
        issues.push("default_tickers must contain at least one symbol".to_string());
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(AppError::message(format!(
            "configuration invalid:\n  - {}",
            issues.join("\n  - ")
        )))
    }
}

fn validate_run(run: &RunSettings, issues: &mut Vec<String>) {
    if run.batch_size == 0 {
        issues.push("run.batch_size must be greater than zero".to_string());
    }
    if run.max_retries == 0 {
        issues.push("run.max_retries must be greater than zero".to_string());
    }
    if run.bars_to_show == 0 {
        issues.push("run.bars_to_show must be greater than zero".to_string());
    }
    if !KNOWN_PERIODS.contains(&run.period.as_str()) {
        issues.push(format!(
            "run.period `{}` is not one of: {}",
            run.period,
            KNOWN_PERIODS.join(", ")
        ));
    }
    if !KNOWN_INTERVALS.contains(&run.interval.as_str()) {
        issues.push(format!(
            "run.interval `{}` is not one of: {}",
            run.interval,
            KNOWN_INTERVALS.join(", ")
        ));
    }
}

/// Period/interval combinations the provider is known to truncate or reject.
pub fn advisories(run: &RunSettings) -> Vec<String> {
    let mut notes = Vec::new();
    let interval = run.interval.as_str();
    let period = run.period.as_str();

    if interval == "1m" {
        if !ONE_MINUTE_PERIODS.contains(&period) {
            notes.push(format!(
                "interval `1m` only covers the last 7 days; period `{period}` will be cut short or rejected"
            ));
        }
    } else if INTRADAY_INTERVALS.contains(&interval) && !INTRADAY_PERIODS.contains(&period) {
        notes.push(format!(
            "intraday interval `{interval}` only covers the last 60 days; period `{period}` will be cut short or rejected"
        ));
    }

    notes
}
