use std::{fs, path::Path};

use serde::Deserialize;

use crate::error::{AppError, Context, Result};

use super::{seconds_to_duration, Config};

/// Read a JSON configuration file and layer it over the builtin defaults.
pub fn load_config_file(path: &Path) -> Result<Config> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read config JSON at {}", path.display()))?;

    let raw: RawConfig = serde_json::from_str(&json)
        .with_context(|| format!("failed to parse config JSON at {}", path.display()))?;

    let mut config = Config::builtin();
    raw.merge_into(&mut config)
        .map_err(|err| AppError::message(format!("{}: {err}", path.display())))?;
    Ok(config)
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(default)]
    run: RawRunSettings,
    #[serde(default)]
    provider: RawProviderSettings,
    #[serde(default)]
    default_tickers: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawRunSettings {
    period: Option<String>,
    interval: Option<String>,
    batch_size: Option<usize>,
    delay_secs: Option<f64>,
    visualize: Option<bool>,
    max_retries: Option<usize>,
    rate_limit_backoff_secs: Option<f64>,
    bars_to_show: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawProviderSettings {
    endpoint: Option<String>,
    user_agent: Option<String>,
    timeout_secs: Option<f64>,
}

impl RawConfig {
    fn merge_into(self, config: &mut Config) -> Result<()> {
        let run = self.run;
        if let Some(period) = run.period {
            config.run.period = period;
        }
        if let Some(interval) = run.interval {
            config.run.interval = interval;
        }
        if let Some(batch_size) = run.batch_size {
            config.run.batch_size = batch_size;
        }
        if let Some(delay) = run.delay_secs {
            config.run.delay = seconds_to_duration(non_negative("run.delay_secs", delay)?);
        }
        if let Some(visualize) = run.visualize {
            config.run.visualize = visualize;
        }
        if let Some(max_retries) = run.max_retries {
            config.run.max_retries = max_retries;
        }
        if let Some(backoff) = run.rate_limit_backoff_secs {
            config.run.rate_limit_backoff =
                seconds_to_duration(non_negative("run.rate_limit_backoff_secs", backoff)?);
        }
        if let Some(bars) = run.bars_to_show {
            config.run.bars_to_show = bars;
        }

        let provider = self.provider;
        if let Some(endpoint) = provider.endpoint {
            config.provider.endpoint = endpoint.trim_end_matches('/').to_string();
        }
        if let Some(user_agent) = provider.user_agent {
            config.provider.user_agent = user_agent;
        }
        if let Some(timeout) = provider.timeout_secs {
            config.provider.timeout =
                seconds_to_duration(non_negative("provider.timeout_secs", timeout)?);
        }

        if let Some(tickers) = self.default_tickers {
            config.default_tickers = tickers
                .into_iter()
                .map(|ticker| ticker.trim().to_string())
                .filter(|ticker| !ticker.is_empty())
                .collect();
        }

        Ok(())
    }
}

fn non_negative(field: &str, value: f64) -> Result<f64> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(AppError::message(format!(
            "`{field}` must be a finite, non-negative number of seconds (got {value})"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::time::Duration;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn partial_file_keeps_builtin_values() {
        let file = write_config(
            r#"{
                "run": { "period": "6mo", "batch_size": 4, "delay_secs": 1.5 },
                "default_tickers": [" TCS.NS ", ""]
            }"#,
        );

        let config = load_config_file(file.path()).unwrap();

        assert_eq!(config.run.period, "6mo");
        assert_eq!(config.run.interval, "1d");
        assert_eq!(config.run.batch_size, 4);
        assert_eq!(config.run.delay, Duration::from_millis(1500));
        assert_eq!(config.run.max_retries, 3);
        assert_eq!(config.default_tickers, vec!["TCS.NS".to_string()]);
    }

    #[test]
    fn endpoint_trailing_slash_is_trimmed() {
        let file = write_config(r#"{ "provider": { "endpoint": "http://localhost:9000/chart/" } }"#);
        let config = load_config_file(file.path()).unwrap();
        assert_eq!(config.provider.endpoint, "http://localhost:9000/chart");
    }

    #[test]
    fn negative_delay_is_rejected() {
        let file = write_config(r#"{ "run": { "delay_secs": -1 } }"#);
        let err = load_config_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("run.delay_secs"));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let file = write_config(r#"{ "run": { "batchsize": 4 } }"#);
        assert!(load_config_file(file.path()).is_err());
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_config_file(Path::new("does/not/exist.json")).unwrap_err();
        assert!(err.full_text().contains("does/not/exist.json"));
    }
}
