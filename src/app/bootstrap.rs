use std::path::Path;

use log::{info, warn};

use crate::analysis::MarketAnalysisFactory;
use crate::app::pacing::TokioPacer;
use crate::app::runner::{BatchRunner, RunReport};
use crate::cli::Cli;
use crate::config::{self, Config};
use crate::error::Result;
use crate::fetch::HistoryClient;
use crate::tickers;

/// Entry point used by `main`: resolve configuration and tickers, then run the batch.
pub async fn run(cli: Cli) -> Result<RunReport> {
    let config = resolve_config(&cli)?;

    for note in config::advisories(&config.run) {
        warn!("{note}");
    }

    let file_entries = match &cli.file {
        Some(path) => tickers::load_ticker_file(path)?,
        None => Vec::new(),
    };
    let tickers = tickers::collect_tickers(cli.tickers.clone(), file_entries);
    info!(
        "processing {} tickers (period={}, interval={}, batch_size={})",
        tickers.len(),
        config.run.period,
        config.run.interval,
        config.run.batch_size
    );

    let client = HistoryClient::new(&config.provider)?;
    let runner = BatchRunner::new(
        MarketAnalysisFactory::new(client),
        TokioPacer,
        config.run,
        config.default_tickers,
    );

    Ok(runner.run(&tickers).await)
}

/// Builtin defaults, then the optional JSON file, then command-line flags.
pub fn resolve_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => config::load_config_file(Path::new(path))?,
        None => Config::builtin(),
    };
    config.apply_overrides(&cli.overrides());
    config::validate_config(&config)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;
    use std::time::Duration;

    #[test]
    fn flags_win_over_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "run": {{ "period": "6mo", "batch_size": 4, "visualize": true }} }}"#
        )
        .unwrap();
        let path = file.path().to_string_lossy().to_string();

        let cli = Cli::parse_from(["smc-batch", "--config", path.as_str(), "--batch-size", "2", "--summary"]);
        let config = resolve_config(&cli).unwrap();

        assert_eq!(config.run.period, "6mo");
        assert_eq!(config.run.batch_size, 2);
        assert!(!config.run.visualize);
        assert_eq!(config.run.delay, Duration::from_secs(2));
    }

    #[test]
    fn invalid_flags_are_rejected_by_validation() {
        let cli = Cli::parse_from(["smc-batch", "--batch-size", "0"]);
        assert!(resolve_config(&cli).is_err());
    }
}
