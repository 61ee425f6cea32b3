use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use env_logger::Env;

use smc_batch::app;
use smc_batch::cli::{self, Cli};
use smc_batch::utils::format_elapsed;

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    cli::show_banner();

    let started = Instant::now();
    match app::run(cli).await {
        Ok(report) => {
            log::info!(
                "run finished in {}: {} of {} tickers analysed",
                format_elapsed(started.elapsed()),
                report.succeeded(),
                report.total()
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Error: {}", err.full_text());
            ExitCode::FAILURE
        }
    }
}
