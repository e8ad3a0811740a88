use std::process::ExitCode;

use ipdedup::config::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> ExitCode {
    // Initialize tracing; stdout is reserved for the report
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ipdedup=info".into()),
        )
        .init();

    // Load configuration from CLI args, environment variables, and config file
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => return fail(ipdedup::Error::from(e)),
    };

    tracing::info!("Starting ipdedup");
    tracing::info!("  Input: {}", config.input_path.display());
    tracing::info!("  Database: {}", config.database_path.display());

    match ipdedup::run(&config) {
        Ok(report) => {
            println!("{}", report);
            ExitCode::SUCCESS
        }
        Err(e) => fail(e),
    }
}

fn fail(err: ipdedup::Error) -> ExitCode {
    tracing::error!("{}", err);
    eprintln!("Error: {}", err);
    ExitCode::FAILURE
}
