use std::process::ExitCode;

use amalsas::{LogConfig, cli::Cli, init_tracing};
use clap::Parser;
use tracing::error;

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env file is fine; the environment alone is enough
    dotenv::dotenv().ok();

    if let Err(e) = init_tracing(&LogConfig::from_env()) {
        eprintln!("failed to initialise logging: {e}");
    }

    let cli = Cli::parse();
    match amalsas::cli::run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Command failed");
            eprintln!("{}", e.user_message());
            ExitCode::FAILURE
        }
    }
}
