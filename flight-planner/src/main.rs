use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use flight_planner::cli::{self, Cli, CliError, Command};

#[tokio::main]
async fn main() -> ExitCode {
    // Logs go to stderr so stdout stays pure JSON
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Search(args) => {
            let trips = cli::search(&args)?;
            println!("{}", serde_json::to_string_pretty(&trips)?);
            Ok(())
        }
        Command::Serve(args) => cli::serve(args).await,
    }
}
