mod cli;
mod commands;
mod config;

use clap::Parser;
use tracing::debug;

use ballot_core::Ballot;
use ballot_db::Database;

use crate::cli::Cli;
use crate::config::Config;

fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging; stdout is reserved for command output
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ballot=info,ballot_core=debug,ballot_db=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env(cli.db);

    let db = Database::open(&config.db_path)?;
    let ballot = Ballot::new(db);
    debug!("Using database {}", config.db_path.display());

    let output = match commands::run(&ballot, cli.command) {
        Ok(output) => output,
        Err(err) if commands::is_not_found(&err) => {
            eprintln!("error: {}", err);
            std::process::exit(2);
        }
        Err(err) => return Err(err),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
