//! # Storefront CLI
//!
//! Terminal front end over the storefront state layer.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  args (clap) ──► StorefrontConfig::load_or_default                      │
//! │                        │                                                │
//! │          ┌─────────────┼──────────────────┐                             │
//! │          ▼             ▼                  ▼                             │
//! │   browse (core or   card / format     login / whoami / logout          │
//! │   remote context)   (core only)       (AuthStore + token file)         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod cli;
mod commands;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use storefront_session::StorefrontConfig;

use crate::cli::{Cli, Command};

/// Logs go to stderr so command output stays pipeable.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,storefront=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = StorefrontConfig::load_or_default(cli.config.clone());

    match cli.command {
        Command::Browse(args) => commands::run_browse(config, &args).await?,
        Command::Card(args) => {
            if !commands::run_card(&args)? {
                std::process::exit(1);
            }
        }
        Command::Format { kind, value } => commands::run_format(kind, &value),
        Command::Login { username, password } => {
            commands::run_login(config, &username, &password).await?
        }
        Command::Whoami => commands::run_whoami(config).await?,
        Command::Logout => commands::run_logout(config).await?,
    }

    Ok(())
}
