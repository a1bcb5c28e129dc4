//! bsnapcli
//!
//! Reads a recorded build, captures a build-info snapshot of it and prints the
//! JSON document, either bare or wrapped in a log payload.
//!
//! ```bash
//! # Snapshot of a build bound to an executor
//! bsnapcli snapshot --build build.json
//!
//! # Pipeline run, shipped as a payload with a log line
//! bsnapcli --config config.toml snapshot --build run.json --delegated --payload -m "Finished: SUCCESS"
//! ```

mod cli;
mod commands;
mod error;
mod prelude;

use std::path::Path;

use bsnap_config::BsnapUserConfig;
use clap::Parser;
use cli::{Cli, Commands};
use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::commands::{handle_parse, handle_snapshot};
use crate::prelude::*;

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bsnapcli=info,bsnap=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let result = load_config(cli.config.as_deref()).and_then(|config| match cli.command {
        Commands::Parse => handle_parse(&config),
        Commands::Snapshot { args } => handle_snapshot(&config, args),
    });

    if let Err(ref e) = result {
        error!("Error: {}", e);
    }

    result
}

fn load_config(path: Option<&Path>) -> Result<BsnapUserConfig> {
    match path {
        Some(path) => Ok(BsnapUserConfig::from_file(path)?),
        None => Ok(BsnapUserConfig::default()),
    }
}
