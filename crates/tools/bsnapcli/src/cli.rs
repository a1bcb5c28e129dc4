//! Command-line interface for bsnapcli.

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "bsnapcli")]
#[command(about = "bsnap - Capture build-info snapshots as JSON documents")]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse and display the effective configuration
    Parse,

    /// Capture a snapshot of a recorded build
    Snapshot {
        #[command(flatten)]
        args: SnapshotArgs,
    },
}

#[derive(Args)]
pub struct SnapshotArgs {
    /// Recorded build (JSON)
    #[arg(short, long)]
    pub build: PathBuf,

    /// Treat the build as a pipeline run without executor or trigger chain
    #[arg(long)]
    pub delegated: bool,

    /// Capture time in RFC 3339, defaults to now
    #[arg(long)]
    pub now: Option<DateTime<Utc>>,

    /// Wrap the snapshot in a log payload
    #[arg(long)]
    pub payload: bool,

    /// Log line to attach to the payload, may be repeated
    #[arg(short, long)]
    pub message: Vec<String>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,
}
