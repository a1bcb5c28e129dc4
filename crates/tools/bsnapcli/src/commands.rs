use bsnap::{BuildSnapshot, LogPayload, host::recorded::RecordedBuild};
use bsnap_config::BsnapUserConfig;
use chrono::Utc;
use serde::Serialize;
use tracing::info;

use crate::{cli::SnapshotArgs, prelude::*};

pub fn handle_parse(config: &BsnapUserConfig) -> Result<()> {
    config.date_formatter()?;
    print!("{}", config.to_toml()?);
    Ok(())
}

pub fn handle_snapshot(config: &BsnapUserConfig, args: SnapshotArgs) -> Result<()> {
    let formatter = config.date_formatter()?;
    let build = RecordedBuild::from_file(&args.build)?;
    let now = args.now.unwrap_or_else(Utc::now);

    let snapshot = if args.delegated {
        BuildSnapshot::delegated(&build, now, &formatter)
    } else {
        BuildSnapshot::direct(&build, now, &formatter)
    };
    info!(
        "Captured snapshot of {} ({} variables)",
        snapshot.full_display_name,
        snapshot.build_variables.len()
    );

    if args.payload {
        let payload = LogPayload::new(
            snapshot,
            args.message,
            config.payload.source.clone(),
            config.payload.source_host.clone(),
            now,
            &formatter,
        );
        print_json(&payload, args.pretty)
    } else {
        print_json(&snapshot, args.pretty)
    }
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let output = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", output);
    Ok(())
}
