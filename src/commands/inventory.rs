//! `ansictl inventory` subcommands.

use anyhow::Result;
use std::path::PathBuf;

use anskit::{Client, SnapshotRequest};

use super::{failure_report, print_json, resolve_context};
use crate::cli::InventorySide;

fn request_for(side: &InventorySide, include_hostvars: bool) -> SnapshotRequest {
    SnapshotRequest {
        working_dir: side.cwd.clone(),
        config_file: side.config.clone(),
        sources: side.inventory.clone(),
        include_hostvars,
        env: std::collections::HashMap::new(),
    }
}

/// Snapshot the inventory and print it.
pub fn list(side: &InventorySide, hostvars: bool, project: Option<&str>) -> Result<i32> {
    let command = resolve_context(project, side.cwd.clone())?;

    let mut request = request_for(side, hostvars);
    request.working_dir = command.context.cwd.clone();
    request.env = command.context.env.clone();
    if request.sources.is_empty()
        && let Some(inventory) = command.default_inventory()
    {
        request.sources.push(inventory);
    }

    match Client::new().inventory_snapshot(&request) {
        Ok(snapshot) => {
            print_json(&snapshot)?;
            Ok(0)
        }
        Err(err) => {
            print_json(&failure_report(&err))?;
            Ok(1)
        }
    }
}

/// Diff two inventory configurations and print the result.
#[allow(clippy::too_many_arguments)]
pub fn diff(
    left_inventory: Vec<String>,
    left_cwd: Option<PathBuf>,
    left_config: Option<PathBuf>,
    right_inventory: Vec<String>,
    right_cwd: Option<PathBuf>,
    right_config: Option<PathBuf>,
    hostvars: bool,
) -> Result<i32> {
    let left = SnapshotRequest {
        working_dir: left_cwd,
        config_file: left_config,
        sources: left_inventory,
        include_hostvars: hostvars,
        env: std::collections::HashMap::new(),
    };
    let right = SnapshotRequest {
        working_dir: right_cwd,
        config_file: right_config,
        sources: right_inventory,
        include_hostvars: hostvars,
        env: std::collections::HashMap::new(),
    };

    match Client::new().inventory_diff(&left, &right, hostvars) {
        Ok(diff) => {
            // Exit code 0 means no drift, mirroring `diff(1)`.
            print_json(&diff)?;
            Ok(i32::from(!diff.is_empty()))
        }
        Err(err) => {
            print_json(&failure_report(&err))?;
            Ok(2)
        }
    }
}
