//! Inventory extraction and snapshot acquisition.
//!
//! The extractor normalizes the JSON emitted by `ansible-inventory --list`
//! into an [`InventorySnapshot`]. That format is produced by third-party
//! inventory plugins and partial plugins may omit fields, so extraction is
//! deliberately best-effort: malformed shapes mean "no members", never an
//! error.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::PathBuf;

use serde_json::Value;

use crate::error::{Error, Result};
use crate::executor::{Executor, render_command};
use crate::types::{HostVars, InventorySnapshot};

/// Reserved top-level key holding hostvars rather than a group definition.
const META_KEY: &str = "_meta";

/// Environment variable the toolchain reads for a config file override.
const ANSIBLE_CONFIG_ENV: &str = "ANSIBLE_CONFIG";

/// Normalize a parsed inventory-listing document into a snapshot.
///
/// Hosts are the union of every `_meta.hostvars` key and every string
/// element of a group's `hosts` list, so a host known only through
/// hostvars still appears, and every group member is reachable via
/// `hosts`. Groups with no collected members contribute no entry.
pub fn extract_snapshot(data: &Value, include_hostvars: bool) -> InventorySnapshot {
    let mut hosts: BTreeSet<String> = BTreeSet::new();
    let mut groups: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

    let meta_hostvars = data
        .get(META_KEY)
        .and_then(|meta| meta.get("hostvars"))
        .and_then(Value::as_object);

    if let Some(hostvars) = meta_hostvars {
        hosts.extend(hostvars.keys().cloned());
    }

    if let Some(top) = data.as_object() {
        for (group_name, group_def) in top {
            if group_name == META_KEY {
                continue;
            }
            let Some(member_list) = group_def.get("hosts").and_then(Value::as_array) else {
                continue;
            };
            let mut members: BTreeSet<String> = BTreeSet::new();
            for member in member_list {
                // Non-string elements are skipped silently.
                if let Some(name) = member.as_str() {
                    hosts.insert(name.to_string());
                    members.insert(name.to_string());
                }
            }
            if !members.is_empty() {
                groups.insert(group_name.clone(), members);
            }
        }
    }

    let hostvars = if include_hostvars {
        let mut vars: HostVars = BTreeMap::new();
        if let Some(hostvars) = meta_hostvars {
            for (host, value) in hostvars {
                if let Some(map) = value.as_object() {
                    vars.insert(host.clone(), map.clone());
                }
            }
        }
        Some(vars)
    } else {
        None
    };

    InventorySnapshot {
        hosts,
        groups,
        hostvars,
    }
}

/// Parameters for one inventory snapshot acquisition.
#[derive(Debug, Clone, Default)]
pub struct SnapshotRequest {
    /// Working directory for the toolchain invocation
    pub working_dir: Option<PathBuf>,
    /// Config file injected via `ANSIBLE_CONFIG`
    pub config_file: Option<PathBuf>,
    /// Inventory sources, joined into a single comma-delimited `-i` argument
    pub sources: Vec<String>,
    /// Whether to retain per-host variables in the snapshot
    pub include_hostvars: bool,
    /// Extra environment overlay applied to the invocation
    pub env: HashMap<String, String>,
}

/// Build the `ansible-inventory` argument vector for a request.
pub fn inventory_argv(request: &SnapshotRequest) -> Vec<String> {
    let mut argv = vec!["ansible-inventory".to_string(), "--list".to_string()];
    if !request.sources.is_empty() {
        argv.push("-i".to_string());
        argv.push(request.sources.join(","));
    }
    argv
}

/// Acquire a normalized inventory snapshot through the executor.
///
/// A non-zero exit yields [`Error::CommandFailed`] carrying both streams
/// (there is no meaningful partial snapshot); undecodable stdout on a zero
/// exit yields [`Error::InventoryParse`] with the raw text.
pub fn snapshot(executor: &dyn Executor, request: &SnapshotRequest) -> Result<InventorySnapshot> {
    let argv = inventory_argv(request);

    let mut env = request.env.clone();
    if let Some(config) = &request.config_file {
        env.insert(
            ANSIBLE_CONFIG_ENV.to_string(),
            config.display().to_string(),
        );
    }

    let output = executor.execute(&argv, request.working_dir.as_deref(), &env)?;
    if !output.success() {
        return Err(Error::CommandFailed {
            command: render_command(&argv),
            rc: output.rc,
            stdout: output.stdout,
            stderr: output.stderr,
        });
    }

    let data: Value = serde_json::from_str(&output.stdout).map_err(|source| {
        Error::InventoryParse {
            stdout: output.stdout.clone(),
            source,
        }
    })?;

    Ok(extract_snapshot(&data, request.include_hostvars))
}
