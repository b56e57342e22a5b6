//! `ansictl project` subcommands: the registry and project-scoped runs.

use anyhow::{Context, Result, bail};
use serde_json::json;
use std::collections::BTreeMap;
use std::path::PathBuf;

use anskit::{Client, PlaybookOptions};

use super::{finish_run, print_json, resolve_context};
use crate::config::{ProjectDefinition, Registry};
use crate::discover::discover_playbooks;

fn parse_env_pairs(pairs: &[String]) -> Result<Option<BTreeMap<String, String>>> {
    let mut env = BTreeMap::new();
    for pair in pairs {
        let (key, value) = pair
            .split_once('=')
            .with_context(|| format!("Invalid --env '{pair}', expected KEY=VALUE"))?;
        if key.is_empty() {
            bail!("Invalid --env '{pair}', empty key");
        }
        env.insert(key.to_string(), value.to_string());
    }
    Ok((!env.is_empty()).then_some(env))
}

/// Register or update a project in the registry.
#[allow(clippy::too_many_arguments)]
pub fn register(
    name: String,
    root: PathBuf,
    inventory: Option<PathBuf>,
    roles_paths: Vec<String>,
    collections_paths: Vec<String>,
    env: &[String],
    default: bool,
) -> Result<i32> {
    let root = std::path::absolute(&root)
        .with_context(|| format!("Could not resolve {}", root.display()))?;
    if !root.is_dir() {
        bail!("Project root {} is not a directory", root.display());
    }

    let mut registry = Registry::load()?;
    let make_default = default || registry.projects.is_empty();
    registry.upsert(ProjectDefinition {
        name: name.clone(),
        root: root.display().to_string(),
        inventory: inventory.map(|path| path.display().to_string()),
        roles_paths: (!roles_paths.is_empty()).then_some(roles_paths),
        collections_paths: (!collections_paths.is_empty()).then_some(collections_paths),
        env: parse_env_pairs(env)?,
    });
    if make_default {
        registry.defaults.project = Some(name.clone());
    }
    let path = registry.save()?;

    print_json(&json!({
        "ok": true,
        "registered": name,
        "root": root.display().to_string(),
        "default": registry.defaults.project,
        "registry": path.display().to_string(),
    }))?;
    Ok(0)
}

/// List registered projects and the default selection.
pub fn list() -> Result<i32> {
    let registry = Registry::load()?;
    print_json(&registry)?;
    Ok(0)
}

/// Discover playbooks under a project root.
pub fn playbooks(project: Option<&str>) -> Result<i32> {
    let command = resolve_context(project, None)?;
    let Some(project) = command.project else {
        bail!("No project given and no default registered");
    };
    let root = project.root_path();
    let playbooks = discover_playbooks(&root);
    print_json(&json!({
        "project": project.name,
        "root": root.display().to_string(),
        "playbooks": playbooks,
    }))?;
    Ok(0)
}

/// Run a playbook inside a project, applying its inventory and environment.
#[allow(clippy::too_many_arguments)]
pub fn run(
    playbook: PathBuf,
    project: Option<&str>,
    extra_vars: Option<&str>,
    tags: Vec<String>,
    skip_tags: Vec<String>,
    limit: Option<String>,
    check: bool,
    diff: bool,
    verbosity: u8,
) -> Result<i32> {
    let command = resolve_context(project, None)?;
    if command.project.is_none() {
        bail!("No project given and no default registered");
    }

    let extra_vars = match extra_vars {
        Some(raw) => {
            let value: serde_json::Value =
                serde_json::from_str(raw).context("--extra-vars must be valid JSON")?;
            match value {
                serde_json::Value::Object(map) => Some(map),
                _ => bail!("--extra-vars must be a JSON object"),
            }
        }
        None => None,
    };

    let options = PlaybookOptions {
        playbook,
        inventory: command.default_inventory(),
        extra_vars,
        tags,
        skip_tags,
        limit,
        check,
        diff,
        verbosity,
    };
    let report = Client::new().run_playbook(&options, &command.context)?;
    finish_run(&report)
}
