//! Project registry persistence and resolution.
//!
//! A project is a registered Ansible checkout: root directory, default
//! inventory, and the roles/collections paths it exports. The registry is
//! a small JSON file; resolution picks the active project from an explicit
//! name, an environment override, or the saved default, in that order.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable overriding the registry file location.
pub const CONFIG_ENV_VAR: &str = "ANSICTL_CONFIG";

/// Registry file looked up in the current directory before the user config dir.
pub const LOCAL_CONFIG_FILE: &str = "ansictl.config.json";

/// Environment override: project root directory.
pub const PROJECT_ROOT_ENV: &str = "ANSICTL_PROJECT_ROOT";
/// Environment override: project name (defaults to `env`).
pub const PROJECT_NAME_ENV: &str = "ANSICTL_PROJECT_NAME";
/// Environment override: default inventory path.
pub const PROJECT_INVENTORY_ENV: &str = "ANSICTL_INVENTORY";
/// Environment override: roles paths, platform path separator.
pub const ROLES_PATH_ENV: &str = "ANSICTL_ROLES_PATH";
/// Environment override: collections paths, platform path separator.
pub const COLLECTIONS_PATHS_ENV: &str = "ANSICTL_COLLECTIONS_PATHS";
/// Prefix for extra environment passthrough (`ANSICTL_ENV_FOO=bar` exports `FOO=bar`).
pub const ENV_PASSTHROUGH_PREFIX: &str = "ANSICTL_ENV_";

/// A registered Ansible project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectDefinition {
    pub name: String,
    pub root: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inventory: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roles_paths: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collections_paths: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env: Option<BTreeMap<String, String>>,
}

impl ProjectDefinition {
    /// Root directory with tilde expansion applied.
    pub fn root_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.root).as_ref())
    }

    /// Environment overlay this project exports for toolchain invocations.
    pub fn overlay_env(&self) -> HashMap<String, String> {
        let separator = if cfg!(windows) { ";" } else { ":" };
        let mut env = HashMap::new();
        if let Some(paths) = &self.roles_paths {
            env.insert("ANSIBLE_ROLES_PATH".to_string(), paths.join(separator));
        }
        if let Some(paths) = &self.collections_paths {
            env.insert(
                "ANSIBLE_COLLECTIONS_PATHS".to_string(),
                paths.join(separator),
            );
        }
        if let Some(extra) = &self.env {
            env.extend(extra.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        env
    }
}

/// Saved defaults, currently just the default project selection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Defaults {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
}

/// The persisted project registry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Registry {
    #[serde(default)]
    pub projects: BTreeMap<String, ProjectDefinition>,
    #[serde(default)]
    pub defaults: Defaults,
}

/// Resolve the registry file path.
///
/// Precedence: `ANSICTL_CONFIG`, a local `ansictl.config.json` when one
/// exists in the current directory, else the user config dir.
pub fn registry_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        return Ok(PathBuf::from(shellexpand::tilde(&path).as_ref()));
    }
    let local = PathBuf::from(LOCAL_CONFIG_FILE);
    if local.exists() {
        return Ok(local);
    }
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join("ansictl").join("config.json"))
}

impl Registry {
    /// Load the registry from `path`; a missing or unreadable file is an
    /// empty registry, not an error.
    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|err| {
                log::debug!("ignoring malformed registry {}: {err}", path.display());
                Self::default()
            }),
            Err(_) => {
                log::debug!("registry {} not found, starting empty", path.display());
                Self::default()
            }
        }
    }

    /// Load the registry from the resolved default location.
    pub fn load() -> Result<Self> {
        Ok(Self::load_from(&registry_path()?))
    }

    /// Save the registry to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)
            .with_context(|| format!("Could not write {}", path.display()))?;
        log::debug!("saved registry to {}", path.display());
        Ok(())
    }

    /// Save the registry to the resolved default location, returning it.
    pub fn save(&self) -> Result<PathBuf> {
        let path = registry_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Register or update a project.
    pub fn upsert(&mut self, project: ProjectDefinition) {
        self.projects.insert(project.name.clone(), project);
    }

    /// Resolve the active project.
    ///
    /// An explicit name wins; otherwise an environment override
    /// (`ANSICTL_PROJECT_ROOT` and friends) takes precedence over the
    /// saved default. The environment map is a parameter so resolution
    /// stays testable without ambient lookups.
    pub fn resolve_project(
        &self,
        explicit: Option<&str>,
        vars: &HashMap<String, String>,
    ) -> Option<ProjectDefinition> {
        if let Some(name) = explicit {
            return self.projects.get(name).cloned();
        }
        if let Some(project) = project_from_env(vars) {
            return Some(project);
        }
        let default = self.defaults.project.as_deref()?;
        self.projects.get(default).cloned()
    }
}

fn split_paths(value: Option<&String>) -> Option<Vec<String>> {
    let separator = if cfg!(windows) { ';' } else { ':' };
    let parts: Vec<String> = value?
        .split(separator)
        .filter(|part| !part.is_empty())
        .map(|part| shellexpand::tilde(part).into_owned())
        .collect();
    (!parts.is_empty()).then_some(parts)
}

/// Build an ad-hoc project definition from environment overrides.
///
/// Returns `None` unless `ANSICTL_PROJECT_ROOT` is set. Extra variables
/// with the `ANSICTL_ENV_` prefix are captured with the prefix stripped.
pub fn project_from_env(vars: &HashMap<String, String>) -> Option<ProjectDefinition> {
    let root = vars.get(PROJECT_ROOT_ENV)?;
    let extra: BTreeMap<String, String> = vars
        .iter()
        .filter_map(|(key, value)| {
            key.strip_prefix(ENV_PASSTHROUGH_PREFIX)
                .map(|name| (name.to_string(), value.clone()))
        })
        .collect();
    Some(ProjectDefinition {
        name: vars
            .get(PROJECT_NAME_ENV)
            .cloned()
            .unwrap_or_else(|| "env".to_string()),
        root: shellexpand::tilde(root).into_owned(),
        inventory: vars
            .get(PROJECT_INVENTORY_ENV)
            .map(|path| shellexpand::tilde(path).into_owned()),
        roles_paths: split_paths(vars.get(ROLES_PATH_ENV)),
        collections_paths: split_paths(vars.get(COLLECTIONS_PATHS_ENV)),
        env: (!extra.is_empty()).then_some(extra),
    })
}

/// Snapshot of the process environment, for resolution calls.
pub fn process_env() -> HashMap<String, String> {
    std::env::vars().collect()
}
