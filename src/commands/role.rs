//! `ansictl role`: scaffolding and wrapper-playbook execution.

use anyhow::{Context, Result, bail};
use serde_json::{Map, Value, json};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anskit::{Client, PlaybookOptions};

use super::{finish_run, print_json, resolve_context};

/// Subdirectories every role gets.
const ROLE_DIRS: &[&str] = &[
    "defaults",
    "files",
    "handlers",
    "meta",
    "tasks",
    "templates",
    "tests",
    "vars",
];

/// Subdirectories seeded with an empty `main.yml`.
const MAIN_YML_DIRS: &[&str] = &["defaults", "handlers", "meta", "tasks", "vars"];

/// Create the standard role directory structure under `base_path`.
///
/// Existing directories are left alone and an existing `main.yml` is
/// never overwritten, so re-running on a partial role fills in the gaps.
pub fn init(base_path: &Path, name: &str) -> Result<i32> {
    if name.is_empty() || name.contains(['/', '\\']) {
        bail!("Invalid role name '{name}'");
    }
    let role_path = base_path.join(name);
    let mut created = Vec::new();

    for dir in ROLE_DIRS {
        let path = role_path.join(dir);
        if !path.is_dir() {
            fs::create_dir_all(&path)
                .with_context(|| format!("Could not create {}", path.display()))?;
            created.push(format!("{dir}/"));
        }
    }
    for dir in MAIN_YML_DIRS {
        let path = role_path.join(dir).join("main.yml");
        if !path.exists() {
            fs::write(&path, "---\n")
                .with_context(|| format!("Could not write {}", path.display()))?;
            created.push(format!("{dir}/main.yml"));
        }
    }

    print_json(&json!({
        "ok": true,
        "role": name,
        "role_path": role_path.display().to_string(),
        "created": created,
    }))?;
    Ok(0)
}

/// Render the single-play wrapper that applies a role to a host pattern.
fn wrapper_playbook(role: &str, hosts: &str, vars: Option<&Map<String, Value>>) -> Result<String> {
    let mut entry = json!({ "role": role });
    if let Some(vars) = vars {
        entry["vars"] = Value::Object(vars.clone());
    }
    let play = json!([{
        "hosts": hosts,
        "gather_facts": false,
        "roles": [entry],
    }]);
    Ok(serde_yaml::to_string(&play)?)
}

/// Run a role by generating a wrapper playbook and running it.
///
/// The wrapper file lives only for this invocation; role variables go
/// into the play's `roles` entry rather than `--extra-vars`, so role
/// defaults keep their normal precedence.
#[allow(clippy::too_many_arguments)]
pub fn run(
    name: &str,
    hosts: &str,
    inventory: Option<String>,
    vars: Option<&str>,
    check: bool,
    diff: bool,
    cwd: Option<PathBuf>,
    project: Option<&str>,
    verbosity: u8,
) -> Result<i32> {
    let vars = match vars {
        Some(raw) => {
            let value: Value =
                serde_json::from_str(raw).context("--vars must be valid JSON")?;
            match value {
                Value::Object(map) => Some(map),
                _ => bail!("--vars must be a JSON object"),
            }
        }
        None => None,
    };
    let yaml = wrapper_playbook(name, hosts, vars.as_ref())?;

    let command = resolve_context(project, cwd)?;
    let mut file = tempfile::Builder::new()
        .prefix("role_")
        .suffix(".yml")
        .tempfile()?;
    file.write_all(yaml.as_bytes())?;
    file.flush()?;

    let options = PlaybookOptions {
        playbook: file.path().to_path_buf(),
        inventory: inventory.or_else(|| command.default_inventory()),
        extra_vars: None,
        tags: Vec::new(),
        skip_tags: Vec::new(),
        limit: None,
        check,
        diff,
        verbosity,
    };
    let report = Client::new().run_playbook(&options, &command.context)?;
    finish_run(&report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_creates_standard_layout() {
        let dir = tempfile::tempdir().unwrap();
        init(dir.path(), "webserver").unwrap();

        let role = dir.path().join("webserver");
        for sub in ROLE_DIRS {
            assert!(role.join(sub).is_dir(), "missing {sub}");
        }
        for sub in MAIN_YML_DIRS {
            let main = role.join(sub).join("main.yml");
            assert_eq!(fs::read_to_string(main).unwrap(), "---\n");
        }
        assert!(!role.join("files").join("main.yml").exists());
    }

    #[test]
    fn test_init_preserves_existing_main_yml() {
        let dir = tempfile::tempdir().unwrap();
        let tasks = dir.path().join("webserver").join("tasks");
        fs::create_dir_all(&tasks).unwrap();
        fs::write(tasks.join("main.yml"), "---\n- name: keep me\n").unwrap();

        init(dir.path(), "webserver").unwrap();
        assert_eq!(
            fs::read_to_string(tasks.join("main.yml")).unwrap(),
            "---\n- name: keep me\n"
        );
    }

    #[test]
    fn test_init_rejects_path_separators() {
        let dir = tempfile::tempdir().unwrap();
        assert!(init(dir.path(), "../escape").is_err());
        assert!(init(dir.path(), "").is_err());
    }

    #[test]
    fn test_wrapper_playbook_shape() {
        let yaml = wrapper_playbook("nginx", "web", None).unwrap();
        let parsed: serde_yaml::Value = serde_yaml::from_str(&yaml).unwrap();

        assert_eq!(parsed[0]["hosts"], "web");
        assert_eq!(parsed[0]["gather_facts"], false);
        assert_eq!(parsed[0]["roles"][0]["role"], "nginx");
        assert!(parsed[0]["roles"][0].get("vars").is_none());
    }

    #[test]
    fn test_wrapper_playbook_nests_vars_under_role() {
        let vars = json!({"port": 8080}).as_object().cloned();
        let yaml = wrapper_playbook("nginx", "all", vars.as_ref()).unwrap();
        let parsed: serde_yaml::Value = serde_yaml::from_str(&yaml).unwrap();

        assert_eq!(parsed[0]["roles"][0]["vars"]["port"], 8080);
    }

    #[test]
    fn test_run_rejects_non_object_vars() {
        assert!(run("nginx", "all", None, Some("[1]"), false, false, None, None, 0).is_err());
        assert!(run("nginx", "all", None, Some("not json"), false, false, None, None, 0).is_err());
    }
}
