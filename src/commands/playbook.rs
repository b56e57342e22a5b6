//! `ansictl playbook` subcommands.

use anyhow::{Context, Result, bail};
use serde_json::{Map, Value, json};
use std::fs;
use std::path::PathBuf;

use anskit::{Client, PlaybookOptions};

use super::{CommandContext, finish_run, print_json, resolve_context};
use crate::cli::PlaybookRunArgs;

/// Lines of the created playbook echoed back in the report.
const PREVIEW_LINES: usize = 50;

fn parse_extra_vars(raw: Option<&str>) -> Result<Option<Map<String, Value>>> {
    let Some(raw) = raw else { return Ok(None) };
    let value: Value =
        serde_json::from_str(raw).context("--extra-vars must be valid JSON")?;
    match value {
        Value::Object(map) => Ok(Some(map)),
        _ => bail!("--extra-vars must be a JSON object"),
    }
}

fn options_from(args: &PlaybookRunArgs, verbosity: u8) -> Result<(PlaybookOptions, CommandContext)> {
    let command = resolve_context(args.project.as_deref(), args.cwd.clone())?;
    let options = PlaybookOptions {
        playbook: args.playbook.clone(),
        inventory: args
            .inventory
            .clone()
            .or_else(|| command.default_inventory()),
        extra_vars: parse_extra_vars(args.extra_vars.as_deref())?,
        tags: args.tags.clone(),
        skip_tags: args.skip_tags.clone(),
        limit: args.limit.clone(),
        check: args.check,
        diff: args.diff,
        verbosity,
    };
    Ok((options, command))
}

/// Run a playbook and print the run report.
pub fn run(args: &PlaybookRunArgs, verbosity: u8) -> Result<i32> {
    let (options, command) = options_from(args, verbosity)?;
    let report = Client::new().run_playbook(&options, &command.context)?;
    finish_run(&report)
}

/// Validate playbook syntax without executing it.
pub fn check(
    playbook: &std::path::Path,
    inventory: Option<&str>,
    cwd: Option<PathBuf>,
) -> Result<i32> {
    let command = resolve_context(None, cwd)?;
    let report = Client::new().syntax_check(playbook, inventory, &command.context)?;
    finish_run(&report)
}

/// Run a playbook twice and print the idempotence verdict.
pub fn idempotent(args: &PlaybookRunArgs, verbosity: u8) -> Result<i32> {
    let (options, command) = options_from(args, verbosity)?;
    let verdict = Client::new().verify_playbook_idempotent(&options, &command.context)?;
    print_json(&verdict)?;
    Ok(i32::from(!verdict.ok))
}

/// Write a playbook file from YAML or JSON content and print a report.
pub fn create(content: &str, output: Option<PathBuf>, json_input: bool) -> Result<i32> {
    let yaml = if json_input {
        let value: Value =
            serde_json::from_str(content).context("playbook content is not valid JSON")?;
        if !value.is_array() {
            log::warn!("playbook content is not a top-level list of plays");
        }
        serde_yaml::to_string(&value)?
    } else {
        let parsed: serde_yaml::Value =
            serde_yaml::from_str(content).context("playbook content is not valid YAML")?;
        if !parsed.is_sequence() {
            log::warn!("playbook content is not a top-level list of plays");
        }
        let mut text = content.to_string();
        if !text.ends_with('\n') {
            text.push('\n');
        }
        text
    };

    let path = match output {
        Some(path) => {
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
            {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, &yaml)
                .with_context(|| format!("Could not write {}", path.display()))?;
            path
        }
        None => {
            let file = tempfile::Builder::new()
                .prefix("playbook_")
                .suffix(".yml")
                .tempfile()?;
            let (_, path) = file.keep().context("Could not persist playbook file")?;
            fs::write(&path, &yaml)?;
            path
        }
    };

    let lines: Vec<&str> = yaml.lines().collect();
    print_json(&json!({
        "ok": true,
        "path": path.display().to_string(),
        "bytes_written": yaml.len(),
        "preview": lines.iter().take(PREVIEW_LINES).collect::<Vec<_>>(),
        "truncated": lines.len() > PREVIEW_LINES,
    }))?;
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_extra_vars_object() {
        let vars = parse_extra_vars(Some(r#"{"version": "1.2"}"#))
            .unwrap()
            .unwrap();
        assert_eq!(vars["version"], "1.2");
    }

    #[test]
    fn test_parse_extra_vars_rejects_non_object() {
        assert!(parse_extra_vars(Some("[1, 2]")).is_err());
        assert!(parse_extra_vars(Some("not json")).is_err());
    }

    #[test]
    fn test_parse_extra_vars_absent() {
        assert!(parse_extra_vars(None).unwrap().is_none());
    }

    #[test]
    fn test_create_writes_yaml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plays/site.yml");

        let code = create("- hosts: all\n  tasks: []", Some(path.clone()), false).unwrap();
        assert_eq!(code, 0);
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.ends_with('\n'));
    }

    #[test]
    fn test_create_converts_json_to_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("site.yml");

        create(r#"[{"hosts": "all"}]"#, Some(path.clone()), true).unwrap();
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("hosts: all"));
    }

    #[test]
    fn test_create_rejects_invalid_content() {
        assert!(create("hosts: [unclosed", None, false).is_err());
        assert!(create("{not json", None, true).is_err());
    }
}
