//! `ansictl task`: ad-hoc module invocations.

use anyhow::{Context, Result, bail};
use serde_json::Value;

use anskit::{Client, ModuleArgs, TaskOptions};

use super::{finish_run, resolve_context};
use crate::cli::TaskArgs;

fn module_args(args: &TaskArgs) -> Result<Option<ModuleArgs>> {
    if let Some(raw) = &args.args_json {
        let value: Value =
            serde_json::from_str(raw).context("--args-json must be valid JSON")?;
        match value {
            Value::Object(map) => return Ok(Some(ModuleArgs::Map(map))),
            _ => bail!("--args-json must be a JSON object"),
        }
    }
    Ok(args.args.clone().map(ModuleArgs::Raw))
}

/// Run a module against a host pattern and print the run report.
pub fn run(args: &TaskArgs, verbosity: u8) -> Result<i32> {
    let command = resolve_context(args.project.as_deref(), args.cwd.clone())?;
    let options = TaskOptions {
        pattern: args.pattern.clone(),
        module: args.module.clone(),
        args: module_args(args)?,
        inventory: args
            .inventory
            .clone()
            .or_else(|| command.default_inventory()),
        r#become: args.r#become,
        become_user: args.become_user.clone(),
        check: args.check,
        diff: args.diff,
        connection: args.connection.clone(),
        verbosity,
    };
    let report = Client::new().run_task(&options, &command.context)?;
    finish_run(&report)
}
