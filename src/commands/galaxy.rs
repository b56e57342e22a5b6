//! `ansictl galaxy` subcommands.

use anyhow::{Result, bail};
use std::path::PathBuf;

use anskit::{Client, GalaxyKind, GalaxyOptions};

use super::{finish_run, resolve_context};
use crate::cli::GalaxyKindArg;

impl From<GalaxyKindArg> for GalaxyKind {
    fn from(kind: GalaxyKindArg) -> Self {
        match kind {
            GalaxyKindArg::Role => GalaxyKind::Role,
            GalaxyKindArg::Collection => GalaxyKind::Collection,
        }
    }
}

/// Install roles or collections and print the run report.
#[allow(clippy::too_many_arguments)]
pub fn install(
    kind: GalaxyKindArg,
    names: Vec<String>,
    requirements: Option<PathBuf>,
    dest: Option<PathBuf>,
    force: bool,
    cwd: Option<PathBuf>,
    project: Option<&str>,
) -> Result<i32> {
    if names.is_empty() && requirements.is_none() {
        bail!("Nothing to install: give names or a requirements file (-r)");
    }
    let command = resolve_context(project, cwd)?;
    let options = GalaxyOptions {
        kind: kind.into(),
        names,
        requirements,
        dest,
        force,
    };
    let report = Client::new().galaxy_install(&options, &command.context)?;
    finish_run(&report)
}
