mod cli;
mod commands;
mod config;
mod discover;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use cli::{
    Cli, Commands, GalaxyCommand, InventoryCommand, PlaybookCommand, ProjectCommand, RoleCommand,
    VaultCommand,
};
use std::io;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(if cli.quiet {
            log::LevelFilter::Error
        } else {
            log_level
        })
        .format_timestamp(None)
        .init();

    let verbosity = cli.verbose;

    let code = match cli.command {
        Commands::Inventory(cmd) => match cmd {
            InventoryCommand::List {
                side,
                hostvars,
                project,
            } => commands::inventory::list(&side, hostvars, project.as_deref())?,
            InventoryCommand::Diff {
                left_inventory,
                left_cwd,
                left_config,
                right_inventory,
                right_cwd,
                right_config,
                hostvars,
            } => commands::inventory::diff(
                left_inventory,
                left_cwd,
                left_config,
                right_inventory,
                right_cwd,
                right_config,
                hostvars,
            )?,
        },
        Commands::Playbook(cmd) => match cmd {
            PlaybookCommand::Run(args) => commands::playbook::run(&args, verbosity)?,
            PlaybookCommand::Check {
                playbook,
                inventory,
                cwd,
            } => commands::playbook::check(&playbook, inventory.as_deref(), cwd)?,
            PlaybookCommand::Idempotent(args) => commands::playbook::idempotent(&args, verbosity)?,
            PlaybookCommand::Create {
                content,
                output,
                json,
            } => commands::playbook::create(&content, output, json)?,
        },
        Commands::Task(args) => commands::task::run(&args, verbosity)?,
        Commands::Vault(cmd) => match cmd {
            VaultCommand::Encrypt(args) => {
                commands::vault::encrypt(&args.files, &args.credential, args.cwd)?
            }
            VaultCommand::Decrypt(args) => {
                commands::vault::decrypt(&args.files, &args.credential, args.cwd)?
            }
            VaultCommand::View(args) => {
                commands::vault::view(&args.files, &args.credential, args.cwd)?
            }
            VaultCommand::Rekey {
                files,
                old_vault_password,
                old_vault_password_file,
                new_vault_password,
                new_vault_password_file,
                cwd,
            } => commands::vault::rekey(
                &files,
                old_vault_password.as_deref(),
                old_vault_password_file.as_deref(),
                new_vault_password.as_deref(),
                new_vault_password_file.as_deref(),
                cwd,
            )?,
            VaultCommand::EncryptString {
                value,
                name,
                credential,
                cwd,
            } => commands::vault::encrypt_string(&value, name.as_deref(), &credential, cwd)?,
        },
        Commands::Galaxy(cmd) => match cmd {
            GalaxyCommand::Install {
                kind,
                names,
                requirements,
                dest,
                force,
                cwd,
                project,
            } => commands::galaxy::install(
                kind,
                names,
                requirements,
                dest,
                force,
                cwd,
                project.as_deref(),
            )?,
        },
        Commands::Project(cmd) => match cmd {
            ProjectCommand::Register {
                name,
                root,
                inventory,
                roles_paths,
                collections_paths,
                env,
                default,
            } => commands::project::register(
                name,
                root,
                inventory,
                roles_paths,
                collections_paths,
                &env,
                default,
            )?,
            ProjectCommand::List => commands::project::list()?,
            ProjectCommand::Playbooks { project } => {
                commands::project::playbooks(project.as_deref())?
            }
            ProjectCommand::Run {
                playbook,
                project,
                extra_vars,
                tags,
                skip_tags,
                limit,
                check,
                diff,
            } => commands::project::run(
                playbook,
                project.as_deref(),
                extra_vars.as_deref(),
                tags,
                skip_tags,
                limit,
                check,
                diff,
                verbosity,
            )?,
        },
        Commands::Role(cmd) => match cmd {
            RoleCommand::Init { base_path, name } => commands::role::init(&base_path, &name)?,
            RoleCommand::Run {
                name,
                hosts,
                inventory,
                vars,
                check,
                diff,
                cwd,
                project,
            } => commands::role::run(
                &name,
                &hosts,
                inventory,
                vars.as_deref(),
                check,
                diff,
                cwd,
                project.as_deref(),
                verbosity,
            )?,
        },
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(shell, &mut cmd, name, &mut io::stdout());
            0
        }
    };

    std::process::exit(code);
}
