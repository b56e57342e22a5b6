use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ansictl")]
#[command(author = "Alberto Cavalcante")]
#[command(version)]
#[command(about = "Unified CLI for driving Ansible projects", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (also forwarded to the toolchain as -v..-vvvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Inspect and compare inventories
    #[command(subcommand)]
    Inventory(InventoryCommand),

    /// Run, validate, and author playbooks
    #[command(subcommand)]
    Playbook(PlaybookCommand),

    /// Run an ad-hoc module against a host pattern
    Task(TaskArgs),

    /// Operate on vault-encrypted files
    #[command(subcommand)]
    Vault(VaultCommand),

    /// Install roles and collections
    #[command(subcommand)]
    Galaxy(GalaxyCommand),

    /// Manage registered projects
    #[command(subcommand)]
    Project(ProjectCommand),

    /// Scaffold and run roles
    #[command(subcommand)]
    Role(RoleCommand),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

// ============================================================================
// Inventory
// ============================================================================

/// One side of an inventory acquisition.
#[derive(Args, Debug, Clone, Default)]
pub struct InventorySide {
    /// Inventory sources (repeatable); joined into one -i argument
    #[arg(short = 'i', long = "inventory")]
    pub inventory: Vec<String>,

    /// Working directory for the toolchain invocation
    #[arg(long)]
    pub cwd: Option<PathBuf>,

    /// ansible.cfg override, injected via ANSIBLE_CONFIG
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum InventoryCommand {
    /// Normalize the inventory into hosts, groups, and optional hostvars
    List {
        #[command(flatten)]
        side: InventorySide,

        /// Include per-host variables in the snapshot
        #[arg(long)]
        hostvars: bool,

        /// Registered project supplying inventory and environment
        #[arg(long)]
        project: Option<String>,
    },

    /// Diff two inventory configurations (left is the baseline)
    Diff {
        /// Left (baseline) inventory sources
        #[arg(long = "left-inventory")]
        left_inventory: Vec<String>,

        /// Left working directory
        #[arg(long)]
        left_cwd: Option<PathBuf>,

        /// Left ansible.cfg override
        #[arg(long)]
        left_config: Option<PathBuf>,

        /// Right (candidate) inventory sources
        #[arg(long = "right-inventory")]
        right_inventory: Vec<String>,

        /// Right working directory
        #[arg(long)]
        right_cwd: Option<PathBuf>,

        /// Right ansible.cfg override
        #[arg(long)]
        right_config: Option<PathBuf>,

        /// Also diff per-host variable keys
        #[arg(long)]
        hostvars: bool,
    },
}

// ============================================================================
// Playbook
// ============================================================================

#[derive(Args, Debug, Clone)]
pub struct PlaybookRunArgs {
    /// Path to the playbook file
    pub playbook: PathBuf,

    /// Inventory path or host list (e.g. hosts.ini or 'localhost,')
    #[arg(short = 'i', long)]
    pub inventory: Option<String>,

    /// Extra variables as a JSON object
    #[arg(short = 'e', long)]
    pub extra_vars: Option<String>,

    /// Tags to include
    #[arg(long, value_delimiter = ',')]
    pub tags: Vec<String>,

    /// Tags to skip
    #[arg(long, value_delimiter = ',')]
    pub skip_tags: Vec<String>,

    /// Host limit pattern
    #[arg(short = 'l', long)]
    pub limit: Option<String>,

    /// Run in check mode
    #[arg(long)]
    pub check: bool,

    /// Show diffs
    #[arg(long)]
    pub diff: bool,

    /// Working directory
    #[arg(long)]
    pub cwd: Option<PathBuf>,

    /// Registered project supplying inventory and environment
    #[arg(long)]
    pub project: Option<String>,
}

#[derive(Subcommand)]
pub enum PlaybookCommand {
    /// Run a playbook and report exit code, output, and recap
    Run(PlaybookRunArgs),

    /// Validate playbook syntax without executing it
    Check {
        /// Path to the playbook file
        playbook: PathBuf,

        /// Inventory path or host list
        #[arg(short = 'i', long)]
        inventory: Option<String>,

        /// Working directory
        #[arg(long)]
        cwd: Option<PathBuf>,
    },

    /// Run a playbook twice and certify the second run changes nothing
    Idempotent(PlaybookRunArgs),

    /// Write a playbook file from YAML or JSON content
    Create {
        /// Playbook content (YAML text, or JSON with --json)
        content: String,

        /// Output path; a temp file is created when omitted
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,

        /// Treat the content as JSON and convert it to YAML
        #[arg(long)]
        json: bool,
    },
}

// ============================================================================
// Ad-hoc task
// ============================================================================

#[derive(Args, Debug, Clone)]
pub struct TaskArgs {
    /// Inventory host pattern to target (e.g. all or web)
    pub pattern: String,

    /// Module name (e.g. ping, shell)
    #[arg(short = 'm', long)]
    pub module: String,

    /// Module arguments as a plain string
    #[arg(short = 'a', long)]
    pub args: Option<String>,

    /// Module arguments as a JSON object (rendered to key=value pairs)
    #[arg(long, conflicts_with = "args")]
    pub args_json: Option<String>,

    /// Inventory path or host list
    #[arg(short = 'i', long)]
    pub inventory: Option<String>,

    /// Use privilege escalation
    #[arg(long)]
    pub r#become: bool,

    /// Target user when escalating
    #[arg(long)]
    pub become_user: Option<String>,

    /// Run in check mode
    #[arg(long)]
    pub check: bool,

    /// Show diffs
    #[arg(long)]
    pub diff: bool,

    /// Connection type (defaults to local when targeting localhost)
    #[arg(short = 'c', long)]
    pub connection: Option<String>,

    /// Working directory
    #[arg(long)]
    pub cwd: Option<PathBuf>,

    /// Registered project supplying inventory and environment
    #[arg(long)]
    pub project: Option<String>,
}

// ============================================================================
// Vault
// ============================================================================

/// Credential flags shared by the vault subcommands.
#[derive(Args, Debug, Clone, Default)]
pub struct VaultCredentialArgs {
    /// Vault password value (materialized to a scoped temp file)
    #[arg(long)]
    pub vault_password: Option<String>,

    /// Existing vault password file
    #[arg(long, conflicts_with = "vault_password")]
    pub vault_password_file: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct VaultFileArgs {
    /// Files to operate on
    #[arg(required = true)]
    pub files: Vec<String>,

    #[command(flatten)]
    pub credential: VaultCredentialArgs,

    /// Working directory
    #[arg(long)]
    pub cwd: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum VaultCommand {
    /// Encrypt files at rest
    Encrypt(VaultFileArgs),

    /// Decrypt files at rest
    Decrypt(VaultFileArgs),

    /// View encrypted files without rewriting them
    View(VaultFileArgs),

    /// Re-encrypt files under a new password
    Rekey {
        /// Files to re-encrypt
        #[arg(required = true)]
        files: Vec<String>,

        /// Current vault password value
        #[arg(long)]
        old_vault_password: Option<String>,

        /// Current vault password file
        #[arg(long, conflicts_with = "old_vault_password")]
        old_vault_password_file: Option<PathBuf>,

        /// New vault password value
        #[arg(long)]
        new_vault_password: Option<String>,

        /// New vault password file
        #[arg(long, conflicts_with = "new_vault_password")]
        new_vault_password_file: Option<PathBuf>,

        /// Working directory
        #[arg(long)]
        cwd: Option<PathBuf>,
    },

    /// Encrypt a single string as a vaulted variable
    EncryptString {
        /// Value to encrypt
        value: String,

        /// Variable name for the vaulted value
        #[arg(long)]
        name: Option<String>,

        #[command(flatten)]
        credential: VaultCredentialArgs,

        /// Working directory
        #[arg(long)]
        cwd: Option<PathBuf>,
    },
}

// ============================================================================
// Galaxy
// ============================================================================

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum GalaxyKindArg {
    Role,
    Collection,
}

#[derive(Subcommand)]
pub enum GalaxyCommand {
    /// Install roles or collections
    Install {
        /// What to install
        #[arg(value_enum)]
        kind: GalaxyKindArg,

        /// Names to install
        names: Vec<String>,

        /// Requirements file
        #[arg(short = 'r', long)]
        requirements: Option<PathBuf>,

        /// Installation destination
        #[arg(short = 'p', long)]
        dest: Option<PathBuf>,

        /// Overwrite existing content
        #[arg(long)]
        force: bool,

        /// Working directory
        #[arg(long)]
        cwd: Option<PathBuf>,

        /// Registered project supplying paths and environment
        #[arg(long)]
        project: Option<String>,
    },
}

// ============================================================================
// Project registry
// ============================================================================

#[derive(Subcommand)]
pub enum ProjectCommand {
    /// Register an Ansible project (or update an existing one)
    Register {
        /// Unique project name
        name: String,

        /// Project root directory
        root: PathBuf,

        /// Default inventory file or directory
        #[arg(long)]
        inventory: Option<PathBuf>,

        /// Roles path exported via ANSIBLE_ROLES_PATH (repeatable)
        #[arg(long = "roles-path")]
        roles_paths: Vec<String>,

        /// Collections path exported via ANSIBLE_COLLECTIONS_PATHS (repeatable)
        #[arg(long = "collections-path")]
        collections_paths: Vec<String>,

        /// Extra environment as KEY=VALUE (repeatable)
        #[arg(long = "env")]
        env: Vec<String>,

        /// Make this project the default
        #[arg(long)]
        default: bool,
    },

    /// List registered projects and the default selection
    List,

    /// Discover playbooks under a project root
    Playbooks {
        /// Project name (omit to use the environment override or default)
        project: Option<String>,
    },

    /// Run a playbook within a project, applying its inventory and environment
    Run {
        /// Path to the playbook file
        playbook: PathBuf,

        /// Project name (omit to use the environment override or default)
        #[arg(long)]
        project: Option<String>,

        /// Extra variables as a JSON object
        #[arg(short = 'e', long)]
        extra_vars: Option<String>,

        /// Tags to include
        #[arg(long, value_delimiter = ',')]
        tags: Vec<String>,

        /// Tags to skip
        #[arg(long, value_delimiter = ',')]
        skip_tags: Vec<String>,

        /// Host limit pattern
        #[arg(short = 'l', long)]
        limit: Option<String>,

        /// Run in check mode
        #[arg(long)]
        check: bool,

        /// Show diffs
        #[arg(long)]
        diff: bool,
    },
}

// ============================================================================
// Role scaffolding
// ============================================================================

#[derive(Subcommand)]
pub enum RoleCommand {
    /// Generate the standard role directory structure
    Init {
        /// Directory the role directory is created under
        base_path: PathBuf,

        /// Role name
        name: String,
    },

    /// Run a role through a generated wrapper playbook
    Run {
        /// Role name
        name: String,

        /// Target hosts pattern
        #[arg(long, default_value = "all")]
        hosts: String,

        /// Inventory path or host list
        #[arg(short = 'i', long)]
        inventory: Option<String>,

        /// Role variables as a JSON object
        #[arg(long)]
        vars: Option<String>,

        /// Run in check mode
        #[arg(long)]
        check: bool,

        /// Show diffs
        #[arg(long)]
        diff: bool,

        /// Working directory
        #[arg(long)]
        cwd: Option<PathBuf>,

        /// Registered project supplying inventory and environment
        #[arg(long)]
        project: Option<String>,
    },
}
