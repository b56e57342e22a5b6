//! Argument-vector builders for the toolchain binaries.
//!
//! Typed options in, `Vec<String>` argv out. Nothing here executes
//! anything; builders are pure so every flag translation is testable
//! without a subprocess.

use std::path::PathBuf;

use serde_json::Value;

/// Highest verbosity the toolchain understands (`-vvvv`).
const MAX_VERBOSITY: u8 = 4;

fn push_verbosity(argv: &mut Vec<String>, verbosity: u8) {
    if verbosity > 0 {
        let level = verbosity.min(MAX_VERBOSITY) as usize;
        argv.push(format!("-{}", "v".repeat(level)));
    }
}

fn push_inventory(argv: &mut Vec<String>, inventory: Option<&str>) {
    if let Some(inventory) = inventory {
        argv.push("-i".to_string());
        argv.push(inventory.to_string());
    }
}

/// Options for an `ansible-playbook` run.
#[derive(Debug, Clone, Default)]
pub struct PlaybookOptions {
    /// Path to the playbook file
    pub playbook: PathBuf,
    /// Inventory path or host list (e.g. `hosts.ini` or `localhost,`)
    pub inventory: Option<String>,
    /// Variables passed as a single JSON `--extra-vars` argument
    pub extra_vars: Option<serde_json::Map<String, Value>>,
    /// Tags to include
    pub tags: Vec<String>,
    /// Tags to skip
    pub skip_tags: Vec<String>,
    /// Host limit pattern
    pub limit: Option<String>,
    /// Run in check mode
    pub check: bool,
    /// Show diffs
    pub diff: bool,
    /// Verbosity level 1-4, rendered as `-v`..`-vvvv`
    pub verbosity: u8,
}

impl PlaybookOptions {
    /// Options for running the given playbook with defaults everywhere else.
    pub fn new(playbook: impl Into<PathBuf>) -> Self {
        Self {
            playbook: playbook.into(),
            ..Self::default()
        }
    }
}

/// Build the `ansible-playbook` argument vector.
pub fn playbook_argv(options: &PlaybookOptions) -> Vec<String> {
    let mut argv = vec![
        "ansible-playbook".to_string(),
        options.playbook.display().to_string(),
    ];
    push_inventory(&mut argv, options.inventory.as_deref());
    if let Some(extra_vars) = &options.extra_vars {
        argv.push("--extra-vars".to_string());
        argv.push(Value::Object(extra_vars.clone()).to_string());
    }
    if !options.tags.is_empty() {
        argv.push("--tags".to_string());
        argv.push(options.tags.join(","));
    }
    if !options.skip_tags.is_empty() {
        argv.push("--skip-tags".to_string());
        argv.push(options.skip_tags.join(","));
    }
    if let Some(limit) = &options.limit {
        argv.push("--limit".to_string());
        argv.push(limit.clone());
    }
    if options.check {
        argv.push("--check".to_string());
    }
    if options.diff {
        argv.push("--diff".to_string());
    }
    push_verbosity(&mut argv, options.verbosity);
    argv
}

/// Build the `ansible-playbook --syntax-check` argument vector.
pub fn syntax_check_argv(playbook: &std::path::Path, inventory: Option<&str>) -> Vec<String> {
    let mut argv = vec![
        "ansible-playbook".to_string(),
        "--syntax-check".to_string(),
        playbook.display().to_string(),
    ];
    push_inventory(&mut argv, inventory);
    argv
}

/// Module arguments for an ad-hoc task.
#[derive(Debug, Clone)]
pub enum ModuleArgs {
    /// Pre-formatted argument string passed through verbatim
    Raw(String),
    /// Key/value map rendered as space-joined `key=value` pairs
    Map(serde_json::Map<String, Value>),
}

impl ModuleArgs {
    /// Render for the `-a` flag.
    pub fn render(&self) -> String {
        match self {
            ModuleArgs::Raw(raw) => raw.clone(),
            ModuleArgs::Map(map) => render_module_args(map),
        }
    }
}

/// Render a key/value map the way the toolchain's splitter expects:
/// nested objects and arrays become shell-quoted JSON, booleans become
/// `yes`/`no`, null becomes an empty value, scalars are shell-quoted.
pub fn render_module_args(map: &serde_json::Map<String, Value>) -> String {
    let mut parts: Vec<String> = Vec::with_capacity(map.len());
    for (key, value) in map {
        let part = match value {
            Value::Object(_) | Value::Array(_) => {
                format!("{key}={}", shell_words::quote(&value.to_string()))
            }
            Value::Bool(true) => format!("{key}=yes"),
            Value::Bool(false) => format!("{key}=no"),
            Value::Null => format!("{key}="),
            Value::String(text) => format!("{key}={}", shell_words::quote(text)),
            other => format!("{key}={}", shell_words::quote(&other.to_string())),
        };
        parts.push(part);
    }
    parts.join(" ")
}

/// Options for an ad-hoc `ansible` module invocation.
#[derive(Debug, Clone)]
pub struct TaskOptions {
    /// Inventory host pattern to target (e.g. `all` or `web`)
    pub pattern: String,
    /// Module name (e.g. `ping`, `shell`)
    pub module: String,
    /// Module arguments
    pub args: Option<ModuleArgs>,
    /// Inventory path or host list
    pub inventory: Option<String>,
    /// Use privilege escalation
    pub r#become: bool,
    /// Target user when escalating
    pub become_user: Option<String>,
    /// Run in check mode
    pub check: bool,
    /// Show diffs
    pub diff: bool,
    /// Connection type; defaults to `local` when targeting localhost
    pub connection: Option<String>,
    /// Verbosity level 1-4
    pub verbosity: u8,
}

impl TaskOptions {
    /// Options for running `module` against `pattern` with defaults.
    pub fn new(pattern: impl Into<String>, module: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            module: module.into(),
            args: None,
            inventory: None,
            r#become: false,
            become_user: None,
            check: false,
            diff: false,
            connection: None,
            verbosity: 0,
        }
    }
}

/// Build the ad-hoc `ansible` argument vector.
pub fn task_argv(options: &TaskOptions) -> Vec<String> {
    let mut argv = vec![
        "ansible".to_string(),
        options.pattern.clone(),
        "-m".to_string(),
        options.module.clone(),
    ];
    if let Some(args) = &options.args {
        argv.push("-a".to_string());
        argv.push(args.render());
    }
    push_inventory(&mut argv, options.inventory.as_deref());
    // Loopback targets without an explicit connection run locally.
    let connection = options.connection.clone().or_else(|| {
        matches!(options.pattern.as_str(), "localhost" | "127.0.0.1").then(|| "local".to_string())
    });
    if let Some(connection) = connection {
        argv.push("-c".to_string());
        argv.push(connection);
    }
    if options.r#become {
        argv.push("--become".to_string());
    }
    if let Some(user) = &options.become_user {
        argv.push("--become-user".to_string());
        argv.push(user.clone());
    }
    if options.check {
        argv.push("--check".to_string());
    }
    if options.diff {
        argv.push("--diff".to_string());
    }
    push_verbosity(&mut argv, options.verbosity);
    argv
}

/// What `ansible-galaxy` should install.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GalaxyKind {
    /// Standalone role
    Role,
    /// Collection
    Collection,
}

impl GalaxyKind {
    /// Subcommand name for this kind.
    pub fn subcommand(&self) -> &'static str {
        match self {
            GalaxyKind::Role => "role",
            GalaxyKind::Collection => "collection",
        }
    }
}

/// Options for `ansible-galaxy <kind> install`.
#[derive(Debug, Clone)]
pub struct GalaxyOptions {
    /// Role or collection installation
    pub kind: GalaxyKind,
    /// Names to install
    pub names: Vec<String>,
    /// Requirements file (`-r`)
    pub requirements: Option<PathBuf>,
    /// Installation destination (`-p`)
    pub dest: Option<PathBuf>,
    /// Overwrite existing content
    pub force: bool,
}

/// Build the `ansible-galaxy` argument vector.
pub fn galaxy_argv(options: &GalaxyOptions) -> Vec<String> {
    let mut argv = vec![
        "ansible-galaxy".to_string(),
        options.kind.subcommand().to_string(),
        "install".to_string(),
    ];
    argv.extend(options.names.iter().cloned());
    if let Some(requirements) = &options.requirements {
        argv.push("-r".to_string());
        argv.push(requirements.display().to_string());
    }
    if let Some(dest) = &options.dest {
        argv.push("-p".to_string());
        argv.push(dest.display().to_string());
    }
    if options.force {
        argv.push("--force".to_string());
    }
    argv
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::path::Path;

    #[test]
    fn test_playbook_argv_minimal() {
        let options = PlaybookOptions::new("site.yml");
        assert_eq!(playbook_argv(&options), vec!["ansible-playbook", "site.yml"]);
    }

    #[test]
    fn test_playbook_argv_full() {
        let mut options = PlaybookOptions::new("site.yml");
        options.inventory = Some("hosts.ini".to_string());
        options.extra_vars = json!({"version": "1.2", "debug": true})
            .as_object()
            .cloned();
        options.tags = vec!["deploy".to_string(), "web".to_string()];
        options.skip_tags = vec!["slow".to_string()];
        options.limit = Some("web*".to_string());
        options.check = true;
        options.diff = true;
        options.verbosity = 2;

        let argv = playbook_argv(&options);
        assert_eq!(argv[0], "ansible-playbook");
        assert!(argv.contains(&"--extra-vars".to_string()));
        assert!(argv.contains(&r#"{"debug":true,"version":"1.2"}"#.to_string()));
        assert!(argv.contains(&"deploy,web".to_string()));
        assert!(argv.contains(&"--check".to_string()));
        assert_eq!(argv.last().unwrap(), "-vv");
    }

    #[test]
    fn test_verbosity_is_clamped() {
        let mut options = PlaybookOptions::new("site.yml");
        options.verbosity = 9;
        assert_eq!(playbook_argv(&options).last().unwrap(), "-vvvv");
    }

    #[test]
    fn test_syntax_check_argv() {
        let argv = syntax_check_argv(Path::new("site.yml"), Some("localhost,"));
        assert_eq!(
            argv,
            vec![
                "ansible-playbook",
                "--syntax-check",
                "site.yml",
                "-i",
                "localhost,"
            ]
        );
    }

    #[test]
    fn test_render_module_args_scalars() {
        let map = json!({
            "enabled": true,
            "disabled": false,
            "name": "nginx",
            "port": 8080,
            "comment": null
        });
        let rendered = render_module_args(map.as_object().unwrap());
        // serde_json maps iterate in sorted key order.
        assert_eq!(
            rendered,
            "comment= disabled=no enabled=yes name=nginx port=8080"
        );
    }

    #[test]
    fn test_render_module_args_quotes_spaces_and_nested() {
        let map = json!({
            "msg": "hello world",
            "opts": {"a": 1}
        });
        let rendered = render_module_args(map.as_object().unwrap());
        assert_eq!(rendered, r#"msg='hello world' opts='{"a":1}'"#);
    }

    #[test]
    fn test_task_argv_defaults_local_connection_for_localhost() {
        let options = TaskOptions::new("localhost", "ping");
        let argv = task_argv(&options);
        assert_eq!(argv, vec!["ansible", "localhost", "-m", "ping", "-c", "local"]);
    }

    #[test]
    fn test_task_argv_explicit_connection_wins() {
        let mut options = TaskOptions::new("localhost", "ping");
        options.connection = Some("ssh".to_string());
        let argv = task_argv(&options);
        assert!(argv.windows(2).any(|w| w == ["-c", "ssh"]));
    }

    #[test]
    fn test_task_argv_remote_pattern_has_no_connection() {
        let options = TaskOptions::new("web", "ping");
        assert!(!task_argv(&options).contains(&"-c".to_string()));
    }

    #[test]
    fn test_task_argv_become_and_args() {
        let mut options = TaskOptions::new("all", "shell");
        options.args = Some(ModuleArgs::Raw("uptime".to_string()));
        options.r#become = true;
        options.become_user = Some("deploy".to_string());

        let argv = task_argv(&options);
        assert!(argv.windows(2).any(|w| w == ["-a", "uptime"]));
        assert!(argv.contains(&"--become".to_string()));
        assert!(argv.windows(2).any(|w| w == ["--become-user", "deploy"]));
    }

    #[test]
    fn test_galaxy_argv() {
        let options = GalaxyOptions {
            kind: GalaxyKind::Collection,
            names: vec!["community.general".to_string()],
            requirements: None,
            dest: Some(PathBuf::from("collections")),
            force: true,
        };
        assert_eq!(
            galaxy_argv(&options),
            vec![
                "ansible-galaxy",
                "collection",
                "install",
                "community.general",
                "-p",
                "collections",
                "--force"
            ]
        );
    }

    #[test]
    fn test_galaxy_argv_requirements_file() {
        let options = GalaxyOptions {
            kind: GalaxyKind::Role,
            names: Vec::new(),
            requirements: Some(PathBuf::from("requirements.yml")),
            dest: None,
            force: false,
        };
        assert_eq!(
            galaxy_argv(&options),
            vec!["ansible-galaxy", "role", "install", "-r", "requirements.yml"]
        );
    }
}
