//! Playbook discovery under a project root.

use std::path::Path;

use walkdir::WalkDir;

/// Directories that never contain project playbooks.
const EXCLUDED_DIRS: &[&str] = &[
    ".git",
    ".venv",
    "venv",
    "__pycache__",
    "collections",
    "inventory",
    "roles",
    "node_modules",
];

fn is_excluded(entry: &walkdir::DirEntry) -> bool {
    entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| EXCLUDED_DIRS.contains(&name))
}

fn is_yaml_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("yml" | "yaml")
    )
}

/// Find playbooks below `root`: YAML files whose top level is a sequence.
///
/// Files that cannot be read or parsed are skipped silently, so a broken
/// template in the tree never fails discovery. Results are sorted.
pub fn discover_playbooks(root: &Path) -> Vec<String> {
    let mut playbooks: Vec<String> = WalkDir::new(root)
        .into_iter()
        .filter_entry(|entry| !is_excluded(entry))
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.file_type().is_file() && is_yaml_file(entry.path()))
        .filter_map(|entry| {
            let content = std::fs::read_to_string(entry.path()).ok()?;
            let parsed: serde_yaml::Value = serde_yaml::from_str(&content).ok()?;
            parsed
                .is_sequence()
                .then(|| entry.path().display().to_string())
        })
        .collect();
    playbooks.sort();
    playbooks
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_discovers_only_yaml_sequences() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("site.yml"),
            "- hosts: all\n  tasks: []\n",
        )
        .unwrap();
        fs::write(dir.path().join("vars.yml"), "key: value\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "- not yaml extension\n").unwrap();
        fs::write(dir.path().join("broken.yml"), "hosts: [unclosed\n").unwrap();

        let playbooks = discover_playbooks(dir.path());
        assert_eq!(playbooks.len(), 1);
        assert!(playbooks[0].ends_with("site.yml"));
    }

    #[test]
    fn test_excluded_directories_are_pruned() {
        let dir = tempfile::tempdir().unwrap();
        let roles = dir.path().join("roles");
        fs::create_dir_all(&roles).unwrap();
        fs::write(roles.join("tasks.yml"), "- name: hidden\n").unwrap();

        let nested = dir.path().join("plays");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("deploy.yaml"), "- hosts: web\n").unwrap();

        let playbooks = discover_playbooks(dir.path());
        assert_eq!(playbooks.len(), 1);
        assert!(playbooks[0].ends_with("deploy.yaml"));
    }

    #[test]
    fn test_results_are_sorted() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.yml"), "- hosts: all\n").unwrap();
        fs::write(dir.path().join("a.yml"), "- hosts: all\n").unwrap();

        let playbooks = discover_playbooks(dir.path());
        assert!(playbooks[0].ends_with("a.yml"));
        assert!(playbooks[1].ends_with("b.yml"));
    }
}
