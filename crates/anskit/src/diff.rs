//! Set-theoretic diffing of inventory snapshots.
//!
//! Pure computation, no I/O, total over all well-formed snapshot pairs.
//! Callers must only invoke this once both snapshot acquisitions have
//! succeeded; there is no error path in here.

use std::collections::{BTreeMap, BTreeSet};

use crate::types::{InventoryDiff, InventorySnapshot, KeyChange, MembershipChange};

fn sorted_difference(a: &BTreeSet<String>, b: &BTreeSet<String>) -> Vec<String> {
    a.difference(b).cloned().collect()
}

/// Compute the delta between two snapshots, right-relative-to-left.
///
/// `left` is the baseline and `right` the candidate. Groups present on
/// both sides produce a membership entry only when their member sets
/// actually differ. When `include_hostvars` is set, variable-key deltas
/// are computed over the union of hosts from both sides, so a host that
/// disappeared or appeared between the snapshots reports its entire key
/// set as removed or added instead of being silently skipped.
pub fn diff_snapshots(
    left: &InventorySnapshot,
    right: &InventorySnapshot,
    include_hostvars: bool,
) -> InventoryDiff {
    let added_hosts = sorted_difference(&right.hosts, &left.hosts);
    let removed_hosts = sorted_difference(&left.hosts, &right.hosts);

    let left_groups: BTreeSet<String> = left.groups.keys().cloned().collect();
    let right_groups: BTreeSet<String> = right.groups.keys().cloned().collect();
    let added_groups = sorted_difference(&right_groups, &left_groups);
    let removed_groups = sorted_difference(&left_groups, &right_groups);

    let mut group_membership_changes = BTreeMap::new();
    for name in left_groups.intersection(&right_groups) {
        let left_members = &left.groups[name];
        let right_members = &right.groups[name];
        if left_members == right_members {
            continue;
        }
        group_membership_changes.insert(
            name.clone(),
            MembershipChange {
                added: sorted_difference(right_members, left_members),
                removed: sorted_difference(left_members, right_members),
            },
        );
    }

    let hostvars_key_changes = include_hostvars.then(|| {
        let mut changes = BTreeMap::new();
        let union: BTreeSet<&String> = left.hosts.union(&right.hosts).collect();
        for host in union {
            let left_keys = left.hostvar_keys(host);
            let right_keys = right.hostvar_keys(host);
            if left_keys == right_keys {
                continue;
            }
            changes.insert(
                host.clone(),
                KeyChange {
                    added: sorted_difference(&right_keys, &left_keys),
                    removed: sorted_difference(&left_keys, &right_keys),
                },
            );
        }
        changes
    });

    InventoryDiff {
        added_hosts,
        removed_hosts,
        added_groups,
        removed_groups,
        group_membership_changes,
        hostvars_key_changes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::extract_snapshot;
    use serde_json::json;

    fn snapshot_a() -> InventorySnapshot {
        extract_snapshot(
            &json!({
                "_meta": {"hostvars": {"web1": {"port": 80}, "web2": {"port": 80}}},
                "web": {"hosts": ["web1", "web2"]}
            }),
            true,
        )
    }

    fn snapshot_b() -> InventorySnapshot {
        extract_snapshot(
            &json!({
                "_meta": {"hostvars": {"web1": {"port": 80, "tls": true}, "web3": {}}},
                "web": {"hosts": ["web1", "web3"]},
                "db": {"hosts": ["db1"]}
            }),
            true,
        )
    }

    #[test]
    fn test_identity_law() {
        let snapshot = snapshot_a();
        let diff = diff_snapshots(&snapshot, &snapshot, true);
        assert!(diff.is_empty());
        assert_eq!(diff.hostvars_key_changes, Some(BTreeMap::new()));
    }

    #[test]
    fn test_antisymmetry() {
        let a = snapshot_a();
        let b = snapshot_b();
        let forward = diff_snapshots(&a, &b, false);
        let backward = diff_snapshots(&b, &a, false);
        assert_eq!(forward.added_hosts, backward.removed_hosts);
        assert_eq!(forward.removed_hosts, backward.added_hosts);
        assert_eq!(forward.added_groups, backward.removed_groups);
    }

    #[test]
    fn test_end_to_end_scenario() {
        let diff = diff_snapshots(&snapshot_a(), &snapshot_b(), false);

        assert_eq!(diff.added_hosts, vec!["db1", "web3"]);
        assert_eq!(diff.removed_hosts, vec!["web2"]);
        assert_eq!(diff.added_groups, vec!["db"]);
        assert!(diff.removed_groups.is_empty());

        let web = &diff.group_membership_changes["web"];
        assert_eq!(web.added, vec!["web3"]);
        assert_eq!(web.removed, vec!["web2"]);
        assert!(diff.hostvars_key_changes.is_none());
    }

    #[test]
    fn test_identical_groups_produce_no_entry() {
        let a = extract_snapshot(&json!({"web": {"hosts": ["w1", "w2"]}}), false);
        let b = extract_snapshot(
            &json!({"web": {"hosts": ["w2", "w1"]}, "db": {"hosts": ["d1"]}}),
            false,
        );
        let diff = diff_snapshots(&a, &b, false);
        assert!(diff.group_membership_changes.is_empty());
        assert_eq!(diff.added_groups, vec!["db"]);
    }

    #[test]
    fn test_hostvar_keys_over_union_of_hosts() {
        let diff = diff_snapshots(&snapshot_a(), &snapshot_b(), true);
        let changes = diff.hostvars_key_changes.unwrap();

        // web1 gained a key.
        assert_eq!(changes["web1"].added, vec!["tls"]);
        assert!(changes["web1"].removed.is_empty());

        // web2 vanished from the right side: its whole key set reads as removed.
        assert_eq!(changes["web2"].removed, vec!["port"]);
        assert!(changes["web2"].added.is_empty());

        // web3 appeared but has no keys, so no entry is emitted for it.
        assert!(!changes.contains_key("web3"));
    }

    #[test]
    fn test_empty_snapshots() {
        let empty = InventorySnapshot::empty();
        let diff = diff_snapshots(&empty, &empty, true);
        assert!(diff.is_empty());
    }
}
