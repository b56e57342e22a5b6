//! Core types for inventory snapshots, diffs, recaps, and run reports.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Per-host variables as reported by the inventory `_meta.hostvars` table.
pub type HostVars = BTreeMap<String, serde_json::Map<String, serde_json::Value>>;

/// One normalized, immutable capture of inventory state.
///
/// Constructed fresh on every extraction; never mutated afterwards. Two
/// snapshots with identical content are interchangeable for diffing, which
/// is why every container here is ordered and structurally comparable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventorySnapshot {
    /// Every host discovered, from group membership or `_meta.hostvars`
    pub hosts: BTreeSet<String>,
    /// Group name to member hosts; only non-empty groups are retained
    pub groups: BTreeMap<String, BTreeSet<String>>,
    /// Per-host variables; present only when detail was requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hostvars: Option<HostVars>,
}

impl InventorySnapshot {
    /// Create an empty snapshot with no hostvar detail.
    pub fn empty() -> Self {
        Self {
            hosts: BTreeSet::new(),
            groups: BTreeMap::new(),
            hostvars: None,
        }
    }

    /// Variable key names for a host, empty when unknown.
    pub fn hostvar_keys(&self, host: &str) -> BTreeSet<String> {
        self.hostvars
            .as_ref()
            .and_then(|vars| vars.get(host))
            .map(|map| map.keys().cloned().collect())
            .unwrap_or_default()
    }
}

/// Membership delta for a single group present on both sides of a diff.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipChange {
    /// Hosts in the right-hand group but not the left
    pub added: Vec<String>,
    /// Hosts in the left-hand group but not the right
    pub removed: Vec<String>,
}

/// Variable-key delta for a single host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyChange {
    /// Keys present on the right side only
    pub added: Vec<String>,
    /// Keys present on the left side only
    pub removed: Vec<String>,
}

/// Set-theoretic difference between two inventory snapshots.
///
/// "Left" is the baseline, "right" is the candidate; every delta is
/// expressed as right-relative-to-left.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryDiff {
    /// Hosts present on the right only, sorted
    pub added_hosts: Vec<String>,
    /// Hosts present on the left only, sorted
    pub removed_hosts: Vec<String>,
    /// Group names present on the right only, sorted
    pub added_groups: Vec<String>,
    /// Group names present on the left only, sorted
    pub removed_groups: Vec<String>,
    /// Membership deltas for groups on both sides whose member sets differ
    pub group_membership_changes: BTreeMap<String, MembershipChange>,
    /// Per-host variable-key deltas; present only when key comparison was requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hostvars_key_changes: Option<BTreeMap<String, KeyChange>>,
}

impl InventoryDiff {
    /// Check whether the two snapshots were indistinguishable.
    pub fn is_empty(&self) -> bool {
        self.added_hosts.is_empty()
            && self.removed_hosts.is_empty()
            && self.added_groups.is_empty()
            && self.removed_groups.is_empty()
            && self.group_membership_changes.is_empty()
            && self
                .hostvars_key_changes
                .as_ref()
                .is_none_or(|changes| changes.is_empty())
    }
}

/// Per-host outcome counters from an execution summary block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecapStats {
    /// Tasks that completed without change
    pub ok: u64,
    /// Tasks that reported a change
    pub changed: u64,
    /// Hosts that could not be reached
    pub unreachable: u64,
    /// Tasks that failed
    pub failed: u64,
    /// Tasks that were skipped
    pub skipped: u64,
    /// Failed tasks recovered by a rescue block
    pub rescued: u64,
    /// Failures ignored via ignore_errors
    pub ignored: u64,
}

/// Recap counters keyed by host name.
pub type RecapTable = BTreeMap<String, RecapStats>;

/// Sum of the `changed` counter across all hosts of a recap.
pub fn changed_total(recap: &RecapTable) -> u64 {
    recap.values().map(|stats| stats.changed).sum()
}

/// Outcome of running the same operation twice and comparing recaps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdempotenceVerdict {
    /// True iff both runs exited zero and the second run changed nothing
    pub ok: bool,
    /// Whether the first run exited zero
    pub first_run_ok: bool,
    /// Whether the second run exited zero
    pub second_run_ok: bool,
    /// Sum of `changed` counters across all hosts of the second run
    pub second_changed_total: u64,
    /// Parsed recap of the first run
    pub first_recap: RecapTable,
    /// Parsed recap of the second run
    pub second_recap: RecapTable,
}

/// Structured result of a single toolchain execution.
///
/// A non-zero exit is data, not an error: the caller gets the exit code
/// and both streams unmodified, the way the toolchain produced them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    /// Whether the process exited zero
    pub ok: bool,
    /// Exit code
    pub rc: i32,
    /// Rendered command line that was executed
    pub command: String,
    /// Captured standard output
    pub stdout: String,
    /// Captured standard error
    pub stderr: String,
}

impl RunReport {
    /// Parse the recap block embedded in this run's stdout.
    pub fn recap(&self) -> RecapTable {
        crate::recap::parse_recap(&self.stdout)
    }
}
