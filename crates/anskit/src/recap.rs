//! Recap parsing for playbook execution summaries.
//!
//! `ansible-playbook` ends its output with a `PLAY RECAP` block of
//! per-host counters. That text is not a stable contract, so parsing is
//! line-oriented and best-effort: anything unrecognized is ignored and the
//! worst case is an empty table, never an error.

use crate::types::{RecapStats, RecapTable};

/// Trimmed prefix that opens the summary block.
const RECAP_MARKER: &str = "PLAY RECAP";

/// Extract per-host change counters from free-form execution output.
///
/// Lines before the first marker line are ignored. After it, each line is
/// split on the first colon into a host token and a statistics token; the
/// statistics token yields whitespace-separated `key=value` segments.
/// Unknown keys and unparseable integers leave the zero default in place.
pub fn parse_recap(text: &str) -> RecapTable {
    let mut table = RecapTable::new();
    let mut recording = false;

    for line in text.lines() {
        let trimmed = line.trim();
        if !recording {
            if trimmed.starts_with(RECAP_MARKER) {
                recording = true;
            }
            continue;
        }
        if trimmed.is_empty() {
            continue;
        }
        // Decorative or trailing lines have no colon; skip them outright.
        let Some((host_part, stats_part)) = trimmed.split_once(':') else {
            continue;
        };
        let host = host_part.trim();
        if host.is_empty() {
            continue;
        }

        let mut stats = RecapStats::default();
        for segment in stats_part.split_whitespace() {
            let Some((key, value)) = segment.split_once('=') else {
                continue;
            };
            let Ok(count) = value.parse::<u64>() else {
                continue;
            };
            match key {
                "ok" => stats.ok = count,
                "changed" => stats.changed = count,
                "unreachable" => stats.unreachable = count,
                "failed" => stats.failed = count,
                "skipped" => stats.skipped = count,
                "rescued" => stats.rescued = count,
                "ignored" => stats.ignored = count,
                _ => {}
            }
        }
        table.insert(host.to_string(), stats);
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_marker_yields_empty_table() {
        let text = "TASK [ping]\nok: [web1]\nweb1 : ok=3 changed=0";
        assert!(parse_recap(text).is_empty());
    }

    #[test]
    fn test_standard_recap_line() {
        let text = "\
PLAY [all] *****\n\
TASK [nginx] *****\n\
changed: [web1]\n\
\n\
PLAY RECAP *********************************************************************\n\
web1                       : ok=3    changed=0    unreachable=0    failed=0    skipped=1    rescued=0    ignored=0\n";
        let table = parse_recap(text);
        assert_eq!(table.len(), 1);
        let stats = table["web1"];
        assert_eq!(stats.ok, 3);
        assert_eq!(stats.changed, 0);
        assert_eq!(stats.skipped, 1);
        assert_eq!(stats.failed, 0);
    }

    #[test]
    fn test_subset_of_keys_and_any_order() {
        let text = "PLAY RECAP ****\nweb1 : changed=2 ok=5\n";
        let stats = parse_recap(text)["web1"];
        assert_eq!(stats.changed, 2);
        assert_eq!(stats.ok, 5);
        assert_eq!(stats.unreachable, 0);
    }

    #[test]
    fn test_unknown_keys_and_bad_integers_default_to_zero() {
        let text = "PLAY RECAP ****\nweb1 : ok=three changed=1 weird=9 elapsed=1.5\n";
        let stats = parse_recap(text)["web1"];
        assert_eq!(stats.ok, 0);
        assert_eq!(stats.changed, 1);
    }

    #[test]
    fn test_blank_and_decorative_lines_while_recording() {
        let text = "PLAY RECAP ****\n\nweb1 : ok=1\n----------------\nweb2 : ok=2\n";
        let table = parse_recap(text);
        assert_eq!(table.len(), 2);
        assert_eq!(table["web2"].ok, 2);
    }

    #[test]
    fn test_lines_before_marker_are_ignored() {
        let text = "web0 : ok=9 changed=9\nPLAY RECAP ****\nweb1 : ok=1\n";
        let table = parse_recap(text);
        assert!(!table.contains_key("web0"));
        assert_eq!(table["web1"].ok, 1);
    }

    #[test]
    fn test_multiple_hosts() {
        let text = "\
PLAY RECAP ****\n\
db1   : ok=4 changed=1 failed=0\n\
web1  : ok=3 changed=0 failed=1 ignored=2\n";
        let table = parse_recap(text);
        assert_eq!(table.len(), 2);
        assert_eq!(table["db1"].changed, 1);
        assert_eq!(table["web1"].ignored, 2);
    }
}
