//! Idempotence verification through repeated execution.
//!
//! A single run proves nothing about idempotence; true idempotence means
//! the second application of a declarative operation changes nothing. The
//! verifier runs the same invocation twice, strictly serialized, and
//! certifies zero reported changes on the second run.

use std::collections::HashMap;
use std::path::Path;

use crate::error::Result;
use crate::executor::Executor;
use crate::recap::parse_recap;
use crate::types::{IdempotenceVerdict, changed_total};

/// Run `argv` twice through the executor and compare recaps.
///
/// The two runs are independent invocations of an identical specification;
/// the second starts only after the first has fully completed. A failed
/// run short-circuits the verdict to negative, but both recaps are still
/// parsed and returned so the caller can diagnose what happened — this is
/// a reporting operation, not a gating one.
pub fn verify_idempotent(
    executor: &dyn Executor,
    argv: &[String],
    cwd: Option<&Path>,
    env: &HashMap<String, String>,
) -> Result<IdempotenceVerdict> {
    let first = executor.execute(argv, cwd, env)?;
    let first_recap = parse_recap(&first.stdout);
    log::debug!(
        "idempotence check: first run rc={} changed={}",
        first.rc,
        changed_total(&first_recap)
    );

    let second = executor.execute(argv, cwd, env)?;
    let second_recap = parse_recap(&second.stdout);
    let second_changed_total = changed_total(&second_recap);
    log::debug!(
        "idempotence check: second run rc={} changed={}",
        second.rc,
        second_changed_total
    );

    Ok(IdempotenceVerdict {
        ok: first.success() && second.success() && second_changed_total == 0,
        first_run_ok: first.success(),
        second_run_ok: second.success(),
        second_changed_total,
        first_recap,
        second_recap,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::CommandOutput;
    use crate::testing::ScriptedExecutor;

    fn recap_output(lines: &str) -> CommandOutput {
        ScriptedExecutor::ok(&format!("PLAY RECAP ****\n{lines}"))
    }

    fn playbook_argv() -> Vec<String> {
        vec!["ansible-playbook".to_string(), "site.yml".to_string()]
    }

    #[test]
    fn test_converged_on_second_run() {
        let executor = ScriptedExecutor::new(vec![
            recap_output("h1 : ok=5 changed=2\n"),
            recap_output("h1 : ok=5 changed=0\nh2 : ok=1 changed=0\n"),
        ]);

        let verdict =
            verify_idempotent(&executor, &playbook_argv(), None, &HashMap::new()).unwrap();
        assert!(verdict.ok);
        assert!(verdict.first_run_ok);
        assert!(verdict.second_run_ok);
        assert_eq!(verdict.second_changed_total, 0);
        assert_eq!(verdict.first_recap["h1"].changed, 2);
        assert_eq!(verdict.second_recap.len(), 2);
        // Both invocations must carry the identical specification.
        assert_eq!(executor.argv(0), executor.argv(1));
    }

    #[test]
    fn test_changes_on_second_run_fail_the_verdict() {
        let executor = ScriptedExecutor::new(vec![
            recap_output("h1 : ok=5 changed=0\n"),
            recap_output("h1 : ok=5 changed=1\n"),
        ]);

        let verdict =
            verify_idempotent(&executor, &playbook_argv(), None, &HashMap::new()).unwrap();
        assert!(!verdict.ok);
        assert_eq!(verdict.second_changed_total, 1);
    }

    #[test]
    fn test_first_run_failure_still_reports_both_recaps() {
        let executor = ScriptedExecutor::new(vec![
            ScriptedExecutor::failed(2, "task error"),
            recap_output("h1 : ok=5 changed=0\n"),
        ]);

        let verdict =
            verify_idempotent(&executor, &playbook_argv(), None, &HashMap::new()).unwrap();
        assert!(!verdict.ok);
        assert!(!verdict.first_run_ok);
        assert!(verdict.second_run_ok);
        assert!(verdict.first_recap.is_empty());
        assert_eq!(verdict.second_recap["h1"].ok, 5);
    }

    #[test]
    fn test_second_run_failure_fails_even_with_zero_changes() {
        let executor = ScriptedExecutor::new(vec![
            recap_output("h1 : ok=5 changed=0\n"),
            ScriptedExecutor::failed(4, "unreachable"),
        ]);

        let verdict =
            verify_idempotent(&executor, &playbook_argv(), None, &HashMap::new()).unwrap();
        assert!(!verdict.ok);
        assert_eq!(verdict.second_changed_total, 0);
    }
}
