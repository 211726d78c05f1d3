//! Resource-name helpers for plans, issues, users and task runs.
//!
//! Names follow the upstream API's `collection/{id}` layout, e.g.
//! `projects/shop/plans/101` or
//! `projects/shop/rollouts/7/stages/1/tasks/3/taskRuns/12`.

use regex::Regex;
use std::sync::OnceLock;

fn plan_name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^projects/[^/]+/plans/(\d+)$").expect("valid regex"))
}

fn issue_name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^projects/[^/]+/issues/(\d+)$").expect("valid regex"))
}

fn task_run_uid_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"/taskRuns/(\d+)$").expect("valid regex"))
}

fn has_positive_uid(re: &Regex, name: &str) -> bool {
    re.captures(name)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<u64>().ok())
        .is_some_and(|uid| uid > 0)
}

/// True for a persisted plan name. Draft placeholders (`plans/-1`, empty) are not.
pub fn is_valid_plan_name(name: &str) -> bool {
    has_positive_uid(plan_name_re(), name)
}

pub fn is_valid_issue_name(name: &str) -> bool {
    has_positive_uid(issue_name_re(), name)
}

/// Strip the `users/` (or legacy `user:`) prefix from a principal name.
pub fn extract_user_id(name: &str) -> &str {
    name.strip_prefix("users/")
        .or_else(|| name.strip_prefix("user:"))
        .unwrap_or(name)
}

/// Numeric UID of a task run name, if it has one.
pub fn extract_task_run_uid(name: &str) -> Option<u64> {
    task_run_uid_re()
        .captures(name)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

pub fn task_run_belongs_to(task_run_name: &str, task_name: &str) -> bool {
    task_run_name
        .strip_prefix(task_name)
        .is_some_and(|rest| rest.starts_with("/taskRuns/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_names() {
        assert!(is_valid_plan_name("projects/shop/plans/101"));
        assert!(!is_valid_plan_name("projects/shop/plans/-1"));
        assert!(!is_valid_plan_name("projects/shop/plans/0"));
        assert!(!is_valid_plan_name(""));
        assert!(!is_valid_plan_name("projects/shop/issues/101"));
    }

    #[test]
    fn issue_names() {
        assert!(is_valid_issue_name("projects/shop/issues/7"));
        assert!(!is_valid_issue_name("projects/shop/issues/abc"));
        assert!(!is_valid_issue_name("projects/shop/plans/7"));
    }

    #[test]
    fn user_ids() {
        assert_eq!(extract_user_id("users/ann@example.com"), "ann@example.com");
        assert_eq!(extract_user_id("user:ann@example.com"), "ann@example.com");
        assert_eq!(extract_user_id("ann@example.com"), "ann@example.com");
    }

    #[test]
    fn task_run_uids() {
        let name = "projects/shop/rollouts/7/stages/1/tasks/3/taskRuns/12";
        assert_eq!(extract_task_run_uid(name), Some(12));
        assert_eq!(extract_task_run_uid("projects/shop/rollouts/7"), None);
    }

    #[test]
    fn task_run_ownership() {
        let task = "projects/shop/rollouts/7/stages/1/tasks/3";
        assert!(task_run_belongs_to(&format!("{task}/taskRuns/1"), task));
        assert!(!task_run_belongs_to(
            "projects/shop/rollouts/7/stages/1/tasks/30/taskRuns/1",
            task
        ));
    }
}
