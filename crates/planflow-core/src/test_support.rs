//! Snapshot builders shared by the unit tests.

use crate::permission::StaticPermissions;
use crate::plan_check::{PlanCheckResult, PlanCheckRun, PlanCheckRunStatus};
use crate::snapshot::{
    ApprovalTemplate, Approver, Issue, Plan, Project, Rollout, Snapshot, Spec, SpecConfig, Stage,
    Task, TaskRun, User,
};
use crate::types::{
    AdviceLevel, ApprovalStatus, ApproverStatus, ExportArchiveStatus, IssueStatus, IssueType,
    PlanState, TaskRunStatus, TaskStatus, TaskType,
};

pub const PLAN: &str = "projects/shop/plans/101";
pub const ISSUE: &str = "projects/shop/issues/55";
pub const ROLLOUT: &str = "projects/shop/rollouts/9";

pub fn user(email: &str) -> User {
    User {
        email: email.to_string(),
        title: String::new(),
    }
}

pub fn spec(id: &str, config: SpecConfig) -> Spec {
    Spec {
        id: id.to_string(),
        config,
        depends_on_specs: Vec::new(),
    }
}

pub fn export_spec(id: &str) -> Spec {
    spec(
        id,
        SpecConfig::ExportData {
            targets: vec!["instances/prod/databases/orders".to_string()],
            sheet: "projects/shop/sheets/3".to_string(),
        },
    )
}

/// An active plan by ann@example.com with one change spec; ann is the
/// current user and holds no grants.
pub fn draft_plan() -> Snapshot {
    Snapshot {
        plan: Plan {
            name: PLAN.to_string(),
            title: "Add orders index".to_string(),
            issue: None,
            rollout: None,
            state: PlanState::Active,
            creator: "users/ann@example.com".to_string(),
            specs: vec![spec(
                "s1",
                SpecConfig::ChangeDatabase {
                    targets: vec!["instances/prod/databases/orders".to_string()],
                    sheet: "projects/shop/sheets/1".to_string(),
                },
            )],
        },
        issue: None,
        rollout: None,
        project: Project {
            name: "projects/shop".to_string(),
            title: "Shop".to_string(),
            enforce_sql_review: false,
        },
        user: user("ann@example.com"),
        task_runs: Vec::new(),
        plan_check_runs: Vec::new(),
        empty_specs: Vec::new(),
        is_creating: false,
        is_editing: false,
        rollout_preconditions_met: false,
        permissions: StaticPermissions::new(),
    }
}

pub fn issue(status: IssueStatus, approval_status: ApprovalStatus) -> Issue {
    Issue {
        name: ISSUE.to_string(),
        title: "Add orders index".to_string(),
        status,
        approval_status,
        issue_type: IssueType::DatabaseChange,
        creator: "users/ann@example.com".to_string(),
        approvers: Vec::new(),
        approval_template: None,
    }
}

pub fn with_issue(mut snap: Snapshot, status: IssueStatus, approval: ApprovalStatus) -> Snapshot {
    snap.plan.issue = Some(ISSUE.to_string());
    snap.issue = Some(issue(status, approval));
    snap
}

pub fn template(roles: &[&str]) -> ApprovalTemplate {
    ApprovalTemplate {
        title: "Default".to_string(),
        roles: roles.iter().map(|r| r.to_string()).collect(),
    }
}

pub fn approver(status: ApproverStatus) -> Approver {
    Approver {
        status,
        principal: "users/dba@example.com".to_string(),
    }
}

pub fn task_name(index: usize) -> String {
    format!("{ROLLOUT}/stages/1/tasks/{}", index + 1)
}

/// Attach a single-stage rollout holding one task per `(type, status)` pair.
pub fn with_rollout(mut snap: Snapshot, tasks: &[(TaskType, TaskStatus)]) -> Snapshot {
    snap.plan.rollout = Some(ROLLOUT.to_string());
    snap.rollout = Some(Rollout {
        name: ROLLOUT.to_string(),
        stages: vec![Stage {
            name: format!("{ROLLOUT}/stages/1"),
            title: "prod".to_string(),
            tasks: tasks
                .iter()
                .enumerate()
                .map(|(i, (task_type, status))| Task {
                    name: task_name(i),
                    title: String::new(),
                    task_type: *task_type,
                    status: *status,
                    target: "instances/prod/databases/orders".to_string(),
                })
                .collect(),
        }],
    });
    snap
}

pub fn task_run(
    task: &str,
    uid: u64,
    status: TaskRunStatus,
    archive: ExportArchiveStatus,
) -> TaskRun {
    TaskRun {
        name: format!("{task}/taskRuns/{uid}"),
        status,
        export_archive_status: archive,
    }
}

pub fn check_run(level: AdviceLevel) -> PlanCheckRun {
    PlanCheckRun {
        name: format!("{PLAN}/planCheckRuns/1"),
        status: PlanCheckRunStatus::Done,
        results: vec![PlanCheckResult {
            status: level,
            title: "statement advice".to_string(),
            content: String::new(),
        }],
    }
}

/// An approved export request by ann whose single export task finished
/// with a downloadable archive.
pub fn export_ready() -> Snapshot {
    let mut snap = draft_plan();
    snap.plan.specs = vec![export_spec("s1")];
    let mut snap = with_issue(snap, IssueStatus::Open, ApprovalStatus::Approved);
    if let Some(issue) = snap.issue.as_mut() {
        issue.issue_type = IssueType::DatabaseExport;
    }
    let mut snap = with_rollout(snap, &[(TaskType::DatabaseExport, TaskStatus::Done)]);
    snap.task_runs = vec![task_run(
        &task_name(0),
        5,
        TaskRunStatus::Done,
        ExportArchiveStatus::Ready,
    )];
    snap
}
