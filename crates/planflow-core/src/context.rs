use crate::names::{
    extract_task_run_uid, extract_user_id, is_valid_issue_name, is_valid_plan_name,
    task_run_belongs_to,
};
use crate::permission::{Permission, PermissionOracle};
use crate::plan_check::PlanCheckSummary;
use crate::snapshot::{Issue, Plan, Project, Rollout, Spec, TaskRun, User};
use crate::types::{
    ApprovalStatus, ApproverStatus, ExportArchiveStatus, IssueStatus, IssueType, PlanState,
    TaskRunStatus, TaskType,
};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// ContextInput
// ---------------------------------------------------------------------------

/// Borrowed inputs for one context build. Nothing here is mutated.
pub struct ContextInput<'a> {
    pub plan: &'a Plan,
    pub issue: Option<&'a Issue>,
    pub rollout: Option<&'a Rollout>,
    pub project: &'a Project,
    pub user: &'a User,
    pub task_runs: &'a [TaskRun],
    pub is_creating: bool,
    /// An in-place editor holds unsaved changes.
    pub is_editing: bool,
    pub plan_checks: PlanCheckSummary,
    pub rollout_preconditions_met: bool,
    pub is_spec_empty: &'a dyn Fn(&Spec) -> bool,
}

// ---------------------------------------------------------------------------
// ActionContext (output)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ContextPermissions {
    pub update_plan: bool,
    pub create_issue: bool,
    pub update_issue: bool,
    pub create_rollout: bool,
    pub run_tasks: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ContextValidation {
    pub has_empty_spec: bool,
    pub plan_checks_running: bool,
    pub plan_checks_failed: bool,
}

/// Flat, derived view of a plan/issue/rollout consumed by every action rule.
///
/// The `Default` value denies everything: no issue, no rollout, no
/// permissions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionContext {
    pub is_creating: bool,
    pub is_editing: bool,
    pub plan_state: PlanState,
    pub plan_has_issue: bool,
    pub plan_has_rollout: bool,
    pub issue_status: Option<IssueStatus>,
    pub approval_status: Option<ApprovalStatus>,
    pub is_issue_only: bool,
    pub is_export_plan: bool,
    pub has_deferred_rollout: bool,
    pub is_creator: bool,
    pub is_issue_creator: bool,
    pub is_approval_candidate: bool,
    pub export_archive_ready: bool,
    pub all_tasks_finished: bool,
    pub has_database_create_or_export_tasks: bool,
    pub has_startable_tasks: bool,
    pub has_running_tasks: bool,
    pub rollout_preconditions_met: bool,
    pub enforce_sql_review: bool,
    pub permissions: ContextPermissions,
    pub validation: ContextValidation,
}

impl Default for ActionContext {
    fn default() -> Self {
        Self {
            is_creating: false,
            is_editing: false,
            plan_state: PlanState::Active,
            plan_has_issue: false,
            plan_has_rollout: false,
            issue_status: None,
            approval_status: None,
            is_issue_only: false,
            is_export_plan: false,
            has_deferred_rollout: false,
            is_creator: false,
            is_issue_creator: false,
            is_approval_candidate: false,
            export_archive_ready: false,
            all_tasks_finished: true,
            has_database_create_or_export_tasks: false,
            has_startable_tasks: false,
            has_running_tasks: false,
            rollout_preconditions_met: false,
            enforce_sql_review: false,
            permissions: ContextPermissions::default(),
            validation: ContextValidation::default(),
        }
    }
}

impl ActionContext {
    pub fn issue_is(&self, status: IssueStatus) -> bool {
        self.issue_status == Some(status)
    }

    pub fn has_issue(&self) -> bool {
        self.issue_status.is_some()
    }

    /// Approved or skipped. False without an issue.
    pub fn is_approved(&self) -> bool {
        self.approval_status.is_some_and(ApprovalStatus::is_approved)
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

pub fn build(input: &ContextInput, oracle: &dyn PermissionOracle) -> ActionContext {
    let ContextInput {
        plan,
        issue,
        project,
        user,
        task_runs,
        ..
    } = *input;

    let rollout = match (input.rollout, issue) {
        (Some(r), None) => {
            tracing::warn!(
                plan = %plan.name,
                rollout = %r.name,
                "rollout supplied without an issue, ignoring it"
            );
            None
        }
        (rollout, _) => rollout,
    };

    let is_plan_creator = same_user(user, &plan.creator);
    let is_issue_creator = issue.is_some_and(|i| same_user(user, &i.creator));

    let mut all_tasks_finished = true;
    let mut has_database_create_or_export_tasks = false;
    let mut has_startable_tasks = false;
    let mut has_running_tasks = false;
    for task in rollout.iter().flat_map(|r| r.tasks()) {
        all_tasks_finished &= task.status.is_finished();
        has_database_create_or_export_tasks |= task.task_type.is_create_or_export();
        has_startable_tasks |= task.status.is_startable();
        has_running_tasks |= task.status.is_running();
    }

    let granted = |p: Permission| oracle.has_project_permission(project, user, p);
    let run_tasks = match issue {
        None => false,
        Some(i) if i.issue_type == IssueType::DatabaseExport => is_issue_creator,
        Some(_) => granted(Permission::TaskRunCreate),
    };
    let permissions = ContextPermissions {
        update_plan: is_plan_creator || granted(Permission::PlanUpdate),
        create_issue: granted(Permission::IssueCreate),
        update_issue: issue.is_some() && (is_issue_creator || granted(Permission::IssueUpdate)),
        create_rollout: granted(Permission::RolloutCreate),
        run_tasks,
    };

    let validation = ContextValidation {
        has_empty_spec: plan.specs.iter().any(|s| (input.is_spec_empty)(s)),
        plan_checks_running: input.plan_checks.running,
        plan_checks_failed: input.plan_checks.has_errors(),
    };

    let ctx = ActionContext {
        is_creating: input.is_creating,
        is_editing: input.is_editing,
        plan_state: plan.state,
        plan_has_issue: plan.issue.is_some(),
        plan_has_rollout: plan.rollout.is_some(),
        issue_status: issue.map(|i| i.status),
        approval_status: issue.map(|i| i.approval_status),
        is_issue_only: !is_valid_plan_name(&plan.name)
            && issue.is_some_and(|i| is_valid_issue_name(&i.name)),
        is_export_plan: plan.specs.iter().any(|s| s.config.is_export()),
        has_deferred_rollout: plan.specs.iter().any(|s| s.config.defers_rollout()),
        is_creator: is_plan_creator || is_issue_creator,
        is_issue_creator,
        is_approval_candidate: is_approval_candidate(issue, project, user, oracle),
        export_archive_ready: export_archive_ready(issue, rollout, task_runs, user),
        all_tasks_finished,
        has_database_create_or_export_tasks,
        has_startable_tasks,
        has_running_tasks,
        rollout_preconditions_met: input.rollout_preconditions_met,
        enforce_sql_review: project.enforce_sql_review,
        permissions,
        validation,
    };
    tracing::debug!(plan = %plan.name, ?ctx, "built action context");
    ctx
}

fn same_user(user: &User, principal: &str) -> bool {
    !user.email.is_empty() && extract_user_id(principal) == user.email
}

/// The template role whose turn it is to approve.
///
/// The position is the first rejected approver, else one past the last
/// approver. `None` when that position is outside the template.
pub fn current_approval_role(issue: &Issue) -> Option<&str> {
    let template = issue.approval_template.as_ref()?;
    let index = issue
        .approvers
        .iter()
        .position(|a| a.status == ApproverStatus::Rejected)
        .unwrap_or(issue.approvers.len());
    template.roles.get(index).map(String::as_str)
}

fn is_approval_candidate(
    issue: Option<&Issue>,
    project: &Project,
    user: &User,
    oracle: &dyn PermissionOracle,
) -> bool {
    let Some(issue) = issue else {
        return false;
    };
    if issue.approval_status.is_approved() {
        return false;
    }
    // A rejection halts the flow until the creator re-requests review.
    if issue
        .approvers
        .iter()
        .any(|a| a.status == ApproverStatus::Rejected)
    {
        return false;
    }
    let Some(role) = current_approval_role(issue) else {
        return false;
    };
    oracle
        .role_candidates(project, role)
        .iter()
        .any(|candidate| same_user(user, candidate))
}

/// Most recent run of `task_name`, by numeric UID.
pub fn latest_task_run<'a>(task_runs: &'a [TaskRun], task_name: &str) -> Option<&'a TaskRun> {
    task_runs
        .iter()
        .filter(|run| task_run_belongs_to(&run.name, task_name))
        .max_by_key(|run| extract_task_run_uid(&run.name).unwrap_or(0))
}

fn export_archive_ready(
    issue: Option<&Issue>,
    rollout: Option<&Rollout>,
    task_runs: &[TaskRun],
    user: &User,
) -> bool {
    let Some(issue) = issue else {
        return false;
    };
    if !matches!(issue.status, IssueStatus::Open | IssueStatus::Done) {
        return false;
    }
    if !same_user(user, &issue.creator) {
        return false;
    }
    let Some(rollout) = rollout else {
        return false;
    };

    let export_tasks: Vec<_> = rollout
        .tasks()
        .filter(|t| t.task_type == TaskType::DatabaseExport)
        .collect();
    if export_tasks.is_empty() || !export_tasks.iter().all(|t| t.status.is_finished()) {
        return false;
    }

    export_tasks.iter().all(|task| {
        latest_task_run(task_runs, &task.name).is_some_and(|run| {
            run.status == TaskRunStatus::Done
                && run.export_archive_status != ExportArchiveStatus::Unspecified
        })
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
