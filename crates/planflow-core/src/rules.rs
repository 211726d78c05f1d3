use crate::context::ActionContext;
use crate::registry::{ActionRule, DisabledReason};
use crate::types::{ActionCategory, ActionId, ButtonType, ExecuteType, IssueStatus, PlanState};

// ---------------------------------------------------------------------------
// Helper macro for concise rule definitions
// ---------------------------------------------------------------------------

macro_rules! rule {
    (
        id: $id:expr,
        label: $label:expr,
        button: $button:expr,
        category: $category:expr,
        priority: $priority:expr,
        visible: $visible:expr,
        execute: $execute:expr
        $(, disabled: $disabled:expr, reason: $reason:expr)?
    ) => {
        ActionRule {
            id: $id,
            label: $label,
            button_type: $button,
            category: $category,
            priority: $priority,
            is_visible: $visible,
            is_disabled: {
                #[allow(unused_assignments, unused_mut)]
                let mut v: fn(&ActionContext) -> bool = never;
                $(v = $disabled;)?
                v
            },
            disabled_reason: {
                #[allow(unused_assignments, unused_mut)]
                let mut v: fn(&ActionContext) -> Option<DisabledReason> = no_reason;
                $(v = $reason;)?
                v
            },
            execute_type: $execute,
        }
    };
}

// ---------------------------------------------------------------------------
// Condition helpers
// ---------------------------------------------------------------------------

fn never(_: &ActionContext) -> bool {
    false
}

fn no_reason(_: &ActionContext) -> Option<DisabledReason> {
    None
}

/// A standalone plan: authored, not yet turned into an issue or rollout.
fn is_bare_plan(ctx: &ActionContext) -> bool {
    !ctx.is_issue_only && !ctx.plan_has_issue && !ctx.plan_has_rollout
}

fn issue_create_blocker(ctx: &ActionContext) -> Option<DisabledReason> {
    if ctx.validation.has_empty_spec {
        Some(DisabledReason::EmptySpec)
    } else if ctx.validation.plan_checks_running {
        Some(DisabledReason::PlanChecksRunning)
    } else if ctx.validation.plan_checks_failed && ctx.enforce_sql_review {
        Some(DisabledReason::PlanChecksFailed)
    } else {
        None
    }
}

/// Canceling an issue freezes its rollout until the issue is reopened.
fn issue_not_canceled(ctx: &ActionContext) -> bool {
    ctx.has_issue() && !ctx.issue_is(IssueStatus::Canceled)
}

fn has_live_rollout(ctx: &ActionContext) -> bool {
    ctx.plan_has_rollout && issue_not_canceled(ctx) && ctx.is_approved()
}

// ---------------------------------------------------------------------------
// Default rules
// ---------------------------------------------------------------------------

/// The action catalog. Order here is irrelevant; the registry sorts by
/// priority.
pub fn default_rules() -> Vec<ActionRule> {
    vec![
        rule! {
            id: ActionId::PlanClose,
            label: |_| "Close".to_string(),
            button: ButtonType::Default,
            category: ActionCategory::Secondary,
            priority: 100,
            visible: |ctx| is_bare_plan(ctx)
                && ctx.plan_state == PlanState::Active
                && ctx.permissions.update_plan,
            execute: ExecuteType::ConfirmDialog
        },
        rule! {
            id: ActionId::PlanReopen,
            label: |_| "Reopen".to_string(),
            button: ButtonType::Default,
            category: ActionCategory::Primary,
            priority: 10,
            visible: |ctx| is_bare_plan(ctx)
                && ctx.plan_state == PlanState::Deleted
                && ctx.permissions.update_plan,
            execute: ExecuteType::ConfirmDialog
        },
        rule! {
            id: ActionId::IssueCreate,
            label: |ctx| if ctx.is_export_plan {
                "Request Export".to_string()
            } else {
                "Create Issue".to_string()
            },
            button: ButtonType::Primary,
            category: ActionCategory::Primary,
            priority: 5,
            visible: |ctx| is_bare_plan(ctx)
                && ctx.plan_state == PlanState::Active
                && ctx.permissions.create_issue,
            execute: ExecuteType::LabelsPopover,
            disabled: |ctx| issue_create_blocker(ctx).is_some(),
            reason: issue_create_blocker
        },
        rule! {
            id: ActionId::IssueReview,
            label: |_| "Review".to_string(),
            button: ButtonType::Primary,
            category: ActionCategory::Primary,
            priority: 30,
            visible: |ctx| ctx.issue_is(IssueStatus::Open)
                && !ctx.is_approved()
                && ctx.is_approval_candidate,
            execute: ExecuteType::ReviewPopover
        },
        rule! {
            id: ActionId::IssueStatusResolve,
            label: |_| "Resolve".to_string(),
            button: ButtonType::Success,
            category: ActionCategory::Primary,
            priority: 50,
            visible: |ctx| !ctx.has_deferred_rollout
                && ctx.issue_is(IssueStatus::Open)
                && ctx.is_approved()
                && ctx.all_tasks_finished
                && ctx.plan_has_rollout
                && ctx.permissions.update_issue,
            execute: ExecuteType::IssueStatusPanel
        },
        rule! {
            id: ActionId::IssueStatusClose,
            label: |_| "Close".to_string(),
            button: ButtonType::Default,
            category: ActionCategory::Secondary,
            priority: 90,
            visible: |ctx| ctx.issue_is(IssueStatus::Open)
                && !ctx.plan_has_rollout
                && ctx.permissions.update_issue,
            execute: ExecuteType::IssueStatusPanel
        },
        rule! {
            id: ActionId::IssueStatusReopen,
            label: |_| "Reopen".to_string(),
            button: ButtonType::Default,
            category: ActionCategory::Primary,
            priority: 20,
            visible: |ctx| ctx.issue_is(IssueStatus::Canceled) && ctx.permissions.update_issue,
            execute: ExecuteType::IssueStatusPanel
        },
        rule! {
            id: ActionId::RolloutCreate,
            label: |_| "Create Rollout".to_string(),
            button: ButtonType::Primary,
            category: ActionCategory::Primary,
            priority: 55,
            visible: |ctx| !ctx.is_issue_only
                && !ctx.plan_has_rollout
                && issue_not_canceled(ctx)
                && ctx.permissions.create_rollout
                && ctx.rollout_preconditions_met,
            execute: ExecuteType::Immediate
        },
        rule! {
            id: ActionId::RolloutStart,
            label: |ctx| if ctx.is_export_plan {
                "Export".to_string()
            } else {
                "Run".to_string()
            },
            button: ButtonType::Primary,
            category: ActionCategory::Primary,
            priority: 60,
            visible: |ctx| has_live_rollout(ctx)
                && ctx.has_database_create_or_export_tasks
                && ctx.has_startable_tasks
                && ctx.permissions.run_tasks,
            execute: ExecuteType::RolloutPanel
        },
        rule! {
            id: ActionId::RolloutCancel,
            label: |_| "Cancel".to_string(),
            button: ButtonType::Default,
            category: ActionCategory::Secondary,
            priority: 80,
            visible: |ctx| has_live_rollout(ctx)
                && ctx.has_running_tasks
                && ctx.permissions.run_tasks,
            execute: ExecuteType::RolloutPanel
        },
        rule! {
            id: ActionId::ExportDownload,
            label: |_| "Download".to_string(),
            button: ButtonType::Primary,
            category: ActionCategory::Primary,
            priority: 0,
            visible: |ctx| ctx.is_export_plan && ctx.export_archive_ready && ctx.is_creator,
            execute: ExecuteType::Immediate
        },
    ]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
