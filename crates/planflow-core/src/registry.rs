use crate::config::{Config, Messages};
use crate::context::ActionContext;
use crate::rules::default_rules;
use crate::snapshot::Snapshot;
use crate::types::{ActionCategory, ActionId, ButtonType, ExecuteType};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// DisabledReason
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisabledReason {
    /// An in-place editor holds unsaved changes. Overrides every rule.
    Editing,
    EmptySpec,
    PlanChecksRunning,
    PlanChecksFailed,
    /// The registry has no rule for the action.
    Unavailable,
}

impl DisabledReason {
    pub fn message(self, messages: &Messages) -> &str {
        match self {
            DisabledReason::Editing => &messages.editing,
            DisabledReason::EmptySpec => &messages.empty_spec,
            DisabledReason::PlanChecksRunning => &messages.plan_checks_running,
            DisabledReason::PlanChecksFailed => &messages.plan_checks_failed,
            DisabledReason::Unavailable => &messages.unavailable,
        }
    }
}

// ---------------------------------------------------------------------------
// ActionRule
// ---------------------------------------------------------------------------

/// A fn-pointer rule. Every function is pure and total over any context.
pub struct ActionRule {
    pub id: ActionId,
    pub label: fn(&ActionContext) -> String,
    pub button_type: ButtonType,
    pub category: ActionCategory,
    /// Lower sorts first.
    pub priority: u32,
    pub is_visible: fn(&ActionContext) -> bool,
    pub is_disabled: fn(&ActionContext) -> bool,
    pub disabled_reason: fn(&ActionContext) -> Option<DisabledReason>,
    pub execute_type: ExecuteType,
}

// ---------------------------------------------------------------------------
// Decision (output)
// ---------------------------------------------------------------------------

/// A visible action, ready to render as a button.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionState {
    pub id: ActionId,
    pub label: String,
    pub button_type: ButtonType,
    pub category: ActionCategory,
    pub priority: u32,
    pub execute_type: ExecuteType,
    pub disabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disabled_reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Decision {
    pub primary: Option<ActionState>,
    pub secondary: Vec<ActionState>,
}

impl Decision {
    /// Every visible action, primary first, then secondaries in priority order.
    pub fn actions(&self) -> impl Iterator<Item = &ActionState> {
        self.primary.iter().chain(self.secondary.iter())
    }

    pub fn ids(&self) -> Vec<ActionId> {
        self.actions().map(|a| a.id).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.primary.is_none() && self.secondary.is_empty()
    }
}

/// Full evaluation of one rule, visible or not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleEvaluation {
    pub id: ActionId,
    pub priority: u32,
    pub category: ActionCategory,
    pub visible: bool,
    pub disabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disabled_reason: Option<String>,
}

// ---------------------------------------------------------------------------
// ActionRegistry
// ---------------------------------------------------------------------------

pub struct ActionRegistry {
    rules: Vec<ActionRule>,
    config: Config,
}

impl Default for ActionRegistry {
    fn default() -> Self {
        Self::new(default_rules())
    }
}

impl ActionRegistry {
    pub fn new(mut rules: Vec<ActionRule>) -> Self {
        rules.sort_by_key(|r| r.priority);
        Self {
            rules,
            config: Config::default(),
        }
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Rules in ascending priority.
    pub fn rules(&self) -> &[ActionRule] {
        &self.rules
    }

    pub fn rule(&self, id: ActionId) -> Option<&ActionRule> {
        self.rules.iter().find(|r| r.id == id)
    }

    /// Visible rules in priority order. Nothing is visible while the plan
    /// is still being created.
    pub fn visible(&self, ctx: &ActionContext) -> Vec<&ActionRule> {
        if ctx.is_creating {
            return Vec::new();
        }
        self.rules.iter().filter(|r| (r.is_visible)(ctx)).collect()
    }

    /// Visible action ids in priority order, for callers that only need
    /// the flat list.
    pub fn available_actions(&self, ctx: &ActionContext) -> Vec<ActionId> {
        self.visible(ctx).into_iter().map(|r| r.id).collect()
    }

    /// Unknown ids report disabled.
    pub fn is_action_disabled(&self, ctx: &ActionContext, id: ActionId) -> bool {
        if ctx.is_editing {
            return true;
        }
        self.rule(id).map_or(true, |r| (r.is_disabled)(ctx))
    }

    pub fn disabled_reason(&self, ctx: &ActionContext, id: ActionId) -> Option<DisabledReason> {
        if ctx.is_editing {
            return Some(DisabledReason::Editing);
        }
        let Some(rule) = self.rule(id) else {
            return Some(DisabledReason::Unavailable);
        };
        if (rule.is_disabled)(ctx) {
            (rule.disabled_reason)(ctx)
        } else {
            None
        }
    }

    /// The tooltip text for a disabled action.
    pub fn disabled_message(&self, ctx: &ActionContext, id: ActionId) -> Option<String> {
        self.disabled_reason(ctx, id)
            .map(|r| r.message(&self.config.messages).to_string())
    }

    fn label(&self, ctx: &ActionContext, rule: &ActionRule) -> String {
        self.config
            .label_for(rule.id)
            .map(str::to_string)
            .unwrap_or_else(|| (rule.label)(ctx))
    }

    fn state(&self, ctx: &ActionContext, rule: &ActionRule) -> ActionState {
        ActionState {
            id: rule.id,
            label: self.label(ctx, rule),
            button_type: rule.button_type,
            category: rule.category,
            priority: rule.priority,
            execute_type: rule.execute_type,
            disabled: self.is_action_disabled(ctx, rule.id),
            disabled_reason: self.disabled_message(ctx, rule.id),
        }
    }

    /// Partition visible actions into one primary and the rest.
    pub fn decide(&self, ctx: &ActionContext) -> Decision {
        let visible = self.visible(ctx);
        let primary_id = visible
            .iter()
            .find(|r| r.category == ActionCategory::Primary)
            .map(|r| r.id);

        let mut decision = Decision::default();
        for rule in visible {
            let state = self.state(ctx, rule);
            if Some(rule.id) == primary_id {
                decision.primary = Some(state);
            } else {
                decision.secondary.push(state);
            }
        }

        tracing::debug!(
            primary = ?decision.primary.as_ref().map(|a| a.id),
            secondary = decision.secondary.len(),
            "selected actions"
        );
        decision
    }

    /// Evaluate every rule, including hidden ones.
    pub fn explain(&self, ctx: &ActionContext) -> Vec<RuleEvaluation> {
        self.rules
            .iter()
            .map(|rule| RuleEvaluation {
                id: rule.id,
                priority: rule.priority,
                category: rule.category,
                visible: !ctx.is_creating && (rule.is_visible)(ctx),
                disabled: self.is_action_disabled(ctx, rule.id),
                disabled_reason: self.disabled_message(ctx, rule.id),
            })
            .collect()
    }
}

/// Build the snapshot's context and select its actions.
pub fn evaluate(snapshot: &Snapshot, registry: &ActionRegistry) -> Decision {
    registry.decide(&snapshot.context())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permission::{Permission, StaticPermissions};
    use crate::test_support::*;
    use crate::types::{
        ApprovalStatus, ExportArchiveStatus, IssueStatus, TaskRunStatus, TaskStatus, TaskType,
    };

    fn registry() -> ActionRegistry {
        ActionRegistry::default()
    }

    fn plan_owner() -> StaticPermissions {
        StaticPermissions::new()
            .grant(Permission::PlanUpdate)
            .grant(Permission::IssueCreate)
    }

    #[test]
    fn rules_sorted_by_priority() {
        let reg = registry();
        let priorities: Vec<_> = reg.rules().iter().map(|r| r.priority).collect();
        let mut sorted = priorities.clone();
        sorted.sort();
        assert_eq!(priorities, sorted);
        assert_eq!(reg.rules()[0].id, ActionId::ExportDownload);
    }

    #[test]
    fn scenario_bare_plan_create_issue_is_primary() {
        let mut snap = draft_plan();
        snap.user = user("bob@example.com");
        snap.permissions = StaticPermissions::new().grant(Permission::PlanUpdate);
        let d = evaluate(&snap, &registry());
        assert_eq!(d.ids(), vec![ActionId::PlanClose]);
        assert!(d.primary.is_none(), "close is a secondary action");

        snap.permissions = plan_owner();
        let d = evaluate(&snap, &registry());
        assert_eq!(d.primary.as_ref().map(|a| a.id), Some(ActionId::IssueCreate));
        assert_eq!(
            d.secondary.iter().map(|a| a.id).collect::<Vec<_>>(),
            vec![ActionId::PlanClose]
        );
    }

    #[test]
    fn scenario_rollout_start_enabled() {
        let mut snap = with_rollout(
            with_issue(draft_plan(), IssueStatus::Open, ApprovalStatus::Approved),
            &[(TaskType::DatabaseCreate, TaskStatus::NotStarted)],
        );
        snap.permissions = StaticPermissions::new().grant(Permission::TaskRunCreate);
        let reg = registry();
        let ctx = snap.context();
        let d = reg.decide(&ctx);

        let start = d.primary.as_ref().unwrap();
        assert_eq!(start.id, ActionId::RolloutStart);
        assert!(!start.disabled);
        assert_eq!(start.execute_type, ExecuteType::RolloutPanel);
        assert!(!reg.available_actions(&ctx).contains(&ActionId::RolloutCancel));
    }

    #[test]
    fn scenario_canceled_issue_only_reopens() {
        let mut snap = with_rollout(
            with_issue(draft_plan(), IssueStatus::Canceled, ApprovalStatus::Approved),
            &[
                (TaskType::DatabaseCreate, TaskStatus::NotStarted),
                (TaskType::DatabaseExport, TaskStatus::Running),
            ],
        );
        snap.permissions = StaticPermissions::new()
            .grant(Permission::PlanUpdate)
            .grant(Permission::IssueCreate)
            .grant(Permission::IssueUpdate)
            .grant(Permission::RolloutCreate)
            .grant(Permission::TaskRunCreate);
        snap.rollout_preconditions_met = true;
        let reg = registry();
        assert_eq!(
            reg.available_actions(&snap.context()),
            vec![ActionId::IssueStatusReopen]
        );

        // Same without a rollout.
        snap.rollout = None;
        snap.plan.rollout = None;
        assert_eq!(
            reg.available_actions(&snap.context()),
            vec![ActionId::IssueStatusReopen]
        );
    }

    #[test]
    fn scenario_export_download() {
        let snap = export_ready();
        let reg = registry();
        let d = evaluate(&snap, &reg);
        assert_eq!(d.primary.as_ref().map(|a| a.id), Some(ActionId::ExportDownload));

        let mut snap = export_ready();
        let task = task_name(0);
        snap.task_runs = vec![task_run(&task, 5, TaskRunStatus::Done, ExportArchiveStatus::Unspecified)];
        let ctx = snap.context();
        assert!(!ctx.export_archive_ready);
        assert!(!reg.available_actions(&ctx).contains(&ActionId::ExportDownload));
    }

    #[test]
    fn resolved_issue_keeps_rollout_controls() {
        let mut snap = with_rollout(
            with_issue(draft_plan(), IssueStatus::Done, ApprovalStatus::Approved),
            &[
                (TaskType::DatabaseCreate, TaskStatus::Failed),
                (TaskType::DatabaseExport, TaskStatus::Running),
            ],
        );
        snap.permissions = StaticPermissions::new().grant(Permission::TaskRunCreate);
        let d = evaluate(&snap, &registry());
        assert_eq!(d.primary.as_ref().map(|a| a.id), Some(ActionId::RolloutStart));
        assert_eq!(d.ids(), vec![ActionId::RolloutStart, ActionId::RolloutCancel]);
    }

    #[test]
    fn approved_open_issue_with_finished_rollout_resolves() {
        let mut snap = with_rollout(
            with_issue(draft_plan(), IssueStatus::Open, ApprovalStatus::Approved),
            &[(TaskType::DatabaseSchemaUpdate, TaskStatus::Done)],
        );
        snap.user = user("bob@example.com");
        snap.permissions = StaticPermissions::new().grant(Permission::IssueUpdate);
        let d = evaluate(&snap, &registry());
        assert_eq!(d.ids(), vec![ActionId::IssueStatusResolve]);
    }

    #[test]
    fn pending_issue_reviewer_sees_review_and_close() {
        let mut snap = with_issue(draft_plan(), IssueStatus::Open, ApprovalStatus::Pending);
        snap.issue.as_mut().unwrap().approval_template = Some(template(&["roles/dba"]));
        snap.permissions = StaticPermissions::new().with_role("roles/dba", &["ann@example.com"]);
        let d = evaluate(&snap, &registry());
        assert_eq!(d.primary.as_ref().map(|a| a.id), Some(ActionId::IssueReview));
        assert_eq!(d.ids(), vec![ActionId::IssueReview, ActionId::IssueStatusClose]);
    }

    #[test]
    fn unchosen_primaries_become_secondary() {
        let mut snap = with_issue(draft_plan(), IssueStatus::Open, ApprovalStatus::Pending);
        snap.issue.as_mut().unwrap().approval_template = Some(template(&["roles/dba"]));
        snap.permissions = StaticPermissions::new()
            .grant(Permission::RolloutCreate)
            .with_role("roles/dba", &["ann@example.com"]);
        snap.rollout_preconditions_met = true;
        let d = evaluate(&snap, &registry());

        assert_eq!(d.primary.as_ref().map(|a| a.id), Some(ActionId::IssueReview));
        let secondary: Vec<_> = d.secondary.iter().map(|a| a.id).collect();
        assert_eq!(
            secondary,
            vec![ActionId::RolloutCreate, ActionId::IssueStatusClose]
        );
        assert_eq!(d.secondary[0].category, ActionCategory::Primary);
    }

    #[test]
    fn creating_hides_everything() {
        let mut snap = draft_plan();
        snap.permissions = plan_owner();
        snap.is_creating = true;
        let reg = registry();
        let ctx = snap.context();
        assert!(reg.decide(&ctx).is_empty());
        assert!(reg.available_actions(&ctx).is_empty());
        assert!(reg.explain(&ctx).iter().all(|e| !e.visible));
    }

    #[test]
    fn editing_overrides_every_reason() {
        let mut snap = draft_plan();
        snap.permissions = plan_owner();
        snap.empty_specs = vec!["s1".to_string()];
        let reg = registry();

        let ctx = snap.context();
        assert_eq!(
            reg.disabled_reason(&ctx, ActionId::IssueCreate),
            Some(DisabledReason::EmptySpec)
        );
        assert!(!reg.is_action_disabled(&ctx, ActionId::PlanClose));

        snap.is_editing = true;
        let ctx = snap.context();
        let d = reg.decide(&ctx);
        for action in d.actions() {
            assert!(action.disabled, "{}", action.id);
            assert_eq!(
                action.disabled_reason.as_deref(),
                Some(Config::default().messages.editing.as_str())
            );
        }
        assert_eq!(d.ids().len(), 2);
    }

    #[test]
    fn missing_rule_is_disabled_with_reason() {
        let rules = default_rules()
            .into_iter()
            .filter(|r| r.id != ActionId::PlanClose)
            .collect();
        let reg = ActionRegistry::new(rules);
        let mut snap = draft_plan();
        snap.permissions = plan_owner();
        let ctx = snap.context();

        assert!(reg.is_action_disabled(&ctx, ActionId::PlanClose));
        assert_eq!(
            reg.disabled_reason(&ctx, ActionId::PlanClose),
            Some(DisabledReason::Unavailable)
        );
        assert_eq!(
            reg.disabled_message(&ctx, ActionId::PlanClose).as_deref(),
            Some(Config::default().messages.unavailable.as_str())
        );
        assert!(!reg.available_actions(&ctx).contains(&ActionId::PlanClose));
    }

    #[test]
    fn enabled_action_has_no_reason() {
        let mut snap = draft_plan();
        snap.permissions = plan_owner();
        let reg = registry();
        let ctx = snap.context();
        assert_eq!(reg.disabled_reason(&ctx, ActionId::IssueCreate), None);
        assert_eq!(reg.disabled_message(&ctx, ActionId::IssueCreate), None);
    }

    #[test]
    fn config_overrides_labels_and_messages() {
        let mut config = Config::default();
        config
            .labels
            .insert("ISSUE_CREATE".to_string(), "Submit for review".to_string());
        config.messages.empty_spec = "Fill in every statement".to_string();
        let reg = ActionRegistry::default().with_config(config);

        let mut snap = draft_plan();
        snap.permissions = plan_owner();
        snap.empty_specs = vec!["s1".to_string()];
        let d = reg.decide(&snap.context());
        let primary = d.primary.unwrap();
        assert_eq!(primary.label, "Submit for review");
        assert!(primary.disabled);
        assert_eq!(primary.disabled_reason.as_deref(), Some("Fill in every statement"));
    }

    #[test]
    fn decisions_are_idempotent() {
        let reg = registry();
        for snap in [draft_plan(), export_ready()] {
            let ctx = snap.context();
            assert_eq!(reg.decide(&ctx), reg.decide(&ctx));
            assert_eq!(reg.explain(&ctx), reg.explain(&ctx));
        }
    }

    #[test]
    fn partition_covers_visible_exactly_once() {
        // Sweep a grid of contexts and check the partition invariants.
        let reg = registry();
        let statuses = [None, Some(IssueStatus::Open), Some(IssueStatus::Done), Some(IssueStatus::Canceled)];
        let approvals = [ApprovalStatus::Pending, ApprovalStatus::Approved];
        for issue_status in statuses {
            for approval in approvals {
                for bits in 0u16..256 {
                    let flag = |n: u16| bits & (1 << n) != 0;
                    let ctx = ActionContext {
                        plan_has_issue: issue_status.is_some(),
                        issue_status,
                        approval_status: issue_status.map(|_| approval),
                        plan_has_rollout: flag(0),
                        is_export_plan: flag(1),
                        export_archive_ready: flag(1),
                        is_creator: flag(2),
                        is_approval_candidate: flag(3),
                        all_tasks_finished: flag(4),
                        has_startable_tasks: flag(5),
                        has_running_tasks: flag(6),
                        has_database_create_or_export_tasks: true,
                        rollout_preconditions_met: flag(7),
                        permissions: crate::context::ContextPermissions {
                            update_plan: true,
                            create_issue: true,
                            update_issue: true,
                            create_rollout: true,
                            run_tasks: true,
                        },
                        ..Default::default()
                    };
                    let d = reg.decide(&ctx);
                    let visible = reg.available_actions(&ctx);
                    assert_eq!(d.ids().len(), visible.len());
                    for id in &visible {
                        assert_eq!(d.ids().iter().filter(|x| *x == id).count(), 1);
                    }
                    if let Some(p) = &d.primary {
                        assert_eq!(p.category, ActionCategory::Primary);
                        assert_eq!(visible.iter().find(|id| {
                            reg.rule(**id).unwrap().category == ActionCategory::Primary
                        }), Some(&p.id));
                    } else {
                        assert!(d.secondary.iter().all(|a| a.category == ActionCategory::Secondary));
                    }
                    let priorities: Vec<_> = d.secondary.iter().map(|a| a.priority).collect();
                    assert!(priorities.windows(2).all(|w| w[0] <= w[1]));
                }
            }
        }
    }
}
