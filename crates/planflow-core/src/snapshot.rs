use crate::context::{self, ActionContext, ContextInput};
use crate::error::{PlanflowError, Result};
use crate::permission::{PermissionOracle, StaticPermissions};
use crate::plan_check::{PlanCheckRun, PlanCheckSummary};
use crate::types::{
    ApprovalStatus, ApproverStatus, ExportArchiveStatus, IssueStatus, IssueType, PlanState,
    TaskRunStatus, TaskStatus, TaskType,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

// ---------------------------------------------------------------------------
// User / Project
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub email: String,
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    #[serde(default)]
    pub title: String,
    /// Plan check errors block issue creation when set.
    #[serde(default)]
    pub enforce_sql_review: bool,
}

// ---------------------------------------------------------------------------
// Plan
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SpecConfig {
    ChangeDatabase {
        #[serde(default)]
        targets: Vec<String>,
        #[serde(default)]
        sheet: String,
    },
    CreateDatabase {
        target: String,
        database: String,
    },
    ExportData {
        #[serde(default)]
        targets: Vec<String>,
        #[serde(default)]
        sheet: String,
    },
    RestoreDatabase {
        target: String,
    },
}

impl SpecConfig {
    pub fn is_export(&self) -> bool {
        matches!(self, SpecConfig::ExportData { .. })
    }

    /// Export and create-database specs get their rollout on demand.
    pub fn defers_rollout(&self) -> bool {
        matches!(
            self,
            SpecConfig::ExportData { .. } | SpecConfig::CreateDatabase { .. }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spec {
    pub id: String,
    pub config: SpecConfig,
    #[serde(default)]
    pub depends_on_specs: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub issue: Option<String>,
    #[serde(default)]
    pub rollout: Option<String>,
    pub state: PlanState,
    pub creator: String,
    #[serde(default)]
    pub specs: Vec<Spec>,
}

// ---------------------------------------------------------------------------
// Issue
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Approver {
    pub status: ApproverStatus,
    #[serde(default)]
    pub principal: String,
}

/// Ordered roles that must each approve the issue in turn.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ApprovalTemplate {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub roles: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub name: String,
    #[serde(default)]
    pub title: String,
    pub status: IssueStatus,
    pub approval_status: ApprovalStatus,
    #[serde(rename = "type")]
    pub issue_type: IssueType,
    pub creator: String,
    #[serde(default)]
    pub approvers: Vec<Approver>,
    #[serde(default)]
    pub approval_template: Option<ApprovalTemplate>,
}

// ---------------------------------------------------------------------------
// Rollout
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(rename = "type")]
    pub task_type: TaskType,
    pub status: TaskStatus,
    #[serde(default)]
    pub target: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rollout {
    pub name: String,
    #[serde(default)]
    pub stages: Vec<Stage>,
}

impl Rollout {
    /// Every task across every stage, in stage order.
    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.stages.iter().flat_map(|s| s.tasks.iter())
    }
}

/// One execution attempt of a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRun {
    pub name: String,
    pub status: TaskRunStatus,
    #[serde(default)]
    pub export_archive_status: ExportArchiveStatus,
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// Everything one evaluation needs, in a form a host can load from a file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub plan: Plan,
    #[serde(default)]
    pub issue: Option<Issue>,
    #[serde(default)]
    pub rollout: Option<Rollout>,
    pub project: Project,
    pub user: User,
    #[serde(default)]
    pub task_runs: Vec<TaskRun>,
    #[serde(default)]
    pub plan_check_runs: Vec<PlanCheckRun>,
    /// Ids of specs the editor classified as empty.
    #[serde(default)]
    pub empty_specs: Vec<String>,
    #[serde(default)]
    pub is_creating: bool,
    #[serde(default)]
    pub is_editing: bool,
    #[serde(default)]
    pub rollout_preconditions_met: bool,
    #[serde(default)]
    pub permissions: StaticPermissions,
}

impl Snapshot {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(PlanflowError::SnapshotNotFound(path.to_path_buf()));
        }
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let data = std::fs::read_to_string(path)?;
        let snapshot = match ext.as_str() {
            "yaml" | "yml" => serde_yaml::from_str(&data)?,
            "json" => serde_json::from_str(&data)?,
            _ => return Err(PlanflowError::UnsupportedFormat(ext)),
        };
        Ok(snapshot)
    }

    /// Build the action context, answering permission questions with `oracle`.
    pub fn context_with(&self, oracle: &dyn PermissionOracle) -> ActionContext {
        let empty: HashSet<&str> = self.empty_specs.iter().map(String::as_str).collect();
        let is_spec_empty = |spec: &Spec| empty.contains(spec.id.as_str());
        let input = ContextInput {
            plan: &self.plan,
            issue: self.issue.as_ref(),
            rollout: self.rollout.as_ref(),
            project: &self.project,
            user: &self.user,
            task_runs: &self.task_runs,
            is_creating: self.is_creating,
            is_editing: self.is_editing,
            plan_checks: PlanCheckSummary::from_runs(&self.plan_check_runs),
            rollout_preconditions_met: self.rollout_preconditions_met,
            is_spec_empty: &is_spec_empty,
        };
        context::build(&input, oracle)
    }

    /// Build the action context from the snapshot's own permission table.
    pub fn context(&self) -> ActionContext {
        self.context_with(&self.permissions)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
