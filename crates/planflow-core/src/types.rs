use crate::error::PlanflowError;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Wire enums
// ---------------------------------------------------------------------------

/// Declares a closed enum whose serde names, `as_str`, `Display` and
/// `FromStr` all share one string table.
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident ($kind:literal) {
            $( $(#[$vmeta:meta])* $variant:ident => $s:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $s)] $variant, )+
        }

        impl $name {
            pub fn all() -> &'static [$name] {
                &[ $( $name::$variant ),+ ]
            }

            pub fn as_str(self) -> &'static str {
                match self {
                    $( $name::$variant => $s, )+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = PlanflowError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $s => Ok($name::$variant), )+
                    _ => Err(PlanflowError::invalid($kind, s)),
                }
            }
        }
    };
}

wire_enum! {
    PlanState ("plan state") {
        Active => "ACTIVE",
        Deleted => "DELETED",
    }
}

wire_enum! {
    IssueStatus ("issue status") {
        Open => "OPEN",
        Done => "DONE",
        Canceled => "CANCELED",
    }
}

wire_enum! {
    /// Aggregate approval state of an issue. `Checking` means the approval
    /// flow has not been resolved yet.
    ApprovalStatus ("approval status") {
        Checking => "CHECKING",
        Pending => "PENDING",
        Approved => "APPROVED",
        Rejected => "REJECTED",
        Skipped => "SKIPPED",
    }
}

impl ApprovalStatus {
    /// Approved or skipped; the rollout may proceed.
    pub fn is_approved(self) -> bool {
        matches!(self, ApprovalStatus::Approved | ApprovalStatus::Skipped)
    }
}

wire_enum! {
    IssueType ("issue type") {
        DatabaseChange => "DATABASE_CHANGE",
        GrantRequest => "GRANT_REQUEST",
        DatabaseExport => "DATABASE_EXPORT",
    }
}

wire_enum! {
    ApproverStatus ("approver status") {
        Pending => "PENDING",
        Approved => "APPROVED",
        Rejected => "REJECTED",
    }
}

wire_enum! {
    TaskType ("task type") {
        General => "GENERAL",
        DatabaseCreate => "DATABASE_CREATE",
        DatabaseExport => "DATABASE_EXPORT",
        DatabaseSchemaBaseline => "DATABASE_SCHEMA_BASELINE",
        DatabaseSchemaUpdate => "DATABASE_SCHEMA_UPDATE",
        DatabaseSchemaUpdateSdl => "DATABASE_SCHEMA_UPDATE_SDL",
        DatabaseSchemaUpdateGhost => "DATABASE_SCHEMA_UPDATE_GHOST",
        DatabaseDataUpdate => "DATABASE_DATA_UPDATE",
        DatabaseRestore => "DATABASE_RESTORE",
    }
}

impl TaskType {
    /// Tasks that create or export a database rather than change one.
    pub fn is_create_or_export(self) -> bool {
        matches!(self, TaskType::DatabaseCreate | TaskType::DatabaseExport)
    }
}

wire_enum! {
    TaskStatus ("task status") {
        NotStarted => "NOT_STARTED",
        Pending => "PENDING",
        Running => "RUNNING",
        Done => "DONE",
        Failed => "FAILED",
        Canceled => "CANCELED",
        Skipped => "SKIPPED",
    }
}

impl TaskStatus {
    /// Completed successfully or skipped.
    pub fn is_finished(self) -> bool {
        matches!(self, TaskStatus::Done | TaskStatus::Skipped)
    }

    pub fn is_startable(self) -> bool {
        matches!(
            self,
            TaskStatus::NotStarted | TaskStatus::Failed | TaskStatus::Canceled
        )
    }

    pub fn is_running(self) -> bool {
        matches!(self, TaskStatus::Pending | TaskStatus::Running)
    }
}

wire_enum! {
    TaskRunStatus ("task run status") {
        Pending => "PENDING",
        Running => "RUNNING",
        Done => "DONE",
        Failed => "FAILED",
        Canceled => "CANCELED",
        Skipped => "SKIPPED",
    }
}

wire_enum! {
    ExportArchiveStatus ("export archive status") {
        Unspecified => "EXPORT_ARCHIVE_STATUS_UNSPECIFIED",
        Ready => "READY",
        Exported => "EXPORTED",
    }
}

impl Default for ExportArchiveStatus {
    fn default() -> Self {
        ExportArchiveStatus::Unspecified
    }
}

wire_enum! {
    /// Severity of plan check advice, least to most severe.
    #[derive(PartialOrd, Ord)]
    AdviceLevel ("advice level") {
        Success => "SUCCESS",
        Warning => "WARNING",
        Error => "ERROR",
    }
}

// ---------------------------------------------------------------------------
// ActionId
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionId {
    PlanClose,
    PlanReopen,
    IssueCreate,
    IssueReview,
    IssueStatusResolve,
    IssueStatusClose,
    IssueStatusReopen,
    RolloutCreate,
    RolloutStart,
    RolloutCancel,
    ExportDownload,
}

impl ActionId {
    pub fn all() -> &'static [ActionId] {
        &[
            ActionId::PlanClose,
            ActionId::PlanReopen,
            ActionId::IssueCreate,
            ActionId::IssueReview,
            ActionId::IssueStatusResolve,
            ActionId::IssueStatusClose,
            ActionId::IssueStatusReopen,
            ActionId::RolloutCreate,
            ActionId::RolloutStart,
            ActionId::RolloutCancel,
            ActionId::ExportDownload,
        ]
    }

    /// Returns true if the given string is a valid ActionId name.
    pub fn is_valid(s: &str) -> bool {
        Self::all().iter().any(|a| a.as_str() == s)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ActionId::PlanClose => "PLAN_CLOSE",
            ActionId::PlanReopen => "PLAN_REOPEN",
            ActionId::IssueCreate => "ISSUE_CREATE",
            ActionId::IssueReview => "ISSUE_REVIEW",
            ActionId::IssueStatusResolve => "ISSUE_STATUS_RESOLVE",
            ActionId::IssueStatusClose => "ISSUE_STATUS_CLOSE",
            ActionId::IssueStatusReopen => "ISSUE_STATUS_REOPEN",
            ActionId::RolloutCreate => "ROLLOUT_CREATE",
            ActionId::RolloutStart => "ROLLOUT_START",
            ActionId::RolloutCancel => "ROLLOUT_CANCEL",
            ActionId::ExportDownload => "EXPORT_DOWNLOAD",
        }
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ActionId {
    type Err = PlanflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| PlanflowError::UnknownAction(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Presentation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionCategory {
    Primary,
    Secondary,
}

impl fmt::Display for ActionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ActionCategory::Primary => "primary",
            ActionCategory::Secondary => "secondary",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonType {
    Primary,
    Default,
    Success,
    Error,
}

/// How the rendering layer dispatches an action once clicked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExecuteType {
    #[serde(rename = "immediate")]
    Immediate,
    #[serde(rename = "confirm-dialog")]
    ConfirmDialog,
    #[serde(rename = "popover:labels")]
    LabelsPopover,
    #[serde(rename = "popover:review")]
    ReviewPopover,
    #[serde(rename = "panel:issue-status")]
    IssueStatusPanel,
    #[serde(rename = "panel:rollout")]
    RolloutPanel,
}

impl ExecuteType {
    pub fn as_str(self) -> &'static str {
        match self {
            ExecuteType::Immediate => "immediate",
            ExecuteType::ConfirmDialog => "confirm-dialog",
            ExecuteType::LabelsPopover => "popover:labels",
            ExecuteType::ReviewPopover => "popover:review",
            ExecuteType::IssueStatusPanel => "panel:issue-status",
            ExecuteType::RolloutPanel => "panel:rollout",
        }
    }
}

impl fmt::Display for ExecuteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
