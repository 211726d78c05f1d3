use crate::error::PlanflowError;
use crate::snapshot::{Project, User};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

// ---------------------------------------------------------------------------
// Permission
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Permission {
    #[serde(rename = "bb.plans.update")]
    PlanUpdate,
    #[serde(rename = "bb.issues.create")]
    IssueCreate,
    #[serde(rename = "bb.issues.update")]
    IssueUpdate,
    #[serde(rename = "bb.rollouts.create")]
    RolloutCreate,
    #[serde(rename = "bb.taskRuns.create")]
    TaskRunCreate,
}

impl Permission {
    pub fn as_str(self) -> &'static str {
        match self {
            Permission::PlanUpdate => "bb.plans.update",
            Permission::IssueCreate => "bb.issues.create",
            Permission::IssueUpdate => "bb.issues.update",
            Permission::RolloutCreate => "bb.rollouts.create",
            Permission::TaskRunCreate => "bb.taskRuns.create",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Permission {
    type Err = PlanflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bb.plans.update" => Ok(Permission::PlanUpdate),
            "bb.issues.create" => Ok(Permission::IssueCreate),
            "bb.issues.update" => Ok(Permission::IssueUpdate),
            "bb.rollouts.create" => Ok(Permission::RolloutCreate),
            "bb.taskRuns.create" => Ok(Permission::TaskRunCreate),
            _ => Err(PlanflowError::invalid("permission", s)),
        }
    }
}

// ---------------------------------------------------------------------------
// PermissionOracle
// ---------------------------------------------------------------------------

/// Answers access questions from already-resolved role bindings.
///
/// Implementations must not block: the engine calls them while building a
/// context and treats every answer as final.
pub trait PermissionOracle {
    fn has_project_permission(&self, project: &Project, user: &User, permission: Permission)
        -> bool;

    /// Emails of the users currently holding `role` in `project`.
    fn role_candidates(&self, project: &Project, role: &str) -> Vec<String>;
}

/// A fixed grant table for the current user, plus role membership.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StaticPermissions {
    #[serde(default)]
    pub grants: Vec<Permission>,
    #[serde(default)]
    pub roles: HashMap<String, Vec<String>>,
}

impl StaticPermissions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn grant(mut self, permission: Permission) -> Self {
        if !self.grants.contains(&permission) {
            self.grants.push(permission);
        }
        self
    }

    pub fn with_role(mut self, role: impl Into<String>, members: &[&str]) -> Self {
        self.roles
            .entry(role.into())
            .or_default()
            .extend(members.iter().map(|m| m.to_string()));
        self
    }
}

impl PermissionOracle for StaticPermissions {
    fn has_project_permission(&self, _project: &Project, _user: &User, permission: Permission) -> bool {
        self.grants.contains(&permission)
    }

    fn role_candidates(&self, _project: &Project, role: &str) -> Vec<String> {
        self.roles.get(role).cloned().unwrap_or_default()
    }
}
