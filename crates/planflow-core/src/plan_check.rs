use crate::types::AdviceLevel;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// PlanCheckRun
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlanCheckRunStatus {
    Running,
    Done,
    Failed,
    Canceled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanCheckResult {
    pub status: AdviceLevel,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanCheckRun {
    pub name: String,
    pub status: PlanCheckRunStatus,
    #[serde(default)]
    pub results: Vec<PlanCheckResult>,
}

// ---------------------------------------------------------------------------
// PlanCheckSummary
// ---------------------------------------------------------------------------

/// Aggregated plan check state for a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanCheckSummary {
    pub status: AdviceLevel,
    pub running: bool,
}

impl Default for PlanCheckSummary {
    fn default() -> Self {
        Self {
            status: AdviceLevel::Success,
            running: false,
        }
    }
}

impl PlanCheckSummary {
    /// Most severe advice across finished runs. A failed run counts as an
    /// error; running and canceled runs contribute no advice.
    pub fn from_runs(runs: &[PlanCheckRun]) -> Self {
        let running = runs
            .iter()
            .any(|r| r.status == PlanCheckRunStatus::Running);
        let status = runs
            .iter()
            .filter_map(|r| match r.status {
                PlanCheckRunStatus::Failed => Some(AdviceLevel::Error),
                PlanCheckRunStatus::Done => r.results.iter().map(|res| res.status).max(),
                PlanCheckRunStatus::Running | PlanCheckRunStatus::Canceled => None,
            })
            .max()
            .unwrap_or(AdviceLevel::Success);
        Self { status, running }
    }

    pub fn has_errors(&self) -> bool {
        self.status == AdviceLevel::Error
    }
}
