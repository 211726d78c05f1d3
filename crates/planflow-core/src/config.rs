use crate::error::{PlanflowError, Result};
use crate::types::ActionId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

/// Tooltip text shown for disabled actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Messages {
    #[serde(default = "default_editing")]
    pub editing: String,
    #[serde(default = "default_empty_spec")]
    pub empty_spec: String,
    #[serde(default = "default_plan_checks_running")]
    pub plan_checks_running: String,
    #[serde(default = "default_plan_checks_failed")]
    pub plan_checks_failed: String,
    #[serde(default = "default_unavailable")]
    pub unavailable: String,
}

fn default_editing() -> String {
    "Save or discard your edits first".to_string()
}

fn default_empty_spec() -> String {
    "Some specs have an empty statement".to_string()
}

fn default_plan_checks_running() -> String {
    "Plan checks are still running".to_string()
}

fn default_plan_checks_failed() -> String {
    "Plan checks reported errors and SQL review is enforced".to_string()
}

fn default_unavailable() -> String {
    "This action is not available".to_string()
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            editing: default_editing(),
            empty_spec: default_empty_spec(),
            plan_checks_running: default_plan_checks_running(),
            plan_checks_failed: default_plan_checks_failed(),
            unavailable: default_unavailable(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config (top-level)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub messages: Messages,
    /// Label overrides keyed by action id (e.g. `ISSUE_CREATE`).
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub labels: HashMap<String, String>,
}

fn default_version() -> u32 {
    1
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            messages: Messages::default(),
            labels: HashMap::new(),
        }
    }
}

impl Config {
    pub fn label_for(&self, action: ActionId) -> Option<&str> {
        self.labels.get(action.as_str()).map(String::as_str)
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(PlanflowError::ConfigNotFound(path.to_path_buf()));
        }
        let data = std::fs::read_to_string(path)?;
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let data = serde_yaml::to_string(self)?;
        std::fs::write(path, data)?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if self.version != 1 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: format!("unsupported config version {}", self.version),
            });
        }

        let mut keys: Vec<_> = self.labels.keys().collect();
        keys.sort();
        for key in keys {
            if !ActionId::is_valid(key) {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Warning,
                    message: format!("unknown action '{key}' in labels"),
                });
            } else if self.labels[key].trim().is_empty() {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Warning,
                    message: format!("label for '{key}' is empty"),
                });
            }
        }

        let messages = [
            ("editing", &self.messages.editing),
            ("empty_spec", &self.messages.empty_spec),
            ("plan_checks_running", &self.messages.plan_checks_running),
            ("plan_checks_failed", &self.messages.plan_checks_failed),
            ("unavailable", &self.messages.unavailable),
        ];
        for (name, text) in messages {
            if text.trim().is_empty() {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Warning,
                    message: format!("message '{name}' is empty; disabled actions will show no reason"),
                });
            }
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
