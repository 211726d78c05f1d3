pub mod config;
pub mod context;
pub mod evaluate;
pub mod explain;

use anyhow::Context;
use planflow_core::config::Config;
use planflow_core::{ActionRegistry, Snapshot};
use std::path::Path;

/// Effective config: the resolved file if there is one, else defaults.
pub fn load_config(config_path: Option<&Path>) -> anyhow::Result<Config> {
    match config_path {
        Some(path) => Config::load(path)
            .with_context(|| format!("failed to load config from {}", path.display())),
        None => Ok(Config::default()),
    }
}

pub fn load_registry(config_path: Option<&Path>) -> anyhow::Result<ActionRegistry> {
    Ok(ActionRegistry::default().with_config(load_config(config_path)?))
}

pub fn load_snapshot(path: &Path) -> anyhow::Result<Snapshot> {
    Snapshot::load(path).with_context(|| format!("failed to load snapshot {}", path.display()))
}
