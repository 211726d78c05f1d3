use std::path::{Path, PathBuf};

pub const CONFIG_RELATIVE: &str = ".planflow/config.yaml";

/// Resolve the config file.
///
/// Priority:
/// 1. `--config` flag / `PLANFLOW_CONFIG` env var (passed in as `explicit`)
/// 2. Walk upward from `cwd` looking for `.planflow/config.yaml`
/// 3. None: built-in defaults apply
pub fn resolve_config(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(p) = explicit {
        return Some(p.to_path_buf());
    }
    let cwd = std::env::current_dir().ok()?;
    find_upward(&cwd)
}

fn find_upward(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(CONFIG_RELATIVE))
        .find(|candidate| candidate.is_file())
}
