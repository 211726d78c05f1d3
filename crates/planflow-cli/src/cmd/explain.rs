use crate::output::{print_json, print_table, yes_no};
use std::path::Path;

pub fn run(config_path: Option<&Path>, snapshot_path: &Path, json: bool) -> anyhow::Result<()> {
    let registry = super::load_registry(config_path)?;
    let snapshot = super::load_snapshot(snapshot_path)?;
    let evaluations = registry.explain(&snapshot.context());

    if json {
        return print_json(&evaluations);
    }

    let rows: Vec<Vec<String>> = evaluations
        .iter()
        .map(|e| {
            vec![
                e.id.to_string(),
                e.priority.to_string(),
                e.category.to_string(),
                yes_no(e.visible),
                yes_no(e.disabled),
                e.disabled_reason.clone().unwrap_or_default(),
            ]
        })
        .collect();
    print_table(
        &["ACTION", "PRIORITY", "CATEGORY", "VISIBLE", "DISABLED", "REASON"],
        &rows,
    );
    Ok(())
}
