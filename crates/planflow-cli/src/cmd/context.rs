use crate::output::{print_json, print_table};
use serde_json::Value;
use std::path::Path;

pub fn run(snapshot_path: &Path, json: bool) -> anyhow::Result<()> {
    let snapshot = super::load_snapshot(snapshot_path)?;
    let ctx = snapshot.context();

    if json {
        return print_json(&ctx);
    }

    let mut rows = Vec::new();
    flatten("", &serde_json::to_value(&ctx)?, &mut rows);
    print_table(&["FIELD", "VALUE"], &rows);
    Ok(())
}

/// Nested objects become dotted field names, e.g. `permissions.run_tasks`.
fn flatten(prefix: &str, value: &Value, rows: &mut Vec<Vec<String>>) {
    match value {
        Value::Object(map) => {
            for (key, inner) in map {
                let name = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                flatten(&name, inner, rows);
            }
        }
        Value::Null => rows.push(vec![prefix.to_string(), "-".to_string()]),
        Value::String(s) => rows.push(vec![prefix.to_string(), s.clone()]),
        other => rows.push(vec![prefix.to_string(), other.to_string()]),
    }
}
