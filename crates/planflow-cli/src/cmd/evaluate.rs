use crate::output::print_json;
use planflow_core::registry::ActionState;
use std::path::Path;

/// Flags that override what the snapshot file says.
pub struct Overrides {
    pub editing: bool,
    pub creating: bool,
}

pub fn run(
    config_path: Option<&Path>,
    snapshot_path: &Path,
    overrides: Overrides,
    json: bool,
) -> anyhow::Result<()> {
    let registry = super::load_registry(config_path)?;
    let mut snapshot = super::load_snapshot(snapshot_path)?;
    snapshot.is_editing |= overrides.editing;
    snapshot.is_creating |= overrides.creating;

    let decision = planflow_core::evaluate(&snapshot, &registry);

    if json {
        return print_json(&decision);
    }

    if decision.is_empty() {
        println!("No actions available for {}", snapshot.plan.name);
        return Ok(());
    }

    match &decision.primary {
        Some(action) => println!("Primary:    {}", describe(action)),
        None => println!("Primary:    (none)"),
    }
    for (i, action) in decision.secondary.iter().enumerate() {
        let heading = if i == 0 { "Secondary:" } else { "" };
        println!("{heading:<11} {}", describe(action));
    }
    Ok(())
}

fn describe(action: &ActionState) -> String {
    let mut line = format!(
        "{:<21} {:<15} [{}]",
        action.id.as_str(),
        format!("\"{}\"", action.label),
        action.execute_type
    );
    if action.disabled {
        match &action.disabled_reason {
            Some(reason) => line.push_str(&format!(" disabled: {reason}")),
            None => line.push_str(" disabled"),
        }
    }
    line
}
