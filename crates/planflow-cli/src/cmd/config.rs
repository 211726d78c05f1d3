use crate::output::{print_json, print_table};
use crate::root::CONFIG_RELATIVE;
use clap::Subcommand;
use planflow_core::config::{Config, WarnLevel};
use planflow_core::rules::default_rules;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Subcommand types
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Show the effective labels and disabled-reason messages
    Show,

    /// Validate the config for common mistakes
    Validate,

    /// Write a config file populated with the built-in defaults
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run(config_path: Option<&Path>, subcmd: ConfigSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        ConfigSubcommand::Show => show(config_path, json),
        ConfigSubcommand::Validate => validate(config_path, json),
        ConfigSubcommand::Init { force } => init(config_path, force, json),
    }
}

// ---------------------------------------------------------------------------
// show
// ---------------------------------------------------------------------------

fn show(config_path: Option<&Path>, json: bool) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;

    if json {
        return print_json(&config);
    }

    match config_path {
        Some(path) => println!("Config: {}", path.display()),
        None => println!("Config: (built-in defaults)"),
    }
    println!();

    // Default labels are context-dependent, so show the override or "-".
    let rows: Vec<Vec<String>> = default_rules()
        .iter()
        .map(|rule| {
            vec![
                rule.id.to_string(),
                config.label_for(rule.id).unwrap_or("-").to_string(),
            ]
        })
        .collect();
    print_table(&["ACTION", "LABEL OVERRIDE"], &rows);
    println!();

    let messages = &config.messages;
    let rows = vec![
        vec!["editing".to_string(), messages.editing.clone()],
        vec!["empty_spec".to_string(), messages.empty_spec.clone()],
        vec!["plan_checks_running".to_string(), messages.plan_checks_running.clone()],
        vec!["plan_checks_failed".to_string(), messages.plan_checks_failed.clone()],
        vec!["unavailable".to_string(), messages.unavailable.clone()],
    ];
    print_table(&["REASON", "MESSAGE"], &rows);
    Ok(())
}

// ---------------------------------------------------------------------------
// validate
// ---------------------------------------------------------------------------

fn validate(config_path: Option<&Path>, json: bool) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;
    let warnings = config.validate();

    if json {
        let value = serde_json::json!({
            "warnings": warnings,
        });
        print_json(&value)?;
    } else if warnings.is_empty() {
        println!("Config is valid. No warnings.");
    } else {
        for w in &warnings {
            let prefix = match w.level {
                WarnLevel::Warning => "warning",
                WarnLevel::Error => "error",
            };
            println!("[{prefix}] {}", w.message);
        }
    }

    if warnings.iter().any(|w| w.level == WarnLevel::Error) {
        anyhow::bail!("config validation found errors");
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// init
// ---------------------------------------------------------------------------

fn init(config_path: Option<&Path>, force: bool, json: bool) -> anyhow::Result<()> {
    let path: PathBuf = match config_path {
        Some(p) => p.to_path_buf(),
        None => std::env::current_dir()?.join(CONFIG_RELATIVE),
    };

    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }

    Config::default().save(&path)?;
    tracing::debug!(path = %path.display(), "wrote default config");

    if json {
        print_json(&serde_json::json!({ "path": path }))?;
    } else {
        println!("Wrote {}", path.display());
    }
    Ok(())
}
