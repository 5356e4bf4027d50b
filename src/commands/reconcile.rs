//! Declarative commands
//!
//! - `diff` - Preview what apply would submit
//! - `apply` - Submit commands until current state matches declared state

use anyhow::{Context as AnyhowContext, Result, bail};
use colored::Colorize;
use reconcile::{Api, ApiManager, ConfigurationStore, ReconcileReport, Reconciler, node};
use serde_json::Value;

use crate::Context;
use crate::config;
use crate::transport::HttpTransport;
use crate::ui;

pub fn diff(ctx: &Context, core: Option<&str>) -> Result<()> {
    run(ctx, core, true)
}

pub fn apply(ctx: &Context, core: Option<&str>, dry_run: bool) -> Result<()> {
    run(ctx, core, dry_run)
}

fn run(ctx: &Context, core: Option<&str>, dry_run: bool) -> Result<()> {
    let (endpoint, store) = config::load(ctx)?;
    let cores = select_cores(&store, core)?;
    let transport = HttpTransport::new(&endpoint);
    let reconciler = Reconciler::default();

    if !ctx.quiet {
        ui::header(if dry_run { "Diff" } else { "Apply" });
        ui::kv("Endpoint", transport.base_url());
    }

    let mut pending = 0;
    let mut submitted = 0;

    for core in cores {
        if !ctx.quiet {
            ui::section(core);
        }

        if let Some(config) = store.config_for_core(core) {
            let mut manager = ApiManager::new(&transport, Api::Config, core);
            let report = reconciler
                .reconcile(&node::config_nodes(config), &mut manager, dry_run)
                .with_context(|| format!("Config reconciliation failed for core '{core}'"))?;
            pending += report.commands.payload_count();
            submitted += report.submitted;
            print_report(ctx, &report);
        }

        if let Some(schema) = store.schema_for_core(core) {
            let mut manager = ApiManager::new(&transport, Api::Schema, core);
            let report = reconciler
                .reconcile(&node::schema_nodes(schema), &mut manager, dry_run)
                .with_context(|| format!("Schema reconciliation failed for core '{core}'"))?;
            pending += report.commands.payload_count();
            submitted += report.submitted;
            print_report(ctx, &report);
        }
    }

    println!();
    if pending == 0 {
        ui::success("Everything up to date");
    } else if dry_run {
        ui::info(&format!(
            "{} command(s) would be submitted. Run {} to submit.",
            pending.to_string().bold(),
            "solrsync apply".cyan()
        ));
    } else {
        ui::success(&format!("Submitted {submitted} command(s)"));
        ui::dim("Reload the affected cores if your Solr version requires it");
    }
    Ok(())
}

/// The requested core, or every declared core
fn select_cores<'a>(store: &'a ConfigurationStore, core: Option<&'a str>) -> Result<Vec<&'a str>> {
    let declared = store.cores();
    match core {
        Some(core) if declared.contains(&core) => Ok(vec![core]),
        Some(core) => {
            bail!("Core '{core}' is not declared in any solr_configs or managed_schemas block")
        }
        None if declared.is_empty() => bail!("No cores declared in the config file"),
        None => Ok(declared),
    }
}

fn print_report(ctx: &Context, report: &ReconcileReport) {
    if ctx.quiet {
        return;
    }
    if report.is_converged() {
        ui::dim(&format!("{} up to date", report.api));
        return;
    }

    for (command, payloads) in report.commands.iter() {
        for payload in payloads {
            println!("  {} {}", command.yellow(), describe(payload));
            if ctx.verbose > 0 {
                ui::dim(&payload.to_string());
            }
        }
    }
}

/// Short label for a payload: its name, `source -> dest`, or property keys
fn describe(payload: &Value) -> String {
    if let Some(name) = payload.get("name").and_then(Value::as_str) {
        return name.to_string();
    }
    if let (Some(source), Some(dest)) = (
        payload.get("source").and_then(Value::as_str),
        payload.get("dest").and_then(Value::as_str),
    ) {
        return format!("{source} -> {dest}");
    }
    match payload.as_object() {
        Some(map) => map.keys().cloned().collect::<Vec<_>>().join(", "),
        None => payload.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SolrSyncConfig;
    use serde_json::json;

    fn store() -> ConfigurationStore {
        let config = SolrSyncConfig::parse(
            r#"
[[solr_configs]]
cores = ["demo"]
search_components = [{ name = "spellcheck", class = "solr.SpellCheckComponent" }]

[[managed_schemas]]
cores = ["demo", "products"]
fields = [{ name = "title", type = "text_general" }]
"#,
        )
        .unwrap();
        config.into_store().unwrap().1
    }

    #[test]
    fn test_select_all_cores() {
        let store = store();
        assert_eq!(select_cores(&store, None).unwrap(), ["demo", "products"]);
    }

    #[test]
    fn test_select_one_core() {
        let store = store();
        assert_eq!(select_cores(&store, Some("products")).unwrap(), ["products"]);
    }

    #[test]
    fn test_select_undeclared_core() {
        let store = store();
        let err = select_cores(&store, Some("missing")).unwrap_err();
        assert!(err.to_string().contains("'missing'"));
    }

    #[test]
    fn test_select_without_declarations() {
        let store = ConfigurationStore::new(Vec::new(), Vec::new());
        assert!(select_cores(&store, None).is_err());
    }

    #[test]
    fn test_describe() {
        assert_eq!(describe(&json!({"name": "title", "type": "string"})), "title");
        assert_eq!(describe(&json!({"source": "title", "dest": "text"})), "title -> text");
        assert_eq!(
            describe(&json!({"updateHandler.autoCommit.maxTime": 15000})),
            "updateHandler.autoCommit.maxTime"
        );
    }
}
