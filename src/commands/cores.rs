use anyhow::{Context as AnyhowContext, Result};
use colored::Colorize;
use reconcile::{CoreAdmin, CoreStatus};

use crate::Context;
use crate::config;
use crate::transport::HttpTransport;
use crate::ui;

pub fn status(ctx: &Context, core: Option<&str>) -> Result<()> {
    let endpoint = config::load_endpoint(ctx)?;
    let admin = CoreAdmin::new(HttpTransport::new(&endpoint));

    let response = admin
        .status(core)
        .with_context(|| format!("Could not fetch core status from {}", endpoint.url))?;

    ui::header("Cores");
    for (name, status) in &response.status {
        // STATUS for an unknown core answers with an empty entry
        if status.name.is_empty() {
            ui::warn(&format!("{name}: not loaded"));
            continue;
        }
        show_core(ctx, status);
    }

    for (name, failure) in &response.init_failures {
        ui::error(&format!("{name} failed to load: {failure}"));
    }
    println!();
    Ok(())
}

fn show_core(ctx: &Context, status: &CoreStatus) {
    ui::section(&status.name);
    if let Some(dir) = &status.instance_dir {
        ui::kv("Instance", dir);
    }
    if let Some(uptime) = status.uptime {
        ui::kv("Uptime", &ui::format_uptime(uptime));
    }
    if let Some(index) = &status.index {
        ui::kv(
            "Documents",
            &format!(
                "{} ({} deleted)",
                index.num_docs.to_string().bold(),
                index.deleted_docs
            ),
        );
        ui::kv("Index size", &ui::format_size(index.size_in_bytes));
        if ctx.verbose > 0 {
            ui::kv("Segments", &index.segment_count.to_string());
            if let Some(modified) = &index.last_modified {
                ui::kv("Last modified", modified);
            }
        }
    }
}

pub fn reload(ctx: &Context, core: &str) -> Result<()> {
    let endpoint = config::load_endpoint(ctx)?;
    let admin = CoreAdmin::new(HttpTransport::new(&endpoint));

    admin
        .reload(core)
        .with_context(|| format!("Could not reload core '{core}'"))?;

    if !ctx.quiet {
        ui::success(&format!("Reloaded {}", core.bold()));
    }
    Ok(())
}
