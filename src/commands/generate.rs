use anyhow::{Context as AnyhowContext, Result};
use configgen::{Document, GeneratedConfig, Pipeline};
use std::path::Path;

use crate::Context;
use crate::cli::OutputFormat;

pub fn run(ctx: &Context, file: &Path, format: OutputFormat) -> Result<()> {
    let generated = extract(file)?;
    print!("{}", render(&generated, format)?);

    if !ctx.quiet {
        log::info!(
            "Extracted {} search component(s) and {} request handler(s) from {}",
            generated.search_components.len(),
            generated.request_handlers.len(),
            file.display()
        );
    }
    Ok(())
}

pub fn extract(file: &Path) -> Result<GeneratedConfig> {
    let xml = std::fs::read_to_string(file)
        .with_context(|| format!("Could not read {}", file.display()))?;
    let doc = Document::parse(&xml).with_context(|| format!("Invalid XML in {}", file.display()))?;

    Pipeline::default()
        .generate(&doc)
        .with_context(|| format!("Could not extract configuration from {}", file.display()))
}

pub fn render(generated: &GeneratedConfig, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Toml => toml::to_string_pretty(generated).context("Failed to serialize TOML"),
        OutputFormat::Json => {
            let mut json =
                serde_json::to_string_pretty(generated).context("Failed to serialize JSON")?;
            json.push('\n');
            Ok(json)
        }
    }
}
