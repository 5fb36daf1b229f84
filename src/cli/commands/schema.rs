//! Schema Command
//!
//! Analyze a definition directory and emit the package-schema document.

use std::path::PathBuf;

use console::style;
use tracing::info;

use super::CommandContext;
use crate::analyzer::Analyzer;
use crate::schema::generate_schema;
use crate::types::Result;

pub fn run(
    dir: Option<PathBuf>,
    name: Option<String>,
    version: Option<String>,
    output: Option<PathBuf>,
) -> Result<()> {
    let ctx = CommandContext::resolve(dir, name, version)?;
    let config = &ctx.config;

    let mut analyzer = Analyzer::new(&config.components);
    let components = analyzer.analyze()?;
    info!(
        "Analyzed {} component(s) in {}",
        components.len(),
        config.components.display()
    );

    let spec = generate_schema(
        &config.name,
        config.display_name(),
        &config.version,
        &components,
    );
    let json = spec.to_json()?;

    match output {
        Some(path) => {
            std::fs::write(&path, json)?;
            println!(
                "{} wrote schema for {} component(s) to {}",
                style("✓").green(),
                components.len(),
                path.display()
            );
        }
        None => println!("{}", json),
    }
    Ok(())
}
