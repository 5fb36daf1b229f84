//! Components Command
//!
//! List discovered components with their input and output contracts.

use std::path::PathBuf;

use console::style;
use indexmap::IndexMap;

use super::CommandContext;
use crate::analyzer::Analyzer;
use crate::schema::type_to_str;
use crate::types::{Result, SchemaProperty};

pub fn run(dir: Option<PathBuf>) -> Result<()> {
    let ctx = CommandContext::resolve(dir, None, None)?;
    let mut analyzer = Analyzer::new(&ctx.config.components);
    let components = analyzer.analyze()?;

    if components.is_empty() {
        println!("No components found in {}", ctx.config.components.display());
        return Ok(());
    }

    for (name, component) in &components {
        println!("\n{}", style(name).bold());
        if let Some(description) = &component.description {
            println!("  {}", style(description).dim());
        }
        print_properties("inputs", &component.inputs);
        print_properties("outputs", &component.outputs);
    }
    Ok(())
}

fn print_properties(label: &str, properties: &IndexMap<String, SchemaProperty>) {
    if properties.is_empty() {
        return;
    }
    println!("  {}:", label);
    for (name, property) in properties {
        let type_token = property
            .property_type
            .as_ref()
            .map(type_to_str)
            .unwrap_or_else(|| "?".to_string());
        let marker = if property.optional { "optional " } else { "" };
        match &property.description {
            Some(description) => println!(
                "    {}: {}{}  {}",
                name,
                marker,
                type_token,
                style(description).dim()
            ),
            None => println!("    {}: {}{}", name, marker, type_token),
        }
    }
}
