//! Outputs Command
//!
//! Show which attributes of a component a host would surface as
//! observable state after construction.

use std::path::PathBuf;

use console::style;

use super::CommandContext;
use crate::analyzer::Analyzer;
use crate::types::Result;

pub fn run(component: &str, dir: Option<PathBuf>) -> Result<()> {
    let ctx = CommandContext::resolve(dir, None, None)?;
    let mut analyzer = Analyzer::new(&ctx.config.components);

    let handle = analyzer.find_component(component)?;
    let outputs = analyzer.component_outputs(&handle)?;

    println!(
        "{} ({})",
        style(&handle.component).bold(),
        handle.file.display()
    );
    if outputs.is_empty() {
        println!("  no observable outputs");
    }
    for name in outputs {
        println!("  {}", name);
    }
    Ok(())
}
