// src/cli/handlers/init.rs

use anyhow::{Context, Result};
use colored::Colorize;

use crate::core::{layout, settings::Settings};

/// The main handler for the `init` command.
pub fn handle(settings: &Settings) -> Result<()> {
    let paths = settings.paths()?;
    println!("Initializing layout in: {}", paths.root.display());

    let created = layout::ensure_layout(&paths)
        .with_context(|| format!("Could not create the layout under '{}'", paths.root.display()))?;

    if created.is_empty() {
        println!("{}", "Layout already complete. Nothing to do.".dimmed());
    } else {
        for path in &created {
            println!("  {} {}", "created".green(), path.display());
        }
    }
    println!("\n{}", "✔ Ready.".green().bold());
    Ok(())
}
