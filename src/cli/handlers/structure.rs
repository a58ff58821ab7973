// src/cli/handlers/structure.rs

use anyhow::Result;

use crate::{
    cli::args::StructureArgs,
    core::{
        graph_display::{self, DisplayOptions},
        settings::Settings,
        structure_loader,
    },
};

pub fn handle(args: &StructureArgs, settings: &Settings) -> Result<()> {
    let snapshot = structure_loader::load_structure(settings)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    let options = DisplayOptions {
        show_paths: args.paths,
        show_files: args.files,
    };
    graph_display::display_structure_tree(&snapshot, &options);
    Ok(())
}
