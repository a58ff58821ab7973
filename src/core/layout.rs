// src/core/layout.rs

use crate::{constants::DEFAULT_REGION, core::settings::TreePaths};
use std::{fs, io, path::PathBuf};

/// Creates the accounts, modules and providers folders under the root and seeds
/// the credential and config files when they are absent. Existing files are
/// never touched.
///
/// Returns every path that was newly created.
pub fn ensure_layout(paths: &TreePaths) -> io::Result<Vec<PathBuf>> {
    let mut created = Vec::new();

    for dir in [&paths.accounts, &paths.modules, &paths.providers] {
        if !dir.is_dir() {
            fs::create_dir_all(dir)?;
            created.push(dir.clone());
        }
        log::info!("Directory ensured: {}", dir.display());
    }

    let seeds = [
        (&paths.credentials_file, "[default]\n".to_string()),
        (
            &paths.config_file,
            format!("[default]\nregion = {}\n", DEFAULT_REGION),
        ),
    ];
    for (path, content) in seeds {
        if !path.exists() {
            fs::write(path, content)?;
            log::info!("Seeded {}", path.display());
            created.push(path.clone());
        }
    }

    Ok(created)
}
