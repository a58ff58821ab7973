// src/core/scanner.rs

//! Leaf directory listing used by every loader. Missing or unreadable
//! directories yield empty results; discovery is best-effort.

use crate::{
    core::commons::{base_name, compare_names, dotted_extension},
    models::FileEntry,
};
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Lists the regular files directly inside `directory`, sorted case-insensitively by name.
pub fn list_files(directory: &Path) -> Vec<FileEntry> {
    let mut files: Vec<FileEntry> = immediate_children(directory)
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| {
            let path = entry.into_path();
            FileEntry {
                name: base_name(&path),
                file_type: dotted_extension(&path),
                path,
            }
        })
        .collect();

    files.sort_by(|a, b| compare_names(&a.name, &b.name));
    files
}

/// Lists the subdirectories directly inside `directory`, sorted case-insensitively by name.
pub fn list_subdirectories(directory: &Path) -> Vec<PathBuf> {
    let mut dirs: Vec<(String, PathBuf)> = immediate_children(directory)
        .filter(|entry| entry.file_type().is_dir())
        .map(|entry| {
            let path = entry.into_path();
            (base_name(&path), path)
        })
        .collect();

    dirs.sort_by(|(a, _), (b, _)| compare_names(a, b));
    dirs.into_iter().map(|(_, path)| path).collect()
}

fn immediate_children(directory: &Path) -> impl Iterator<Item = DirEntry> {
    WalkDir::new(directory)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                // The root itself missing is routine; anything deeper is worth a note.
                if e.depth() > 0 {
                    log::warn!("Skipping unreadable entry in '{}': {}", directory.display(), e);
                } else {
                    log::trace!("Cannot list '{}': {}", directory.display(), e);
                }
                None
            }
        })
}
