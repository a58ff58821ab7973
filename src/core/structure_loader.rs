// src/core/structure_loader.rs

//! # Structure Loader
//!
//! Rebuilds the [`StructureSnapshot`] from the directory layout under the
//! configured root:
//!
//! ```text
//! <root>/
//!   modules/<module>/<files>
//!   accounts/<account>/provider.tf
//!   accounts/<account>/<project group>/<project>/<files>
//!   .aws/credentials
//! ```
//!
//! The snapshot is computed fresh on every call and never cached. Only an
//! unusable root aborts the load; every other missing or unreadable item is
//! omitted (or left empty) so one bad account cannot hide the rest.

use crate::{
    core::{
        commons::{base_name, compare_names},
        credentials,
        paths::PathError,
        provider_parser, scanner,
        settings::Settings,
    },
    models::{Account, Module, Project, ProjectGroup, Provider, StructureSnapshot},
};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StructureError {
    #[error("Root directory '{0}' does not exist. Run 'tfexplorer init' to create it.")]
    RootNotFound(PathBuf),
    #[error("Root path '{0}' is not a directory.")]
    RootNotADirectory(PathBuf),
    #[error("Cannot resolve root directory: {0}")]
    Path(#[from] PathError),
    #[error("Cannot access root directory '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Loads the full hierarchy for `settings`.
pub fn load_structure(settings: &Settings) -> Result<StructureSnapshot, StructureError> {
    let paths = settings.paths()?;
    check_root(&paths.root)?;
    log::debug!("Loading structure from '{}'", paths.root.display());

    let (modules, accounts) = rayon::join(
        || load_modules(&paths.modules),
        || load_accounts(&paths.accounts, &settings.provider_file),
    );
    let providers = load_providers(&paths.credentials_file);

    log::debug!(
        "Structure loaded: {} account(s), {} module(s), {} provider(s)",
        accounts.len(),
        modules.len(),
        providers.len()
    );

    Ok(StructureSnapshot {
        root_path: paths.root,
        accounts,
        modules,
        providers,
    })
}

fn check_root(root_path: &Path) -> Result<(), StructureError> {
    match std::fs::metadata(root_path) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(StructureError::RootNotADirectory(root_path.to_path_buf())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(StructureError::RootNotFound(root_path.to_path_buf()))
        }
        Err(e) => Err(StructureError::Io {
            path: root_path.to_path_buf(),
            source: e,
        }),
    }
}

pub fn load_modules(modules_path: &Path) -> Vec<Module> {
    // `list_subdirectories` is already sorted and `par_iter().map().collect()`
    // preserves that order.
    scanner::list_subdirectories(modules_path)
        .par_iter()
        .map(|module_dir| Module {
            name: base_name(module_dir),
            files: scanner::list_files(module_dir),
            path: module_dir.clone(),
        })
        .collect()
}

pub fn load_accounts(accounts_path: &Path, provider_file: &str) -> Vec<Account> {
    scanner::list_subdirectories(accounts_path)
        .par_iter()
        .map(|account_dir| load_account(account_dir, provider_file))
        .collect()
}

fn load_account(account_dir: &Path, provider_file: &str) -> Account {
    log::trace!("Loading account '{}'", account_dir.display());
    let metadata = provider_parser::read_provider_metadata(&account_dir.join(provider_file));

    Account {
        name: base_name(account_dir),
        path: account_dir.to_path_buf(),
        profile: metadata.profile,
        assume_role_arn: metadata.assume_role_arn,
        region: metadata.region,
        project_groups: load_project_groups(account_dir),
    }
}

pub fn load_project_groups(account_dir: &Path) -> Vec<ProjectGroup> {
    scanner::list_subdirectories(account_dir)
        .into_iter()
        .map(|group_dir| ProjectGroup {
            name: base_name(&group_dir),
            projects: load_projects(&group_dir),
            path: group_dir,
        })
        .collect()
}

pub fn load_projects(group_dir: &Path) -> Vec<Project> {
    scanner::list_subdirectories(group_dir)
        .into_iter()
        .map(|project_dir| Project {
            name: base_name(&project_dir),
            files: scanner::list_files(&project_dir),
            path: project_dir,
        })
        .collect()
}

pub fn load_providers(credentials_file: &Path) -> Vec<Provider> {
    let mut providers = credentials::read_profiles(credentials_file);
    providers.sort_by(|a, b| compare_names(&a.name, &b.name));
    providers
}
