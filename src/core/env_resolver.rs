// src/core/env_resolver.rs

//! Derives the provisioning tool's environment for a working directory.

use crate::{
    constants::{ENV_CONFIG_FILE, ENV_PROFILE, ENV_REGION, ENV_SHARED_CREDENTIALS_FILE, ENV_WSLENV},
    core::{commons::absolute_clean, settings::Settings},
    models::{Account, StructureSnapshot},
};
use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

/// Whether the host filesystem usually compares paths without regard to case.
pub const HOST_PATHS_CASE_INSENSITIVE: bool = cfg!(any(target_os = "windows", target_os = "macos"));

/// Builds the variables for a child process running in `working_dir`.
///
/// The credential and config file locations are always present. Profile and
/// region are added when an account in `snapshot` contains `working_dir` and
/// declares them. No owning account is not an error.
pub fn resolve_environment(
    working_dir: &Path,
    snapshot: &StructureSnapshot,
    settings: &Settings,
) -> BTreeMap<String, String> {
    let paths = settings.paths_under(&snapshot.root_path);
    let mut env = BTreeMap::new();
    env.insert(
        ENV_SHARED_CREDENTIALS_FILE.to_string(),
        paths.credentials_file.to_string_lossy().into_owned(),
    );
    env.insert(
        ENV_CONFIG_FILE.to_string(),
        paths.config_file.to_string_lossy().into_owned(),
    );

    match find_owning_account(working_dir, snapshot, HOST_PATHS_CASE_INSENSITIVE) {
        Some(account) => {
            log::debug!(
                "Working directory '{}' belongs to account '{}'",
                working_dir.display(),
                account.name
            );
            if let Some(profile) = non_blank(account.profile.as_deref()) {
                env.insert(ENV_PROFILE.to_string(), profile.to_string());
            }
            if let Some(region) = non_blank(account.region.as_deref()) {
                env.insert(ENV_REGION.to_string(), region.to_string());
            }
        }
        None => log::debug!(
            "Working directory '{}' is outside every account",
            working_dir.display()
        ),
    }

    if settings.execution_environment.is_cross() {
        env.insert(ENV_WSLENV.to_string(), wslenv_for(&env));
    }

    env
}

/// Finds the account whose directory contains `working_dir` (the deepest one if several do).
///
/// Both sides are compared lexically cleaned and, when they exist, with symlinks
/// resolved, so `..` segments, relative input and a symlinked root all match.
pub fn find_owning_account<'a>(
    working_dir: &Path,
    snapshot: &'a StructureSnapshot,
    case_insensitive: bool,
) -> Option<&'a Account> {
    let dir_forms = comparable_forms(working_dir);
    snapshot
        .accounts
        .iter()
        .filter(|account| {
            let account_forms = comparable_forms(&account.path);
            dir_forms.iter().any(|dir| {
                account_forms
                    .iter()
                    .any(|prefix| path_starts_with(dir, prefix, case_insensitive))
            })
        })
        .max_by_key(|account| account.path.as_os_str().len())
}

/// The lexically cleaned absolute form of `path`, plus its canonical form when
/// the path exists and differs.
fn comparable_forms(path: &Path) -> Vec<PathBuf> {
    let mut forms = vec![absolute_clean(path).unwrap_or_else(|_| path.to_path_buf())];
    match dunce::canonicalize(path) {
        Ok(canonical) if !forms.contains(&canonical) => forms.push(canonical),
        _ => {}
    }
    forms
}

/// Component-aware prefix test on the textual form of both paths.
///
/// Separators are unified so `C:\a\b` and `C:/a/b` agree, and `/a/bc` is not
/// inside `/a/b`.
pub fn path_starts_with(path: &Path, prefix: &Path, case_insensitive: bool) -> bool {
    let path = normalize(path, case_insensitive);
    let prefix = normalize(prefix, case_insensitive);
    if prefix.is_empty() {
        return false;
    }
    match path.strip_prefix(prefix.as_str()) {
        Some(rest) => rest.is_empty() || rest.starts_with('/') || prefix.ends_with('/'),
        None => false,
    }
}

fn normalize(path: &Path, case_insensitive: bool) -> String {
    let text = path.to_string_lossy().replace('\\', "/");
    if text.is_empty() {
        return text;
    }
    let trimmed = if text.len() > 1 { text.trim_end_matches('/') } else { text.as_str() };
    // A path made only of separators collapses to the root.
    let trimmed = if trimmed.is_empty() { "/" } else { trimmed };
    if case_insensitive {
        trimmed.to_lowercase()
    } else {
        trimmed.to_string()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Lists the variables to forward into a WSL guest; file locations get the `/p`
/// flag so WSL translates them to guest paths.
fn wslenv_for(env: &BTreeMap<String, String>) -> String {
    env.keys()
        .map(|key| {
            if key == ENV_SHARED_CREDENTIALS_FILE || key == ENV_CONFIG_FILE {
                format!("{}/p", key)
            } else {
                key.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(":")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::path_translator::ExecutionEnvironment;
    use std::path::PathBuf;

    fn snapshot_with(accounts: Vec<Account>) -> StructureSnapshot {
        StructureSnapshot {
            root_path: PathBuf::from("/root"),
            accounts,
            ..Default::default()
        }
    }

    fn account(name: &str, path: &str, profile: Option<&str>, region: Option<&str>) -> Account {
        Account {
            name: name.to_string(),
            path: PathBuf::from(path),
            profile: profile.map(str::to_string),
            region: region.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_account_directory_sets_profile_and_region() {
        let snapshot = snapshot_with(vec![account(
            "acct1",
            "/root/accounts/acct1",
            Some("prod"),
            Some("us-east-1"),
        )]);
        let settings = Settings::for_root("/root");

        let env = resolve_environment(Path::new("/root/accounts/acct1/groupA/proj1"), &snapshot, &settings);

        assert_eq!(env.get(ENV_PROFILE).map(String::as_str), Some("prod"));
        assert_eq!(env.get(ENV_REGION).map(String::as_str), Some("us-east-1"));
        assert!(env.contains_key(ENV_SHARED_CREDENTIALS_FILE));
        assert!(env.contains_key(ENV_CONFIG_FILE));
        assert!(!env.contains_key(ENV_WSLENV));
    }

    #[test]
    fn test_outside_directory_gets_only_file_locations() {
        let snapshot = snapshot_with(vec![account(
            "acct1",
            "/root/accounts/acct1",
            Some("prod"),
            Some("us-east-1"),
        )]);
        let settings = Settings::for_root("/root");

        let env = resolve_environment(Path::new("/root/other"), &snapshot, &settings);

        assert_eq!(env.len(), 2);
        let paths = settings.paths_under("/root");
        assert_eq!(
            env.get(ENV_SHARED_CREDENTIALS_FILE).map(PathBuf::from),
            Some(paths.credentials_file)
        );
        assert_eq!(
            env.get(ENV_CONFIG_FILE).map(PathBuf::from),
            Some(paths.config_file)
        );
    }

    #[test]
    fn test_blank_metadata_is_not_exported() {
        let snapshot = snapshot_with(vec![account("a", "/root/accounts/a", Some("  "), None)]);
        let settings = Settings::for_root("/root");

        let env = resolve_environment(Path::new("/root/accounts/a/g/p"), &snapshot, &settings);

        assert!(!env.contains_key(ENV_PROFILE));
        assert!(!env.contains_key(ENV_REGION));
    }

    #[test]
    fn test_sibling_with_shared_name_prefix_does_not_match() {
        let snapshot = snapshot_with(vec![account("acct1", "/root/accounts/acct1", Some("prod"), None)]);
        assert!(find_owning_account(Path::new("/root/accounts/acct10/g"), &snapshot, false).is_none());
        assert!(find_owning_account(Path::new("/root/accounts/acct1"), &snapshot, false).is_some());
    }

    #[test]
    fn test_dotted_working_dir_matches_its_account() {
        let snapshot = snapshot_with(vec![account("acct1", "/root/accounts/acct1", Some("prod"), None)]);
        let dir = Path::new("/root/accounts/other/../acct1/./g/p");

        let found = find_owning_account(dir, &snapshot, false).map(|a| a.name.as_str());

        assert_eq!(found, Some("acct1"));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_root_matches_real_working_dir() {
        // --- Setup ---
        let dir = tempfile::TempDir::new().unwrap();
        let real = dir.path().join("real");
        std::fs::create_dir_all(real.join("accounts/acct1/g/p")).unwrap();
        let link = dir.path().join("link");
        std::os::unix::fs::symlink(&real, &link).unwrap();
        let snapshot = StructureSnapshot {
            root_path: link.clone(),
            accounts: vec![Account {
                name: "acct1".to_string(),
                path: link.join("accounts/acct1"),
                profile: Some("prod".to_string()),
                ..Default::default()
            }],
            ..Default::default()
        };

        // --- Execute ---
        let found = find_owning_account(&real.join("accounts/acct1/g/p"), &snapshot, false);

        // --- Assert ---
        assert_eq!(found.map(|a| a.name.as_str()), Some("acct1"));
    }

    #[test]
    fn test_prefix_case_sensitivity_follows_flag() {
        let prefix = Path::new(r"C:\Users\Alice\accounts\acct1");
        let path = Path::new(r"c:\users\alice\ACCOUNTS\acct1\group\proj");
        assert!(path_starts_with(path, prefix, true));
        assert!(!path_starts_with(path, prefix, false));
    }

    #[test]
    fn test_prefix_ignores_trailing_separators() {
        assert!(path_starts_with(Path::new("/a/b/c"), Path::new("/a/b/"), false));
        assert!(path_starts_with(Path::new("/a/b/"), Path::new("/a/b"), false));
        assert!(path_starts_with(Path::new("/a/b"), Path::new("/"), false));
        assert!(!path_starts_with(Path::new("/a/b"), Path::new(""), false));
    }

    #[test]
    fn test_wsl_mode_forwards_variables() {
        let snapshot = snapshot_with(vec![account("a", "/root/accounts/a", Some("dev"), None)]);
        let mut settings = Settings::for_root("/root");
        settings.execution_environment = ExecutionEnvironment::Wsl {
            distro: "Ubuntu".to_string(),
        };

        let env = resolve_environment(Path::new("/root/accounts/a"), &snapshot, &settings);

        assert_eq!(
            env.get(ENV_WSLENV).map(String::as_str),
            Some("AWS_CONFIG_FILE/p:AWS_PROFILE:AWS_SHARED_CREDENTIALS_FILE/p")
        );
    }
}
