// src/system/path_translator.rs

//! Maps controller paths into the path convention of the environment that
//! actually runs the provisioning tool.
//!
//! Every function here is pure and total: no input string can make it fail,
//! and nothing touches the filesystem.

use crate::constants::DEFAULT_WSL_DISTRO;
use serde::{Deserialize, Serialize};

/// Where the provisioning tool runs relative to the controlling process.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ExecutionEnvironment {
    /// Same OS and path convention as the controller.
    Native,
    /// A Linux guest reached through `wsl.exe` from a Windows controller.
    Wsl { distro: String },
}

impl Default for ExecutionEnvironment {
    fn default() -> Self {
        if cfg!(target_os = "windows") {
            ExecutionEnvironment::Wsl {
                distro: DEFAULT_WSL_DISTRO.to_string(),
            }
        } else {
            ExecutionEnvironment::Native
        }
    }
}

impl ExecutionEnvironment {
    /// Whether launching requires translating paths and wrapping the command.
    pub fn is_cross(&self) -> bool {
        !matches!(self, ExecutionEnvironment::Native)
    }

    /// Translates a controller path into this environment's convention.
    pub fn to_execution_path(&self, controller_path: &str) -> String {
        match self {
            ExecutionEnvironment::Native => controller_path.to_string(),
            ExecutionEnvironment::Wsl { distro } => to_wsl_path(controller_path, distro),
        }
    }
}

// --- WSL strategy ---

/// Translates a Windows path into its WSL guest equivalent.
///
/// Rules, in order:
/// 1. `\\wsl.localhost\<distro>\rest` or `\\wsl$\<distro>\rest` -> `/rest`
/// 2. `X:\rest` -> `/mnt/x/rest`
/// 3. anything else -> backslashes replaced by forward slashes
fn to_wsl_path(path: &str, distro: &str) -> String {
    for host in ["wsl.localhost", "wsl$"] {
        let prefix = format!(r"\\{}\{}\", host, distro);
        if let Some(rest) = strip_prefix_ignore_case(path, &prefix) {
            return format!("/{}", rest.replace('\\', "/").trim_start_matches('/'));
        }
        // The share root itself, with no trailing separator.
        if strip_prefix_ignore_case(path, prefix.trim_end_matches('\\')).is_some_and(str::is_empty) {
            return "/".to_string();
        }
    }

    if let Some((drive, rest)) = split_drive(path) {
        let rest = rest.replace('\\', "/");
        let rest = rest.trim_start_matches('/');
        return if rest.is_empty() {
            format!("/mnt/{}", drive.to_ascii_lowercase())
        } else {
            format!("/mnt/{}/{}", drive.to_ascii_lowercase(), rest)
        };
    }

    path.replace('\\', "/")
}

/// Splits `C:\rest` into (`'C'`, `\rest`). Only ASCII drive letters count.
fn split_drive(path: &str) -> Option<(char, &str)> {
    let mut chars = path.chars();
    let drive = chars.next().filter(char::is_ascii_alphabetic)?;
    if chars.next() != Some(':') {
        return None;
    }
    Some((drive, chars.as_str()))
}

fn strip_prefix_ignore_case<'a>(path: &'a str, prefix: &str) -> Option<&'a str> {
    let head = path.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        path.get(prefix.len()..)
    } else {
        None
    }
}
