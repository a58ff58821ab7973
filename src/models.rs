// src/models.rs

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// --- STRUCTURE SNAPSHOT ---
// Read-only values rebuilt from disk on every discovery request.
// Ownership is tree-shaped: Account -> ProjectGroup -> Project -> FileEntry,
// Module -> FileEntry. Providers are referenced from accounts by name only.

/// The full reconstruction of the directory hierarchy at one point in time.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StructureSnapshot {
    pub root_path: PathBuf,
    pub accounts: Vec<Account>,
    pub modules: Vec<Module>,
    pub providers: Vec<Provider>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Always the base name of `path`.
    pub name: String,
    pub path: PathBuf,
    /// Name of a `Provider`; not owned by the account.
    pub profile: Option<String>,
    pub assume_role_arn: Option<String>,
    pub region: Option<String>,
    pub project_groups: Vec<ProjectGroup>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProjectGroup {
    pub name: String,
    pub path: PathBuf,
    pub projects: Vec<Project>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub name: String,
    pub path: PathBuf,
    pub files: Vec<FileEntry>,
}

/// A reusable, account-independent template.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Module {
    pub name: String,
    pub path: PathBuf,
    pub files: Vec<FileEntry>,
}

/// A credential profile surfaced for selection. Secrets never leave the store.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Provider {
    pub name: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FileEntry {
    pub name: String,
    pub path: PathBuf,
    /// The extension including the leading dot (`.tf`), or empty.
    #[serde(rename = "type")]
    pub file_type: String,
}

/// The three optional assignments read from an account's provider fragment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderMetadata {
    pub profile: Option<String>,
    pub assume_role_arn: Option<String>,
    pub region: Option<String>,
}

/// A named set of secrets written to the credential store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialProfile {
    pub name: String,
    pub access_key_id: String,
    pub secret_access_key: String,
}

// --- EXECUTION ---

/// The outcome of one invocation. `exit_code == -1` means the process never ran.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionResult {
    pub working_dir: String,
    pub output: String,
    pub exit_code: i32,
    pub execution_time_ms: u64,
}

impl ExecutionResult {
    /// A result for an invocation whose process was never started.
    pub fn not_run(working_dir: impl Into<String>, output: impl Into<String>, elapsed_ms: u64) -> Self {
        Self {
            working_dir: working_dir.into(),
            output: output.into(),
            exit_code: crate::constants::EXIT_CODE_NOT_RUN,
            execution_time_ms: elapsed_ms,
        }
    }

    pub fn ran(&self) -> bool {
        self.exit_code != crate::constants::EXIT_CODE_NOT_RUN
    }

    pub fn succeeded(&self) -> bool {
        self.exit_code == 0
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BatchResponse {
    pub results: Vec<ExecutionResult>,
}
