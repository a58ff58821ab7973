// src/cli/handlers/commons.rs

// Shared helpers for the command handlers.

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;
use std::sync::atomic::Ordering;
use thiserror::Error;

use crate::{
    CancellationToken,
    core::settings::{self, Settings},
    models::ExecutionResult,
};

/// Outcomes that end the process with a specific exit status rather than a plain error.
#[derive(Error, Debug)]
pub enum CliOutcome {
    #[error("Operation cancelled.")]
    Cancelled,
    #[error("{failed} of {total} invocation(s) did not exit with code 0.")]
    InvocationsFailed { failed: usize, total: usize },
}

/// Loads settings and applies the `--root` override.
pub fn load_settings(config: Option<&Path>, root: Option<&str>) -> Result<Settings> {
    let mut settings =
        settings::load_settings(config).with_context(|| "Could not load settings")?;
    if let Some(root) = root {
        settings.root_path = Some(root.to_string());
    }
    let root = settings.root_path()?;
    log::debug!("Effective root: {}", root.display());
    Ok(settings)
}

pub fn check_for_cancellation(cancellation_token: &CancellationToken) -> Result<()> {
    if cancellation_token.load(Ordering::SeqCst) {
        return Err(CliOutcome::Cancelled.into());
    }
    Ok(())
}

/// Joins CLI words back into one command line, quoting where needed.
pub fn join_command(words: &[String]) -> Result<String> {
    shlex::try_join(words.iter().map(String::as_str))
        .with_context(|| "Command contains a character that cannot be quoted")
}

/// Prints one result block: a header with directory, exit code and time, then the output.
pub fn print_result(result: &ExecutionResult) {
    let status = if result.succeeded() {
        format!("exit {}", result.exit_code).green()
    } else if result.ran() {
        format!("exit {}", result.exit_code).red()
    } else {
        "not run".red().bold()
    };
    println!(
        "\n--- {} ({}, {} ms) ---",
        result.working_dir.cyan(),
        status,
        result.execution_time_ms
    );
    let output = result.output.trim_end();
    if !output.is_empty() {
        println!("{}", output);
    }
}
