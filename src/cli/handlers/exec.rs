// src/cli/handlers/exec.rs

use anyhow::Result;
use colored::Colorize;
use std::sync::atomic::Ordering;

use super::commons::{self, CliOutcome};
use crate::{
    CancellationToken,
    cli::args::{ExecAllArgs, ExecArgs},
    core::settings::Settings,
    models::{BatchResponse, ExecutionResult},
    system::executor::CommandExecutor,
};

/// Handler for `exec`: one invocation, one result.
pub async fn handle_single(args: &ExecArgs, settings: Settings) -> Result<()> {
    let command = commons::join_command(&args.command)?;
    let executor = CommandExecutor::new(settings);

    let result = executor.execute_single(&command, &args.dir).await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        commons::print_result(&result);
    }
    outcome_for(std::slice::from_ref(&result))
}

/// Handler for `exec-all`: fans the command out and reports every directory.
pub async fn handle_all(
    args: &ExecAllArgs,
    settings: Settings,
    cancellation_token: &CancellationToken,
) -> Result<()> {
    let command = commons::join_command(&args.command)?;
    let executor = CommandExecutor::new(settings);

    if !args.json {
        println!(
            "Running '{}' in {} director{}...",
            command.cyan(),
            args.dirs.len(),
            if args.dirs.len() == 1 { "y" } else { "ies" }
        );
    }

    let response: BatchResponse = executor
        .execute_all(&command, &args.dirs, cancellation_token)
        .await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        for result in &response.results {
            commons::print_result(result);
        }
    }

    if cancellation_token.load(Ordering::SeqCst) {
        return Err(CliOutcome::Cancelled.into());
    }
    outcome_for(&response.results)
}

fn outcome_for(results: &[ExecutionResult]) -> Result<()> {
    let failed = results.iter().filter(|r| !r.succeeded()).count();
    if failed > 0 {
        return Err(CliOutcome::InvocationsFailed {
            failed,
            total: results.len(),
        }
        .into());
    }
    Ok(())
}
