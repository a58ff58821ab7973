// src/bin/tfexplorer.rs

use anyhow::Result;
use clap::Parser;
use colored::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tfexplorer::{
    CancellationToken,
    cli::{
        Cli, Command,
        handlers::{self, commons::CliOutcome},
    },
};

/// The main entry point of the `tfexplorer` application.
/// It sets up logging and Ctrl+C handling, dispatches to the handler,
/// and performs centralized error handling.
#[tokio::main]
async fn main() {
    env_logger::init();
    let cancellation_token: CancellationToken = Arc::new(AtomicBool::new(false));

    // Ctrl+C stops a batch from starting further invocations.
    let signal_token = Arc::clone(&cancellation_token);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::debug!("Ctrl+C received; cancelling pending invocations.");
            signal_token.store(true, Ordering::SeqCst);
        }
    });

    if let Err(e) = run_cli(Cli::parse(), &cancellation_token).await {
        // --- Centralized Error Handling ---
        match e.downcast_ref::<CliOutcome>() {
            Some(CliOutcome::Cancelled) => std::process::exit(130),
            Some(outcome @ CliOutcome::InvocationsFailed { .. }) => {
                eprintln!("\n{}", outcome.to_string().yellow());
                std::process::exit(1);
            }
            None => {
                eprintln!("\n{}: {:#}", "Error".red().bold(), e);
                std::process::exit(1);
            }
        }
    }
}

async fn run_cli(cli: Cli, cancellation_token: &CancellationToken) -> Result<()> {
    log::debug!("CLI args parsed: {:?}", cli);

    let settings =
        handlers::commons::load_settings(cli.config.as_deref(), cli.root.as_deref())?;

    match &cli.command {
        Command::Structure(args) => handlers::structure::handle(args, &settings),
        Command::Exec(args) => handlers::exec::handle_single(args, settings).await,
        Command::ExecAll(args) => {
            handlers::exec::handle_all(args, settings, cancellation_token).await
        }
        Command::Profiles(args) => {
            handlers::profiles::handle(&args.action, &settings, cancellation_token)
        }
        Command::Init => handlers::init::handle(&settings),
    }
}
