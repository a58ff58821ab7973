// src/cli/mod.rs

use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod args;
pub mod handlers;

use args::{ExecAllArgs, ExecArgs, ProfilesArgs, StructureArgs};

/// tfexplorer: browse an account/project tree of infrastructure code and run the
/// provisioning tool across it.
///
/// The tree lives under a single root:
///
///   <root>/accounts/<account>/<project group>/<project>
///   <root>/modules/<module>
///   <root>/.aws/credentials
///
/// Every invocation gets the account's profile and region from its `provider.tf`.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about,
    styles = clap::builder::Styles::styled()
        .header(clap::builder::styling::AnsiColor::Yellow.on_default().bold())
        .usage(clap::builder::styling::AnsiColor::Yellow.on_default().bold())
        .literal(clap::builder::styling::AnsiColor::Cyan.on_default().bold())
        .placeholder(clap::builder::styling::AnsiColor::Green.on_default()),
)]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    /// Read settings from this file instead of the user configuration directory.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Override the root directory from the settings.
    #[arg(long, global = true, value_name = "PATH")]
    pub root: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Shows the accounts, modules and credential profiles under the root.
    #[command(visible_alias = "ls")]
    Structure(StructureArgs),

    /// Runs the tool once in a single working directory.
    Exec(ExecArgs),

    /// Runs the tool concurrently in several working directories.
    ExecAll(ExecAllArgs),

    /// Lists, sets or deletes credential profiles.
    Profiles(ProfilesArgs),

    /// Creates the directory layout and seed files under the root.
    Init,
}
