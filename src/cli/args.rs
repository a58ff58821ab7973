// src/cli/args.rs

use clap::{Args, Subcommand};

#[derive(Args, Debug, Default)]
pub struct StructureArgs {
    /// Print the snapshot as JSON instead of a tree.
    #[arg(long)]
    pub json: bool,

    /// Show the absolute path of each node.
    #[arg(long, short)]
    pub paths: bool,

    /// List the files of every project and module.
    #[arg(long, short)]
    pub files: bool,
}

#[derive(Args, Debug)]
pub struct ExecArgs {
    /// The working directory (a project directory under the root).
    pub dir: String,

    /// Arguments for the tool, e.g. `plan -out=tfplan`.
    #[arg(last = true, required = true, allow_hyphen_values = true)]
    pub command: Vec<String>,

    /// Print the result as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ExecAllArgs {
    /// A working directory. Repeat for each directory.
    #[arg(long = "dir", short = 'd', required = true)]
    pub dirs: Vec<String>,

    /// Arguments for the tool, e.g. `init -upgrade`.
    #[arg(last = true, required = true, allow_hyphen_values = true)]
    pub command: Vec<String>,

    /// Print the results as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ProfilesArgs {
    #[command(subcommand)]
    pub action: ProfilesAction,
}

#[derive(Subcommand, Debug)]
pub enum ProfilesAction {
    /// Lists the profile names in the credential store.
    #[command(visible_alias = "ls")]
    List,

    /// Creates or replaces a profile. Missing keys are asked interactively.
    Set {
        name: String,
        #[arg(long)]
        access_key_id: Option<String>,
        #[arg(long)]
        secret_access_key: Option<String>,
    },

    /// Removes a profile. The default profile cannot be deleted.
    #[command(visible_alias = "rm")]
    Delete {
        name: String,
        /// Do not ask for confirmation.
        #[arg(long, short)]
        yes: bool,
    },
}
