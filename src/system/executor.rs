// src/system/executor.rs

use crate::{
    constants::{ERROR_SECTION_HEADER, INHERITED_ENV_VARS},
    core::{
        commons::absolute_clean,
        env_resolver,
        settings::Settings,
        structure_loader::{self, StructureError},
    },
    models::ExecutionResult,
    system::path_translator::ExecutionEnvironment,
};
use std::collections::BTreeMap;
use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt};

#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("Command is required.")]
    EmptyCommand,
    #[error("At least one valid working directory is required.")]
    NoWorkingDirectories,
    #[error("Command could not be parsed: {0}")]
    CommandParse(String),
    #[error("Command '{0}' could not be executed: {1}")]
    Spawn(String, #[source] io::Error),
    #[error("Structure could not be loaded: {0}")]
    Structure(#[from] StructureError),
    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Everything needed to start one child process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchSpec {
    pub program: String,
    pub args: Vec<String>,
    pub working_dir: PathBuf,
    /// The complete child environment; nothing else is inherited.
    pub env: BTreeMap<String, String>,
}

/// Captured streams and exit code of a finished child.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    pub exit_code: i32,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

/// Starts a child process and waits for it, capturing both streams.
///
/// The seam between the executor and the OS, so tests can count or fake launches.
pub trait ProcessLauncher: Send + Sync {
    fn launch(&self, spec: &LaunchSpec) -> impl Future<Output = io::Result<ProcessOutput>> + Send;
}

/// Production launcher backed by `tokio::process`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioLauncher;

impl ProcessLauncher for TokioLauncher {
    async fn launch(&self, spec: &LaunchSpec) -> io::Result<ProcessOutput> {
        let mut child = tokio::process::Command::new(&spec.program)
            .args(&spec.args)
            .current_dir(&spec.working_dir)
            .env_clear()
            .envs(&spec.env)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        let stdout_handle = child.stdout.take();
        let stderr_handle = child.stderr.take();

        // Drain both pipes while waiting; a child blocked on a full pipe would never exit.
        let (status, stdout, stderr) = tokio::join!(
            child.wait(),
            read_to_end(stdout_handle),
            read_to_end(stderr_handle),
        );

        Ok(ProcessOutput {
            exit_code: exit_code_of(status?),
            stdout: stdout?,
            stderr: stderr?,
        })
    }
}

async fn read_to_end<R: AsyncRead + Unpin>(handle: Option<R>) -> io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    if let Some(mut h) = handle {
        h.read_to_end(&mut buf).await?;
    }
    Ok(buf)
}

/// The process's own exit code. Signal deaths map to `128 + signal` so they
/// never collide with the reserved "never ran" code.
fn exit_code_of(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    1
}

/// Runs the provisioning tool in working directories.
///
/// Cheap to clone; clones share the settings and launcher.
pub struct CommandExecutor<L = TokioLauncher> {
    settings: Arc<Settings>,
    launcher: Arc<L>,
}

impl<L> Clone for CommandExecutor<L> {
    fn clone(&self) -> Self {
        Self {
            settings: Arc::clone(&self.settings),
            launcher: Arc::clone(&self.launcher),
        }
    }
}

impl CommandExecutor<TokioLauncher> {
    pub fn new(settings: Settings) -> Self {
        Self::with_launcher(settings, TokioLauncher)
    }
}

impl<L: ProcessLauncher> CommandExecutor<L> {
    pub fn with_launcher(settings: Settings, launcher: L) -> Self {
        Self {
            settings: Arc::new(settings),
            launcher: Arc::new(launcher),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn launcher(&self) -> &L {
        &self.launcher
    }

    /// Runs `command` in `working_dir` and reports the outcome. Never fails:
    /// problems before or during launch come back as exit code `-1` with the
    /// reason in `output`.
    pub async fn execute_single(&self, command: &str, working_dir: &str) -> ExecutionResult {
        let dir = Path::new(working_dir);
        if !dir.is_dir() {
            log::debug!("Skipping '{}': directory not found", working_dir);
            return ExecutionResult::not_run(
                working_dir,
                format!("Directory not found: {}", working_dir),
                0,
            );
        }

        let stopwatch = Instant::now();
        // Relative or dotted input must still resolve to its owning account.
        let dir = match absolute_clean(dir) {
            Ok(dir) => dir,
            Err(e) => {
                return ExecutionResult::not_run(
                    working_dir,
                    format!("Exception: {}", e),
                    elapsed_ms(stopwatch),
                );
            }
        };
        match self.run(command, &dir).await {
            Ok(output) => {
                let elapsed = elapsed_ms(stopwatch);
                log::debug!(
                    "'{}' in '{}' exited with {} after {} ms",
                    command,
                    working_dir,
                    output.exit_code,
                    elapsed
                );
                ExecutionResult {
                    working_dir: working_dir.to_string(),
                    output: combine_output(&output.stdout, &output.stderr),
                    exit_code: output.exit_code,
                    execution_time_ms: elapsed,
                }
            }
            Err(e) => {
                log::warn!("'{}' in '{}' did not run: {}", command, working_dir, e);
                ExecutionResult::not_run(working_dir, format!("Exception: {}", e), elapsed_ms(stopwatch))
            }
        }
    }

    async fn run(&self, command: &str, dir: &Path) -> Result<ProcessOutput, ExecutionError> {
        // Discovery is blocking filesystem work; keep it off the async workers.
        let settings = Arc::clone(&self.settings);
        let snapshot =
            tokio::task::spawn_blocking(move || structure_loader::load_structure(&settings)).await??;

        let env = with_inherited_baseline(env_resolver::resolve_environment(
            dir,
            &snapshot,
            &self.settings,
        ));
        let spec = plan_launch(command, dir, &self.settings, env)?;
        log::debug!(
            "Launching '{}' {:?} in '{}'",
            spec.program,
            spec.args,
            spec.working_dir.display()
        );

        self.launcher
            .launch(&spec)
            .await
            .map_err(|e| ExecutionError::Spawn(spec.program.clone(), e))
    }
}

/// Decides program, arguments and working directory for one invocation.
///
/// Natively the tool runs directly in `working_dir` with `command` split into
/// arguments. Across environments the tool runs through the guest's shell,
/// after changing into the translated directory.
pub fn plan_launch(
    command: &str,
    working_dir: &Path,
    settings: &Settings,
    env: BTreeMap<String, String>,
) -> Result<LaunchSpec, ExecutionError> {
    match &settings.execution_environment {
        ExecutionEnvironment::Native => {
            let args = shlex::split(command)
                .ok_or_else(|| ExecutionError::CommandParse(command.to_string()))?;
            Ok(LaunchSpec {
                program: settings.tool.clone(),
                args,
                working_dir: dunce::simplified(working_dir).to_path_buf(),
                env,
            })
        }
        ExecutionEnvironment::Wsl { distro } => {
            let guest_dir = settings
                .execution_environment
                .to_execution_path(&working_dir.to_string_lossy());
            let quoted_dir = shlex::try_quote(&guest_dir)
                .map_err(|_| ExecutionError::CommandParse(guest_dir.clone()))?;
            let script = format!("cd {} && {} {}", quoted_dir, settings.tool, command.trim());
            let controller_dir =
                std::env::current_dir().unwrap_or_else(|_| working_dir.to_path_buf());

            Ok(LaunchSpec {
                program: "wsl".to_string(),
                args: vec![
                    "-d".to_string(),
                    distro.clone(),
                    "--".to_string(),
                    "bash".to_string(),
                    "-c".to_string(),
                    script,
                ],
                working_dir: controller_dir,
                env,
            })
        }
    }
}

/// Adds the host variables a process needs merely to start, unless already set.
fn with_inherited_baseline(mut env: BTreeMap<String, String>) -> BTreeMap<String, String> {
    for key in INHERITED_ENV_VARS {
        if env.contains_key(*key) {
            continue;
        }
        if let Some(value) = std::env::var_os(key) {
            env.insert(key.to_string(), value.to_string_lossy().into_owned());
        }
    }
    env
}

/// Stdout followed, when stderr has content, by a delimited error section.
pub fn combine_output(stdout: &[u8], stderr: &[u8]) -> String {
    let mut output = String::from_utf8_lossy(stdout).into_owned();
    let error = String::from_utf8_lossy(stderr);
    if !error.trim().is_empty() {
        output.push('\n');
        output.push_str(ERROR_SECTION_HEADER);
        output.push('\n');
        output.push_str(&error);
        output.push('\n');
    }
    output
}

fn elapsed_ms(stopwatch: Instant) -> u64 {
    u64::try_from(stopwatch.elapsed().as_millis()).unwrap_or(u64::MAX)
}
