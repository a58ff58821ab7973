// src/system/batch.rs

//! Fan-out of one command over many working directories.
//!
//! Each directory becomes one task; a semaphore sized to the host's processing
//! units bounds how many child processes are alive at once. Results are pushed
//! into a mutex-guarded vector in completion order, so callers only get the
//! guarantee of exactly one result per requested directory.

use crate::{
    CancellationToken,
    models::{BatchResponse, ExecutionResult},
    system::executor::{CommandExecutor, ExecutionError, ProcessLauncher},
};
use std::num::NonZeroUsize;
use std::sync::atomic::Ordering;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::Semaphore;

/// Number of invocations allowed to run at the same time on this host.
pub fn max_parallelism() -> usize {
    std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}

/// Trims entries and drops the blank ones.
fn valid_dirs(working_dirs: &[String]) -> Vec<String> {
    working_dirs
        .iter()
        .map(|d| d.trim())
        .filter(|d| !d.is_empty())
        .map(str::to_string)
        .collect()
}

impl<L: ProcessLauncher + 'static> CommandExecutor<L> {
    /// Runs `command` in every directory of `working_dirs` concurrently.
    ///
    /// Fails only on caller input errors (blank command, no usable directory),
    /// before anything is spawned. Once `cancellation_token` is set, directories
    /// that have not started yet are reported as not run; started invocations
    /// finish. Dropping the returned future detaches in-flight invocations
    /// instead of killing them.
    pub async fn execute_all(
        &self,
        command: &str,
        working_dirs: &[String],
        cancellation_token: &CancellationToken,
    ) -> Result<BatchResponse, ExecutionError> {
        if command.trim().is_empty() {
            return Err(ExecutionError::EmptyCommand);
        }
        let dirs = valid_dirs(working_dirs);
        if dirs.is_empty() {
            return Err(ExecutionError::NoWorkingDirectories);
        }

        let parallelism = max_parallelism();
        log::debug!(
            "Running '{}' in {} directories (parallelism {})",
            command,
            dirs.len(),
            parallelism
        );

        let semaphore = Arc::new(Semaphore::new(parallelism));
        let results: Arc<Mutex<Vec<ExecutionResult>>> =
            Arc::new(Mutex::new(Vec::with_capacity(dirs.len())));
        let mut handles = Vec::with_capacity(dirs.len());

        for dir in dirs {
            let executor = self.clone();
            let semaphore = Arc::clone(&semaphore);
            let results = Arc::clone(&results);
            let token = Arc::clone(cancellation_token);
            let command = command.to_string();
            let task_dir = dir.clone();

            let handle = tokio::spawn(async move {
                let result = match semaphore.acquire_owned().await {
                    Ok(_permit) if token.load(Ordering::SeqCst) => {
                        ExecutionResult::not_run(&task_dir, "Cancelled before start.", 0)
                    }
                    Ok(_permit) => executor.execute_single(&command, &task_dir).await,
                    Err(e) => ExecutionResult::not_run(&task_dir, format!("Exception: {}", e), 0),
                };
                // The lock is never held across an await.
                results
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .push(result);
            });
            handles.push((dir, handle));
        }

        for (dir, handle) in handles {
            // A task that panicked never pushed its result; stand one in.
            if let Err(e) = handle.await {
                log::error!("Invocation task for '{}' failed: {}", dir, e);
                results
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .push(ExecutionResult::not_run(&dir, format!("Exception: {}", e), 0));
            }
        }

        let collected = std::mem::take(&mut *results.lock().unwrap_or_else(PoisonError::into_inner));
        log::debug!(
            "Batch finished: {} of {} invocation(s) exited 0",
            collected.iter().filter(|r| r.succeeded()).count(),
            collected.len()
        );
        Ok(BatchResponse { results: collected })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        constants::EXIT_CODE_NOT_RUN,
        core::settings::Settings,
        system::executor::{LaunchSpec, ProcessOutput},
    };
    use std::collections::HashSet;
    use std::io;
    use std::sync::atomic::{AtomicBool, AtomicUsize};
    use std::time::{Duration, Instant};
    use std::{fs, path::Path};
    use tempfile::TempDir;

    /// Pretends every invocation takes `delay`, and tracks peak concurrency.
    struct SlowLauncher {
        delay: Duration,
        in_flight: AtomicUsize,
        peak: AtomicUsize,
        calls: AtomicUsize,
    }

    impl SlowLauncher {
        fn new(delay: Duration) -> Self {
            Self {
                delay,
                in_flight: AtomicUsize::new(0),
                peak: AtomicUsize::new(0),
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl ProcessLauncher for SlowLauncher {
        async fn launch(&self, spec: &LaunchSpec) -> io::Result<ProcessOutput> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok(ProcessOutput {
                exit_code: 0,
                stdout: spec.working_dir.to_string_lossy().into_owned().into_bytes(),
                stderr: Vec::new(),
            })
        }
    }

    fn token() -> CancellationToken {
        Arc::new(AtomicBool::new(false))
    }

    fn make_dirs(root: &Path, count: usize) -> Vec<String> {
        (0..count)
            .map(|i| {
                let dir = root.join("accounts").join("acct").join("group").join(format!("p{}", i));
                fs::create_dir_all(&dir).unwrap();
                dir.to_string_lossy().into_owned()
            })
            .collect()
    }

    #[tokio::test]
    async fn test_one_result_per_directory() {
        // --- Setup ---
        let root = TempDir::new().unwrap();
        let dirs = make_dirs(root.path(), 3);
        let executor = CommandExecutor::with_launcher(
            Settings::for_root(root.path()),
            SlowLauncher::new(Duration::from_millis(10)),
        );

        // --- Execute ---
        let response = executor.execute_all("plan", &dirs, &token()).await.unwrap();

        // --- Assert ---
        assert_eq!(response.results.len(), 3);
        let returned: HashSet<_> = response.results.iter().map(|r| r.working_dir.clone()).collect();
        let expected: HashSet<_> = dirs.iter().cloned().collect();
        assert_eq!(returned, expected);
        assert!(response.results.iter().all(|r| r.exit_code == 0));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_invocations_run_in_parallel() {
        if max_parallelism() < 4 {
            return;
        }
        let root = TempDir::new().unwrap();
        let dirs = make_dirs(root.path(), 8);
        let executor = CommandExecutor::with_launcher(
            Settings::for_root(root.path()),
            SlowLauncher::new(Duration::from_millis(100)),
        );

        let start = Instant::now();
        let response = executor.execute_all("plan", &dirs, &token()).await.unwrap();
        let elapsed = start.elapsed();

        assert_eq!(response.results.len(), 8);
        assert!(elapsed < Duration::from_millis(700), "batch took {:?}", elapsed);
        assert!(executor.launcher_peak() > 1);
    }

    #[tokio::test]
    async fn test_concurrency_never_exceeds_host_parallelism() {
        let root = TempDir::new().unwrap();
        let dirs = make_dirs(root.path(), max_parallelism() * 2 + 1);
        let executor = CommandExecutor::with_launcher(
            Settings::for_root(root.path()),
            SlowLauncher::new(Duration::from_millis(20)),
        );

        let response = executor.execute_all("plan", &dirs, &token()).await.unwrap();

        assert_eq!(response.results.len(), dirs.len());
        assert!(executor.launcher_peak() <= max_parallelism());
    }

    #[tokio::test]
    async fn test_blank_entries_are_filtered() {
        let root = TempDir::new().unwrap();
        let mut dirs = make_dirs(root.path(), 1);
        dirs.push("   ".to_string());
        dirs.push(String::new());
        let executor = CommandExecutor::with_launcher(
            Settings::for_root(root.path()),
            SlowLauncher::new(Duration::ZERO),
        );

        let response = executor.execute_all("plan", &dirs, &token()).await.unwrap();

        assert_eq!(response.results.len(), 1);
    }

    #[tokio::test]
    async fn test_missing_directory_yields_not_run_result_among_others() {
        let root = TempDir::new().unwrap();
        let mut dirs = make_dirs(root.path(), 2);
        dirs.push(root.path().join("gone").to_string_lossy().into_owned());
        let executor = CommandExecutor::with_launcher(
            Settings::for_root(root.path()),
            SlowLauncher::new(Duration::ZERO),
        );

        let response = executor.execute_all("plan", &dirs, &token()).await.unwrap();

        assert_eq!(response.results.len(), 3);
        assert_eq!(
            response.results.iter().filter(|r| r.exit_code == EXIT_CODE_NOT_RUN).count(),
            1
        );
    }

    #[tokio::test]
    async fn test_input_errors_are_raised_before_spawning() {
        let root = TempDir::new().unwrap();
        let dirs = make_dirs(root.path(), 1);
        let executor = CommandExecutor::with_launcher(
            Settings::for_root(root.path()),
            SlowLauncher::new(Duration::ZERO),
        );

        let blank_command = executor.execute_all("  ", &dirs, &token()).await;
        assert!(matches!(blank_command, Err(ExecutionError::EmptyCommand)));

        let no_dirs = executor
            .execute_all("plan", &[" ".to_string()], &token())
            .await;
        assert!(matches!(no_dirs, Err(ExecutionError::NoWorkingDirectories)));

        assert_eq!(executor.launcher_calls(), 0);
    }

    #[tokio::test]
    async fn test_cancelled_batch_starts_nothing_but_reports_every_directory() {
        let root = TempDir::new().unwrap();
        let dirs = make_dirs(root.path(), 4);
        let executor = CommandExecutor::with_launcher(
            Settings::for_root(root.path()),
            SlowLauncher::new(Duration::ZERO),
        );
        let cancelled = Arc::new(AtomicBool::new(true));

        let response = executor.execute_all("plan", &dirs, &cancelled).await.unwrap();

        assert_eq!(response.results.len(), 4);
        assert!(response.results.iter().all(|r| !r.ran()));
        assert_eq!(executor.launcher_calls(), 0);
    }

    impl CommandExecutor<SlowLauncher> {
        fn launcher_peak(&self) -> usize {
            self.launcher().peak.load(Ordering::SeqCst)
        }

        fn launcher_calls(&self) -> usize {
            self.launcher().calls.load(Ordering::SeqCst)
        }
    }
}
