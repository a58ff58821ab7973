// tests/relative_working_dir.rs

// Changes the process working directory, so it stays the only test in this binary.

use std::fs;
use std::sync::Mutex;
use tempfile::TempDir;
use tfexplorer::{
    constants::{ENV_PROFILE, ENV_REGION},
    core::settings::Settings,
    system::executor::{CommandExecutor, LaunchSpec, ProcessLauncher, ProcessOutput},
};

#[derive(Default)]
struct RecordingLauncher {
    launches: Mutex<Vec<LaunchSpec>>,
}

impl ProcessLauncher for RecordingLauncher {
    async fn launch(&self, spec: &LaunchSpec) -> std::io::Result<ProcessOutput> {
        self.launches.lock().unwrap().push(spec.clone());
        Ok(ProcessOutput::default())
    }
}

#[tokio::test]
async fn relative_and_dotted_working_dirs_resolve_their_account() {
    // --- Setup ---
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("accounts/acct1/g/p")).unwrap();
    fs::create_dir_all(root.join("accounts/other")).unwrap();
    fs::write(
        root.join("accounts/acct1/provider.tf"),
        "provider \"aws\" {\n  profile = \"prod\"\n  region = \"eu-west-1\"\n}\n",
    )
    .unwrap();
    let previous_cwd = std::env::current_dir().unwrap();
    std::env::set_current_dir(root).unwrap();
    let executor = CommandExecutor::with_launcher(Settings::for_root(root), RecordingLauncher::default());

    // --- Execute ---
    let relative = executor.execute_single("plan", "accounts/acct1/g/p").await;
    let dotted_path = root
        .join("accounts/other/../acct1/g/p")
        .to_string_lossy()
        .into_owned();
    let dotted = executor.execute_single("plan", &dotted_path).await;
    std::env::set_current_dir(previous_cwd).unwrap();

    // --- Assert ---
    assert_eq!((relative.exit_code, dotted.exit_code), (0, 0));
    let launches = executor.launcher().launches.lock().unwrap();
    assert_eq!(launches.len(), 2);
    for spec in launches.iter() {
        assert!(spec.working_dir.is_absolute());
        assert!(spec.working_dir.ends_with("accounts/acct1/g/p"));
        assert_eq!(spec.env.get(ENV_PROFILE).map(String::as_str), Some("prod"));
        assert_eq!(spec.env.get(ENV_REGION).map(String::as_str), Some("eu-west-1"));
    }
}
