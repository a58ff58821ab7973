// src/constants.rs

/// The name of the directory holding tfexplorer configuration (inside the system config dir).
pub const APP_CONFIG_DIR: &str = "tfexplorer";

/// The name of the settings file (inside the app config dir).
pub const SETTINGS_FILENAME: &str = "settings.toml";

/// Default root folder, relative to the user's home directory.
pub const DEFAULT_ROOT_FOLDER: &str = "terraform-explorer";

pub const DEFAULT_ACCOUNTS_FOLDER: &str = "accounts";
pub const DEFAULT_MODULES_FOLDER: &str = "modules";
pub const DEFAULT_PROVIDERS_FOLDER: &str = ".aws";

/// The provider fragment read from each account directory.
pub const DEFAULT_PROVIDER_FILENAME: &str = "provider.tf";

/// The provisioning tool launched in every working directory.
pub const DEFAULT_TOOL: &str = "terraform";

/// The guest distribution used when translating into WSL.
pub const DEFAULT_WSL_DISTRO: &str = "Ubuntu";

/// Credential store and config file names (inside the providers folder).
pub const CREDENTIALS_FILENAME: &str = "credentials";
pub const CONFIG_FILENAME: &str = "config";

/// The profile that is seeded on init and can never be deleted.
pub const DEFAULT_PROFILE: &str = "default";
pub const DEFAULT_REGION: &str = "us-east-1";

// --- Child process environment ---

pub const ENV_SHARED_CREDENTIALS_FILE: &str = "AWS_SHARED_CREDENTIALS_FILE";
pub const ENV_CONFIG_FILE: &str = "AWS_CONFIG_FILE";
pub const ENV_PROFILE: &str = "AWS_PROFILE";
pub const ENV_REGION: &str = "AWS_REGION";
pub const ENV_WSLENV: &str = "WSLENV";

/// Host variables carried into the child even though its environment is replaced.
/// Without them the OS cannot locate or start the program at all.
pub const INHERITED_ENV_VARS: &[&str] = &["PATH", "HOME", "USERPROFILE", "SYSTEMROOT", "TEMP", "TMP"];

/// Delimits stderr from stdout in a captured result.
pub const ERROR_SECTION_HEADER: &str = "=== ERROR ===";

/// Exit code reserved for "the process never ran".
pub const EXIT_CODE_NOT_RUN: i32 = -1;
