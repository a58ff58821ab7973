//! # System Interaction Layer
//!
//! The boundary between discovery and the operating system's process model.
//!
//! ## Modules
//!
//! - **`executor`**: spawns the provisioning tool in one working directory with a
//!   replaced environment, drains both output streams while waiting, and folds
//!   every failure into an `ExecutionResult`.
//! - **`batch`**: runs the executor over many directories under a bound equal to
//!   the host's processing units.
//! - **`path_translator`**: pure mapping of controller paths into the convention
//!   of the environment that runs the tool (for example a WSL guest).

pub mod batch;
pub mod executor;
pub mod path_translator;
