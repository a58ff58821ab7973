//! Discovers an accounts / project groups / projects tree of infrastructure
//! code and runs the provisioning tool across it, natively or through WSL.

use std::sync::Arc;
use std::sync::atomic::AtomicBool;

/// Set to `true` to stop a batch from starting further invocations.
pub type CancellationToken = Arc<AtomicBool>;

pub mod cli;
pub mod constants;
pub mod core;
pub mod models;
pub mod system;
