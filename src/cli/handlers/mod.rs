// src/cli/handlers/mod.rs

pub mod commons;
pub mod exec;
pub mod init;
pub mod profiles;
pub mod structure;
