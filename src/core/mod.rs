// src/core/mod.rs

pub mod commons;
pub mod credentials;
pub mod env_resolver;
pub mod graph_display;
pub mod layout;
pub mod paths;
pub mod provider_parser;
pub mod scanner;
pub mod settings;
pub mod structure_loader;
