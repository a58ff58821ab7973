// src/core/credentials.rs

//! The flat, block-structured credential store (`[name]` headers followed by
//! `key = value` lines).
//!
//! Reading only ever exposes profile names. Writes rewrite a single section and
//! keep every other line of the file verbatim and in order. Section lookups are
//! case-insensitive; headers are written with the caller's casing.

use crate::{
    constants::DEFAULT_PROFILE,
    core::commons::names_equal,
    models::{CredentialProfile, Provider},
};
use lazy_static::lazy_static;
use regex::Regex;
use std::{fs, io::ErrorKind, path::Path};
use thiserror::Error;

lazy_static! {
    static ref HEADER_RE: Regex =
        Regex::new(r"^\[([^\[\]]+)\]$").expect("credential header pattern is valid");
}

#[derive(Error, Debug)]
pub enum CredentialsError {
    #[error("Filesystem Error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid profile name '{0}': it must be a non-empty name without brackets or line breaks.")]
    InvalidProfileName(String),
    #[error("The '{0}' profile cannot be deleted.")]
    ProtectedProfile(String),
}

/// Returns the section name if `line` is a `[name]` header.
fn header_name(line: &str) -> Option<&str> {
    HEADER_RE
        .captures(line.trim())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
}

fn validate_name(name: &str) -> Result<&str, CredentialsError> {
    let trimmed = name.trim();
    if trimmed.is_empty() || trimmed.contains(['[', ']', '\n', '\r']) {
        return Err(CredentialsError::InvalidProfileName(name.to_string()));
    }
    Ok(trimmed)
}

fn read_lines(path: &Path) -> Result<Vec<String>, std::io::Error> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(content.lines().map(str::to_string).collect()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
        Err(e) => Err(e),
    }
}

fn write_lines(path: &Path, lines: &[String]) -> Result<(), std::io::Error> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut content = lines.join("\n");
    content.push('\n');
    fs::write(path, content)
}

/// Lists profile names in file order. A missing file has no profiles.
pub fn read_profiles(path: &Path) -> Vec<Provider> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Vec::new(),
        Err(e) => {
            log::warn!("Could not read credential store '{}': {}", path.display(), e);
            return Vec::new();
        }
    };

    content
        .lines()
        .filter_map(header_name)
        .map(|name| Provider {
            name: name.to_string(),
        })
        .collect()
}

/// Lines that may sit between sections without belonging to either one.
fn is_separator(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with(';')
}

/// Replaces the header and key lines of the section called `name` with
/// `replacement`, or drops them when it is `None`. Blank and comment lines at
/// the end of that section introduce the next one and are kept.
///
/// Returns the new lines and whether the section was present.
fn rewrite_section(
    lines: Vec<String>,
    name: &str,
    replacement: Option<&[String]>,
) -> (Vec<String>, bool) {
    let mut output = Vec::with_capacity(lines.len());
    let mut trailing: Vec<String> = Vec::new();
    let mut inside_target = false;
    let mut found = false;

    for line in lines {
        if let Some(current) = header_name(&line) {
            if inside_target {
                flush_trailing(&mut output, &mut trailing);
            }
            inside_target = names_equal(current, name);
            if inside_target {
                if let (false, Some(section)) = (found, replacement) {
                    output.extend(section.iter().cloned());
                }
                found = true;
                continue;
            }
        } else if inside_target {
            if is_separator(&line) {
                trailing.push(line);
            } else {
                // A key line: whatever preceded it was inside the section.
                trailing.clear();
            }
            continue;
        }
        output.push(line);
    }

    if inside_target {
        flush_trailing(&mut output, &mut trailing);
    }
    (output, found)
}

fn flush_trailing(output: &mut Vec<String>, trailing: &mut Vec<String>) {
    let mut lines = trailing.drain(..).peekable();
    // Never stack a second blank line onto one that already ends the output.
    if output.last().is_none_or(|l| l.trim().is_empty()) {
        while lines.next_if(|l| l.trim().is_empty()).is_some() {}
    }
    output.extend(lines);
}

/// Creates or replaces the section for `profile.name`.
pub fn update_profile(path: &Path, profile: &CredentialProfile) -> Result<(), CredentialsError> {
    let name = validate_name(&profile.name)?;
    let section = [
        format!("[{}]", name),
        format!("aws_access_key_id = {}", profile.access_key_id.trim()),
        format!("aws_secret_access_key = {}", profile.secret_access_key.trim()),
    ];

    let (mut output, replaced) = rewrite_section(read_lines(path)?, name, Some(&section));

    if !replaced {
        if output.last().is_some_and(|l| !l.trim().is_empty()) {
            output.push(String::new());
        }
        output.extend(section.iter().cloned());
    }

    log::debug!("Writing profile '{}' to '{}'", name, path.display());
    write_lines(path, &output)?;
    Ok(())
}

/// Removes the section for `name`. Returns `false` if no such section exists.
pub fn delete_profile(path: &Path, name: &str) -> Result<bool, CredentialsError> {
    let name = validate_name(name)?;
    if names_equal(name, DEFAULT_PROFILE) {
        return Err(CredentialsError::ProtectedProfile(name.to_string()));
    }

    let (output, found) = rewrite_section(read_lines(path)?, name, None);
    if !found {
        return Ok(false);
    }

    log::debug!("Removing profile '{}' from '{}'", name, path.display());
    write_lines(path, &output)?;
    Ok(true)
}
