// src/core/provider_parser.rs

use crate::models::ProviderMetadata;
use lazy_static::lazy_static;
use regex::Regex;
use std::{fs, io::ErrorKind, path::Path};

lazy_static! {
    // `\b` keeps `source_profile = "..."` from matching as `profile`.
    static ref PROFILE_RE: Regex =
        Regex::new(r#"\bprofile\s*=\s*"([^"]+)""#).expect("profile pattern is valid");
    static ref REGION_RE: Regex =
        Regex::new(r#"\bregion\s*=\s*"([^"]+)""#).expect("region pattern is valid");
    static ref ROLE_ARN_RE: Regex =
        Regex::new(r#"\brole_arn\s*=\s*"([^"]+)""#).expect("role_arn pattern is valid");
}

/// Extracts `profile`, `role_arn` and `region` assignments from a provider fragment.
///
/// Keys are independent: any subset may be present, in any order. Whole-line
/// `#` and `//` comments are ignored. The first assignment of each key wins.
pub fn parse_provider_metadata(contents: &str) -> ProviderMetadata {
    let code: String = contents
        .lines()
        .filter(|line| {
            let trimmed = line.trim_start();
            !(trimmed.starts_with('#') || trimmed.starts_with("//"))
        })
        .collect::<Vec<_>>()
        .join("\n");

    ProviderMetadata {
        profile: first_capture(&PROFILE_RE, &code),
        assume_role_arn: first_capture(&ROLE_ARN_RE, &code),
        region: first_capture(&REGION_RE, &code),
    }
}

/// Reads and parses the fragment at `path`. A missing or unreadable file yields
/// all-absent metadata.
pub fn read_provider_metadata(path: &Path) -> ProviderMetadata {
    match fs::read_to_string(path) {
        Ok(contents) => parse_provider_metadata(&contents),
        Err(e) if e.kind() == ErrorKind::NotFound => ProviderMetadata::default(),
        Err(e) => {
            log::warn!("Could not read provider file '{}': {}", path.display(), e);
            ProviderMetadata::default()
        }
    }
}

fn first_capture(re: &Regex, haystack: &str) -> Option<String> {
    re.captures(haystack)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|value| !value.is_empty())
}
