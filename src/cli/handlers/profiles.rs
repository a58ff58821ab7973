// src/cli/handlers/profiles.rs

use anyhow::{Result, anyhow};
use colored::Colorize;
use dialoguer::{Confirm, Input, Password, theme::ColorfulTheme};

use super::commons::check_for_cancellation;
use crate::{
    CancellationToken,
    cli::args::ProfilesAction,
    core::{credentials, settings::Settings, structure_loader},
    models::CredentialProfile,
};

pub fn handle(
    action: &ProfilesAction,
    settings: &Settings,
    cancellation_token: &CancellationToken,
) -> Result<()> {
    let path = settings.paths()?.credentials_file;

    match action {
        ProfilesAction::List => {
            let providers = structure_loader::load_providers(&path);
            if providers.is_empty() {
                println!("No profiles in '{}'.", path.display());
            }
            for provider in providers {
                println!("{}", provider.name);
            }
        }
        ProfilesAction::Set {
            name,
            access_key_id,
            secret_access_key,
        } => {
            let access_key_id = match access_key_id {
                Some(key) => key.clone(),
                None => Input::with_theme(&ColorfulTheme::default())
                    .with_prompt("Access key id")
                    .interact_text()?,
            };
            check_for_cancellation(cancellation_token)?;
            let secret_access_key = match secret_access_key {
                Some(secret) => secret.clone(),
                None => Password::with_theme(&ColorfulTheme::default())
                    .with_prompt("Secret access key")
                    .interact()?,
            };
            check_for_cancellation(cancellation_token)?;

            credentials::update_profile(
                &path,
                &CredentialProfile {
                    name: name.clone(),
                    access_key_id,
                    secret_access_key,
                },
            )?;
            println!("{} Profile '{}' saved.", "✔".green(), name.cyan());
        }
        ProfilesAction::Delete { name, yes } => {
            if !yes
                && !Confirm::with_theme(&ColorfulTheme::default())
                    .with_prompt(format!("Delete profile '{}'?", name))
                    .default(false)
                    .interact()?
            {
                println!("Aborted.");
                return Ok(());
            }
            if !credentials::delete_profile(&path, name)? {
                return Err(anyhow!("Profile '{}' not found in '{}'.", name, path.display()));
            }
            println!("{} Profile '{}' deleted.", "✔".green(), name.cyan());
        }
    }
    Ok(())
}
