//! Init command handler for creating a project config file.

use anyhow::{Context as _, Result, bail};
use inquire::{Confirm, CustomType, Password, PasswordDisplayMode, Text};
use std::path::Path;

use crate::cli::args::DEFAULT_THREADS;
use crate::config::{ConfigFile, ConfigManager, env_var_name};
use crate::output::Output;
use crate::paths::PROJECT_CONFIG_NAME;
use crate::ui::prompt_flow;

/// Interactively writes `locsync.yml` in the current directory.
///
/// Values already present in an existing file are offered as defaults.
pub fn run_init(output: Output) -> Result<()> {
    if prompt_flow(|| run_init_inner(output))?.is_none() {
        output.warn("init cancelled, nothing written");
    }
    Ok(())
}

fn run_init_inner(output: Output) -> Result<()> {
    let path = std::env::current_dir()
        .context("Failed to determine the current directory")?
        .join(PROJECT_CONFIG_NAME);
    let manager = ConfigManager::at(&path);

    let existing = if path.exists() {
        let overwrite = Confirm::new(&format!("{PROJECT_CONFIG_NAME} exists. Update it?"))
            .with_default(true)
            .prompt()?;
        if !overwrite {
            return Ok(());
        }
        manager.load()?
    } else {
        ConfigFile::default()
    };

    let config = prompt_config(existing)?;
    manager.save(&config)?;

    print_saved(output, &path, config.secret.is_none());
    Ok(())
}

fn prompt_config(existing: ConfigFile) -> Result<ConfigFile> {
    let account_id = prompt_text("Account ID:", existing.account_id.as_deref(), false)?;
    let user_id = prompt_text("User ID:", existing.user_id.as_deref(), true)?;
    let project_id = prompt_text("Project ID:", existing.project_id.as_deref(), true)?;

    let store_secret = Confirm::new("Store the token secret in the config file?")
        .with_default(existing.secret.is_some())
        .with_help_message(&format!(
            "Otherwise set {} in your environment",
            env_var_name("secret")
        ))
        .prompt()?;
    let secret = if store_secret {
        let secret = Password::new("Token secret:")
            .with_display_mode(PasswordDisplayMode::Masked)
            .without_confirmation()
            .prompt()?;
        if secret.trim().is_empty() {
            existing.secret
        } else {
            Some(secret.trim().to_string())
        }
    } else {
        None
    };

    let threads = CustomType::<u32>::new("Concurrent transfers:")
        .with_default(existing.threads.unwrap_or(DEFAULT_THREADS))
        .with_error_message("Enter a positive number")
        .prompt()?;
    if threads == 0 {
        bail!("Concurrent transfers must be at least 1");
    }

    Ok(ConfigFile {
        account_id,
        user_id,
        secret,
        project_id,
        threads: Some(threads),
        ..existing
    })
}

fn prompt_text(message: &str, default: Option<&str>, required: bool) -> Result<Option<String>> {
    let mut prompt = Text::new(message);
    if let Some(default) = default {
        prompt = prompt.with_default(default);
    }
    if !required {
        prompt = prompt.with_help_message("Optional, press Enter to skip");
    }

    let value = prompt.prompt()?;
    let value = value.trim();
    if value.is_empty() {
        if required {
            bail!("{} cannot be empty", message.trim_end_matches(':'));
        }
        return Ok(None);
    }
    Ok(Some(value.to_string()))
}

fn print_saved(output: Output, path: &Path, secret_missing: bool) {
    let style = output.style();
    println!();
    println!(
        "{} Configuration saved to {}",
        style.success("✓"),
        style.secondary(path.display())
    );
    if secret_missing {
        output.status(style.hint(format!(
            "Set {} before running file commands.",
            env_var_name("secret")
        )));
    }
}
