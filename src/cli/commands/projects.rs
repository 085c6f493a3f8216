//! Project command handlers.

use anyhow::{Context as _, Result};

use crate::cli::context::Context;

/// Lists the account's projects, archived ones last.
pub async fn list_projects(ctx: &Context, short: bool) -> Result<()> {
    let account_id = ctx.account_id()?;
    let client = ctx.client()?;

    let mut projects = {
        let _spinner = ctx.output.spinner("Fetching projects...");
        client
            .list_projects(&account_id)
            .await
            .with_context(|| format!("Failed to list projects of account {account_id}"))?
    };
    projects.sort_by(|a, b| {
        a.archived
            .cmp(&b.archived)
            .then_with(|| a.project_name.cmp(&b.project_name))
    });

    let style = ctx.output.style();
    for project in &projects {
        if short {
            println!("{}", project.project_id);
            continue;
        }
        println!(
            "{}  {}  {}{}",
            style.value(&project.project_id),
            project.project_name,
            style.secondary(&project.source_locale_id),
            if project.archived {
                style.warning(" (archived)")
            } else {
                String::new()
            }
        );
    }

    Ok(())
}

/// Shows the configured project's details.
pub async fn show_project(ctx: &Context) -> Result<()> {
    let project_id = ctx.project_id()?;
    let details = ctx
        .client()?
        .project_details(&project_id)
        .await
        .with_context(|| format!("Failed to fetch project {project_id}"))?;

    let style = ctx.output.style();
    println!("{}", style.header(&details.project_name));
    println!("  {}      {}", style.label("id"), style.value(&details.project_id));
    println!(
        "  {}  {} {}",
        style.label("source"),
        style.value(&details.source_locale_id),
        style.secondary(&details.source_locale_description)
    );
    println!(
        "  {} {}",
        style.label("targets"),
        details
            .target_locales
            .iter()
            .filter(|locale| locale.enabled)
            .map(|locale| locale.locale_id.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );

    Ok(())
}

/// Lists target locales, or the source locale with `source`.
pub async fn list_locales(ctx: &Context, short: bool, source: bool) -> Result<()> {
    let project_id = ctx.project_id()?;
    let details = ctx
        .client()?
        .project_details(&project_id)
        .await
        .with_context(|| format!("Failed to fetch project {project_id}"))?;

    let style = ctx.output.style();
    if source {
        if short {
            println!("{}", details.source_locale_id);
        } else {
            println!(
                "{}  {}",
                style.value(&details.source_locale_id),
                details.source_locale_description
            );
        }
        return Ok(());
    }

    for locale in details.target_locales.iter().filter(|locale| locale.enabled) {
        if short {
            println!("{}", locale.locale_id);
        } else {
            println!("{}  {}", style.value(&locale.locale_id), locale.description);
        }
    }

    Ok(())
}
