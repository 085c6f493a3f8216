//! File command handlers.

use anyhow::Result;
use std::path::PathBuf;

use crate::api::RetrievalType;
use crate::cli::context::Context;
use crate::sync::{FileSelector, PullParams, PushParams};

pub async fn list_files(ctx: &Context, pattern: Option<&str>, short: bool) -> Result<()> {
    let sync = ctx.file_sync()?;
    let files = sync.list(pattern.unwrap_or_default()).await?;

    let style = ctx.output.style();
    for file in &files {
        if short {
            println!("{}", file.uri);
            continue;
        }
        let uploaded = file
            .last_uploaded
            .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();
        println!(
            "{}  {:16}  {:14}  {}",
            style.value(&file.uri),
            uploaded,
            file.file_type.as_str(),
            style.secondary(format!("{} strings", file.total_string_count))
        );
    }

    Ok(())
}

pub async fn show_status(ctx: &Context, pattern: Option<&str>) -> Result<()> {
    let sync = ctx.file_sync()?;
    let report = sync.status(pattern.unwrap_or_default()).await?;

    let style = ctx.output.style();
    for (file, status) in &report.entries {
        println!(
            "{} {}",
            style.header(&file.uri),
            style.secondary(format!(
                "({} strings, {} words)",
                status.total_string_count, status.total_word_count
            ))
        );
        for locale in &status.locales {
            println!(
                "  {:10} {:>3}%  {}",
                locale.locale_id,
                status.percent_complete(locale),
                style.secondary(format!(
                    "{}/{} strings",
                    locale.completed_string_count, status.total_string_count
                ))
            );
        }
    }

    for uri in &report.failed {
        ctx.output.error(format!("failed to fetch status of {uri}"));
    }

    Ok(())
}

pub async fn rename_file(ctx: &Context, old: &str, new: &str) -> Result<()> {
    ctx.file_sync()?.rename(old, new).await?;

    let style = ctx.output.style();
    ctx.output.status(format!(
        "{} {} -> {}",
        style.success("renamed"),
        old,
        style.value(new)
    ));
    Ok(())
}

pub async fn delete_files(ctx: &Context, pattern: &str) -> Result<()> {
    let selector = FileSelector::from_arg(Some(pattern))?;
    let deleted = ctx.file_sync()?.delete(&selector).await?;

    ctx.output.status(format!("{deleted} file(s) deleted"));
    Ok(())
}

pub struct PushOptions {
    pub pattern: String,
    pub uri: Option<String>,
    pub file_type: String,
    pub directives: Vec<String>,
    pub authorize: bool,
    pub locales: Vec<String>,
    pub branch: Option<String>,
}

pub async fn push_files(ctx: &Context, options: PushOptions) -> Result<()> {
    let sync = ctx.file_sync()?;
    let params = PushParams {
        pattern: options.pattern,
        uri: options.uri,
        file_type: ctx.sources.string("file_type", &options.file_type, ""),
        directives: options.directives,
        authorize: ctx.sources.bool("authorize", options.authorize),
        locales: options.locales,
        branch: options.branch,
    };

    let summary = sync.push(params).await?;

    ctx.output.status(format!(
        "{} file(s) uploaded, {} overwritten",
        summary.uploaded, summary.overwritten
    ));
    Ok(())
}

pub struct PullOptions {
    pub pattern: Option<String>,
    pub locales: Vec<String>,
    pub directory: PathBuf,
    pub progress: u64,
    pub retrieval_type: RetrievalType,
    pub source: bool,
    pub format: String,
}

pub async fn pull_files(ctx: &Context, options: PullOptions) -> Result<()> {
    let sync = ctx.file_sync()?;
    let params = PullParams {
        selector: FileSelector::from_arg(options.pattern.as_deref())?,
        locales: options.locales,
        directory: options.directory,
        progress_threshold: options.progress,
        retrieval: options.retrieval_type,
        source: options.source,
        format: ctx.sources.string("format", &options.format, ""),
    };

    let summary = sync.pull(params).await?;

    let style = ctx.output.style();
    let failed = if summary.failed > 0 {
        style.error(format!("{} failed", summary.failed))
    } else {
        "0 failed".to_string()
    };
    ctx.output.status(format!(
        "{} downloaded, {} skipped, {failed}",
        summary.downloaded, summary.skipped
    ));
    Ok(())
}
