use anyhow::Result;
use clap::{CommandFactory, FromArgMatches};

use locsync_cli::cli::commands::files::{self, PullOptions, PushOptions};
use locsync_cli::cli::commands::{init, projects};
use locsync_cli::cli::{Args, Command, Context, FilesCommand, FlagSources, ProjectsCommand};
use locsync_cli::config::ConfigResolver;
use locsync_cli::logging;
use locsync_cli::output::Output;

#[tokio::main]
async fn main() {
    let matches = Args::command().get_matches();
    let args = Args::from_arg_matches(&matches).unwrap_or_else(|err| err.exit());
    let sources = FlagSources::from_matches(&matches);

    logging::init(args.global.verbose, args.global.no_color);
    let output = Output::new(args.global.quiet, args.global.no_color);

    let code = match run(args, sources, output).await {
        Ok(()) => exitcode::OK,
        Err(err) => locsync_cli::cli::report_error(&err, output),
    };
    std::process::exit(code);
}

async fn run(args: Args, sources: FlagSources, output: Output) -> Result<()> {
    let load = |global| Context::load(global, sources, ConfigResolver::from_env(), output);

    match args.command {
        Command::Init => init::run_init(output),
        Command::Projects { command } => run_projects(&load(args.global)?, command).await,
        Command::Files { command } => run_files(&load(args.global)?, command).await,
    }
}

async fn run_projects(ctx: &Context, command: ProjectsCommand) -> Result<()> {
    match command {
        ProjectsCommand::List { short } => projects::list_projects(ctx, short).await,
        ProjectsCommand::Info => projects::show_project(ctx).await,
        ProjectsCommand::Locales { short, source } => {
            projects::list_locales(ctx, short, source).await
        }
    }
}

async fn run_files(ctx: &Context, command: FilesCommand) -> Result<()> {
    match command {
        FilesCommand::List { pattern, short } => {
            files::list_files(ctx, pattern.as_deref(), short).await
        }
        FilesCommand::Status { pattern } => files::show_status(ctx, pattern.as_deref()).await,
        FilesCommand::Push {
            pattern,
            uri,
            file_type,
            directives,
            authorize,
            locales,
            branch,
        } => {
            let options = PushOptions {
                pattern,
                uri,
                file_type,
                directives,
                authorize,
                locales,
                branch,
            };
            files::push_files(ctx, options).await
        }
        FilesCommand::Pull {
            pattern,
            locales,
            directory,
            progress,
            retrieval_type,
            source,
            format,
        } => {
            let options = PullOptions {
                pattern,
                locales,
                directory,
                progress,
                retrieval_type,
                source,
                format,
            };
            files::pull_files(ctx, options).await
        }
        FilesCommand::Rename { old, new } => files::rename_file(ctx, &old, &new).await,
        FilesCommand::Delete { pattern } => files::delete_files(ctx, &pattern).await,
    }
}
