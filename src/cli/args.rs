use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

use crate::api::{DEFAULT_ENDPOINT, RetrievalType};

/// Default number of concurrent transfers.
pub const DEFAULT_THREADS: u32 = 4;

#[derive(Parser, Debug)]
#[command(name = "locsync")]
#[command(about = "Push and pull localization files to a translation management platform")]
#[command(version)]
pub struct Args {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Options accepted by every command.
#[derive(clap::Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Config file (default: nearest locsync.yml, then the user config)
    #[arg(short = 'c', long, global = true)]
    pub config: Option<PathBuf>,

    /// Account identifier
    #[arg(short = 'a', long, global = true, default_value = "")]
    pub account: String,

    /// API user identifier
    #[arg(short = 'u', long, global = true, default_value = "")]
    pub user: String,

    /// API token secret
    #[arg(short = 'k', long, global = true, default_value = "", hide_default_value = true)]
    pub secret: String,

    /// Project identifier
    #[arg(short = 'p', long, global = true, default_value = "")]
    pub project: String,

    /// Number of concurrent transfers
    #[arg(long, global = true, default_value_t = DEFAULT_THREADS)]
    pub threads: u32,

    /// API base URL
    #[arg(long, global = true, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only print results and errors
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a locsync.yml in the current directory
    Init,
    /// Inspect projects
    Projects {
        #[command(subcommand)]
        command: ProjectsCommand,
    },
    /// Upload, download and manage project files
    Files {
        #[command(subcommand)]
        command: FilesCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum ProjectsCommand {
    /// List the account's projects
    List {
        /// Print project ids only
        #[arg(short = 's', long)]
        short: bool,
    },
    /// Show project details
    Info,
    /// List the project's target locales
    Locales {
        /// Print locale ids only
        #[arg(short = 's', long)]
        short: bool,
        /// Show the source locale instead
        #[arg(long)]
        source: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum FilesCommand {
    /// List remote files
    List {
        /// Glob matched against file URIs (default: all files)
        pattern: Option<String>,
        /// Print URIs only
        #[arg(short = 's', long)]
        short: bool,
    },
    /// Show translation progress per locale
    Status {
        /// Glob matched against file URIs (default: all files)
        pattern: Option<String>,
    },
    /// Upload local files
    Push {
        /// Glob matched against local paths
        pattern: String,
        /// Remote URI (only when the pattern matches one file)
        uri: Option<String>,
        /// File type (default: from config or the file extension)
        #[arg(short = 't', long = "type", default_value = "", hide_default_value = true)]
        file_type: String,
        /// Parser directive as key=value (repeatable)
        #[arg(short = 'd', long = "directive")]
        directives: Vec<String>,
        /// Authorize the content for every target locale
        #[arg(long)]
        authorize: bool,
        /// Authorize the content for this locale (repeatable)
        #[arg(short = 'l', long = "locale")]
        locales: Vec<String>,
        /// Prefix remote URIs with this branch name
        #[arg(short = 'b', long)]
        branch: Option<String>,
    },
    /// Download translations or source files
    Pull {
        /// Glob matched against file URIs, or '-' to read URIs from stdin
        pattern: Option<String>,
        /// Download only this locale (repeatable)
        #[arg(short = 'l', long = "locale")]
        locales: Vec<String>,
        /// Directory downloaded paths are relative to
        #[arg(short = 'd', long, default_value = ".")]
        directory: PathBuf,
        /// Skip locales less than this percent complete
        #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u64).range(0..=100))]
        progress: u64,
        /// Translation state to download
        #[arg(short = 'r', long, value_enum, default_value_t = RetrievalType::Pending)]
        retrieval_type: RetrievalType,
        /// Download the original source files
        #[arg(long)]
        source: bool,
        /// Path template, e.g. '{{.Locale}}/{{base .FileURI}}'
        #[arg(long, default_value = "", hide_default_value = true)]
        format: String,
    },
    /// Rename a remote file
    Rename {
        /// Current URI
        old: String,
        /// New URI
        new: String,
    },
    /// Delete remote files
    Delete {
        /// Glob matched against file URIs, or '-' to read URIs from stdin
        pattern: String,
    },
}
