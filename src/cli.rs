use clap::{Args, Parser, Subcommand};
use markdown_confluence_sync::config::{self, RawSettings};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "md-confluence-sync")]
#[command(about = "Publish markdown files as child pages of a Confluence page")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub settings: SettingsArgs,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render, compare and publish every selected file (default)
    Publish(PublishArgs),

    /// List the files that would be published, without contacting Confluence
    List,

    /// Render a single markdown file to storage-format HTML
    Render(RenderArgs),
}

/// Connection and input settings. Every flag falls back to its environment variable.
#[derive(Args, Debug, Default)]
pub struct SettingsArgs {
    /// Atlassian cloud tenant (the `<cloud>` in `<cloud>.atlassian.net`)
    #[arg(long, env = config::CLOUD, global = true)]
    pub cloud: Option<String>,

    /// Account used for basic authentication
    #[arg(long, env = config::USER, global = true)]
    pub user: Option<String>,

    /// API token used for basic authentication
    #[arg(long, env = config::TOKEN, global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// Page that new pages are created under
    #[arg(long, env = config::PARENT_PAGE_ID, global = true)]
    pub parent_page_id: Option<String>,

    /// Space that new pages are created in
    #[arg(long, env = config::SPACE_ID, global = true)]
    pub space_id: Option<String>,

    /// Single markdown file to publish, relative to the workspace
    #[arg(long, env = config::INPUT_FILE, global = true, value_name = "PATH")]
    pub input_file: Option<String>,

    /// Directory scanned recursively for markdown files, relative to the workspace
    #[arg(long, env = config::INPUT_MD_DIRECTORY, global = true, value_name = "DIR")]
    pub input_md_directory: Option<String>,

    /// Comma-separated file names to skip in directory mode
    #[arg(long, env = config::EXCLUDE_FILES, global = true, value_name = "NAMES")]
    pub exclude_files: Option<String>,

    /// Base directory for relative input paths (defaults to the current directory)
    #[arg(long, env = config::WORKSPACE, global = true, value_name = "DIR")]
    pub workspace: Option<PathBuf>,

    /// Per-request timeout in seconds [default: 10]
    #[arg(long, env = config::REQUEST_TIMEOUT, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Enable tables, strikethrough, task lists and footnotes
    #[arg(long, global = true)]
    pub markdown_extensions: bool,
}

impl SettingsArgs {
    pub fn to_raw(&self) -> RawSettings {
        RawSettings {
            cloud: self.cloud.clone(),
            user: self.user.clone(),
            token: self.token.clone(),
            parent_page_id: self.parent_page_id.clone(),
            space_id: self.space_id.clone(),
            input_file: self.input_file.clone(),
            input_md_directory: self.input_md_directory.clone(),
            exclude_files: self.exclude_files.clone(),
            workspace: self.workspace.clone(),
            timeout_secs: self.timeout,
            markdown_extensions: self.markdown_extensions,
        }
    }
}

#[derive(Args, Debug, Default)]
pub struct PublishArgs {
    /// Look up pages and report what would change, without writing
    #[arg(long)]
    pub dry_run: bool,

    /// Skip a document when its title lookup fails instead of creating it
    #[arg(long)]
    pub strict_lookup: bool,

    /// Write a JSON report of the run to this file
    #[arg(long, value_name = "FILE")]
    pub json_output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Markdown file to render
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Write the rendered HTML to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}
