//! # Markdown Confluence Sync
//!
//! Publishes local markdown files as child pages of a Confluence Cloud page.
//! Local files are the source of truth: each file is rendered to storage-format
//! HTML, compared against the page of the same title, and created or updated.
//!
//! ## Example Usage
//!
//! ```no_run
//! use markdown_confluence_sync::{config, ConfluenceClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = config::load(&config::RawSettings::from_env()?)?;
//!     let client = ConfluenceClient::from_config(&config)?;
//!
//!     let report = markdown_confluence_sync::publish(&config, &client).await?;
//!     for link in report.links() {
//!         println!("{}", link);
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod services;
pub mod types;

pub use error::{ConfigError, Result, SyncError};
pub use services::{
    ApiResponse, ConfluenceClient, InputEnumerator, MarkdownRenderer, PageApi, PagePublisher,
};
pub use types::{
    InputConfig, InputSelection, PublishConfig, PublishOutcome, PublishReport, PublishedPage,
    RemotePage, ReportEntry, SourceDocument,
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Enumerates the configured inputs and publishes them in order.
///
/// Returns early, without a report, on the first transport error.
pub async fn publish<A: PageApi>(config: &PublishConfig, api: &A) -> Result<PublishReport> {
    let files = InputEnumerator::enumerate(&config.input)?;
    PagePublisher::new(api, config).publish_all(&files).await
}
