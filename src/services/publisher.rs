use crate::error::Result;
use crate::services::confluence::{ApiResponse, NewPage, PageApi, PageUpdate};
use crate::services::renderer::MarkdownRenderer;
use crate::types::{PublishConfig, PublishOutcome, PublishReport, RemotePage, SourceDocument};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};

/// Publishes documents one at a time.
///
/// Application errors (non-200 statuses) become [`PublishOutcome::Failed`] and the
/// run continues. Transport errors are returned as `Err` and end the run.
pub struct PagePublisher<'a, A: PageApi> {
    api: &'a A,
    config: &'a PublishConfig,
    renderer: MarkdownRenderer,
}

impl<'a, A: PageApi> PagePublisher<'a, A> {
    pub fn new(api: &'a A, config: &'a PublishConfig) -> Self {
        Self {
            api,
            config,
            renderer: MarkdownRenderer::new(config.markdown_extensions),
        }
    }

    pub async fn publish_all(&self, files: &[PathBuf]) -> Result<PublishReport> {
        let mut report = PublishReport::new(self.config.dry_run);

        for (idx, path) in files.iter().enumerate() {
            debug!("Processing {}/{}: {}", idx + 1, files.len(), path.display());

            let document = Self::read_document(path).await?;
            let outcome = self.publish_document(&document).await?;
            report.record(&document, outcome);
        }

        report.finish();
        info!(
            "Processed {} documents, {} published, {} failed",
            report.entries.len(),
            report.links().len(),
            report.failure_count()
        );

        Ok(report)
    }

    pub async fn read_document(path: &Path) -> Result<SourceDocument> {
        let markdown = fs::read_to_string(path).await?;
        let title = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(SourceDocument {
            path: path.to_path_buf(),
            title,
            markdown,
        })
    }

    pub async fn publish_document(&self, document: &SourceDocument) -> Result<PublishOutcome> {
        let html = self.renderer.render(&document.markdown);
        let title = document.title.as_str();

        let existing = match self.api.find_page_by_title(title).await? {
            ApiResponse::Success(page) => page,
            ApiResponse::ApplicationError { status, body } => {
                if self.config.strict_lookup {
                    warn!("{}: Lookup failed. HTTP status code: {}", title, status);
                    debug!("{}: {}", title, body);
                    return Ok(PublishOutcome::LookupFailed { status });
                }
                // Same as "no such page": the create call will surface a real conflict.
                warn!(
                    "{}: Lookup failed with HTTP status code {}, treating as a new page",
                    title, status
                );
                None
            }
        };

        match existing {
            Some(page) => self.update(title, &html, page).await,
            None => self.create(title, &html).await,
        }
    }

    async fn update(&self, title: &str, html: &str, page: RemotePage) -> Result<PublishOutcome> {
        if page.content == html {
            info!("{}: Identical content, no update required.", title);
            return Ok(PublishOutcome::Unchanged);
        }

        let version = page.version.saturating_add(1);
        if self.config.dry_run {
            info!("{}: Would update to version {}", title, version);
            return Ok(PublishOutcome::WouldUpdate { version });
        }

        let update = PageUpdate::new(&page.id, version, title, html);
        match self.api.update_page(&update).await? {
            ApiResponse::Success(published) => {
                info!(
                    "{}: Content update successful. New version: {}",
                    title, version
                );
                Ok(PublishOutcome::Updated {
                    link: published.link,
                    version,
                })
            }
            ApiResponse::ApplicationError { status, body } => {
                warn!("{}: Failed. HTTP status code: {}", title, status);
                debug!("{}: {}", title, body);
                Ok(PublishOutcome::Failed { status })
            }
        }
    }

    async fn create(&self, title: &str, html: &str) -> Result<PublishOutcome> {
        if self.config.dry_run {
            info!("{}: Would create a new page", title);
            return Ok(PublishOutcome::WouldCreate);
        }

        let page = NewPage::new(
            &self.config.space_id,
            &self.config.parent_page_id,
            title,
            html,
        );
        match self.api.create_page(&page).await? {
            ApiResponse::Success(published) => {
                info!("{}: Content upload successful.", title);
                Ok(PublishOutcome::Created {
                    link: published.link,
                })
            }
            ApiResponse::ApplicationError { status, body } => {
                warn!("{}: Failed. HTTP status code: {}", title, status);
                debug!("{}: {}", title, body);
                Ok(PublishOutcome::Failed { status })
            }
        }
    }
}
