use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

/// Everything a publish run needs, resolved once at startup.
#[derive(Debug, Clone)]
pub struct PublishConfig {
    pub cloud: String,
    pub user: String,
    pub token: String,
    pub parent_page_id: String,
    pub space_id: String,
    pub input: InputConfig,
    pub timeout: Duration,
    pub markdown_extensions: bool,
    pub dry_run: bool,
    pub strict_lookup: bool,
}

impl PublishConfig {
    /// Root of the Confluence wiki for this tenant, e.g. `https://acme.atlassian.net/wiki`.
    pub fn base_url(&self) -> String {
        format!("https://{}.atlassian.net/wiki", self.cloud)
    }
}

/// Where to find the files to publish. Needs no credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputConfig {
    pub workspace: PathBuf,
    pub selection: InputSelection,
    pub exclude_files: Vec<String>,
}

/// Paths are relative to the workspace root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSelection {
    SingleFile(PathBuf),
    Directory(PathBuf),
}

#[derive(Debug, Clone)]
pub struct SourceDocument {
    pub path: PathBuf,
    pub title: String,
    pub markdown: String,
}

/// A page as reported by a title lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemotePage {
    pub id: String,
    pub version: u32,
    pub content: String,
}

/// A page returned by a successful create or update call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedPage {
    pub id: String,
    pub link: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PublishOutcome {
    Created { link: String },
    Updated { link: String, version: u32 },
    Unchanged,
    Failed { status: u16 },
    LookupFailed { status: u16 },
    WouldCreate,
    WouldUpdate { version: u32 },
}

impl PublishOutcome {
    pub fn link(&self) -> Option<&str> {
        match self {
            PublishOutcome::Created { link } | PublishOutcome::Updated { link, .. } => Some(link),
            _ => None,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            PublishOutcome::Failed { .. } | PublishOutcome::LookupFailed { .. }
        )
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportEntry {
    pub title: String,
    pub path: PathBuf,
    #[serde(flatten)]
    pub outcome: PublishOutcome,
}

#[derive(Debug, Clone, Serialize)]
pub struct PublishReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub dry_run: bool,
    pub entries: Vec<ReportEntry>,
}

impl PublishReport {
    pub fn new(dry_run: bool) -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            dry_run,
            entries: Vec::new(),
        }
    }

    pub fn record(&mut self, document: &SourceDocument, outcome: PublishOutcome) {
        self.entries.push(ReportEntry {
            title: document.title.clone(),
            path: document.path.clone(),
            outcome,
        });
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// `title: link` lines for every page that was created or updated, in processing order.
    pub fn links(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter_map(|entry| {
                entry
                    .outcome
                    .link()
                    .map(|link| format!("{}: {}", entry.title, link))
            })
            .collect()
    }

    pub fn failure_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.outcome.is_failure())
            .count()
    }
}
