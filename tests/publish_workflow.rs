use async_trait::async_trait;
use markdown_confluence_sync::services::confluence::{NewPage, PageUpdate};
use markdown_confluence_sync::{
    publish, ApiResponse, InputConfig, InputSelection, PageApi, PublishConfig, PublishOutcome,
    PublishedPage, RemotePage, Result,
};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;
use tempfile::TempDir;

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Lookup(String),
    Create { title: String, html: String },
    Update { id: String, version: u32, html: String },
}

/// In-memory Confluence that records every call it receives.
struct RecordingApi {
    pages: HashMap<String, RemotePage>,
    rejected_updates: Vec<String>,
    calls: Mutex<Vec<Call>>,
}

impl RecordingApi {
    fn new() -> Self {
        Self {
            pages: HashMap::new(),
            rejected_updates: Vec::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn with_page(mut self, title: &str, id: &str, version: u32, content: &str) -> Self {
        self.pages.insert(
            title.to_string(),
            RemotePage {
                id: id.to_string(),
                version,
                content: content.to_string(),
            },
        );
        self
    }

    fn rejecting_update_of(mut self, id: &str) -> Self {
        self.rejected_updates.push(id.to_string());
        self
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageApi for RecordingApi {
    async fn find_page_by_title(&self, title: &str) -> Result<ApiResponse<Option<RemotePage>>> {
        self.calls.lock().unwrap().push(Call::Lookup(title.to_string()));
        Ok(ApiResponse::Success(self.pages.get(title).cloned()))
    }

    async fn create_page(&self, page: &NewPage) -> Result<ApiResponse<PublishedPage>> {
        self.calls.lock().unwrap().push(Call::Create {
            title: page.title.clone(),
            html: page.body.value.clone(),
        });
        Ok(ApiResponse::Success(PublishedPage {
            id: "new".to_string(),
            link: format!("https://acme.atlassian.net/wiki/pages/{}", page.title),
        }))
    }

    async fn update_page(&self, page: &PageUpdate) -> Result<ApiResponse<PublishedPage>> {
        self.calls.lock().unwrap().push(Call::Update {
            id: page.id.clone(),
            version: page.version.number,
            html: page.body.value.clone(),
        });

        if self.rejected_updates.contains(&page.id) {
            return Ok(ApiResponse::ApplicationError {
                status: 403,
                body: "{\"message\":\"forbidden\"}".to_string(),
            });
        }

        Ok(ApiResponse::Success(PublishedPage {
            id: page.id.clone(),
            link: format!("https://acme.atlassian.net/wiki/pages/{}", page.title),
        }))
    }
}

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn config(workspace: &Path, exclude: &[&str]) -> PublishConfig {
    PublishConfig {
        cloud: "acme".to_string(),
        user: "bot@acme.test".to_string(),
        token: "secret".to_string(),
        parent_page_id: "1001".to_string(),
        space_id: "42".to_string(),
        input: InputConfig {
            workspace: workspace.to_path_buf(),
            selection: InputSelection::Directory(PathBuf::from("docs")),
            exclude_files: exclude.iter().map(|s| s.to_string()).collect(),
        },
        timeout: Duration::from_secs(10),
        markdown_extensions: false,
        dry_run: false,
        strict_lookup: false,
    }
}

#[tokio::test]
async fn test_directory_publish_scenario() {
    let workspace = TempDir::new().unwrap();
    let root = workspace.path();
    write(root, "docs/a.md", "# A\n");
    write(root, "docs/b.md", "# B\n");
    write(root, "docs/c.md", "# C\n\nChanged.\n");
    write(root, "docs/excluded.md", "# Excluded\n");
    write(root, "docs/notes.txt", "not markdown");

    let api = RecordingApi::new()
        .with_page("b", "200", 5, "<h1>B</h1>\n")
        .with_page("c", "300", 2, "<h1>C</h1>\n");

    let report = publish(&config(root, &["excluded.md"]), &api).await.unwrap();

    assert_eq!(
        api.calls(),
        vec![
            Call::Lookup("a".to_string()),
            Call::Create {
                title: "a".to_string(),
                html: "<h1>A</h1>\n".to_string(),
            },
            Call::Lookup("b".to_string()),
            Call::Lookup("c".to_string()),
            Call::Update {
                id: "300".to_string(),
                version: 3,
                html: "<h1>C</h1>\n<p>Changed.</p>\n".to_string(),
            },
        ]
    );

    let outcomes: Vec<_> = report
        .entries
        .iter()
        .map(|e| (e.title.as_str(), e.outcome.clone()))
        .collect();
    assert_eq!(outcomes.len(), 3);
    assert_eq!(outcomes[1], ("b", PublishOutcome::Unchanged));

    assert_eq!(
        report.links(),
        vec![
            "a: https://acme.atlassian.net/wiki/pages/a",
            "c: https://acme.atlassian.net/wiki/pages/c",
        ]
    );
}

#[tokio::test]
async fn test_rejected_update_continues_with_next_document() {
    let workspace = TempDir::new().unwrap();
    let root = workspace.path();
    write(root, "docs/locked.md", "# Locked\n");
    write(root, "docs/open.md", "# Open\n");

    let api = RecordingApi::new()
        .with_page("locked", "400", 1, "")
        .rejecting_update_of("400");

    let report = publish(&config(root, &[]), &api).await.unwrap();

    assert_eq!(report.entries.len(), 2);
    assert_eq!(
        report.entries[0].outcome,
        PublishOutcome::Failed { status: 403 }
    );
    assert_eq!(report.failure_count(), 1);
    assert_eq!(
        report.links(),
        vec!["open: https://acme.atlassian.net/wiki/pages/open"]
    );
}

#[tokio::test]
async fn test_missing_input_directory_makes_no_calls() {
    let workspace = TempDir::new().unwrap();
    let api = RecordingApi::new();

    let result = publish(&config(workspace.path(), &[]), &api).await;

    assert!(result.is_err());
    assert!(api.calls().is_empty());
}
