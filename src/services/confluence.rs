//! Confluence Cloud REST API (v2) client.
//!
//! Every call returns one of three things: a decoded payload, an application
//! error carrying the HTTP status, or a transport error (`Err`). Callers decide
//! which of those are fatal.

use crate::error::Result;
use crate::types::{PublishConfig, PublishedPage, RemotePage};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

#[cfg(test)]
use mockall::automock;

pub const STORAGE_REPRESENTATION: &str = "storage";
const CURRENT_STATUS: &str = "current";

/// Result of a call that reached the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiResponse<T> {
    Success(T),
    ApplicationError { status: u16, body: String },
}

/// The three page operations the publisher needs.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait PageApi: Send + Sync {
    /// Looks up a page by exact title. `Success(None)` means no page has that title.
    async fn find_page_by_title(&self, title: &str) -> Result<ApiResponse<Option<RemotePage>>>;

    async fn create_page(&self, page: &NewPage) -> Result<ApiResponse<PublishedPage>>;

    async fn update_page(&self, page: &PageUpdate) -> Result<ApiResponse<PublishedPage>>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageBody {
    pub value: String,
    pub representation: String,
}

impl StorageBody {
    pub fn storage(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            representation: STORAGE_REPRESENTATION.to_string(),
        }
    }
}

/// Body of `POST /api/v2/pages`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPage {
    pub space_id: String,
    pub status: String,
    pub title: String,
    pub parent_id: String,
    pub body: StorageBody,
}

impl NewPage {
    pub fn new(space_id: &str, parent_id: &str, title: &str, html: &str) -> Self {
        Self {
            space_id: space_id.to_string(),
            status: CURRENT_STATUS.to_string(),
            title: title.to_string(),
            parent_id: parent_id.to_string(),
            body: StorageBody::storage(html),
        }
    }
}

/// Body of `PUT /api/v2/pages/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageUpdate {
    pub id: String,
    pub status: String,
    pub version: VersionNumber,
    pub title: String,
    pub body: StorageBody,
}

impl PageUpdate {
    pub fn new(id: &str, version: u32, title: &str, html: &str) -> Self {
        Self {
            id: id.to_string(),
            status: CURRENT_STATUS.to_string(),
            version: VersionNumber { number: version },
            title: title.to_string(),
            body: StorageBody::storage(html),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionNumber {
    pub number: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PageList {
    #[serde(default)]
    pub results: Vec<PageRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PageRecord {
    pub id: String,
    #[serde(default)]
    pub version: Option<VersionNumber>,
    #[serde(default)]
    pub body: Option<PageBody>,
    #[serde(rename = "_links", default)]
    pub links: Option<PageLinks>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PageBody {
    #[serde(default)]
    pub storage: Option<StorageBody>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PageLinks {
    #[serde(default)]
    pub webui: Option<String>,
}

impl PageRecord {
    fn into_remote_page(self) -> RemotePage {
        let version = match self.version {
            Some(version) => version.number,
            None => {
                warn!("Page {} has no version number, assuming version 1", self.id);
                1
            }
        };

        RemotePage {
            id: self.id,
            version,
            content: self
                .body
                .and_then(|b| b.storage)
                .map(|s| s.value)
                .unwrap_or_default(),
        }
    }

    /// Absolute web UI link for this page.
    fn web_link(&self, base_url: &str) -> String {
        match self.links.as_ref().and_then(|l| l.webui.as_deref()) {
            Some(webui) => format!("{}{}", base_url, webui),
            None => format!("{}/pages/viewpage.action?pageId={}", base_url, self.id),
        }
    }
}

pub struct ConfluenceClient {
    client: Client,
    base_url: String,
    user: String,
    token: String,
    space_id: String,
}

impl ConfluenceClient {
    pub fn new(
        base_url: &str,
        user: &str,
        token: &str,
        space_id: &str,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            user: user.to_string(),
            token: token.to_string(),
            space_id: space_id.to_string(),
        })
    }

    pub fn from_config(config: &PublishConfig) -> Result<Self> {
        Self::new(
            &config.base_url(),
            &config.user,
            &config.token,
            &config.space_id,
            config.timeout,
        )
    }

    fn pages_url(&self) -> Result<Url> {
        Ok(Url::parse(&format!("{}/api/v2/pages", self.base_url))?)
    }

    fn page_url(&self, id: &str) -> Result<Url> {
        let mut url = self.pages_url()?;
        url.path_segments_mut()
            .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .push(id);
        Ok(url)
    }

    fn lookup_url(&self, title: &str) -> Result<Url> {
        let mut url = self.pages_url()?;
        url.query_pairs_mut()
            .append_pair("title", title)
            .append_pair("space-id", &self.space_id)
            .append_pair("body-format", STORAGE_REPRESENTATION);
        Ok(url)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .basic_auth(&self.user, Some(&self.token))
            .header(ACCEPT, "application/json")
    }

    async fn application_error<T>(response: Response) -> Result<ApiResponse<T>> {
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(ApiResponse::ApplicationError { status, body })
    }

    async fn published(&self, response: Response) -> Result<ApiResponse<PublishedPage>> {
        if response.status() != StatusCode::OK {
            return Self::application_error(response).await;
        }

        let record: PageRecord = response.json().await?;
        let link = record.web_link(&self.base_url);
        Ok(ApiResponse::Success(PublishedPage {
            id: record.id,
            link,
        }))
    }
}

#[async_trait]
impl PageApi for ConfluenceClient {
    async fn find_page_by_title(&self, title: &str) -> Result<ApiResponse<Option<RemotePage>>> {
        let url = self.lookup_url(title)?;
        debug!("GET {}", url);

        let response = self.authorized(self.client.get(url)).send().await?;
        if response.status() != StatusCode::OK {
            return Self::application_error(response).await;
        }

        let list: PageList = response.json().await?;
        let page = list
            .results
            .into_iter()
            .next()
            .map(PageRecord::into_remote_page);
        Ok(ApiResponse::Success(page))
    }

    async fn create_page(&self, page: &NewPage) -> Result<ApiResponse<PublishedPage>> {
        let url = self.pages_url()?;
        debug!("POST {} ({})", url, page.title);

        let response = self
            .authorized(self.client.post(url))
            .header(CONTENT_TYPE, "application/json")
            .json(page)
            .send()
            .await?;
        self.published(response).await
    }

    async fn update_page(&self, page: &PageUpdate) -> Result<ApiResponse<PublishedPage>> {
        let url = self.page_url(&page.id)?;
        debug!("PUT {} ({}, version {})", url, page.title, page.version.number);

        let response = self
            .authorized(self.client.put(url))
            .header(CONTENT_TYPE, "application/json")
            .json(page)
            .send()
            .await?;
        self.published(response).await
    }
}
