//! Builds [`PublishConfig`] from raw settings gathered from flags and the environment.
//!
//! Required settings are validated together so that a misconfigured run reports
//! every missing value at once, before any network call is attempted.

use crate::error::ConfigError;
use crate::types::{InputConfig, InputSelection, PublishConfig};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const CLOUD: &str = "cloud";
pub const USER: &str = "user";
pub const TOKEN: &str = "token";
pub const PARENT_PAGE_ID: &str = "parent_page_id";
pub const SPACE_ID: &str = "space_id";
pub const INPUT_FILE: &str = "input_file";
pub const INPUT_MD_DIRECTORY: &str = "input_md_directory";
pub const EXCLUDE_FILES: &str = "exclude_files";
pub const WORKSPACE: &str = "GITHUB_WORKSPACE";
pub const REQUEST_TIMEOUT: &str = "request_timeout";

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Unvalidated settings, as read from the command line or the process environment.
#[derive(Debug, Clone, Default)]
pub struct RawSettings {
    pub cloud: Option<String>,
    pub user: Option<String>,
    pub token: Option<String>,
    pub parent_page_id: Option<String>,
    pub space_id: Option<String>,
    pub input_file: Option<String>,
    pub input_md_directory: Option<String>,
    pub exclude_files: Option<String>,
    pub workspace: Option<PathBuf>,
    pub timeout_secs: Option<u64>,
    pub markdown_extensions: bool,
}

impl RawSettings {
    /// Reads every setting from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let var = |name: &str| env::var(name).ok();

        let timeout_secs = match var(REQUEST_TIMEOUT) {
            Some(value) => Some(value.trim().parse().map_err(|_| ConfigError::InvalidSetting {
                name: REQUEST_TIMEOUT,
                value,
            })?),
            None => None,
        };

        Ok(Self {
            cloud: var(CLOUD),
            user: var(USER),
            token: var(TOKEN),
            parent_page_id: var(PARENT_PAGE_ID),
            space_id: var(SPACE_ID),
            input_file: var(INPUT_FILE),
            input_md_directory: var(INPUT_MD_DIRECTORY),
            exclude_files: var(EXCLUDE_FILES),
            workspace: var(WORKSPACE).map(PathBuf::from),
            timeout_secs,
            markdown_extensions: false,
        })
    }
}

/// Validates the full configuration needed to publish.
pub fn load(raw: &RawSettings) -> Result<PublishConfig, ConfigError> {
    let required = [
        (CLOUD, &raw.cloud),
        (USER, &raw.user),
        (TOKEN, &raw.token),
        (PARENT_PAGE_ID, &raw.parent_page_id),
        (SPACE_ID, &raw.space_id),
    ];

    let missing: Vec<&'static str> = required
        .iter()
        .filter(|(_, value)| non_empty(value).is_none())
        .map(|(name, _)| *name)
        .collect();

    if !missing.is_empty() {
        return Err(ConfigError::MissingSettings(missing));
    }

    let input = load_input(raw)?;

    let timeout_secs = raw.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);
    if timeout_secs == 0 {
        return Err(ConfigError::InvalidTimeout);
    }

    let value = |v: &Option<String>| non_empty(v).map(String::from).unwrap_or_default();

    Ok(PublishConfig {
        cloud: value(&raw.cloud),
        user: value(&raw.user),
        token: value(&raw.token),
        parent_page_id: value(&raw.parent_page_id),
        space_id: value(&raw.space_id),
        input,
        timeout: Duration::from_secs(timeout_secs),
        markdown_extensions: raw.markdown_extensions,
        dry_run: false,
        strict_lookup: false,
    })
}

/// Validates only the input selection. Used by commands that never talk to Confluence.
pub fn load_input(raw: &RawSettings) -> Result<InputConfig, ConfigError> {
    // A single file wins when both are present.
    let selection = if let Some(file) = non_empty(&raw.input_file) {
        InputSelection::SingleFile(PathBuf::from(file))
    } else if let Some(dir) = non_empty(&raw.input_md_directory) {
        InputSelection::Directory(PathBuf::from(dir))
    } else {
        return Err(ConfigError::NoInput);
    };

    Ok(InputConfig {
        workspace: raw.workspace.clone().unwrap_or_else(|| PathBuf::from(".")),
        selection,
        exclude_files: parse_exclusions(raw.exclude_files.as_deref()),
    })
}

/// Splits a comma-separated list of file names, dropping blanks.
pub fn parse_exclusions(list: Option<&str>) -> Vec<String> {
    list.map(|names| {
        names
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(String::from)
            .collect()
    })
    .unwrap_or_default()
}

/// The value as given, unless it is absent or blank.
fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}
