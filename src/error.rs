use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Input directory error: {reason}")]
    InputDirectory { reason: String },

    #[error("Directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing value for {}", .0.join(", "))]
    MissingSettings(Vec<&'static str>),

    #[error("No specific input provided. Set input_file or input_md_directory")]
    NoInput,

    #[error("Request timeout must be at least one second")]
    InvalidTimeout,

    #[error("Invalid value for {name}: {value:?}")]
    InvalidSetting { name: &'static str, value: String },
}

pub type Result<T> = std::result::Result<T, SyncError>;
