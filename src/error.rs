use thiserror::Error;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the library
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    /// The matter list could not be fetched; nothing was processed.
    #[error("Legistar returned {status} for the matter list: {body}")]
    ListFetch { status: u16, body: String },

    /// The destination rejected a row. Rows written before this one stay written.
    #[error("Notion API error {status} for matter {matter_id}: {body}")]
    Export {
        matter_id: i64,
        status: u16,
        body: String,
    },
}
