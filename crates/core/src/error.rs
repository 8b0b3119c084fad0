use std::path::PathBuf;

/// Errors surfaced by the generation pipeline.
///
/// Merge, rename and conflict resolution never fail; only the I/O boundary,
/// the path guard and the network layer produce these.
#[derive(Debug, thiserror::Error)]
pub enum GenError {
    #[error("Refusing to write to unsafe path {}", .0.display())]
    UnsafePath(PathBuf),
    #[error("{context}: {source}")]
    Io {
        context: String,
        source: std::io::Error,
    },
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("HTTP {0}")]
    Http(reqwest::StatusCode),
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Request timed out after {0}ms")]
    Timeout(u64),
    #[error("Request cancelled by user")]
    Cancelled,
    #[error("Invalid URL {0}")]
    InvalidUrl(String),
    #[error("Invalid OpenAPI source '{0}': must be a URL or an existing file path")]
    InvalidSource(String),
}

impl GenError {
    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Whether another attempt could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Request(_) | Self::Json(_))
    }
}

pub type Result<T, E = GenError> = std::result::Result<T, E>;
