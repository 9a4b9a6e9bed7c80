//! Error types for audit runs.
//!
//! Only precondition and environment failures surface as errors. Content
//! findings are always reported as [`crate::models::Issue`]s instead.

use std::path::PathBuf;
use thiserror::Error;

/// Fatal failures that stop an audit run.
#[derive(Debug, Error)]
pub enum AuditError {
    /// Project root does not exist or is not a directory.
    #[error("project root not found: {}", .0.display())]
    RootNotFound(PathBuf),

    /// The configured app directory is missing under the project root.
    #[error("app directory not found: {} (set app_dir in seo-audit.toml)", .0.display())]
    AppDirNotFound(PathBuf),

    /// Live mode was requested but the server did not answer the probe.
    #[error("server not reachable at {url}; start it first (e.g. `npm run dev`): {source}")]
    ServerUnreachable {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// HTTP client construction failure.
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// Worker pool construction failure.
    #[error("thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// File I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file exists but could not be parsed.
    #[error("invalid config {}: {message}", path.display())]
    Config { path: PathBuf, message: String },

    /// A configured glob or regex pattern is invalid.
    #[error("invalid pattern: {0}")]
    Pattern(String),
}

impl From<glob::PatternError> for AuditError {
    fn from(e: glob::PatternError) -> Self {
        AuditError::Pattern(e.to_string())
    }
}

impl From<regex::Error> for AuditError {
    fn from(e: regex::Error) -> Self {
        AuditError::Pattern(e.to_string())
    }
}

/// Convenience alias for results with [`AuditError`].
pub type Result<T> = std::result::Result<T, AuditError>;
