//! Application-level errors (wraps domain errors)

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::{LayoutError, NodeError};

/// Application errors wrap domain errors and add application-level context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] NodeError),

    #[error("layout {path}: {source}")]
    Layout {
        path: PathBuf,
        #[source]
        source: LayoutError,
    },

    #[error("layout {path}: {source}")]
    LayoutSyntax {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("no layout file given (use --layout or set `layout` in the config)")]
    NoLayout,

    #[error("config error: {message}")]
    Config { message: String },

    #[error("operation failed: {context}")]
    OperationFailed {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
