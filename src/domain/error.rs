//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::NodeId;

/// Message attached to every fault produced by search translation.
pub const SEARCH_FAILED: &str = "search failed";

/// Fault taxonomy of the node tree.
///
/// `Argument`, `InvalidState` and `ServiceFailure` are the three kinds the
/// search translation knows about. `UnknownNode` is outside that taxonomy
/// and always passes through untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NodeError {
    /// Caller supplied an invalid input or called in the wrong state.
    #[error("illegal argument: {0}")]
    Argument(String),

    /// A node's own structural invariant is broken.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Externally visible search failure, wrapping the invariant fault.
    #[error("service failure: {message}")]
    ServiceFailure {
        message: String,
        #[source]
        cause: Option<Box<NodeError>>,
    },

    /// Id is stale or belongs to another tree.
    #[error("unknown node: {0}")]
    UnknownNode(NodeId),
}

impl NodeError {
    pub fn argument(msg: impl Into<String>) -> Self {
        NodeError::Argument(msg.into())
    }

    pub fn invalid_state(msg: impl Into<String>) -> Self {
        NodeError::InvalidState(msg.into())
    }

    /// Apply the wrap-once rule used while unwinding a search.
    ///
    /// Invariant faults become a service failure carrying them as cause.
    /// Service failures are returned as-is so they are never double-wrapped,
    /// and every other kind passes through unmodified.
    pub fn into_service_failure(self) -> Self {
        match self {
            NodeError::InvalidState(_) => NodeError::ServiceFailure {
                message: SEARCH_FAILED.to_string(),
                cause: Some(Box::new(self)),
            },
            NodeError::ServiceFailure { .. } | NodeError::Argument(_) | NodeError::UnknownNode(_) => {
                self
            }
        }
    }

    /// Nested cause of a service failure.
    pub fn cause(&self) -> Option<&NodeError> {
        match self {
            NodeError::ServiceFailure { cause, .. } => cause.as_deref(),
            _ => None,
        }
    }

    pub fn is_argument(&self) -> bool {
        matches!(self, NodeError::Argument(_))
    }

    pub fn is_invalid_state(&self) -> bool {
        matches!(self, NodeError::InvalidState(_))
    }

    pub fn is_service_failure(&self) -> bool {
        matches!(self, NodeError::ServiceFailure { .. })
    }
}

/// Result type for node tree operations.
pub type NodeResult<T> = Result<T, NodeError>;

/// Errors building a tree from a layout description.
#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("duplicate label: {0}")]
    DuplicateLabel(String),

    #[error("link {link} targets unknown label: {label}")]
    UnknownTarget { link: String, label: String },

    #[error("invalid layout entry {name}: {reason}")]
    InvalidEntry { name: String, reason: String },

    #[error("{0}")]
    Node(#[from] NodeError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn given_invalid_state_when_translated_then_wraps_once() {
        let raw = NodeError::invalid_state("link has no target node");
        let wrapped = raw.clone().into_service_failure();

        assert!(wrapped.is_service_failure());
        assert_eq!(wrapped.cause(), Some(&raw));
        assert_eq!(wrapped.to_string(), "service failure: search failed");

        // a second pass leaves it alone
        let again = wrapped.clone().into_service_failure();
        assert_eq!(again, wrapped);
    }

    #[test]
    fn given_other_kinds_when_translated_then_unchanged() {
        let arg = NodeError::argument("requested byte count must be > 0");
        assert_eq!(arg.clone().into_service_failure(), arg);
    }

    #[test]
    fn given_service_failure_then_source_chain_reaches_cause() {
        let wrapped = NodeError::invalid_state("file base name must not be empty").into_service_failure();
        let source = wrapped.source().map(|e| e.to_string());
        assert_eq!(
            source.as_deref(),
            Some("invalid state: file base name must not be empty")
        );
    }
}
