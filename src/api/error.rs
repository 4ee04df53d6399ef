//! API error types

use reqwest::StatusCode;
use thiserror::Error;

/// Result alias used across the library
pub type Result<T> = std::result::Result<T, ApiError>;

/// Errors returned by API operations
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ApiError {
    /// Connection, timeout or other transport failure. Never retried.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Token endpoint rejected the stored credentials
    #[error("Authentication failed with status {status}: {body}")]
    Authentication { status: StatusCode, body: String },

    /// Token endpoint answered 2xx without a usable token
    #[error("Authentication response did not contain a token")]
    MissingToken,

    /// A name-filtered search came back empty
    #[error(
        "{kind} named '{name}' not found (it may not exist, or the current user may lack permission to read it)"
    )]
    NotFound { kind: String, name: String },

    /// No candidate's ancestor chain matched the requested path
    #[error(
        "{kind} with path '{path}' not found (it may not exist, or the current user may lack permission to read it)"
    )]
    PathNotFound { kind: String, path: String },

    /// Strict lookup found more than one resource with the same name
    #[error("{kind} named '{name}' is ambiguous: {count} matches returned")]
    Ambiguous {
        kind: String,
        name: String,
        count: usize,
    },

    /// Non-auth 4xx response
    #[error("Client error {status}: {body}")]
    Client { status: StatusCode, body: String },

    /// 5xx response
    #[error("Server error {status}: {body}")]
    Server { status: StatusCode, body: String },

    /// Response body was not the expected JSON shape
    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Malformed slash-delimited resource path
    #[error("Invalid resource path '{0}'")]
    InvalidPath(String),

    /// Path resolution requested on a kind without parent links
    #[error("{0} resources have no parent hierarchy")]
    NotHierarchical(String),

    /// Unknown resource kind name
    #[error("Unknown resource kind: {0}")]
    UnknownKind(String),

    /// URL could not be built from the base endpoint
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl ApiError {
    /// Build the error for a non-success status returned by a resource operation
    pub fn from_status(status: StatusCode, body: String) -> Self {
        if status.is_server_error() {
            ApiError::Server { status, body }
        } else {
            ApiError::Client { status, body }
        }
    }

    /// HTTP status carried by this error, if any
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Authentication { status, .. }
            | ApiError::Client { status, .. }
            | ApiError::Server { status, .. } => Some(*status),
            ApiError::Transport(e) => e.status(),
            _ => None,
        }
    }

    /// True for both name and path lookups that matched nothing
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ApiError::NotFound { .. } | ApiError::PathNotFound { .. }
        )
    }
}
