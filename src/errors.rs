//! Typed error hierarchy for the PlanCraft client.
//!
//! Three enums cover the library's fallible edges:
//! - `ApiError`: remote API transport and status failures
//! - `SessionError`: identity lifecycle and session file failures
//! - `AssignError`: task assignment requests that cannot be satisfied

use thiserror::Error;

/// Errors from talking to the remote PlanCraft API.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid API base URL '{0}': expected http:// or https://")]
    InvalidBaseUrl(String),

    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Request to {endpoint} failed: {source}")]
    Request {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{endpoint} returned {status}: {message}")]
    Status {
        endpoint: String,
        status: u16,
        message: String,
    },

    #[error("Failed to decode response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
}

impl ApiError {
    /// HTTP status of the failure, when the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Errors from the sign-in session lifecycle.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Not logged in. Run `plancraft login --email <email>` first")]
    NotLoggedIn,

    #[error("Invalid email address '{0}'")]
    InvalidEmail(String),

    #[error("Failed to access session file at {path}: {source}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Session file at {path} is corrupt: {source}")]
    Corrupt {
        path: std::path::PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors from resolving who a new task goes to.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AssignError {
    #[error("Team has no members to auto-assign from")]
    EmptyTeam,

    #[error("'{name}' is not a member of this project's team")]
    UnknownMember { name: String },
}
