//! Error types for API calls and the migration lifecycle.

use reqwest::StatusCode;
use thiserror::Error;

use crate::{migration::Phase, types::AccountRole};

/// Failure of a single call against the music API.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Request could not be sent or the connection broke
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("server returned {status}: {message}")]
    Status { status: StatusCode, message: String },

    /// Payload could not be decoded
    #[error("failed to parse response: {0}")]
    Parse(String),
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Parse(e.to_string())
    }
}

/// Errors raised while connecting accounts or copying playlists.
#[derive(Error, Debug)]
pub enum MigrateError {
    /// A credential failed profile validation
    #[error("Invalid {account} token or API error: {source}")]
    Auth {
        account: AccountRole,
        #[source]
        source: ApiError,
    },

    /// A paginated fetch (playlists or tracks) returned non-success
    #[error("Could not fetch {what}: {source}")]
    CollectionFetch {
        what: String,
        #[source]
        source: ApiError,
    },

    /// Playlist creation or a batch track-add returned non-success
    #[error("Could not {what}: {source}")]
    Write {
        what: String,
        #[source]
        source: ApiError,
    },

    /// Lifecycle action not allowed in the current phase
    #[error("cannot {action} while {from}")]
    InvalidTransition { from: Phase, action: &'static str },

    /// Transfer requested with nothing selected
    #[error("no playlists selected")]
    EmptySelection,
}

/// Result type for migration operations.
pub type Result<T> = std::result::Result<T, MigrateError>;
