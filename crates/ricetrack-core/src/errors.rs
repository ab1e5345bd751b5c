//! Unified error taxonomy for ricetrack operations
//!
//! `InvalidRequest` and `Unauthorized` are checked locally before any network
//! call whenever a snapshot gives enough information. `NoSuchProposal` and
//! `Conflict` are only authoritative server-side; callers surface them as-is,
//! refresh the snapshot, and let the user re-decide. Nothing is retried and
//! nothing is swallowed.

use serde::{Deserialize, Serialize};

/// Unified error type for all ricetrack operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum TrackError {
    /// Malformed request or missing required fields
    #[error("Invalid request: {message}")]
    InvalidRequest {
        /// What was malformed or missing
        message: String,
    },

    /// Answer or cancel targeting a proposal that does not exist
    #[error("No such proposal: {message}")]
    NoSuchProposal {
        /// Which proposal lookup failed
        message: String,
    },

    /// Action attempted by an identity without the required role
    #[error("Unauthorized: {message}")]
    Unauthorized {
        /// Which role requirement was not met
        message: String,
    },

    /// State changed between snapshot fetch and submission
    #[error("Conflict: {message}")]
    Conflict {
        /// What the submission collided with
        message: String,
    },

    /// Requested entity is not known to the ledger
    #[error("Not found: {message}")]
    NotFound {
        /// What was looked up
        message: String,
    },

    /// Submission channel or network failure, message opaque
    #[error("Channel error: {message}")]
    Channel {
        /// Error payload reported by the channel
        message: String,
    },

    /// Payload encode/decode failure
    #[error("Serialization error: {message}")]
    Serialization {
        /// What failed to serialize or deserialize
        message: String,
    },
}

impl TrackError {
    /// Create an invalid request error
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Create a missing proposal error
    pub fn no_such_proposal(message: impl Into<String>) -> Self {
        Self::NoSuchProposal {
            message: message.into(),
        }
    }

    /// Create an unauthorized error
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    /// Create a conflict error
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create a channel error
    pub fn channel(message: impl Into<String>) -> Self {
        Self::Channel {
            message: message.into(),
        }
    }

    /// Create a serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// Build a channel error from a raw ledger error message.
    ///
    /// The ledger wraps failures as `{"error": "..."}`, often JSON-encoded
    /// inside a generic message. When the inner `error` field can be
    /// extracted it becomes the message; otherwise the raw text is kept.
    pub fn from_channel_message(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        match serde_json::from_str::<ChannelErrorBody>(&raw) {
            Ok(body) => Self::channel(body.error),
            Err(_) => Self::channel(raw),
        }
    }
}

/// Error payload shape produced by the ledger service
#[derive(Deserialize)]
struct ChannelErrorBody {
    error: String,
}

impl From<serde_json::Error> for TrackError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(err.to_string())
    }
}

/// Standard Result type for ricetrack operations
pub type Result<T> = std::result::Result<T, TrackError>;
