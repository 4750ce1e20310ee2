//! Error types shared by the transport, resolver, and provisioner.

use thiserror::Error;

/// Errors raised while talking to the Vultr API.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum VultrError {
    /// Raised when the request never produced an HTTP response (DNS,
    /// connection refused, client timeout).
    #[error("transport failure: {message}")]
    Transport {
        /// Message reported by the HTTP client.
        message: String,
    },
    /// Raised when the API answers with a status outside the accepted set.
    #[error("vultr api returned status {status}: {body}")]
    Remote {
        /// HTTP status code returned by the API.
        status: u16,
        /// Raw response body, unmodified.
        body: String,
    },
    /// Raised when an accepted response does not match the expected record
    /// shape.
    #[error("failed to decode response: {message}")]
    Decode {
        /// Message returned by the JSON decoder.
        message: String,
    },
    /// Raised when a request is missing a required field.
    #[error("invalid instance request: {0}")]
    Validation(String),
    /// Raised when an instance does not converge within the poll bounds.
    #[error("timeout waiting for instance {instance_id} to become ready after {attempts} polls")]
    Timeout {
        /// Provider instance identifier.
        instance_id: String,
        /// Number of status polls performed before giving up.
        attempts: u32,
    },
    /// Raised when the caller cancels the readiness wait.
    #[error("wait for instance {instance_id} was cancelled")]
    Cancelled {
        /// Provider instance identifier.
        instance_id: String,
    },
}

impl VultrError {
    pub(crate) fn transport(err: impl std::fmt::Display) -> Self {
        Self::Transport {
            message: err.to_string(),
        }
    }

    pub(crate) fn decode(err: impl std::fmt::Display) -> Self {
        Self::Decode {
            message: err.to_string(),
        }
    }
}
