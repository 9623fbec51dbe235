//! # Error Hierarchy
//!
//! Structured error types shared by every hrsync crate, built with `thiserror`.
//!
//! [`DirectoryError`] is the single error type crossing the directory
//! capability traits. Client crates convert their transport-specific errors
//! into it so the engine can classify failures without knowing which wire
//! protocol produced them.

use thiserror::Error;

/// Errors raised by a directory (HR or chat side) while serving one call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    /// The request never produced an HTTP response (connect failure, timeout).
    #[error("transport error calling {endpoint}: {reason}")]
    Transport {
        /// Method and path of the failed call.
        endpoint: String,
        /// Underlying transport failure.
        reason: String,
    },

    /// The remote answered with a non-2xx status. The body is kept verbatim.
    #[error("{endpoint} returned {status}: {body}")]
    Remote {
        /// Method and path of the failed call.
        endpoint: String,
        /// HTTP status code.
        status: u16,
        /// Response body, surfaced verbatim.
        body: String,
    },

    /// The remote answered 2xx but the payload could not be decoded.
    #[error("failed to decode response from {endpoint}: {reason}")]
    Decode {
        /// Method and path of the call.
        endpoint: String,
        /// Decoder message.
        reason: String,
    },

    /// Account creation was refused because the username is already taken.
    #[error("username `{username}` is already taken: {detail}")]
    UsernameTaken {
        /// The username that collided.
        username: String,
        /// Remote explanation.
        detail: String,
    },

    /// The directory implementation does not offer this operation.
    #[error("operation not supported: {operation}")]
    Unsupported {
        /// Name of the missing operation.
        operation: String,
    },
}

impl DirectoryError {
    /// True when the error is a username collision on account creation.
    pub fn is_username_conflict(&self) -> bool {
        matches!(self, Self::UsernameTaken { .. })
    }

    /// True when the remote reported that the requested object does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Remote { status: 404, .. })
    }

    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Validation errors for identifiers and run parameters.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// An identifier was empty or whitespace.
    #[error("{kind} must be non-empty")]
    EmptyIdentifier {
        /// Which identifier kind was rejected.
        kind: &'static str,
    },

    /// A sync direction string did not name a known direction.
    #[error("unknown sync direction \"{0}\" (expected hr-to-chat or chat-to-hr)")]
    UnknownDirection(String),
}
