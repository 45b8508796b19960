//! Error types and failure classification for avatar resolution.
//!
//! This module provides:
//! - [`ResolutionError`]: The error enum for every lookup, scan and write
//! - [`FailureClass`]: How the pipeline degrades when an error occurs
//!
//! None of these errors escape [`AvatarResolver::resolve`](crate::AvatarResolver::resolve);
//! they are logged and folded into the resolution report.

mod failure;

pub use failure::FailureClass;

use thiserror::Error;

/// Errors that can occur while resolving an identity's avatar.
#[derive(Error, Debug)]
pub enum ResolutionError {
    /// The request never produced a response (connect, timeout, body read).
    #[error("Transport failure on {lookup}: {message}")]
    Transport {
        /// The lookup that failed
        lookup: &'static str,
        /// Underlying transport message
        message: String,
    },

    /// The lookup answered with a non-success HTTP status.
    #[error("Unexpected status {status} from {lookup}")]
    Status {
        /// The lookup that failed
        lookup: &'static str,
        /// HTTP status code
        status: u16,
    },

    /// The response body could not be decoded.
    #[error("Failed to parse {lookup} response: {message}")]
    Parse {
        /// The lookup whose response was unreadable
        lookup: &'static str,
        /// Decoder message
        message: String,
    },

    /// The lookup answered but flagged the request as failed (`ok: false`).
    #[error("{lookup} reported failure")]
    Rejected {
        /// The lookup that rejected the request
        lookup: &'static str,
    },

    /// A source record did not have a usable shape.
    #[error("Malformed record in {collection}: {message}")]
    MalformedRecord {
        /// Collection key the record came from
        collection: String,
        /// What was wrong with it
        message: String,
    },

    /// Writing a discovered avatar back to the primary store failed.
    #[error("Persistence failed: {message}")]
    Persistence {
        /// Description of the failure
        message: String,
    },
}

impl ResolutionError {
    /// Returns how the pipeline should treat this error.
    ///
    /// # Examples
    ///
    /// ```
    /// use charms_identity::errors::{FailureClass, ResolutionError};
    ///
    /// let error = ResolutionError::Rejected { lookup: "inspect_user" };
    /// assert_eq!(error.failure_class(), FailureClass::DegradeToMiss);
    ///
    /// let error = ResolutionError::Persistence { message: "503".to_string() };
    /// assert_eq!(error.failure_class(), FailureClass::LogOnly);
    /// ```
    pub fn failure_class(&self) -> FailureClass {
        match self {
            Self::Transport { .. }
            | Self::Status { .. }
            | Self::Parse { .. }
            | Self::Rejected { .. } => FailureClass::DegradeToMiss,

            Self::MalformedRecord { .. } => FailureClass::SkipRecord,

            Self::Persistence { .. } => FailureClass::LogOnly,
        }
    }
}
