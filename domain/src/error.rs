//! Error types for the `domain` layer.
use std::error::Error as StdError;
use std::fmt;
use std::time::Duration;

/// Top-level domain error type.
/// Errors in the Domain layer are modeled as a tree structure
/// with `domain::error::Error` as the root type holding a tree of `error_kind`
/// enums that represent the kinds of errors that can occur while building or
/// serving a greeting. The `source` field holds the original error, if any, so
/// that `web` can map a domain error to an HTTP status without depending on
/// the lower level crates that produced it.
#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: DomainErrorKind,
}

/// Enum representing the major categories of errors that can occur in the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum DomainErrorKind {
    Input(InputErrorKind),
    Internal(InternalErrorKind),
}

/// Errors caused by what the caller sent. These are rejected before any
/// greeting is computed or any stream is started.
#[derive(Debug, PartialEq)]
pub enum InputErrorKind {
    /// The request carried no name at all (an empty name is valid).
    MissingName,
    /// The requested stream interval is zero or below the configured minimum.
    InvalidInterval,
}

/// Enum representing the various kinds of internal errors that can occur in the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum InternalErrorKind {
    /// The scheduling facility could not arm or fire a stream's timer.
    Timer,
    /// A greeting could not be serialized for the wire.
    Serialization,
    Other(String),
}

impl Error {
    pub fn missing_name() -> Self {
        Error {
            source: None,
            error_kind: DomainErrorKind::Input(InputErrorKind::MissingName),
        }
    }

    pub fn invalid_interval(requested: Duration, minimum: Duration) -> Self {
        let reason = format!("interval of {requested:?} is below the minimum of {minimum:?}");
        Error {
            source: Some(reason.into()),
            error_kind: DomainErrorKind::Input(InputErrorKind::InvalidInterval),
        }
    }

    pub fn timer_fault(reason: impl Into<String>) -> Self {
        let reason: String = reason.into();
        Error {
            source: Some(reason.into()),
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Timer),
        }
    }

    pub fn is_input_error(&self) -> bool {
        matches!(self.error_kind, DomainErrorKind::Input(_))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Domain Error: {self:?}")
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error {
            source: Some(Box::new(err)),
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Serialization),
        }
    }
}
