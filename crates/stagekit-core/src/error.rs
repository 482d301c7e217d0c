//! Error handling for StageKit
//!
//! Provides error types for all layers of the viewport stack:
//! - Geometry errors (landmark resolution)
//! - Mapper errors (degenerate domains, ranges, and extents)
//! - Channel errors (remote command channel)
//! - Message errors (malformed inbound payloads)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

use crate::geometry::Landmark;

/// Geometry error type
///
/// Raised by the landmark resolver. An unresolvable landmark is *not* an
/// error (it resolves to `None`); only derivations that do not exist at all
/// end up here.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// The derivation for this landmark is not implemented
    #[error("Resolving {landmark} is not implemented")]
    NotImplemented {
        /// The landmark that was requested.
        landmark: Landmark,
    },

    /// Unknown landmark name
    #[error("Unknown landmark: {name}")]
    UnknownLandmark {
        /// The name that failed to parse.
        name: String,
    },
}

/// Mapper error type
///
/// Represents invalid coordinate mapping parameters.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MapperError {
    /// A domain or range has zero (or non-finite) span
    #[error("Degenerate {axis} span: ({start}, {end})")]
    DegenerateSpan {
        /// Which span was degenerate ("x domain", "y range", ...).
        axis: &'static str,
        /// Span start.
        start: f64,
        /// Span end.
        end: f64,
    },

    /// Canvas extent must be positive
    #[error("Invalid canvas size {width}x{height}")]
    InvalidExtent {
        /// Requested width in pixels.
        width: f64,
        /// Requested height in pixels.
        height: f64,
    },

    /// Margins must be non-negative
    #[error("Invalid margin '{side}': {value}")]
    InvalidMargin {
        /// Which side was invalid.
        side: &'static str,
        /// The rejected value.
        value: f64,
    },
}

/// Channel error type
///
/// Represents failures of the remote command channel.
#[derive(Error, Debug, Clone)]
pub enum ChannelError {
    /// Channel is closed
    #[error("Remote channel closed")]
    Closed,

    /// Failed to write an outbound frame
    #[error("Failed to send '{name}': {reason}")]
    SendFailed {
        /// The remote call name.
        name: String,
        /// The reason the write failed.
        reason: String,
    },
}

/// Message error type
///
/// Represents inbound payloads that do not match the expected wire shape.
#[derive(Error, Debug, Clone)]
pub enum MessageError {
    /// Payload did not have the expected shape
    #[error("Malformed '{signal}' payload: {reason}")]
    Malformed {
        /// The signal name the payload arrived on.
        signal: String,
        /// What was wrong with it.
        reason: String,
    },

    /// Frame was not valid JSON
    #[error("Invalid frame: {0}")]
    InvalidFrame(String),
}

/// Main error type for StageKit
///
/// A unified error type that can represent any error from all layers.
/// This is the primary error type used in public APIs.
#[derive(Error, Debug)]
pub enum Error {
    /// Geometry error
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    /// Mapper error
    #[error(transparent)]
    Mapper(#[from] MapperError),

    /// Channel error
    #[error(transparent)]
    Channel(#[from] ChannelError),

    /// Message error
    #[error(transparent)]
    Message(#[from] MessageError),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a geometry error
    pub fn is_geometry_error(&self) -> bool {
        matches!(self, Error::Geometry(_))
    }

    /// Check if this is a transport error
    pub fn is_channel_error(&self) -> bool {
        matches!(self, Error::Channel(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GeometryError::NotImplemented {
            landmark: Landmark::Center,
        };
        assert_eq!(err.to_string(), "Resolving center is not implemented");

        let err = MapperError::DegenerateSpan {
            axis: "x domain",
            start: 1.0,
            end: 1.0,
        };
        assert_eq!(err.to_string(), "Degenerate x domain span: (1, 1)");
    }

    #[test]
    fn test_error_conversion() {
        let err: Error = GeometryError::UnknownLandmark {
            name: "middle".to_string(),
        }
        .into();
        assert!(err.is_geometry_error());

        let err: Error = ChannelError::Closed.into();
        assert!(err.is_channel_error());
        assert!(!err.is_geometry_error());
    }
}
