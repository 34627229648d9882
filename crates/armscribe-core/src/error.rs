//! Error handling for armscribe
//!
//! Provides error types for every layer of the application:
//! - Input errors (point file records and the file itself)
//! - Connection errors (dialing, authentication, service lookup)
//! - Motion errors (a move rejected or failed by the motion service)
//! - Visualization errors (the pose sink refused a drawing)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Input error type
///
/// Record-level variants are recovered locally by the parser (logged and
/// dropped). `Unreadable` is the only fatal input error.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputError {
    /// Line did not split into the expected number of fields
    #[error("Malformed line {line_number}: expected {expected} fields, found {found}")]
    FieldCount {
        /// 1-based line number in the source.
        line_number: usize,
        /// Number of fields a point record must have.
        expected: usize,
        /// Number of fields actually found.
        found: usize,
    },

    /// A field could not be parsed as a real number
    #[error("Invalid field {field_index} at line {line_number}: '{text}' ({reason})")]
    InvalidNumber {
        /// 1-based line number in the source.
        line_number: usize,
        /// 0-based index of the offending field.
        field_index: usize,
        /// The raw field text.
        text: String,
        /// Parser message.
        reason: String,
    },

    /// A line is not valid UTF-8
    #[error("Invalid text at line {line_number}: {reason}")]
    InvalidEncoding {
        /// 1-based line number in the source.
        line_number: usize,
        /// Decoder message.
        reason: String,
    },

    /// The point source could not be opened or read
    #[error("Cannot read point source {source_name}: {reason}")]
    Unreadable {
        /// Path or name of the source.
        source_name: String,
        /// The underlying I/O message.
        reason: String,
    },
}

/// Connection error type
///
/// Represents failures talking to the robot controller session.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConnectionError {
    /// Failed to dial the controller
    #[error("Failed to connect to {address}: {reason}")]
    ConnectFailed {
        /// The address that was dialed.
        address: String,
        /// The reason the dial failed.
        reason: String,
    },

    /// The controller rejected the credentials
    #[error("Authentication rejected for key id {key_id}: {reason}")]
    AuthenticationFailed {
        /// The key id presented (never the secret).
        key_id: String,
        /// The reason given by the controller.
        reason: String,
    },

    /// A named service is not available on the controller
    #[error("Service not found: {name}")]
    ServiceNotFound {
        /// The service name that was looked up.
        name: String,
    },

    /// The controller answered with something that is not a valid response
    #[error("Protocol error: {reason}")]
    Protocol {
        /// What was wrong with the exchange.
        reason: String,
    },

    /// The session was already closed
    #[error("Connection closed")]
    Closed,

    /// I/O error on the session transport
    #[error("I/O error: {reason}")]
    Io {
        /// The underlying I/O message.
        reason: String,
    },
}

/// Motion error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MotionError {
    /// The initial positioning move failed
    #[error("Move to initial pose failed: {reason}")]
    InitialMoveFailed {
        /// The reason reported by the motion service.
        reason: String,
    },

    /// A waypoint move failed; later waypoints were not submitted
    #[error("Move to waypoint {index} failed after {completed} completed moves: {reason}")]
    MoveFailed {
        /// 0-based index of the failed waypoint.
        index: usize,
        /// Number of waypoints completed before the failure.
        completed: usize,
        /// The reason reported by the motion service.
        reason: String,
    },

    /// The motion service answered but refused the request
    #[error("Move rejected: {reason}")]
    Rejected {
        /// The reason the move was rejected.
        reason: String,
    },
}

/// Visualization error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VisualizationError {
    /// Poses and colours must be parallel lists
    #[error("Pose/colour count mismatch: {poses} poses, {colors} colours")]
    LengthMismatch {
        /// Number of poses submitted.
        poses: usize,
        /// Number of colours submitted.
        colors: usize,
    },

    /// The sink refused the drawing
    #[error("Visualizer rejected drawing: {reason}")]
    Rejected {
        /// The reason given by the sink.
        reason: String,
    },
}

/// Main error type for armscribe
///
/// A unified error type that can represent any error from all layers.
/// This is the primary error type used in public APIs.
#[derive(Error, Debug)]
pub enum Error {
    /// Input error
    #[error(transparent)]
    Input(#[from] InputError),

    /// Connection error
    #[error(transparent)]
    Connection(#[from] ConnectionError),

    /// Motion error
    #[error(transparent)]
    Motion(#[from] MotionError),

    /// Visualization error
    #[error(transparent)]
    Visualization(#[from] VisualizationError),

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

    /// Check if this is an input error
    pub fn is_input_error(&self) -> bool {
        matches!(self, Error::Input(_))
    }

    /// Check if this is a connection error
    pub fn is_connection_error(&self) -> bool {
        matches!(self, Error::Connection(_))
    }

    /// Check if this is a motion error
    pub fn is_motion_error(&self) -> bool {
        matches!(self, Error::Motion(_))
    }

    /// Check if this is a visualization error
    pub fn is_visualization_error(&self) -> bool {
        matches!(self, Error::Visualization(_))
    }

    /// Index of the failed waypoint, if this error stopped a trajectory
    pub fn failed_waypoint(&self) -> Option<usize> {
        match self {
            Error::Motion(MotionError::MoveFailed { index, .. }) => Some(*index),
            _ => None,
        }
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
