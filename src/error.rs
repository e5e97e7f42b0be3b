// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `halwatch` library.
//!
//! Nothing in this crate is fatal to the process. The errors below are
//! returned from fallible setup calls (creating pins, starting clocks,
//! parsing configuration) and are otherwise absorbed by the watchers:
//! a failed status poll skips the tick, a failed pin read deregisters the
//! pin, and a panicking listener is isolated by the event bus.

use thiserror::Error;

use crate::types::{PinDirection, PinType};

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// A value failed validation.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// A pin store operation failed.
    #[error("pin error: {0}")]
    Pin(#[from] PinError),

    /// The status source could not be polled.
    #[error("status source error: {0}")]
    Source(#[from] SourceError),

    /// Configuration could not be parsed.
    #[error("configuration error: {0}")]
    Config(#[from] serde_json::Error),

    /// A clock was started outside of a Tokio runtime.
    #[error("no Tokio runtime is available to drive the clock")]
    NoRuntime,

    /// A widget tag is not present in the element registry.
    #[error("unknown widget element: {0}")]
    UnknownWidget(String),

    /// A widget ID does not belong to the tree it was used with.
    #[error("no widget with id {0}")]
    NoSuchWidget(usize),
}

/// Errors related to value validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// Unknown raw run-state code.
    #[error("invalid run state code: {0}")]
    InvalidRunState(i32),

    /// Unknown raw task-mode code.
    #[error("invalid task mode code: {0}")]
    InvalidTaskMode(i32),

    /// Unknown raw interpreter-state code.
    #[error("invalid interpreter state code: {0}")]
    InvalidInterpState(i32),

    /// A number format string could not be parsed.
    #[error("invalid number format: {0:?}")]
    InvalidFormat(String),

    /// A widget property is missing or out of range.
    #[error("invalid widget property {property}: {message}")]
    InvalidProperty {
        /// The property name.
        property: &'static str,
        /// Description of the problem.
        message: String,
    },
}

/// Errors raised by a [`PinStore`](crate::pin::PinStore).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PinError {
    /// The pin does not exist (never created, or destroyed externally).
    #[error("pin {0} does not exist")]
    NotFound(String),

    /// The pin already exists with a different type.
    #[error("pin {name} already exists as {existing}, requested {requested}")]
    AlreadyExists {
        /// The pin name.
        name: String,
        /// The type the pin was created with.
        existing: PinType,
        /// The type that was requested.
        requested: PinType,
    },

    /// The pin already exists with the same type but another direction.
    #[error("pin {name} already exists as {existing}, requested {requested}")]
    DirectionConflict {
        /// The pin name.
        name: String,
        /// The direction the pin was created with.
        existing: PinDirection,
        /// The direction that was requested.
        requested: PinDirection,
    },

    /// The pin direction does not allow the operation.
    #[error("pin {name} is {direction} and cannot be written by this component")]
    DirectionForbidden {
        /// The pin name.
        name: String,
        /// The pin direction.
        direction: PinDirection,
    },

    /// A value of the wrong scalar type was read or written.
    #[error("pin {name} holds {actual}, expected {expected}")]
    TypeMismatch {
        /// The pin name.
        name: String,
        /// The type the caller expected.
        expected: PinType,
        /// The type actually found.
        actual: PinType,
    },

    /// The pin name is not a dotted identifier.
    #[error("invalid pin name: {0:?}")]
    InvalidName(String),
}

/// Errors raised by a [`SnapshotSource`](crate::status::SnapshotSource).
#[derive(Debug, Error)]
pub enum SourceError {
    /// The status source is temporarily unavailable.
    #[error("status source unavailable: {0}")]
    Unavailable(String),

    /// An I/O error occurred while reading the status source.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_error_display() {
        let err = ValueError::InvalidRunState(9);
        assert_eq!(err.to_string(), "invalid run state code: 9");
    }

    #[test]
    fn pin_error_display() {
        let err = PinError::AlreadyExists {
            name: "spindle.speed".to_string(),
            existing: PinType::Float,
            requested: PinType::S32,
        };
        assert_eq!(
            err.to_string(),
            "pin spindle.speed already exists as float, requested s32"
        );

        let err = PinError::DirectionForbidden {
            name: "led.0".to_string(),
            direction: PinDirection::In,
        };
        assert_eq!(
            err.to_string(),
            "pin led.0 is in and cannot be written by this component"
        );
    }

    #[test]
    fn error_from_pin_error() {
        let err: Error = PinError::NotFound("x".to_string()).into();
        assert!(matches!(err, Error::Pin(PinError::NotFound(_))));
    }

    #[test]
    fn source_error_from_io() {
        let io = std::io::Error::new(std::io::ErrorKind::NotConnected, "nml down");
        let err: Error = SourceError::from(io).into();
        assert!(err.to_string().starts_with("status source error: I/O error"));
    }
}
