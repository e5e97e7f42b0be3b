// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Typed pin handles.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::PinError;
use crate::types::{PinDirection, PinType, PinValue};

use super::PinStore;

/// A watcher's view of one pin: its name, direction and declared type.
///
/// Handles are plain values. Two handles with the same name are independent
/// observers of the same underlying pin.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PinHandle {
    name: String,
    direction: PinDirection,
    pin_type: PinType,
}

impl PinHandle {
    /// Creates a handle. The pin is not created in any store.
    #[must_use]
    pub fn new(name: impl Into<String>, direction: PinDirection, pin_type: PinType) -> Self {
        Self {
            name: name.into(),
            direction,
            pin_type,
        }
    }

    /// Creates the pin in `store` and returns a handle to it.
    ///
    /// # Errors
    ///
    /// Propagates [`PinStore::create_pin`] errors.
    pub fn create(
        store: &dyn PinStore,
        name: impl Into<String>,
        direction: PinDirection,
        pin_type: PinType,
    ) -> Result<Self, PinError> {
        let handle = Self::new(name, direction, pin_type);
        store.create_pin(&handle.name, direction, pin_type)?;
        Ok(handle)
    }

    /// Returns the pin name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the pin direction.
    #[must_use]
    pub fn direction(&self) -> PinDirection {
        self.direction
    }

    /// Returns the declared type.
    #[must_use]
    pub fn pin_type(&self) -> PinType {
        self.pin_type
    }

    /// Reads the pin, checking that it still has the declared type.
    ///
    /// # Errors
    ///
    /// Returns [`PinError::NotFound`] or [`PinError::TypeMismatch`].
    pub fn read(&self, store: &dyn PinStore) -> Result<PinValue, PinError> {
        let value = store.read(&self.name)?;
        if value.pin_type() == self.pin_type {
            Ok(value)
        } else {
            Err(PinError::TypeMismatch {
                name: self.name.clone(),
                expected: self.pin_type,
                actual: value.pin_type(),
            })
        }
    }

    /// Writes the pin.
    ///
    /// # Errors
    ///
    /// Propagates [`PinStore::write`] errors.
    pub fn write(&self, store: &dyn PinStore, value: impl Into<PinValue>) -> Result<(), PinError> {
        store.write(&self.name, value.into())
    }
}

impl fmt::Display for PinHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} {})", self.name, self.direction, self.pin_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pin::MemoryPinStore;

    #[test]
    fn create_and_read() {
        let store = MemoryPinStore::new();
        let handle = PinHandle::create(&store, "x.count", PinDirection::In, PinType::S32).unwrap();
        store.drive("x.count", 5).unwrap();
        assert_eq!(handle.read(&store).unwrap(), PinValue::S32(5));
        assert_eq!(handle.to_string(), "x.count (in s32)");
    }

    #[test]
    fn type_drift_is_an_error() {
        let store = MemoryPinStore::new();
        store.create_pin("x.v", PinDirection::In, PinType::Float).unwrap();
        let handle = PinHandle::new("x.v", PinDirection::In, PinType::Bit);
        assert!(matches!(
            handle.read(&store),
            Err(PinError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn write_through_handle() {
        let store = MemoryPinStore::new();
        let handle = PinHandle::create(&store, "x.out", PinDirection::Out, PinType::Bit).unwrap();
        handle.write(&store, true).unwrap();
        assert_eq!(store.read("x.out").unwrap(), PinValue::Bit(true));
    }
}
