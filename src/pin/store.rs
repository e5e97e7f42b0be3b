// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Pin store boundary and an in-memory implementation.

use std::collections::HashMap;
use std::fmt;

use parking_lot::RwLock;

use crate::error::PinError;
use crate::types::{PinDirection, PinType, PinValue};

/// Named, typed pins exposed by the hardware abstraction layer.
///
/// Directions are seen from the component: an [`In`](PinDirection::In) pin
/// is driven from outside and may only be read; an
/// [`Out`](PinDirection::Out) pin is written by the component.
pub trait PinStore: Send + Sync {
    /// Creates a pin.
    ///
    /// Creating an existing pin with the same type and direction is allowed
    /// and returns the existing pin unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`PinError::AlreadyExists`] if the name exists with another
    /// type, [`PinError::DirectionConflict`] if it exists with the same type
    /// but another direction, or [`PinError::InvalidName`] for a malformed
    /// name.
    fn create_pin(&self, name: &str, direction: PinDirection, pin_type: PinType)
    -> Result<(), PinError>;

    /// Reads the current value of a pin.
    ///
    /// # Errors
    ///
    /// Returns [`PinError::NotFound`] if the pin does not exist.
    fn read(&self, name: &str) -> Result<PinValue, PinError>;

    /// Writes a pin owned by the component.
    ///
    /// # Errors
    ///
    /// Returns [`PinError::NotFound`] if the pin does not exist,
    /// [`PinError::DirectionForbidden`] for an input pin, or
    /// [`PinError::TypeMismatch`] if `value` has the wrong type.
    fn write(&self, name: &str, value: PinValue) -> Result<(), PinError>;
}

/// Returns `true` if `name` is a dotted identifier such as `spindle.0.at-speed`.
///
/// Each component must be non-empty and made of ASCII alphanumerics, `_`
/// or `-`.
#[must_use]
pub fn is_valid_pin_name(name: &str) -> bool {
    !name.is_empty()
        && name.split('.').all(|part| {
            !part.is_empty()
                && part
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        })
}

#[derive(Debug, Clone, Copy)]
struct Slot {
    direction: PinDirection,
    value: PinValue,
}

/// An in-process [`PinStore`].
///
/// Besides the store operations it can simulate the outside world:
/// [`drive`](Self::drive) sets any pin regardless of direction, and
/// [`remove_pin`](Self::remove_pin) destroys a pin behind the watchers'
/// backs.
///
/// # Examples
///
/// ```
/// use halwatch::pin::{MemoryPinStore, PinStore};
/// use halwatch::types::{PinDirection, PinType, PinValue};
///
/// let store = MemoryPinStore::new();
/// store.create_pin("pyvcp.led.0", PinDirection::In, PinType::Bit).unwrap();
///
/// // The component cannot write its inputs, the outside world can
/// assert!(store.write("pyvcp.led.0", PinValue::Bit(true)).is_err());
/// store.drive("pyvcp.led.0", true).unwrap();
/// assert_eq!(store.read("pyvcp.led.0").unwrap(), PinValue::Bit(true));
/// ```
#[derive(Default)]
pub struct MemoryPinStore {
    pins: RwLock<HashMap<String, Slot>>,
}

impl MemoryPinStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a pin as an external signal would, ignoring its direction.
    ///
    /// # Errors
    ///
    /// Returns [`PinError::NotFound`] or [`PinError::TypeMismatch`].
    pub fn drive(&self, name: &str, value: impl Into<PinValue>) -> Result<(), PinError> {
        let value = value.into();
        let mut pins = self.pins.write();
        let slot = pins
            .get_mut(name)
            .ok_or_else(|| PinError::NotFound(name.to_string()))?;
        check_type(name, slot.value.pin_type(), value)?;
        slot.value = value;
        Ok(())
    }

    /// Destroys a pin. Returns `true` if it existed.
    pub fn remove_pin(&self, name: &str) -> bool {
        self.pins.write().remove(name).is_some()
    }

    /// Returns `true` if the pin exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.pins.read().contains_key(name)
    }

    /// Returns the direction and type of a pin.
    #[must_use]
    pub fn describe(&self, name: &str) -> Option<(PinDirection, PinType)> {
        self.pins
            .read()
            .get(name)
            .map(|slot| (slot.direction, slot.value.pin_type()))
    }

    /// Returns all pin names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.pins.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Returns the number of pins.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pins.read().len()
    }

    /// Returns `true` if the store has no pins.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pins.read().is_empty()
    }
}

fn check_type(name: &str, expected: PinType, value: PinValue) -> Result<(), PinError> {
    if value.pin_type() == expected {
        Ok(())
    } else {
        Err(PinError::TypeMismatch {
            name: name.to_string(),
            expected,
            actual: value.pin_type(),
        })
    }
}

impl PinStore for MemoryPinStore {
    fn create_pin(
        &self,
        name: &str,
        direction: PinDirection,
        pin_type: PinType,
    ) -> Result<(), PinError> {
        if !is_valid_pin_name(name) {
            return Err(PinError::InvalidName(name.to_string()));
        }
        let mut pins = self.pins.write();
        if let Some(slot) = pins.get(name) {
            let existing = slot.value.pin_type();
            if existing != pin_type {
                return Err(PinError::AlreadyExists {
                    name: name.to_string(),
                    existing,
                    requested: pin_type,
                });
            }
            if slot.direction != direction {
                return Err(PinError::DirectionConflict {
                    name: name.to_string(),
                    existing: slot.direction,
                    requested: direction,
                });
            }
            return Ok(());
        }
        pins.insert(
            name.to_string(),
            Slot {
                direction,
                value: pin_type.default_value(),
            },
        );
        tracing::debug!(pin = name, %direction, %pin_type, "Pin created");
        Ok(())
    }

    fn read(&self, name: &str) -> Result<PinValue, PinError> {
        self.pins
            .read()
            .get(name)
            .map(|slot| slot.value)
            .ok_or_else(|| PinError::NotFound(name.to_string()))
    }

    fn write(&self, name: &str, value: PinValue) -> Result<(), PinError> {
        let mut pins = self.pins.write();
        let slot = pins
            .get_mut(name)
            .ok_or_else(|| PinError::NotFound(name.to_string()))?;
        if !slot.direction.is_writable() {
            return Err(PinError::DirectionForbidden {
                name: name.to_string(),
                direction: slot.direction,
            });
        }
        check_type(name, slot.value.pin_type(), value)?;
        slot.value = value;
        Ok(())
    }
}

impl fmt::Debug for MemoryPinStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryPinStore")
            .field("pins", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pin_names() {
        assert!(is_valid_pin_name("pyvcp.led.0"));
        assert!(is_valid_pin_name("spindle_at-speed"));
        assert!(!is_valid_pin_name(""));
        assert!(!is_valid_pin_name("a..b"));
        assert!(!is_valid_pin_name(".a"));
        assert!(!is_valid_pin_name("has space"));
    }

    #[test]
    fn create_starts_at_zero() {
        let store = MemoryPinStore::new();
        store.create_pin("a.f", PinDirection::In, PinType::Float).unwrap();
        assert_eq!(store.read("a.f").unwrap(), PinValue::Float(0.0));
        assert_eq!(store.describe("a.f"), Some((PinDirection::In, PinType::Float)));
    }

    #[test]
    fn recreate_same_type_is_ok() {
        let store = MemoryPinStore::new();
        store.create_pin("a.b", PinDirection::Out, PinType::Bit).unwrap();
        store.write("a.b", PinValue::Bit(true)).unwrap();
        store.create_pin("a.b", PinDirection::Out, PinType::Bit).unwrap();
        assert_eq!(store.read("a.b").unwrap(), PinValue::Bit(true));
    }

    #[test]
    fn recreate_other_type_fails() {
        let store = MemoryPinStore::new();
        store.create_pin("a.b", PinDirection::Out, PinType::Bit).unwrap();
        let err = store.create_pin("a.b", PinDirection::Out, PinType::S32).unwrap_err();
        assert_eq!(
            err,
            PinError::AlreadyExists {
                name: "a.b".to_string(),
                existing: PinType::Bit,
                requested: PinType::S32,
            }
        );
    }

    #[test]
    fn recreate_other_direction_fails() {
        let store = MemoryPinStore::new();
        store.create_pin("a.b", PinDirection::In, PinType::Bit).unwrap();
        let err = store.create_pin("a.b", PinDirection::Out, PinType::Bit).unwrap_err();
        assert_eq!(
            err,
            PinError::DirectionConflict {
                name: "a.b".to_string(),
                existing: PinDirection::In,
                requested: PinDirection::Out,
            }
        );
        assert_eq!(store.describe("a.b"), Some((PinDirection::In, PinType::Bit)));
    }

    #[test]
    fn invalid_name_rejected() {
        let store = MemoryPinStore::new();
        let err = store.create_pin("bad name", PinDirection::In, PinType::Bit).unwrap_err();
        assert!(matches!(err, PinError::InvalidName(_)));
    }

    #[test]
    fn write_checks_direction_and_type() {
        let store = MemoryPinStore::new();
        store.create_pin("in.pin", PinDirection::In, PinType::S32).unwrap();
        store.create_pin("out.pin", PinDirection::Out, PinType::S32).unwrap();

        assert!(matches!(
            store.write("in.pin", PinValue::S32(1)),
            Err(PinError::DirectionForbidden { .. })
        ));
        assert!(matches!(
            store.write("out.pin", PinValue::Float(1.0)),
            Err(PinError::TypeMismatch { .. })
        ));
        assert!(matches!(
            store.write("missing", PinValue::S32(1)),
            Err(PinError::NotFound(_))
        ));
        store.write("out.pin", PinValue::S32(-4)).unwrap();
        assert_eq!(store.read("out.pin").unwrap(), PinValue::S32(-4));
    }

    #[test]
    fn drive_bypasses_direction() {
        let store = MemoryPinStore::new();
        store.create_pin("in.pin", PinDirection::In, PinType::U32).unwrap();
        store.drive("in.pin", 3u32).unwrap();
        assert_eq!(store.read("in.pin").unwrap(), PinValue::U32(3));
        assert!(store.drive("in.pin", true).is_err());
    }

    #[test]
    fn remove_pin_makes_reads_fail() {
        let store = MemoryPinStore::new();
        store.create_pin("gone", PinDirection::In, PinType::Bit).unwrap();
        assert!(store.remove_pin("gone"));
        assert!(!store.remove_pin("gone"));
        assert_eq!(store.read("gone"), Err(PinError::NotFound("gone".to_string())));
        assert!(store.is_empty());
    }
}
