// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-tick pin access for bound widgets.

use std::collections::HashMap;

use parking_lot::Mutex;

use crate::error::Result;
use crate::pin::{PinHandle, PinStore};
use crate::types::PinValue;

/// Pin access handed to every widget during one tree update.
///
/// The first read of a pin in a tick is cached, so every widget sees the
/// same value for a pin within a tick. Writes go to the store and replace
/// the cached value.
pub struct PinAccessor<'a> {
    store: &'a dyn PinStore,
    seen: Mutex<HashMap<String, PinValue>>,
}

impl<'a> PinAccessor<'a> {
    /// Creates an accessor over `store` with an empty cache.
    #[must_use]
    pub fn new(store: &'a dyn PinStore) -> Self {
        Self {
            store,
            seen: Mutex::new(HashMap::new()),
        }
    }

    /// Reads a pin.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Pin`](crate::Error::Pin) if the pin is missing or
    /// has another type than the handle declares.
    pub fn read(&self, pin: &PinHandle) -> Result<PinValue> {
        if let Some(value) = self.seen.lock().get(pin.name()) {
            return Ok(*value);
        }
        let value = pin.read(self.store)?;
        self.seen.lock().insert(pin.name().to_string(), value);
        Ok(value)
    }

    /// Reads a pin as a bit.
    ///
    /// # Errors
    ///
    /// See [`read`](Self::read).
    pub fn read_bool(&self, pin: &PinHandle) -> Result<bool> {
        self.read(pin).map(|v| v.as_bool())
    }

    /// Reads a pin widened to `f64`.
    ///
    /// # Errors
    ///
    /// See [`read`](Self::read).
    pub fn read_f64(&self, pin: &PinHandle) -> Result<f64> {
        self.read(pin).map(|v| v.as_f64())
    }

    /// Writes a pin.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Pin`](crate::Error::Pin) if the store rejects the
    /// write.
    pub fn write(&self, pin: &PinHandle, value: impl Into<PinValue>) -> Result<()> {
        let value = value.into();
        pin.write(self.store, value)?;
        self.seen.lock().insert(pin.name().to_string(), value);
        Ok(())
    }
}
