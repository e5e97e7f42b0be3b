// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Pin creation for widget constructors.

use std::collections::HashMap;
use std::fmt;

use crate::error::Result;
use crate::pin::{PinHandle, PinStore};
use crate::types::{PinDirection, PinType};

/// Creates the pins of widgets as they are constructed.
///
/// Widgets without an explicit `halpin` are named `<family>.<n>`, with one
/// counter per family shared by every element of that family (`led` and
/// `rectled` both count `led.N`).
///
/// # Examples
///
/// ```
/// use halwatch::pin::MemoryPinStore;
/// use halwatch::widget::PinBinder;
///
/// let store = MemoryPinStore::new();
/// let mut binder = PinBinder::new(&store);
/// assert_eq!(binder.base_name(None, "led"), "led.0");
/// assert_eq!(binder.base_name(None, "led"), "led.1");
/// assert_eq!(binder.base_name(Some("estop"), "led"), "estop");
/// assert_eq!(binder.base_name(None, "bar"), "bar.0");
/// ```
pub struct PinBinder<'a> {
    store: &'a dyn PinStore,
    counters: HashMap<&'static str, usize>,
    created: Vec<PinHandle>,
}

impl<'a> PinBinder<'a> {
    /// Creates a binder with fresh counters.
    #[must_use]
    pub fn new(store: &'a dyn PinStore) -> Self {
        Self {
            store,
            counters: HashMap::new(),
            created: Vec::new(),
        }
    }

    /// Returns `halpin`, or the next generated name for `family`.
    pub fn base_name(&mut self, halpin: Option<&str>, family: &'static str) -> String {
        if let Some(name) = halpin {
            return name.to_string();
        }
        let n = self.counters.entry(family).or_insert(0);
        let name = format!("{family}.{n}");
        *n += 1;
        name
    }

    /// Creates an input pin.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Pin`](crate::Error::Pin) if the store rejects it.
    pub fn input(&mut self, name: impl Into<String>, pin_type: PinType) -> Result<PinHandle> {
        self.create(name.into(), PinDirection::In, pin_type)
    }

    /// Creates an output pin.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Pin`](crate::Error::Pin) if the store rejects it.
    pub fn output(&mut self, name: impl Into<String>, pin_type: PinType) -> Result<PinHandle> {
        self.create(name.into(), PinDirection::Out, pin_type)
    }

    /// Creates the `<base>.disable` companion if `enabled`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Pin`](crate::Error::Pin) if the store rejects it.
    pub fn disable_pin(&mut self, base: &str, enabled: bool) -> Result<Option<PinHandle>> {
        if enabled {
            self.input(format!("{base}.disable"), PinType::Bit).map(Some)
        } else {
            Ok(None)
        }
    }

    fn create(&mut self, name: String, direction: PinDirection, pin_type: PinType) -> Result<PinHandle> {
        let handle = PinHandle::create(self.store, name, direction, pin_type)?;
        self.created.push(handle.clone());
        Ok(handle)
    }

    /// Returns the pins created so far, in creation order.
    #[must_use]
    pub fn created(&self) -> &[PinHandle] {
        &self.created
    }

    /// Takes the list of created pins, leaving it empty.
    pub fn take_created(&mut self) -> Vec<PinHandle> {
        std::mem::take(&mut self.created)
    }
}

impl fmt::Debug for PinBinder<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PinBinder")
            .field("counters", &self.counters)
            .field("created", &self.created.len())
            .finish_non_exhaustive()
    }
}
