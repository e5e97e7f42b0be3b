// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Pin change events.

use serde::{Deserialize, Serialize};

/// Emitted by the [`PinWatcher`](crate::pin::PinWatcher) when a pin's value
/// differs from the previous tick.
///
/// The event carries no value; listeners re-read the pin. It is emitted on
/// the bus under the pin's name, so subscribing to `"spindle.at-speed"`
/// receives only that pin's changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinEvent {
    /// Name of the pin that changed.
    pub pin: String,
}

impl PinEvent {
    /// Conceptual name of the event.
    pub const VALUE_CHANGED: &'static str = "value-changed";

    /// Creates a value-changed event for `pin`.
    #[must_use]
    pub fn value_changed(pin: impl Into<String>) -> Self {
        Self { pin: pin.into() }
    }

    /// Returns the event name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        Self::VALUE_CHANGED
    }
}
