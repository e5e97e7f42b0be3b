// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Event system for machine status and pin changes.
//!
//! The [`EventBus`] maps event names to ordered listener lists. Both
//! watchers publish on their own bus: the status watcher emits
//! [`StatusEvent`]s under their [`name`](StatusEvent::name), the pin watcher
//! emits a [`PinEvent`] under the name of the pin that changed.
//!
//! # Examples
//!
//! ```
//! use halwatch::event::{EventBus, StatusEvent};
//!
//! let bus = EventBus::new();
//!
//! bus.on("estop", |event: &StatusEvent| {
//!     println!("{event:?}");
//! });
//!
//! let event = StatusEvent::Estop;
//! bus.emit(event.name(), &event);
//! ```

mod event_bus;
mod pin_event;
mod status_event;

pub use event_bus::EventBus;
pub use pin_event::PinEvent;
pub use status_event::StatusEvent;
