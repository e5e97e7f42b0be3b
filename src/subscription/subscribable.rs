// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Subscribable trait for watchers that publish events.

use crate::event::EventBus;
use crate::subscription::SubscriptionId;

/// Trait for types that publish named events on an [`EventBus`].
///
/// Implementors only expose their bus; subscribing and unsubscribing are
/// provided. Listeners run synchronously on the ticking thread, in
/// registration order.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use halwatch::pin::{MemoryPinStore, PinWatcher};
/// use halwatch::subscription::Subscribable;
///
/// let watcher = PinWatcher::new(Arc::new(MemoryPinStore::new()));
/// let id = watcher.on_any(|event| println!("{event:?}"));
/// watcher.unsubscribe(id);
/// ```
pub trait Subscribable {
    /// The event type delivered to listeners.
    type Event: 'static;

    /// Returns the bus events are published on.
    fn event_bus(&self) -> &EventBus<Self::Event>;

    /// Subscribes to events emitted under `name`.
    fn on<F>(&self, name: &str, callback: F) -> SubscriptionId
    where
        F: Fn(&Self::Event) + Send + Sync + 'static,
    {
        self.event_bus().on(name, callback)
    }

    /// Subscribes to every event, whatever its name.
    fn on_any<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&Self::Event) + Send + Sync + 'static,
    {
        self.event_bus().on_any(callback)
    }

    /// Unsubscribes a listener by its subscription ID.
    ///
    /// Returns `true` if the subscription was found and removed.
    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.event_bus().off(id)
    }
}
