// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Pin change watcher.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;

use crate::clock::Clock;
use crate::error::{PinError, Result};
use crate::event::{EventBus, PinEvent};
use crate::subscription::{Subscribable, SubscriptionId};
use crate::types::{PinDirection, PinType, PinValue};

use super::{PinHandle, PinStore};

struct Entry {
    handle: PinHandle,
    last: Option<PinValue>,
}

/// Watches registered pins and reports value changes.
///
/// Every pass reads the registered pins in registration order. A pin whose
/// value differs from the previous pass (or that is read for the first
/// time) emits a [`PinEvent`] under the pin's name. A pin that cannot be
/// read is dropped from the registry for good; the pass carries on with the
/// rest.
///
/// # Ticking
///
/// [`poll`](Self::poll) always evaluates. [`update`](Self::update) is the
/// clock callback: it evaluates only while the watcher is enabled and
/// returns the enable flag. [`enable`](Self::enable) starts the watcher's
/// own clock and is idempotent; [`disable`](Self::disable) stops it but
/// keeps the registry. A watcher ticked by a
/// [`TickDriver`](crate::driver::TickDriver) is switched on with
/// [`set_enabled`](Self::set_enabled) instead, which leaves the own clock
/// alone.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicU32, Ordering};
/// use halwatch::pin::{MemoryPinStore, PinWatcher};
/// use halwatch::types::{PinDirection, PinType};
///
/// let store = Arc::new(MemoryPinStore::new());
/// let watcher = PinWatcher::new(store.clone());
/// watcher.new_pin("panel.estop-led", PinDirection::In, PinType::Bit).unwrap();
///
/// let changes = Arc::new(AtomicU32::new(0));
/// let counter = Arc::clone(&changes);
/// watcher.on_value_changed("panel.estop-led", move |_| {
///     counter.fetch_add(1, Ordering::SeqCst);
/// });
///
/// watcher.poll(); // first read counts as a change
/// watcher.poll(); // unchanged
/// store.drive("panel.estop-led", true).unwrap();
/// watcher.poll();
/// assert_eq!(changes.load(Ordering::SeqCst), 2);
/// ```
pub struct PinWatcher {
    store: Arc<dyn PinStore>,
    registry: Mutex<Vec<Entry>>,
    events: EventBus<PinEvent>,
    enabled: AtomicBool,
    clock: Clock,
}

impl PinWatcher {
    /// Creates a disabled watcher over `store` with an empty registry.
    #[must_use]
    pub fn new(store: Arc<dyn PinStore>) -> Self {
        Self {
            store,
            registry: Mutex::new(Vec::new()),
            events: EventBus::new(),
            enabled: AtomicBool::new(false),
            clock: Clock::default(),
        }
    }

    /// Sets the period used by [`enable`](Self::enable).
    #[must_use]
    pub fn with_tick_interval(mut self, period: Duration) -> Self {
        self.clock = Clock::new(period);
        self
    }

    /// Returns the underlying pin store.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn PinStore> {
        &self.store
    }

    /// Adds a pin to the registry.
    ///
    /// The pin is not read until the next pass, so its first read is
    /// reported as a change.
    pub fn register(&self, handle: PinHandle) {
        tracing::debug!(pin = handle.name(), "Pin registered");
        self.registry.lock().push(Entry { handle, last: None });
    }

    /// Creates a pin in the store and registers it.
    ///
    /// # Errors
    ///
    /// Propagates [`PinStore::create_pin`] errors; nothing is registered
    /// on failure.
    pub fn new_pin(
        &self,
        name: impl Into<String>,
        direction: PinDirection,
        pin_type: PinType,
    ) -> std::result::Result<PinHandle, PinError> {
        let handle = PinHandle::create(self.store.as_ref(), name, direction, pin_type)?;
        self.register(handle.clone());
        Ok(handle)
    }

    /// Removes every registry entry for `name`. Returns `true` if any existed.
    pub fn unregister(&self, name: &str) -> bool {
        let mut registry = self.registry.lock();
        let before = registry.len();
        registry.retain(|e| e.handle.name() != name);
        registry.len() != before
    }

    /// Returns the registered pin names in registration order.
    #[must_use]
    pub fn pin_names(&self) -> Vec<String> {
        self.registry
            .lock()
            .iter()
            .map(|e| e.handle.name().to_string())
            .collect()
    }

    /// Returns the number of registered pins.
    #[must_use]
    pub fn len(&self) -> usize {
        self.registry.lock().len()
    }

    /// Returns `true` if no pins are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.registry.lock().is_empty()
    }

    /// Runs one pass over the registry regardless of the enable flag.
    ///
    /// Returns the number of pins that changed.
    pub fn poll(&self) -> usize {
        let changed: Vec<String> = {
            let mut registry = self.registry.lock();
            let mut changed = Vec::new();
            registry.retain_mut(|entry| match entry.handle.read(self.store.as_ref()) {
                Ok(value) => {
                    if entry.last != Some(value) {
                        entry.last = Some(value);
                        changed.push(entry.handle.name().to_string());
                    }
                    true
                }
                Err(e) => {
                    tracing::warn!(
                        pin = entry.handle.name(),
                        error = %e,
                        "Pin read failed, removing it from the watch list"
                    );
                    false
                }
            });
            changed
        };

        // Emit outside the registry lock so listeners may (un)register pins.
        for pin in &changed {
            self.events.emit(pin, &PinEvent::value_changed(pin.as_str()));
        }
        changed.len()
    }

    /// Clock callback: runs a pass if enabled.
    ///
    /// Returns whether the watcher is still enabled.
    pub fn update(&self) -> bool {
        if !self.is_enabled() {
            return false;
        }
        self.poll();
        true
    }

    /// Enables the watcher and starts its own clock.
    ///
    /// Idempotent: returns `Ok(false)` if the clock was already running.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoRuntime`](crate::Error::NoRuntime) outside a Tokio
    /// runtime; the watcher stays disabled.
    pub fn enable(self: &Arc<Self>) -> Result<bool> {
        let was_enabled = self.enabled.swap(true, Ordering::AcqRel);
        let watcher: Weak<Self> = Arc::downgrade(self);
        let started = self
            .clock
            .start(move || watcher.upgrade().is_some_and(|w| w.update()));
        if started.is_err() && !was_enabled {
            self.enabled.store(false, Ordering::Release);
        }
        started
    }

    /// Sets the enable flag without starting or stopping the own clock.
    ///
    /// A running own clock stops at its next tick once the flag is cleared.
    pub fn set_enabled(&self, enabled: bool) {
        let was_enabled = self.enabled.swap(enabled, Ordering::AcqRel);
        if was_enabled != enabled {
            tracing::debug!(enabled, "Pin watcher enable flag changed");
        }
    }

    /// Stops ticking. The registry is kept.
    pub fn disable(&self) {
        self.enabled.store(false, Ordering::Release);
        self.clock.stop();
    }

    /// Returns `true` while the watcher is enabled.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    /// Returns the number of ticks the watcher's own clock has delivered.
    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.clock.tick_count()
    }

    /// Subscribes to changes of one pin; the callback receives the pin name.
    pub fn on_value_changed<F>(&self, name: &str, callback: F) -> SubscriptionId
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.events.on(name, move |event: &PinEvent| callback(&event.pin))
    }
}

impl Subscribable for PinWatcher {
    type Event = PinEvent;

    fn event_bus(&self) -> &EventBus<PinEvent> {
        &self.events
    }
}

impl fmt::Debug for PinWatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PinWatcher")
            .field("pins", &self.pin_names())
            .field("enabled", &self.is_enabled())
            .field("events", &self.events)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pin::MemoryPinStore;

    fn setup() -> (Arc<MemoryPinStore>, PinWatcher) {
        let store = Arc::new(MemoryPinStore::new());
        let watcher = PinWatcher::new(store.clone());
        (store, watcher)
    }

    fn recorder(watcher: &PinWatcher) -> Arc<Mutex<Vec<String>>> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&seen);
        watcher.on_any(move |event| log.lock().push(event.pin.clone()));
        seen
    }

    #[test]
    fn first_read_is_a_change() {
        let (_store, watcher) = setup();
        watcher.new_pin("a.x", PinDirection::In, PinType::Float).unwrap();
        assert_eq!(watcher.poll(), 1);
        assert_eq!(watcher.poll(), 0);
    }

    #[test]
    fn changes_in_registration_order() {
        let (store, watcher) = setup();
        for name in ["p.c", "p.a", "p.b"] {
            watcher.new_pin(name, PinDirection::In, PinType::S32).unwrap();
        }
        watcher.poll();
        let seen = recorder(&watcher);

        store.drive("p.b", 2).unwrap();
        store.drive("p.c", 1).unwrap();
        watcher.poll();
        assert_eq!(*seen.lock(), vec!["p.c", "p.b"]);
    }

    #[test]
    fn failed_pin_is_removed_for_good() {
        let (store, watcher) = setup();
        watcher.new_pin("p.1", PinDirection::In, PinType::Bit).unwrap();
        watcher.new_pin("p.2", PinDirection::In, PinType::Bit).unwrap();
        store.remove_pin("p.2");

        watcher.poll();
        assert_eq!(watcher.pin_names(), vec!["p.1"]);

        store.create_pin("p.2", PinDirection::In, PinType::Bit).unwrap();
        watcher.poll();
        assert_eq!(watcher.len(), 1);
    }

    #[test]
    fn unregister() {
        let (_store, watcher) = setup();
        watcher.new_pin("p.1", PinDirection::Out, PinType::U32).unwrap();
        assert!(watcher.unregister("p.1"));
        assert!(!watcher.unregister("p.1"));
        assert!(watcher.is_empty());
    }

    #[test]
    fn new_pin_failure_registers_nothing() {
        let (store, watcher) = setup();
        store.create_pin("p.1", PinDirection::In, PinType::Bit).unwrap();
        assert!(watcher.new_pin("p.1", PinDirection::In, PinType::Float).is_err());
        assert!(watcher.is_empty());
    }

    #[test]
    fn update_is_gated_by_enable_flag() {
        let (_store, watcher) = setup();
        watcher.new_pin("p.1", PinDirection::In, PinType::Bit).unwrap();
        let seen = recorder(&watcher);
        assert!(!watcher.update());
        assert!(seen.lock().is_empty());
    }

    #[test]
    fn listener_may_register_pins() {
        let store = Arc::new(MemoryPinStore::new());
        let watcher = Arc::new(PinWatcher::new(store.clone()));
        watcher.new_pin("p.1", PinDirection::In, PinType::Bit).unwrap();

        let inner = Arc::downgrade(&watcher);
        watcher.on_value_changed("p.1", move |_| {
            if let Some(w) = inner.upgrade() {
                w.register(PinHandle::new("p.1", PinDirection::In, PinType::Bit));
            }
        });
        watcher.poll();
        assert_eq!(watcher.len(), 2);
    }

    #[test]
    fn on_value_changed_receives_pin_name() {
        let (store, watcher) = setup();
        watcher.new_pin("p.1", PinDirection::In, PinType::Bit).unwrap();
        watcher.new_pin("p.2", PinDirection::In, PinType::Bit).unwrap();
        watcher.poll();

        let seen = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&seen);
        watcher.on_value_changed("p.2", move |pin| log.lock().push(pin.to_string()));

        store.drive("p.1", true).unwrap();
        store.drive("p.2", true).unwrap();
        watcher.poll();
        assert_eq!(*seen.lock(), vec!["p.2"]);
    }

    #[test]
    fn set_enabled_gates_update_without_a_clock() {
        let (_store, watcher) = setup();
        watcher.new_pin("p.1", PinDirection::In, PinType::Bit).unwrap();
        let seen = recorder(&watcher);

        watcher.set_enabled(true);
        assert!(watcher.update());
        assert_eq!(*seen.lock(), vec!["p.1"]);
        assert_eq!(watcher.tick_count(), 0);

        watcher.set_enabled(false);
        assert!(!watcher.update());
    }

    #[test]
    fn enable_without_runtime_stays_disabled() {
        let (_store, watcher) = setup();
        let watcher = Arc::new(watcher);
        assert!(watcher.enable().is_err());
        assert!(!watcher.is_enabled());
    }
}
