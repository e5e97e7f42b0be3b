// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! One clock for status, pins and widgets.

use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::{Mutex, MutexGuard};

use crate::clock::Clock;
use crate::config::WatchConfig;
use crate::error::Result;
use crate::pin::PinWatcher;
use crate::status::StatusWatcher;
use crate::widget::{TreeUpdate, WidgetTree};

/// What one tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickReport {
    /// Pins that changed in the pin pass (zero when the pass is disabled).
    pub pins_changed: usize,
    /// Result of the widget pass.
    pub widgets: TreeUpdate,
}

/// Drives a [`StatusWatcher`], a [`PinWatcher`] and a [`WidgetTree`] from a
/// single clock.
///
/// Each tick runs, in order: the status update, the pin pass, then the
/// widget tree. The pin pass runs only while [`WatchConfig::watch_pins`] is
/// set and the pin watcher is enabled (see [`PinWatcher::set_enabled`]).
/// The watchers' own clocks are not used.
///
/// The driver's [`WatchConfig::homing_policy`] is applied to the status
/// watcher it drives.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use halwatch::driver::TickDriver;
/// use halwatch::pin::{MemoryPinStore, PinWatcher};
/// use halwatch::state::Snapshot;
/// use halwatch::status::{SnapshotCell, StatusWatcher};
/// use halwatch::subscription::Subscribable;
///
/// let store = Arc::new(MemoryPinStore::new());
/// let pins = Arc::new(PinWatcher::new(store));
/// pins.set_enabled(true);
/// let status = Arc::new(StatusWatcher::new(SnapshotCell::with_snapshot(Snapshot::new())));
/// status.on("estop", |_| println!("machine in e-stop"));
///
/// let driver = TickDriver::new(pins).with_status(status);
/// driver.tick();
/// ```
pub struct TickDriver {
    status: Option<Arc<StatusWatcher>>,
    pins: Arc<PinWatcher>,
    widgets: Mutex<WidgetTree>,
    config: WatchConfig,
    clock: Clock,
}

impl TickDriver {
    /// Creates a driver with the default configuration, no status watcher
    /// and an empty widget tree.
    #[must_use]
    pub fn new(pins: Arc<PinWatcher>) -> Self {
        Self::with_config(pins, WatchConfig::default())
    }

    /// Creates a driver using `config`.
    #[must_use]
    pub fn with_config(pins: Arc<PinWatcher>, config: WatchConfig) -> Self {
        Self {
            status: None,
            pins,
            widgets: Mutex::new(WidgetTree::new()),
            clock: Clock::new(config.tick_interval()),
            config,
        }
    }

    /// Adds a status watcher and applies the configured homing policy to it.
    #[must_use]
    pub fn with_status(mut self, status: Arc<StatusWatcher>) -> Self {
        let policy = self.config.homing_policy;
        if status.homing_policy() != policy {
            tracing::debug!(?policy, "Applying driver homing policy to status watcher");
            status.set_homing_policy(policy);
        }
        self.status = Some(status);
        self
    }

    /// Replaces the widget tree.
    #[must_use]
    pub fn with_widgets(self, tree: WidgetTree) -> Self {
        *self.widgets.lock() = tree;
        self
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &WatchConfig {
        &self.config
    }

    /// Returns the status watcher, if any.
    #[must_use]
    pub fn status(&self) -> Option<&Arc<StatusWatcher>> {
        self.status.as_ref()
    }

    /// Returns the pin watcher.
    #[must_use]
    pub fn pins(&self) -> &Arc<PinWatcher> {
        &self.pins
    }

    /// Locks the widget tree, e.g. to feed user input to a control.
    ///
    /// Holding the guard blocks the next tick.
    pub fn widgets(&self) -> MutexGuard<'_, WidgetTree> {
        self.widgets.lock()
    }

    /// Runs one tick.
    pub fn tick(&self) -> TickReport {
        if let Some(status) = &self.status {
            status.update();
        }
        let pins_changed = if self.config.watch_pins && self.pins.is_enabled() {
            self.pins.poll()
        } else {
            0
        };
        let widgets = self.widgets.lock().update(self.pins.store().as_ref());
        TickReport {
            pins_changed,
            widgets,
        }
    }

    /// Starts ticking at the configured interval.
    ///
    /// Idempotent: returns `Ok(false)` if already running. The clock holds a
    /// weak reference, so dropping the last `Arc` stops it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoRuntime`](crate::Error::NoRuntime) outside a Tokio
    /// runtime.
    pub fn start(self: &Arc<Self>) -> Result<bool> {
        let driver: Weak<Self> = Arc::downgrade(self);
        let started = self.clock.start(move || {
            driver.upgrade().is_some_and(|d| {
                d.tick();
                true
            })
        })?;
        if started {
            tracing::debug!(
                interval_ms = self.config.tick_interval_ms,
                watch_pins = self.config.watch_pins,
                "Tick driver started"
            );
        }
        Ok(started)
    }

    /// Stops ticking after the current tick. Returns `true` if it was running.
    pub fn stop(&self) -> bool {
        self.clock.stop()
    }

    /// Returns `true` while the driver's clock is running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.clock.is_running()
    }

    /// Returns the number of ticks delivered by the driver's clock.
    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.clock.tick_count()
    }
}

impl fmt::Debug for TickDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TickDriver")
            .field("status", &self.status.is_some())
            .field("pins", &self.pins)
            .field("config", &self.config)
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}
