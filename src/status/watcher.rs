// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Machine status watcher.

use std::fmt;
use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;

use crate::clock::Clock;
use crate::config::WatchConfig;
use crate::error::Result;
use crate::event::{EventBus, StatusEvent};
use crate::state::{HomingPolicy, Snapshot, diff};
use crate::subscription::{Subscribable, SubscriptionId};

use super::SnapshotSource;

/// Polls a [`SnapshotSource`] and publishes status edge events.
///
/// Each [`update`](Self::update) polls once, caches the new snapshot, and
/// emits the events computed by [`diff`] in order. A failed poll leaves the
/// cache untouched and emits nothing.
///
/// The watcher can be ticked by hand, by a [`TickDriver`], or by its own
/// clock through [`start`](Self::start).
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use parking_lot::Mutex;
/// use halwatch::state::Snapshot;
/// use halwatch::status::{SnapshotCell, StatusWatcher};
/// use halwatch::subscription::Subscribable;
/// use halwatch::types::RunState;
///
/// let cell = SnapshotCell::with_snapshot(Snapshot::new().with_run_state(RunState::Off));
/// let watcher = StatusWatcher::new(cell.clone());
///
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// let log = Arc::clone(&seen);
/// watcher.on_any(move |event| log.lock().push(event.name()));
///
/// watcher.update();
/// seen.lock().clear();
///
/// cell.modify(|s| s.run_state = RunState::On);
/// watcher.update();
/// assert_eq!(seen.lock()[0], "on");
/// ```
///
/// [`TickDriver`]: crate::driver::TickDriver
pub struct StatusWatcher {
    source: Mutex<Box<dyn SnapshotSource>>,
    cache: Mutex<Option<Snapshot>>,
    events: EventBus<StatusEvent>,
    policy: Mutex<HomingPolicy>,
    clock: Clock,
}

impl StatusWatcher {
    /// Creates a watcher with the default configuration.
    #[must_use]
    pub fn new<S>(source: S) -> Self
    where
        S: SnapshotSource + 'static,
    {
        Self::with_config(source, &WatchConfig::default())
    }

    /// Creates a watcher using the homing policy and tick interval in `config`.
    #[must_use]
    pub fn with_config<S>(source: S, config: &WatchConfig) -> Self
    where
        S: SnapshotSource + 'static,
    {
        Self {
            source: Mutex::new(Box::new(source)),
            cache: Mutex::new(None),
            events: EventBus::new(),
            policy: Mutex::new(config.homing_policy),
            clock: Clock::new(config.tick_interval()),
        }
    }

    /// Sets the homing policy.
    #[must_use]
    pub fn with_homing_policy(mut self, policy: HomingPolicy) -> Self {
        *self.policy.get_mut() = policy;
        self
    }

    /// Replaces the homing policy of a shared watcher.
    ///
    /// Takes effect on the next [`update`](Self::update).
    pub fn set_homing_policy(&self, policy: HomingPolicy) {
        *self.policy.lock() = policy;
    }

    /// Sets the period used by [`start`](Self::start).
    #[must_use]
    pub fn with_tick_interval(mut self, period: Duration) -> Self {
        self.clock = Clock::new(period);
        self
    }

    /// Returns the homing policy.
    #[must_use]
    pub fn homing_policy(&self) -> HomingPolicy {
        *self.policy.lock()
    }

    /// Returns the last successfully polled snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Option<Snapshot> {
        self.cache.lock().clone()
    }

    /// Polls once and emits the resulting events.
    ///
    /// Always returns `true`: a failed poll is retried on the next tick.
    pub fn update(&self) -> bool {
        let polled = self.source.lock().poll();
        let current = match polled {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::trace!(error = %e, "Status poll failed, skipping tick");
                return true;
            }
        };

        // Cache before emitting so listeners reading the watcher see `current`.
        let previous = self.cache.lock().replace(current.clone());
        let events = diff(previous.as_ref(), &current, self.homing_policy());
        for event in &events {
            self.events.emit(event.name(), event);
        }
        true
    }

    /// Emits `reload-display`.
    pub fn request_reload(&self) {
        let event = StatusEvent::ReloadDisplay;
        self.events.emit(event.name(), &event);
    }

    /// Starts polling on the watcher's own clock.
    ///
    /// Idempotent: returns `Ok(false)` if already running. The clock holds
    /// only a weak reference, so dropping the last `Arc` stops it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoRuntime`](crate::Error::NoRuntime) outside a Tokio
    /// runtime.
    pub fn start(self: &Arc<Self>) -> Result<bool> {
        let watcher: Weak<Self> = Arc::downgrade(self);
        self.clock
            .start(move || watcher.upgrade().is_some_and(|w| w.update()))
    }

    /// Stops the watcher's own clock. Returns `true` if it was running.
    pub fn stop(&self) -> bool {
        self.clock.stop()
    }

    /// Returns `true` while the watcher's own clock is running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.clock.is_running()
    }

    /// Subscribes to `homed` with the list of homed joints.
    pub fn on_homed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&[usize]) + Send + Sync + 'static,
    {
        self.events.on("homed", move |event| {
            if let StatusEvent::Homed(joints) = event {
                callback(joints);
            }
        })
    }

    /// Subscribes to `not-all-homed` with the list of unhomed active axes.
    pub fn on_not_all_homed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&[usize]) + Send + Sync + 'static,
    {
        self.events.on("not-all-homed", move |event| {
            if let StatusEvent::NotAllHomed(joints) = event {
                callback(joints);
            }
        })
    }

    /// Subscribes to `file-loaded` with the new program path.
    pub fn on_file_loaded<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(Option<&str>) + Send + Sync + 'static,
    {
        self.events.on("file-loaded", move |event| {
            if let StatusEvent::FileLoaded(path) = event {
                callback(path.as_deref());
            }
        })
    }

    /// Subscribes to `line-changed` with the new line number.
    pub fn on_line_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(i32) + Send + Sync + 'static,
    {
        self.events.on("line-changed", move |event| {
            if let StatusEvent::LineChanged(line) = event {
                callback(*line);
            }
        })
    }

    /// Subscribes to `tool-changed` with the new tool number.
    pub fn on_tool_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(i32) + Send + Sync + 'static,
    {
        self.events.on("tool-changed", move |event| {
            if let StatusEvent::ToolChanged(tool) = event {
                callback(*tool);
            }
        })
    }
}

impl Subscribable for StatusWatcher {
    type Event = StatusEvent;

    fn event_bus(&self) -> &EventBus<StatusEvent> {
        &self.events
    }
}

impl fmt::Debug for StatusWatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatusWatcher")
            .field("policy", &self.homing_policy())
            .field("cached", &self.cache.lock().is_some())
            .field("events", &self.events)
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::SnapshotCell;
    use crate::types::{AxisMask, RunState};

    fn recorder(watcher: &StatusWatcher) -> Arc<Mutex<Vec<StatusEvent>>> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&seen);
        watcher.on_any(move |event| log.lock().push(event.clone()));
        seen
    }

    #[test]
    fn failed_poll_keeps_cache_and_emits_nothing() {
        let cell = SnapshotCell::new();
        let watcher = StatusWatcher::new(cell.clone());
        let seen = recorder(&watcher);

        assert!(watcher.update());
        assert!(seen.lock().is_empty());
        assert!(watcher.snapshot().is_none());

        cell.set(Snapshot::new());
        watcher.update();
        let bootstrap = seen.lock().len();
        assert!(bootstrap > 0);

        cell.fail("nml gone");
        assert!(watcher.update());
        assert_eq!(seen.lock().len(), bootstrap);
        assert_eq!(watcher.snapshot(), Some(Snapshot::new()));
    }

    #[test]
    fn listener_sees_new_snapshot() {
        let cell = SnapshotCell::with_snapshot(Snapshot::new());
        let watcher = Arc::new(StatusWatcher::new(cell.clone()));
        watcher.update();

        let observed = Arc::new(Mutex::new(None));
        {
            let inner = Arc::downgrade(&watcher);
            let observed = Arc::clone(&observed);
            watcher.on("line-changed", move |_| {
                if let Some(w) = inner.upgrade() {
                    *observed.lock() = w.snapshot().map(|s| s.current_line);
                }
            });
        }

        cell.modify(|s| s.current_line = 40);
        watcher.update();
        assert_eq!(*observed.lock(), Some(40));
    }

    #[test]
    fn typed_helpers_receive_payloads() {
        let cell = SnapshotCell::with_snapshot(
            Snapshot::new()
                .with_homed(vec![false, false])
                .with_axis_mask(AxisMask::new(0b11)),
        );
        let watcher = StatusWatcher::new(cell.clone());
        watcher.update();

        let homed = Arc::new(Mutex::new(Vec::new()));
        let h = Arc::clone(&homed);
        watcher.on_homed(move |joints| h.lock().extend_from_slice(joints));
        let tool = Arc::new(Mutex::new(0));
        let t = Arc::clone(&tool);
        watcher.on_tool_changed(move |n| *t.lock() = n);
        let file = Arc::new(Mutex::new(None));
        let f = Arc::clone(&file);
        watcher.on_file_loaded(move |path| *f.lock() = path.map(str::to_string));

        cell.modify(|s| {
            s.homed = vec![true, false];
            s.active_tool = 4;
            s.loaded_file = Some("a.ngc".to_string());
        });
        watcher.update();

        assert_eq!(*homed.lock(), vec![0]);
        assert_eq!(*tool.lock(), 4);
        assert_eq!(file.lock().as_deref(), Some("a.ngc"));
    }

    #[test]
    fn request_reload_emits_reload_display() {
        let watcher = StatusWatcher::new(SnapshotCell::new());
        let seen = recorder(&watcher);
        watcher.request_reload();
        assert_eq!(*seen.lock(), vec![StatusEvent::ReloadDisplay]);
    }

    #[test]
    fn policy_from_config() {
        let config = WatchConfig::default().with_homing_policy(HomingPolicy::ActiveAxes);
        let watcher = StatusWatcher::with_config(SnapshotCell::new(), &config);
        assert_eq!(watcher.homing_policy(), HomingPolicy::ActiveAxes);

        watcher.set_homing_policy(HomingPolicy::CountMatch);
        assert_eq!(watcher.homing_policy(), HomingPolicy::CountMatch);
    }

    #[test]
    fn power_cycle_sequence() {
        let cell = SnapshotCell::with_snapshot(Snapshot::new().with_run_state(RunState::Off));
        let watcher = StatusWatcher::new(cell.clone());
        watcher.update();
        let seen = recorder(&watcher);

        cell.modify(|s| s.run_state = RunState::On);
        watcher.update();
        cell.modify(|s| s.run_state = RunState::Off);
        watcher.update();

        let names: Vec<_> = seen.lock().iter().map(StatusEvent::name).collect();
        assert_eq!(
            names,
            vec!["on", "mode-manual", "interp-run", "interp-idle", "off"]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn own_clock_polls_until_stopped() {
        let cell = SnapshotCell::with_snapshot(Snapshot::new());
        let watcher = Arc::new(
            StatusWatcher::new(cell.clone()).with_tick_interval(Duration::from_millis(50)),
        );
        let lines = Arc::new(Mutex::new(Vec::new()));
        let l = Arc::clone(&lines);
        watcher.on_line_changed(move |n| l.lock().push(n));

        assert!(watcher.start().unwrap());
        assert!(!watcher.start().unwrap());

        tokio::time::sleep(Duration::from_millis(75)).await;
        cell.modify(|s| s.current_line = 9);
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert!(watcher.stop());
        cell.modify(|s| s.current_line = 10);
        tokio::time::sleep(Duration::from_millis(200)).await;

        assert_eq!(*lines.lock(), vec![0, 9]);
    }
}
