// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Watcher configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::clock::DEFAULT_TICK_INTERVAL;
use crate::error::Result;

pub use crate::state::HomingPolicy;

/// Settings shared by the watchers and the tick driver.
///
/// Every field has a default, so a partial JSON document is accepted.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use halwatch::config::{HomingPolicy, WatchConfig};
///
/// // Defaults: 100 ms ticks, count-match homing, pins watched
/// let config = WatchConfig::default();
/// assert_eq!(config.tick_interval(), Duration::from_millis(100));
///
/// // From JSON, missing fields fall back to their defaults
/// let config = WatchConfig::from_json(r#"{"homing_policy": "active_axes"}"#).unwrap();
/// assert_eq!(config.homing_policy, HomingPolicy::ActiveAxes);
/// assert!(config.watch_pins);
///
/// // Builder style
/// let config = WatchConfig::new()
///     .with_tick_interval(Duration::from_millis(50))
///     .with_watch_pins(false);
/// assert_eq!(config.tick_interval_ms, 50);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    /// Tick period in milliseconds.
    pub tick_interval_ms: u64,
    /// How `all-homed` is decided.
    pub homing_policy: HomingPolicy,
    /// Whether the tick driver runs the pin watcher pass.
    pub watch_pins: bool,
}

impl WatchConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a configuration from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`](crate::Error::Config) if the document is
    /// malformed or a field has the wrong type.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serializes the configuration to JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`](crate::Error::Config) if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Sets the tick period. Sub-millisecond precision is dropped.
    #[must_use]
    pub fn with_tick_interval(mut self, period: Duration) -> Self {
        self.tick_interval_ms = u64::try_from(period.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Sets the homing policy.
    #[must_use]
    pub fn with_homing_policy(mut self, policy: HomingPolicy) -> Self {
        self.homing_policy = policy;
        self
    }

    /// Enables or disables the pin watcher pass.
    #[must_use]
    pub fn with_watch_pins(mut self, watch: bool) -> Self {
        self.watch_pins = watch;
        self
    }

    /// Returns the tick period.
    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: u64::try_from(DEFAULT_TICK_INTERVAL.as_millis()).unwrap_or(100),
            homing_policy: HomingPolicy::default(),
            watch_pins: true,
        }
    }
}
