// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Homing aggregation.

use serde::{Deserialize, Serialize};

use crate::event::StatusEvent;
use crate::types::AxisMask;

/// How the "all homed" condition is decided.
///
/// # Count matching
///
/// [`HomingPolicy::CountMatch`] compares the number of homed joints with the
/// number of active axes. A joint that is homed but not in the axis mask
/// still counts as homed, so with mask `0b0111` and homed flags
/// `[true, true, false, true]` three joints are homed, three axes are
/// active, and `all-homed` fires although axis 2 is not homed. This is the
/// long-standing behavior and remains the default.
///
/// [`HomingPolicy::ActiveAxes`] only reports `all-homed` when every active
/// axis is homed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HomingPolicy {
    /// `all-homed` iff homed count equals active axis count.
    #[default]
    CountMatch,
    /// `all-homed` iff no active axis is unhomed.
    ActiveAxes,
}

/// Result of scanning the homed flags against the axis mask.
///
/// # Examples
///
/// ```
/// use halwatch::state::HomingSummary;
/// use halwatch::types::AxisMask;
///
/// let summary = HomingSummary::scan(&[true, true, false, true], AxisMask::new(0b0111));
/// assert_eq!(summary.homed, vec![0, 1, 3]);
/// assert_eq!(summary.unhomed, vec![2]);
/// assert_eq!(summary.active_axes, 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HomingSummary {
    /// Indices of homed joints, regardless of the axis mask.
    pub homed: Vec<usize>,
    /// Indices of active axes that are not homed.
    pub unhomed: Vec<usize>,
    /// Number of active axes among the scanned joints.
    pub active_axes: usize,
}

impl HomingSummary {
    /// Scans joint indices `0..homed.len()`.
    #[must_use]
    pub fn scan(homed: &[bool], axis_mask: AxisMask) -> Self {
        let mut summary = Self::default();
        for (index, &is_homed) in homed.iter().enumerate() {
            if is_homed {
                summary.homed.push(index);
            }
            if !axis_mask.contains(index) {
                continue;
            }
            summary.active_axes += 1;
            if !is_homed {
                summary.unhomed.push(index);
            }
        }
        summary
    }

    /// Returns `true` if the machine counts as fully homed under `policy`.
    #[must_use]
    pub fn all_homed(&self, policy: HomingPolicy) -> bool {
        match policy {
            HomingPolicy::CountMatch => self.homed.len() == self.active_axes,
            HomingPolicy::ActiveAxes => self.unhomed.is_empty(),
        }
    }

    /// Returns the homing events: `homed` when any joint is homed, then
    /// `all-homed` or `not-all-homed`.
    #[must_use]
    pub fn events(&self, policy: HomingPolicy) -> Vec<StatusEvent> {
        let mut events = Vec::with_capacity(2);
        if !self.homed.is_empty() {
            events.push(StatusEvent::Homed(self.homed.clone()));
        }
        if self.all_homed(policy) {
            events.push(StatusEvent::AllHomed);
        } else {
            events.push(StatusEvent::NotAllHomed(self.unhomed.clone()));
        }
        events
    }
}
