// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Machine status snapshot.

use serde::{Deserialize, Serialize};

use crate::types::{AxisMask, InterpState, RunState, TaskMode};

/// One atomic read of the machine status.
///
/// All fields come from the same poll; the watcher never mixes fields from
/// two ticks. Snapshots are transient: the watcher keeps only the last one.
///
/// # Examples
///
/// ```
/// use halwatch::state::Snapshot;
/// use halwatch::types::{AxisMask, RunState};
///
/// let snapshot = Snapshot::new()
///     .with_run_state(RunState::On)
///     .with_homed(vec![true, false, false])
///     .with_axis_mask(AxisMask::new(0b111))
///     .with_loaded_file("/home/cnc/part.ngc");
///
/// assert_eq!(snapshot.joint_count(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// E-stop / power state.
    pub run_state: RunState,
    /// Operating mode.
    pub mode: TaskMode,
    /// Interpreter state.
    pub interp_state: InterpState,
    /// Homed flag per joint, index-addressed.
    pub homed: Vec<bool>,
    /// Joints that are real, enabled axes.
    pub axis_mask: AxisMask,
    /// Path of the loaded program, if any.
    pub loaded_file: Option<String>,
    /// Line currently executing.
    pub current_line: i32,
    /// Tool number in the spindle.
    pub active_tool: i32,
}

impl Snapshot {
    /// Creates a snapshot of an idle machine in e-stop with no joints.
    #[must_use]
    pub fn new() -> Self {
        Self {
            run_state: RunState::Estop,
            mode: TaskMode::Manual,
            interp_state: InterpState::Idle,
            homed: Vec::new(),
            axis_mask: AxisMask::NONE,
            loaded_file: None,
            current_line: 0,
            active_tool: 0,
        }
    }

    /// Sets the run state.
    #[must_use]
    pub fn with_run_state(mut self, run_state: RunState) -> Self {
        self.run_state = run_state;
        self
    }

    /// Sets the task mode.
    #[must_use]
    pub fn with_mode(mut self, mode: TaskMode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the interpreter state.
    #[must_use]
    pub fn with_interp_state(mut self, interp_state: InterpState) -> Self {
        self.interp_state = interp_state;
        self
    }

    /// Sets the per-joint homed flags.
    #[must_use]
    pub fn with_homed(mut self, homed: Vec<bool>) -> Self {
        self.homed = homed;
        self
    }

    /// Sets the axis mask.
    #[must_use]
    pub fn with_axis_mask(mut self, axis_mask: impl Into<AxisMask>) -> Self {
        self.axis_mask = axis_mask.into();
        self
    }

    /// Sets the loaded program path.
    #[must_use]
    pub fn with_loaded_file(mut self, path: impl Into<String>) -> Self {
        self.loaded_file = Some(path.into());
        self
    }

    /// Clears the loaded program path.
    #[must_use]
    pub fn without_loaded_file(mut self) -> Self {
        self.loaded_file = None;
        self
    }

    /// Sets the current line.
    #[must_use]
    pub fn with_current_line(mut self, line: i32) -> Self {
        self.current_line = line;
        self
    }

    /// Sets the active tool.
    #[must_use]
    pub fn with_active_tool(mut self, tool: i32) -> Self {
        self.active_tool = tool;
        self
    }

    /// Returns the number of joints reported in the homed flags.
    #[must_use]
    pub fn joint_count(&self) -> usize {
        self.homed.len()
    }

    /// Returns `true` if joint `index` is homed.
    #[must_use]
    pub fn is_homed(&self, index: usize) -> bool {
        self.homed.get(index).copied().unwrap_or(false)
    }
}

impl Default for Snapshot {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_snapshot() {
        let s = Snapshot::default();
        assert_eq!(s.run_state, RunState::Estop);
        assert_eq!(s.joint_count(), 0);
        assert!(s.loaded_file.is_none());
    }

    #[test]
    fn builder_sets_fields() {
        let s = Snapshot::new()
            .with_mode(TaskMode::Auto)
            .with_interp_state(InterpState::Reading)
            .with_current_line(12)
            .with_active_tool(3)
            .with_loaded_file("a.ngc")
            .without_loaded_file();
        assert_eq!(s.mode, TaskMode::Auto);
        assert_eq!(s.interp_state, InterpState::Reading);
        assert_eq!(s.current_line, 12);
        assert_eq!(s.active_tool, 3);
        assert!(s.loaded_file.is_none());
    }

    #[test]
    fn is_homed_out_of_range() {
        let s = Snapshot::new().with_homed(vec![true]);
        assert!(s.is_homed(0));
        assert!(!s.is_homed(5));
    }
}
