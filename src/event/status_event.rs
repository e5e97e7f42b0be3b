// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Machine status events.

use serde::{Deserialize, Serialize};

use crate::types::{InterpState, RunState, TaskMode};

/// An edge event emitted by the [`StatusWatcher`](crate::status::StatusWatcher).
///
/// Every variant maps to a fixed event name (see [`StatusEvent::name`]);
/// subscribers bind to that name on the watcher's bus.
///
/// # Examples
///
/// ```
/// use halwatch::event::StatusEvent;
/// use halwatch::types::RunState;
///
/// assert_eq!(StatusEvent::from(RunState::EstopReset).name(), "estop-reset");
/// assert_eq!(StatusEvent::Homed(vec![0, 1]).name(), "homed");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload", rename_all = "kebab-case")]
pub enum StatusEvent {
    /// Emergency stop became active.
    Estop,
    /// Emergency stop was reset.
    EstopReset,
    /// Machine power turned on.
    On,
    /// Machine power turned off.
    Off,

    /// Switched to manual mode.
    ModeManual,
    /// Switched to auto mode.
    ModeAuto,
    /// Switched to MDI mode.
    ModeMdi,

    /// The interpreter left the idle state.
    InterpRun,
    /// The interpreter became idle.
    InterpIdle,
    /// The interpreter is reading.
    InterpReading,
    /// The interpreter is paused.
    InterpPaused,
    /// The interpreter is waiting.
    InterpWaiting,

    /// Joints that are homed, in index order.
    Homed(Vec<usize>),
    /// Every active axis is homed.
    AllHomed,
    /// Active axes that are not homed, in index order.
    NotAllHomed(Vec<usize>),

    /// A different program file was loaded (or unloaded).
    FileLoaded(Option<String>),
    /// The currently executing line changed.
    LineChanged(i32),
    /// The tool in the spindle changed.
    ToolChanged(i32),

    /// Displays should reload; only emitted on request.
    ReloadDisplay,
}

impl StatusEvent {
    /// Returns the event name subscribers bind to.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Estop => "estop",
            Self::EstopReset => "estop-reset",
            Self::On => "on",
            Self::Off => "off",
            Self::ModeManual => "mode-manual",
            Self::ModeAuto => "mode-auto",
            Self::ModeMdi => "mode-mdi",
            Self::InterpRun => "interp-run",
            Self::InterpIdle => "interp-idle",
            Self::InterpReading => "interp-reading",
            Self::InterpPaused => "interp-paused",
            Self::InterpWaiting => "interp-waiting",
            Self::Homed(_) => "homed",
            Self::AllHomed => "all-homed",
            Self::NotAllHomed(_) => "not-all-homed",
            Self::FileLoaded(_) => "file-loaded",
            Self::LineChanged(_) => "line-changed",
            Self::ToolChanged(_) => "tool-changed",
            Self::ReloadDisplay => "reload-display",
        }
    }

    /// Returns `true` for the run-state events.
    #[must_use]
    pub fn is_run_state(&self) -> bool {
        matches!(self, Self::Estop | Self::EstopReset | Self::On | Self::Off)
    }

    /// Returns `true` for the homing events.
    #[must_use]
    pub fn is_homing(&self) -> bool {
        matches!(self, Self::Homed(_) | Self::AllHomed | Self::NotAllHomed(_))
    }
}

impl From<RunState> for StatusEvent {
    fn from(state: RunState) -> Self {
        match state {
            RunState::Estop => Self::Estop,
            RunState::EstopReset => Self::EstopReset,
            RunState::Off => Self::Off,
            RunState::On => Self::On,
        }
    }
}

impl From<TaskMode> for StatusEvent {
    fn from(mode: TaskMode) -> Self {
        match mode {
            TaskMode::Manual => Self::ModeManual,
            TaskMode::Auto => Self::ModeAuto,
            TaskMode::Mdi => Self::ModeMdi,
        }
    }
}

impl From<InterpState> for StatusEvent {
    fn from(state: InterpState) -> Self {
        match state {
            InterpState::Idle => Self::InterpIdle,
            InterpState::Reading => Self::InterpReading,
            InterpState::Paused => Self::InterpPaused,
            InterpState::Waiting => Self::InterpWaiting,
        }
    }
}
