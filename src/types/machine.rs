// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Machine state enums reported by the status source.
//!
//! Each enum converts from the raw integer code used by the motion
//! controller's status channel, so a [`SnapshotSource`] backed by a real
//! controller can map its fields without extra tables.
//!
//! [`SnapshotSource`]: crate::status::SnapshotSource

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValueError;

/// E-stop and machine power state.
///
/// The variants are ordered: `Estop < EstopReset < Off < On`. The status
/// watcher relies on this ordering ("was on, is now below on").
///
/// # Examples
///
/// ```
/// use halwatch::types::RunState;
///
/// assert!(RunState::Estop < RunState::EstopReset);
/// assert!(RunState::Off < RunState::On);
/// assert_eq!(RunState::try_from(4).unwrap(), RunState::On);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    /// Emergency stop is active.
    Estop,
    /// Emergency stop has been reset, machine power is off.
    EstopReset,
    /// Machine power is off.
    Off,
    /// Machine power is on.
    On,
}

impl RunState {
    /// Returns the raw status code.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::Estop => 1,
            Self::EstopReset => 2,
            Self::Off => 3,
            Self::On => 4,
        }
    }

    /// Returns the lowercase name used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Estop => "estop",
            Self::EstopReset => "estop-reset",
            Self::Off => "off",
            Self::On => "on",
        }
    }
}

impl TryFrom<i32> for RunState {
    type Error = ValueError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(Self::Estop),
            2 => Ok(Self::EstopReset),
            3 => Ok(Self::Off),
            4 => Ok(Self::On),
            other => Err(ValueError::InvalidRunState(other)),
        }
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operating mode of the task controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskMode {
    /// Jogging and manual control.
    Manual,
    /// Running a loaded program.
    Auto,
    /// Manual data input.
    Mdi,
}

impl TaskMode {
    /// Returns the raw status code.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::Manual => 1,
            Self::Auto => 2,
            Self::Mdi => 3,
        }
    }
}

impl TryFrom<i32> for TaskMode {
    type Error = ValueError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(Self::Manual),
            2 => Ok(Self::Auto),
            3 => Ok(Self::Mdi),
            other => Err(ValueError::InvalidTaskMode(other)),
        }
    }
}

/// State of the program interpreter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterpState {
    /// Not executing anything.
    Idle,
    /// Reading ahead through the program.
    Reading,
    /// Execution is paused.
    Paused,
    /// Waiting for motion or I/O to complete.
    Waiting,
}

impl InterpState {
    /// Returns the raw status code.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::Idle => 1,
            Self::Reading => 2,
            Self::Paused => 3,
            Self::Waiting => 4,
        }
    }
}

impl TryFrom<i32> for InterpState {
    type Error = ValueError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(Self::Idle),
            2 => Ok(Self::Reading),
            3 => Ok(Self::Paused),
            4 => Ok(Self::Waiting),
            other => Err(ValueError::InvalidInterpState(other)),
        }
    }
}
