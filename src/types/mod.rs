// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types shared by the watchers.
//!
//! # Types
//!
//! - [`RunState`] - E-stop / power state of the machine, ordered
//! - [`TaskMode`] - Manual, auto or MDI operation
//! - [`InterpState`] - State of the program interpreter
//! - [`AxisMask`] - Which joint indices are real, enabled axes
//! - [`PinDirection`], [`PinType`], [`PinValue`] - Typed HAL pin scalars

mod axis_mask;
mod machine;
mod pin;

pub use axis_mask::AxisMask;
pub use machine::{InterpState, RunState, TaskMode};
pub use pin::{PinDirection, PinType, PinValue};
