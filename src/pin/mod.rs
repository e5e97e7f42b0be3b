// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HAL pins: the store boundary, typed handles and the change watcher.
//!
//! # Naming
//!
//! Pin names are dotted identifiers (`pyvcp.spindle.at-speed`). A widget's
//! optional enable companion is a separate bit pin named `<base>.disable`.

mod handle;
mod store;
mod watcher;

pub use handle::PinHandle;
pub use store::{MemoryPinStore, PinStore, is_valid_pin_name};
pub use watcher::PinWatcher;
