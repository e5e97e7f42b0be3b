// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Machine status polling.
//!
//! - [`SnapshotSource`] - the boundary to whatever supplies status snapshots
//! - [`SnapshotCell`] - an in-memory source fed by hand
//! - [`StatusWatcher`] - polls a source and publishes [`StatusEvent`]s
//!
//! [`StatusEvent`]: crate::event::StatusEvent

mod source;
mod watcher;

pub use source::{SnapshotCell, SnapshotSource};
pub use watcher::StatusWatcher;
