// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Machine status snapshots and change detection.
//!
//! A [`Snapshot`] is one atomic read of the machine status. [`diff`]
//! compares the previous snapshot (if any) with the current one and returns
//! the edge events in the order subscribers see them.
//!
//! # Examples
//!
//! ```
//! use halwatch::event::StatusEvent;
//! use halwatch::state::{HomingPolicy, Snapshot, diff};
//! use halwatch::types::RunState;
//!
//! let before = Snapshot::new().with_run_state(RunState::EstopReset);
//! let after = before.clone().with_run_state(RunState::Off);
//!
//! let events = diff(Some(&before), &after, HomingPolicy::default());
//! assert_eq!(events, vec![StatusEvent::Off]);
//!
//! // Identical snapshots produce nothing
//! assert!(diff(Some(&after), &after, HomingPolicy::default()).is_empty());
//! ```

mod diff;
mod homing;
mod snapshot;

pub use diff::diff;
pub use homing::{HomingPolicy, HomingSummary};
pub use snapshot::Snapshot;
