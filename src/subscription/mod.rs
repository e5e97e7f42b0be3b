// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Subscription handles for watcher events.
//!
//! # Overview
//!
//! - [`SubscriptionId`] - A unique identifier for a subscription, used to unsubscribe
//! - [`Subscribable`] - Trait for watchers that publish events on an [`EventBus`]
//!
//! # Usage
//!
//! ```
//! use halwatch::status::{SnapshotCell, StatusWatcher};
//! use halwatch::subscription::Subscribable;
//!
//! let watcher = StatusWatcher::new(SnapshotCell::new());
//!
//! let sub_id = watcher.on("all-homed", |_event| {
//!     println!("machine is homed");
//! });
//!
//! // Later, unsubscribe
//! assert!(watcher.unsubscribe(sub_id));
//! ```
//!
//! [`EventBus`]: crate::event::EventBus

mod id;
mod subscribable;

pub use id::SubscriptionId;
pub use subscribable::Subscribable;
