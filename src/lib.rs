// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `halwatch` - change detection and event dispatch for machine control
//! panels.
//!
//! The library polls two kinds of state at a fixed rate and turns changes
//! into named events:
//!
//! - **Machine status**: a [`StatusWatcher`] reads a [`Snapshot`] from a
//!   [`SnapshotSource`] each tick, compares it with the previous one and
//!   emits edge events such as `estop`, `mode-auto`, `all-homed` or
//!   `line-changed`.
//! - **HAL pins**: a [`PinWatcher`] keeps a registry of pins in a
//!   [`PinStore`] and emits an event named after each pin whose value
//!   changed.
//!
//! On top of the pin layer sit headless [widgets](widget) bound to pins and
//! a [`TickDriver`] that runs status, pins and widgets from one clock.
//!
//! # Quick Start
//!
//! ## Status events
//!
//! ```
//! use halwatch::{Snapshot, SnapshotCell, StatusWatcher, Subscribable};
//! use halwatch::types::{RunState, TaskMode};
//!
//! let cell = SnapshotCell::with_snapshot(Snapshot::new());
//! let watcher = StatusWatcher::new(cell.clone());
//!
//! watcher.on("mode-auto", |_| println!("running a program"));
//! watcher.on_line_changed(|line| println!("line {line}"));
//!
//! watcher.update();
//! cell.modify(|s| {
//!     s.run_state = RunState::On;
//!     s.mode = TaskMode::Auto;
//! });
//! watcher.update();
//! ```
//!
//! ## Pin events
//!
//! ```
//! use std::sync::Arc;
//! use halwatch::{MemoryPinStore, PinWatcher, Subscribable};
//! use halwatch::types::{PinDirection, PinType};
//!
//! let store = Arc::new(MemoryPinStore::new());
//! let pins = PinWatcher::new(store.clone());
//!
//! pins.new_pin("spindle.at-speed", PinDirection::In, PinType::Bit).unwrap();
//! pins.on("spindle.at-speed", |event| println!("{event:?}"));
//!
//! store.drive("spindle.at-speed", true).unwrap();
//! assert_eq!(pins.poll(), 1);
//! ```
//!
//! ## Driving everything from one clock
//!
//! ```no_run
//! use std::sync::Arc;
//! use halwatch::{MemoryPinStore, PinWatcher, SnapshotCell, StatusWatcher, TickDriver, WatchConfig};
//!
//! #[tokio::main]
//! async fn main() -> halwatch::Result<()> {
//!     let config = WatchConfig::from_json(r#"{ "tick_interval_ms": 50 }"#)?;
//!     let pins = Arc::new(PinWatcher::new(Arc::new(MemoryPinStore::new())));
//!     pins.set_enabled(true);
//!     let status = Arc::new(StatusWatcher::new(SnapshotCell::new()));
//!
//!     let driver = Arc::new(TickDriver::with_config(pins, config).with_status(status));
//!     driver.start()?;
//!     tokio::time::sleep(std::time::Duration::from_secs(1)).await;
//!     driver.stop();
//!     Ok(())
//! }
//! ```

pub mod clock;
pub mod config;
pub mod driver;
pub mod error;
pub mod event;
pub mod pin;
pub mod state;
pub mod status;
pub mod subscription;
pub mod types;
pub mod widget;

pub use clock::Clock;
pub use config::WatchConfig;
pub use driver::{TickDriver, TickReport};
pub use error::{Error, PinError, Result, SourceError, ValueError};
pub use event::{EventBus, PinEvent, StatusEvent};
pub use pin::{MemoryPinStore, PinHandle, PinStore, PinWatcher};
pub use state::{HomingPolicy, Snapshot};
pub use status::{SnapshotCell, SnapshotSource, StatusWatcher};
pub use subscription::{Subscribable, SubscriptionId};
pub use widget::{BoundWidget, WidgetTree};
