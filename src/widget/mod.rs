// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Pin-bound widgets.
//!
//! These are headless models of control-panel elements: they hold the
//! state a toolkit would display and read or write their pins once per
//! tick. Rendering is left to the embedding toolkit.
//!
//! - [`BoundWidget`] - the per-tick update contract
//! - [`PinAccessor`] - pin access during one tree update
//! - [`PinBinder`] - pin creation and automatic naming at construction
//! - [`registry`] - the static tag-to-constructor table
//! - [`WidgetTree`] - ordered traversal of bound widgets
//!
//! # Examples
//!
//! ```
//! use halwatch::pin::{MemoryPinStore, PinStore};
//! use halwatch::types::PinValue;
//! use halwatch::widget::controls::CheckButton;
//! use halwatch::widget::{PinBinder, WidgetProps, WidgetTree};
//!
//! let store = MemoryPinStore::new();
//! let mut binder = PinBinder::new(&store);
//! let mut tree = WidgetTree::new();
//!
//! let coolant = tree
//!     .add_element(None, "checkbutton", &mut binder, &WidgetProps::new().with_halpin("coolant"))
//!     .unwrap();
//!
//! tree.get_mut::<CheckButton>(coolant).unwrap().toggle();
//! tree.update(&store);
//! assert_eq!(store.read("coolant").unwrap(), PinValue::Bit(true));
//! ```

use std::any::Any;

use crate::error::Result;
use crate::pin::PinHandle;

mod accessor;
mod binder;
pub mod controls;
mod format;
pub mod indicators;
mod props;
pub mod registry;
mod tree;

pub use accessor::PinAccessor;
pub use binder::PinBinder;
pub use format::{Conversion, NumberFormat};
pub use props::WidgetProps;
pub use tree::{TreeUpdate, WidgetId, WidgetTree};

/// A UI element bound to pins.
///
/// `update` is called once per tick. Indicators read their pins and refresh
/// their displayed state; controls write pins to reflect user interaction
/// since the last tick.
pub trait BoundWidget: Any + Send {
    /// Element tag, as listed in the [`registry`].
    fn kind(&self) -> &'static str;

    /// Synchronizes the element with its pins.
    ///
    /// # Errors
    ///
    /// Returns an error if a pin cannot be read or written. The tree logs
    /// the error and moves on to the next element.
    fn update(&mut self, pins: &PinAccessor<'_>) -> Result<()>;

    /// Returns the pins this element created.
    fn pins(&self) -> Vec<&PinHandle> {
        Vec::new()
    }
}
