// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Widget tree and its per-tick traversal.

use std::any::Any;
use std::fmt;

use crate::error::{Error, Result};
use crate::pin::PinStore;

use super::{BoundWidget, PinAccessor, PinBinder, WidgetProps, registry};

/// Identifies a widget within one [`WidgetTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WidgetId(usize);

impl WidgetId {
    /// Returns the position of the widget in construction order.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

struct Node {
    widget: Box<dyn BoundWidget>,
    children: Vec<WidgetId>,
}

/// Outcome of one [`WidgetTree::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TreeUpdate {
    /// Widgets that updated successfully.
    pub updated: usize,
    /// Widgets whose update failed.
    pub failed: usize,
}

/// An ordered forest of bound widgets.
///
/// [`update`](Self::update) visits every widget exactly once, depth-first,
/// roots and children in the order they were added. All widgets share one
/// [`PinAccessor`], so they see the same pin values. A widget that fails is
/// logged and skipped; the others still update.
///
/// # Examples
///
/// ```
/// use halwatch::pin::MemoryPinStore;
/// use halwatch::widget::{PinBinder, WidgetProps, WidgetTree};
/// use halwatch::widget::indicators::{Led, LedState};
///
/// let store = MemoryPinStore::new();
/// let mut binder = PinBinder::new(&store);
/// let mut tree = WidgetTree::new();
///
/// let panel = tree.add_element(None, "vbox", &mut binder, &WidgetProps::new()).unwrap();
/// let led = tree
///     .add_element(Some(panel), "led", &mut binder, &WidgetProps::new().with_halpin("estop"))
///     .unwrap();
///
/// store.drive("estop", true).unwrap();
/// let result = tree.update(&store);
/// assert_eq!(result.updated, 2);
/// assert_eq!(tree.get::<Led>(led).unwrap().state(), LedState::On);
/// ```
#[derive(Default)]
pub struct WidgetTree {
    nodes: Vec<Node>,
    roots: Vec<WidgetId>,
}

impl WidgetTree {
    /// Creates an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a top-level widget.
    pub fn add_root(&mut self, widget: Box<dyn BoundWidget>) -> WidgetId {
        let id = self.push(widget);
        self.roots.push(id);
        id
    }

    /// Adds a widget under `parent`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoSuchWidget`] if `parent` is not in this tree.
    pub fn add_child(&mut self, parent: WidgetId, widget: Box<dyn BoundWidget>) -> Result<WidgetId> {
        if parent.0 >= self.nodes.len() {
            return Err(Error::NoSuchWidget(parent.0));
        }
        let id = self.push(widget);
        self.nodes[parent.0].children.push(id);
        Ok(id)
    }

    /// Builds the element registered for `tag` and adds it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoSuchWidget`] for an unknown parent, otherwise
    /// whatever [`registry::build`] returns.
    pub fn add_element(
        &mut self,
        parent: Option<WidgetId>,
        tag: &str,
        binder: &mut PinBinder<'_>,
        props: &WidgetProps,
    ) -> Result<WidgetId> {
        if let Some(parent) = parent
            && parent.0 >= self.nodes.len()
        {
            return Err(Error::NoSuchWidget(parent.0));
        }
        let widget = registry::build(tag, binder, props)?;
        match parent {
            Some(parent) => self.add_child(parent, widget),
            None => Ok(self.add_root(widget)),
        }
    }

    fn push(&mut self, widget: Box<dyn BoundWidget>) -> WidgetId {
        let id = WidgetId(self.nodes.len());
        self.nodes.push(Node {
            widget,
            children: Vec::new(),
        });
        id
    }

    /// Returns the number of widgets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the tree is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the top-level widgets.
    #[must_use]
    pub fn roots(&self) -> &[WidgetId] {
        &self.roots
    }

    /// Returns the children of `id`, or an empty slice for an unknown ID.
    #[must_use]
    pub fn children(&self, id: WidgetId) -> &[WidgetId] {
        self.nodes
            .get(id.0)
            .map(|n| n.children.as_slice())
            .unwrap_or_default()
    }

    /// Returns a widget as a trait object.
    #[must_use]
    pub fn widget(&self, id: WidgetId) -> Option<&dyn BoundWidget> {
        self.nodes.get(id.0).map(|n| &*n.widget)
    }

    /// Returns a widget as its concrete type.
    #[must_use]
    pub fn get<T: BoundWidget>(&self, id: WidgetId) -> Option<&T> {
        let widget: &dyn Any = &*self.nodes.get(id.0)?.widget;
        widget.downcast_ref()
    }

    /// Returns a widget as its concrete type, mutably.
    #[must_use]
    pub fn get_mut<T: BoundWidget>(&mut self, id: WidgetId) -> Option<&mut T> {
        let widget: &mut dyn Any = &mut *self.nodes.get_mut(id.0)?.widget;
        widget.downcast_mut()
    }

    /// Returns every widget ID in traversal order.
    #[must_use]
    pub fn traversal(&self) -> Vec<WidgetId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<WidgetId> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.children(id).iter().rev());
        }
        order
    }

    /// Updates every widget once against `store`.
    pub fn update(&mut self, store: &dyn PinStore) -> TreeUpdate {
        let pins = PinAccessor::new(store);
        let mut result = TreeUpdate::default();
        for id in self.traversal() {
            let widget = &mut self.nodes[id.0].widget;
            match widget.update(&pins) {
                Ok(()) => result.updated += 1,
                Err(e) => {
                    tracing::warn!(widget = widget.kind(), id = %id, error = %e, "Widget update failed");
                    result.failed += 1;
                }
            }
        }
        result
    }
}

impl fmt::Debug for WidgetTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kinds: Vec<&str> = self.nodes.iter().map(|n| n.widget.kind()).collect();
        f.debug_struct("WidgetTree")
            .field("widgets", &kinds)
            .field("roots", &self.roots)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pin::{MemoryPinStore, PinHandle};
    use crate::types::{PinDirection, PinType};
    use parking_lot::Mutex;
    use std::sync::Arc;

    /// Records its name into a shared log on every update.
    struct Probe {
        name: &'static str,
        log: Arc<Mutex<Vec<&'static str>>>,
        pin: Option<PinHandle>,
    }

    impl BoundWidget for Probe {
        fn kind(&self) -> &'static str {
            "probe"
        }

        fn update(&mut self, pins: &PinAccessor<'_>) -> Result<()> {
            self.log.lock().push(self.name);
            if let Some(pin) = &self.pin {
                pins.read(pin)?;
            }
            Ok(())
        }
    }

    fn probe(name: &'static str, log: &Arc<Mutex<Vec<&'static str>>>) -> Box<dyn BoundWidget> {
        Box::new(Probe {
            name,
            log: Arc::clone(log),
            pin: None,
        })
    }

    #[test]
    fn depth_first_in_construction_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut tree = WidgetTree::new();
        let a = tree.add_root(probe("a", &log));
        let b = tree.add_root(probe("b", &log));
        tree.add_child(a, probe("a1", &log)).unwrap();
        let a2 = tree.add_child(a, probe("a2", &log)).unwrap();
        tree.add_child(b, probe("b1", &log)).unwrap();
        tree.add_child(a2, probe("a2x", &log)).unwrap();

        let store = MemoryPinStore::new();
        let result = tree.update(&store);
        assert_eq!(result, TreeUpdate { updated: 6, failed: 0 });
        assert_eq!(*log.lock(), vec!["a", "a1", "a2", "a2x", "b", "b1"]);
    }

    #[test]
    fn failing_widget_does_not_stop_the_rest() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut tree = WidgetTree::new();
        tree.add_root(probe("first", &log));
        tree.add_root(Box::new(Probe {
            name: "broken",
            log: Arc::clone(&log),
            pin: Some(PinHandle::new("missing", PinDirection::In, PinType::Bit)),
        }));
        tree.add_root(probe("last", &log));

        let result = tree.update(&MemoryPinStore::new());
        assert_eq!(result, TreeUpdate { updated: 2, failed: 1 });
        assert_eq!(*log.lock(), vec!["first", "broken", "last"]);
    }

    #[test]
    fn unknown_parent_is_rejected() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut tree = WidgetTree::new();
        let err = tree.add_child(WidgetId(3), probe("x", &log)).unwrap_err();
        assert!(matches!(err, Error::NoSuchWidget(3)));
        assert!(tree.is_empty());
    }

    #[test]
    fn downcast_by_type() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut tree = WidgetTree::new();
        let id = tree.add_root(probe("p", &log));
        assert!(tree.get::<Probe>(id).is_some());
        assert!(tree.get::<crate::widget::indicators::Led>(id).is_none());
        tree.get_mut::<Probe>(id).unwrap().name = "renamed";
        assert_eq!(tree.get::<Probe>(id).unwrap().name, "renamed");
    }
}
