// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Named-event bus with ordered, isolated listeners.

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use crate::subscription::SubscriptionId;

/// Listener callback stored by the bus.
type Listener<E> = Arc<dyn Fn(&E) + Send + Sync>;

/// Which emissions a subscription receives.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Filter {
    /// Only emissions under this name.
    Named(String),
    /// Every emission.
    Any,
}

impl Filter {
    fn matches(&self, name: &str) -> bool {
        match self {
            Self::Named(n) => n == name,
            Self::Any => true,
        }
    }
}

struct Subscription<E> {
    id: SubscriptionId,
    filter: Filter,
    listener: Listener<E>,
}

/// Synchronous event bus keyed by event name.
///
/// Listeners are invoked on the emitting thread, in registration order,
/// with no deduplication. Emitting a name nobody listens to is a no-op, and
/// subscribing to a name before it is ever emitted is allowed.
///
/// # Listener isolation
///
/// A listener that panics is caught and logged; the remaining listeners
/// for the same emission still run and the panic never leaves [`emit`].
///
/// # Consistency
///
/// [`emit`] snapshots the matching listeners before invoking any of them.
/// Subscribing or unsubscribing from inside a listener is allowed and takes
/// effect from the next emission.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use halwatch::event::EventBus;
///
/// let bus: EventBus<i32> = EventBus::new();
/// let seen = Arc::new(AtomicUsize::new(0));
/// let seen_clone = Arc::clone(&seen);
///
/// bus.on("line-changed", move |line| {
///     seen_clone.store(*line as usize, Ordering::SeqCst);
/// });
///
/// assert_eq!(bus.emit("line-changed", &42), 1);
/// assert_eq!(seen.load(Ordering::SeqCst), 42);
///
/// // Unknown names are fine
/// assert_eq!(bus.emit("nobody-listens", &0), 0);
/// ```
///
/// [`emit`]: EventBus::emit
pub struct EventBus<E> {
    /// Counter for generating unique subscription IDs.
    next_id: AtomicU64,
    /// Subscriptions in registration order.
    subscriptions: RwLock<Vec<Subscription<E>>>,
}

impl<E> EventBus<E> {
    /// Creates an empty event bus.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            subscriptions: RwLock::new(Vec::new()),
        }
    }

    fn next_id(&self) -> SubscriptionId {
        SubscriptionId::new(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    fn insert(&self, filter: Filter, listener: Listener<E>) -> SubscriptionId {
        let id = self.next_id();
        tracing::debug!(subscription = %id, filter = ?filter, "Subscription added");
        self.subscriptions.write().push(Subscription {
            id,
            filter,
            listener,
        });
        id
    }

    /// Registers a listener for events emitted under `name`.
    pub fn on<F>(&self, name: impl Into<String>, callback: F) -> SubscriptionId
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        self.insert(Filter::Named(name.into()), Arc::new(callback))
    }

    /// Registers a listener for every event regardless of name.
    ///
    /// Useful for logging and recording; ordering relative to named
    /// listeners still follows registration order.
    pub fn on_any<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        self.insert(Filter::Any, Arc::new(callback))
    }

    /// Removes a listener.
    ///
    /// Returns `true` if the subscription was found. An emission already in
    /// progress still delivers to the removed listener.
    pub fn off(&self, id: SubscriptionId) -> bool {
        let mut subscriptions = self.subscriptions.write();
        let before = subscriptions.len();
        subscriptions.retain(|s| s.id != id);
        let removed = subscriptions.len() != before;
        if removed {
            tracing::debug!(subscription = %id, "Subscription removed");
        }
        removed
    }

    /// Removes every listener.
    pub fn clear(&self) {
        self.subscriptions.write().clear();
    }

    /// Emits `event` under `name` to every matching listener.
    ///
    /// Returns the number of listeners that ran to completion; a listener
    /// that panics is logged and not counted.
    pub fn emit(&self, name: &str, event: &E) -> usize {
        let listeners: Vec<Listener<E>> = self
            .subscriptions
            .read()
            .iter()
            .filter(|s| s.filter.matches(name))
            .map(|s| Arc::clone(&s.listener))
            .collect();

        let mut delivered = 0;
        for listener in listeners {
            match panic::catch_unwind(AssertUnwindSafe(|| listener(event))) {
                Ok(()) => delivered += 1,
                Err(payload) => {
                    tracing::warn!(
                        event = name,
                        panic = panic_message(payload.as_ref()),
                        "Event listener panicked"
                    );
                }
            }
        }
        delivered
    }

    /// Returns the number of listeners an emission under `name` would reach.
    #[must_use]
    pub fn listener_count(&self, name: &str) -> usize {
        self.subscriptions
            .read()
            .iter()
            .filter(|s| s.filter.matches(name))
            .count()
    }

    /// Returns the total number of subscriptions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.subscriptions.read().len()
    }

    /// Returns `true` if there are no subscriptions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subscriptions.read().is_empty()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "non-string panic payload"
    }
}

impl<E> Default for EventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for EventBus<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriptions", &self.len())
            .finish_non_exhaustive()
    }
}
