// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Status sources.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::SourceError;
use crate::state::Snapshot;

/// Something that can be polled for the current machine status.
///
/// A poll either returns a complete [`Snapshot`] or fails; a partial read is
/// never exposed. Failures are treated as transient by the watcher.
///
/// Closures returning `Result<Snapshot, SourceError>` implement this trait.
pub trait SnapshotSource: Send {
    /// Reads the current status.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] when the status source is unavailable.
    fn poll(&mut self) -> Result<Snapshot, SourceError>;
}

impl<F> SnapshotSource for F
where
    F: FnMut() -> Result<Snapshot, SourceError> + Send,
{
    fn poll(&mut self) -> Result<Snapshot, SourceError> {
        self()
    }
}

#[derive(Debug, Default)]
struct CellState {
    snapshot: Option<Snapshot>,
    outage: Option<String>,
}

/// An in-memory [`SnapshotSource`] fed by hand.
///
/// Clones share the same cell, so one clone can be handed to a
/// [`StatusWatcher`](super::StatusWatcher) while another publishes new
/// snapshots. Until the first [`set`](Self::set) the cell is unavailable.
///
/// # Examples
///
/// ```
/// use halwatch::state::Snapshot;
/// use halwatch::status::{SnapshotCell, SnapshotSource};
/// use halwatch::types::RunState;
///
/// let cell = SnapshotCell::new();
/// let mut source = cell.clone();
/// assert!(source.poll().is_err());
///
/// cell.set(Snapshot::new().with_run_state(RunState::Off));
/// assert_eq!(source.poll().unwrap().run_state, RunState::Off);
///
/// cell.fail("status buffer not attached");
/// assert!(source.poll().is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct SnapshotCell {
    inner: Arc<Mutex<CellState>>,
}

impl SnapshotCell {
    /// Creates an empty, unavailable cell.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a cell holding `snapshot`.
    #[must_use]
    pub fn with_snapshot(snapshot: Snapshot) -> Self {
        let cell = Self::new();
        cell.set(snapshot);
        cell
    }

    /// Publishes a snapshot and clears any outage.
    pub fn set(&self, snapshot: Snapshot) {
        let mut state = self.inner.lock();
        state.snapshot = Some(snapshot);
        state.outage = None;
    }

    /// Edits the current snapshot in place.
    ///
    /// Starts from [`Snapshot::new`] if nothing has been published. Clears
    /// any outage.
    pub fn modify<F>(&self, edit: F)
    where
        F: FnOnce(&mut Snapshot),
    {
        let mut state = self.inner.lock();
        edit(state.snapshot.get_or_insert_with(Snapshot::new));
        state.outage = None;
    }

    /// Makes polls fail with `reason` until the next `set` or `modify`.
    ///
    /// The last published snapshot is kept.
    pub fn fail(&self, reason: impl Into<String>) {
        self.inner.lock().outage = Some(reason.into());
    }

    /// Returns the last published snapshot.
    #[must_use]
    pub fn get(&self) -> Option<Snapshot> {
        self.inner.lock().snapshot.clone()
    }
}

impl SnapshotSource for SnapshotCell {
    fn poll(&mut self) -> Result<Snapshot, SourceError> {
        let state = self.inner.lock();
        if let Some(reason) = &state.outage {
            return Err(SourceError::Unavailable(reason.clone()));
        }
        state
            .snapshot
            .clone()
            .ok_or_else(|| SourceError::Unavailable("no snapshot published".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{RunState, TaskMode};

    #[test]
    fn empty_cell_is_unavailable() {
        let mut cell = SnapshotCell::new();
        assert!(matches!(cell.poll(), Err(SourceError::Unavailable(_))));
    }

    #[test]
    fn clones_share_state() {
        let cell = SnapshotCell::new();
        let mut source = cell.clone();
        cell.modify(|s| s.mode = TaskMode::Mdi);
        assert_eq!(source.poll().unwrap().mode, TaskMode::Mdi);
    }

    #[test]
    fn outage_keeps_last_snapshot() {
        let cell = SnapshotCell::with_snapshot(Snapshot::new().with_run_state(RunState::On));
        let mut source = cell.clone();

        cell.fail("gone");
        assert!(source.poll().is_err());
        assert_eq!(cell.get().unwrap().run_state, RunState::On);

        cell.modify(|s| s.current_line = 12);
        let polled = source.poll().unwrap();
        assert_eq!(polled.run_state, RunState::On);
        assert_eq!(polled.current_line, 12);
    }

    #[test]
    fn closure_source() {
        let mut calls = 0;
        let mut source = move || {
            calls += 1;
            if calls == 1 {
                Err(SourceError::Unavailable("warming up".to_string()))
            } else {
                Ok(Snapshot::new())
            }
        };
        assert!(SnapshotSource::poll(&mut source).is_err());
        assert!(SnapshotSource::poll(&mut source).is_ok());
    }
}
