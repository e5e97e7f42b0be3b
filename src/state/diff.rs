// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Snapshot change detection.

use crate::event::StatusEvent;
use crate::types::{InterpState, RunState, TaskMode};

use super::{HomingPolicy, HomingSummary, Snapshot};

/// Previously observed values. `None` means "never observed".
struct Baseline<'a> {
    run_state: Option<RunState>,
    mode: Option<TaskMode>,
    interp_state: Option<InterpState>,
    loaded_file: Option<Option<&'a str>>,
    current_line: Option<i32>,
    active_tool: Option<i32>,
    homed: Option<&'a [bool]>,
}

impl<'a> Baseline<'a> {
    fn of(previous: Option<&'a Snapshot>) -> Self {
        match previous {
            Some(s) => Self {
                run_state: Some(s.run_state),
                mode: Some(s.mode),
                interp_state: Some(s.interp_state),
                loaded_file: Some(s.loaded_file.as_deref()),
                current_line: Some(s.current_line),
                active_tool: Some(s.active_tool),
                homed: Some(s.homed.as_slice()),
            },
            None => Self {
                run_state: None,
                mode: None,
                interp_state: None,
                loaded_file: None,
                current_line: None,
                active_tool: None,
                homed: None,
            },
        }
    }
}

/// Computes the edge events between two snapshots.
///
/// `previous` is `None` on the first successful poll; every field then
/// counts as freshly observed and the bootstrap events (`estop` or
/// `estop-reset`, then `off` and `interp-idle`) lead the list.
///
/// Events are ordered by category: run state, mode, interpreter, file,
/// line, tool, homing.
///
/// - Leaving `on` for a lower state emits `off` first; when the new state
///   is itself `off` that single `off` is all that is emitted.
/// - Entering `on` forgets the mode and interpreter baselines, so both are
///   re-emitted on power-up even if unchanged.
/// - An interpreter change away from idle (or from unobserved) is preceded
///   by `interp-run`.
/// - Homing is only evaluated when the homed flags changed.
#[must_use]
pub fn diff(previous: Option<&Snapshot>, current: &Snapshot, policy: HomingPolicy) -> Vec<StatusEvent> {
    let mut baseline = Baseline::of(previous);
    let mut events = Vec::new();

    if baseline.run_state.is_none() {
        events.push(if current.run_state > RunState::Estop {
            StatusEvent::EstopReset
        } else {
            StatusEvent::Estop
        });
        events.push(StatusEvent::Off);
        events.push(StatusEvent::InterpIdle);
    }

    if baseline.run_state != Some(current.run_state) {
        let leaving_on = baseline.run_state == Some(RunState::On) && current.run_state < RunState::On;
        if leaving_on {
            events.push(StatusEvent::Off);
        }
        if !(leaving_on && current.run_state == RunState::Off) {
            events.push(current.run_state.into());
        }
        if current.run_state == RunState::On {
            baseline.mode = None;
            baseline.interp_state = None;
        }
    }

    if baseline.mode != Some(current.mode) {
        events.push(current.mode.into());
    }

    if baseline.interp_state != Some(current.interp_state) {
        if matches!(baseline.interp_state, None | Some(InterpState::Idle)) {
            events.push(StatusEvent::InterpRun);
        }
        events.push(current.interp_state.into());
    }

    if baseline.loaded_file != Some(current.loaded_file.as_deref()) {
        events.push(StatusEvent::FileLoaded(current.loaded_file.clone()));
    }

    if baseline.current_line != Some(current.current_line) {
        events.push(StatusEvent::LineChanged(current.current_line));
    }

    if baseline.active_tool != Some(current.active_tool) {
        events.push(StatusEvent::ToolChanged(current.active_tool));
    }

    if baseline.homed != Some(current.homed.as_slice()) {
        events.extend(HomingSummary::scan(&current.homed, current.axis_mask).events(policy));
    }

    events
}
