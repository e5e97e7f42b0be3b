// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Repeating tick timer.
//!
//! A [`Clock`] invokes a callback at a fixed period on a Tokio task until it
//! is stopped or the callback returns `false`. The next tick is only
//! awaited after the callback returns, so ticks never overlap and a slow
//! callback delays the schedule instead of queueing a burst of ticks.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::error::{Error, Result};

/// Default tick period.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Default)]
struct ClockState {
    running: AtomicBool,
    /// Bumped on every start so a task from an earlier start retires.
    generation: AtomicU64,
    ticks: AtomicU64,
    task: Mutex<Option<JoinHandle<()>>>,
}

/// A repeating timer driven by the current Tokio runtime.
///
/// Starting is idempotent: a second [`start`](Clock::start) while running
/// is a no-op and never creates a second timer. Stopping only prevents
/// future ticks; a tick in progress runs to completion.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicU32, Ordering};
/// use std::time::Duration;
/// use halwatch::clock::Clock;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> halwatch::Result<()> {
/// let clock = Clock::new(Duration::from_millis(10));
/// let ticks = Arc::new(AtomicU32::new(0));
/// let counter = Arc::clone(&ticks);
///
/// // Stop by returning false after three ticks
/// clock.start(move || counter.fetch_add(1, Ordering::SeqCst) < 2)?;
///
/// tokio::time::sleep(Duration::from_millis(100)).await;
/// assert_eq!(ticks.load(Ordering::SeqCst), 3);
/// assert!(!clock.is_running());
/// # Ok(())
/// # }
/// ```
pub struct Clock {
    period: Duration,
    state: Arc<ClockState>,
}

impl Clock {
    /// Creates a stopped clock with the given period.
    ///
    /// A zero period is raised to one millisecond.
    #[must_use]
    pub fn new(period: Duration) -> Self {
        Self {
            period: period.max(Duration::from_millis(1)),
            state: Arc::new(ClockState::default()),
        }
    }

    /// Returns the tick period.
    #[must_use]
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Returns `true` while ticks are being scheduled.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state.running.load(Ordering::Acquire)
    }

    /// Returns the number of ticks delivered since creation.
    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.state.ticks.load(Ordering::Acquire)
    }

    /// Starts ticking, calling `callback` once per period.
    ///
    /// The first tick fires one period after starting. Returning `false`
    /// from the callback stops the clock.
    ///
    /// Returns `Ok(true)` if the clock was started and `Ok(false)` if it was
    /// already running (the new callback is dropped).
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoRuntime`] when called outside a Tokio runtime.
    pub fn start<F>(&self, mut callback: F) -> Result<bool>
    where
        F: FnMut() -> bool + Send + 'static,
    {
        let Ok(runtime) = Handle::try_current() else {
            return Err(Error::NoRuntime);
        };
        if self.state.running.swap(true, Ordering::AcqRel) {
            return Ok(false);
        }

        let generation = self.state.generation.fetch_add(1, Ordering::AcqRel) + 1;
        let state = Arc::clone(&self.state);
        let period = self.period;

        let task = runtime.spawn(async move {
            let mut ticker = time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let current = state.generation.load(Ordering::Acquire) == generation;
                if !current || !state.running.load(Ordering::Acquire) {
                    break;
                }
                state.ticks.fetch_add(1, Ordering::AcqRel);
                if !callback() {
                    if state.generation.load(Ordering::Acquire) == generation {
                        state.running.store(false, Ordering::Release);
                    }
                    tracing::debug!("Clock stopped by its callback");
                    break;
                }
            }
        });

        if let Some(previous) = self.state.task.lock().replace(task) {
            previous.abort();
        }
        tracing::debug!(period_ms = period.as_millis(), "Clock started");
        Ok(true)
    }

    /// Stops scheduling ticks.
    ///
    /// Returns `true` if the clock was running.
    pub fn stop(&self) -> bool {
        let was_running = self.state.running.swap(false, Ordering::AcqRel);
        if was_running {
            tracing::debug!("Clock stopped");
        }
        was_running
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new(DEFAULT_TICK_INTERVAL)
    }
}

impl Drop for Clock {
    fn drop(&mut self) {
        self.state.running.store(false, Ordering::Release);
        if let Some(task) = self.state.task.lock().take() {
            task.abort();
        }
    }
}

impl fmt::Debug for Clock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Clock")
            .field("period", &self.period)
            .field("running", &self.is_running())
            .field("ticks", &self.tick_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicU32;

    fn counting(counter: &Arc<AtomicU32>) -> impl FnMut() -> bool + Send + 'static {
        let counter = Arc::clone(counter);
        move || {
            counter.fetch_add(1, Ordering::SeqCst);
            true
        }
    }

    #[test]
    fn start_without_runtime_fails() {
        let clock = Clock::default();
        let result = clock.start(|| true);
        assert!(matches!(result, Err(Error::NoRuntime)));
        assert!(!clock.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_at_fixed_period() {
        let clock = Clock::new(Duration::from_millis(100));
        let counter = Arc::new(AtomicU32::new(0));
        assert!(clock.start(counting(&counter)).unwrap());

        time::sleep(Duration::from_millis(1050)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 10);
        assert_eq!(clock.tick_count(), 10);
    }

    #[tokio::test(start_paused = true)]
    async fn second_start_is_noop() {
        let clock = Clock::new(Duration::from_millis(100));
        let counter = Arc::new(AtomicU32::new(0));
        assert!(clock.start(counting(&counter)).unwrap());
        assert!(!clock.start(counting(&counter)).unwrap());

        time::sleep(Duration::from_millis(1050)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 10);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_prevents_future_ticks() {
        let clock = Clock::new(Duration::from_millis(100));
        let counter = Arc::new(AtomicU32::new(0));
        clock.start(counting(&counter)).unwrap();

        time::sleep(Duration::from_millis(350)).await;
        assert!(clock.stop());
        assert!(!clock.stop());
        time::sleep(Duration::from_millis(500)).await;

        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn restart_after_stop_keeps_single_timer() {
        let clock = Clock::new(Duration::from_millis(100));
        let counter = Arc::new(AtomicU32::new(0));
        clock.start(counting(&counter)).unwrap();
        clock.stop();
        clock.start(counting(&counter)).unwrap();

        time::sleep(Duration::from_millis(550)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn callback_false_stops_clock() {
        let clock = Clock::new(Duration::from_millis(100));
        clock.start(|| false).unwrap();

        time::sleep(Duration::from_millis(150)).await;
        assert!(!clock.is_running());
        assert_eq!(clock.tick_count(), 1);
    }
}
