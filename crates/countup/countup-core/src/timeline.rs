//! Timeline drivers: the time source a controller schedules its runs on.
//!
//! A driver interpolates between two ticks over a duration and reports each
//! sampled tick through `on_frame`, then calls `on_complete` once when the run
//! reaches its end. Drivers must never invoke callbacks from inside
//! `schedule`, `pause`, `resume`, `cancel` or `set_easing`; callbacks are only
//! delivered while the host advances time.
//!
//! [`SteppedTimeline`] is the driver shipped with this crate. The host feeds
//! it elapsed time, either wall-clock deltas from its event loop or synthetic
//! steps in tests.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::easing::Easing;

/// Opaque identifier of a scheduled run.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct TimelineHandle(pub u64);

/// What to interpolate.
#[derive(Clone, Debug, PartialEq)]
pub struct TimelineRequest {
    pub from_tick: i64,
    pub to_tick: i64,
    pub duration_ms: u64,
    pub easing: Easing,
}

/// Callbacks a run reports through.
#[derive(Clone)]
pub struct TimelineCallbacks {
    pub on_frame: Rc<dyn Fn(i64)>,
    pub on_complete: Rc<dyn Fn()>,
}

impl TimelineCallbacks {
    pub fn new<F, C>(on_frame: F, on_complete: C) -> Self
    where
        F: Fn(i64) + 'static,
        C: Fn() + 'static,
    {
        Self {
            on_frame: Rc::new(on_frame),
            on_complete: Rc::new(on_complete),
        }
    }
}

/// Capability set a controller needs from its time source.
///
/// Methods take `&self`; drivers are shared between the host (which advances
/// them) and the controllers scheduled on them. Operations on unknown or
/// finished handles are no-ops.
pub trait TimelineDriver {
    fn schedule(&self, request: TimelineRequest, callbacks: TimelineCallbacks) -> TimelineHandle;
    fn pause(&self, handle: TimelineHandle);
    fn resume(&self, handle: TimelineHandle);
    fn cancel(&self, handle: TimelineHandle);
    /// Swap the curve of a live run; progress so far is kept.
    fn set_easing(&self, handle: TimelineHandle, easing: Easing);
}

/// Default spacing between delivered frames (~60 fps).
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(16);

struct Run {
    request: TimelineRequest,
    callbacks: TimelineCallbacks,
    duration: Duration,
    elapsed: Duration,
    /// Time received but not yet spent on a whole frame.
    pending: Duration,
    paused: bool,
    last_tick: i64,
}

/// One frame's outcome, computed under the borrow and delivered after it.
struct Step {
    tick: Option<i64>,
    complete: bool,
    callbacks: TimelineCallbacks,
}

impl Run {
    fn new(request: TimelineRequest, callbacks: TimelineCallbacks) -> Self {
        Self {
            duration: Duration::from_millis(request.duration_ms),
            last_tick: request.from_tick,
            request,
            callbacks,
            elapsed: Duration::ZERO,
            pending: Duration::ZERO,
            paused: false,
        }
    }

    fn tick_at_progress(&self, progress: f64) -> i64 {
        let span = (self.request.to_tick as f64) - (self.request.from_tick as f64);
        let offset = (span * self.request.easing.apply(progress)).round() as i64;
        self.request.from_tick.saturating_add(offset)
    }

    /// Spend `budget` on the next frame if there is enough of it.
    fn step(&mut self, budget: &mut Duration, frame_interval: Duration) -> Option<Step> {
        let remaining = self.duration.saturating_sub(self.elapsed);
        let want = remaining.min(frame_interval);
        if *budget < want {
            return None;
        }
        *budget -= want;
        self.elapsed += want;

        let complete = self.elapsed >= self.duration;
        let tick = if complete {
            self.request.to_tick
        } else {
            let progress = self.elapsed.as_nanos() as f64 / self.duration.as_nanos() as f64;
            self.tick_at_progress(progress)
        };

        let changed = tick != self.last_tick;
        self.last_tick = tick;
        Some(Step {
            tick: changed.then_some(tick),
            complete,
            callbacks: self.callbacks.clone(),
        })
    }
}

/// Driver advanced explicitly by the host.
///
/// Each run emits one frame per `frame_interval` of elapsed time (the final
/// frame may be shorter), skips frames whose tick did not change, always lands
/// exactly on the target tick, and then completes.
pub struct SteppedTimeline {
    frame_interval: Duration,
    next_id: Cell<u64>,
    runs: RefCell<BTreeMap<TimelineHandle, Run>>,
}

impl Default for SteppedTimeline {
    fn default() -> Self {
        Self::new()
    }
}

impl SteppedTimeline {
    pub fn new() -> Self {
        Self::with_frame_interval(DEFAULT_FRAME_INTERVAL)
    }

    /// A zero interval is bumped to one millisecond.
    pub fn with_frame_interval(frame_interval: Duration) -> Self {
        Self {
            frame_interval: frame_interval.max(Duration::from_millis(1)),
            next_id: Cell::new(0),
            runs: RefCell::new(BTreeMap::new()),
        }
    }

    #[inline]
    pub fn frame_interval(&self) -> Duration {
        self.frame_interval
    }

    /// Number of scheduled runs that have neither completed nor been cancelled.
    pub fn active_runs(&self) -> usize {
        self.runs.borrow().len()
    }

    pub fn is_idle(&self) -> bool {
        self.runs.borrow().is_empty()
    }

    pub fn is_paused(&self, handle: TimelineHandle) -> bool {
        self.runs.borrow().get(&handle).is_some_and(|run| run.paused)
    }

    /// Advance every run that exists now by `dt`. Runs scheduled from inside
    /// a callback start on the next call.
    pub fn advance(&self, dt: Duration) {
        let handles: Vec<TimelineHandle> = self.runs.borrow().keys().copied().collect();
        for handle in handles {
            self.advance_run(handle, dt);
        }
    }

    /// Advance in `step` increments for `total` time.
    pub fn advance_by_steps(&self, total: Duration, step: Duration) {
        let step = step.max(Duration::from_millis(1));
        let mut left = total;
        while !left.is_zero() {
            let dt = left.min(step);
            self.advance(dt);
            left -= dt;
        }
    }

    fn advance_run(&self, handle: TimelineHandle, dt: Duration) {
        let mut budget = {
            let mut runs = self.runs.borrow_mut();
            let Some(run) = runs.get_mut(&handle) else {
                return;
            };
            if run.paused {
                return;
            }
            let budget = run.pending + dt;
            run.pending = Duration::ZERO;
            budget
        };

        loop {
            let step = {
                let mut runs = self.runs.borrow_mut();
                let Some(run) = runs.get_mut(&handle) else {
                    return;
                };
                if run.paused {
                    run.pending = budget;
                    return;
                }
                match run.step(&mut budget, self.frame_interval) {
                    Some(step) => step,
                    None => {
                        run.pending = budget;
                        return;
                    }
                }
            };

            if let Some(tick) = step.tick {
                log::trace!("timeline {:?} frame {}", handle, tick);
                (step.callbacks.on_frame)(tick);
            }
            if step.complete {
                // A callback may have cancelled this run; only a live run completes.
                let finished = self.runs.borrow_mut().remove(&handle).is_some();
                if finished {
                    log::debug!("timeline {:?} complete", handle);
                    (step.callbacks.on_complete)();
                }
                return;
            }
        }
    }
}

impl TimelineDriver for SteppedTimeline {
    fn schedule(&self, request: TimelineRequest, callbacks: TimelineCallbacks) -> TimelineHandle {
        let handle = TimelineHandle(self.next_id.get());
        self.next_id.set(self.next_id.get().wrapping_add(1));
        log::debug!(
            "timeline {:?} scheduled: {} -> {} over {} ms",
            handle,
            request.from_tick,
            request.to_tick,
            request.duration_ms
        );
        self.runs
            .borrow_mut()
            .insert(handle, Run::new(request, callbacks));
        handle
    }

    fn pause(&self, handle: TimelineHandle) {
        if let Some(run) = self.runs.borrow_mut().get_mut(&handle) {
            run.paused = true;
        }
    }

    fn resume(&self, handle: TimelineHandle) {
        if let Some(run) = self.runs.borrow_mut().get_mut(&handle) {
            run.paused = false;
        }
    }

    fn cancel(&self, handle: TimelineHandle) {
        if self.runs.borrow_mut().remove(&handle).is_some() {
            log::debug!("timeline {:?} cancelled", handle);
        }
    }

    fn set_easing(&self, handle: TimelineHandle, easing: Easing) {
        if let Some(run) = self.runs.borrow_mut().get_mut(&handle) {
            run.request.easing = easing;
        }
    }
}
