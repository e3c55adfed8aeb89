//! CountupController: lifecycle state machine driving one count-up display.
//!
//! The controller is a cheap, clonable handle around shared single-threaded
//! state. Timeline callbacks hold only a weak reference and carry the
//! generation of the run that scheduled them, so frames or completions from a
//! superseded run are ignored even when they arrive after a restart.
//!
//! No borrow of the shared state is held while the display sink or event
//! listeners run; both may call back into the controller (e.g. `update()` from
//! inside the sink).

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::codec::{from_tick, to_tick};
use crate::config::{validate_decimal_places, CountupConfig};
use crate::easing::Easing;
use crate::event::{CountupEvent, ListenerId, Listeners};
use crate::sink::DisplaySink;
use crate::state::CountupState;
use crate::timeline::{TimelineCallbacks, TimelineDriver, TimelineHandle, TimelineRequest};
use crate::Result;

struct Inner {
    config: CountupConfig,
    state: CountupState,
    sink: Rc<dyn DisplaySink>,
    driver: Rc<dyn TimelineDriver>,
    handle: Option<TimelineHandle>,
    /// Bumped whenever the current run is replaced or cancelled.
    generation: u64,
    current_tick: i64,
    current_value: f64,
    /// Decimal places `current_tick` was last decoded with.
    emitted_places: Option<u32>,
    listeners: Listeners,
}

impl Inner {
    fn cancel_run(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.driver.cancel(handle);
        }
    }

    /// Invalidate outstanding callbacks and detach from the driver.
    fn retire_run(&mut self) {
        self.cancel_run();
        self.generation = self.generation.wrapping_add(1);
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        self.cancel_run();
    }
}

type Shared = Rc<RefCell<Inner>>;

/// Animates a number from a start value to an end value and pushes each
/// formatted frame to a display sink.
#[derive(Clone)]
pub struct CountupController {
    inner: Shared,
}

/// Non-owning handle, for sinks and listeners that need to reach back into
/// their controller without keeping it alive.
#[derive(Clone)]
pub struct WeakCountupController {
    inner: Weak<RefCell<Inner>>,
}

impl WeakCountupController {
    pub fn upgrade(&self) -> Option<CountupController> {
        self.inner.upgrade().map(|inner| CountupController { inner })
    }
}

impl CountupController {
    /// Controller with the default configuration.
    pub fn new(sink: Rc<dyn DisplaySink>, driver: Rc<dyn TimelineDriver>) -> Self {
        Self::from_parts(sink, driver, CountupConfig::default())
    }

    /// Controller with a validated configuration.
    pub fn with_config(
        sink: Rc<dyn DisplaySink>,
        driver: Rc<dyn TimelineDriver>,
        config: CountupConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_parts(sink, driver, config))
    }

    fn from_parts(
        sink: Rc<dyn DisplaySink>,
        driver: Rc<dyn TimelineDriver>,
        config: CountupConfig,
    ) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                config,
                state: CountupState::Idle,
                sink,
                driver,
                handle: None,
                generation: 0,
                current_tick: 0,
                current_value: 0.0,
                emitted_places: None,
                listeners: Listeners::default(),
            })),
        }
    }

    pub fn downgrade(&self) -> WeakCountupController {
        WeakCountupController {
            inner: Rc::downgrade(&self.inner),
        }
    }

    // ---- lifecycle ----

    /// Restart from `start_value`: emit the start frame now and schedule a run
    /// to `end_value`. Any run in flight is cancelled without notification.
    pub fn start(&self) -> Result<()> {
        let start_tick = {
            let inner = self.inner.borrow();
            to_tick(inner.config.start_value, inner.config.decimal_places)?
        };
        self.begin_run(start_tick)
    }

    /// Freeze a running animation. No-op unless running.
    pub fn pause(&self) {
        let value = {
            let mut inner = self.inner.borrow_mut();
            if !inner.state.can_pause() {
                return;
            }
            if let Some(handle) = inner.handle {
                inner.driver.pause(handle);
            }
            inner.state = CountupState::Paused;
            inner.current_value
        };
        log::debug!("countup paused at {}", value);
        notify(&self.inner, CountupEvent::Paused { value });
    }

    /// Continue a paused animation from its frozen tick. No-op unless paused.
    pub fn resume(&self) {
        let value = {
            let mut inner = self.inner.borrow_mut();
            if !inner.state.can_resume() {
                return;
            }
            if let Some(handle) = inner.handle {
                inner.driver.resume(handle);
            }
            inner.state = CountupState::Running;
            inner.current_value
        };
        log::debug!("countup resumed at {}", value);
        notify(&self.inner, CountupEvent::Resumed { value });
    }

    /// Cancel the run, leaving the display as it is. No-op when idle.
    pub fn stop(&self) {
        let value = {
            let mut inner = self.inner.borrow_mut();
            if !inner.state.can_stop() {
                return;
            }
            inner.retire_run();
            inner.state = CountupState::Idle;
            inner.current_value
        };
        log::debug!("countup stopped at {}", value);
        notify(&self.inner, CountupEvent::Stopped { value });
    }

    /// Cancel any run and show the start value again.
    pub fn reset(&self) -> Result<()> {
        {
            let mut inner = self.inner.borrow_mut();
            let start_tick = to_tick(inner.config.start_value, inner.config.decimal_places)?;
            inner.retire_run();
            inner.state = CountupState::Idle;
            inner.current_tick = start_tick;
        }
        emit_current(&self.inner);
        let value = self.current_value();
        log::debug!("countup reset to {}", value);
        notify(&self.inner, CountupEvent::Reset { value });
        Ok(())
    }

    /// Retarget to `end_value`, continuing from the value currently shown.
    pub fn update(&self, end_value: f64) -> Result<()> {
        let start_tick = {
            let mut inner = self.inner.borrow_mut();
            let places = inner.config.decimal_places;
            let start_tick = if inner.emitted_places == Some(places) {
                inner.current_tick
            } else {
                to_tick(inner.current_value, places)?
            };
            to_tick(end_value, places)?;
            let current_value = inner.current_value;
            inner.config.end_value = end_value;
            inner.config.start_value = current_value;
            start_tick
        };
        log::debug!("countup retargeted to {}", end_value);
        self.begin_run(start_tick)
    }

    fn begin_run(&self, start_tick: i64) -> Result<()> {
        let (generation, mut request, from, to) = {
            let mut inner = self.inner.borrow_mut();
            let end_tick = to_tick(inner.config.end_value, inner.config.decimal_places)?;
            inner.retire_run();
            inner.state = CountupState::Running;
            inner.current_tick = start_tick;
            let request = TimelineRequest {
                from_tick: start_tick,
                to_tick: end_tick,
                duration_ms: inner.config.duration_ms,
                easing: Easing::or_linear(inner.config.easing.as_ref()),
            };
            (
                inner.generation,
                request,
                inner.config.start_value,
                inner.config.end_value,
            )
        };
        log::debug!(
            "countup started: {} -> {} over {} ms",
            from,
            to,
            request.duration_ms
        );

        // Listeners and the sink may pause, stop or restart us from here on.
        notify(&self.inner, CountupEvent::Started { from, to });
        if is_superseded(&self.inner, generation) {
            return Ok(());
        }
        emit_current(&self.inner);
        if is_superseded(&self.inner, generation) {
            return Ok(());
        }

        if request.duration_ms == 0 && self.state() == CountupState::Running {
            self.inner.borrow_mut().current_tick = request.to_tick;
            emit_current(&self.inner);
            if is_superseded(&self.inner, generation) {
                return Ok(());
            }
            if self.state() == CountupState::Running {
                complete_run(&self.inner, generation);
                return Ok(());
            }
            // Paused on the end frame: completion waits for resume.
            request.from_tick = request.to_tick;
        }

        let on_frame = {
            let weak = Rc::downgrade(&self.inner);
            move |tick: i64| {
                if let Some(inner) = weak.upgrade() {
                    frame_run(&inner, generation, tick);
                }
            }
        };
        let on_complete = {
            let weak = Rc::downgrade(&self.inner);
            move || {
                if let Some(inner) = weak.upgrade() {
                    complete_run(&inner, generation);
                }
            }
        };
        let driver = Rc::clone(&self.inner.borrow().driver);
        let handle = driver.schedule(request, TimelineCallbacks::new(on_frame, on_complete));

        let mut inner = self.inner.borrow_mut();
        inner.handle = Some(handle);
        if inner.state == CountupState::Paused {
            inner.driver.pause(handle);
        }
        Ok(())
    }

    // ---- state ----

    pub fn state(&self) -> CountupState {
        self.inner.borrow().state
    }

    pub fn is_running(&self) -> bool {
        self.state().is_running()
    }

    /// Last value pushed to the sink; `0` before the first frame.
    pub fn current_value(&self) -> f64 {
        self.inner.borrow().current_value
    }

    // ---- notifications ----

    /// Register a listener for every lifecycle event.
    pub fn subscribe<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&CountupEvent) + 'static,
    {
        self.inner.borrow_mut().listeners.add(Rc::new(listener))
    }

    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        self.inner.borrow_mut().listeners.remove(id)
    }

    /// Register a callback fired once per naturally completed run.
    pub fn on_finished<F>(&self, callback: F) -> ListenerId
    where
        F: Fn() + 'static,
    {
        self.subscribe(move |event| {
            if event.is_finished() {
                callback();
            }
        })
    }

    // ---- configuration ----

    pub fn config(&self) -> CountupConfig {
        self.inner.borrow().config.clone()
    }

    /// Replace the whole configuration. The easing is pushed to a live run;
    /// everything else applies from the next frame or the next start.
    pub fn set_config(&self, config: CountupConfig) -> Result<()> {
        config.validate()?;
        let easing = config.easing.clone();
        self.inner.borrow_mut().config = config;
        self.set_easing(easing);
        Ok(())
    }

    pub fn sink(&self) -> Rc<dyn DisplaySink> {
        Rc::clone(&self.inner.borrow().sink)
    }

    pub fn set_sink(&self, sink: Rc<dyn DisplaySink>) {
        self.inner.borrow_mut().sink = sink;
    }

    pub fn start_value(&self) -> f64 {
        self.inner.borrow().config.start_value
    }

    pub fn set_start_value(&self, start_value: f64) {
        self.inner.borrow_mut().config.start_value = start_value;
    }

    pub fn end_value(&self) -> f64 {
        self.inner.borrow().config.end_value
    }

    pub fn set_end_value(&self, end_value: f64) {
        self.inner.borrow_mut().config.end_value = end_value;
    }

    pub fn set_start_end_values(&self, start_value: f64, end_value: f64) {
        let mut inner = self.inner.borrow_mut();
        inner.config.start_value = start_value;
        inner.config.end_value = end_value;
    }

    pub fn duration_ms(&self) -> u64 {
        self.inner.borrow().config.duration_ms
    }

    pub fn set_duration_ms(&self, duration_ms: u64) {
        self.inner.borrow_mut().config.duration_ms = duration_ms;
    }

    pub fn decimal_places(&self) -> u32 {
        self.inner.borrow().config.decimal_places
    }

    pub fn set_decimal_places(&self, decimal_places: u32) -> Result<()> {
        validate_decimal_places(decimal_places)?;
        self.inner.borrow_mut().config.decimal_places = decimal_places;
        Ok(())
    }

    pub fn decimal(&self) -> String {
        self.inner.borrow().config.decimal.clone()
    }

    pub fn set_decimal(&self, decimal: &str) {
        self.inner.borrow_mut().config.decimal = decimal.to_string();
    }

    pub fn thousands_separator(&self) -> String {
        self.inner.borrow().config.thousands_separator.clone()
    }

    pub fn set_thousands_separator(&self, thousands_separator: &str) {
        self.inner.borrow_mut().config.thousands_separator = thousands_separator.to_string();
    }

    pub fn prefix(&self) -> String {
        self.inner.borrow().config.prefix.clone()
    }

    pub fn set_prefix(&self, prefix: &str) {
        self.inner.borrow_mut().config.prefix = prefix.to_string();
    }

    pub fn suffix(&self) -> String {
        self.inner.borrow().config.suffix.clone()
    }

    pub fn set_suffix(&self, suffix: &str) {
        self.inner.borrow_mut().config.suffix = suffix.to_string();
    }

    pub fn is_prefix_before_minus(&self) -> bool {
        self.inner.borrow().config.prefix_before_minus
    }

    pub fn set_prefix_before_minus(&self, enabled: bool) {
        self.inner.borrow_mut().config.prefix_before_minus = enabled;
    }

    pub fn easing(&self) -> Option<Easing> {
        self.inner.borrow().config.easing.clone()
    }

    /// Set the curve for future runs and for the run in flight, if any.
    /// `None` runs linearly.
    pub fn set_easing(&self, easing: Option<Easing>) {
        let mut inner = self.inner.borrow_mut();
        if let Some(handle) = inner.handle {
            inner
                .driver
                .set_easing(handle, Easing::or_linear(easing.as_ref()));
        }
        inner.config.easing = easing;
    }
}

impl fmt::Debug for CountupController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.try_borrow() {
            Ok(inner) => f
                .debug_struct("CountupController")
                .field("state", &inner.state)
                .field("current_value", &inner.current_value)
                .field("config", &inner.config)
                .finish(),
            Err(_) => f.write_str("CountupController { <borrowed> }"),
        }
    }
}

fn is_superseded(inner: &Shared, generation: u64) -> bool {
    inner.borrow().generation != generation
}

/// Decode the current tick, render it, and hand it to the sink.
fn emit_current(inner: &Shared) {
    let (text, sink) = {
        let mut guard = inner.borrow_mut();
        let places = guard.config.decimal_places;
        let value = from_tick(guard.current_tick, places);
        guard.current_value = value;
        guard.emitted_places = Some(places);
        (guard.config.render(value), Rc::clone(&guard.sink))
    };
    log::trace!("countup frame {:?}", text);
    sink.set_text(&text);
}

fn notify(inner: &Shared, event: CountupEvent) {
    let listeners = inner.borrow().listeners.snapshot();
    for listener in listeners {
        listener(&event);
    }
}

fn frame_run(inner: &Shared, generation: u64, tick: i64) {
    {
        let mut guard = inner.borrow_mut();
        if guard.generation != generation || guard.state != CountupState::Running {
            return;
        }
        guard.current_tick = tick;
    }
    emit_current(inner);
}

fn complete_run(inner: &Shared, generation: u64) {
    let value = {
        let mut guard = inner.borrow_mut();
        if guard.generation != generation || guard.state != CountupState::Running {
            return;
        }
        guard.handle = None;
        guard.state = CountupState::Idle;
        guard.current_value
    };
    log::debug!("countup finished at {}", value);
    notify(inner, CountupEvent::Finished { value });
}
