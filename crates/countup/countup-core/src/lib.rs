//! Count-up animation core
//!
//! Interpolates a number from a start value to an end value over a fixed
//! duration and pushes a formatted string to a display sink on every frame.
//! Interpolation happens in an integer tick space (`value * 10^decimals`) so
//! long runs never accumulate floating error. Time comes from an injected
//! [`TimelineDriver`]; [`SteppedTimeline`] is a host-advanced implementation.
//!
//! Everything here is single-threaded: controllers, sinks and drivers are
//! `Rc`-shared and expected to live on the host's event-loop thread.

pub mod codec;
pub mod config;
pub mod controller;
pub mod easing;
pub mod error;
pub mod event;
pub mod sink;
pub mod state;
pub mod timeline;

pub use codec::{format_value, from_tick, to_tick, MAX_DECIMAL_PLACES};
pub use config::CountupConfig;
pub use controller::{CountupController, WeakCountupController};
pub use easing::Easing;
pub use error::CountupError;
pub use event::{CountupEvent, ListenerId};
pub use sink::{DisplaySink, TextLabel};
pub use state::CountupState;
pub use timeline::{
    SteppedTimeline, TimelineCallbacks, TimelineDriver, TimelineHandle, TimelineRequest,
    DEFAULT_FRAME_INTERVAL,
};

/// Count-up result type
pub type Result<T> = core::result::Result<T, CountupError>;
