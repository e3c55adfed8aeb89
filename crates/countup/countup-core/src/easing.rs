//! Easing curves sampled by timeline drivers.
//!
//! An easing maps normalized progress in `[0, 1]` to an output progress. The
//! output is not required to stay in `[0, 1]` nor to be monotonic; drivers
//! scale whatever comes back onto the tick range.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;

/// Easing curve used to shape a count-up run.
#[derive(Clone, Default, Serialize, Deserialize)]
pub enum Easing {
    /// Constant speed
    Linear,
    /// Quadratic acceleration
    InQuad,
    /// Quadratic deceleration
    OutQuad,
    /// Quadratic acceleration then deceleration
    InOutQuad,
    /// Cubic deceleration
    OutCubic,
    /// Exponential deceleration
    #[default]
    OutExpo,
    /// Host-supplied curve. Runtime only, never serialized.
    #[serde(skip)]
    Custom(Rc<dyn Fn(f64) -> f64>),
}

impl Easing {
    /// Sample the curve at `progress`.
    pub fn apply(&self, progress: f64) -> f64 {
        let t = progress;
        match self {
            Easing::Linear => t,
            Easing::InQuad => t * t,
            Easing::OutQuad => t * (2.0 - t),
            Easing::InOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
            Easing::OutCubic => {
                let inv = 1.0 - t;
                1.0 - inv * inv * inv
            }
            Easing::OutExpo => {
                if t >= 1.0 {
                    1.0
                } else {
                    1.0 - 2_f64.powf(-10.0 * t)
                }
            }
            Easing::Custom(f) => f(t),
        }
    }

    /// Wrap a closure as an easing curve.
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(f64) -> f64 + 'static,
    {
        Easing::Custom(Rc::new(f))
    }

    /// Resolve an optional easing, falling back to linear.
    #[inline]
    pub fn or_linear(easing: Option<&Easing>) -> Easing {
        easing.cloned().unwrap_or(Easing::Linear)
    }
}

impl PartialEq for Easing {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Easing::Linear, Easing::Linear)
            | (Easing::InQuad, Easing::InQuad)
            | (Easing::OutQuad, Easing::OutQuad)
            | (Easing::InOutQuad, Easing::InOutQuad)
            | (Easing::OutCubic, Easing::OutCubic)
            | (Easing::OutExpo, Easing::OutExpo) => true,
            (Easing::Custom(a), Easing::Custom(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Easing::Linear => write!(f, "Linear"),
            Easing::InQuad => write!(f, "InQuad"),
            Easing::OutQuad => write!(f, "OutQuad"),
            Easing::InOutQuad => write!(f, "InOutQuad"),
            Easing::OutCubic => write!(f, "OutCubic"),
            Easing::OutExpo => write!(f, "OutExpo"),
            Easing::Custom(_) => write!(f, "Custom"),
        }
    }
}
