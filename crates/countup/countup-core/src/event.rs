//! Lifecycle notifications broadcast by a controller.
//!
//! Listeners receive events synchronously, after the controller has released
//! its internal borrow, so a listener may call back into the controller.

use serde::{Deserialize, Serialize};
use std::rc::Rc;

/// Discrete signals emitted during a controller's lifetime.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum CountupEvent {
    /// A run began (via `start` or `update`)
    Started { from: f64, to: f64 },
    Paused { value: f64 },
    Resumed { value: f64 },
    Stopped { value: f64 },
    /// Display returned to the start value
    Reset { value: f64 },
    /// A run reached its end value without being cancelled
    Finished { value: f64 },
}

impl CountupEvent {
    /// Get the name of this event
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Started { .. } => "started",
            Self::Paused { .. } => "paused",
            Self::Resumed { .. } => "resumed",
            Self::Stopped { .. } => "stopped",
            Self::Reset { .. } => "reset",
            Self::Finished { .. } => "finished",
        }
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        matches!(self, Self::Finished { .. })
    }
}

/// Token returned by `subscribe`, used to remove the listener again.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct ListenerId(pub u32);

pub(crate) type Listener = Rc<dyn Fn(&CountupEvent)>;

/// Registered listeners in subscription order.
#[derive(Default)]
pub(crate) struct Listeners {
    next_id: u32,
    entries: Vec<(ListenerId, Listener)>,
}

impl Listeners {
    pub(crate) fn add(&mut self, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.entries.push((id, listener));
        id
    }

    pub(crate) fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    /// Clone the current listener list so it can be invoked without holding a borrow.
    pub(crate) fn snapshot(&self) -> Vec<Listener> {
        self.entries.iter().map(|(_, l)| Rc::clone(l)).collect()
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn listener_ids_are_monotonic_and_removable() {
        let mut listeners = Listeners::default();
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        let a = listeners.add(Rc::new(move |_| h.set(h.get() + 1)));
        let b = listeners.add(Rc::new(|_| {}));
        assert_eq!(a, ListenerId(0));
        assert_eq!(b, ListenerId(1));

        for l in listeners.snapshot() {
            l(&CountupEvent::Finished { value: 1.0 });
        }
        assert_eq!(hits.get(), 1);

        assert!(listeners.remove(a));
        assert!(!listeners.remove(a));
        assert_eq!(listeners.len(), 1);
    }

    #[test]
    fn event_names() {
        assert_eq!(CountupEvent::Started { from: 0.0, to: 1.0 }.name(), "started");
        assert!(CountupEvent::Finished { value: 1.0 }.is_finished());
        assert!(!CountupEvent::Reset { value: 0.0 }.is_finished());
    }
}
