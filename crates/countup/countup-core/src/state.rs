use serde::{Deserialize, Serialize};

/// Lifecycle phase of a count-up controller
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CountupState {
    /// No run in flight (initial, after stop/reset, after completion)
    #[default]
    Idle,
    /// A run is advancing
    Running,
    /// A run is frozen at its current tick
    Paused,
}

impl CountupState {
    /// Get the name of this state
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Paused => "paused",
        }
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running)
    }

    #[inline]
    pub fn can_pause(&self) -> bool {
        matches!(self, Self::Running)
    }

    #[inline]
    pub fn can_resume(&self) -> bool {
        matches!(self, Self::Paused)
    }

    /// Whether a driver run is attached (running or frozen)
    #[inline]
    pub fn can_stop(&self) -> bool {
        matches!(self, Self::Running | Self::Paused)
    }
}
