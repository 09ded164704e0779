//! Watering progress

use std::fmt::Debug;

/// Read-only view of how far a flower has been watered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// Waterings done
    pub completed: u32,
    /// Waterings needed
    pub required: u32,
}

impl Progress {
    /// Waterings still needed
    pub fn remaining(&self) -> u32 {
        self.required.saturating_sub(self.completed)
    }

    /// Share of waterings done, in `[0, 1]`
    pub fn ratio(&self) -> f64 {
        if self.required == 0 {
            return 1.0;
        }

        (f64::from(self.completed) / f64::from(self.required)).clamp(0.0, 1.0)
    }

    /// Flower scale, growing from half size to full size
    pub fn scale(&self) -> f64 {
        0.5 + 0.5 * self.ratio()
    }

    /// Flower opacity, fading in from half to opaque
    pub fn opacity(&self) -> f64 {
        0.5 + 0.5 * self.ratio()
    }

    /// Instruction shown under the watering can
    pub fn instruction(&self) -> String {
        match self.remaining() {
            0 => "It's ready to bloom!".to_string(),
            1 => "Water 1 more time to make it bloom!".to_string(),
            n => format!("Water {n} more times to make it bloom!"),
        }
    }
}

/// Receives the progress after every watering.
///
/// This is the only hook into presentation; drawing and animation belong to
/// the implementor.
pub trait ProgressObserver: Debug + Send + Sync {
    /// Called after every [`crate::WateringSession::advance`]
    fn on_progress(&self, progress: &Progress);
}
