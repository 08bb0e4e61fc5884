//! Volume control
//!
//! The preview output is an HTML-style media element whose volume property
//! is linear 0.0-1.0, so percent maps straight to gain.

use crate::types::clamp_percent;

/// Volume level, 0-100 percent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Volume {
    percent: f64,
}

impl Volume {
    pub fn new(percent: f64) -> Self {
        Self {
            percent: clamp_percent(percent),
        }
    }

    /// Set volume level; out-of-range input is clamped
    pub fn set_percent(&mut self, percent: f64) {
        self.percent = clamp_percent(percent);
    }

    pub fn percent(&self) -> f64 {
        self.percent
    }

    /// Gain for the output handle (0.0-1.0)
    pub fn gain(&self) -> f32 {
        (self.percent / 100.0) as f32
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self::new(80.0)
    }
}
