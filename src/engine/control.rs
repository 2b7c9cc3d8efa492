use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use tracing::warn;

use crate::constants::MAX_TIME_FACTOR;

/// Requests other threads can make of a running engine.
///
/// Every request is a single atomic word, observed at the start of the next tick.
#[derive(Debug)]
pub struct EngineControl {
    pause_toggle: AtomicBool,
    time_factor: AtomicU32,
}

impl EngineControl {
    pub fn new(time_factor: f32) -> Self {
        Self {
            pause_toggle: AtomicBool::new(false),
            time_factor: AtomicU32::new(time_factor.to_bits()),
        }
    }

    /// Asks for the pause state to flip. Two requests before a tick cancel out.
    pub fn request_pause_toggle(&self) {
        self.pause_toggle.fetch_xor(true, Ordering::AcqRel);
    }

    /// Consumes a pending pause toggle.
    pub(crate) fn take_pause_toggle(&self) -> bool {
        self.pause_toggle.swap(false, Ordering::AcqRel)
    }

    /// Slows down (< 1) or speeds up (> 1) the simulation.
    ///
    /// Factors outside `(0, MAX_TIME_FACTOR]` are ignored.
    pub fn set_time_factor(&self, factor: f32) {
        if !factor.is_finite() || factor <= 0.0 || factor > MAX_TIME_FACTOR {
            warn!(factor, "Ignoring invalid time factor");
            return;
        }
        self.time_factor.store(factor.to_bits(), Ordering::Release);
    }

    pub fn time_factor(&self) -> f32 {
        f32::from_bits(self.time_factor.load(Ordering::Acquire))
    }
}

impl Default for EngineControl {
    fn default() -> Self {
        Self::new(1.0)
    }
}
