use std::time::{Duration, Instant};

/// A looping frame counter driven by wall-clock time.
///
/// Independent of the simulation tick: a paused or slowed-down game still
/// animates at full speed.
#[derive(Debug, Clone, PartialEq)]
pub struct Animation {
    frame_count: u32,
    frame_time: Duration,
    frame_index: u32,
    last_advance: Option<Instant>,
}

impl Animation {
    /// Creates an animation that cycles through `frame_count` frames once per `duration`.
    pub fn new(frame_count: u32, duration: Duration) -> Self {
        let frame_count = frame_count.max(1);
        Self {
            frame_count,
            frame_time: duration / frame_count,
            frame_index: 0,
            last_advance: None,
        }
    }

    /// Moves to the next frame if more than one frame time passed since the last advance.
    ///
    /// The very first call always advances.
    pub fn advance(&mut self, now: Instant) {
        let due = match self.last_advance {
            None => true,
            Some(last) => now.saturating_duration_since(last) > self.frame_time,
        };
        if due {
            self.frame_index += 1;
            self.last_advance = Some(now);
        }
        if self.frame_index >= self.frame_count {
            self.frame_index = 0;
        }
    }

    pub fn frame_index(&self) -> u32 {
        self.frame_index
    }

    pub fn frame_count(&self) -> u32 {
        self.frame_count
    }

    pub fn frame_time(&self) -> Duration {
        self.frame_time
    }

    /// Progress through the loop in `[0, 1)`.
    pub fn phase(&self) -> f32 {
        self.frame_index as f32 / self.frame_count as f32
    }
}
