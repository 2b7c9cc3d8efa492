#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use glam::Vec2;
use parking_lot::Mutex;
use thedot::constants::COUNTDOWN;
use thedot::engine::{Engine, Status};
use thedot::feedback::{Cue, Feedback};
use thedot::orientation::DefaultOrientation;
use thedot::sensor::SensorAggregator;

/// 1000x500 pixels: 5 pixels per unit, an arena spanning ±100 by ±50 units.
pub const SURFACE: Vec2 = Vec2::new(1000.0, 500.0);

pub const SEED: u64 = 0x7E57;

/// Feedback double that remembers every cue, shared across clones.
#[derive(Debug, Clone, Default)]
pub struct RecordingFeedback {
    cues: Arc<Mutex<Vec<Cue>>>,
}

impl RecordingFeedback {
    pub fn cues(&self) -> Vec<Cue> {
        self.cues.lock().clone()
    }
}

impl Feedback for RecordingFeedback {
    fn trigger(&mut self, cue: Cue) {
        self.cues.lock().push(cue);
    }
}

pub struct Harness {
    pub engine: Engine,
    pub sensors: Arc<SensorAggregator>,
    pub feedback: RecordingFeedback,
}

/// An initialized, seeded engine sitting on the start-up pause screen.
pub fn paused_engine() -> Harness {
    let sensors = Arc::new(SensorAggregator::new());
    let feedback = RecordingFeedback::default();
    let mut engine = Engine::new(DefaultOrientation::Portrait, Arc::clone(&sensors), Box::new(feedback.clone())).with_seed(SEED);
    engine.init(SURFACE);

    Harness { engine, sensors, feedback }
}

/// An engine whose first countdown already ran out.
pub fn playing_engine() -> Harness {
    let mut harness = paused_engine();
    harness.engine.toggle_pause();
    harness.engine.update(COUNTDOWN);
    assert_eq!(harness.engine.status(), Some(Status::Play));
    harness
}

/// Removes enemies and wells and parks the gate in a far corner, so only the
/// entities a test places itself matter.
pub fn clear_level(engine: &mut Engine) {
    let level = engine.level_mut().unwrap();
    level.enemies.clear();
    level.wells.clear();
    level.gate.position = Vec2::new(90.0, 40.0);
}

pub fn tick(engine: &mut Engine, times: usize, delta: Duration) {
    for _ in 0..times {
        engine.update(delta);
    }
}
