//! This module contains all the constants used in the game.

use std::time::Duration;

/// The default number of loop iterations per second.
pub const MAX_FPS: u32 = 60;
/// The maximum number of update-only catch-up ticks per rendered frame.
pub const MAX_FRAME_SKIP: u32 = MAX_FPS / 10;
/// The time budget of a single loop iteration at the default rate.
pub const LOOP_TIME: Duration = Duration::from_nanos((1_000_000_000.0 / MAX_FPS as f64) as u64);
/// How long the loop waits before retrying when no drawing surface is available.
pub const SURFACE_RETRY_TIME: Duration = LOOP_TIME;
/// How often rolling frame statistics are logged.
pub const FRAME_STATS_PERIOD: Duration = Duration::from_secs(5);

/// The smaller surface dimension is divided by this to obtain the pixel size of one unit.
pub const UNIT_FRACTION: f32 = 100.0;

/// The largest accepted global time factor.
pub const MAX_TIME_FACTOR: f32 = 10.0;

/// Countdown played before each level starts.
pub const COUNTDOWN: Duration = Duration::from_millis(3000);

/// The player's mass. Small on purpose: tilt feels immediate.
pub const DOT_MASS: f32 = 0.005;
/// Fraction of velocity kept (and inverted) after hitting a border.
pub const DOT_BOUNCE: f32 = 0.5;
/// The player's diameter, in units.
pub const DOT_SIZE: f32 = 1.0;
/// Post-bounce speed (units/s) above which a border hit vibrates.
pub const BOUNCE_VIBRATION_SPEED: f32 = 3.0;
/// Ticks spent easing the dot into the gate before the next level.
pub const ENDING_ANIMATION_TICKS: u32 = 10;
/// Ticks spent drifting after an enemy hit before the next level.
pub const DEATH_ANIMATION_TICKS: u32 = 10;

/// Enemy pursuit speed, in units per second.
pub const ENEMY_SPEED: f32 = 25.0;
/// Enemies spawned per level.
pub const ENEMY_COUNT: usize = 5;
/// Magnitude of the power of a level's gravity well.
pub const GRAVITY_WELL_POWER: f32 = 15.0;
/// Wells farther than this (in units) exert no force.
pub const GRAVITY_WELL_REACH: f32 = 50.0;

/// Center-to-center distance (units) at which the player counts as inside the gate.
pub const GATE_PROXIMITY: f32 = 3.5;
/// Continuous time inside the gate needed to exit the level.
pub const GATE_EXIT_TIME: Duration = Duration::from_millis(100);
/// The gate's edge length, in units. Spawn margins are derived from it.
pub const GATE_SIZE: f32 = 6.0;

/// Vibration lengths for the different feedback cues.
pub mod cue {
    use std::time::Duration;

    pub const BORDER_BOUNCE: Duration = Duration::from_millis(40);
    pub const ENEMY_HIT: Duration = Duration::from_millis(40);
    pub const DEATH: Duration = Duration::from_millis(1000);
}

/// Per-variant sprite geometry and animation timing.
pub mod sprite {
    use std::time::Duration;

    pub const ENEMY_SIZE: f32 = 3.0;
    pub const ENEMY_DURATION: Duration = Duration::from_millis(500);
    pub const ENEMY_FRAMES: u32 = 30;

    pub const GATE_DURATION: Duration = Duration::from_millis(3000);
    pub const GATE_FRAMES: u32 = 180;
    /// Stroke width of the gate's oval, in pixels.
    pub const GATE_STROKE: f32 = 2.0;

    pub const WELL_SIZE: f32 = 4.0;
    pub const WELL_DURATION: Duration = Duration::from_millis(200);
    pub const WELL_FRAMES: u32 = 12;
}
