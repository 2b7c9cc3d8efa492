//! The game simulation: a countdown/play/pause state machine driving tilt and
//! gravity physics, enemy pursuit, gate and enemy detection and level changes.
//!
//! [`Engine`] exposes the three operations a loop needs, [`Engine::init`],
//! [`Engine::update`] and [`Engine::render`], and is owned by the loop thread.
//! Other threads talk to it through [`SensorAggregator`] samples and
//! [`EngineControl`] requests only.

use std::sync::Arc;
use std::time::{Duration, Instant};

use glam::Vec2;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use tracing::{debug, info, trace, warn};

use crate::config::Config;
use crate::constants::{BOUNCE_VIBRATION_SPEED, COUNTDOWN, DEATH_ANIMATION_TICKS, ENDING_ANIMATION_TICKS};
use crate::feedback::{Cue, Feedback};
use crate::orientation::DefaultOrientation;
use crate::sensor::SensorAggregator;
use crate::surface::Surface;

mod control;
mod level;
pub mod physics;
mod render;
mod state;

pub use control::EngineControl;
pub use level::{spawn_point, Level};
pub use render::countdown_text;
pub use state::{Arena, BorderContact, PlayerState, Status, Transition};

use render::HelpPage;
use state::GameState;

pub struct Engine {
    orientation: DefaultOrientation,
    sensors: Arc<SensorAggregator>,
    control: Arc<EngineControl>,
    feedback: Box<dyn Feedback>,
    rng: SmallRng,
    state: Option<GameState>,
    help: HelpPage,
}

impl Engine {
    /// Creates an engine that reads tilt from `sensors` and fires cues into `feedback`.
    ///
    /// Nothing is simulated until [`Engine::init`] has seen a surface.
    pub fn new(orientation: DefaultOrientation, sensors: Arc<SensorAggregator>, feedback: Box<dyn Feedback>) -> Self {
        Self {
            orientation,
            sensors,
            control: Arc::new(EngineControl::default()),
            feedback,
            rng: SmallRng::from_rng(&mut rand::rng()),
            state: None,
            help: HelpPage::new(),
        }
    }

    pub fn from_config(config: &Config, sensors: Arc<SensorAggregator>, feedback: Box<dyn Feedback>) -> Self {
        let engine = Self::new(config.orientation, sensors, feedback).with_time_factor(config.time_factor);
        match config.seed {
            Some(seed) => engine.with_seed(seed),
            None => engine,
        }
    }

    /// Makes level generation reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = SmallRng::seed_from_u64(seed);
        self
    }

    pub fn with_time_factor(self, factor: f32) -> Self {
        self.control.set_time_factor(factor);
        self
    }

    /// A handle for requests from other threads (pause toggles, time factor).
    pub fn control(&self) -> Arc<EngineControl> {
        Arc::clone(&self.control)
    }

    /// Sets up the arena for a surface of `surface_size` pixels and loads the first level.
    ///
    /// The game starts paused on the help screen. A surface without area falls
    /// back to one pixel per unit.
    pub fn init(&mut self, surface_size: Vec2) {
        let arena = Arena::from_surface(surface_size).unwrap_or_else(|error| {
            warn!(%error, "Falling back to one pixel per unit");
            Arena::with_unit(surface_size.max(Vec2::ZERO), 1.0)
        });
        debug!(min = ?arena.min, max = ?arena.max, unit_pixels = arena.unit_pixels(), "Arena initialized");

        let level = Level::generate(1, &arena, &mut self.rng);
        // Starts on the help screen, with the countdown armed for when play resumes
        let state = GameState {
            arena,
            level,
            player: PlayerState::default(),
            status: Status::Pause,
            countdown: COUNTDOWN,
            gate_dwell: Duration::ZERO,
        };
        info!(level = 1, "Game initialized");
        self.state = Some(state);
    }

    /// Replaces all level entities and restarts the countdown.
    ///
    /// Does nothing before [`Engine::init`].
    pub fn load_level(&mut self, number: u32) {
        if let Some(state) = self.state.as_mut() {
            load_level(state, number, &mut self.rng);
        }
    }

    /// Flips between pausing and running. Resuming returns to the countdown if
    /// one was still in progress.
    pub fn toggle_pause(&mut self) {
        if let Some(state) = self.state.as_mut() {
            toggle_pause(state);
        }
    }

    /// Advances the simulation by one tick worth `delta` of real time.
    pub fn update(&mut self, delta: Duration) {
        let Some(state) = self.state.as_mut() else {
            return;
        };

        if self.control.take_pause_toggle() {
            toggle_pause(state);
        }

        match state.status {
            Status::Play => {
                let delta = scale(delta, self.control.time_factor());
                let tilt = self.orientation.map_tilt(self.sensors.pull());
                play_tick(state, tilt, delta, self.feedback.as_mut(), &mut self.rng);
            }
            Status::Countdown => {
                state.countdown = state.countdown.saturating_sub(delta);
                if state.countdown.is_zero() {
                    debug!(level = state.level.number, "Countdown finished");
                    state.status = Status::Play;
                }
            }
            Status::Pause => {}
        }
    }

    /// Draws the current state. Only sprite animation phases change.
    pub fn render(&mut self, surface: &mut dyn Surface) {
        if let Some(state) = self.state.as_mut() {
            render::render(state, &mut self.help, surface, Instant::now());
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.state.is_some()
    }

    pub fn status(&self) -> Option<Status> {
        self.state.as_ref().map(|state| state.status)
    }

    /// Time left before play starts.
    pub fn countdown(&self) -> Option<Duration> {
        self.state.as_ref().map(|state| state.countdown)
    }

    /// Continuous time the player has spent inside the gate.
    pub fn gate_dwell(&self) -> Option<Duration> {
        self.state.as_ref().map(|state| state.gate_dwell)
    }

    pub fn arena(&self) -> Option<&Arena> {
        self.state.as_ref().map(|state| &state.arena)
    }

    pub fn level(&self) -> Option<&Level> {
        self.state.as_ref().map(|state| &state.level)
    }

    pub fn player(&self) -> Option<&PlayerState> {
        self.state.as_ref().map(|state| &state.player)
    }

    /// Direct access to the level, for scripted scenarios.
    pub fn level_mut(&mut self) -> Option<&mut Level> {
        self.state.as_mut().map(|state| &mut state.level)
    }

    /// Direct access to the player, for scripted scenarios.
    pub fn player_mut(&mut self) -> Option<&mut PlayerState> {
        self.state.as_mut().map(|state| &mut state.player)
    }
}

/// Scales a tick by the time factor, keeping the real delta if the result is not a valid duration.
fn scale(delta: Duration, factor: f32) -> Duration {
    Duration::try_from_secs_f64(delta.as_secs_f64() * f64::from(factor)).unwrap_or_else(|error| {
        warn!(%error, factor, "Cannot scale tick, using it unscaled");
        delta
    })
}

fn toggle_pause(state: &mut GameState) {
    let next = match state.status {
        Status::Pause if !state.countdown.is_zero() => Status::Countdown,
        Status::Pause => Status::Play,
        Status::Play | Status::Countdown => Status::Pause,
    };
    debug!(from = %state.status, to = %next, "Toggled pause");
    state.status = next;
}

fn load_level(state: &mut GameState, number: u32, rng: &mut SmallRng) {
    state.status = Status::Countdown;
    state.countdown = COUNTDOWN;
    state.gate_dwell = Duration::ZERO;
    state.player.reset();
    state.level = Level::generate(number, &state.arena, rng);
    info!(level = number, "Loaded level");
}

/// One tick of full play: scripted transitions first, physics otherwise.
fn play_tick(state: &mut GameState, tilt: Vec2, delta: Duration, feedback: &mut dyn Feedback, rng: &mut SmallRng) {
    let seconds = delta.as_secs_f32();
    let player = &mut state.player;

    match &mut player.transition {
        Some(Transition::Dying { tick }) => {
            *tick += 1;
            let finished = *tick > DEATH_ANIMATION_TICKS;
            player.position += player.velocity * seconds;
            if finished {
                // Dying still moves on to the next level
                feedback.trigger(Cue::Death);
                let next = state.level.number + 1;
                info!(level = state.level.number, "Player died");
                load_level(state, next, rng);
            }
            return;
        }
        Some(Transition::Exiting { tick }) => {
            *tick += 1;
            let finished = *tick > ENDING_ANIMATION_TICKS;
            player.position += (state.level.gate.position - player.position) / 2.0;
            if finished {
                let next = state.level.number + 1;
                info!(level = state.level.number, "Level exited");
                load_level(state, next, rng);
            }
            return;
        }
        None => {}
    }

    let force = tilt + physics::gravity_force(player.position, &state.level.wells);
    physics::integrate(player, force, seconds);
    physics::pursue(&mut state.level.enemies, player.position, seconds);

    if let Some(index) = physics::find_enemy_collision(player.position, &state.level.enemies) {
        debug!(enemy = index, position = ?player.position, "Enemy collision");
        feedback.trigger(Cue::EnemyHit);
        player.transition = Some(Transition::Dying { tick: 0 });
    }

    if physics::gate_proximity(&mut state.gate_dwell, player.position, &state.level.gate, delta)
        && player.transition.is_none()
    {
        debug!(dwell = ?state.gate_dwell, "Reached the gate");
        player.transition = Some(Transition::Exiting { tick: 0 });
    }

    for velocity in physics::border_collision(player, &state.arena) {
        trace!(velocity, "Border bounce");
        if velocity.abs() > BOUNCE_VIBRATION_SPEED {
            feedback.trigger(Cue::BorderBounce);
        }
    }
}
