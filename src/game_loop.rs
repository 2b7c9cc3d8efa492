//! The fixed-rate pacing loop.
//!
//! A [`GameLoop`] knows nothing about the game. It locks a surface, runs the
//! initializer once, then one update and one render per iteration, sleeps off
//! the rest of the frame and catches up with update-only ticks when it falls
//! behind. [`spawn`] runs it on a dedicated thread.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use circular_buffer::CircularBuffer;
use glam::Vec2;
use parking_lot::{Condvar, Mutex};
use tracing::{debug, info, trace, warn};

use crate::constants::{FRAME_STATS_PERIOD, MAX_FPS, SURFACE_RETRY_TIME};
use crate::engine::Engine;
use crate::error::{GameError, GameResult, LoopError};
use crate::formatter;
use crate::surface::{LockedCanvas, Surface, SurfaceHolder};

/// Time left to `spin_sleep` after the coarse condvar wait, for accuracy.
const SPIN_MARGIN: Duration = Duration::from_millis(1);

/// Number of frame timings kept for the rolling statistics.
const FRAME_STATS_WINDOW: usize = 300;

type Initializer = Box<dyn FnMut(Vec2)>;
type Updater = Box<dyn FnMut(Duration)>;
type Renderer = Box<dyn FnMut(&mut dyn Surface)>;

/// The loop's run flag, with a sleep that a stop request cuts short.
#[derive(Debug)]
pub struct StopSignal {
    running: Mutex<bool>,
    wake: Condvar,
}

impl Default for StopSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl StopSignal {
    pub fn new() -> Self {
        Self {
            running: Mutex::new(true),
            wake: Condvar::new(),
        }
    }

    pub fn is_running(&self) -> bool {
        *self.running.lock()
    }

    /// Clears the run flag and wakes any sleeping loop.
    pub fn stop(&self) {
        *self.running.lock() = false;
        self.wake.notify_all();
    }

    /// Sleeps for `duration`, or less if stopped in the meantime.
    ///
    /// Returns `false` when the sleep ended because of a stop request.
    pub fn sleep(&self, duration: Duration) -> bool {
        let deadline = Instant::now() + duration;

        {
            let mut running = self.running.lock();
            if let Some(coarse) = deadline.checked_sub(SPIN_MARGIN) {
                while *running && Instant::now() < coarse {
                    if self.wake.wait_until(&mut running, coarse).timed_out() {
                        break;
                    }
                }
            }
            if !*running {
                return false;
            }
        }

        spin_sleep::sleep(deadline.saturating_duration_since(Instant::now()));
        self.is_running()
    }
}

/// Counters describing what a finished loop did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopReport {
    /// Iterations started, including ones without a surface
    pub iterations: u64,
    /// Update calls, catch-up ticks included
    pub updates: u64,
    pub renders: u64,
    /// Update-only catch-up ticks
    pub skipped_frames: u64,
    /// Iterations that found no surface to draw on
    pub unavailable: u64,
}

/// Rolling update+render timings, logged periodically.
struct FrameStats {
    timings: CircularBuffer<FRAME_STATS_WINDOW, Duration>,
    last_report: Instant,
}

impl FrameStats {
    fn new() -> Self {
        Self {
            timings: CircularBuffer::new(),
            last_report: Instant::now(),
        }
    }

    fn record(&mut self, elapsed: Duration) {
        self.timings.push_back(elapsed);
        if self.last_report.elapsed() >= FRAME_STATS_PERIOD {
            self.report();
            self.last_report = Instant::now();
        }
    }

    fn report(&self) {
        let count = self.timings.len() as f64;
        if count == 0.0 {
            return;
        }

        let mean = self.timings.iter().map(Duration::as_secs_f64).sum::<f64>() / count;
        let variance = self
            .timings
            .iter()
            .map(|timing| {
                let diff = mean - timing.as_secs_f64();
                diff * diff
            })
            .sum::<f64>()
            / count;

        debug!(
            frames = self.timings.len(),
            mean = ?Duration::from_secs_f64(mean),
            std_dev = ?Duration::from_secs_f64(variance.sqrt()),
            "Frame timings"
        );
    }
}

/// Collects the loop's collaborators. Every one of them is required.
pub struct GameLoopBuilder<H> {
    holder: Option<H>,
    initializer: Option<Initializer>,
    updater: Option<Updater>,
    renderer: Option<Renderer>,
    tick_rate: u32,
    signal: Option<Arc<StopSignal>>,
}

impl<H: SurfaceHolder> Default for GameLoopBuilder<H> {
    fn default() -> Self {
        Self {
            holder: None,
            initializer: None,
            updater: None,
            renderer: None,
            tick_rate: MAX_FPS,
            signal: None,
        }
    }
}

impl<H: SurfaceHolder> GameLoopBuilder<H> {
    pub fn holder(mut self, holder: H) -> Self {
        self.holder = Some(holder);
        self
    }

    /// Runs once, with the surface size, before the first update.
    pub fn initializer(mut self, initializer: impl FnMut(Vec2) + 'static) -> Self {
        self.initializer = Some(Box::new(initializer));
        self
    }

    /// Advances the simulation by the given frame period.
    pub fn updater(mut self, updater: impl FnMut(Duration) + 'static) -> Self {
        self.updater = Some(Box::new(updater));
        self
    }

    pub fn renderer(mut self, renderer: impl FnMut(&mut dyn Surface) + 'static) -> Self {
        self.renderer = Some(Box::new(renderer));
        self
    }

    /// Wires the engine's init, update and render steps in one go.
    pub fn engine(self, engine: Engine) -> Self {
        let engine = Rc::new(RefCell::new(engine));
        let (init, update, render) = (Rc::clone(&engine), Rc::clone(&engine), engine);

        self.initializer(move |size| init.borrow_mut().init(size))
            .updater(move |delta| update.borrow_mut().update(delta))
            .renderer(move |surface| render.borrow_mut().render(surface))
    }

    pub fn tick_rate(mut self, tick_rate: u32) -> Self {
        self.tick_rate = tick_rate;
        self
    }

    /// Shares an existing stop signal instead of creating a fresh one.
    pub fn signal(mut self, signal: Arc<StopSignal>) -> Self {
        self.signal = Some(signal);
        self
    }

    pub fn build(self) -> Result<GameLoop<H>, LoopError> {
        let holder = self.holder.ok_or(LoopError::MissingCollaborator("surface"))?;
        let initializer = self.initializer.ok_or(LoopError::MissingCollaborator("initializer"))?;
        let updater = self.updater.ok_or(LoopError::MissingCollaborator("updater"))?;
        let renderer = self.renderer.ok_or(LoopError::MissingCollaborator("renderer"))?;
        if self.tick_rate == 0 {
            return Err(LoopError::ZeroTickRate);
        }

        Ok(GameLoop {
            holder,
            initializer,
            updater,
            renderer,
            initialized: false,
            period: Duration::from_secs(1) / self.tick_rate,
            max_frame_skip: self.tick_rate / 10,
            signal: self.signal.unwrap_or_default(),
            stats: FrameStats::new(),
        })
    }
}

/// A fixed-rate update/render loop around a surface holder.
pub struct GameLoop<H> {
    holder: H,
    initializer: Initializer,
    updater: Updater,
    renderer: Renderer,
    initialized: bool,
    period: Duration,
    max_frame_skip: u32,
    signal: Arc<StopSignal>,
    stats: FrameStats,
}

impl<H: SurfaceHolder> GameLoop<H> {
    pub fn builder() -> GameLoopBuilder<H> {
        GameLoopBuilder::default()
    }

    pub fn holder(&self) -> &H {
        &self.holder
    }

    pub fn signal(&self) -> &Arc<StopSignal> {
        &self.signal
    }

    /// The simulated time handed to every update.
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Runs until the stop signal is raised.
    ///
    /// The surface is always posted back before sleeping, and before unwinding
    /// if an update or render panics.
    pub fn run(&mut self) -> LoopReport {
        let mut report = LoopReport::default();
        info!(period = ?self.period, max_frame_skip = self.max_frame_skip, "Game loop started");

        while self.signal.is_running() {
            formatter::increment_tick();
            report.iterations += 1;
            let started = Instant::now();

            match LockedCanvas::lock(&mut self.holder) {
                None => {
                    report.unavailable += 1;
                    trace!("No surface available, retrying");
                    if !self.signal.sleep(SURFACE_RETRY_TIME) {
                        break;
                    }
                    continue;
                }
                Some(mut canvas) => {
                    if !self.initialized {
                        let size = canvas.size();
                        debug!(width = size.x, height = size.y, "Running initializer");
                        (self.initializer)(size);
                        self.initialized = true;
                    }

                    (self.updater)(self.period);
                    report.updates += 1;
                    (self.renderer)(&mut *canvas);
                    report.renders += 1;
                }
            }

            let elapsed = started.elapsed();
            self.stats.record(elapsed);

            if elapsed < self.period {
                if !self.signal.sleep(self.period - elapsed) {
                    break;
                }
                continue;
            }

            let mut lag = elapsed - self.period;
            let mut skipped = 0;
            while !lag.is_zero() && skipped < self.max_frame_skip && self.signal.is_running() {
                (self.updater)(self.period);
                lag = lag.saturating_sub(self.period);
                skipped += 1;
            }
            if skipped > 0 {
                debug!(skipped, behind = ?elapsed - self.period, "Skipped frames");
                report.updates += u64::from(skipped);
                report.skipped_frames += u64::from(skipped);
            }
        }

        info!(
            iterations = report.iterations,
            updates = report.updates,
            renders = report.renders,
            "Game loop stopped"
        );
        report
    }
}

/// A loop running on its own thread.
pub struct LoopHandle {
    signal: Arc<StopSignal>,
    thread: JoinHandle<GameResult<LoopReport>>,
}

impl LoopHandle {
    pub fn signal(&self) -> Arc<StopSignal> {
        Arc::clone(&self.signal)
    }

    /// Requests a stop. The loop finishes its current tick first.
    pub fn stop(&self) {
        self.signal.stop();
    }

    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    /// Waits for the loop thread to exit.
    pub fn join(self) -> GameResult<LoopReport> {
        self.thread.join().unwrap_or_else(|_| {
            warn!("Game loop thread panicked");
            Err(GameError::InvalidState("game loop thread panicked".to_string()))
        })
    }
}

/// Starts a loop on a dedicated thread.
///
/// The loop is built on that thread by `factory`, so its callbacks need not
/// be `Send`. Its stop signal is replaced with the one the handle controls.
pub fn spawn<H, F>(factory: F) -> Result<LoopHandle, LoopError>
where
    H: SurfaceHolder + 'static,
    F: FnOnce() -> GameResult<GameLoop<H>> + Send + 'static,
{
    let signal = Arc::new(StopSignal::new());
    let loop_signal = Arc::clone(&signal);

    let thread = thread::Builder::new().name("game-loop".to_string()).spawn(move || {
        let mut game_loop = factory()?;
        game_loop.signal = loop_signal;
        Ok(game_loop.run())
    })?;

    Ok(LoopHandle { signal, thread })
}
