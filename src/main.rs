use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{anyhow, bail, Context, Result};
use thedot::config::Config;
use thedot::engine::Engine;
use thedot::feedback::CuePool;
use thedot::formatter::TickFormatter;
use thedot::game_loop::{self, GameLoop, LoopHandle, LoopReport};
use thedot::sensor::SensorAggregator;
use thedot::surface::AsciiHolder;
use tracing::{debug, info};
use tracing_error::ErrorLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Period of the synthetic tilt samples.
const SAMPLE_PERIOD: Duration = Duration::from_millis(5);
/// One full turn of the synthetic tilt, in seconds.
const TILT_TURN: f32 = 8.0;
/// Print one frame out of this many when `--ascii` is given.
const ASCII_PRINT_EVERY: u32 = 30;

struct Args {
    ascii: bool,
    seconds: u64,
}

fn parse_args() -> Result<Args> {
    let mut args = Args { ascii: false, seconds: 5 };

    let mut raw = std::env::args().skip(1);
    while let Some(arg) = raw.next() {
        match arg.as_str() {
            "--ascii" => args.ascii = true,
            "--seconds" => {
                let value = raw.next().ok_or_else(|| anyhow!("--seconds needs a value"))?;
                args.seconds = value.parse().with_context(|| format!("invalid --seconds value: {value}"))?;
            }
            other => bail!("unknown argument: {other}"),
        }
    }

    Ok(args)
}

fn setup_tracing() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().with_writer(std::io::stderr).event_format(TickFormatter))
        .with(ErrorLayer::default())
        .try_init()
        .context("failed to install tracing subscriber")
}

/// Feeds a slow circular tilt into the aggregator until `stop` is raised.
fn spawn_tilt_producer(sensors: Arc<SensorAggregator>, stop: Arc<AtomicBool>) -> Result<thread::JoinHandle<u64>> {
    thread::Builder::new()
        .name("tilt-producer".to_string())
        .spawn(move || {
            let started = Instant::now();
            let mut samples = 0;
            while !stop.load(Ordering::Relaxed) {
                let angle = started.elapsed().as_secs_f32() / TILT_TURN * std::f32::consts::TAU;
                sensors.record([angle.cos() * 2.0, angle.sin() * 2.0, 9.81]);
                samples += 1;
                thread::sleep(SAMPLE_PERIOD);
            }
            samples
        })
        .context("failed to spawn tilt producer")
}

/// Stops the loop and the producer, then collects both results.
///
/// The producer is always told to stop, even when the loop failed.
fn shut_down(handle: LoopHandle, stop_producer: &AtomicBool, producer: thread::JoinHandle<u64>) -> Result<(LoopReport, u64)> {
    handle.stop();
    let report = handle.join();
    stop_producer.store(true, Ordering::Relaxed);
    let samples = producer.join().map_err(|_| anyhow!("tilt producer panicked"))?;
    Ok((report?, samples))
}

fn main() -> Result<()> {
    setup_tracing()?;
    let args = parse_args()?;
    let config = Config::load()?;
    debug!(?config, "Loaded configuration");

    let sensors = Arc::new(SensorAggregator::new());
    let mut cues = CuePool::new();
    cues.set_mute(config.muted);

    let engine = Engine::from_config(&config, Arc::clone(&sensors), Box::new(cues));
    let control = engine.control();

    let stop_producer = Arc::new(AtomicBool::new(false));
    let producer = spawn_tilt_producer(Arc::clone(&sensors), Arc::clone(&stop_producer))?;

    let print_every = args.ascii.then_some(ASCII_PRINT_EVERY);
    let (width, height, tick_rate) = (config.surface_width, config.surface_height, config.tick_rate);
    let handle = game_loop::spawn(move || {
        Ok(GameLoop::builder()
            .holder(AsciiHolder::new(width, height, print_every))
            .engine(engine)
            .tick_rate(tick_rate)
            .build()?)
    })?;

    // Leave the start-up help screen
    control.request_pause_toggle();
    info!(seconds = args.seconds, "Running");
    thread::sleep(Duration::from_secs(args.seconds));

    let (report, samples) = shut_down(handle, &stop_producer, producer)?;

    info!(
        iterations = report.iterations,
        updates = report.updates,
        renders = report.renders,
        skipped_frames = report.skipped_frames,
        samples,
        "Finished"
    );
    Ok(())
}
