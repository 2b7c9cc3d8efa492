use std::time::Duration;

use glam::Vec2;
use pretty_assertions::assert_eq;
use speculoos::prelude::*;
use thedot::constants::{COUNTDOWN, ENEMY_COUNT, GATE_SIZE, GRAVITY_WELL_POWER, MAX_TIME_FACTOR};
use thedot::engine::{BorderContact, Engine, PlayerState, Status, Transition};
use thedot::feedback::{Cue, Silent};
use thedot::orientation::DefaultOrientation;
use thedot::sensor::SensorAggregator;
use thedot::sprite::{Sprite, SpriteKind};

mod common;

use common::{clear_level, paused_engine, playing_engine, tick};

const TICK: Duration = Duration::from_millis(10);

#[test]
fn test_update_before_init_does_nothing() {
    let mut engine = Engine::new(
        DefaultOrientation::Portrait,
        std::sync::Arc::new(SensorAggregator::new()),
        Box::new(Silent),
    );
    engine.update(TICK);
    engine.toggle_pause();

    assert_that(&engine.is_initialized()).is_false();
    assert_that(&engine.status()).is_none();
}

#[test]
fn test_init_starts_paused_on_level_one() {
    let harness = paused_engine();
    let engine = &harness.engine;

    assert_eq!(engine.status(), Some(Status::Pause));
    assert_eq!(engine.countdown(), Some(COUNTDOWN));
    assert_eq!(engine.level().map(|level| level.number), Some(1));
    assert_eq!(engine.player().map(|player| player.position), Some(Vec2::ZERO));

    let arena = engine.arena().unwrap();
    assert_eq!(arena.unit_pixels(), 5.0);
    assert_eq!(arena.min, Vec2::new(-100.0, -50.0));
    assert_eq!(arena.max, Vec2::new(100.0, 50.0));
}

#[test]
fn test_init_with_degenerate_surface_falls_back_to_one_pixel_units() {
    let mut engine = Engine::new(
        DefaultOrientation::Portrait,
        std::sync::Arc::new(SensorAggregator::new()),
        Box::new(Silent),
    );
    engine.init(Vec2::ZERO);

    assert_that(&engine.is_initialized()).is_true();
    assert_eq!(engine.arena().map(|arena| arena.unit_pixels()), Some(1.0));
    assert_eq!(engine.status(), Some(Status::Pause));
}

#[test]
fn test_pause_freezes_everything() {
    let mut harness = paused_engine();
    harness.sensors.record([5.0, 5.0, 0.0]);
    let enemies_before: Vec<Vec2> = harness.engine.level().unwrap().enemies.iter().map(|e| e.position).collect();

    tick(&mut harness.engine, 30, TICK);

    let enemies_after: Vec<Vec2> = harness.engine.level().unwrap().enemies.iter().map(|e| e.position).collect();
    assert_eq!(enemies_before, enemies_after);
    assert_eq!(harness.engine.countdown(), Some(COUNTDOWN));
    assert_eq!(harness.engine.player().unwrap().velocity, Vec2::ZERO);
}

#[test]
fn test_countdown_runs_into_play() {
    let mut harness = paused_engine();
    harness.engine.toggle_pause();
    assert_eq!(harness.engine.status(), Some(Status::Countdown));

    harness.engine.update(Duration::from_millis(1000));
    assert_eq!(harness.engine.countdown(), Some(Duration::from_millis(2000)));
    assert_eq!(harness.engine.status(), Some(Status::Countdown));

    // Overshooting the remaining time still lands exactly on zero
    harness.engine.update(Duration::from_millis(2500));
    assert_eq!(harness.engine.countdown(), Some(Duration::ZERO));
    assert_eq!(harness.engine.status(), Some(Status::Play));
}

#[test]
fn test_countdown_ignores_time_factor() {
    let mut harness = paused_engine();
    harness.engine.control().set_time_factor(0.5);
    harness.engine.toggle_pause();

    harness.engine.update(Duration::from_millis(1000));
    assert_eq!(harness.engine.countdown(), Some(Duration::from_millis(2000)));
}

#[test]
fn test_pause_during_countdown_resumes_to_countdown() {
    let mut harness = paused_engine();
    harness.engine.toggle_pause();
    harness.engine.update(Duration::from_millis(1000));

    harness.engine.toggle_pause();
    assert_eq!(harness.engine.status(), Some(Status::Pause));
    harness.engine.update(Duration::from_millis(1000));
    assert_eq!(harness.engine.countdown(), Some(Duration::from_millis(2000)));

    harness.engine.toggle_pause();
    assert_eq!(harness.engine.status(), Some(Status::Countdown));
}

#[test]
fn test_pause_during_play_resumes_to_play() {
    let mut harness = playing_engine();
    harness.engine.toggle_pause();
    assert_eq!(harness.engine.status(), Some(Status::Pause));

    harness.engine.toggle_pause();
    assert_eq!(harness.engine.status(), Some(Status::Play));
}

#[test]
fn test_control_pause_request_is_seen_on_next_update() {
    let mut harness = paused_engine();
    let control = harness.engine.control();

    control.request_pause_toggle();
    assert_eq!(harness.engine.status(), Some(Status::Pause));

    harness.engine.update(Duration::from_millis(1000));
    assert_eq!(harness.engine.status(), Some(Status::Countdown));
    assert_eq!(harness.engine.countdown(), Some(Duration::from_millis(2000)));
}

#[test]
fn test_control_pause_requests_cancel_out() {
    let mut harness = paused_engine();
    let control = harness.engine.control();

    control.request_pause_toggle();
    control.request_pause_toggle();
    harness.engine.update(TICK);

    assert_eq!(harness.engine.status(), Some(Status::Pause));
}

#[test]
fn test_control_rejects_invalid_time_factor() {
    let harness = paused_engine();
    let control = harness.engine.control();

    control.set_time_factor(2.0);
    control.set_time_factor(0.0);
    control.set_time_factor(f32::NAN);

    assert_eq!(control.time_factor(), 2.0);
}

#[test]
fn test_control_rejects_oversized_time_factor() {
    let mut harness = playing_engine();
    clear_level(&mut harness.engine);
    let control = harness.engine.control();

    control.set_time_factor(1.0e30);
    assert_eq!(control.time_factor(), 1.0);

    control.set_time_factor(MAX_TIME_FACTOR);
    assert_eq!(control.time_factor(), MAX_TIME_FACTOR);

    harness.engine.update(Duration::from_secs(1) / 60);
    assert_eq!(harness.engine.status(), Some(Status::Play));
}

#[test]
fn test_level_load_resets_player_and_gate_dwell() {
    let mut harness = playing_engine();
    clear_level(&mut harness.engine);
    harness.engine.level_mut().unwrap().gate.position = Vec2::ZERO;

    // One tick on top of the gate starts the dwell timer
    harness.engine.update(Duration::from_millis(30));
    assert_that(&harness.engine.gate_dwell().unwrap()).is_greater_than(Duration::ZERO);

    let player = harness.engine.player_mut().unwrap();
    player.position = Vec2::new(50.0, 20.0);
    player.velocity = Vec2::new(5.0, -3.0);
    player.contact = BorderContact::HORIZONTAL | BorderContact::VERTICAL;
    player.transition = Some(Transition::Dying { tick: 4 });

    harness.engine.load_level(4);

    assert_eq!(harness.engine.player(), Some(&PlayerState::default()));
    assert_eq!(harness.engine.gate_dwell(), Some(Duration::ZERO));
    assert_eq!(harness.engine.status(), Some(Status::Countdown));
    assert_eq!(harness.engine.countdown(), Some(COUNTDOWN));
    assert_eq!(harness.engine.level().map(|level| level.number), Some(4));
}

#[test]
fn test_level_load_places_entities_inside_margin() {
    let mut harness = paused_engine();
    let margin = GATE_SIZE * 2.0;

    for number in 1..=25 {
        harness.engine.load_level(number);
        let arena = *harness.engine.arena().unwrap();
        let level = harness.engine.level().unwrap();

        assert_eq!(level.number, number);
        assert_eq!(level.enemies.len(), ENEMY_COUNT);
        assert_eq!(level.wells.len(), 1);
        assert_eq!(
            level.wells[0].kind,
            SpriteKind::GravityWell {
                power: -GRAVITY_WELL_POWER,
                reach: 50.0
            }
        );

        let positions = level
            .enemies
            .iter()
            .chain(&level.wells)
            .chain(std::iter::once(&level.gate))
            .map(|sprite| sprite.position);
        for position in positions {
            assert_that(&(position.cmpge(arena.min + margin).all())).is_true();
            assert_that(&(position.cmple(arena.max - margin).all())).is_true();
        }
    }

    assert_eq!(harness.engine.status(), Some(Status::Countdown));
    assert_eq!(harness.engine.countdown(), Some(COUNTDOWN));
}

#[test]
fn test_seeded_engines_generate_identical_levels() {
    let first = paused_engine();
    let second = paused_engine();

    let positions = |harness: &common::Harness| -> Vec<Vec2> {
        let level = harness.engine.level().unwrap();
        level.enemies.iter().map(|enemy| enemy.position).chain([level.gate.position]).collect()
    };
    assert_eq!(positions(&first), positions(&second));
}

#[test]
fn test_tilt_accelerates_player() {
    let mut harness = playing_engine();
    clear_level(&mut harness.engine);

    // Portrait devices swap the raw axes: raw x drives the arena's y
    harness.sensors.record([1.0, 0.0, 9.81]);
    harness.engine.update(TICK);

    let player = harness.engine.player().unwrap();
    assert_eq!(player.velocity.x, 0.0);
    assert!((player.velocity.y - 2.0).abs() < 1e-3, "velocity was {:?}", player.velocity);
    assert!((player.position.y - 0.02).abs() < 1e-4, "position was {:?}", player.position);
}

#[test]
fn test_time_factor_scales_play_ticks() {
    let mut harness = playing_engine();
    clear_level(&mut harness.engine);
    harness.engine.control().set_time_factor(0.5);

    harness.sensors.record([1.0, 0.0, 9.81]);
    harness.engine.update(TICK);

    let velocity = harness.engine.player().unwrap().velocity;
    assert!((velocity.y - 1.0).abs() < 1e-3, "velocity was {velocity:?}");
}

#[test]
fn test_enemies_chase_the_player() {
    let mut harness = playing_engine();
    clear_level(&mut harness.engine);
    harness.engine.level_mut().unwrap().enemies.push(Sprite::enemy(Vec2::new(0.0, 40.0)));

    tick(&mut harness.engine, 10, TICK);

    let enemy = &harness.engine.level().unwrap().enemies[0];
    assert!((enemy.position.y - 37.5).abs() < 1e-3, "enemy at {:?}", enemy.position);
    assert!(enemy.position.x.abs() < 1e-3);
}

#[test]
fn test_enemy_hit_plays_death_and_advances_level() {
    let mut harness = playing_engine();
    clear_level(&mut harness.engine);
    harness.engine.level_mut().unwrap().enemies.push(Sprite::enemy(Vec2::new(1.0, 0.0)));

    harness.engine.update(TICK);
    assert_that(&harness.engine.player().unwrap().is_dying()).is_true();
    assert_eq!(harness.feedback.cues(), vec![Cue::EnemyHit]);

    tick(&mut harness.engine, 10, TICK);
    assert_eq!(harness.engine.level().unwrap().number, 1);
    assert_that(&harness.engine.player().unwrap().is_dying()).is_true();

    harness.engine.update(TICK);
    assert_eq!(harness.engine.level().unwrap().number, 2);
    assert_eq!(harness.engine.status(), Some(Status::Countdown));
    assert_eq!(harness.engine.countdown(), Some(COUNTDOWN));
    assert_eq!(harness.engine.player().unwrap().transition, None);
    assert_eq!(harness.feedback.cues(), vec![Cue::EnemyHit, Cue::Death]);
}

#[test]
fn test_dwelling_in_gate_exits_level() {
    let mut harness = playing_engine();
    clear_level(&mut harness.engine);
    harness.engine.level_mut().unwrap().gate.position = Vec2::ZERO;
    let step = Duration::from_millis(30);

    tick(&mut harness.engine, 3, step);
    assert_eq!(harness.engine.gate_dwell(), Some(Duration::from_millis(90)));
    assert_that(&harness.engine.player().unwrap().is_exiting()).is_false();

    harness.engine.update(step);
    assert_that(&harness.engine.player().unwrap().is_exiting()).is_true();

    tick(&mut harness.engine, 10, step);
    assert_eq!(harness.engine.level().unwrap().number, 1);

    harness.engine.update(step);
    assert_eq!(harness.engine.level().unwrap().number, 2);
    assert_eq!(harness.engine.gate_dwell(), Some(Duration::ZERO));
    assert_that(&harness.feedback.cues()).is_empty();
}

#[test]
fn test_exit_eases_player_into_gate() {
    let mut harness = playing_engine();
    clear_level(&mut harness.engine);
    harness.engine.level_mut().unwrap().gate.position = Vec2::new(2.0, 0.0);
    let step = Duration::from_millis(50);

    // Sitting still, 2 units from the gate: the second tick reaches 100 ms
    tick(&mut harness.engine, 2, step);
    assert_that(&harness.engine.player().unwrap().is_exiting()).is_true();
    let start = harness.engine.player().unwrap().position;

    harness.engine.update(step);
    let eased = harness.engine.player().unwrap().position;
    assert!((eased.x - (start.x + (2.0 - start.x) / 2.0)).abs() < 1e-4);
}

#[test]
fn test_death_takes_precedence_over_exit() {
    let mut harness = playing_engine();
    clear_level(&mut harness.engine);
    harness.engine.level_mut().unwrap().gate.position = Vec2::ZERO;
    let step = Duration::from_millis(30);

    tick(&mut harness.engine, 3, step);
    harness.engine.level_mut().unwrap().enemies.push(Sprite::enemy(Vec2::new(1.0, 0.0)));
    harness.engine.update(step);

    let player = harness.engine.player().unwrap();
    assert_that(&player.is_dying()).is_true();
    assert_that(&player.is_exiting()).is_false();
}

#[test]
fn test_fast_border_hit_vibrates_once() {
    let mut harness = playing_engine();
    clear_level(&mut harness.engine);
    {
        let player = harness.engine.player_mut().unwrap();
        player.position = Vec2::new(99.99, 0.0);
        player.velocity = Vec2::new(600.0, 0.0);
    }

    harness.engine.update(TICK);
    let player = harness.engine.player().unwrap();
    assert_eq!(player.position.x, 100.0);
    assert_eq!(player.velocity.x, -300.0);

    tick(&mut harness.engine, 5, TICK);
    assert_eq!(harness.feedback.cues(), vec![Cue::BorderBounce]);
}

#[test]
fn test_slow_border_hit_is_silent() {
    let mut harness = playing_engine();
    clear_level(&mut harness.engine);
    {
        let player = harness.engine.player_mut().unwrap();
        player.position = Vec2::new(99.99, 0.0);
        player.velocity = Vec2::new(4.0, 0.0);
    }

    harness.engine.update(TICK);

    assert_eq!(harness.engine.player().unwrap().velocity.x, -2.0);
    assert_that(&harness.feedback.cues()).is_empty();
}

#[test]
fn test_gravity_well_pulls_player() {
    let mut harness = playing_engine();
    clear_level(&mut harness.engine);
    harness
        .engine
        .level_mut()
        .unwrap()
        .wells
        .push(Sprite::gravity_well(-GRAVITY_WELL_POWER, Vec2::new(20.0, 0.0)));

    harness.engine.update(TICK);

    let velocity = harness.engine.player().unwrap().velocity;
    assert_that(&(velocity.x > 0.0)).is_true();
    assert!(velocity.y.abs() < 1e-4);
}
