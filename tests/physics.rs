use std::time::Duration;

use glam::Vec2;
use pretty_assertions::assert_eq;
use speculoos::prelude::*;
use thedot::engine::physics::{
    border_collision, collision_distance, find_enemy_collision, gate_proximity, gravity_force, integrate, pursue,
};
use thedot::engine::{Arena, BorderContact, PlayerState};
use thedot::sprite::Sprite;

fn arena() -> Arena {
    // ±100 by ±50 units
    Arena::with_unit(Vec2::new(200.0, 100.0), 1.0)
}

fn player_at(position: Vec2, velocity: Vec2) -> PlayerState {
    PlayerState {
        position,
        velocity,
        ..Default::default()
    }
}

#[test]
fn test_gravity_attracts_with_negative_power() {
    let wells = [Sprite::gravity_well(-15.0, Vec2::ZERO)];
    let force = gravity_force(Vec2::new(10.0, 0.0), &wells);

    assert!((force.x - -15.0 / 11.0).abs() < 1e-5, "force was {force:?}");
    assert!(force.y.abs() < 1e-5);
}

#[test]
fn test_gravity_repels_with_positive_power() {
    let wells = [Sprite::gravity_well(15.0, Vec2::ZERO)];
    let force = gravity_force(Vec2::new(0.0, -4.0), &wells);

    assert!((force.y - -3.0).abs() < 1e-5, "force was {force:?}");
}

#[test]
fn test_gravity_reach() {
    let wells = [Sprite::gravity_well(-15.0, Vec2::ZERO)];

    assert_eq!(gravity_force(Vec2::new(60.0, 0.0), &wells), Vec2::ZERO);
    let at_edge = gravity_force(Vec2::new(50.0, 0.0), &wells);
    assert!((at_edge.x - -15.0 / 51.0).abs() < 1e-5, "force was {at_edge:?}");
}

#[test]
fn test_gravity_sums_wells_and_ignores_other_sprites() {
    let sprites = [
        Sprite::gravity_well(-10.0, Vec2::new(-5.0, 0.0)),
        Sprite::gravity_well(-10.0, Vec2::new(5.0, 0.0)),
        Sprite::enemy(Vec2::new(1.0, 0.0)),
        Sprite::gate(Vec2::new(0.0, 1.0)),
    ];

    // Two equal wells on either side cancel out
    let force = gravity_force(Vec2::ZERO, &sprites);
    assert!(force.length() < 1e-5, "force was {force:?}");
}

#[test]
fn test_gravity_with_zero_power() {
    let wells = [Sprite::gravity_well(0.0, Vec2::ZERO)];
    assert_eq!(gravity_force(Vec2::new(3.0, 4.0), &wells), Vec2::ZERO);
}

#[test]
fn test_integrate_applies_force_then_velocity() {
    let mut player = PlayerState::default();
    integrate(&mut player, Vec2::new(1.0, 0.0), 0.5);

    // a = F / 0.005 = 200, v = 100 after half a second, p = v * 0.5
    assert!((player.velocity.x - 100.0).abs() < 1e-3, "velocity was {:?}", player.velocity);
    assert!((player.position.x - 50.0).abs() < 1e-3, "position was {:?}", player.position);
    assert_eq!(player.velocity.y, 0.0);
}

#[test]
fn test_integrate_without_force_coasts() {
    let mut player = player_at(Vec2::new(1.0, 1.0), Vec2::new(2.0, -4.0));
    integrate(&mut player, Vec2::ZERO, 0.25);

    assert_eq!(player.velocity, Vec2::new(2.0, -4.0));
    assert_eq!(player.position, Vec2::new(1.5, 0.0));
}

#[test]
fn test_pursue_moves_at_enemy_speed() {
    let mut enemies = [Sprite::enemy(Vec2::new(10.0, 0.0)), Sprite::enemy(Vec2::new(0.0, -10.0))];
    pursue(&mut enemies, Vec2::ZERO, 0.1);

    assert!((enemies[0].position.x - 7.5).abs() < 1e-4, "enemy at {:?}", enemies[0].position);
    assert!(enemies[0].position.y.abs() < 1e-4);
    assert!((enemies[1].position.y - -7.5).abs() < 1e-4, "enemy at {:?}", enemies[1].position);
}

#[test]
fn test_pursue_leaves_other_sprites_alone() {
    let mut sprites = [Sprite::gate(Vec2::new(10.0, 0.0)), Sprite::gravity_well(-15.0, Vec2::new(0.0, 10.0))];
    pursue(&mut sprites, Vec2::ZERO, 1.0);

    assert_eq!(sprites[0].position, Vec2::new(10.0, 0.0));
    assert_eq!(sprites[1].position, Vec2::new(0.0, 10.0));
}

#[test]
fn test_collision_threshold_is_strict() {
    let enemies = [Sprite::enemy(Vec2::ZERO)];
    assert_eq!(collision_distance(&enemies[0]), 2.0);

    assert_eq!(find_enemy_collision(Vec2::new(1.99, 0.0), &enemies), Some(0));
    assert_that(&find_enemy_collision(Vec2::new(2.0, 0.0), &enemies)).is_none();
}

#[test]
fn test_collision_reports_first_enemy() {
    let enemies = [
        Sprite::enemy(Vec2::new(50.0, 0.0)),
        Sprite::enemy(Vec2::new(1.0, 0.0)),
        Sprite::enemy(Vec2::new(-1.0, 0.0)),
    ];
    assert_eq!(find_enemy_collision(Vec2::ZERO, &enemies), Some(1));
}

#[test]
fn test_gate_dwell_accumulates_until_exit_time() {
    let gate = Sprite::gate(Vec2::ZERO);
    let mut dwell = Duration::ZERO;
    let step = Duration::from_millis(50);

    assert_that(&gate_proximity(&mut dwell, Vec2::new(1.0, 1.0), &gate, step)).is_false();
    assert_eq!(dwell, step);
    assert_that(&gate_proximity(&mut dwell, Vec2::new(-1.0, 0.0), &gate, step)).is_true();
    assert_eq!(dwell, Duration::from_millis(100));
}

#[test]
fn test_gate_dwell_resets_when_leaving() {
    let gate = Sprite::gate(Vec2::ZERO);
    let mut dwell = Duration::from_millis(90);

    assert_that(&gate_proximity(&mut dwell, Vec2::new(3.6, 0.0), &gate, Duration::from_millis(50))).is_false();
    assert_eq!(dwell, Duration::ZERO);
}

#[test]
fn test_gate_proximity_boundary_is_inclusive() {
    let gate = Sprite::gate(Vec2::ZERO);
    let mut dwell = Duration::ZERO;

    gate_proximity(&mut dwell, Vec2::new(0.0, 3.5), &gate, Duration::from_millis(20));
    assert_eq!(dwell, Duration::from_millis(20));
}

#[test]
fn test_gate_proximity_ignores_non_gates() {
    let enemy = Sprite::enemy(Vec2::ZERO);
    let mut dwell = Duration::from_millis(500);

    assert_that(&gate_proximity(&mut dwell, Vec2::ZERO, &enemy, Duration::from_millis(20))).is_false();
    assert_eq!(dwell, Duration::from_millis(500));
}

#[test]
fn test_border_clamps_and_bounces() {
    let mut player = player_at(Vec2::new(105.0, 0.0), Vec2::new(10.0, 1.0));
    let hits = border_collision(&mut player, &arena());

    assert_eq!(player.position, Vec2::new(100.0, 0.0));
    assert_eq!(player.velocity, Vec2::new(-5.0, 1.0));
    assert_eq!(hits.as_slice(), &[-5.0]);
    assert_that(&player.contact.contains(BorderContact::HORIZONTAL)).is_true();
}

#[test]
fn test_border_corner_hits_both_axes() {
    let mut player = player_at(Vec2::new(-101.0, 51.0), Vec2::new(-8.0, 6.0));
    let hits = border_collision(&mut player, &arena());

    assert_eq!(player.position, Vec2::new(-100.0, 50.0));
    assert_eq!(hits.as_slice(), &[4.0, -3.0]);
    assert_eq!(player.contact, BorderContact::all());
}

#[test]
fn test_border_contact_is_reported_once() {
    let arena = arena();
    let mut player = player_at(Vec2::new(100.0, 0.0), Vec2::new(4.0, 0.0));

    assert_eq!(border_collision(&mut player, &arena).len(), 1);
    assert_eq!(player.velocity.x, -2.0);

    // Still pressed against the edge: bounces again, silently
    player.velocity.x = 4.0;
    assert_that(&border_collision(&mut player, &arena).is_empty()).is_true();
    assert_eq!(player.velocity.x, -2.0);

    // Back inside clears the latch
    player.position.x = 90.0;
    assert_that(&border_collision(&mut player, &arena).is_empty()).is_true();
    assert_that(&player.contact.is_empty()).is_true();

    player.position.x = 101.0;
    player.velocity.x = 4.0;
    assert_eq!(border_collision(&mut player, &arena).len(), 1);
}

#[test]
fn test_border_edge_moving_inwards_is_not_a_hit() {
    let mut player = player_at(Vec2::new(-100.0, 0.0), Vec2::new(3.0, 0.0));
    let hits = border_collision(&mut player, &arena());

    assert_that(&hits.is_empty()).is_true();
    assert_eq!(player.velocity, Vec2::new(3.0, 0.0));
}
