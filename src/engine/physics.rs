//! The per-tick physics rules, as free functions over plain state.

use std::time::Duration;

use glam::Vec2;
use smallvec::SmallVec;

use crate::constants::{DOT_BOUNCE, DOT_MASS, DOT_SIZE};
use crate::sprite::{Sprite, SpriteKind};

use super::state::{Arena, BorderContact, PlayerState};

/// Unit vector pointing along `delta`; points along +x for a zero vector.
fn heading(delta: Vec2) -> Vec2 {
    Vec2::from_angle(delta.y.atan2(delta.x))
}

/// Net force exerted by every gravity well within reach of `position`.
///
/// Each well contributes `power / (distance + 1)` along the direction from the
/// well to the player, so positive power repels and negative power attracts.
/// Wells beyond their reach contribute nothing.
pub fn gravity_force(position: Vec2, wells: &[Sprite]) -> Vec2 {
    wells
        .iter()
        .filter_map(|well| match well.kind {
            SpriteKind::GravityWell { power, reach } => Some((well.position, power, reach)),
            _ => None,
        })
        .filter_map(|(center, power, reach)| {
            let delta = position - center;
            let distance = delta.length();
            (distance <= reach).then(|| heading(delta) * power / (distance + 1.0))
        })
        .sum()
}

/// Applies `force` to the player for `seconds`, then moves it.
pub fn integrate(player: &mut PlayerState, force: Vec2, seconds: f32) {
    player.velocity += force / DOT_MASS * seconds;
    player.position += player.velocity * seconds;
}

/// Moves every enemy straight at `target` at its own speed.
pub fn pursue(enemies: &mut [Sprite], target: Vec2, seconds: f32) {
    for enemy in enemies {
        if let SpriteKind::Enemy { speed } = enemy.kind {
            enemy.position += heading(target - enemy.position) * speed * seconds;
        }
    }
}

/// Distance below which the player touches `enemy`.
pub fn collision_distance(enemy: &Sprite) -> f32 {
    DOT_SIZE / 2.0 + enemy.size().max_element() / 2.0
}

/// Index of the first enemy the player touches, if any.
pub fn find_enemy_collision(position: Vec2, enemies: &[Sprite]) -> Option<usize> {
    enemies
        .iter()
        .position(|enemy| position.distance(enemy.position) < collision_distance(enemy))
}

/// Accumulates the time the player has spent inside the gate.
///
/// Leaving the gate's proximity resets `dwell` at once. Returns `true` on
/// every tick where the accumulated dwell has reached the gate's exit time.
pub fn gate_proximity(dwell: &mut Duration, position: Vec2, gate: &Sprite, delta: Duration) -> bool {
    let SpriteKind::Gate { proximity, exit_time } = gate.kind else {
        return false;
    };

    if position.distance(gate.position) > proximity {
        *dwell = Duration::ZERO;
        return false;
    }

    *dwell += delta;
    *dwell >= exit_time
}

/// Clamps one axis into `[min, max]`, bouncing the velocity when clamped.
///
/// Being beyond an edge, or sitting on it while moving outwards, counts as a hit.
fn bounce_axis(position: &mut f32, velocity: &mut f32, min: f32, max: f32) -> bool {
    let edge = if *position < min || (*position == min && *velocity < 0.0) {
        min
    } else if *position > max || (*position == max && *velocity > 0.0) {
        max
    } else {
        return false;
    };

    *position = edge;
    *velocity = -*velocity * DOT_BOUNCE;
    true
}

/// Keeps the player inside the arena.
///
/// Returns the post-bounce velocity along each axis that just started touching
/// a border. Axes already resting against a border bounce silently.
pub fn border_collision(player: &mut PlayerState, arena: &Arena) -> SmallVec<[f32; 2]> {
    let mut hits = SmallVec::new();

    let axes = [
        (BorderContact::HORIZONTAL, &mut player.position.x, &mut player.velocity.x, arena.min.x, arena.max.x),
        (BorderContact::VERTICAL, &mut player.position.y, &mut player.velocity.y, arena.min.y, arena.max.y),
    ];
    for (flag, position, velocity, min, max) in axes {
        if !bounce_axis(position, velocity, min, max) {
            player.contact.remove(flag);
            continue;
        }
        if !player.contact.contains(flag) {
            player.contact.insert(flag);
            hits.push(*velocity);
        }
    }

    hits
}
