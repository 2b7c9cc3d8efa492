//! Animated arena entities: enemies, the exit gate and gravity wells.
//!
//! Positions and sizes are in units, the same space the simulation runs in.
//! Pixels only appear inside [`Sprite::draw`].

use std::time::{Duration, Instant};

use glam::Vec2;

use crate::constants::{sprite, ENEMY_SPEED, GATE_EXIT_TIME, GATE_PROXIMITY, GATE_SIZE, GRAVITY_WELL_REACH};
use crate::surface::{PixelRect, Surface};

mod animation;
mod draw;

pub use animation::Animation;

/// What a sprite is, along with the gameplay data specific to that variant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpriteKind {
    /// Chases the player at a fixed speed (units per second)
    Enemy { speed: f32 },
    /// The level exit; the player must stay within `proximity` for `exit_time`
    Gate { proximity: f32, exit_time: Duration },
    /// Pushes (positive power) or pulls (negative power) the player while within `reach`
    GravityWell { power: f32, reach: f32 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    pub kind: SpriteKind,
    pub position: Vec2,
    size: Vec2,
    animation: Animation,
}

impl Sprite {
    fn new(kind: SpriteKind, position: Vec2, size: f32, frames: u32, duration: Duration) -> Self {
        Self {
            kind,
            position,
            size: Vec2::splat(size),
            animation: Animation::new(frames, duration),
        }
    }

    pub fn enemy(position: Vec2) -> Self {
        Self::new(
            SpriteKind::Enemy { speed: ENEMY_SPEED },
            position,
            sprite::ENEMY_SIZE,
            sprite::ENEMY_FRAMES,
            sprite::ENEMY_DURATION,
        )
    }

    pub fn gate(position: Vec2) -> Self {
        Self::new(
            SpriteKind::Gate {
                proximity: GATE_PROXIMITY,
                exit_time: GATE_EXIT_TIME,
            },
            position,
            GATE_SIZE,
            sprite::GATE_FRAMES,
            sprite::GATE_DURATION,
        )
    }

    pub fn gravity_well(power: f32, position: Vec2) -> Self {
        Self::new(
            SpriteKind::GravityWell {
                power,
                reach: GRAVITY_WELL_REACH,
            },
            position,
            sprite::WELL_SIZE,
            sprite::WELL_FRAMES,
            sprite::WELL_DURATION,
        )
    }

    /// Width and height, in units.
    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn animation(&self) -> &Animation {
        &self.animation
    }

    /// Advances the animation against the wall clock and draws the current frame.
    ///
    /// The arena's origin maps to the center of the surface. A sprite that ends
    /// up with no pixel area is skipped.
    pub fn draw(&mut self, surface: &mut dyn Surface, unit_pixels: f32, now: Instant) {
        self.animation.advance(now);

        let center = surface.size() / 2.0 + self.position * unit_pixels;
        let bounds = PixelRect::from_center(center, self.size * unit_pixels);
        if bounds.is_degenerate() {
            return;
        }

        match self.kind {
            SpriteKind::Enemy { .. } => draw::draw_enemy(surface, bounds, &self.animation),
            SpriteKind::Gate { .. } => draw::draw_gate(surface, bounds, &self.animation),
            SpriteKind::GravityWell { .. } => draw::draw_well(surface, bounds, &self.animation, unit_pixels),
        }
    }
}
