use std::time::Duration;

use bitflags::bitflags;
use glam::Vec2;
use strum_macros::Display;

use crate::constants::UNIT_FRACTION;
use crate::error::SurfaceError;

/// The top-level simulation phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Status {
    /// Waiting for the level to start; only the countdown advances
    Countdown,
    /// Full physics
    Play,
    /// Nothing advances
    Pause,
}

/// A scripted animation that replaces normal physics until the level changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Hit by an enemy; drifting along the last velocity
    Dying { tick: u32 },
    /// Reached the gate; being pulled into it
    Exiting { tick: u32 },
}

bitflags! {
    /// Borders the player is currently resting against, per axis.
    ///
    /// Latched on first contact and cleared once the player is back inside,
    /// so a bounce is reported once per contact rather than every tick.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct BorderContact: u8 {
        const HORIZONTAL = 1 << 0;
        const VERTICAL = 1 << 1;
    }
}

/// The player's dot. Only the update step writes to it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlayerState {
    /// Position in units; the arena's center is the origin
    pub position: Vec2,
    /// Velocity in units per second
    pub velocity: Vec2,
    pub contact: BorderContact,
    pub transition: Option<Transition>,
}

impl PlayerState {
    /// Puts the dot back at the center, at rest, with no pending animation.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_dying(&self) -> bool {
        matches!(self.transition, Some(Transition::Dying { .. }))
    }

    pub fn is_exiting(&self) -> bool {
        matches!(self.transition, Some(Transition::Exiting { .. }))
    }
}

/// The playable rectangle, in units, centered on the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arena {
    pub min: Vec2,
    pub max: Vec2,
    unit_pixels: f32,
}

impl Arena {
    /// Derives the arena from a surface's pixel size.
    ///
    /// One unit is a hundredth of the surface's shorter side.
    pub fn from_surface(size: Vec2) -> Result<Self, SurfaceError> {
        if size.x < 1.0 || size.y < 1.0 {
            return Err(SurfaceError::Degenerate {
                width: size.x.max(0.0) as u32,
                height: size.y.max(0.0) as u32,
            });
        }
        Ok(Self::with_unit(size, size.min_element() / UNIT_FRACTION))
    }

    /// An arena covering `size` pixels at an explicit unit scale.
    pub fn with_unit(size: Vec2, unit_pixels: f32) -> Self {
        let half = size / 2.0 / unit_pixels;
        Self {
            min: -half,
            max: half,
            unit_pixels,
        }
    }

    /// Pixels per unit.
    pub fn unit_pixels(&self) -> f32 {
        self.unit_pixels
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }
}

/// Everything the simulation owns once a surface has been seen.
#[derive(Debug, Clone)]
pub(crate) struct GameState {
    pub arena: Arena,
    pub level: super::Level,
    pub player: PlayerState,
    pub status: Status,
    pub countdown: Duration,
    pub gate_dwell: Duration,
}
