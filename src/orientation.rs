//! Device orientation handling for tilt input.
//!
//! Accelerometer axes are fixed to the device body, not to whatever the screen
//! currently shows. Phones (and some tablets) are portrait by default, other
//! tablets are landscape, so the mapping from raw axes to the arena's x/y
//! depends on the hardware's default orientation.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString, IntoStaticStr};

/// The orientation a device reports when its display is not rotated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum DefaultOrientation {
    Portrait,
    Landscape,
}

/// The orientation the screen is currently laid out in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ScreenOrientation {
    Portrait,
    Landscape,
}

/// Display rotation relative to the device's natural orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Rotation {
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    fn is_upright(self) -> bool {
        matches!(self, Rotation::Deg0 | Rotation::Deg180)
    }
}

/// Works out the hardware default orientation from the current display state.
///
/// An unrotated (or upside-down) display showing landscape, or a display turned
/// by a quarter showing portrait, means the device is landscape by default.
pub fn detect_default_orientation(rotation: Rotation, current: ScreenOrientation) -> DefaultOrientation {
    match (rotation.is_upright(), current) {
        (true, ScreenOrientation::Landscape) | (false, ScreenOrientation::Portrait) => DefaultOrientation::Landscape,
        _ => DefaultOrientation::Portrait,
    }
}

impl DefaultOrientation {
    /// Maps a raw `[x, y, z]` accelerometer sample to an in-plane force.
    ///
    /// Portrait-default devices swap X and Y; landscape-default devices only negate X.
    pub fn map_tilt(self, raw: [f32; 3]) -> Vec2 {
        match self {
            DefaultOrientation::Portrait => Vec2::new(raw[1], raw[0]),
            DefaultOrientation::Landscape => Vec2::new(-raw[0], raw[1]),
        }
    }
}
