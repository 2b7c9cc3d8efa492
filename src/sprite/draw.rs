//! Per-variant drawing. Every variant renders into its own pixel bounds and
//! derives its motion from the animation phase alone.

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use glam::Vec2;

use crate::constants::sprite::GATE_STROKE;
use crate::surface::{Color, PixelRect, Surface};

use super::Animation;

/// Four interlocking half circles spinning once per animation loop.
pub(super) fn draw_enemy(surface: &mut dyn Surface, bounds: PixelRect, animation: &Animation) {
    let angle = TAU * animation.phase();
    let size = bounds.size();
    let center = bounds.center();
    let radius = size.min_element() / 4.0;

    // Offset from the sprite center and start angle of each half circle
    let petals = [
        (Vec2::new(0.0, -size.y / 4.0), FRAC_PI_2),
        (Vec2::new(size.x / 4.0, 0.0), 0.0),
        (Vec2::new(0.0, size.y / 4.0), PI + FRAC_PI_2),
        (Vec2::new(-size.x / 4.0, 0.0), PI),
    ];

    let rotation = Vec2::from_angle(angle);
    for (offset, start) in petals {
        surface.stroke_arc(center + rotation.rotate(offset), radius, start + angle, PI, 1.0, Color::Black);
    }
}

/// An upright oval, half as wide as it is tall, spinning once per animation loop.
pub(super) fn draw_gate(surface: &mut dyn Surface, bounds: PixelRect, animation: &Animation) {
    let angle = TAU * animation.phase();
    let inner = bounds.inset(GATE_STROKE);
    let size = inner.size();
    if size.x <= 0.0 || size.y <= 0.0 {
        return;
    }

    let radii = Vec2::new(size.x / 4.0, size.y / 2.0);
    surface.stroke_ellipse(inner.center(), radii, angle, GATE_STROKE, Color::Black);
}

/// A ring whose stroke thins to a quarter and back once per animation loop.
pub(super) fn draw_well(surface: &mut dyn Surface, bounds: PixelRect, animation: &Animation, unit_pixels: f32) {
    let (frame, count) = (animation.frame_index(), animation.frame_count());
    let folded = if frame > count / 2 { count - frame } else { frame };
    let delta = folded as f32 / count as f32;
    let stroke = unit_pixels - unit_pixels * 0.75 * delta;

    surface.stroke_ellipse(bounds.center(), bounds.size() / 2.0, 0.0, stroke, Color::Black);
}
