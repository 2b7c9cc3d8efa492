//! Drawing-surface abstractions.
//!
//! The game never rasterizes anything itself: it issues a handful of shape and
//! text primitives in pixel space against a [`Surface`], and acquires/presents
//! surfaces through a [`SurfaceHolder`].

use std::ops::{Deref, DerefMut};

use glam::Vec2;

pub mod ascii;
pub mod recording;

pub use ascii::{AsciiHolder, AsciiSurface};
pub use recording::{DrawCommand, RecordingHolder, RecordingSurface};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Black,
    White,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

/// An axis-aligned rectangle in pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelRect {
    pub min: Vec2,
    pub max: Vec2,
}

impl PixelRect {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// A rectangle of the given size centered on a point.
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        Self::new(center - size / 2.0, center + size / 2.0)
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) / 2.0
    }

    /// Shrinks every edge inwards by `amount`.
    pub fn inset(&self, amount: f32) -> Self {
        Self::new(self.min + amount, self.max - amount)
    }

    /// `true` when the rectangle covers no area.
    pub fn is_degenerate(&self) -> bool {
        let size = self.size();
        size.x <= 0.0 || size.y <= 0.0
    }
}

/// A drawing target with its origin at the top-left corner.
///
/// Angles are in radians, measured clockwise from the positive x axis (screen
/// space has y pointing down).
pub trait Surface {
    /// The drawable size, in pixels.
    fn size(&self) -> Vec2;

    fn fill_rect(&mut self, rect: PixelRect, color: Color);

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color);

    /// Strokes the outline of an ellipse rotated by `rotation` around its center.
    fn stroke_ellipse(&mut self, center: Vec2, radii: Vec2, rotation: f32, stroke: f32, color: Color);

    /// Strokes part of a circle, starting at `start` and sweeping clockwise by `sweep`.
    fn stroke_arc(&mut self, center: Vec2, radius: f32, start: f32, sweep: f32, stroke: f32, color: Color);

    fn draw_text(&mut self, text: &str, anchor: Vec2, align: TextAlign, color: Color);

    /// The full drawable area as a rectangle.
    fn bounds(&self) -> PixelRect {
        PixelRect::new(Vec2::ZERO, self.size())
    }
}

/// Hands out exclusive access to a drawing surface, one frame at a time.
pub trait SurfaceHolder {
    type Canvas: Surface;

    /// Acquires the surface for drawing, or `None` when it is not ready yet.
    fn lock_canvas(&mut self) -> Option<Self::Canvas>;

    /// Releases a previously locked surface and presents what was drawn.
    fn unlock_and_post(&mut self, canvas: Self::Canvas);
}

/// A locked canvas that is always posted back to its holder when dropped,
/// including while unwinding from a panicking update or render step.
pub struct LockedCanvas<'a, H: SurfaceHolder> {
    holder: &'a mut H,
    canvas: Option<H::Canvas>,
}

impl<'a, H: SurfaceHolder> LockedCanvas<'a, H> {
    /// Locks the holder's canvas, if one is available.
    pub fn lock(holder: &'a mut H) -> Option<Self> {
        let canvas = holder.lock_canvas()?;
        Some(Self {
            holder,
            canvas: Some(canvas),
        })
    }
}

impl<H: SurfaceHolder> Deref for LockedCanvas<'_, H> {
    type Target = H::Canvas;

    fn deref(&self) -> &Self::Target {
        self.canvas.as_ref().expect("canvas is only taken on drop")
    }
}

impl<H: SurfaceHolder> DerefMut for LockedCanvas<'_, H> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.canvas.as_mut().expect("canvas is only taken on drop")
    }
}

impl<H: SurfaceHolder> Drop for LockedCanvas<'_, H> {
    fn drop(&mut self) {
        if let Some(canvas) = self.canvas.take() {
            self.holder.unlock_and_post(canvas);
        }
    }
}
