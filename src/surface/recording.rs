use glam::Vec2;

use super::{Color, PixelRect, Surface, SurfaceHolder, TextAlign};

/// A single primitive issued against a [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    FillRect {
        rect: PixelRect,
        color: Color,
    },
    FillCircle {
        center: Vec2,
        radius: f32,
        color: Color,
    },
    StrokeEllipse {
        center: Vec2,
        radii: Vec2,
        rotation: f32,
        stroke: f32,
    },
    StrokeArc {
        center: Vec2,
        radius: f32,
        start: f32,
        sweep: f32,
        stroke: f32,
    },
    Text {
        text: String,
        anchor: Vec2,
        align: TextAlign,
    },
}

/// A surface that remembers every primitive drawn on it, so a frame can be
/// inspected after the fact.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    size: Vec2,
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: Vec2::new(width as f32, height as f32),
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// All text drawn so far, in order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> Vec2 {
        self.size
    }

    fn fill_rect(&mut self, rect: PixelRect, color: Color) {
        self.commands.push(DrawCommand::FillRect { rect, color });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.commands.push(DrawCommand::FillCircle { center, radius, color });
    }

    fn stroke_ellipse(&mut self, center: Vec2, radii: Vec2, rotation: f32, stroke: f32, _color: Color) {
        self.commands.push(DrawCommand::StrokeEllipse {
            center,
            radii,
            rotation,
            stroke,
        });
    }

    fn stroke_arc(&mut self, center: Vec2, radius: f32, start: f32, sweep: f32, stroke: f32, _color: Color) {
        self.commands.push(DrawCommand::StrokeArc {
            center,
            radius,
            start,
            sweep,
            stroke,
        });
    }

    fn draw_text(&mut self, text: &str, anchor: Vec2, align: TextAlign, _color: Color) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            anchor,
            align,
        });
    }
}

/// A holder that lends out a single [`RecordingSurface`].
///
/// Locking can be made to fail for a number of attempts, mimicking a display
/// that is not ready yet.
#[derive(Debug)]
pub struct RecordingHolder {
    canvas: Option<RecordingSurface>,
    unavailable_for: u32,
    posted: u32,
}

impl RecordingHolder {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            canvas: Some(RecordingSurface::new(width, height)),
            unavailable_for: 0,
            posted: 0,
        }
    }

    /// Makes the next `attempts` lock attempts report no surface.
    pub fn unavailable_for(mut self, attempts: u32) -> Self {
        self.unavailable_for = attempts;
        self
    }

    /// Number of frames presented so far.
    pub fn posted(&self) -> u32 {
        self.posted
    }

    /// `true` while the surface is locked by someone.
    pub fn is_locked(&self) -> bool {
        self.canvas.is_none()
    }

    /// The most recently presented frame.
    pub fn last_frame(&self) -> Option<&RecordingSurface> {
        self.canvas.as_ref()
    }
}

impl SurfaceHolder for RecordingHolder {
    type Canvas = RecordingSurface;

    fn lock_canvas(&mut self) -> Option<RecordingSurface> {
        if self.unavailable_for > 0 {
            self.unavailable_for -= 1;
            return None;
        }

        let mut canvas = self.canvas.take()?;
        canvas.clear();
        Some(canvas)
    }

    fn unlock_and_post(&mut self, canvas: RecordingSurface) {
        self.posted += 1;
        self.canvas = Some(canvas);
    }
}
