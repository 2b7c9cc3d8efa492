use std::f32::consts::TAU;
use std::io::{self, Write};

use glam::Vec2;
use tracing::warn;

use super::{Color, PixelRect, Surface, SurfaceHolder, TextAlign};

const INK: char = '#';
const STROKE: char = 'o';
const PAPER: char = ' ';

/// A character grid where every cell is one pixel.
#[derive(Debug, Clone)]
pub struct AsciiSurface {
    width: usize,
    height: usize,
    cells: Vec<char>,
}

impl AsciiSurface {
    pub fn new(width: u32, height: u32) -> Self {
        let (width, height) = (width as usize, height as usize);
        Self {
            width,
            height,
            cells: vec![PAPER; width * height],
        }
    }

    /// Renders the grid as text, one line per row.
    pub fn to_text(&self) -> String {
        let mut text = String::with_capacity((self.width + 1) * self.height);
        for row in self.cells.chunks(self.width.max(1)) {
            text.extend(row);
            text.push('\n');
        }
        text
    }

    fn put(&mut self, x: f32, y: f32, cell: char) {
        if x < 0.0 || y < 0.0 {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    /// Plots points along a parametric curve, enough to leave no gaps.
    fn trace(&mut self, length: f32, point: impl Fn(f32) -> Vec2) {
        let steps = (length.ceil() as usize * 2).max(8);
        for step in 0..=steps {
            let p = point(step as f32 / steps as f32);
            self.put(p.x, p.y, STROKE);
        }
    }
}

fn ink(color: Color) -> char {
    match color {
        Color::Black => INK,
        Color::White => PAPER,
    }
}

impl Surface for AsciiSurface {
    fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    fn fill_rect(&mut self, rect: PixelRect, color: Color) {
        let cell = ink(color);
        let (min, max) = (rect.min.max(Vec2::ZERO), rect.max.min(self.size()));
        for y in min.y as usize..max.y.max(0.0) as usize {
            for x in min.x as usize..max.x.max(0.0) as usize {
                self.cells[y * self.width + x] = cell;
            }
        }
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        let cell = ink(color);
        let reach = radius.ceil() as i32;
        for dy in -reach..=reach {
            for dx in -reach..=reach {
                let offset = Vec2::new(dx as f32, dy as f32);
                if offset.length() <= radius {
                    self.put(center.x + offset.x, center.y + offset.y, cell);
                }
            }
        }
    }

    fn stroke_ellipse(&mut self, center: Vec2, radii: Vec2, rotation: f32, _stroke: f32, _color: Color) {
        let axis = Vec2::from_angle(rotation);
        self.trace(TAU * radii.max_element(), |t| {
            let (sin, cos) = (t * TAU).sin_cos();
            center + axis.rotate(Vec2::new(radii.x * cos, radii.y * sin))
        });
    }

    fn stroke_arc(&mut self, center: Vec2, radius: f32, start: f32, sweep: f32, _stroke: f32, _color: Color) {
        self.trace(sweep.abs() * radius, |t| center + Vec2::from_angle(start + sweep * t) * radius);
    }

    fn draw_text(&mut self, text: &str, anchor: Vec2, align: TextAlign, _color: Color) {
        let length = text.chars().count() as f32;
        let left = match align {
            TextAlign::Left => anchor.x,
            TextAlign::Center => anchor.x - length / 2.0,
            TextAlign::Right => anchor.x - length,
        };
        for (i, c) in text.chars().enumerate() {
            self.put(left + i as f32, anchor.y, c);
        }
    }
}

/// Lends out an [`AsciiSurface`] and prints every n-th presented frame to stdout.
#[derive(Debug)]
pub struct AsciiHolder {
    canvas: Option<AsciiSurface>,
    print_every: Option<u32>,
    posted: u32,
}

impl AsciiHolder {
    pub fn new(width: u32, height: u32, print_every: Option<u32>) -> Self {
        Self {
            canvas: Some(AsciiSurface::new(width, height)),
            print_every,
            posted: 0,
        }
    }

    fn print(canvas: &AsciiSurface) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        stdout.write_all(canvas.to_text().as_bytes())?;
        stdout.flush()
    }
}

impl SurfaceHolder for AsciiHolder {
    type Canvas = AsciiSurface;

    fn lock_canvas(&mut self) -> Option<AsciiSurface> {
        self.canvas.take()
    }

    fn unlock_and_post(&mut self, canvas: AsciiSurface) {
        self.posted += 1;
        if let Some(every) = self.print_every.filter(|every| *every > 0) {
            if self.posted % every == 0 {
                if let Err(error) = Self::print(&canvas) {
                    warn!(%error, "Failed to print frame");
                }
            }
        }
        self.canvas = Some(canvas);
    }
}
