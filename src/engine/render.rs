use std::time::{Duration, Instant};

use glam::Vec2;

use crate::constants::{DEATH_ANIMATION_TICKS, DOT_SIZE, ENDING_ANIMATION_TICKS};
use crate::sprite::Sprite;
use crate::surface::{Color, PixelRect, Surface, TextAlign};

use super::state::{GameState, Status, Transition};

/// Sample sprites shown on the pause screen, in units from the center.
#[derive(Debug, Clone)]
pub(crate) struct HelpPage {
    enemy: Sprite,
    well: Sprite,
    gate: Sprite,
}

impl HelpPage {
    pub fn new() -> Self {
        Self {
            enemy: Sprite::enemy(Vec2::new(-10.0, -10.0)),
            well: Sprite::gravity_well(0.0, Vec2::new(-20.0, -20.0)),
            gate: Sprite::gate(Vec2::new(10.0, 10.0)),
        }
    }
}

/// The countdown banner, e.g. "Start in 3".
pub fn countdown_text(remaining: Duration) -> String {
    format!("Start in {}", remaining.as_secs() + 1)
}

pub(crate) fn render(state: &mut GameState, help: &mut HelpPage, surface: &mut dyn Surface, now: Instant) {
    let size = surface.size();
    let center = size / 2.0;
    let unit = state.arena.unit_pixels();

    // The arena's origin is the middle of the surface
    let dot = (center + state.player.position * unit).clamp(Vec2::ZERO, size.max(Vec2::ZERO));

    surface.fill_rect(surface.bounds(), Color::White);

    for well in &mut state.level.wells {
        well.draw(surface, unit, now);
    }
    for enemy in &mut state.level.enemies {
        enemy.draw(surface, unit, now);
    }
    state.level.gate.draw(surface, unit, now);

    let dot_size = DOT_SIZE * unit;
    match state.player.transition {
        Some(Transition::Dying { tick }) => {
            surface.fill_circle(dot, shrink(dot_size, tick, DEATH_ANIMATION_TICKS), Color::Black);
            return;
        }
        Some(Transition::Exiting { tick }) => {
            surface.fill_circle(dot, shrink(dot_size, tick, ENDING_ANIMATION_TICKS), Color::Black);
        }
        None => surface.fill_circle(dot, dot_size, Color::Black),
    }

    match state.status {
        Status::Countdown => {
            let anchor = Vec2::new(center.x, center.y - center.y / 2.0);
            surface.draw_text(&countdown_text(state.countdown), anchor, TextAlign::Center, Color::Black);
        }
        Status::Pause => draw_pause_screen(surface, help, unit, now),
        Status::Play => {}
    }
}

fn shrink(size: f32, tick: u32, ticks: u32) -> f32 {
    (size - size * tick as f32 / ticks as f32).max(0.0)
}

fn draw_pause_screen(surface: &mut dyn Surface, help: &mut HelpPage, unit: f32, now: Instant) {
    let size = surface.size();
    let center = size / 2.0;
    let half = size / 2.0 * 0.75;

    let frame = PixelRect::new(center - half, center + half);
    surface.fill_rect(frame, Color::Black);
    surface.fill_rect(frame.inset(unit), Color::White);

    surface.fill_circle(center, DOT_SIZE * unit, Color::Black);
    help.enemy.draw(surface, unit, now);
    help.well.draw(surface, unit, now);
    help.gate.draw(surface, unit, now);

    let at = |x: f32, y: f32| center + Vec2::new(x, y) * unit;
    surface.draw_text("Gravity Well", at(-17.0, -19.0), TextAlign::Left, Color::Black);
    surface.draw_text("Enemies", at(-7.0, -9.0), TextAlign::Left, Color::Black);
    surface.draw_text("Player", at(-3.0, 1.0), TextAlign::Right, Color::Black);
    surface.draw_text("Exit Gate", at(5.0, 11.0), TextAlign::Right, Color::Black);

    let top = Vec2::new(center.x, center.y - half.y + 5.0 * unit);
    let bottom = Vec2::new(center.x, center.y + half.y - 4.0 * unit);
    surface.draw_text("!! PAUSED !!", top, TextAlign::Center, Color::Black);
    surface.draw_text("TAP THE SCREEN TO RESUME", bottom, TextAlign::Center, Color::Black);
}
