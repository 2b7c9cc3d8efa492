use glam::Vec2;
use rand::Rng;
use smallvec::SmallVec;

use crate::constants::{ENEMY_COUNT, GATE_SIZE, GRAVITY_WELL_POWER};
use crate::sprite::Sprite;

use super::state::Arena;

/// The per-level entities. Replaced as a whole on every level load.
#[derive(Debug, Clone)]
pub struct Level {
    pub number: u32,
    pub gate: Sprite,
    pub wells: Vec<Sprite>,
    pub enemies: SmallVec<[Sprite; ENEMY_COUNT]>,
}

impl Level {
    /// Places a gate, one attracting gravity well and the enemies at random spots in the arena.
    pub fn generate(number: u32, arena: &Arena, rng: &mut impl Rng) -> Self {
        let gate = Sprite::gate(spawn_point(arena, rng));
        let wells = vec![Sprite::gravity_well(-GRAVITY_WELL_POWER, spawn_point(arena, rng))];
        let enemies = (0..ENEMY_COUNT)
            .map(|_| Sprite::enemy(spawn_point(arena, rng)))
            .collect();

        Self {
            number,
            gate,
            wells,
            enemies,
        }
    }
}

/// A uniformly random point at least two gate sizes away from every edge.
///
/// Arenas too small for that margin collapse the range onto its lower end.
pub fn spawn_point(arena: &Arena, rng: &mut impl Rng) -> Vec2 {
    let margin = GATE_SIZE * 2.0;
    let span = (arena.size() - Vec2::splat(margin * 2.0)).max(Vec2::ZERO);
    let offset = Vec2::new(rng.random::<f32>(), rng.random::<f32>()) * span;
    arena.min + Vec2::splat(margin) + offset
}
