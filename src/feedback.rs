//! Sound and vibration feedback.
//!
//! The engine only ever fires cues; what a cue turns into (a buzz, a sample, a
//! log line) is up to the [`Feedback`] implementation it was handed.

use std::time::Duration;

use micromap::Map;
use strum::{EnumCount, IntoEnumIterator};
use strum_macros::{Display, EnumCount, EnumIter, IntoStaticStr};
use tracing::{debug, trace};

use crate::constants::cue;

/// A named feedback cue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, IntoStaticStr)]
pub enum Cue {
    /// The dot bounced off a border fast enough to be felt
    BorderBounce,
    /// The dot touched an enemy
    EnemyHit,
    /// The death animation finished
    Death,
    /// A plain vibration of the given length
    Vibrate(Duration),
}

impl Cue {
    /// How long the cue vibrates for.
    pub fn duration(self) -> Duration {
        match self {
            Cue::BorderBounce => cue::BORDER_BOUNCE,
            Cue::EnemyHit => cue::ENEMY_HIT,
            Cue::Death => cue::DEATH,
            Cue::Vibrate(duration) => duration,
        }
    }

    fn kind(self) -> CueKind {
        match self {
            Cue::BorderBounce => CueKind::BorderBounce,
            Cue::EnemyHit => CueKind::EnemyHit,
            Cue::Death => CueKind::Death,
            Cue::Vibrate(_) => CueKind::Vibrate,
        }
    }
}

/// Fire-and-forget trigger for cues.
pub trait Feedback: Send {
    fn trigger(&mut self, cue: Cue);
}

/// Feedback that drops every cue.
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl Feedback for Silent {
    fn trigger(&mut self, _cue: Cue) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter, EnumCount)]
enum CueKind {
    BorderBounce,
    EnemyHit,
    Death,
    Vibrate,
}

/// The cue player owned by a running game.
///
/// Constructed explicitly with its lifetime tied to whoever owns it; dropping
/// it releases the pool. Tracks how often each cue kind played.
#[derive(Debug)]
pub struct CuePool {
    played: Map<CueKind, u32, { CueKind::COUNT }>,
    muted: bool,
}

impl Default for CuePool {
    fn default() -> Self {
        Self::new()
    }
}

impl CuePool {
    pub fn new() -> Self {
        let mut played = Map::new();
        for kind in CueKind::iter() {
            played.entry(kind).or_insert_with(|| 0);
        }
        debug!(cues = played.len(), "Cue pool loaded");
        Self { played, muted: false }
    }

    /// Instantly mute or unmute all cues.
    pub fn set_mute(&mut self, mute: bool) {
        self.muted = mute;
    }

    /// Returns `true` if the pool is muted.
    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Total number of cues actually played (muted cues are not counted).
    pub fn played(&self) -> u32 {
        self.played.iter().map(|(_, count)| *count).sum()
    }
}

impl Feedback for CuePool {
    fn trigger(&mut self, cue: Cue) {
        if self.muted {
            trace!(%cue, "Skipping cue, pool is muted");
            return;
        }

        *self.played.entry(cue.kind()).or_insert_with(|| 0) += 1;
        trace!(%cue, duration = ?cue.duration(), "Playing cue");
    }
}

impl Drop for CuePool {
    fn drop(&mut self) {
        debug!(played = self.played(), "Releasing cue pool");
    }
}
