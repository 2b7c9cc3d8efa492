use figment::{
    providers::{Env, Serialized},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::constants::{MAX_FPS, MAX_TIME_FACTOR};
use crate::error::ConfigError;
use crate::orientation::DefaultOrientation;

/// Prefix of the environment variables read by [`Config::load`].
pub const ENV_PREFIX: &str = "THEDOT_";

/// Runtime configuration.
///
/// Defaults are merged with `THEDOT_*` environment variables, e.g.
/// `THEDOT_TIME_FACTOR=0.5` for a half-speed game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Loop iterations per second
    pub tick_rate: u32,
    /// Initial global time factor applied to every play tick
    pub time_factor: f32,
    /// Hardware orientation used to map tilt axes
    pub orientation: DefaultOrientation,
    /// Seed for level generation; random when absent
    pub seed: Option<u64>,
    /// Whether feedback cues start muted
    pub muted: bool,
    /// Width of the headless drawing surface, in pixels
    pub surface_width: u32,
    /// Height of the headless drawing surface, in pixels
    pub surface_height: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick_rate: MAX_FPS,
            time_factor: 1.0,
            orientation: DefaultOrientation::Portrait,
            seed: None,
            muted: false,
            surface_width: 96,
            surface_height: 54,
        }
    }
}

impl Config {
    /// Loads the configuration from defaults and the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(Self::figment())
    }

    /// The layered configuration sources, exposed so callers can merge more providers.
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default())).merge(Env::prefixed(ENV_PREFIX))
    }

    /// Extracts and validates a configuration from arbitrary sources.
    pub fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values the loop or the engine cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_rate == 0 {
            return Err(ConfigError::Invalid("tick_rate must be at least 1".to_string()));
        }
        if !self.time_factor.is_finite() || self.time_factor <= 0.0 || self.time_factor > MAX_TIME_FACTOR {
            return Err(ConfigError::Invalid(format!(
                "time_factor must be in (0, {MAX_TIME_FACTOR}], got {}",
                self.time_factor
            )));
        }
        Ok(())
    }
}
