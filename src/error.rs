//! Centralized error types for the game.
//!
//! Only construction and configuration problems are errors. A missing drawing
//! surface on a given tick and a stop request are normal control flow for the
//! loop and never surface here.

use std::io;

/// Main error type for the game.
///
/// This is the primary error type that should be used in public APIs.
#[derive(thiserror::Error, Debug)]
pub enum GameError {
    #[error("Loop error: {0}")]
    Loop(#[from] LoopError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Surface error: {0}")]
    Surface(#[from] SurfaceError),

    #[error("Invalid state: {0}")]
    InvalidState(String),
}

/// Errors raised while building or starting the game loop.
#[derive(thiserror::Error, Debug)]
pub enum LoopError {
    #[error("Missing required collaborator: {0}")]
    MissingCollaborator(&'static str),

    #[error("Tick rate must be at least 1 Hz")]
    ZeroTickRate,

    #[error("Failed to spawn loop thread: {0}")]
    Spawn(#[from] io::Error),
}

/// Errors raised while loading the runtime configuration.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Failed to extract configuration: {0}")]
    Extract(#[from] Box<figment::Error>),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Errors related to the drawing surface.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceError {
    #[error("Surface has no drawable area ({width}x{height})")]
    Degenerate { width: u32, height: u32 },
}

impl From<figment::Error> for ConfigError {
    fn from(error: figment::Error) -> Self {
        ConfigError::Extract(Box::new(error))
    }
}

/// Result type for game operations.
pub type GameResult<T> = Result<T, GameError>;
