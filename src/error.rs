use glam::{IVec2, Vec2};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GridError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid bounds: min {min} must be finite and below max {max} on every axis")]
    InvalidBounds { min: Vec2, max: Vec2 },
    #[error("tile {0} out of bounds")]
    OutOfBounds(IVec2),
    #[error("invalid map: {0}")]
    InvalidMap(String),
}
