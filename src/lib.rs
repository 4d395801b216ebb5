//! Tile-grid raycasting.
//!
//! A ray is walked through a uniform grid of unit tiles one grid-line
//! crossing at a time until it hits a blocking tile, leaves the grid or runs
//! out of steps. Rays starting outside the grid are moved onto its boundary
//! first. On a hit, [`surface_details`] recovers the exact intersection point
//! and normal.

pub mod bounds;
pub mod cast;
pub mod error;
pub mod map;
pub mod math;
pub mod ray;
pub mod scene;
pub mod surface;

pub use bounds::GridBounds;
pub use cast::{enter_bounds, raycast, raycast_with, Entry, RaycastOptions};
pub use error::GridError;
pub use map::{Tile, TileMap};
pub use ray::{Axis, Occupancy, Ray, RaycastResult, SurfaceDetails, Termination};
pub use scene::{Handle, Scene, View};
pub use surface::surface_details;
