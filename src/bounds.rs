use glam::{IVec2, UVec2, Vec2};

use crate::error::GridError;

/// Axis-aligned region of tile-index space.
/// Convention: [min.x, max.x) x [min.y, max.y).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridBounds {
    min: Vec2,
    max: Vec2,
}

impl GridBounds {
    pub fn new(min: Vec2, max: Vec2) -> Result<Self, GridError> {
        if !min.is_finite() || !max.is_finite() || !min.cmplt(max).all() {
            return Err(GridError::InvalidBounds { min, max });
        }
        Ok(Self { min, max })
    }

    /// Bounds covering `size` tiles starting at tile `origin`.
    pub fn from_tiles(origin: IVec2, size: UVec2) -> Result<Self, GridError> {
        let min = origin.as_vec2();
        Self::new(min, min + size.as_vec2())
    }

    pub fn min(&self) -> Vec2 {
        self.min
    }

    pub fn max(&self) -> Vec2 {
        self.max
    }

    pub fn extent(&self) -> Vec2 {
        self.max - self.min
    }

    #[inline]
    pub fn contains_point(&self, p: Vec2) -> bool {
        p.cmpge(self.min).all() && p.cmplt(self.max).all()
    }

    #[inline]
    pub fn contains_tile(&self, tile: IVec2) -> bool {
        self.contains_point(tile.as_vec2())
    }

    /// Default number of steps a ray may take: the sum of the extents.
    ///
    /// A ray starting on any in-bounds tile leaves the grid in fewer
    /// crossings than this.
    pub fn step_budget(&self) -> u32 {
        let extent = self.extent().ceil();
        (extent.x + extent.y) as u32
    }
}
