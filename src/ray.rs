use glam::{IVec2, Vec2};

/// A half-infinite line in tile space.
///
/// The direction need not be normalised: only its slope and signs matter
/// for which tiles are visited.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Ray {
    pub origin: Vec2,
    pub direction: Vec2,
}

impl Ray {
    pub fn new(origin: Vec2, direction: Vec2) -> Self {
        Self { origin, direction }
    }

    /// Point where the ray's line crosses the grid line `axis = plane`.
    ///
    /// Infinite or NaN if the direction has no component along `axis`.
    pub fn point_on_plane(&self, axis: Axis, plane: f32) -> Vec2 {
        let other = axis.other();
        let slope = other.of(self.direction) / axis.of(self.direction);
        let mut p = Vec2::ZERO;
        p[axis.index()] = plane;
        p[other.index()] = other.of(self.origin) + (plane - axis.of(self.origin)) * slope;
        p
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Axis {
    #[default]
    X,
    Y,
}

impl Axis {
    pub const ALL: [Axis; 2] = [Axis::X, Axis::Y];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
        }
    }

    #[inline]
    pub fn other(self) -> Axis {
        match self {
            Axis::X => Axis::Y,
            Axis::Y => Axis::X,
        }
    }

    #[inline]
    pub fn of(self, v: Vec2) -> f32 {
        v[self.index()]
    }

    #[inline]
    pub fn of_tile(self, v: IVec2) -> i32 {
        v[self.index()]
    }

    pub fn unit(self) -> Vec2 {
        match self {
            Axis::X => Vec2::X,
            Axis::Y => Vec2::Y,
        }
    }
}

/// Why a raycast stopped walking.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Termination {
    /// The current tile is blocking.
    Hit,
    /// The ray left the bounds.
    ExitedBounds,
    /// The step budget ran out inside the bounds.
    BudgetExhausted,
    /// The ray never enters the bounds.
    MissedBounds,
    /// The direction has no usable component, so the ray cannot advance.
    Stalled,
}

#[derive(Clone, PartialEq, Debug)]
pub struct RaycastResult {
    /// Tile the walk stopped on. Out of bounds when the ray exited.
    pub tile_index: IVec2,
    pub total_steps: u32,
    pub hit_surface: bool,
    /// Axis of the last grid-line crossing, or of the boundary entry when
    /// no step was taken.
    pub hit_edge: Axis,
    pub termination: Termination,
    /// Where the walk started: the ray origin, or the corrected point on the
    /// boundary for origins outside the bounds.
    pub entry_point: Vec2,
    /// Centres of the visited tiles, capped at the trace capacity.
    pub points: Vec<Vec2>,
}

impl RaycastResult {
    /// Result for a ray that never touches the grid.
    pub fn missed(origin: Vec2) -> Self {
        Self {
            tile_index: IVec2::ZERO,
            total_steps: 0,
            hit_surface: false,
            hit_edge: Axis::X,
            termination: Termination::MissedBounds,
            entry_point: origin,
            points: Vec::new(),
        }
    }

    pub fn surface_details(&self, ray: Ray) -> Option<SurfaceDetails> {
        crate::surface::surface_details(ray, self)
    }
}

/// Exact intersection with the blocking tile.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct SurfaceDetails {
    pub pos: Vec2,
    /// Outward unit normal of the face that was struck.
    pub nrm: Vec2,
}

/// Answers "does this tile stop rays".
pub trait Occupancy {
    fn is_blocking(&self, tile: IVec2) -> bool;
}

impl<F> Occupancy for F
where
    F: Fn(IVec2) -> bool,
{
    fn is_blocking(&self, tile: IVec2) -> bool {
        self(tile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_on_plane_follows_slope() {
        let ray = Ray::new(Vec2::new(0.5, 0.5), Vec2::new(1.0, 2.0));
        assert_eq!(ray.point_on_plane(Axis::X, 1.5), Vec2::new(1.5, 2.5));
        assert_eq!(ray.point_on_plane(Axis::Y, 4.5), Vec2::new(2.5, 4.5));
    }

    #[test]
    fn closures_are_occupancy() {
        let wall = |tile: IVec2| tile.x >= 3;
        assert!(wall.is_blocking(IVec2::new(3, 0)));
        assert!(!wall.is_blocking(IVec2::new(2, 7)));
    }
}
