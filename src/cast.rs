//! Grid traversal (Amanatides & Woo style DDA) with boundary entry.

use glam::{IVec2, Vec2};

use crate::bounds::GridBounds;
use crate::ray::{Axis, Occupancy, Ray, RaycastResult, Termination};

/// Default number of tile centres kept in [`RaycastResult::points`].
pub const TRACE_CAPACITY: usize = 32;

/// Distance (scaled by the ray direction) a corrected origin is pushed past
/// the boundary so that it lands inside the first tile.
pub const ENTRY_NUDGE: f32 = 1e-4;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RaycastOptions {
    /// Maximum number of grid-line crossings. `None` uses
    /// [`GridBounds::step_budget`].
    pub step_budget: Option<u32>,
    pub trace_capacity: usize,
    pub entry_nudge: f32,
}

impl Default for RaycastOptions {
    fn default() -> Self {
        Self {
            step_budget: None,
            trace_capacity: TRACE_CAPACITY,
            entry_nudge: ENTRY_NUDGE,
        }
    }
}

/// Where a ray starts walking the grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Entry {
    pub point: Vec2,
    /// Axis of the boundary plane that was crossed; `None` if the origin was
    /// already inside.
    pub axis: Option<Axis>,
}

/// Move the ray origin onto the grid boundary if it starts outside.
///
/// Candidate planes are tried in a fixed order (X under, X over, Y under,
/// Y over) and the first one whose nudged crossing point is in bounds wins.
/// Returns `None` if the ray never enters the bounds.
pub fn enter_bounds(ray: Ray, bounds: &GridBounds, nudge: f32) -> Option<Entry> {
    if bounds.contains_point(ray.origin) {
        return Some(Entry {
            point: ray.origin,
            axis: None,
        });
    }

    let nudge = ray.direction * nudge;
    for axis in Axis::ALL {
        let origin = axis.of(ray.origin);
        let dir = axis.of(ray.direction);
        let min = axis.of(bounds.min());
        let max = axis.of(bounds.max());

        let candidates = [
            (origin < min && dir > 0.0, min),
            (origin >= max && dir < 0.0, max),
        ];
        for (facing, plane) in candidates {
            if !facing {
                continue;
            }
            let mut point = ray.point_on_plane(axis, plane) + nudge;
            // A steep ray's nudge can round away on the half-open max face.
            if plane == max && point[axis.index()] >= max {
                point[axis.index()] = next_below(max);
            }
            if bounds.contains_point(point) {
                log::debug!("ray from {} enters bounds at {point} across {axis:?}", ray.origin);
                return Some(Entry {
                    point,
                    axis: Some(axis),
                });
            }
        }
    }

    None
}

/// Largest finite `f32` strictly less than `x`.
fn next_below(x: f32) -> f32 {
    if x == 0.0 {
        -f32::from_bits(1)
    } else if x > 0.0 {
        f32::from_bits(x.to_bits() - 1)
    } else {
        f32::from_bits(x.to_bits() + 1)
    }
}

/// Walk `ray` through `bounds` with the default options.
pub fn raycast<O>(ray: Ray, bounds: &GridBounds, occupancy: &O) -> RaycastResult
where
    O: Occupancy + ?Sized,
{
    raycast_with(ray, bounds, occupancy, &RaycastOptions::default())
}

pub fn raycast_with<O>(
    ray: Ray,
    bounds: &GridBounds,
    occupancy: &O,
    options: &RaycastOptions,
) -> RaycastResult
where
    O: Occupancy + ?Sized,
{
    let Some(entry) = enter_bounds(ray, bounds, options.entry_nudge) else {
        log::trace!("ray from {} misses bounds", ray.origin);
        return RaycastResult::missed(ray.origin);
    };

    let budget = options
        .step_budget
        .unwrap_or_else(|| bounds.step_budget());
    let mut dda = Dda::new(entry.point, ray.direction);
    let mut result = RaycastResult {
        tile_index: dda.tile,
        total_steps: 0,
        hit_surface: false,
        hit_edge: entry.axis.unwrap_or_default(),
        termination: Termination::BudgetExhausted,
        entry_point: entry.point,
        points: Vec::with_capacity(options.trace_capacity.min(budget as usize + 1)),
    };

    while result.total_steps < budget {
        if !bounds.contains_tile(dda.tile) {
            result.termination = Termination::ExitedBounds;
            break;
        }

        if result.points.len() < options.trace_capacity {
            result.points.push(dda.tile.as_vec2() + 0.5);
        }

        if occupancy.is_blocking(dda.tile) {
            result.hit_surface = true;
            result.termination = Termination::Hit;
            break;
        }

        let Some(axis) = dda.next_axis() else {
            log::warn!("ray direction {} cannot advance", ray.direction);
            result.termination = Termination::Stalled;
            break;
        };
        dda.advance(axis);
        result.hit_edge = axis;
        result.total_steps += 1;
    }

    if result.termination == Termination::BudgetExhausted && !bounds.contains_tile(dda.tile) {
        result.termination = Termination::ExitedBounds;
    }
    result.tile_index = dda.tile;

    log::trace!(
        "ray from {} stopped at {} after {} steps: {:?}",
        ray.origin,
        result.tile_index,
        result.total_steps,
        result.termination
    );
    result
}

/// Per-axis traversal state.
struct Dda {
    tile: IVec2,
    step: IVec2,
    /// Ray distance to cross one tile along each axis. Infinite for axes
    /// the ray runs parallel to.
    delta_dist: Vec2,
    /// Ray distance from the start to the next grid line on each axis.
    to_side_dist: Vec2,
}

impl Dda {
    fn new(start: Vec2, dir: Vec2) -> Self {
        let tile = start.floor().as_ivec2();
        let (step_x, delta_x, side_x) = axis_params(start.x, tile.x, dir.x);
        let (step_y, delta_y, side_y) = axis_params(start.y, tile.y, dir.y);

        Self {
            tile,
            step: IVec2::new(step_x, step_y),
            delta_dist: Vec2::new(delta_x, delta_y),
            to_side_dist: Vec2::new(side_x, side_y),
        }
    }

    /// Axis whose next grid line is closest. X wins exact ties.
    fn next_axis(&self) -> Option<Axis> {
        match (self.delta_dist.x.is_finite(), self.delta_dist.y.is_finite()) {
            (true, true) if self.to_side_dist.x <= self.to_side_dist.y => Some(Axis::X),
            (true, true) => Some(Axis::Y),
            (true, false) => Some(Axis::X),
            (false, true) => Some(Axis::Y),
            (false, false) => None,
        }
    }

    fn advance(&mut self, axis: Axis) {
        let i = axis.index();
        self.tile[i] += self.step[i];
        self.to_side_dist[i] += self.delta_dist[i];
    }
}

/// Returns `(step, delta_dist, to_side_dist)` for one axis.
fn axis_params(start: f32, tile: i32, dir: f32) -> (i32, f32, f32) {
    let delta = (1.0 / dir).abs();
    if !delta.is_finite() {
        return (1, f32::INFINITY, f32::INFINITY);
    }

    if dir < 0.0 {
        (-1, delta, (start - tile as f32) * delta)
    } else {
        (1, delta, (tile as f32 + 1.0 - start) * delta)
    }
}
