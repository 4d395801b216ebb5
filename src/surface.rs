use glam::Vec2;

use crate::ray::{Ray, RaycastResult, SurfaceDetails};

/// Exact point and outward normal where `ray` strikes the tile that stopped
/// it. `None` unless the raycast hit a blocking tile.
///
/// `ray` must be the ray that produced `result`; the corrected entry point
/// lies on the same line, so either origin gives the same answer.
pub fn surface_details(ray: Ray, result: &RaycastResult) -> Option<SurfaceDetails> {
    if !result.hit_surface {
        return None;
    }

    // A ray can only run parallel to its hit axis when the first tile was
    // already blocking.
    let mut axis = result.hit_edge;
    if axis.of(ray.direction) == 0.0 {
        axis = axis.other();
    }
    let dir = axis.of(ray.direction);
    if dir == 0.0 {
        return None;
    }

    let tile = axis.of_tile(result.tile_index) as f32;
    let (plane, nrm) = if dir < 0.0 {
        (tile + 1.0, axis.unit())
    } else {
        (tile, -axis.unit())
    };

    Some(SurfaceDetails {
        pos: ray.point_on_plane(axis, plane),
        nrm,
    })
}

impl SurfaceDetails {
    /// Direction of `incoming` mirrored about the surface.
    pub fn reflect(&self, incoming: Vec2) -> Vec2 {
        incoming - 2.0 * incoming.dot(self.nrm) * self.nrm
    }
}
