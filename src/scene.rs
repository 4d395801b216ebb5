//! Interactive raycasting scene.
//!
//! Holds everything the viewer manipulates: the tile chunk, the ray's
//! origin and direction handles, the camera, and what is currently being
//! dragged. Each frame [`Scene::cast_rays`] sweeps a fan of rays around the
//! direction handle and collects where they hit.

use glam::Vec2;
use rand::Rng;
use std::f32::consts::TAU;

use crate::bounds::GridBounds;
use crate::cast::{raycast_with, RaycastOptions};
use crate::error::GridError;
use crate::map::{Tile, TileMap, DEFAULT_DENSITY};
use crate::ray::{Ray, SurfaceDetails};

/// Number of rays in the sweep, spread evenly over a full turn.
pub const RAY_COUNT: usize = 501;

/// How close (in tiles) the cursor must be to pick up a handle.
pub const HANDLE_RADIUS: f32 = 0.25;

pub const DEFAULT_ZOOM: f32 = 16.0;
pub const MIN_ZOOM: f32 = 0.001;
pub const MAX_ZOOM: f32 = 48.0;

const MIN_HANDLE_SPREAD: f32 = 1e-3;

// fraction of the current zoom applied per wheel tick
const ZOOM_STEP: f32 = 0.1;

/// Camera over the tile plane.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct View {
    /// World point shown at the centre of the screen.
    pub pos: Vec2,
    /// Number of tiles visible vertically.
    pub zoom: f32,
}

impl Default for View {
    fn default() -> Self {
        Self {
            pos: Vec2::ZERO,
            zoom: DEFAULT_ZOOM,
        }
    }
}

impl View {
    pub fn pixels_per_unit(&self, size: Vec2) -> f32 {
        size.y / self.zoom
    }

    /// Screen pixels (y down) to world units (y up).
    pub fn screen_to_world(&self, p: Vec2, size: Vec2) -> Vec2 {
        let ppu = self.pixels_per_unit(size);
        self.pos + Vec2::new(p.x - 0.5 * size.x, 0.5 * size.y - p.y) / ppu
    }

    pub fn world_to_screen(&self, w: Vec2, size: Vec2) -> Vec2 {
        let ppu = self.pixels_per_unit(size);
        let rel = (w - self.pos) * ppu;
        Vec2::new(0.5 * size.x + rel.x, 0.5 * size.y - rel.y)
    }

    pub fn zoom_by(&mut self, ticks: f32) {
        self.zoom = (self.zoom - ticks * ZOOM_STEP * self.zoom).clamp(MIN_ZOOM, MAX_ZOOM);
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Handle {
    Origin,
    Direction,
}

#[derive(Clone, Copy, PartialEq, Debug)]
enum Grab {
    /// `offset` keeps the handle from jumping to the cursor.
    Handle { handle: Handle, offset: Vec2 },
    View { mouse: Vec2, view_pos: Vec2 },
}

pub struct Scene {
    map: TileMap,
    bounds: GridBounds,
    pub ray_pos: Vec2,
    /// Always unit length.
    pub ray_dir: Vec2,
    pub view: View,
    /// Snap dragged handles to whole tiles.
    pub snap: bool,
    pub options: RaycastOptions,
    hits: Vec<SurfaceDetails>,
    trace: Vec<Vec2>,
    grab: Option<Grab>,
}

impl Scene {
    pub fn new(map: TileMap) -> Result<Self, GridError> {
        let bounds = map.bounds()?;
        let ray_pos = map.spawn().unwrap_or(Vec2::ZERO);

        Ok(Self {
            map,
            bounds,
            ray_pos,
            ray_dir: Vec2::X,
            view: View::default(),
            snap: false,
            options: RaycastOptions::default(),
            hits: Vec::with_capacity(RAY_COUNT),
            trace: Vec::new(),
            grab: None,
        })
    }

    pub fn map(&self) -> &TileMap {
        &self.map
    }

    pub fn bounds(&self) -> &GridBounds {
        &self.bounds
    }

    /// Hit points of the last sweep.
    pub fn hits(&self) -> &[SurfaceDetails] {
        &self.hits
    }

    /// Tiles visited by the unrotated ray in the last sweep.
    pub fn trace(&self) -> &[Vec2] {
        &self.trace
    }

    pub fn handle_pos(&self, handle: Handle) -> Vec2 {
        match handle {
            Handle::Origin => self.ray_pos,
            Handle::Direction => self.ray_pos + self.ray_dir,
        }
    }

    pub fn cast_rays(&mut self) {
        self.hits.clear();

        for i in 0..RAY_COUNT {
            let angle = i as f32 * TAU / RAY_COUNT as f32;
            let dir = Vec2::from_angle(angle).rotate(self.ray_dir).normalize();
            let ray = Ray::new(self.ray_pos, dir);
            let mut result = raycast_with(ray, &self.bounds, &self.map, &self.options);

            if let Some(details) = result.surface_details(ray) {
                self.hits.push(details);
            }
            if i == 0 {
                self.trace = std::mem::take(&mut result.points);
            }
        }

        log::trace!("{} of {RAY_COUNT} rays hit", self.hits.len());
    }

    /// Handle under `world`, preferring the direction handle when they overlap.
    pub fn handle_at(&self, world: Vec2) -> Option<Handle> {
        [Handle::Direction, Handle::Origin]
            .into_iter()
            .find(|handle| self.handle_pos(*handle).distance(world) < HANDLE_RADIUS)
    }

    /// Start dragging the handle under `world`. Returns whether one was found.
    pub fn grab_item(&mut self, world: Vec2) -> bool {
        let Some(handle) = self.handle_at(world) else {
            return false;
        };
        self.grab = Some(Grab::Handle {
            handle,
            offset: world - self.handle_pos(handle),
        });
        true
    }

    pub fn grab_view(&mut self, screen: Vec2) {
        self.grab = Some(Grab::View {
            mouse: screen,
            view_pos: self.view.pos,
        });
    }

    pub fn release(&mut self) {
        self.grab = None;
    }

    pub fn is_grabbing(&self) -> bool {
        self.grab.is_some()
    }

    /// Follow the cursor at `screen` with whatever is grabbed.
    pub fn drag(&mut self, screen: Vec2, size: Vec2) {
        match self.grab {
            None => {}
            Some(Grab::Handle { handle, offset }) => {
                let mut p = self.view.screen_to_world(screen, size) - offset;
                if self.snap {
                    p = p.round();
                }
                match handle {
                    Handle::Origin => self.ray_pos = p,
                    Handle::Direction => {
                        let tip = p - self.ray_pos;
                        // dropping the tip onto the origin keeps the old direction
                        if tip.length() > MIN_HANDLE_SPREAD {
                            self.ray_dir = tip.normalize();
                        }
                    }
                }
            }
            Some(Grab::View { mouse, view_pos }) => {
                let delta = screen - mouse;
                let ppu = self.view.pixels_per_unit(size);
                self.view.pos = view_pos - Vec2::new(delta.x, -delta.y) / ppu;
            }
        }
    }

    pub fn zoom_by(&mut self, ticks: f32) {
        self.view.zoom_by(ticks);
    }

    pub fn reset_view(&mut self) {
        self.view = View::default();
    }

    pub fn reset_tiles(&mut self, rng: &mut impl Rng) {
        self.map.reset_tiles(DEFAULT_DENSITY, rng);
    }

    pub fn toggle_tile(&mut self, world: Vec2) -> Result<Tile, GridError> {
        self.map.toggle(world.floor().as_ivec2())
    }
}
