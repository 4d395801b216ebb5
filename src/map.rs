use glam::{IVec2, UVec2, Vec2};
use rand::Rng;
use std::collections::HashMap;
use std::fs::read_to_string;
use std::path::Path;

use crate::bounds::GridBounds;
use crate::error::GridError;
use crate::ray::Occupancy;

pub const CHUNK_SIZE: u32 = 16;
pub const CHUNK_POS: IVec2 = IVec2::new(-8, -8);

/// Chance of an interior tile being solid in [`TileMap::random`].
pub const DEFAULT_DENSITY: f64 = 0.1;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Tile {
    #[default]
    Empty,
    Solid,
    /// Empty tile marking where the ray starts.
    Spawn,
}

impl Tile {
    pub fn is_blocking(self) -> bool {
        self == Tile::Solid
    }
}

/// Rectangular chunk of tiles whose lower-left tile sits at `origin`.
#[derive(Clone, PartialEq, Debug)]
pub struct TileMap {
    pub origin: IVec2,
    pub width: u32,
    pub height: u32,
    tiles: Vec<Tile>,
}

impl TileMap {
    pub fn empty(origin: IVec2, width: u32, height: u32) -> Self {
        Self {
            origin,
            width,
            height,
            tiles: vec![Tile::Empty; (width as usize) * (height as usize)],
        }
    }

    /// Solid border with each interior tile solid with probability `density`.
    pub fn random(origin: IVec2, width: u32, height: u32, density: f64, rng: &mut impl Rng) -> Self {
        let mut this = Self::empty(origin, width, height);
        this.reset_tiles(density, rng);
        this
    }

    pub fn reset_tiles(&mut self, density: f64, rng: &mut impl Rng) {
        let density = if density.is_nan() { 0.0 } else { density.clamp(0.0, 1.0) };
        for yi in 0..self.height {
            for xi in 0..self.width {
                let border = xi == 0 || yi == 0 || xi == self.width - 1 || yi == self.height - 1;
                let idx = self.index(UVec2::new(xi, yi));
                self.tiles[idx] = if border || rng.gen_bool(density) {
                    Tile::Solid
                } else {
                    Tile::Empty
                };
            }
        }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, GridError> {
        let path = path.as_ref();
        log::info!("loading map at {}", path.display());
        Self::parse(&read_to_string(path)?)
    }

    /// Parse the text map format:
    ///
    /// ```text
    /// !!!!META
    /// origin,x=-8,y=-8
    ///
    /// !!!!MAIN
    /// #####
    /// #*..#
    /// #####
    /// ```
    ///
    /// Rows run from the top (highest y) down. `#` is solid, `.` or a space
    /// is empty and `*` marks the spawn.
    pub fn parse(text: &str) -> Result<Self, GridError> {
        let mut lines = text.lines();
        let mut origin = IVec2::ZERO;
        let mut rows = None;

        while let Some(line) = lines.by_ref().next() {
            match line.trim_end() {
                "" => continue,
                "!!!!META" => origin = parse_meta(&mut lines)?,
                "!!!!MAIN" => rows = Some(parse_main(&mut lines)?),
                other => {
                    return Err(GridError::InvalidMap(format!(
                        "unrecognized directive: {other}"
                    )))
                }
            }
        }

        let rows = rows.ok_or_else(|| GridError::InvalidMap("missing !!!!MAIN section".into()))?;
        let height = rows.len() as u32;
        let width = rows[0].len() as u32;

        // stored bottom row first
        let tiles = rows.into_iter().rev().flatten().collect();
        let this = Self {
            origin,
            width,
            height,
            tiles,
        };
        log::debug!("parsed {width}x{height} map at {origin}");
        Ok(this)
    }

    pub fn bounds(&self) -> Result<GridBounds, GridError> {
        GridBounds::from_tiles(self.origin, UVec2::new(self.width, self.height))
    }

    pub fn get(&self, tile: IVec2) -> Option<Tile> {
        self.local(tile).map(|local| self.tiles[self.index(local)])
    }

    pub fn set(&mut self, tile: IVec2, value: Tile) -> Result<(), GridError> {
        let local = self.local(tile).ok_or(GridError::OutOfBounds(tile))?;
        let idx = self.index(local);
        self.tiles[idx] = value;
        Ok(())
    }

    /// Flip a tile between empty and solid. Returns the new tile.
    pub fn toggle(&mut self, tile: IVec2) -> Result<Tile, GridError> {
        let next = match self.get(tile).ok_or(GridError::OutOfBounds(tile))? {
            Tile::Solid => Tile::Empty,
            Tile::Empty | Tile::Spawn => Tile::Solid,
        };
        self.set(tile, next)?;
        Ok(next)
    }

    /// Centre of the spawn tile, if the map has one.
    pub fn spawn(&self) -> Option<Vec2> {
        let idx = self.tiles.iter().position(|tile| *tile == Tile::Spawn)?;
        Some(self.idx_to_tile(idx).as_vec2() + 0.5)
    }

    pub fn idx_to_tile(&self, idx: usize) -> IVec2 {
        let x = idx % self.width as usize;
        let y = idx / self.width as usize;
        self.origin + IVec2::new(x as i32, y as i32)
    }

    pub fn tiles(&self) -> impl Iterator<Item = (IVec2, Tile)> + '_ {
        self.tiles
            .iter()
            .enumerate()
            .map(|(idx, tile)| (self.idx_to_tile(idx), *tile))
    }

    fn local(&self, tile: IVec2) -> Option<UVec2> {
        let local = tile - self.origin;
        if local.x < 0 || local.y < 0 || local.x >= self.width as i32 || local.y >= self.height as i32 {
            return None;
        }
        Some(local.as_uvec2())
    }

    fn index(&self, local: UVec2) -> usize {
        (local.y as usize) * (self.width as usize) + (local.x as usize)
    }
}

impl Default for TileMap {
    fn default() -> Self {
        Self::empty(CHUNK_POS, CHUNK_SIZE, CHUNK_SIZE)
    }
}

impl Occupancy for TileMap {
    fn is_blocking(&self, tile: IVec2) -> bool {
        self.get(tile).is_some_and(Tile::is_blocking)
    }
}

fn parse_meta<'lines>(lines: impl Iterator<Item = &'lines str>) -> Result<IVec2, GridError> {
    let mut origin = IVec2::ZERO;
    for line in lines {
        if line.trim().is_empty() {
            break;
        }

        let mut chunks = line.trim().split(',');
        let directive = chunks.next().unwrap_or_default();
        let params = chunks
            .map(|param| param.split_once('='))
            .collect::<Option<HashMap<_, _>>>()
            .ok_or_else(|| GridError::InvalidMap(format!("incorrectly formatted meta: {line}")))?;
        match directive {
            "origin" => {
                let coord = |key: &str| -> Result<i32, GridError> {
                    params
                        .get(key)
                        .unwrap_or(&"0")
                        .trim()
                        .parse()
                        .map_err(|err| GridError::InvalidMap(format!("bad origin {key}: {err}")))
                };
                origin = IVec2::new(coord("x")?, coord("y")?);
            }
            other => {
                return Err(GridError::InvalidMap(format!(
                    "unrecognized meta directive: {other}"
                )))
            }
        }
    }
    Ok(origin)
}

fn parse_main<'lines>(lines: impl Iterator<Item = &'lines str>) -> Result<Vec<Vec<Tile>>, GridError> {
    let mut rows: Vec<Vec<Tile>> = Vec::new();
    for line in lines {
        if line.is_empty() {
            break;
        }

        let row = line
            .chars()
            .map(|tile| match tile {
                '#' => Ok(Tile::Solid),
                '.' | ' ' => Ok(Tile::Empty),
                '*' => Ok(Tile::Spawn),
                other => Err(GridError::InvalidMap(format!("invalid tile in map: {other}"))),
            })
            .collect::<Result<Vec<_>, _>>()?;

        if let Some(first) = rows.first() {
            if first.len() != row.len() {
                return Err(GridError::InvalidMap(format!(
                    "row {} has {} tiles, expected {}",
                    rows.len(),
                    row.len(),
                    first.len()
                )));
            }
        }
        rows.push(row);
    }

    if rows.is_empty() || rows[0].is_empty() {
        return Err(GridError::InvalidMap("map has no tiles".into()));
    }
    Ok(rows)
}
