use glam::Vec2;
use sdl2::pixels::Color;
use sdl2::rect::{Point, Rect};
use sdl2::render::{BlendMode, Canvas};
use sdl2::video::Window;
use voxels::map::{Tile, CHUNK_SIZE};
use voxels::{Handle, Scene};

use crate::StringToAnyhow;

const BACKGROUND: Color = Color::RGB(26, 26, 26);
const SOLID: Color = Color::RGB(128, 128, 128);
const EMPTY: Color = Color::RGB(15, 15, 15);
const GRID: Color = Color::RGB(51, 51, 51);
const CHUNK_GRID: Color = Color::RGB(77, 51, 51);
const AXES: Color = Color::RGB(179, 77, 77);
const RAY: Color = Color::RGB(24, 20, 10);
const TRACE: Color = Color::RGB(200, 40, 40);
const HANDLE: Color = Color::RGB(102, 153, 0);

// grid lines are skipped once tiles get smaller than this many pixels
const MIN_GRID_SPACING: f32 = 4.0;

fn to_point(v: Vec2) -> Point {
    Point::new(v.x as i32, v.y as i32)
}

fn square(center: Vec2, half: i32) -> Rect {
    Rect::new(
        center.x as i32 - half,
        center.y as i32 - half,
        (half * 2) as u32,
        (half * 2) as u32,
    )
}

pub fn draw(canvas: &mut Canvas<Window>, scene: &Scene, size: Vec2) -> anyhow::Result<()> {
    let view = scene.view;
    let ppu = view.pixels_per_unit(size);

    canvas.set_blend_mode(BlendMode::None);
    canvas.set_draw_color(BACKGROUND);
    canvas.clear();

    // DRAW TILES
    let tile_px = ppu.ceil().max(1.0) as u32;
    for (tile, value) in scene.map().tiles() {
        // top-left corner, since screen y runs down
        let corner = view.world_to_screen(tile.as_vec2() + Vec2::Y, size);
        canvas.set_draw_color(match value {
            Tile::Solid => SOLID,
            Tile::Empty | Tile::Spawn => EMPTY,
        });
        canvas
            .fill_rect(Rect::new(corner.x as i32, corner.y as i32, tile_px, tile_px))
            .ah()?;
    }

    // DRAW GRID
    let lo = view.screen_to_world(Vec2::new(0.0, size.y), size).floor();
    let hi = view.screen_to_world(Vec2::new(size.x, 0.0), size).ceil();
    if ppu >= MIN_GRID_SPACING {
        for x in lo.x as i32..=hi.x as i32 {
            let sx = view.world_to_screen(Vec2::new(x as f32, 0.0), size).x as i32;
            let chunk_line = x.rem_euclid(CHUNK_SIZE as i32) == 0;
            canvas.set_draw_color(if chunk_line { CHUNK_GRID } else { GRID });
            canvas
                .draw_line(Point::new(sx, 0), Point::new(sx, size.y as i32))
                .ah()?;
        }
        for y in lo.y as i32..=hi.y as i32 {
            let sy = view.world_to_screen(Vec2::new(0.0, y as f32), size).y as i32;
            let chunk_line = y.rem_euclid(CHUNK_SIZE as i32) == 0;
            canvas.set_draw_color(if chunk_line { CHUNK_GRID } else { GRID });
            canvas
                .draw_line(Point::new(0, sy), Point::new(size.x as i32, sy))
                .ah()?;
        }
    }

    // DRAW AXES
    let origin = view.world_to_screen(Vec2::ZERO, size);
    canvas.set_draw_color(AXES);
    canvas
        .draw_line(Point::new(origin.x as i32, 0), Point::new(origin.x as i32, size.y as i32))
        .ah()?;
    canvas
        .draw_line(Point::new(0, origin.y as i32), Point::new(size.x as i32, origin.y as i32))
        .ah()?;

    // DRAW CHUNK OUTLINE
    let bounds = scene.bounds();
    let top_left = view.world_to_screen(Vec2::new(bounds.min().x, bounds.max().y), size);
    let bottom_right = view.world_to_screen(Vec2::new(bounds.max().x, bounds.min().y), size);
    let outline = bottom_right - top_left;
    canvas.set_draw_color(CHUNK_GRID);
    canvas
        .draw_rect(Rect::new(
            top_left.x as i32,
            top_left.y as i32,
            outline.x.max(1.0) as u32,
            outline.y.max(1.0) as u32,
        ))
        .ah()?;

    // DRAW RAYS
    let ray_pos = view.world_to_screen(scene.ray_pos, size);
    canvas.set_blend_mode(BlendMode::Add);
    canvas.set_draw_color(RAY);
    for hit in scene.hits() {
        canvas
            .draw_line(to_point(ray_pos), to_point(view.world_to_screen(hit.pos, size)))
            .ah()?;
    }
    canvas.set_blend_mode(BlendMode::None);

    // DRAW TRACE
    canvas.set_draw_color(TRACE);
    for p in scene.trace() {
        canvas.fill_rect(square(view.world_to_screen(*p, size), 2)).ah()?;
    }

    // DRAW HANDLES
    canvas.set_draw_color(HANDLE);
    for handle in [Handle::Origin, Handle::Direction] {
        let p = view.world_to_screen(scene.handle_pos(handle), size);
        canvas.fill_rect(square(p, 4)).ah()?;
    }
    canvas
        .draw_line(
            to_point(ray_pos),
            to_point(view.world_to_screen(scene.handle_pos(Handle::Direction), size)),
        )
        .ah()?;

    Ok(())
}
