use approx::assert_relative_eq;
use glam::{IVec2, Vec2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use voxels::cast::TRACE_CAPACITY;
use voxels::map::{CHUNK_POS, CHUNK_SIZE};
use voxels::{
    enter_bounds, raycast, raycast_with, surface_details, Axis, GridBounds, RaycastOptions, Ray,
    Termination, TileMap,
};

fn grid4() -> GridBounds {
    GridBounds::new(Vec2::ZERO, Vec2::new(4.0, 4.0)).expect("valid bounds")
}

fn center_blocker(tile: IVec2) -> bool {
    tile == IVec2::new(2, 2)
}

#[test]
fn diagonal_ray_hits_blocker() {
    let ray = Ray::new(Vec2::new(0.5, 0.5), Vec2::new(1.0, 1.0).normalize());
    let r = raycast(ray, &grid4(), &center_blocker);

    assert!(r.hit_surface);
    assert_eq!(r.termination, Termination::Hit);
    assert_eq!(r.tile_index, IVec2::new(2, 2));
    // one axis per step: two crossings in x, two in y
    assert_eq!(r.total_steps, 4);
    assert_eq!(r.hit_edge, Axis::Y);
    assert_eq!(r.points.len(), 5);
    assert_eq!(r.points.last(), Some(&Vec2::new(2.5, 2.5)));
}

#[test]
fn ray_from_outside_crosses_row() {
    let ray = Ray::new(Vec2::new(-5.0, 2.0), Vec2::new(1.0, 0.0));
    let entry = enter_bounds(ray, &grid4(), 1e-4).expect("enters");
    assert_eq!(entry.point.floor().as_ivec2(), IVec2::new(0, 2));

    let r = raycast(ray, &grid4(), &|_: IVec2| false);
    assert!(!r.hit_surface);
    assert_eq!(r.termination, Termination::ExitedBounds);
    assert_eq!(r.tile_index, IVec2::new(4, 2));
    assert_eq!(r.total_steps, 4);
    assert_eq!(r.points[0], Vec2::new(0.5, 2.5));
    assert_eq!(r.points.len(), 4);
}

#[test]
fn vertical_ray_only_advances_y() {
    let ray = Ray::new(Vec2::new(1.5, 0.5), Vec2::new(0.0, 1.0));
    let r = raycast(ray, &grid4(), &|_: IVec2| false);

    assert_eq!(r.total_steps, 4);
    assert_eq!(r.hit_edge, Axis::Y);
    assert_eq!(r.tile_index, IVec2::new(1, 4));
    for (i, p) in r.points.iter().enumerate() {
        assert_eq!(*p, Vec2::new(1.5, i as f32 + 0.5));
    }
}

#[test]
fn surface_details_of_diagonal_hit() {
    let ray = Ray::new(Vec2::new(0.5, 0.5), Vec2::new(1.0, 1.0).normalize());
    let r = raycast(ray, &grid4(), &center_blocker);
    let s = surface_details(ray, &r).expect("hit");

    assert!((2.0..=3.0).contains(&s.pos.x));
    assert!((2.0..=3.0).contains(&s.pos.y));
    assert_relative_eq!(s.nrm.length(), 1.0);
    assert!([Vec2::X, -Vec2::X, Vec2::Y, -Vec2::Y].contains(&s.nrm));
    assert_eq!(s.nrm, Vec2::new(0.0, -1.0));
    assert_relative_eq!(s.pos.x, 2.0, epsilon = 1e-5);
    assert_relative_eq!(s.pos.y, 2.0);
}

#[test]
fn normals_face_back_along_the_ray() {
    let bounds = grid4();
    let walls = |tile: IVec2| tile.x == 0 || tile.x == 3 || tile.y == 0 || tile.y == 3;
    let cases = [
        (Vec2::new(-1.0, 0.0), Vec2::new(1.0, 0.0)),
        (Vec2::new(1.0, 0.0), Vec2::new(-1.0, 0.0)),
        (Vec2::new(0.0, -1.0), Vec2::new(0.0, 1.0)),
        (Vec2::new(0.0, 1.0), Vec2::new(0.0, -1.0)),
    ];
    for (dir, normal) in cases {
        let ray = Ray::new(Vec2::new(1.5, 1.5), dir);
        let r = raycast(ray, &bounds, &walls);
        assert!(r.hit_surface, "{dir}");
        assert_eq!(surface_details(ray, &r).expect("hit").nrm, normal, "{dir}");
    }
}

#[test]
fn traces_stay_in_bounds() {
    let mut rng = StdRng::seed_from_u64(42);
    let map = TileMap::random(CHUNK_POS, CHUNK_SIZE, CHUNK_SIZE, 0.1, &mut rng);
    let bounds = map.bounds().expect("bounds");

    for _ in 0..2000 {
        let origin = Vec2::new(rng.gen_range(-8.0..8.0), rng.gen_range(-8.0..8.0));
        let dir = Vec2::from_angle(rng.gen_range(0.0..std::f32::consts::TAU));
        let ray = Ray::new(origin, dir);
        let r = raycast(ray, &bounds, &map);

        assert!(r.total_steps <= bounds.step_budget());
        assert!(r.points.len() <= TRACE_CAPACITY);
        assert!(r.points.len() <= r.total_steps as usize + 1);
        if r.hit_surface {
            assert_eq!(r.points.len(), (r.total_steps as usize + 1).min(TRACE_CAPACITY));
        }
        for p in &r.points {
            assert!(bounds.contains_tile(p.floor().as_ivec2()), "{p} from {origin} along {dir}");
        }
    }
}

#[test]
fn outside_origins_enter_or_miss_cleanly() {
    let mut rng = StdRng::seed_from_u64(9);
    let bounds = grid4();

    for _ in 0..2000 {
        let origin = Vec2::new(rng.gen_range(-10.0..14.0), rng.gen_range(-10.0..14.0));
        if bounds.contains_point(origin) {
            continue;
        }
        let dir = Vec2::from_angle(rng.gen_range(0.0..std::f32::consts::TAU));
        let r = raycast(Ray::new(origin, dir), &bounds, &|_: IVec2| false);

        match r.termination {
            Termination::MissedBounds => {
                assert_eq!(r.total_steps, 0);
                assert!(r.points.is_empty());
            }
            Termination::ExitedBounds => {
                assert!(bounds.contains_point(r.entry_point));
                assert!(!r.points.is_empty());
                for p in &r.points {
                    assert!(bounds.contains_tile(p.floor().as_ivec2()));
                }
            }
            other => panic!("unexpected termination {other:?} from {origin} along {dir}"),
        }
    }
}

#[test]
fn custom_budget_and_capacity() {
    let bounds = GridBounds::new(Vec2::ZERO, Vec2::new(64.0, 64.0)).expect("bounds");
    let options = RaycastOptions {
        step_budget: Some(10),
        trace_capacity: 3,
        ..Default::default()
    };
    let ray = Ray::new(Vec2::new(0.5, 0.5), Vec2::new(1.0, 0.3));
    let r = raycast_with(ray, &bounds, &|_: IVec2| false, &options);

    assert_eq!(r.total_steps, 10);
    assert_eq!(r.termination, Termination::BudgetExhausted);
    assert_eq!(r.points.len(), 3);
}
