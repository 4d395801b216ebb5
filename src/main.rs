use anyhow::Context;
use glam::Vec2;
use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use sdl2::mouse::MouseButton;
use std::time::{Duration, Instant};
use voxels::map::{CHUNK_POS, CHUNK_SIZE, DEFAULT_DENSITY};
use voxels::scene::RAY_COUNT;
use voxels::{Scene, TileMap};

mod render;

// helper trait to convert strings into std::error types
trait StringToAnyhow<T> {
    fn ah(self) -> anyhow::Result<T>;
}

impl<T> StringToAnyhow<T> for Result<T, String> {
    fn ah(self) -> anyhow::Result<T> {
        self.map_err(|err| anyhow::anyhow!("{err}"))
    }
}

// initial dimensions of the window
const WIDTH: u32 = 1200;
const HEIGHT: u32 = 900;

const TARGET_FPS: u64 = 60;

fn load_map() -> anyhow::Result<TileMap> {
    match std::env::args().nth(1) {
        Some(path) => TileMap::load(&path).with_context(|| format!("could not load map {path}")),
        None => {
            log::info!("no map given, generating a random chunk");
            Ok(TileMap::random(
                CHUNK_POS,
                CHUNK_SIZE,
                CHUNK_SIZE,
                DEFAULT_DENSITY,
                &mut rand::thread_rng(),
            ))
        }
    }
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init_custom_env("VOXELS_LOG");

    let mut scene = Scene::new(load_map()?).context("map has no tiles")?;

    // sdl boilerplate
    log::info!("initializing sdl2");
    let sdl_ctx = sdl2::init().ah()?;
    log::info!("initializing video");
    let video = sdl_ctx.video().ah()?;

    log::info!("initializing window");
    let window = video
        .window("voxels", WIDTH, HEIGHT)
        .position_centered()
        .resizable()
        .build()?;
    log::info!("creating canvas");
    let mut canvas = window.into_canvas().build()?;
    log::info!("pumping events");
    let mut events = sdl_ctx.event_pump().ah()?;

    let mut rng = rand::thread_rng();
    let mut mouse = Vec2::ZERO;
    let delta = 1_000 / TARGET_FPS;

    'main_loop: loop {
        let prev = Instant::now();
        let (w, h) = canvas.output_size().ah()?;
        let size = Vec2::new(w as f32, h as f32);

        // handle events
        for ev in events.poll_iter() {
            match ev {
                Event::Quit { .. } => break 'main_loop,
                Event::KeyDown {
                    keycode: Some(k),
                    repeat: false,
                    ..
                } => match k {
                    Keycode::Escape => break 'main_loop,
                    Keycode::F => scene.reset_view(),
                    Keycode::R => scene.reset_tiles(&mut rng),
                    Keycode::T => {
                        let world = scene.view.screen_to_world(mouse, size);
                        if let Err(err) = scene.toggle_tile(world) {
                            log::debug!("cannot toggle: {err}");
                        }
                    }
                    Keycode::LCtrl | Keycode::RCtrl => scene.snap = true,
                    _ => {}
                },
                Event::KeyUp {
                    keycode: Some(Keycode::LCtrl | Keycode::RCtrl),
                    ..
                } => scene.snap = false,
                Event::MouseButtonDown {
                    mouse_btn, x, y, ..
                } => {
                    mouse = Vec2::new(x as f32, y as f32);
                    match mouse_btn {
                        MouseButton::Left => {
                            let world = scene.view.screen_to_world(mouse, size);
                            scene.grab_item(world);
                        }
                        MouseButton::Right | MouseButton::Middle => scene.grab_view(mouse),
                        _ => {}
                    }
                }
                Event::MouseButtonUp { .. } => scene.release(),
                Event::MouseMotion { x, y, .. } => {
                    mouse = Vec2::new(x as f32, y as f32);
                    if scene.is_grabbing() {
                        scene.drag(mouse, size);
                    }
                }
                Event::MouseWheel { y, .. } => scene.zoom_by(y as f32),
                _ => {}
            }
        }

        scene.cast_rays();

        if let Err(err) = render::draw(&mut canvas, &scene, size) {
            log::error!("error while drawing: {err}");
            Err(err)?;
        }
        canvas.present();
        canvas
            .window_mut()
            .set_title(&format!("voxels - {} / {RAY_COUNT} rays hit", scene.hits().len()))?;

        let diff = Instant::now() - prev;
        if diff < Duration::from_millis(delta) {
            std::thread::sleep(Duration::from_millis(delta) - diff);
        }
    }

    Ok(())
}
