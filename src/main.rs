//! Scanline Engine: scanline z-buffer software renderer
//!
//! Renders a scene of flat triangles with:
//! - back-face culling
//! - flat directional + ambient shading
//! - edge-list scan conversion
//! - per-pixel depth buffering
//!
//! Arrow keys rotate the viewpoint; each key press renders one complete
//! frame from scratch. The render core is pure; this file only wires it
//! to the window, keyboard and filesystem.

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod renderer;
mod scene;

use macroquad::prelude::*;
use renderer::{pipeline, render_scene, Framebuffer, RenderSettings, HEIGHT, WIDTH};
use scene::{demo_cube, load_scene, save_scene, Scene};
use std::path::PathBuf;

/// Rotation per arrow-key press, radians
const ROTATE_STEP: f32 = 0.5;
/// Ambient change per +/- press, per channel
const AMBIENT_STEP: u8 = 16;

fn window_conf() -> Conf {
    Conf {
        window_title: format!("Scanline Engine v{}", VERSION),
        window_width: WIDTH as i32,
        window_height: HEIGHT as i32,
        window_resizable: true,
        high_dpi: true,
        ..Default::default()
    }
}

/// Shell state: the current immutable scene plus render settings.
/// Every edit replaces the scene value and marks the frame dirty.
struct Viewer {
    scene: Option<Scene>,
    current_file: Option<PathBuf>,
    settings: RenderSettings,
    dirty: bool,
}

impl Viewer {
    fn new() -> Self {
        Self {
            scene: None,
            current_file: None,
            settings: RenderSettings::default(),
            dirty: true,
        }
    }

    /// Load a scene file and normalize it into render coordinates.
    /// On failure the previous scene stays in place.
    fn open(&mut self, path: PathBuf) {
        match load_scene(&path) {
            Ok(scene) => {
                println!("Loaded {} ({} polygons)", path.display(), scene.polygons.len());
                self.scene = Some(pipeline::fit_to_canvas(&scene, WIDTH, HEIGHT));
                self.current_file = Some(path);
                self.dirty = true;
            }
            Err(e) => {
                eprintln!("Failed to load {}: {}", path.display(), e);
            }
        }
    }

    fn rotate(&mut self, x_angle: f32, y_angle: f32) {
        if let Some(scene) = &self.scene {
            self.scene = Some(pipeline::rotate_scene(scene, x_angle, y_angle));
            self.dirty = true;
        }
    }

    fn adjust_ambient(&mut self, brighter: bool) {
        let a = &mut self.settings.ambient;
        if brighter {
            a.r = a.r.saturating_add(AMBIENT_STEP);
            a.g = a.g.saturating_add(AMBIENT_STEP);
            a.b = a.b.saturating_add(AMBIENT_STEP);
        } else {
            a.r = a.r.saturating_sub(AMBIENT_STEP);
            a.g = a.g.saturating_sub(AMBIENT_STEP);
            a.b = a.b.saturating_sub(AMBIENT_STEP);
        }
        println!("Ambient light: ({}, {}, {})", a.r, a.g, a.b);
        self.dirty = true;
    }
}

fn handle_keys(viewer: &mut Viewer) {
    if is_key_pressed(KeyCode::Left) {
        viewer.rotate(0.0, -ROTATE_STEP);
    }
    if is_key_pressed(KeyCode::Right) {
        viewer.rotate(0.0, ROTATE_STEP);
    }
    if is_key_pressed(KeyCode::Up) {
        viewer.rotate(-ROTATE_STEP, 0.0);
    }
    if is_key_pressed(KeyCode::Down) {
        viewer.rotate(ROTATE_STEP, 0.0);
    }

    if is_key_pressed(KeyCode::Equal) || is_key_pressed(KeyCode::KpAdd) {
        viewer.adjust_ambient(true);
    }
    if is_key_pressed(KeyCode::Minus) || is_key_pressed(KeyCode::KpSubtract) {
        viewer.adjust_ambient(false);
    }

    #[cfg(not(target_arch = "wasm32"))]
    if is_key_pressed(KeyCode::O) {
        let dialog = rfd::FileDialog::new().add_filter("Scene", &["txt", "ron"]);
        if let Some(path) = dialog.pick_file() {
            viewer.open(path);
        }
    }
    #[cfg(target_arch = "wasm32")]
    if is_key_pressed(KeyCode::O) {
        println!("Open is not available in the browser - pass a scene file at startup");
    }

    if is_key_pressed(KeyCode::R) {
        if let Some(path) = viewer.current_file.clone() {
            viewer.open(path);
        }
    }

    if is_key_pressed(KeyCode::S) {
        if let Some(scene) = &viewer.scene {
            let path = PathBuf::from("scene.ron");
            match save_scene(scene, &path) {
                Ok(()) => println!("Saved scene to {}", path.display()),
                Err(e) => eprintln!("Save failed: {}", e),
            }
        }
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    let mut fb = Framebuffer::new(WIDTH, HEIGHT);
    let mut viewer = Viewer::new();

    if let Some(arg) = std::env::args().nth(1) {
        viewer.open(PathBuf::from(arg));
    }
    if viewer.scene.is_none() {
        println!("No scene loaded, showing the demo cube");
        viewer.scene = Some(pipeline::fit_to_canvas(&demo_cube(), WIDTH, HEIGHT));
    }

    println!("=== Scanline Engine ===");
    println!("Arrows rotate | O open | R reload | S save RON | P screenshot | +/- ambient");

    loop {
        handle_keys(&mut viewer);

        // One complete frame per input event, from scratch
        if viewer.dirty {
            match &viewer.scene {
                Some(scene) => render_scene(&mut fb, scene, &viewer.settings),
                None => fb.clear(viewer.settings.background),
            }
            viewer.dirty = false;
        }

        if is_key_pressed(KeyCode::P) {
            match fb.save_png("screenshot.png") {
                Ok(()) => println!("Saved screenshot.png"),
                Err(e) => eprintln!("{}", e),
            }
        }

        clear_background(Color::from_rgba(30, 30, 35, 255));

        // Blit the framebuffer, scaled to fit the window with aspect kept
        let texture = Texture2D::from_rgba8(fb.width as u16, fb.height as u16, &fb.pixels);
        texture.set_filter(FilterMode::Nearest);

        let scale = (screen_width() / fb.width as f32).min(screen_height() / fb.height as f32);
        let draw_w = fb.width as f32 * scale;
        let draw_h = fb.height as f32 * scale;
        draw_texture_ex(
            &texture,
            (screen_width() - draw_w) / 2.0,
            (screen_height() - draw_h) / 2.0,
            WHITE,
            DrawTextureParams {
                dest_size: Some(Vec2::new(draw_w, draw_h)),
                ..Default::default()
            },
        );

        next_frame().await;
    }
}
