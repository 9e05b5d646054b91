//! Framebuffer and per-frame orchestration
//!
//! One complete frame is produced per call to `render_scene`, from
//! scratch: the buffers are fully reset, then every visible polygon is
//! culled, shaded, scan-converted and composited in scene order.

use std::path::Path;

use crate::scene::{Color, Scene};
use super::math::Vec3;
use super::pipeline;

/// Framebuffer for software rendering: an RGBA byte grid plus a per-pixel
/// depth grid, exclusively owned by one render call at a time.
pub struct Framebuffer {
    pub pixels: Vec<u8>,   // RGBA, 4 bytes per pixel, row-major
    pub zbuffer: Vec<f32>, // depth per pixel, +inf where nothing was drawn
    pub width: usize,
    pub height: usize,
}

impl Framebuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            pixels: vec![0; width * height * 4],
            zbuffer: vec![f32::INFINITY; width * height],
            width,
            height,
        }
    }

    /// Reset every pixel to `color` and every depth to +inf
    pub fn clear(&mut self, color: Color) {
        let bytes = color.to_bytes();
        for i in 0..(self.width * self.height) {
            self.pixels[i * 4..i * 4 + 4].copy_from_slice(&bytes);
            self.zbuffer[i] = f32::INFINITY;
        }
    }

    /// Write a pixel if `z` is strictly nearer than the stored depth.
    /// Smaller z is nearer (camera looks down +z); ties keep the
    /// existing pixel. Returns whether the pixel was written.
    pub fn set_pixel_with_depth(&mut self, x: usize, y: usize, z: f32, color: Color) -> bool {
        if x < self.width && y < self.height {
            let idx = y * self.width + x;
            if z < self.zbuffer[idx] {
                self.zbuffer[idx] = z;
                self.pixels[idx * 4..idx * 4 + 4].copy_from_slice(&color.to_bytes());
                return true;
            }
        }
        false
    }

    pub fn pixel(&self, x: usize, y: usize) -> Color {
        let idx = (y * self.width + x) * 4;
        Color::new(self.pixels[idx], self.pixels[idx + 1], self.pixels[idx + 2])
    }

    pub fn depth(&self, x: usize, y: usize) -> f32 {
        self.zbuffer[y * self.width + x]
    }

    /// Save the current frame as a PNG
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<(), String> {
        let img = image::RgbaImage::from_raw(
            self.width as u32,
            self.height as u32,
            self.pixels.clone(),
        )
        .ok_or_else(|| "Framebuffer size mismatch".to_string())?;
        img.save(path.as_ref())
            .map_err(|e| format!("Failed to save {}: {}", path.as_ref().display(), e))
    }
}

/// Lighting and background configuration for a frame
#[derive(Debug, Clone)]
pub struct RenderSettings {
    /// Color of the directional light
    pub light_color: Color,
    /// Ambient light level, passed through to shading unchanged
    pub ambient: Color,
    /// Background color where nothing is drawn
    pub background: Color,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            light_color: Color::new(100, 100, 100),
            ambient: Color::new(128, 128, 128),
            background: Color::GRAY,
        }
    }
}

/// Render one complete frame of the scene into the framebuffer.
///
/// The scene is expected origin-centered (see `pipeline::fit_to_canvas`)
/// and is moved to the canvas center here, so this step owns the screen
/// placement convention and rotation stays a pure rotation about the
/// model center.
pub fn render_scene(fb: &mut Framebuffer, scene: &Scene, settings: &RenderSettings) {
    fb.clear(settings.background);

    let screen = pipeline::translate_scene(
        scene,
        Vec3::new(fb.width as f32 / 2.0, fb.height as f32 / 2.0, 0.0),
    );

    for poly in &screen.polygons {
        if pipeline::is_hidden(poly) {
            continue;
        }
        let color = pipeline::flat_shade(
            poly,
            screen.light,
            settings.light_color,
            settings.ambient,
        );
        let edges = pipeline::build_edge_list(poly);
        pipeline::composite(fb, &edges, color);
    }
}
