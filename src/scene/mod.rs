//! Scene data types
//!
//! Pure data structures with minimal behavior. All pipeline logic lives
//! in the renderer modules. Scenes are treated as immutable values:
//! every transform produces a new `Scene`, the input stays usable.

pub mod loader;

pub use loader::{load_scene, load_scene_from_str, save_scene, SceneError};

use serde::{Serialize, Deserialize};
use crate::renderer::Vec3;

/// RGB color (0-255 per channel)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0 };
    pub const WHITE: Color = Color { r: 255, g: 255, b: 255 };
    pub const GRAY: Color = Color { r: 128, g: 128, b: 128 };

    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Convert to [u8; 4] for the RGBA framebuffer
    pub fn to_bytes(self) -> [u8; 4] {
        [self.r, self.g, self.b, 255]
    }
}

/// A flat triangle: three vertices plus a reflectance color.
///
/// Vertex order defines the outward normal by the right-hand rule and is
/// preserved through every scene transform; reordering would silently
/// flip culling results.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Polygon {
    pub vertices: [Vec3; 3],
    pub reflectance: Color,
}

impl Polygon {
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3, reflectance: Color) -> Self {
        Self {
            vertices: [v0, v1, v2],
            reflectance,
        }
    }
}

/// An ordered collection of polygons plus one directional light.
///
/// The light vector points from the surfaces toward the light source and
/// is not required to be unit length (only the angle matters).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scene {
    pub polygons: Vec<Polygon>,
    pub light: Vec3,
}

impl Scene {
    pub fn new(polygons: Vec<Polygon>, light: Vec3) -> Self {
        Self { polygons, light }
    }
}

/// Built-in demo scene: a colored cube, one color per face.
///
/// Winding is chosen so each face normal points out of the cube under the
/// screen-space convention (x right, y down, camera looking down +z).
pub fn demo_cube() -> Scene {
    // Corners, front face first (z = -1 is toward the camera)
    let a = Vec3::new(-1.0, -1.0, -1.0);
    let b = Vec3::new(1.0, -1.0, -1.0);
    let c = Vec3::new(1.0, 1.0, -1.0);
    let d = Vec3::new(-1.0, 1.0, -1.0);
    let e = Vec3::new(-1.0, -1.0, 1.0);
    let f = Vec3::new(1.0, -1.0, 1.0);
    let g = Vec3::new(1.0, 1.0, 1.0);
    let h = Vec3::new(-1.0, 1.0, 1.0);

    let front = Color::new(220, 60, 60);
    let back = Color::new(60, 160, 220);
    let right = Color::new(60, 200, 90);
    let left = Color::new(230, 190, 60);
    let top = Color::new(190, 90, 210);
    let bottom = Color::new(230, 120, 50);

    let polygons = vec![
        Polygon::new(a, d, c, front),
        Polygon::new(a, c, b, front),
        Polygon::new(e, f, g, back),
        Polygon::new(e, g, h, back),
        Polygon::new(b, c, g, right),
        Polygon::new(b, g, f, right),
        Polygon::new(a, e, h, left),
        Polygon::new(a, h, d, left),
        Polygon::new(a, b, f, top),
        Polygon::new(a, f, e, top),
        Polygon::new(d, h, g, bottom),
        Polygon::new(d, g, c, bottom),
    ];

    Scene::new(polygons, Vec3::new(0.5, -0.7, -1.0))
}
