//! Scanline z-buffer software renderer
//!
//! Pipeline per frame:
//! - back-face culling from each polygon's winding
//! - flat shading (one directional light + ambient)
//! - edge-list scan conversion, one edge list per polygon
//! - z-buffer compositing into a frame-local framebuffer

pub mod math;
pub mod edge_list;
pub mod pipeline;
pub mod render;

pub use math::{Transform, Vec3};
pub use edge_list::EdgeList;
pub use render::{render_scene, Framebuffer, RenderSettings};

/// Canvas dimensions
pub const WIDTH: usize = 600;
pub const HEIGHT: usize = 600;
