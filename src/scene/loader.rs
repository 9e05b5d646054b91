//! Scene loading and saving
//!
//! Two formats: the plain-text triangle format (one light line, then one
//! triangle per line: 9 vertex floats followed by 3 reflectance ints)
//! and RON for scenes saved by this program. The extension picks the
//! format; anything that is not `.ron` is read as plain text.

use std::fs;
use std::path::Path;

use crate::renderer::Vec3;
use super::{Color, Polygon, Scene};

/// Error type for scene loading
#[derive(Debug)]
pub enum SceneError {
    IoError(std::io::Error),
    ParseError { line: usize, message: String },
    RonError(ron::error::SpannedError),
    SerializeError(ron::Error),
}

impl From<std::io::Error> for SceneError {
    fn from(e: std::io::Error) -> Self {
        SceneError::IoError(e)
    }
}

impl From<ron::error::SpannedError> for SceneError {
    fn from(e: ron::error::SpannedError) -> Self {
        SceneError::RonError(e)
    }
}

impl From<ron::Error> for SceneError {
    fn from(e: ron::Error) -> Self {
        SceneError::SerializeError(e)
    }
}

impl std::fmt::Display for SceneError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SceneError::IoError(e) => write!(f, "IO error: {}", e),
            SceneError::ParseError { line, message } => {
                write!(f, "Parse error on line {}: {}", line, message)
            }
            SceneError::RonError(e) => write!(f, "Parse error: {}", e),
            SceneError::SerializeError(e) => write!(f, "Serialize error: {}", e),
        }
    }
}

/// Load a scene from a file, picking the format from the extension
pub fn load_scene<P: AsRef<Path>>(path: P) -> Result<Scene, SceneError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let is_ron = path
        .extension()
        .map(|ext| ext.to_ascii_lowercase() == "ron")
        .unwrap_or(false);

    if is_ron {
        Ok(ron::from_str(&contents)?)
    } else {
        load_scene_from_str(&contents)
    }
}

/// Parse the plain-text triangle format. Blank lines are ignored.
pub fn load_scene_from_str(text: &str) -> Result<Scene, SceneError> {
    let mut lines = text
        .lines()
        .enumerate()
        .filter(|(_, l)| !l.trim().is_empty());

    let (line_no, light_line) = lines.next().ok_or(SceneError::ParseError {
        line: 1,
        message: "missing light direction line".to_string(),
    })?;
    let light_values = parse_floats(light_line, 3, line_no + 1)?;
    let light = Vec3::new(light_values[0], light_values[1], light_values[2]);

    let mut polygons = Vec::new();
    for (line_no, line) in lines {
        let line_no = line_no + 1;
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() != 12 {
            return Err(SceneError::ParseError {
                line: line_no,
                message: format!("expected 12 values, found {}", tokens.len()),
            });
        }

        let mut points = [0.0f32; 9];
        for (i, token) in tokens[..9].iter().enumerate() {
            points[i] = token.parse().map_err(|_| SceneError::ParseError {
                line: line_no,
                message: format!("bad coordinate '{}'", token),
            })?;
        }

        let mut channels = [0u8; 3];
        for (i, token) in tokens[9..].iter().enumerate() {
            channels[i] = token.parse().map_err(|_| SceneError::ParseError {
                line: line_no,
                message: format!("bad color value '{}'", token),
            })?;
        }

        polygons.push(Polygon::new(
            Vec3::new(points[0], points[1], points[2]),
            Vec3::new(points[3], points[4], points[5]),
            Vec3::new(points[6], points[7], points[8]),
            Color::new(channels[0], channels[1], channels[2]),
        ));
    }

    Ok(Scene::new(polygons, light))
}

/// Save a scene as a RON file
pub fn save_scene<P: AsRef<Path>>(scene: &Scene, path: P) -> Result<(), SceneError> {
    let config = ron::ser::PrettyConfig::new()
        .depth_limit(4)
        .indentor("  ".to_string());

    let contents = ron::ser::to_string_pretty(scene, config)?;
    fs::write(path, contents)?;
    Ok(())
}

fn parse_floats(line: &str, count: usize, line_no: usize) -> Result<Vec<f32>, SceneError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() != count {
        return Err(SceneError::ParseError {
            line: line_no,
            message: format!("expected {} values, found {}", count, tokens.len()),
        });
    }
    tokens
        .iter()
        .map(|t| {
            t.parse().map_err(|_| SceneError::ParseError {
                line: line_no,
                message: format!("bad value '{}'", t),
            })
        })
        .collect()
}
