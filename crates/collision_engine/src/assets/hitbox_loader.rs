//! Hitbox description loader
//!
//! Reads the collider description format: a reduced OBJ subset with
//! whitespace-delimited `v x y z` positions, optional `vn nx ny nz`
//! normals, and `f i/_/_ i/_/_ i/_/_` faces with 1-based indices.
//! Faces must be triangular. Vertex positions are taken as world space;
//! a transform variant bakes a matrix into them at load time so the
//! narrow phase never transforms faces per frame.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::collision::narrow::Polygon;
use crate::collision::primitives::Triangle;
use crate::foundation::math::{Mat4, Mat4Ext, Vec3};

/// Errors produced while loading a hitbox description
#[derive(Error, Debug)]
pub enum HitboxError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Malformed number or index
    #[error("Parse error: {0}")]
    ParseError(String),
    /// Structurally invalid description
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// Loader for the reduced-OBJ hitbox format
pub struct HitboxLoader;

impl HitboxLoader {
    /// Load a hitbox file and return its collision faces
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Vec<Polygon>, HitboxError> {
        let contents = fs::read_to_string(&path)?;
        let polygons = Self::parse(&contents)?;
        log::info!(
            "loaded hitbox {:?}: {} faces",
            path.as_ref(),
            polygons.len()
        );
        Ok(polygons)
    }

    /// Load a hitbox file with a world transform baked into the vertices
    pub fn load_transformed<P: AsRef<Path>>(
        path: P,
        transform: &Mat4,
    ) -> Result<Vec<Polygon>, HitboxError> {
        let polygons = Self::load(path)?;
        Ok(polygons
            .into_iter()
            .map(|polygon| {
                let triangle = Triangle::new(
                    transform.apply_to_position(polygon.triangle.v0),
                    transform.apply_to_position(polygon.triangle.v1),
                    transform.apply_to_position(polygon.triangle.v2),
                );
                let normal = transform.transform_vector(&polygon.normal).normalize();
                Polygon::with_normal(triangle, normal)
            })
            .collect())
    }

    /// Parse a hitbox description from text
    pub fn parse(source: &str) -> Result<Vec<Polygon>, HitboxError> {
        let mut positions: Vec<Vec3> = Vec::new();
        let mut normals: Vec<Vec3> = Vec::new();
        let mut polygons: Vec<Polygon> = Vec::new();

        for line in source.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let parts: Vec<&str> = line.split_whitespace().collect();
            match parts[0] {
                "v" => positions.push(parse_vec3(&parts, "vertex")?),
                "vn" => normals.push(parse_vec3(&parts, "normal")?),
                "f" => {
                    if parts.len() != 4 {
                        return Err(HitboxError::InvalidFormat(format!(
                            "face must have exactly 3 vertices, found {}",
                            parts.len() - 1
                        )));
                    }

                    let mut vertices = [Vec3::zeros(); 3];
                    let mut normal_index = None;
                    for (slot, vertex_ref) in parts[1..].iter().enumerate() {
                        let (position_idx, normal_idx) = parse_face_ref(vertex_ref)?;
                        vertices[slot] = *positions.get(position_idx).ok_or_else(|| {
                            HitboxError::InvalidFormat(format!(
                                "position index {} out of bounds",
                                position_idx + 1
                            ))
                        })?;
                        if slot == 0 {
                            normal_index = normal_idx;
                        }
                    }

                    let triangle = Triangle::new(vertices[0], vertices[1], vertices[2]);
                    let polygon = match normal_index {
                        Some(idx) => {
                            let normal = normals.get(idx).ok_or_else(|| {
                                HitboxError::InvalidFormat(format!(
                                    "normal index {} out of bounds",
                                    idx + 1
                                ))
                            })?;
                            Polygon::with_normal(triangle, normal.normalize())
                        }
                        None => Polygon::new(triangle),
                    };
                    polygons.push(polygon);
                }
                _ => {
                    // Ignore other commands
                }
            }
        }

        if polygons.is_empty() {
            return Err(HitboxError::InvalidFormat(
                "no faces found in hitbox description".to_string(),
            ));
        }

        Ok(polygons)
    }
}

fn parse_vec3(parts: &[&str], what: &str) -> Result<Vec3, HitboxError> {
    if parts.len() < 4 {
        return Err(HitboxError::InvalidFormat(format!(
            "{what} line needs 3 components"
        )));
    }
    let x: f32 = parts[1]
        .parse()
        .map_err(|_| HitboxError::ParseError(format!("Invalid {what} x")))?;
    let y: f32 = parts[2]
        .parse()
        .map_err(|_| HitboxError::ParseError(format!("Invalid {what} y")))?;
    let z: f32 = parts[3]
        .parse()
        .map_err(|_| HitboxError::ParseError(format!("Invalid {what} z")))?;
    Ok(Vec3::new(x, y, z))
}

/// Parse one `i/_/n` face reference into 0-based position and optional
/// normal indices
fn parse_face_ref(vertex_ref: &str) -> Result<(usize, Option<usize>), HitboxError> {
    let indices: Vec<&str> = vertex_ref.split('/').collect();

    let position: usize = indices[0]
        .parse()
        .map_err(|_| HitboxError::ParseError("Invalid position index".to_string()))?;
    if position == 0 {
        return Err(HitboxError::InvalidFormat(
            "face indices are 1-based".to_string(),
        ));
    }

    // Slot two (after the ignored texture slot) may carry a normal index
    let normal = if indices.len() > 2 && !indices[2].is_empty() {
        let index: usize = indices[2]
            .parse()
            .map_err(|_| HitboxError::ParseError("Invalid normal index".to_string()))?;
        if index == 0 {
            return Err(HitboxError::InvalidFormat(
                "face indices are 1-based".to_string(),
            ));
        }
        Some(index - 1)
    } else {
        None
    };

    Ok((position - 1, normal))
}
