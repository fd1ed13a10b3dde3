//! Narrow-phase swept-sphere detection
//!
//! Runs the four-stage intersection cascade (plane, face, edge, vertex)
//! over candidate polygons and keeps the earliest contact across all of
//! them. The winning contact feeds the slide response; with no contact
//! the requested velocity passes through untouched.

use crate::collision::primitives::{
    sweep_sphere_edge, sweep_sphere_plane, sweep_sphere_vertex, Plane, Sphere, Triangle,
};
use crate::collision::response::respond;
use crate::foundation::math::Vec3;

/// Static world-space collision face: a triangle with its precomputed
/// unit normal
///
/// Loaded once from a hitbox description and immutable afterwards.
#[derive(Debug, Clone, Copy)]
pub struct Polygon {
    /// The face geometry in world space
    pub triangle: Triangle,
    /// Unit normal of the face
    pub normal: Vec3,
}

impl Polygon {
    /// Create a polygon, deriving the normal from the triangle's winding
    pub fn new(triangle: Triangle) -> Self {
        Self {
            normal: triangle.normal(),
            triangle,
        }
    }

    /// Create a polygon with an externally supplied normal
    pub fn with_normal(triangle: Triangle, normal: Vec3) -> Self {
        Self { triangle, normal }
    }
}

/// Outcome of one narrow-phase query
///
/// Produced fresh per call and never mutated in place.
#[derive(Debug, Clone, Copy)]
pub struct CollisionResult {
    /// The velocity to apply instead of the requested one
    pub corrected_velocity: Vec3,
    /// Earliest contact point, if any candidate was hit
    pub contact_point: Option<Vec3>,
    /// Fraction of the requested velocity at which contact occurs;
    /// `1.0` when the path is clear
    pub time_of_impact: f32,
}

impl CollisionResult {
    /// Result for an unobstructed movement request
    pub fn free(velocity: Vec3) -> Self {
        Self {
            corrected_velocity: velocity,
            contact_point: None,
            time_of_impact: 1.0,
        }
    }
}

/// Test a moving sphere against candidate polygons
///
/// The contact with the globally smallest time of impact in `[0, 1]`
/// wins; ties keep the first candidate encountered. An empty candidate
/// list or a clear path returns the input velocity unchanged.
pub fn detect(sphere: &Sphere, velocity: Vec3, colliders: &[Polygon]) -> CollisionResult {
    let mut best: Option<(f32, Vec3)> = None;

    for polygon in colliders {
        let best_t = best.map_or(1.0, |(t, _)| t);
        if let Some((t, point)) = test_polygon(sphere, velocity, polygon, best_t) {
            if best.map_or(true, |(current, _)| t < current) {
                best = Some((t, point));
            }
        }
    }

    match best {
        Some((t, contact)) => CollisionResult {
            corrected_velocity: respond(velocity, sphere, contact),
            contact_point: Some(contact),
            time_of_impact: t,
        },
        None => CollisionResult::free(velocity),
    }
}

/// Run the cascade against one polygon
///
/// Stage order: the plane test gates everything; a face hit is final for
/// this polygon; edges are consulted only when the face misses, vertices
/// only when every edge misses too. `max_t` prunes candidates that
/// cannot beat the running best.
fn test_polygon(
    sphere: &Sphere,
    velocity: Vec3,
    polygon: &Polygon,
    max_t: f32,
) -> Option<(f32, Vec3)> {
    let plane = Plane::from_point_normal(polygon.triangle.v0, polygon.normal);

    // Stage 1: when does the sphere reach the supporting plane at all?
    // Degenerate (zero-area) triangles produce a NaN normal here, fail
    // every comparison, and drop out without dividing by zero.
    let (plane_t, plane_point) = sweep_sphere_plane(sphere, velocity, &plane)?;

    // Stage 2: face hit if the touch point lies inside the triangle
    if polygon.triangle.contains_point(plane_point, polygon.normal) {
        if plane_t <= max_t {
            return Some((plane_t, plane_point));
        }
        return None;
    }

    // Stage 3: nearest edge cylinder
    let mut best: Option<(f32, Vec3)> = None;
    for (start, end) in polygon.triangle.edges() {
        let cap = best.map_or(max_t, |(t, _)| t);
        if let Some(hit) = sweep_sphere_edge(sphere, velocity, start, end, cap) {
            best = Some(hit);
        }
    }
    if best.is_some() {
        return best;
    }

    // Stage 4: corners, only when face and every edge miss
    for vertex in polygon.triangle.vertices() {
        let cap = best.map_or(max_t, |(t, _)| t);
        if let Some(t) = sweep_sphere_vertex(sphere, velocity, vertex, cap) {
            best = Some((t, vertex));
        }
    }
    best
}
