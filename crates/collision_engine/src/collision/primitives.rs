//! Primitive collision shapes and geometric predicates
//!
//! Value types (spheres, planes, triangles) plus the pure swept-sphere
//! predicates the narrow phase is built from. Everything here is
//! stateless; the cascade in [`crate::collision::narrow`] decides which
//! predicate's answer wins.

use crate::foundation::math::Vec3;

/// Tolerance for near-zero denominators and near-zero velocities
pub const EPSILON: f32 = 0.000001;

/// A sphere used as the moving collider
#[derive(Debug, Clone, Copy)]
pub struct Sphere {
    /// The center position of the sphere in world space
    pub center: Vec3,
    /// The radius of the sphere
    pub radius: f32,
}

impl Sphere {
    /// Creates a new sphere with the given center and radius
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }
}

/// Plane in constant-normal form: points `x` satisfy `dot(normal, x) = d`
#[derive(Debug, Clone, Copy)]
pub struct Plane {
    /// Unit normal of the plane
    pub normal: Vec3,
    /// Distance term of the plane equation
    pub d: f32,
}

impl Plane {
    /// Create a plane from a unit normal and a point on the plane
    pub fn from_point_normal(point: Vec3, normal: Vec3) -> Self {
        Self {
            normal,
            d: normal.dot(&point),
        }
    }

    /// Signed distance from a point to the plane (positive on the normal side)
    pub fn signed_distance(&self, point: Vec3) -> f32 {
        self.normal.dot(&point) - self.d
    }
}

/// A triangle for collision detection
#[derive(Debug, Clone, Copy)]
pub struct Triangle {
    /// First vertex
    pub v0: Vec3,
    /// Second vertex
    pub v1: Vec3,
    /// Third vertex
    pub v2: Vec3,
}

impl Triangle {
    /// Creates a new triangle
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3) -> Self {
        Self { v0, v1, v2 }
    }

    /// Calculates the normal of the triangle (right-hand rule)
    pub fn normal(&self) -> Vec3 {
        let edge1 = self.v1 - self.v0;
        let edge2 = self.v2 - self.v0;
        edge1.cross(&edge2).normalize()
    }

    /// Calculates the centroid (center point) of the triangle
    pub fn centroid(&self) -> Vec3 {
        (self.v0 + self.v1 + self.v2) / 3.0
    }

    /// The three vertices in winding order
    pub fn vertices(&self) -> [Vec3; 3] {
        [self.v0, self.v1, self.v2]
    }

    /// The three edges as (start, end) vertex pairs
    pub fn edges(&self) -> [(Vec3, Vec3); 3] {
        [(self.v0, self.v1), (self.v1, self.v2), (self.v2, self.v0)]
    }

    /// Derive the supporting plane from the triangle's winding
    pub fn plane(&self) -> Plane {
        Plane::from_point_normal(self.v0, self.normal())
    }

    /// Test whether a point already on the triangle's plane lies inside it
    ///
    /// Half-plane test: the point is inside when it sits on the interior
    /// side of all three edges.
    pub fn contains_point(&self, point: Vec3, normal: Vec3) -> bool {
        for (start, end) in self.edges() {
            let edge = end - start;
            let to_point = point - start;
            if edge.cross(&to_point).dot(&normal) < 0.0 {
                return false;
            }
        }
        true
    }

    /// Get the closest point on the triangle to a given point
    pub fn closest_point(&self, point: Vec3) -> Vec3 {
        let edge1 = self.v1 - self.v0;
        let edge2 = self.v2 - self.v0;
        let v0_to_point = point - self.v0;

        let d1 = edge1.dot(&v0_to_point);
        let d2 = edge2.dot(&v0_to_point);

        // Vertex region outside v0
        if d1 <= 0.0 && d2 <= 0.0 {
            return self.v0;
        }

        // Vertex region outside v1
        let v1_to_point = point - self.v1;
        let d3 = edge1.dot(&v1_to_point);
        let d4 = edge2.dot(&v1_to_point);
        if d3 >= 0.0 && d4 <= d3 {
            return self.v1;
        }

        // Vertex region outside v2
        let v2_to_point = point - self.v2;
        let d5 = edge1.dot(&v2_to_point);
        let d6 = edge2.dot(&v2_to_point);
        if d6 >= 0.0 && d5 <= d6 {
            return self.v2;
        }

        // Edge regions
        let vc = d1 * d4 - d3 * d2;
        if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
            let v_val = d1 / (d1 - d3);
            return self.v0 + edge1 * v_val;
        }

        let vb = d5 * d2 - d1 * d6;
        if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
            let w = d2 / (d2 - d6);
            return self.v0 + edge2 * w;
        }

        let va = d3 * d6 - d5 * d4;
        if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
            let w = (d4 - d3) / ((d4 - d3) + (d5 - d6));
            return self.v1 + (self.v2 - self.v1) * w;
        }

        // Point projects inside the face
        let denom = 1.0 / (va + vb + vc);
        let v_val = vb * denom;
        let w = vc * denom;
        self.v0 + edge1 * v_val + edge2 * w
    }
}

/// Smallest root of `a*x^2 + b*x + c = 0` in `(0, max_root]`
///
/// Handles a negative leading coefficient, which the edge-cylinder
/// quadratic produces routinely.
pub fn lowest_root(a: f32, b: f32, c: f32, max_root: f32) -> Option<f32> {
    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return None;
    }

    let sqrt_d = discriminant.sqrt();
    let mut r1 = (-b - sqrt_d) / (2.0 * a);
    let mut r2 = (-b + sqrt_d) / (2.0 * a);
    if r1 > r2 {
        std::mem::swap(&mut r1, &mut r2);
    }

    if r1 > 0.0 && r1 <= max_root {
        return Some(r1);
    }
    if r2 > 0.0 && r2 <= max_root {
        return Some(r2);
    }
    None
}

/// Moving-sphere-versus-plane intersection
///
/// Returns the first time `t` in `[0, 1]` at which the sphere surface
/// reaches the plane along `velocity`, together with the surface point
/// that touches. A sphere already within `radius` of the plane reports
/// `t = 0` with the center's projection as the touch point. A sphere
/// moving parallel to the plane (near-zero denominator) and not already
/// touching reports no intersection.
pub fn sweep_sphere_plane(sphere: &Sphere, velocity: Vec3, plane: &Plane) -> Option<(f32, Vec3)> {
    let signed_dist = plane.signed_distance(sphere.center);

    // Already overlapping the slab around the plane
    if signed_dist.abs() <= sphere.radius {
        return Some((0.0, sphere.center - plane.normal * signed_dist));
    }

    let denom = plane.normal.dot(&velocity);
    if denom.abs() < EPSILON {
        return None; // Moving parallel to the plane
    }

    let side = if signed_dist > 0.0 { 1.0 } else { -1.0 };
    let t = (side * sphere.radius - signed_dist) / denom;
    if !(0.0..=1.0).contains(&t) {
        return None;
    }

    let touch_point = sphere.center - plane.normal * (side * sphere.radius) + velocity * t;
    Some((t, touch_point))
}

/// Swept-sphere-versus-edge test, treating the edge as a cylinder of the
/// sphere's radius
///
/// Returns the earliest time in `(0, max_t]` and the contact point on the
/// edge segment, or `None` when the path misses the cylinder or touches
/// it outside the segment's extent.
pub fn sweep_sphere_edge(
    sphere: &Sphere,
    velocity: Vec3,
    start: Vec3,
    end: Vec3,
    max_t: f32,
) -> Option<(f32, Vec3)> {
    let edge = end - start;
    let base_to_vertex = start - sphere.center;

    let edge_len_sq = edge.magnitude_squared();
    let edge_dot_velocity = edge.dot(&velocity);
    let edge_dot_btv = edge.dot(&base_to_vertex);
    let velocity_len_sq = velocity.magnitude_squared();

    // Quadratic in t for |closest approach to the edge line| = radius
    let a = edge_len_sq * -velocity_len_sq + edge_dot_velocity * edge_dot_velocity;
    let b = edge_len_sq * (2.0 * velocity.dot(&base_to_vertex))
        - 2.0 * edge_dot_velocity * edge_dot_btv;
    let c = edge_len_sq * (sphere.radius * sphere.radius - base_to_vertex.magnitude_squared())
        + edge_dot_btv * edge_dot_btv;

    let t = lowest_root(a, b, c, max_t)?;

    // Check the touch point lies within the segment, not the infinite line
    let f = (edge_dot_velocity * t - edge_dot_btv) / edge_len_sq;
    if !(0.0..=1.0).contains(&f) {
        return None;
    }

    Some((t, start + edge * f))
}

/// Swept-sphere-versus-vertex test (point treated as a sphere of the
/// same radius, equivalently ray-versus-sphere along the path)
///
/// Returns the earliest time in `(0, max_t]`; the contact point is the
/// vertex itself.
pub fn sweep_sphere_vertex(
    sphere: &Sphere,
    velocity: Vec3,
    vertex: Vec3,
    max_t: f32,
) -> Option<f32> {
    let a = velocity.magnitude_squared();
    let b = 2.0 * velocity.dot(&(sphere.center - vertex));
    let c = (vertex - sphere.center).magnitude_squared() - sphere.radius * sphere.radius;
    lowest_root(a, b, c, max_t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn floor_triangle() -> Triangle {
        // y = 0 plane, +y normal, spanning x,z in [-5, 5]
        Triangle::new(
            Vec3::new(-5.0, 0.0, -5.0),
            Vec3::new(0.0, 0.0, 5.0),
            Vec3::new(5.0, 0.0, -5.0),
        )
    }

    #[test]
    fn triangle_normal_follows_winding() {
        assert_relative_eq!(floor_triangle().normal(), Vec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn contains_point_half_plane_test() {
        let triangle = floor_triangle();
        let normal = triangle.normal();
        assert!(triangle.contains_point(Vec3::zeros(), normal));
        assert!(!triangle.contains_point(Vec3::new(0.0, 0.0, -10.0), normal));
        assert!(!triangle.contains_point(Vec3::new(6.0, 0.0, 0.0), normal));
    }

    #[test]
    fn closest_point_regions() {
        let triangle = Triangle::new(
            Vec3::zeros(),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(0.0, 2.0, 0.0),
        );
        // Face region: projects straight down
        assert_relative_eq!(
            triangle.closest_point(Vec3::new(0.5, 0.5, 3.0)),
            Vec3::new(0.5, 0.5, 0.0)
        );
        // Vertex region
        assert_relative_eq!(
            triangle.closest_point(Vec3::new(-1.0, -1.0, 0.0)),
            Vec3::zeros()
        );
        // Edge region along v0-v1
        assert_relative_eq!(
            triangle.closest_point(Vec3::new(1.0, -2.0, 0.0)),
            Vec3::new(1.0, 0.0, 0.0)
        );
    }

    #[test]
    fn lowest_root_picks_earliest_valid() {
        // (x - 1)(x - 3) = x^2 - 4x + 3
        assert_relative_eq!(lowest_root(1.0, -4.0, 3.0, 10.0).unwrap(), 1.0);
        // First root above the cap, second within it
        assert!(lowest_root(1.0, -4.0, 3.0, 0.5).is_none());
        // Negative leading coefficient still yields the smaller positive root
        assert_relative_eq!(lowest_root(-1.0, 4.0, -3.0, 10.0).unwrap(), 1.0);
        // No real roots
        assert!(lowest_root(1.0, 0.0, 1.0, 10.0).is_none());
    }

    #[test]
    fn plane_sweep_head_on() {
        let plane = floor_triangle().plane();
        let sphere = Sphere::new(Vec3::new(0.0, 3.0, 0.0), 1.0);
        let (t, point) = sweep_sphere_plane(&sphere, Vec3::new(0.0, -4.0, 0.0), &plane).unwrap();
        assert_relative_eq!(t, 0.5);
        assert_relative_eq!(point, Vec3::zeros());
    }

    #[test]
    fn plane_sweep_embedded_reports_time_zero() {
        let plane = floor_triangle().plane();
        let sphere = Sphere::new(Vec3::new(1.0, 0.5, 1.0), 1.0);
        let (t, point) = sweep_sphere_plane(&sphere, Vec3::new(0.0, -1.0, 0.0), &plane).unwrap();
        assert_relative_eq!(t, 0.0);
        assert_relative_eq!(point, Vec3::new(1.0, 0.0, 1.0));
    }

    #[test]
    fn plane_sweep_parallel_motion_misses() {
        let plane = floor_triangle().plane();
        let sphere = Sphere::new(Vec3::new(0.0, 3.0, 0.0), 1.0);
        assert!(sweep_sphere_plane(&sphere, Vec3::new(2.0, 0.0, 0.0), &plane).is_none());
    }

    #[test]
    fn plane_sweep_receding_misses() {
        let plane = floor_triangle().plane();
        let sphere = Sphere::new(Vec3::new(0.0, 3.0, 0.0), 1.0);
        assert!(sweep_sphere_plane(&sphere, Vec3::new(0.0, 4.0, 0.0), &plane).is_none());
    }

    #[test]
    fn edge_sweep_hits_segment_midpoint() {
        let sphere = Sphere::new(Vec3::new(0.0, 2.0, 0.0), 0.5);
        let (t, point) = sweep_sphere_edge(
            &sphere,
            Vec3::new(0.0, -2.0, 0.0),
            Vec3::new(-1.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            1.0,
        )
        .unwrap();
        assert_relative_eq!(t, 0.75);
        assert_relative_eq!(point, Vec3::zeros());
    }

    #[test]
    fn edge_sweep_rejects_contact_beyond_segment() {
        // Path passes the infinite line outside the segment's extent
        let sphere = Sphere::new(Vec3::new(5.0, 2.0, 0.0), 0.5);
        assert!(sweep_sphere_edge(
            &sphere,
            Vec3::new(0.0, -2.0, 0.0),
            Vec3::new(-1.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            1.0,
        )
        .is_none());
    }

    #[test]
    fn vertex_sweep_time() {
        let sphere = Sphere::new(Vec3::new(0.0, 2.0, 0.0), 0.5);
        let t = sweep_sphere_vertex(&sphere, Vec3::new(0.0, -2.0, 0.0), Vec3::zeros(), 1.0)
            .unwrap();
        assert_relative_eq!(t, 0.75);
    }

    #[test]
    fn vertex_sweep_misses_offset_vertex() {
        let sphere = Sphere::new(Vec3::new(0.0, 2.0, 0.0), 0.5);
        assert!(sweep_sphere_vertex(
            &sphere,
            Vec3::new(0.0, -2.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
            1.0
        )
        .is_none());
    }
}
