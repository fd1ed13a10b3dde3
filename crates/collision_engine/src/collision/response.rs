//! Sliding collision response
//!
//! Converts a blocked movement request into motion along the contact's
//! tangent plane, so the moving sphere glides along surfaces instead of
//! stopping dead against them.

use crate::collision::primitives::{Sphere, EPSILON};
use crate::foundation::math::Vec3;

/// Compute the slide velocity for a sphere blocked at `contact`
///
/// The sliding plane passes through the contact point with its normal
/// pointing from the contact to the sphere center. The requested
/// destination is projected onto that plane and the returned velocity
/// leads from the contact point to the projected destination. Requests
/// too small to normalize safely, slides that collapse below the
/// epsilon, and contacts coinciding with the center (an embedded sphere,
/// where no sliding plane exists) all return zero velocity.
pub fn respond(velocity: Vec3, sphere: &Sphere, contact: Vec3) -> Vec3 {
    if velocity.magnitude() < EPSILON {
        return Vec3::zeros();
    }

    let to_center = sphere.center - contact;
    if to_center.magnitude() < EPSILON {
        return Vec3::zeros();
    }
    let slide_normal = to_center.normalize();
    let destination = sphere.center + velocity;

    let distance = slide_normal.dot(&(destination - contact));
    let new_destination = destination - slide_normal * distance;

    let new_velocity = new_destination - contact;
    if new_velocity.magnitude() < EPSILON {
        Vec3::zeros()
    } else {
        new_velocity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn near_zero_velocity_is_a_no_op() {
        let sphere = Sphere::new(Vec3::new(0.0, 1.0, 0.0), 1.0);
        let out = respond(Vec3::new(0.0, 1e-8, 0.0), &sphere, Vec3::zeros());
        assert_relative_eq!(out, Vec3::zeros());
    }

    #[test]
    fn head_on_motion_collapses_to_zero() {
        let sphere = Sphere::new(Vec3::new(0.0, 1.0, 0.0), 1.0);
        let out = respond(Vec3::new(0.0, -1.0, 0.0), &sphere, Vec3::zeros());
        assert_relative_eq!(out, Vec3::zeros());
    }

    #[test]
    fn oblique_motion_slides_along_surface() {
        let sphere = Sphere::new(Vec3::new(0.0, 1.0, 0.0), 1.0);
        let out = respond(Vec3::new(1.0, -1.0, 0.0), &sphere, Vec3::zeros());
        assert_relative_eq!(out, Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn contact_at_center_blocks_movement() {
        // An embedded sphere reports its own center as the contact; there
        // is no sliding plane there, so the request is blocked outright
        // rather than producing a non-finite direction
        let sphere = Sphere::new(Vec3::zeros(), 1.0);
        let out = respond(Vec3::new(1.0, -1.0, 0.0), &sphere, sphere.center);
        assert!(out.iter().all(|c| c.is_finite()));
        assert_relative_eq!(out, Vec3::zeros());
    }

    #[test]
    fn slide_does_not_inject_energy() {
        // Applying the response twice to an already-tangent velocity must
        // not grow its magnitude
        let sphere = Sphere::new(Vec3::new(0.0, 1.0, 0.0), 1.0);
        let contact = Vec3::zeros();
        let tangent = Vec3::new(0.7, 0.0, -0.2);

        let once = respond(tangent, &sphere, contact);
        let twice = respond(once, &sphere, contact);
        assert!(once.magnitude() <= tangent.magnitude() + EPSILON);
        assert!(twice.magnitude() <= once.magnitude() + EPSILON);
    }
}
