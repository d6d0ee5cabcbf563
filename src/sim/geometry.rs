//! Hit-test primitives for slice detection
//!
//! All functions are pure: a pointer segment or point against a circle or box.

use glam::DVec2;

use crate::rotate;

/// Check whether segment `a`→`b` passes within `radius` of `center`
///
/// A zero-length segment degenerates to a point-in-circle test.
pub fn segment_circle_intersect(a: DVec2, b: DVec2, center: DVec2, radius: f64) -> bool {
    let ab = b - a;
    let len_sq = ab.length_squared();

    if len_sq < f64::EPSILON {
        return point_in_circle(a, center, radius);
    }

    // Closest point on the segment to the circle center
    let t = ((center - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    let closest = a + ab * t;
    closest.distance_squared(center) <= radius * radius
}

#[inline]
pub fn point_in_circle(p: DVec2, center: DVec2, radius: f64) -> bool {
    p.distance_squared(center) <= radius * radius
}

/// Axis-aligned box given by center and half extents
#[inline]
pub fn point_in_aabb(p: DVec2, center: DVec2, half_extents: DVec2) -> bool {
    let d = (p - center).abs();
    d.x <= half_extents.x && d.y <= half_extents.y
}

/// Box rotated by `rotation` radians around its center
pub fn point_in_rotated_box(p: DVec2, center: DVec2, half_extents: DVec2, rotation: f64) -> bool {
    // Bring the point into the box's local frame
    let local = rotate(p - center, -rotation);
    local.x.abs() <= half_extents.x && local.y.abs() <= half_extents.y
}

/// Evenly spaced points from `a` to `b`, both endpoints included
pub fn sample_segment(a: DVec2, b: DVec2, samples: usize) -> impl Iterator<Item = DVec2> {
    let steps = samples.max(1);
    (0..=steps).map(move |i| a.lerp(b, i as f64 / steps as f64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_segment_through_circle() {
        let hit = segment_circle_intersect(
            DVec2::new(90.0, 90.0),
            DVec2::new(110.0, 110.0),
            DVec2::new(100.0, 100.0),
            5.0,
        );
        assert!(hit);
    }

    #[test]
    fn test_segment_misses_circle() {
        let hit = segment_circle_intersect(
            DVec2::new(0.0, 0.0),
            DVec2::new(100.0, 0.0),
            DVec2::new(50.0, 30.0),
            20.0,
        );
        assert!(!hit);
    }

    #[test]
    fn test_segment_endpoint_clamping() {
        // Circle lies on the line's extension, beyond b
        let hit = segment_circle_intersect(
            DVec2::new(0.0, 0.0),
            DVec2::new(10.0, 0.0),
            DVec2::new(40.0, 0.0),
            20.0,
        );
        assert!(!hit);
    }

    #[test]
    fn test_zero_length_segment_is_point_test() {
        let center = DVec2::new(10.0, 10.0);
        let p = DVec2::new(12.0, 10.0);
        assert!(segment_circle_intersect(p, p, center, 3.0));
        assert!(!segment_circle_intersect(p, p, center, 1.0));
    }

    #[test]
    fn test_rotated_box() {
        let center = DVec2::ZERO;
        let half = DVec2::new(30.0, 5.0);
        // Long axis horizontal: (25, 0) inside, (0, 25) outside
        assert!(point_in_rotated_box(DVec2::new(25.0, 0.0), center, half, 0.0));
        assert!(!point_in_rotated_box(DVec2::new(0.0, 25.0), center, half, 0.0));
        // Quarter turn swaps them
        assert!(!point_in_rotated_box(DVec2::new(25.0, 0.0), center, half, FRAC_PI_2));
        assert!(point_in_rotated_box(DVec2::new(0.0, 25.0), center, half, FRAC_PI_2));
    }

    #[test]
    fn test_aabb() {
        let half = DVec2::splat(10.0);
        assert!(point_in_aabb(DVec2::new(9.0, -9.0), DVec2::ZERO, half));
        assert!(!point_in_aabb(DVec2::new(11.0, 0.0), DVec2::ZERO, half));
    }

    #[test]
    fn test_sample_segment_endpoints() {
        let a = DVec2::new(0.0, 0.0);
        let b = DVec2::new(12.0, 0.0);
        let points: Vec<_> = sample_segment(a, b, 12).collect();
        assert_eq!(points.len(), 13);
        assert_eq!(points[0], a);
        assert!((points[12] - b).length() < 1e-12);
        assert!((points[1].x - 1.0).abs() < 1e-12);
    }
}
