// Ray-AABB intersection (slab method).
//
// This is the geometric core behind line-of-sight checks: the driver
// decodes a tile, walks its spawns and intersects one bounded ray against
// each spawn's box. There are deliberately no error paths here; every
// input, however degenerate, yields a well-defined hit or miss.

use crate::math::{AABox, Vector3};

/// Absolute tolerance used to match the hit point against a box face.
const FACE_EPSILON: f32 = 1e-4;

/// A bounded ray segment, not an infinite line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vector3,
    /// Treated as possibly unnormalized; [`Ray::between`] always produces
    /// a unit direction.
    pub direction: Vector3,
    pub max_distance: f32,
}

/// Where a ray first entered a box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    /// Parametric distance along the ray at first intersection.
    pub distance: f32,
    /// World-space intersection location.
    pub point: Vector3,
    /// Outward unit normal of the face struck.
    pub normal: Vector3,
}

impl Ray {
    pub fn new(origin: Vector3, direction: Vector3, max_distance: f32) -> Self {
        Self {
            origin,
            direction,
            max_distance,
        }
    }

    /// Build the ray covering the segment from `start` to `end`.
    ///
    /// A zero-length segment yields an arbitrary fixed unit direction with
    /// `max_distance = 0`: such a ray can never hit anything at positive
    /// distance, which is the correct degenerate behavior for a query with
    /// identical endpoints.
    pub fn between(start: Vector3, end: Vector3) -> Self {
        let diff = end - start;
        let len = diff.length();
        if len == 0.0 {
            return Self::new(start, Vector3::new(0.0, 0.0, 1.0), 0.0);
        }
        Self::new(start, diff * (1.0 / len), len)
    }

    /// Slab test against `bound` over the parametric interval
    /// `[0, max_distance]`.
    pub fn intersect(&self, bound: &AABox) -> Option<RayHit> {
        let mut tmin = 0.0f32;
        let mut tmax = self.max_distance;

        for axis in 0..3 {
            let dir = self.direction.axis(axis);
            let origin = self.origin.axis(axis);
            let lo = bound.min.axis(axis);
            let hi = bound.max.axis(axis);

            if dir == 0.0 {
                // Parallel to this slab pair: the origin coordinate must
                // already lie between the two planes, and the axis imposes
                // no constraint on [tmin, tmax].
                if origin < lo || origin > hi {
                    return None;
                }
                continue;
            }

            let inv = 1.0 / dir;
            let mut t1 = (lo - origin) * inv;
            let mut t2 = (hi - origin) * inv;
            if t1 > t2 {
                std::mem::swap(&mut t1, &mut t2);
            }
            tmin = tmin.max(t1);
            tmax = tmax.min(t2);
            if tmin > tmax {
                return None;
            }
        }

        let point = self.origin + self.direction * tmin;
        Some(RayHit {
            distance: tmin,
            point,
            normal: face_normal(bound, point),
        })
    }
}

/// Pick the outward normal of the face the hit point lies on.
///
/// Candidates are checked in a fixed priority order (-x, +x, -y, +y, -z,
/// else +z), so edges and corners where several faces are equidistant
/// within tolerance resolve to a deterministic, reproducible pick rather
/// than an exact geometric one.
fn face_normal(bound: &AABox, point: Vector3) -> Vector3 {
    let candidates = [
        (bound.min.x, point.x, Vector3::new(-1.0, 0.0, 0.0)),
        (bound.max.x, point.x, Vector3::new(1.0, 0.0, 0.0)),
        (bound.min.y, point.y, Vector3::new(0.0, -1.0, 0.0)),
        (bound.max.y, point.y, Vector3::new(0.0, 1.0, 0.0)),
        (bound.min.z, point.z, Vector3::new(0.0, 0.0, -1.0)),
    ];
    for (plane, coord, normal) in candidates {
        if (coord - plane).abs() < FACE_EPSILON {
            return normal;
        }
    }
    Vector3::new(0.0, 0.0, 1.0)
}
