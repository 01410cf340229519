// Geometric value types shared by the decoder and the intersection engine.

use serde::Serialize;
use std::ops::{Add, Mul, Sub};

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3 {
    pub const ZERO: Vector3 = Vector3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Component on the given axis (0 = x, 1 = y, 2 = z).
    pub fn axis(self, axis: usize) -> f32 {
        match axis {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }

    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Euclidean distance between two points.
    pub fn distance(self, other: Self) -> f32 {
        (other - self).length()
    }
}

impl Add for Vector3 {
    type Output = Vector3;

    fn add(self, other: Vector3) -> Vector3 {
        Vector3::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

impl Sub for Vector3 {
    type Output = Vector3;

    fn sub(self, other: Vector3) -> Vector3 {
        Vector3::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

impl Mul<f32> for Vector3 {
    type Output = Vector3;

    fn mul(self, s: f32) -> Vector3 {
        Vector3::new(self.x * s, self.y * s, self.z * s)
    }
}

/// Axis-aligned bounding box.
///
/// A well-formed box has `min <= max` on every axis, but nothing here
/// assumes it: the decoder synthesizes an all-zero box for spawns that
/// carry no stored bounds, and the intersection engine treats such a
/// degenerate point box as a valid target.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct AABox {
    pub min: Vector3,
    pub max: Vector3,
}

impl AABox {
    pub fn new(min: Vector3, max: Vector3) -> Self {
        Self { min, max }
    }
}
