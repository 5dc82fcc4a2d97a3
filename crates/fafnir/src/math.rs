//! Math types and glam re-exports.
//!
//! We re-export [glam](https://docs.rs/glam) types so users don't need to
//! depend on it directly. This module adds the two pieces glam doesn't
//! ship: an axis-aligned bounding box ([`Aabb`]) and Catmull-Rom spline
//! evaluation ([`catmull_rom`]).

use serde::{Deserialize, Serialize};

pub use glam::{Mat4, Quat, Vec2, Vec3, Vec4};

/// An axis-aligned bounding box.
///
/// The default value is *inverted* (`min` = +inf, `max` = -inf) so that
/// merging boxes into a fresh accumulator works without a special case:
/// merging anything into the default yields that thing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Build a box from a center point and half-extents.
    pub fn from_half_width(center: Vec3, half: Vec3) -> Self {
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// The smallest box containing both inputs.
    pub fn merge(a: Aabb, b: Aabb) -> Aabb {
        Aabb {
            min: a.min.min(b.min),
            max: a.max.max(b.max),
        }
    }

    /// Transform all eight corners and re-fit an axis-aligned box around
    /// them. This is conservative: the result can be larger than the tight
    /// bounds of the transformed geometry, never smaller.
    pub fn transformed(&self, matrix: Mat4) -> Aabb {
        let corners = [
            Vec3::new(self.min.x, self.min.y, self.min.z),
            Vec3::new(self.max.x, self.min.y, self.min.z),
            Vec3::new(self.min.x, self.max.y, self.min.z),
            Vec3::new(self.max.x, self.max.y, self.min.z),
            Vec3::new(self.min.x, self.min.y, self.max.z),
            Vec3::new(self.max.x, self.min.y, self.max.z),
            Vec3::new(self.min.x, self.max.y, self.max.z),
            Vec3::new(self.max.x, self.max.y, self.max.z),
        ];
        let mut out = Aabb::default();
        for corner in corners {
            let p = matrix.transform_point3(corner);
            out.min = out.min.min(p);
            out.max = out.max.max(p);
        }
        out
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn half_extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// False for the inverted default and for boxes that were never fed a
    /// point.
    pub fn is_valid(&self) -> bool {
        self.min.x <= self.max.x && self.min.y <= self.max.y && self.min.z <= self.max.z
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self {
            min: Vec3::splat(f32::MAX),
            max: Vec3::splat(f32::MIN),
        }
    }
}

/// Evaluate a Catmull-Rom spline through four control points at `t` in
/// \[0, 1\]. The curve passes through `b` at t=0 and `c` at t=1; `a` and
/// `d` shape the tangents.
///
/// Works for any vector type with scalar multiply and add (`Vec3`, `Vec4`).
pub fn catmull_rom<T>(a: T, b: T, c: T, d: T, t: f32) -> T
where
    T: Copy + std::ops::Add<Output = T> + std::ops::Mul<f32, Output = T>,
{
    let t2 = t * t;
    let t3 = t2 * t;
    a * (0.5 * (-t3 + 2.0 * t2 - t))
        + b * (0.5 * (3.0 * t3 - 5.0 * t2 + 2.0))
        + c * (0.5 * (-3.0 * t3 + 4.0 * t2 + t))
        + d * (0.5 * (t3 - t2))
}
