/// Vector primitives and easing curves shared by the fold engine
use nalgebra::{Point3, Vector2, Vector3};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Rotate a 2D vector counter-clockwise by `angle` radians.
pub fn rotate2(v: Vector2<f64>, angle: f64) -> Vector2<f64> {
    let (s, c) = angle.sin_cos();
    Vector2::new(v.x * c - v.y * s, v.x * s + v.y * c)
}

/// Perpendicular of `v`, rotated a quarter turn: `(-y, x)`.
pub fn perp2(v: Vector2<f64>) -> Vector2<f64> {
    Vector2::new(-v.y, v.x)
}

/// Unit vector along `v`, or `None` for a zero-length or non-finite input.
pub fn normalize2(v: Vector2<f64>) -> Option<Vector2<f64>> {
    let len = v.norm();
    if !len.is_finite() || len <= f64::EPSILON {
        return None;
    }
    Some(v / len)
}

/// Unit vector along `v`. Zero-length input yields NaN components.
pub fn normalize3(v: Vector3<f64>) -> Vector3<f64> {
    v / v.norm()
}

pub fn scale3(v: Vector3<f64>, k: f64) -> Vector3<f64> {
    v * k
}

/// Rodrigues' rotation of `v` about the axis through the origin along `axis`.
///
/// `axis` does not need to be normalized, but must not be zero.
pub fn rotate_around_axis(v: Vector3<f64>, axis: Vector3<f64>, angle: f64) -> Vector3<f64> {
    let k = normalize3(axis);
    let (s, c) = angle.sin_cos();
    v * c + k.cross(&v) * s + k * (k.dot(&v) * (1.0 - c))
}

/// Rotate point `p` by `angle` about the line through `line_point` along `line_dir`.
pub fn rotate_point_around_line(
    p: Point3<f64>,
    line_point: Point3<f64>,
    line_dir: Vector3<f64>,
    angle: f64,
) -> Point3<f64> {
    line_point + rotate_around_axis(p - line_point, line_dir, angle)
}

/// Easing curve applied to fold progress before it becomes an angle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    Linear,
    #[default]
    EaseInOutCubic,
    EaseInOutSine,
}

impl Easing {
    /// Apply the curve to a progress value, clamped to `0..=1`.
    pub fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);

        match self {
            Easing::Linear => t,
            Easing::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let t = -2.0 * t + 2.0;
                    1.0 - t * t * t / 2.0
                }
            }
            Easing::EaseInOutSine => -((PI * t).cos() - 1.0) / 2.0,
        }
    }
}
