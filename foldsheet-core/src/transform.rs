/// Local <-> screen mapping and hinge lines
use nalgebra::{Point2, Similarity2, Vector2};

use crate::math::{normalize2, perp2, rotate2};
use crate::paper::Paper;

/// A line through `point` along `dir`.
///
/// Lines handed to the engine from outside may carry any non-zero `dir`;
/// lines produced by [`Transform::line_to_local`] always have a unit `dir`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HingeLine {
    pub point: Point2<f64>,
    pub dir: Vector2<f64>,
}

impl HingeLine {
    pub fn new(point: Point2<f64>, dir: Vector2<f64>) -> Self {
        Self { point, dir }
    }

    /// Same line with a unit direction, or `None` if the direction is degenerate.
    pub fn normalized(&self) -> Option<Self> {
        if !(self.point.x.is_finite() && self.point.y.is_finite()) {
            return None;
        }
        normalize2(self.dir).map(|dir| Self { point: self.point, dir })
    }

    /// Unit normal, `dir` rotated a quarter turn.
    pub fn normal(&self) -> Vector2<f64> {
        perp2(self.dir)
    }

    /// Distance from the line, positive on the side `normal()` points to.
    /// Assumes a unit `dir`.
    pub fn signed_distance(&self, p: Point2<f64>) -> f64 {
        self.normal().dot(&(p - self.point))
    }

    /// Reflection of `p` across the line. Assumes a unit `dir`.
    pub fn mirror(&self, p: Point2<f64>) -> Point2<f64> {
        p - self.normal() * (2.0 * self.signed_distance(p))
    }
}

/// Transform helpers for a paper's placement
pub struct Transform;

impl Transform {
    /// A zero or non-finite scale cannot be mapped back to local space.
    pub fn is_invertible(paper: &Paper) -> bool {
        paper.scale.is_finite() && paper.scale.abs() > f64::EPSILON
    }

    /// `pos + rotate(p * scale, rot)` as a similarity, `None` when the
    /// placement is not invertible.
    pub fn similarity(paper: &Paper) -> Option<Similarity2<f64>> {
        Self::is_invertible(paper).then(|| Similarity2::new(paper.pos.coords, paper.rot, paper.scale))
    }

    /// Defined for every scale; a zero scale collapses the sheet onto `pos`.
    pub fn local_to_screen(paper: &Paper, p: Point2<f64>) -> Point2<f64> {
        paper.pos + rotate2(p.coords * paper.scale, paper.rot)
    }

    pub fn screen_to_local(paper: &Paper, p: Point2<f64>) -> Option<Point2<f64>> {
        Self::similarity(paper).map(|s| s.inverse_transform_point(&p))
    }

    pub fn screen_to_local_vector(paper: &Paper, v: Vector2<f64>) -> Option<Vector2<f64>> {
        Self::similarity(paper).map(|s| s.inverse_transform_vector(&v))
    }

    /// Bring a screen-space line into the paper's local frame with a unit
    /// direction. `None` for a degenerate direction or a non-invertible
    /// placement.
    pub fn line_to_local(paper: &Paper, line: &HingeLine) -> Option<HingeLine> {
        let point = Self::screen_to_local(paper, line.point)?;
        let dir = Self::screen_to_local_vector(paper, line.dir)?;
        HingeLine::new(point, dir).normalized()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::IdFactory;
    use crate::paper::PaperStyle;
    use std::f64::consts::FRAC_PI_2;

    fn placed(rot: f64, scale: f64) -> Paper {
        let mut ids = IdFactory::new();
        let mut paper = Paper::new(&mut ids, PaperStyle::white(), Point2::new(100.0, 50.0), 20.0, 10.0);
        paper.rot = rot;
        paper.scale = scale;
        paper
    }

    #[test]
    fn test_local_to_screen_applies_scale_rotation_translation() {
        let paper = placed(FRAC_PI_2, 2.0);
        let s = Transform::local_to_screen(&paper, Point2::new(3.0, 0.0));
        assert!((s - Point2::new(100.0, 56.0)).norm() < 1e-9);
    }

    #[test]
    fn test_screen_to_local_is_inverse() {
        let paper = placed(0.7, 1.5);
        let p = Point2::new(-12.5, 33.0);
        let back = Transform::screen_to_local(&paper, Transform::local_to_screen(&paper, p)).unwrap();
        assert!((back - p).norm() < 1e-9);
    }

    #[test]
    fn test_line_to_local_normalizes_direction() {
        let paper = placed(FRAC_PI_2, 2.0);
        let line = HingeLine::new(Point2::new(100.0, 50.0), Vector2::new(0.0, 10.0));
        let local = Transform::line_to_local(&paper, &line).unwrap();
        assert!((local.point - Point2::origin()).norm() < 1e-9);
        assert!((local.dir - Vector2::new(1.0, 0.0)).norm() < 1e-9);
    }

    #[test]
    fn test_degenerate_lines_are_rejected() {
        let paper = placed(0.0, 1.0);
        let zero = HingeLine::new(Point2::new(1.0, 1.0), Vector2::zeros());
        assert!(Transform::line_to_local(&paper, &zero).is_none());

        let collapsed = placed(0.0, 0.0);
        let line = HingeLine::new(Point2::new(1.0, 1.0), Vector2::new(1.0, 0.0));
        assert!(Transform::line_to_local(&collapsed, &line).is_none());
    }

    #[test]
    fn test_zero_scale_collapses_onto_position() {
        let paper = placed(0.4, 0.0);
        assert!(!Transform::is_invertible(&paper));
        assert!(Transform::similarity(&paper).is_none());
        assert_eq!(Transform::local_to_screen(&paper, Point2::new(1.0, 1.0)), Point2::new(100.0, 50.0));
        assert!(Transform::screen_to_local(&paper, Point2::new(100.0, 50.0)).is_none());
        assert!(Transform::screen_to_local_vector(&paper, Vector2::new(1.0, 0.0)).is_none());
    }

    #[test]
    fn test_mirror_and_signed_distance() {
        let line = HingeLine::new(Point2::new(0.0, 0.0), Vector2::new(0.0, 1.0));
        assert!((line.signed_distance(Point2::new(-3.0, 8.0)) - 3.0).abs() < 1e-12);
        assert_eq!(line.mirror(Point2::new(-3.0, 8.0)), Point2::new(3.0, 8.0));
    }
}
