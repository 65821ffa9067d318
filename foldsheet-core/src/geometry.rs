/// Faces, the layered face stack and planar polygon helpers
use nalgebra::Point2;

use crate::error::ValidationError;
use crate::ids::FaceId;

/// Which original side of the sheet faces the viewer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Side {
    #[default]
    Front,
    Back,
}

impl Side {
    pub fn toggle(self) -> Self {
        match self {
            Side::Front => Side::Back,
            Side::Back => Side::Front,
        }
    }
}

/// A planar polygon fragment of the sheet in the paper's local frame
#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    pub id: FaceId,
    pub verts: Vec<Point2<f64>>,
    pub up: Side,
    pub layer: i32,
}

impl Face {
    pub fn new(id: FaceId, verts: Vec<Point2<f64>>, up: Side, layer: i32) -> Self {
        Self { id, verts, up, layer }
    }

    /// Axis-aligned rectangle centered on the local origin, front up, layer 0.
    pub fn rectangle(id: FaceId, width: f64, height: f64) -> Self {
        let hw = width / 2.0;
        let hh = height / 2.0;
        Self::new(
            id,
            vec![
                Point2::new(-hw, -hh),
                Point2::new(hw, -hh),
                Point2::new(hw, hh),
                Point2::new(-hw, hh),
            ],
            Side::Front,
            0,
        )
    }

    pub fn signed_area(&self) -> f64 {
        signed_area(&self.verts)
    }

    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    pub fn contains(&self, p: Point2<f64>) -> bool {
        point_in_polygon(p, &self.verts)
    }

    /// Check the at-rest invariants: at least three finite, non-repeating
    /// vertices enclosing a non-zero area.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.verts.len() < 3 {
            return Err(ValidationError::TooFewPoints {
                face: self.id,
                count: self.verts.len(),
            });
        }
        if let Some(point) = self.verts.iter().find(|p| !(p.x.is_finite() && p.y.is_finite())) {
            return Err(ValidationError::InvalidCoordinate {
                face: self.id,
                point: *point,
            });
        }
        let n = self.verts.len();
        for i in 0..n {
            if self.verts[i] == self.verts[(i + 1) % n] {
                return Err(ValidationError::RepeatedPoint {
                    face: self.id,
                    point: self.verts[i],
                });
            }
        }
        if self.area() <= f64::EPSILON {
            return Err(ValidationError::ZeroArea { face: self.id });
        }
        Ok(())
    }
}

/// Faces of one paper, kept sorted by layer ascending.
///
/// Faces sharing a layer keep their insertion order, so iteration is draw
/// order and reverse iteration is pick order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FaceStack {
    faces: Vec<Face>,
}

impl FaceStack {
    pub fn new() -> Self {
        Self { faces: Vec::new() }
    }

    pub fn push(&mut self, face: Face) {
        let at = self.faces.partition_point(|f| f.layer <= face.layer);
        self.faces.insert(at, face);
    }

    pub fn len(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Faces bottom to top.
    pub fn iter(&self) -> std::slice::Iter<'_, Face> {
        self.faces.iter()
    }

    pub fn as_slice(&self) -> &[Face] {
        &self.faces
    }

    pub fn get(&self, index: usize) -> Option<&Face> {
        self.faces.get(index)
    }

    pub fn max_layer(&self) -> Option<i32> {
        self.faces.last().map(|f| f.layer)
    }

    pub fn total_area(&self) -> f64 {
        self.faces.iter().map(Face::area).sum()
    }
}

impl FromIterator<Face> for FaceStack {
    fn from_iter<I: IntoIterator<Item = Face>>(iter: I) -> Self {
        let mut stack = FaceStack::new();
        for face in iter {
            stack.push(face);
        }
        stack
    }
}

impl<'a> IntoIterator for &'a FaceStack {
    type Item = &'a Face;
    type IntoIter = std::slice::Iter<'a, Face>;

    fn into_iter(self) -> Self::IntoIter {
        self.faces.iter()
    }
}

/// Shoelace area, positive for counter-clockwise winding in a y-up frame.
pub fn signed_area(verts: &[Point2<f64>]) -> f64 {
    let n = verts.len();
    if n < 3 {
        return 0.0;
    }
    let mut twice = 0.0;
    for i in 0..n {
        let a = verts[i];
        let b = verts[(i + 1) % n];
        twice += a.x * b.y - b.x * a.y;
    }
    twice / 2.0
}

/// Even-odd crossing test.
pub fn point_in_polygon(p: Point2<f64>, verts: &[Point2<f64>]) -> bool {
    let n = verts.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let a = verts[i];
        let b = verts[j];
        if (a.y > p.y) != (b.y > p.y) {
            let x_cross = (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x;
            if p.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

#[cfg(test)]
mod tests {
    use super::*;

    fn face(id: u64, layer: i32) -> Face {
        let mut f = Face::rectangle(FaceId(id), 2.0, 2.0);
        f.layer = layer;
        f
    }

    #[test]
    fn test_toggle_is_involution() {
        assert_eq!(Side::Front.toggle(), Side::Back);
        assert_eq!(Side::Front.toggle().toggle(), Side::Front);
    }

    #[test]
    fn test_rectangle_area_and_winding() {
        let f = Face::rectangle(FaceId(1), 300.0, 400.0);
        assert!((f.signed_area() - 120_000.0).abs() < 1e-9);
        assert!(f.validate().is_ok());
    }

    #[test]
    fn test_point_in_polygon() {
        let f = Face::rectangle(FaceId(1), 10.0, 10.0);
        assert!(f.contains(Point2::new(0.0, 0.0)));
        assert!(f.contains(Point2::new(4.9, -4.9)));
        assert!(!f.contains(Point2::new(5.1, 0.0)));
        assert!(!f.contains(Point2::new(0.0, -7.0)));
    }

    #[test]
    fn test_stack_orders_by_layer_then_insertion() {
        let stack: FaceStack = vec![face(1, 2), face(2, 0), face(3, 2), face(4, 1)]
            .into_iter()
            .collect();
        let ids: Vec<u64> = stack.iter().map(|f| f.id.0).collect();
        assert_eq!(ids, vec![2, 4, 1, 3]);
        assert_eq!(stack.max_layer(), Some(2));
    }

    #[test]
    fn test_validate_rejects_degenerate_faces() {
        let mut f = Face::rectangle(FaceId(7), 1.0, 1.0);
        f.verts.truncate(2);
        assert_eq!(
            f.validate(),
            Err(ValidationError::TooFewPoints { face: FaceId(7), count: 2 })
        );

        let collinear = Face::new(
            FaceId(8),
            vec![Point2::new(0.0, 0.0), Point2::new(1.0, 0.0), Point2::new(2.0, 0.0)],
            Side::Front,
            0,
        );
        assert_eq!(collinear.validate(), Err(ValidationError::ZeroArea { face: FaceId(8) }));

        let mut repeated = Face::rectangle(FaceId(9), 1.0, 1.0);
        repeated.verts.insert(1, repeated.verts[0]);
        assert!(matches!(repeated.validate(), Err(ValidationError::RepeatedPoint { .. })));
    }
}
