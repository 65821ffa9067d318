/// A single sheet: placement, rest size, style and its face stack.
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::geometry::{Face, FaceStack};
use crate::ids::{IdFactory, PaperId};

/// An RGBA color, 8 bits per channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    #[serde(default = "opaque")]
    pub a: u8,
}

fn opaque() -> u8 {
    255
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Scale each color channel by `1 + percent`, clamped to the channel range.
    pub fn adjust_brightness(self, percent: f64) -> Self {
        let adjust = |v: u8| (v as f64 * (1.0 + percent)).clamp(0.0, 255.0).round() as u8;
        Self {
            r: adjust(self.r),
            g: adjust(self.g),
            b: adjust(self.b),
            a: self.a,
        }
    }

    /// Perceived brightness on a 0..=255 scale.
    pub fn brightness(self) -> f64 {
        (self.r as f64 * 299.0 + self.g as f64 * 587.0 + self.b as f64 * 114.0) / 1000.0
    }
}

/// Rendering colors of a sheet. Has no effect on geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperStyle {
    pub front: Color,
    pub back: Color,
    pub edge: Color,
}

impl PaperStyle {
    pub const fn white() -> Self {
        Self {
            front: Color::rgb(255, 255, 255),
            back: Color::rgb(240, 240, 240),
            edge: Color::rgba(0, 0, 0, 41),
        }
    }

    /// Derive a style from the front color: the back is 10% darker and the
    /// edge contrasts with the front.
    pub fn from_front(front: Color) -> Self {
        let edge = if front.brightness() > 128.0 {
            Color::rgba(0, 0, 0, 41)
        } else {
            Color::rgba(255, 255, 255, 51)
        };
        Self {
            front,
            back: front.adjust_brightness(-0.1),
            edge,
        }
    }
}

impl Default for PaperStyle {
    fn default() -> Self {
        Self::white()
    }
}

/// One sheet of paper.
///
/// `pos`, `rot` and `scale` place the local frame on screen. `base_w` and
/// `base_h` are the unfolded dimensions, used when the sheet is reset.
#[derive(Debug, Clone, PartialEq)]
pub struct Paper {
    pub id: PaperId,
    pub pos: Point2<f64>,
    pub rot: f64,
    pub scale: f64,
    pub base_w: f64,
    pub base_h: f64,
    pub style: PaperStyle,
    pub faces: FaceStack,
}

/// Deep copy of the mutable contents of a paper
#[derive(Debug, Clone, PartialEq)]
pub struct PaperSnapshot {
    pub pos: Point2<f64>,
    pub rot: f64,
    pub scale: f64,
    pub base_w: f64,
    pub base_h: f64,
    pub faces: FaceStack,
}

impl Paper {
    /// A flat `width × height` sheet centered on `center`.
    pub fn new(
        ids: &mut IdFactory,
        style: PaperStyle,
        center: Point2<f64>,
        width: f64,
        height: f64,
    ) -> Self {
        let id = ids.next_paper_id();
        let faces = std::iter::once(Face::rectangle(ids.next_face_id(), width, height)).collect();
        Self {
            id,
            pos: center,
            rot: 0.0,
            scale: 1.0,
            base_w: width,
            base_h: height,
            style,
            faces,
        }
    }

    /// Unfold back to a single `base_w × base_h` rectangle and clear rotation.
    pub fn reset(&mut self, ids: &mut IdFactory) {
        self.faces = std::iter::once(Face::rectangle(ids.next_face_id(), self.base_w, self.base_h))
            .collect();
        self.rot = 0.0;
    }

    pub fn snapshot(&self) -> PaperSnapshot {
        PaperSnapshot {
            pos: self.pos,
            rot: self.rot,
            scale: self.scale,
            base_w: self.base_w,
            base_h: self.base_h,
            faces: self.faces.clone(),
        }
    }

    /// Overwrite the contents with `snapshot`, keeping this paper's id.
    pub fn restore(&mut self, snapshot: &PaperSnapshot) {
        self.pos = snapshot.pos;
        self.rot = snapshot.rot;
        self.scale = snapshot.scale;
        self.base_w = snapshot.base_w;
        self.base_h = snapshot.base_h;
        self.faces = snapshot.faces.clone();
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.faces.iter().try_for_each(Face::validate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Side;

    fn sample() -> (IdFactory, Paper) {
        let mut ids = IdFactory::new();
        let paper = Paper::new(&mut ids, PaperStyle::white(), Point2::new(500.0, 500.0), 300.0, 400.0);
        (ids, paper)
    }

    #[test]
    fn test_new_paper_is_single_rectangle() {
        let (_, paper) = sample();
        assert_eq!(paper.faces.len(), 1);
        let face = &paper.faces.as_slice()[0];
        assert_eq!(face.up, Side::Front);
        assert_eq!(face.layer, 0);
        assert!(face.verts.contains(&Point2::new(-150.0, -200.0)));
        assert!(face.verts.contains(&Point2::new(150.0, 200.0)));
        assert_eq!(paper.rot, 0.0);
        assert_eq!(paper.scale, 1.0);
        assert!(paper.validate().is_ok());
    }

    #[test]
    fn test_reset_keeps_identity_and_position() {
        let (mut ids, mut paper) = sample();
        paper.rot = 1.2;
        paper.pos = Point2::new(10.0, 20.0);
        paper.base_w = 100.0;
        paper.base_h = 50.0;
        let id = paper.id;

        paper.reset(&mut ids);

        assert_eq!(paper.id, id);
        assert_eq!(paper.rot, 0.0);
        assert_eq!(paper.pos, Point2::new(10.0, 20.0));
        assert_eq!(paper.faces.len(), 1);
        assert!((paper.faces.total_area() - 5000.0).abs() < 1e-9);
    }

    #[test]
    fn test_restore_overwrites_contents_only() {
        let (mut ids, mut paper) = sample();
        let snapshot = paper.snapshot();
        let id = paper.id;

        paper.pos = Point2::new(0.0, 0.0);
        paper.scale = 3.0;
        paper.base_w = 1.0;
        paper.reset(&mut ids);
        paper.restore(&snapshot);

        assert_eq!(paper.id, id);
        assert_eq!(paper.snapshot(), snapshot);
    }

    #[test]
    fn test_style_from_front() {
        let dark = PaperStyle::from_front(Color::rgb(20, 40, 60));
        assert_eq!(dark.back, Color::rgb(18, 36, 54));
        assert_eq!(dark.edge, Color::rgba(255, 255, 255, 51));

        let light = PaperStyle::from_front(Color::rgb(250, 250, 200));
        assert_eq!(light.edge, Color::rgba(0, 0, 0, 41));
    }
}
