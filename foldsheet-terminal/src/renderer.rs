/// ASCII rasterizer for papers on a terminal grid
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use foldsheet_core::{geometry::point_in_polygon, Desk, FoldAnim, HingeLine, Paper, Side, Transform};
use nalgebra::{Point2, Point3};
use std::io::Write;

/// Screen units covered by one terminal row. Cells are about twice as tall
/// as they are wide, so a column is one unit and a row is two.
pub const CELL_ASPECT: f64 = 2.0;

/// Strength of the lift perspective applied to the moving half.
const PERSPECTIVE: f64 = 0.0022;

const FRONT_GLYPH: char = '#';
const BACK_GLYPH: char = '%';
const HINGE_GLYPH: char = ':';
const EMPTY: char = ' ';

/// Character-grid renderer. Later draws overwrite earlier ones, so callers
/// paint bottom to top.
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    char_buffer: Vec<char>,
    color_buffer: Vec<Color>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            char_buffer: vec![EMPTY; size],
            color_buffer: vec![Color::Reset; size],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        if (width, height) != (self.width, self.height) {
            *self = Self::new(width, height);
        }
    }

    pub fn clear(&mut self) {
        self.char_buffer.fill(EMPTY);
        self.color_buffer.fill(Color::Reset);
    }

    pub fn glyph_at(&self, x: usize, y: usize) -> Option<char> {
        (x < self.width && y < self.height).then(|| self.char_buffer[y * self.width + x])
    }

    /// Paint every paper bottom to top; the paper being folded is drawn
    /// from `anim` instead of its resting faces.
    pub fn render_desk(&mut self, desk: &Desk, anim: Option<&FoldAnim>) {
        for paper in desk.papers() {
            match anim.filter(|a| a.paper_id() == paper.id) {
                Some(anim) => self.render_folding(paper, anim),
                None => self.render_paper(paper),
            }
        }
    }

    /// Flat faces in layer order.
    pub fn render_paper(&mut self, paper: &Paper) {
        for face in &paper.faces {
            let screen: Vec<Point2<f64>> = face
                .verts
                .iter()
                .map(|p| Transform::local_to_screen(paper, *p))
                .collect();
            let (glyph, color) = side_look(paper, face.up);
            self.fill_polygon(&screen, glyph, color);
        }
    }

    /// Kept faces flat, then the lifted half far to near.
    pub fn render_folding(&mut self, paper: &Paper, anim: &FoldAnim) {
        for face in anim.keep_faces() {
            let screen: Vec<Point2<f64>> = face
                .verts
                .iter()
                .map(|p| Transform::local_to_screen(paper, *p))
                .collect();
            let (glyph, color) = side_look(paper, face.up);
            self.fill_polygon(&screen, glyph, color);
        }

        let mut moving: Vec<_> = anim.moving_faces().iter().collect();
        moving.sort_by(|a, b| a.average_z().total_cmp(&b.average_z()));
        for face in moving {
            let screen: Vec<Point2<f64>> = face
                .lifted()
                .iter()
                .map(|p| Transform::local_to_screen(paper, project_lifted(*p)))
                .collect();
            let (glyph, color) = side_look(paper, anim.visible_side(&face.face));
            self.fill_polygon(&screen, glyph, color);
        }
    }

    /// Overlay `line` (screen coordinates) across the whole grid.
    pub fn render_hinge(&mut self, line: &HingeLine) {
        let Some(line) = line.normalized() else {
            return;
        };
        let reach = (self.width as f64).hypot(self.height as f64 * CELL_ASPECT);
        let steps = (reach * 4.0).ceil() as i64;
        for i in -steps..=steps {
            let t = i as f64 * 0.5;
            let p = line.point + line.dir * t;
            if let Some(idx) = self.cell_index(p) {
                self.char_buffer[idx] = HINGE_GLYPH;
                self.color_buffer[idx] = Color::Yellow;
            }
        }
    }

    /// Fill every cell whose center lies inside `verts` (screen coordinates,
    /// even-odd rule).
    pub fn fill_polygon(&mut self, verts: &[Point2<f64>], glyph: char, color: Color) {
        if verts.len() < 3 || self.width == 0 || self.height == 0 {
            return;
        }

        // Bounding box in cells
        let (mut min_x, mut max_x) = (f64::INFINITY, f64::NEG_INFINITY);
        let (mut min_y, mut max_y) = (f64::INFINITY, f64::NEG_INFINITY);
        for p in verts {
            min_x = min_x.min(p.x);
            max_x = max_x.max(p.x);
            min_y = min_y.min(p.y / CELL_ASPECT);
            max_y = max_y.max(p.y / CELL_ASPECT);
        }
        if !(min_x.is_finite() && max_x.is_finite() && min_y.is_finite() && max_y.is_finite()) {
            return;
        }

        // Clip to screen bounds
        let min_x = (min_x.floor() as i64).max(0);
        let max_x = (max_x.ceil() as i64).min(self.width as i64 - 1);
        let min_y = (min_y.floor() as i64).max(0);
        let max_y = (max_y.ceil() as i64).min(self.height as i64 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let center = Point2::new(x as f64 + 0.5, (y as f64 + 0.5) * CELL_ASPECT);
                if point_in_polygon(center, verts) {
                    let idx = y as usize * self.width + x as usize;
                    self.char_buffer[idx] = glyph;
                    self.color_buffer[idx] = color;
                }
            }
        }
    }

    fn cell_index(&self, p: Point2<f64>) -> Option<usize> {
        let x = p.x.floor();
        let y = (p.y / CELL_ASPECT).floor();
        if x < 0.0 || y < 0.0 || x >= self.width as f64 || y >= self.height as f64 {
            return None;
        }
        Some(y as usize * self.width + x as usize)
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for y in 0..self.height {
            for x in 0..self.width {
                let idx = y * self.width + x;
                writer.queue(SetForegroundColor(self.color_buffer[idx]))?;
                writer.queue(Print(self.char_buffer[idx]))?;
            }
            if y + 1 < self.height {
                writer.queue(Print("\r\n"))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

/// Lifted local point pulled toward the paper center as it rises.
pub fn project_lifted(p: Point3<f64>) -> Point2<f64> {
    let persp = 1.0 / (1.0 + p.z * PERSPECTIVE);
    Point2::new(p.x * persp, p.y * persp)
}

fn side_look(paper: &Paper, side: Side) -> (char, Color) {
    let (glyph, color) = match side {
        Side::Front => (FRONT_GLYPH, paper.style.front),
        Side::Back => (BACK_GLYPH, paper.style.back),
    };
    (
        glyph,
        Color::Rgb {
            r: color.r,
            g: color.g,
            b: color.b,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use foldsheet_core::{build_fold_anim, FoldConfig, FoldSide, IdFactory, PaperStyle};
    use nalgebra::Vector2;

    fn count(renderer: &AsciiRenderer, glyph: char) -> usize {
        let mut n = 0;
        for y in 0..renderer.height() {
            for x in 0..renderer.width() {
                if renderer.glyph_at(x, y) == Some(glyph) {
                    n += 1;
                }
            }
        }
        n
    }

    #[test]
    fn test_fill_polygon_covers_cell_centers() {
        let mut renderer = AsciiRenderer::new(20, 10);
        // 10 columns wide, 4 rows tall
        let rect = [
            Point2::new(2.0, 2.0),
            Point2::new(12.0, 2.0),
            Point2::new(12.0, 10.0),
            Point2::new(2.0, 10.0),
        ];
        renderer.fill_polygon(&rect, '#', Color::White);
        assert_eq!(count(&renderer, '#'), 40);
        assert_eq!(renderer.glyph_at(2, 1), Some('#'));
        assert_eq!(renderer.glyph_at(1, 1), Some(' '));
        assert_eq!(renderer.glyph_at(2, 5), Some(' '));
    }

    #[test]
    fn test_fill_polygon_clips_to_grid() {
        let mut renderer = AsciiRenderer::new(4, 4);
        let huge = [
            Point2::new(-100.0, -100.0),
            Point2::new(100.0, -100.0),
            Point2::new(100.0, 100.0),
            Point2::new(-100.0, 100.0),
        ];
        renderer.fill_polygon(&huge, '#', Color::White);
        assert_eq!(count(&renderer, '#'), 16);
    }

    #[test]
    fn test_folded_paper_shows_back_on_top() {
        let mut ids = IdFactory::new();
        let paper = Paper::new(&mut ids, PaperStyle::white(), Point2::new(20.0, 20.0), 20.0, 20.0);
        let line = HingeLine::new(Point2::new(20.0, 20.0), Vector2::new(0.0, 1.0));
        let mut anim = build_fold_anim(&paper, &line, FoldSide::Front, &mut ids, &FoldConfig::default())
            .built()
            .unwrap();

        let mut renderer = AsciiRenderer::new(40, 20);
        renderer.render_folding(&paper, &anim);
        assert_eq!(count(&renderer, '%'), 0);
        let flat = count(&renderer, '#');

        anim.advance(anim.duration_seconds());
        renderer.clear();
        renderer.render_folding(&paper, &anim);
        // The flap lies on the kept half showing its back.
        assert!(count(&renderer, '%') > 0);
        assert!(count(&renderer, '#') < flat);
    }

    #[test]
    fn test_hinge_overlay_crosses_grid() {
        let mut renderer = AsciiRenderer::new(10, 5);
        renderer.render_hinge(&HingeLine::new(Point2::new(4.5, 0.0), Vector2::new(0.0, 1.0)));
        for y in 0..5 {
            assert_eq!(renderer.glyph_at(4, y), Some(HINGE_GLYPH));
        }
        assert_eq!(count(&renderer, HINGE_GLYPH), 5);
    }

    #[test]
    fn test_project_lifted_is_identity_on_the_table() {
        let p = project_lifted(Point3::new(3.0, -4.0, 0.0));
        assert_eq!(p, Point2::new(3.0, -4.0));
        let lifted = project_lifted(Point3::new(3.0, -4.0, 100.0));
        assert!(lifted.x < 3.0 && lifted.y > -4.0);
    }
}
