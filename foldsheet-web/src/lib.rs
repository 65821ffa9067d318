/// foldsheet web - WASM binding for a single foldable sheet
///
/// The host page owns drawing and input. It calls `fold` with a hinge in
/// canvas coordinates, `tick` once per animation frame, and reads faces
/// back as flat coordinate arrays.
use foldsheet_core::{
    build_fold_anim, hit_test_paper, FoldAnim, FoldBuild, FoldConfig, FoldSide,
    HingeLine, History, IdFactory, Paper, PaperStyle, Side, Transform,
};
use nalgebra::{Point2, Vector2};
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub struct WebSheet {
    ids: IdFactory,
    paper: Paper,
    history: History,
    config: FoldConfig,
    anim: Option<FoldAnim>,
}

#[wasm_bindgen]
impl WebSheet {
    /// A flat `width × height` sheet centered on `(cx, cy)`.
    #[wasm_bindgen(constructor)]
    pub fn new(cx: f64, cy: f64, width: f64, height: f64) -> WebSheet {
        let mut ids = IdFactory::new();
        let paper = Paper::new(&mut ids, PaperStyle::white(), Point2::new(cx, cy), width, height);
        WebSheet {
            ids,
            paper,
            history: History::new(),
            config: FoldConfig::default(),
            anim: None,
        }
    }

    /// Start folding along the hinge through `(hx, hy)` with direction
    /// `(dx, dy)`. Returns false when nothing would fold or a fold is
    /// already running.
    pub fn fold(&mut self, hx: f64, hy: f64, dx: f64, dy: f64, front: bool) -> bool {
        if self.anim.is_some() {
            return false;
        }
        let line = HingeLine::new(Point2::new(hx, hy), Vector2::new(dx, dy));
        let side = if front { FoldSide::Front } else { FoldSide::Back };
        match build_fold_anim(&self.paper, &line, side, &mut self.ids, &self.config) {
            FoldBuild::Built(anim) => {
                self.anim = Some(anim);
                true
            }
            FoldBuild::Skipped(_) => false,
        }
    }

    /// Advance the running fold by `dt` seconds. Returns true on the tick
    /// that commits it.
    pub fn tick(&mut self, dt: f64) -> bool {
        let Some(anim) = self.anim.as_mut() else {
            return false;
        };
        if !anim.advance(dt) {
            return false;
        }
        let Some(anim) = self.anim.take() else {
            return false;
        };
        self.history
            .commit_fold(&mut self.paper, anim, &mut self.ids)
            .is_ok()
    }

    pub fn is_animating(&self) -> bool {
        self.anim.is_some()
    }

    pub fn set_duration(&mut self, seconds: f64) {
        if seconds.is_finite() && seconds >= 0.0 {
            self.config.duration_seconds = seconds;
        }
    }

    pub fn undo(&mut self) -> bool {
        self.anim.is_none() && self.history.undo(&mut self.paper)
    }

    pub fn redo(&mut self) -> bool {
        self.anim.is_none() && self.history.redo(&mut self.paper)
    }

    pub fn reset(&mut self) {
        if self.anim.is_some() {
            return;
        }
        self.history.record(&self.paper);
        self.paper.reset(&mut self.ids);
    }

    /// Place the sheet. Returns false and changes nothing when a value is
    /// not finite or `scale` is zero.
    pub fn set_pose(&mut self, x: f64, y: f64, rot: f64, scale: f64) -> bool {
        let finite = [x, y, rot, scale].iter().all(|v| v.is_finite());
        if !finite || scale == 0.0 {
            return false;
        }
        self.paper.pos = Point2::new(x, y);
        self.paper.rot = rot;
        self.paper.scale = scale;
        true
    }

    pub fn hit_test(&self, x: f64, y: f64) -> bool {
        hit_test_paper(&self.paper, Point2::new(x, y))
    }

    pub fn face_count(&self) -> usize {
        self.paper.faces.len()
    }

    /// Screen coordinates of face `index` as `[x0, y0, x1, y1, ...]`.
    pub fn face_points(&self, index: usize) -> Vec<f64> {
        self.paper
            .faces
            .get(index)
            .map(|face| {
                face.verts
                    .iter()
                    .map(|p| Transform::local_to_screen(&self.paper, *p))
                    .flat_map(|p| [p.x, p.y])
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn face_layer(&self, index: usize) -> Option<i32> {
        self.paper.faces.get(index).map(|f| f.layer)
    }

    pub fn face_is_front(&self, index: usize) -> Option<bool> {
        self.paper.faces.get(index).map(|f| f.up == Side::Front)
    }

    /// Current rotation of the moving half in radians, 0 when idle.
    pub fn fold_angle(&self) -> f64 {
        self.anim.as_ref().map_or(0.0, FoldAnim::angle)
    }

    pub fn moving_face_count(&self) -> usize {
        self.anim.as_ref().map_or(0, |a| a.moving_faces().len())
    }

    /// Lifted local coordinates of moving face `index` as
    /// `[x0, y0, z0, x1, ...]`.
    pub fn moving_face_points(&self, index: usize) -> Vec<f64> {
        self.anim
            .as_ref()
            .and_then(|a| a.moving_faces().get(index))
            .map(|m| m.lifted().iter().flat_map(|p| [p.x, p.y, p.z]).collect())
            .unwrap_or_default()
    }

    pub fn moving_face_is_front(&self, index: usize) -> Option<bool> {
        let anim = self.anim.as_ref()?;
        let moving = anim.moving_faces().get(index)?;
        Some(anim.visible_side(&moving.face) == Side::Front)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet() -> WebSheet {
        WebSheet::new(500.0, 500.0, 300.0, 400.0)
    }

    #[test]
    fn test_fold_and_tick_commit_once() {
        let mut sheet = sheet();
        assert!(sheet.fold(500.0, 500.0, 0.0, 1.0, true));
        assert!(sheet.is_animating());
        assert!(!sheet.fold(500.0, 500.0, 0.0, 1.0, true));
        assert_eq!(sheet.moving_face_count(), 1);
        assert_eq!(sheet.moving_face_points(0).len() % 3, 0);

        assert!(!sheet.tick(0.1));
        assert!(sheet.fold_angle() > 0.0);
        assert!(sheet.tick(10.0));
        assert!(!sheet.tick(0.1));
        assert!(!sheet.is_animating());
        assert_eq!(sheet.fold_angle(), 0.0);

        assert_eq!(sheet.face_count(), 2);
        assert_eq!(sheet.face_is_front(1), Some(false));
        assert!(sheet.face_layer(1) > sheet.face_layer(0));
        assert!(sheet.face_points(5).is_empty());
    }

    #[test]
    fn test_skipped_fold_returns_false() {
        let mut sheet = sheet();
        assert!(!sheet.fold(5000.0, 5000.0, 1.0, -1.0, true));
        assert!(!sheet.fold(500.0, 500.0, 0.0, 0.0, true));
        assert!(!sheet.is_animating());
    }

    #[test]
    fn test_undo_redo_and_reset() {
        let mut sheet = sheet();
        sheet.fold(500.0, 500.0, 0.0, 1.0, true);
        sheet.tick(1.0);
        assert_eq!(sheet.face_count(), 2);

        assert!(sheet.undo());
        assert_eq!(sheet.face_count(), 1);
        assert!(sheet.redo());
        assert_eq!(sheet.face_count(), 2);

        sheet.reset();
        assert_eq!(sheet.face_count(), 1);
        assert!(sheet.undo());
        assert_eq!(sheet.face_count(), 2);
    }

    #[test]
    fn test_face_points_follow_pose() {
        let mut sheet = sheet();
        let points = sheet.face_points(0);
        assert_eq!(points, vec![350.0, 300.0, 650.0, 300.0, 650.0, 700.0, 350.0, 700.0]);

        assert!(sheet.set_pose(0.0, 0.0, 0.0, 2.0));
        assert_eq!(sheet.face_points(0)[0], -300.0);
        assert!(sheet.hit_test(250.0, 0.0));
        assert!(!sheet.hit_test(350.0, 0.0));
    }

    #[test]
    fn test_set_pose_rejects_collapsing_scale() {
        let mut sheet = sheet();
        assert!(!sheet.set_pose(10.0, 10.0, 0.0, 0.0));
        assert!(!sheet.set_pose(10.0, 10.0, f64::NAN, 1.0));
        assert!(!sheet.set_pose(10.0, 10.0, 0.0, f64::INFINITY));
        assert_eq!(sheet.face_points(0)[0], 350.0);
        assert!(sheet.hit_test(500.0, 500.0));
    }
}
