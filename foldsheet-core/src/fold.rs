/// Fold engine: split a paper's face stack along a hinge line, animate the
/// moving half through a half turn and commit the folded result.
///
/// Building a fold never touches the paper. [`commit_fold`] is the only
/// operation that replaces a paper's faces.
use std::f64::consts::PI;

use nalgebra::{Point2, Point3, Vector3};
use tracing::{debug, trace, warn};

use crate::config::FoldConfig;
use crate::error::FoldError;
use crate::geometry::{Face, FaceStack, Side};
use crate::ids::{IdFactory, PaperId};
use crate::math::{rotate_around_axis, rotate_point_around_line, Easing};
use crate::paper::Paper;
use crate::transform::{HingeLine, Transform};

/// Selects which half-plane of the hinge line lifts and turns over.
///
/// `Front` moves the side the hinge normal points to, `Back` the other one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FoldSide {
    Front,
    Back,
}

impl FoldSide {
    fn sign(self) -> f64 {
        match self {
            FoldSide::Front => 1.0,
            FoldSide::Back => -1.0,
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            FoldSide::Front => FoldSide::Back,
            FoldSide::Back => FoldSide::Front,
        }
    }
}

/// Why no fold was built this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The hinge direction is zero or not finite, or the paper cannot be
    /// mapped back to local space.
    DegenerateHinge,
    /// The hinge crosses no face: it misses the sheet or only touches its
    /// outline, so nothing would turn over.
    NothingToFold,
}

/// Outcome of [`build_fold_anim`]
#[derive(Debug, Clone)]
pub enum FoldBuild {
    Built(FoldAnim),
    Skipped(SkipReason),
}

impl FoldBuild {
    pub fn is_built(&self) -> bool {
        matches!(self, FoldBuild::Built(_))
    }

    pub fn built(self) -> Option<FoldAnim> {
        match self {
            FoldBuild::Built(anim) => Some(anim),
            FoldBuild::Skipped(_) => None,
        }
    }
}

/// A face on the turning half together with its vertices rotated to the
/// current fold angle.
#[derive(Debug, Clone)]
pub struct MovingFace {
    pub face: Face,
    lifted: Vec<Point3<f64>>,
}

impl MovingFace {
    fn new(face: Face) -> Self {
        let lifted = face.verts.iter().map(|p| Point3::new(p.x, p.y, 0.0)).collect();
        Self { face, lifted }
    }

    /// Local vertices lifted to 3D and rotated about the hinge.
    pub fn lifted(&self) -> &[Point3<f64>] {
        &self.lifted
    }

    pub fn average_z(&self) -> f64 {
        if self.lifted.is_empty() {
            return 0.0;
        }
        self.lifted.iter().map(|p| p.z).sum::<f64>() / self.lifted.len() as f64
    }
}

/// A fold in flight. Holds everything needed to draw the fold and to commit it.
#[derive(Debug, Clone)]
pub struct FoldAnim {
    paper_id: PaperId,
    progress: f64,
    duration_seconds: f64,
    easing: Easing,
    line: HingeLine,
    side: FoldSide,
    keep_faces: Vec<Face>,
    moving_faces: Vec<MovingFace>,
}

impl FoldAnim {
    pub fn paper_id(&self) -> PaperId {
        self.paper_id
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn duration_seconds(&self) -> f64 {
        self.duration_seconds
    }

    /// Hinge line in the paper's local frame, unit direction.
    pub fn line(&self) -> &HingeLine {
        &self.line
    }

    pub fn side(&self) -> FoldSide {
        self.side
    }

    pub fn keep_faces(&self) -> &[Face] {
        &self.keep_faces
    }

    pub fn moving_faces(&self) -> &[MovingFace] {
        &self.moving_faces
    }

    pub fn is_complete(&self) -> bool {
        self.progress >= 1.0
    }

    /// Current rotation of the moving half: eased progress scaled to π.
    pub fn angle(&self) -> f64 {
        self.easing.apply(self.progress) * PI
    }

    /// Advance by `elapsed_seconds` and return whether the fold has finished.
    ///
    /// Progress only grows and saturates at 1. Negative or non-finite
    /// elapsed times are ignored.
    pub fn advance(&mut self, elapsed_seconds: f64) -> bool {
        if elapsed_seconds.is_finite() && elapsed_seconds > 0.0 {
            let step = if self.duration_seconds > 0.0 {
                elapsed_seconds / self.duration_seconds
            } else {
                1.0
            };
            self.progress = (self.progress + step).min(1.0);
            self.relift();
        }
        self.is_complete()
    }

    fn axis(&self) -> (Point3<f64>, Vector3<f64>) {
        (
            Point3::new(self.line.point.x, self.line.point.y, 0.0),
            Vector3::new(self.line.dir.x, self.line.dir.y, 0.0),
        )
    }

    fn relift(&mut self) {
        let angle = self.angle();
        let (axis_point, axis_dir) = self.axis();
        for moving in &mut self.moving_faces {
            moving.lifted = moving
                .face
                .verts
                .iter()
                .map(|p| rotate_point_around_line(Point3::new(p.x, p.y, 0.0), axis_point, axis_dir, angle))
                .collect();
        }
    }

    /// Normal of the moving half at the current angle; starts at +z.
    pub fn normal(&self) -> Vector3<f64> {
        let (_, axis_dir) = self.axis();
        rotate_around_axis(Vector3::z(), axis_dir, self.angle())
    }

    /// Side of `face` the viewer sees at the current angle. Flips once the
    /// moving half passes the vertical.
    pub fn visible_side(&self, face: &Face) -> Side {
        if self.normal().z >= 0.0 {
            face.up
        } else {
            face.up.toggle()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HalfPlane {
    Kept,
    OnLine,
    Moving,
}

fn classify(distance: f64, epsilon: f64) -> HalfPlane {
    if distance > epsilon {
        HalfPlane::Moving
    } else if distance < -epsilon {
        HalfPlane::Kept
    } else {
        HalfPlane::OnLine
    }
}

/// Sutherland-Hodgman split of one polygon against the hinge.
///
/// `distances` are signed so that positive means the moving side. On-line
/// vertices go to both fragments; strict crossings emit the intersection
/// point to both. Winding order is preserved in each fragment.
fn split_polygon(
    verts: &[Point2<f64>],
    distances: &[f64],
    classes: &[HalfPlane],
) -> (Vec<Point2<f64>>, Vec<Point2<f64>>) {
    let n = verts.len();
    let mut kept = Vec::with_capacity(n + 2);
    let mut moving = Vec::with_capacity(n + 2);

    for i in 0..n {
        let j = (i + 1) % n;
        let (current, current_class) = (verts[i], classes[i]);

        match current_class {
            HalfPlane::Kept => kept.push(current),
            HalfPlane::Moving => moving.push(current),
            HalfPlane::OnLine => {
                kept.push(current);
                moving.push(current);
            }
        }

        let crosses = matches!(
            (current_class, classes[j]),
            (HalfPlane::Kept, HalfPlane::Moving) | (HalfPlane::Moving, HalfPlane::Kept)
        );
        if crosses {
            let t = distances[i] / (distances[i] - distances[j]);
            let hit = current + (verts[j] - current) * t;
            kept.push(hit);
            moving.push(hit);
        }
    }

    (kept, moving)
}

/// Plan a fold of `paper` along a screen-space hinge line.
///
/// Faces crossing the hinge are split into fresh faces that inherit side
/// and layer; faces wholly on the moving side turn over with them. A hinge
/// that only touches the stack along an edge or a corner turns the faces on
/// its moving side over about that edge. Returns `Skipped` when the hinge
/// neither crosses nor touches anything that would move. The paper is never
/// modified.
pub fn build_fold_anim(
    paper: &Paper,
    hinge_screen: &HingeLine,
    side: FoldSide,
    ids: &mut IdFactory,
    config: &FoldConfig,
) -> FoldBuild {
    let Some(line) = Transform::line_to_local(paper, hinge_screen) else {
        debug!(paper = %paper.id, "fold skipped: degenerate hinge");
        return FoldBuild::Skipped(SkipReason::DegenerateHinge);
    };

    let epsilon = config.epsilon.max(0.0);
    let sign = side.sign();
    let mut keep_faces = Vec::new();
    let mut moving_faces = Vec::new();
    let mut crossed = false;
    let mut touched = false;

    for face in paper.faces.iter() {
        let distances: Vec<f64> = face
            .verts
            .iter()
            .map(|p| sign * line.signed_distance(*p))
            .collect();
        let classes: Vec<HalfPlane> = distances.iter().map(|d| classify(*d, epsilon)).collect();
        let any_moving = classes.contains(&HalfPlane::Moving);
        let any_kept = classes.contains(&HalfPlane::Kept);

        match (any_moving, any_kept) {
            (true, true) => {
                crossed = true;
                let (kept, moving) = split_polygon(&face.verts, &distances, &classes);
                trace!(
                    face = %face.id,
                    kept = kept.len(),
                    moving = moving.len(),
                    "split face across hinge"
                );
                if kept.len() >= 3 {
                    keep_faces.push(Face::new(ids.next_face_id(), kept, face.up, face.layer));
                }
                if moving.len() >= 3 {
                    moving_faces.push(Face::new(ids.next_face_id(), moving, face.up, face.layer));
                }
            }
            (true, false) => {
                touched |= classes.contains(&HalfPlane::OnLine);
                moving_faces.push(face.clone());
            }
            _ => keep_faces.push(face.clone()),
        }
    }

    if !(crossed || touched) || moving_faces.is_empty() {
        debug!(paper = %paper.id, "fold skipped: hinge crosses no face");
        return FoldBuild::Skipped(SkipReason::NothingToFold);
    }

    debug!(
        paper = %paper.id,
        keep = keep_faces.len(),
        moving = moving_faces.len(),
        "fold built"
    );

    FoldBuild::Built(FoldAnim {
        paper_id: paper.id,
        progress: 0.0,
        duration_seconds: config.duration_seconds,
        easing: config.easing,
        line,
        side,
        keep_faces,
        moving_faces: moving_faces.into_iter().map(MovingFace::new).collect(),
    })
}

/// Lay the moving half flat on top of the kept half and replace the
/// paper's faces.
///
/// Moved faces are mirrored across the hinge (the rest pose of a half turn),
/// turned over, and stacked above every existing face while keeping their
/// relative order. Callers commit once [`FoldAnim::is_complete`] holds.
pub fn commit_fold(paper: &mut Paper, anim: FoldAnim, ids: &mut IdFactory) -> Result<(), FoldError> {
    if anim.paper_id != paper.id {
        return Err(FoldError::PaperMismatch {
            expected: anim.paper_id,
            found: paper.id,
        });
    }
    if !anim.is_complete() {
        warn!(paper = %paper.id, progress = anim.progress, "committing an unfinished fold");
    }

    let max_layer = paper
        .faces
        .iter()
        .chain(anim.keep_faces.iter())
        .chain(anim.moving_faces.iter().map(|m| &m.face))
        .map(|f| f.layer)
        .max()
        .unwrap_or(0);
    let min_moving_layer = anim
        .moving_faces
        .iter()
        .map(|m| m.face.layer)
        .min()
        .unwrap_or(0);

    let line = anim.line;
    let moved_count = anim.moving_faces.len();
    let mut faces: FaceStack = anim.keep_faces.into_iter().collect();

    for moving in anim.moving_faces {
        let face = moving.face;
        let mut verts: Vec<Point2<f64>> = face.verts.iter().map(|p| line.mirror(*p)).collect();
        verts.reverse();
        let layer = max_layer
            .saturating_add(1)
            .saturating_add(face.layer - min_moving_layer);
        faces.push(Face::new(ids.next_face_id(), verts, face.up.toggle(), layer));
    }

    paper.faces = faces;

    if let Err(err) = paper.validate() {
        warn!(paper = %paper.id, error = %err, "folded paper failed validation");
    }
    debug!(paper = %paper.id, faces = paper.faces.len(), moved = moved_count, "fold committed");
    Ok(())
}
