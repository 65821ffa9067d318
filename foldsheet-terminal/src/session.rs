/// Host state between frames: the desk, per-paper undo history, the hinge
/// the user is aiming and the fold in flight.
///
/// The frame loop feeds [`Command`]s in the input phase, then calls
/// [`Session::step`] which runs the build phase followed by advance/commit.
/// Only `step` touches face stacks while a fold is running.
use std::collections::HashMap;
use std::f64::consts::TAU;

use foldsheet_core::{
    build_fold_anim, Color, Desk, FoldAnim, FoldBuild, FoldSide, HingeLine, History,
    IdFactory, PaperId, Paper, PaperStyle,
};
use nalgebra::{Point2, Vector2};
use tracing::{debug, info, warn};

use crate::settings::{fit_paper_size, Settings};

/// Offset between stacked new papers, in screen units.
const NEW_PAPER_OFFSET: f64 = 4.0;

const EXTRA_PAPER_COLORS: [Color; 4] = [
    Color::rgb(244, 200, 92),
    Color::rgb(120, 190, 230),
    Color::rgb(230, 120, 130),
    Color::rgb(140, 210, 150),
];

/// A user intent decoded from one key press
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    MoveHinge(Vector2<f64>),
    TurnHinge(f64),
    ToggleSide,
    Fold,
    Undo,
    Redo,
    Reset,
    TurnPaper(f64),
    AddPaper,
    CycleActive,
    Quit,
}

impl Command {
    /// Commands that would change a paper (or the paper order) and so have
    /// to wait until the running fold commits.
    pub fn is_locked_while_folding(self) -> bool {
        matches!(
            self,
            Command::Fold
                | Command::Undo
                | Command::Redo
                | Command::Reset
                | Command::TurnPaper(_)
                | Command::CycleActive
        )
    }
}

/// Hinge aimed by the user, in screen coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hinge {
    pub point: Point2<f64>,
    /// Direction angle in radians.
    pub angle: f64,
    pub side: FoldSide,
}

impl Hinge {
    pub fn line(&self) -> HingeLine {
        HingeLine::new(self.point, Vector2::new(self.angle.cos(), self.angle.sin()))
    }
}

pub struct Session {
    settings: Settings,
    viewport: Vector2<f64>,
    ids: IdFactory,
    desk: Desk,
    histories: HashMap<PaperId, History>,
    hinge: Hinge,
    fold_queued: bool,
    anim: Option<FoldAnim>,
    running: bool,
}

impl Session {
    /// A session with one paper centered in `viewport` and a vertical hinge
    /// through its middle.
    pub fn new(settings: Settings, viewport: Vector2<f64>) -> Self {
        let center = Point2::from(viewport / 2.0);
        let mut session = Self {
            settings,
            viewport,
            ids: IdFactory::new(),
            desk: Desk::new(),
            histories: HashMap::new(),
            hinge: Hinge {
                point: center,
                angle: std::f64::consts::FRAC_PI_2,
                side: FoldSide::Front,
            },
            fold_queued: false,
            anim: None,
            running: true,
        };
        session.add_paper();
        session
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn viewport(&self) -> Vector2<f64> {
        self.viewport
    }

    pub fn resize(&mut self, viewport: Vector2<f64>) {
        self.viewport = viewport;
    }

    pub fn desk(&self) -> &Desk {
        &self.desk
    }

    pub fn hinge(&self) -> &Hinge {
        &self.hinge
    }

    pub fn anim(&self) -> Option<&FoldAnim> {
        self.anim.as_ref()
    }

    pub fn is_animating(&self) -> bool {
        self.anim.is_some()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn history(&self, id: PaperId) -> Option<&History> {
        self.histories.get(&id)
    }

    /// Input phase. Returns whether the command took effect.
    pub fn apply(&mut self, command: Command) -> bool {
        if self.is_animating() && command.is_locked_while_folding() {
            debug!(?command, "input locked while folding");
            return false;
        }
        match command {
            Command::MoveHinge(delta) => {
                self.hinge.point += delta;
                true
            }
            Command::TurnHinge(angle) => {
                self.hinge.angle = (self.hinge.angle + angle).rem_euclid(TAU);
                true
            }
            Command::ToggleSide => {
                self.hinge.side = self.hinge.side.toggle();
                true
            }
            Command::Fold => {
                self.fold_queued = true;
                true
            }
            Command::Undo => self.undo(),
            Command::Redo => self.redo(),
            Command::Reset => self.reset_active(),
            Command::TurnPaper(angle) => self.turn_active(angle),
            Command::AddPaper => {
                self.add_paper();
                true
            }
            Command::CycleActive => self.cycle_active(),
            Command::Quit => {
                self.running = false;
                true
            }
        }
    }

    /// Build phase, then advance/commit phase. `dt` is clamped to the
    /// configured maximum step. Returns whether a fold committed.
    pub fn step(&mut self, dt: f64) -> bool {
        self.build_queued_fold();
        self.advance(dt.min(self.settings.frame.max_dt))
    }

    /// Sheet size for the current viewport.
    pub fn paper_size(&self) -> (f64, f64) {
        let paper = &self.settings.paper;
        fit_paper_size(self.viewport, paper.aspect.ratio(), paper.screen_fraction)
    }

    fn build_queued_fold(&mut self) {
        if !std::mem::take(&mut self.fold_queued) || self.anim.is_some() {
            return;
        }
        let Some(paper) = self.desk.active() else {
            return;
        };
        let line = self.hinge.line();
        match build_fold_anim(paper, &line, self.hinge.side, &mut self.ids, &self.settings.fold) {
            FoldBuild::Built(anim) => {
                info!(paper = %paper.id, moving = anim.moving_faces().len(), "fold started");
                self.anim = Some(anim);
            }
            FoldBuild::Skipped(reason) => {
                info!(paper = %paper.id, ?reason, "fold skipped");
            }
        }
    }

    fn advance(&mut self, dt: f64) -> bool {
        let Some(anim) = self.anim.as_mut() else {
            return false;
        };
        if !anim.advance(dt) {
            return false;
        }
        let Some(anim) = self.anim.take() else {
            return false;
        };
        let paper_id = anim.paper_id();
        let Some(paper) = self.desk.get_mut(paper_id) else {
            warn!(paper = %paper_id, "folded paper left the desk before commit");
            return false;
        };

        let limit = self.settings.history_limit;
        let history = self
            .histories
            .entry(paper_id)
            .or_insert_with(|| History::with_limit(limit));

        match history.commit_fold(paper, anim, &mut self.ids) {
            Ok(()) => {
                info!(paper = %paper_id, faces = paper.faces.len(), "fold committed");
                true
            }
            Err(err) => {
                warn!(error = %err, "fold commit rejected");
                false
            }
        }
    }

    fn undo(&mut self) -> bool {
        let Some(id) = self.desk.active_id() else {
            return false;
        };
        let (Some(paper), Some(history)) = (self.desk.get_mut(id), self.histories.get_mut(&id)) else {
            return false;
        };
        let undone = history.undo(paper);
        debug!(paper = %id, undone, "undo");
        undone
    }

    fn redo(&mut self) -> bool {
        let Some(id) = self.desk.active_id() else {
            return false;
        };
        let (Some(paper), Some(history)) = (self.desk.get_mut(id), self.histories.get_mut(&id)) else {
            return false;
        };
        let redone = history.redo(paper);
        debug!(paper = %id, redone, "redo");
        redone
    }

    fn reset_active(&mut self) -> bool {
        let (width, height) = self.paper_size();
        let limit = self.settings.history_limit;
        let Some(paper) = self.desk.active_mut() else {
            return false;
        };
        self.histories
            .entry(paper.id)
            .or_insert_with(|| History::with_limit(limit))
            .record(paper);
        paper.base_w = width;
        paper.base_h = height;
        paper.reset(&mut self.ids);
        info!(paper = %paper.id, width, height, "paper reset");
        true
    }

    fn turn_active(&mut self, angle: f64) -> bool {
        let Some(paper) = self.desk.active_mut() else {
            return false;
        };
        paper.rot = (paper.rot + angle).rem_euclid(TAU);
        true
    }

    fn add_paper(&mut self) -> PaperId {
        let (width, height) = self.paper_size();
        let count = self.desk.len();
        let offset = NEW_PAPER_OFFSET * count as f64;
        let center = Point2::from(self.viewport / 2.0) + Vector2::new(offset, offset);
        let style = match count {
            0 => self.settings.paper.style(),
            n => PaperStyle::from_front(EXTRA_PAPER_COLORS[(n - 1) % EXTRA_PAPER_COLORS.len()]),
        };
        let paper = Paper::new(&mut self.ids, style, center, width, height);
        let id = self.desk.add(paper);
        self.desk.set_active(id);
        info!(paper = %id, width, height, "paper added");
        id
    }

    /// Make the bottom paper active and raise it to the top.
    fn cycle_active(&mut self) -> bool {
        if self.desk.len() < 2 {
            return false;
        }
        let Some(bottom) = self.desk.papers().first().map(|p| p.id) else {
            return false;
        };
        self.desk.bring_to_top(bottom) && self.desk.set_active(bottom)
    }
}
