/// Undo/redo storage of paper snapshots
use crate::error::FoldError;
use crate::fold::{commit_fold, FoldAnim};
use crate::ids::IdFactory;
use crate::paper::{Paper, PaperSnapshot};

/// Undo and redo stacks for one paper.
///
/// Emptiness is reported, not treated as an error: `undo`/`redo` on an
/// empty stack return `false` and leave the paper alone.
#[derive(Debug, Clone, Default)]
pub struct History {
    undo: Vec<PaperSnapshot>,
    redo: Vec<PaperSnapshot>,
    limit: Option<usize>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep at most `limit` undo steps, dropping the oldest first.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit: Some(limit),
            ..Self::default()
        }
    }

    /// Remember the current state of `paper` before it is changed.
    pub fn record(&mut self, paper: &Paper) {
        self.record_snapshot(paper.snapshot());
    }

    pub fn record_snapshot(&mut self, snapshot: PaperSnapshot) {
        self.push_undo(snapshot);
        self.redo.clear();
    }

    /// Commit `anim` to `paper`, keeping an undo step only if the commit
    /// went through.
    pub fn commit_fold(
        &mut self,
        paper: &mut Paper,
        anim: FoldAnim,
        ids: &mut IdFactory,
    ) -> Result<(), FoldError> {
        let before = paper.snapshot();
        commit_fold(paper, anim, ids)?;
        self.record_snapshot(before);
        Ok(())
    }

    pub fn undo(&mut self, paper: &mut Paper) -> bool {
        let Some(snapshot) = self.undo.pop() else {
            return false;
        };
        self.redo.push(paper.snapshot());
        paper.restore(&snapshot);
        true
    }

    pub fn redo(&mut self, paper: &mut Paper) -> bool {
        let Some(snapshot) = self.redo.pop() else {
            return false;
        };
        self.push_undo(paper.snapshot());
        paper.restore(&snapshot);
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }

    fn push_undo(&mut self, snapshot: PaperSnapshot) {
        self.undo.push(snapshot);
        if let Some(limit) = self.limit {
            if self.undo.len() > limit {
                let excess = self.undo.len() - limit;
                self.undo.drain(..excess);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FoldConfig;
    use crate::fold::{build_fold_anim, FoldSide};
    use crate::paper::PaperStyle;
    use crate::transform::HingeLine;
    use nalgebra::{Point2, Vector2};

    fn paper(ids: &mut IdFactory) -> Paper {
        Paper::new(ids, PaperStyle::white(), Point2::new(0.0, 0.0), 10.0, 10.0)
    }

    #[test]
    fn test_undo_redo_round_trip() {
        let mut ids = IdFactory::new();
        let mut paper = paper(&mut ids);
        let mut history = History::new();
        let original = paper.snapshot();

        history.record(&paper);
        paper.pos = Point2::new(5.0, 5.0);
        let moved = paper.snapshot();

        assert!(history.undo(&mut paper));
        assert_eq!(paper.snapshot(), original);
        assert!(history.can_redo());

        assert!(history.redo(&mut paper));
        assert_eq!(paper.snapshot(), moved);
        assert!(!history.can_redo());
    }

    #[test]
    fn test_empty_stacks_are_no_ops() {
        let mut ids = IdFactory::new();
        let mut paper = paper(&mut ids);
        let before = paper.clone();
        let mut history = History::new();

        assert!(!history.undo(&mut paper));
        assert!(!history.redo(&mut paper));
        assert_eq!(paper, before);
    }

    #[test]
    fn test_record_clears_redo() {
        let mut ids = IdFactory::new();
        let mut paper = paper(&mut ids);
        let mut history = History::new();

        history.record(&paper);
        paper.rot = 1.0;
        history.undo(&mut paper);
        assert!(history.can_redo());

        history.record(&paper);
        assert!(!history.can_redo());
    }

    #[test]
    fn test_limit_drops_oldest() {
        let mut ids = IdFactory::new();
        let mut paper = paper(&mut ids);
        let mut history = History::with_limit(2);

        for step in 0..5 {
            paper.rot = step as f64;
            history.record(&paper);
        }
        assert_eq!(history.undo_len(), 2);

        history.undo(&mut paper);
        history.undo(&mut paper);
        assert_eq!(paper.rot, 3.0);
        assert!(!history.undo(&mut paper));
    }

    #[test]
    fn test_committed_fold_is_undoable() {
        let mut ids = IdFactory::new();
        let mut paper = paper(&mut ids);
        let mut history = History::new();
        let line = HingeLine::new(Point2::new(0.0, 0.0), Vector2::new(0.0, 1.0));
        let mut anim = build_fold_anim(&paper, &line, FoldSide::Front, &mut ids, &FoldConfig::default())
            .built()
            .unwrap();
        anim.advance(anim.duration_seconds());

        history.commit_fold(&mut paper, anim, &mut ids).unwrap();
        assert_eq!(paper.faces.len(), 2);
        assert!(history.undo(&mut paper));
        assert_eq!(paper.faces.len(), 1);
    }

    #[test]
    fn test_rejected_commit_leaves_no_undo_step() {
        let mut ids = IdFactory::new();
        let source = paper(&mut ids);
        let mut other = paper(&mut ids);
        let mut history = History::new();
        let line = HingeLine::new(Point2::new(0.0, 0.0), Vector2::new(0.0, 1.0));
        let mut anim = build_fold_anim(&source, &line, FoldSide::Front, &mut ids, &FoldConfig::default())
            .built()
            .unwrap();
        anim.advance(anim.duration_seconds());

        let before = other.clone();
        assert!(history.commit_fold(&mut other, anim, &mut ids).is_err());
        assert_eq!(other, before);
        assert!(!history.can_undo());
    }
}
