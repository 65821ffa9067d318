/// Several independent papers on one surface.
use nalgebra::Point2;

use crate::hit_test::hit_test_paper;
use crate::ids::PaperId;
use crate::paper::Paper;

/// Papers ordered bottom to top, plus the one the user is working on.
#[derive(Debug, Clone, Default)]
pub struct Desk {
    papers: Vec<Paper>,
    active: Option<PaperId>,
}

impl Desk {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place `paper` on top. The first paper added becomes active.
    pub fn add(&mut self, paper: Paper) -> PaperId {
        let id = paper.id;
        self.papers.push(paper);
        if self.active.is_none() {
            self.active = Some(id);
        }
        id
    }

    /// Papers bottom to top.
    pub fn papers(&self) -> &[Paper] {
        &self.papers
    }

    pub fn len(&self) -> usize {
        self.papers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.papers.is_empty()
    }

    pub fn get(&self, id: PaperId) -> Option<&Paper> {
        self.papers.iter().find(|p| p.id == id)
    }

    pub fn get_mut(&mut self, id: PaperId) -> Option<&mut Paper> {
        self.papers.iter_mut().find(|p| p.id == id)
    }

    pub fn active_id(&self) -> Option<PaperId> {
        match self.active {
            Some(id) if self.get(id).is_some() => Some(id),
            _ => self.papers.last().map(|p| p.id),
        }
    }

    /// The active paper, or the top paper if the active one is gone.
    pub fn active(&self) -> Option<&Paper> {
        self.active_id().and_then(|id| self.get(id))
    }

    pub fn active_mut(&mut self) -> Option<&mut Paper> {
        let id = self.active_id()?;
        self.get_mut(id)
    }

    pub fn set_active(&mut self, id: PaperId) -> bool {
        if self.get(id).is_some() {
            self.active = Some(id);
            true
        } else {
            false
        }
    }

    pub fn bring_to_top(&mut self, id: PaperId) -> bool {
        let Some(index) = self.papers.iter().position(|p| p.id == id) else {
            return false;
        };
        let paper = self.papers.remove(index);
        self.papers.push(paper);
        true
    }

    /// Topmost paper under `screen_point`.
    pub fn paper_at(&self, screen_point: Point2<f64>) -> Option<PaperId> {
        self.papers
            .iter()
            .rev()
            .find(|p| hit_test_paper(p, screen_point))
            .map(|p| p.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::IdFactory;
    use crate::paper::PaperStyle;

    fn desk_of_two() -> (Desk, PaperId, PaperId) {
        let mut ids = IdFactory::new();
        let mut desk = Desk::new();
        let a = desk.add(Paper::new(&mut ids, PaperStyle::white(), Point2::new(0.0, 0.0), 10.0, 10.0));
        let b = desk.add(Paper::new(&mut ids, PaperStyle::white(), Point2::new(4.0, 0.0), 10.0, 10.0));
        (desk, a, b)
    }

    #[test]
    fn test_first_paper_is_active() {
        let (desk, a, _) = desk_of_two();
        assert_eq!(desk.active_id(), Some(a));
    }

    #[test]
    fn test_paper_at_returns_topmost() {
        let (mut desk, a, b) = desk_of_two();
        assert_eq!(desk.paper_at(Point2::new(2.0, 0.0)), Some(b));
        assert_eq!(desk.paper_at(Point2::new(-3.0, 0.0)), Some(a));
        assert_eq!(desk.paper_at(Point2::new(50.0, 0.0)), None);

        assert!(desk.bring_to_top(a));
        assert_eq!(desk.paper_at(Point2::new(2.0, 0.0)), Some(a));
        assert_eq!(desk.papers().last().map(|p| p.id), Some(a));
    }

    #[test]
    fn test_set_active_rejects_unknown_ids() {
        let (mut desk, _, b) = desk_of_two();
        assert!(desk.set_active(b));
        assert!(!desk.set_active(PaperId(99)));
        assert_eq!(desk.active().map(|p| p.id), Some(b));
    }
}
