/// Monotonic identifiers for papers and faces
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FaceId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PaperId(pub u64);

impl fmt::Display for FaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "face#{}", self.0)
    }
}

impl fmt::Display for PaperId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "paper#{}", self.0)
    }
}

/// A plain increasing counter
#[derive(Debug, Clone)]
pub struct IdCounter {
    next: u64,
}

impl IdCounter {
    pub fn starting_at(first: u64) -> Self {
        Self { next: first }
    }

    pub fn next_value(&mut self) -> u64 {
        let value = self.next;
        self.next += 1;
        value
    }
}

/// Hands out face and paper ids from two independent counters, both starting at 1.
#[derive(Debug, Clone)]
pub struct IdFactory {
    faces: IdCounter,
    papers: IdCounter,
}

impl IdFactory {
    pub fn new() -> Self {
        Self {
            faces: IdCounter::starting_at(1),
            papers: IdCounter::starting_at(1),
        }
    }

    pub fn next_face_id(&mut self) -> FaceId {
        FaceId(self.faces.next_value())
    }

    pub fn next_paper_id(&mut self) -> PaperId {
        PaperId(self.papers.next_value())
    }
}

impl Default for IdFactory {
    fn default() -> Self {
        Self::new()
    }
}
