/// Validation and fold errors
use crate::ids::{FaceId, PaperId};
use nalgebra::Point2;

/// At-rest invariant violations of a face
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// (TooFewPoints) A face has fewer than three vertices
    #[error("(TooFewPoints) {face} has {count} vertices, at least 3 are required")]
    TooFewPoints { face: FaceId, count: usize },
    /// (InvalidCoordinate) A vertex has a NaN or infinite coordinate
    #[error("(InvalidCoordinate) {face} has a NaN or infinite vertex at: {point}")]
    InvalidCoordinate { face: FaceId, point: Point2<f64> },
    /// (RepeatedPoint) Two consecutive vertices are identical
    #[error("(RepeatedPoint) {face} repeats the vertex at: {point}")]
    RepeatedPoint { face: FaceId, point: Point2<f64> },
    /// (ZeroArea) The polygon encloses no area
    #[error("(ZeroArea) {face} encloses no area")]
    ZeroArea { face: FaceId },
}

/// Failures of the commit step
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FoldError {
    #[error("fold animation targets {expected} but was committed to {found}")]
    PaperMismatch { expected: PaperId, found: PaperId },
}
