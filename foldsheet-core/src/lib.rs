/// foldsheet core library - paper fold geometry engine
///
/// A sheet is a stack of planar polygon faces. Folding splits the stack
/// along a hinge line, turns one half over onto the other and stacks it on
/// top. Rendering, sensing and input live outside this crate.
pub mod config;
pub mod desk;
pub mod error;
pub mod fold;
pub mod geometry;
pub mod history;
pub mod ids;
pub mod math;
pub mod paper;
pub mod transform;

// Re-export commonly used types
pub use config::FoldConfig;
pub use desk::Desk;
pub use error::{FoldError, ValidationError};
pub use fold::{build_fold_anim, commit_fold, FoldAnim, FoldBuild, FoldSide, MovingFace, SkipReason};
pub use geometry::{Face, FaceStack, Side};
pub use hit_test::{hit_test_paper, pick_face};
pub use history::History;
pub use ids::{FaceId, IdFactory, PaperId};
pub use math::Easing;
pub use paper::{Color, Paper, PaperSnapshot, PaperStyle};
pub use transform::{HingeLine, Transform};
