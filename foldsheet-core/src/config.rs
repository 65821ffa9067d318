/// Fold tuning defaults.
use serde::{Deserialize, Serialize};

use crate::math::Easing;

/// Animation and classification constants of the fold engine.
///
/// Duration and easing are UX tuning values; `epsilon` is the distance
/// below which a vertex counts as lying on the hinge line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FoldConfig {
    pub duration_seconds: f64,
    pub easing: Easing,
    pub epsilon: f64,
}

impl FoldConfig {
    pub const DEFAULT_DURATION_SECONDS: f64 = 0.6;
    pub const DEFAULT_EPSILON: f64 = 1e-6;
}

impl Default for FoldConfig {
    fn default() -> Self {
        Self {
            duration_seconds: Self::DEFAULT_DURATION_SECONDS,
            easing: Easing::default(),
            epsilon: Self::DEFAULT_EPSILON,
        }
    }
}
