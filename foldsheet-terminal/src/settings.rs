/// Host settings read from a TOML file
use std::path::Path;

use anyhow::{Context, Result};
use foldsheet_core::{Color, FoldConfig, PaperStyle};
use nalgebra::Vector2;
use serde::Deserialize;

/// Paper proportions offered by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aspect {
    #[default]
    A4,
    Square,
}

impl Aspect {
    /// Width over height of the portrait sheet.
    pub fn ratio(self) -> f64 {
        match self {
            Aspect::A4 => 210.0 / 297.0,
            Aspect::Square => 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PaperSettings {
    pub aspect: Aspect,
    /// Largest share of the viewport the sheet may cover along either axis.
    pub screen_fraction: f64,
    pub color: Option<Color>,
}

impl Default for PaperSettings {
    fn default() -> Self {
        Self {
            aspect: Aspect::A4,
            screen_fraction: 0.6,
            color: None,
        }
    }
}

impl PaperSettings {
    pub fn style(&self) -> PaperStyle {
        self.color.map(PaperStyle::from_front).unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FrameSettings {
    pub fps: u32,
    /// Upper bound on the time step fed to the fold animation.
    pub max_dt: f64,
}

impl Default for FrameSettings {
    fn default() -> Self {
        Self { fps: 30, max_dt: 0.033 }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub fold: FoldConfig,
    pub paper: PaperSettings,
    pub frame: FrameSettings,
    pub history_limit: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            fold: FoldConfig::default(),
            paper: PaperSettings::default(),
            frame: FrameSettings::default(),
            history_limit: 64,
        }
    }
}

impl Settings {
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read settings from {}", path.display()))?;
        Self::from_toml_str(&text).with_context(|| format!("invalid settings in {}", path.display()))
    }
}

/// Largest sheet of `aspect` fitting `fraction` of the viewport, turned to
/// landscape when the viewport is wider than tall.
pub fn fit_paper_size(viewport: Vector2<f64>, aspect: f64, fraction: f64) -> (f64, f64) {
    let max_w = viewport.x * fraction;
    let max_h = viewport.y * fraction;
    let portrait = viewport.y >= viewport.x;
    // Fit the sheet in its final orientation.
    let (fit_w, fit_h) = if portrait { (max_w, max_h) } else { (max_h, max_w) };
    let (w, h) = if fit_w / fit_h > aspect {
        (fit_h * aspect, fit_h)
    } else {
        (fit_w, fit_w / aspect)
    };
    if portrait {
        (w, h)
    } else {
        (h, w)
    }
}
