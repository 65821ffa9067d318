/// foldsheet terminal - fold paper sheets on a character grid
///
/// Controls:
///   - Arrow keys: move the hinge, R: turn it 15°
///   - T: toggle which side folds, F/Enter/Space: fold
///   - U/Y: undo/redo, X: reset the sheet
///   - [ / ]: turn the sheet, N: new sheet, Tab: next sheet
///   - Q/ESC: quit
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use foldsheet_terminal::{Settings, TerminalApp};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "foldsheet-terminal", version, about = "Fold paper sheets in the terminal")]
struct Args {
    /// TOML settings file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Where log output goes; the terminal itself is used for drawing
    #[arg(long, default_value = "foldsheet.log")]
    log_file: PathBuf,

    /// Target frames per second, overrides the settings file
    #[arg(long)]
    fps: Option<u32>,
}

fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("foldsheet=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_file)?;

    let mut settings = match &args.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    if let Some(fps) = args.fps {
        settings.frame.fps = fps;
    }
    tracing::info!(?settings, "starting");

    let mut app = TerminalApp::new(settings)?;
    app.run()
}
