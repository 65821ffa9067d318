/// Terminal host for folding paper on a character grid
use anyhow::{Context, Result};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use foldsheet_core::{HingeLine, Transform};
use nalgebra::Vector2;
use std::io::{stdout, Write};
use std::time::{Duration, Instant};
use tracing::info;

pub mod renderer;
pub mod session;
pub mod settings;

pub use renderer::AsciiRenderer;
pub use session::{Command, Hinge, Session};
pub use settings::Settings;

use renderer::CELL_ASPECT;

/// Hinge nudge per arrow press, in screen units.
const HINGE_STEP: f64 = 2.0;
const HINGE_TURN_DEGREES: f64 = 15.0;
const PAPER_TURN_DEGREES: f64 = 5.0;

/// Map a key press to a session command.
pub fn command_for(code: KeyCode) -> Option<Command> {
    let command = match code {
        KeyCode::Char('q') | KeyCode::Esc => Command::Quit,
        KeyCode::Up => Command::MoveHinge(Vector2::new(0.0, -HINGE_STEP * CELL_ASPECT)),
        KeyCode::Down => Command::MoveHinge(Vector2::new(0.0, HINGE_STEP * CELL_ASPECT)),
        KeyCode::Left => Command::MoveHinge(Vector2::new(-HINGE_STEP, 0.0)),
        KeyCode::Right => Command::MoveHinge(Vector2::new(HINGE_STEP, 0.0)),
        KeyCode::Char('r') => Command::TurnHinge(HINGE_TURN_DEGREES.to_radians()),
        KeyCode::Char('t') => Command::ToggleSide,
        KeyCode::Char('f') | KeyCode::Char(' ') | KeyCode::Enter => Command::Fold,
        KeyCode::Char('u') => Command::Undo,
        KeyCode::Char('y') => Command::Redo,
        KeyCode::Char('x') => Command::Reset,
        KeyCode::Char('[') => Command::TurnPaper(-PAPER_TURN_DEGREES.to_radians()),
        KeyCode::Char(']') => Command::TurnPaper(PAPER_TURN_DEGREES.to_radians()),
        KeyCode::Char('n') => Command::AddPaper,
        KeyCode::Tab => Command::CycleActive,
        _ => return None,
    };
    Some(command)
}

/// Screen-unit size of a `cols × rows` terminal.
pub fn viewport_for(cols: u16, rows: u16) -> Vector2<f64> {
    Vector2::new(cols as f64, rows as f64 * CELL_ASPECT)
}

/// Main application struct for the terminal host
pub struct TerminalApp {
    session: Session,
    renderer: AsciiRenderer,
    fps_target: u32,
    last_frame: Instant,
    last_fps_sample: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(settings: Settings) -> Result<Self> {
        let (width, height) = terminal::size().context("failed to query terminal size")?;
        let fps_target = settings.frame.fps.max(1);
        // Bottom row is the status line.
        let rows = height.saturating_sub(1);
        let now = Instant::now();

        Ok(Self {
            session: Session::new(settings, viewport_for(width, rows)),
            renderer: AsciiRenderer::new(width as usize, rows as usize),
            fps_target,
            last_frame: now,
            last_fps_sample: now,
            frame_count: 0,
            fps: 0.0,
        })
    }

    pub fn run(&mut self) -> Result<()> {
        terminal::enable_raw_mode().context("failed to enable raw mode")?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)
            .context("failed to enter alternate screen")?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode().context("failed to restore terminal mode")?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)
            .context("failed to leave alternate screen")?;

        result
    }

    fn main_loop(&mut self) -> Result<()> {
        let target_frame_time = Duration::from_millis(1000 / self.fps_target as u64);
        info!(fps = self.fps_target, "frame loop started");

        while self.session.is_running() {
            let frame_start = Instant::now();

            // Input phase
            while event::poll(Duration::from_millis(0))? {
                self.handle_event(event::read()?);
            }

            // Build and advance/commit phases
            let dt = (frame_start - self.last_frame).as_secs_f64();
            self.last_frame = frame_start;
            self.session.step(dt);

            // Render phase
            self.render()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_fps_sample).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_fps_sample).as_secs_f32();
                self.frame_count = 0;
                self.last_fps_sample = now;
            }
        }

        info!("frame loop stopped");
        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(KeyEvent { code, kind, .. }) if kind != KeyEventKind::Release => {
                if let Some(command) = command_for(code) {
                    self.session.apply(command);
                }
            }
            Event::Resize(width, height) => {
                let rows = height.saturating_sub(1);
                self.session.resize(viewport_for(width, rows));
                self.renderer.resize(width as usize, rows as usize);
            }
            _ => {}
        }
    }

    fn render(&mut self) -> Result<()> {
        self.renderer.clear();
        self.renderer.render_desk(self.session.desk(), self.session.anim());
        let hinge = match self.session.anim() {
            Some(anim) => self.session.desk().get(anim.paper_id()).map(|paper| {
                let line = anim.line();
                let a = Transform::local_to_screen(paper, line.point);
                let b = Transform::local_to_screen(paper, line.point + line.dir);
                HingeLine::new(a, b - a)
            }),
            None => Some(self.session.hinge().line()),
        };
        if let Some(line) = hinge {
            self.renderer.render_hinge(&line);
        }

        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;
        self.renderer.draw(&mut stdout)?;

        let undo_steps = self
            .session
            .desk()
            .active_id()
            .and_then(|id| self.session.history(id))
            .map_or(0, |h| h.undo_len());
        let state = if self.session.is_animating() { "folding" } else { "ready" };

        // Draw status line
        queue!(
            stdout,
            cursor::MoveTo(0, self.renderer.height() as u16),
            terminal::Clear(ClearType::CurrentLine),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "foldsheet | FPS: {:.1} | {} | side: {:?} | papers: {} | undo: {} | Arrows/R=Hinge T=Side F=Fold U/Y=Undo/Redo X=Reset [/]=Turn N=New Tab=Next Q=Quit",
                self.fps,
                state,
                self.session.hinge().side,
                self.session.desk().len(),
                undo_steps,
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}
