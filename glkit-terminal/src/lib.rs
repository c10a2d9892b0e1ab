//! Terminal front end: renders the glkit demo scenes as ASCII art.
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use glkit_core::stl::{load_stl, normalize_mesh, StlError};
use glkit_core::{AnimationClock, Mesh, Viewport};
use std::io::{self, stdout, Write};
use std::path::Path;
use std::time::{Duration, Instant};

pub mod cli;
pub mod config;
pub mod logging;
pub mod renderer;
pub mod scene;

pub use config::{ConfigError, DemoConfig, DemoKind};
pub use renderer::AsciiRenderer;
pub use scene::{Scene, ShadingScene, TriforceScene};

/// Rows taken by the status line above the frame.
const STATUS_ROWS: u16 = 1;

/// Builds the scene `config.demo` names. The shading demo shows `mesh` when
/// given, otherwise a cube.
pub fn build_scene(config: &DemoConfig, mesh: Option<&Path>) -> Result<Box<dyn Scene>, StlError> {
    match config.demo {
        DemoKind::Triforce => {
            if mesh.is_some() {
                log::warn!("--mesh is only used by the shading demo");
            }
            Ok(Box::new(TriforceScene::new(config.degrees_per_second)))
        }
        DemoKind::Shading => {
            let subject = match mesh {
                Some(path) => {
                    let mut mesh = load_stl(path)?;
                    normalize_mesh(&mut mesh, config.mesh_size);
                    mesh
                }
                None => Mesh::cube(config.mesh_size),
            };
            Ok(Box::new(ShadingScene::new(config, subject)))
        }
    }
}

/// What a key press asks the app to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    ToggleAnimation,
    ResetAnimation,
}

pub fn action_for(code: KeyCode) -> Option<Action> {
    match code {
        KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
        KeyCode::Char(' ') => Some(Action::ToggleAnimation),
        KeyCode::Char('r') => Some(Action::ResetAnimation),
        _ => None,
    }
}

/// Animation clock at time zero, paused when the config asks for it.
pub fn start_clock(config: &DemoConfig) -> AnimationClock {
    let mut clock = AnimationClock::new(0.0);
    if config.start_paused {
        clock.set_active(false, 0.0);
    }
    clock
}

/// Main application struct for terminal rendering
pub struct TerminalApp {
    scene: Box<dyn Scene>,
    renderer: AsciiRenderer,
    clock: AnimationClock,
    epoch: Instant,
    frame_time: Duration,
    running: bool,
    last_sample: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(scene: Box<dyn Scene>, config: &DemoConfig) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        let viewport = Viewport::new(width as u32, height.saturating_sub(STATUS_ROWS) as u32)
            .with_pixel_aspect(config.cell_aspect);

        Ok(Self {
            scene,
            renderer: AsciiRenderer::new(viewport),
            clock: start_clock(config),
            epoch: Instant::now(),
            frame_time: config.frame_time(),
            running: true,
            last_sample: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;
        log::info!("running the {} demo", self.scene.name());

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn now(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64()
    }

    fn main_loop(&mut self) -> io::Result<()> {
        while self.running {
            let frame_start = Instant::now();

            while event::poll(Duration::from_millis(0))? {
                self.handle_event(event::read()?);
            }

            self.render()?;

            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < self.frame_time {
                std::thread::sleep(self.frame_time - elapsed);
            }

            let since = self.last_sample.elapsed();
            if since.as_secs() >= 1 {
                self.fps = self.frame_count as f32 / since.as_secs_f32();
                self.frame_count = 0;
                self.last_sample = Instant::now();
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press,
                ..
            }) => {
                if let Some(action) = action_for(code) {
                    self.apply(action);
                }
            }
            Event::Resize(width, height) => {
                log::debug!("terminal resized to {}x{}", width, height);
                self.renderer
                    .resize(width as u32, height.saturating_sub(STATUS_ROWS) as u32);
            }
            _ => {}
        }
    }

    fn apply(&mut self, action: Action) {
        let now = self.now();
        match action {
            Action::Quit => self.running = false,
            Action::ToggleAnimation => self.clock.toggle(now),
            Action::ResetAnimation => self.clock.reset(now),
        }
    }

    fn render(&mut self) -> io::Result<()> {
        let time = self.clock.time(self.now()) as f32;

        self.renderer.clear();
        self.scene.render(&mut self.renderer, time);

        let mut stdout = stdout();
        self.renderer.draw(&mut stdout, STATUS_ROWS)?;

        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            terminal::Clear(ClearType::CurrentLine),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "glkit {} | FPS: {:.1} | t = {:.1}s{} | Space=Pause R=Reset Q=Quit",
                self.scene.name(),
                self.fps,
                time,
                if self.clock.is_active() { "" } else { " (paused)" },
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}
