/// Terminal front end: crossterm input driving a glview session
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        MouseButton, MouseEvent, MouseEventKind,
    },
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use glview_core::{Command, EditMode, Mesh, ProjectionMode, Session, SessionConfig};
use nalgebra::{Matrix4, Point3};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};

pub mod logging;
pub mod renderer;

pub use renderer::{AsciiRenderer, DrawParams, Shading, Viewport};

/// Approximate pixel size of one terminal cell, used to scale mouse drags
const CELL_WIDTH_PX: f32 = 8.0;
const CELL_HEIGHT_PX: f32 = 16.0;
/// Drag distance of one arrow key press, in pixels
const ARROW_STEP_PX: f32 = 10.0;

/// Something the app does in response to a key
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    Apply(Command),
    Report,
    Quit,
}

/// Map a key to its action.
///
/// Bindings: `z`/`x` previous/next model, `o`/`p` orthographic/perspective,
/// `t`/`r`/`s` translate/rotate/scale, `e`/`c`/`u` eye/center/up, `k` light,
/// `j` shininess, `l` next light, `w` wireframe, `v` split view, `i` matrix
/// report, arrows drag, `+`/`-` scroll, `q`/Esc quit.
pub fn key_action(code: KeyCode) -> Option<Action> {
    let command = match code {
        KeyCode::Char('q') | KeyCode::Esc => return Some(Action::Quit),
        KeyCode::Char('i') => return Some(Action::Report),
        KeyCode::Char('z') => Command::PrevModel,
        KeyCode::Char('x') => Command::NextModel,
        KeyCode::Char('o') => Command::SetProjection(ProjectionMode::Orthographic),
        KeyCode::Char('p') => Command::SetProjection(ProjectionMode::Perspective),
        KeyCode::Char('t') => Command::SelectMode(EditMode::Translate),
        KeyCode::Char('r') => Command::SelectMode(EditMode::Rotate),
        KeyCode::Char('s') => Command::SelectMode(EditMode::Scale),
        KeyCode::Char('e') => Command::SelectMode(EditMode::Eye),
        KeyCode::Char('c') => Command::SelectMode(EditMode::Center),
        KeyCode::Char('u') => Command::SelectMode(EditMode::Up),
        KeyCode::Char('k') => Command::SelectMode(EditMode::Light),
        KeyCode::Char('j') => Command::SelectMode(EditMode::Shininess),
        KeyCode::Char('l') => Command::CycleLight,
        KeyCode::Char('w') => Command::ToggleWireframe,
        KeyCode::Char('v') => Command::ToggleSplit,
        KeyCode::Up => Command::Drag { dx: 0.0, dy: ARROW_STEP_PX },
        KeyCode::Down => Command::Drag { dx: 0.0, dy: -ARROW_STEP_PX },
        KeyCode::Left => Command::Drag { dx: -ARROW_STEP_PX, dy: 0.0 },
        KeyCode::Right => Command::Drag { dx: ARROW_STEP_PX, dy: 0.0 },
        KeyCode::Char('+') | KeyCode::Char('=') => Command::Scroll { dy: 1.0 },
        KeyCode::Char('-') => Command::Scroll { dy: -1.0 },
        _ => return None,
    };
    Some(Action::Apply(command))
}

/// Session viewport size for a terminal of `cols` x `rows` cells.
///
/// Cells are about twice as tall as they are wide, so rows count double.
pub fn viewport_size(cols: u16, rows: u16) -> (u32, u32) {
    (cols as u32, rows as u32 * 2)
}

/// Fixed character grid size; unset dimensions follow the terminal
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GridSize {
    pub cols: Option<u16>,
    pub rows: Option<u16>,
}

impl GridSize {
    /// Grid to render into for a terminal of `cols` x `rows` cells
    pub fn resolve(&self, cols: u16, rows: u16) -> (u16, u16) {
        (self.cols.unwrap_or(cols).max(1), self.rows.unwrap_or(rows).max(1))
    }
}

/// Main application struct for terminal 3D rendering
pub struct TerminalApp {
    meshes: Vec<Mesh>,
    ground: Mesh,
    session: Session,
    renderer: AsciiRenderer,
    grid: GridSize,
    show_report: bool,
    running: bool,
    drag_origin: Option<(u16, u16)>,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    /// One session model per mesh; an empty list shows a cube
    pub fn new(meshes: Vec<Mesh>, config: SessionConfig, grid: GridSize) -> io::Result<Self> {
        let (cols, rows) = terminal::size()?;
        Ok(Self::with_terminal_size(meshes, config, grid, cols, rows))
    }

    /// Build the app for a terminal of known size
    pub fn with_terminal_size(
        mut meshes: Vec<Mesh>,
        config: SessionConfig,
        grid: GridSize,
        cols: u16,
        rows: u16,
    ) -> Self {
        if meshes.is_empty() {
            meshes.push(Mesh::cube(2.0));
        }

        let (cols, rows) = grid.resolve(cols, rows);
        let (width, height) = viewport_size(cols, rows);
        let session = Session::new(
            meshes.len(),
            SessionConfig {
                width,
                height,
                ..config
            },
        );

        Self {
            meshes,
            ground: Mesh::ground_plane(),
            session,
            renderer: AsciiRenderer::new(cols as usize, rows as usize),
            grid,
            show_report: false,
            running: true,
            drag_origin: None,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Character grid the scene is rendered into
    pub fn grid_size(&self) -> (usize, usize) {
        (self.renderer.width(), self.renderer.height())
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            stdout(),
            terminal::EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide
        )?;

        let result = self.main_loop();

        // Cleanup
        execute!(
            stdout(),
            DisableMouseCapture,
            terminal::LeaveAlternateScreen,
            cursor::Show
        )?;
        terminal::disable_raw_mode()?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / 30); // 30 FPS target

        while self.running {
            let frame_start = Instant::now();

            // Drain pending input so the frame sees every edit
            while event::poll(Duration::from_millis(0))? {
                let event = event::read()?;
                self.handle_event(event)?;
            }

            self.render()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) -> io::Result<()> {
        match event {
            Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press,
                ..
            }) => match key_action(code) {
                Some(Action::Quit) => self.running = false,
                Some(Action::Report) => {
                    self.show_report = !self.show_report;
                    log::info!("matrix values:\n{}", self.session.report());
                }
                Some(Action::Apply(command)) => {
                    self.session.apply(command);
                }
                None => {}
            },
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Resize(cols, rows) => {
                let (cols, rows) = self.grid.resolve(cols, rows);
                self.renderer.resize(cols as usize, rows as usize);
                let (width, height) = viewport_size(cols, rows);
                self.session.apply(Command::Resize { width, height });
                execute!(stdout(), terminal::Clear(ClearType::All))?;
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        let position = (mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => self.drag_origin = Some(position),
            MouseEventKind::Up(MouseButton::Left) => self.drag_origin = None,
            MouseEventKind::Drag(MouseButton::Left) => {
                if let Some((col, row)) = self.drag_origin.replace(position) {
                    // Screen rows grow downward; drags are positive upward
                    let dx = (mouse.column as f32 - col as f32) * CELL_WIDTH_PX;
                    let dy = (row as f32 - mouse.row as f32) * CELL_HEIGHT_PX;
                    self.session.apply(Command::Drag { dx, dy });
                }
            }
            MouseEventKind::ScrollUp => {
                self.session.apply(Command::Scroll { dy: 1.0 });
            }
            MouseEventKind::ScrollDown => {
                self.session.apply(Command::Scroll { dy: -1.0 });
            }
            _ => {}
        }
    }

    fn render(&mut self) -> io::Result<()> {
        let frame = self.session.frame();
        let identity = Matrix4::identity();
        let eye = Point3::from(self.session.camera.eye);
        let mesh = &self.meshes[self.session.active_index()];

        // Clear renderer
        self.renderer.clear();

        let passes = self.session.shading_passes();
        let pane_width = self.renderer.width() / passes.len();
        for (i, &mode) in passes.iter().enumerate() {
            let viewport = Viewport {
                x: i * pane_width,
                width: pane_width,
            };
            let ground = DrawParams {
                mvp: &frame.ground,
                model: &identity,
                shading: Shading::Unlit,
                viewport,
                wireframe: false,
            };
            self.renderer.render_mesh(&self.ground, &ground);

            let model = DrawParams {
                mvp: &frame.mvp,
                model: &frame.model,
                shading: Shading::Lit {
                    lighting: &self.session.lighting,
                    eye,
                    mode,
                },
                viewport,
                wireframe: self.session.wireframe,
            };
            self.renderer.render_mesh(mesh, &model);
        }

        // Output to terminal
        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;

        self.renderer.draw(&mut stdout)?;

        // Draw UI overlay
        queue!(stdout, SetForegroundColor(Color::Yellow))?;
        for (row, line) in self.overlay_lines().iter().enumerate() {
            queue!(stdout, cursor::MoveTo(0, row as u16), Print(line))?;
        }
        queue!(stdout, ResetColor)?;

        stdout.flush()?;
        Ok(())
    }

    /// Text drawn over the scene: the status line, then the matrix report
    /// while it is toggled on with `i`
    pub fn overlay_lines(&self) -> Vec<String> {
        let mut lines = vec![self.status_line()];
        if self.show_report {
            lines.extend(self.session.report().lines().map(str::to_owned));
        }
        lines.truncate(self.renderer.height().max(1));
        lines
    }

    fn status_line(&self) -> String {
        let split = if self.session.split {
            " | per-vertex | per-fragment"
        } else {
            ""
        };
        format!(
            "glview | model {}/{} | edit: {} | {} | light: {} | FPS: {:.1}{}",
            self.session.active_index() + 1,
            self.session.model_count(),
            self.session.edit_mode,
            self.session.projection_mode,
            self.session.lighting.kind,
            self.fps,
            split
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    #[test]
    fn test_key_bindings() {
        assert_eq!(key_action(KeyCode::Char('q')), Some(Action::Quit));
        assert_eq!(key_action(KeyCode::Esc), Some(Action::Quit));
        assert_eq!(key_action(KeyCode::Char('i')), Some(Action::Report));
        assert_eq!(
            key_action(KeyCode::Char('o')),
            Some(Action::Apply(Command::SetProjection(ProjectionMode::Orthographic)))
        );
        assert_eq!(
            key_action(KeyCode::Char('k')),
            Some(Action::Apply(Command::SelectMode(EditMode::Light)))
        );
        assert_eq!(
            key_action(KeyCode::Up),
            Some(Action::Apply(Command::Drag { dx: 0.0, dy: ARROW_STEP_PX }))
        );
        assert_eq!(key_action(KeyCode::Char('?')), None);
    }

    fn app(grid: GridSize) -> TerminalApp {
        TerminalApp::with_terminal_size(Vec::new(), SessionConfig::default(), grid, 80, 40)
    }

    fn press(app: &mut TerminalApp, c: char) {
        let event = Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
        app.handle_event(event).unwrap();
    }

    #[test]
    fn test_report_key_toggles_overlay() {
        let mut app = app(GridSize::default());
        assert_eq!(app.overlay_lines().len(), 1);

        press(&mut app, 'i');
        let text = app.overlay_lines().join("\n");
        assert!(text.contains("Viewing Matrix"));
        assert!(text.contains("Projection Matrix"));

        press(&mut app, 'i');
        assert_eq!(app.overlay_lines().len(), 1);
    }

    #[test]
    fn test_grid_override() {
        let grid = GridSize {
            cols: Some(60),
            rows: None,
        };
        assert_eq!(grid.resolve(80, 24), (60, 24));
        assert_eq!(GridSize::default().resolve(80, 24), (80, 24));

        let mut app = app(GridSize {
            cols: Some(50),
            rows: Some(20),
        });
        assert_eq!(app.grid_size(), (50, 20));
        assert_eq!(app.session().viewport_size(), (50, 40));

        app.handle_event(Event::Resize(120, 30)).unwrap();
        assert_eq!(app.grid_size(), (50, 20));
    }

    #[test]
    fn test_viewport_size_doubles_rows() {
        assert_eq!(viewport_size(80, 24), (80, 48));
    }

    #[test]
    fn test_arrow_keys_drive_session() {
        let mut session = Session::new(1, SessionConfig::default());
        for code in [KeyCode::Right, KeyCode::Right, KeyCode::Down] {
            if let Some(Action::Apply(command)) = key_action(code) {
                session.apply(command);
            }
        }
        let position = session.active_model().position;
        assert!((position.x - 0.2).abs() < 1e-6);
        assert!((position.y + 0.1).abs() < 1e-6);
    }
}
