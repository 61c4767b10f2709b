use std::io::{self, Stdout};
use std::time::Duration;

use clap::Parser;
use crossterm::event::{DisableMouseCapture, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, terminal};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Layout};
use ratatui::style::{Color, Style};
use ratatui::widgets::Paragraph;
use ratatui::{Frame, Terminal};

use term_drag::components::{ChatPanel, DraggablePanel, ElementId, ModalDialog};
use term_drag::drivers::InputDriver;
use term_drag::drivers::console::ConsoleDriver;
use term_drag::drivers::mouse::PointerEvent;
use term_drag::event_loop::{ControlFlow, EventLoop};
use term_drag::geometry::Position;
use term_drag::log_buffer::{LogBuffer, set_global_log_buffer};
use term_drag::logging;
use term_drag::scene::Scene;
use term_drag::state::{PointerShape, set_hover_pointer};

const BACKDROP: &str = "c: chat   m: dialog   s: mouse capture   q: quit";

#[derive(Parser, Debug)]
#[command(
    name = "term-drag",
    version = env!("CARGO_PKG_VERSION"),
    about = "Drag floating panels around the terminal with the mouse"
)]
struct DemoCli {
    /// Start with mouse capture off. Drags still capture while they last.
    #[arg(long)]
    no_mouse_capture: bool,

    /// How long to wait for input before redrawing.
    #[arg(long = "poll-ms", value_name = "MILLIS", default_value_t = 16)]
    poll_ms: u64,

    /// Most verbose level shown in the status bar.
    #[arg(
        long = "log-level",
        value_name = "LEVEL",
        default_value_t = tracing::Level::DEBUG
    )]
    log_level: tracing::Level,
}

type DemoTerminal = Terminal<CrosstermBackend<Stdout>>;

fn main() -> io::Result<()> {
    let cli = DemoCli::parse();
    let logs = LogBuffer::default();
    set_global_log_buffer(logs.clone());
    logging::init(cli.log_level);

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    terminal::enable_raw_mode()?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut driver = ConsoleDriver::new();
    driver.set_mouse_capture(!cli.no_mouse_capture)?;
    let mut event_loop = EventLoop::new(driver, Duration::from_millis(cli.poll_ms.max(1)));
    let mut app = App::new(logs);

    let result = event_loop.run(|driver, event| app.step(&mut terminal, driver, event));

    let _ = event_loop.driver().set_pointer_shape(PointerShape::Default);
    terminal::disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    result
}

struct App {
    scene: Scene<ElementId>,
    chat: ChatPanel,
    dialog: ModalDialog,
    logs: LogBuffer,
}

impl App {
    fn new(logs: LogBuffer) -> Self {
        let mut scene = Scene::new();
        let mut dialog = ModalDialog::new();
        dialog.toggle(&mut scene);
        Self {
            scene,
            chat: ChatPanel::new(),
            dialog,
            logs,
        }
    }

    fn step(
        &mut self,
        terminal: &mut DemoTerminal,
        driver: &mut ConsoleDriver,
        event: Option<Event>,
    ) -> io::Result<ControlFlow> {
        let Some(event) = event else {
            terminal.draw(|frame| self.draw(frame))?;
            return Ok(ControlFlow::Continue);
        };
        match &event {
            Event::Key(key) => return self.handle_key(driver, key),
            Event::Mouse(_) => {
                if let Some(pointer) = PointerEvent::from_event(&event) {
                    self.handle_pointer(&pointer);
                    // Held back while a drag owns the surface; the event loop
                    // flushes whichever shape wins.
                    set_hover_pointer(self.hover_shape(pointer.position));
                }
            }
            _ => {}
        }
        Ok(ControlFlow::Continue)
    }

    fn handle_key(
        &mut self,
        driver: &mut ConsoleDriver,
        key: &KeyEvent,
    ) -> io::Result<ControlFlow> {
        match key.code {
            KeyCode::Char('q') => return Ok(ControlFlow::Quit),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Ok(ControlFlow::Quit);
            }
            KeyCode::Char('c') => {
                self.chat.toggle(&mut self.scene);
                tracing::debug!(visible = self.chat.panel().visible(), "chat toggled");
            }
            KeyCode::Char('m') => {
                self.dialog.toggle(&mut self.scene);
                tracing::debug!(visible = self.dialog.panel().visible(), "dialog toggled");
            }
            KeyCode::Char('s') => {
                let enabled = !driver.capture_preferred();
                driver.set_mouse_capture(enabled)?;
                tracing::info!(enabled, "mouse capture preference changed");
            }
            _ => {}
        }
        Ok(ControlFlow::Continue)
    }

    fn handle_pointer(&mut self, event: &PointerEvent) -> bool {
        // The dialog paints above the chat bubble, so it sees presses first.
        self.dialog.handle_event(&mut self.scene, event)
            || self.chat.handle_event(&mut self.scene, event)
    }

    fn hover_shape(&self, point: Position) -> PointerShape {
        [self.dialog.panel().engine(), self.chat.panel().engine()]
            .into_iter()
            .find_map(|engine| engine.hover_cursor(&self.scene, point))
            .unwrap_or_default()
    }

    fn draw(&mut self, frame: &mut Frame) {
        let [main, status] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(frame.area());

        self.scene.set_layout(ElementId::Screen, main);
        self.chat.sync(&mut self.scene, main);
        self.dialog.sync(&mut self.scene, main);

        frame.render_widget(
            Paragraph::new(BACKDROP).style(Style::default().fg(Color::DarkGray)),
            main,
        );
        self.chat.render(frame, &self.scene);
        self.dialog.render(frame, &self.scene);

        let last = self.logs.last().unwrap_or_default();
        frame.render_widget(
            Paragraph::new(last).style(Style::default().fg(Color::Black).bg(Color::Gray)),
            status,
        );
    }
}
