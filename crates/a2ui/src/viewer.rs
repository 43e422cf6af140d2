use a2ui_core::{
    ActionEvent, Connection, Delivery, MessageSource, Phase, Renderer, RendererOptions,
};
use a2ui_widgets::chrome::focus_block;
use a2ui_widgets::{KeyOutcome, StatusBar, SurfaceView, ViewState};
use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle,
};
use crossterm::{cursor, execute};
use futures::StreamExt;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Layout};
use ratatui::style::{Color, Style};
use ratatui::text::Span;
use ratatui::{Frame, Terminal};
use std::io::{stdout, Stdout};
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};
use tokio::time::MissedTickBehavior;

/// Errors that can occur while setting up or running a [`Viewer`].
#[derive(Debug, thiserror::Error)]
pub enum ViewerError {
    /// An I/O error from terminal setup, drawing, input, or teardown.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// The log subscriber could not be installed.
    #[error("failed to install logger: {0}")]
    Logging(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),
}

/// Configuration options for a [`Viewer`].
///
/// Use struct update syntax to override only the options you need:
///
/// ```
/// use a2ui::ViewerOptions;
///
/// let options = ViewerOptions {
///     title: Some("restaurants".into()),
///     fps: 60,
///     ..ViewerOptions::default()
/// };
/// assert!(options.status_bar);
/// ```
#[derive(Debug, Clone)]
pub struct ViewerOptions {
    /// Title shown on the surface border and the terminal window.
    pub title: Option<String>,
    /// Show the one-row status bar (default: true).
    pub status_bar: bool,
    /// Redraw rate cap in frames per second (default: 30, clamped to 1..=120).
    pub fps: u32,
    /// Log to this file through [`log_to_file`](crate::logging::log_to_file)
    /// when the viewer starts.
    pub log_file: Option<PathBuf>,
    /// Restore the terminal before a panic message is printed (default: true).
    pub catch_panics: bool,
    pub renderer: RendererOptions,
}

impl Default for ViewerOptions {
    fn default() -> Self {
        Self {
            title: None,
            status_bar: true,
            fps: 30,
            log_file: None,
            catch_panics: true,
            renderer: RendererOptions::default(),
        }
    }
}

/// A full-screen terminal host for one surface.
///
/// The viewer owns a [`Renderer`] and feeds it from an inbox. Stream sources
/// are attached with [`connect`](Viewer::connect); each runs on its own task
/// and forwards into the inbox, so the renderer is only ever touched by the
/// task running [`run`](Viewer::run). Key presses on the painted surface go
/// back to the renderer as interactions and come out as actions.
///
/// # Example
///
/// ```rust,ignore
/// use a2ui::{sources::JsonLines, Viewer, ViewerOptions};
/// use tokio::io::BufReader;
///
/// let mut viewer = Viewer::new(ViewerOptions::default());
/// viewer.connect(JsonLines::new(BufReader::new(tokio::io::stdin())));
/// viewer.on_action(|event| eprintln!("{}", event.to_value()));
/// viewer.run().await?;
/// ```
pub struct Viewer {
    renderer: Renderer,
    view: ViewState,
    inbox_tx: mpsc::UnboundedSender<Delivery>,
    inbox_rx: mpsc::UnboundedReceiver<Delivery>,
    connections: Vec<Connection>,
    options: ViewerOptions,
    last_action: Option<String>,
    last_error: Option<String>,
    needs_redraw: bool,
    should_quit: bool,
}

impl Viewer {
    pub fn new(options: ViewerOptions) -> Self {
        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();
        Self {
            renderer: Renderer::with_options(options.renderer.clone()),
            view: ViewState::new(),
            inbox_tx,
            inbox_rx,
            connections: Vec::new(),
            options,
            last_action: None,
            last_error: None,
            needs_redraw: true,
            should_quit: false,
        }
    }

    /// Spawn `source` and forward its deliveries into the inbox.
    ///
    /// Must be called within a tokio runtime.
    pub fn connect<S: MessageSource>(&mut self, source: S) -> &Connection {
        let connection = a2ui_core::connect(source, self.inbox_tx.clone());
        self.connections.push(connection);
        &self.connections[self.connections.len() - 1]
    }

    /// A sender for injecting deliveries directly.
    pub fn sender(&self) -> mpsc::UnboundedSender<Delivery> {
        self.inbox_tx.clone()
    }

    /// Register the action sink, replacing any previous one.
    pub fn on_action(&mut self, sink: impl FnMut(&ActionEvent) + Send + 'static) {
        self.renderer.on_action(sink);
    }

    /// Observe actions without owning the sink.
    pub fn subscribe_actions(&self) -> broadcast::Receiver<ActionEvent> {
        self.renderer.subscribe_actions()
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    pub fn view_state(&self) -> &ViewState {
        &self.view
    }

    pub fn last_action(&self) -> Option<&str> {
        self.last_action.as_deref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Apply one inbox delivery.
    pub fn handle_delivery(&mut self, delivery: Delivery) {
        match delivery {
            Ok(message) => {
                self.renderer.process(message);
                self.last_error = None;
            }
            Err(err) => {
                tracing::warn!(error = %err, "stream delivery failed");
                self.last_error = Some(err.to_string());
            }
        }
        self.view
            .sync(self.renderer.presented(), self.renderer.generation());
        self.needs_redraw = true;
    }

    /// Apply one terminal event.
    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Resize(..) => self.needs_redraw = true,
            _ => {}
        }
    }

    /// Handle a key press: quit keys first, then the surface.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        match (key.code, key.modifiers) {
            (KeyCode::Esc, _) => {
                self.should_quit = true;
                return;
            }
            (KeyCode::Char('c'), m) if m.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
                return;
            }
            (KeyCode::Char('q'), KeyModifiers::NONE) if !self.view.is_editing() => {
                self.should_quit = true;
                return;
            }
            _ => {}
        }

        let Some(root) = self.renderer.presented() else {
            return;
        };
        match self.view.handle_key(root, key) {
            KeyOutcome::Ignored => {}
            KeyOutcome::Consumed => self.needs_redraw = true,
            KeyOutcome::Interact { id, interaction } => {
                if let Some(event) = self.renderer.interact(&id, interaction) {
                    self.last_action = Some(format!("{} <- {}", event.name, event.component_id));
                    self.last_error = None;
                }
                self.needs_redraw = true;
            }
        }
    }

    /// Draw the surface and the status bar into `frame`.
    pub fn draw(&mut self, frame: &mut Frame) {
        let status_height = u16::from(self.options.status_bar);
        let [surface, status] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(status_height)])
                .areas(frame.area());

        let title = self.options.title.as_deref().unwrap_or("a2ui");
        let view = SurfaceView::new(self.renderer.presented())
            .generation(self.renderer.generation())
            .block(focus_block(title, self.renderer.phase() == Phase::Rendering));
        frame.render_stateful_widget(view, surface, &mut self.view);

        if self.options.status_bar {
            frame.render_widget(self.status_bar(), status);
        }
    }

    fn status_bar(&self) -> StatusBar<'_> {
        let phase = match self.renderer.phase() {
            Phase::Empty => "waiting",
            Phase::Rendering => "rendering",
        };
        let right = match (&self.last_error, &self.last_action) {
            (Some(err), _) => Span::styled(err.as_str(), Style::default().fg(Color::Red)),
            (None, Some(action)) => Span::raw(action.as_str()),
            (None, None) => Span::raw("q quit · tab focus"),
        };
        StatusBar::new()
            .left(phase)
            .center(format!("generation {}", self.renderer.generation()))
            .right(right)
            .style(Style::default().bg(Color::DarkGray).fg(Color::White))
    }

    /// Take over the terminal and run until a quit key is pressed.
    ///
    /// Returns the viewer so callers can inspect the final state.
    pub async fn run(mut self) -> Result<Self, ViewerError> {
        self.init_logging()?;
        let mut terminal = init_terminal(&self.options)?;
        let result = self.event_loop(&mut terminal).await;
        restore_terminal()?;
        result.map(|()| self)
    }

    /// Install the file logger from [`ViewerOptions::log_file`] unless a
    /// global subscriber already exists, such as from an earlier run.
    fn init_logging(&self) -> Result<(), ViewerError> {
        let Some(path) = &self.options.log_file else {
            return Ok(());
        };
        if tracing::dispatcher::has_been_set() {
            tracing::debug!(path = %path.display(), "subscriber already installed");
            return Ok(());
        }
        crate::logging::log_to_file(path)
    }

    async fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    ) -> Result<(), ViewerError> {
        terminal.draw(|frame| self.draw(frame))?;
        self.needs_redraw = false;

        let fps = self.options.fps.clamp(1, 120);
        let mut frame_interval =
            tokio::time::interval(Duration::from_secs_f64(1.0 / f64::from(fps)));
        frame_interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut events = EventStream::new();

        while !self.should_quit {
            tokio::select! {
                event = events.next() => match event {
                    Some(Ok(event)) => self.handle_event(event),
                    Some(Err(err)) => return Err(err.into()),
                    None => break,
                },

                Some(delivery) = self.inbox_rx.recv() => {
                    self.handle_delivery(delivery);
                    while let Ok(delivery) = self.inbox_rx.try_recv() {
                        self.handle_delivery(delivery);
                    }
                }

                _ = frame_interval.tick() => {
                    if self.needs_redraw {
                        terminal.draw(|frame| self.draw(frame))?;
                        self.needs_redraw = false;
                    }
                }
            }
        }
        tracing::debug!("viewer shutting down");
        for connection in &self.connections {
            connection.close();
        }
        Ok(())
    }
}

impl Default for Viewer {
    fn default() -> Self {
        Self::new(ViewerOptions::default())
    }
}

impl std::fmt::Debug for Viewer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Viewer")
            .field("renderer", &self.renderer)
            .field("options", &self.options)
            .field("should_quit", &self.should_quit)
            .finish_non_exhaustive()
    }
}

fn init_terminal(options: &ViewerOptions) -> Result<Terminal<CrosstermBackend<Stdout>>, ViewerError> {
    // install once so repeated runs do not stack hooks
    if options.catch_panics {
        use std::sync::Once;
        static HOOK_INSTALLED: Once = Once::new();
        HOOK_INSTALLED.call_once(|| {
            let original_hook = std::panic::take_hook();
            std::panic::set_hook(Box::new(move |info| {
                let _ = restore_terminal();
                original_hook(info);
            }));
        });
    }

    enable_raw_mode()?;
    let mut writer = stdout();
    execute!(writer, EnterAlternateScreen)?;
    if let Some(ref title) = options.title {
        execute!(writer, SetTitle(title))?;
    }
    execute!(writer, cursor::Hide)?;

    let terminal = Terminal::new(CrosstermBackend::new(writer))?;
    Ok(terminal)
}

fn restore_terminal() -> Result<(), std::io::Error> {
    // best effort: keep going so as much state as possible is restored
    let raw = disable_raw_mode();
    let mut writer = stdout();
    execute!(writer, cursor::Show).ok();
    execute!(writer, LeaveAlternateScreen).ok();
    raw
}
