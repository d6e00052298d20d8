#![forbid(unsafe_code)]

//! Elm-style program runtime.
//!
//! A [`Model`] owns application state. Terminal events are converted into
//! the model's message type and passed to [`Model::update`], which returns a
//! [`Cmd`] describing side effects. After updates the runtime calls
//! [`Model::view`] and presents the frame.
//!
//! # Tasks
//!
//! [`Cmd::Task`] runs a blocking closure on a spawned thread. Its return
//! value comes back over a channel and is fed to `update` on the UI thread,
//! so every message is applied to completion before the next one.
//!
//! # Example
//!
//! ```ignore
//! struct Counter { value: i32 }
//!
//! enum Msg { Increment, Quit }
//!
//! impl From<Event> for Msg {
//!     fn from(event: Event) -> Self {
//!         match event {
//!             Event::Key(k) if k.is_char('q') => Msg::Quit,
//!             _ => Msg::Increment,
//!         }
//!     }
//! }
//!
//! impl Model for Counter {
//!     type Message = Msg;
//!
//!     fn update(&mut self, msg: Msg) -> Cmd<Msg> {
//!         match msg {
//!             Msg::Increment => { self.value += 1; Cmd::none() }
//!             Msg::Quit => Cmd::quit(),
//!         }
//!     }
//!
//!     fn view(&self, frame: &mut Frame) {}
//! }
//! ```

use std::io::{self, Stdout};
use std::sync::mpsc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use tracing::{debug, debug_span, error, info_span};
use typeahead_core::event::Event;
use typeahead_core::terminal_session::{SessionOptions, TerminalSession};
use typeahead_render::frame::Frame;
use typeahead_render::presenter::Presenter;

/// Application state and behavior.
pub trait Model: Sized {
    /// The message type for this model.
    ///
    /// Must be convertible from terminal events, and sendable so background
    /// tasks can produce it.
    type Message: From<Event> + Send + 'static;

    /// Startup commands. Called once before the first render.
    fn init(&mut self) -> Cmd<Self::Message> {
        Cmd::none()
    }

    /// The state transition function.
    fn update(&mut self, msg: Self::Message) -> Cmd<Self::Message>;

    /// Render the current state.
    fn view(&self, frame: &mut Frame);

    /// Whether [`Event::Tick`] changed what [`Model::view`] draws. Models that
    /// animate only some of the time return `false` while idle.
    fn redraw_on_tick(&self) -> bool {
        true
    }
}

/// Metadata attached to a background task.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskSpec {
    /// Optional task name for diagnostics.
    pub name: Option<String>,
}

impl TaskSpec {
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Side effects returned from `init()` and `update()`.
#[derive(Default)]
pub enum Cmd<M> {
    /// No operation.
    #[default]
    None,
    /// Quit the application.
    Quit,
    /// Execute multiple commands (sequentially, stopping after a quit).
    Batch(Vec<Cmd<M>>),
    /// Execute commands in order.
    Sequence(Vec<Cmd<M>>),
    /// Send a message to the model.
    Msg(M),
    /// Deliver `Event::Tick` at this interval.
    Tick(Duration),
    /// Run a blocking closure on a background thread; its return value is
    /// sent back to `update()`.
    Task(TaskSpec, Box<dyn FnOnce() -> M + Send>),
}

impl<M: std::fmt::Debug> std::fmt::Debug for Cmd<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "None"),
            Self::Quit => write!(f, "Quit"),
            Self::Batch(cmds) => f.debug_tuple("Batch").field(cmds).finish(),
            Self::Sequence(cmds) => f.debug_tuple("Sequence").field(cmds).finish(),
            Self::Msg(m) => f.debug_tuple("Msg").field(m).finish(),
            Self::Tick(d) => f.debug_tuple("Tick").field(d).finish(),
            Self::Task(spec, _) => f.debug_struct("Task").field("spec", spec).finish(),
        }
    }
}

impl<M> Cmd<M> {
    #[inline]
    pub fn none() -> Self {
        Self::None
    }

    #[inline]
    pub fn quit() -> Self {
        Self::Quit
    }

    #[inline]
    pub fn msg(m: M) -> Self {
        Self::Msg(m)
    }

    #[inline]
    pub fn tick(duration: Duration) -> Self {
        Self::Tick(duration)
    }

    /// Create a batch, collapsing empty and single-element batches.
    pub fn batch(mut cmds: Vec<Self>) -> Self {
        match cmds.len() {
            0 => Self::None,
            1 => cmds.pop().unwrap_or(Self::None),
            _ => Self::Batch(cmds),
        }
    }

    /// Create a sequence, collapsing empty and single-element sequences.
    pub fn sequence(mut cmds: Vec<Self>) -> Self {
        match cmds.len() {
            0 => Self::None,
            1 => cmds.pop().unwrap_or(Self::None),
            _ => Self::Sequence(cmds),
        }
    }

    /// Create a named background task command.
    pub fn task_named<F>(name: impl Into<String>, f: F) -> Self
    where
        F: FnOnce() -> M + Send + 'static,
    {
        Self::Task(TaskSpec::default().with_name(name), Box::new(f))
    }

    /// Whether this command does nothing.
    #[inline]
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Return a stable name for tracing.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Quit => "Quit",
            Self::Batch(_) => "Batch",
            Self::Sequence(_) => "Sequence",
            Self::Msg(_) => "Msg",
            Self::Tick(_) => "Tick",
            Self::Task(..) => "Task",
        }
    }
}

/// Runtime configuration.
#[derive(Debug, Clone)]
pub struct ProgramConfig {
    /// Use the alternate screen buffer.
    pub alternate_screen: bool,
    /// Enable mouse capture.
    pub mouse: bool,
    /// Enable bracketed paste.
    pub bracketed_paste: bool,
    /// Report focus gained/lost.
    pub focus_events: bool,
    /// Input poll timeout when no tick is scheduled.
    pub poll_timeout: Duration,
}

impl Default for ProgramConfig {
    fn default() -> Self {
        Self {
            alternate_screen: false,
            mouse: false,
            bracketed_paste: true,
            focus_events: true,
            poll_timeout: Duration::from_millis(50),
        }
    }
}

impl ProgramConfig {
    /// Alternate-screen configuration.
    pub fn fullscreen() -> Self {
        Self {
            alternate_screen: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_mouse(mut self, enabled: bool) -> Self {
        self.mouse = enabled;
        self
    }

    fn session_options(&self) -> SessionOptions {
        SessionOptions {
            alternate_screen: self.alternate_screen,
            mouse_capture: self.mouse,
            bracketed_paste: self.bracketed_paste,
            focus_events: self.focus_events,
        }
    }
}

/// The terminal program runtime.
pub struct Program<M: Model> {
    model: M,
    session: TerminalSession,
    presenter: Presenter<Stdout>,
    config: ProgramConfig,
    running: bool,
    dirty: bool,
    width: u16,
    height: u16,
    tick_rate: Option<Duration>,
    last_tick: Instant,
    task_sender: mpsc::Sender<M::Message>,
    task_receiver: mpsc::Receiver<M::Message>,
    task_handles: Vec<JoinHandle<()>>,
}

impl<M: Model> Program<M> {
    /// Enter the terminal session and prepare the model.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be configured.
    pub fn with_config(model: M, config: ProgramConfig) -> io::Result<Self> {
        let session = TerminalSession::new(config.session_options())?;
        let (width, height) = session.size()?;
        let (task_sender, task_receiver) = mpsc::channel();
        Ok(Self {
            model,
            session,
            presenter: Presenter::new(io::stdout()),
            config,
            running: true,
            dirty: true,
            width,
            height,
            tick_rate: None,
            last_tick: Instant::now(),
            task_sender,
            task_receiver,
            task_handles: Vec::new(),
        })
    }

    /// Run until the model returns [`Cmd::Quit`].
    pub fn run(&mut self) -> io::Result<()> {
        let result = self.run_event_loop();
        let restored = self.presenter.restore();
        result.and(restored)
    }

    fn run_event_loop(&mut self) -> io::Result<()> {
        let cmd = {
            let _span = info_span!("typeahead.program.init").entered();
            self.model.init()
        };
        self.execute_cmd(cmd);

        // The initial size is delivered like any other resize.
        self.dispatch(Event::Resize {
            width: self.width,
            height: self.height,
        });
        self.render_frame()?;

        while self.running {
            let timeout = self.effective_timeout();
            if self.session.poll_event(timeout)? {
                loop {
                    if let Some(event) = self.session.read_event()? {
                        self.handle_event(event);
                    }
                    if !self.running || !self.session.poll_event(Duration::ZERO)? {
                        break;
                    }
                }
            }

            self.process_task_results();
            self.reap_finished_tasks();

            if self.should_tick() {
                self.last_tick = Instant::now();
                let was_dirty = self.dirty;
                self.dispatch(Event::Tick);
                self.dirty = was_dirty || self.model.redraw_on_tick();
            }

            if self.dirty && self.running {
                self.render_frame()?;
            }
        }
        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        if let Event::Resize { width, height } = event {
            self.width = width;
            self.height = height;
            self.presenter.invalidate();
        }
        self.dispatch(event);
    }

    fn dispatch(&mut self, event: Event) {
        let msg_type = event_name(&event);
        let msg = M::Message::from(event);
        self.update_with_span(msg_type, msg);
    }

    fn update_with_span(&mut self, msg_type: &'static str, msg: M::Message) {
        let cmd = {
            let _span = debug_span!(
                "typeahead.program.update",
                msg_type,
                duration_us = tracing::field::Empty,
                cmd_type = tracing::field::Empty
            )
            .entered();
            let start = Instant::now();
            let cmd = self.model.update(msg);
            tracing::Span::current().record("duration_us", start.elapsed().as_micros() as u64);
            tracing::Span::current().record("cmd_type", cmd.type_name());
            cmd
        };
        self.dirty = true;
        self.execute_cmd(cmd);
    }

    fn process_task_results(&mut self) {
        while let Ok(msg) = self.task_receiver.try_recv() {
            self.update_with_span("task", msg);
        }
    }

    fn execute_cmd(&mut self, cmd: Cmd<M::Message>) {
        match cmd {
            Cmd::None => {}
            Cmd::Quit => self.running = false,
            Cmd::Msg(m) => self.update_with_span("msg", m),
            Cmd::Batch(cmds) | Cmd::Sequence(cmds) => {
                for c in cmds {
                    self.execute_cmd(c);
                    if !self.running {
                        break;
                    }
                }
            }
            Cmd::Tick(duration) => {
                self.tick_rate = Some(duration);
                self.last_tick = Instant::now();
            }
            Cmd::Task(spec, f) => {
                debug!(task = spec.name.as_deref().unwrap_or("anonymous"), "spawning task");
                let sender = self.task_sender.clone();
                let handle = std::thread::spawn(move || {
                    let msg = f();
                    let _ = sender.send(msg);
                });
                self.task_handles.push(handle);
            }
        }
    }

    fn reap_finished_tasks(&mut self) {
        if self.task_handles.is_empty() {
            return;
        }

        let mut remaining = Vec::with_capacity(self.task_handles.len());
        for handle in self.task_handles.drain(..) {
            if handle.is_finished() {
                if let Err(payload) = handle.join() {
                    let msg = if let Some(s) = payload.downcast_ref::<&str>() {
                        (*s).to_owned()
                    } else if let Some(s) = payload.downcast_ref::<String>() {
                        s.clone()
                    } else {
                        "unknown panic payload".to_owned()
                    };
                    error!("spawned task panicked: {msg}");
                }
            } else {
                remaining.push(handle);
            }
        }
        self.task_handles = remaining;
    }

    fn effective_timeout(&self) -> Duration {
        match self.tick_rate {
            Some(rate) => rate
                .saturating_sub(self.last_tick.elapsed())
                .min(self.config.poll_timeout),
            None => self.config.poll_timeout,
        }
    }

    fn should_tick(&self) -> bool {
        self.tick_rate
            .is_some_and(|rate| self.last_tick.elapsed() >= rate)
    }

    fn render_frame(&mut self) -> io::Result<()> {
        let mut frame = Frame::new(self.width, self.height);
        self.model.view(&mut frame);
        self.presenter.present(&frame)?;
        self.dirty = false;
        Ok(())
    }
}

fn event_name(event: &Event) -> &'static str {
    match event {
        Event::Key(_) => "Key",
        Event::Mouse(_) => "Mouse",
        Event::Resize { .. } => "Resize",
        Event::Paste(_) => "Paste",
        Event::Focus(_) => "Focus",
        Event::Tick => "Tick",
    }
}
