#![forbid(unsafe_code)]

//! Deterministic program simulator for testing.
//!
//! `ProgramSimulator` runs a [`Model`] without a terminal. Events can be
//! injected, messages sent directly, and frames captured as buffers.
//!
//! Background tasks either run inline as soon as they are issued
//! ([`TaskMode::Immediate`]) or are queued until the test resolves them
//! ([`TaskMode::Deferred`]), which lets tests deliver task results in any
//! order.
//!
//! # Example
//!
//! ```ignore
//! use typeahead_runtime::simulator::{ProgramSimulator, TaskMode};
//!
//! let mut sim = ProgramSimulator::new(app).with_task_mode(TaskMode::Deferred);
//! sim.init();
//! sim.inject_event(key('a'));
//! sim.inject_event(key('b'));
//! sim.run_pending_task(1); // "ab" resolves first
//! sim.run_pending_task(0); // then the stale "a"
//! let buf = sim.capture_frame(80, 24);
//! ```

use std::time::Duration;

use crate::program::{Cmd, Model, TaskSpec};
use typeahead_core::event::Event;
use typeahead_render::buffer::Buffer;
use typeahead_render::frame::Frame;

/// Record of a command that was executed during simulation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CmdRecord {
    None,
    Quit,
    /// Message sent to the model (not stored, just noted).
    Msg,
    Batch(usize),
    Sequence(usize),
    Tick(Duration),
    /// Background task issued, with its name.
    Task(Option<String>),
}

/// How the simulator handles [`Cmd::Task`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskMode {
    /// Run the closure inline and feed its result to `update` immediately.
    #[default]
    Immediate,
    /// Queue the closure until the test calls a `run_pending_*` method.
    Deferred,
}

type PendingTask<M> = (TaskSpec, Box<dyn FnOnce() -> M + Send>);

/// Deterministic simulator for [`Model`] testing.
pub struct ProgramSimulator<M: Model> {
    model: M,
    frames: Vec<Buffer>,
    command_log: Vec<CmdRecord>,
    running: bool,
    tick_rate: Option<Duration>,
    task_mode: TaskMode,
    pending: Vec<PendingTask<M::Message>>,
}

impl<M: Model> ProgramSimulator<M> {
    /// Create a new simulator with the given model.
    ///
    /// The model is not initialized until [`init`](Self::init) is called.
    pub fn new(model: M) -> Self {
        Self {
            model,
            frames: Vec::new(),
            command_log: Vec::new(),
            running: true,
            tick_rate: None,
            task_mode: TaskMode::default(),
            pending: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_task_mode(mut self, mode: TaskMode) -> Self {
        self.task_mode = mode;
        self
    }

    /// Call `Model::init()` and execute the returned commands.
    pub fn init(&mut self) {
        let cmd = self.model.init();
        self.execute_cmd(cmd);
    }

    /// Inject terminal events, each converted via `From<Event>`.
    pub fn inject_events(&mut self, events: &[Event]) {
        for event in events {
            if !self.running {
                break;
            }
            let msg = M::Message::from(event.clone());
            let cmd = self.model.update(msg);
            self.execute_cmd(cmd);
        }
    }

    pub fn inject_event(&mut self, event: Event) {
        self.inject_events(&[event]);
    }

    /// Deliver one [`Event::Tick`]. Returns whether a running program would
    /// redraw for it.
    pub fn tick(&mut self) -> bool {
        self.inject_event(Event::Tick);
        self.model.redraw_on_tick()
    }

    /// Send a specific message to the model.
    pub fn send(&mut self, msg: M::Message) {
        if !self.running {
            return;
        }
        let cmd = self.model.update(msg);
        self.execute_cmd(cmd);
    }

    /// Render `Model::view()` into a fresh frame and keep the buffer.
    pub fn capture_frame(&mut self, width: u16, height: u16) -> &Buffer {
        let mut frame = Frame::new(width, height);
        self.model.view(&mut frame);
        self.frames.push(frame.buffer);
        &self.frames[self.frames.len() - 1]
    }

    pub fn frames(&self) -> &[Buffer] {
        &self.frames
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// `false` after a `Cmd::Quit` has been executed.
    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn tick_rate(&self) -> Option<Duration> {
        self.tick_rate
    }

    pub fn command_log(&self) -> &[CmdRecord] {
        &self.command_log
    }

    /// Number of deferred tasks waiting to run.
    pub fn pending_task_count(&self) -> usize {
        self.pending.len()
    }

    /// Names of deferred tasks, in issue order.
    pub fn pending_task_names(&self) -> Vec<Option<&str>> {
        self.pending
            .iter()
            .map(|(spec, _)| spec.name.as_deref())
            .collect()
    }

    /// Run the deferred task at `index` (issue order) and feed its result to
    /// the model. Returns `false` if there is no such task.
    pub fn run_pending_task(&mut self, index: usize) -> bool {
        if index >= self.pending.len() {
            return false;
        }
        let (_, task) = self.pending.remove(index);
        self.send(task());
        true
    }

    /// Run every deferred task in issue order, including tasks issued while
    /// running them.
    pub fn run_pending_tasks(&mut self) {
        while !self.pending.is_empty() && self.running {
            self.run_pending_task(0);
        }
    }

    /// Drop deferred tasks without running them.
    pub fn discard_pending_tasks(&mut self) {
        self.pending.clear();
    }

    fn execute_cmd(&mut self, cmd: Cmd<M::Message>) {
        match cmd {
            Cmd::None => {
                self.command_log.push(CmdRecord::None);
            }
            Cmd::Quit => {
                self.running = false;
                self.command_log.push(CmdRecord::Quit);
            }
            Cmd::Msg(m) => {
                self.command_log.push(CmdRecord::Msg);
                let cmd = self.model.update(m);
                self.execute_cmd(cmd);
            }
            Cmd::Batch(cmds) => {
                self.command_log.push(CmdRecord::Batch(cmds.len()));
                self.execute_all(cmds);
            }
            Cmd::Sequence(cmds) => {
                self.command_log.push(CmdRecord::Sequence(cmds.len()));
                self.execute_all(cmds);
            }
            Cmd::Tick(duration) => {
                self.tick_rate = Some(duration);
                self.command_log.push(CmdRecord::Tick(duration));
            }
            Cmd::Task(spec, f) => {
                self.command_log.push(CmdRecord::Task(spec.name.clone()));
                match self.task_mode {
                    TaskMode::Immediate => {
                        let msg = f();
                        let cmd = self.model.update(msg);
                        self.execute_cmd(cmd);
                    }
                    TaskMode::Deferred => self.pending.push((spec, f)),
                }
            }
        }
    }

    fn execute_all(&mut self, cmds: Vec<Cmd<M::Message>>) {
        for c in cmds {
            self.execute_cmd(c);
            if !self.running {
                break;
            }
        }
    }
}
