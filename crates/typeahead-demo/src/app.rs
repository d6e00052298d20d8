#![forbid(unsafe_code)]

//! Demo application model.
//!
//! Two autocomplete fields stacked vertically: an async one backed by a
//! simulated search service and a sync one filtering in memory. Keys go to
//! the focused field; Tab and Shift-Tab move focus. Async lookups run as
//! runtime tasks and come back as [`Msg::Lookup`].

use std::time::Duration;

use tracing::{debug, info};
use typeahead_core::event::{Event, KeyCode, MouseEventKind};
use typeahead_core::geometry::Rect;
use typeahead_render::frame::Frame;
use typeahead_runtime::{Cmd, Model};
use typeahead_widgets::Widget;
use typeahead_widgets::autocomplete::{
    AutoComplete, AutoCompleteConfig, BelowAnchor, Candidates, DismissReason, Intent,
    PendingLookup,
};
use typeahead_widgets::label::Label;
use typeahead_widgets::style::Style;

use crate::cli::Opts;

/// Spinner frame interval.
pub const TICK_INTERVAL: Duration = Duration::from_millis(80);

const MARGIN_X: u16 = 2;
const MAX_FIELD_WIDTH: u16 = 48;
const ASYNC_LABEL_Y: u16 = 1;
const SYNC_LABEL_Y: u16 = 5;
/// Status and key hint rows at the bottom of the screen.
const FOOTER_ROWS: u16 = 2;

const ASYNC_LABEL: &str = "Async Search";
const ASYNC_HINT: &str = "Results from a simulated search service";
const SYNC_LABEL: &str = "Sync Search";
const SYNC_HINT: &str = "Filtered in memory as you type";
const KEY_HINT: &str = "Tab switch  Enter check  Esc close  Ctrl+Q quit";

/// One of the two demo fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldId {
    Async,
    Sync,
}

impl FieldId {
    fn other(self) -> Self {
        match self {
            Self::Async => Self::Sync,
            Self::Sync => Self::Async,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Async => "async",
            Self::Sync => "sync",
        }
    }
}

/// Application messages.
#[derive(Debug)]
pub enum Msg {
    Event(Event),
    /// A lookup for a field finished.
    Lookup(FieldId, Intent),
}

impl From<Event> for Msg {
    fn from(event: Event) -> Self {
        Msg::Event(event)
    }
}

/// Demo settings derived from the command line.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub delay: Duration,
    pub multiple: bool,
    pub open_on_focus: bool,
    pub candidates: Candidates,
}

impl AppConfig {
    pub fn from_opts(opts: &Opts, candidates: Candidates) -> Self {
        Self {
            delay: opts.delay,
            multiple: opts.multiple,
            open_on_focus: opts.open_on_focus,
            candidates,
        }
    }
}

/// Top-level demo state.
#[derive(Debug)]
pub struct DemoApp {
    async_field: AutoComplete,
    sync_field: AutoComplete,
    focus: FieldId,
}

impl DemoApp {
    pub fn new(config: AppConfig) -> Self {
        let async_field = AutoComplete::simulated(
            AutoCompleteConfig::default()
                .with_multiple(config.multiple)
                .with_widget_id("async-search"),
            config.candidates.clone(),
            config.delay,
        )
        .with_placement(Box::new(BelowAnchor {
            padding: FOOTER_ROWS,
        }));
        let sync_field = AutoComplete::new(
            AutoCompleteConfig::default()
                .with_multiple(config.multiple)
                .with_open_on_focus(config.open_on_focus)
                .with_widget_id("sync-search"),
            config.candidates,
        )
        .with_placement(Box::new(BelowAnchor {
            padding: FOOTER_ROWS,
        }));
        Self {
            async_field,
            sync_field,
            focus: FieldId::Async,
        }
    }

    pub fn focus(&self) -> FieldId {
        self.focus
    }

    pub fn field(&self, id: FieldId) -> &AutoComplete {
        match id {
            FieldId::Async => &self.async_field,
            FieldId::Sync => &self.sync_field,
        }
    }

    fn field_mut(&mut self, id: FieldId) -> &mut AutoComplete {
        match id {
            FieldId::Async => &mut self.async_field,
            FieldId::Sync => &mut self.sync_field,
        }
    }

    /// Input rows of both fields for a terminal of `width` x `height`.
    fn layout(width: u16, height: u16) -> (Rect, Rect) {
        let field_width = width.saturating_sub(MARGIN_X * 2).min(MAX_FIELD_WIDTH);
        let row = |y: u16| {
            if y < height {
                Rect::new(MARGIN_X, y, field_width, 1)
            } else {
                Rect::default()
            }
        };
        (row(ASYNC_LABEL_Y + 1), row(SYNC_LABEL_Y + 1))
    }

    fn set_focus(&mut self, id: FieldId) {
        if self.focus == id {
            return;
        }
        debug!(from = self.focus.name(), to = id.name(), "focus moved");
        self.field_mut(self.focus).set_focused(false);
        self.focus = id;
        self.field_mut(id).set_focused(true);
    }

    /// Turn a widget's pending lookup into a runtime task.
    fn dispatch(id: FieldId, pending: Option<PendingLookup>) -> Cmd<Msg> {
        match pending {
            Some(lookup) => {
                let name = format!("{} lookup {}", id.name(), lookup.token());
                Cmd::task_named(name, move || Msg::Lookup(id, lookup.run()))
            }
            None => Cmd::none(),
        }
    }

    fn handle_event(&mut self, event: Event) -> Cmd<Msg> {
        match &event {
            Event::Resize { width, height } => {
                let (async_row, sync_row) = Self::layout(*width, *height);
                let viewport = Rect::from_size(*width, *height);
                self.async_field.set_layout(async_row, viewport);
                self.sync_field.set_layout(sync_row, viewport);
                Cmd::none()
            }
            Event::Tick => {
                self.async_field.tick();
                self.sync_field.tick();
                Cmd::none()
            }
            Event::Key(key) if key.is_press() && key.ctrl() && key.is_char('c') => Cmd::quit(),
            Event::Key(key) if key.is_press() && key.ctrl() && key.is_char('q') => Cmd::quit(),
            Event::Key(key)
                if key.is_press() && matches!(key.code, KeyCode::Tab | KeyCode::BackTab) =>
            {
                self.set_focus(self.focus.other());
                Cmd::none()
            }
            Event::Mouse(mouse) => {
                if matches!(mouse.kind, MouseEventKind::Down(_)) {
                    let on_popup = self
                        .field(self.focus)
                        .popup_geometry()
                        .is_some_and(|g| g.area.contains(mouse.x, mouse.y));
                    let other = self.focus.other();
                    if !on_popup && self.field(other).input_area().contains(mouse.x, mouse.y) {
                        self.set_focus(other);
                    }
                }
                let focused = self.focus;
                let first = self.field_mut(focused).handle_event(&event);
                let second = self.field_mut(focused.other()).handle_event(&event);
                let cmds = [
                    Self::dispatch(focused, first),
                    Self::dispatch(focused.other(), second),
                ];
                Cmd::batch(cmds.into_iter().filter(|c| !c.is_none()).collect())
            }
            _ => {
                let focused = self.focus;
                let pending = self.field_mut(focused).handle_event(&event);
                Self::dispatch(focused, pending)
            }
        }
    }

    fn status_line(&self) -> String {
        let list = |id: FieldId| {
            let values = self.field(id).checked_values();
            if values.is_empty() {
                "-".to_string()
            } else {
                values.join(", ")
            }
        };
        format!(
            "async: {}  sync: {}",
            list(FieldId::Async),
            list(FieldId::Sync)
        )
    }
}

impl Model for DemoApp {
    type Message = Msg;

    fn init(&mut self) -> Cmd<Msg> {
        self.async_field.set_focused(true);
        info!("typeahead demo started");
        Cmd::tick(TICK_INTERVAL)
    }

    fn update(&mut self, msg: Msg) -> Cmd<Msg> {
        match msg {
            Msg::Event(event) => self.handle_event(event),
            Msg::Lookup(id, intent) => {
                let pending = self.field_mut(id).apply(intent);
                // Focus moved away while the lookup was in flight.
                if id != self.focus {
                    self.field_mut(id).apply(Intent::Dismiss(DismissReason::FocusLost));
                }
                Self::dispatch(id, pending)
            }
        }
    }

    fn view(&self, frame: &mut Frame) {
        let (width, height) = (frame.width(), frame.height());
        let (async_row, sync_row) = Self::layout(width, height);
        let label = Style::new().bold();
        let hint = Style::new().dim();

        let text_row = |y: u16| Rect::new(MARGIN_X, y, width.saturating_sub(MARGIN_X), 1);
        let rows = [
            (ASYNC_LABEL_Y, ASYNC_LABEL, label),
            (ASYNC_LABEL_Y + 2, ASYNC_HINT, hint),
            (SYNC_LABEL_Y, SYNC_LABEL, label),
            (SYNC_LABEL_Y + 2, SYNC_HINT, hint),
        ];
        for (y, text, style) in rows {
            if y < height {
                Label::new(text).style(style).render(text_row(y), frame);
            }
        }

        if height > SYNC_LABEL_Y + 4 {
            let status = self.status_line();
            Label::new(&status).render(text_row(height - FOOTER_ROWS), frame);
            Label::new(KEY_HINT).style(hint).render(text_row(height - 1), frame);
        }

        // Focused field last so its popup is on top.
        let (first, second) = match self.focus {
            FieldId::Async => ((&self.sync_field, sync_row), (&self.async_field, async_row)),
            FieldId::Sync => ((&self.async_field, async_row), (&self.sync_field, sync_row)),
        };
        first.0.render(first.1, frame);
        second.0.render(second.1, frame);
    }

    /// Only a spinner animates.
    fn redraw_on_tick(&self) -> bool {
        self.async_field.is_loading() || self.sync_field.is_loading()
    }
}
