#![forbid(unsafe_code)]

//! Autocomplete widget.
//!
//! A text input with a popup of matching candidates that can be navigated
//! from the keyboard and checked individually (single- or multi-select).
//! Results come either from an in-memory filter or from an async
//! [`SearchBackend`].
//!
//! # State changes
//!
//! Every change goes through [`AutoComplete::apply`] with an [`Intent`].
//! [`AutoComplete::handle_event`] only translates terminal events into
//! intents. When an intent starts an async lookup, `apply` returns the
//! [`PendingLookup`]; the host runs it off the UI thread and feeds the
//! resulting [`Intent::LookupResolved`] back in.
//!
//! ```ignore
//! let pending = autocomplete.handle_event(&event);
//! if let Some(lookup) = pending {
//!     // on a worker thread:
//!     let intent = lookup.run();
//!     // back on the UI thread:
//!     autocomplete.apply(intent);
//! }
//! ```
//!
//! Only the most recently issued lookup is applied; older resolutions are
//! discarded.
//!
//! # Invariants
//!
//! 1. The active index is absent or inside the current results.
//! 2. In single-select mode at most one candidate is checked.
//! 3. Loading is true only while the latest lookup is in flight.

pub mod item;
pub mod navigation;
pub mod placement;
pub mod popup;
pub mod query;
pub mod selection;

pub use item::{ItemStyle, ResultItem, option_id};
pub use navigation::{ListNavigation, NavKey, NavigationController};
pub use placement::{BelowAnchor, Placement, PopupGeometry, Side};
pub use popup::{DismissReason, Popup};
pub use query::{
    Candidates, Fetch, LookupError, LookupOutcome, LookupToken, PendingLookup, QueryPipeline,
    ResultProvider, SearchBackend, SimulatedSearch, candidates, filter_candidates,
};
pub use selection::{SelectionMode, SelectionStore};

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, trace, warn};
use typeahead_core::event::{Event, KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use typeahead_core::geometry::Rect;
use typeahead_render::cell::Cell;
use typeahead_render::frame::Frame;

use crate::input::{InputChange, TextInput};
use crate::spinner::{Spinner, SpinnerState};
use crate::{StatefulWidget, Style, Widget, draw_text_span, set_style_area};

/// Placeholder shown while the input is empty.
pub const DEFAULT_PLACEHOLDER: &str = "Type to begin searching";
/// Hint row shown when the popup is open with no results.
pub const NO_RESULTS: &str = "No results found";
/// Default number of result rows visible at once.
pub const DEFAULT_MAX_VISIBLE: usize = 8;

const ICON: &str = "⌕";
/// Icon plus one space.
const ICON_WIDTH: u16 = 2;
/// Space plus spinner glyph.
const SPINNER_WIDTH: u16 = 2;

/// Widget configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutoCompleteConfig {
    /// Source results from an async backend instead of the in-memory filter.
    pub async_search: bool,
    /// Allow several checked candidates at once.
    pub multiple: bool,
    pub placeholder: String,
    /// Result rows visible at once; 0 is treated as 1.
    pub max_visible: usize,
    /// Open the popup when the input gains focus (sync mode only).
    pub open_on_focus: bool,
    /// Wrap keyboard navigation at the ends of the list.
    pub loop_focus: bool,
    /// Prefix of option ids.
    pub widget_id: String,
}

impl Default for AutoCompleteConfig {
    fn default() -> Self {
        Self {
            async_search: false,
            multiple: false,
            placeholder: DEFAULT_PLACEHOLDER.to_owned(),
            max_visible: DEFAULT_MAX_VISIBLE,
            open_on_focus: false,
            loop_focus: false,
            widget_id: "autocomplete".to_owned(),
        }
    }
}

impl AutoCompleteConfig {
    #[must_use]
    pub fn with_async_search(mut self, async_search: bool) -> Self {
        self.async_search = async_search;
        self
    }

    #[must_use]
    pub fn with_multiple(mut self, multiple: bool) -> Self {
        self.multiple = multiple;
        self
    }

    #[must_use]
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    #[must_use]
    pub fn with_max_visible(mut self, max_visible: usize) -> Self {
        self.max_visible = max_visible;
        self
    }

    #[must_use]
    pub fn with_open_on_focus(mut self, open_on_focus: bool) -> Self {
        self.open_on_focus = open_on_focus;
        self
    }

    #[must_use]
    pub fn with_loop_focus(mut self, loop_focus: bool) -> Self {
        self.loop_focus = loop_focus;
        self
    }

    #[must_use]
    pub fn with_widget_id(mut self, widget_id: impl Into<String>) -> Self {
        self.widget_id = widget_id.into();
        self
    }

    /// Visible rows, at least one.
    pub fn visible_rows(&self) -> usize {
        self.max_visible.max(1)
    }
}

/// One atomic state change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// The input text changed.
    SetQuery(String),
    /// An async lookup finished.
    LookupResolved {
        token: LookupToken,
        outcome: LookupOutcome,
    },
    /// Highlight a result row, or none. Out-of-range indices are ignored.
    SetActive(Option<usize>),
    /// Toggle the highlighted result (Enter).
    ToggleActive,
    /// Check or uncheck a candidate.
    SetChecked { value: String, checked: bool },
    /// Open the popup.
    Open,
    /// Close the popup.
    Dismiss(DismissReason),
    /// The input gained or lost focus.
    Focus(bool),
}

/// Visual style of the widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoCompleteStyle {
    pub input: Style,
    pub placeholder: Style,
    pub icon: Style,
    pub spinner: Style,
    pub popup: Style,
    pub hint: Style,
    pub item: ItemStyle,
}

impl Default for AutoCompleteStyle {
    fn default() -> Self {
        Self {
            input: Style::new(),
            placeholder: Style::new().dim(),
            icon: Style::new().dim(),
            spinner: Style::new(),
            popup: Style::new(),
            hint: Style::new().dim().italic(),
            item: ItemStyle::highlighted(),
        }
    }
}

/// Autocomplete widget state.
#[derive(Debug)]
pub struct AutoComplete {
    config: AutoCompleteConfig,
    input: TextInput,
    query: String,
    pipeline: QueryPipeline,
    results: Vec<String>,
    nav: NavigationController,
    popup: Popup,
    selection: SelectionStore,
    spinner: SpinnerState,
    placement: Box<dyn Placement>,
    style: AutoCompleteStyle,
    anchor: Rect,
    viewport: Rect,
}

impl AutoComplete {
    /// Widget over a static candidate list. In async mode the list is
    /// served by a [`SimulatedSearch`] with the default delay.
    pub fn new(config: AutoCompleteConfig, candidates: Candidates) -> Self {
        let provider = if config.async_search {
            ResultProvider::Async(Arc::new(SimulatedSearch::new(candidates)))
        } else {
            ResultProvider::Sync(candidates)
        };
        Self::with_provider(config, provider)
    }

    /// Async widget over a [`SimulatedSearch`] with the given delay.
    pub fn simulated(config: AutoCompleteConfig, candidates: Candidates, delay: Duration) -> Self {
        Self::with_provider(config, ResultProvider::simulated(candidates, delay))
    }

    /// Widget over an explicit provider. `config.async_search` follows the
    /// provider.
    pub fn with_provider(mut config: AutoCompleteConfig, provider: ResultProvider) -> Self {
        config.async_search = provider.is_async();
        let style = AutoCompleteStyle::default();
        let input = TextInput::new()
            .with_placeholder(config.placeholder.clone())
            .with_style(style.input)
            .with_placeholder_style(style.placeholder);
        Self {
            input,
            query: String::new(),
            pipeline: QueryPipeline::new(provider),
            results: Vec::new(),
            nav: NavigationController::new(ListNavigation::new(config.loop_focus)),
            popup: Popup::new(config.async_search, config.open_on_focus),
            selection: SelectionStore::new(SelectionMode::from_multiple(config.multiple)),
            spinner: SpinnerState::default(),
            placement: Box::new(BelowAnchor::default()),
            style,
            anchor: Rect::default(),
            viewport: Rect::default(),
            config,
        }
    }

    #[must_use]
    pub fn with_placement(mut self, placement: Box<dyn Placement>) -> Self {
        self.placement = placement;
        self
    }

    #[must_use]
    pub fn with_style(mut self, style: AutoCompleteStyle) -> Self {
        self.style = style;
        self.input = std::mem::take(&mut self.input)
            .with_style(style.input)
            .with_placeholder_style(style.placeholder);
        self
    }

    // --- Accessors ---

    pub fn config(&self) -> &AutoCompleteConfig {
        &self.config
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn results(&self) -> &[String] {
        &self.results
    }

    pub fn active_index(&self) -> Option<usize> {
        self.nav.active()
    }

    /// The highlighted candidate.
    pub fn active_value(&self) -> Option<&str> {
        self.nav
            .active()
            .and_then(|i| self.results.get(i))
            .map(String::as_str)
    }

    pub fn is_open(&self) -> bool {
        self.popup.is_open()
    }

    pub fn is_loading(&self) -> bool {
        self.pipeline.is_loading()
    }

    pub fn is_focused(&self) -> bool {
        self.input.is_focused()
    }

    pub fn is_checked(&self, value: &str) -> bool {
        self.selection.is_checked(value)
    }

    pub fn checked_values(&self) -> Vec<&str> {
        self.selection.checked_values()
    }

    pub fn selection(&self) -> &SelectionStore {
        &self.selection
    }

    /// Id of result row `index`.
    pub fn option_id(&self, index: usize) -> String {
        option_id(&self.config.widget_id, index)
    }

    /// Id of the highlighted row.
    pub fn active_option_id(&self) -> Option<String> {
        self.nav.active().map(|i| self.option_id(i))
    }

    /// Switch between single- and multi-select. Checked entries are kept
    /// until the next check in single mode replaces them.
    pub fn set_selection_mode(&mut self, mode: SelectionMode) {
        self.config.multiple = mode == SelectionMode::Multiple;
        self.selection.set_mode(mode);
    }

    /// Record where the input is drawn and the viewport the popup may use.
    ///
    /// Pointer hit testing and page sizes use the last recorded layout.
    pub fn set_layout(&mut self, anchor: Rect, viewport: Rect) {
        self.anchor = Rect::new(anchor.x, anchor.y, anchor.width, anchor.height.min(1));
        self.viewport = viewport;
        let page = self.page_size();
        self.nav.on_results_changed(self.results.len(), page);
    }

    /// The input row from the last recorded layout.
    pub fn input_area(&self) -> Rect {
        self.anchor
    }

    /// Where the popup is drawn, if it is open and a layout is known.
    pub fn popup_geometry(&self) -> Option<PopupGeometry> {
        if !self.popup.is_open() || self.anchor.is_empty() {
            return None;
        }
        Some(self.place(self.anchor, self.viewport))
    }

    pub fn set_focused(&mut self, focused: bool) -> Option<PendingLookup> {
        self.apply(Intent::Focus(focused))
    }

    /// Advance the loading spinner. Returns `true` while a lookup is in
    /// flight.
    pub fn tick(&mut self) -> bool {
        if self.is_loading() {
            self.spinner.tick();
            true
        } else {
            false
        }
    }

    // --- Intents ---

    /// Apply one intent. Returns the lookup to run when the intent started
    /// one.
    pub fn apply(&mut self, intent: Intent) -> Option<PendingLookup> {
        match intent {
            Intent::SetQuery(query) => return self.set_query(query),
            Intent::LookupResolved { token, outcome } => self.resolve(token, outcome),
            Intent::SetActive(index) => {
                let page = self.page_size();
                if self.nav.set_active(index, self.results.len(), page) {
                    trace!(widget = %self.config.widget_id, active = ?index, "active item changed");
                }
            }
            Intent::ToggleActive => self.toggle_active(),
            Intent::SetChecked { value, checked } => {
                debug!(widget = %self.config.widget_id, value = %value, checked, "checked state set");
                self.selection.set_checked(&value, checked);
            }
            Intent::Open => self.popup.open(),
            Intent::Dismiss(reason) => {
                self.popup.dismiss(reason);
            }
            Intent::Focus(focused) => {
                if self.input.is_focused() != focused {
                    self.input.set_focused(focused);
                    if focused {
                        self.popup.on_focus();
                    } else {
                        self.popup.dismiss(DismissReason::FocusLost);
                    }
                }
            }
        }
        None
    }

    fn set_query(&mut self, query: String) -> Option<PendingLookup> {
        if self.input.value() != query {
            self.input.set_value(query.as_str());
        }
        debug!(widget = %self.config.widget_id, query = %query, "query changed");
        let fetch = self.pipeline.submit(&query);
        self.query = query;
        match fetch {
            Fetch::Ready(results) => {
                self.replace_results(results);
                self.popup.on_query_changed();
                None
            }
            Fetch::Pending(lookup) => {
                debug!(
                    widget = %self.config.widget_id,
                    token = %lookup.token(),
                    query = lookup.query(),
                    "lookup issued"
                );
                Some(lookup)
            }
        }
    }

    fn resolve(&mut self, token: LookupToken, outcome: LookupOutcome) {
        if !self.pipeline.accept(token) {
            debug!(widget = %self.config.widget_id, %token, "discarding stale lookup result");
            return;
        }
        match outcome {
            Ok(results) => {
                let results = if self.query.is_empty() {
                    Vec::new()
                } else {
                    results
                };
                debug!(widget = %self.config.widget_id, %token, count = results.len(), "lookup resolved");
                self.replace_results(results);
                self.popup.on_lookup_resolved();
            }
            Err(error) => {
                warn!(
                    widget = %self.config.widget_id,
                    %token,
                    query = %self.query,
                    %error,
                    "lookup failed"
                );
            }
        }
    }

    fn toggle_active(&mut self) {
        let Some(value) = self.active_value().map(str::to_owned) else {
            trace!(widget = %self.config.widget_id, "enter without active item");
            return;
        };
        let checked = self.selection.toggle(&value);
        debug!(widget = %self.config.widget_id, value = %value, checked, "active item toggled");
    }

    fn replace_results(&mut self, results: Vec<String>) {
        self.results = results;
        let page = self.page_size();
        self.nav.on_results_changed(self.results.len(), page);
    }

    // --- Events ---

    /// Translate a terminal event into intents and apply them.
    pub fn handle_event(&mut self, event: &Event) -> Option<PendingLookup> {
        match event {
            Event::Key(key) if key.is_press() => self.handle_key(key, event),
            Event::Paste(_) => self.forward_to_input(event),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Focus(focused) => self.set_focused(*focused),
            _ => None,
        }
    }

    fn handle_key(&mut self, key: &KeyEvent, event: &Event) -> Option<PendingLookup> {
        match key.code {
            KeyCode::Escape => self.apply(Intent::Dismiss(DismissReason::Escape)),
            KeyCode::Enter => self.apply(Intent::ToggleActive),
            code => match NavKey::from_key_code(code) {
                Some(nav_key) if self.takes_nav_key(nav_key) => {
                    if !self.popup.is_open() {
                        self.apply(Intent::Open);
                    }
                    let target = self
                        .nav
                        .target(nav_key, self.results.len(), self.page_size());
                    self.apply(Intent::SetActive(target))
                }
                _ => self.forward_to_input(event),
            },
        }
    }

    /// Whether a navigation key moves through the list rather than the
    /// input cursor.
    fn takes_nav_key(&self, key: NavKey) -> bool {
        if self.results.is_empty() {
            return false;
        }
        self.popup.is_open() || key == NavKey::Down
    }

    fn forward_to_input(&mut self, event: &Event) -> Option<PendingLookup> {
        match self.input.handle_event(event) {
            InputChange::Value => {
                let query = self.input.value().to_owned();
                self.apply(Intent::SetQuery(query))
            }
            InputChange::Cursor | InputChange::Ignored => None,
        }
    }

    fn handle_mouse(&mut self, mouse: &MouseEvent) -> Option<PendingLookup> {
        let row = self.row_at(mouse.x, mouse.y);
        match mouse.kind {
            MouseEventKind::Down(button) => match row {
                Some((index, row_area)) if button == MouseButton::Left => {
                    // The checkbox toggles in place; the rest of the row also moves the highlight.
                    if !ResultItem::checkbox_rect(row_area).contains(mouse.x, mouse.y) {
                        self.apply(Intent::SetActive(Some(index)));
                    }
                    let intent = self.results.get(index).map(|value| {
                        ResultItem::new(value)
                            .checked(self.selection.is_checked(value))
                            .on_check_change()
                    });
                    intent.and_then(|intent| self.apply(intent))
                }
                Some(_) => None,
                None if self.anchor.contains(mouse.x, mouse.y) => None,
                None => self.apply(Intent::Dismiss(DismissReason::PointerOutside)),
            },
            MouseEventKind::Moved => {
                row.and_then(|(index, _)| self.apply(Intent::SetActive(Some(index))))
            }
            MouseEventKind::ScrollDown | MouseEventKind::ScrollUp => {
                row?;
                let key = if mouse.kind == MouseEventKind::ScrollDown {
                    NavKey::Down
                } else {
                    NavKey::Up
                };
                let target = self.nav.target(key, self.results.len(), self.page_size());
                self.apply(Intent::SetActive(target))
            }
            _ => None,
        }
    }

    /// Result index under a screen position, with the area its row is drawn in.
    fn row_at(&self, x: u16, y: u16) -> Option<(usize, Rect)> {
        if self.results.is_empty() {
            return None;
        }
        let area = self.popup_geometry()?.area;
        if !area.contains(x, y) {
            return None;
        }
        let page = area.height as usize;
        let offset = navigation::visible_offset(
            self.nav.scroll_offset(),
            self.nav.active(),
            self.results.len(),
            page,
        );
        let index = offset + (y - area.y) as usize;
        if index >= self.results.len() {
            return None;
        }
        area.row(y - area.y).map(|row| (index, row))
    }

    // --- Layout ---

    /// Rows the popup content needs: one hint row when empty.
    fn content_rows(&self) -> u16 {
        if self.results.is_empty() {
            1
        } else {
            self.results.len().min(self.config.visible_rows()) as u16
        }
    }

    fn place(&self, anchor: Rect, viewport: Rect) -> PopupGeometry {
        self.placement.place(anchor, viewport, self.content_rows())
    }

    /// Rows per page for navigation, from the last layout if known.
    fn page_size(&self) -> usize {
        let rows = self.config.visible_rows();
        if self.anchor.is_empty() {
            return rows;
        }
        let geometry = self.place(self.anchor, self.viewport);
        (geometry.area.height as usize).clamp(1, rows)
    }

    fn render_input_row(&self, row: Rect, frame: &mut Frame) {
        let max_x = row.right();
        draw_text_span(frame, row.x, row.y, ICON, self.style.icon, max_x);

        let spinner_width = if self.config.async_search {
            SPINNER_WIDTH
        } else {
            0
        };
        let input_x = row.x.saturating_add(ICON_WIDTH).min(max_x);
        let input_width = max_x.saturating_sub(input_x).saturating_sub(spinner_width);
        self.input
            .render(Rect::new(input_x, row.y, input_width, 1), frame);

        if self.is_loading() && row.width > spinner_width {
            let spinner = Spinner::new().style(self.style.spinner);
            let mut state = self.spinner.clone();
            let area = Rect::new(max_x - 1, row.y, 1, 1);
            StatefulWidget::render(&spinner, area, frame, &mut state);
        }
    }

    fn render_popup(&self, geometry: PopupGeometry, frame: &mut Frame) {
        let area = geometry.area;
        if area.is_empty() {
            return;
        }
        frame.buffer.fill(area, Cell::default());
        set_style_area(frame, area, self.style.popup);

        if self.results.is_empty() {
            draw_text_span(
                frame,
                area.x.saturating_add(ICON_WIDTH),
                area.y,
                NO_RESULTS,
                self.style.popup.patch(self.style.hint),
                area.right(),
            );
            return;
        }

        let page = area.height as usize;
        let active = self.nav.active();
        let offset =
            navigation::visible_offset(self.nav.scroll_offset(), active, self.results.len(), page);
        for (row, (index, value)) in self
            .results
            .iter()
            .enumerate()
            .skip(offset)
            .take(page)
            .enumerate()
        {
            let Some(row_area) = area.row(row as u16) else {
                break;
            };
            ResultItem::new(value)
                .active(active == Some(index))
                .checked(self.selection.is_checked(value))
                .style(self.style.item)
                .render(row_area, frame);
        }
    }
}

impl Widget for AutoComplete {
    /// Draw the input row in the first row of `area` and, when open, the
    /// popup anywhere in the frame as placed.
    fn render(&self, area: Rect, frame: &mut Frame) {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "widget_render",
            widget = "AutoComplete",
            x = area.x,
            y = area.y,
            w = area.width,
            h = area.height
        )
        .entered();

        if area.is_empty() {
            return;
        }

        let row = Rect::new(area.x, area.y, area.width, 1);
        self.render_input_row(row, frame);

        if self.popup.is_open() {
            let geometry = self.place(row, frame.bounds());
            self.render_popup(geometry, frame);
        }
    }

    fn is_essential(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use tracing_test::traced_test;
    use typeahead_core::event::PasteEvent;

    fn fruit() -> Candidates {
        candidates(["Apple", "Banana", "Cherry"])
    }

    fn sync(multiple: bool) -> AutoComplete {
        AutoComplete::new(AutoCompleteConfig::default().with_multiple(multiple), fruit())
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code))
    }

    fn type_str(ac: &mut AutoComplete, text: &str) -> Option<PendingLookup> {
        let mut last = None;
        for c in text.chars() {
            last = ac.handle_event(&key(KeyCode::Char(c)));
        }
        last
    }

    #[test]
    fn defaults() {
        let config = AutoCompleteConfig::default();
        assert_eq!(config.placeholder, "Type to begin searching");
        assert_eq!(config.max_visible, 8);
        assert!(!config.async_search);
        assert_eq!(config.with_max_visible(0).visible_rows(), 1);
    }

    #[test]
    fn typing_filters_and_opens() {
        let mut ac = sync(false);
        assert!(type_str(&mut ac, "an").is_none());
        assert_eq!(ac.query(), "an");
        assert_eq!(ac.results(), ["Banana"]);
        assert!(ac.is_open());
        assert_eq!(ac.active_index(), None);
    }

    #[test]
    fn sync_opens_even_without_results() {
        let mut ac = sync(false);
        type_str(&mut ac, "zz");
        assert!(ac.results().is_empty());
        assert!(ac.is_open());
    }

    #[test]
    fn set_query_updates_input_text() {
        let mut ac = sync(false);
        ac.apply(Intent::SetQuery("err".into()));
        assert_eq!(ac.input.value(), "err");
        assert_eq!(ac.results(), ["Cherry"]);
    }

    #[test]
    fn enter_without_active_is_noop() {
        let mut ac = sync(false);
        type_str(&mut ac, "an");
        ac.handle_event(&key(KeyCode::Enter));
        assert!(ac.checked_values().is_empty());
    }

    #[test]
    fn down_then_enter_checks() {
        let mut ac = sync(false);
        type_str(&mut ac, "an");
        ac.handle_event(&key(KeyCode::Down));
        assert_eq!(ac.active_index(), Some(0));
        ac.handle_event(&key(KeyCode::Enter));
        assert_eq!(ac.checked_values(), vec!["Banana"]);
        ac.handle_event(&key(KeyCode::Enter));
        assert!(ac.checked_values().is_empty());
    }

    #[test]
    fn active_index_is_reclamped_when_results_shrink() {
        let mut ac = sync(false);
        type_str(&mut ac, "e");
        assert_eq!(ac.results(), ["Apple", "Cherry"]);
        ac.apply(Intent::SetActive(Some(1)));
        type_str(&mut ac, "r");
        assert_eq!(ac.results(), ["Cherry"]);
        assert_eq!(ac.active_index(), Some(0));
        type_str(&mut ac, "x");
        assert_eq!(ac.active_index(), None);
    }

    #[test]
    fn out_of_range_active_is_ignored() {
        let mut ac = sync(false);
        type_str(&mut ac, "a");
        ac.apply(Intent::SetActive(Some(9)));
        assert_eq!(ac.active_index(), None);
    }

    #[test]
    fn escape_dismisses_and_down_reopens() {
        let mut ac = sync(false);
        type_str(&mut ac, "a");
        ac.handle_event(&key(KeyCode::Escape));
        assert!(!ac.is_open());
        ac.handle_event(&key(KeyCode::Down));
        assert!(ac.is_open());
        assert_eq!(ac.active_index(), Some(0));
    }

    #[test]
    fn home_moves_cursor_while_closed() {
        let mut ac = sync(false);
        type_str(&mut ac, "an");
        ac.handle_event(&key(KeyCode::Escape));
        ac.handle_event(&key(KeyCode::Home));
        assert_eq!(ac.input.cursor(), 0);
        assert_eq!(ac.active_index(), None);
    }

    #[test]
    fn home_end_navigate_while_open() {
        let mut ac = sync(false);
        type_str(&mut ac, "a");
        ac.handle_event(&key(KeyCode::End));
        assert_eq!(ac.active_index(), Some(1));
        ac.handle_event(&key(KeyCode::Home));
        assert_eq!(ac.active_index(), Some(0));
        assert_eq!(ac.input.cursor(), 1);
    }

    #[test]
    fn paste_sets_query() {
        let mut ac = sync(false);
        ac.handle_event(&Event::Paste(PasteEvent::new("ch")));
        assert_eq!(ac.results(), ["Cherry"]);
    }

    #[test]
    fn focus_loss_dismisses() {
        let mut ac = sync(false);
        ac.set_focused(true);
        type_str(&mut ac, "a");
        ac.handle_event(&Event::Focus(false));
        assert!(!ac.is_open());
        assert!(!ac.is_focused());
    }

    #[test]
    fn open_on_focus() {
        let mut ac = AutoComplete::new(
            AutoCompleteConfig::default().with_open_on_focus(true),
            fruit(),
        );
        ac.set_focused(true);
        assert!(ac.is_open());
    }

    #[test]
    fn async_query_defers_and_resolves() {
        let mut ac = AutoComplete::simulated(
            AutoCompleteConfig::default(),
            fruit(),
            Duration::ZERO,
        );
        assert!(ac.config().async_search);
        let lookup = type_str(&mut ac, "rr").expect("async query issues a lookup");
        assert!(ac.is_loading());
        assert!(!ac.is_open());
        assert!(ac.results().is_empty());
        ac.apply(lookup.run());
        assert!(!ac.is_loading());
        assert!(ac.is_open());
        assert_eq!(ac.results(), ["Cherry"]);
    }

    #[test]
    fn async_flag_selects_simulated_backend() {
        let mut ac = AutoComplete::new(AutoCompleteConfig::default().with_async_search(true), fruit());
        assert!(ac.config().async_search);
        assert!(type_str(&mut ac, "a").is_some());
        assert!(ac.is_loading());
        assert!(ac.results().is_empty());

        let mut ac = AutoComplete::new(AutoCompleteConfig::default().with_async_search(false), fruit());
        assert!(type_str(&mut ac, "a").is_none());
        assert_eq!(ac.results(), ["Apple", "Banana"]);
    }

    #[test]
    fn async_empty_query_resolves_empty() {
        let mut ac = AutoComplete::simulated(
            AutoCompleteConfig::default(),
            fruit(),
            Duration::ZERO,
        );
        let lookup = ac
            .apply(Intent::SetQuery(String::new()))
            .expect("lookup issued");
        ac.apply(lookup.run());
        assert!(ac.results().is_empty());
        assert!(ac.is_open());
    }

    #[test]
    fn tick_only_spins_while_loading() {
        let mut ac = AutoComplete::simulated(
            AutoCompleteConfig::default(),
            fruit(),
            Duration::ZERO,
        );
        assert!(!ac.tick());
        let lookup = type_str(&mut ac, "a").expect("lookup issued");
        assert!(ac.tick());
        assert_eq!(ac.spinner.current_frame, 1);
        ac.apply(lookup.run());
        assert!(!ac.tick());
    }

    #[test]
    fn option_ids_use_widget_id() {
        let mut ac = AutoComplete::new(
            AutoCompleteConfig::default().with_widget_id("fruit"),
            fruit(),
        );
        assert_eq!(ac.active_option_id(), None);
        type_str(&mut ac, "a");
        ac.handle_event(&key(KeyCode::Down));
        assert_eq!(ac.active_option_id().as_deref(), Some("fruit-option-0"));
    }

    #[test]
    fn render_shows_placeholder_and_icon() {
        let ac = sync(false);
        let mut frame = Frame::new(30, 4);
        ac.render(Rect::new(0, 0, 30, 1), &mut frame);
        assert_eq!(frame.buffer.row_text(0), "⌕ Type to begin searching");
        assert_eq!(frame.buffer.row_text(1), "");
    }

    #[test]
    fn render_popup_rows() {
        let mut ac = sync(true);
        type_str(&mut ac, "a");
        ac.handle_event(&key(KeyCode::Down));
        ac.handle_event(&key(KeyCode::Enter));
        let mut frame = Frame::new(20, 5);
        ac.render(Rect::new(0, 0, 20, 1), &mut frame);
        assert_eq!(frame.buffer.row_text(0), "⌕ a");
        assert_eq!(frame.buffer.row_text(1), "> [x] Apple");
        assert_eq!(frame.buffer.row_text(2), "  [ ] Banana");
    }

    #[test]
    fn render_no_results_hint() {
        let mut ac = sync(false);
        type_str(&mut ac, "qq");
        let mut frame = Frame::new(30, 4);
        ac.render(Rect::new(0, 0, 30, 1), &mut frame);
        assert_eq!(frame.buffer.row_text(1), "  No results found");
    }

    #[test]
    fn popup_scrolls_with_active_row() {
        let list = candidates(["a1", "a2", "a3", "a4", "a5"]);
        let mut ac = AutoComplete::new(AutoCompleteConfig::default().with_max_visible(2), list);
        type_str(&mut ac, "a");
        for _ in 0..4 {
            ac.handle_event(&key(KeyCode::Down));
        }
        assert_eq!(ac.active_index(), Some(3));
        let mut frame = Frame::new(20, 6);
        ac.render(Rect::new(0, 0, 20, 1), &mut frame);
        assert_eq!(frame.buffer.row_text(1), "  [ ] a3");
        assert_eq!(frame.buffer.row_text(2), "> [ ] a4");
        assert_eq!(frame.buffer.row_text(3), "");
    }

    #[test]
    fn page_down_uses_visible_rows() {
        let list = candidates(["a1", "a2", "a3", "a4", "a5", "a6"]);
        let mut ac = AutoComplete::new(AutoCompleteConfig::default().with_max_visible(3), list);
        type_str(&mut ac, "a");
        ac.handle_event(&key(KeyCode::Down));
        ac.handle_event(&key(KeyCode::PageDown));
        assert_eq!(ac.active_index(), Some(3));
    }

    #[test]
    fn mouse_click_toggles_row() {
        let mut ac = sync(true);
        ac.set_layout(Rect::new(0, 0, 20, 1), Rect::new(0, 0, 20, 10));
        type_str(&mut ac, "a");
        let click = |y| {
            Event::Mouse(MouseEvent::new(MouseEventKind::Down(MouseButton::Left), 8, y))
        };
        ac.handle_event(&click(2));
        assert_eq!(ac.active_index(), Some(1));
        assert_eq!(ac.checked_values(), vec!["Banana"]);
        ac.handle_event(&click(2));
        assert!(ac.checked_values().is_empty());
    }

    #[test]
    fn checkbox_click_keeps_highlight() {
        let mut ac = sync(true);
        ac.set_layout(Rect::new(0, 0, 20, 1), Rect::new(0, 0, 20, 10));
        type_str(&mut ac, "a");
        let click = |x, y| {
            Event::Mouse(MouseEvent::new(MouseEventKind::Down(MouseButton::Left), x, y))
        };
        let before = ac.active_index();
        ac.handle_event(&click(3, 2));
        assert_eq!(ac.active_index(), before);
        assert_eq!(ac.checked_values(), vec!["Banana"]);
        // A press on the label moves the highlight as well.
        ac.handle_event(&click(8, 1));
        assert_eq!(ac.active_index(), Some(0));
        assert_eq!(ac.checked_values(), vec!["Apple", "Banana"]);
    }

    #[test]
    fn mouse_hover_sets_active() {
        let mut ac = sync(false);
        ac.set_layout(Rect::new(0, 0, 20, 1), Rect::new(0, 0, 20, 10));
        type_str(&mut ac, "a");
        ac.handle_event(&Event::Mouse(MouseEvent::new(MouseEventKind::Moved, 3, 1)));
        assert_eq!(ac.active_index(), Some(0));
    }

    #[test]
    fn click_outside_dismisses_but_input_click_does_not() {
        let mut ac = sync(false);
        ac.set_layout(Rect::new(0, 0, 20, 1), Rect::new(0, 0, 40, 10));
        type_str(&mut ac, "a");
        let down = |x, y| Event::Mouse(MouseEvent::new(MouseEventKind::Down(MouseButton::Left), x, y));
        ac.handle_event(&down(5, 0));
        assert!(ac.is_open());
        ac.handle_event(&down(30, 8));
        assert!(!ac.is_open());
    }

    struct Offline;

    impl SearchBackend for Offline {
        fn search(&self, _query: &str) -> LookupOutcome {
            Err(LookupError::Unavailable("offline".into()))
        }
    }

    #[test]
    #[traced_test]
    fn lookup_failure_is_logged_and_keeps_results() {
        let mut ac = AutoComplete::with_provider(
            AutoCompleteConfig::default(),
            ResultProvider::Async(Arc::new(Offline)),
        );
        let lookup = type_str(&mut ac, "a").expect("lookup issued");
        ac.apply(lookup.run());
        assert!(!ac.is_loading());
        assert!(ac.results().is_empty());
        assert!(!ac.is_open());
        assert!(logs_contain("lookup failed"));
        assert!(logs_contain("search backend unavailable: offline"));
    }

    #[test]
    #[traced_test]
    fn stale_resolution_is_discarded() {
        let mut ac = AutoComplete::simulated(
            AutoCompleteConfig::default(),
            fruit(),
            Duration::ZERO,
        );
        let first = ac.apply(Intent::SetQuery("a".into())).expect("lookup issued");
        let second = ac.apply(Intent::SetQuery("ab".into())).expect("lookup issued");
        ac.apply(second.run());
        assert!(ac.results().is_empty());
        ac.apply(first.run());
        assert!(ac.results().is_empty());
        assert!(logs_contain("discarding stale lookup result"));
    }

    fn intent_strategy() -> impl Strategy<Value = Intent> {
        prop_oneof![
            "[a-z]{0,2}".prop_map(Intent::SetQuery),
            proptest::option::of(0usize..6).prop_map(Intent::SetActive),
            Just(Intent::ToggleActive),
            ("[A-C][a-z]{0,1}", any::<bool>())
                .prop_map(|(value, checked)| Intent::SetChecked { value, checked }),
            Just(Intent::Open),
            Just(Intent::Dismiss(DismissReason::Escape)),
        ]
    }

    proptest! {
        #[test]
        fn active_index_stays_valid(intents in proptest::collection::vec(intent_strategy(), 0..40)) {
            let mut ac = sync(false);
            for intent in intents {
                ac.apply(intent);
                if let Some(active) = ac.active_index() {
                    prop_assert!(active < ac.results().len());
                }
                prop_assert!(ac.checked_values().len() <= 1);
            }
        }
    }
}
