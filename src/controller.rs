//! Search-as-you-type controller.
//!
//! [`SearchController`] owns the state behind a search box: the query text,
//! the pending debounce timer, the suggestion dropdown with its keyboard
//! selection, and the search history. It is a synchronous state machine;
//! the caller feeds it input events together with the current [`Instant`]
//! and calls [`poll`](SearchController::poll) from its event loop. Searches
//! run only from `poll`, never directly from an input event.
//!
//! # Timers
//!
//! There is at most one pending search and at most one pending dropdown
//! close. Every input change replaces the pending search, so a burst of
//! keystrokes produces a single search over the final text.
//!
//! # States
//!
//! | State          | Query     | Dropdown |
//! |----------------|-----------|----------|
//! | `Idle`         | empty     | closed   |
//! | `Typing`       | non-empty | closed   |
//! | `DropdownOpen` | any       | open     |

use std::fmt;
use std::time::Instant;

use tracing::debug;

use crate::error::ConfigError;
use crate::field::{FieldSource, SearchField};
use crate::history::SearchHistory;
use crate::matching::char_count;
use crate::options::{SearchOptions, validate_fields};
use crate::search::{IncrementalSearch, SearchResult, search};
use crate::suggest::{MIN_SUGGEST_QUERY_CHARS, suggest_with_limit};

/// Callback receiving each completed search's results and the query that
/// produced them.
pub type ResultsCallback<'a, T> = Box<dyn FnMut(&[SearchResult<'a, T>], &str) + 'a>;

/// Coarse state of the search box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    /// Empty query, dropdown closed.
    Idle,
    /// Non-empty query, dropdown closed.
    Typing,
    /// Suggestions are showing.
    DropdownOpen,
}

/// Navigation keys the controller reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    /// Move the selection down one suggestion.
    ArrowDown,
    /// Move the selection up one suggestion, back to none above the first.
    ArrowUp,
    /// Accept the selected suggestion, or record the current query.
    Enter,
    /// Close the dropdown.
    Escape,
}

/// A search whose ranking is spread over several polls.
struct InFlight<'a, T> {
    session: IncrementalSearch<'a, 'a, T>,
    query: String,
}

/// State machine behind an interactive search box.
///
/// The dataset and schema are borrowed for the controller's lifetime and
/// never modified.
///
/// # Examples
///
/// ```
/// use std::cell::RefCell;
/// use std::rc::Rc;
/// use std::time::{Duration, Instant};
///
/// use fieldsearch::{SearchController, SearchField, SearchOptions};
/// use serde_json::json;
///
/// let leads = vec![json!({ "name": "John Smith" }), json!({ "name": "Jane Doe" })];
/// let fields = vec![SearchField::new("name", "Name", 1.0)];
///
/// let seen = Rc::new(RefCell::new(Vec::new()));
/// let sink = Rc::clone(&seen);
/// let mut controller = SearchController::new(
///     &leads,
///     &fields,
///     SearchOptions::default(),
///     move |results, query| sink.borrow_mut().push((query.to_owned(), results.len())),
/// )
/// .unwrap();
///
/// let start = Instant::now();
/// controller.input("jane", start);
/// controller.poll(start + Duration::from_millis(300));
/// assert_eq!(*seen.borrow(), [("jane".to_owned(), 1)]);
/// ```
pub struct SearchController<'a, T> {
    dataset: &'a [T],
    fields: &'a [SearchField],
    options: SearchOptions,
    on_results: ResultsCallback<'a, T>,
    query: String,
    suggestions: Vec<String>,
    selected: Option<usize>,
    dropdown_open: bool,
    /// Set by typing; the dropdown opens on the next completed search only
    /// while this is set.
    wants_dropdown: bool,
    history: SearchHistory,
    pending_search: Option<Instant>,
    pending_close: Option<Instant>,
    in_flight: Option<InFlight<'a, T>>,
}

impl<T> fmt::Debug for SearchController<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchController")
            .field("query", &self.query)
            .field("suggestions", &self.suggestions)
            .field("selected", &self.selected)
            .field("dropdown_open", &self.dropdown_open)
            .field("history", &self.history)
            .field("pending_search", &self.pending_search)
            .field("pending_close", &self.pending_close)
            .field("in_flight", &self.in_flight.is_some())
            .finish_non_exhaustive()
    }
}

impl<'a, T: FieldSource> SearchController<'a, T> {
    /// Create a controller over `dataset` searched by `fields`.
    ///
    /// The schema and options are validated here, once; `on_results` is
    /// called after every completed search and when the query is cleared.
    pub fn new<F>(
        dataset: &'a [T],
        fields: &'a [SearchField],
        options: SearchOptions,
        on_results: F,
    ) -> Result<Self, ConfigError>
    where
        F: FnMut(&[SearchResult<'a, T>], &str) + 'a,
    {
        validate_fields(fields)?;
        options.validate()?;
        let history = SearchHistory::with_capacity(options.history_capacity);
        Ok(Self {
            dataset,
            fields,
            options,
            on_results: Box::new(on_results),
            query: String::new(),
            suggestions: Vec::new(),
            selected: None,
            dropdown_open: false,
            wants_dropdown: false,
            history,
            pending_search: None,
            pending_close: None,
            in_flight: None,
        })
    }

    /// The text currently in the search box.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Suggestions computed by the last completed search.
    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    /// Index of the keyboard-selected suggestion, if any.
    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    /// The keyboard-selected suggestion, if any.
    pub fn selected_suggestion(&self) -> Option<&str> {
        self.selected
            .and_then(|i| self.suggestions.get(i))
            .map(String::as_str)
    }

    /// Whether the suggestion dropdown is showing.
    pub fn is_dropdown_open(&self) -> bool {
        self.dropdown_open
    }

    /// Accepted queries, most recent first.
    pub fn history(&self) -> &SearchHistory {
        &self.history
    }

    /// The options the controller was built with.
    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    /// Coarse state of the search box.
    pub fn state(&self) -> ControllerState {
        if self.dropdown_open {
            ControllerState::DropdownOpen
        } else if self.query.is_empty() {
            ControllerState::Idle
        } else {
            ControllerState::Typing
        }
    }

    /// Earliest instant at which [`poll`](Self::poll) has timer work to do.
    ///
    /// An in-flight chunked search is reported separately by
    /// [`is_searching`](Self::is_searching).
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.pending_search, self.pending_close) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Whether a chunked search is partway through the dataset.
    pub fn is_searching(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Handle a change of the search box text.
    ///
    /// Clears the keyboard selection and (re)starts the debounce timer. Any
    /// search still in progress is abandoned.
    pub fn input(&mut self, text: impl Into<String>, now: Instant) {
        self.query = text.into();
        self.selected = None;
        self.in_flight = None;
        self.pending_search = Some(now + self.options.debounce());

        if self.options.show_suggestions && self.query_is_suggestable() {
            self.wants_dropdown = true;
        } else {
            self.wants_dropdown = false;
            self.close_dropdown();
        }
    }

    /// Handle a navigation key. Returns `true` if the key was consumed.
    pub fn handle_key(&mut self, key: NavKey, now: Instant) -> bool {
        match key {
            NavKey::ArrowDown => {
                if !self.dropdown_open || self.suggestions.is_empty() {
                    return false;
                }
                let last = self.suggestions.len() - 1;
                self.selected = Some(self.selected.map_or(0, |i| (i + 1).min(last)));
                true
            }
            NavKey::ArrowUp => {
                if !self.dropdown_open || self.suggestions.is_empty() {
                    return false;
                }
                self.selected = self.selected.and_then(|i| i.checked_sub(1));
                true
            }
            NavKey::Enter => {
                if let Some(index) = self.selected {
                    self.adopt_suggestion(index, now)
                } else {
                    let query = self.query.trim();
                    if query.is_empty() {
                        return false;
                    }
                    let query = query.to_owned();
                    self.record_history(query);
                    true
                }
            }
            NavKey::Escape => {
                let was_open = self.dropdown_open;
                self.wants_dropdown = false;
                self.close_dropdown();
                was_open
            }
        }
    }

    /// Accept the suggestion at `index`, as when it is clicked.
    ///
    /// Returns `false` if the dropdown is closed or `index` is out of range.
    pub fn choose_suggestion(&mut self, index: usize, now: Instant) -> bool {
        if !self.dropdown_open {
            return false;
        }
        self.adopt_suggestion(index, now)
    }

    /// The search box lost focus: close the dropdown after the grace period.
    pub fn blur(&mut self, now: Instant) {
        self.pending_close = Some(now + self.options.blur_delay());
    }

    /// The search box gained focus.
    ///
    /// Cancels a pending close and reopens the dropdown if the query is long
    /// enough and suggestions are available.
    pub fn focus(&mut self) {
        self.pending_close = None;
        if self.options.show_suggestions
            && self.query_is_suggestable()
            && !self.suggestions.is_empty()
        {
            self.wants_dropdown = true;
            self.open_dropdown();
        }
    }

    /// Reset to an empty query and report an empty result set.
    pub fn clear(&mut self) {
        self.query.clear();
        self.suggestions.clear();
        self.selected = None;
        self.wants_dropdown = false;
        self.close_dropdown();
        self.pending_search = None;
        self.in_flight = None;
        (self.on_results)(&[], "");
    }

    /// Run whatever work is due at `now`.
    ///
    /// Fires the blur close and the debounced search when their deadlines
    /// have passed, and advances a chunked search by one chunk. Returns
    /// `true` if any of that happened.
    pub fn poll(&mut self, now: Instant) -> bool {
        let mut worked = false;

        if self.pending_close.is_some_and(|due| due <= now) {
            self.pending_close = None;
            self.wants_dropdown = false;
            self.close_dropdown();
            worked = true;
        }

        if self.pending_search.is_some_and(|due| due <= now) {
            self.pending_search = None;
            self.fire_search();
            worked = true;
        } else if self.in_flight.is_some() {
            self.advance_in_flight();
            worked = true;
        }

        worked
    }

    fn fire_search(&mut self) {
        debug!(query = %self.query, "debounce fired");
        match self.options.chunk_size {
            Some(chunk) if self.dataset.len() > chunk => {
                let session =
                    IncrementalSearch::new(self.dataset, self.fields, &self.query, &self.options);
                self.in_flight = Some(InFlight {
                    session,
                    query: self.query.clone(),
                });
                self.advance_in_flight();
            }
            _ => {
                let results = search(self.dataset, self.fields, &self.query, &self.options);
                let query = self.query.clone();
                self.complete(&results, &query);
            }
        }
    }

    fn advance_in_flight(&mut self) {
        let chunk = self.options.chunk_size.unwrap_or(usize::MAX);
        let done = match self.in_flight.as_mut() {
            Some(flight) => flight.session.step(chunk),
            None => return,
        };
        if done {
            if let Some(flight) = self.in_flight.take() {
                let results = flight.session.finish();
                self.complete(&results, &flight.query);
            }
        }
    }

    /// Deliver results and refresh the dropdown for `query`.
    fn complete(&mut self, results: &[SearchResult<'a, T>], query: &str) {
        (self.on_results)(results, query);

        self.selected = None;
        if self.options.show_suggestions && char_count(query.trim()) >= MIN_SUGGEST_QUERY_CHARS {
            self.suggestions = suggest_with_limit(
                query,
                self.history.entries(),
                self.dataset,
                self.fields,
                self.options.max_suggestions,
            );
            if self.wants_dropdown && !self.suggestions.is_empty() {
                self.open_dropdown();
            } else {
                self.close_dropdown();
            }
        } else {
            self.suggestions.clear();
            self.close_dropdown();
        }
    }

    fn adopt_suggestion(&mut self, index: usize, now: Instant) -> bool {
        let Some(suggestion) = self.suggestions.get(index).cloned() else {
            return false;
        };
        self.query = suggestion.clone();
        self.selected = None;
        self.wants_dropdown = false;
        self.pending_close = None;
        self.close_dropdown();
        self.record_history(suggestion);
        // Refresh results for the adopted text without reopening the dropdown.
        self.in_flight = None;
        self.pending_search = Some(now + self.options.debounce());
        true
    }

    fn record_history(&mut self, query: String) {
        debug!(%query, "recording search history");
        self.history.push(query);
    }

    fn query_is_suggestable(&self) -> bool {
        char_count(self.query.trim()) >= MIN_SUGGEST_QUERY_CHARS
    }

    fn open_dropdown(&mut self) {
        if !self.dropdown_open {
            debug!(suggestions = self.suggestions.len(), "dropdown opened");
        }
        self.dropdown_open = true;
    }

    fn close_dropdown(&mut self) {
        if self.dropdown_open {
            debug!("dropdown closed");
        }
        self.dropdown_open = false;
        self.selected = None;
    }
}
