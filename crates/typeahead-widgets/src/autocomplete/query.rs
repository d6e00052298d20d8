#![forbid(unsafe_code)]

//! Query pipeline: input text to result list.
//!
//! Two providers exist. [`ResultProvider::Sync`] filters the candidate list
//! in place on every query change. [`ResultProvider::Async`] hands the query
//! to a [`SearchBackend`] as a [`PendingLookup`] that the host runs off the
//! UI thread; the lookup resolves into [`Intent::LookupResolved`].
//!
//! Every async lookup is stamped with a [`LookupToken`] from the pipeline's
//! sequencer. Only the most recently issued token is accepted, so a slow
//! response for an old query can never overwrite newer results.

use std::fmt;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use super::Intent;

/// The static candidate list, shared read-only between instances.
pub type Candidates = Arc<[String]>;

/// Build a shared candidate list.
pub fn candidates<I, S>(values: I) -> Candidates
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    values.into_iter().map(Into::into).collect()
}

/// Every candidate whose lowercase form contains the query's lowercase form,
/// in source order. An empty query matches nothing.
pub fn filter_candidates(candidates: &[String], query: &str) -> Vec<String> {
    if query.is_empty() {
        return Vec::new();
    }
    let needle = query.to_lowercase();
    candidates
        .iter()
        .filter(|candidate| candidate.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

/// Why an async lookup failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// The backend could not be reached or refused the query.
    Unavailable(String),
    /// The backend did not answer in time.
    TimedOut,
    /// The lookup was abandoned before producing results.
    Cancelled,
}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable(reason) => write!(f, "search backend unavailable: {reason}"),
            Self::TimedOut => write!(f, "search timed out"),
            Self::Cancelled => write!(f, "search cancelled"),
        }
    }
}

impl std::error::Error for LookupError {}

/// Result of one async lookup.
pub type LookupOutcome = Result<Vec<String>, LookupError>;

/// A search service queried off the UI thread.
///
/// `search` may block; it runs on a runtime worker thread.
pub trait SearchBackend: Send + Sync {
    fn search(&self, query: &str) -> LookupOutcome;
}

/// Default lookup delay of [`SimulatedSearch`].
pub const DEFAULT_LOOKUP_DELAY: Duration = Duration::from_millis(1000);

/// In-memory backend that sleeps before answering, standing in for a
/// network service.
#[derive(Debug, Clone)]
pub struct SimulatedSearch {
    candidates: Candidates,
    delay: Duration,
}

impl SimulatedSearch {
    pub fn new(candidates: Candidates) -> Self {
        Self {
            candidates,
            delay: DEFAULT_LOOKUP_DELAY,
        }
    }

    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl SearchBackend for SimulatedSearch {
    fn search(&self, query: &str) -> LookupOutcome {
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
        // Unlike the sync filter, an empty query matches everything here;
        // the widget discards results for an empty query on resolution.
        let needle = query.to_lowercase();
        Ok(self
            .candidates
            .iter()
            .filter(|candidate| candidate.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }
}

/// Identifier of an issued async lookup. Tokens increase monotonically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LookupToken(u64);

impl fmt::Display for LookupToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Issues lookup tokens and tracks which one is still in flight.
#[derive(Debug, Default)]
pub struct LookupSequencer {
    next: u64,
    in_flight: Option<LookupToken>,
}

impl LookupSequencer {
    /// Issue a new token. It supersedes any earlier token.
    pub fn issue(&mut self) -> LookupToken {
        self.next += 1;
        let token = LookupToken(self.next);
        self.in_flight = Some(token);
        token
    }

    /// Accept a resolution if `token` is the latest issued and unresolved.
    ///
    /// Returns `false` for superseded or already-resolved tokens.
    pub fn accept(&mut self, token: LookupToken) -> bool {
        if self.in_flight == Some(token) {
            self.in_flight = None;
            true
        } else {
            false
        }
    }

    /// Whether the latest lookup is still in flight.
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }
}

/// An issued async lookup waiting to be run.
///
/// Running it blocks for as long as the backend takes, so hosts run it on a
/// worker thread and feed the returned intent back to the widget.
#[derive(Clone)]
pub struct PendingLookup {
    token: LookupToken,
    query: String,
    backend: Arc<dyn SearchBackend>,
}

impl fmt::Debug for PendingLookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingLookup")
            .field("token", &self.token)
            .field("query", &self.query)
            .finish_non_exhaustive()
    }
}

impl PendingLookup {
    pub fn token(&self) -> LookupToken {
        self.token
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Run the lookup to completion.
    pub fn run(self) -> Intent {
        let outcome = self.backend.search(&self.query);
        Intent::LookupResolved {
            token: self.token,
            outcome,
        }
    }
}

/// What a provider produced for a query.
#[derive(Debug)]
pub enum Fetch {
    /// Results are available now.
    Ready(Vec<String>),
    /// Results arrive later through the lookup.
    Pending(PendingLookup),
}

/// Where results come from. Chosen once at construction.
#[derive(Clone)]
pub enum ResultProvider {
    /// Synchronous in-memory substring filter.
    Sync(Candidates),
    /// Out-of-thread lookup against a search backend.
    Async(Arc<dyn SearchBackend>),
}

impl fmt::Debug for ResultProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sync(c) => f.debug_tuple("Sync").field(&c.len()).finish(),
            Self::Async(_) => f.write_str("Async(..)"),
        }
    }
}

impl ResultProvider {
    /// Async provider over a [`SimulatedSearch`] with the given delay.
    pub fn simulated(candidates: Candidates, delay: Duration) -> Self {
        Self::Async(Arc::new(SimulatedSearch::new(candidates).with_delay(delay)))
    }

    pub fn is_async(&self) -> bool {
        matches!(self, Self::Async(_))
    }

    /// Produce results for `query`, issuing a token from `sequencer` when
    /// the lookup is async.
    pub fn fetch(&self, query: &str, sequencer: &mut LookupSequencer) -> Fetch {
        match self {
            Self::Sync(candidates) => Fetch::Ready(filter_candidates(candidates, query)),
            Self::Async(backend) => Fetch::Pending(PendingLookup {
                token: sequencer.issue(),
                query: query.to_owned(),
                backend: Arc::clone(backend),
            }),
        }
    }
}

/// The provider plus the token sequencer that guards its resolutions.
#[derive(Debug)]
pub struct QueryPipeline {
    provider: ResultProvider,
    sequencer: LookupSequencer,
}

impl QueryPipeline {
    pub fn new(provider: ResultProvider) -> Self {
        Self {
            provider,
            sequencer: LookupSequencer::default(),
        }
    }

    pub fn is_async(&self) -> bool {
        self.provider.is_async()
    }

    /// Start producing results for a new query.
    pub fn submit(&mut self, query: &str) -> Fetch {
        self.provider.fetch(query, &mut self.sequencer)
    }

    /// Whether a resolution for `token` should be applied.
    pub fn accept(&mut self, token: LookupToken) -> bool {
        self.sequencer.accept(token)
    }

    /// Whether the latest lookup is in flight.
    pub fn is_loading(&self) -> bool {
        self.sequencer.is_in_flight()
    }
}
