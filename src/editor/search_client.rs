use std::time::{Duration, Instant};

use tracing::debug;

use crate::model::search::{RequestToken, SearchRequest, SearchResponse};
use crate::model::tag::Tag;

/// Default quiet period before a query is sent
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Where the client is in the request cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchState {
    /// Blank query, nothing displayed, nothing pending
    Idle,
    /// Debounce timer armed
    Pending { deadline: Instant },
    /// Request sent, waiting for the answer carrying `token`
    InFlight { token: RequestToken },
    /// Latest answer applied
    Settled,
}

/// What the candidate list should show
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Candidates {
    Hidden,
    Results(Vec<Tag>),
    /// The endpoint answered with zero matches
    NoResults,
    /// The request failed; shown as a placeholder, never retried automatically
    Failed(String),
}

/// Debounced, stale-safe incremental search over an external endpoint.
///
/// The client never talks to the endpoint itself: [`poll`] hands out the
/// request to send and [`apply`] takes the answer back. Only the answer to
/// the most recent request, while no newer keystroke has arrived, ever
/// changes the displayed candidates.
///
/// [`poll`]: SearchClient::poll
/// [`apply`]: SearchClient::apply
#[derive(Debug, Clone)]
pub struct SearchClient {
    query: String,
    state: SearchState,
    latest: RequestToken,
    debounce: Duration,
    candidates: Candidates,
    selected: usize,
}

impl Default for SearchClient {
    fn default() -> Self {
        SearchClient::new(DEFAULT_DEBOUNCE)
    }
}

impl SearchClient {
    pub fn new(debounce: Duration) -> Self {
        SearchClient {
            query: String::new(),
            state: SearchState::Idle,
            latest: RequestToken::default(),
            debounce,
            candidates: Candidates::Hidden,
            selected: 0,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn state(&self) -> SearchState {
        self.state
    }

    pub fn candidates(&self) -> &Candidates {
        &self.candidates
    }

    /// The most recently issued request token
    pub fn latest_token(&self) -> RequestToken {
        self.latest
    }

    /// True while a request is armed or outstanding
    pub fn is_busy(&self) -> bool {
        matches!(
            self.state,
            SearchState::Pending { .. } | SearchState::InFlight { .. }
        )
    }

    /// Replace the query text. Any armed timer is dropped and any outstanding
    /// request is invalidated. Returns whether the displayed candidates
    /// changed (a blank query hides them immediately).
    pub fn set_query(&mut self, text: &str, now: Instant) -> bool {
        self.query = text.to_string();
        if text.trim().is_empty() {
            self.state = SearchState::Idle;
            self.selected = 0;
            let changed = self.candidates != Candidates::Hidden;
            self.candidates = Candidates::Hidden;
            return changed;
        }
        self.state = SearchState::Pending {
            deadline: now + self.debounce,
        };
        false
    }

    /// When the armed timer (if any) fires
    pub fn next_deadline(&self) -> Option<Instant> {
        match self.state {
            SearchState::Pending { deadline } => Some(deadline),
            _ => None,
        }
    }

    /// Fire the debounce timer if it is due, returning the request to send.
    pub fn poll(&mut self, now: Instant) -> Option<SearchRequest> {
        match self.state {
            SearchState::Pending { deadline } if now >= deadline => {
                self.latest = self.latest.next();
                self.state = SearchState::InFlight { token: self.latest };
                Some(SearchRequest {
                    token: self.latest,
                    query: self.query.trim().to_string(),
                })
            }
            _ => None,
        }
    }

    /// Apply an endpoint answer. Returns false (and changes nothing) when the
    /// answer is stale.
    pub fn apply(&mut self, response: SearchResponse) -> bool {
        match self.state {
            SearchState::InFlight { token } if token == response.token => {}
            _ => {
                debug!(
                    token = response.token.0,
                    latest = self.latest.0,
                    "dropping stale search response"
                );
                return false;
            }
        }
        self.candidates = match response.outcome {
            Ok(tags) if tags.is_empty() => Candidates::NoResults,
            Ok(tags) => Candidates::Results(tags),
            Err(reason) => Candidates::Failed(reason),
        };
        self.selected = 0;
        self.state = SearchState::Settled;
        true
    }

    /// The displayed result rows (empty for placeholders)
    pub fn results(&self) -> &[Tag] {
        match &self.candidates {
            Candidates::Results(tags) => tags,
            _ => &[],
        }
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn selected_tag(&self) -> Option<&Tag> {
        self.results().get(self.selected)
    }

    pub fn select(&mut self, index: usize) {
        let len = self.results().len();
        if len > 0 {
            self.selected = index.min(len - 1);
        }
    }

    pub fn select_next(&mut self) {
        self.select(self.selected.saturating_add(1));
    }

    pub fn select_prev(&mut self) {
        self.select(self.selected.saturating_sub(1));
    }
}
