//! The state container and its pure reducer.

use tracing::{debug, info};

use crate::models::SearchResult;
use crate::state::events::{Command, SearchEvent, SearchOutcome};

/// The single user-facing failure text. Underlying causes (network, quota,
/// parse) are deliberately not distinguished on screen; they go to the log.
pub const SEARCH_FAILED_MESSAGE: &str =
    "Sorry, something went wrong while fetching data. It may be a network issue \
     or an API limit. Please try again shortly.";

/// Exactly one of these holds at any time; it alone decides whether a result
/// or an error message is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewState {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

/// The whole view-controller state. Owned by the TUI loop, passed down to
/// renderers, never accessed ambiently.
#[derive(Debug, Clone, Default)]
pub struct SearchState {
    pub view: ViewState,
    /// The query text of the most recently submitted search.
    pub query: String,
    /// Present only in `Success`.
    pub result: Option<SearchResult>,
    /// Present only in `Error`; always `SEARCH_FAILED_MESSAGE`.
    pub error: Option<String>,
    /// Token of the most recently issued request. Outcomes carrying any other
    /// token are stale and ignored, so only the latest search ever lands.
    pub seq: u64,
}

impl SearchState {
    pub fn new() -> Self {
        Self::default()
    }
}

/// What one event produced: the next state and an optional side effect.
#[derive(Debug, Clone)]
pub struct Reduction {
    pub next: SearchState,
    pub command: Option<Command>,
}

impl Reduction {
    fn stay(state: &SearchState) -> Self {
        Self {
            next: state.clone(),
            command: None,
        }
    }
}

/// Pure transition function. No I/O, no clock, no globals; callers apply
/// `next` and execute `command`.
pub fn reduce(state: &SearchState, event: &SearchEvent) -> Reduction {
    match event {
        SearchEvent::QuerySubmitted { query } => {
            let trimmed = query.trim();
            // Whitespace-only input: no transition, no call.
            if trimmed.is_empty() {
                debug!(target: "state", "Ignoring empty query submission");
                return Reduction::stay(state);
            }

            let seq = state.seq + 1;
            info!(target: "state", "Submit #{}: '{}' ({:?} -> Loading)", seq, trimmed, state.view);
            Reduction {
                next: SearchState {
                    view: ViewState::Loading,
                    query: trimmed.to_string(),
                    result: None,
                    error: None,
                    seq,
                },
                command: Some(Command::StartSearch {
                    seq,
                    query: trimmed.to_string(),
                }),
            }
        }

        SearchEvent::SearchFinished { seq, outcome } => {
            if *seq != state.seq || state.view != ViewState::Loading {
                debug!(
                    target: "state",
                    "Discarding stale outcome #{} (current #{}, view {:?})",
                    seq, state.seq, state.view
                );
                return Reduction::stay(state);
            }

            let mut next = state.clone();
            match outcome {
                SearchOutcome::Resolved(result) => {
                    info!(target: "state", "Search #{} resolved (Loading -> Success)", seq);
                    next.view = ViewState::Success;
                    next.result = Some(result.clone());
                    next.error = None;
                }
                SearchOutcome::Rejected(err) => {
                    info!(target: "state", "Search #{} failed: {} (Loading -> Error)", seq, err);
                    next.view = ViewState::Error;
                    next.result = None;
                    next.error = Some(SEARCH_FAILED_MESSAGE.to_string());
                }
            }
            Reduction {
                next,
                command: None,
            }
        }

        SearchEvent::ErrorDismissed => {
            if state.view != ViewState::Error {
                return Reduction::stay(state);
            }
            let mut next = state.clone();
            next.view = ViewState::Idle;
            next.error = None;
            Reduction {
                next,
                command: None,
            }
        }

        SearchEvent::HomeRequested => {
            info!(target: "state", "Home requested ({:?} -> Idle)", state.view);
            Reduction {
                next: SearchState {
                    view: ViewState::Idle,
                    query: String::new(),
                    result: None,
                    error: None,
                    // Keep the token so an in-flight search stays stale.
                    seq: state.seq,
                },
                command: None,
            }
        }
    }
}
