//! Events the view controller feeds into the reducer, and the commands it
//! gets back.

use crate::models::SearchResult;
use crate::search_client::SearchError;

/// Everything that can move the search state machine.
#[derive(Debug, Clone)]
pub enum SearchEvent {
    /// User submitted the query input. Whitespace-only input is a no-op.
    QuerySubmitted { query: String },

    /// A search task finished. `seq` is the token the request was issued
    /// with; stale tokens are discarded by the reducer.
    SearchFinished { seq: u64, outcome: SearchOutcome },

    /// User dismissed the error view.
    ErrorDismissed,

    /// User asked to go home (logo/home affordance): back to Idle with an
    /// empty query and nothing displayed.
    HomeRequested,
}

/// Result of one search task, success or typed failure.
#[derive(Debug, Clone)]
pub enum SearchOutcome {
    Resolved(SearchResult),
    Rejected(SearchError),
}

/// Side effects the controller must execute after a reduction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    StartSearch { seq: u64, query: String },
}
