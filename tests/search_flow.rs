/// End-to-end controller flow against stub clients: submissions run as real
/// async tasks and their outcomes are applied in arrival order, exactly like
/// the TUI loop does when draining its channel.
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

use market_insight::models::{SearchResult, StockData};
use market_insight::search_client::{SearchError, StockSearch};
use market_insight::state::{
    reduce, Command, SearchEvent, SearchOutcome, SearchState, ViewState, SEARCH_FAILED_MESSAGE,
};

/// Stub that resolves with a canned result after an optional delay.
struct StubSearch {
    delay: Duration,
    response: Result<SearchResult, SearchError>,
}

#[async_trait]
impl StockSearch for StubSearch {
    async fn search(&self, _query: &str) -> Result<SearchResult, SearchError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.response.clone()
    }
}

fn result_for(symbol: &str) -> SearchResult {
    SearchResult {
        data: Some(StockData {
            symbol: symbol.to_string(),
            name: format!("{} Inc.", symbol),
            ..Default::default()
        }),
        analysis: format!("Analysis of {}", symbol),
        sources: vec![],
    }
}

/// Run one submit → outcome round trip through reducer and task, the way the
/// controller does.
async fn run_search(
    state: &SearchState,
    client: Arc<dyn StockSearch>,
    query: &str,
) -> SearchState {
    let (tx, mut rx) = mpsc::unbounded_channel();

    let reduction = reduce(
        state,
        &SearchEvent::QuerySubmitted {
            query: query.to_string(),
        },
    );
    let mut state = reduction.next;
    assert_eq!(state.view, ViewState::Loading, "Loading shows before the call resolves");

    if let Some(Command::StartSearch { seq, query }) = reduction.command {
        let tx = tx.clone();
        tokio::spawn(async move {
            let outcome = match client.search(&query).await {
                Ok(result) => SearchOutcome::Resolved(result),
                Err(err) => SearchOutcome::Rejected(err),
            };
            let _ = tx.send((seq, outcome));
        });
    }

    let (seq, outcome) = rx.recv().await.expect("outcome arrives");
    state = reduce(&state, &SearchEvent::SearchFinished { seq, outcome }).next;
    state
}

#[tokio::test]
async fn resolving_client_lands_in_success() {
    let client = Arc::new(StubSearch {
        delay: Duration::ZERO,
        response: Ok(result_for("TSLA")),
    });

    let state = run_search(&SearchState::new(), client, "TSLA").await;

    assert_eq!(state.view, ViewState::Success);
    let result = state.result.expect("result stored");
    assert_eq!(result.data.unwrap().symbol, "TSLA");
}

#[tokio::test]
async fn rejecting_client_lands_in_error_with_fixed_message() {
    let client = Arc::new(StubSearch {
        delay: Duration::ZERO,
        response: Err(SearchError::RequestFailed("connection refused".to_string())),
    });

    let state = run_search(&SearchState::new(), client, "AAPL").await;

    assert_eq!(state.view, ViewState::Error);
    assert_eq!(state.error.as_deref(), Some(SEARCH_FAILED_MESSAGE));
    assert!(state.result.is_none());
}

#[tokio::test]
async fn only_the_latest_request_is_ever_displayed() {
    // A slow search is superseded by a fast one; both outcomes are applied in
    // arrival order (fast first, slow later), and the slow one must not win.
    let slow: Arc<dyn StockSearch> = Arc::new(StubSearch {
        delay: Duration::from_millis(80),
        response: Ok(result_for("OLD")),
    });
    let fast: Arc<dyn StockSearch> = Arc::new(StubSearch {
        delay: Duration::from_millis(5),
        response: Ok(result_for("NEW")),
    });

    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut state = SearchState::new();

    for (client, query) in [(slow, "OLD"), (fast, "NEW")] {
        let reduction = reduce(
            &state,
            &SearchEvent::QuerySubmitted {
                query: query.to_string(),
            },
        );
        state = reduction.next;
        if let Some(Command::StartSearch { seq, query }) = reduction.command {
            let tx = tx.clone();
            tokio::spawn(async move {
                let outcome = match client.search(&query).await {
                    Ok(result) => SearchOutcome::Resolved(result),
                    Err(err) => SearchOutcome::Rejected(err),
                };
                let _ = tx.send((seq, outcome));
            });
        }
    }
    drop(tx);

    while let Some((seq, outcome)) = rx.recv().await {
        state = reduce(&state, &SearchEvent::SearchFinished { seq, outcome }).next;
    }

    assert_eq!(state.view, ViewState::Success);
    let symbol = state.result.unwrap().data.unwrap().symbol;
    assert_eq!(symbol, "NEW", "stale in-flight response must not overwrite newer state");
}
