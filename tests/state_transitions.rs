/// Reducer-level coverage of the search state machine: every transition in
/// the table plus the guards (whitespace no-op, stale outcomes, home reset).
use market_insight::models::{ChartPoint, SearchResult, SourceRef, StockData};
use market_insight::search_client::SearchError;
use market_insight::state::{
    reduce, Command, SearchEvent, SearchOutcome, SearchState, ViewState, SEARCH_FAILED_MESSAGE,
};

fn submit(state: &SearchState, query: &str) -> SearchState {
    reduce(
        state,
        &SearchEvent::QuerySubmitted {
            query: query.to_string(),
        },
    )
    .next
}

fn finish(state: &SearchState, seq: u64, outcome: SearchOutcome) -> SearchState {
    reduce(state, &SearchEvent::SearchFinished { seq, outcome }).next
}

fn tesla_result() -> SearchResult {
    SearchResult {
        data: Some(StockData {
            symbol: "TSLA".to_string(),
            name: "Tesla, Inc.".to_string(),
            price: "$251.52".to_string(),
            change: "+3.40".to_string(),
            change_percent: "+1.37%".to_string(),
            market_cap: "$800.1B".to_string(),
            pe_ratio: "71.2".to_string(),
            description: "Electric vehicles and energy storage.".to_string(),
            sector: "Consumer Cyclical".to_string(),
            high_52: "$299.29".to_string(),
            low_52: "$138.80".to_string(),
            chart_data: vec![
                ChartPoint {
                    time: "2025-07-01".to_string(),
                    value: 240.1,
                },
                ChartPoint {
                    time: "2025-07-02".to_string(),
                    value: 244.7,
                },
            ],
        }),
        analysis: "Tesla remains volatile.".to_string(),
        sources: vec![SourceRef {
            uri: "https://example.com/tsla".to_string(),
            title: "Tesla quote".to_string(),
        }],
    }
}

#[test]
fn submit_transitions_to_loading_before_any_outcome() {
    let state = SearchState::new();
    let reduction = reduce(
        &state,
        &SearchEvent::QuerySubmitted {
            query: "TSLA".to_string(),
        },
    );

    // The transition is synchronous: Loading holds as soon as the event is
    // reduced, with the search only requested via the returned command.
    assert_eq!(reduction.next.view, ViewState::Loading);
    assert!(reduction.next.result.is_none());
    assert!(reduction.next.error.is_none());
    assert_eq!(
        reduction.command,
        Some(Command::StartSearch {
            seq: 1,
            query: "TSLA".to_string()
        })
    );
}

#[test]
fn whitespace_submit_is_a_noop() {
    let state = SearchState::new();

    for query in ["", "   ", "\t", " \n "] {
        let reduction = reduce(
            &state,
            &SearchEvent::QuerySubmitted {
                query: query.to_string(),
            },
        );
        assert_eq!(reduction.next.view, ViewState::Idle, "no transition for {:?}", query);
        assert_eq!(reduction.next.query, "", "query unchanged for {:?}", query);
        assert!(reduction.command.is_none(), "no call made for {:?}", query);
    }
}

#[test]
fn resolved_outcome_stores_the_exact_result() {
    let state = submit(&SearchState::new(), "TSLA");
    let result = tesla_result();

    let state = finish(&state, state.seq, SearchOutcome::Resolved(result.clone()));

    assert_eq!(state.view, ViewState::Success);
    assert_eq!(state.result, Some(result), "displayed result matches payload exactly");
    assert!(state.error.is_none());
}

#[test]
fn null_data_result_is_still_success() {
    let state = submit(&SearchState::new(), "ZZZZ999");
    let result = SearchResult {
        data: None,
        analysis: "No matching security found".to_string(),
        sources: vec![],
    };

    let state = finish(&state, state.seq, SearchOutcome::Resolved(result.clone()));

    assert_eq!(state.view, ViewState::Success);
    assert_eq!(state.result, Some(result));
}

#[test]
fn rejection_shows_only_the_fixed_message() {
    let state = submit(&SearchState::new(), "AAPL");

    let failures = [
        SearchError::RequestFailed("dns error".to_string()),
        SearchError::RateLimited,
        SearchError::ApiError {
            status: 500,
            message: "internal".to_string(),
        },
        SearchError::MalformedResponse("bad json".to_string()),
    ];

    for failure in failures {
        let next = finish(&state, state.seq, SearchOutcome::Rejected(failure.clone()));
        assert_eq!(next.view, ViewState::Error);
        assert!(next.result.is_none());

        let message = next.error.expect("error message present");
        assert_eq!(message, SEARCH_FAILED_MESSAGE);
        assert!(
            !message.contains("dns") && !message.contains("500") && !message.contains("json"),
            "underlying detail must never leak for {:?}",
            failure
        );
    }
}

#[test]
fn resubmitting_from_success_clears_previous_result() {
    let state = submit(&SearchState::new(), "TSLA");
    let state = finish(&state, state.seq, SearchOutcome::Resolved(tesla_result()));
    assert_eq!(state.view, ViewState::Success);

    let state = submit(&state, "NVDA");

    assert_eq!(state.view, ViewState::Loading);
    assert!(state.result.is_none(), "stale result cleared before Loading shows");
    assert!(state.error.is_none());
    assert_eq!(state.query, "NVDA");
    assert_eq!(state.seq, 2);
}

#[test]
fn resubmitting_from_error_clears_the_error() {
    let state = submit(&SearchState::new(), "AAPL");
    let state = finish(
        &state,
        state.seq,
        SearchOutcome::Rejected(SearchError::RateLimited),
    );
    assert_eq!(state.view, ViewState::Error);

    let state = submit(&state, "MSFT");

    assert_eq!(state.view, ViewState::Loading);
    assert!(state.error.is_none());
    assert!(state.result.is_none());
}

#[test]
fn dismissing_an_error_returns_to_idle() {
    let state = submit(&SearchState::new(), "AAPL");
    let state = finish(
        &state,
        state.seq,
        SearchOutcome::Rejected(SearchError::RateLimited),
    );

    let state = reduce(&state, &SearchEvent::ErrorDismissed).next;

    assert_eq!(state.view, ViewState::Idle);
    assert!(state.error.is_none());
}

#[test]
fn home_resets_from_every_state() {
    let idle = SearchState::new();
    let loading = submit(&idle, "TSLA");
    let success = finish(&loading, loading.seq, SearchOutcome::Resolved(tesla_result()));
    let error = finish(
        &loading,
        loading.seq,
        SearchOutcome::Rejected(SearchError::RateLimited),
    );

    for state in [idle, loading, success, error] {
        let next = reduce(&state, &SearchEvent::HomeRequested).next;
        assert_eq!(next.view, ViewState::Idle);
        assert_eq!(next.query, "");
        assert!(next.result.is_none(), "no stale result visible after home");
        assert!(next.error.is_none(), "no stale error visible after home");
    }
}

#[test]
fn stale_outcome_never_overwrites_newer_state() {
    // First search goes out, then a second one supersedes it.
    let state = submit(&SearchState::new(), "TSLA");
    let first_seq = state.seq;
    let state = submit(&state, "NVDA");
    let second_seq = state.seq;
    assert!(second_seq > first_seq);

    // The first (stale) response arrives late.
    let state = finish(&state, first_seq, SearchOutcome::Resolved(tesla_result()));
    assert_eq!(state.view, ViewState::Loading, "stale resolve ignored");
    assert!(state.result.is_none());

    // So does a stale failure.
    let state = finish(
        &state,
        first_seq,
        SearchOutcome::Rejected(SearchError::RateLimited),
    );
    assert_eq!(state.view, ViewState::Loading, "stale reject ignored");

    // The current response lands normally.
    let nvda = SearchResult {
        data: None,
        analysis: "NVDA analysis".to_string(),
        sources: vec![],
    };
    let state = finish(&state, second_seq, SearchOutcome::Resolved(nvda.clone()));
    assert_eq!(state.view, ViewState::Success);
    assert_eq!(state.result, Some(nvda));
}

#[test]
fn outcome_arriving_after_home_is_discarded() {
    let state = submit(&SearchState::new(), "TSLA");
    let seq = state.seq;

    let state = reduce(&state, &SearchEvent::HomeRequested).next;
    let state = finish(&state, seq, SearchOutcome::Resolved(tesla_result()));

    assert_eq!(state.view, ViewState::Idle, "in-flight outcome ignored after home");
    assert!(state.result.is_none());
}
