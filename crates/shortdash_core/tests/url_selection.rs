use chrono::{DateTime, Utc};
use shortdash_core::{
    update, AccessEvent, AppState, AuthVerdict, Effect, LoginSession, Msg, ShortenedUrl,
    StatsPayload, StatsState, StatsTicket, TransportError, User,
};

fn ts(raw: &str) -> DateTime<Utc> {
    raw.parse().expect("valid timestamp")
}

fn record(id: u64, hash: &str) -> ShortenedUrl {
    ShortenedUrl {
        id,
        site_id: 7,
        original_url: format!("https://{hash}.example.com"),
        hash: hash.to_string(),
        created_at: ts("2024-01-01T00:00:00Z"),
    }
}

fn event(at: &str, ip: &str) -> AccessEvent {
    AccessEvent {
        accessed_at: ts(at),
        request_ip: ip.to_string(),
    }
}

fn signed_in_with(records: Vec<ShortenedUrl>) -> AppState {
    let user = User {
        name: "Ana".into(),
        email: "ana@example.com".into(),
        contact: "555".into(),
    };
    let (state, _) = update(
        AppState::new(),
        Msg::SessionRestored(Some(LoginSession::authenticated(user))),
    );
    list_reply(state, Ok(records))
}

/// Answers the list request currently in flight.
fn list_reply(state: AppState, result: Result<Vec<ShortenedUrl>, TransportError>) -> AppState {
    let token = state.urls().pending_refresh().expect("a list request is pending");
    update(state, Msg::UrlsLoaded { token, result }).0
}

fn select(state: AppState, id: u64) -> (AppState, StatsTicket) {
    let (state, effects) = update(state, Msg::UrlSelected { id });
    match effects.as_slice() {
        [Effect::FetchStats(ticket)] => (state, ticket.clone()),
        other => panic!("expected FetchStats, got {other:?}"),
    }
}

#[test]
fn records_keep_backend_order() {
    let state = signed_in_with(vec![record(3, "c"), record(1, "a"), record(2, "b")]);
    let ids: Vec<_> = state.view().urls.iter().map(|row| row.id).collect();
    assert_eq!(ids, vec![3, 1, 2]);
}

#[test]
fn selecting_marks_row_and_requests_stats_for_its_hash() {
    let state = signed_in_with(vec![record(1, "abc123"), record(2, "zzz")]);
    let (state, ticket) = select(state, 1);

    assert_eq!(ticket.hash, "abc123");
    let view = state.view();
    assert!(view.urls[0].selected);
    assert!(!view.urls[1].selected);
    assert_eq!(
        view.stats,
        StatsState::Loading {
            hash: "abc123".into()
        }
    );
}

#[test]
fn slow_response_for_previous_selection_is_discarded() {
    let state = signed_in_with(vec![record(1, "aaa"), record(2, "bbb")]);
    let (state, ticket_a) = select(state, 1);
    let (state, ticket_b) = select(state, 2);

    // B resolves first, then A's late answer shows up.
    let (state, _) = update(
        state,
        Msg::StatsLoaded {
            token: ticket_b.token,
            result: Ok(StatsPayload::Events(vec![event(
                "2024-02-01T08:00:00Z",
                "2.2.2.2",
            )])),
        },
    );
    let (mut state, effects) = update(
        state,
        Msg::StatsLoaded {
            token: ticket_a.token,
            result: Ok(StatsPayload::Events(vec![
                event("2024-01-01T08:00:00Z", "1.1.1.1"),
                event("2024-01-01T09:00:00Z", "1.1.1.1"),
            ])),
        },
    );

    assert!(effects.is_empty());
    assert!(state.consume_dirty());
    match state.stats() {
        StatsState::Ready { hash, report } => {
            assert_eq!(hash, "bbb");
            assert_eq!(report.summary.total_accesses, 1);
            assert_eq!(report.accesses[0].request_ip, "2.2.2.2");
        }
        other => panic!("expected stats for bbb, got {other:?}"),
    }
}

#[test]
fn stale_response_arriving_first_is_discarded_too() {
    let state = signed_in_with(vec![record(1, "aaa"), record(2, "bbb")]);
    let (state, ticket_a) = select(state, 1);
    let (state, _ticket_b) = select(state, 2);

    let (state, _) = update(
        state,
        Msg::StatsLoaded {
            token: ticket_a.token,
            result: Ok(StatsPayload::Events(vec![event(
                "2024-01-01T08:00:00Z",
                "1.1.1.1",
            )])),
        },
    );
    assert_eq!(
        state.stats(),
        &StatsState::Loading {
            hash: "bbb".into()
        }
    );
}

#[test]
fn reselecting_same_url_ignores_the_first_request() {
    let state = signed_in_with(vec![record(1, "aaa")]);
    let (state, first) = select(state, 1);
    let (state, second) = select(state, 1);
    assert_ne!(first.token, second.token);

    let (state, _) = update(
        state,
        Msg::StatsLoaded {
            token: first.token,
            result: Err(TransportError::new("network error")),
        },
    );
    assert!(matches!(state.stats(), StatsState::Loading { .. }));
}

#[test]
fn zero_events_render_empty_not_error() {
    let state = signed_in_with(vec![record(1, "aaa")]);
    let (state, ticket) = select(state, 1);
    let (state, _) = update(
        state,
        Msg::StatsLoaded {
            token: ticket.token,
            result: Ok(StatsPayload::Events(Vec::new())),
        },
    );
    assert_eq!(state.stats(), &StatsState::Empty { hash: "aaa".into() });
}

#[test]
fn stats_failure_is_reported_for_current_selection() {
    let state = signed_in_with(vec![record(1, "aaa")]);
    let (state, ticket) = select(state, 1);
    let (state, _) = update(
        state,
        Msg::StatsLoaded {
            token: ticket.token,
            result: Err(TransportError::new("http status 404")),
        },
    );
    assert_eq!(
        state.stats(),
        &StatsState::Failed {
            hash: "aaa".into(),
            message: "could not load statistics: http status 404".into(),
        }
    );
}

#[test]
fn unknown_id_clears_selection_and_invalidates_pending_stats() {
    let state = signed_in_with(vec![record(1, "aaa")]);
    let (state, ticket) = select(state, 1);
    let (state, effects) = update(state, Msg::UrlSelected { id: 42 });
    assert!(effects.is_empty());
    assert_eq!(state.urls().selected_id(), None);

    let (state, _) = update(
        state,
        Msg::StatsLoaded {
            token: ticket.token,
            result: Ok(StatsPayload::Events(vec![event(
                "2024-01-01T08:00:00Z",
                "1.1.1.1",
            )])),
        },
    );
    assert_eq!(state.stats(), &StatsState::Idle);
}

#[test]
fn failed_refresh_keeps_previous_records_and_reports_error() {
    let state = signed_in_with(vec![record(1, "aaa"), record(2, "bbb")]);
    let (state, effects) = update(state, Msg::RefreshClicked);
    let token = state.urls().pending_refresh().expect("refresh in flight");
    assert_eq!(effects, vec![Effect::FetchUrls(token)]);

    let state = list_reply(state, Err(TransportError::new("network error")));
    let view = state.view();
    assert_eq!(view.urls.len(), 2);
    assert_eq!(view.urls_error.as_deref(), Some("network error"));
}

#[test]
fn refresh_replaces_wholesale_and_drops_vanished_selection() {
    let state = signed_in_with(vec![record(1, "aaa"), record(2, "bbb")]);
    let (state, _) = select(state, 2);
    let (state, _) = update(state, Msg::RefreshClicked);
    let state = list_reply(state, Ok(vec![record(5, "eee")]));

    let ids: Vec<_> = state.view().urls.iter().map(|row| row.id).collect();
    assert_eq!(ids, vec![5]);
    assert_eq!(state.urls().selected_id(), None);
    assert_eq!(state.stats(), &StatsState::Idle);
}

#[test]
fn refresh_keeps_selection_that_still_exists() {
    let state = signed_in_with(vec![record(1, "aaa"), record(2, "bbb")]);
    let (state, ticket) = select(state, 2);
    let (state, _) = update(state, Msg::RefreshClicked);
    let state = list_reply(state, Ok(vec![record(9, "new"), record(2, "bbb")]));

    assert_eq!(state.urls().selected_id(), Some(2));
    assert!(state.urls().is_current(ticket.token));
}

#[test]
fn double_refresh_collapses_to_one_request() {
    let state = signed_in_with(vec![record(1, "aaa")]);
    let (state, first) = update(state, Msg::RefreshClicked);
    let (state, second) = update(state, Msg::RefreshClicked);
    let token = state.urls().pending_refresh().expect("refresh in flight");
    assert_eq!(first, vec![Effect::FetchUrls(token)]);
    assert!(second.is_empty());
}

#[test]
fn list_reply_from_a_previous_session_is_ignored() {
    let state = signed_in_with(vec![record(1, "aaa")]);
    let (state, _) = update(state, Msg::RefreshClicked);
    let stale = state.urls().pending_refresh().expect("refresh in flight");
    let (state, _) = update(state, Msg::LogoutClicked);
    let (state, _) = update(
        state,
        Msg::LoginSubmitted {
            username: "ana".into(),
            password: "secret".into(),
        },
    );
    let (mut state, _) = update(
        state,
        Msg::CredentialsVerified(Ok(AuthVerdict::Accepted(User {
            name: "Ana".into(),
            email: "ana@example.com".into(),
            contact: "555".into(),
        }))),
    );
    let current = state.urls().pending_refresh().expect("login starts a refresh");
    assert_ne!(stale, current);
    state.consume_dirty();

    let (mut state, effects) = update(
        state,
        Msg::UrlsLoaded {
            token: stale,
            result: Ok(vec![record(1, "aaa")]),
        },
    );
    assert!(effects.is_empty());
    assert!(!state.consume_dirty());
    assert!(state.view().urls.is_empty());
    assert_eq!(state.urls().pending_refresh(), Some(current));

    let (state, effects) = update(state, Msg::RefreshClicked);
    assert!(effects.is_empty());

    let state = list_reply(state, Ok(vec![record(2, "bbb")]));
    let ids: Vec<_> = state.view().urls.iter().map(|row| row.id).collect();
    assert_eq!(ids, vec![2]);
}

#[test]
fn logout_makes_in_flight_stats_stale() {
    let state = signed_in_with(vec![record(1, "aaa")]);
    let (state, ticket) = select(state, 1);
    let (state, _) = update(state, Msg::LogoutClicked);
    let (state, _) = update(
        state,
        Msg::CredentialsVerified(Ok(AuthVerdict::Rejected)),
    );
    let (state, _) = update(
        state,
        Msg::StatsLoaded {
            token: ticket.token,
            result: Ok(StatsPayload::Events(Vec::new())),
        },
    );
    assert_eq!(state.stats(), &StatsState::Idle);
    assert!(state.view().urls.is_empty());
}

#[test]
fn clearing_selection_returns_to_idle() {
    let state = signed_in_with(vec![record(1, "aaa")]);
    let (state, ticket) = select(state, 1);
    let (state, _) = update(state, Msg::SelectionCleared);
    assert_eq!(state.stats(), &StatsState::Idle);
    assert!(!state.urls().is_current(ticket.token));
}
