use crate::{
    AppState, AuthFailure, AuthPhase, AuthResolution, Effect, Msg, ShortenRejected, StatsState,
    SubmitRejected,
};

const SIGN_IN_FIRST: &str = "sign in first";

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::SessionRestored(session) => {
            if state.auth.restore(session) {
                state.mark_dirty();
                start_refresh(&mut state)
            } else {
                Vec::new()
            }
        }
        Msg::LoginSubmitted { username, password } => {
            let result = state.auth.submit(&username, &password);
            state.mark_dirty();
            match result {
                Ok(request) => {
                    state.notice = None;
                    vec![Effect::VerifyCredentials(request)]
                }
                Err(SubmitRejected::Busy) => {
                    state.notice = Some("login already in progress".to_string());
                    Vec::new()
                }
                Err(SubmitRejected::AlreadyAuthenticated) => {
                    state.notice = Some("already signed in".to_string());
                    Vec::new()
                }
                Err(SubmitRejected::Invalid(err)) => {
                    state.notice = Some(err.to_string());
                    Vec::new()
                }
            }
        }
        Msg::CredentialsVerified(result) => {
            match state.auth.complete(result.map_err(AuthFailure::Transport)) {
                AuthResolution::Ignored => Vec::new(),
                AuthResolution::Failed(_) => {
                    state.mark_dirty();
                    Vec::new()
                }
                AuthResolution::Authenticated(session) => {
                    state.mark_dirty();
                    let mut effects = vec![Effect::PersistSession(session)];
                    effects.extend(start_refresh(&mut state));
                    effects
                }
            }
        }
        Msg::LogoutClicked => {
            if state.auth.logout() {
                state.urls.reset();
                state.stats = StatsState::Idle;
                state.shorten.reset();
                state.notice = None;
                state.mark_dirty();
                vec![Effect::ClearSession]
            } else if state.auth.phase() == AuthPhase::Unauthenticated {
                // Nothing to end, but make sure no stale record survives.
                vec![Effect::ClearSession]
            } else {
                Vec::new()
            }
        }
        Msg::RefreshClicked => {
            if state.auth.is_authenticated() {
                state.notice = None;
                state.mark_dirty();
                start_refresh(&mut state)
            } else {
                refuse_unauthenticated(&mut state)
            }
        }
        Msg::UrlsLoaded { token, result } => {
            if !state.auth.is_authenticated() {
                return (state, Vec::new());
            }
            match state.urls.apply_refresh(token, result) {
                None => return (state, Vec::new()),
                Some(Ok(outcome)) if outcome.selection_cleared => {
                    state.stats = StatsState::Idle;
                }
                Some(_) => {}
            }
            state.mark_dirty();
            Vec::new()
        }
        Msg::UrlSelected { id } => {
            if !state.auth.is_authenticated() {
                return refuse(state);
            }
            state.mark_dirty();
            match state.urls.select(id) {
                Some(ticket) => {
                    state.notice = None;
                    state.stats = StatsState::Loading {
                        hash: ticket.hash.clone(),
                    };
                    vec![Effect::FetchStats(ticket)]
                }
                None => {
                    state.stats = StatsState::Idle;
                    state.notice = Some(format!("no shortened url with id {id}"));
                    Vec::new()
                }
            }
        }
        Msg::SelectionCleared => {
            if state.urls.selected_id().is_some() || state.stats != StatsState::Idle {
                state.urls.clear_selection();
                state.stats = StatsState::Idle;
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::StatsLoaded { token, result } => {
            if !state.auth.is_authenticated() || !state.urls.is_current(token) {
                return (state, Vec::new());
            }
            let Some(hash) = state.urls.selected().map(|record| record.hash.clone()) else {
                return (state, Vec::new());
            };
            state.stats = match result {
                Ok(payload) => {
                    let report = payload.into_report();
                    if report.summary.is_empty() {
                        StatsState::Empty { hash }
                    } else {
                        StatsState::Ready { hash, report }
                    }
                }
                Err(err) => StatsState::Failed {
                    hash,
                    message: format!("could not load statistics: {err}"),
                },
            };
            state.mark_dirty();
            Vec::new()
        }
        Msg::ShortenSubmitted(form) => {
            if !state.auth.is_authenticated() {
                return refuse(state);
            }
            state.mark_dirty();
            match state.shorten.begin(&form) {
                Ok(ticket) => {
                    state.notice = None;
                    vec![Effect::Shorten(ticket)]
                }
                Err(ShortenRejected::InFlight) => {
                    state.notice = Some("a url is already being shortened".to_string());
                    Vec::new()
                }
                Err(ShortenRejected::Invalid(_)) => Vec::new(),
            }
        }
        Msg::ShortenCompleted { token, result } => {
            if !state.auth.is_authenticated() {
                return (state, Vec::new());
            }
            let succeeded = result.is_ok();
            if !state.shorten.complete(token, result) {
                return (state, Vec::new());
            }
            state.mark_dirty();
            if succeeded {
                start_refresh(&mut state)
            } else {
                Vec::new()
            }
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn start_refresh(state: &mut AppState) -> Vec<Effect> {
    match state.urls.begin_refresh() {
        Some(token) => vec![Effect::FetchUrls(token)],
        None => Vec::new(),
    }
}

fn refuse_unauthenticated(state: &mut AppState) -> Vec<Effect> {
    state.notice = Some(SIGN_IN_FIRST.to_string());
    state.mark_dirty();
    Vec::new()
}

fn refuse(mut state: AppState) -> (AppState, Vec<Effect>) {
    let effects = refuse_unauthenticated(&mut state);
    (state, effects)
}
