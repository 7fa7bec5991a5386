use std::fmt::Write;

use shortdash_core::{AccessEvent, AppViewModel, AuthPhase, StatsReport, StatsState, UrlRowView};

use super::constants::*;

/// Full text frame for the current view.
pub fn render(view: &AppViewModel) -> String {
    let mut out = String::new();

    let banner = match (&view.auth, &view.user) {
        (AuthPhase::Authenticated, Some(user)) => {
            format!("signed in as {} <{}>", user.name, user.email)
        }
        (AuthPhase::Authenticating, _) => "signing in...".to_string(),
        _ => "not signed in (login <username> <password>)".to_string(),
    };
    push_line(&mut out, &format!("== shortdash == {banner}"));

    if let Some(error) = &view.auth_error {
        push_line(&mut out, &format!("! {error}"));
    }
    if let Some(notice) = &view.notice {
        push_line(&mut out, &format!("! {notice}"));
    }

    if view.auth != AuthPhase::Authenticated {
        return out;
    }

    render_shorten(&mut out, view);
    render_urls(&mut out, view);
    render_stats(&mut out, &view.stats);
    out
}

fn render_shorten(out: &mut String, view: &AppViewModel) {
    let shorten = &view.shorten;
    if shorten.in_flight {
        push_line(out, "shortening...");
    }
    if let Some(short_url) = &shorten.short_url {
        push_line(out, &format!("short url: {short_url}"));
    }
    if let Some(error) = &shorten.error {
        push_line(out, &format!("! {error}"));
    }
}

fn render_urls(out: &mut String, view: &AppViewModel) {
    let status = if view.refreshing { " (refreshing...)" } else { "" };
    push_line(out, "");
    push_line(out, &format!("urls: {}{status}", view.urls.len()));

    if let Some(error) = &view.urls_error {
        push_line(out, &format!("! could not load urls: {error}"));
    }
    if view.urls.is_empty() {
        let hint = if view.urls_loaded {
            "  no shortened urls yet"
        } else {
            "  loading..."
        };
        push_line(out, hint);
        return;
    }

    for row in &view.urls {
        push_line(out, &url_row(row));
    }
}

fn url_row(row: &UrlRowView) -> String {
    let marker = if row.selected { '>' } else { ' ' };
    format!(
        "{marker} {:>5}  {:<10}  {}  {}",
        row.id, row.hash, row.created_at, row.original_url
    )
}

fn render_stats(out: &mut String, stats: &StatsState) {
    match stats {
        StatsState::Idle => {}
        StatsState::Loading { hash } => {
            push_line(out, "");
            push_line(out, &format!("stats for {hash}: loading..."));
        }
        StatsState::Empty { hash } => {
            push_line(out, "");
            push_line(out, &format!("stats for {hash}: no accesses recorded yet"));
        }
        StatsState::Failed { hash, message } => {
            push_line(out, "");
            push_line(out, &format!("stats for {hash}: ! {message}"));
        }
        StatsState::Ready { hash, report } => {
            push_line(out, "");
            push_line(out, &format!("stats for {hash}:"));
            render_report(out, report);
        }
    }
}

fn render_report(out: &mut String, report: &StatsReport) {
    let summary = &report.summary;
    push_line(
        out,
        &format!(
            "  accesses: {}  distinct ips: {}  average per day: {:.2}",
            summary.total_accesses, summary.total_distinct_ips, summary.average_accesses_per_day
        ),
    );

    let daily = summary.daily_series();
    if !daily.is_empty() {
        push_line(out, "  per day:");
        let peak = daily.iter().map(|(_, count)| *count).max().unwrap_or(0);
        for (day, count) in &daily {
            push_line(out, &format!("    {day}  {}  {count}", bar(*count, peak)));
        }
    }

    if !summary.ip_distribution.is_empty() {
        push_line(out, "  by ip:");
        for share in &summary.ip_distribution {
            push_line(
                out,
                &format!(
                    "    {:<39}  {:>5}%  ({})",
                    share.ip,
                    share.percentage_label(),
                    share.count
                ),
            );
        }
    }

    if !report.accesses.is_empty() {
        push_line(out, "  accesses:");
        for access in report.accesses.iter().take(MAX_ACCESS_ROWS) {
            push_line(out, &access_row(access));
        }
        let hidden = report.accesses.len().saturating_sub(MAX_ACCESS_ROWS);
        if hidden > 0 {
            push_line(out, &format!("    ... and {hidden} more"));
        }
    }
}

fn access_row(access: &AccessEvent) -> String {
    format!(
        "    {}  {}",
        access.accessed_at.format(ACCESS_TIME_FORMAT),
        access.request_ip
    )
}

/// Scales `count` against `peak`; any non-zero count gets at least one mark.
fn bar(count: u64, peak: u64) -> String {
    if peak == 0 || count == 0 {
        return String::new();
    }
    let width = (count as u128 * BAR_WIDTH as u128 / peak as u128) as usize;
    "#".repeat(width.max(1))
}

fn push_line(out: &mut String, line: &str) {
    let _ = writeln!(out, "{line}");
}
