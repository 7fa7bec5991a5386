use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;

use crate::AccessEvent;

/// One slice of the per-IP distribution.
#[derive(Debug, Clone, PartialEq)]
pub struct IpShare {
    pub ip: String,
    pub count: u64,
    /// Share of all accesses in percent, unrounded.
    pub percentage: f64,
}

impl IpShare {
    /// One decimal place, e.g. `66.7`.
    pub fn percentage_label(&self) -> String {
        format!("{:.1}", self.percentage)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct StatsSummary {
    pub total_accesses: u64,
    pub total_distinct_ips: u64,
    pub average_accesses_per_day: f64,
    /// Ordered by count descending, then IP ascending.
    pub ip_distribution: Vec<IpShare>,
    /// UTC calendar day to access count; iterates chronologically.
    pub accesses_per_day: BTreeMap<NaiveDate, u64>,
}

impl StatsSummary {
    pub fn from_events(events: &[AccessEvent]) -> Self {
        let total_accesses = events.len() as u64;

        let mut per_ip: HashMap<&str, u64> = HashMap::new();
        let mut accesses_per_day = BTreeMap::new();
        for event in events {
            *per_ip.entry(event.request_ip.as_str()).or_default() += 1;
            *accesses_per_day
                .entry(event.accessed_at.date_naive())
                .or_default() += 1;
        }

        let mut ip_distribution: Vec<IpShare> = per_ip
            .into_iter()
            .map(|(ip, count)| IpShare {
                ip: ip.to_string(),
                count,
                percentage: percentage_of(count, total_accesses),
            })
            .collect();
        ip_distribution.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.ip.cmp(&b.ip)));

        let days = accesses_per_day.len() as u64;
        let average_accesses_per_day = if days == 0 {
            0.0
        } else {
            total_accesses as f64 / days as f64
        };

        Self {
            total_accesses,
            total_distinct_ips: ip_distribution.len() as u64,
            average_accesses_per_day,
            ip_distribution,
            accesses_per_day,
        }
    }

    /// No accesses recorded: render the empty view, not a chart.
    pub fn is_empty(&self) -> bool {
        self.total_accesses == 0
    }

    /// `(YYYY-MM-DD, count)` in chronological order.
    pub fn daily_series(&self) -> Vec<(String, u64)> {
        self.accesses_per_day
            .iter()
            .map(|(day, count)| (day.format("%Y-%m-%d").to_string(), *count))
            .collect()
    }

    /// `(ip, percentage)` in distribution order.
    pub fn ip_series(&self) -> Vec<(String, f64)> {
        self.ip_distribution
            .iter()
            .map(|share| (share.ip.clone(), share.percentage))
            .collect()
    }
}

fn percentage_of(count: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    count as f64 * 100.0 / total as f64
}

/// Body of `/stats/{hash}` after the client picked a shape.
#[derive(Debug, Clone, PartialEq)]
pub enum StatsPayload {
    /// Raw access log; aggregated here.
    Events(Vec<AccessEvent>),
    /// Already aggregated by the backend; used as-is.
    Summary(StatsSummary),
}

/// Everything the stats panel shows for one hash.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StatsReport {
    pub summary: StatsSummary,
    /// Individual accesses for the table; empty for pre-aggregated payloads.
    pub accesses: Vec<AccessEvent>,
}

impl StatsPayload {
    pub fn into_report(self) -> StatsReport {
        match self {
            StatsPayload::Events(accesses) => StatsReport {
                summary: StatsSummary::from_events(&accesses),
                accesses,
            },
            StatsPayload::Summary(summary) => StatsReport {
                summary,
                accesses: Vec::new(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum StatsState {
    #[default]
    Idle,
    Loading {
        hash: String,
    },
    Empty {
        hash: String,
    },
    Ready {
        hash: String,
        report: StatsReport,
    },
    Failed {
        hash: String,
        message: String,
    },
}

impl StatsState {
    pub fn hash(&self) -> Option<&str> {
        match self {
            StatsState::Idle => None,
            StatsState::Loading { hash }
            | StatsState::Empty { hash }
            | StatsState::Ready { hash, .. }
            | StatsState::Failed { hash, .. } => Some(hash),
        }
    }
}
