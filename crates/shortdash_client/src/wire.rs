//! JSON bodies exchanged with the shortening backend.
//!
//! URL records and access events use the backend's snake_case columns, the
//! envelopes around them are camelCase. `/stats/{hash}` comes in two shapes;
//! [`decode_stats`] tells them apart by their top-level keys.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use dash_logging::dash_warn;
use serde::{Deserialize, Deserializer, Serialize};
use shortdash_core::{
    AccessEvent, AuthVerdict, IpShare, PasswordDigest, ShortenRequest, ShortenedUrl, StatsPayload,
    StatsSummary, User,
};

use crate::ClientError;

const RAW_STATS_KEY: &str = "accesses";
const AGGREGATED_STATS_KEY: &str = "ipPercentage";

#[derive(Serialize)]
struct AuthRequestBody<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct AuthResponseBody {
    #[serde(default)]
    user: Option<UserBody>,
    authenticated: bool,
}

#[derive(Deserialize)]
struct UserBody {
    name: String,
    email: String,
    #[serde(default)]
    contact: String,
}

#[derive(Deserialize)]
struct UrlRecordBody {
    id: u64,
    site_id: u64,
    original_url: String,
    hash: String,
    #[serde(deserialize_with = "timestamp")]
    created_at: DateTime<Utc>,
}

#[derive(Serialize)]
struct ShortenRequestBody<'a> {
    url: &'a str,
    name: &'a str,
    email: &'a str,
    contact: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ShortenResponseBody {
    short_url: String,
}

#[derive(Deserialize)]
struct AccessEventBody {
    #[serde(deserialize_with = "timestamp")]
    accessed_at: DateTime<Utc>,
    request_ip: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawStatsBody {
    accesses: Vec<AccessEventBody>,
    #[serde(default)]
    total_accesses: Option<u64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AggregatedStatsBody {
    total_accesses: u64,
    total_ips: u64,
    average_accesses_per_day: Numeric,
    ip_percentage: Vec<IpPercentageBody>,
    accesses_per_day: BTreeMap<String, u64>,
}

#[derive(Deserialize)]
struct IpPercentageBody {
    ip: String,
    percentage: Numeric,
    count: u64,
}

/// Backends format some figures with `toFixed`, so accept `"66.67"` as well as `66.67`.
#[derive(Deserialize)]
#[serde(untagged)]
enum Numeric {
    Number(f64),
    Text(String),
}

impl Numeric {
    fn value(&self, field: &str) -> Result<f64, ClientError> {
        match self {
            Numeric::Number(value) => Ok(*value),
            Numeric::Text(text) => text
                .trim()
                .parse()
                .map_err(|_| ClientError::decode(format!("{field}: not a number: {text:?}"))),
        }
    }
}

pub(crate) fn encode_auth_request(
    username: &str,
    digest: &PasswordDigest,
) -> Result<Vec<u8>, ClientError> {
    to_json(&AuthRequestBody {
        username,
        password: digest.as_str(),
    })
}

pub(crate) fn decode_auth(body: &[u8]) -> Result<AuthVerdict, ClientError> {
    let parsed: AuthResponseBody = from_json(body)?;
    match (parsed.authenticated, parsed.user) {
        (true, Some(user)) => Ok(AuthVerdict::Accepted(User {
            name: user.name,
            email: user.email,
            contact: user.contact,
        })),
        (true, None) => Err(ClientError::decode("authenticated without a user")),
        (false, _) => Ok(AuthVerdict::Rejected),
    }
}

pub(crate) fn decode_urls(body: &[u8]) -> Result<Vec<ShortenedUrl>, ClientError> {
    let records: Vec<UrlRecordBody> = from_json(body)?;
    Ok(records
        .into_iter()
        .map(|record| ShortenedUrl {
            id: record.id,
            site_id: record.site_id,
            original_url: record.original_url,
            hash: record.hash,
            created_at: record.created_at,
        })
        .collect())
}

pub(crate) fn encode_shorten_request(request: &ShortenRequest) -> Result<Vec<u8>, ClientError> {
    to_json(&ShortenRequestBody {
        url: &request.url,
        name: &request.name,
        email: &request.email,
        contact: &request.contact,
    })
}

pub(crate) fn decode_shorten(body: &[u8]) -> Result<String, ClientError> {
    let parsed: ShortenResponseBody = from_json(body)?;
    Ok(parsed.short_url)
}

pub(crate) fn decode_stats(body: &[u8]) -> Result<StatsPayload, ClientError> {
    let value: serde_json::Value = from_json(body)?;
    let Some(object) = value.as_object() else {
        return Err(ClientError::decode("stats body is not an object"));
    };

    if object.contains_key(RAW_STATS_KEY) {
        let raw: RawStatsBody = serde_json::from_value(value)
            .map_err(|err| ClientError::decode(err.to_string()))?;
        let events: Vec<AccessEvent> = raw
            .accesses
            .into_iter()
            .map(|event| AccessEvent {
                accessed_at: event.accessed_at,
                request_ip: event.request_ip,
            })
            .collect();
        if let Some(reported) = raw.total_accesses {
            if reported != events.len() as u64 {
                dash_warn!(
                    "stats totalAccesses={} disagrees with {} listed accesses; using the list",
                    reported,
                    events.len()
                );
            }
        }
        return Ok(StatsPayload::Events(events));
    }

    if object.contains_key(AGGREGATED_STATS_KEY) {
        let aggregated: AggregatedStatsBody = serde_json::from_value(value)
            .map_err(|err| ClientError::decode(err.to_string()))?;
        return aggregated.into_summary().map(StatsPayload::Summary);
    }

    Err(ClientError::decode(format!(
        "stats body has neither `{RAW_STATS_KEY}` nor `{AGGREGATED_STATS_KEY}`"
    )))
}

impl AggregatedStatsBody {
    fn into_summary(self) -> Result<StatsSummary, ClientError> {
        let ip_distribution = self
            .ip_percentage
            .into_iter()
            .map(|share| {
                Ok(IpShare {
                    percentage: share.percentage.value("ipPercentage.percentage")?,
                    ip: share.ip,
                    count: share.count,
                })
            })
            .collect::<Result<Vec<_>, ClientError>>()?;

        let accesses_per_day = self
            .accesses_per_day
            .into_iter()
            .map(|(key, count)| {
                NaiveDate::parse_from_str(&key, "%Y-%m-%d")
                    .map(|day| (day, count))
                    .map_err(|_| ClientError::decode(format!("accessesPerDay key {key:?}")))
            })
            .collect::<Result<BTreeMap<_, _>, ClientError>>()?;

        Ok(StatsSummary {
            total_accesses: self.total_accesses,
            total_distinct_ips: self.total_ips,
            average_accesses_per_day: self
                .average_accesses_per_day
                .value("averageAccessesPerDay")?,
            ip_distribution,
            accesses_per_day,
        })
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<Vec<u8>, ClientError> {
    serde_json::to_vec(value).map_err(|err| ClientError::decode(err.to_string()))
}

fn from_json<'a, T: Deserialize<'a>>(body: &'a [u8]) -> Result<T, ClientError> {
    serde_json::from_slice(body).map_err(|err| ClientError::decode(err.to_string()))
}

/// RFC 3339, or a naive `YYYY-MM-DD[T ]HH:MM:SS[.f]` taken as UTC.
pub(crate) fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| Utc.from_utc_datetime(&naive))
}

fn timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp {raw:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn naive_timestamps_are_utc() {
        let expected: DateTime<Utc> = "2024-01-01T10:00:00Z".parse().unwrap();
        for raw in [
            "2024-01-01T10:00:00Z",
            "2024-01-01T07:00:00-03:00",
            "2024-01-01T10:00:00",
            "2024-01-01 10:00:00",
            "2024-01-01 10:00:00.000",
        ] {
            assert_eq!(parse_timestamp(raw), Some(expected), "{raw}");
        }
        assert_eq!(parse_timestamp("yesterday"), None);
    }

    #[test]
    fn auth_request_carries_digest_only() {
        let digest = PasswordDigest::of("hunter2");
        let body = encode_auth_request("ana", &digest).unwrap();
        let text = String::from_utf8(body).unwrap();
        assert!(text.contains(digest.as_str()));
        assert!(!text.contains("hunter2"));
    }

    #[test]
    fn authenticated_without_user_is_a_decode_error() {
        let err = decode_auth(br#"{"authenticated":true}"#).unwrap_err();
        assert_eq!(err.kind, crate::FailureKind::Decode);
        assert_eq!(
            decode_auth(br#"{"authenticated":false,"user":null}"#).unwrap(),
            AuthVerdict::Rejected
        );
    }

    #[test]
    fn aggregated_percentages_accept_text_and_numbers() {
        let body = br#"{
            "totalAccesses": 3, "totalIps": 2, "averageAccessesPerDay": "1.50",
            "ipPercentage": [
                {"ip": "1.1.1.1", "percentage": "66.67", "count": 2},
                {"ip": "2.2.2.2", "percentage": 33.33, "count": 1}
            ],
            "accessesPerDay": {"2024-01-02": 1, "2024-01-01": 2}
        }"#;
        let StatsPayload::Summary(summary) = decode_stats(body).unwrap() else {
            panic!("expected pre-aggregated summary");
        };
        assert_eq!(summary.average_accesses_per_day, 1.5);
        assert_eq!(summary.ip_distribution[0].percentage, 66.67);
        assert_eq!(summary.ip_distribution[1].percentage, 33.33);
        assert_eq!(
            summary.daily_series(),
            vec![("2024-01-01".to_string(), 2), ("2024-01-02".to_string(), 1)]
        );
    }

    #[test]
    fn locale_day_keys_are_rejected() {
        let body = br#"{"totalAccesses":1,"totalIps":1,"averageAccessesPerDay":1,
            "ipPercentage":[],"accessesPerDay":{"1/2/2024":1}}"#;
        assert_eq!(
            decode_stats(body).unwrap_err().kind,
            crate::FailureKind::Decode
        );
    }
}
