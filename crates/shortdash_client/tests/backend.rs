use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::json;
use shortdash_client::{Backend, ClientSettings, FailureKind, ReqwestBackend};
use shortdash_core::{AuthVerdict, PasswordDigest, ShortenRequest, StatsPayload, User};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn backend_for(server: &MockServer) -> ReqwestBackend {
    let base = server.uri().parse().expect("mock server uri");
    ReqwestBackend::new(ClientSettings::new(base)).expect("client")
}

#[tokio::test]
async fn verify_posts_digest_and_decodes_user() {
    let server = MockServer::start().await;
    let digest = PasswordDigest::of("s3cret");
    Mock::given(method("POST"))
        .and(path("/authUser"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({"username": "ana", "password": digest.as_str()})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user": {"name": "Ana", "email": "ana@example.com", "contact": "555"},
            "authenticated": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    let verdict = backend_for(&server)
        .verify_credentials("ana", &digest)
        .await
        .expect("verify ok");
    assert_eq!(
        verdict,
        AuthVerdict::Accepted(User {
            name: "Ana".into(),
            email: "ana@example.com".into(),
            contact: "555".into(),
        })
    );

    let requests = server.received_requests().await.expect("recording on");
    let raw = String::from_utf8_lossy(&requests[0].body);
    assert!(!raw.contains("s3cret"));
}

#[tokio::test]
async fn verify_maps_authenticated_false_to_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/authUser"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"user": null, "authenticated": false})),
        )
        .mount(&server)
        .await;

    let verdict = backend_for(&server)
        .verify_credentials("ana", &PasswordDigest::of("wrong"))
        .await
        .expect("verify ok");
    assert_eq!(verdict, AuthVerdict::Rejected);
}

#[tokio::test]
async fn non_success_status_is_a_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/authUser"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/urls"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let backend = backend_for(&server);
    let err = backend
        .verify_credentials("ana", &PasswordDigest::of("pw"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(401));
    let err = backend.list_urls().await.unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(503));
    assert_eq!(err.kind.to_string(), "http status 503");
}

#[tokio::test]
async fn list_urls_keeps_backend_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/urls"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 9, "site_id": 1, "original_url": "https://b.example", "hash": "bbb",
             "created_at": "2024-02-01T12:00:00Z"},
            {"id": 3, "site_id": 1, "original_url": "https://a.example", "hash": "aaa",
             "created_at": "2024-01-01 08:30:00"}
        ])))
        .mount(&server)
        .await;

    let urls = backend_for(&server).list_urls().await.expect("list ok");
    let summary: Vec<_> = urls
        .iter()
        .map(|url| (url.id, url.hash.as_str(), url.created_at.to_rfc3339()))
        .collect();
    assert_eq!(
        summary,
        vec![
            (9, "bbb", "2024-02-01T12:00:00+00:00".to_string()),
            (3, "aaa", "2024-01-01T08:30:00+00:00".to_string()),
        ]
    );
}

#[tokio::test]
async fn malformed_list_is_a_decode_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/urls"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = backend_for(&server).list_urls().await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Decode);
}

#[tokio::test]
async fn shorten_sends_owner_fields_and_returns_link() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/shorten"))
        .and(body_json(json!({
            "url": "https://rust-lang.org",
            "name": "Ana",
            "email": "ana@example.com",
            "contact": "555"
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"shortUrl": "http://sho.rt/Xy12"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let link = backend_for(&server)
        .shorten(&ShortenRequest {
            url: "https://rust-lang.org".into(),
            name: "Ana".into(),
            email: "ana@example.com".into(),
            contact: "555".into(),
        })
        .await
        .expect("shorten ok");
    assert_eq!(link, "http://sho.rt/Xy12");
}

#[tokio::test]
async fn raw_stats_shape_yields_events() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/stats/abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "accesses": [
                {"accessed_at": "2024-01-01T10:00:00Z", "request_ip": "1.1.1.1"},
                {"accessed_at": "2024-01-01T11:00:00Z", "request_ip": "1.1.1.1"},
                {"accessed_at": "2024-01-02T00:00:00Z", "request_ip": "2.2.2.2"}
            ],
            "totalAccesses": 3
        })))
        .mount(&server)
        .await;

    let payload = backend_for(&server)
        .fetch_stats("abc123")
        .await
        .expect("stats ok");
    let StatsPayload::Events(events) = payload else {
        panic!("expected raw events");
    };
    assert_eq!(events.len(), 3);
    assert_eq!(events[2].request_ip, "2.2.2.2");
}

#[tokio::test]
async fn aggregated_stats_shape_yields_summary() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/stats/abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "totalAccesses": 3,
            "totalIps": 2,
            "averageAccessesPerDay": 1.5,
            "ipPercentage": [
                {"ip": "1.1.1.1", "percentage": "66.67", "count": 2},
                {"ip": "2.2.2.2", "percentage": "33.33", "count": 1}
            ],
            "accessesPerDay": {"2024-01-01": 2, "2024-01-02": 1}
        })))
        .mount(&server)
        .await;

    let payload = backend_for(&server)
        .fetch_stats("abc123")
        .await
        .expect("stats ok");
    let StatsPayload::Summary(summary) = payload else {
        panic!("expected pre-aggregated summary");
    };
    assert_eq!(summary.total_accesses, 3);
    assert_eq!(summary.total_distinct_ips, 2);
    assert_eq!(summary.ip_distribution[0].percentage_label(), "66.7");
}

#[tokio::test]
async fn stats_without_discriminator_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/stats/abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"totalAccesses": 3})))
        .mount(&server)
        .await;

    let err = backend_for(&server).fetch_stats("abc123").await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Decode);
}

#[tokio::test]
async fn base_path_prefix_and_hash_encoding_are_respected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/stats/a%2Fb"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"accesses": [], "totalAccesses": 0})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let base = format!("{}/api/", server.uri()).parse().unwrap();
    let backend = ReqwestBackend::new(ClientSettings::new(base)).unwrap();
    let payload = backend.fetch_stats("a/b").await.expect("stats ok");
    assert_eq!(payload, StatsPayload::Events(Vec::new()));
}

#[tokio::test]
async fn optional_request_timeout_is_enforced() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/urls"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_json(json!([])),
        )
        .mount(&server)
        .await;

    let mut settings = ClientSettings::new(server.uri().parse().unwrap());
    settings.request_timeout = Some(Duration::from_millis(50));
    let err = ReqwestBackend::new(settings)
        .unwrap()
        .list_urls()
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::Timeout);
}

#[tokio::test]
async fn unreachable_backend_is_a_network_failure() {
    // Grab a free port, then close it so nothing is listening there.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    let base = format!("http://127.0.0.1:{port}").parse().unwrap();

    let backend = ReqwestBackend::new(ClientSettings::new(base)).unwrap();
    let err = backend.list_urls().await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Network);
}
