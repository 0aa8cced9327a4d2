use reqwest::Client;
use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use beget_ddns::dns::{BegetProvider, Credentials, DnsProvider};
use beget_ddns::ip::ExternalIpResolver;
use beget_ddns::{reconcile, Error};

fn credentials() -> Credentials {
    Credentials {
        login: "u".to_string(),
        password: "p".to_string(),
    }
}

fn provider_for(server: &MockServer) -> BegetProvider {
    BegetProvider::with_api_base(Client::new(), credentials(), format!("{}/api", server.uri()))
}

fn resolver_for(server: &MockServer) -> ExternalIpResolver {
    ExternalIpResolver::new(Client::new(), format!("{}/ip", server.uri()))
}

fn success(result: Value) -> ResponseTemplate {
    let body = json!({
        "status": "success",
        "answer": {"status": "success", "result": result}
    });
    ResponseTemplate::new(200).set_body_raw(body.to_string(), "application/json")
}

fn a_records(addresses: &[&str]) -> Value {
    let records: Vec<Value> = addresses
        .iter()
        .map(|a| json!({"address": a, "ttl": 600, "priority": 10}))
        .collect();
    json!({"is_under_control": true, "records": {"A": records}})
}

async fn mount_echo(server: &MockServer, body: &str, content_type: &str) {
    Mock::given(method("GET"))
        .and(path("/ip"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body.to_string(), content_type))
        .mount(server)
        .await;
}

async fn mount_get_data(server: &MockServer, domain: &str, result: Value, calls: u64) {
    Mock::given(method("GET"))
        .and(path("/api/dns/getData"))
        .and(query_param("login", "u"))
        .and(query_param("passwd", "p"))
        .and(query_param("input_format", "json"))
        .and(query_param("output_format", "json"))
        .and(query_param("input_data", json!({"fqdn": domain}).to_string()))
        .respond_with(success(result))
        .expect(calls)
        .mount(server)
        .await;
}

#[tokio::test]
async fn updates_only_the_stale_domain() {
    let server = MockServer::start().await;
    mount_echo(&server, "203.0.113.5", "text/plain").await;
    mount_get_data(&server, "a.example.com", a_records(&["203.0.113.5"]), 1).await;
    mount_get_data(&server, "b.example.com", a_records(&["203.0.113.1"]), 1).await;

    Mock::given(method("GET"))
        .and(path("/api/dns/changeRecords"))
        .and(query_param("login", "u"))
        .and(query_param("passwd", "p"))
        .and(query_param(
            "input_data",
            r#"{"fqdn":"b.example.com","records":{"A":[{"priority":10,"value":"203.0.113.5"}]}}"#,
        ))
        .respond_with(success(Value::Bool(true)))
        .expect(1)
        .mount(&server)
        .await;

    let domains = vec!["a.example.com".to_string(), "b.example.com".to_string()];
    let summary = reconcile::run(&resolver_for(&server), &provider_for(&server), &domains)
        .await
        .unwrap();

    assert_eq!(summary.address.as_str(), "203.0.113.5");
    assert_eq!(summary.unchanged, vec!["a.example.com"]);
    assert_eq!(summary.updated, vec!["b.example.com"]);
}

#[tokio::test]
async fn wrong_echo_content_type_aborts_before_provider_calls() {
    let server = MockServer::start().await;
    mount_echo(&server, r#"{"ip":"203.0.113.5"}"#, "application/json").await;

    Mock::given(path("/api/dns/getData"))
        .respond_with(success(a_records(&["203.0.113.1"])))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(path("/api/dns/changeRecords"))
        .respond_with(success(Value::Bool(true)))
        .expect(0)
        .mount(&server)
        .await;

    let domains = vec!["a.example.com".to_string()];
    let err = reconcile::run(&resolver_for(&server), &provider_for(&server), &domains)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Transport(_)), "{err}");
}

#[tokio::test]
async fn duplicate_a_records_stop_the_run_without_writing() {
    let server = MockServer::start().await;
    mount_echo(&server, "203.0.113.5", "text/plain").await;
    mount_get_data(
        &server,
        "a.example.com",
        a_records(&["203.0.113.1", "203.0.113.2"]),
        1,
    )
    .await;
    mount_get_data(&server, "b.example.com", a_records(&["203.0.113.1"]), 0).await;

    Mock::given(path("/api/dns/changeRecords"))
        .respond_with(success(Value::Bool(true)))
        .expect(0)
        .mount(&server)
        .await;

    let domains = vec!["a.example.com".to_string(), "b.example.com".to_string()];
    let err = reconcile::run(&resolver_for(&server), &provider_for(&server), &domains)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::DataShape(_)), "{err}");
}

#[tokio::test]
async fn missing_a_records_are_a_data_shape_error() {
    let server = MockServer::start().await;
    mount_get_data(
        &server,
        "a.example.com",
        json!({"records": {"MX": [{"exchange": "mx.example.com", "priority": 10}]}}),
        1,
    )
    .await;

    let err = provider_for(&server)
        .read_a_record("a.example.com")
        .await
        .unwrap_err();

    match err {
        Error::DataShape(msg) => assert!(msg.contains("no A record found")),
        other => panic!("expected data shape error, got {other:?}"),
    }
}

#[tokio::test]
async fn inner_error_status_is_fatal() {
    let server = MockServer::start().await;
    let body = json!({
        "status": "success",
        "answer": {
            "status": "error",
            "errors": [{"error_code": "INVALID_DATA", "error_text": "domain not found"}]
        }
    });

    Mock::given(path("/api/dns/getData"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body.to_string(), "application/json"))
        .expect(1)
        .mount(&server)
        .await;

    let err = provider_for(&server)
        .read_a_record("a.example.com")
        .await
        .unwrap_err();

    match err {
        Error::Provider(msg) => {
            assert!(msg.contains("dns/getData"));
            assert!(msg.contains("domain not found"));
        }
        other => panic!("expected provider error, got {other:?}"),
    }
}

#[tokio::test]
async fn http_error_from_provider_is_transport_error() {
    let server = MockServer::start().await;
    Mock::given(path("/api/dns/changeRecords"))
        .respond_with(ResponseTemplate::new(500).set_body_raw("internal error", "text/plain"))
        .expect(1)
        .mount(&server)
        .await;

    let address = beget_ddns::ip::Ipv4Literal::parse("203.0.113.5").unwrap();
    let err = provider_for(&server)
        .write_a_record("a.example.com", &address)
        .await
        .unwrap_err();

    match err {
        Error::Transport(msg) => assert!(msg.contains("internal error")),
        other => panic!("expected transport error, got {other:?}"),
    }
}

#[tokio::test]
async fn check_reports_without_writing() {
    let server = MockServer::start().await;
    mount_echo(&server, "203.0.113.5", "text/plain").await;
    mount_get_data(&server, "a.example.com", a_records(&["203.0.113.1"]), 1).await;

    Mock::given(path("/api/dns/changeRecords"))
        .respond_with(success(Value::Bool(true)))
        .expect(0)
        .mount(&server)
        .await;

    let domains = vec!["a.example.com".to_string()];
    let (address, statuses) =
        reconcile::check(&resolver_for(&server), &provider_for(&server), &domains)
            .await
            .unwrap();

    assert_eq!(address.as_str(), "203.0.113.5");
    assert_eq!(statuses.len(), 1);
    assert_eq!(statuses[0].current, "203.0.113.1");
    assert!(!statuses[0].in_sync);
}

#[tokio::test]
async fn echo_content_type_with_parameters_aborts_the_run() {
    let server = MockServer::start().await;
    mount_echo(&server, "203.0.113.5", "text/plain; charset=utf-8").await;
    mount_get_data(&server, "a.example.com", a_records(&["203.0.113.1"]), 0).await;

    let domains = vec!["a.example.com".to_string()];
    let err = reconcile::run(&resolver_for(&server), &provider_for(&server), &domains)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Transport(_)), "{err}");
}

#[tokio::test]
async fn null_errors_list_does_not_block_the_update() {
    let server = MockServer::start().await;
    mount_echo(&server, "203.0.113.5", "text/plain").await;

    let read = json!({
        "status": "success",
        "answer": {"status": "success", "errors": null, "result": a_records(&["203.0.113.1"])}
    });
    Mock::given(path("/api/dns/getData"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(read.to_string(), "application/json"))
        .expect(1)
        .mount(&server)
        .await;

    let write = json!({
        "status": "success",
        "answer": {"status": "success", "errors": null, "result": true}
    });
    Mock::given(path("/api/dns/changeRecords"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(write.to_string(), "application/json"))
        .expect(1)
        .mount(&server)
        .await;

    let domains = vec!["a.example.com".to_string()];
    let summary = reconcile::run(&resolver_for(&server), &provider_for(&server), &domains)
        .await
        .unwrap();

    assert_eq!(summary.updated, vec!["a.example.com"]);
}

#[tokio::test]
async fn null_a_records_are_a_data_shape_error() {
    let server = MockServer::start().await;
    mount_get_data(&server, "a.example.com", json!({"records": {"A": null}}), 1).await;

    let err = provider_for(&server)
        .read_a_record("a.example.com")
        .await
        .unwrap_err();

    match err {
        Error::DataShape(msg) => assert!(msg.contains("no A record found")),
        other => panic!("expected data shape error, got {other:?}"),
    }
}

#[tokio::test]
async fn non_string_status_is_a_provider_error() {
    let server = MockServer::start().await;
    let body = json!({
        "status": "success",
        "answer": {"status": null, "result": a_records(&["203.0.113.1"])}
    });

    Mock::given(path("/api/dns/getData"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body.to_string(), "application/json"))
        .expect(1)
        .mount(&server)
        .await;

    let err = provider_for(&server)
        .read_a_record("a.example.com")
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Provider(_)), "{err}");
}
