//! In-process HTTP tests for the dashboard API.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::Utc;
use serde_json::Value;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tower::ServiceExt;

use lookout::api::create_router;
use lookout::config::FrontendConfig;
use lookout::engine::{BotRegistry, VisitScanner};

fn log_line(message: &str, timestamp: &str, ip: &str) -> String {
    format!(
        concat!(
            r#"{{"message":"{}","timestamp":"{}","meta":{{"req":{{"cf_ip":"{}","#,
            r#""connection":{{"remoteAddress":"::ffff:172.20.0.1"}},"#,
            r#""headers":{{"cf-connecting-ip":"{}","x-forwarded-for":"{}","#,
            r#""cf-ipcountry":"DE","host":"example.org","user-agent":"Mozilla"}}}}}}}}"#
        ),
        message, timestamp, ip, ip, ip
    )
}

fn write_todays_log(root: &Path, service: &str, lines: &[String]) {
    let dir = root.join(service).join("log").join("visit");
    fs::create_dir_all(&dir).unwrap();
    let name = format!("{}.log", Utc::now().format("%Y-%m-%d"));
    fs::write(dir.join(name), lines.join("\n") + "\n").unwrap();
}

fn router(root: &Path) -> Router {
    let scanner = Arc::new(VisitScanner::new(
        root.to_path_buf(),
        Arc::new(BotRegistry::new()),
    ));
    create_router(scanner, FrontendConfig { static_dir: None })
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn health_check_works() {
    let tmp = tempfile::tempdir().unwrap();
    let response = router(tmp.path()).oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn details_returns_filtered_aggregates() {
    let tmp = tempfile::tempdir().unwrap();
    write_todays_log(
        tmp.path(),
        "svc",
        &[
            log_line("HTTP GET /", "2024-01-01T00:00:00Z", "9.9.9.9"),
            log_line("HTTP GET /wp-login.php", "2024-01-01T00:02:00Z", "9.9.9.9"),
        ],
    );

    let response = router(tmp.path())
        .oneshot(post_json("/details", "[]"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["visits"]["visitCount"], 1);
    assert_eq!(json["visits"]["details"]["messages"][0]["value"], "HTTP GET /");
    assert_eq!(json["visits"]["details"]["ip"][0]["value"], "9.9.9.9 DE");
    assert!(json["timeElapsed"].is_u64());
}

#[tokio::test]
async fn details_applies_predicates() {
    let tmp = tempfile::tempdir().unwrap();
    write_todays_log(
        tmp.path(),
        "svc",
        &[
            log_line("HTTP GET /", "2024-01-01T00:00:00Z", "9.9.9.9"),
            log_line("HTTP GET /about", "2024-01-01T01:00:00Z", "9.9.9.9"),
        ],
    );

    let body = r#"[{"detail":"messages","value":"HTTP GET /","include":false}]"#;
    let response = router(tmp.path())
        .oneshot(post_json("/details", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["visits"]["visitCount"], 1);
    assert_eq!(
        json["visits"]["details"]["messages"][0]["value"],
        "HTTP GET /about"
    );
}

#[tokio::test]
async fn all_is_details_without_predicates() {
    let tmp = tempfile::tempdir().unwrap();
    write_todays_log(
        tmp.path(),
        "svc",
        &[log_line("HTTP GET /", "2024-01-01T00:00:00Z", "9.9.9.9")],
    );

    let response = router(tmp.path()).oneshot(get("/all")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["visits"]["visitCount"], 1);
}

#[tokio::test]
async fn base_counts_raw_lines_per_service() {
    let tmp = tempfile::tempdir().unwrap();
    write_todays_log(
        tmp.path(),
        "svc",
        &[
            log_line("HTTP GET /", "2024-01-01T00:00:00Z", "9.9.9.9"),
            // Bot traffic still counts here; the historical endpoints
            // predate the classifier.
            log_line("HTTP GET /wp-login.php", "2024-01-01T00:00:30Z", "9.9.9.9"),
        ],
    );

    let response = router(tmp.path()).oneshot(get("/base")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["visits"]["svc"]["visitCount"], 2);
    assert!(json["visits"]["svc"].get("messages").is_none());
}

#[tokio::test]
async fn base_post_includes_message_table() {
    let tmp = tempfile::tempdir().unwrap();
    write_todays_log(
        tmp.path(),
        "svc",
        &[
            log_line("HTTP GET /", "2024-01-01T00:00:00Z", "9.9.9.9"),
            log_line("HTTP GET /", "2024-01-01T01:00:00Z", "9.9.9.9"),
            log_line("HTTP GET /about", "2024-01-01T02:00:00Z", "9.9.9.9"),
        ],
    );

    let response = router(tmp.path())
        .oneshot(post_json("/base", ""))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["visits"]["svc"]["visitCount"], 3);
    assert_eq!(json["visits"]["svc"]["messages"][0]["value"], "HTTP GET /");
    assert_eq!(json["visits"]["svc"]["messages"][0]["count"], 2);
}

#[tokio::test]
async fn malformed_log_line_is_a_server_error() {
    let tmp = tempfile::tempdir().unwrap();
    write_todays_log(tmp.path(), "svc", &["{not json".to_string()]);

    let response = router(tmp.path())
        .oneshot(post_json("/details", "[]"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("malformed log entry"));
}

#[tokio::test]
async fn frontend_is_served_at_root() {
    let tmp = tempfile::tempdir().unwrap();
    let response = router(tmp.path()).oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(content_type.starts_with("text/html"));
}
