//! End-to-end tests through the full axum router.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures_util::StreamExt;
use serde_json::{json, Value};
use tokio::net::TcpListener;

use insight_gateway::config::GatewayConfig;
use insight_gateway::lifecycle::Shutdown;
use insight_gateway::HttpServer;

mod common;
use common::MockResponse;

async fn spawn_gateway(config: GatewayConfig) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();
    let server = HttpServer::new(config).unwrap();
    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });
    tokio::time::sleep(Duration::from_millis(100)).await;

    (addr, shutdown)
}

fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

#[tokio::test]
async fn liveness_endpoint_reports_the_gateway_itself() {
    let (addr, shutdown) = spawn_gateway(GatewayConfig::default()).await;

    let body: Value = client()
        .get(format!("http://{addr}/health"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "api-gateway");
    shutdown.trigger();
}

#[tokio::test]
async fn successful_lookup_is_wrapped_in_the_envelope() {
    let backend = common::start_json_backend(200, r#"{"id":"doc-1"}"#).await;
    let mut config = GatewayConfig::default();
    config.services.document_ingestion.base_url = format!("http://{backend}");
    let (addr, shutdown) = spawn_gateway(config).await;

    let response = client()
        .get(format!("http://{addr}/api/v1/documents/doc-1"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 200);
    assert!(response.headers().get("x-request-id").is_some());

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["data"]["id"], "doc-1");
    assert_eq!(body["metadata"]["version"], "1.0");
    assert!(body["metadata"]["timestamp"].is_string());
    shutdown.trigger();
}

#[tokio::test]
async fn gateway_failures_use_the_error_envelope_with_path() {
    let mut config = GatewayConfig::default();
    config.services.document_ingestion.base_url = format!("http://{}", common::dead_addr().await);
    let (addr, shutdown) = spawn_gateway(config).await;

    let response = client()
        .get(format!("http://{addr}/api/v1/documents/doc-1"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 503);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "SERVICE_UNAVAILABLE_ERROR");
    assert!(body["detail"].as_str().unwrap().contains("unavailable"));
    assert_eq!(body["path"], "/api/v1/documents/doc-1");
    shutdown.trigger();
}

#[tokio::test]
async fn backend_error_payloads_pass_through_unchanged() {
    let backend = common::start_json_backend(502, r#"{"detail":"upstream exploded"}"#).await;
    let mut config = GatewayConfig::default();
    config.services.document_ingestion.base_url = format!("http://{backend}");
    let (addr, shutdown) = spawn_gateway(config).await;

    let response = client()
        .get(format!("http://{addr}/api/v1/documents"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 502);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({"detail": "upstream exploded"}));
    shutdown.trigger();
}

#[tokio::test]
async fn backend_not_found_maps_to_the_taxonomy() {
    let backend = common::start_json_backend(404, r#"{"detail":"missing"}"#).await;
    let mut config = GatewayConfig::default();
    config.services.document_ingestion.base_url = format!("http://{backend}");
    let (addr, shutdown) = spawn_gateway(config).await;

    let response = client()
        .get(format!("http://{addr}/api/v1/documents/doc-42"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 404);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "NOT_FOUND_ERROR");
    assert!(body["detail"].as_str().unwrap().contains("doc-42"));
    assert_eq!(body["path"], "/api/v1/documents/doc-42");
    shutdown.trigger();
}

#[tokio::test]
async fn backend_timeout_renders_a_504_envelope() {
    let backend = common::start_backend(|_request| async {
        MockResponse::json(200, "{}").with_delay(Duration::from_millis(1500))
    })
    .await;
    let mut config = GatewayConfig::default();
    config.services.document_ingestion.base_url = format!("http://{backend}");
    config.services.document_ingestion.timeout_secs = Some(1);
    let (addr, shutdown) = spawn_gateway(config).await;

    let response = client()
        .get(format!("http://{addr}/api/v1/documents"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 504);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "SERVICE_TIMEOUT_ERROR");
    shutdown.trigger();
}

#[tokio::test]
async fn download_streams_body_and_preserves_headers() {
    let backend = common::start_streaming_backend(
        "application/octet-stream",
        &["hello ", "streamed ", "world"],
    )
    .await;
    let mut config = GatewayConfig::default();
    config.services.document_ingestion.base_url = format!("http://{backend}");
    let (addr, shutdown) = spawn_gateway(config).await;

    let response = client()
        .get(format!("http://{addr}/api/v1/documents/doc-1/download"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "application/octet-stream"
    );
    assert_eq!(response.headers().get("x-backend").unwrap(), "mock");

    let mut collected = Vec::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        collected.extend_from_slice(&chunk.unwrap());
    }
    assert_eq!(collected, b"hello streamed world");
    shutdown.trigger();
}

#[tokio::test]
async fn upload_is_rebuilt_as_multipart_for_the_backend() {
    let recorded: Arc<Mutex<Option<common::RecordedRequest>>> = Arc::new(Mutex::new(None));
    let sink = recorded.clone();
    let backend = common::start_backend(move |request| {
        let sink = sink.clone();
        async move {
            *sink.lock().unwrap() = Some(request);
            MockResponse::json(201, r#"{"id":"doc-9","status":"uploaded"}"#)
        }
    })
    .await;

    let mut config = GatewayConfig::default();
    config.services.document_ingestion.base_url = format!("http://{backend}");
    let (addr, shutdown) = spawn_gateway(config).await;

    let part = reqwest::multipart::Part::bytes(b"%PDF-1.4 fake".to_vec())
        .file_name("report.pdf")
        .mime_str("application/pdf")
        .unwrap();
    let form = reqwest::multipart::Form::new()
        .part("file", part)
        .text("metadata", r#"{"source":"test"}"#);

    let response = client()
        .post(format!("http://{addr}/api/v1/documents"))
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 201);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["data"]["id"], "doc-9");

    let request = recorded.lock().unwrap().clone().unwrap();
    assert_eq!(request.path(), "/api/v1/documents");
    assert!(request
        .header("content-type")
        .unwrap()
        .starts_with("multipart/form-data"));
    let upload_body = String::from_utf8_lossy(&request.body).to_string();
    assert!(upload_body.contains("name=\"file\""));
    assert!(upload_body.contains("report.pdf"));
    assert!(upload_body.contains("%PDF-1.4 fake"));
    shutdown.trigger();
}

#[tokio::test]
async fn processing_route_maps_to_the_backend_process_path() {
    let recorded: Arc<Mutex<Option<common::RecordedRequest>>> = Arc::new(Mutex::new(None));
    let sink = recorded.clone();
    let backend = common::start_backend(move |request| {
        let sink = sink.clone();
        async move {
            *sink.lock().unwrap() = Some(request);
            MockResponse::json(202, r#"{"job_id":"job-1","status":"queued"}"#)
        }
    })
    .await;

    let mut config = GatewayConfig::default();
    config.services.document_processing.base_url = format!("http://{backend}");
    let (addr, shutdown) = spawn_gateway(config).await;

    let response = client()
        .post(format!("http://{addr}/api/v1/document-processing"))
        .json(&json!({"document_id": "doc-1", "options": {"ocr": true}}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 202);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["data"]["job_id"], "job-1");

    let request = recorded.lock().unwrap().clone().unwrap();
    assert_eq!(request.path(), "/api/v1/process");
    let payload: Value = serde_json::from_slice(&request.body).unwrap();
    assert_eq!(payload["document_id"], "doc-1");
    assert_eq!(payload["options"]["ocr"], true);
    shutdown.trigger();
}

#[tokio::test]
async fn services_health_reports_probes_and_tracker_state() {
    let healthy = common::start_json_backend(200, r#"{"status":"healthy"}"#).await;
    let mut config = GatewayConfig::default();
    config.services.document_ingestion.base_url = format!("http://{healthy}");
    config.services.document_processing.base_url =
        format!("http://{}", common::dead_addr().await);
    config.services.entity_extraction.base_url =
        format!("http://{}", common::dead_addr().await);
    config.services.task_orchestration.base_url =
        format!("http://{}", common::dead_addr().await);
    let (addr, shutdown) = spawn_gateway(config).await;

    let body: Value = client()
        .get(format!("http://{addr}/api/v1/health/services"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let services = body["data"]["services"].as_array().unwrap();
    assert_eq!(services.len(), 4);

    let ingestion = services
        .iter()
        .find(|s| s["service"] == "document-ingestion")
        .unwrap();
    assert_eq!(ingestion["probe"], "healthy");
    assert_eq!(ingestion["state"], "healthy");

    let processing = services
        .iter()
        .find(|s| s["service"] == "document-processing")
        .unwrap();
    assert_eq!(processing["probe"], "unreachable");
    shutdown.trigger();
}

#[tokio::test]
async fn stats_reports_counters_and_service_states() {
    let (addr, shutdown) = spawn_gateway(GatewayConfig::default()).await;
    let client = client();

    // One request to have something to count.
    client
        .get(format!("http://{addr}/health"))
        .send()
        .await
        .unwrap();

    let body: Value = client
        .get(format!("http://{addr}/api/v1/stats"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let gateway = &body["data"]["gateway"];
    assert!(gateway["request_count"].as_u64().unwrap() >= 1);
    assert!(gateway["start_time"].is_string());
    assert_eq!(
        body["data"]["services"]["document-ingestion"]["state"],
        "healthy"
    );
    shutdown.trigger();
}

#[tokio::test]
async fn workflow_types_route_maps_to_the_backend_path() {
    let recorded: Arc<Mutex<Option<common::RecordedRequest>>> = Arc::new(Mutex::new(None));
    let sink = recorded.clone();
    let backend = common::start_backend(move |request| {
        let sink = sink.clone();
        async move {
            *sink.lock().unwrap() = Some(request);
            MockResponse::json(200, r#"[{"name":"full-pipeline"}]"#)
        }
    })
    .await;

    let mut config = GatewayConfig::default();
    config.services.task_orchestration.base_url = format!("http://{backend}");
    let (addr, shutdown) = spawn_gateway(config).await;

    let body: Value = client()
        .get(format!("http://{addr}/api/v1/workflows/types"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["data"][0]["name"], "full-pipeline");
    let request = recorded.lock().unwrap().clone().unwrap();
    assert_eq!(request.path(), "/api/v1/workflow-types");
    shutdown.trigger();
}
