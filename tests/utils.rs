#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use docker_images_mcp::docker::{ImageInventory, InMemoryInventory};
use docker_images_mcp::filter::BYTES_PER_MB;
use docker_images_mcp::models::ImageSummary;
use docker_images_mcp::{create_app, AppState};

/// img1 50MB ubuntu, img2 5MB alpine, img3 150MB ubuntu, img4 300MB golang
pub fn test_images() -> Vec<ImageSummary> {
    vec![
        ImageSummary::new("img1", &["ubuntu:22.04"], 1700000000, 50 * BYTES_PER_MB),
        ImageSummary::new("img2", &["alpine:latest"], 1600000000, 5 * BYTES_PER_MB),
        ImageSummary::new("img3", &["ubuntu:20.04"], 1650000000, 150 * BYTES_PER_MB),
        ImageSummary::new("img4", &["golang:1.21"], 1720000000, 300 * BYTES_PER_MB),
    ]
}

/// The same images as the engine's `GET /images/json` would return them
pub fn engine_images_json() -> String {
    let images: Vec<Value> = test_images()
        .into_iter()
        .map(|img| {
            json!({
                "Containers": -1,
                "Created": img.created,
                "Id": img.id,
                "Labels": null,
                "ParentId": "",
                "RepoDigests": [],
                "RepoTags": img.repo_tags,
                "SharedSize": -1,
                "Size": img.size,
            })
        })
        .collect();
    Value::Array(images).to_string()
}

pub fn app_with(inventory: impl ImageInventory) -> Router {
    let inventory: Arc<dyn ImageInventory> = Arc::new(inventory);
    create_app(AppState::new(inventory), Duration::from_secs(10))
}

pub fn test_app() -> Router {
    app_with(InMemoryInventory::new(test_images()))
}

pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.expect("router is infallible");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read body");
    (status, decode_body(&bytes))
}

/// Decode a response body. MCP answers arrive as a `text/event-stream`
/// whose `data:` lines carry the JSON-RPC message; plain JSON bodies are
/// read as is and anything else comes back as a string.
pub fn decode_body(bytes: &[u8]) -> Value {
    if bytes.is_empty() {
        return Value::Null;
    }
    let text = String::from_utf8_lossy(bytes);

    let message = text
        .lines()
        .filter_map(|line| line.strip_prefix("data:"))
        .filter_map(|data| serde_json::from_str::<Value>(data.trim()).ok())
        .find(|value| value.get("jsonrpc").is_some());
    if let Some(message) = message {
        return message;
    }

    serde_json::from_str(&text).unwrap_or_else(|_| Value::String(text.into_owned()))
}

pub async fn post_raw(app: Router, path: &str, body: impl Into<Body>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::POST)
        .uri(path)
        .header(header::HOST, "localhost")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::ACCEPT, "application/json, text/event-stream")
        .body(body.into())
        .unwrap();
    send(app, request).await
}

pub async fn rpc(app: Router, id: i64, method: &str, params: Value) -> (StatusCode, Value) {
    let message = json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": method,
        "params": params,
    });
    post_raw(app, "/mcp", message.to_string()).await
}

/// Calls the `images` tool and returns the ids it listed
pub async fn call_images(app: Router, arguments: Value) -> Vec<String> {
    let (status, body) = rpc(
        app,
        1,
        "tools/call",
        json!({ "name": "images", "arguments": arguments }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_ne!(body["result"]["isError"], true, "tool failed: {}", body);

    body["result"]["structuredContent"]["result"]
        .as_array()
        .expect("result is an array")
        .iter()
        .map(|img| img["id"].as_str().unwrap().to_string())
        .collect()
}
