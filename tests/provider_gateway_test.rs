//! Provider gateway against a local stand-in for the Roblox APIs.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::extract::{Path, RawQuery, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

use clothing_catalog::config::ProviderConfig;
use clothing_catalog::infra::{CatalogProvider, ProviderError, RobloxGateway};

/// Scripted provider: the first `failures` detail requests answer 503.
#[derive(Clone)]
struct Upstream {
    base_url: String,
    failures: usize,
    details_hits: Arc<AtomicUsize>,
    image_hits: Arc<AtomicUsize>,
    details_delay: Duration,
    details_body: serde_json::Value,
    user_agents: Arc<Mutex<Vec<String>>>,
}

async fn details(State(upstream): State<Upstream>, headers: HeaderMap) -> Response {
    let hit = upstream.details_hits.fetch_add(1, Ordering::SeqCst) + 1;
    if let Some(agent) = headers.get(header::USER_AGENT).and_then(|v| v.to_str().ok()) {
        upstream.user_agents.lock().unwrap().push(agent.to_string());
    }
    tokio::time::sleep(upstream.details_delay).await;

    if hit <= upstream.failures {
        return StatusCode::SERVICE_UNAVAILABLE.into_response();
    }
    Json(upstream.details_body.clone()).into_response()
}

async fn thumbnails(
    State(upstream): State<Upstream>,
    RawQuery(query): RawQuery,
) -> Json<serde_json::Value> {
    let query = query.unwrap_or_default();
    if query.contains("assetIds=42") {
        Json(json!({ "data": [{ "imageUrl": format!("{}/img/42.png", upstream.base_url) }] }))
    } else {
        Json(json!({ "data": [] }))
    }
}

async fn image(State(upstream): State<Upstream>, Path(name): Path<String>) -> Response {
    upstream.image_hits.fetch_add(1, Ordering::SeqCst);
    if name == "42.png" {
        ([(header::CONTENT_TYPE, "image/png")], &b"\x89PNG hat"[..]).into_response()
    } else {
        StatusCode::NOT_FOUND.into_response()
    }
}

struct Harness {
    gateway: RobloxGateway,
    upstream: Upstream,
    base_delay: Duration,
}

async fn harness(failures: usize, details_body: serde_json::Value) -> Harness {
    harness_with(failures, details_body, Duration::ZERO, Duration::from_secs(5)).await
}

async fn harness_with(
    failures: usize,
    details_body: serde_json::Value,
    details_delay: Duration,
    deadline: Duration,
) -> Harness {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());

    let upstream = Upstream {
        base_url: base_url.clone(),
        failures,
        details_hits: Arc::new(AtomicUsize::new(0)),
        image_hits: Arc::new(AtomicUsize::new(0)),
        details_delay,
        details_body,
        user_agents: Arc::new(Mutex::new(Vec::new())),
    };

    let router = Router::new()
        .route("/v2/assets/:id/details", get(details))
        .route("/v1/assets", get(thumbnails))
        .route("/img/:name", get(image))
        .with_state(upstream.clone());
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    let base_delay = Duration::from_millis(40);
    let config = ProviderConfig {
        economy_base_url: base_url.clone(),
        thumbnails_base_url: base_url,
        max_attempts: 3,
        base_delay,
        request_timeout: Duration::from_secs(2),
        deadline,
    };

    Harness {
        gateway: RobloxGateway::new(&config).unwrap(),
        upstream,
        base_delay,
    }
}

fn cool_hat() -> serde_json::Value {
    json!({
        "Name": "Cool Hat",
        "Description": "Very cool",
        "PriceInRobux": 50,
        "AssetTypeId": 12
    })
}

#[tokio::test]
async fn test_metadata_succeeds_on_third_attempt() {
    let h = harness(2, cool_hat()).await;

    let metadata = h.gateway.fetch_item_metadata("42").await.unwrap();

    assert_eq!(h.upstream.details_hits.load(Ordering::SeqCst), 3);
    assert_eq!(metadata.name, "Cool Hat");
    assert_eq!(metadata.description, "Very cool");
    assert_eq!(metadata.price, 50);
    assert_eq!(metadata.item_type, "Pants");
}

#[tokio::test]
async fn test_metadata_fails_after_exactly_three_attempts() {
    let h = harness(usize::MAX, cool_hat()).await;
    let started = Instant::now();

    let result = h.gateway.fetch_item_metadata("42").await;

    assert!(matches!(
        result,
        Err(ProviderError::FetchFailed { attempts: 3, .. })
    ));
    assert_eq!(h.upstream.details_hits.load(Ordering::SeqCst), 3);
    // Backoff of base then 2 * base between the attempts
    assert!(started.elapsed() >= h.base_delay * 3);
}

#[tokio::test]
async fn test_metadata_defaults_for_sparse_payload() {
    let h = harness(0, json!({ "AssetTypeId": 11 })).await;

    let metadata = h.gateway.fetch_item_metadata("77").await.unwrap();

    assert_eq!(metadata.name, "Item 77");
    assert_eq!(metadata.description, "Roblox item 77");
    assert_eq!(metadata.price, 0);
    assert_eq!(metadata.item_type, "Shirt");
}

#[tokio::test]
async fn test_metadata_sends_browser_headers() {
    let h = harness(0, cool_hat()).await;

    h.gateway.fetch_item_metadata("42").await.unwrap();

    let agents = h.upstream.user_agents.lock().unwrap();
    assert!(agents[0].starts_with("Mozilla/5.0"));
}

#[tokio::test]
async fn test_metadata_respects_total_deadline() {
    let h = harness_with(
        0,
        cool_hat(),
        Duration::from_millis(500),
        Duration::from_millis(100),
    )
    .await;

    let result = h.gateway.fetch_item_metadata("42").await;

    assert!(matches!(result, Err(ProviderError::DeadlineExceeded(_))));
}

#[tokio::test]
async fn test_metadata_bad_body_is_not_retried() {
    let h = harness(0, json!("unexpected")).await;

    let result = h.gateway.fetch_item_metadata("42").await;

    assert!(matches!(result, Err(ProviderError::Decode(_))));
    assert_eq!(h.upstream.details_hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_image_two_step_fetch_is_cached() {
    let h = harness(0, cool_hat()).await;

    let first = h.gateway.fetch_item_image("42").await.unwrap();
    let second = h.gateway.fetch_item_image("42").await.unwrap();

    assert_eq!(&first[..], b"\x89PNG hat");
    assert_eq!(first, second);
    assert_eq!(h.upstream.image_hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_image_without_thumbnail_is_none() {
    let h = harness(0, cool_hat()).await;

    assert!(h.gateway.fetch_item_image("7").await.is_none());
    assert_eq!(h.upstream.image_hits.load(Ordering::SeqCst), 0);
}
