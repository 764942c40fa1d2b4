//! REST transport tests.
//!
//! Starts the axum router and exercises it with reqwest.

use std::time::Duration;

use serde_json::{json, Value};
use skywatch::http::{self, AppState};
use skywatch::{RecordId, RecordStore, Weather};

/// Bind to port 0 and return the base URL.
async fn start_server(state: AppState) -> String {
    let app = http::router(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

async fn create(client: &reqwest::Client, url: String, body: Value) -> String {
    let resp = client.post(url).json(&body).send().await.unwrap();
    assert_eq!(resp.status(), 201);
    let body: Value = resp.json().await.unwrap();
    body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn health_counts_live_records() {
    let state = AppState::new();
    state.weather.create(Weather::new("Oslo", 5.0)).unwrap();
    let deleted = state.weather.create(Weather::new("Bergen", 9.0)).unwrap();
    state.weather.delete(&deleted).unwrap();
    let base = start_server(state).await;

    let resp = reqwest::get(format!("{base}/health")).await.unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "ok": true, "weather": 1, "sightings": 0 }));
}

#[tokio::test]
async fn weather_crud() {
    let base = start_server(AppState::new()).await;
    let client = reqwest::Client::new();
    let id = create(
        &client,
        format!("{base}/api/v1/weather"),
        json!({ "city": "Oslo", "temperature": 5.0 }),
    )
    .await;

    let resp = client
        .patch(format!("{base}/api/v1/weather/{id}"))
        .json(&json!({ "temperature": 6.0 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let record: Value = client
        .get(format!("{base}/api/v1/weather/{id}"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(record["city"], "Oslo");
    assert_eq!(record["temperature"], 6.0);
    assert_eq!(record["deleted_at"], Value::Null);

    let resp = client
        .delete(format!("{base}/api/v1/weather/{id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let deleted: Value = resp.json().await.unwrap();
    assert!(deleted["deleted_at"].is_string());

    let resp = client
        .get(format!("{base}/api/v1/weather/{id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["code"], 404);
    assert_eq!(body["message"], format!("weather with id {id} not found"));
}

#[tokio::test]
async fn list_hides_deleted_unless_asked() {
    let state = AppState::new();
    let oslo = state.weather.create(Weather::new("Oslo", 5.0)).unwrap();
    state.weather.create(Weather::new("Bergen", 9.0)).unwrap();
    state.weather.delete(&oslo).unwrap();
    let base = start_server(state).await;

    let live: Vec<Value> = reqwest::get(format!("{base}/api/v1/weather"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(live.len(), 1);
    assert_eq!(live[0]["city"], "Bergen");

    let all: Vec<Value> = reqwest::get(format!("{base}/api/v1/weather?include_deleted=true"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn weather_by_city() {
    let base = start_server(AppState::new()).await;
    let client = reqwest::Client::new();

    let resp = client
        .get(format!("{base}/api/v1/weather/city/Oslo"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "weather data not found for city: Oslo");

    let resp = client
        .put(format!("{base}/api/v1/weather/city/Oslo"))
        .json(&json!({ "temperature": 5.0 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);
    let created: Value = resp.json().await.unwrap();

    let resp = client
        .put(format!("{base}/api/v1/weather/city/Oslo"))
        .json(&json!({ "temperature": -2.5 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let updated: Value = resp.json().await.unwrap();
    assert_eq!(updated["id"], created["id"]);

    let record: Value = client
        .get(format!("{base}/api/v1/weather/city/Oslo"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(record["temperature"], -2.5);
}

#[tokio::test]
async fn sighting_patch_distinguishes_absent_and_null() {
    let base = start_server(AppState::new()).await;
    let client = reqwest::Client::new();
    let id = create(
        &client,
        format!("{base}/api/v1/sightings"),
        json!({
            "location": "Phoenix",
            "description": "v-shaped lights",
            "color": "orange",
            "sound": false,
            "duration_seconds": 90
        }),
    )
    .await;

    let resp = client
        .patch(format!("{base}/api/v1/sightings/{id}"))
        .json(&json!({ "color": null, "duration_seconds": 0 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let record: Value = resp.json().await.unwrap();

    assert_eq!(record["color"], Value::Null);
    assert_eq!(record["duration_seconds"], 0);
    assert_eq!(record["sound"], false);
    assert_eq!(record["location"], "Phoenix");
}

#[tokio::test]
async fn rejects_bad_requests() {
    let state = AppState::new();
    let id = state.weather.create(Weather::new("Oslo", 5.0)).unwrap();
    let base = start_server(state).await;
    let client = reqwest::Client::new();

    // Empty patch.
    let resp = client
        .patch(format!("{base}/api/v1/weather/{id}"))
        .json(&json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["code"], 400);

    // Malformed id.
    let resp = client
        .get(format!("{base}/api/v1/weather/not-a-uuid"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    // Missing required field.
    let resp = client
        .post(format!("{base}/api/v1/weather"))
        .json(&json!({ "city": "", "temperature": 1.0 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "invalid argument: city is required");

    // Unknown patch field.
    let resp = client
        .patch(format!("{base}/api/v1/weather/{id}"))
        .json(&json!({ "humidity": 80 }))
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_client_error());

    // Unknown id.
    let resp = client
        .delete(format!("{base}/api/v1/weather/{}", RecordId::new()))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn duplicate_city_is_conflict() {
    let state = AppState::new();
    state.weather.create(Weather::new("Oslo", 5.0)).unwrap();
    let bergen = state.weather.create(Weather::new("Bergen", 9.0)).unwrap();
    let base = start_server(state.clone()).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/api/v1/weather"))
        .json(&json!({ "city": "Oslo", "temperature": 9.0 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 409);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "weather Oslo already exists");

    let resp = client
        .patch(format!("{base}/api/v1/weather/{bergen}"))
        .json(&json!({ "city": "Oslo" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 409);

    assert_eq!(state.weather.len().unwrap(), 2);
    let oslo: Value = reqwest::get(format!("{base}/api/v1/weather/city/Oslo"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(oslo["temperature"], 5.0);
}

#[tokio::test]
async fn rest_and_store_share_state() {
    let state = AppState::new();
    let base = start_server(state.clone()).await;
    let client = reqwest::Client::new();

    let id = create(
        &client,
        format!("{base}/api/v1/weather"),
        json!({ "city": "Tromsø", "temperature": -8.0 }),
    )
    .await;

    let record = state.weather.get(&id.parse().unwrap()).unwrap();
    assert_eq!(record.payload, Weather::new("Tromsø", -8.0));
}

async fn slow_reading() -> &'static str {
    tokio::time::sleep(Duration::from_millis(500)).await;
    "late"
}

async fn broken_sensor() -> &'static str {
    panic!("sensor exploded")
}

/// Serve `router` behind the same layers the REST API uses.
async fn start_hardened(router: axum::Router, timeout: Duration) -> String {
    let app = http::harden(router, timeout);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn slow_handler_times_out() {
    let router = axum::Router::new().route("/slow", axum::routing::get(slow_reading));
    let base = start_hardened(router, Duration::from_millis(50)).await;

    let resp = reqwest::get(format!("{base}/slow")).await.unwrap();
    assert_eq!(resp.status(), 408);
}

#[tokio::test]
async fn panicking_handler_is_500_and_server_survives() {
    let router = axum::Router::new()
        .route("/boom", axum::routing::get(broken_sensor))
        .route("/ok", axum::routing::get(|| async { "fine" }));
    let base = start_hardened(router, Duration::from_secs(5)).await;

    let resp = reqwest::get(format!("{base}/boom")).await.unwrap();
    assert_eq!(resp.status(), 500);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "code": 500, "message": "internal server error" }));

    let resp = reqwest::get(format!("{base}/ok")).await.unwrap();
    assert_eq!(resp.status(), 200);
}
