//! Gateway tests: REST calls forwarded to a live gRPC server.

use serde_json::{json, Value};
use skywatch::{gateway, grpc, InMemoryStore, RecordStore, SightingInfo};
use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;

/// Start the gRPC server over `store` and a gateway in front of it.
/// Returns the gateway's base URL.
async fn start(store: InMemoryStore<SightingInfo>) -> String {
    let grpc_listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let grpc_addr = grpc_listener.local_addr().unwrap();
    let grpc_svc = grpc::grpc_server(store);
    tokio::spawn(async move {
        grpc::server_builder()
            .add_service(grpc_svc)
            .serve_with_incoming(TcpListenerStream::new(grpc_listener))
            .await
            .unwrap();
    });

    let client = gateway::connect(&format!("http://{grpc_addr}")).unwrap();
    let app = gateway::router(client);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn crud_through_gateway() {
    let store = InMemoryStore::<SightingInfo>::new();
    let base = start(store.clone()).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/api/v1/ufo"))
        .json(&json!({
            "observed_at": "1997-03-13T19:30:00Z",
            "location": "Phoenix",
            "description": "v-shaped formation of lights",
            "color": "orange"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);
    let created: Value = resp.json().await.unwrap();
    let id = created["id"].as_str().unwrap().to_string();

    let record: Value = client
        .get(format!("{base}/api/v1/ufo/{id}"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(record["id"], id.as_str());
    assert_eq!(record["location"], "Phoenix");
    assert_eq!(record["observed_at"], "1997-03-13T19:30:00Z");
    assert_eq!(record["sound"], Value::Null);

    let resp = client
        .patch(format!("{base}/api/v1/ufo/{id}"))
        .json(&json!({ "sound": true }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 204);
    let stored = store.get(&id.parse().unwrap()).unwrap();
    assert_eq!(stored.payload.sound, Some(true));
    assert_eq!(stored.payload.color.as_deref(), Some("orange"));

    let resp = client
        .delete(format!("{base}/api/v1/ufo/{id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 204);

    let resp = client
        .get(format!("{base}/api/v1/ufo/{id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["code"], 404);
}

#[tokio::test]
async fn list_through_gateway() {
    let store = InMemoryStore::<SightingInfo>::new();
    let gone = store.create(SightingInfo::new("Roswell", "debris")).unwrap();
    store.create(SightingInfo::new("Rendlesham", "lights in the forest")).unwrap();
    store.delete(&gone).unwrap();
    let base = start(store).await;

    let live: Vec<Value> = reqwest::get(format!("{base}/api/v1/ufo"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(live.len(), 1);
    assert_eq!(live[0]["location"], "Rendlesham");

    let all: Vec<Value> = reqwest::get(format!("{base}/api/v1/ufo?include_deleted=true"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn gateway_maps_status_codes() {
    let store = InMemoryStore::<SightingInfo>::new();
    let id = store.create(SightingInfo::new("Roswell", "debris")).unwrap();
    let base = start(store).await;
    let client = reqwest::Client::new();

    // Empty patch reaches the store and is rejected there.
    let resp = client
        .patch(format!("{base}/api/v1/ufo/{id}"))
        .json(&json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    // Clearing a field cannot be expressed over gRPC.
    let resp = client
        .patch(format!("{base}/api/v1/ufo/{id}"))
        .json(&json!({ "color": null }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    let resp = client
        .get(format!("{base}/api/v1/ufo/not-a-uuid"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    let resp = client
        .post(format!("{base}/api/v1/ufo"))
        .json(&json!({ "location": "", "description": "nothing" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn unreachable_upstream_is_503() {
    // Reserve a port, then free it so nothing listens there.
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };
    let client = gateway::connect(&format!("http://{addr}")).unwrap();
    let app = gateway::router(client);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let resp = reqwest::get(format!("{base}/api/v1/ufo")).await.unwrap();
    assert_eq!(resp.status(), 503);
}
