//! Full server tests: all three listeners over one shared state.

use serde_json::{json, Value};
use skywatch::grpc::{GetRequest, UfoServiceClient};
use skywatch::http::AppState;
use skywatch::server::Server;
use skywatch::Config;
use tokio::sync::oneshot;

fn local_config() -> Config {
    let mut config = Config::default();
    config.http.addr = "127.0.0.1:0".into();
    config.grpc.addr = "127.0.0.1:0".into();
    config.gateway.addr = "127.0.0.1:0".into();
    config.gateway.upstream = "http://127.0.0.1:0".into();
    config.shutdown_timeout_secs = 2;
    config
}

#[tokio::test]
async fn facades_share_one_store() {
    let server = Server::bind(&local_config(), AppState::new()).await.unwrap();
    let rest = format!("http://{}", server.http_addr().unwrap());
    let grpc = format!("http://{}", server.grpc_addr().unwrap());
    let gateway = format!("http://{}", server.gateway_addr().unwrap().unwrap());

    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let running = tokio::spawn(server.run(async move {
        let _ = stop_rx.await;
    }));

    let client = reqwest::Client::new();
    let resp = client
        .post(format!("{rest}/api/v1/sightings"))
        .json(&json!({ "location": "Rendlesham", "description": "lights in the forest" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);
    let created: Value = resp.json().await.unwrap();
    let id = created["id"].as_str().unwrap().to_string();

    // Visible over gRPC.
    let mut grpc_client = UfoServiceClient::connect(grpc).await.unwrap();
    let sighting = grpc_client
        .get(GetRequest { uuid: id.clone() })
        .await
        .unwrap()
        .into_inner()
        .sighting
        .unwrap();
    assert_eq!(sighting.info.unwrap().location, "Rendlesham");

    // And through the gateway.
    let record: Value = reqwest::get(format!("{gateway}/api/v1/ufo/{id}"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(record["description"], "lights in the forest");

    stop_tx.send(()).unwrap();
    running.await.unwrap().unwrap();
}

#[tokio::test]
async fn bind_conflict_is_reported() {
    let taken = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let mut config = local_config();
    config.http.addr = taken.local_addr().unwrap().to_string();

    let err = Server::bind(&config, AppState::new()).await.unwrap_err();
    assert!(matches!(err, skywatch::Error::Bind { .. }));
}
