//! gRPC transport: the `ufo.v1.UfoService` façade over the sighting store.
//!
//! Requires the `grpc` feature. Uses tonic for the gRPC server and prost
//! for message serialization (standard protobuf wire format, no `.proto` file).
//!
//! ## RPCs
//!
//! - `Create(CreateRequest) -> CreateResponse`
//! - `Get(GetRequest) -> GetResponse`
//! - `GetAll(GetAllRequest) -> GetAllResponse`
//! - `Update(UpdateRequest) -> Empty`
//! - `Delete(DeleteRequest) -> Empty`
//!
//! ## Example
//!
//! ```ignore
//! use skywatch::{grpc, InMemoryStore};
//!
//! let store = InMemoryStore::new();
//!
//! // Get the server to compose with other tonic routes
//! let grpc_svc = grpc::grpc_server(store.clone());
//!
//! // Or serve directly
//! grpc::serve_grpc(store, "[::1]:50051").await?;
//! ```

mod convert;
mod messages;
mod service;

pub use convert::{from_timestamp, parse_uuid, to_timestamp};
pub use messages::*;
pub use service::UfoHandler;

use std::net::SocketAddr;
use std::time::Duration;

use tonic::codegen::http;
use tonic::transport::Server;

use crate::domain;
use crate::error::{Error, Result};
use crate::store::InMemoryStore;

// ---------------------------------------------------------------------------
// Generated service trait + server/client
// ---------------------------------------------------------------------------

include!(concat!(env!("OUT_DIR"), "/ufo.v1.UfoService.rs"));

pub use ufo_service_client::UfoServiceClient;
pub use ufo_service_server::{UfoService, UfoServiceServer};

// ---------------------------------------------------------------------------
// Convenience constructors
// ---------------------------------------------------------------------------

/// Create a `UfoServiceServer` over a shared sighting store.
pub fn grpc_server(store: InMemoryStore<domain::SightingInfo>) -> UfoServiceServer<UfoHandler> {
    UfoServiceServer::new(UfoHandler::new(store))
}

/// Span opened around every RPC, named after the method path.
pub fn rpc_span(request: &http::Request<()>) -> tracing::Span {
    tracing::info_span!("rpc", method = %request.uri().path())
}

/// Deadline applied by [`server_builder`] to every RPC.
pub const DEFAULT_RPC_TIMEOUT: Duration = Duration::from_secs(10);

/// A server builder with RPC logging and the default per-RPC deadline.
pub fn server_builder() -> Server {
    server_builder_with_timeout(DEFAULT_RPC_TIMEOUT)
}

/// A server builder with RPC logging; RPCs running past `rpc_timeout` are
/// cancelled.
pub fn server_builder_with_timeout(rpc_timeout: Duration) -> Server {
    Server::builder().trace_fn(rpc_span).timeout(rpc_timeout)
}

/// Bind and serve the gRPC transport at the given address (e.g. `"[::1]:50051"`).
pub async fn serve_grpc(store: InMemoryStore<domain::SightingInfo>, addr: &str) -> Result<()> {
    let addr: SocketAddr = addr
        .parse()
        .map_err(|_| Error::config_validation(format!("invalid gRPC address: {addr}")))?;
    server_builder()
        .add_service(grpc_server(store))
        .serve(addr)
        .await
        .map_err(Error::transport)
}
