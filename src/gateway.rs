//! HTTP-to-gRPC gateway: REST/JSON routes that forward to `UfoService`.
//!
//! Requires the `gateway` feature (`http` + `grpc`). The gateway holds no
//! records of its own; every request becomes one RPC on the upstream.
//!
//! ## Routes
//!
//! | Route | RPC |
//! |---|---|
//! | `POST /api/v1/ufo` | `Create` |
//! | `GET /api/v1/ufo[?include_deleted=true]` | `GetAll` |
//! | `GET /api/v1/ufo/:uuid` | `Get` |
//! | `PATCH /api/v1/ufo/:uuid` | `Update` |
//! | `DELETE /api/v1/ufo/:uuid` | `Delete` |
//!
//! Bodies use the same JSON shape as `/api/v1/sightings`. `PATCH` and
//! `DELETE` answer `204 No Content`, as the RPCs return `Empty`.

use std::time::Duration;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use tonic::transport::{Channel, Endpoint};
use tonic::{Code, Status};

use crate::domain::{SightingInfo, SightingPatch};
use crate::error::Error;
use crate::grpc::{
    parse_uuid, CreateRequest, DeleteRequest, GetAllRequest, GetRequest, SightingUpdateInfo,
    UfoServiceClient, UpdateRequest,
};
use crate::http::{harden, ApiError, Created, ListParams, DEFAULT_REQUEST_TIMEOUT};
use crate::record::Record;

type Client = UfoServiceClient<Channel>;

impl From<Status> for ApiError {
    fn from(status: Status) -> Self {
        let code = match status.code() {
            Code::NotFound => StatusCode::NOT_FOUND,
            Code::InvalidArgument => StatusCode::BAD_REQUEST,
            Code::AlreadyExists => StatusCode::CONFLICT,
            Code::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        ApiError::new(code, status.message())
    }
}

/// A client for `upstream` (e.g. `"http://127.0.0.1:50051"`).
///
/// The channel connects on first use, so the gateway can start before the
/// gRPC listener does.
pub fn connect(upstream: &str) -> crate::error::Result<Client> {
    let endpoint = Endpoint::from_shared(upstream.to_string()).map_err(Error::transport)?;
    Ok(UfoServiceClient::new(endpoint.connect_lazy()))
}

/// Build the gateway router around `client` with the default request
/// timeout.
pub fn router(client: Client) -> Router {
    router_with_timeout(client, DEFAULT_REQUEST_TIMEOUT)
}

/// Build the gateway router around `client`. Each request, including its
/// upstream RPC, is bounded by `request_timeout`.
pub fn router_with_timeout(client: Client, request_timeout: Duration) -> Router {
    let routes = Router::new()
        .route("/api/v1/ufo", post(create).get(list))
        .route("/api/v1/ufo/:uuid", get(fetch).patch(update).delete(remove))
        .with_state(client);
    harden(routes, request_timeout)
}

/// A reply from upstream that does not decode is the upstream's fault.
fn bad_reply(status: Status) -> ApiError {
    ApiError::new(StatusCode::BAD_GATEWAY, status.message())
}

async fn create(
    State(mut client): State<Client>,
    body: Result<Json<SightingInfo>, JsonRejection>,
) -> Result<(StatusCode, Json<Created>), ApiError> {
    let Json(info) = body?;
    let reply = client
        .create(CreateRequest {
            info: Some((&info).into()),
        })
        .await?
        .into_inner();
    let id = parse_uuid(&reply.uuid).map_err(bad_reply)?;
    Ok((StatusCode::CREATED, Json(Created { id })))
}

async fn list(
    State(mut client): State<Client>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Vec<Record<SightingInfo>>>, ApiError> {
    let Query(params) = params?;
    let reply = client
        .get_all(GetAllRequest {
            include_deleted: params.include_deleted,
        })
        .await?
        .into_inner();
    let records = reply
        .sightings
        .into_iter()
        .map(Record::<SightingInfo>::try_from)
        .collect::<Result<Vec<_>, _>>()
        .map_err(bad_reply)?;
    Ok(Json(records))
}

async fn fetch(
    State(mut client): State<Client>,
    Path(uuid): Path<String>,
) -> Result<Json<Record<SightingInfo>>, ApiError> {
    let reply = client.get(GetRequest { uuid }).await?.into_inner();
    let sighting = reply
        .sighting
        .ok_or_else(|| ApiError::new(StatusCode::BAD_GATEWAY, "upstream returned no sighting"))?;
    Ok(Json(Record::try_from(sighting).map_err(bad_reply)?))
}

async fn update(
    State(mut client): State<Client>,
    Path(uuid): Path<String>,
    body: Result<Json<SightingPatch>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(patch) = body?;
    let update_info = SightingUpdateInfo::try_from(patch)?;
    client
        .update(UpdateRequest {
            uuid,
            update_info: Some(update_info),
        })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn remove(
    State(mut client): State<Client>,
    Path(uuid): Path<String>,
) -> Result<StatusCode, ApiError> {
    client.delete(DeleteRequest { uuid }).await?;
    Ok(StatusCode::NO_CONTENT)
}
