//! Generic CRUD routes over one `InMemoryStore<P>`.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::error::ApiError;
use crate::record::{Payload, Record, RecordId};
use crate::store::{InMemoryStore, ListQuery, RecordStore};

/// Body of a successful create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Created {
    pub id: RecordId,
}

/// Query string for list routes.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct ListParams {
    pub include_deleted: bool,
}

impl From<ListParams> for ListQuery {
    fn from(params: ListParams) -> Self {
        ListQuery {
            include_deleted: params.include_deleted,
        }
    }
}

/// `POST /`, `GET /`, and `GET|PATCH|DELETE /:id` for payload `P`.
pub fn routes<P>() -> Router<InMemoryStore<P>>
where
    P: Payload + Serialize + DeserializeOwned,
    P::Patch: DeserializeOwned,
{
    Router::new()
        .route("/", post(create::<P>).get(list::<P>))
        .route(
            "/:id",
            get(fetch::<P>).patch(update::<P>).delete(remove::<P>),
        )
}

fn parse_id(raw: &str) -> Result<RecordId, ApiError> {
    RecordId::parse(raw).map_err(|_| ApiError::bad_request(format!("malformed id: {raw}")))
}

async fn create<P>(
    State(store): State<InMemoryStore<P>>,
    payload: Result<Json<P>, JsonRejection>,
) -> Result<(StatusCode, Json<Created>), ApiError>
where
    P: Payload + Serialize + DeserializeOwned,
{
    let Json(payload) = payload?;
    let id = store.create(payload)?;
    Ok((StatusCode::CREATED, Json(Created { id })))
}

async fn list<P>(
    State(store): State<InMemoryStore<P>>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Vec<Record<P>>>, ApiError>
where
    P: Payload + Serialize,
{
    let Query(params) = params?;
    Ok(Json(store.list(&params.into())?))
}

async fn fetch<P>(
    State(store): State<InMemoryStore<P>>,
    Path(id): Path<String>,
) -> Result<Json<Record<P>>, ApiError>
where
    P: Payload + Serialize,
{
    let id = parse_id(&id)?;
    Ok(Json(store.get(&id)?))
}

async fn update<P>(
    State(store): State<InMemoryStore<P>>,
    Path(id): Path<String>,
    patch: Result<Json<P::Patch>, JsonRejection>,
) -> Result<Json<Record<P>>, ApiError>
where
    P: Payload + Serialize,
    P::Patch: DeserializeOwned,
{
    let id = parse_id(&id)?;
    let Json(patch) = patch?;
    Ok(Json(store.update(&id, patch)?))
}

async fn remove<P>(
    State(store): State<InMemoryStore<P>>,
    Path(id): Path<String>,
) -> Result<Json<Record<P>>, ApiError>
where
    P: Payload + Serialize,
{
    let id = parse_id(&id)?;
    Ok(Json(store.delete(&id)?))
}
