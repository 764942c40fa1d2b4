//! Weather lookups by city name.
//!
//! The record id is the canonical key, but readings are usually addressed
//! by city. The store keeps at most one live reading per city: a `POST` or
//! `PATCH` that would reuse a taken city answers `409 Conflict`. `PUT`
//! updates the live reading for a city or creates it, in one write-locked
//! step.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use super::error::ApiError;
use crate::domain::{Weather, WeatherPatch};
use crate::record::Record;
use crate::store::{InMemoryStore, RecordStore, Upsert};

/// Body of `PUT /city/:city`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UpdateWeatherRequest {
    pub temperature: f64,
}

/// `GET|PUT /city/:city`.
pub fn routes() -> Router<InMemoryStore<Weather>> {
    Router::new().route("/city/:city", get(by_city).put(put_by_city))
}

async fn by_city(
    State(store): State<InMemoryStore<Weather>>,
    Path(city): Path<String>,
) -> Result<Json<Record<Weather>>, ApiError> {
    store
        .find(&|weather: &Weather| weather.city == city)?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("weather data not found for city: {city}")))
}

async fn put_by_city(
    State(store): State<InMemoryStore<Weather>>,
    Path(city): Path<String>,
    body: Result<Json<UpdateWeatherRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Record<Weather>>), ApiError> {
    let Json(body) = body?;
    let outcome = store.upsert_where(
        &|weather: &Weather| weather.city == city,
        WeatherPatch::temperature(body.temperature),
        Weather::new(city.clone(), body.temperature),
    )?;

    let status = match outcome {
        Upsert::Created(_) => StatusCode::CREATED,
        Upsert::Updated(_) => StatusCode::OK,
    };
    Ok((status, Json(outcome.into_record())))
}
