//! skywatch: concurrent in-memory records for weather readings and UFO
//! sightings, with partial updates and soft deletes.
//!
//! The core is [`InMemoryStore`], a reader-writer-locked map from
//! [`RecordId`] to [`Record`]. Updates carry one [`Field`] per payload field
//! so that "not mentioned" and "set to zero" stay distinct.
//!
//! Transports are behind features:
//!
//! - `http`: REST routes ([`http::router`]).
//! - `grpc`: the `ufo.v1.UfoService` façade ([`grpc::grpc_server`]).
//! - `gateway`: REST routes forwarding to gRPC, and the [`server`] that runs
//!   all three listeners.

pub mod cli;
pub mod clock;
pub mod config;
pub mod domain;
pub mod error;
pub mod field;
pub mod logging;
pub mod record;
pub mod store;

#[cfg(feature = "http")]
pub mod http;

#[cfg(feature = "grpc")]
pub mod grpc;

#[cfg(feature = "gateway")]
pub mod gateway;

#[cfg(feature = "gateway")]
pub mod server;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::Config;
pub use domain::{SightingInfo, SightingPatch, Weather, WeatherPatch};
pub use error::{Error, Result};
pub use field::Field;
pub use record::{Patch, Payload, Record, RecordId};
pub use store::{InMemoryStore, ListQuery, RecordStore, StoreError, Upsert};
