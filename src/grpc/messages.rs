// Message types for `ufo.v1.UfoService` (prost, standard protobuf wire
// format, no `.proto` file).

use prost_types::Timestamp;

#[derive(Clone, PartialEq, prost::Message)]
pub struct SightingInfo {
    #[prost(message, optional, tag = "1")]
    pub observed_at: Option<Timestamp>,
    #[prost(string, tag = "2")]
    pub location: String,
    #[prost(string, tag = "3")]
    pub description: String,
    #[prost(string, optional, tag = "4")]
    pub color: Option<String>,
    #[prost(bool, optional, tag = "5")]
    pub sound: Option<bool>,
    #[prost(int32, optional, tag = "6")]
    pub duration_seconds: Option<i32>,
}

/// Partial update. Every field is optional; an unset field is left alone.
#[derive(Clone, PartialEq, prost::Message)]
pub struct SightingUpdateInfo {
    #[prost(message, optional, tag = "1")]
    pub observed_at: Option<Timestamp>,
    #[prost(string, optional, tag = "2")]
    pub location: Option<String>,
    #[prost(string, optional, tag = "3")]
    pub description: Option<String>,
    #[prost(string, optional, tag = "4")]
    pub color: Option<String>,
    #[prost(bool, optional, tag = "5")]
    pub sound: Option<bool>,
    #[prost(int32, optional, tag = "6")]
    pub duration_seconds: Option<i32>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct Sighting {
    #[prost(string, tag = "1")]
    pub uuid: String,
    #[prost(message, optional, tag = "2")]
    pub info: Option<SightingInfo>,
    #[prost(message, optional, tag = "3")]
    pub created_at: Option<Timestamp>,
    #[prost(message, optional, tag = "4")]
    pub updated_at: Option<Timestamp>,
    #[prost(message, optional, tag = "5")]
    pub deleted_at: Option<Timestamp>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct CreateRequest {
    #[prost(message, optional, tag = "1")]
    pub info: Option<SightingInfo>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct CreateResponse {
    #[prost(string, tag = "1")]
    pub uuid: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct GetRequest {
    #[prost(string, tag = "1")]
    pub uuid: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct GetResponse {
    #[prost(message, optional, tag = "1")]
    pub sighting: Option<Sighting>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct GetAllRequest {
    /// Also return soft-deleted sightings.
    #[prost(bool, tag = "1")]
    pub include_deleted: bool,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct GetAllResponse {
    #[prost(message, repeated, tag = "1")]
    pub sightings: Vec<Sighting>,
    #[prost(uint64, tag = "2")]
    pub total_count: u64,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct UpdateRequest {
    #[prost(string, tag = "1")]
    pub uuid: String,
    #[prost(message, optional, tag = "2")]
    pub update_info: Option<SightingUpdateInfo>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct DeleteRequest {
    #[prost(string, tag = "1")]
    pub uuid: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct Empty {}
