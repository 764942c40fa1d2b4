//! Conversions between wire messages and domain types.
//!
//! Decoding failures are reported as `Status::invalid_argument` so that
//! handlers can return them with `?`.

use chrono::{DateTime, Utc};
use prost_types::Timestamp;
use tonic::Status;

use super::messages as pb;
use crate::domain::{SightingInfo, SightingPatch};
use crate::field::Field;
use crate::record::{Record, RecordId};

pub fn to_timestamp(at: DateTime<Utc>) -> Timestamp {
    Timestamp {
        seconds: at.timestamp(),
        nanos: at.timestamp_subsec_nanos() as i32,
    }
}

pub fn from_timestamp(ts: Timestamp) -> Result<DateTime<Utc>, Status> {
    u32::try_from(ts.nanos)
        .ok()
        .and_then(|nanos| DateTime::from_timestamp(ts.seconds, nanos))
        .ok_or_else(|| Status::invalid_argument(format!("timestamp out of range: {ts}")))
}

pub fn parse_uuid(raw: &str) -> Result<RecordId, Status> {
    RecordId::parse(raw).map_err(|_| Status::invalid_argument(format!("malformed uuid: {raw}")))
}

impl TryFrom<pb::SightingInfo> for SightingInfo {
    type Error = Status;

    fn try_from(info: pb::SightingInfo) -> Result<Self, Self::Error> {
        Ok(Self {
            observed_at: info.observed_at.map(from_timestamp).transpose()?,
            location: info.location,
            description: info.description,
            color: info.color,
            sound: info.sound,
            duration_seconds: info.duration_seconds,
        })
    }
}

impl From<&SightingInfo> for pb::SightingInfo {
    fn from(info: &SightingInfo) -> Self {
        Self {
            observed_at: info.observed_at.map(to_timestamp),
            location: info.location.clone(),
            description: info.description.clone(),
            color: info.color.clone(),
            sound: info.sound,
            duration_seconds: info.duration_seconds,
        }
    }
}

impl From<&Record<SightingInfo>> for pb::Sighting {
    fn from(record: &Record<SightingInfo>) -> Self {
        Self {
            uuid: record.id.to_string(),
            info: Some((&record.payload).into()),
            created_at: Some(to_timestamp(record.created_at)),
            updated_at: Some(to_timestamp(record.updated_at)),
            deleted_at: record.deleted_at.map(to_timestamp),
        }
    }
}

impl TryFrom<pb::Sighting> for Record<SightingInfo> {
    type Error = Status;

    fn try_from(sighting: pb::Sighting) -> Result<Self, Self::Error> {
        let required = |ts: Option<Timestamp>, name: &str| {
            ts.ok_or_else(|| Status::invalid_argument(format!("{name} is required")))
                .and_then(from_timestamp)
        };
        Ok(Self {
            id: parse_uuid(&sighting.uuid)?,
            payload: sighting
                .info
                .ok_or_else(|| Status::invalid_argument("info is required"))?
                .try_into()?,
            created_at: required(sighting.created_at, "created_at")?,
            updated_at: required(sighting.updated_at, "updated_at")?,
            deleted_at: sighting.deleted_at.map(from_timestamp).transpose()?,
        })
    }
}

/// Set wire fields become `Present`, unset ones `Absent`.
impl TryFrom<pb::SightingUpdateInfo> for SightingPatch {
    type Error = Status;

    fn try_from(update: pb::SightingUpdateInfo) -> Result<Self, Self::Error> {
        fn present<T>(value: Option<T>) -> Field<Option<T>> {
            value.map_or(Field::Absent, |v| Field::Present(Some(v)))
        }
        Ok(Self {
            observed_at: match update.observed_at {
                Some(ts) => Field::Present(Some(from_timestamp(ts)?)),
                None => Field::Absent,
            },
            location: update.location.into(),
            description: update.description.into(),
            color: present(update.color),
            sound: present(update.sound),
            duration_seconds: present(update.duration_seconds),
        })
    }
}

/// The wire format cannot express clearing an optional field, so a patch
/// with `Present(None)` is rejected.
impl TryFrom<SightingPatch> for pb::SightingUpdateInfo {
    type Error = Status;

    fn try_from(patch: SightingPatch) -> Result<Self, Self::Error> {
        fn set<T>(field: Field<Option<T>>, name: &str) -> Result<Option<T>, Status> {
            match field {
                Field::Absent => Ok(None),
                Field::Present(Some(value)) => Ok(Some(value)),
                Field::Present(None) => Err(Status::invalid_argument(format!(
                    "{name} cannot be cleared through this interface"
                ))),
            }
        }
        Ok(Self {
            observed_at: set(patch.observed_at, "observed_at")?.map(to_timestamp),
            location: patch.location.into_option(),
            description: patch.description.into_option(),
            color: set(patch.color, "color")?,
            sound: set(patch.sound, "sound")?,
            duration_seconds: set(patch.duration_seconds, "duration_seconds")?,
        })
    }
}
