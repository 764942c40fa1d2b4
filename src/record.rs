//! Entity records and the traits their payloads implement.
//!
//! A [`Record`] wraps a domain payload with its identity and lifecycle
//! timestamps. The store owns every record; callers only ever see clones.
//!
//! Payload types describe themselves through [`Payload`] (required-field
//! validation, a kind name for messages) and name a [`Patch`] type that
//! carries a partial update as one [`Field`](crate::Field) per payload field.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier of a record. Random (v4), assigned by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(Uuid);

impl RecordId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse the hyphenated text form.
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RecordId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// A domain payload that can be kept in a store.
pub trait Payload: Clone + Send + Sync + 'static {
    /// The partial-update type for this payload.
    type Patch: Patch<Self>;

    /// Human-readable kind, used in log lines and error messages.
    const KIND: &'static str;

    /// Check required fields before the payload is stored.
    fn validate(&self) -> Result<(), String>;

    /// Natural key that at most one live record may hold, if the kind has one.
    fn unique_key(&self) -> Option<&str> {
        None
    }
}

/// A partial update for payload `P`.
///
/// `apply` must walk the declared field list once, copying every present
/// field into the target and skipping absent ones, so that applying the
/// same patch twice gives the same result as applying it once.
pub trait Patch<P>: Clone + Send + Sync + 'static {
    /// True when no field is present.
    fn is_empty(&self) -> bool;

    /// Check the values of present fields.
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }

    /// Merge present fields into `target`.
    fn apply(self, target: &mut P);
}

/// A stored entity: identity, payload and lifecycle timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record<P> {
    pub id: RecordId,
    #[serde(flatten)]
    pub payload: P,
    /// Set once at creation.
    pub created_at: DateTime<Utc>,
    /// Equal to `created_at` until the first update.
    pub updated_at: DateTime<Utc>,
    /// Set once by a delete; the record stays in the store as a tombstone.
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl<P> Record<P> {
    pub(crate) fn new(id: RecordId, payload: P, now: DateTime<Utc>) -> Self {
        Self {
            id,
            payload,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}
