use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::require_text;
use crate::field::Field;
use crate::record::{Patch, Payload};

/// A reported UFO sighting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SightingInfo {
    /// When the object was seen, if known.
    #[serde(default)]
    pub observed_at: Option<DateTime<Utc>>,
    pub location: String,
    pub description: String,
    #[serde(default)]
    pub color: Option<String>,
    /// Whether the object made a sound.
    #[serde(default)]
    pub sound: Option<bool>,
    #[serde(default)]
    pub duration_seconds: Option<i32>,
}

impl SightingInfo {
    pub fn new(location: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            observed_at: None,
            location: location.into(),
            description: description.into(),
            color: None,
            sound: None,
            duration_seconds: None,
        }
    }
}

fn check_duration(value: Option<i32>) -> Result<(), String> {
    match value {
        Some(seconds) if seconds < 0 => Err("duration_seconds must not be negative".into()),
        _ => Ok(()),
    }
}

impl Payload for SightingInfo {
    type Patch = SightingPatch;
    const KIND: &'static str = "sighting";

    fn validate(&self) -> Result<(), String> {
        require_text("location", &self.location)?;
        require_text("description", &self.description)?;
        check_duration(self.duration_seconds)
    }
}

/// Partial update for [`SightingInfo`].
///
/// Optional payload fields are `Field<Option<_>>`: `Present(None)` (JSON
/// `null`) clears the stored value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SightingPatch {
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub observed_at: Field<Option<DateTime<Utc>>>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub location: Field<String>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub description: Field<String>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub color: Field<Option<String>>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub sound: Field<Option<bool>>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub duration_seconds: Field<Option<i32>>,
}

impl Patch<SightingInfo> for SightingPatch {
    fn is_empty(&self) -> bool {
        self.observed_at.is_absent()
            && self.location.is_absent()
            && self.description.is_absent()
            && self.color.is_absent()
            && self.sound.is_absent()
            && self.duration_seconds.is_absent()
    }

    fn validate(&self) -> Result<(), String> {
        if let Field::Present(location) = &self.location {
            require_text("location", location)?;
        }
        if let Field::Present(description) = &self.description {
            require_text("description", description)?;
        }
        if let Field::Present(duration) = self.duration_seconds {
            check_duration(duration)?;
        }
        Ok(())
    }

    fn apply(self, target: &mut SightingInfo) {
        self.observed_at.merge_into(&mut target.observed_at);
        self.location.merge_into(&mut target.location);
        self.description.merge_into(&mut target.description);
        self.color.merge_into(&mut target.color);
        self.sound.merge_into(&mut target.sound);
        self.duration_seconds.merge_into(&mut target.duration_seconds);
    }
}
