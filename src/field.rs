//! Field - tri-state value used by partial updates.
//!
//! A patch has to tell "the caller did not mention this field" apart from
//! "the caller set this field", including to a zero or empty value. A plain
//! `Option<T>` cannot do that for fields that are themselves optional, so
//! every patch field is a `Field<T>`:
//!
//! - `Field::Absent`: untouched, the stored value is kept.
//! - `Field::Present(v)`: overwrite with `v`, even when `v` is `0`, `""`
//!   or `false`.
//!
//! For a payload field of type `Option<T>` the patch carries a
//! `Field<Option<T>>`; `Present(None)` clears the stored value.
//!
//! ## Serde
//!
//! A key that appears in the input always deserializes to `Present`. Mark
//! patch fields with `#[serde(default)]` so that a missing key becomes
//! `Absent`, and with `skip_serializing_if = "Field::is_absent"` so that
//! absent fields are not written back out.
//!
//! ```ignore
//! #[derive(Deserialize, Default)]
//! #[serde(default)]
//! struct WeatherPatch {
//!     temperature: Field<f64>,
//! }
//!
//! let patch: WeatherPatch = serde_json::from_str(r#"{ "temperature": 0.0 }"#)?;
//! assert_eq!(patch.temperature, Field::Present(0.0));
//! ```

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A value that is either absent from a request or present with a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Field<T> {
    /// Not mentioned by the caller.
    #[default]
    Absent,
    /// Mentioned by the caller with this value.
    Present(T),
}

impl<T> Field<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Field::Absent)
    }

    pub fn as_ref(&self) -> Field<&T> {
        match self {
            Field::Present(value) => Field::Present(value),
            Field::Absent => Field::Absent,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Field<U> {
        match self {
            Field::Present(value) => Field::Present(f(value)),
            Field::Absent => Field::Absent,
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Field::Present(value) => Some(value),
            Field::Absent => None,
        }
    }

    /// Overwrite `target` when present. Returns whether a write happened.
    pub fn merge_into(self, target: &mut T) -> bool {
        match self {
            Field::Present(value) => {
                *target = value;
                true
            }
            Field::Absent => false,
        }
    }
}

impl<T> From<Option<T>> for Field<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Field::Present(value),
            None => Field::Absent,
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Field<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        T::deserialize(deserializer).map(Field::Present)
    }
}

impl<T: Serialize> Serialize for Field<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Field::Present(value) => value.serialize(serializer),
            Field::Absent => serializer.serialize_none(),
        }
    }
}
