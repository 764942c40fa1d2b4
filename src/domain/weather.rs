use serde::{Deserialize, Serialize};

use super::require_text;
use crate::field::Field;
use crate::record::{Patch, Payload};

/// A temperature reading for a city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weather {
    pub city: String,
    /// Degrees Celsius.
    pub temperature: f64,
}

impl Weather {
    pub fn new(city: impl Into<String>, temperature: f64) -> Self {
        Self {
            city: city.into(),
            temperature,
        }
    }
}

fn check_temperature(value: f64) -> Result<(), String> {
    if !value.is_finite() {
        return Err("temperature must be a finite number".into());
    }
    Ok(())
}

impl Payload for Weather {
    type Patch = WeatherPatch;
    const KIND: &'static str = "weather";

    fn validate(&self) -> Result<(), String> {
        require_text("city", &self.city)?;
        check_temperature(self.temperature)
    }

    /// One live reading per city.
    fn unique_key(&self) -> Option<&str> {
        Some(&self.city)
    }
}

/// Partial update for [`Weather`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WeatherPatch {
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub city: Field<String>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub temperature: Field<f64>,
}

impl WeatherPatch {
    pub fn temperature(value: f64) -> Self {
        Self {
            temperature: Field::Present(value),
            ..Default::default()
        }
    }
}

impl Patch<Weather> for WeatherPatch {
    fn is_empty(&self) -> bool {
        self.city.is_absent() && self.temperature.is_absent()
    }

    fn validate(&self) -> Result<(), String> {
        if let Field::Present(city) = &self.city {
            require_text("city", city)?;
        }
        if let Field::Present(temperature) = self.temperature {
            check_temperature(temperature)?;
        }
        Ok(())
    }

    fn apply(self, target: &mut Weather) {
        self.city.merge_into(&mut target.city);
        self.temperature.merge_into(&mut target.temperature);
    }
}
