//! Domain payloads kept by the service.

mod sighting;
mod weather;

pub use sighting::{SightingInfo, SightingPatch};
pub use weather::{Weather, WeatherPatch};

/// Reject blank required text.
fn require_text(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{field} is required"));
    }
    Ok(())
}
