use chrono::{DateTime, Duration, TimeZone, Utc};
use skywatch::{InMemoryStore, ManualClock, SightingInfo, Weather};

pub fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

/// A store whose clock moves one second per reading.
pub fn weather_store() -> (InMemoryStore<Weather, ManualClock>, ManualClock) {
    let clock = ManualClock::new(start()).with_step(Duration::seconds(1));
    (InMemoryStore::with_clock(clock.clone()), clock)
}

pub fn sighting_store() -> InMemoryStore<SightingInfo, ManualClock> {
    InMemoryStore::with_clock(ManualClock::new(start()).with_step(Duration::seconds(1)))
}

pub fn roswell() -> SightingInfo {
    SightingInfo {
        color: Some("silver".into()),
        sound: Some(false),
        duration_seconds: Some(45),
        ..SightingInfo::new("Roswell", "metallic disc over the ranch")
    }
}
