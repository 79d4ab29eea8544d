use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;
use strum_macros::Display;

/// Information about a single satellite from TLE
#[derive(Debug, Clone, Serialize)]
pub struct SatelliteInfo {
    pub name: String,
    pub norad_id: u32,
    pub epoch: NaiveDateTime,
    pub tle_source: String,
}

impl fmt::Display for SatelliteInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} catalog #{} epoch {} UTC (from {})",
            self.name,
            self.norad_id,
            self.epoch.format("%Y-%m-%d %H:%M:%S"),
            self.tle_source
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
pub enum Frame {
    /// True equator, mean equinox. What SGP4 produces.
    Teme,
    EarthFixed,
}

/// Satellite position and velocity at a single instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateVector {
    pub timestamp: DateTime<Utc>,
    pub frame: Frame,
    pub position_km: [f64; 3],
    pub velocity_km_s: [f64; 3],
}
