use chrono::{DateTime, Utc};
use serde::Serialize;

use super::doppler::DopplerResult;
use super::geometry::RelativeObservation;

/// Everything reported for one polling tick.
#[derive(Debug, Clone, Serialize)]
pub struct TrackerSample {
    pub timestamp: DateTime<Utc>,
    pub azimuth_deg: f64,
    pub elevation_deg: f64,
    pub range_km: f64,
    pub range_rate_km_s: f64,
    pub doppler: DopplerResult,
}

impl TrackerSample {
    pub fn new(observation: &RelativeObservation, doppler: DopplerResult) -> Self {
        Self {
            timestamp: observation.timestamp,
            azimuth_deg: observation.azimuth_deg,
            elevation_deg: observation.elevation_deg,
            range_km: observation.range_km,
            range_rate_km_s: observation.radial_velocity_m_s / 1000.0,
            doppler,
        }
    }
}
