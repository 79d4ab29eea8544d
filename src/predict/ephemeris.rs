use chrono::{DateTime, Utc};
use sgp4::{Constants, Elements};

use crate::predict::error::PredictError;
use crate::predict::tle_loader::TleCatalog;
use crate::predict::types::{Frame, SatelliteInfo, StateVector};

/// Source of satellites that can be tracked by name.
pub trait EphemerisProvider {
    type Handle: SatelliteHandle;

    fn fetch_satellite(&self, name: &str) -> Result<Self::Handle, PredictError>;
}

/// A single satellite whose state can be evaluated at any instant.
pub trait SatelliteHandle {
    fn info(&self) -> &SatelliteInfo;

    fn state_at(&self, time: DateTime<Utc>) -> Result<StateVector, PredictError>;
}

/// SGP4 propagator for one element set. States are in the TEME frame.
pub struct Sgp4Satellite {
    info: SatelliteInfo,
    elements: Elements,
    constants: Constants,
}

impl Sgp4Satellite {
    pub fn new(info: SatelliteInfo, elements: Elements) -> Result<Self, PredictError> {
        let constants = Constants::from_elements(&elements).map_err(|e| PredictError::InvalidTle {
            source_name: info.tle_source.clone(),
            message: e.to_string(),
        })?;
        Ok(Self {
            info,
            elements,
            constants,
        })
    }
}

impl SatelliteHandle for Sgp4Satellite {
    fn info(&self) -> &SatelliteInfo {
        &self.info
    }

    fn state_at(&self, time: DateTime<Utc>) -> Result<StateVector, PredictError> {
        let minutes = self
            .elements
            .datetime_to_minutes_since_epoch(&time.naive_utc())
            .map_err(|e| PredictError::Propagation(e.to_string()))?;

        let prediction = self.constants.propagate(minutes)?;

        Ok(StateVector {
            timestamp: time,
            frame: Frame::Teme,
            position_km: prediction.position,
            velocity_km_s: prediction.velocity,
        })
    }
}

impl EphemerisProvider for TleCatalog {
    type Handle = Sgp4Satellite;

    fn fetch_satellite(&self, name: &str) -> Result<Sgp4Satellite, PredictError> {
        let entry = self
            .get(name)
            .ok_or_else(|| PredictError::UnknownSatellite(name.to_string()))?;
        Sgp4Satellite::new(entry.info.clone(), entry.elements.clone())
    }
}
