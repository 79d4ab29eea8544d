mod ephemeris;
mod error;
mod ground_station;
mod tle_loader;
mod types;

pub use ephemeris::{EphemerisProvider, SatelliteHandle, Sgp4Satellite};
pub use error::PredictError;
pub use ground_station::{GroundStation, EARTH_ROTATION_RAD_S, FEET_PER_METER};
pub use tle_loader::{TleCatalog, TleSource, DEFAULT_TLE_URL};
pub use types::{Frame, SatelliteInfo, StateVector};

#[cfg(test)]
pub(crate) use tle_loader::tests::ISS_TLE;
