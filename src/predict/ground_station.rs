use std::fmt;

use crate::predict::error::PredictError;

pub const EARTH_ROTATION_RAD_S: f64 = 7.292_115e-5;
pub const FEET_PER_METER: f64 = 3.281;

// WGS-84
const EQUATORIAL_RADIUS_KM: f64 = 6378.137;
const ECCENTRICITY_SQ: f64 = 0.00669437999014;

/// Fixed observer position on the WGS-84 ellipsoid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundStation {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub altitude_m: f64,
}

impl GroundStation {
    pub fn new(
        latitude_deg: f64,
        longitude_deg: f64,
        altitude_m: f64,
    ) -> Result<Self, PredictError> {
        if !latitude_deg.is_finite() || !(-90.0..=90.0).contains(&latitude_deg) {
            return Err(PredictError::InvalidCoordinates(format!(
                "latitude {} outside [-90, 90]",
                latitude_deg
            )));
        }
        if !longitude_deg.is_finite() || !(-180.0..=180.0).contains(&longitude_deg) {
            return Err(PredictError::InvalidCoordinates(format!(
                "longitude {} outside [-180, 180]",
                longitude_deg
            )));
        }
        if !altitude_m.is_finite() {
            return Err(PredictError::InvalidCoordinates(format!(
                "altitude {} is not a number",
                altitude_m
            )));
        }
        Ok(Self {
            latitude_deg,
            longitude_deg,
            altitude_m,
        })
    }

    /// Elevation given in feet above sea level.
    pub fn from_feet(
        latitude_deg: f64,
        longitude_deg: f64,
        altitude_ft: f64,
    ) -> Result<Self, PredictError> {
        Self::new(latitude_deg, longitude_deg, altitude_ft / FEET_PER_METER)
    }

    /// Parses `"lat, lon"` in decimal degrees.
    pub fn from_coordinates(coordinates: &str, altitude_m: f64) -> Result<Self, PredictError> {
        let parts: Vec<_> = coordinates.split(',').map(|s| s.trim()).collect();
        if parts.len() != 2 {
            return Err(PredictError::InvalidCoordinates(format!(
                "expected 'lat, lon', got '{}'",
                coordinates
            )));
        }
        let parse = |s: &str| {
            s.parse::<f64>()
                .map_err(|e| PredictError::InvalidCoordinates(format!("'{}': {}", s, e)))
        };
        Self::new(parse(parts[0])?, parse(parts[1])?, altitude_m)
    }

    pub fn lat_rad(&self) -> f64 {
        self.latitude_deg.to_radians()
    }

    pub fn lon_rad(&self) -> f64 {
        self.longitude_deg.to_radians()
    }

    pub fn position_ecef_km(&self) -> [f64; 3] {
        let lat = self.lat_rad();
        let lon = self.lon_rad();
        let sin_lat = lat.sin();
        let cos_lat = lat.cos();
        let sin_lon = lon.sin();
        let cos_lon = lon.cos();
        let n = EQUATORIAL_RADIUS_KM / (1.0 - ECCENTRICITY_SQ * sin_lat * sin_lat).sqrt();
        let alt_km = self.altitude_m / 1000.0;
        let x = (n + alt_km) * cos_lat * cos_lon;
        let y = (n + alt_km) * cos_lat * sin_lon;
        let z = (n * (1.0 - ECCENTRICITY_SQ) + alt_km) * sin_lat;
        [x, y, z]
    }
}

impl fmt::Display for GroundStation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "WGS84 latitude {:+.4} N longitude {:+.4} E elevation {:.1} m",
            self.latitude_deg, self.longitude_deg, self.altitude_m
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn equator_prime_meridian_sits_on_x_axis() {
        let station = GroundStation::new(0.0, 0.0, 0.0).unwrap();
        let [x, y, z] = station.position_ecef_km();
        assert!((x - EQUATORIAL_RADIUS_KM).abs() < 1e-9);
        assert!(y.abs() < 1e-9);
        assert!(z.abs() < 1e-9);
    }

    #[test]
    fn north_pole_uses_polar_radius() {
        let station = GroundStation::new(90.0, 0.0, 0.0).unwrap();
        let [x, y, z] = station.position_ecef_km();
        assert!(x.abs() < 1e-9);
        assert!(y.abs() < 1e-9);
        // polar radius b = 6356.752 km
        assert!((z - 6356.752).abs() < 1e-3);
    }

    #[test]
    fn altitude_moves_along_the_normal() {
        let low = GroundStation::new(42.0, -90.0, 0.0).unwrap().position_ecef_km();
        let high = GroundStation::new(42.0, -90.0, 1000.0).unwrap().position_ecef_km();
        let d = [high[0] - low[0], high[1] - low[1], high[2] - low[2]];
        let separation = (d[0] * d[0] + d[1] * d[1] + d[2] * d[2]).sqrt();
        assert!((separation - 1.0).abs() < 1e-9);
        // the normal at 42 N tilts 0.19 deg away from the geocentric radius
        let radius = |p: [f64; 3]| (p[0] * p[0] + p[1] * p[1] + p[2] * p[2]).sqrt();
        assert!(radius(high) - radius(low) < 1.0);
    }

    #[test]
    fn feet_are_converted_to_meters() {
        let station = GroundStation::from_feet(42.0, -90.0, 791.0).unwrap();
        assert!((station.altitude_m - 791.0 / 3.281).abs() < 1e-12);
    }

    #[test]
    fn parses_coordinate_pair() {
        let station = GroundStation::from_coordinates("40.0123, -90.0123", 12.0).unwrap();
        assert_eq!(station.latitude_deg, 40.0123);
        assert_eq!(station.longitude_deg, -90.0123);
        assert_eq!(station.altitude_m, 12.0);
    }

    #[rstest]
    #[case(90.5, 0.0)]
    #[case(-91.0, 0.0)]
    #[case(0.0, 180.1)]
    #[case(0.0, -200.0)]
    #[case(f64::NAN, 0.0)]
    fn rejects_out_of_range(#[case] lat: f64, #[case] lon: f64) {
        assert!(matches!(
            GroundStation::new(lat, lon, 0.0),
            Err(PredictError::InvalidCoordinates(_))
        ));
    }

    #[rstest]
    #[case("42.0")]
    #[case("north, west")]
    #[case("1, 2, 3")]
    fn rejects_malformed_coordinates(#[case] input: &str) {
        assert!(GroundStation::from_coordinates(input, 0.0).is_err());
    }
}
