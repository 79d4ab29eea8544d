use serde::{Deserialize, Deserializer};
use std::time::Duration;
use thiserror::Error;

use crate::predict::{GroundStation, PredictError, TleSource};
use crate::tracker::{DopplerCalculator, FrequencyPlan, SPEED_OF_LIGHT_M_S};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid station: {0}")]
    Station(#[from] PredictError),
    #[error("invalid {field}: {message}")]
    Invalid {
        field: &'static str,
        message: String,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub satellite: SatelliteConfig,
    pub station: StationConfig,
    pub radio: RadioConfig,
    #[serde(default = "default_interval", deserialize_with = "deserialize_duration")]
    pub interval: Duration,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SatelliteConfig {
    /// Exactly as published in the element set feed.
    pub name: String,
    /// Written as `url: ...` or `file: ...`.
    #[serde(default, deserialize_with = "serde_yaml::with::singleton_map::deserialize")]
    pub tle: TleSource,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StationConfig {
    pub coordinates: String,
    /// Feet above sea level.
    #[serde(default)]
    pub elevation_ft: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RadioConfig {
    pub receive_mhz: f64,
    pub transmit_mhz: f64,
    #[serde(default = "default_speed_of_light")]
    pub speed_of_light_m_s: f64,
}

fn default_interval() -> Duration {
    Duration::from_millis(500)
}

fn default_speed_of_light() -> f64 {
    SPEED_OF_LIGHT_M_S
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    humantime::parse_duration(s.trim()).map_err(serde::de::Error::custom)
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    pub fn from_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |field: &'static str, message: &str| ConfigError::Invalid {
            field,
            message: message.to_string(),
        };

        if self.satellite.name.trim().is_empty() {
            return Err(invalid("satellite.name", "must not be empty"));
        }
        for (field, mhz) in [
            ("radio.receive_mhz", self.radio.receive_mhz),
            ("radio.transmit_mhz", self.radio.transmit_mhz),
        ] {
            if !mhz.is_finite() || mhz <= 0.0 {
                return Err(invalid(field, &format!("{} is not a positive frequency", mhz)));
            }
        }
        let c = self.radio.speed_of_light_m_s;
        if !c.is_finite() || c <= 0.0 {
            return Err(invalid("radio.speed_of_light_m_s", &format!("{} is not positive", c)));
        }
        if self.interval.is_zero() {
            return Err(invalid("interval", "must be greater than zero"));
        }
        self.station()?;
        Ok(())
    }

    pub fn station(&self) -> Result<GroundStation, ConfigError> {
        let feet = self.station.elevation_ft;
        let parsed = GroundStation::from_coordinates(&self.station.coordinates, 0.0)?;
        Ok(GroundStation::from_feet(
            parsed.latitude_deg,
            parsed.longitude_deg,
            feet,
        )?)
    }

    pub fn frequency_plan(&self) -> FrequencyPlan {
        FrequencyPlan::from_mhz(self.radio.receive_mhz, self.radio.transmit_mhz)
    }

    pub fn doppler_calculator(&self) -> DopplerCalculator {
        DopplerCalculator::new(self.radio.speed_of_light_m_s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const FULL: &str = r#"
satellite:
  name: "ISS (ZARYA)"
  tle:
    file: ./amateur.txt
station:
  coordinates: "42.0000, -90.0000"
  elevation_ft: 791
radio:
  receive_mhz: 145.800
  transmit_mhz: 437.800
  speed_of_light_m_s: 299792458
interval: 2s
"#;

    const MINIMAL: &str = r#"
satellite:
  name: "ISS (ZARYA)"
station:
  coordinates: "42.0, -90.0"
radio:
  receive_mhz: 145.8
  transmit_mhz: 145.8
"#;

    #[test]
    fn parses_full_config() {
        let config = Config::from_str(FULL).unwrap();
        assert_eq!(config.satellite.name, "ISS (ZARYA)");
        assert_eq!(config.satellite.tle, TleSource::File(PathBuf::from("./amateur.txt")));
        assert_eq!(config.interval, Duration::from_secs(2));

        let station = config.station().unwrap();
        assert_eq!(station.latitude_deg, 42.0);
        assert_eq!(station.longitude_deg, -90.0);
        assert!((station.altitude_m - 241.085).abs() < 1e-3);

        let plan = config.frequency_plan();
        assert_eq!(plan.receive_hz, 145_800_000);
        assert_eq!(plan.transmit_hz, 437_800_000);
        assert_eq!(config.doppler_calculator().speed_of_light_m_s, 299_792_458.0);
    }

    #[test]
    fn loads_example_file() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.yaml");
        let config = Config::from_file(path).unwrap();
        assert_eq!(config.satellite.tle, TleSource::default());
        assert_eq!(config.interval, Duration::from_millis(500));
        assert_eq!(config.frequency_plan().receive_hz, 145_800_000);
    }

    #[test]
    fn applies_defaults() {
        let config = Config::from_str(MINIMAL).unwrap();
        assert_eq!(config.satellite.tle, TleSource::default());
        assert_eq!(config.interval, Duration::from_millis(500));
        assert_eq!(config.radio.speed_of_light_m_s, 299_500_000.0);
        assert_eq!(config.station().unwrap().altitude_m, 0.0);
    }

    #[test]
    fn reads_url_source() {
        let yaml = MINIMAL.replace(
            "station:",
            "  tle:\n    url: https://example.org/stations.txt\nstation:",
        );
        let config = Config::from_str(&yaml).unwrap();
        assert_eq!(
            config.satellite.tle,
            TleSource::Url("https://example.org/stations.txt".to_string())
        );
    }

    #[test]
    fn rejects_out_of_range_station() {
        let yaml = MINIMAL.replace("42.0, -90.0", "95.0, -90.0");
        assert!(matches!(Config::from_str(&yaml), Err(ConfigError::Station(_))));
    }

    #[test]
    fn rejects_negative_frequency() {
        let yaml = MINIMAL.replace("transmit_mhz: 145.8", "transmit_mhz: -1");
        match Config::from_str(&yaml) {
            Err(ConfigError::Invalid { field, .. }) => assert_eq!(field, "radio.transmit_mhz"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn rejects_bad_interval() {
        let yaml = format!("{}interval: soon\n", MINIMAL);
        assert!(matches!(Config::from_str(&yaml), Err(ConfigError::Yaml(_))));
        let yaml = format!("{}interval: 0s\n", MINIMAL);
        assert!(matches!(
            Config::from_str(&yaml),
            Err(ConfigError::Invalid { field: "interval", .. })
        ));
    }

    #[test]
    fn missing_section_is_a_yaml_error() {
        let yaml = "satellite:\n  name: X\n";
        assert!(matches!(Config::from_str(yaml), Err(ConfigError::Yaml(_))));
    }
}
