use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use sgp4::{Constants, Elements};

use crate::predict::error::PredictError;
use crate::predict::types::SatelliteInfo;

pub const DEFAULT_TLE_URL: &str = "http://www.celestrak.com/NORAD/elements/amateur.txt";
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Where element sets come from.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TleSource {
    Url(String),
    File(PathBuf),
}

impl Default for TleSource {
    fn default() -> Self {
        TleSource::Url(DEFAULT_TLE_URL.to_string())
    }
}

impl TleSource {
    pub fn describe(&self) -> String {
        match self {
            TleSource::Url(url) => url.clone(),
            TleSource::File(path) => path.display().to_string(),
        }
    }

    /// Loads a fresh catalogue. URLs are fetched on every call.
    pub async fn load(&self) -> Result<TleCatalog, PredictError> {
        let content = match self {
            TleSource::Url(url) => {
                log::info!("Fetching element sets from {}", url);
                fetch_client()?
                    .get(url)
                    .send()
                    .await?
                    .error_for_status()?
                    .text()
                    .await?
            }
            TleSource::File(path) => {
                log::info!("Reading element sets from {}", path.display());
                tokio::fs::read_to_string(path).await?
            }
        };
        TleCatalog::from_str(&content, &self.describe())
    }
}

fn fetch_client() -> Result<reqwest::Client, PredictError> {
    Ok(reqwest::Client::builder().timeout(FETCH_TIMEOUT).build()?)
}

pub struct TleEntry {
    pub info: SatelliteInfo,
    pub elements: Elements,
}

/// Element sets keyed by the satellite name as published in the feed.
pub struct TleCatalog {
    source: String,
    satellites: HashMap<String, TleEntry>,
}

impl TleCatalog {
    /// Parse TLE content (may contain multiple satellites). Records that fail
    /// the checksum or SGP4 initialisation are skipped with a warning.
    pub fn from_str(content: &str, source: &str) -> Result<Self, PredictError> {
        let mut satellites = HashMap::new();

        for (name, line1, line2) in parse_multi_tle(content) {
            let label = name.clone().unwrap_or_else(|| line1.chars().take(7).collect());
            let elements =
                match Elements::from_tle(name.clone(), line1.as_bytes(), line2.as_bytes()) {
                    Ok(e) => e,
                    Err(e) => {
                        log::warn!("Skipping element set {} in {}: {}", label, source, e);
                        continue;
                    }
                };

            if let Err(e) = Constants::from_elements(&elements) {
                log::warn!("Skipping element set {} in {}: {}", label, source, e);
                continue;
            }

            let sat_name = name.unwrap_or_else(|| format!("NORAD {}", elements.norad_id));
            let entry = TleEntry {
                info: SatelliteInfo {
                    name: sat_name.clone(),
                    norad_id: elements.norad_id as u32,
                    epoch: elements.datetime,
                    tle_source: source.to_string(),
                },
                elements,
            };

            if satellites.insert(sat_name.clone(), entry).is_some() {
                log::warn!(
                    "Duplicate element set for {} in {}, keeping the last",
                    sat_name,
                    source
                );
            }
        }

        if satellites.is_empty() {
            return Err(PredictError::NoSatellites(source.to_string()));
        }

        log::debug!("Loaded {} element sets from {}", satellites.len(), source);

        Ok(Self {
            source: source.to_string(),
            satellites,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn len(&self) -> usize {
        self.satellites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.satellites.is_empty()
    }

    /// Exact name match, or a bare catalogue number.
    pub fn get(&self, name: &str) -> Option<&TleEntry> {
        self.satellites.get(name).or_else(|| {
            let norad_id: u32 = name.trim().parse().ok()?;
            self.satellites
                .values()
                .find(|entry| entry.info.norad_id == norad_id)
        })
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.satellites.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// Parse multi-satellite TLE content
fn parse_multi_tle(content: &str) -> Vec<(Option<String>, String, String)> {
    let lines: Vec<&str> = content
        .lines()
        .map(|l| l.trim_end())
        .filter(|l| !l.trim().is_empty())
        .collect();

    let mut result = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        if lines[i].starts_with("1 ") && i + 1 < lines.len() && lines[i + 1].starts_with("2 ") {
            // 2-line TLE (no name)
            result.push((None, lines[i].to_string(), lines[i + 1].to_string()));
            i += 2;
        } else if i + 2 < lines.len()
            && lines[i + 1].starts_with("1 ")
            && lines[i + 2].starts_with("2 ")
        {
            // 3-line TLE (with name)
            result.push((
                Some(lines[i].trim().to_string()),
                lines[i + 1].to_string(),
                lines[i + 2].to_string(),
            ));
            i += 3;
        } else {
            log::debug!("Skipping unrecognised TLE line: {}", lines[i]);
            i += 1;
        }
    }

    result
}
