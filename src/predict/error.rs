use thiserror::Error;

#[derive(Debug, Error)]
pub enum PredictError {
    #[error("TLE file read error: {0}")]
    FileRead(#[from] std::io::Error),
    #[error("TLE fetch error: {0}")]
    Fetch(#[from] reqwest::Error),
    #[error("Invalid TLE format in {source_name}: {message}")]
    InvalidTle {
        source_name: String,
        message: String,
    },
    #[error("Satellite not found in element sets: {0}")]
    UnknownSatellite(String),
    #[error("No satellites loaded from {0}")]
    NoSatellites(String),
    #[error("Propagation error: {0}")]
    Propagation(String),
    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),
}

impl From<sgp4::Error> for PredictError {
    fn from(err: sgp4::Error) -> Self {
        PredictError::Propagation(err.to_string())
    }
}
