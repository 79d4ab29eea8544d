use thiserror::Error;

use crate::predict::PredictError;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("predict error: {0}")]
    Predict(#[from] PredictError),
    #[error("output error: {0}")]
    Output(#[from] std::io::Error),
}
