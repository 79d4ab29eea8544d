mod clock;
mod doppler;
mod error;
mod geometry;
mod sample;
mod tracker;

pub use clock::{Clock, FixedClock, SystemClock};
pub use doppler::{
    compute_doppler, DopplerCalculator, DopplerResult, DopplerShift, FrequencyPlan, Sense,
    SPEED_OF_LIGHT_M_S,
};
pub use error::TrackerError;
pub use geometry::{compute_observation, RelativeObservation};
pub use sample::TrackerSample;
pub use tracker::{ReportSink, Tracker};
