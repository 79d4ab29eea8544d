use std::time::Duration;

use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

use super::clock::Clock;
use super::doppler::{DopplerCalculator, FrequencyPlan};
use super::error::TrackerError;
use super::geometry::compute_observation;
use super::sample::TrackerSample;
use crate::predict::{GroundStation, SatelliteHandle};

pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(500);

/// Receives one report per tick.
pub trait ReportSink {
    fn emit(&mut self, sample: &TrackerSample) -> Result<(), TrackerError>;
}

/// Computes Doppler reports for one satellite from a fixed station.
/// Holds nothing that changes between ticks.
pub struct Tracker<'a, H, C> {
    station: GroundStation,
    satellite: &'a H,
    clock: C,
    frequencies: FrequencyPlan,
    doppler: DopplerCalculator,
    interval: Duration,
}

impl<'a, H: SatelliteHandle, C: Clock> Tracker<'a, H, C> {
    pub fn new(
        station: GroundStation,
        satellite: &'a H,
        clock: C,
        frequencies: FrequencyPlan,
    ) -> Self {
        Self {
            station,
            satellite,
            clock,
            frequencies,
            doppler: DopplerCalculator::default(),
            interval: DEFAULT_INTERVAL,
        }
    }

    pub fn with_calculator(mut self, doppler: DopplerCalculator) -> Self {
        self.doppler = doppler;
        self
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn tick(&self) -> Result<TrackerSample, TrackerError> {
        let now = self.clock.now();
        let state = self.satellite.state_at(now)?;
        let observation = compute_observation(&state, &self.station, now);
        let doppler = self
            .doppler
            .compute(observation.radial_velocity_m_s, &self.frequencies);
        Ok(TrackerSample::new(&observation, doppler))
    }

    /// Emits reports at least `interval` apart until `cancel` fires, `max_ticks`
    /// reports have been emitted, or the provider or sink fails.
    /// Returns the number of reports emitted.
    pub async fn run<S: ReportSink>(
        &self,
        sink: &mut S,
        cancel: CancellationToken,
        max_ticks: Option<u64>,
    ) -> Result<u64, TrackerError> {
        let name = &self.satellite.info().name;
        log::info!("Tracking {} every {} ms", name, self.interval.as_millis());

        let mut ticks = 0;
        while !cancel.is_cancelled() {
            let sample = self.tick()?;
            sink.emit(&sample)?;
            ticks += 1;
            log::debug!("{} tick {}: el {:.2} deg", name, ticks, sample.elevation_deg);

            if max_ticks.is_some_and(|max| ticks >= max) {
                break;
            }

            let should_stop = tokio::select! {
                _ = sleep(self.interval) => false,
                _ = cancel.cancelled() => true,
            };
            if should_stop {
                break;
            }
        }

        log::info!("Stopped tracking {} after {} reports", name, ticks);
        Ok(ticks)
    }
}
