use serde::Serialize;
use strum_macros::Display;

/// Approximation kept for parity with existing station logs; the physical
/// value is 299 792 458 m/s. Override through `radio.speed_of_light_m_s`.
pub const SPEED_OF_LIGHT_M_S: f64 = 299_500_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[strum(serialize_all = "snake_case")]
pub enum Sense {
    /// Satellite downlink, heard by the station.
    Receive,
    /// Station uplink, heard by the satellite.
    Transmit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DopplerShift {
    pub nominal_hz: i64,
    pub shifted_hz: i64,
    pub shift_hz: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DopplerResult {
    pub receive: DopplerShift,
    pub transmit: DopplerShift,
}

/// Nominal frequencies as published, ignoring Doppler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrequencyPlan {
    pub receive_hz: i64,
    pub transmit_hz: i64,
}

impl FrequencyPlan {
    pub fn from_mhz(receive_mhz: f64, transmit_mhz: f64) -> Self {
        Self {
            receive_hz: mhz_to_hz(receive_mhz),
            transmit_hz: mhz_to_hz(transmit_mhz),
        }
    }
}

pub fn mhz_to_hz(mhz: f64) -> i64 {
    (mhz * 1_000_000.0).round() as i64
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DopplerCalculator {
    pub speed_of_light_m_s: f64,
}

impl Default for DopplerCalculator {
    fn default() -> Self {
        Self {
            speed_of_light_m_s: SPEED_OF_LIGHT_M_S,
        }
    }
}

impl DopplerCalculator {
    pub fn new(speed_of_light_m_s: f64) -> Self {
        Self { speed_of_light_m_s }
    }

    /// Non-relativistic shift, truncated toward zero to whole hertz.
    /// `radial_velocity_m_s` is positive when the satellite recedes.
    pub fn shift(&self, radial_velocity_m_s: f64, nominal_hz: i64, sense: Sense) -> DopplerShift {
        let beta = radial_velocity_m_s / self.speed_of_light_m_s;
        let factor = match sense {
            Sense::Receive => 1.0 - beta,
            Sense::Transmit => 1.0 + beta,
        };
        let shifted_hz = (factor * nominal_hz as f64) as i64;
        DopplerShift {
            nominal_hz,
            shifted_hz,
            shift_hz: shifted_hz - nominal_hz,
        }
    }

    pub fn compute(&self, radial_velocity_m_s: f64, plan: &FrequencyPlan) -> DopplerResult {
        DopplerResult {
            receive: self.shift(radial_velocity_m_s, plan.receive_hz, Sense::Receive),
            transmit: self.shift(radial_velocity_m_s, plan.transmit_hz, Sense::Transmit),
        }
    }
}

pub fn compute_doppler(radial_velocity_m_s: f64, nominal_hz: i64, sense: Sense) -> DopplerShift {
    DopplerCalculator::default().shift(radial_velocity_m_s, nominal_hz, sense)
}
