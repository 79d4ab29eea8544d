//! Doppler-corrected uplink and downlink frequencies for a ground station
//! tracking one satellite.
//!
//! [`predict`] turns element sets into satellite state vectors and holds the
//! observer model, [`tracker`] computes the relative geometry and Doppler
//! shift for each tick, [`output`] formats the reports.

pub mod config;
pub mod output;
pub mod predict;
pub mod tracker;
