use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::predict::{Frame, GroundStation, StateVector, EARTH_ROTATION_RAD_S};

/// Satellite as seen from the ground station at one instant. Vectors are
/// earth-fixed, whatever frame the input state was in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RelativeObservation {
    pub timestamp: DateTime<Utc>,
    /// Satellite minus station, earth-fixed.
    pub position_km: [f64; 3],
    /// Satellite velocity relative to the station, earth-fixed.
    pub velocity_km_s: [f64; 3],
    pub range_km: f64,
    pub azimuth_deg: f64,
    pub elevation_deg: f64,
    /// Positive when receding.
    pub radial_velocity_m_s: f64,
}

pub fn compute_observation(
    state: &StateVector,
    station: &GroundStation,
    time: DateTime<Utc>,
) -> RelativeObservation {
    let (sat_pos, sat_vel) = match state.frame {
        Frame::EarthFixed => (state.position_km, state.velocity_km_s),
        Frame::Teme => {
            let gmst = sidereal_time(time);
            (
                teme_to_ecef_position(state.position_km, gmst),
                teme_to_ecef_velocity(state.position_km, state.velocity_km_s, gmst),
            )
        }
    };

    // The station is at rest in the earth-fixed frame.
    let sta_pos = station.position_ecef_km();

    let dr = sub(sat_pos, sta_pos);
    let dv = sat_vel;
    let range_km = norm(dr);

    let (east, north, up) = ecef_to_enu(dr, station.lat_rad(), station.lon_rad());
    let azimuth_deg = normalize_azimuth(east.atan2(north).to_degrees());
    let elevation_deg = if range_km > 0.0 {
        (up / range_km).clamp(-1.0, 1.0).asin().to_degrees()
    } else {
        0.0
    };

    RelativeObservation {
        timestamp: time,
        position_km: dr,
        velocity_km_s: dv,
        range_km,
        azimuth_deg,
        elevation_deg,
        radial_velocity_m_s: radial_velocity_m_s(dr, dv),
    }
}

/// Magnitude of the velocity projected onto the line of sight, in m/s,
/// signed by `pos . vel`. Zero at closest approach and for coincident points.
pub fn radial_velocity_m_s(pos_km: [f64; 3], vel_km_s: [f64; 3]) -> f64 {
    let pv_dot = dot(pos_km, vel_km_s);
    let pos_sq = dot(pos_km, pos_km);
    if pv_dot == 0.0 || pos_sq == 0.0 {
        return 0.0;
    }

    let scale = pv_dot / pos_sq;
    let projected = [
        scale * pos_km[0] * 1000.0,
        scale * pos_km[1] * 1000.0,
        scale * pos_km[2] * 1000.0,
    ];
    norm(projected).copysign(pv_dot)
}

pub fn sidereal_time(time: DateTime<Utc>) -> f64 {
    sgp4::iau_epoch_to_sidereal_time(sgp4::julian_years_since_j2000(&time.naive_utc()))
}

pub fn teme_to_ecef_position(pos_teme: [f64; 3], gmst: f64) -> [f64; 3] {
    let cos_gmst = gmst.cos();
    let sin_gmst = gmst.sin();
    [
        pos_teme[0] * cos_gmst + pos_teme[1] * sin_gmst,
        -pos_teme[0] * sin_gmst + pos_teme[1] * cos_gmst,
        pos_teme[2],
    ]
}

pub fn teme_to_ecef_velocity(pos_teme: [f64; 3], vel_teme: [f64; 3], gmst: f64) -> [f64; 3] {
    let pos = teme_to_ecef_position(pos_teme, gmst);
    let rotated = teme_to_ecef_position(vel_teme, gmst);
    let rotation = [
        -EARTH_ROTATION_RAD_S * pos[1],
        EARTH_ROTATION_RAD_S * pos[0],
        0.0,
    ];
    sub(rotated, rotation)
}

pub fn ecef_to_enu(dr: [f64; 3], lat_rad: f64, lon_rad: f64) -> (f64, f64, f64) {
    let sin_lat = lat_rad.sin();
    let cos_lat = lat_rad.cos();
    let sin_lon = lon_rad.sin();
    let cos_lon = lon_rad.cos();

    let east = -sin_lon * dr[0] + cos_lon * dr[1];
    let north = -sin_lat * cos_lon * dr[0] - sin_lat * sin_lon * dr[1] + cos_lat * dr[2];
    let up = cos_lat * cos_lon * dr[0] + cos_lat * sin_lon * dr[1] + sin_lat * dr[2];
    (east, north, up)
}

/// Folds into [0, 360). `rem_euclid` can round tiny negatives up to 360.
fn normalize_azimuth(deg: f64) -> f64 {
    let az = deg.rem_euclid(360.0);
    if az >= 360.0 {
        0.0
    } else {
        az
    }
}

fn sub(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn dot(a: [f64; 3], b: [f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn norm(a: [f64; 3]) -> f64 {
    dot(a, a).sqrt()
}
