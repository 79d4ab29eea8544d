use std::io::Write;

use clap::ValueEnum;

use crate::tracker::{ReportSink, TrackerError, TrackerSample};

pub const SEPARATOR: &str = "*******************************************";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human readable block per report
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

/// Writes reports to any `Write`, normally stdout.
pub struct ConsoleSink<W> {
    out: W,
    format: OutputFormat,
}

impl<W: Write> ConsoleSink<W> {
    pub fn new(out: W, format: OutputFormat) -> Self {
        Self { out, format }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ReportSink for ConsoleSink<W> {
    fn emit(&mut self, sample: &TrackerSample) -> Result<(), TrackerError> {
        match self.format {
            OutputFormat::Text => self.out.write_all(format_text(sample).as_bytes())?,
            OutputFormat::Json => {
                serde_json::to_writer(&mut self.out, sample).map_err(std::io::Error::from)?;
                self.out.write_all(b"\n")?;
            }
        }
        self.out.flush()?;
        Ok(())
    }
}

pub fn format_text(sample: &TrackerSample) -> String {
    let rx = &sample.doppler.receive;
    let tx = &sample.doppler.transmit;
    format!(
        "Azimuth = {:.2} Degrees\n\
         Elevation = {:.2} Degrees\n\
         Range = {} km\n\
         Rate = {:.3} km/s\n\
         ***\n\
         Receive Frequency {} MHz\n\
         Receive Doppler {} Hz\n\
         Transmit Frequency {} MHz\n\
         Transmit Doppler {} Hz\n\
         {}\n",
        sample.azimuth_deg,
        sample.elevation_deg,
        sample.range_km.trunc() as i64,
        sample.range_rate_km_s,
        format_mhz(rx.shifted_hz),
        rx.shift_hz,
        format_mhz(tx.shifted_hz),
        tx.shift_hz,
        SEPARATOR,
    )
}

/// Exact decimal MHz from whole hertz.
pub fn format_mhz(hz: i64) -> String {
    let sign = if hz < 0 { "-" } else { "" };
    let abs = hz.unsigned_abs();
    format!("{}{}.{:06}", sign, abs / 1_000_000, abs % 1_000_000)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::{DopplerResult, DopplerShift};
    use chrono::{TimeZone, Utc};

    fn sample() -> TrackerSample {
        TrackerSample {
            timestamp: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
            azimuth_deg: 123.456,
            elevation_deg: -4.321,
            range_km: 2345.9,
            range_rate_km_s: 7.5,
            doppler: DopplerResult {
                receive: DopplerShift {
                    nominal_hz: 145_800_000,
                    shifted_hz: 145_796_348,
                    shift_hz: -3652,
                },
                transmit: DopplerShift {
                    nominal_hz: 145_800_000,
                    shifted_hz: 145_803_651,
                    shift_hz: 3651,
                },
            },
        }
    }

    #[test]
    fn text_block() {
        let expected = "Azimuth = 123.46 Degrees
Elevation = -4.32 Degrees
Range = 2345 km
Rate = 7.500 km/s
***
Receive Frequency 145.796348 MHz
Receive Doppler -3652 Hz
Transmit Frequency 145.803651 MHz
Transmit Doppler 3651 Hz
*******************************************
";
        assert_eq!(format_text(&sample()), expected);
    }

    #[test]
    fn mhz_keeps_every_hertz() {
        assert_eq!(format_mhz(145_800_000), "145.800000");
        assert_eq!(format_mhz(2_401_000_001), "2401.000001");
        assert_eq!(format_mhz(999), "0.000999");
        assert_eq!(format_mhz(-1_500_000), "-1.500000");
    }

    #[test]
    fn json_lines() {
        let mut sink = ConsoleSink::new(Vec::new(), OutputFormat::Json);
        sink.emit(&sample()).unwrap();
        sink.emit(&sample()).unwrap();
        let out = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);

        let value: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(value["doppler"]["receive"]["shift_hz"], -3652);
        assert_eq!(value["doppler"]["transmit"]["shifted_hz"], 145_803_651);
        assert_eq!(value["timestamp"], "2024-03-01T12:00:00Z");
    }

    #[test]
    fn text_sink_writes_block() {
        let mut sink = ConsoleSink::new(Vec::new(), OutputFormat::Text);
        sink.emit(&sample()).unwrap();
        let out = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(out, format_text(&sample()));
    }
}
