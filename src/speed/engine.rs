//! Instantaneous speed recomputation.
//!
//! Speed values in the source files are not trusted; every speed is
//! recomputed from consecutive (distance, time) samples of the same
//! track before it is written back into the document.

use crate::parser::tcx::TrackSample;
use crate::utils::error::ParseError;
use chrono::{DateTime, FixedOffset};
use log::debug;

/// A recomputed speed for one valid sample
#[derive(Debug, Clone)]
pub struct SpeedSample {
    /// Timestamp exactly as serialized in the document
    pub timestamp: String,
    /// Instantaneous speed in meters per second
    pub speed_mps: f64,
}

/// Compute instantaneous speeds for one track's ordered valid samples
///
/// **Public** - main entry point for speed recomputation
///
/// Speed is `(distance - prev_distance) / elapsed_seconds` against the
/// immediately preceding valid sample of the same track. The first
/// sample of a track has no predecessor and gets speed 0. Zero elapsed
/// time (duplicate timestamps) also yields 0, guarding the division; a
/// negative distance delta passes through as a negative speed.
///
/// # Errors
/// * [`ParseError::InvalidTimestamp`] - a sample timestamp is not
///   valid ISO-8601 with timezone
pub fn compute_speeds(samples: &[TrackSample]) -> Result<Vec<SpeedSample>, ParseError> {
    let mut speeds = Vec::with_capacity(samples.len());
    let mut prev: Option<(DateTime<FixedOffset>, f64)> = None;

    for sample in samples {
        let time = parse_timestamp(&sample.timestamp)?;

        let speed = match prev {
            None => 0.0,
            Some((prev_time, prev_distance)) => {
                let elapsed = (time - prev_time).num_milliseconds() as f64 / 1000.0;
                if elapsed == 0.0 {
                    0.0
                } else {
                    (sample.distance - prev_distance) / elapsed
                }
            }
        };

        speeds.push(SpeedSample {
            timestamp: sample.timestamp.clone(),
            speed_mps: speed,
        });
        prev = Some((time, sample.distance));
    }

    debug!("Recomputed {} speed value(s)", speeds.len());
    Ok(speeds)
}

/// Parse an ISO-8601 timestamp with timezone. A trailing `Z` is
/// normalized to the explicit `+00:00` offset, so all parsed timestamps
/// are directly comparable.
pub fn parse_timestamp(value: &str) -> Result<DateTime<FixedOffset>, ParseError> {
    DateTime::parse_from_rfc3339(value).map_err(|source| ParseError::InvalidTimestamp {
        value: value.to_string(),
        source,
    })
}

/// Serialize a recomputed speed. Integral values keep one fractional
/// digit so speeds stay textually non-integer; fractional values use the
/// shortest exact form.
pub fn format_speed(speed_mps: f64) -> String {
    if speed_mps.fract() == 0.0 {
        format!("{speed_mps:.1}")
    } else {
        speed_mps.to_string()
    }
}
