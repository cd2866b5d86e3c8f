//! Chainage labels in K+ notation and station markers.
//!
//! A label reads `K<km>+<mmm>`: `K5+250` is 5 km plus 250 m, i.e. 5250 m
//! from the start of the axis. Labels have one-meter resolution. Fractional
//! meters are rounded to the nearest meter when formatting, so
//! `parse_chainage(format_chainage(x))` gives back `x` only for whole meters.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ChainageError, Result};
use crate::linear_ref::LinearReferenceSystem;

static LABEL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[Kk](\d+)\+(\d{3})$").expect("chainage label pattern compiles"));

/// Upper bound on the stations a single call may generate.
pub const MAX_STATIONS: usize = 1_000_000;

/// A marker placed on the axis at a regular chainage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub point: (f64, f64),
    pub distance_m: f64,
    pub label: String,
}

/// Formats a distance in meters as a K+ label.
///
/// ```
/// use corridor_chainage::chainage::format_chainage;
///
/// assert_eq!(format_chainage(0.0).unwrap(), "K0+000");
/// assert_eq!(format_chainage(5250.0).unwrap(), "K5+250");
/// assert_eq!(format_chainage(11795.0).unwrap(), "K11+795");
/// ```
pub fn format_chainage(distance_m: f64) -> Result<String> {
    if !distance_m.is_finite() || distance_m < 0.0 {
        return Err(ChainageError::InvalidDistance(distance_m));
    }

    let meters = distance_m.round() as u64;
    Ok(format!("K{}+{:03}", meters / 1000, meters % 1000))
}

/// Parses a K+ label back to meters.
///
/// The leading `K` is case-insensitive and surrounding whitespace is
/// ignored. The remainder must have exactly three digits.
pub fn parse_chainage(label: &str) -> Result<f64> {
    let invalid = || ChainageError::InvalidLabel(label.to_string());

    let captures = LABEL_PATTERN.captures(label.trim()).ok_or_else(invalid)?;
    let km: u64 = captures[1].parse().map_err(|_| invalid())?;
    let rest: u64 = captures[2].parse().map_err(|_| invalid())?;
    let meters = km
        .checked_mul(1000)
        .and_then(|m| m.checked_add(rest))
        .ok_or_else(invalid)?;

    Ok(meters as f64)
}

/// Places stations at `start_m`, `start_m + interval_m`, ... along the axis.
///
/// Stations stop at the last step that does not exceed the axis length.
/// The axis end is only included when it falls exactly on a step; callers
/// that always want a final station must add it themselves. Fails with
/// [`ChainageError::TooManyStations`] past [`MAX_STATIONS`].
pub fn generate_markers(
    axis: &LinearReferenceSystem,
    interval_m: f64,
    start_m: f64,
) -> Result<Vec<Station>> {
    if !interval_m.is_finite() || interval_m <= 0.0 {
        return Err(ChainageError::InvalidInterval(interval_m));
    }
    if !start_m.is_finite() || start_m < 0.0 {
        return Err(ChainageError::InvalidDistance(start_m));
    }

    let length = axis.length();
    let count = if start_m > length {
        0.0
    } else {
        ((length - start_m) / interval_m).floor() + 1.0
    };
    if count > MAX_STATIONS as f64 {
        return Err(ChainageError::TooManyStations {
            interval_m,
            count,
            max: MAX_STATIONS,
        });
    }

    let mut stations = Vec::with_capacity(count as usize);
    let mut step: u64 = 0;

    loop {
        // Multiplying instead of accumulating keeps every step an exact multiple.
        let distance_m = start_m + step as f64 * interval_m;
        if distance_m > length {
            break;
        }

        stations.push(Station {
            point: axis.point_at(distance_m)?,
            distance_m,
            label: format_chainage(distance_m)?,
        });
        step += 1;
    }

    debug!(
        count = stations.len(),
        interval_m, start_m, length_m = length, "generated chainage markers"
    );

    Ok(stations)
}
