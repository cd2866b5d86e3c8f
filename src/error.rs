//! Error type shared by the chainage engine.

use thiserror::Error;

/// Errors reported by axis construction and chainage queries.
///
/// Every failure is returned to the caller as-is. The engine never retries
/// and never returns partial results alongside an error.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChainageError {
    /// The axis has fewer than two distinct vertices, zero length, or a
    /// direction query collapsed onto a single point.
    #[error("degenerate axis geometry: {0}")]
    DegenerateGeometry(String),
    /// Marker spacing must be a positive, finite number of meters.
    #[error("invalid marker interval: {0} m (must be > 0)")]
    InvalidInterval(f64),
    /// A distance along the axis was negative or not finite.
    #[error("invalid distance: {0} m (must be a finite value >= 0)")]
    InvalidDistance(f64),
    /// The label does not follow the `K<km>+<mmm>` pattern.
    #[error("invalid chainage label: {0:?} (expected K<km>+<mmm>)")]
    InvalidLabel(String),
    /// The interval would place more stations than [`crate::chainage::MAX_STATIONS`].
    #[error("marker interval of {interval_m} m would place {count} stations (limit {max})")]
    TooManyStations { interval_m: f64, count: f64, max: usize },
    /// A filter radius was negative or not a number.
    #[error("invalid radius: {0} m (must be >= 0)")]
    InvalidRadius(f64),
}

pub type Result<T> = std::result::Result<T, ChainageError>;
