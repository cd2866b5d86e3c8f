//! Feature projection onto the corridor axis.
//!
//! Produces one [`ProjectionResult`] per input feature, in input order.
//! Nothing is dropped here; see `filter` for post-processing.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::chainage::format_chainage;
use crate::error::{ChainageError, Result};
use crate::feature::Feature;
use crate::linear_ref::{LinearReferenceSystem, Side};

/// Axis-referenced record for one feature.
///
/// Field order is the column order used by tabular exports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionResult {
    pub name: String,
    /// Distance along the axis, within `[0, length]`.
    pub chainage_m: f64,
    pub chainage_label: String,
    /// Perpendicular distance to the axis, always `>= 0`.
    pub offset_m: f64,
    pub side: Side,
    pub x: f64,
    pub y: f64,
    pub x_axis: f64,
    pub y_axis: f64,
}

/// Projects a single feature.
pub fn project_feature(axis: &LinearReferenceSystem, feature: &Feature) -> Result<ProjectionResult> {
    let (x, y) = feature.point;
    if !x.is_finite() || !y.is_finite() {
        return Err(ChainageError::DegenerateGeometry(format!(
            "feature {:?} has a non-finite coordinate ({x}, {y})",
            feature.name
        )));
    }

    let projection = axis.project(feature.point);
    let side = axis.side_of(feature.point, &projection)?;

    Ok(ProjectionResult {
        name: feature.name.clone(),
        chainage_m: projection.distance_along,
        chainage_label: format_chainage(projection.distance_along)?,
        offset_m: projection.offset,
        side,
        x,
        y,
        x_axis: projection.point.0,
        y_axis: projection.point.1,
    })
}

/// Projects every feature, preserving input order.
///
/// The first failing feature aborts the whole batch.
pub fn project_all(features: &[Feature], axis: &LinearReferenceSystem) -> Result<Vec<ProjectionResult>> {
    debug!(features = features.len(), "projecting features onto axis");
    features
        .iter()
        .map(|feature| project_feature(axis, feature))
        .collect()
}

/// Parallel variant of [`project_all`]. Output order and values are
/// identical; the axis is shared read-only across worker threads.
pub fn project_all_par(
    features: &[Feature],
    axis: &LinearReferenceSystem,
) -> Result<Vec<ProjectionResult>> {
    debug!(
        features = features.len(),
        threads = rayon::current_num_threads(),
        "projecting features onto axis in parallel"
    );
    features
        .par_iter()
        .map(|feature| project_feature(axis, feature))
        .collect()
}
