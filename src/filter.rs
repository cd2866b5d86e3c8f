//! Post-processing of projection records.

use tracing::debug;

use crate::error::{ChainageError, Result};
use crate::projector::ProjectionResult;

/// Keeps the records with `offset_m <= radius_m`, in their original order.
///
/// A radius of zero keeps only features lying exactly on the axis. No
/// match is an empty result, not an error.
pub fn filter_by_radius(results: &[ProjectionResult], radius_m: f64) -> Result<Vec<ProjectionResult>> {
    if radius_m.is_nan() || radius_m < 0.0 {
        return Err(ChainageError::InvalidRadius(radius_m));
    }

    let kept: Vec<ProjectionResult> = results
        .iter()
        .filter(|result| result.offset_m <= radius_m)
        .cloned()
        .collect();

    debug!(
        radius_m,
        kept = kept.len(),
        dropped = results.len() - kept.len(),
        "filtered features by offset radius"
    );

    Ok(kept)
}

/// Returns the records ordered by ascending chainage.
///
/// The sort is stable: equal chainages keep their input order.
pub fn sort_by_chainage(results: &[ProjectionResult]) -> Vec<ProjectionResult> {
    let mut sorted = results.to_vec();
    sorted.sort_by(|a, b| a.chainage_m.total_cmp(&b.chainage_m));
    sorted
}
