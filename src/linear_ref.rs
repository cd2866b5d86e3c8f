//! Linear referencing against a fixed corridor axis.
//!
//! All queries assume the axis and the query points share one planar metric
//! coordinate system. No CRS handling happens here.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ChainageError, Result};
use crate::polyline::Polyline;

/// Half-width of the sampling window used for the local tangent, in meters.
pub const DIRECTION_SAMPLE_M: f64 = 1.0;

/// Relative tolerance under which two candidate projections count as a tie.
const TIE_EPSILON: f64 = 1e-9;

/// Position of a feature relative to the local axis tangent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
    OnAxis,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Side::Left => "Left",
            Side::Right => "Right",
            Side::OnAxis => "OnAxis",
        };

        f.write_str(s)
    }
}

/// Nearest point on the axis for a query point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisProjection {
    /// Foot of the projection on the axis.
    pub point: (f64, f64),
    /// Chainage of `point`, always within `[0, length]`.
    pub distance_along: f64,
    /// Euclidean distance from the query point to `point`.
    pub offset: f64,
    /// Index of the segment the projection landed on.
    pub segment_index: usize,
}

/// An immutable axis with its cumulative-length table.
///
/// Built once, read-only afterwards, so it can be shared across threads
/// without locking.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearReferenceSystem {
    polyline: Polyline,
    /// One entry per vertex: 0 for the first, `length` for the last.
    cumulative: Vec<f64>,
    length: f64,
}

impl LinearReferenceSystem {
    /// Wraps a polyline and builds the cumulative-length table in one pass.
    pub fn new(polyline: Polyline) -> Result<Self> {
        let mut cumulative = Vec::with_capacity(polyline.points().len());
        let mut total = 0.0;
        cumulative.push(total);
        for (a, b) in polyline.segments() {
            total += segment_length(a, b);
            cumulative.push(total);
        }

        if total <= 0.0 || !total.is_finite() {
            return Err(ChainageError::DegenerateGeometry(
                "axis geometry has zero length".to_string(),
            ));
        }

        debug!(
            vertices = polyline.points().len(),
            length_m = total,
            "built linear reference system"
        );

        Ok(Self {
            polyline,
            cumulative,
            length: total,
        })
    }

    /// Validates raw vertices and wraps them.
    pub fn from_vertices(points: Vec<(f64, f64)>) -> Result<Self> {
        Self::new(Polyline::new(points)?)
    }

    pub fn polyline(&self) -> &Polyline {
        &self.polyline
    }

    /// Total axis length in meters.
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Cumulative distance at each vertex.
    pub fn cumulative_lengths(&self) -> &[f64] {
        &self.cumulative
    }

    /// Finds the closest point on the axis to `point`.
    ///
    /// Every segment is tested with the clamped-parameter formula. When two
    /// segments are equally close (within a relative 1e-9), the earlier one
    /// along the axis wins, which makes shared vertices deterministic.
    pub fn project(&self, point: (f64, f64)) -> AxisProjection {
        let points = self.polyline.points();
        let mut best = self.project_on_segment(0, points[0], points[1], point);

        for index in 1..points.len() - 1 {
            let candidate = self.project_on_segment(index, points[index], points[index + 1], point);
            if is_strictly_closer(candidate.offset, best.offset) {
                best = candidate;
            }
        }

        best
    }

    fn project_on_segment(
        &self,
        index: usize,
        a: (f64, f64),
        b: (f64, f64),
        q: (f64, f64),
    ) -> AxisProjection {
        let (dx, dy) = (b.0 - a.0, b.1 - a.1);
        let len_sq = dx * dx + dy * dy;
        let t = (((q.0 - a.0) * dx + (q.1 - a.1) * dy) / len_sq).clamp(0.0, 1.0);

        // Endpoints are returned verbatim so vertex queries stay exact.
        let (foot, along) = if t <= 0.0 {
            (a, self.cumulative[index])
        } else if t >= 1.0 {
            (b, self.cumulative[index + 1])
        } else {
            let seg_len = self.cumulative[index + 1] - self.cumulative[index];
            (
                (a.0 + t * dx, a.1 + t * dy),
                self.cumulative[index] + t * seg_len,
            )
        };

        AxisProjection {
            point: foot,
            distance_along: along.clamp(0.0, self.length),
            offset: distance(foot, q),
            segment_index: index,
        }
    }

    /// Interpolates the point at `distance_m` along the axis.
    ///
    /// Negative or non-finite distances are rejected; distances beyond the
    /// end are clamped to `length`. `point_at(0)` is the first vertex and
    /// `point_at(length)` the last one, exactly.
    pub fn point_at(&self, distance_m: f64) -> Result<(f64, f64)> {
        let d = self.checked_distance(distance_m)?;
        if d <= 0.0 {
            return Ok(self.polyline.first());
        }
        if d >= self.length {
            return Ok(self.polyline.last());
        }

        let index = self.segment_index_at(d);
        let points = self.polyline.points();
        let (a, b) = (points[index], points[index + 1]);
        let t = (d - self.cumulative[index]) / (self.cumulative[index + 1] - self.cumulative[index]);

        Ok((a.0 + t * (b.0 - a.0), a.1 + t * (b.1 - a.1)))
    }

    /// Local tangent at `distance_m`, as the chord between two points
    /// sampled [`DIRECTION_SAMPLE_M`] before and after it.
    ///
    /// The vector is not normalized.
    pub fn direction_at(&self, distance_m: f64) -> Result<(f64, f64)> {
        let d = self.checked_distance(distance_m)?;
        let d1 = (d - DIRECTION_SAMPLE_M).max(0.0);
        let d2 = (d + DIRECTION_SAMPLE_M).min(self.length);
        if d2 <= d1 {
            return Err(ChainageError::DegenerateGeometry(format!(
                "direction sample window at {d} m has zero length"
            )));
        }

        let p1 = self.point_at(d1)?;
        let p2 = self.point_at(d2)?;
        Ok((p2.0 - p1.0, p2.1 - p1.1))
    }

    /// Classifies `point` against the local tangent at its projection.
    ///
    /// Uses the sign of the 2D cross product of the tangent and the
    /// projection-to-point vector. Exactly zero means `OnAxis`.
    pub fn side_of(&self, point: (f64, f64), projection: &AxisProjection) -> Result<Side> {
        let v = self.direction_at(projection.distance_along)?;
        let u = (point.0 - projection.point.0, point.1 - projection.point.1);
        let cross = v.0 * u.1 - v.1 * u.0;

        Ok(if cross > 0.0 {
            Side::Left
        } else if cross < 0.0 {
            Side::Right
        } else {
            Side::OnAxis
        })
    }

    fn checked_distance(&self, distance_m: f64) -> Result<f64> {
        if !distance_m.is_finite() || distance_m < 0.0 {
            return Err(ChainageError::InvalidDistance(distance_m));
        }
        Ok(distance_m.min(self.length))
    }

    /// Segment whose cumulative range `[c_i, c_i+1)` holds `d`, for `d < length`.
    fn segment_index_at(&self, d: f64) -> usize {
        let upper = self.cumulative.partition_point(|&c| c <= d);
        upper.saturating_sub(1).min(self.cumulative.len() - 2)
    }
}

fn is_strictly_closer(candidate: f64, current: f64) -> bool {
    candidate < current - TIE_EPSILON * current.max(1.0)
}

fn segment_length(a: (f64, f64), b: (f64, f64)) -> f64 {
    (b.0 - a.0).hypot(b.1 - a.1)
}

fn distance(a: (f64, f64), b: (f64, f64)) -> f64 {
    segment_length(a, b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn l_shaped() -> LinearReferenceSystem {
        LinearReferenceSystem::from_vertices(vec![(0.0, 0.0), (100.0, 0.0), (100.0, 50.0)])
            .unwrap()
    }

    #[test]
    fn test_cumulative_table() {
        let lrs = l_shaped();
        assert_eq!(lrs.cumulative_lengths(), &[0.0, 100.0, 150.0]);
        assert_eq!(lrs.length(), 150.0);
    }

    #[test]
    fn test_point_at_endpoints_exact() {
        let lrs = LinearReferenceSystem::from_vertices(vec![
            (0.1, 0.7),
            (13.3, 2.9),
            (21.7, -8.05),
        ])
        .unwrap();
        assert_eq!(lrs.point_at(0.0).unwrap(), (0.1, 0.7));
        assert_eq!(lrs.point_at(lrs.length()).unwrap(), (21.7, -8.05));
    }

    #[test]
    fn test_point_at_interpolates() {
        let lrs = l_shaped();
        let (x, y) = lrs.point_at(125.0).unwrap();
        assert_relative_eq!(x, 100.0);
        assert_relative_eq!(y, 25.0);
        assert_eq!(lrs.point_at(100.0).unwrap(), (100.0, 0.0));
    }

    #[test]
    fn test_point_at_clamps_beyond_end() {
        let lrs = l_shaped();
        assert_eq!(lrs.point_at(10_000.0).unwrap(), (100.0, 50.0));
    }

    #[test]
    fn test_point_at_rejects_negative() {
        let lrs = l_shaped();
        assert_eq!(
            lrs.point_at(-1.0).unwrap_err(),
            ChainageError::InvalidDistance(-1.0)
        );
        assert!(lrs.point_at(f64::NAN).is_err());
    }

    #[test]
    fn test_project_perpendicular() {
        let lrs = l_shaped();
        let p = lrs.project((40.0, -7.0));
        assert_eq!(p.segment_index, 0);
        assert_relative_eq!(p.distance_along, 40.0);
        assert_relative_eq!(p.offset, 7.0);
        assert_relative_eq!(p.point.0, 40.0);
        assert_abs_diff_eq!(p.point.1, 0.0);
    }

    #[test]
    fn test_project_beyond_ends_clamps() {
        let lrs = l_shaped();
        let before = lrs.project((-30.0, 0.0));
        assert_eq!(before.distance_along, 0.0);
        assert_relative_eq!(before.offset, 30.0);

        let after = lrs.project((100.0, 80.0));
        assert_eq!(after.distance_along, 150.0);
        assert_relative_eq!(after.offset, 30.0);
    }

    #[test]
    fn test_project_vertex_onto_itself() {
        let lrs = l_shaped();
        for (vertex, cumulative) in lrs.polyline().points().iter().zip(lrs.cumulative_lengths()) {
            let p = lrs.project(*vertex);
            assert_eq!(p.offset, 0.0);
            assert_eq!(p.distance_along, *cumulative);
        }
    }

    #[test]
    fn test_project_tie_prefers_earlier_segment() {
        // Outside corner at (100, 0): equidistant from both segments' shared vertex.
        let lrs = l_shaped();
        let p = lrs.project((110.0, -10.0));
        assert_eq!(p.segment_index, 0);
        assert_eq!(p.distance_along, 100.0);

        // Inside the corner, on the bisector: both feet are 5 m away.
        let p = lrs.project((95.0, 5.0));
        assert_eq!(p.segment_index, 0);
        assert_relative_eq!(p.distance_along, 95.0);
    }

    #[test]
    fn test_direction_follows_local_tangent() {
        let lrs = l_shaped();
        let (dx, dy) = lrs.direction_at(50.0).unwrap();
        assert!(dx > 0.0);
        assert_abs_diff_eq!(dy, 0.0);

        let (dx, dy) = lrs.direction_at(130.0).unwrap();
        assert_abs_diff_eq!(dx, 0.0);
        assert!(dy > 0.0);
    }

    #[test]
    fn test_direction_at_ends() {
        let lrs = l_shaped();
        let (dx, _) = lrs.direction_at(0.0).unwrap();
        assert_abs_diff_eq!(dx, DIRECTION_SAMPLE_M, epsilon = 1e-9);
        let (_, dy) = lrs.direction_at(150.0).unwrap();
        assert_abs_diff_eq!(dy, DIRECTION_SAMPLE_M, epsilon = 1e-9);
    }

    #[test]
    fn test_side_on_curved_axis_uses_local_tangent() {
        // On the northbound leg, a point to the west is left of travel even
        // though the overall start-to-end bearing would put it elsewhere.
        let lrs = l_shaped();
        let q = (90.0, 30.0);
        let p = lrs.project(q);
        assert_eq!(p.segment_index, 1);
        assert_eq!(lrs.side_of(q, &p).unwrap(), Side::Left);

        let q = (110.0, 30.0);
        let p = lrs.project(q);
        assert_eq!(lrs.side_of(q, &p).unwrap(), Side::Right);
    }

    #[test]
    fn test_zero_length_rejected() {
        let err = LinearReferenceSystem::from_vertices(vec![(1.0, 1.0), (1.0, 1.0)]).unwrap_err();
        assert!(matches!(err, ChainageError::DegenerateGeometry(_)));
    }

    #[test]
    fn test_side_display() {
        assert_eq!(Side::OnAxis.to_string(), "OnAxis");
        assert_eq!(format!("{}", Side::Left), "Left");
    }
}
