//! Input features to be referenced against the axis.
//!
//! The engine only needs a name and one representative point. Areal and
//! multi-point features are reduced to their centroid before projection.
//! Any other attributes stay with the caller, keyed by the feature's
//! position in the input sequence.

use geo::{Centroid, MultiPoint, MultiPolygon, Point, Polygon};
use serde::{Deserialize, Serialize};

use crate::error::{ChainageError, Result};

/// A named point in the axis' planar coordinate system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    /// Identifier shown in outputs. Not required to be unique.
    pub name: String,
    pub point: (f64, f64),
}

impl Feature {
    pub fn new(name: impl Into<String>, point: (f64, f64)) -> Self {
        Self {
            name: name.into(),
            point,
        }
    }

    /// Builds a feature at the area centroid of a polygon. Holes are
    /// subtracted; a polygon without area falls back to the centroid of its
    /// outline.
    pub fn from_polygon(name: impl Into<String>, polygon: &Polygon<f64>) -> Result<Self> {
        Ok(Self::new(name, centroid_of(polygon.centroid(), "polygon")?))
    }

    /// Same as [`Feature::from_polygon`] for several polygons, weighting each
    /// part by its area.
    pub fn from_multi_polygon(name: impl Into<String>, polygons: &MultiPolygon<f64>) -> Result<Self> {
        Ok(Self::new(name, centroid_of(polygons.centroid(), "multi-polygon")?))
    }

    /// Builds a feature at the mean of a set of points.
    pub fn from_multi_point(name: impl Into<String>, points: &MultiPoint<f64>) -> Result<Self> {
        Ok(Self::new(name, centroid_of(points.centroid(), "multi-point")?))
    }
}

fn centroid_of(centroid: Option<Point<f64>>, kind: &str) -> Result<(f64, f64)> {
    let (x, y) = centroid
        .ok_or_else(|| ChainageError::DegenerateGeometry(format!("{kind} has no vertices")))?
        .x_y();
    if !x.is_finite() || !y.is_finite() {
        return Err(ChainageError::DegenerateGeometry(format!(
            "{kind} centroid ({x}, {y}) is not finite"
        )));
    }
    Ok((x, y))
}
