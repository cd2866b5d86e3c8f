//! Polyline representation for corridor axes.
//!
//! This module provides a validated vertex sequence in planar metric
//! coordinates. Parsing of geospatial containers happens at the boundary
//! (see `geojson_input`); the engine only ever sees a `Polyline`.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ChainageError, Result};

/// A polyline representing a corridor axis as an ordered vertex sequence.
///
/// Stores `(x, y)` points in meters. Consecutive coincident vertices are
/// collapsed on construction, so every segment has non-zero length and the
/// direction of increasing index is the direction of increasing chainage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<(f64, f64)>", into = "Vec<(f64, f64)>")]
pub struct Polyline {
    points: Vec<(f64, f64)>,
}

impl Polyline {
    /// Creates a new Polyline from `(x, y)` vertices.
    ///
    /// Fails with [`ChainageError::DegenerateGeometry`] if a coordinate is
    /// not finite or fewer than two distinct vertices remain after
    /// collapsing consecutive duplicates.
    pub fn new(points: Vec<(f64, f64)>) -> Result<Self> {
        if let Some(bad) = points.iter().find(|(x, y)| !x.is_finite() || !y.is_finite()) {
            return Err(ChainageError::DegenerateGeometry(format!(
                "vertex ({}, {}) is not a finite coordinate",
                bad.0, bad.1
            )));
        }

        let input_len = points.len();
        let mut deduped: Vec<(f64, f64)> = Vec::with_capacity(input_len);
        for point in points {
            if deduped.last() != Some(&point) {
                deduped.push(point);
            }
        }

        if deduped.len() < input_len {
            warn!(
                collapsed = input_len - deduped.len(),
                "collapsed consecutive duplicate axis vertices"
            );
        }

        if deduped.len() < 2 {
            return Err(ChainageError::DegenerateGeometry(format!(
                "axis needs at least 2 distinct vertices, got {}",
                deduped.len()
            )));
        }

        Ok(Self { points: deduped })
    }

    /// Merges a multi-part line into a single polyline.
    ///
    /// Starting from the first part, parts whose endpoints touch the chain
    /// are attached at either end, reversed when drawn the other way. The
    /// shared vertex is kept once. When the parts do not form one chain they
    /// are concatenated in the given order instead, joined by straight
    /// segments.
    pub fn from_parts<I>(parts: I) -> Result<Self>
    where
        I: IntoIterator<Item = Vec<(f64, f64)>>,
    {
        let parts: Vec<Vec<(f64, f64)>> = parts.into_iter().filter(|part| !part.is_empty()).collect();
        if let Some(chain) = chain_parts(&parts) {
            return Self::new(chain);
        }

        warn!(
            parts = parts.len(),
            "axis parts do not form a single chain, joining them in file order"
        );
        Self::new(parts.into_iter().flatten().collect())
    }

    /// Returns a reference to the vertices.
    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    /// Consumes the polyline and returns the owned vertices.
    pub fn into_points(self) -> Vec<(f64, f64)> {
        self.points
    }

    pub fn first(&self) -> (f64, f64) {
        self.points[0]
    }

    pub fn last(&self) -> (f64, f64) {
        self.points[self.points.len() - 1]
    }

    /// Iterates over consecutive vertex pairs.
    pub fn segments(&self) -> impl Iterator<Item = ((f64, f64), (f64, f64))> + '_ {
        self.points.windows(2).map(|pair| (pair[0], pair[1]))
    }

    /// Bounding box as `(min_x, min_y, max_x, max_y)`.
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        self.points.iter().fold(
            (f64::INFINITY, f64::INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
            |(min_x, min_y, max_x, max_y), &(x, y)| {
                (min_x.min(x), min_y.min(y), max_x.max(x), max_y.max(y))
            },
        )
    }
}

/// Links every part into one vertex run, or `None` if some part never
/// touches either end of the chain.
fn chain_parts(parts: &[Vec<(f64, f64)>]) -> Option<Vec<(f64, f64)>> {
    let (first, rest) = parts.split_first()?;
    let mut chain: VecDeque<(f64, f64)> = first.iter().copied().collect();
    let mut pending: Vec<&Vec<(f64, f64)>> = rest.iter().collect();

    while !pending.is_empty() {
        let head = *chain.front()?;
        let tail = *chain.back()?;
        let index = pending.iter().position(|part| {
            let (start, end) = (part[0], part[part.len() - 1]);
            start == tail || end == tail || start == head || end == head
        })?;
        let part = pending.remove(index);
        let (start, end) = (part[0], part[part.len() - 1]);

        if start == tail {
            chain.extend(part.iter().skip(1).copied());
        } else if end == tail {
            chain.extend(part.iter().rev().skip(1).copied());
        } else if end == head {
            for &point in part.iter().rev().skip(1) {
                chain.push_front(point);
            }
        } else {
            for &point in part.iter().skip(1) {
                chain.push_front(point);
            }
        }
    }

    Some(chain.into())
}

impl TryFrom<Vec<(f64, f64)>> for Polyline {
    type Error = ChainageError;

    fn try_from(points: Vec<(f64, f64)>) -> Result<Self> {
        Self::new(points)
    }
}

impl From<Polyline> for Vec<(f64, f64)> {
    fn from(polyline: Polyline) -> Self {
        polyline.points
    }
}
