//! GeoJSON loading at the crate boundary.
//!
//! Coordinates are taken as-is: the file must already be in the planar
//! metric system used for chainage (no reprojection happens here).

use std::path::Path;

use geo::{MultiPoint, MultiPolygon, Polygon};
use geojson::{GeoJson, Geometry, Position, Value};
use serde_json::Value as JsonValue;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::DEFAULT_UNNAMED_LABEL;
use crate::error::ChainageError;
use crate::feature::Feature;
use crate::polyline::Polyline;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("failed to read input file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid GeoJSON: {0}")]
    GeoJson(#[from] geojson::Error),
    #[error(transparent)]
    Geometry(#[from] ChainageError),
    #[error("no LineString or MultiLineString found for the axis")]
    NoAxis,
    #[error("position must contain at least 2 dimensions, got {0}")]
    ShortPosition(usize),
}

/// Options for turning GeoJSON features into [`Feature`] values.
#[derive(Debug, Clone)]
pub struct FeatureOptions {
    /// Property holding the feature name. `name` is tried when it is absent.
    pub name_field: String,
    pub unnamed_label: String,
}

impl Default for FeatureOptions {
    fn default() -> Self {
        Self {
            name_field: "Name".to_string(),
            unnamed_label: DEFAULT_UNNAMED_LABEL.to_string(),
        }
    }
}

pub fn load_axis(path: impl AsRef<Path>) -> Result<Polyline, InputError> {
    parse_axis(&std::fs::read_to_string(path)?)
}

/// Takes the first line geometry in the document as the axis. Multi-part
/// lines are merged in order.
pub fn parse_axis(text: &str) -> Result<Polyline, InputError> {
    for geometry in geometries(text.parse::<GeoJson>()?).into_iter().flatten() {
        let polyline = match &geometry.value {
            Value::LineString(line) => Polyline::new(positions(line)?)?,
            Value::MultiLineString(lines) => Polyline::from_parts(
                lines
                    .iter()
                    .map(|line| positions(line))
                    .collect::<Result<Vec<_>, _>>()?,
            )?,
            _ => continue,
        };
        debug!(vertices = polyline.points().len(), "loaded axis");
        return Ok(polyline);
    }

    Err(InputError::NoAxis)
}

pub fn load_features(
    path: impl AsRef<Path>,
    options: &FeatureOptions,
) -> Result<Vec<Feature>, InputError> {
    parse_features(&std::fs::read_to_string(path)?, options)
}

/// Converts every point-like or areal feature. Polygons and multi-points are
/// reduced to their centroid. Other geometries are skipped.
pub fn parse_features(text: &str, options: &FeatureOptions) -> Result<Vec<Feature>, InputError> {
    let geojson = text.parse::<GeoJson>()?;
    let mut features = Vec::new();

    for feature in collect_features(geojson) {
        let name = feature_name(&feature, options);
        let Some(geometry) = feature.geometry else {
            warn!(name = %name, "skipping feature without geometry");
            continue;
        };

        check_dimensions(&geometry.value)?;
        let converted = match &geometry.value {
            Value::Point(p) => Feature::new(name, position(p)?),
            Value::MultiPoint(points) if points.is_empty() => {
                warn!(name = %name, "skipping empty multi-point");
                continue;
            }
            Value::MultiPoint(_) => {
                Feature::from_multi_point(name, &MultiPoint::try_from(&geometry.value)?)?
            }
            Value::Polygon(_) => Feature::from_polygon(name, &Polygon::try_from(&geometry.value)?)?,
            Value::MultiPolygon(_) => {
                Feature::from_multi_polygon(name, &MultiPolygon::try_from(&geometry.value)?)?
            }
            _ => {
                warn!(name = %name, "skipping feature with unsupported geometry type");
                continue;
            }
        };
        features.push(converted);
    }

    debug!(count = features.len(), "loaded features");
    Ok(features)
}

fn collect_features(geojson: GeoJson) -> Vec<geojson::Feature> {
    match geojson {
        GeoJson::FeatureCollection(collection) => collection.features,
        GeoJson::Feature(feature) => vec![feature],
        GeoJson::Geometry(geometry) => vec![geojson::Feature {
            bbox: None,
            geometry: Some(geometry),
            id: None,
            properties: None,
            foreign_members: None,
        }],
    }
}

fn geometries(geojson: GeoJson) -> Vec<Option<Geometry>> {
    collect_features(geojson)
        .into_iter()
        .map(|feature| feature.geometry)
        .collect()
}

fn feature_name(feature: &geojson::Feature, options: &FeatureOptions) -> String {
    let properties = feature.properties.as_ref();
    let value = properties
        .and_then(|p| p.get(&options.name_field))
        .filter(|v| !v.is_null())
        .or_else(|| properties.and_then(|p| p.get("name")).filter(|v| !v.is_null()));

    match value {
        Some(JsonValue::String(s)) if !s.trim().is_empty() => s.clone(),
        Some(JsonValue::String(_)) | None => options.unnamed_label.clone(),
        Some(other) => other.to_string(),
    }
}

fn position(p: &Position) -> Result<(f64, f64), InputError> {
    match p.as_slice() {
        [x, y, ..] => Ok((*x, *y)),
        _ => Err(InputError::ShortPosition(p.len())),
    }
}

fn positions(points: &[Position]) -> Result<Vec<(f64, f64)>, InputError> {
    points.iter().map(position).collect()
}

/// Rejects positions with fewer than two ordinates before geometries are
/// converted to `geo` types, which index x and y directly.
fn check_dimensions(value: &Value) -> Result<(), InputError> {
    let short = match value {
        Value::Point(p) => is_short(p).then_some(p),
        Value::MultiPoint(points) | Value::LineString(points) => points.iter().find(|p| is_short(p)),
        Value::MultiLineString(lines) | Value::Polygon(lines) => {
            lines.iter().flatten().find(|p| is_short(p))
        }
        Value::MultiPolygon(polygons) => polygons.iter().flatten().flatten().find(|p| is_short(p)),
        Value::GeometryCollection(_) => None,
    };
    match short {
        Some(p) => Err(InputError::ShortPosition(p.len())),
        None => Ok(()),
    }
}

fn is_short(p: &Position) -> bool {
    p.len() < 2
}
