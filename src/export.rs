//! CSV output for projection records and chainage stations.

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use crate::chainage::Station;
use crate::projector::ProjectionResult;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// Flat row for stations; CSV cannot hold the nested point tuple.
#[derive(Debug, Serialize)]
struct StationRow<'a> {
    label: &'a str,
    distance_m: f64,
    x: f64,
    y: f64,
}

impl<'a> From<&'a Station> for StationRow<'a> {
    fn from(station: &'a Station) -> Self {
        Self {
            label: &station.label,
            distance_m: station.distance_m,
            x: station.point.0,
            y: station.point.1,
        }
    }
}

/// Writes one row per record with a header line.
pub fn write_projections<W: Write>(writer: W, results: &[ProjectionResult]) -> Result<(), ExportError> {
    let mut csv = csv::Writer::from_writer(writer);
    for result in results {
        csv.serialize(result)?;
    }
    csv.flush()?;
    Ok(())
}

pub fn write_stations<W: Write>(writer: W, stations: &[Station]) -> Result<(), ExportError> {
    let mut csv = csv::Writer::from_writer(writer);
    for station in stations {
        csv.serialize(StationRow::from(station))?;
    }
    csv.flush()?;
    Ok(())
}

/// Writes projection records to `path`, creating parent directories.
pub fn save_projections(path: impl AsRef<Path>, results: &[ProjectionResult]) -> Result<(), ExportError> {
    write_projections(create(path.as_ref())?, results)
}

pub fn save_stations(path: impl AsRef<Path>, stations: &[Station]) -> Result<(), ExportError> {
    write_stations(create(path.as_ref())?, stations)
}

/// Output file for one annotated layer: `<dir>/<source stem>.csv`.
pub fn layer_path(dir: &Path, source: &Path) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "layer".to_string());
    dir.join(format!("{stem}.csv"))
}

fn create(path: &Path) -> Result<std::fs::File, ExportError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    Ok(std::fs::File::create(path)?)
}
