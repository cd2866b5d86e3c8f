//! Corridor processing pipeline: summary, stations and feature annotation.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::chainage::{Station, format_chainage, generate_markers};
use crate::config::{ChainageConfig, CorridorConfig};
use crate::error::Result;
use crate::feature::Feature;
use crate::filter::{filter_by_radius, sort_by_chainage};
use crate::linear_ref::LinearReferenceSystem;
use crate::polyline::Polyline;
use crate::projector::{ProjectionResult, project_all, project_all_par};

/// Overview of an axis, as shown by the `info` command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorridorSummary {
    pub name: String,
    pub length_m: f64,
    pub length_label: String,
    pub vertex_count: usize,
    /// `(min_x, min_y, max_x, max_y)`.
    pub bounds: (f64, f64, f64, f64),
}

/// A named corridor section and its reference axis.
#[derive(Debug, Clone)]
pub struct Corridor {
    pub name: String,
    axis: LinearReferenceSystem,
}

impl Corridor {
    pub fn new(name: impl Into<String>, axis: Polyline) -> Result<Self> {
        Ok(Self {
            name: name.into(),
            axis: LinearReferenceSystem::new(axis)?,
        })
    }

    pub fn axis(&self) -> &LinearReferenceSystem {
        &self.axis
    }

    pub fn summary(&self) -> Result<CorridorSummary> {
        let length_m = self.axis.length();
        Ok(CorridorSummary {
            name: self.name.clone(),
            length_m,
            length_label: format_chainage(length_m)?,
            vertex_count: self.axis.polyline().points().len(),
            bounds: self.axis.polyline().bounds(),
        })
    }

    /// Default directory for this corridor's outputs, `salidas_<name>`.
    pub fn output_dir(&self) -> PathBuf {
        PathBuf::from(format!("salidas_{}", self.name))
    }

    /// Stations at the configured interval and start offset.
    pub fn markers(&self, config: &ChainageConfig) -> Result<Vec<Station>> {
        generate_markers(&self.axis, config.interval_m, config.start_m)
    }

    /// Projects, filters by radius and sorts features by chainage.
    pub fn annotate(&self, features: &[Feature], config: &CorridorConfig) -> Result<Vec<ProjectionResult>> {
        config.validate()?;

        let projected = if config.parallel {
            project_all_par(features, &self.axis)?
        } else {
            project_all(features, &self.axis)?
        };

        let nearby = filter_by_radius(&projected, config.filter.radius_m)?;
        if nearby.len() < projected.len() {
            warn!(
                corridor = %self.name,
                dropped = projected.len() - nearby.len(),
                radius_m = config.filter.radius_m,
                "features outside search radius were dropped"
            );
        }

        info!(
            corridor = %self.name,
            features = features.len(),
            kept = nearby.len(),
            "annotated features"
        );

        Ok(sort_by_chainage(&nearby))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ChainageError;
    use crate::linear_ref::Side;

    fn corridor() -> Corridor {
        let axis = Polyline::new(vec![(0.0, 0.0), (1000.0, 0.0), (1000.0, 1050.0)]).unwrap();
        Corridor::new("tramo6", axis).unwrap()
    }

    #[test]
    fn test_summary() {
        let summary = corridor().summary().unwrap();
        assert_eq!(summary.name, "tramo6");
        assert_eq!(summary.length_m, 2050.0);
        assert_eq!(summary.length_label, "K2+050");
        assert_eq!(summary.vertex_count, 3);
        assert_eq!(summary.bounds, (0.0, 0.0, 1000.0, 1050.0));
    }

    #[test]
    fn test_output_dir_named_after_corridor() {
        assert_eq!(corridor().output_dir(), PathBuf::from("salidas_tramo6"));
    }

    #[test]
    fn test_markers_use_config() {
        let config = ChainageConfig {
            interval_m: 1000.0,
            start_m: 0.0,
        };
        let labels: Vec<String> = corridor()
            .markers(&config)
            .unwrap()
            .into_iter()
            .map(|s| s.label)
            .collect();
        assert_eq!(labels, vec!["K0+000", "K1+000", "K2+000"]);
    }

    #[test]
    fn test_annotate_filters_and_sorts() {
        let features = vec![
            Feature::new("late", (1010.0, 900.0)),
            Feature::new("far", (500.0, -5000.0)),
            Feature::new("early", (200.0, 30.0)),
        ];
        let mut config = CorridorConfig::default();
        config.filter.radius_m = 100.0;

        let results = corridor().annotate(&features, &config).unwrap();
        let names: Vec<&str> = results.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["early", "late"]);
        assert_eq!(results[0].side, Side::Left);
        assert_eq!(results[1].chainage_label, "K1+900");
        assert_eq!(results[1].side, Side::Right);
    }

    #[test]
    fn test_annotate_parallel_same_output() {
        let features: Vec<Feature> = (0..50)
            .map(|i| Feature::new(format!("f{i}"), (i as f64 * 40.0, (i % 7) as f64 * 20.0 - 60.0)))
            .collect();
        let mut config = CorridorConfig::default();
        let sequential = corridor().annotate(&features, &config).unwrap();
        config.parallel = true;
        assert_eq!(corridor().annotate(&features, &config).unwrap(), sequential);
    }

    #[test]
    fn test_annotate_rejects_bad_config() {
        let mut config = CorridorConfig::default();
        config.filter.radius_m = -1.0;
        let err = corridor().annotate(&[], &config).unwrap_err();
        assert_eq!(err, ChainageError::InvalidRadius(-1.0));
    }
}
