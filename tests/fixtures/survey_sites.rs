//! Survey sites along synthetic corridor axes.
//!
//! Coordinates are in a local planar frame in meters. Expected values were
//! worked out by hand for each axis.

use corridor_chainage::{Feature, LinearReferenceSystem, Side};

/// A named site with its expected referencing result.
#[derive(Debug, Clone)]
pub struct Site {
    pub name: &'static str,
    pub x: f64,
    pub y: f64,
    pub chainage_m: f64,
    pub label: &'static str,
    pub offset_m: f64,
    pub side: Side,
}

impl Site {
    pub const fn new(
        name: &'static str,
        (x, y): (f64, f64),
        chainage_m: f64,
        label: &'static str,
        offset_m: f64,
        side: Side,
    ) -> Self {
        Self {
            name,
            x,
            y,
            chainage_m,
            label,
            offset_m,
            side,
        }
    }

    pub fn feature(&self) -> Feature {
        Feature::new(self.name, (self.x, self.y))
    }
}

// ============================================================================
// Axes
// ============================================================================

/// 11.795 km straight axis pointing east.
pub fn eastbound_axis() -> LinearReferenceSystem {
    LinearReferenceSystem::from_vertices(vec![(0.0, 0.0), (11_795.0, 0.0)]).unwrap()
}

/// 100 m straight axis pointing north.
pub fn northbound_axis() -> LinearReferenceSystem {
    LinearReferenceSystem::from_vertices(vec![(0.0, 0.0), (0.0, 100.0)]).unwrap()
}

/// East 3 km, north 4 km, then west 2 km (9 km total).
pub fn hooked_axis() -> LinearReferenceSystem {
    LinearReferenceSystem::from_vertices(vec![
        (0.0, 0.0),
        (3000.0, 0.0),
        (3000.0, 4000.0),
        (1000.0, 4000.0),
    ])
    .unwrap()
}

/// Irregular zig-zag used for property checks.
pub fn zigzag_axis() -> LinearReferenceSystem {
    LinearReferenceSystem::from_vertices(vec![
        (12.5, -3.0),
        (140.25, 61.0),
        (233.0, 7.75),
        (301.5, 120.0),
        (480.0, 95.5),
        (512.0, 300.0),
    ])
    .unwrap()
}

// ============================================================================
// Sites along the hooked axis
// ============================================================================

pub const HOOKED_SITES: &[Site] = &[
    Site::new("BH-01", (1200.0, 35.0), 1200.0, "K1+200", 35.0, Side::Left),
    Site::new("BH-02", (2500.0, -80.0), 2500.0, "K2+500", 80.0, Side::Right),
    Site::new("Fuente Norte", (3150.0, 2000.0), 5000.0, "K5+000", 150.0, Side::Right),
    Site::new("Fuente Sur", (2900.0, 1500.0), 4500.0, "K4+500", 100.0, Side::Left),
    Site::new("ZODME-3", (2000.0, 4250.0), 8000.0, "K8+000", 250.0, Side::Right),
    Site::new("ZODME-4", (1500.0, 3700.0), 8500.0, "K8+500", 300.0, Side::Left),
    Site::new("Inicio", (-400.0, 0.0), 0.0, "K0+000", 400.0, Side::OnAxis),
];

// ============================================================================
// GeoJSON documents
// ============================================================================

pub const HOOKED_AXIS_GEOJSON: &str = r#"{
    "type": "FeatureCollection",
    "features": [
        {"type": "Feature", "properties": {"Name": "eje tramo 6"},
         "geometry": {"type": "MultiLineString", "coordinates": [
            [[0.0, 0.0], [3000.0, 0.0], [3000.0, 4000.0]],
            [[3000.0, 4000.0], [1000.0, 4000.0]]
         ]}}
    ]
}"#;

pub const SOURCES_GEOJSON: &str = r#"{
    "type": "FeatureCollection",
    "features": [
        {"type": "Feature", "properties": {"Name": "Cantera El Alto"},
         "geometry": {"type": "Polygon", "coordinates": [
            [[3100.0, 1900.0], [3200.0, 1900.0], [3200.0, 2100.0], [3100.0, 2100.0], [3100.0, 1900.0]]
         ]}},
        {"type": "Feature", "properties": {"Name": "BH-01"},
         "geometry": {"type": "Point", "coordinates": [1200.0, 35.0]}},
        {"type": "Feature", "properties": {"Name": "Lejana"},
         "geometry": {"type": "Point", "coordinates": [1500.0, -9000.0]}},
        {"type": "Feature", "properties": {},
         "geometry": {"type": "Point", "coordinates": [2000.0, 4250.0]}}
    ]
}"#;
