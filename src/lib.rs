//! corridor-chainage core
//!
//! Linear referencing of survey features against a corridor axis: chainage
//! labels in K+ notation, perpendicular offsets, side of axis and regularly
//! spaced stations. All geometry is expected in one planar metric system.

pub mod error;
pub mod polyline;
pub mod linear_ref;
pub mod chainage;
pub mod feature;
pub mod projector;
pub mod filter;
pub mod config;
pub mod corridor;
pub mod geojson_input;
pub mod export;

pub use chainage::{Station, format_chainage, generate_markers, parse_chainage};
pub use error::ChainageError;
pub use feature::Feature;
pub use filter::{filter_by_radius, sort_by_chainage};
pub use linear_ref::{AxisProjection, LinearReferenceSystem, Side};
pub use polyline::Polyline;
pub use projector::{ProjectionResult, project_all, project_all_par};
