//! Test fixtures for corridor-chainage.
//!
//! Provides:
//! - Survey sites with hand-checked chainage, offset and side
//! - Axis builders (straight, curved, zig-zag)
//! - GeoJSON documents for loader and pipeline tests

#![allow(dead_code)]

pub mod survey_sites;

pub use survey_sites::*;
