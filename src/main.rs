//! Command line front end for corridor chainage.
//!
//! # Usage
//!
//! ```bash
//! chainage info --axis eje.geojson
//! chainage markers --axis eje.geojson --interval 500 --out markers.csv
//! chainage annotate --axis eje.geojson --features fuentes.geojson --radius 5000
//! chainage annotate --axis eje.geojson --features fuentes.geojson --features zodme.geojson
//! ```
//!
//! `annotate` writes a single layer to stdout unless `--out-dir` is given.
//! Several layers go to `<out-dir>/<layer>.csv`, by default in
//! `salidas_<axis name>`.
//!
//! Input coordinates must already be in the planar metric system used for
//! chainage. Set `RUST_LOG=debug` for detailed logging.

use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use corridor_chainage::config::{ChainageConfig, CorridorConfig};
use corridor_chainage::corridor::Corridor;
use corridor_chainage::export;
use corridor_chainage::geojson_input::{self, FeatureOptions};

#[derive(Parser, Debug)]
#[command(name = "chainage", version)]
#[command(about = "Chainage, offset and side of survey features along a corridor axis")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show length, K+ length label and bounds of the axis.
    Info {
        /// Axis GeoJSON file (LineString or MultiLineString)
        #[arg(short, long)]
        axis: PathBuf,
    },
    /// Generate chainage stations at a regular interval.
    Markers {
        #[arg(short, long)]
        axis: PathBuf,

        /// Distance between stations in meters
        #[arg(short, long, default_value_t = 500.0)]
        interval: f64,

        /// Chainage of the first station in meters
        #[arg(long, default_value_t = 0.0)]
        start: f64,

        /// Output CSV file (stdout when omitted)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Project features onto the axis, filter by radius and sort by chainage.
    Annotate {
        #[arg(short, long)]
        axis: PathBuf,

        /// Feature GeoJSON file (points and polygons); repeat for several layers
        #[arg(short, long, required = true)]
        features: Vec<PathBuf>,

        /// JSON config file; command line flags override it
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Search radius in meters
        #[arg(short, long)]
        radius: Option<f64>,

        /// Property holding feature names
        #[arg(long, default_value = "Name")]
        name_field: String,

        /// Project features on all cores
        #[arg(long, default_value_t = false)]
        parallel: bool,

        /// Directory receiving one CSV per layer
        #[arg(short, long)]
        out_dir: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match Args::parse().command {
        Command::Info { axis } => run_info(axis),
        Command::Markers {
            axis,
            interval,
            start,
            out,
        } => run_markers(axis, interval, start, out),
        Command::Annotate {
            axis,
            features,
            config,
            radius,
            name_field,
            parallel,
            out_dir,
        } => {
            let mut config = match config {
                Some(path) => CorridorConfig::from_json_file(&path)
                    .with_context(|| format!("loading config {}", path.display()))?,
                None => CorridorConfig::default(),
            };
            if let Some(radius) = radius {
                config.filter.radius_m = radius;
            }
            config.parallel |= parallel;
            run_annotate(axis, &features, &config, name_field, out_dir)
        }
    }
}

fn load_corridor(axis: &Path) -> Result<Corridor> {
    let polyline = geojson_input::load_axis(axis)
        .with_context(|| format!("loading axis {}", axis.display()))?;
    let name = axis
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("axis");
    Corridor::new(name, polyline).with_context(|| format!("building axis from {}", axis.display()))
}

fn run_info(axis: PathBuf) -> Result<()> {
    let summary = load_corridor(&axis)?.summary()?;
    let (min_x, min_y, max_x, max_y) = summary.bounds;

    println!("Corridor: {}", summary.name);
    println!(
        "Length: {:.2} km ({})",
        summary.length_m / 1000.0,
        summary.length_label
    );
    println!("Vertices: {}", summary.vertex_count);
    println!("Bounds:");
    println!("  X: {min_x:.2} - {max_x:.2}");
    println!("  Y: {min_y:.2} - {max_y:.2}");
    Ok(())
}

fn run_markers(axis: PathBuf, interval: f64, start: f64, out: Option<PathBuf>) -> Result<()> {
    let corridor = load_corridor(&axis)?;
    let chainage = ChainageConfig {
        interval_m: interval,
        start_m: start,
    };
    let stations = corridor
        .markers(&chainage)
        .context("generating chainage markers")?;

    info!(
        length_m = corridor.axis().length(),
        stations = stations.len(),
        "generated stations"
    );

    match out {
        Some(path) => {
            export::save_stations(&path, &stations)
                .with_context(|| format!("writing {}", path.display()))?;
            info!(path = %path.display(), "saved stations");
        }
        None => export::write_stations(io::stdout().lock(), &stations)?,
    }
    Ok(())
}

fn run_annotate(
    axis: PathBuf,
    layers: &[PathBuf],
    config: &CorridorConfig,
    name_field: String,
    out_dir: Option<PathBuf>,
) -> Result<()> {
    let corridor = load_corridor(&axis)?;
    let options = FeatureOptions {
        name_field,
        unnamed_label: config.unnamed_label.clone(),
    };
    let out_dir = match (out_dir, layers) {
        (Some(dir), _) => Some(dir),
        (None, [_]) => None,
        (None, _) => Some(corridor.output_dir()),
    };

    for layer in layers {
        let features = geojson_input::load_features(layer, &options)
            .with_context(|| format!("loading features {}", layer.display()))?;
        let results = corridor
            .annotate(&features, config)
            .with_context(|| format!("projecting {} onto the axis", layer.display()))?;

        match &out_dir {
            Some(dir) => {
                let path = export::layer_path(dir, layer);
                export::save_projections(&path, &results)
                    .with_context(|| format!("writing {}", path.display()))?;
                info!(path = %path.display(), records = results.len(), "saved annotated layer");
            }
            None => export::write_projections(io::stdout().lock(), &results)?,
        }
    }
    Ok(())
}
