use std::error::Error;
use std::path::{Path, PathBuf};

use clap::Parser;
use rand::rngs::SmallRng;
use rand::SeedableRng;

#[derive(Debug, thiserror::Error)]
#[error("{0}: {1}")]
struct GraphLoadError(PathBuf, #[source] looproute::Error);

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("loop length must be between 1 and 10 km, got {0} km")]
    InvalidDistance(f64),

    #[error("{0}: unknown file format, use --format")]
    UnknownFormat(PathBuf),
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum Format {
    Xml,
    XmlGz,
    XmlBz2,
    Json,
}

impl From<Format> for looproute::osm::FileFormat {
    fn from(f: Format) -> Self {
        match f {
            Format::Xml => Self::Xml,
            Format::XmlGz => Self::XmlGz,
            Format::XmlBz2 => Self::XmlBz2,
            Format::Json => Self::Json,
        }
    }
}

/// Plan circular walking routes over OpenStreetMap data
/// and print them as JSON.
#[derive(Parser)]
struct Cli {
    /// The path to the OSM file (.osm, .osm.gz, .osm.bz2 or Overpass .json)
    osm_file: PathBuf,

    /// Latitude of the start point
    #[arg(allow_negative_numbers = true)]
    lat: f64,

    /// Longitude of the start point
    #[arg(allow_negative_numbers = true)]
    lon: f64,

    /// Desired length of the loops, in kilometers (1 to 10)
    distance_km: f64,

    /// Format of the OSM file, guessed from its extension if not provided
    #[arg(long, value_enum)]
    format: Option<Format>,

    /// Seed of the random number generator, for reproducible results
    #[arg(long)]
    seed: Option<u64>,

    /// Maximum number of returned loops
    #[arg(long, default_value_t = 25)]
    count: usize,

    /// Log per-candidate diagnostics
    #[arg(short, long)]
    verbose: bool,
}

pub fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    colog::default_builder()
        .filter_level(if cli.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .init();

    if !(1.0..=10.0).contains(&cli.distance_km) {
        return Err(CliError::InvalidDistance(cli.distance_km).into());
    }

    let file_format = match cli.format {
        Some(f) => f.into(),
        None => looproute::osm::FileFormat::from_path(&cli.osm_file)
            .ok_or_else(|| CliError::UnknownFormat(cli.osm_file.clone()))?,
    };

    let g = load_graph(&cli.osm_file, file_format)?;
    log::info!("loaded {} nodes from {}", g.len(), cli.osm_file.display());

    let mut rng = match cli.seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_entropy(),
    };

    let options = looproute::PlannerOptions {
        capacity: cli.count,
        ..Default::default()
    };

    let routes = looproute::plan_routes(
        &g,
        cli.lat,
        cli.lon,
        cli.distance_km * 1000.0,
        &options,
        &mut rng,
    )?;

    let summaries: Vec<looproute::RouteSummary> = routes.iter().map(|r| r.summary()).collect();
    println!("{}", serde_json::to_string_pretty(&summaries)?);

    Ok(())
}

fn load_graph<P: AsRef<Path>>(
    path: P,
    file_format: looproute::osm::FileFormat,
) -> Result<looproute::Graph, GraphLoadError> {
    let options = looproute::osm::Options { file_format };
    looproute::osm::load_graph_from_file(&options, path.as_ref())
        .map_err(|e| GraphLoadError(PathBuf::from(path.as_ref()), e))
}
