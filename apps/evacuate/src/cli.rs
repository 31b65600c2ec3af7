//! Command-line arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use evac_core::GeoPoint;
use evac_spatial::{DuplicatePolicy, LoaderConfig};

/// Evacuation router: fastest routes, every tied-optimal path, and the
/// nearest safe facility over a traffic-weighted road network.
#[derive(Parser, Debug)]
#[command(name = "evacuate", version, about)]
pub struct Cli {
    #[command(flatten)]
    pub input: InputArgs,

    #[command(flatten)]
    pub output: OutputArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fastest route(s) between two locations.
    #[command(alias = "1")]
    Route(RouteArgs),
    /// Fastest route to the nearest facility.
    #[command(alias = "2")]
    Nearest(NearestArgs),
}

#[derive(Args, Debug)]
pub struct RouteArgs {
    /// Start location.
    pub from: String,
    /// Destination location.
    pub to: String,
    /// Print one fastest path instead of every tied one.
    #[arg(long)]
    pub single: bool,
}

#[derive(Args, Debug)]
pub struct NearestArgs {
    /// Start location.
    #[arg(required_unless_present = "from_coords")]
    pub from: Option<String>,
    /// Start at the location nearest to this position (needs --coordinates).
    #[arg(long, value_name = "LAT,LON", conflicts_with = "from", allow_hyphen_values = true)]
    pub from_coords: Option<GeoPoint>,
    /// Print every tied path to the facility, not just the first.
    #[arg(long)]
    pub all: bool,
}

#[derive(Args, Debug)]
pub struct InputArgs {
    /// Road table: origin,destination,distance,time,traffic.
    #[arg(long, global = true, default_value = "roads.csv")]
    pub roads: PathBuf,
    /// Facility table; the first column names a location.
    #[arg(long, global = true, default_value = "safezone.csv")]
    pub facilities: PathBuf,
    /// Coordinate table: name,lat,lon.
    #[arg(long, global = true)]
    pub coordinates: Option<PathBuf>,
    /// How to resolve a road listed twice.
    #[arg(long, global = true, value_enum, default_value_t = DuplicateArg::KeepFastest)]
    pub duplicates: DuplicateArg,
    /// Field delimiter of all tables.
    #[arg(long, global = true, default_value_t = ',')]
    pub delimiter: char,
}

impl InputArgs {
    pub fn loader_config(&self) -> anyhow::Result<LoaderConfig> {
        let delimiter = u8::try_from(self.delimiter)
            .ok()
            .filter(u8::is_ascii)
            .ok_or_else(|| anyhow::anyhow!("delimiter {:?} is not a single ASCII character", self.delimiter))?;
        Ok(LoaderConfig { duplicates: self.duplicates.into(), delimiter })
    }
}

#[derive(Args, Debug)]
pub struct OutputArgs {
    /// Also write the route stops as CSV.
    #[arg(long, global = true, value_name = "FILE")]
    pub csv: Option<PathBuf>,
    /// Also write the route as a GeoJSON FeatureCollection.
    #[arg(long, global = true, value_name = "FILE")]
    pub geojson: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum DuplicateArg {
    KeepFastest,
    LastWins,
    Reject,
}

impl From<DuplicateArg> for DuplicatePolicy {
    fn from(arg: DuplicateArg) -> Self {
        match arg {
            DuplicateArg::KeepFastest => DuplicatePolicy::KeepFastest,
            DuplicateArg::LastWins    => DuplicatePolicy::LastWins,
            DuplicateArg::Reject      => DuplicatePolicy::Reject,
        }
    }
}
