//! Command handlers.

use std::io::Write;

use anyhow::{Context, Result, bail};
use tracing::info;

use evac_output::{
    CsvWriter, GeoJsonWriter, NO_FACILITY_MESSAGE, NO_PATH_MESSAGE, OutputWriter, RouteReport,
};
use evac_spatial::{
    DijkstraRouter, LoaderConfig, RoadNetwork, Router, SpatialError, load_facilities_csv,
    load_network, nearest_facility, resolve_facilities,
};

use crate::cli::{Cli, Command, InputArgs, NearestArgs, OutputArgs, RouteArgs};

/// How a successful invocation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Found,
    /// No path to the target, or no reachable facility.
    NotFound,
}

/// Load the tables named in `cli`, answer its query, and print the result to
/// `stdout`.
///
/// "No path" and "no facility" are printed and returned as
/// [`Outcome::NotFound`]; only load and I/O failures are errors.
pub fn run(cli: &Cli, stdout: &mut dyn Write) -> Result<Outcome> {
    let config = cli.input.loader_config()?;
    let (network, load) = load_network(&cli.input.roads, cli.input.coordinates.as_deref(), &config)
        .with_context(|| format!("loading road table {}", cli.input.roads.display()))?;
    if load.rows_skipped > 0 {
        info!(skipped = load.rows_skipped, "some road rows were malformed and ignored");
    }

    let (report, missing) = match &cli.command {
        Command::Route(args) => (route(&network, args)?, NO_PATH_MESSAGE),
        Command::Nearest(args) => (nearest(&network, &cli.input, &config, args)?, NO_FACILITY_MESSAGE),
    };

    let Some(report) = report else {
        writeln!(stdout, "{missing}")?;
        return Ok(Outcome::NotFound);
    };

    write!(stdout, "{report}")?;
    write_files(&cli.output, &report)?;
    Ok(Outcome::Found)
}

fn route(network: &RoadNetwork, args: &RouteArgs) -> Result<Option<RouteReport>> {
    let from = network.resolve(&args.from)?;
    let to = network.resolve(&args.to)?;

    let report = if args.single {
        DijkstraRouter.route(network, from, to).map(|r| RouteReport::for_route(network, &r))
    } else {
        DijkstraRouter.optimal_routes(network, from, to).map(|rs| RouteReport::for_routes(network, &rs))
    };

    match report {
        Ok(report) => Ok(Some(report)),
        Err(SpatialError::NoRoute { .. }) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn nearest(
    network: &RoadNetwork,
    input: &InputArgs,
    config: &LoaderConfig,
    args: &NearestArgs,
) -> Result<Option<RouteReport>> {
    let from = match (&args.from, args.from_coords) {
        (Some(name), _) => network.resolve(name)?,
        (None, Some(pos)) => {
            let Some(node) = network.snap_to_node(pos) else {
                return Err(SpatialError::NoCoordinates)
                    .context("--from-coords needs a --coordinates table");
            };
            let snapped = network.position(node).map_or(0.0, |p| p.distance_m(pos));
            info!(location = network.node_name(node), metres = snapped, "start snapped to network");
            node
        }
        (None, None) => bail!("a start location or --from-coords is required"),
    };

    let names = load_facilities_csv(&input.facilities, config)
        .with_context(|| format!("loading facility table {}", input.facilities.display()))?;
    let facilities = resolve_facilities(network, &names);

    match nearest_facility(network, from, &facilities) {
        Ok(found) => {
            let limit = if args.all { None } else { Some(1) };
            Ok(Some(RouteReport::for_facility(network, &found, limit)))
        }
        Err(SpatialError::NoFacility { .. }) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn write_files(output: &OutputArgs, report: &RouteReport) -> Result<()> {
    if let Some(path) = &output.csv {
        let mut w = CsvWriter::new(path).with_context(|| format!("creating {}", path.display()))?;
        w.write_report(report)?;
        w.finish()?;
    }
    if let Some(path) = &output.geojson {
        let mut w = GeoJsonWriter::new(path).with_context(|| format!("creating {}", path.display()))?;
        w.write_report(report)?;
        w.finish()?;
    }
    Ok(())
}
