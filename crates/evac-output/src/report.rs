//! Network-independent description of a query result.
//!
//! A [`RouteReport`] copies names, coordinates, and per-step totals out of the
//! [`RoadNetwork`], so writers never need the network itself.

use std::fmt;

use evac_core::{Distance, GeoPoint, TrafficCondition, TravelTime};
use evac_spatial::{FacilityMatch, RoadNetwork, Route};

/// Unit labels used in console output.  The engine itself is unit-agnostic;
/// these match the shipped road tables.
pub const TIME_UNIT: &str = "minutes";
pub const DISTANCE_UNIT: &str = "km";

pub const NO_PATH_MESSAGE: &str = "No valid path found.";
pub const NO_FACILITY_MESSAGE: &str = "No hospital path found.";

/// One location along a path.
#[derive(Debug, Clone, PartialEq)]
pub struct Stop {
    pub name: String,
    pub position: Option<GeoPoint>,
    /// Time from the path's first stop.
    pub elapsed_time: TravelTime,
    /// Distance from the path's first stop.
    pub elapsed_distance: Distance,
    /// Condition of the road used to arrive here; `None` for the first stop.
    pub traffic: Option<TrafficCondition>,
}

/// What kind of query produced a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportKind {
    /// Point-to-point query; every tied-optimal path is listed.
    Route,
    /// Point-to-point query answered with one fastest path.
    SinglePath,
    /// Nearest-facility query.
    Nearest { facility: String },
}

/// Result of one query.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteReport {
    pub kind: ReportKind,
    pub total_time: TravelTime,
    pub total_distance: Distance,
    /// At least one path; all share `total_time` and `total_distance`.
    pub paths: Vec<Vec<Stop>>,
}

impl RouteReport {
    /// Report for a point-to-point query.  `routes` must be non-empty and
    /// share their totals, as [`evac_spatial::Router::optimal_routes`] returns.
    pub fn for_routes(network: &RoadNetwork, routes: &[Route]) -> Self {
        let (total_time, total_distance) = routes
            .first()
            .map_or((TravelTime::ZERO, Distance::ZERO), |r| (r.total_time, r.total_distance));
        Self {
            kind: ReportKind::Route,
            total_time,
            total_distance,
            paths: routes.iter().map(|r| stops(network, r)).collect(),
        }
    }

    /// Report for a point-to-point query answered with one fastest path.
    pub fn for_route(network: &RoadNetwork, route: &Route) -> Self {
        Self {
            kind: ReportKind::SinglePath,
            total_time: route.total_time,
            total_distance: route.total_distance,
            paths: vec![stops(network, route)],
        }
    }

    /// Report for a nearest-facility query.  `limit` caps how many of the
    /// tied-optimal paths to the winner are included; `Some(1)` keeps only
    /// the first.
    pub fn for_facility(network: &RoadNetwork, found: &FacilityMatch, limit: Option<usize>) -> Self {
        let routes: Vec<Route> = found
            .tree
            .optimal_routes()
            .take(limit.unwrap_or(usize::MAX))
            .collect();
        Self {
            kind: ReportKind::Nearest { facility: network.node_name(found.facility).to_owned() },
            total_time: found.total_time(),
            total_distance: found.total_distance(),
            paths: routes.iter().map(|r| stops(network, r)).collect(),
        }
    }

    pub fn facility(&self) -> Option<&str> {
        match &self.kind {
            ReportKind::Nearest { facility } => Some(facility),
            ReportKind::Route | ReportKind::SinglePath => None,
        }
    }
}

/// Walk a route and accumulate per-step totals.
fn stops(network: &RoadNetwork, route: &Route) -> Vec<Stop> {
    let mut elapsed_time = TravelTime::ZERO;
    let mut elapsed_distance = Distance::ZERO;
    let mut prev = None;

    route
        .nodes
        .iter()
        .map(|&node| {
            let traffic = prev
                .and_then(|p| network.edge_between(p, node))
                .map(|e| {
                    elapsed_time = elapsed_time + network.edge_time[e.index()];
                    elapsed_distance = elapsed_distance + network.edge_distance[e.index()];
                    network.edge_traffic[e.index()]
                });
            prev = Some(node);
            Stop {
                name: network.node_name(node).to_owned(),
                position: network.position(node),
                elapsed_time,
                elapsed_distance,
                traffic,
            }
        })
        .collect()
}

/// ` -> `-joined stop names.
pub fn join_path(path: &[Stop]) -> String {
    path.iter().map(|s| s.name.as_str()).collect::<Vec<_>>().join(" -> ")
}

/// Console rendering.
///
/// ```text
/// Fastest evacuation time: 17.5 minutes
/// Shortest distance: 20 km
/// All optimal paths:
/// A -> B -> C
/// ```
///
/// A single-path report prints `Path: A -> B -> C` in place of the list.
/// A nearest-facility report keeps the line prefixes downstream map front
/// ends parse (`Nearest Hospital:`, `Path:`, a bare number after
/// `Distance:`):
///
/// ```text
/// Nearest Hospital: Hospital
/// Path: A -> B -> Hospital
/// Distance: 20
/// Total Time: 17.5 minutes
/// ```
impl fmt::Display for RouteReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ReportKind::Route | ReportKind::SinglePath => {
                writeln!(f, "Fastest evacuation time: {} {TIME_UNIT}", self.total_time)?;
                writeln!(f, "Shortest distance: {} {DISTANCE_UNIT}", self.total_distance)?;
                if self.kind == ReportKind::Route {
                    writeln!(f, "All optimal paths:")?;
                    for path in &self.paths {
                        writeln!(f, "{}", join_path(path))?;
                    }
                } else {
                    for path in &self.paths {
                        writeln!(f, "Path: {}", join_path(path))?;
                    }
                }
            }
            ReportKind::Nearest { facility } => {
                writeln!(f, "Nearest Hospital: {facility}")?;
                for path in &self.paths {
                    writeln!(f, "Path: {}", join_path(path))?;
                }
                writeln!(f, "Distance: {}", self.total_distance)?;
                writeln!(f, "Total Time: {} {TIME_UNIT}", self.total_time)?;
            }
        }
        Ok(())
    }
}
