//! Nearest-facility selection.
//!
//! One all-paths Dijkstra run per candidate facility; the facility with the
//! lowest adjusted travel time wins.  Among facilities with exactly equal
//! time, the one listed first wins.

use tracing::debug;

use evac_core::{Distance, NodeId, TravelTime};

use crate::network::RoadNetwork;
use crate::paths::OptimalPaths;
use crate::router::{Route, SearchMode, ShortestPathTree, dijkstra};
use crate::{SpatialError, SpatialResult};

/// The winning facility and the search that reached it.
#[derive(Debug, Clone)]
pub struct FacilityMatch {
    pub facility: NodeId,
    /// Position of `facility` in the candidate list.
    pub rank: usize,
    /// All-paths search tree from the source to `facility`.
    pub tree: ShortestPathTree,
}

impl FacilityMatch {
    fn from_tree(rank: usize, tree: ShortestPathTree) -> Option<Self> {
        tree.is_reachable()
            .then(|| FacilityMatch { facility: tree.target(), rank, tree })
    }

    pub fn total_time(&self) -> TravelTime {
        self.tree.time_to(self.facility)
    }

    pub fn total_distance(&self) -> Distance {
        self.tree.distance_to(self.facility)
    }

    /// The first fastest route to the facility.
    pub fn route(&self) -> SpatialResult<Route> {
        self.tree.route()
    }

    /// Every tied-optimal path to the facility.
    pub fn optimal_paths(&self) -> OptimalPaths<'_> {
        self.tree.optimal_paths()
    }
}

/// Map facility names onto `network`, dropping names it does not contain.
///
/// Relative order is preserved, so the first-listed-wins tie rule still
/// follows the order of `names`.
pub fn resolve_facilities<S: AsRef<str>>(network: &RoadNetwork, names: &[S]) -> Vec<NodeId> {
    names
        .iter()
        .filter_map(|name| {
            let name = name.as_ref();
            let id = network.node_id(name);
            if id.is_none() {
                debug!(facility = name, "facility is not on the road network; skipped");
            }
            id
        })
        .collect()
}

/// Find the facility in `facilities` with the fastest route from `from`.
///
/// Fails with [`SpatialError::NoFacility`] if none is reachable (including an
/// empty list) and with [`SpatialError::NodeNotFound`] if any id does not
/// belong to `network`.
pub fn nearest_facility(
    network: &RoadNetwork,
    from: NodeId,
    facilities: &[NodeId],
) -> SpatialResult<FacilityMatch> {
    if let Some(&bad) = std::iter::once(&from)
        .chain(facilities)
        .find(|&&n| !network.contains(n))
    {
        return Err(SpatialError::NodeNotFound(bad));
    }

    #[cfg(not(feature = "parallel"))]
    let best = {
        let mut best: Option<FacilityMatch> = None;
        for (rank, &facility) in facilities.iter().enumerate() {
            let tree = dijkstra(network, from, facility, SearchMode::AllPaths);
            let Some(candidate) = FacilityMatch::from_tree(rank, tree) else {
                debug!(facility = %network.node_name(facility), "facility unreachable");
                continue;
            };
            if best.as_ref().is_none_or(|b| candidate.total_time() < b.total_time()) {
                best = Some(candidate);
            }
        }
        best
    };

    #[cfg(feature = "parallel")]
    let best = {
        use rayon::prelude::*;

        // (time, rank) is unique per candidate, so the reduction picks the
        // same facility the sequential loop would.
        facilities
            .par_iter()
            .enumerate()
            .filter_map(|(rank, &facility)| {
                FacilityMatch::from_tree(rank, dijkstra(network, from, facility, SearchMode::AllPaths))
            })
            .min_by_key(|m| (m.total_time(), m.rank))
    };

    match best {
        Some(m) => {
            debug!(
                from = %network.node_name(from),
                facility = %network.node_name(m.facility),
                time = %m.total_time(),
                "nearest facility"
            );
            Ok(m)
        }
        None => Err(SpatialError::NoFacility { from }),
    }
}
