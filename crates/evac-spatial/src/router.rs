//! Routing trait and the traffic-aware Dijkstra engine.
//!
//! # Modes
//!
//! [`SearchMode::SinglePath`] keeps one predecessor per node, enough to
//! rebuild one fastest route.  [`SearchMode::AllPaths`] keeps, per node, the
//! *set* of predecessors that reach it with the same best time **and** the
//! same distance, so every tied-optimal route can be enumerated afterwards
//! (see [`crate::paths`]).  A tie on time alone with a different distance is
//! not an alternative.
//!
//! # Cost units
//!
//! Edge costs are fixed-point [`TravelTime`]s, so tie detection compares
//! exact integers.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use tracing::debug;

use evac_core::{Distance, GeoPoint, NodeId, TravelTime};

use crate::network::RoadNetwork;
use crate::paths::{OptimalPaths, reconstruct_single};
use crate::{SpatialError, SpatialResult};

// ── Route ─────────────────────────────────────────────────────────────────────

/// The result of a routing query: the visited locations in order and the
/// route totals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    /// Nodes from source to destination, both included.
    pub nodes: Vec<NodeId>,
    /// Sum of traffic-adjusted edge times.
    pub total_time: TravelTime,
    /// Sum of edge distances.
    pub total_distance: Distance,
}

impl Route {
    /// `true` if the source and destination are the same node.
    pub fn is_trivial(&self) -> bool {
        self.nodes.len() <= 1
    }

    pub fn source(&self) -> Option<NodeId> {
        self.nodes.first().copied()
    }

    pub fn destination(&self) -> Option<NodeId> {
        self.nodes.last().copied()
    }

    /// Location names along the route.
    pub fn names<'n>(&self, network: &'n RoadNetwork) -> Vec<&'n str> {
        self.nodes.iter().map(|&n| network.node_name(n)).collect()
    }

    /// Coordinates along the route; `None` where a location has none.
    pub fn geometry(&self, network: &RoadNetwork) -> Vec<Option<GeoPoint>> {
        self.nodes.iter().map(|&n| network.position(n)).collect()
    }
}

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable routing engine.
///
/// # Thread safety
///
/// Implementations must be `Send + Sync` so one router can serve queries
/// from several threads over the same immutable network.
pub trait Router: Send + Sync {
    /// One fastest route from `from` to `to`.
    ///
    /// `from == to` yields the single-node route; an unreachable target is
    /// [`SpatialError::NoRoute`].
    fn route(&self, network: &RoadNetwork, from: NodeId, to: NodeId) -> SpatialResult<Route>;

    /// Every route tied for fastest with equal total distance.
    fn optimal_routes(&self, network: &RoadNetwork, from: NodeId, to: NodeId) -> SpatialResult<Vec<Route>>;
}

// ── DijkstraRouter ────────────────────────────────────────────────────────────

/// Exact Dijkstra over the CSR road graph, with traffic-adjusted edge times.
pub struct DijkstraRouter;

impl Router for DijkstraRouter {
    fn route(&self, network: &RoadNetwork, from: NodeId, to: NodeId) -> SpatialResult<Route> {
        search(network, from, to, SearchMode::SinglePath)?.route()
    }

    fn optimal_routes(&self, network: &RoadNetwork, from: NodeId, to: NodeId) -> SpatialResult<Vec<Route>> {
        let tree = search(network, from, to, SearchMode::AllPaths)?;
        if !tree.is_reachable() {
            return Err(SpatialError::NoRoute { from, to });
        }
        Ok(tree.optimal_routes().collect())
    }
}

// ── ShortestPathTree ──────────────────────────────────────────────────────────

/// Which predecessor relation a search records.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub enum SearchMode {
    #[default]
    SinglePath,
    AllPaths,
}

/// Predecessor relation built during one search.
#[derive(Debug, Clone)]
pub(crate) enum Predecessors {
    /// `NodeId::INVALID` for unreached nodes and the source.
    Single(Vec<NodeId>),
    /// Empty for unreached nodes and the source.
    Multi(Vec<Vec<NodeId>>),
}

impl Predecessors {
    fn new(mode: SearchMode, n: usize) -> Self {
        match mode {
            SearchMode::SinglePath => Predecessors::Single(vec![NodeId::INVALID; n]),
            SearchMode::AllPaths   => Predecessors::Multi(vec![Vec::new(); n]),
        }
    }

    /// Strict improvement: `via` becomes the only predecessor of `node`.
    #[inline]
    fn replace(&mut self, node: NodeId, via: NodeId) {
        match self {
            Predecessors::Single(prev) => prev[node.index()] = via,
            Predecessors::Multi(prev) => {
                let set = &mut prev[node.index()];
                set.clear();
                set.push(via);
            }
        }
    }

    /// Exact tie: `via` is an alternative predecessor of `node`.
    #[inline]
    fn append(&mut self, node: NodeId, via: NodeId) {
        if let Predecessors::Multi(prev) = self {
            prev[node.index()].push(via);
        }
    }

    pub(crate) fn of(&self, node: NodeId) -> &[NodeId] {
        match self {
            Predecessors::Single(prev) => {
                let p = &prev[node.index()];
                if *p == NodeId::INVALID { &[] } else { std::slice::from_ref(p) }
            }
            Predecessors::Multi(prev) => &prev[node.index()],
        }
    }
}

/// Output of one Dijkstra run: tentative totals plus the predecessor relation.
///
/// The search stops as soon as the target is settled, so only the target's
/// totals (and those of nodes settled before it) are final.
#[derive(Debug, Clone)]
pub struct ShortestPathTree {
    source:   NodeId,
    target:   NodeId,
    mode:     SearchMode,
    time:     Vec<TravelTime>,
    distance: Vec<Distance>,
    pub(crate) predecessors: Predecessors,
}

impl ShortestPathTree {
    pub fn source(&self) -> NodeId { self.source }
    pub fn target(&self) -> NodeId { self.target }
    pub fn mode(&self) -> SearchMode { self.mode }

    /// `true` if the target was reached (always for `source == target`).
    pub fn is_reachable(&self) -> bool {
        self.source == self.target || !self.predecessors.of(self.target).is_empty()
    }

    /// Fastest adjusted time to the target, or `None` if unreachable.
    pub fn total_time(&self) -> Option<TravelTime> {
        self.is_reachable().then(|| self.time[self.target.index()])
    }

    /// Distance along the fastest route, or `None` if unreachable.
    pub fn total_distance(&self) -> Option<Distance> {
        self.is_reachable().then(|| self.distance[self.target.index()])
    }

    /// Best known time to `node`; `TravelTime::INFINITY` if not reached.
    pub fn time_to(&self, node: NodeId) -> TravelTime {
        self.time[node.index()]
    }

    pub fn distance_to(&self, node: NodeId) -> Distance {
        self.distance[node.index()]
    }

    /// Recorded predecessors of `node` (at most one in single-path mode).
    pub fn predecessors(&self, node: NodeId) -> &[NodeId] {
        self.predecessors.of(node)
    }

    /// One fastest route, following the first recorded predecessor of each
    /// node.
    pub fn route(&self) -> SpatialResult<Route> {
        let nodes = reconstruct_single(self)
            .ok_or(SpatialError::NoRoute { from: self.source, to: self.target })?;
        Ok(self.to_route(nodes))
    }

    /// Lazily enumerate every tied-optimal node sequence.
    ///
    /// Yields nothing if the target is unreachable.  Each call starts a fresh
    /// enumeration.  In single-path mode this yields exactly one path.
    pub fn optimal_paths(&self) -> OptimalPaths<'_> {
        OptimalPaths::new(self)
    }

    /// [`optimal_paths`](Self::optimal_paths) wrapped as [`Route`]s.
    pub fn optimal_routes(&self) -> impl Iterator<Item = Route> + '_ {
        self.optimal_paths().map(|nodes| self.to_route(nodes))
    }

    fn to_route(&self, nodes: Vec<NodeId>) -> Route {
        Route {
            nodes,
            total_time: self.time[self.target.index()],
            total_distance: self.distance[self.target.index()],
        }
    }
}

// ── Dijkstra ──────────────────────────────────────────────────────────────────

/// Run Dijkstra from `from`, stopping once `to` is settled.
///
/// Fails with [`SpatialError::NodeNotFound`] if either endpoint does not
/// belong to `network`.  An unreachable target is not an error here; check
/// [`ShortestPathTree::is_reachable`].
pub fn search(
    network: &RoadNetwork,
    from: NodeId,
    to: NodeId,
    mode: SearchMode,
) -> SpatialResult<ShortestPathTree> {
    for node in [from, to] {
        if !network.contains(node) {
            return Err(SpatialError::NodeNotFound(node));
        }
    }
    Ok(dijkstra(network, from, to, mode))
}

/// Unchecked search; both endpoints must be in `network`.
pub(crate) fn dijkstra(
    network: &RoadNetwork,
    from: NodeId,
    to: NodeId,
    mode: SearchMode,
) -> ShortestPathTree {
    let n = network.node_count();
    let mut time         = vec![TravelTime::INFINITY; n];
    let mut distance     = vec![Distance::INFINITY; n];
    let mut settled      = vec![false; n];
    let mut predecessors = Predecessors::new(mode, n);

    time[from.index()] = TravelTime::ZERO;
    distance[from.index()] = Distance::ZERO;

    // Min-heap: (time, node).  NodeId breaks ties deterministically.
    let mut heap: BinaryHeap<Reverse<(TravelTime, NodeId)>> = BinaryHeap::new();
    heap.push(Reverse((TravelTime::ZERO, from)));

    let mut pops = 0usize;
    while let Some(Reverse((cost, node))) = heap.pop() {
        // Skip stale heap entries.
        if settled[node.index()] || cost > time[node.index()] {
            continue;
        }
        settled[node.index()] = true;
        pops += 1;

        if node == to {
            break;
        }

        let here = distance[node.index()];
        for edge in network.out_edges(node) {
            let next = network.edge_to[edge.index()];
            // A settled node can never improve.  Skipping it also keeps
            // zero-cost edges from closing a cycle in the predecessor sets.
            if settled[next.index()] {
                continue;
            }

            // A sum that overflows cannot be told apart from "unreached";
            // never relax or tie on it.
            let (Some(new_time), Some(new_dist)) = (
                cost.checked_add(network.edge_time[edge.index()]),
                here.checked_add(network.edge_distance[edge.index()]),
            ) else {
                continue;
            };

            if new_time < time[next.index()] {
                time[next.index()] = new_time;
                distance[next.index()] = new_dist;
                predecessors.replace(next, node);
                heap.push(Reverse((new_time, next)));
            } else if new_time == time[next.index()] && new_dist == distance[next.index()] {
                predecessors.append(next, node);
            }
        }
    }

    debug!(
        from = %network.node_name(from),
        to = %network.node_name(to),
        ?mode,
        settled = pops,
        time = %time[to.index()],
        "dijkstra finished"
    );

    ShortestPathTree { source: from, target: to, mode, time, distance, predecessors }
}
