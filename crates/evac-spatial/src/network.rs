//! Road network representation and builder.
//!
//! # Data layout
//!
//! Location names are interned to dense `NodeId`s.  Edges use **Compressed
//! Sparse Row (CSR)** format; the outgoing edges of `NodeId n` occupy:
//!
//! ```text
//! edge_to[ node_out_start[n] .. node_out_start[n+1] ]
//! ```
//!
//! Each node's edges are sorted by destination, so [`RoadNetwork::edge_between`]
//! is a binary search.  Every road is stored in both directions with identical
//! adjusted time and distance.
//!
//! # Spatial index
//!
//! Locations that have a coordinate are bulk-loaded into an R-tree (via
//! `rstar`) so a raw `lat,lon` position can be snapped onto the network.

use rstar::{AABB, PointDistance, RTree, RTreeObject};
use rustc_hash::FxHashMap;
use tracing::warn;

use evac_core::{Distance, EdgeId, GeoPoint, NodeId, TrafficCondition, TravelTime};

use crate::{SpatialError, SpatialResult};

// ── R-tree node entry ─────────────────────────────────────────────────────────

/// Entry stored in the R-tree spatial index: a `[lat, lon]` point with the
/// associated `NodeId`.
#[derive(Clone)]
struct NodeEntry {
    point: [f64; 2],
    id: NodeId,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    /// Squared Euclidean distance in lat/lon space.  Good enough to pick the
    /// nearest node within a city.
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dlat = self.point[0] - point[0];
        let dlon = self.point[1] - point[1];
        dlat * dlat + dlon * dlon
    }
}

// ── RoadNetwork ───────────────────────────────────────────────────────────────

/// Undirected road graph in CSR format, keyed by interned location names.
///
/// Immutable once built; share it freely across threads.  Do not construct
/// directly; use [`RoadNetworkBuilder`].
pub struct RoadNetwork {
    // ── Node data ─────────────────────────────────────────────────────────
    node_names: Vec<String>,
    node_index: FxHashMap<String, NodeId>,
    node_pos:   Vec<Option<GeoPoint>>,

    // ── CSR edge adjacency ────────────────────────────────────────────────
    /// CSR row pointer.  Length = `node_count + 1`.
    pub node_out_start: Vec<u32>,

    // ── Edge data (indexed by EdgeId) ─────────────────────────────────────
    pub edge_from:     Vec<NodeId>,
    pub edge_to:       Vec<NodeId>,
    /// Traffic-adjusted travel time.  Used as Dijkstra edge cost.
    pub edge_time:     Vec<TravelTime>,
    pub edge_distance: Vec<Distance>,
    pub edge_traffic:  Vec<TrafficCondition>,

    spatial_idx: RTree<NodeEntry>,
}

impl RoadNetwork {
    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.node_names.len()
    }

    /// Number of directed edges (two per road, one per self-loop).
    pub fn edge_count(&self) -> usize {
        self.edge_to.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_names.is_empty()
    }

    // ── Names ─────────────────────────────────────────────────────────────

    /// Look up the `NodeId` of a location name.
    pub fn node_id(&self, name: &str) -> Option<NodeId> {
        self.node_index.get(name).copied()
    }

    /// Like [`node_id`](Self::node_id), but an unknown name is an error.
    pub fn resolve(&self, name: &str) -> SpatialResult<NodeId> {
        self.node_id(name)
            .ok_or_else(|| SpatialError::UnknownLocation(name.to_owned()))
    }

    /// Location name of `node`.
    ///
    /// # Panics
    ///
    /// If `node` was not produced by this network.
    pub fn node_name(&self, node: NodeId) -> &str {
        &self.node_names[node.index()]
    }

    #[inline]
    pub fn contains(&self, node: NodeId) -> bool {
        node.index() < self.node_count()
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    /// Iterator over the `EdgeId`s of all outgoing edges from `node`.
    #[inline]
    pub fn out_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        (start..end).map(|i| EdgeId(i as u32))
    }

    #[inline]
    pub fn out_degree(&self, node: NodeId) -> usize {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        end - start
    }

    /// `(neighbor, adjusted time, distance)` for every road leaving `node`.
    pub fn neighbors(&self, node: NodeId) -> impl Iterator<Item = (NodeId, TravelTime, Distance)> + '_ {
        self.out_edges(node).map(|e| {
            let i = e.index();
            (self.edge_to[i], self.edge_time[i], self.edge_distance[i])
        })
    }

    /// The directed edge `from → to`, if the two locations share a road.
    pub fn edge_between(&self, from: NodeId, to: NodeId) -> Option<EdgeId> {
        let start = self.node_out_start[from.index()] as usize;
        let end   = self.node_out_start[from.index() + 1] as usize;
        self.edge_to[start..end]
            .binary_search(&to)
            .ok()
            .map(|offset| EdgeId((start + offset) as u32))
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// Coordinate of `node`, if one was loaded.
    pub fn position(&self, node: NodeId) -> Option<GeoPoint> {
        self.node_pos.get(node.index()).copied().flatten()
    }

    /// `true` if at least one node has a coordinate.
    pub fn has_positions(&self) -> bool {
        self.spatial_idx.size() > 0
    }

    /// Return the `NodeId` of the nearest located node to `pos`.
    ///
    /// Returns `None` if no node has a coordinate.
    pub fn snap_to_node(&self, pos: GeoPoint) -> Option<NodeId> {
        self.spatial_idx
            .nearest_neighbor(&[pos.lat, pos.lon])
            .map(|e| e.id)
    }

    /// Return up to `k` nearest located nodes to `pos`, by ascending distance.
    pub fn k_nearest_nodes(&self, pos: GeoPoint, k: usize) -> Vec<NodeId> {
        self.spatial_idx
            .nearest_neighbor_iter(&[pos.lat, pos.lon])
            .take(k)
            .map(|e| e.id)
            .collect()
    }
}

// ── DuplicatePolicy ───────────────────────────────────────────────────────────

/// What to do when a road table lists the same pair of locations twice.
///
/// Rows `A,B,…` and `B,A,…` describe the same undirected road and collide.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub enum DuplicatePolicy {
    /// Keep the road with the lower adjusted time; on a tie, the shorter one.
    #[default]
    KeepFastest,
    /// The later row replaces the earlier one.
    LastWins,
    /// Fail with [`SpatialError::DuplicateEdge`].
    Reject,
}

// ── RoadNetworkBuilder ────────────────────────────────────────────────────────

/// Construct a [`RoadNetwork`] incrementally, then call [`build`](Self::build).
///
/// # Example
///
/// ```
/// use evac_spatial::RoadNetworkBuilder;
///
/// let mut b = RoadNetworkBuilder::new();
/// b.add_road_by_name("Depot", "School", 10.0, 5.0, 1.0).unwrap();
/// b.add_road_by_name("School", "Hospital", 10.0, 5.0, 3.0).unwrap();
/// let net = b.build();
/// assert_eq!(net.node_count(), 3);
/// assert_eq!(net.edge_count(), 4); // bidirectional
/// ```
pub struct RoadNetworkBuilder {
    names:      Vec<String>,
    index:      FxHashMap<String, NodeId>,
    positions:  Vec<Option<GeoPoint>>,
    roads:      Vec<RawRoad>,
    road_index: FxHashMap<(NodeId, NodeId), usize>,
    policy:     DuplicatePolicy,
    duplicates: usize,
}

struct RawRoad {
    a:        NodeId,
    b:        NodeId,
    time:     TravelTime,
    distance: Distance,
    traffic:  TrafficCondition,
}

impl RoadNetworkBuilder {
    pub fn new() -> Self {
        Self::with_capacity(0, 0)
    }

    /// Pre-allocate for the expected number of locations and roads.
    pub fn with_capacity(nodes: usize, roads: usize) -> Self {
        Self {
            names:      Vec::with_capacity(nodes),
            index:      FxHashMap::default(),
            positions:  Vec::with_capacity(nodes),
            roads:      Vec::with_capacity(roads),
            road_index: FxHashMap::default(),
            policy:     DuplicatePolicy::default(),
            duplicates: 0,
        }
    }

    pub fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Return the `NodeId` of `name`, adding it if unseen.  Ids are
    /// sequential from 0 in order of first appearance.
    pub fn intern(&mut self, name: &str) -> NodeId {
        if let Some(&id) = self.index.get(name) {
            return id;
        }
        let id = NodeId(self.names.len() as u32);
        self.names.push(name.to_owned());
        self.index.insert(name.to_owned(), id);
        self.positions.push(None);
        id
    }

    pub fn node_id(&self, name: &str) -> Option<NodeId> {
        self.index.get(name).copied()
    }

    /// Attach a coordinate to a location added earlier.
    pub fn set_position(&mut self, node: NodeId, pos: GeoPoint) {
        self.positions[node.index()] = Some(pos);
    }

    /// Add an undirected road between `a` and `b`.
    ///
    /// `base_time` is the free-flow travel time; the stored edge cost is
    /// `traffic.apply(base_time)`.  A repeated pair is resolved by the
    /// builder's [`DuplicatePolicy`].
    pub fn add_road(
        &mut self,
        a: NodeId,
        b: NodeId,
        distance: Distance,
        base_time: TravelTime,
        traffic: TrafficCondition,
    ) -> SpatialResult<()> {
        let road = RawRoad { a, b, time: traffic.apply(base_time), distance, traffic };
        let key = (a.min(b), a.max(b));

        let Some(&slot) = self.road_index.get(&key) else {
            self.road_index.insert(key, self.roads.len());
            self.roads.push(road);
            return Ok(());
        };

        self.duplicates += 1;
        let (name_a, name_b) = (&self.names[a.index()], &self.names[b.index()]);
        let existing = &self.roads[slot];
        let replace = match self.policy {
            DuplicatePolicy::Reject => {
                return Err(SpatialError::DuplicateEdge { a: name_a.clone(), b: name_b.clone() });
            }
            DuplicatePolicy::LastWins => true,
            DuplicatePolicy::KeepFastest => {
                (road.time, road.distance) < (existing.time, existing.distance)
            }
        };
        warn!(
            a = %name_a,
            b = %name_b,
            policy = ?self.policy,
            replaced = replace,
            "duplicate road"
        );
        if replace {
            self.roads[slot] = road;
        }
        Ok(())
    }

    /// Convenience: intern both names and add a road from raw table values.
    ///
    /// Fails with [`SpatialError::Value`] on a negative or non-finite
    /// distance or time.
    pub fn add_road_by_name(
        &mut self,
        a: &str,
        b: &str,
        distance: f64,
        base_time: f64,
        traffic_code: f64,
    ) -> SpatialResult<()> {
        let distance  = Distance::from_f64(distance)?;
        let base_time = TravelTime::from_f64(base_time)?;
        let traffic   = TrafficCondition::from_code(traffic_code);
        let a = self.intern(a);
        let b = self.intern(b);
        self.add_road(a, b, distance, base_time, traffic)
    }

    pub fn node_count(&self) -> usize { self.names.len() }
    pub fn road_count(&self) -> usize { self.roads.len() }

    /// Number of rows that collided with an earlier road.
    pub fn duplicate_count(&self) -> usize { self.duplicates }

    /// Consume the builder and produce a [`RoadNetwork`].
    ///
    /// Time complexity: O(E log E) for the edge sort + O(N log N) for the
    /// R-tree bulk load.
    pub fn build(self) -> RoadNetwork {
        let node_count = self.names.len();

        // Expand each road into its two directions (one for a self-loop).
        let mut directed: Vec<(NodeId, NodeId, &RawRoad)> = Vec::with_capacity(self.roads.len() * 2);
        for road in &self.roads {
            directed.push((road.a, road.b, road));
            if road.a != road.b {
                directed.push((road.b, road.a, road));
            }
        }
        directed.sort_unstable_by_key(|&(from, to, _)| (from, to));

        let edge_from:     Vec<NodeId>           = directed.iter().map(|d| d.0).collect();
        let edge_to:       Vec<NodeId>           = directed.iter().map(|d| d.1).collect();
        let edge_time:     Vec<TravelTime>       = directed.iter().map(|d| d.2.time).collect();
        let edge_distance: Vec<Distance>         = directed.iter().map(|d| d.2.distance).collect();
        let edge_traffic:  Vec<TrafficCondition> = directed.iter().map(|d| d.2.traffic).collect();

        let mut node_out_start = vec![0u32; node_count + 1];
        for from in &edge_from {
            node_out_start[from.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }
        debug_assert_eq!(node_out_start[node_count] as usize, edge_to.len());

        let entries: Vec<NodeEntry> = self
            .positions
            .iter()
            .enumerate()
            .filter_map(|(i, pos)| {
                pos.map(|p| NodeEntry { point: [p.lat, p.lon], id: NodeId(i as u32) })
            })
            .collect();
        let spatial_idx = RTree::bulk_load(entries);

        RoadNetwork {
            node_names: self.names,
            node_index: self.index,
            node_pos: self.positions,
            node_out_start,
            edge_from,
            edge_to,
            edge_time,
            edge_distance,
            edge_traffic,
            spatial_idx,
        }
    }
}

impl Default for RoadNetworkBuilder {
    fn default() -> Self {
        Self::new()
    }
}
