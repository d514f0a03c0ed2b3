//! Plain data types passed between the planning stages.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::haversine;

/// Tolerance used by [`GeoPoint::approx_eq`], in degrees (~1 cm at the equator).
pub const COORD_EPSILON_DEG: f64 = 1e-7;

/// Identifier of a node in a [`crate::graph::NetworkGraph`].
///
/// For graphs built from OpenStreetMap this is the OSM node id.
pub type NodeId = i64;

/// A WGS84 latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Coordinate equality within [`COORD_EPSILON_DEG`].
    pub fn approx_eq(&self, other: &GeoPoint) -> bool {
        (self.lat - other.lat).abs() <= COORD_EPSILON_DEG
            && (self.lon - other.lon).abs() <= COORD_EPSILON_DEG
    }

    /// Great-circle distance to `other` in meters.
    pub fn distance_m(&self, other: &GeoPoint) -> f64 {
        haversine::distance_m(*self, *other)
    }

    /// Point reached by travelling `distance_m` meters along `bearing_deg`.
    pub fn destination(&self, bearing_deg: f64, distance_m: f64) -> GeoPoint {
        haversine::destination(*self, bearing_deg, distance_m)
    }

    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }
}

impl From<(f64, f64)> for GeoPoint {
    fn from((lat, lon): (f64, f64)) -> Self {
        Self { lat, lon }
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}

/// Ordered waypoints of a tour. Index 0 is always the home point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaypointSequence {
    points: Vec<GeoPoint>,
}

impl WaypointSequence {
    /// Starts a sequence at `origin`.
    pub fn starting_at(origin: GeoPoint) -> Self {
        Self {
            points: vec![origin],
        }
    }

    pub fn from_points(points: Vec<GeoPoint>) -> Self {
        Self { points }
    }

    pub fn push(&mut self, point: GeoPoint) {
        self.points.push(point);
    }

    pub fn origin(&self) -> Option<GeoPoint> {
        self.points.first().copied()
    }

    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    pub fn into_points(self) -> Vec<GeoPoint> {
        self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Smallest box containing every point, or `None` for an empty sequence.
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        BoundingBox::enclosing(&self.points)
    }
}

/// Graph node bound to each waypoint, indexed like the [`WaypointSequence`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeBinding {
    nodes: Vec<NodeId>,
}

impl NodeBinding {
    pub fn new(nodes: Vec<NodeId>) -> Self {
        Self { nodes }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Consecutive node pairs of the closed tour, ending back at the first node.
    pub fn cycle_pairs(&self) -> Vec<(NodeId, NodeId)> {
        let n = self.nodes.len();
        (0..n)
            .map(|i| (self.nodes[i], self.nodes[(i + 1) % n]))
            .collect()
    }
}

/// Latitude/longitude box.
///
/// A box with `west > east` crosses the antimeridian and covers the
/// longitudes from `west` up to 180 and from -180 up to `east`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl BoundingBox {
    pub fn new(south: f64, west: f64, north: f64, east: f64) -> Self {
        Self {
            south,
            west,
            north,
            east,
        }
    }

    /// Smallest box holding every point.
    ///
    /// Longitudes are covered by the shortest arc, so points either side of
    /// the antimeridian give a box that crosses it.
    pub fn enclosing(points: &[GeoPoint]) -> Option<Self> {
        let first = points.first()?;
        let mut south = first.lat;
        let mut north = first.lat;
        for p in &points[1..] {
            south = south.min(p.lat);
            north = north.max(p.lat);
        }

        let mut lons: Vec<f64> = points.iter().map(|p| p.lon).collect();
        lons.sort_by(f64::total_cmp);
        let (Some(&min), Some(&max)) = (lons.first(), lons.last()) else {
            return None;
        };

        // The box is the complement of the widest gap between neighbouring
        // longitudes. The gap across the antimeridian wins ties.
        let (mut west, mut east) = (min, max);
        let mut widest_gap = min + 360.0 - max;
        for pair in lons.windows(2) {
            let gap = pair[1] - pair[0];
            if gap > widest_gap {
                widest_gap = gap;
                west = pair[1];
                east = pair[0];
            }
        }

        Some(Self::new(south, west, north, east))
    }

    pub fn south_west(&self) -> GeoPoint {
        GeoPoint::new(self.south, self.west)
    }

    pub fn north_east(&self) -> GeoPoint {
        GeoPoint::new(self.north, self.east)
    }

    pub fn crosses_antimeridian(&self) -> bool {
        self.west > self.east
    }

    /// Longitude width in degrees, measured eastwards from `west`.
    pub fn lon_span(&self) -> f64 {
        if self.crosses_antimeridian() {
            self.east - self.west + 360.0
        } else {
            self.east - self.west
        }
    }

    /// Pushes the south-west corner `margin_m` meters along bearing 225°
    /// and the north-east corner along bearing 45°.
    ///
    /// A corner pushed past a pole is clamped to it and the box then spans
    /// every longitude, as it does when the widened box would wrap onto
    /// itself.
    pub fn expand_by_meters(&self, margin_m: f64) -> Self {
        if margin_m <= 0.0 {
            return *self;
        }
        let sw = self.south_west().destination(225.0, margin_m);
        let ne = self.north_east().destination(45.0, margin_m);

        let over_south_pole = sw.lat > self.south;
        let over_north_pole = ne.lat < self.north;
        let south = if over_south_pole { -90.0 } else { sw.lat };
        let north = if over_north_pole { 90.0 } else { ne.lat };

        let grow_west = (self.west - sw.lon).rem_euclid(360.0);
        let grow_east = (ne.lon - self.east).rem_euclid(360.0);
        let wraps = self.lon_span() + grow_west + grow_east >= 360.0;
        if over_south_pole || over_north_pole || wraps {
            return Self::new(south, -180.0, north, 180.0);
        }

        Self::new(south, sw.lon, north, ne.lon)
    }

    pub fn contains(&self, point: &GeoPoint) -> bool {
        if point.lat < self.south || point.lat > self.north {
            return false;
        }
        if self.crosses_antimeridian() {
            point.lon >= self.west || point.lon <= self.east
        } else {
            point.lon >= self.west && point.lon <= self.east
        }
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{:.6},{:.6} .. {:.6},{:.6}]",
            self.south, self.west, self.north, self.east
        )
    }
}
