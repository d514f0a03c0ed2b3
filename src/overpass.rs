//! Overpass API adapter for pedestrian networks.

use std::collections::HashMap;

use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{PlanError, Result};
use crate::graph::NetworkGraph;
use crate::model::{BoundingBox, GeoPoint};
use crate::traits::GraphProvider;

/// Highway values that are never walkable. Matched as substrings, so
/// `motor` also covers `motorway` and `motorway_link`.
const EXCLUDED_HIGHWAYS: &[&str] = &[
    "abandoned",
    "bus_guideway",
    "construction",
    "cycleway",
    "motor",
    "planned",
    "platform",
    "proposed",
    "raceway",
    "razed",
];

/// Highway values excluded only on an exact match.
const EXCLUDED_EXACT_HIGHWAYS: &[&str] = &["no"];

#[derive(Debug, Clone)]
pub struct OverpassConfig {
    /// Interpreter endpoint, e.g. `https://overpass-api.de/api/interpreter`.
    pub base_url: String,
    /// Client-side request timeout; also sent as the server-side query timeout.
    pub timeout_secs: u64,
    /// Keep every connected component instead of only the largest one.
    pub retain_all: bool,
}

impl Default for OverpassConfig {
    fn default() -> Self {
        Self {
            base_url: "https://overpass-api.de/api/interpreter".to_string(),
            timeout_secs: 30,
            retain_all: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OverpassClient {
    config: OverpassConfig,
    client: reqwest::blocking::Client,
}

impl OverpassClient {
    pub fn new(config: OverpassConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("walk-planner/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &OverpassConfig {
        &self.config
    }
}

impl GraphProvider for OverpassClient {
    fn graph_for(&self, bbox: &BoundingBox) -> Result<NetworkGraph> {
        let query = walk_query(bbox, self.config.timeout_secs);
        debug!("Overpass query:\n{}", query);
        info!("Requesting walk network for {}", bbox);

        let body = self
            .client
            .get(&self.config.base_url)
            .query(&[("data", query.as_str())])
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.json::<OverpassResponse>())?;

        debug!("Received {} OSM elements", body.elements.len());
        build_graph(&body, bbox, self.config.retain_all)
    }
}

/// Overpass QL for every walkable way inside `bbox`, with its nodes.
pub fn walk_query(bbox: &BoundingBox, timeout_secs: u64) -> String {
    format!(
        r#"[out:json][timeout:{timeout}];
(
  way["highway"]["area"!="yes"]["highway"!~"{excluded}"]["foot"!="no"]["service"!="private"]["access"!="private"]
    ({s:.7},{w:.7},{n:.7},{e:.7});
);
(._;>;);
out body;"#,
        timeout = timeout_secs,
        excluded = excluded_pattern(),
        s = bbox.south,
        w = bbox.west,
        n = bbox.north,
        e = bbox.east,
    )
}

fn excluded_pattern() -> String {
    EXCLUDED_HIGHWAYS
        .iter()
        .map(|value| value.to_string())
        .chain(EXCLUDED_EXACT_HIGHWAYS.iter().map(|value| format!("^{}$", value)))
        .collect::<Vec<_>>()
        .join("|")
}

/// Builds the walking graph from an Overpass response.
///
/// Every consecutive node pair of a walkable way becomes one edge. Nodes
/// outside `bbox` are dropped and, unless `retain_all` is set, only the
/// largest connected component is kept.
pub fn build_graph(
    response: &OverpassResponse,
    bbox: &BoundingBox,
    retain_all: bool,
) -> Result<NetworkGraph> {
    let coords: HashMap<i64, GeoPoint> = response
        .elements
        .iter()
        .filter(|elem| elem.elem_type == "node")
        .filter_map(|elem| Some((elem.id, GeoPoint::new(elem.lat?, elem.lon?))))
        .collect();

    let mut graph = NetworkGraph::new();
    let mut way_count = 0;
    for elem in &response.elements {
        if elem.elem_type != "way" || !is_walkable(&elem.tags) {
            continue;
        }
        let Some(node_ids) = elem.nodes.as_ref() else {
            continue;
        };

        for window in node_ids.windows(2) {
            let (Some(&p1), Some(&p2)) = (coords.get(&window[0]), coords.get(&window[1])) else {
                continue;
            };
            graph.add_node(window[0], p1);
            graph.add_node(window[1], p2);
            graph.add_edge(window[0], window[1]);
        }
        way_count += 1;
    }

    let mut graph = graph.truncated_to(bbox);
    if !retain_all {
        graph = graph.largest_component();
    }

    info!(
        "Built walk graph with {} nodes and {} edges from {} ways",
        graph.node_count(),
        graph.edge_count(),
        way_count
    );

    if graph.is_empty() {
        return Err(PlanError::EmptyGraphRegion(*bbox));
    }
    Ok(graph)
}

fn is_walkable(tags: &HashMap<String, String>) -> bool {
    let Some(highway) = tags.get("highway") else {
        return false;
    };
    if EXCLUDED_HIGHWAYS.iter().any(|excluded| highway.contains(excluded))
        || EXCLUDED_EXACT_HIGHWAYS.contains(&highway.as_str())
    {
        return false;
    }
    let tag_is = |key: &str, value: &str| tags.get(key).is_some_and(|v| v == value);
    !(tag_is("area", "yes")
        || tag_is("foot", "no")
        || tag_is("service", "private")
        || tag_is("access", "private"))
}

#[derive(Debug, Deserialize)]
pub struct OverpassResponse {
    pub elements: Vec<OsmElement>,
}

#[derive(Debug, Deserialize)]
pub struct OsmElement {
    #[serde(rename = "type")]
    pub elem_type: String,
    pub id: i64,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub nodes: Option<Vec<i64>>,
    #[serde(default)]
    pub tags: HashMap<String, String>,
}
