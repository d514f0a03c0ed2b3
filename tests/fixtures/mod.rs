//! Test fixtures for walk-planner.
//!
//! Provides:
//! - An Overpass response for an 11x11 street grid centred on Exeter
//!   (`overpass/api/interpreter`, laid out so nginx can serve it as-is)
//! - In-memory graphs and a fake graph provider
//! - One-shot local HTTP responders for exercising the Overpass client

#![allow(dead_code)]

use std::cell::RefCell;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread;
use std::time::Duration;

use walk_planner::error::{PlanError, Result};
use walk_planner::graph::NetworkGraph;
use walk_planner::model::{BoundingBox, GeoPoint};
use walk_planner::traits::GraphProvider;

pub const EXETER: GeoPoint = GeoPoint::new(50.730275, -3.518295);

/// Grid node sitting exactly on [`EXETER`].
pub const EXETER_NODE: i64 = 1060;

/// Overpass JSON for the Exeter grid, plus a footway fragment reachable only by motorway.
pub const EXETER_OVERPASS_JSON: &str = include_str!("overpass/api/interpreter");

pub const GRID_SIZE: usize = 11;
pub const GRID_NODES: usize = GRID_SIZE * GRID_SIZE;
pub const GRID_EDGES: usize = 2 * GRID_SIZE * (GRID_SIZE - 1);

/// Square street grid of `size` x `size` nodes centred on `center`.
///
/// Node ids start at `first_id` and run row by row from the south-west.
pub fn grid_graph(center: GeoPoint, size: usize, step_deg: f64, first_id: i64) -> NetworkGraph {
    let mut graph = NetworkGraph::new();
    let half = (size / 2) as f64;
    let id = |r: usize, c: usize| first_id + (r * size + c) as i64;

    for r in 0..size {
        for c in 0..size {
            let point = GeoPoint::new(
                center.lat + (r as f64 - half) * step_deg,
                center.lon + (c as f64 - half) * step_deg,
            );
            graph.add_node(id(r, c), point);
        }
    }
    for r in 0..size {
        for c in 0..size {
            if c + 1 < size {
                graph.add_edge(id(r, c), id(r, c + 1));
            }
            if r + 1 < size {
                graph.add_edge(id(r, c), id(r + 1, c));
            }
        }
    }
    graph
}

/// What a [`FakeProvider`] does when asked for a graph.
pub enum FakeResponse {
    Graph(NetworkGraph),
    Unavailable(&'static str),
    Empty,
}

/// Provider with a canned response that records every region it was asked for.
pub struct FakeProvider {
    response: FakeResponse,
    pub regions: RefCell<Vec<BoundingBox>>,
}

impl FakeProvider {
    pub fn new(response: FakeResponse) -> Self {
        Self {
            response,
            regions: RefCell::new(Vec::new()),
        }
    }

    pub fn with_graph(graph: NetworkGraph) -> Self {
        Self::new(FakeResponse::Graph(graph))
    }

    pub fn calls(&self) -> usize {
        self.regions.borrow().len()
    }
}

impl GraphProvider for FakeProvider {
    fn graph_for(&self, bbox: &BoundingBox) -> Result<NetworkGraph> {
        self.regions.borrow_mut().push(*bbox);
        match &self.response {
            FakeResponse::Graph(graph) => Ok(graph.clone()),
            FakeResponse::Unavailable(msg) => Err(PlanError::network(*msg)),
            FakeResponse::Empty => Err(PlanError::EmptyGraphRegion(*bbox)),
        }
    }
}

/// Answers the next request with `status` and a JSON `body`, then closes.
///
/// Returns the base URL and a handle yielding the raw request line.
pub fn serve_once(status: u16, body: String) -> (String, thread::JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind local responder");
    let addr = listener.local_addr().expect("local addr");

    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().expect("accept");
        let request = read_request_head(&mut stream);
        let response = format!(
            "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            if status == 200 { "OK" } else { "Error" },
            body.len(),
            body
        );
        stream.write_all(response.as_bytes()).expect("write response");
        stream.flush().ok();
        request.lines().next().unwrap_or_default().to_string()
    });

    (format!("http://{}/api/interpreter", addr), handle)
}

/// Accepts one connection and never answers within `hold`.
pub fn serve_silence(hold: Duration) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind local responder");
    let addr = listener.local_addr().expect("local addr");

    thread::spawn(move || {
        if let Ok((mut stream, _)) = listener.accept() {
            read_request_head(&mut stream);
            thread::sleep(hold);
        }
    });

    format!("http://{}/api/interpreter", addr)
}

/// URL of a port nothing is listening on.
pub fn refused_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    format!("http://{}/api/interpreter", addr)
}

fn read_request_head(stream: &mut std::net::TcpStream) -> String {
    let mut head = Vec::new();
    let mut buf = [0u8; 1024];
    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut buf) {
            Ok(0) | Err(_) => break,
            Ok(n) => head.extend_from_slice(&buf[..n]),
        }
    }
    String::from_utf8_lossy(&head).into_owned()
}
