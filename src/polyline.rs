//! Polyline representation for stitched route geometries.
//!
//! Coordinates are kept decoded; any compact encoding for display belongs to
//! the presentation layer.

use serde::{Deserialize, Serialize};

use crate::model::GeoPoint;

/// The walkable path of a tour as an ordered list of coordinates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoutePolyline {
    points: Vec<GeoPoint>,
}

impl RoutePolyline {
    /// Creates a new polyline from decoded coordinate points.
    pub fn new(points: Vec<GeoPoint>) -> Self {
        Self { points }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Appends one segment of the tour.
    ///
    /// Every segment after the first starts where the previous one ended, so
    /// its first point is dropped.
    pub fn push_segment(&mut self, segment: &[GeoPoint]) {
        let skip = usize::from(!self.points.is_empty());
        self.points.extend(segment.iter().skip(skip).copied());
    }

    /// Returns a reference to the coordinate points.
    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    /// Consumes the polyline and returns the owned coordinate points.
    pub fn into_points(self) -> Vec<GeoPoint> {
        self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Walked distance along the polyline in meters.
    pub fn length_m(&self) -> f64 {
        self.points
            .windows(2)
            .map(|w| w[0].distance_m(&w[1]))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(lat: f64, lon: f64) -> GeoPoint {
        GeoPoint::new(lat, lon)
    }

    #[test]
    fn test_new_and_points() {
        let points = vec![p(38.5, -120.2), p(40.7, -120.95), p(43.252, -126.453)];
        let polyline = RoutePolyline::new(points.clone());
        assert_eq!(polyline.points(), &points[..]);
        assert_eq!(polyline.into_points(), points);
    }

    #[test]
    fn test_empty_polyline() {
        let polyline = RoutePolyline::empty();
        assert!(polyline.is_empty());
        assert_eq!(polyline.length_m(), 0.0);
    }

    #[test]
    fn test_segments_share_boundary_point() {
        let mut polyline = RoutePolyline::empty();
        polyline.push_segment(&[p(0.0, 0.0), p(0.0, 1.0), p(0.0, 2.0)]);
        polyline.push_segment(&[p(0.0, 2.0), p(1.0, 2.0)]);
        polyline.push_segment(&[p(1.0, 2.0), p(0.0, 0.0)]);

        assert_eq!(
            polyline.points(),
            &[p(0.0, 0.0), p(0.0, 1.0), p(0.0, 2.0), p(1.0, 2.0), p(0.0, 0.0)]
        );
    }

    #[test]
    fn test_single_node_segment_adds_nothing_after_first() {
        let mut polyline = RoutePolyline::empty();
        polyline.push_segment(&[p(0.0, 0.0), p(0.0, 1.0)]);
        polyline.push_segment(&[p(0.0, 1.0)]);
        assert_eq!(polyline.len(), 2);
    }

    #[test]
    fn test_length_sums_legs() {
        let polyline = RoutePolyline::new(vec![p(0.0, 0.0), p(0.0, 0.01), p(0.0, 0.02)]);
        let expected = 2.0 * p(0.0, 0.0).distance_m(&p(0.0, 0.01));
        assert!((polyline.length_m() - expected).abs() < 1e-6);
    }
}
