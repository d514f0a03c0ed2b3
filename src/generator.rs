//! Random waypoint generation around a home point.
//!
//! Each waypoint is a fixed step from the previous one on a random bearing.
//! A candidate is accepted only while the walk can still get home: its
//! distance to the origin must not exceed the number of points still to be
//! placed times the step length.

use rand::Rng;
use tracing::{debug, warn};

use crate::error::{PlanError, Result};
use crate::model::{GeoPoint, WaypointSequence};

/// Default number of bearings tried per waypoint before giving up.
pub const DEFAULT_MAX_ATTEMPTS: usize = 10_000;

/// Slack on the closing bound so a point exactly on the limit is accepted.
const CLOSING_TOLERANCE_M: f64 = 1e-6;

#[derive(Debug, Clone)]
pub struct WaypointGenerator {
    /// Bearings sampled per waypoint before failing with
    /// [`PlanError::GenerationInfeasible`].
    pub max_attempts: usize,
}

impl Default for WaypointGenerator {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl WaypointGenerator {
    pub fn new(max_attempts: usize) -> Self {
        Self { max_attempts }
    }

    /// Generates `count` waypoints spaced `separation_m` meters apart, starting at `origin`.
    ///
    /// The returned sequence has `count + 1` points with `origin` first.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        count: usize,
        separation_m: f64,
        origin: GeoPoint,
    ) -> Result<WaypointSequence> {
        if !origin.is_valid() {
            return Err(PlanError::invalid_input(format!(
                "origin {} is not a valid coordinate",
                origin
            )));
        }
        if !separation_m.is_finite() || separation_m < 0.0 {
            return Err(PlanError::invalid_input(format!(
                "separation must be a non-negative distance, got {}",
                separation_m
            )));
        }
        if count > 0 && self.max_attempts == 0 {
            return Err(PlanError::invalid_input("max_attempts must be at least 1"));
        }

        let mut points = WaypointSequence::starting_at(origin);
        let mut last = origin;

        for i in 0..count {
            let limit_m = closing_limit_m(count, i, separation_m);
            let mut accepted = None;

            for attempt in 1..=self.max_attempts {
                let bearing = rng.gen_range(0.0..360.0);
                let candidate = last.destination(bearing, separation_m);
                if candidate.distance_m(&origin) <= limit_m + CLOSING_TOLERANCE_M {
                    debug!(index = i + 1, attempt, bearing, "accepted waypoint");
                    accepted = Some(candidate);
                    break;
                }
            }

            let Some(point) = accepted else {
                warn!(
                    index = i + 1,
                    attempts = self.max_attempts,
                    "waypoint generation exhausted retry budget"
                );
                return Err(PlanError::GenerationInfeasible {
                    index: i + 1,
                    attempts: self.max_attempts,
                });
            };

            points.push(point);
            last = point;
        }

        Ok(points)
    }
}

/// Furthest a waypoint generated at iteration `i` (0-based) may be from home.
pub fn closing_limit_m(count: usize, i: usize, separation_m: f64) -> f64 {
    count.saturating_sub(i) as f64 * separation_m
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rand::rngs::mock::StepRng;

    const EXETER: GeoPoint = GeoPoint::new(50.730275, -3.518295);

    #[test]
    fn test_zero_count_returns_origin_only() {
        let mut rng = StdRng::seed_from_u64(1);
        let points = WaypointGenerator::default()
            .generate(&mut rng, 0, 1000.0, EXETER)
            .unwrap();
        assert_eq!(points.points(), &[EXETER]);
    }

    #[test]
    fn test_length_and_origin() {
        let mut rng = StdRng::seed_from_u64(7);
        let points = WaypointGenerator::default()
            .generate(&mut rng, 6, 500.0, EXETER)
            .unwrap();
        assert_eq!(points.len(), 7);
        assert_eq!(points.origin(), Some(EXETER));
    }

    #[test]
    fn test_consecutive_points_are_separation_apart() {
        let mut rng = StdRng::seed_from_u64(99);
        let points = WaypointGenerator::default()
            .generate(&mut rng, 5, 800.0, EXETER)
            .unwrap();
        for pair in points.points().windows(2) {
            let step = pair[0].distance_m(&pair[1]);
            assert!((step - 800.0).abs() < 1e-6, "step was {}", step);
        }
    }

    #[test]
    fn test_zero_separation_collapses_to_origin() {
        let mut rng = StdRng::seed_from_u64(3);
        let points = WaypointGenerator::default()
            .generate(&mut rng, 4, 0.0, EXETER)
            .unwrap();
        assert_eq!(points.len(), 5);
        assert!(points.points().iter().all(|p| p.approx_eq(&EXETER)));
    }

    #[test]
    fn test_same_seed_same_points() {
        let generator = WaypointGenerator::default();
        let a = generator
            .generate(&mut StdRng::seed_from_u64(42), 5, 1000.0, EXETER)
            .unwrap();
        let b = generator
            .generate(&mut StdRng::seed_from_u64(42), 5, 1000.0, EXETER)
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_fixed_bearing_exhausts_budget() {
        // A constant RNG always walks due north, so the second point is two
        // steps from home while only one is allowed.
        let mut rng = StepRng::new(0, 0);
        let err = WaypointGenerator::new(50)
            .generate(&mut rng, 2, 1000.0, EXETER)
            .unwrap_err();
        assert!(matches!(
            err,
            PlanError::GenerationInfeasible { index: 2, attempts: 50 }
        ));
    }

    #[test]
    fn test_rejects_bad_input() {
        let mut rng = StdRng::seed_from_u64(0);
        let generator = WaypointGenerator::default();
        assert!(matches!(
            generator.generate(&mut rng, 2, -5.0, EXETER),
            Err(PlanError::InvalidInput(_))
        ));
        assert!(matches!(
            generator.generate(&mut rng, 2, 100.0, GeoPoint::new(120.0, 0.0)),
            Err(PlanError::InvalidInput(_))
        ));
        assert!(matches!(
            WaypointGenerator::new(0).generate(&mut rng, 1, 100.0, EXETER),
            Err(PlanError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_closing_limit() {
        assert_eq!(closing_limit_m(3, 0, 1000.0), 3000.0);
        assert_eq!(closing_limit_m(3, 2, 1000.0), 1000.0);
    }
}
