//! Runtime configuration read from `WALK_PLANNER_*` environment variables.

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::generator::DEFAULT_MAX_ATTEMPTS;
use crate::model::GeoPoint;
use crate::overpass::OverpassConfig;
use crate::planner::{PlanOptions, PlanRequest};
use crate::snapper::DEFAULT_MARGIN_M;

pub const ENV_PREFIX: &str = "WALK_PLANNER_";

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct PlannerConfig {
    #[serde(default = "default_lat")]
    pub lat: f64,
    #[serde(default = "default_lon")]
    pub lon: f64,
    #[serde(default = "default_waypoints")]
    pub waypoints: usize,
    #[serde(default = "default_separation_m")]
    pub separation_m: f64,
    #[serde(default = "default_snap")]
    pub snap: bool,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,
    #[serde(default = "default_margin_m")]
    pub margin_m: f64,
    #[serde(default = "default_overpass_url")]
    pub overpass_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub retain_all: bool,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_lat() -> f64 {
    50.730275
}

fn default_lon() -> f64 {
    -3.518295
}

fn default_waypoints() -> usize {
    5
}

fn default_separation_m() -> f64 {
    1000.0
}

fn default_snap() -> bool {
    true
}

fn default_max_attempts() -> usize {
    DEFAULT_MAX_ATTEMPTS
}

fn default_margin_m() -> f64 {
    DEFAULT_MARGIN_M
}

fn default_overpass_url() -> String {
    OverpassConfig::default().base_url
}

fn default_timeout_secs() -> u64 {
    OverpassConfig::default().timeout_secs
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            lat: default_lat(),
            lon: default_lon(),
            waypoints: default_waypoints(),
            separation_m: default_separation_m(),
            snap: default_snap(),
            seed: None,
            max_attempts: default_max_attempts(),
            margin_m: default_margin_m(),
            overpass_url: default_overpass_url(),
            timeout_secs: default_timeout_secs(),
            retain_all: false,
            log_level: default_log_level(),
        }
    }
}

impl PlannerConfig {
    pub fn from_env() -> Result<Self> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars())
    }

    /// Parses configuration from `(key, value)` pairs carrying [`ENV_PREFIX`].
    pub fn from_vars<I>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::prefixed(ENV_PREFIX)
            .from_iter(vars)
            .context("Failed to load planner config from environment")
    }

    pub fn request(&self) -> PlanRequest {
        PlanRequest {
            origin: GeoPoint::new(self.lat, self.lon),
            count: self.waypoints,
            separation_m: self.separation_m,
            snap: self.snap,
        }
    }

    pub fn plan_options(&self) -> PlanOptions {
        PlanOptions {
            max_attempts: self.max_attempts,
            margin_m: self.margin_m,
        }
    }

    pub fn overpass(&self) -> OverpassConfig {
        OverpassConfig {
            base_url: self.overpass_url.clone(),
            timeout_secs: self.timeout_secs,
            retain_all: self.retain_all,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults_match_home_form() {
        let config = PlannerConfig::from_vars(Vec::new()).unwrap();
        assert_eq!(config, PlannerConfig::default());

        let request = config.request();
        assert_eq!(request.origin, GeoPoint::new(50.730275, -3.518295));
        assert_eq!(request.count, 5);
        assert_eq!(request.separation_m, 1000.0);
        assert!(request.snap);
    }

    #[test]
    fn test_prefixed_overrides() {
        let config = PlannerConfig::from_vars(vars(&[
            ("WALK_PLANNER_LAT", "0"),
            ("WALK_PLANNER_LON", "0"),
            ("WALK_PLANNER_WAYPOINTS", "3"),
            ("WALK_PLANNER_SNAP", "false"),
            ("WALK_PLANNER_SEED", "17"),
            ("WALK_PLANNER_TIMEOUT_SECS", "5"),
            ("UNRELATED", "ignored"),
        ]))
        .unwrap();

        assert_eq!(config.request().origin, GeoPoint::new(0.0, 0.0));
        assert_eq!(config.waypoints, 3);
        assert!(!config.snap);
        assert_eq!(config.seed, Some(17));
        assert_eq!(config.overpass().timeout_secs, 5);
    }

    #[test]
    fn test_invalid_value_is_an_error() {
        let result = PlannerConfig::from_vars(vars(&[("WALK_PLANNER_WAYPOINTS", "many")]));
        assert!(result.is_err());
    }
}
