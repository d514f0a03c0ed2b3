use anyhow::{Context, Result};
use rand::SeedableRng;
use rand::rngs::StdRng;

use walk_planner::cancel::CancelToken;
use walk_planner::config::PlannerConfig;
use walk_planner::overpass::OverpassClient;
use walk_planner::planner::Planner;
use walk_planner::telemetry;

fn main() -> Result<()> {
    let config = PlannerConfig::from_env()?;
    telemetry::init_tracing(&config.log_level);

    let cancel = CancelToken::new();
    let handler_token = cancel.clone();
    ctrlc::set_handler(move || handler_token.cancel()).context("Failed to install Ctrl-C handler")?;

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let client = OverpassClient::new(config.overpass())?;
    let plan = Planner::new(config.plan_options())
        .plan(&config.request(), &client, &mut rng, &cancel)
        .context("Route planning failed")?;

    tracing::info!(
        "Planned {} waypoints, {} route points, {:.0} m",
        plan.waypoints.len(),
        plan.route.len(),
        plan.distance_m()
    );
    println!("{}", serde_json::to_string_pretty(&plan)?);
    Ok(())
}
