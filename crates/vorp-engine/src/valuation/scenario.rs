// League-size scenarios: score the same pool under several team counts.

use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

use crate::config::Config;
use crate::error::VorpError;
use crate::player::{PlayerProjection, Position};
use crate::valuation::vorp::{self, ScoringRun};

/// Outcome of scoring the pool with `num_teams` teams. Each size succeeds or
/// fails on its own (e.g. a non-positive team count).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeagueScenario {
    pub num_teams: i64,
    pub result: Result<ScoringRun, VorpError>,
}

impl LeagueScenario {
    /// Replacement baseline at `position`, if this scenario scored and the
    /// position had players.
    pub fn replacement_points(&self, position: Position) -> Option<f64> {
        self.result
            .as_ref()
            .ok()
            .and_then(|run| run.levels.replacement_points(position))
    }
}

/// Score `players` once per entry in `sizes`, in parallel. Results come back
/// in the order of `sizes`; every other config setting is shared.
pub fn compare_league_sizes(
    players: &[PlayerProjection],
    config: &Config,
    sizes: &[i64],
) -> Vec<LeagueScenario> {
    sizes
        .par_iter()
        .map(|&num_teams| {
            let mut scenario_config = config.clone();
            scenario_config.league.num_teams = num_teams;
            let result = vorp::score_run(players, &scenario_config);
            debug!("scenario {} teams: ok={}", num_teams, result.is_ok());
            LeagueScenario { num_teams, result }
        })
        .collect()
}
