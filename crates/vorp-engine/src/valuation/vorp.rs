// Value Over Replacement Player (VORP) scoring.
//
// Subtracts each player's positional replacement baseline from their
// projection, then layers on the derived annotations the rest of the engine
// and its callers use (tiers, per-game value, scarcity adjustment, ranks).

use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{info, warn};

use crate::config::{self, Config};
use crate::error::VorpError;
use crate::player::{PlayerProjection, Position};
use crate::valuation::order_desc;
use crate::valuation::replacement::{self, ReplacementLevels};

/// A projection annotated with its VORP.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredPlayer {
    #[serde(flatten)]
    pub projection: PlayerProjection,
    /// Baseline of the player's position; 0.0 for unsupported positions.
    pub replacement_points: f64,
    /// `projected_points - replacement_points`. Not clipped at zero.
    pub vorp_score: f64,
    /// 1-based rank within the player's position code.
    pub vorp_position_rank: usize,
    /// 1-based rank across the whole pool.
    pub vorp_overall_rank: usize,
    pub vorp_per_game: f64,
    pub vorp_tier: String,
    pub vorp_scarcity_adjusted: f64,
    /// 0-100ish composite of VORP, scarcity-adjusted VORP and raw points.
    pub vorp_draft_value: f64,
}

impl ScoredPlayer {
    pub fn player_name(&self) -> &str {
        &self.projection.player_name
    }

    pub fn position(&self) -> Option<Position> {
        self.projection.supported_position()
    }
}

/// Baselines plus the scored rows from one scoring pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoringRun {
    pub levels: ReplacementLevels,
    pub players: Vec<ScoredPlayer>,
}

// ---------------------------------------------------------------------------
// Pipeline entry points
// ---------------------------------------------------------------------------

/// Score every player. Output is in input order.
pub fn score(players: &[PlayerProjection], config: &Config) -> Result<Vec<ScoredPlayer>, VorpError> {
    score_run(players, config).map(|run| run.players)
}

/// Score every player and keep the baselines used.
///
/// Baselines are resolved fresh on every call; identical inputs give
/// identical output.
pub fn score_run(players: &[PlayerProjection], config: &Config) -> Result<ScoringRun, VorpError> {
    config::validate_strategy(&config.strategy)?;
    let levels = replacement::resolve(players, &config.league)?;
    let scoring = &config.strategy.scoring;

    let mut scored = Vec::with_capacity(players.len());
    let mut passed_through = 0usize;

    for player in players {
        let position = player.supported_position();
        let replacement_points = match position {
            Some(pos) => levels.replacement_points(pos).unwrap_or(0.0),
            None if scoring.reject_unknown_positions => {
                return Err(VorpError::UnknownPosition {
                    player: player.player_name.clone(),
                    position: player.position.clone(),
                });
            }
            None => {
                passed_through += 1;
                0.0
            }
        };

        let vorp_score = player.projected_points - replacement_points;

        let games = player
            .expected_games_played
            .filter(|g| g.is_finite() && *g > 0.0)
            .unwrap_or(scoring.season_games);

        let multiplier = position.map(|p| scoring.scarcity_multiplier(p)).unwrap_or(1.0);

        scored.push(ScoredPlayer {
            projection: player.clone(),
            replacement_points,
            vorp_score,
            vorp_position_rank: 0,
            vorp_overall_rank: 0,
            vorp_per_game: vorp_score / games,
            vorp_tier: config.strategy.vorp_tiers.classify(vorp_score).to_string(),
            vorp_scarcity_adjusted: vorp_score * multiplier,
            vorp_draft_value: 0.0,
        });
    }

    if passed_through > 0 {
        warn!(
            "{} player(s) with unsupported positions scored against a zero baseline",
            passed_through
        );
    }

    assign_position_ranks(&mut scored);
    assign_overall_ranks(&mut scored);
    assign_draft_values(&mut scored);

    info!(
        "scored {} players; baselines: {}",
        scored.len(),
        levels
            .iter()
            .map(|b| format!("{}={:.1}", b.position, b.replacement_points))
            .collect::<Vec<_>>()
            .join(", ")
    );

    Ok(ScoringRun {
        levels,
        players: scored,
    })
}

// ---------------------------------------------------------------------------
// Derived annotations
// ---------------------------------------------------------------------------

/// Position grouping key: the canonical code for supported positions, the
/// normalized raw code otherwise.
fn position_key(player: &ScoredPlayer) -> String {
    match player.position() {
        Some(pos) => pos.display_str().to_string(),
        None => player.projection.position.trim().to_uppercase(),
    }
}

fn assign_position_ranks(players: &mut [ScoredPlayer]) {
    let mut groups: BTreeMap<String, Vec<usize>> = BTreeMap::new();
    for (i, p) in players.iter().enumerate() {
        groups.entry(position_key(p)).or_default().push(i);
    }

    for indices in groups.values() {
        let group: Vec<f64> = indices.iter().map(|&i| players[i].vorp_score).collect();
        for (rank, local) in order_desc(&group, |v| *v).into_iter().enumerate() {
            players[indices[local]].vorp_position_rank = rank + 1;
        }
    }
}

fn assign_overall_ranks(players: &mut [ScoredPlayer]) {
    for (rank, i) in order_desc(players, |p| p.vorp_score).into_iter().enumerate() {
        players[i].vorp_overall_rank = rank + 1;
    }
}

/// Composite draft value: 50% VORP, 30% scarcity-adjusted VORP, 20% raw
/// projection, each normalized by its maximum across the pool.
fn assign_draft_values(players: &mut [ScoredPlayer]) {
    fn positive_max(values: impl Iterator<Item = f64>) -> f64 {
        let max = values.fold(f64::NEG_INFINITY, f64::max);
        if max > 0.0 {
            max
        } else {
            1.0
        }
    }

    let max_vorp = positive_max(players.iter().map(|p| p.vorp_score));
    let max_adjusted = positive_max(players.iter().map(|p| p.vorp_scarcity_adjusted));
    let max_points = positive_max(players.iter().map(|p| p.projection.projected_points));

    for p in players.iter_mut() {
        p.vorp_draft_value = (p.vorp_score / max_vorp) * 50.0
            + (p.vorp_scarcity_adjusted / max_adjusted) * 30.0
            + (p.projection.projected_points / max_points) * 20.0;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
