// Positional replacement levels.
//
// The replacement baseline at a position is the projection of the best
// player who would not start anywhere in the league: with N starters per
// team and T teams, the (N*T + 1)th best player at that position.

use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

use crate::config::LeagueConfig;
use crate::draft::state::DraftState;
use crate::error::VorpError;
use crate::player::{PlayerProjection, Position, SUPPORTED_POSITIONS};

/// Replacement baseline for one position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplacementBaseline {
    pub position: Position,
    /// League-wide starters at the position (`starters_per_team * num_teams`),
    /// less any already drafted when resolved against a draft in progress.
    pub rank_cutoff: usize,
    pub replacement_points: f64,
    /// Players at the position in the input (or still available).
    pub pool_size: usize,
}

impl ReplacementBaseline {
    /// True when the pool was too shallow and the baseline fell back to the
    /// pool minimum.
    pub fn is_floor(&self) -> bool {
        self.pool_size <= self.rank_cutoff
    }
}

/// Baselines for every supported position that has at least one player.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ReplacementLevels {
    baselines: BTreeMap<Position, ReplacementBaseline>,
}

impl ReplacementLevels {
    /// Baseline for `position`, or `EmptyPositionPool` when the input had
    /// no players there.
    pub fn baseline(&self, position: Position) -> Result<&ReplacementBaseline, VorpError> {
        self.baselines
            .get(&position)
            .ok_or(VorpError::EmptyPositionPool { position })
    }

    pub fn replacement_points(&self, position: Position) -> Option<f64> {
        self.baselines.get(&position).map(|b| b.replacement_points)
    }

    /// Supported positions with no players in the input.
    pub fn empty_positions(&self) -> Vec<Position> {
        SUPPORTED_POSITIONS
            .iter()
            .copied()
            .filter(|p| !self.baselines.contains_key(p))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ReplacementBaseline> {
        self.baselines.values()
    }
}

// ---------------------------------------------------------------------------
// Replacement level computation
// ---------------------------------------------------------------------------

/// Determine the replacement baseline for each supported position.
///
/// Algorithm, per position:
/// 1. Collect the projections of players at that position.
/// 2. Stable sort descending (equal projections keep input order).
/// 3. cutoff = starters_per_team * num_teams.
/// 4. If the pool has more than `cutoff` players, the baseline is the value
///    at index `cutoff`; otherwise it is the pool minimum.
///
/// Fails only on an invalid league configuration. A position with no
/// players gets no baseline; asking for it yields `EmptyPositionPool`.
pub fn resolve(
    players: &[PlayerProjection],
    league: &LeagueConfig,
) -> Result<ReplacementLevels, VorpError> {
    league.validate()?;

    let mut baselines = BTreeMap::new();
    for &pos in SUPPORTED_POSITIONS {
        let pool: Vec<f64> = players
            .iter()
            .filter(|p| p.supported_position() == Some(pos))
            .map(|p| p.projected_points)
            .collect();

        if let Some(baseline) = baseline_at(pos, pool, league.league_starters(pos)) {
            baselines.insert(pos, baseline);
        }
    }

    Ok(ReplacementLevels { baselines })
}

/// Replacement baselines over the players still on the board.
///
/// Same rule as [`resolve`], applied to the undrafted pool with the
/// remaining demand: league-wide starters minus the players already drafted
/// at the position (never below zero). Drafted names that match no player
/// are ignored. A position whose players are all drafted gets no baseline.
pub fn resolve_available(
    players: &[PlayerProjection],
    league: &LeagueConfig,
    state: &DraftState,
) -> Result<ReplacementLevels, VorpError> {
    league.validate()?;

    let mut baselines = BTreeMap::new();
    for &pos in SUPPORTED_POSITIONS {
        let (available, drafted): (Vec<&PlayerProjection>, Vec<&PlayerProjection>) = players
            .iter()
            .filter(|p| p.supported_position() == Some(pos))
            .partition(|p| state.is_available(&p.player_name));

        let remaining_demand = league.league_starters(pos).saturating_sub(drafted.len());
        let pool = available.iter().map(|p| p.projected_points).collect();

        if let Some(baseline) = baseline_at(pos, pool, remaining_demand) {
            baselines.insert(pos, baseline);
        }
    }

    Ok(ReplacementLevels { baselines })
}

/// The value at index `rank_cutoff` of `pool` sorted descending, or the pool
/// minimum when the pool is not deeper than the cutoff.
fn baseline_at(pos: Position, mut pool: Vec<f64>, rank_cutoff: usize) -> Option<ReplacementBaseline> {
    if pool.is_empty() {
        debug!("{}: no players in pool, no baseline", pos);
        return None;
    }

    // sort_by is stable
    pool.sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));

    let replacement_points = match pool.get(rank_cutoff) {
        Some(&points) => points,
        None => pool.iter().copied().fold(f64::INFINITY, f64::min),
    };

    debug!(
        "{}: {} starters needed, pool of {}, replacement points {:.1}",
        pos,
        rank_cutoff,
        pool.len(),
        replacement_points
    );

    Some(ReplacementBaseline {
        position: pos,
        rank_cutoff,
        replacement_points,
        pool_size: pool.len(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
