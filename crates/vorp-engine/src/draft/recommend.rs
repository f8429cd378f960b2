// Draft recommendations from a scored (optionally ADP-valued) pool.
//
// Produces the best-available shortlist, per-position shortlists, sleeper
// picks, and round guidance for the caller's current pick.

use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::config::{self, Config};
use crate::draft::state::DraftState;
use crate::error::VorpError;
use crate::player::{Position, SUPPORTED_POSITIONS};
use crate::valuation::market::AdpValuedPlayer;
use crate::valuation::order_desc;
use crate::valuation::vorp::ScoredPlayer;

// ---------------------------------------------------------------------------
// Rankable rows
// ---------------------------------------------------------------------------

/// A row the recommendation engine can rank.
pub trait VorpRanked {
    fn player_name(&self) -> &str;
    /// Raw position code.
    fn position_code(&self) -> &str;
    fn vorp_score(&self) -> f64;
    fn vorp_tier(&self) -> &str;
    fn projected_points(&self) -> f64;

    /// `vorp_adp_value` for rows with market data; `None` otherwise.
    fn market_value(&self) -> Option<i64> {
        None
    }

    fn position(&self) -> Option<Position> {
        Position::from_str_pos(self.position_code())
    }
}

impl VorpRanked for ScoredPlayer {
    fn player_name(&self) -> &str {
        &self.projection.player_name
    }

    fn position_code(&self) -> &str {
        &self.projection.position
    }

    fn vorp_score(&self) -> f64 {
        self.vorp_score
    }

    fn vorp_tier(&self) -> &str {
        &self.vorp_tier
    }

    fn projected_points(&self) -> f64 {
        self.projection.projected_points
    }
}

impl VorpRanked for AdpValuedPlayer {
    fn player_name(&self) -> &str {
        self.scored.player_name()
    }

    fn position_code(&self) -> &str {
        self.scored.position_code()
    }

    fn vorp_score(&self) -> f64 {
        self.scored.vorp_score
    }

    fn vorp_tier(&self) -> &str {
        &self.scored.vorp_tier
    }

    fn projected_points(&self) -> f64 {
        self.scored.projected_points()
    }

    fn market_value(&self) -> Option<i64> {
        self.has_market_data().then_some(self.vorp_adp_value)
    }
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// One shortlisted player.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DraftTarget {
    pub player_name: String,
    pub position: String,
    pub vorp_score: f64,
    pub vorp_tier: String,
    pub projected_points: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vorp_adp_value: Option<i64>,
}

impl DraftTarget {
    fn from_row<P: VorpRanked>(row: &P) -> Self {
        DraftTarget {
            player_name: row.player_name().to_string(),
            position: row.position_code().to_string(),
            vorp_score: row.vorp_score(),
            vorp_tier: row.vorp_tier().to_string(),
            projected_points: row.projected_points(),
            vorp_adp_value: row.market_value(),
        }
    }
}

/// Everything the caller needs for their current pick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub round: u32,
    pub draft_slot: u32,
    /// Guidance text for `round`.
    pub round_strategy: String,
    /// "Round R, slot S: guidance"
    pub strategy_label: String,
    /// Picks by other teams before the caller's next selection.
    pub picks_until_next_turn: u32,
    /// Best available by VORP.
    pub vorp_targets: Vec<DraftTarget>,
    /// Best available per supported position present in the pool.
    pub positional_values: BTreeMap<Position, Vec<DraftTarget>>,
    /// Available players the market undervalues. Empty without ADP data.
    pub sleeper_picks: Vec<DraftTarget>,
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Build recommendations for the caller's pick described by `state`.
///
/// Fails on an invalid config, a draft slot outside 1..=num_teams, or a
/// round the strategy table does not cover.
pub fn recommend<P: VorpRanked>(
    players: &[P],
    config: &Config,
    state: DraftState,
) -> Result<Recommendation, VorpError> {
    let num_teams = check_draft(config, &state)?;
    let guidance = config.strategy.round_strategy.guidance(state.current_round)?;
    let rec = &config.strategy.recommendations;

    let available: Vec<&P> = players
        .iter()
        .filter(|p| state.is_available(p.player_name()))
        .collect();
    debug!(
        "round {}: {} of {} players available",
        state.current_round,
        available.len(),
        players.len()
    );

    let vorp_targets = top_by(&available, rec.top_n_targets, |p| p.vorp_score());

    let mut positional_values = BTreeMap::new();
    for &pos in SUPPORTED_POSITIONS {
        if !players.iter().any(|p| p.position() == Some(pos)) {
            warn!("no {} in the player pool; omitted from positional values", pos);
            continue;
        }
        let at_pos: Vec<&P> = available
            .iter()
            .copied()
            .filter(|p| p.position() == Some(pos))
            .collect();
        positional_values.insert(pos, top_by(&at_pos, rec.positional_targets, |p| p.vorp_score()));
    }

    let sleepers: Vec<&P> = available
        .iter()
        .copied()
        .filter(|p| {
            p.market_value()
                .is_some_and(|value| value > rec.sleeper_min_value && p.vorp_score() > rec.sleeper_min_vorp)
        })
        .collect();
    let sleeper_picks = top_by(&sleepers, rec.sleeper_limit, |p| {
        p.market_value().unwrap_or(i64::MIN) as f64
    });

    Ok(Recommendation {
        round: state.current_round,
        draft_slot: state.draft_slot,
        round_strategy: guidance.to_string(),
        strategy_label: format!(
            "Round {}, slot {}: {}",
            state.current_round, state.draft_slot, guidance
        ),
        picks_until_next_turn: state.picks_until_next_turn(num_teams),
        vorp_targets,
        positional_values,
        sleeper_picks,
    })
}

/// Best available players at one position.
///
/// Fails with `EmptyPositionPool` when the pool has no player at
/// `position` at all (drafted or not).
pub fn recommend_position<P: VorpRanked>(
    players: &[P],
    config: &Config,
    state: &DraftState,
    position: Position,
) -> Result<Vec<DraftTarget>, VorpError> {
    config::validate_strategy(&config.strategy)?;
    if !players.iter().any(|p| p.position() == Some(position)) {
        return Err(VorpError::EmptyPositionPool { position });
    }
    let available: Vec<&P> = players
        .iter()
        .filter(|p| p.position() == Some(position) && state.is_available(p.player_name()))
        .collect();
    Ok(top_by(
        &available,
        config.strategy.recommendations.positional_targets,
        |p| p.vorp_score(),
    ))
}

/// Validate config and seat; returns the team count.
fn check_draft(config: &Config, state: &DraftState) -> Result<u32, VorpError> {
    config.league.validate()?;
    config::validate_strategy(&config.strategy)?;

    let num_teams = u32::try_from(config.league.num_teams)
        .map_err(|_| VorpError::invalid("league.num_teams", "too many teams"))?;
    if !(1..=num_teams).contains(&state.draft_slot) {
        return Err(VorpError::invalid(
            "draft_slot",
            format!("must be between 1 and {}, got {}", num_teams, state.draft_slot),
        ));
    }
    Ok(num_teams)
}

/// Top `limit` rows by `key` descending, ties by input order.
fn top_by<P: VorpRanked>(rows: &[&P], limit: usize, key: impl Fn(&P) -> f64) -> Vec<DraftTarget> {
    order_desc(rows, |p| key(p))
        .into_iter()
        .take(limit)
        .map(|i| DraftTarget::from_row(rows[i]))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LeagueConfig;
    use crate::player::PlayerProjection;
    use crate::valuation::market::{attach_adp_value, AdpField};
    use crate::valuation::tiers::TierTable;
    use crate::valuation::vorp::score;

    fn test_config() -> Config {
        Config::with_league(LeagueConfig::standard(2))
    }

    fn ladder(pos: &str, count: usize, start: f64, step: f64) -> Vec<PlayerProjection> {
        (0..count)
            .map(|i| PlayerProjection::new(format!("{pos}{}", i + 1), pos, start - (i as f64) * step))
            .collect()
    }

    fn pool() -> Vec<PlayerProjection> {
        let mut players = ladder("QB", 4, 380.0, 20.0);
        players.extend(ladder("RB", 8, 330.0, 20.0));
        players.extend(ladder("WR", 8, 300.0, 10.0));
        players.extend(ladder("TE", 3, 190.0, 30.0));
        players
    }

    fn names(targets: &[DraftTarget]) -> Vec<&str> {
        targets.iter().map(|t| t.player_name.as_str()).collect()
    }

    #[test]
    fn best_available_by_vorp() {
        let scored = score(&pool(), &test_config()).unwrap();
        let rec = recommend(&scored, &test_config(), DraftState::new(1, 1)).unwrap();

        assert_eq!(rec.vorp_targets.len(), 5);
        // RB1 80, RB2 60, TE1 60, then QB1/RB3/WR1 at 40: ties keep input order.
        assert_eq!(names(&rec.vorp_targets), vec!["RB1", "RB2", "TE1", "QB1", "RB3"]);
        for pair in rec.vorp_targets.windows(2) {
            assert!(pair[0].vorp_score >= pair[1].vorp_score);
        }
    }

    #[test]
    fn drafted_top_player_is_replaced_by_next_best() {
        let scored = score(&pool(), &test_config()).unwrap();
        let state = DraftState::new(1, 1).with_drafted(["RB1"]);
        let rec = recommend(&scored, &test_config(), state).unwrap();

        assert!(!names(&rec.vorp_targets).contains(&"RB1"));
        assert_eq!(rec.vorp_targets[0].player_name, "RB2");
        let rbs = &rec.positional_values[&Position::RunningBack];
        assert_eq!(rbs[0].player_name, "RB2");
        assert!(rbs.iter().all(|t| t.player_name != "RB1"));
    }

    #[test]
    fn positional_values_cover_present_positions() {
        let players: Vec<_> = pool().into_iter().filter(|p| p.position != "TE").collect();
        let scored = score(&players, &test_config()).unwrap();
        let rec = recommend(&scored, &test_config(), DraftState::new(2, 3)).unwrap();

        assert!(!rec.positional_values.contains_key(&Position::TightEnd));
        assert_eq!(rec.positional_values[&Position::WideReceiver].len(), 5);
        assert_eq!(rec.positional_values[&Position::Quarterback].len(), 4);
    }

    #[test]
    fn recommend_position_absent_is_empty_pool() {
        let players: Vec<_> = pool().into_iter().filter(|p| p.position != "TE").collect();
        let scored = score(&players, &test_config()).unwrap();
        let state = DraftState::new(1, 1);

        let err = recommend_position(&scored, &test_config(), &state, Position::TightEnd).unwrap_err();
        assert_eq!(err, VorpError::EmptyPositionPool { position: Position::TightEnd });

        let qbs = recommend_position(&scored, &test_config(), &state, Position::Quarterback).unwrap();
        assert_eq!(names(&qbs), vec!["QB1", "QB2", "QB3", "QB4"]);
    }

    #[test]
    fn round_guidance_and_snake_gap() {
        let scored = score(&pool(), &test_config()).unwrap();
        let rec = recommend(&scored, &test_config(), DraftState::new(2, 1)).unwrap();
        assert_eq!(rec.picks_until_next_turn, 0);
        assert!(rec.strategy_label.starts_with("Round 1, slot 2: "));
        assert!(rec.strategy_label.ends_with(&rec.round_strategy));

        let rec = recommend(&scored, &test_config(), DraftState::new(2, 2)).unwrap();
        assert_eq!(rec.picks_until_next_turn, 2);
    }

    #[test]
    fn unconfigured_round_fails() {
        let scored = score(&pool(), &test_config()).unwrap();
        let err = recommend(&scored, &test_config(), DraftState::new(1, 21)).unwrap_err();
        assert_eq!(err, VorpError::UnconfiguredRound { round: 21 });
        let err = recommend(&scored, &test_config(), DraftState::new(1, 0)).unwrap_err();
        assert_eq!(err, VorpError::UnconfiguredRound { round: 0 });
    }

    #[test]
    fn draft_slot_must_fit_league() {
        let scored = score(&pool(), &test_config()).unwrap();
        for slot in [0, 3] {
            match recommend(&scored, &test_config(), DraftState::new(slot, 1)) {
                Err(VorpError::InvalidConfiguration { field, .. }) => assert_eq!(field, "draft_slot"),
                other => panic!("slot {slot}: expected InvalidConfiguration, got {other:?}"),
            }
        }
    }

    #[test]
    fn sleepers_need_market_data() {
        let config = test_config();
        let scored = score(&pool(), &config).unwrap();

        // Without ADP there are no sleepers.
        let rec = recommend(&scored, &config, DraftState::new(1, 1)).unwrap();
        assert!(rec.sleeper_picks.is_empty());

        // ADP follows VORP order except WR1 (VORP 40, VORP rank 6), whom the
        // market takes dead last.
        let players: Vec<_> = scored
            .iter()
            .map(|s| {
                let adp = if s.player_name() == "WR1" { 999.0 } else { 200.0 - s.vorp_score };
                s.projection.clone().with_adp(adp)
            })
            .collect();
        let scored = score(&players, &config).unwrap();
        let valued = attach_adp_value(&scored, &AdpField::Consensus, &TierTable::adp_default()).unwrap();
        let rec = recommend(&valued, &config, DraftState::new(1, 1)).unwrap();

        assert_eq!(names(&rec.sleeper_picks), vec!["WR1"]);
        let wr1 = &rec.sleeper_picks[0];
        assert_eq!(wr1.vorp_adp_value, Some(23 - 6));
        assert!(wr1.vorp_score > 10.0);
    }

    #[test]
    fn drafting_everyone_leaves_empty_lists() {
        let players = pool();
        let scored = score(&players, &test_config()).unwrap();
        let state = DraftState::new(1, 5).with_drafted(players.iter().map(|p| p.player_name.clone()));
        let rec = recommend(&scored, &test_config(), state).unwrap();
        assert!(rec.vorp_targets.is_empty());
        assert!(rec.positional_values.values().all(|v| v.is_empty()));
    }
}
