// In-draft (dynamic) VORP.
//
// Re-resolves replacement baselines over the players still on the board and
// reports how each player's value moved against the pre-draft baselines.

use serde::Serialize;
use tracing::{debug, info};

use crate::config::Config;
use crate::draft::state::DraftState;
use crate::error::VorpError;
use crate::player::{PlayerProjection, Position};
use crate::valuation::replacement::{self, ReplacementLevels};
use crate::valuation::vorp::{self, ScoredPlayer};

/// A scored row with its value against the live draft board.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DynamicVorpPlayer {
    /// Pre-draft scoring; `replacement_points` and `vorp_score` are the
    /// static values.
    #[serde(flatten)]
    pub scored: ScoredPlayer,
    pub available: bool,
    pub dynamic_replacement_points: f64,
    /// `projected_points - dynamic_replacement_points`. Not clipped.
    pub dynamic_vorp: f64,
    /// `dynamic_vorp - vorp_score`.
    pub vorp_change: f64,
    /// `dynamic_replacement_points - replacement_points`.
    pub replacement_level_shift: f64,
}

impl DynamicVorpPlayer {
    pub fn player_name(&self) -> &str {
        self.scored.player_name()
    }
}

/// Both sets of baselines plus the annotated rows, in input order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DynamicScoring {
    pub static_levels: ReplacementLevels,
    pub available_levels: ReplacementLevels,
    pub players: Vec<DynamicVorpPlayer>,
}

impl DynamicScoring {
    /// Undrafted rows ordered by dynamic VORP, ties in input order.
    pub fn available_by_dynamic_vorp(&self) -> Vec<&DynamicVorpPlayer> {
        let available: Vec<&DynamicVorpPlayer> =
            self.players.iter().filter(|p| p.available).collect();
        crate::valuation::order_desc(&available, |p| p.dynamic_vorp)
            .into_iter()
            .map(|i| available[i])
            .collect()
    }
}

/// Score `players` statically, then against the undrafted pool in `state`.
///
/// A position with nobody left keeps its static baseline. Unsupported
/// positions stay on a zero baseline.
pub fn score_dynamic(
    players: &[PlayerProjection],
    config: &Config,
    state: &DraftState,
) -> Result<DynamicScoring, VorpError> {
    let run = vorp::score_run(players, config)?;
    let available_levels = replacement::resolve_available(players, &config.league, state)?;

    for pos in available_levels.empty_positions() {
        if run.levels.replacement_points(pos).is_some() {
            debug!("{}: nobody left on the board, keeping the static baseline", pos);
        }
    }

    let rows = run
        .players
        .into_iter()
        .map(|scored| {
            let dynamic_replacement_points = scored
                .position()
                .and_then(|pos| available_levels.replacement_points(pos))
                .unwrap_or(scored.replacement_points);
            let dynamic_vorp = scored.projection.projected_points - dynamic_replacement_points;
            DynamicVorpPlayer {
                available: state.is_available(scored.player_name()),
                dynamic_replacement_points,
                dynamic_vorp,
                vorp_change: dynamic_vorp - scored.vorp_score,
                replacement_level_shift: dynamic_replacement_points - scored.replacement_points,
                scored,
            }
        })
        .collect();

    info!(
        "dynamic baselines after {} picks: {}",
        state.drafted_players.len(),
        shifts(&run.levels, &available_levels)
    );

    Ok(DynamicScoring {
        static_levels: run.levels,
        available_levels,
        players: rows,
    })
}

fn shifts(static_levels: &ReplacementLevels, available_levels: &ReplacementLevels) -> String {
    static_levels
        .iter()
        .map(|b| {
            let now = available_levels
                .replacement_points(b.position)
                .unwrap_or(b.replacement_points);
            format!("{}={:.1} ({:+.1})", b.position, now, now - b.replacement_points)
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Baseline movement at `position`, if it has a static baseline.
pub fn replacement_level_shift(scoring: &DynamicScoring, position: Position) -> Option<f64> {
    let before = scoring.static_levels.replacement_points(position)?;
    let after = scoring
        .available_levels
        .replacement_points(position)
        .unwrap_or(before);
    Some(after - before)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LeagueConfig;

    fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
        (a - b).abs() < epsilon
    }

    fn ladder(pos: &str, count: usize, start: f64, step: f64) -> Vec<PlayerProjection> {
        (0..count)
            .map(|i| PlayerProjection::new(format!("{pos}{}", i + 1), pos, start - (i as f64) * step))
            .collect()
    }

    /// 2 teams, QB 1 / RB 2 / WR 2 / TE 1. Static RB baseline: RB5 = 200.
    fn setup() -> (Vec<PlayerProjection>, Config) {
        let mut players = ladder("QB", 4, 380.0, 20.0);
        players.extend(ladder("RB", 6, 300.0, 25.0));
        players.extend(ladder("WR", 6, 280.0, 15.0));
        players.extend(ladder("TE", 3, 190.0, 30.0));
        (players, Config::with_league(LeagueConfig::standard(2)))
    }

    fn find<'a>(scoring: &'a DynamicScoring, name: &str) -> &'a DynamicVorpPlayer {
        scoring
            .players
            .iter()
            .find(|p| p.player_name() == name)
            .unwrap_or_else(|| panic!("{name} missing"))
    }

    #[test]
    fn empty_board_matches_static() {
        let (players, config) = setup();
        let scoring = score_dynamic(&players, &config, &DraftState::new(1, 1)).unwrap();

        assert_eq!(scoring.static_levels, scoring.available_levels);
        for p in &scoring.players {
            assert!(p.available);
            assert_eq!(p.dynamic_vorp, p.scored.vorp_score);
            assert_eq!(p.replacement_level_shift, 0.0);
            assert_eq!(p.vorp_change, 0.0);
        }
    }

    #[test]
    fn drafting_in_order_keeps_the_baseline() {
        let (players, config) = setup();
        let state = DraftState::new(1, 2).with_drafted(["RB1", "RB2", "RB3"]);
        let scoring = score_dynamic(&players, &config, &state).unwrap();

        // One starter still needed from [225, 200, 175]: RB5 stays replacement.
        assert_eq!(replacement_level_shift(&scoring, Position::RunningBack), Some(0.0));
        assert!(!find(&scoring, "RB1").available);
        assert!(approx_eq(find(&scoring, "RB4").dynamic_vorp, 25.0, 1e-9));
    }

    #[test]
    fn reaches_raise_the_baseline() {
        let (players, config) = setup();
        let state = DraftState::new(1, 2).with_drafted(["RB5", "RB6"]);
        let scoring = score_dynamic(&players, &config, &state).unwrap();

        // Two starters still needed from [300, 275, 250, 225]: RB3 is replacement.
        let rb1 = find(&scoring, "RB1");
        assert!(approx_eq(rb1.dynamic_replacement_points, 250.0, 1e-9));
        assert!(approx_eq(rb1.replacement_level_shift, 50.0, 1e-9));
        assert!(approx_eq(rb1.dynamic_vorp, 50.0, 1e-9));
        assert!(approx_eq(rb1.vorp_change, -50.0, 1e-9));

        // Other positions are untouched.
        assert_eq!(find(&scoring, "QB1").replacement_level_shift, 0.0);
    }

    #[test]
    fn overdrafted_position_drops_the_baseline() {
        let (players, config) = setup();
        let state = DraftState::new(1, 3).with_drafted(["RB1", "RB2", "RB3", "RB4", "RB5"]);
        let scoring = score_dynamic(&players, &config, &state).unwrap();

        assert_eq!(replacement_level_shift(&scoring, Position::RunningBack), Some(-25.0));
        let rb6 = find(&scoring, "RB6");
        assert!(rb6.available);
        assert!(approx_eq(rb6.dynamic_vorp, 0.0, 1e-9));
    }

    #[test]
    fn emptied_position_keeps_static_baseline() {
        let (players, config) = setup();
        let state = DraftState::new(1, 2).with_drafted(["TE1", "TE2", "TE3"]);
        let scoring = score_dynamic(&players, &config, &state).unwrap();

        assert!(scoring.available_levels.baseline(Position::TightEnd).is_err());
        assert_eq!(replacement_level_shift(&scoring, Position::TightEnd), Some(0.0));
        let te1 = find(&scoring, "TE1");
        assert!(!te1.available);
        assert_eq!(te1.dynamic_vorp, te1.scored.vorp_score);
    }

    #[test]
    fn available_ordering_skips_drafted() {
        let (players, config) = setup();
        let state = DraftState::new(1, 2).with_drafted(["RB5", "RB6", "QB1"]);
        let scoring = score_dynamic(&players, &config, &state).unwrap();

        let board: Vec<&str> = scoring
            .available_by_dynamic_vorp()
            .iter()
            .map(|p| p.player_name())
            .collect();
        assert_eq!(board.len(), players.len() - 3);
        assert!(!board.contains(&"QB1"));
        // WR1 and TE1 both sit 60 over replacement; RB1 is now only 50.
        assert_eq!(&board[..3], &["WR1", "TE1", "RB1"]);
    }

    #[test]
    fn invalid_league_is_rejected() {
        let (players, _) = setup();
        let config = Config::with_league(LeagueConfig::standard(0));
        assert!(matches!(
            score_dynamic(&players, &config, &DraftState::new(1, 1)),
            Err(VorpError::InvalidConfiguration { .. })
        ));
    }
}
