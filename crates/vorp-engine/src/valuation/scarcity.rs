// Positional scarcity insights over a scored player pool.
//
// Summarizes how much above-replacement talent each position holds relative
// to how many starters the league needs there, and how steeply VORP falls
// off at the top of each position.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::config::Config;
use crate::player::{Position, SUPPORTED_POSITIONS};
use crate::valuation::order_desc;
use crate::valuation::vorp::ScoredPlayer;

/// Ranks covered by the per-position dropoff breakdown.
const DROPOFF_RANKS: usize = 5;

// ---------------------------------------------------------------------------
// Insight types
// ---------------------------------------------------------------------------

/// VORP lost moving from one positional rank to the next.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VorpDropoff {
    pub from_rank: usize,
    pub to_rank: usize,
    pub dropoff: f64,
}

/// Breakdown for one supported position present in the pool.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionInsight {
    pub position: Position,
    pub total_players: usize,
    pub positive_vorp_players: usize,
    /// Players in the top configured VORP tier.
    pub elite_vorp_players: usize,
    pub top_vorp_player: String,
    pub top_vorp_score: f64,
    pub replacement_points: f64,
    /// Empty when the position has fewer than five players.
    pub dropoffs: Vec<VorpDropoff>,
}

/// Summary of a scored pool.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insights {
    /// Players with `vorp_score > 0`, all positions.
    pub total_positive_vorp: usize,
    /// Population mean of `vorp_score`; 0.0 for an empty pool.
    pub average_vorp: f64,
    /// Position with the fewest positive-VORP players per starter slot.
    pub most_scarce_position: Option<Position>,
    pub positions: Vec<PositionInsight>,
    /// VORP tier label -> player count.
    pub vorp_distribution: BTreeMap<String, usize>,
    /// Positive-VORP players per starter slot, for positions with demand.
    pub scarcity_ratios: BTreeMap<Position, f64>,
}

impl Insights {
    pub fn position(&self, position: Position) -> Option<&PositionInsight> {
        self.positions.iter().find(|p| p.position == position)
    }
}

// ---------------------------------------------------------------------------
// Core computation
// ---------------------------------------------------------------------------

/// Summarize a scored pool.
///
/// The scarcity ratio for a position is its positive-VORP player count
/// divided by starters per team. The smallest ratio is the most scarce
/// position; ties go to the alphabetically first code. Positions with zero
/// demand are not candidates.
pub fn summarize(scored: &[ScoredPlayer], config: &Config) -> Insights {
    let total_positive_vorp = scored.iter().filter(|p| p.vorp_score > 0.0).count();
    let average_vorp = if scored.is_empty() {
        0.0
    } else {
        scored.iter().map(|p| p.vorp_score).sum::<f64>() / scored.len() as f64
    };

    let mut vorp_distribution: BTreeMap<String, usize> = BTreeMap::new();
    for p in scored {
        *vorp_distribution.entry(p.vorp_tier.clone()).or_insert(0) += 1;
    }

    let elite_label = config.strategy.vorp_tiers.top_label();

    let mut positions = Vec::new();
    let mut scarcity_ratios = BTreeMap::new();
    let mut most_scarce: Option<(Position, f64)> = None;

    for &pos in SUPPORTED_POSITIONS {
        let pool: Vec<&ScoredPlayer> = scored.iter().filter(|p| p.position() == Some(pos)).collect();
        let positive = pool.iter().filter(|p| p.vorp_score > 0.0).count();

        let demand = config.league.starters_per_team(pos);
        if demand > 0 {
            let ratio = positive as f64 / demand as f64;
            scarcity_ratios.insert(pos, ratio);
            // SUPPORTED_POSITIONS is in code order, so strict < keeps the
            // alphabetically first position on ties.
            if most_scarce.map_or(true, |(_, best)| ratio < best) {
                most_scarce = Some((pos, ratio));
            }
        }

        if let Some(insight) = position_insight(pos, &pool, positive, elite_label) {
            positions.push(insight);
        }
    }

    Insights {
        total_positive_vorp,
        average_vorp,
        most_scarce_position: most_scarce.map(|(pos, _)| pos),
        positions,
        vorp_distribution,
        scarcity_ratios,
    }
}

fn position_insight(
    position: Position,
    pool: &[&ScoredPlayer],
    positive_vorp_players: usize,
    elite_label: Option<&str>,
) -> Option<PositionInsight> {
    let order = order_desc(pool, |p| p.vorp_score);
    let top = pool.get(*order.first()?)?;

    let dropoffs = if pool.len() >= DROPOFF_RANKS {
        order
            .windows(2)
            .take(DROPOFF_RANKS)
            .enumerate()
            .map(|(i, pair)| VorpDropoff {
                from_rank: i + 1,
                to_rank: i + 2,
                dropoff: pool[pair[0]].vorp_score - pool[pair[1]].vorp_score,
            })
            .collect()
    } else {
        Vec::new()
    };

    Some(PositionInsight {
        position,
        total_players: pool.len(),
        positive_vorp_players,
        elite_vorp_players: elite_label
            .map(|label| pool.iter().filter(|p| p.vorp_tier == label).count())
            .unwrap_or(0),
        top_vorp_player: top.player_name().to_string(),
        top_vorp_score: top.vorp_score,
        replacement_points: top.replacement_points,
        dropoffs,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LeagueConfig;
    use crate::player::PlayerProjection;
    use crate::valuation::vorp::score;

    fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
        (a - b).abs() < epsilon
    }

    fn ladder(pos: &str, count: usize, start: f64, step: f64) -> Vec<PlayerProjection> {
        (0..count)
            .map(|i| PlayerProjection::new(format!("{pos}{}", i + 1), pos, start - (i as f64) * step))
            .collect()
    }

    /// 2 teams, QB 1 / RB 2 / WR 2 / TE 1.
    fn test_config() -> Config {
        Config::with_league(LeagueConfig::standard(2))
    }

    fn scored_pool() -> Vec<ScoredPlayer> {
        let mut players = ladder("QB", 4, 380.0, 20.0); // repl 340: 2 positive
        players.extend(ladder("RB", 8, 330.0, 20.0)); // repl 250: 4 positive
        players.extend(ladder("WR", 8, 290.0, 10.0)); // repl 250: 4 positive
        players.extend(ladder("TE", 3, 190.0, 30.0)); // repl 130: 2 positive
        score(&players, &test_config()).unwrap()
    }

    #[test]
    fn counts_and_average() {
        let scored = scored_pool();
        let insights = summarize(&scored, &test_config());
        assert_eq!(insights.total_positive_vorp, 12);

        let mean = scored.iter().map(|p| p.vorp_score).sum::<f64>() / scored.len() as f64;
        assert!(approx_eq(insights.average_vorp, mean, 1e-9));

        let total: usize = insights.vorp_distribution.values().sum();
        assert_eq!(total, scored.len());
    }

    #[test]
    fn most_scarce_is_lowest_ratio() {
        // QB 2/1, RB 4/2, WR 4/2, TE 2/1: all tie at 2.0, QB wins alphabetically.
        let insights = summarize(&scored_pool(), &test_config());
        assert_eq!(insights.most_scarce_position, Some(Position::Quarterback));
        assert!(approx_eq(insights.scarcity_ratios[&Position::RunningBack], 2.0, 1e-12));

        // Doubling WR demand halves its ratio.
        let mut config = test_config();
        config.league.starting_lineup.insert("WR".into(), 4);
        let insights = summarize(&scored_pool(), &config);
        assert_eq!(insights.most_scarce_position, Some(Position::WideReceiver));
    }

    #[test]
    fn position_with_no_positive_vorp_is_most_scarce() {
        let mut players = ladder("QB", 4, 380.0, 20.0);
        players.extend(ladder("RB", 8, 330.0, 20.0));
        players.extend(ladder("WR", 8, 290.0, 10.0));
        // Every TE projects the same: all sit exactly at replacement.
        players.extend(ladder("TE", 3, 150.0, 0.0));
        let config = test_config();
        let scored = score(&players, &config).unwrap();
        let insights = summarize(&scored, &config);

        assert_eq!(insights.most_scarce_position, Some(Position::TightEnd));
        assert!(approx_eq(insights.scarcity_ratios[&Position::TightEnd], 0.0, 1e-12));
    }

    #[test]
    fn zero_demand_positions_are_skipped() {
        let mut config = test_config();
        config.league.starting_lineup.insert("TE".into(), 0);
        let mut players = ladder("QB", 4, 380.0, 20.0);
        players.extend(ladder("TE", 3, 150.0, 0.0));
        let scored = score(&players, &config).unwrap();

        let insights = summarize(&scored, &config);
        assert!(!insights.scarcity_ratios.contains_key(&Position::TightEnd));
        // RB and WR have demand but no players: ratio 0, RB first alphabetically.
        assert_eq!(insights.most_scarce_position, Some(Position::RunningBack));
    }

    #[test]
    fn no_demand_anywhere_gives_none() {
        let mut config = test_config();
        for code in ["QB", "RB", "WR", "TE"] {
            config.league.starting_lineup.insert(code.into(), 0);
        }
        let scored = score(&ladder("QB", 3, 300.0, 10.0), &config).unwrap();
        let insights = summarize(&scored, &config);
        assert_eq!(insights.most_scarce_position, None);
        assert!(insights.scarcity_ratios.is_empty());
    }

    #[test]
    fn position_breakdown() {
        let insights = summarize(&scored_pool(), &test_config());
        let rb = insights.position(Position::RunningBack).unwrap();
        assert_eq!(rb.total_players, 8);
        assert_eq!(rb.positive_vorp_players, 4);
        assert_eq!(rb.top_vorp_player, "RB1");
        assert!(approx_eq(rb.top_vorp_score, 80.0, 1e-9));
        assert!(approx_eq(rb.replacement_points, 250.0, 1e-9));
        assert_eq!(rb.elite_vorp_players, 1);

        assert_eq!(rb.dropoffs.len(), 5);
        assert_eq!(rb.dropoffs[0].from_rank, 1);
        assert_eq!(rb.dropoffs[4].to_rank, 6);
        for d in &rb.dropoffs {
            assert!(approx_eq(d.dropoff, 20.0, 1e-9));
        }

        // Fewer than five TEs: no dropoff breakdown.
        let te = insights.position(Position::TightEnd).unwrap();
        assert!(te.dropoffs.is_empty());
    }

    #[test]
    fn exactly_five_players_gives_four_dropoffs() {
        let config = test_config();
        let scored = score(&ladder("WR", 5, 250.0, 5.0), &config).unwrap();
        let insights = summarize(&scored, &config);
        let wr = insights.position(Position::WideReceiver).unwrap();
        assert_eq!(wr.dropoffs.len(), 4);
    }

    #[test]
    fn empty_pool() {
        let insights = summarize(&[], &test_config());
        assert_eq!(insights.total_positive_vorp, 0);
        assert_eq!(insights.average_vorp, 0.0);
        assert!(insights.positions.is_empty());
        // Every position has demand and zero supply; QB is first.
        assert_eq!(insights.most_scarce_position, Some(Position::Quarterback));
    }
}
