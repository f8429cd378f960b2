// Market value: VORP rank against average draft position (ADP) rank.
//
// A positive `vorp_adp_value` means the market drafts the player later than
// their VORP says they deserve (a value pick); negative means the market
// pays more than the VORP supports.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

use crate::error::VorpError;
use crate::player::PlayerProjection;
use crate::valuation::order_desc;
use crate::valuation::tiers::TierTable;
use crate::valuation::vorp::ScoredPlayer;

/// Which ADP column to rank by.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AdpField {
    /// `consensus_adp`
    #[default]
    Consensus,
    /// A named entry in `adp_sources`.
    Source(String),
}

impl AdpField {
    pub fn name(&self) -> &str {
        match self {
            AdpField::Consensus => "consensus_adp",
            AdpField::Source(name) => name,
        }
    }

    /// Usable ADP for `player`: present, finite, and positive.
    pub fn read(&self, player: &PlayerProjection) -> Option<f64> {
        let raw = match self {
            AdpField::Consensus => player.consensus_adp,
            AdpField::Source(name) => player.adp_sources.get(name).copied(),
        };
        raw.filter(|adp| adp.is_finite() && *adp > 0.0)
    }
}

impl fmt::Display for AdpField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A scored player with market-value annotations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdpValuedPlayer {
    #[serde(flatten)]
    pub scored: ScoredPlayer,
    /// The ADP used for ranking; `None` when the row lacked a usable value.
    pub adp: Option<f64>,
    pub vorp_rank: usize,
    pub adp_rank: usize,
    /// `adp_rank - vorp_rank`.
    pub vorp_adp_value: i64,
    pub vorp_adp_tier: String,
}

impl AdpValuedPlayer {
    /// False for rows ranked without ADP; their value and tier are filler.
    pub fn has_market_data(&self) -> bool {
        self.adp.is_some()
    }

    pub fn player_name(&self) -> &str {
        self.scored.player_name()
    }
}

// ---------------------------------------------------------------------------
// Core computation
// ---------------------------------------------------------------------------

/// Rank every player by VORP and by ADP and classify the difference.
///
/// Both ranks are 1-based ordinals with ties broken by input order. Rows
/// without a usable ADP are ranked after every row that has one, in input
/// order. Output is in input order.
///
/// Fails with `MissingAdpData` when no row has a usable value in `field`.
pub fn attach_adp_value(
    scored: &[ScoredPlayer],
    field: &AdpField,
    tiers: &TierTable,
) -> Result<Vec<AdpValuedPlayer>, VorpError> {
    tiers.validate("adp_tiers")?;

    let adps: Vec<Option<f64>> = scored.iter().map(|p| field.read(&p.projection)).collect();
    let with_adp = adps.iter().filter(|a| a.is_some()).count();
    if with_adp == 0 {
        return Err(VorpError::MissingAdpData {
            field: field.name().to_string(),
        });
    }
    if with_adp < scored.len() {
        warn!(
            "{} of {} players have no usable {}; ranked last",
            scored.len() - with_adp,
            scored.len(),
            field
        );
    }

    let mut vorp_rank = vec![0usize; scored.len()];
    for (rank, i) in order_desc(scored, |p| p.vorp_score).into_iter().enumerate() {
        vorp_rank[i] = rank + 1;
    }

    // Ascending ADP == descending negated ADP. Missing rows sort as -inf,
    // i.e. after every ranked row, keeping input order among themselves.
    let mut adp_rank = vec![0usize; scored.len()];
    let adp_order = order_desc(&adps, |a| a.map_or(f64::NEG_INFINITY, |v| -v));
    for (rank, i) in adp_order.into_iter().enumerate() {
        adp_rank[i] = rank + 1;
    }

    Ok(scored
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let vorp_adp_value = adp_rank[i] as i64 - vorp_rank[i] as i64;
            AdpValuedPlayer {
                scored: p.clone(),
                adp: adps[i],
                vorp_rank: vorp_rank[i],
                adp_rank: adp_rank[i],
                vorp_adp_value,
                vorp_adp_tier: tiers.classify(vorp_adp_value as f64).to_string(),
            }
        })
        .collect())
}

/// Rows with market data and a positive value, best value first (ties by
/// input order), at most `limit`.
pub fn best_values(valued: &[AdpValuedPlayer], limit: usize) -> Vec<&AdpValuedPlayer> {
    let candidates: Vec<&AdpValuedPlayer> = valued
        .iter()
        .filter(|p| p.has_market_data() && p.vorp_adp_value > 0)
        .collect();
    order_desc(&candidates, |p| p.vorp_adp_value as f64)
        .into_iter()
        .take(limit)
        .map(|i| candidates[i])
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
