// Player identity, positions, and the projection record fed into the engine.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// Football positions the engine computes replacement baselines for.
///
/// The derived ordering follows the alphabetical order of the position codes
/// (QB < RB < TE < WR), which is what every deterministic tie-break between
/// positions relies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Position {
    #[serde(rename = "QB")]
    Quarterback,
    #[serde(rename = "RB")]
    RunningBack,
    #[serde(rename = "TE")]
    TightEnd,
    #[serde(rename = "WR")]
    WideReceiver,
}

/// Supported positions, in code order.
pub const SUPPORTED_POSITIONS: &[Position] = &[
    Position::Quarterback,
    Position::RunningBack,
    Position::TightEnd,
    Position::WideReceiver,
];

impl Position {
    /// Parse a position code ("QB", "rb", " WR ") into a Position.
    /// Returns `None` for anything outside the supported set (K, DST, FLEX, ...).
    pub fn from_str_pos(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "QB" => Some(Position::Quarterback),
            "RB" => Some(Position::RunningBack),
            "WR" => Some(Position::WideReceiver),
            "TE" => Some(Position::TightEnd),
            _ => None,
        }
    }

    /// Return the position code.
    pub fn display_str(&self) -> &'static str {
        match self {
            Position::Quarterback => "QB",
            Position::RunningBack => "RB",
            Position::WideReceiver => "WR",
            Position::TightEnd => "TE",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_str())
    }
}

// ---------------------------------------------------------------------------
// Projection input
// ---------------------------------------------------------------------------

/// One row of the projection table.
///
/// `player_name` is the identity used everywhere in the engine (drafted-player
/// exclusion, output rows). Row order is significant only as the tie-break
/// between otherwise equal players.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerProjection {
    pub player_name: String,
    /// Raw position code as it appears in the source table.
    pub position: String,
    pub projected_points: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consensus_adp: Option<f64>,
    /// Extra named ADP columns (e.g. "sleeper", "espn").
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub adp_sources: BTreeMap<String, f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_games_played: Option<f64>,
}

impl PlayerProjection {
    pub fn new(player_name: impl Into<String>, position: impl Into<String>, projected_points: f64) -> Self {
        PlayerProjection {
            player_name: player_name.into(),
            position: position.into(),
            projected_points,
            consensus_adp: None,
            adp_sources: BTreeMap::new(),
            expected_games_played: None,
        }
    }

    /// Builder-style setter for the consensus ADP column.
    pub fn with_adp(mut self, adp: f64) -> Self {
        self.consensus_adp = Some(adp);
        self
    }

    /// Builder-style setter for a named ADP source column.
    pub fn with_adp_source(mut self, source: impl Into<String>, adp: f64) -> Self {
        self.adp_sources.insert(source.into(), adp);
        self
    }

    pub fn with_expected_games(mut self, games: f64) -> Self {
        self.expected_games_played = Some(games);
        self
    }

    /// The parsed position, or `None` when the code is outside the supported set.
    pub fn supported_position(&self) -> Option<Position> {
        Position::from_str_pos(&self.position)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
