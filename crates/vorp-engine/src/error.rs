// Error taxonomy for the valuation and recommendation pipeline.

use serde::Serialize;
use thiserror::Error;

use crate::player::Position;

#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "kind")]
pub enum VorpError {
    /// Non-positive team count, negative or missing lineup counts, or an
    /// out-of-range engine setting. Nothing is computed when this fires.
    #[error("invalid configuration for `{field}`: {message}")]
    InvalidConfiguration { field: String, message: String },

    /// The dataset has no players at a position whose baseline or
    /// shortlist was requested. Other positions are unaffected.
    #[error("no players at position {position} in the projection pool")]
    EmptyPositionPool { position: Position },

    /// ADP comparison was requested but no row carries a usable value.
    #[error("ADP field `{field}` is missing or non-numeric on every row")]
    MissingAdpData { field: String },

    /// The round strategy table has no entry for the requested round.
    #[error("no draft strategy configured for round {round}")]
    UnconfiguredRound { round: u32 },

    /// Raised only when unknown positions are configured to be rejected.
    #[error("player `{player}` has unsupported position `{position}`")]
    UnknownPosition { player: String, position: String },
}

impl VorpError {
    pub(crate) fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        VorpError::InvalidConfiguration {
            field: field.into(),
            message: message.into(),
        }
    }
}
