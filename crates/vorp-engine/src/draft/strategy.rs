// Round-keyed draft strategy guidance.
//
// The table is injected through configuration so the round range can be
// extended without touching the engine. Rounds outside every configured
// range are an error, never an empty string.

use serde::{Deserialize, Serialize};

use crate::error::VorpError;

/// Guidance for an inclusive range of rounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundStrategy {
    pub first_round: u32,
    pub last_round: u32,
    pub guidance: String,
}

impl RoundStrategy {
    pub fn new(first_round: u32, last_round: u32, guidance: impl Into<String>) -> Self {
        RoundStrategy {
            first_round,
            last_round,
            guidance: guidance.into(),
        }
    }

    fn covers(&self, round: u32) -> bool {
        (self.first_round..=self.last_round).contains(&round)
    }
}

/// Non-overlapping round ranges, kept sorted by `first_round`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RoundStrategyTable {
    entries: Vec<RoundStrategy>,
}

impl RoundStrategyTable {
    /// Build a table, rejecting empty guidance, inverted ranges, round 0,
    /// and overlaps. Field names in errors index the input order.
    pub fn new(entries: Vec<RoundStrategy>) -> Result<Self, VorpError> {
        let mut table = RoundStrategyTable::default();
        for (i, entry) in entries.into_iter().enumerate() {
            table.insert_checked(entry, &format!("round_strategy[{i}]"))?;
        }
        Ok(table)
    }

    /// The shipped four-phase table covering rounds 1 through 20.
    pub fn standard() -> Self {
        let entries = vec![
            RoundStrategy::new(
                1,
                3,
                "Take the best available elite talent regardless of position; \
                 lean on the highest-VORP running backs and receivers.",
            ),
            RoundStrategy::new(
                4,
                6,
                "Balance VORP with positional needs; take a quarterback or tight end \
                 only if an elite-VORP option is still on the board.",
            ),
            RoundStrategy::new(
                7,
                10,
                "Fill scarcity: target the remaining positive-VORP players at your \
                 thinnest starting positions.",
            ),
            RoundStrategy::new(
                11,
                20,
                "Handcuffs and depth: back up your starters and chase upside; \
                 VORP margins are minimal this late.",
            ),
        ];
        RoundStrategyTable { entries }
    }

    /// Add a range, e.g. to cover a longer draft.
    pub fn extend(&mut self, entry: RoundStrategy) -> Result<(), VorpError> {
        let field = format!("round_strategy[{}]", self.entries.len());
        self.insert_checked(entry, &field)
    }

    /// Guidance for `round`, or `UnconfiguredRound`.
    pub fn guidance(&self, round: u32) -> Result<&str, VorpError> {
        self.entries
            .iter()
            .find(|e| e.covers(round))
            .map(|e| e.guidance.as_str())
            .ok_or(VorpError::UnconfiguredRound { round })
    }

    /// Highest configured round.
    pub fn max_round(&self) -> Option<u32> {
        self.entries.iter().map(|e| e.last_round).max()
    }

    pub fn entries(&self) -> &[RoundStrategy] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn insert_checked(&mut self, entry: RoundStrategy, field: &str) -> Result<(), VorpError> {
        if entry.first_round == 0 {
            return Err(VorpError::invalid(field, "rounds start at 1"));
        }
        if entry.last_round < entry.first_round {
            return Err(VorpError::invalid(
                field,
                format!(
                    "last_round {} is before first_round {}",
                    entry.last_round, entry.first_round
                ),
            ));
        }
        if entry.guidance.trim().is_empty() {
            return Err(VorpError::invalid(field, "guidance must not be empty"));
        }
        if let Some(existing) = self
            .entries
            .iter()
            .find(|e| e.first_round <= entry.last_round && entry.first_round <= e.last_round)
        {
            return Err(VorpError::invalid(
                field,
                format!(
                    "rounds {}-{} overlap configured rounds {}-{}",
                    entry.first_round, entry.last_round, existing.first_round, existing.last_round
                ),
            ));
        }
        self.entries.push(entry);
        self.entries.sort_by_key(|e| e.first_round);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
