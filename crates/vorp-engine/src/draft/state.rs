// Draft state: the caller's seat, the current round, and who is gone.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Snapshot of a snake draft from one team's point of view.
///
/// Owned by the caller and passed by value into the recommendation engine;
/// nothing in the engine mutates it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DraftState {
    /// Names of players already taken by any team.
    #[serde(default)]
    pub drafted_players: HashSet<String>,
    /// The caller's 1-based position in the round-1 order.
    pub draft_slot: u32,
    /// 1-based round number.
    pub current_round: u32,
}

impl DraftState {
    pub fn new(draft_slot: u32, current_round: u32) -> Self {
        DraftState {
            drafted_players: HashSet::new(),
            draft_slot,
            current_round,
        }
    }

    /// Builder-style: mark several players as drafted.
    pub fn with_drafted<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.drafted_players.extend(names.into_iter().map(Into::into));
        self
    }

    /// Record a pick. Returns false if the player was already drafted.
    pub fn mark_drafted(&mut self, player_name: impl Into<String>) -> bool {
        self.drafted_players.insert(player_name.into())
    }

    pub fn is_available(&self, player_name: &str) -> bool {
        !self.drafted_players.contains(player_name)
    }

    /// Overall pick number of the caller's selection this round. Saturates
    /// at `u32::MAX`.
    pub fn overall_pick(&self, num_teams: u32) -> u32 {
        let before = self.current_round.saturating_sub(1).saturating_mul(num_teams);
        let in_round = if self.current_round % 2 == 1 {
            self.draft_slot
        } else {
            num_teams.saturating_add(1).saturating_sub(self.draft_slot)
        };
        before.saturating_add(in_round)
    }

    /// Picks made by other teams between the caller's pick this round and
    /// their next one.
    pub fn picks_until_next_turn(&self, num_teams: u32) -> u32 {
        picks_until_next_turn(self.current_round, self.draft_slot, num_teams)
    }
}

/// Picks by other teams before `slot` picks again in a snake draft.
///
/// Odd rounds run 1..=teams and even rounds reverse, so after an odd-round
/// pick the teams behind the caller pick twice (once now, once on the way
/// back) before the caller does: `2 * (teams - slot)`. After an even-round
/// pick it is the teams ahead: `2 * (slot - 1)`.
pub fn picks_until_next_turn(round: u32, slot: u32, num_teams: u32) -> u32 {
    let behind_or_ahead = if round % 2 == 1 {
        num_teams.saturating_sub(slot)
    } else {
        slot.saturating_sub(1)
    };
    behind_or_ahead.saturating_mul(2)
}
