use crate::model::contestant::Seat;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchOutcome {
    Winner(Seat),
    /// Both contestants exploded.
    Draw,
}

impl MatchOutcome {
    pub const fn winner(self) -> Option<Seat> {
        match self {
            MatchOutcome::Winner(seat) => Some(seat),
            MatchOutcome::Draw => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnPhase {
    /// The owner may play cards or draw.
    OwnerActing,
    /// A sub-turn just ended and ownership is being settled.
    TurnAdvancing,
    /// Terminal; every further action is refused.
    MatchOver(MatchOutcome),
}

/// Result of settling the end of a sub-turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Advance {
    pub owner: Seat,
    pub remaining_turns: u32,
    pub ownership_changed: bool,
}

/// Whose turn it is and what they still owe.
///
/// Card effects only ever flip the flags and counters here; the actual hand
/// over happens in [`TurnState::advance`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnState {
    owner: Seat,
    remaining_turns: u32,
    end_turn: bool,
    end_all: bool,
    pending_negation: Option<Seat>,
    sub_turns_completed: u64,
}

impl TurnState {
    pub fn new(owner: Seat) -> Self {
        Self::with_remaining(owner, 1)
    }

    pub fn with_remaining(owner: Seat, remaining_turns: u32) -> Self {
        Self {
            owner,
            remaining_turns: remaining_turns.max(1),
            end_turn: false,
            end_all: false,
            pending_negation: None,
            sub_turns_completed: 0,
        }
    }

    pub fn owner(&self) -> Seat {
        self.owner
    }

    pub fn remaining_turns(&self) -> u32 {
        self.remaining_turns
    }

    pub fn pending_negation(&self) -> Option<Seat> {
        self.pending_negation
    }

    pub fn is_negated(&self, seat: Seat) -> bool {
        self.pending_negation == Some(seat)
    }

    pub fn sub_turns_completed(&self) -> u64 {
        self.sub_turns_completed
    }

    pub fn end_requested(&self) -> bool {
        self.end_turn || self.end_all
    }

    pub(crate) fn request_end_turn(&mut self) {
        self.end_turn = true;
    }

    pub(crate) fn request_end_all(&mut self) {
        self.end_turn = true;
        self.end_all = true;
    }

    pub(crate) fn add_turns(&mut self, turns: u32) {
        self.remaining_turns = self.remaining_turns.saturating_add(turns);
    }

    pub(crate) fn transfer_to(&mut self, seat: Seat) {
        self.owner = seat;
    }

    pub(crate) fn negate(&mut self, target: Seat) {
        self.pending_negation = Some(target);
    }

    /// Clears a negation aimed at `seat`, reporting whether there was one.
    pub(crate) fn consume_negation(&mut self, seat: Seat) -> bool {
        if self.is_negated(seat) {
            self.pending_negation = None;
            true
        } else {
            false
        }
    }

    /// Ends the current sub-turn.
    ///
    /// "End all" hands the turn straight to the opponent with a single owed
    /// turn. Otherwise one owed turn is spent and ownership moves only once
    /// none are left.
    pub(crate) fn advance(&mut self) -> Advance {
        let before = self.owner;
        if self.end_all {
            self.remaining_turns = 1;
            self.owner = self.owner.other();
        } else if self.remaining_turns > 0 {
            self.remaining_turns -= 1;
            if self.remaining_turns == 0 {
                self.remaining_turns = 1;
                self.owner = self.owner.other();
            }
        }
        self.end_turn = false;
        self.end_all = false;
        self.sub_turns_completed += 1;

        Advance {
            owner: self.owner,
            remaining_turns: self.remaining_turns,
            ownership_changed: before != self.owner,
        }
    }
}
