//! Post-match summary. This is a report for tooling, not a save format: a
//! match cannot be resumed from it.

use crate::game::match_state::Game;
use crate::game::turn::{MatchOutcome, TurnPhase};
use crate::model::contestant::Seat;
use serde::{Deserialize, Serialize};

/// Per-seat counters kept while the match runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatTally {
    pub cards_played: u32,
    pub cards_negated: u32,
    pub cards_drawn: u32,
    pub bombs_defused: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub seed: u64,
    pub outcome: Option<MatchOutcome>,
    pub sub_turns: u64,
    pub human: SeatTally,
    pub bot: SeatTally,
    pub stack_remaining: usize,
    pub discard_size: usize,
    pub bot_known_slots: usize,
}

impl MatchRecord {
    pub fn capture<P>(game: &Game<P>) -> Self {
        Self {
            seed: game.seed,
            outcome: match game.phase {
                TurnPhase::MatchOver(outcome) => Some(outcome),
                _ => None,
            },
            sub_turns: game.turn.sub_turns_completed(),
            human: game.tally[Seat::Human.index()],
            bot: game.tally[Seat::Bot.index()],
            stack_remaining: game.stack.len(),
            discard_size: game.stack.discard_pile().len(),
            bot_known_slots: game.stack.belief().known_count(),
        }
    }

    pub fn winner(&self) -> Option<Seat> {
        self.outcome.and_then(MatchOutcome::winner)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(input: &str) -> serde_json::Result<Self> {
        serde_json::from_str(input)
    }
}

impl<P> Game<P> {
    pub fn record(&self) -> MatchRecord {
        MatchRecord::capture(self)
    }
}
