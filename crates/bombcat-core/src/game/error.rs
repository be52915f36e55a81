use crate::model::card::{CardId, CardKind};
use crate::model::contestant::Seat;
use thiserror::Error;

/// Why an attempted play or draw was refused. A refused action never changes
/// match state; control stays at the same action point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("the match is already over")]
    MatchOver,
    #[error("it is {expected}'s turn, not {actual}'s")]
    OutOfTurn { expected: Seat, actual: Seat },
    #[error("card {0} is not in hand")]
    CardNotInHand(CardId),
    #[error("{0} cannot be played from hand")]
    NotPlayable(CardKind),
    #[error("{0} is already negated")]
    NegationAlreadyPending(Seat),
    #[error("hand is full ({limit} cards), play a card first")]
    HandFull { limit: usize },
    #[error("the stack and the discard pile are both empty")]
    EmptyDraw,
}
