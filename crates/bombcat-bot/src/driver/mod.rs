//! Runs a match from the outside: automated sub-turns through a [`Policy`],
//! human action points through an [`InputPort`].

mod input;

pub use input::PolicyInput;

use crate::policy::{Policy, PolicyContext};
use bombcat_core::game::{Action, ActionError, Game, InputPort, MatchOutcome, Presentation};
use bombcat_core::model::contestant::Seat;
use rand::RngCore;
use thiserror::Error;
use tracing::{Level, event};

/// Upper bound on plays inside one automated sub-turn before a draw is forced.
pub const MAX_ACTIONS_PER_SUB_TURN: u32 = 64;
/// Consecutive refused human actions tolerated by [`drive_match`].
pub const MAX_HUMAN_REJECTIONS: u32 = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DriverError {
    #[error("{seat} could not make a legal move after {attempts} attempts")]
    Stalled { seat: Seat, attempts: u32 },
    #[error("match did not finish within {limit} sub-turns")]
    TurnLimit { limit: u64 },
}

/// What happened during one automated sub-turn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BotTurn {
    pub actions: u32,
    pub rejected: u32,
}

/// Plays the bot's current sub-turn to its end. Does nothing if the bot does
/// not own the turn or the match is over.
pub fn run_bot_turn<P: Presentation>(
    game: &mut Game<P>,
    policy: &mut dyn Policy,
    rng: &mut dyn RngCore,
) -> Result<BotTurn, DriverError> {
    let mut turn = BotTurn::default();
    if game.is_over() || game.owner() != Seat::Bot {
        return Ok(turn);
    }
    let started = game.turn().sub_turns_completed();
    game.presentation_mut().notify("The AI is thinking", false);

    while !game.is_over() && game.turn().sub_turns_completed() == started {
        let action = if turn.actions >= MAX_ACTIONS_PER_SUB_TURN {
            Action::DRAW
        } else {
            let view = game.view(Seat::Bot);
            let ctx = PolicyContext::from_view(&view, game.belief());
            policy.decide(&ctx, rng).action
        };

        match game.apply_action(Seat::Bot, action) {
            Ok(_) => turn.actions += 1,
            Err(err) => {
                turn.rejected += 1;
                event!(
                    target: "bombcat_bot::driver",
                    Level::DEBUG,
                    policy = policy.name(),
                    action = ?action,
                    error = %err,
                    "bot action refused"
                );
                recover(game, action, err)?;
                turn.actions += 1;
            }
        }
    }
    Ok(turn)
}

/// Second chance after a refused bot action: a refused play becomes a draw,
/// a refused draw becomes the first playable card.
fn recover<P: Presentation>(
    game: &mut Game<P>,
    refused: Action,
    err: ActionError,
) -> Result<(), DriverError> {
    let stalled = DriverError::Stalled {
        seat: Seat::Bot,
        attempts: 2,
    };
    let fallback = match (refused, err) {
        (_, ActionError::MatchOver | ActionError::OutOfTurn { .. }) => return Ok(()),
        (Action::Play(_), _) => Action::DRAW,
        (Action::Draw { .. }, _) => match game.playable_cards(Seat::Bot).first() {
            Some(card) => Action::Play(card.id()),
            None => return Err(stalled),
        },
    };
    game.apply_action(Seat::Bot, fallback)
        .map(|_| ())
        .map_err(|_| stalled)
}

/// Alternates human input and bot sub-turns until the match ends.
pub fn drive_match<P, I>(
    game: &mut Game<P>,
    human: &mut I,
    bot: &mut dyn Policy,
    rng: &mut dyn RngCore,
    max_sub_turns: u64,
) -> Result<MatchOutcome, DriverError>
where
    P: Presentation,
    I: InputPort + ?Sized,
{
    let mut rejections = 0;
    loop {
        if let Some(outcome) = game.outcome() {
            return Ok(outcome);
        }
        if game.turn().sub_turns_completed() >= max_sub_turns {
            return Err(DriverError::TurnLimit {
                limit: max_sub_turns,
            });
        }

        match game.owner() {
            Seat::Bot => {
                run_bot_turn(game, bot, rng)?;
            }
            Seat::Human => {
                let action = human.request_human_action(&game.view(Seat::Human));
                match game.apply_action(Seat::Human, action) {
                    Ok(_) => rejections = 0,
                    Err(_) => {
                        rejections += 1;
                        if rejections >= MAX_HUMAN_REJECTIONS {
                            return Err(DriverError::Stalled {
                                seat: Seat::Human,
                                attempts: rejections,
                            });
                        }
                    }
                }
            }
        }
    }
}
