//! What each card does once it resolves.
//!
//! Effects only touch the stack, the hands and the flags on
//! [`TurnState`](crate::game::TurnState); advancing the turn is left to the
//! caller.

use crate::game::error::ActionError;
use crate::game::match_state::{DrawOutcome, Game};
use crate::game::ports::Presentation;
use crate::model::card::{Card, CardKind};
use crate::model::contestant::Seat;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EffectOutcome {
    Applied,
    /// Cards the actor saw, top-first.
    Revealed(Vec<Card>),
    /// New top-first order. `fallback` is set when the human's reply was
    /// unusable and the original order was kept.
    Rearranged { order: Vec<Card>, fallback: bool },
    Drew(DrawOutcome),
    Failed(EffectFailure),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectFailure {
    NothingToReveal,
    StackTooSmall,
    Draw(ActionError),
}

impl Card {
    pub(crate) fn apply<P: Presentation>(
        self,
        game: &mut Game<P>,
        actor: Seat,
        opponent: Seat,
    ) -> EffectOutcome {
        match self.kind() {
            // never reach here through play_card
            CardKind::Bomb | CardKind::Defuse => EffectOutcome::Applied,
            CardKind::Negate => negate(game, actor, opponent),
            CardKind::Attack => attack(game, actor, opponent),
            CardKind::Skip => skip(game, actor),
            CardKind::SuperSkip => super_skip(game, actor),
            CardKind::Shuffle => shuffle(game, actor),
            CardKind::Swap => swap(game),
            CardKind::DrawFromBottom => draw_from_bottom(game, actor),
            CardKind::SeeFuture(depth) => see_future(game, actor, depth),
            CardKind::AlterFuture(depth) => alter_future(game, actor, depth),
        }
    }
}

fn name_of<P>(game: &Game<P>, seat: Seat) -> String {
    game.contestants[seat.index()].name().to_string()
}

fn negate<P: Presentation>(game: &mut Game<P>, actor: Seat, opponent: Seat) -> EffectOutcome {
    game.turn.negate(opponent);
    let target = name_of(game, opponent);
    game.presentation.notify(
        &format!("{target}'s next card will have no effect"),
        actor.is_bot(),
    );
    EffectOutcome::Applied
}

fn attack<P: Presentation>(game: &mut Game<P>, actor: Seat, opponent: Seat) -> EffectOutcome {
    game.turn.add_turns(2);
    game.turn.transfer_to(opponent);
    game.turn.request_end_turn();
    let attacker = name_of(game, actor);
    let target = name_of(game, opponent);
    // the advance at the end of this sub-turn takes one off
    let owed = game.turn.remaining_turns() - 1;
    game.presentation
        .notify(&format!("{attacker} attacks, {target} now owes {owed} turn(s)"), false);
    EffectOutcome::Applied
}

fn skip<P: Presentation>(game: &mut Game<P>, actor: Seat) -> EffectOutcome {
    game.turn.request_end_turn();
    let name = name_of(game, actor);
    game.presentation
        .notify(&format!("{name} skips one turn without drawing"), false);
    EffectOutcome::Applied
}

fn super_skip<P: Presentation>(game: &mut Game<P>, actor: Seat) -> EffectOutcome {
    game.turn.request_end_all();
    let name = name_of(game, actor);
    game.presentation
        .notify(&format!("{name} skips every owed turn"), false);
    EffectOutcome::Applied
}

fn shuffle<P: Presentation>(game: &mut Game<P>, actor: Seat) -> EffectOutcome {
    game.stack.shuffle(&mut game.rng);
    let name = name_of(game, actor);
    game.presentation
        .notify(&format!("{name} shuffles the stack"), false);
    EffectOutcome::Applied
}

fn swap<P: Presentation>(game: &mut Game<P>) -> EffectOutcome {
    if !game.stack.swap_ends() {
        game.presentation
            .notify("Not enough cards in the stack to swap", false);
        return EffectOutcome::Failed(EffectFailure::StackTooSmall);
    }
    game.presentation
        .notify("The top and bottom cards trade places", false);
    EffectOutcome::Applied
}

fn draw_from_bottom<P: Presentation>(game: &mut Game<P>, actor: Seat) -> EffectOutcome {
    let name = name_of(game, actor);
    game.presentation
        .notify(&format!("{name} draws from the bottom"), false);
    match game.draw_for(actor, true) {
        Ok(outcome) => EffectOutcome::Drew(outcome),
        Err(err) => {
            game.presentation.notify(&format!("{name}: {err}"), false);
            EffectOutcome::Failed(EffectFailure::Draw(err))
        }
    }
}

fn see_future<P: Presentation>(game: &mut Game<P>, actor: Seat, depth: u8) -> EffectOutcome {
    let count = usize::from(depth).min(game.stack.len());
    if count == 0 {
        game.presentation
            .notify("The stack is empty, there is nothing to see", false);
        return EffectOutcome::Failed(EffectFailure::NothingToReveal);
    }

    let cards = game.stack.peek_top(count);
    let name = name_of(game, actor);
    game.presentation
        .notify(&format!("{name} looks at the top {count} card(s)"), false);
    if actor.is_bot() {
        game.stack.record_top(count);
    }
    game.presentation
        .notify(&format!("Top of the stack: {}", list(&cards)), actor.is_bot());
    EffectOutcome::Revealed(cards)
}

fn alter_future<P: Presentation>(game: &mut Game<P>, actor: Seat, depth: u8) -> EffectOutcome {
    let count = usize::from(depth).min(game.stack.len());
    if count == 0 {
        game.presentation
            .notify("The stack is empty, there is nothing to rearrange", false);
        return EffectOutcome::Failed(EffectFailure::NothingToReveal);
    }

    let mut cards = game.stack.take_top(count);
    let name = name_of(game, actor);
    game.presentation
        .notify(&format!("{name} rearranges the top {count} card(s)"), false);

    if actor.is_bot() {
        arrange_bomb(&mut cards, game.turn.remaining_turns());
        game.presentation
            .notify(&format!("Top of the stack: {}", list(&cards)), true);
        game.stack.put_top(cards.clone(), true);
        return EffectOutcome::Rearranged {
            order: cards,
            fallback: false,
        };
    }

    let (order, fallback) = match game.presentation.prompt_reorder(&cards) {
        None => (cards, false),
        Some(permutation) => match permuted(&cards, &permutation) {
            Some(order) => (order, false),
            None => {
                game.presentation
                    .notify("That order is not valid, the cards stay as they were", false);
                (cards, true)
            }
        },
    };
    game.presentation
        .notify(&format!("Top of the stack: {}", list(&order)), false);
    game.stack.put_top(order.clone(), false);
    EffectOutcome::Rearranged { order, fallback }
}

/// Puts a bomb where the opponent will hit it: second from the top when this
/// is the bot's last owed turn, otherwise on top. Returns whether a bomb was
/// moved.
fn arrange_bomb(cards: &mut [Card], remaining_turns: u32) -> bool {
    if cards.len() < 2 {
        return false;
    }
    let Some(bomb) = cards.iter().position(|c| c.is(CardKind::Bomb)) else {
        return false;
    };
    let target = if remaining_turns == 1 { 1 } else { 0 };
    cards.swap(bomb, target);
    true
}

/// Reorders `cards` by `permutation`, refusing anything that is not a
/// permutation of `0..cards.len()`.
fn permuted(cards: &[Card], permutation: &[usize]) -> Option<Vec<Card>> {
    if permutation.len() != cards.len() {
        return None;
    }
    let mut seen = vec![false; cards.len()];
    let mut order = Vec::with_capacity(cards.len());
    for &index in permutation {
        if *seen.get(index)? {
            return None;
        }
        seen[index] = true;
        order.push(cards[index]);
    }
    Some(order)
}

fn list(cards: &[Card]) -> String {
    cards
        .iter()
        .enumerate()
        .map(|(i, card)| format!("{}. {card}", i + 1))
        .collect::<Vec<_>>()
        .join(", ")
}
