use crate::belief::Knowledge;
use crate::game::error::ActionError;
use crate::game::match_state::{DrawOutcome, Game};
use crate::game::ports::Presentation;
use crate::model::card::{Card, CardKind};
use crate::model::contestant::Seat;
use rand::Rng;

impl<P: Presentation> Game<P> {
    /// Takes one card into `seat`'s hand, or resolves the bomb it turned out
    /// to be. Always requests the end of the current sub-turn on success.
    pub(super) fn draw_for(&mut self, seat: Seat, from_bottom: bool) -> Result<DrawOutcome, ActionError> {
        let contestant = &self.contestants[seat.index()];
        if contestant.is_hand_full() {
            return Err(ActionError::HandFull {
                limit: contestant.hand_limit(),
            });
        }
        let Some(drawn) = self.stack.draw(from_bottom, &mut self.rng) else {
            return Err(ActionError::EmptyDraw);
        };
        if drawn.refilled {
            self.presentation
                .notify("The discard pile is shuffled back into the stack", false);
        }
        self.tally[seat.index()].cards_drawn += 1;

        let card = drawn.card;
        let outcome = if card.is(CardKind::Bomb) {
            self.resolve_bomb(seat, card)
        } else {
            self.contestants[seat.index()].hand_mut().add(card);
            let name = self.contestants[seat.index()].name();
            if seat.is_bot() {
                self.presentation.notify(&format!("{name} draws a card"), false);
                self.presentation.notify(&format!("{name} drew {card}"), true);
            } else {
                self.presentation.notify(&format!("{name} draws {card}"), false);
            }
            DrawOutcome::Gained(card)
        };

        self.turn.request_end_turn();
        Ok(outcome)
    }

    fn resolve_bomb(&mut self, seat: Seat, bomb: Card) -> DrawOutcome {
        let name = self.contestants[seat.index()].name().to_string();
        self.presentation.notify(&format!("{name} draws a Bomb!"), false);

        let Some(defuse) = self.contestants[seat.index()]
            .hand_mut()
            .take_kind(CardKind::Defuse)
        else {
            self.presentation
                .notify(&format!("{name} has no Defuse and explodes"), false);
            self.contestants[seat.index()].eliminate();
            self.turn.request_end_all();
            return DrawOutcome::Exploded(bomb);
        };

        self.stack.discard(defuse);
        self.tally[seat.index()].bombs_defused += 1;
        self.presentation
            .notify(&format!("{name} defuses the Bomb"), false);

        let max_position = self.stack.len();
        let (position, fallback, knowledge) = if seat.is_bot() {
            let position = self.rng.gen_range(0..=max_position);
            self.presentation
                .notify(&format!("{name} slips the Bomb back into the stack"), false);
            self.presentation.notify(
                &format!("{name} put the Bomb at position {position} of 0-{max_position}"),
                true,
            );
            (position, false, Knowledge::Known(bomb))
        } else {
            let (position, fallback) = match self.presentation.prompt_insert_position(max_position) {
                Some(position) if position <= max_position => (position, false),
                reply => {
                    let position = self.rng.gen_range(0..=max_position);
                    let reason = match reply {
                        Some(asked) => format!("Position {asked} is outside 0-{max_position}"),
                        None => "No position chosen".to_string(),
                    };
                    self.presentation.notify(
                        &format!("{reason}; the Bomb goes to position {position}"),
                        false,
                    );
                    (position, true)
                }
            };
            (position, fallback, Knowledge::Unknown)
        };

        let inserted = self.stack.insert(position, bomb, knowledge);
        debug_assert!(inserted, "bomb position {position} out of range");

        let owed = self.turn.remaining_turns();
        if owed > 1 {
            self.presentation.notify(
                &format!("{name}'s other {} owed turn(s) are forfeited", owed - 1),
                false,
            );
        }
        self.turn.request_end_all();
        DrawOutcome::Defused {
            bomb,
            position,
            fallback,
        }
    }
}
