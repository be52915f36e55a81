use crate::belief::StackBelief;
use crate::game::config::{ConfigError, MatchConfig};
use crate::game::effects::EffectOutcome;
use crate::game::error::ActionError;
use crate::game::ports::{Action, Presentation, TracingPresentation};
use crate::game::record::SeatTally;
use crate::game::turn::{MatchOutcome, TurnPhase, TurnState};
use crate::model::card::{Card, CardId, CardKind};
use crate::model::contestant::{Contestant, Seat};
use crate::model::hand::Hand;
use crate::model::stack::Stack;
use rand::SeedableRng;
use rand::rngs::StdRng;

const HUMAN_NAME: &str = "Player";
const BOT_NAME: &str = "AI";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawOutcome {
    Gained(Card),
    /// The bomb went back into the stack at `position` (counted from the
    /// bottom). `fallback` is set when the human gave no usable position.
    Defused {
        bomb: Card,
        position: usize,
        fallback: bool,
    },
    Exploded(Card),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayOutcome {
    /// A pending negation swallowed the card; the sub-turn goes on.
    Negated(Card),
    Resolved {
        card: Card,
        effect: EffectOutcome,
        turn_ended: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    Played(PlayOutcome),
    Drew(DrawOutcome),
}

/// Explicit starting position for a match, bypassing the shuffled deal.
#[derive(Debug, Clone)]
pub struct MatchSetup {
    pub stack: Stack,
    pub hands: [Vec<Card>; 2],
    pub first: Seat,
    pub remaining_turns: u32,
}

impl MatchSetup {
    pub fn new(stack: Stack) -> Self {
        Self {
            stack,
            hands: [Vec::new(), Vec::new()],
            first: Seat::Human,
            remaining_turns: 1,
        }
    }

    pub fn with_hand(mut self, seat: Seat, cards: Vec<Card>) -> Self {
        self.hands[seat.index()] = cards;
        self
    }

    pub fn starting(mut self, seat: Seat, remaining_turns: u32) -> Self {
        self.first = seat;
        self.remaining_turns = remaining_turns;
        self
    }
}

/// What one contestant can see at an action point.
#[derive(Debug, Clone)]
pub struct SeatView<'a> {
    pub seat: Seat,
    pub hand: &'a Hand,
    pub playable: Vec<Card>,
    pub hand_limit: usize,
    pub stack_len: usize,
    pub discard_len: usize,
    pub owner: Seat,
    pub remaining_turns: u32,
    pub negated: bool,
}

impl SeatView<'_> {
    pub fn is_hand_full(&self) -> bool {
        self.hand.len() >= self.hand_limit
    }
}

/// The turn controller: the single mutable context every card effect runs
/// against.
#[derive(Debug)]
pub struct Game<P = TracingPresentation> {
    pub(super) config: MatchConfig,
    pub(super) stack: Stack,
    pub(super) contestants: [Contestant; 2],
    pub(super) turn: TurnState,
    pub(super) phase: TurnPhase,
    pub(super) rng: StdRng,
    pub(super) seed: u64,
    pub(super) presentation: P,
    pub(super) tally: [SeatTally; 2],
}

impl Game<TracingPresentation> {
    pub fn new(config: MatchConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::with_presentation(config, seed, TracingPresentation)
    }
}

impl<P: Presentation> Game<P> {
    /// Builds the stack, deals both opening hands and hands the first turn to
    /// the human.
    pub fn with_presentation(
        config: MatchConfig,
        seed: u64,
        presentation: P,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut rng = StdRng::seed_from_u64(seed);
        let mut stack = Stack::build(&config.deck, &mut rng);
        let mut hands: [Vec<Card>; 2] = [Vec::new(), Vec::new()];

        for seat in Seat::LOOP {
            let hand = &mut hands[seat.index()];
            if config.guaranteed_defuse {
                if let Some(defuse) = stack.take_first_from_top(|c| c.is(CardKind::Defuse)) {
                    hand.push(defuse);
                }
            }
            for _ in 0..config.initial_hand {
                match stack.take_first_from_top(|c| !c.is(CardKind::Bomb)) {
                    Some(card) => hand.push(card),
                    None => break,
                }
            }
        }

        let setup = MatchSetup {
            stack,
            hands,
            first: Seat::Human,
            remaining_turns: 1,
        };
        let mut game = Self::assemble(config, setup, rng, seed, presentation);
        game.presentation.notify("The match begins", false);
        game.presentation.refresh();
        Ok(game)
    }

    /// Starts from an explicit position. The configuration is used for hand
    /// limits only and is not validated.
    pub fn from_setup(config: MatchConfig, setup: MatchSetup, seed: u64, presentation: P) -> Self {
        let rng = StdRng::seed_from_u64(seed);
        Self::assemble(config, setup, rng, seed, presentation)
    }

    fn assemble(
        config: MatchConfig,
        setup: MatchSetup,
        rng: StdRng,
        seed: u64,
        presentation: P,
    ) -> Self {
        let [human_hand, bot_hand] = setup.hands;
        let contestants = [
            Contestant::new(HUMAN_NAME, Seat::Human, config.hand_limit).with_hand(human_hand),
            Contestant::new(BOT_NAME, Seat::Bot, config.hand_limit).with_hand(bot_hand),
        ];
        Self {
            stack: setup.stack,
            contestants,
            turn: TurnState::with_remaining(setup.first, setup.remaining_turns),
            phase: TurnPhase::OwnerActing,
            rng,
            seed,
            presentation,
            tally: [SeatTally::default(); 2],
            config,
        }
    }
}

impl<P> Game<P> {
    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn stack(&self) -> &Stack {
        &self.stack
    }

    /// The automated contestant's belief about the stack.
    pub fn belief(&self) -> &StackBelief {
        self.stack.belief()
    }

    pub fn contestant(&self, seat: Seat) -> &Contestant {
        &self.contestants[seat.index()]
    }

    pub fn turn(&self) -> &TurnState {
        &self.turn
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    pub fn owner(&self) -> Seat {
        self.turn.owner()
    }

    pub fn remaining_turns(&self) -> u32 {
        self.turn.remaining_turns()
    }

    pub fn outcome(&self) -> Option<MatchOutcome> {
        match self.phase {
            TurnPhase::MatchOver(outcome) => Some(outcome),
            _ => None,
        }
    }

    pub fn is_over(&self) -> bool {
        self.outcome().is_some()
    }

    pub fn tally(&self, seat: Seat) -> SeatTally {
        self.tally[seat.index()]
    }

    pub fn presentation(&self) -> &P {
        &self.presentation
    }

    pub fn presentation_mut(&mut self) -> &mut P {
        &mut self.presentation
    }

    /// Cards `seat` could play right now without being refused.
    pub fn playable_cards(&self, seat: Seat) -> Vec<Card> {
        let negate_blocked = self.turn.is_negated(seat.other());
        self.contestant(seat)
            .hand()
            .iter()
            .copied()
            .filter(|card| card.kind().is_playable())
            .filter(|card| !(negate_blocked && card.is(CardKind::Negate)))
            .collect()
    }

    pub fn view(&self, seat: Seat) -> SeatView<'_> {
        let contestant = self.contestant(seat);
        SeatView {
            seat,
            hand: contestant.hand(),
            playable: self.playable_cards(seat),
            hand_limit: contestant.hand_limit(),
            stack_len: self.stack.len(),
            discard_len: self.stack.discard_pile().len(),
            owner: self.turn.owner(),
            remaining_turns: self.turn.remaining_turns(),
            negated: self.turn.is_negated(seat),
        }
    }

}

impl<P: Presentation> Game<P> {
    pub fn apply_action(&mut self, seat: Seat, action: Action) -> Result<ActionOutcome, ActionError> {
        match action {
            Action::Play(id) => self.play_card(seat, id).map(ActionOutcome::Played),
            Action::Draw { from_bottom } => self.draw(seat, from_bottom).map(ActionOutcome::Drew),
        }
    }

    /// Plays `id` from `seat`'s hand. A negation pending against `seat`
    /// swallows the card instead of resolving it.
    pub fn play_card(&mut self, seat: Seat, id: CardId) -> Result<PlayOutcome, ActionError> {
        let card = match self.check_play(seat, id) {
            Ok(card) => card,
            Err(err) => return Err(self.reject(seat, err)),
        };
        let opponent = seat.other();

        self.contestants[seat.index()].hand_mut().remove(id);
        self.tally[seat.index()].cards_played += 1;
        let name = self.contestant(seat).name().to_string();
        self.presentation.notify(&format!("{name} plays {card}"), false);

        if self.turn.consume_negation(seat) {
            self.stack.discard(card);
            self.tally[seat.index()].cards_negated += 1;
            self.presentation
                .notify(&format!("{card} was negated and has no effect"), false);
            self.presentation.refresh();
            return Ok(PlayOutcome::Negated(card));
        }

        let effect = card.apply(self, seat, opponent);
        self.stack.discard(card);
        let turn_ended = self.settle(seat);
        Ok(PlayOutcome::Resolved {
            card,
            effect,
            turn_ended,
        })
    }

    /// Draws one card, ending the current sub-turn.
    pub fn draw(&mut self, seat: Seat, from_bottom: bool) -> Result<DrawOutcome, ActionError> {
        let drawn = self
            .ensure_acting(seat)
            .and_then(|()| self.draw_for(seat, from_bottom));
        match drawn {
            Ok(outcome) => {
                self.settle(seat);
                Ok(outcome)
            }
            Err(err) => Err(self.reject(seat, err)),
        }
    }

    fn check_play(&self, seat: Seat, id: CardId) -> Result<Card, ActionError> {
        self.ensure_acting(seat)?;
        let card = self
            .contestant(seat)
            .hand()
            .get(id)
            .ok_or(ActionError::CardNotInHand(id))?;
        if !card.kind().is_playable() {
            return Err(ActionError::NotPlayable(card.kind()));
        }
        let opponent = seat.other();
        if card.is(CardKind::Negate) && self.turn.is_negated(opponent) {
            return Err(ActionError::NegationAlreadyPending(opponent));
        }
        Ok(card)
    }

    fn ensure_acting(&self, seat: Seat) -> Result<(), ActionError> {
        match self.phase {
            TurnPhase::MatchOver(_) => Err(ActionError::MatchOver),
            _ if self.turn.owner() != seat => Err(ActionError::OutOfTurn {
                expected: self.turn.owner(),
                actual: seat,
            }),
            _ => Ok(()),
        }
    }

    fn reject(&mut self, seat: Seat, err: ActionError) -> ActionError {
        let name = self.contestant(seat).name().to_string();
        self.presentation
            .notify(&format!("{name}: {err}"), seat.is_bot());
        err
    }

    /// Runs the turn advance if an effect or draw asked for it, then checks
    /// for the end of the match. Returns whether a sub-turn ended.
    fn settle(&mut self, acting: Seat) -> bool {
        let ended = self.turn.end_requested();
        let advance = ended.then(|| {
            self.phase = TurnPhase::TurnAdvancing;
            self.turn.advance()
        });

        if let Some(outcome) = self.match_outcome() {
            self.phase = TurnPhase::MatchOver(outcome);
            self.announce(outcome);
        } else {
            self.phase = TurnPhase::OwnerActing;
            if let Some(advance) = advance {
                let owner = self.contestant(advance.owner).name().to_string();
                let banner = if advance.owner != acting {
                    format!("──── {owner}'s turn ({} owed) ────", advance.remaining_turns)
                } else {
                    format!("{owner} still owes {} turn(s)", advance.remaining_turns)
                };
                self.presentation.notify(&banner, false);
            }
        }
        self.presentation.refresh();
        ended
    }

    fn match_outcome(&self) -> Option<MatchOutcome> {
        let human = self.contestant(Seat::Human).is_alive();
        let bot = self.contestant(Seat::Bot).is_alive();
        match (human, bot) {
            (true, true) => None,
            (true, false) => Some(MatchOutcome::Winner(Seat::Human)),
            (false, true) => Some(MatchOutcome::Winner(Seat::Bot)),
            (false, false) => Some(MatchOutcome::Draw),
        }
    }

    fn announce(&mut self, outcome: MatchOutcome) {
        let message = match outcome {
            MatchOutcome::Winner(seat) => format!("Match over: {} wins", self.contestant(seat).name()),
            MatchOutcome::Draw => "Match over: nobody survived".to_string(),
        };
        self.presentation.notify(&message, false);
    }
}
