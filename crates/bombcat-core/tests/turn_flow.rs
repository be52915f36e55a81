use bombcat_core::game::{
    Action, ActionError, ActionOutcome, DrawOutcome, EffectOutcome, Game, MatchConfig,
    MatchOutcome, MatchSetup, PlayOutcome, RecordingPresentation, TurnPhase,
};
use bombcat_core::model::card::{Card, CardId, CardKind};
use bombcat_core::model::contestant::Seat;
use bombcat_core::model::stack::Stack;

struct Deck {
    next: u16,
}

impl Deck {
    fn new() -> Self {
        Self { next: 100 }
    }

    fn card(&mut self, kind: CardKind) -> Card {
        let card = Card::new(CardId::new(self.next), kind);
        self.next += 1;
        card
    }

    fn cards(&mut self, kinds: &[CardKind]) -> Vec<Card> {
        kinds.iter().map(|&kind| self.card(kind)).collect()
    }
}

fn game_from(setup: MatchSetup, ui: RecordingPresentation) -> Game<RecordingPresentation> {
    Game::from_setup(MatchConfig::default(), setup, 11, ui)
}

#[test]
fn drawing_ends_the_sub_turn_and_passes_ownership() {
    let mut deck = Deck::new();
    let stack = Stack::from_top_down(deck.cards(&[CardKind::Skip, CardKind::Shuffle]));
    let mut game = game_from(MatchSetup::new(stack), RecordingPresentation::new());

    let outcome = game.draw(Seat::Human, false).expect("human owns the turn");
    assert!(matches!(outcome, DrawOutcome::Gained(card) if card.is(CardKind::Skip)));
    assert_eq!(game.owner(), Seat::Bot);
    assert_eq!(game.remaining_turns(), 1);
    assert_eq!(game.contestant(Seat::Human).hand().len(), 1);
    assert_eq!(game.phase(), TurnPhase::OwnerActing);
    assert_eq!(game.turn().sub_turns_completed(), 1);
}

#[test]
fn bomb_without_defuse_ends_the_match() {
    let mut deck = Deck::new();
    let stack = Stack::from_top_down(deck.cards(&[CardKind::Bomb, CardKind::Skip]));
    let hand = deck.cards(&[CardKind::Skip]);
    let setup = MatchSetup::new(stack)
        .with_hand(Seat::Bot, hand)
        .starting(Seat::Bot, 3);
    let mut game = game_from(setup, RecordingPresentation::new());

    let outcome = game.draw(Seat::Bot, false).expect("bot owns the turn");
    assert!(matches!(outcome, DrawOutcome::Exploded(_)));
    assert!(!game.contestant(Seat::Bot).is_alive());
    assert_eq!(game.outcome(), Some(MatchOutcome::Winner(Seat::Human)));
    // the explosion wipes whatever the loser still owed
    assert_eq!(game.remaining_turns(), 1);
    assert!(game.presentation().mentions("Match over"));

    let late = game.draw(Seat::Human, false);
    assert_eq!(late, Err(ActionError::MatchOver));
}

#[test]
fn defused_bomb_goes_back_and_forfeits_owed_turns() {
    let mut deck = Deck::new();
    let stack = Stack::from_top_down(deck.cards(&[
        CardKind::Bomb,
        CardKind::Skip,
        CardKind::Attack,
    ]));
    let hand = deck.cards(&[CardKind::Defuse, CardKind::Shuffle]);
    let setup = MatchSetup::new(stack)
        .with_hand(Seat::Human, hand)
        .starting(Seat::Human, 3);
    let ui = RecordingPresentation::new().with_insert_reply(Some(0));
    let mut game = game_from(setup, ui);

    let outcome = game.draw(Seat::Human, false).expect("human owns the turn");
    let DrawOutcome::Defused {
        bomb,
        position,
        fallback,
    } = outcome
    else {
        panic!("expected a defuse, got {outcome:?}");
    };
    assert_eq!(position, 0);
    assert!(!fallback);
    assert_eq!(game.stack().cards()[0], bomb);
    assert_eq!(game.stack().len(), 3);
    assert!(!game.contestant(Seat::Human).has_defuse());
    assert!(game.stack().discard_pile().iter().any(|c| c.is(CardKind::Defuse)));
    // the human placed it, so the bot learned nothing
    assert!(game.belief().known_at(2).is_none());
    assert_eq!(game.owner(), Seat::Bot);
    assert_eq!(game.remaining_turns(), 1);
    assert_eq!(game.tally(Seat::Human).bombs_defused, 1);
}

#[test]
fn out_of_range_insert_falls_back_to_a_legal_slot() {
    let mut deck = Deck::new();
    let stack = Stack::from_top_down(deck.cards(&[CardKind::Bomb, CardKind::Skip]));
    let hand = deck.cards(&[CardKind::Defuse]);
    let setup = MatchSetup::new(stack).with_hand(Seat::Human, hand);
    let ui = RecordingPresentation::new().with_insert_reply(Some(99));
    let mut game = game_from(setup, ui);

    let outcome = game.draw(Seat::Human, false).expect("human owns the turn");
    match outcome {
        DrawOutcome::Defused {
            position, fallback, ..
        } => {
            assert!(fallback);
            assert!(position <= 1);
        }
        other => panic!("expected a defuse, got {other:?}"),
    }
    assert_eq!(game.stack().len(), 2);
    assert!(game.presentation().mentions("outside 0-1"));
}

#[test]
fn bot_remembers_where_it_hid_the_bomb() {
    let mut deck = Deck::new();
    let stack = Stack::from_top_down(deck.cards(&[
        CardKind::Bomb,
        CardKind::Skip,
        CardKind::Attack,
        CardKind::Shuffle,
    ]));
    let hand = deck.cards(&[CardKind::Defuse]);
    let setup = MatchSetup::new(stack)
        .with_hand(Seat::Bot, hand)
        .starting(Seat::Bot, 1);
    let mut game = game_from(setup, RecordingPresentation::new());

    game.draw(Seat::Bot, false).expect("bot owns the turn");
    let depth = game
        .belief()
        .position_from_top(CardKind::Bomb)
        .expect("bot placed the bomb itself");
    let actual = game
        .stack()
        .top_down()
        .position(|c| c.is(CardKind::Bomb))
        .expect("bomb is back in the stack");
    assert_eq!(depth, actual);
    // where exactly stays out of the visible narration
    assert!(
        game.presentation()
            .notices()
            .iter()
            .filter(|(text, _)| text.contains("position"))
            .all(|(_, debug_only)| *debug_only)
    );
}

#[test]
fn attack_hands_over_one_more_than_owed() {
    let mut deck = Deck::new();
    let stack = Stack::from_top_down(deck.cards(&[CardKind::Skip; 4]));
    let hand = deck.cards(&[CardKind::Attack, CardKind::Attack]);
    let setup = MatchSetup::new(stack).with_hand(Seat::Human, hand.clone());
    let mut game = game_from(setup, RecordingPresentation::new());

    let outcome = game.play_card(Seat::Human, hand[0].id()).expect("attack is playable");
    assert!(matches!(
        outcome,
        PlayOutcome::Resolved {
            turn_ended: true,
            ..
        }
    ));
    assert_eq!(game.owner(), Seat::Bot);
    assert_eq!(game.remaining_turns(), 2);

    let stack = Stack::from_top_down(deck.cards(&[CardKind::Skip; 4]));
    let hand = deck.cards(&[CardKind::Attack]);
    let setup = MatchSetup::new(stack)
        .with_hand(Seat::Human, hand.clone())
        .starting(Seat::Human, 3);
    let mut game = game_from(setup, RecordingPresentation::new());
    game.play_card(Seat::Human, hand[0].id()).expect("attack is playable");
    assert_eq!(game.owner(), Seat::Bot);
    assert_eq!(game.remaining_turns(), 4);
}

#[test]
fn skip_spends_one_owed_turn_and_super_skip_spends_all() {
    let mut deck = Deck::new();
    let stack = Stack::from_top_down(deck.cards(&[CardKind::Shuffle; 3]));
    let hand = deck.cards(&[CardKind::Skip, CardKind::SuperSkip]);
    let setup = MatchSetup::new(stack)
        .with_hand(Seat::Human, hand.clone())
        .starting(Seat::Human, 3);
    let mut game = game_from(setup, RecordingPresentation::new());

    game.play_card(Seat::Human, hand[0].id()).expect("skip is playable");
    assert_eq!(game.owner(), Seat::Human);
    assert_eq!(game.remaining_turns(), 2);
    assert!(game.presentation().mentions("still owes 2"));

    game.play_card(Seat::Human, hand[1].id()).expect("super skip is playable");
    assert_eq!(game.owner(), Seat::Bot);
    assert_eq!(game.remaining_turns(), 1);
    assert_eq!(game.stack().len(), 3);
}

#[test]
fn negation_swallows_exactly_one_card() {
    let mut deck = Deck::new();
    let stack = Stack::from_top_down(deck.cards(&[CardKind::Shuffle; 4]));
    let human = deck.cards(&[CardKind::Negate, CardKind::Negate]);
    let bot = deck.cards(&[CardKind::Skip, CardKind::Skip]);
    let setup = MatchSetup::new(stack)
        .with_hand(Seat::Human, human.clone())
        .with_hand(Seat::Bot, bot.clone());
    let mut game = game_from(setup, RecordingPresentation::new());

    game.play_card(Seat::Human, human[0].id()).expect("negate is playable");
    assert!(game.turn().is_negated(Seat::Bot));
    assert_eq!(game.owner(), Seat::Human, "negate does not end the turn");

    let second = game.play_card(Seat::Human, human[1].id());
    assert_eq!(second, Err(ActionError::NegationAlreadyPending(Seat::Bot)));
    assert!(game.contestant(Seat::Human).hand().contains(human[1].id()));
    assert!(game.playable_cards(Seat::Human).is_empty());

    game.draw(Seat::Human, false).expect("human draws");
    assert_eq!(game.owner(), Seat::Bot);

    let swallowed = game.play_card(Seat::Bot, bot[0].id()).expect("bot may still play");
    assert_eq!(swallowed, PlayOutcome::Negated(bot[0]));
    assert_eq!(game.owner(), Seat::Bot);
    assert!(!game.turn().is_negated(Seat::Bot));

    let resolved = game.play_card(Seat::Bot, bot[1].id()).expect("bot plays again");
    assert!(matches!(resolved, PlayOutcome::Resolved { turn_ended: true, .. }));
    assert_eq!(game.owner(), Seat::Human);
    assert_eq!(game.tally(Seat::Bot).cards_negated, 1);
}

#[test]
fn refused_actions_leave_the_match_untouched() {
    let mut deck = Deck::new();
    let stack = Stack::from_top_down(deck.cards(&[CardKind::Skip; 2]));
    let hand = deck.cards(&[CardKind::Defuse, CardKind::Skip]);
    let stray = deck.card(CardKind::Attack);
    let setup = MatchSetup::new(stack).with_hand(Seat::Human, hand.clone());
    let mut game = game_from(setup, RecordingPresentation::new());

    assert_eq!(
        game.draw(Seat::Bot, false),
        Err(ActionError::OutOfTurn {
            expected: Seat::Human,
            actual: Seat::Bot
        })
    );
    assert_eq!(
        game.play_card(Seat::Human, stray.id()),
        Err(ActionError::CardNotInHand(stray.id()))
    );
    assert_eq!(
        game.play_card(Seat::Human, hand[0].id()),
        Err(ActionError::NotPlayable(CardKind::Defuse))
    );
    assert_eq!(game.owner(), Seat::Human);
    assert_eq!(game.stack().len(), 2);
    assert_eq!(game.contestant(Seat::Human).hand().len(), 2);
    assert_eq!(game.turn().sub_turns_completed(), 0);
}

#[test]
fn full_hand_refuses_to_draw() {
    let mut deck = Deck::new();
    let stack = Stack::from_top_down(deck.cards(&[CardKind::Skip; 2]));
    let hand = deck.cards(&[CardKind::Shuffle; 3]);
    let config = MatchConfig {
        hand_limit: 3,
        ..MatchConfig::default()
    };
    let setup = MatchSetup::new(stack).with_hand(Seat::Human, hand.clone());
    let mut game = Game::from_setup(config, setup, 5, RecordingPresentation::new());

    assert!(game.view(Seat::Human).is_hand_full());
    assert_eq!(
        game.apply_action(Seat::Human, Action::DRAW),
        Err(ActionError::HandFull { limit: 3 })
    );
    assert_eq!(game.stack().len(), 2);

    let played = game
        .apply_action(Seat::Human, Action::Play(hand[0].id()))
        .expect("playing is still allowed");
    assert!(matches!(
        played,
        ActionOutcome::Played(PlayOutcome::Resolved {
            effect: EffectOutcome::Applied,
            turn_ended: false,
            ..
        })
    ));
    assert!(game.draw(Seat::Human, false).is_ok());
}

#[test]
fn empty_stack_is_refilled_from_the_discard_pile() {
    let mut deck = Deck::new();
    let discard = deck.cards(&[CardKind::Skip, CardKind::Attack, CardKind::Swap]);
    let stack = Stack::from_top_down(Vec::new()).with_discard(discard);
    let mut game = game_from(MatchSetup::new(stack), RecordingPresentation::new());

    let outcome = game.draw(Seat::Human, false).expect("refill makes a draw possible");
    assert!(matches!(outcome, DrawOutcome::Gained(_)));
    assert_eq!(game.stack().len(), 2);
    assert!(game.stack().discard_pile().is_empty());
    assert_eq!(game.belief().len(), 2);
    assert!(game.presentation().mentions("shuffled back"));
}

#[test]
fn nothing_left_anywhere_refuses_the_draw() {
    let stack = Stack::from_top_down(Vec::new());
    let mut game = game_from(MatchSetup::new(stack), RecordingPresentation::new());

    assert_eq!(game.draw(Seat::Human, false), Err(ActionError::EmptyDraw));
    assert_eq!(game.owner(), Seat::Human);
}

#[test]
fn standard_deal_gives_each_seat_a_defuse_and_no_bombs() {
    let config = MatchConfig::default();
    let total = config.total_cards();
    let game = Game::with_presentation(config.clone(), 2024, RecordingPresentation::new())
        .expect("default config is valid");

    let mut in_hands = 0;
    for seat in Seat::LOOP {
        let hand = game.contestant(seat).hand();
        assert_eq!(hand.len(), config.opening_hand());
        assert!(hand.has_kind(CardKind::Defuse));
        assert!(!hand.has_kind(CardKind::Bomb));
        in_hands += hand.len();
    }
    assert_eq!(in_hands + game.stack().len(), total);
    assert_eq!(game.belief().len(), game.stack().len());
    assert_eq!(game.owner(), Seat::Human);
}

#[test]
fn same_seed_deals_the_same_match() {
    let first = Game::new(MatchConfig::default(), 99).expect("valid");
    let second = Game::new(MatchConfig::default(), 99).expect("valid");
    assert_eq!(first.stack().cards(), second.stack().cards());
    assert_eq!(
        first.contestant(Seat::Bot).hand().cards(),
        second.contestant(Seat::Bot).hand().cards()
    );
}

#[test]
fn invalid_config_is_refused_up_front() {
    let config = MatchConfig {
        hand_limit: 0,
        ..MatchConfig::default()
    };
    assert!(Game::new(config, 1).is_err());
}

#[test]
fn record_reflects_the_finished_match() {
    let mut deck = Deck::new();
    let stack = Stack::from_top_down(deck.cards(&[CardKind::Skip, CardKind::Bomb]));
    let mut game = game_from(MatchSetup::new(stack), RecordingPresentation::new());

    game.draw(Seat::Human, false).expect("human draws");
    game.draw(Seat::Bot, false).expect("bot draws the bomb");

    let record = game.record();
    assert_eq!(record.outcome, Some(MatchOutcome::Winner(Seat::Human)));
    assert_eq!(record.winner(), Some(Seat::Human));
    assert_eq!(record.human.cards_drawn, 1);
    assert_eq!(record.bot.cards_drawn, 1);
    assert_eq!(record.sub_turns, 2);
    assert_eq!(record.seed, 11);
}

#[test]
fn defuse_then_bomb_ends_with_the_first_drawer_winning() {
    let mut deck = Deck::new();
    let stack = Stack::from_top_down(deck.cards(&[CardKind::Defuse, CardKind::Bomb]));
    let mut game = game_from(MatchSetup::new(stack), RecordingPresentation::new());

    let first = game.draw(Seat::Human, false).expect("human draws");
    assert!(matches!(first, DrawOutcome::Gained(card) if card.is(CardKind::Defuse)));
    assert!(game.contestant(Seat::Human).has_defuse());
    assert_eq!(game.owner(), Seat::Bot);

    let second = game.draw(Seat::Bot, false).expect("bot draws");
    assert!(matches!(second, DrawOutcome::Exploded(_)));
    assert!(!game.contestant(Seat::Bot).is_alive());
    assert_eq!(game.outcome(), Some(MatchOutcome::Winner(Seat::Human)));
    assert!(matches!(game.phase(), TurnPhase::MatchOver(_)));
}
