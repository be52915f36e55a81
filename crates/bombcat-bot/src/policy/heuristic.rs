use super::random::random_choice;
use super::{Decision, DecisionRule, Policy, PolicyContext};
use bombcat_core::game::Action;
use bombcat_core::model::card::{Capabilities, Card, CardKind};
use rand::{Rng, RngCore};
use tracing::{Level, event};

/// Chance of chasing a known Defuse while already holding one.
pub const DEFUSE_PURSUIT_PROBABILITY: f64 = 0.8;

/// Rule-ordered policy driven by what the bot remembers about the stack.
/// The first applicable rule wins; a rule that would need a draw is skipped
/// while the hand is full. A Bomb known to be on top is only ever drawn when
/// the hand holds nothing defensive to play.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicPolicy;

impl HeuristicPolicy {
    pub fn new() -> Self {
        Self
    }
}

impl Policy for HeuristicPolicy {
    fn decide(&mut self, ctx: &PolicyContext<'_>, rng: &mut dyn RngCore) -> Decision {
        let decision = known_bomb(ctx)
            .or_else(|| known_defuse(ctx, rng))
            .unwrap_or_else(|| random_choice(ctx, rng));
        log_decision(ctx, &decision);
        decision
    }

    fn name(&self) -> &'static str {
        "heuristic"
    }
}

fn known_bomb(ctx: &PolicyContext<'_>) -> Option<Decision> {
    let depth = ctx.belief.position_from_top(CardKind::Bomb)?;

    if depth == 0 {
        let escapes: &[CardKind] = if ctx.remaining_turns > 1 {
            &[CardKind::SuperSkip, CardKind::Attack, CardKind::Skip]
        } else {
            &[CardKind::Attack, CardKind::Skip, CardKind::SuperSkip]
        };
        if let Some(card) = ctx.first_playable(escapes) {
            return Some(Decision::play(card, DecisionRule::BombOnTopEscape));
        }
        if let Some(card) = ctx.first_playable(&[CardKind::Swap, CardKind::Shuffle]) {
            return Some(Decision::play(card, DecisionRule::BombOnTopRelocate));
        }
        if let Some(card) = first_defensive(ctx) {
            return Some(Decision::play(card, DecisionRule::BombOnTopDefend));
        }
        // A full hand falls through to the random rule, which always plays.
        return (!ctx.is_hand_full()).then(|| Decision::draw(DecisionRule::BombOnTopDraw));
    }

    if depth == 1 && ctx.remaining_turns == 1 && !ctx.is_hand_full() {
        return Some(Decision::draw(DecisionRule::BombSecondDraw));
    }

    let has_escape = ctx.playable.iter().any(|card| card.kind().is_escape());
    if ctx.belief.bottom_depth() == Some(depth) && has_escape {
        return ctx
            .first_playable(&[CardKind::Swap])
            .map(|card| Decision::play(card, DecisionRule::BombAtBottomSwap));
    }

    None
}

fn first_defensive(ctx: &PolicyContext<'_>) -> Option<Card> {
    ctx.hand
        .with_capability(Capabilities::DEFENSIVE)
        .find(|card| ctx.playable.iter().any(|p| p.id() == card.id()))
}

fn known_defuse(ctx: &PolicyContext<'_>, rng: &mut dyn RngCore) -> Option<Decision> {
    let depth = ctx.belief.position_from_top(CardKind::Defuse)?;
    let holds_defuse = ctx.hand.has_kind(CardKind::Defuse);
    if holds_defuse && !rng.gen_bool(DEFUSE_PURSUIT_PROBABILITY) {
        return None;
    }

    if depth == 0 {
        return (!ctx.is_hand_full()).then(|| Decision::draw(DecisionRule::DefuseOnTopDraw));
    }

    let preferred: &[CardKind] = if ctx.belief.bottom_depth() == Some(depth) {
        &[CardKind::DrawFromBottom, CardKind::Swap]
    } else {
        &[CardKind::Swap]
    };
    if let Some(card) = ctx.first_playable(preferred) {
        let rule = if card.is(CardKind::Swap) && preferred.len() == 1 {
            DecisionRule::DefuseRelocate
        } else {
            DecisionRule::DefuseAtBottom
        };
        return Some(Decision::play(card, rule));
    }

    (!ctx.is_hand_full()).then(|| Decision::draw(DecisionRule::DefuseFallbackDraw))
}

fn log_decision(ctx: &PolicyContext<'_>, decision: &Decision) {
    if !tracing::enabled!(target: "bombcat_bot::decision", Level::INFO) {
        return;
    }

    let action = match decision.action {
        Action::Play(id) => ctx
            .hand
            .get(id)
            .map(|card: Card| format!("play {card}"))
            .unwrap_or_else(|| format!("play {id}")),
        Action::Draw { from_bottom: true } => "draw from bottom".to_string(),
        Action::Draw { from_bottom: false } => "draw".to_string(),
    };

    event!(
        target: "bombcat_bot::decision",
        Level::INFO,
        seat = %ctx.seat,
        policy = "heuristic",
        rule = decision.rule.as_str(),
        action = %action,
        hand_size = ctx.hand.len(),
        playable = ctx.playable.len(),
        defuses_held = ctx.hand.count_kind(CardKind::Defuse),
        revealing_held = ctx.hand.with_capability(Capabilities::REVEALING).count(),
        remaining_turns = ctx.remaining_turns,
        known_slots = ctx.belief.known_count(),
        negated = ctx.negated,
    );
}

#[cfg(test)]
mod tests {
    use super::HeuristicPolicy;
    use crate::policy::{DecisionRule, Policy, PolicyContext};
    use bombcat_core::belief::StackBelief;
    use bombcat_core::game::{Action, Game, MatchConfig, MatchSetup, RecordingPresentation};
    use bombcat_core::model::card::{Card, CardId, CardKind};
    use bombcat_core::model::contestant::Seat;
    use bombcat_core::model::stack::Stack;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn cards(first_id: u16, kinds: &[CardKind]) -> Vec<Card> {
        kinds
            .iter()
            .enumerate()
            .map(|(i, &kind)| Card::new(CardId::new(first_id + i as u16), kind))
            .collect()
    }

    /// A bot-owned game where the bot has already peeked at the whole stack.
    fn seen_game(stack: &[CardKind], hand: &[CardKind], remaining: u32) -> Game<RecordingPresentation> {
        seen_game_with_limit(stack, hand, remaining, MatchConfig::default().hand_limit)
    }

    fn seen_game_with_limit(
        stack: &[CardKind],
        hand: &[CardKind],
        remaining: u32,
        hand_limit: usize,
    ) -> Game<RecordingPresentation> {
        let peek = Card::new(CardId::new(999), CardKind::SeeFuture(stack.len() as u8));
        let mut hand = cards(500, hand);
        hand.push(peek);
        let setup = MatchSetup::new(Stack::from_top_down(cards(0, stack)))
            .with_hand(Seat::Bot, hand)
            .starting(Seat::Bot, remaining);
        let config = MatchConfig {
            hand_limit,
            ..MatchConfig::default()
        };
        let mut game = Game::from_setup(config, setup, 1, RecordingPresentation::new());
        game.play_card(Seat::Bot, peek.id()).expect("peek");
        game
    }

    fn decide(game: &Game<RecordingPresentation>, seed: u64) -> (Action, DecisionRule, Option<CardKind>) {
        let view = game.view(Seat::Bot);
        let ctx = PolicyContext::from_view(&view, game.belief());
        let mut rng = StdRng::seed_from_u64(seed);
        let decision = HeuristicPolicy::new().decide(&ctx, &mut rng);
        let kind = match decision.action {
            Action::Play(id) => view.hand.get(id).map(|c| c.kind()),
            _ => None,
        };
        (decision.action, decision.rule, kind)
    }

    #[test]
    fn bomb_on_top_with_turns_owed_prefers_super_skip() {
        let game = seen_game(
            &[CardKind::Bomb, CardKind::Skip, CardKind::Shuffle],
            &[CardKind::Attack, CardKind::SuperSkip],
            2,
        );
        let (_, rule, kind) = decide(&game, 3);
        assert_eq!(rule, DecisionRule::BombOnTopEscape);
        assert_eq!(kind, Some(CardKind::SuperSkip));
    }

    #[test]
    fn bomb_on_top_on_last_turn_prefers_attack() {
        let game = seen_game(
            &[CardKind::Bomb, CardKind::Skip],
            &[CardKind::SuperSkip, CardKind::Attack],
            1,
        );
        let (_, rule, kind) = decide(&game, 3);
        assert_eq!(rule, DecisionRule::BombOnTopEscape);
        assert_eq!(kind, Some(CardKind::Attack));
    }

    #[test]
    fn bomb_on_top_without_escape_relocates() {
        let game = seen_game(
            &[CardKind::Bomb, CardKind::Skip],
            &[CardKind::Shuffle],
            1,
        );
        let (_, rule, kind) = decide(&game, 3);
        assert_eq!(rule, DecisionRule::BombOnTopRelocate);
        assert_eq!(kind, Some(CardKind::Shuffle));
    }

    #[test]
    fn known_top_bomb_is_never_drawn_while_a_defensive_card_is_held() {
        let game = seen_game(
            &[CardKind::Bomb, CardKind::Skip, CardKind::Shuffle],
            &[CardKind::DrawFromBottom],
            1,
        );
        assert_eq!(game.belief().position_from_top(CardKind::Bomb), Some(0));
        for seed in 0..100 {
            let (action, rule, kind) = decide(&game, seed);
            assert_ne!(action, Action::DRAW, "seed {seed} drew the bomb");
            assert_eq!(rule, DecisionRule::BombOnTopDefend);
            assert_eq!(kind, Some(CardKind::DrawFromBottom));
        }
    }

    #[test]
    fn known_top_bomb_can_be_buried_with_alter_future() {
        let game = seen_game(
            &[CardKind::Bomb, CardKind::Skip, CardKind::Shuffle],
            &[CardKind::AlterFuture(3)],
            1,
        );
        let (_, rule, kind) = decide(&game, 9);
        assert_eq!(rule, DecisionRule::BombOnTopDefend);
        assert_eq!(kind, Some(CardKind::AlterFuture(3)));
    }

    #[test]
    fn known_top_bomb_is_drawn_only_without_defensive_cards() {
        let game = seen_game(
            &[CardKind::Bomb, CardKind::Skip],
            &[CardKind::Defuse, CardKind::SeeFuture(3)],
            1,
        );
        for seed in 0..20 {
            let (action, rule, _) = decide(&game, seed);
            assert_eq!(rule, DecisionRule::BombOnTopDraw);
            assert_eq!(action, Action::DRAW);
        }
    }

    #[test]
    fn known_top_bomb_with_full_hand_plays_instead_of_drawing() {
        let game = seen_game_with_limit(
            &[CardKind::Bomb, CardKind::Skip],
            &[CardKind::Defuse, CardKind::SeeFuture(3)],
            1,
            2,
        );
        for seed in 0..20 {
            let (action, rule, kind) = decide(&game, seed);
            assert_ne!(action, Action::DRAW);
            assert_eq!(rule, DecisionRule::HandFull);
            assert_eq!(kind, Some(CardKind::SeeFuture(3)));
        }
    }

    #[test]
    fn bomb_second_on_last_turn_draws() {
        let game = seen_game(
            &[CardKind::Skip, CardKind::Bomb, CardKind::Shuffle],
            &[CardKind::Attack],
            1,
        );
        let (action, rule, _) = decide(&game, 3);
        assert_eq!(rule, DecisionRule::BombSecondDraw);
        assert_eq!(action, Action::DRAW);
    }

    #[test]
    fn bomb_at_bottom_is_swapped_up_when_an_escape_is_held() {
        let game = seen_game(
            &[CardKind::Skip, CardKind::Shuffle, CardKind::Bomb],
            &[CardKind::Swap, CardKind::Skip],
            1,
        );
        let (_, rule, kind) = decide(&game, 3);
        assert_eq!(rule, DecisionRule::BombAtBottomSwap);
        assert_eq!(kind, Some(CardKind::Swap));
    }

    #[test]
    fn defuse_on_top_is_drawn_when_none_held() {
        let game = seen_game(
            &[CardKind::Defuse, CardKind::Skip],
            &[CardKind::Attack],
            1,
        );
        let (action, rule, _) = decide(&game, 3);
        assert_eq!(rule, DecisionRule::DefuseOnTopDraw);
        assert_eq!(action, Action::DRAW);
    }

    #[test]
    fn defuse_at_bottom_prefers_draw_from_bottom() {
        let game = seen_game(
            &[CardKind::Skip, CardKind::Shuffle, CardKind::Defuse],
            &[CardKind::Swap, CardKind::DrawFromBottom],
            1,
        );
        let (_, rule, kind) = decide(&game, 3);
        assert_eq!(rule, DecisionRule::DefuseAtBottom);
        assert_eq!(kind, Some(CardKind::DrawFromBottom));
    }

    #[test]
    fn defuse_in_the_middle_is_swapped() {
        let game = seen_game(
            &[CardKind::Skip, CardKind::Defuse, CardKind::Shuffle],
            &[CardKind::Swap],
            1,
        );
        let (_, rule, kind) = decide(&game, 3);
        assert_eq!(rule, DecisionRule::DefuseRelocate);
        assert_eq!(kind, Some(CardKind::Swap));
    }

    #[test]
    fn defuse_out_of_reach_falls_back_to_a_draw() {
        let game = seen_game(
            &[CardKind::Skip, CardKind::Shuffle, CardKind::Defuse],
            &[CardKind::Attack],
            1,
        );
        let (action, rule, _) = decide(&game, 3);
        assert_eq!(rule, DecisionRule::DefuseFallbackDraw);
        assert_eq!(action, Action::DRAW);
    }

    #[test]
    fn defuse_on_top_is_not_chased_with_a_full_hand() {
        let game = seen_game_with_limit(
            &[CardKind::Defuse, CardKind::Skip],
            &[CardKind::Attack, CardKind::Shuffle],
            1,
            2,
        );
        for seed in 0..20 {
            let (action, rule, kind) = decide(&game, seed);
            assert_ne!(action, Action::DRAW);
            assert_eq!(rule, DecisionRule::HandFull);
            assert!(kind.is_some());
        }
    }

    #[test]
    fn held_defuse_sometimes_skips_the_chase() {
        let game = seen_game(
            &[CardKind::Defuse, CardKind::Skip],
            &[CardKind::Defuse, CardKind::Attack],
            1,
        );
        let chased = (0..200)
            .filter(|&seed| decide(&game, seed).1 == DecisionRule::DefuseOnTopDraw)
            .count();
        assert!(chased > 120 && chased < 195, "chased {chased} of 200");
    }

    #[test]
    fn blind_full_hand_always_plays() {
        let stack = Stack::from_top_down(cards(0, &[CardKind::Skip; 3]));
        let config = MatchConfig {
            hand_limit: 2,
            ..MatchConfig::default()
        };
        let setup = MatchSetup::new(stack)
            .with_hand(Seat::Bot, cards(100, &[CardKind::Shuffle, CardKind::Swap]))
            .starting(Seat::Bot, 1);
        let game = Game::from_setup(config, setup, 1, RecordingPresentation::new());
        for seed in 0..20 {
            let (_, rule, kind) = decide(&game, seed);
            assert_eq!(rule, DecisionRule::HandFull);
            assert!(kind.is_some());
        }
    }

    #[test]
    fn nothing_playable_draws() {
        let view_belief = StackBelief::unknown(3);
        let game = {
            let stack = Stack::from_top_down(cards(0, &[CardKind::Skip; 3]));
            let setup = MatchSetup::new(stack)
                .with_hand(Seat::Bot, cards(100, &[CardKind::Defuse]))
                .starting(Seat::Bot, 1);
            Game::from_setup(MatchConfig::default(), setup, 1, RecordingPresentation::new())
        };
        let view = game.view(Seat::Bot);
        let ctx = PolicyContext::from_view(&view, &view_belief);
        let mut rng = StdRng::seed_from_u64(0);
        let decision = HeuristicPolicy::new().decide(&ctx, &mut rng);
        assert_eq!(decision.rule, DecisionRule::NothingPlayable);
    }
}
