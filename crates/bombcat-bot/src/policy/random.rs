use super::{Decision, DecisionRule, Policy, PolicyContext};
use rand::seq::SliceRandom;
use rand::{Rng, RngCore};
use tracing::{Level, event};

/// Ignores the stack entirely: a coin flip between playing a random card and
/// drawing. A full hand always plays.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomPolicy;

impl RandomPolicy {
    pub fn new() -> Self {
        Self
    }
}

impl Policy for RandomPolicy {
    fn decide(&mut self, ctx: &PolicyContext<'_>, rng: &mut dyn RngCore) -> Decision {
        let decision = random_choice(ctx, rng);
        event!(
            target: "bombcat_bot::decision",
            Level::DEBUG,
            seat = %ctx.seat,
            policy = "random",
            rule = decision.rule.as_str(),
            hand_size = ctx.hand.len(),
        );
        decision
    }

    fn name(&self) -> &'static str {
        "random"
    }
}

pub(super) fn random_choice(ctx: &PolicyContext<'_>, rng: &mut dyn RngCore) -> Decision {
    let Some(&card) = ctx.playable.choose(rng) else {
        return Decision::draw(DecisionRule::NothingPlayable);
    };
    if ctx.is_hand_full() {
        return Decision::play(card, DecisionRule::HandFull);
    }
    if rng.gen_bool(0.5) {
        Decision::play(card, DecisionRule::RandomPlay)
    } else {
        Decision::draw(DecisionRule::RandomDraw)
    }
}
