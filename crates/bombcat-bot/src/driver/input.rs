use crate::policy::{Policy, PolicyContext};
use bombcat_core::belief::StackBelief;
use bombcat_core::game::{Action, InputPort, SeatView};
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Answers human action points with a policy. The policy sees an all-unknown
/// stack, since only the bot keeps a memory of it.
pub struct PolicyInput {
    policy: Box<dyn Policy>,
    rng: StdRng,
}

impl PolicyInput {
    pub fn new(policy: Box<dyn Policy>, seed: u64) -> Self {
        Self {
            policy,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn policy_name(&self) -> &'static str {
        self.policy.name()
    }
}

impl InputPort for PolicyInput {
    fn request_human_action(&mut self, view: &SeatView<'_>) -> Action {
        let blind = StackBelief::unknown(view.stack_len);
        let ctx = PolicyContext::from_view(view, &blind);
        self.policy.decide(&ctx, &mut self.rng).action
    }
}
