mod heuristic;
mod random;

pub use heuristic::{DEFUSE_PURSUIT_PROBABILITY, HeuristicPolicy};
pub use random::RandomPolicy;

use bombcat_core::belief::StackBelief;
use bombcat_core::game::{Action, SeatView};
use bombcat_core::model::card::{Card, CardKind};
use bombcat_core::model::contestant::Seat;
use bombcat_core::model::hand::Hand;
use core::fmt;
use core::str::FromStr;
use rand::RngCore;

/// Context provided to policies for decision-making
pub struct PolicyContext<'a> {
    pub seat: Seat,
    pub hand: &'a Hand,
    pub playable: &'a [Card],
    pub belief: &'a StackBelief,
    pub remaining_turns: u32,
    pub hand_limit: usize,
    pub negated: bool,
}

impl<'a> PolicyContext<'a> {
    pub fn from_view(view: &'a SeatView<'a>, belief: &'a StackBelief) -> Self {
        Self {
            seat: view.seat,
            hand: view.hand,
            playable: &view.playable,
            belief,
            remaining_turns: view.remaining_turns,
            hand_limit: view.hand_limit,
            negated: view.negated,
        }
    }

    pub fn is_hand_full(&self) -> bool {
        self.hand.len() >= self.hand_limit
    }

    /// First playable card whose kind matches one of `kinds`, honoring the
    /// order of `kinds`.
    pub fn first_playable(&self, kinds: &[CardKind]) -> Option<Card> {
        kinds
            .iter()
            .find_map(|&kind| self.playable.iter().copied().find(|card| card.is(kind)))
    }

    pub fn can_play(&self, kind: CardKind) -> bool {
        self.playable.iter().any(|card| card.is(kind))
    }
}

/// Which branch of a policy produced a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecisionRule {
    BombOnTopEscape,
    BombOnTopRelocate,
    BombOnTopDefend,
    BombOnTopDraw,
    BombSecondDraw,
    BombAtBottomSwap,
    DefuseOnTopDraw,
    DefuseAtBottom,
    DefuseRelocate,
    DefuseFallbackDraw,
    HandFull,
    RandomPlay,
    RandomDraw,
    NothingPlayable,
}

impl DecisionRule {
    pub const fn as_str(self) -> &'static str {
        match self {
            DecisionRule::BombOnTopEscape => "bomb_on_top_escape",
            DecisionRule::BombOnTopRelocate => "bomb_on_top_relocate",
            DecisionRule::BombOnTopDefend => "bomb_on_top_defend",
            DecisionRule::BombOnTopDraw => "bomb_on_top_draw",
            DecisionRule::BombSecondDraw => "bomb_second_draw",
            DecisionRule::BombAtBottomSwap => "bomb_at_bottom_swap",
            DecisionRule::DefuseOnTopDraw => "defuse_on_top_draw",
            DecisionRule::DefuseAtBottom => "defuse_at_bottom",
            DecisionRule::DefuseRelocate => "defuse_relocate",
            DecisionRule::DefuseFallbackDraw => "defuse_fallback_draw",
            DecisionRule::HandFull => "hand_full",
            DecisionRule::RandomPlay => "random_play",
            DecisionRule::RandomDraw => "random_draw",
            DecisionRule::NothingPlayable => "nothing_playable",
        }
    }
}

impl fmt::Display for DecisionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub action: Action,
    pub rule: DecisionRule,
}

impl Decision {
    pub const fn play(card: Card, rule: DecisionRule) -> Self {
        Self {
            action: Action::Play(card.id()),
            rule,
        }
    }

    pub const fn draw(rule: DecisionRule) -> Self {
        Self {
            action: Action::DRAW,
            rule,
        }
    }
}

/// Unified interface for automated decision-making. One call per action
/// point; randomness comes from the caller so a seed replays a match.
pub trait Policy: Send {
    fn decide(&mut self, ctx: &PolicyContext<'_>, rng: &mut dyn RngCore) -> Decision;

    fn name(&self) -> &'static str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PolicyKind {
    Random,
    Heuristic,
}

impl PolicyKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            PolicyKind::Random => "random",
            PolicyKind::Heuristic => "heuristic",
        }
    }

    pub fn build(self) -> Box<dyn Policy> {
        match self {
            PolicyKind::Random => Box::new(RandomPolicy::new()),
            PolicyKind::Heuristic => Box::new(HeuristicPolicy::new()),
        }
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PolicyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "random" | "legacy" => Ok(PolicyKind::Random),
            "heuristic" => Ok(PolicyKind::Heuristic),
            other => Err(format!("unknown policy '{other}' (expected random or heuristic)")),
        }
    }
}
