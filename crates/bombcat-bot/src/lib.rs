pub mod driver;
pub mod policy;

pub use driver::{BotTurn, DriverError, PolicyInput, drive_match, run_bot_turn};
pub use policy::{Decision, DecisionRule, HeuristicPolicy, Policy, PolicyContext, PolicyKind, RandomPolicy};
