pub mod config;
mod draw;
mod effects;
pub mod error;
pub mod match_state;
pub mod ports;
pub mod record;
pub mod turn;

pub use config::{ConfigError, DeckEntry, MatchConfig};
pub use effects::{EffectFailure, EffectOutcome};
pub use error::ActionError;
pub use match_state::{ActionOutcome, DrawOutcome, Game, MatchSetup, PlayOutcome, SeatView};
pub use ports::{Action, InputPort, Presentation, RecordingPresentation, TracingPresentation};
pub use record::{MatchRecord, SeatTally};
pub use turn::{MatchOutcome, TurnPhase, TurnState};
