//! Boundaries to the outside world.
//!
//! [`Presentation`] is called by the match for narration and for the few
//! choices only the human can make mid-effect. [`InputPort`] is what a driver
//! polls when the human owns the turn.

use crate::game::match_state::SeatView;
use crate::model::card::{Card, CardId};
use std::collections::VecDeque;
use tracing::{Level, event};

/// One thing a contestant can do at an action point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Play(CardId),
    Draw { from_bottom: bool },
}

impl Action {
    pub const DRAW: Action = Action::Draw { from_bottom: false };
}

pub trait Presentation {
    fn notify(&mut self, message: &str, debug_only: bool);

    /// Where the human puts a defused bomb back, counted from the bottom
    /// (0) to the top (`max_position`). `None` lets the match pick.
    fn prompt_insert_position(&mut self, max_position: usize) -> Option<usize> {
        let _ = max_position;
        None
    }

    /// New top-down order for cards the human is allowed to rearrange, as
    /// indices into `cards`. `None` keeps the current order.
    fn prompt_reorder(&mut self, cards: &[Card]) -> Option<Vec<usize>> {
        let _ = cards;
        None
    }

    /// Rendered state should be brought up to date.
    fn refresh(&mut self) {}
}

pub trait InputPort {
    fn request_human_action(&mut self, view: &SeatView<'_>) -> Action;
}

/// Forwards narration to `tracing`; never answers prompts.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingPresentation;

impl Presentation for TracingPresentation {
    fn notify(&mut self, message: &str, debug_only: bool) {
        if debug_only {
            event!(target: "bombcat_core::narration", Level::DEBUG, message = %message);
        } else {
            event!(target: "bombcat_core::narration", Level::INFO, message = %message);
        }
    }
}

/// Keeps every notification and answers prompts from queued replies.
#[derive(Debug, Clone, Default)]
pub struct RecordingPresentation {
    notices: Vec<(String, bool)>,
    insert_replies: VecDeque<Option<usize>>,
    reorder_replies: VecDeque<Option<Vec<usize>>>,
    refreshes: usize,
}

impl RecordingPresentation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_insert_reply(mut self, reply: Option<usize>) -> Self {
        self.insert_replies.push_back(reply);
        self
    }

    pub fn with_reorder_reply(mut self, reply: Option<Vec<usize>>) -> Self {
        self.reorder_replies.push_back(reply);
        self
    }

    pub fn notices(&self) -> &[(String, bool)] {
        &self.notices
    }

    pub fn mentions(&self, needle: &str) -> bool {
        self.notices.iter().any(|(text, _)| text.contains(needle))
    }

    pub fn refreshes(&self) -> usize {
        self.refreshes
    }
}

impl Presentation for RecordingPresentation {
    fn notify(&mut self, message: &str, debug_only: bool) {
        self.notices.push((message.to_string(), debug_only));
    }

    fn prompt_insert_position(&mut self, _max_position: usize) -> Option<usize> {
        self.insert_replies.pop_front().flatten()
    }

    fn prompt_reorder(&mut self, _cards: &[Card]) -> Option<Vec<usize>> {
        self.reorder_replies.pop_front().flatten()
    }

    fn refresh(&mut self) {
        self.refreshes += 1;
    }
}
