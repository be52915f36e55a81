use crate::model::card::{Card, CardKind};
use crate::model::hand::Hand;
use core::fmt;
use serde::{Deserialize, Serialize};

/// The two seats of a match: the externally driven contestant and the
/// automated one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Seat {
    Human = 0,
    Bot = 1,
}

impl Seat {
    pub const LOOP: [Seat; 2] = [Seat::Human, Seat::Bot];

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Seat::Human),
            1 => Some(Seat::Bot),
            _ => None,
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn other(self) -> Seat {
        match self {
            Seat::Human => Seat::Bot,
            Seat::Bot => Seat::Human,
        }
    }

    pub const fn is_bot(self) -> bool {
        matches!(self, Seat::Bot)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Seat::Human => "Human",
            Seat::Bot => "Bot",
        }
    }
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct Contestant {
    name: String,
    seat: Seat,
    hand: Hand,
    alive: bool,
    hand_limit: usize,
}

impl Contestant {
    pub fn new(name: impl Into<String>, seat: Seat, hand_limit: usize) -> Self {
        Self {
            name: name.into(),
            seat,
            hand: Hand::new(),
            alive: true,
            hand_limit,
        }
    }

    pub fn with_hand(mut self, cards: Vec<Card>) -> Self {
        self.hand = Hand::with_cards(cards);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn seat(&self) -> Seat {
        self.seat
    }

    pub fn hand(&self) -> &Hand {
        &self.hand
    }

    pub(crate) fn hand_mut(&mut self) -> &mut Hand {
        &mut self.hand
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Marks the contestant as exploded. There is no way back.
    pub(crate) fn eliminate(&mut self) {
        self.alive = false;
    }

    pub fn hand_limit(&self) -> usize {
        self.hand_limit
    }

    pub fn is_hand_full(&self) -> bool {
        self.hand.len() >= self.hand_limit
    }

    pub fn has_defuse(&self) -> bool {
        self.hand.has_kind(CardKind::Defuse)
    }
}
