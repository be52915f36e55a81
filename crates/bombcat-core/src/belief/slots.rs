use crate::model::card::{Card, CardKind};
use serde::{Deserialize, Serialize};

/// Belief about a single stack slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Knowledge {
    #[default]
    Unknown,
    Known(Card),
}

impl Knowledge {
    pub const fn card(self) -> Option<Card> {
        match self {
            Knowledge::Known(card) => Some(card),
            Knowledge::Unknown => None,
        }
    }

    pub fn is_kind(self, kind: CardKind) -> bool {
        matches!(self, Knowledge::Known(card) if card.is(kind))
    }

    pub fn is_known(self) -> bool {
        matches!(self, Knowledge::Known(_))
    }
}

/// Per-slot belief array. Index 0 is the bottom of the stack, the last slot
/// is the top, matching the stack's own layout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StackBelief {
    slots: Vec<Knowledge>,
}

impl StackBelief {
    /// A belief that knows nothing about a stack of `len` cards.
    pub fn unknown(len: usize) -> Self {
        Self {
            slots: vec![Knowledge::Unknown; len],
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slots(&self) -> &[Knowledge] {
        &self.slots
    }

    /// Knowledge about the slot `depth` cards below the top (0 is the top).
    pub fn at_depth(&self, depth: usize) -> Knowledge {
        self.index_of_depth(depth)
            .map(|index| self.slots[index])
            .unwrap_or_default()
    }

    pub fn known_at(&self, depth: usize) -> Option<Card> {
        self.at_depth(depth).card()
    }

    /// Depth of the topmost slot known to hold a card of `kind`.
    pub fn position_from_top(&self, kind: CardKind) -> Option<usize> {
        self.slots
            .iter()
            .rev()
            .position(|slot| slot.is_kind(kind))
    }

    /// Depth of the bottom slot, when the stack is not empty.
    pub fn bottom_depth(&self) -> Option<usize> {
        self.slots.len().checked_sub(1)
    }

    pub fn known_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_known()).count()
    }

    pub fn iter_top_down(&self) -> impl Iterator<Item = &Knowledge> {
        self.slots.iter().rev()
    }

    fn index_of_depth(&self, depth: usize) -> Option<usize> {
        self.slots.len().checked_sub(depth + 1)
    }

    pub(crate) fn pop_top(&mut self) -> Option<Knowledge> {
        self.slots.pop()
    }

    pub(crate) fn pop_bottom(&mut self) -> Option<Knowledge> {
        if self.slots.is_empty() {
            None
        } else {
            Some(self.slots.remove(0))
        }
    }

    pub(crate) fn remove(&mut self, index: usize) -> Option<Knowledge> {
        (index < self.slots.len()).then(|| self.slots.remove(index))
    }

    pub(crate) fn insert(&mut self, index: usize, knowledge: Knowledge) {
        self.slots.insert(index, knowledge);
    }

    pub(crate) fn push_top(&mut self, knowledge: Knowledge) {
        self.slots.push(knowledge);
    }

    pub(crate) fn swap_ends(&mut self) {
        if let Some(last) = self.slots.len().checked_sub(1) {
            self.slots.swap(0, last);
        }
    }

    /// Forgets everything, e.g. after an unseen reorder of the whole stack.
    pub(crate) fn invalidate(&mut self, len: usize) {
        self.slots.clear();
        self.slots.resize(len, Knowledge::Unknown);
    }

    pub(crate) fn record(&mut self, depth: usize, card: Card) {
        if let Some(index) = self.index_of_depth(depth) {
            self.slots[index] = Knowledge::Known(card);
        }
    }
}
