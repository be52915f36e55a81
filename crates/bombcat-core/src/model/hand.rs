use crate::model::card::{Capabilities, Card, CardId, CardKind};
use std::vec::Vec;

/// Cards held by one contestant. Order carries no meaning; cards are kept in
/// the order they were received.
#[derive(Debug, Clone, Default)]
pub struct Hand {
    cards: Vec<Card>,
}

impl Hand {
    pub fn new() -> Self {
        Self { cards: Vec::new() }
    }

    pub fn with_cards(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    pub fn add(&mut self, card: Card) {
        self.cards.push(card);
    }

    pub fn remove(&mut self, id: CardId) -> Option<Card> {
        let index = self.cards.iter().position(|c| c.id() == id)?;
        Some(self.cards.remove(index))
    }

    /// Removes the first held card of `kind`.
    pub fn take_kind(&mut self, kind: CardKind) -> Option<Card> {
        let index = self.cards.iter().position(|c| c.is(kind))?;
        Some(self.cards.remove(index))
    }

    pub fn get(&self, id: CardId) -> Option<Card> {
        self.cards.iter().copied().find(|c| c.id() == id)
    }

    pub fn contains(&self, id: CardId) -> bool {
        self.cards.iter().any(|c| c.id() == id)
    }

    pub fn has_kind(&self, kind: CardKind) -> bool {
        self.cards.iter().any(|c| c.is(kind))
    }

    pub fn count_kind(&self, kind: CardKind) -> usize {
        self.cards.iter().filter(|c| c.is(kind)).count()
    }

    pub fn with_capability(&self, capability: Capabilities) -> impl Iterator<Item = Card> + '_ {
        self.cards
            .iter()
            .copied()
            .filter(move |c| c.kind().has(capability))
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }
}
