use crate::belief::{Knowledge, StackBelief};
use crate::game::config::DeckEntry;
use crate::model::card::{Card, CardId};
use rand::Rng;
use rand::seq::SliceRandom;

/// A card pulled off the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Drawn {
    pub card: Card,
    /// The stack was empty and had to be rebuilt from the discard pile first.
    pub refilled: bool,
}

/// The draw pile plus its discard pile.
///
/// `cards` is stored bottom-first: the last element is the top. Positions
/// given to [`Stack::insert`] count from the bottom (0) up to `len()` (on
/// top), while depths used by the belief count down from the top.
#[derive(Debug, Clone, Default)]
pub struct Stack {
    cards: Vec<Card>,
    discard: Vec<Card>,
    belief: StackBelief,
}

impl Stack {
    /// Creates every card the deck table asks for and shuffles them.
    pub fn build<R: Rng + ?Sized>(deck: &[DeckEntry], rng: &mut R) -> Self {
        let mut cards = Vec::with_capacity(deck.iter().map(|e| e.count as usize).sum());
        let mut next_id: u16 = 0;
        for entry in deck {
            for _ in 0..entry.count {
                cards.push(Card::new(CardId::new(next_id), entry.kind));
                next_id = next_id.wrapping_add(1);
            }
        }
        let mut stack = Self::from_bottom_up(cards);
        stack.shuffle(rng);
        stack
    }

    pub fn from_bottom_up(cards: Vec<Card>) -> Self {
        let belief = StackBelief::unknown(cards.len());
        Self {
            cards,
            discard: Vec::new(),
            belief,
        }
    }

    /// Builds a stack from cards listed in the order they would be drawn.
    pub fn from_top_down(mut cards: Vec<Card>) -> Self {
        cards.reverse();
        Self::from_bottom_up(cards)
    }

    pub fn with_discard(mut self, discard: Vec<Card>) -> Self {
        self.discard = discard;
        self
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Cards bottom-first.
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn top_down(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter().rev()
    }

    pub fn top(&self) -> Option<Card> {
        self.cards.last().copied()
    }

    pub fn discard_pile(&self) -> &[Card] {
        &self.discard
    }

    pub fn belief(&self) -> &StackBelief {
        &self.belief
    }

    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
        self.belief.invalidate(self.cards.len());
    }

    pub fn discard(&mut self, card: Card) {
        self.discard.push(card);
    }

    /// Pulls one card from the requested end. An empty stack is first rebuilt
    /// from the shuffled discard pile; `None` means both piles are empty.
    pub fn draw<R: Rng + ?Sized>(&mut self, from_bottom: bool, rng: &mut R) -> Option<Drawn> {
        let refilled = if self.cards.is_empty() {
            self.refill_from_discard(rng)
        } else {
            false
        };

        let card = if from_bottom {
            if self.cards.is_empty() {
                return None;
            }
            self.belief.pop_bottom();
            self.cards.remove(0)
        } else {
            let card = self.cards.pop()?;
            self.belief.pop_top();
            card
        };

        Some(Drawn { card, refilled })
    }

    fn refill_from_discard<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        if self.discard.is_empty() {
            return false;
        }
        self.cards.append(&mut self.discard);
        self.shuffle(rng);
        true
    }

    /// Inserts `card` at `position` counted from the bottom. Positions past
    /// the top are refused and leave the stack untouched.
    pub fn insert(&mut self, position: usize, card: Card, knowledge: Knowledge) -> bool {
        if position > self.cards.len() {
            return false;
        }
        self.cards.insert(position, card);
        self.belief.insert(position, knowledge);
        true
    }

    /// Exchanges the top and bottom cards. Needs at least two cards.
    pub fn swap_ends(&mut self) -> bool {
        if self.cards.len() <= 1 {
            return false;
        }
        let last = self.cards.len() - 1;
        self.cards.swap(0, last);
        self.belief.swap_ends();
        true
    }

    /// Copies of the top `count` cards, top-first, without moving them.
    pub fn peek_top(&self, count: usize) -> Vec<Card> {
        self.cards.iter().rev().take(count).copied().collect()
    }

    /// Writes the true identity of the top `count` cards into the belief.
    pub fn record_top(&mut self, count: usize) {
        for (depth, card) in self.peek_top(count).into_iter().enumerate() {
            self.belief.record(depth, card);
        }
    }

    /// Removes up to `count` cards from the top, returned top-first.
    pub fn take_top(&mut self, count: usize) -> Vec<Card> {
        let count = count.min(self.cards.len());
        let mut taken = Vec::with_capacity(count);
        for _ in 0..count {
            if let Some(card) = self.cards.pop() {
                self.belief.pop_top();
                taken.push(card);
            }
        }
        taken
    }

    /// Returns cards to the top so that `cards[0]` ends up on top.
    pub fn put_top(&mut self, cards: Vec<Card>, known: bool) {
        for card in cards.into_iter().rev() {
            self.cards.push(card);
            self.belief.push_top(if known {
                Knowledge::Known(card)
            } else {
                Knowledge::Unknown
            });
        }
    }

    /// Removes the card closest to the top that satisfies `predicate`.
    pub fn take_first_from_top<F>(&mut self, predicate: F) -> Option<Card>
    where
        F: Fn(&Card) -> bool,
    {
        let index = self.cards.iter().rposition(|c| predicate(c))?;
        self.belief.remove(index);
        Some(self.cards.remove(index))
    }
}
