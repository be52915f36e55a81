use crate::model::card::CardKind;
use crate::model::contestant::Seat;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const DEFAULT_HAND_LIMIT: usize = 9;
const DEFAULT_INITIAL_HAND: usize = 7;
/// Largest deck whose cards all get a distinct `CardId`.
pub const MAX_DECK_SIZE: usize = u16::MAX as usize;

/// How many copies of one card kind go into the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckEntry {
    pub kind: CardKind,
    pub count: u8,
}

impl DeckEntry {
    pub const fn new(kind: CardKind, count: u8) -> Self {
        Self { kind, count }
    }
}

/// Everything a match needs to know before the first card is dealt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    pub deck: Vec<DeckEntry>,
    pub hand_limit: usize,
    /// Cards dealt to each contestant on top of the guaranteed Defuse.
    pub initial_hand: usize,
    pub guaranteed_defuse: bool,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            deck: Self::standard_deck(),
            hand_limit: DEFAULT_HAND_LIMIT,
            initial_hand: DEFAULT_INITIAL_HAND,
            guaranteed_defuse: true,
        }
    }
}

impl MatchConfig {
    pub fn standard_deck() -> Vec<DeckEntry> {
        let depth = CardKind::DEFAULT_DEPTH;
        vec![
            DeckEntry::new(CardKind::Bomb, 3),
            DeckEntry::new(CardKind::Defuse, 4),
            DeckEntry::new(CardKind::Negate, 4),
            DeckEntry::new(CardKind::Attack, 6),
            DeckEntry::new(CardKind::Skip, 6),
            DeckEntry::new(CardKind::SuperSkip, 2),
            DeckEntry::new(CardKind::Shuffle, 4),
            DeckEntry::new(CardKind::SeeFuture(depth), 4),
            DeckEntry::new(CardKind::AlterFuture(depth), 4),
            DeckEntry::new(CardKind::DrawFromBottom, 4),
            DeckEntry::new(CardKind::Swap, 4),
        ]
    }

    pub fn count_of(&self, kind: CardKind) -> usize {
        self.deck
            .iter()
            .filter(|entry| entry.kind == kind)
            .map(|entry| entry.count as usize)
            .sum()
    }

    pub fn total_cards(&self) -> usize {
        self.deck.iter().map(|entry| entry.count as usize).sum()
    }

    /// Size of each opening hand, guaranteed Defuse included.
    pub fn opening_hand(&self) -> usize {
        self.initial_hand + usize::from(self.guaranteed_defuse)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let contestants = Seat::LOOP.len();

        if self.hand_limit == 0 {
            return Err(ConfigError::ZeroHandLimit);
        }

        if self.opening_hand() > self.hand_limit {
            return Err(ConfigError::OpeningHandTooLarge {
                opening: self.opening_hand(),
                limit: self.hand_limit,
            });
        }

        if let Some(entry) = self.deck.iter().find(|e| e.kind.depth() == Some(0)) {
            return Err(ConfigError::ZeroDepth { kind: entry.kind });
        }

        if self.count_of(CardKind::Bomb) == 0 {
            return Err(ConfigError::NoBombs);
        }

        let defuses = self.count_of(CardKind::Defuse);
        if self.guaranteed_defuse && defuses < contestants {
            return Err(ConfigError::NotEnoughDefuses { found: defuses });
        }

        let dealable = self.total_cards() - self.count_of(CardKind::Bomb);
        let needed = self.opening_hand() * contestants;
        if dealable < needed {
            return Err(ConfigError::NotEnoughToDeal { dealable, needed });
        }

        // Both hands at the limit must still leave a card to draw somewhere.
        let total = self.total_cards();
        if total <= self.hand_limit * contestants {
            return Err(ConfigError::DeckTooSmall {
                total,
                limit: self.hand_limit,
            });
        }

        if total > MAX_DECK_SIZE {
            return Err(ConfigError::DeckTooLarge {
                total,
                max: MAX_DECK_SIZE,
            });
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("hand limit must be greater than zero")]
    ZeroHandLimit,
    #[error("opening hand of {opening} cards exceeds the hand limit of {limit}")]
    OpeningHandTooLarge { opening: usize, limit: usize },
    #[error("{kind} must reveal at least one card")]
    ZeroDepth { kind: CardKind },
    #[error("deck contains no bombs, so no match could ever end")]
    NoBombs,
    #[error("{found} defuse cards cannot guarantee one per contestant")]
    NotEnoughDefuses { found: usize },
    #[error("deck has {dealable} non-bomb cards but opening hands need {needed}")]
    NotEnoughToDeal { dealable: usize, needed: usize },
    #[error("deck of {total} cards cannot keep a card in play beside two hands of {limit}")]
    DeckTooSmall { total: usize, limit: usize },
    #[error("deck of {total} cards exceeds the {max} distinct card ids")]
    DeckTooLarge { total: usize, max: usize },
}
