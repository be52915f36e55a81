use core::fmt;
use serde::{Deserialize, Serialize};

/// Stable identity assigned to every card when the stack is built.
///
/// Two cards of the same kind are never equal; the epistemic model relies on
/// this to remember which physical card sits in a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CardId(u16);

impl CardId {
    pub const fn new(raw: u16) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u16 {
        self.0
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardKind {
    Bomb,
    Defuse,
    Negate,
    Attack,
    Skip,
    SuperSkip,
    Shuffle,
    Swap,
    DrawFromBottom,
    SeeFuture(u8),
    AlterFuture(u8),
}

impl CardKind {
    pub const DEFAULT_DEPTH: u8 = 3;

    pub const fn capabilities(self) -> Capabilities {
        match self {
            CardKind::Bomb | CardKind::Defuse => Capabilities::REACTIVE,
            CardKind::Negate => Capabilities::PLAYABLE,
            CardKind::Attack | CardKind::Skip => Capabilities::PLAYABLE
                .union(Capabilities::ESCAPE)
                .union(Capabilities::DEFENSIVE),
            CardKind::SuperSkip => Capabilities::PLAYABLE.union(Capabilities::ESCAPE),
            CardKind::Shuffle | CardKind::Swap | CardKind::DrawFromBottom => {
                Capabilities::PLAYABLE.union(Capabilities::DEFENSIVE)
            }
            CardKind::SeeFuture(_) => Capabilities::PLAYABLE.union(Capabilities::REVEALING),
            CardKind::AlterFuture(_) => Capabilities::PLAYABLE
                .union(Capabilities::REVEALING)
                .union(Capabilities::DEFENSIVE),
        }
    }

    pub const fn has(self, capability: Capabilities) -> bool {
        self.capabilities().contains(capability)
    }

    pub const fn is_playable(self) -> bool {
        self.has(Capabilities::PLAYABLE)
    }

    pub const fn is_escape(self) -> bool {
        self.has(Capabilities::ESCAPE)
    }

    /// How many cards a revealing card looks at, if any.
    pub const fn depth(self) -> Option<u8> {
        match self {
            CardKind::SeeFuture(depth) | CardKind::AlterFuture(depth) => Some(depth),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            CardKind::Bomb => "Bomb",
            CardKind::Defuse => "Defuse",
            CardKind::Negate => "Negate",
            CardKind::Attack => "Attack",
            CardKind::Skip => "Skip",
            CardKind::SuperSkip => "Super Skip",
            CardKind::Shuffle => "Shuffle",
            CardKind::Swap => "Swap",
            CardKind::DrawFromBottom => "Draw From Bottom",
            CardKind::SeeFuture(_) => "See the Future",
            CardKind::AlterFuture(_) => "Alter the Future",
        }
    }

    pub fn description(self) -> String {
        match self {
            CardKind::Bomb => "Must be defused when drawn, or its drawer explodes".to_string(),
            CardKind::Defuse => "Defuses a drawn bomb and hides it back in the stack".to_string(),
            CardKind::Negate => "The opponent's next played card has no effect".to_string(),
            CardKind::Attack => "Ends your turn and makes the opponent take all of them".to_string(),
            CardKind::Skip => "Ends the current turn without drawing".to_string(),
            CardKind::SuperSkip => "Ends every turn you still owe without drawing".to_string(),
            CardKind::Shuffle => "Shuffles the whole stack".to_string(),
            CardKind::Swap => "Swaps the top and bottom cards of the stack".to_string(),
            CardKind::DrawFromBottom => "Draws from the bottom of the stack instead of the top".to_string(),
            CardKind::SeeFuture(depth) => format!("Look at the top {depth} cards of the stack"),
            CardKind::AlterFuture(depth) => {
                format!("Look at and reorder the top {depth} cards of the stack")
            }
        }
    }
}

impl fmt::Display for CardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.depth() {
            Some(depth) if depth != Self::DEFAULT_DEPTH => write!(f, "{}-{}", self.label(), depth),
            _ => f.write_str(self.label()),
        }
    }
}

/// Bit-set of the roles a card kind can fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Capabilities(u8);

impl Capabilities {
    pub const NONE: Self = Self(0);
    /// May be played voluntarily from hand.
    pub const PLAYABLE: Self = Self(1 << 0);
    /// Ends or hands away the current sub-turn.
    pub const ESCAPE: Self = Self(1 << 1);
    /// Useful when the top of the stack is dangerous.
    pub const DEFENSIVE: Self = Self(1 << 2);
    /// Looks at hidden stack cards.
    pub const REVEALING: Self = Self(1 << 3);
    /// Only ever resolved by the draw path.
    pub const REACTIVE: Self = Self(1 << 4);

    pub const fn contains(self, other: Capabilities) -> bool {
        other.0 != 0 && self.0 & other.0 == other.0
    }

    pub const fn union(self, other: Capabilities) -> Self {
        Self(self.0 | other.0)
    }
}

/// A single physical card. Cards are created once when the stack is built and
/// only ever move between the stack, a hand and the discard pile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    id: CardId,
    kind: CardKind,
}

impl Card {
    pub const fn new(id: CardId, kind: CardKind) -> Self {
        Self { id, kind }
    }

    pub const fn id(self) -> CardId {
        self.id
    }

    pub const fn kind(self) -> CardKind {
        self.kind
    }

    pub fn is(self, kind: CardKind) -> bool {
        self.kind == kind
    }

    pub fn description(self) -> String {
        self.kind.description()
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}
