pub mod card;
pub mod contestant;
pub mod hand;
pub mod stack;
