//! What the automated contestant believes about the stack.
//!
//! The model is a slot array running parallel to the stack. The stack owns it
//! and updates it on every mutation, so both always have the same length.

mod slots;

pub use slots::{Knowledge, StackBelief};
