//! Core state machine types.
//!
//! This module contains the data the engine runs on:
//! - Conditions and rising-edge detection
//! - State handles and the arena node they index
//! - Immutable transition values with their triggers
//!
//! Everything here is passive; the engine in [`crate::engine`] supplies the
//! tick loop that brings it to life.

mod condition;
mod state;
mod transition;

pub use condition::{Condition, Edge};
pub use state::StateId;
pub use transition::Target;

pub(crate) use state::StateNode;
pub(crate) use transition::{Transition, Trigger};
