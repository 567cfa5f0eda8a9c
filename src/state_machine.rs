//! Core session state machine
//!
//! Implements the Elm Architecture pattern with pure state transitions.
//! The runtime in `crate::session` owns the history and executes the
//! effects produced here.

mod effect;
mod event;
mod state;
mod transition;

#[cfg(test)]
mod proptests;

pub use effect::Effect;
pub use event::Event;
pub use state::SessionState;
pub use transition::{transition, TransitionError, TransitionResult};
