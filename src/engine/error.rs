//! Configuration-time errors.

use thiserror::Error;

/// Errors raised while building or starting a machine.
///
/// Every variant is a configuration mistake surfaced before the machine
/// runs; the tick loop itself is infallible.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The machine has no states, so no initial state could be chosen.
    #[error("No initial state. Register a state with add_state() before start()")]
    MissingInitialState,

    /// A state handle does not belong to this machine.
    #[error("State handle #{index} does not belong to this machine")]
    UnknownState { index: usize },

    /// The same condition object was registered twice on one state.
    #[error("Condition already registered on state \"{state}\". A condition object may appear at most once per state")]
    DuplicateCondition { state: String },
}
