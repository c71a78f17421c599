//! Transition values: a target plus the trigger that dispatches it.
//!
//! Transitions are plain immutable data. The fluent registration chain on
//! the machine is sugar; everything it builds lands here.

use crate::core::condition::Condition;
use crate::core::state::StateId;

/// Where a transition leads: another state, or out of the machine.
///
/// `Target::Exit` is the reserved sentinel meaning "terminate the engine"
/// rather than "activate a state". A bare [`StateId`] converts into a
/// target, so both forms read naturally at registration sites.
///
/// # Example
///
/// ```rust
/// use edgewise::{StateId, Target};
///
/// fn takes_target(t: impl Into<Target>) -> Target {
///     t.into()
/// }
///
/// assert_eq!(takes_target(Target::Exit), Target::Exit);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    /// Activate the referenced state.
    State(StateId),
    /// Request engine termination.
    Exit,
}

impl From<StateId> for Target {
    fn from(state: StateId) -> Self {
        Target::State(state)
    }
}

/// What makes a transition fire.
#[derive(Debug, Clone)]
pub(crate) enum Trigger {
    /// An externally supplied condition, evaluated edge-triggered.
    When(Condition),
    /// The owning state's action ended with `interrupted == false`.
    OnCompletion,
}

impl Trigger {
    /// Short human-readable description for diagnostics and warnings.
    pub(crate) fn describe(&self) -> String {
        match self {
            Trigger::When(cond) => match cond.label() {
                Some(label) => format!("when \"{}\"", label),
                None => "when condition".to_string(),
            },
            Trigger::OnCompletion => "on completion".to_string(),
        }
    }
}

/// Immutable directed edge out of a state.
#[derive(Debug, Clone)]
pub(crate) struct Transition {
    pub(crate) target: Target,
    pub(crate) trigger: Trigger,
}
