//! State handles and the engine-owned state arena.
//!
//! States live in an arena inside the machine that created them; callers
//! hold copyable [`StateId`] handles. Indexed handles keep cyclic state
//! graphs (a scanner sweeping up and then back down, say) free of ownership
//! cycles.

use crate::action::Action;
use crate::core::transition::Transition;

/// Handle to a state registered with a [`StateMachine`](crate::StateMachine).
///
/// Handles are only meaningful to the machine that issued them; passing a
/// handle to a different machine is rejected during transition registration.
///
/// # Example
///
/// ```rust
/// use edgewise::action::idle;
/// use edgewise::StateMachine;
///
/// let mut machine = StateMachine::new("demo");
/// let searching = machine.add_state("searching", idle());
///
/// assert_eq!(machine.state_name(searching), Some("searching"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StateId(pub(crate) usize);

impl StateId {
    pub(crate) fn index(self) -> usize {
        self.0
    }
}

/// One arena slot: a named state, its bound action, and its outgoing
/// transitions in registration order.
pub(crate) struct StateNode {
    pub(crate) name: String,
    pub(crate) action: Box<dyn Action>,
    pub(crate) transitions: Vec<Transition>,
}

impl StateNode {
    pub(crate) fn new(name: String, action: Box<dyn Action>) -> Self {
        StateNode {
            name,
            action,
            transitions: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::idle;

    #[test]
    fn node_starts_with_no_transitions() {
        let node = StateNode::new("lonely".to_string(), Box::new(idle()));

        assert_eq!(node.name, "lonely");
        assert!(node.transitions.is_empty());
    }

    #[test]
    fn handles_are_copyable_and_comparable() {
        let a = StateId(0);
        let b = a;

        assert_eq!(a, b);
        assert_ne!(a, StateId(1));
    }
}
