//! State entry and exit bookkeeping.
//!
//! Entering a state always follows the same sequence: disarm the old
//! listeners, cancel whatever action is still running, arm the new state's
//! transitions with freshly seeded edges, then hand control to the new
//! action's start hook. Ending an action is the only place the completion
//! marker is ever set.

use crate::core::{Edge, StateId, Trigger};
use crate::engine::machine::{ArmedTransition, StateMachine};
use crate::engine::trace::TraceEvent;

impl StateMachine {
    /// Make `state` the active state.
    ///
    /// Any incumbent action is cancelled through its end hook first, so a
    /// transition looping back into its own state restarts the action
    /// cleanly. Each outgoing transition is armed with an edge seeded from
    /// its current sample; a condition that is already true at entry will
    /// not fire until it goes false and true again.
    pub(super) fn activate(&mut self, state: StateId) {
        self.armed.clear();
        if self.active.is_some() {
            self.end_active(true);
        }
        // Seed completion edges before the marker is cleared, so a
        // completion loop back into the same state starts out satisfied
        // and waits for the next finish.
        let last_completed = self.last_completed;
        let node = &self.nodes[state.index()];
        let mut armed = Vec::with_capacity(node.transitions.len());
        for transition in &node.transitions {
            let seed = match &transition.trigger {
                Trigger::When(condition) => condition.sample(),
                Trigger::OnCompletion => last_completed == Some(state),
            };
            armed.push(ArmedTransition {
                owner: state,
                target: transition.target,
                trigger: transition.trigger.clone(),
                edge: Edge::seeded(seed),
            });
        }
        self.armed = armed;
        self.last_completed = None;
        self.active = Some(state);
        self.current = Some(state);
        let name = self.nodes[state.index()].name.clone();
        tracing::debug!("{}: entering state \"{}\"", self.name, name);
        self.record(TraceEvent::Entered { state: name });
        self.nodes[state.index()].action.on_start();
    }

    /// End the active action through its end hook, if one is running.
    ///
    /// `interrupted = false` is the natural-finish path and records the
    /// completion marker. A state with no outgoing transitions requests
    /// engine exit when its action ends, however it ended, since nothing
    /// could ever leave it.
    pub(super) fn end_active(&mut self, interrupted: bool) {
        let Some(state) = self.active.take() else {
            return;
        };
        self.nodes[state.index()].action.on_end(interrupted);
        let name = self.nodes[state.index()].name.clone();
        if interrupted {
            tracing::debug!("{}: state \"{}\" interrupted", self.name, name);
            self.record(TraceEvent::Interrupted { state: name });
        } else {
            tracing::debug!("{}: state \"{}\" completed", self.name, name);
            self.last_completed = Some(state);
            self.record(TraceEvent::Completed { state: name });
        }
        if self.nodes[state.index()].transitions.is_empty() {
            self.request_exit(Some(state), true);
        }
    }
}
