//! Fluent registration of transitions.
//!
//! Transitions are registered per source state and read back in
//! registration order when that state is entered, which is also the order
//! ties are broken in. Registration returns `Err` rather than panicking
//! when a handle or condition is unusable.

use crate::core::{Condition, StateId, Target, Transition, Trigger};
use crate::engine::error::ConfigError;
use crate::engine::machine::StateMachine;

impl StateMachine {
    /// Begin registering a transition out of `from`.
    ///
    /// The registration only takes effect at the terminal call
    /// ([`when`](TriggerBuilder::when) or
    /// [`on_completion`](TriggerBuilder::on_completion)), which validates
    /// the handles involved. Transitions registered while the machine is
    /// running are picked up the next time `from` is entered.
    ///
    /// # Example
    ///
    /// ```rust
    /// use edgewise::action::idle;
    /// use edgewise::{Condition, StateMachine, Target};
    ///
    /// let mut machine = StateMachine::new("doors");
    /// let closed = machine.add_state("closed", idle());
    /// let open = machine.add_state("open", idle());
    ///
    /// let toggle = Condition::named("toggle", || false);
    /// machine.transition(closed).to(open).when(toggle.clone())?;
    /// machine.transition(open).to(Target::Exit).when(toggle)?;
    /// # Ok::<(), edgewise::ConfigError>(())
    /// ```
    pub fn transition(&mut self, from: StateId) -> TransitionBuilder<'_> {
        TransitionBuilder {
            machine: self,
            from,
        }
    }

    fn register(
        &mut self,
        from: StateId,
        target: Target,
        trigger: Trigger,
    ) -> Result<(), ConfigError> {
        self.check_handle(from)?;
        if let Target::State(to) = target {
            self.check_handle(to)?;
        }
        if let Trigger::When(ref condition) = trigger {
            let node = &self.nodes[from.index()];
            let duplicate = node.transitions.iter().any(|t| match &t.trigger {
                Trigger::When(existing) => existing.same_as(condition),
                Trigger::OnCompletion => false,
            });
            if duplicate {
                return Err(ConfigError::DuplicateCondition {
                    state: node.name.clone(),
                });
            }
        }
        self.nodes[from.index()]
            .transitions
            .push(Transition { target, trigger });
        Ok(())
    }
}

/// First half of a transition registration; names the source state.
#[derive(Debug)]
pub struct TransitionBuilder<'m> {
    machine: &'m mut StateMachine,
    from: StateId,
}

impl<'m> TransitionBuilder<'m> {
    /// Name the destination: another state handle, or
    /// [`Target::Exit`](crate::Target::Exit) to terminate the machine.
    pub fn to(self, target: impl Into<Target>) -> TriggerBuilder<'m> {
        TriggerBuilder {
            machine: self.machine,
            from: self.from,
            target: target.into(),
        }
    }
}

/// Second half of a transition registration; names the trigger.
#[derive(Debug)]
pub struct TriggerBuilder<'m> {
    machine: &'m mut StateMachine,
    from: StateId,
    target: Target,
}

impl TriggerBuilder<'_> {
    /// Fire when `condition` is observed going from false to true.
    ///
    /// A given condition object may appear at most once per source state;
    /// clones count as the same object. The same condition may still guard
    /// transitions out of other states.
    pub fn when(self, condition: Condition) -> Result<(), ConfigError> {
        self.machine
            .register(self.from, self.target, Trigger::When(condition))
    }

    /// Fire when the source state's own action has just finished normally.
    pub fn on_completion(self) -> Result<(), ConfigError> {
        self.machine
            .register(self.from, self.target, Trigger::OnCompletion)
    }
}
