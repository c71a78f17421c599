//! Structural reports over a configured machine.
//!
//! A report is a serializable snapshot of the transition graph plus a
//! findings pass that flags shapes worth a second look: states nothing
//! transitions into, states nothing leaves, and completion transitions
//! that can never win. Findings are advisory; none of them stop a machine
//! from running.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::{StateId, Target, Trigger};
use crate::engine::machine::StateMachine;

impl StateMachine {
    /// Snapshot the configured graph as a [`MachineReport`].
    ///
    /// # Example
    ///
    /// ```rust
    /// use edgewise::action::idle;
    /// use edgewise::{Finding, StateMachine};
    ///
    /// let mut machine = StateMachine::new("lonely");
    /// machine.add_state("a", idle());
    /// machine.add_state("b", idle());
    ///
    /// let report = machine.describe();
    /// assert!(report
    ///     .findings
    ///     .iter()
    ///     .any(|f| matches!(f, Finding::Unreachable { state } if state == "b")));
    /// ```
    pub fn describe(&self) -> MachineReport {
        MachineReport::from_machine(self)
    }
}

/// Where a reported transition leads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EdgeTarget {
    /// Another state, by name.
    State(String),
    /// Machine termination.
    Exit,
}

impl fmt::Display for EdgeTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeTarget::State(name) => f.write_str(name),
            EdgeTarget::Exit => f.write_str("exit"),
        }
    }
}

/// One outgoing transition of a reported state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionReport {
    pub target: EdgeTarget,
    /// Human-readable trigger, e.g. `when "door open"` or `on completion`.
    pub trigger: String,
}

/// One state of a reported machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateReport {
    pub name: String,
    pub initial: bool,
    pub transitions: Vec<TransitionReport>,
    /// Transitions targeting this state, self-loops included.
    pub inbound: usize,
    pub outbound: usize,
}

/// Graph shape worth a second look.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Finding {
    /// No transition from any other state targets this one, and it is not
    /// the initial state.
    Unreachable { state: String },
    /// No transition leaves this state; the machine exits when its action
    /// ends.
    DeadEnd { state: String },
    /// More than one completion transition; they always fire together and
    /// only the first registered can win.
    RedundantCompletion { state: String, count: usize },
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Finding::Unreachable { state } => {
                write!(f, "state \"{state}\" is unreachable")
            }
            Finding::DeadEnd { state } => {
                write!(
                    f,
                    "state \"{state}\" has no outgoing transitions; the machine exits when its action ends"
                )
            }
            Finding::RedundantCompletion { state, count } => {
                write!(
                    f,
                    "state \"{state}\" has {count} completion transitions; only the first registered can fire"
                )
            }
        }
    }
}

/// Serializable snapshot of a machine's transition graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineReport {
    pub name: String,
    pub states: Vec<StateReport>,
    pub findings: Vec<Finding>,
}

impl MachineReport {
    fn from_machine(machine: &StateMachine) -> Self {
        let states = machine
            .nodes
            .iter()
            .enumerate()
            .map(|(index, node)| {
                let transitions = node
                    .transitions
                    .iter()
                    .map(|t| TransitionReport {
                        target: match t.target {
                            Target::State(to) => {
                                EdgeTarget::State(machine.nodes[to.index()].name.clone())
                            }
                            Target::Exit => EdgeTarget::Exit,
                        },
                        trigger: t.trigger.describe(),
                    })
                    .collect();
                StateReport {
                    name: node.name.clone(),
                    initial: machine.initial == Some(StateId(index)),
                    transitions,
                    inbound: inbound_count(machine, index, true),
                    outbound: node.transitions.len(),
                }
            })
            .collect();
        MachineReport {
            name: machine.name.clone(),
            states,
            findings: collect_findings(machine),
        }
    }
}

/// Transitions targeting `index`. Self-loops only count when
/// `include_self` is set; a state reachable only from itself is still
/// unreachable.
fn inbound_count(machine: &StateMachine, index: usize, include_self: bool) -> usize {
    machine
        .nodes
        .iter()
        .enumerate()
        .flat_map(|(owner, node)| {
            node.transitions
                .iter()
                .map(move |t| (owner, t.target))
        })
        .filter(|(owner, target)| {
            *target == Target::State(StateId(index)) && (include_self || *owner != index)
        })
        .count()
}

fn collect_findings(machine: &StateMachine) -> Vec<Finding> {
    let mut findings = Vec::new();
    for (index, node) in machine.nodes.iter().enumerate() {
        let initial = machine.initial == Some(StateId(index));
        if !initial && inbound_count(machine, index, false) == 0 {
            findings.push(Finding::Unreachable {
                state: node.name.clone(),
            });
        }
        if node.transitions.is_empty() {
            findings.push(Finding::DeadEnd {
                state: node.name.clone(),
            });
        }
        let completions = node
            .transitions
            .iter()
            .filter(|t| matches!(t.trigger, Trigger::OnCompletion))
            .count();
        if completions > 1 {
            findings.push(Finding::RedundantCompletion {
                state: node.name.clone(),
                count: completions,
            });
        }
    }
    findings
}

impl fmt::Display for MachineReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "machine \"{}\": {} states", self.name, self.states.len())?;
        for state in &self.states {
            if state.initial {
                writeln!(f, "  {} (initial)", state.name)?;
            } else {
                writeln!(f, "  {}", state.name)?;
            }
            if state.transitions.is_empty() {
                writeln!(f, "    (no outgoing transitions)")?;
            }
            for transition in &state.transitions {
                writeln!(f, "    {} -> {}", transition.trigger, transition.target)?;
            }
        }
        if !self.findings.is_empty() {
            writeln!(f, "findings:")?;
            for finding in &self.findings {
                writeln!(f, "  - {finding}")?;
            }
        }
        Ok(())
    }
}
