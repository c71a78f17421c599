//! The tick-driven engine.
//!
//! A [`StateMachine`] owns its states in an arena, arms edge-triggered
//! listeners for the state it is in, and advances one poll per tick. The
//! activation bookkeeping lives in [`super::activation`]; transition
//! registration lives in [`super::builder`].

use std::fmt;

use crate::action::Action;
use crate::core::{Edge, StateId, StateNode, Target, Trigger};
use crate::engine::error::ConfigError;
use crate::engine::trace::{
    MachineStats, Trace, TraceEvent, TraceRecord, DEFAULT_TRACE_CAPACITY,
};

/// A listener armed for one outgoing transition of the current state.
pub(super) struct ArmedTransition {
    pub(super) owner: StateId,
    pub(super) target: Target,
    pub(super) trigger: Trigger,
    pub(super) edge: Edge,
}

/// Tick-driven state machine sequencing cooperative actions.
///
/// Configuration happens up front: register states, register transitions,
/// optionally override the initial state. `start()` then requests a
/// deferred activation of the initial state, and each `tick()` afterwards
/// polls the current state's armed transitions, dispatching the first
/// rising edge it sees. The machine reports `is_finished()` once an exit
/// transition fires or a state with no way out ends.
///
/// A machine is itself an [`Action`], so it can run under a
/// [`Scheduler`](crate::Scheduler) or serve as another machine's state
/// action.
///
/// # Example
///
/// ```rust
/// use edgewise::action::none;
/// use edgewise::StateMachine;
///
/// let mut machine = StateMachine::new("greeter");
/// let hello = machine.add_state("hello", none());
/// let done = machine.add_state("done", none());
/// machine.transition(hello).to(done).on_completion().unwrap();
///
/// machine.start().unwrap();
/// machine.tick(); // deferred activation enters "hello"
/// machine.tick(); // "hello" finishes normally
/// machine.tick(); // completion edge fires
/// assert_eq!(machine.current_state(), Some(done));
/// ```
pub struct StateMachine {
    pub(super) name: String,
    pub(super) nodes: Vec<StateNode>,
    pub(super) initial: Option<StateId>,
    /// Deferred activation applied by the next tick.
    pub(super) pending: Option<StateId>,
    pub(super) armed: Vec<ArmedTransition>,
    /// Last state entered this run; survives its action ending.
    pub(super) current: Option<StateId>,
    /// State whose action is running right now.
    pub(super) active: Option<StateId>,
    /// Most recent state whose action ended uninterrupted; cleared on every
    /// state entry.
    pub(super) last_completed: Option<StateId>,
    pub(super) exit_requested: bool,
    pub(super) tick_count: u64,
    pub(super) stats: MachineStats,
    pub(super) trace: Trace,
}

impl StateMachine {
    /// Create an empty machine. The name only appears in diagnostics.
    pub fn new(name: impl Into<String>) -> Self {
        StateMachine {
            name: name.into(),
            nodes: Vec::new(),
            initial: None,
            pending: None,
            armed: Vec::new(),
            current: None,
            active: None,
            last_completed: None,
            exit_requested: false,
            tick_count: 0,
            stats: MachineStats::default(),
            trace: Trace::new(DEFAULT_TRACE_CAPACITY),
        }
    }

    /// Register a state and the action bound to it.
    ///
    /// The first state registered becomes the initial state unless
    /// [`set_initial_state`](Self::set_initial_state) overrides it.
    pub fn add_state(&mut self, name: impl Into<String>, action: impl Action + 'static) -> StateId {
        let id = StateId(self.nodes.len());
        self.nodes.push(StateNode::new(name.into(), Box::new(action)));
        if self.initial.is_none() {
            self.initial = Some(id);
        }
        id
    }

    /// Override which state the next `start()` activates.
    pub fn set_initial_state(&mut self, state: StateId) -> Result<(), ConfigError> {
        self.check_handle(state)?;
        self.initial = Some(state);
        Ok(())
    }

    /// Reset run state and request a deferred activation of the initial
    /// state.
    ///
    /// The activation is applied by the next `tick()`, never inside
    /// `start()` itself. A machine that already ran can be started again;
    /// an activation left running by a run that was never shut down is
    /// cancelled first.
    ///
    /// # Example
    ///
    /// ```rust
    /// use edgewise::StateMachine;
    ///
    /// assert!(StateMachine::new("empty").start().is_err());
    /// ```
    pub fn start(&mut self) -> Result<(), ConfigError> {
        let initial = self.initial.ok_or(ConfigError::MissingInitialState)?;
        if self.active.is_some() {
            self.end_active(true);
        }
        self.exit_requested = false;
        self.last_completed = None;
        self.current = None;
        self.armed.clear();
        self.tick_count = 0;
        self.stats = MachineStats::default();
        self.trace.clear();
        self.pending = Some(initial);
        self.record(TraceEvent::Started);
        tracing::debug!(
            "{}: started; state \"{}\" activates next tick",
            self.name,
            self.nodes[initial.index()].name
        );
        Ok(())
    }

    /// Advance the machine by one scheduling period.
    ///
    /// A tick does exactly one of: apply the pending initial activation,
    /// dispatch the first transition whose edge fired, or drive the active
    /// action (`on_tick`, then the natural-finish path once it reports
    /// finished). After `is_finished()` turns true, further ticks do
    /// nothing.
    pub fn tick(&mut self) {
        if self.exit_requested {
            return;
        }
        self.tick_count += 1;
        self.stats.ticks += 1;
        if let Some(initial) = self.pending.take() {
            self.activate(initial);
            return;
        }
        match self.poll() {
            Some(Target::State(state)) => {
                self.stats.dispatches += 1;
                self.activate(state);
            }
            Some(Target::Exit) => {
                self.stats.dispatches += 1;
                self.request_exit(self.current, false);
            }
            None => self.drive_active(),
        }
    }

    /// Sample every armed edge once, in registration order, and return the
    /// target of the first that fired.
    ///
    /// All edges are sampled even after a hit so their stored previous
    /// values stay coherent and simultaneous fires are detectable; only
    /// dispatch is limited to the winner.
    fn poll(&mut self) -> Option<Target> {
        if self.armed.is_empty() {
            return None;
        }
        let last_completed = self.last_completed;
        let mut winner: Option<usize> = None;
        let mut fired = 0usize;
        for (index, armed) in self.armed.iter_mut().enumerate() {
            let sample = match &armed.trigger {
                Trigger::When(condition) => condition.sample(),
                Trigger::OnCompletion => last_completed == Some(armed.owner),
            };
            if armed.edge.observe(sample) {
                fired += 1;
                if winner.is_none() {
                    winner = Some(index);
                }
            }
        }
        let winner = winner?;
        if fired > 1 {
            self.stats.ambiguous_ticks += 1;
            tracing::warn!(
                "{}: {} transitions fired on state \"{}\" in one tick; dispatching the first registered ({})",
                self.name,
                fired,
                self.nodes[self.armed[winner].owner.index()].name,
                self.armed[winner].trigger.describe()
            );
        }
        Some(self.armed[winner].target)
    }

    fn drive_active(&mut self) {
        let Some(state) = self.active else {
            return;
        };
        self.nodes[state.index()].action.on_tick();
        if self.nodes[state.index()].action.is_finished() {
            self.end_active(false);
        }
    }

    /// Whether engine termination has been requested.
    pub fn is_finished(&self) -> bool {
        self.exit_requested
    }

    /// Cancel the active activation, if any, through its normal end hook
    /// with `interrupted = true`, and drop any pending activation.
    ///
    /// The host driving the machine calls this once `is_finished()` reports
    /// true (or when tearing the machine down early). `interrupted` records
    /// how the machine itself was stopped.
    pub fn shutdown(&mut self, interrupted: bool) {
        self.end_active(true);
        self.pending = None;
        self.armed.clear();
        self.record(TraceEvent::Stopped { interrupted });
        tracing::debug!("{}: stopped (interrupted: {})", self.name, interrupted);
    }

    pub(super) fn request_exit(&mut self, state: Option<StateId>, dead_end: bool) {
        let name = state
            .map(|s| self.nodes[s.index()].name.clone())
            .unwrap_or_default();
        tracing::debug!("{}: exit requested from state \"{}\"", self.name, name);
        self.record(TraceEvent::ExitRequested {
            state: name,
            dead_end,
        });
        self.exit_requested = true;
    }

    /// The machine's diagnostic name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of registered states.
    pub fn state_count(&self) -> usize {
        self.nodes.len()
    }

    /// Name of a state, if the handle belongs to this machine.
    pub fn state_name(&self, state: StateId) -> Option<&str> {
        self.nodes.get(state.index()).map(|node| node.name.as_str())
    }

    /// The state `start()` will activate.
    pub fn initial_state(&self) -> Option<StateId> {
        self.initial
    }

    /// Last state entered this run, whether or not its action still runs.
    pub fn current_state(&self) -> Option<StateId> {
        self.current
    }

    /// State whose action is running right now.
    pub fn active_state(&self) -> Option<StateId> {
        self.active
    }

    /// Counters for the current run.
    pub fn stats(&self) -> MachineStats {
        self.stats
    }

    /// Lifecycle trace of the current run, oldest first.
    pub fn trace(&self) -> impl Iterator<Item = &TraceRecord> {
        self.trace.iter()
    }

    /// Cap the lifecycle trace at `capacity` records; zero disables it.
    pub fn set_trace_capacity(&mut self, capacity: usize) {
        self.trace.set_capacity(capacity);
    }

    pub(super) fn record(&mut self, event: TraceEvent) {
        self.trace.record(self.tick_count, event);
    }

    pub(super) fn check_handle(&self, state: StateId) -> Result<(), ConfigError> {
        if state.index() >= self.nodes.len() {
            return Err(ConfigError::UnknownState {
                index: state.index(),
            });
        }
        Ok(())
    }
}

impl Action for StateMachine {
    fn on_start(&mut self) {
        if let Err(err) = self.start() {
            tracing::error!("{}: refusing to run: {}", self.name, err);
            self.exit_requested = true;
        }
    }

    fn on_tick(&mut self) {
        self.tick();
    }

    fn is_finished(&self) -> bool {
        StateMachine::is_finished(self)
    }

    fn on_end(&mut self, interrupted: bool) {
        self.shutdown(interrupted);
    }
}

impl fmt::Display for StateMachine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.describe().fmt(f)
    }
}

impl fmt::Debug for StateMachine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateMachine")
            .field("name", &self.name)
            .field("states", &self.nodes.len())
            .field("current", &self.current)
            .field("active", &self.active)
            .field("exit_requested", &self.exit_requested)
            .field("tick", &self.tick_count)
            .finish()
    }
}
