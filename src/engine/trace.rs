//! Bounded lifecycle trace and run counters.
//!
//! The machine records what happened and when into a ring buffer of
//! timestamped records, capped so a long-running machine cannot grow
//! without bound. The trace is diagnostic output, not persisted state; it
//! is cleared on every `start()`.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub(crate) const DEFAULT_TRACE_CAPACITY: usize = 256;

/// One lifecycle event observed by the machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TraceEvent {
    /// `start()` accepted; a deferred activation of the initial state is
    /// pending.
    Started,
    /// A state was entered and its action started.
    Entered { state: String },
    /// The active state's action finished with `interrupted == false`.
    Completed { state: String },
    /// The active state's action was cancelled or preempted.
    Interrupted { state: String },
    /// Engine termination was requested, either by an exit transition or by
    /// a dead-end state's action ending.
    ExitRequested { state: String, dead_end: bool },
    /// `shutdown()` ran.
    Stopped { interrupted: bool },
}

/// A [`TraceEvent`] with the tick it happened on and a wall-clock stamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceRecord {
    pub tick: u64,
    pub at: DateTime<Utc>,
    pub event: TraceEvent,
}

/// Counters accumulated over one run, reset by `start()`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineStats {
    /// Ticks processed.
    pub ticks: u64,
    /// Transitions dispatched, exit dispatches included.
    pub dispatches: u64,
    /// Ticks on which more than one armed transition fired.
    pub ambiguous_ticks: u64,
}

/// Ring buffer of trace records.
pub(crate) struct Trace {
    records: VecDeque<TraceRecord>,
    capacity: usize,
}

impl Trace {
    pub(crate) fn new(capacity: usize) -> Self {
        Trace {
            records: VecDeque::new(),
            capacity,
        }
    }

    pub(crate) fn record(&mut self, tick: u64, event: TraceEvent) {
        if self.capacity == 0 {
            return;
        }
        if self.records.len() == self.capacity {
            self.records.pop_front();
        }
        self.records.push_back(TraceRecord {
            tick,
            at: Utc::now(),
            event,
        });
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &TraceRecord> {
        self.records.iter()
    }

    pub(crate) fn clear(&mut self) {
        self.records.clear();
    }

    pub(crate) fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
        while self.records.len() > capacity {
            self.records.pop_front();
        }
    }
}
