//! Edgewise: a tick-driven state machine engine
//!
//! Edgewise sequences long-running cooperative actions. Each state owns an
//! action driven through start, tick, and end hooks; transitions fire on
//! the rising edge of a condition, or on the owning action finishing
//! normally. One `tick()` advances the machine by exactly one observation,
//! so everything runs on a single thread at whatever cadence the host
//! picks.
//!
//! # Core Concepts
//!
//! - **Action**: Cooperative unit of work, via the [`Action`] trait
//! - **Condition**: Shared boolean probe, sampled once per tick
//! - **Edge**: Transitions dispatch only when a sample goes false to true
//! - **Exit**: An explicit transition target, or any state with no way out
//!
//! # Example
//!
//! ```rust
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! use edgewise::action::idle;
//! use edgewise::{Condition, StateMachine, Target};
//!
//! let button = Rc::new(Cell::new(false));
//! let pressed = Condition::named("button pressed", {
//!     let button = button.clone();
//!     move || button.get()
//! });
//!
//! let mut machine = StateMachine::new("lamp");
//! let off = machine.add_state("off", idle());
//! let on = machine.add_state("on", idle());
//! machine.transition(off).to(on).when(pressed.clone())?;
//! machine.transition(on).to(Target::Exit).when(pressed)?;
//!
//! machine.start()?;
//! machine.tick(); // activates "off"
//! assert_eq!(machine.current_state(), Some(off));
//!
//! button.set(true);
//! machine.tick(); // rising edge, lamp goes on
//! assert_eq!(machine.current_state(), Some(on));
//!
//! button.set(false);
//! machine.tick();
//! button.set(true);
//! machine.tick(); // second rising edge exits
//! assert!(machine.is_finished());
//! # Ok::<(), edgewise::ConfigError>(())
//! ```

pub mod action;
pub mod core;
pub mod engine;
pub mod sched;

// Re-export commonly used types
pub use crate::core::{Condition, Edge, StateId, Target};
pub use action::Action;
pub use engine::{
    ConfigError, Finding, MachineReport, MachineStats, StateMachine, TraceEvent, TraceRecord,
};
pub use sched::{Scheduler, Tag, TaskToken};
