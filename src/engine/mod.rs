//! The engine: machine lifecycle, transition registration, structural
//! reports, and run-time telemetry.
//!
//! [`StateMachine`] is the center of the crate. The sibling modules split
//! its responsibilities: `activation` covers entering and leaving states,
//! `builder` covers the fluent registration API, `report` covers the
//! structural snapshot, and `trace` covers counters and the lifecycle
//! trace.

mod activation;
mod builder;
mod error;
mod machine;
mod report;
mod trace;

pub use builder::{TransitionBuilder, TriggerBuilder};
pub use error::ConfigError;
pub use machine::StateMachine;
pub use report::{EdgeTarget, Finding, MachineReport, StateReport, TransitionReport};
pub use trace::{MachineStats, TraceEvent, TraceRecord};
