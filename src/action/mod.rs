//! The cooperative action abstraction the engine sequences.
//!
//! An [`Action`] is a long-running task modeled without coroutines: the
//! host calls its hooks, the action never blocks. "Still running" simply
//! means `is_finished` keeps returning `false` across ticks.

mod fns;

pub use fns::{idle, none, run, run_once, FnAction};

/// A cooperative task driven through four lifecycle hooks.
///
/// The hook contract, enforced by whoever drives the action (the
/// [`Scheduler`](crate::Scheduler), or a machine driving the action bound
/// to its active state):
///
/// - `on_start` runs once when the action is activated.
/// - `on_tick` runs once per scheduling period while active and unfinished.
/// - `is_finished` is polled after each tick; the first `true` ends the
///   action naturally.
/// - `on_end(false)` follows a natural finish; `on_end(true)` means the
///   action was cancelled or preempted before finishing.
///
/// Every hook has a default no-op body, so an action implements only what
/// it needs. All hooks must return promptly; blocking stalls the entire
/// tick loop.
///
/// # Example
///
/// ```rust
/// use edgewise::Action;
///
/// struct Countdown {
///     remaining: u32,
/// }
///
/// impl Action for Countdown {
///     fn on_tick(&mut self) {
///         self.remaining = self.remaining.saturating_sub(1);
///     }
///
///     fn is_finished(&self) -> bool {
///         self.remaining == 0
///     }
/// }
///
/// let mut action = Countdown { remaining: 2 };
/// action.on_start();
/// action.on_tick();
/// assert!(!action.is_finished());
/// action.on_tick();
/// assert!(action.is_finished());
/// action.on_end(false);
/// ```
pub trait Action {
    /// Called once when the action becomes active.
    fn on_start(&mut self) {}

    /// Called once per period while the action is active and unfinished.
    fn on_tick(&mut self) {}

    /// Whether the action has finished its work.
    fn is_finished(&self) -> bool {
        false
    }

    /// Called exactly once when the action ends. `interrupted` is `false`
    /// for a natural finish and `true` for cancellation or preemption.
    fn on_end(&mut self, _interrupted: bool) {}
}
