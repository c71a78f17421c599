//! Closure-backed actions for tests, demos, and simple states.

use std::fmt;

use super::Action;

/// An [`Action`] assembled from closures, one per hook.
///
/// Hooks left unset keep their default behavior; in particular an
/// `FnAction` without a `finished_when` predicate never finishes on its
/// own and runs until interrupted.
///
/// # Example
///
/// ```rust
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// use edgewise::action::FnAction;
/// use edgewise::Action;
///
/// let ticks = Rc::new(Cell::new(0u32));
/// let mut blink = FnAction::new()
///     .tick_with({
///         let ticks = ticks.clone();
///         move || ticks.set(ticks.get() + 1)
///     })
///     .finished_when({
///         let ticks = ticks.clone();
///         move || ticks.get() >= 3
///     });
///
/// blink.on_start();
/// while !blink.is_finished() {
///     blink.on_tick();
/// }
/// blink.on_end(false);
///
/// assert_eq!(ticks.get(), 3);
/// ```
pub struct FnAction {
    start: Option<Box<dyn FnMut()>>,
    tick: Option<Box<dyn FnMut()>>,
    finished: Option<Box<dyn Fn() -> bool>>,
    end: Option<Box<dyn FnMut(bool)>>,
}

impl FnAction {
    /// An action with every hook unset.
    pub fn new() -> Self {
        FnAction {
            start: None,
            tick: None,
            finished: None,
            end: None,
        }
    }

    /// Run `f` once when the action starts.
    pub fn start_with(mut self, f: impl FnMut() + 'static) -> Self {
        self.start = Some(Box::new(f));
        self
    }

    /// Run `f` on every tick while active.
    pub fn tick_with(mut self, f: impl FnMut() + 'static) -> Self {
        self.tick = Some(Box::new(f));
        self
    }

    /// Finish naturally once `f` returns `true`.
    pub fn finished_when(mut self, f: impl Fn() -> bool + 'static) -> Self {
        self.finished = Some(Box::new(f));
        self
    }

    /// Run `f` when the action ends; the argument is the `interrupted` flag.
    pub fn end_with(mut self, f: impl FnMut(bool) + 'static) -> Self {
        self.end = Some(Box::new(f));
        self
    }
}

impl Default for FnAction {
    fn default() -> Self {
        Self::new()
    }
}

impl Action for FnAction {
    fn on_start(&mut self) {
        if let Some(f) = &mut self.start {
            f();
        }
    }

    fn on_tick(&mut self) {
        if let Some(f) = &mut self.tick {
            f();
        }
    }

    fn is_finished(&self) -> bool {
        match &self.finished {
            Some(f) => f(),
            None => false,
        }
    }

    fn on_end(&mut self, interrupted: bool) {
        if let Some(f) = &mut self.end {
            f(interrupted);
        }
    }
}

impl fmt::Debug for FnAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnAction")
            .field("start", &self.start.is_some())
            .field("tick", &self.tick.is_some())
            .field("finished", &self.finished.is_some())
            .field("end", &self.end.is_some())
            .finish()
    }
}

/// Run `f` once at start, then finish immediately.
pub fn run_once(f: impl FnMut() + 'static) -> FnAction {
    FnAction::new().start_with(f).finished_when(|| true)
}

/// Run `f` every tick, never finishing on its own.
pub fn run(f: impl FnMut() + 'static) -> FnAction {
    FnAction::new().tick_with(f)
}

/// Do nothing, never finishing on its own.
pub fn idle() -> FnAction {
    FnAction::new()
}

/// Do nothing and finish immediately.
pub fn none() -> FnAction {
    FnAction::new().finished_when(|| true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    #[test]
    fn hooks_run_in_lifecycle_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let push = |log: &Rc<RefCell<Vec<String>>>, entry: &str| {
            log.borrow_mut().push(entry.to_string());
        };

        let mut action = FnAction::new()
            .start_with({
                let log = log.clone();
                move || push(&log, "start")
            })
            .tick_with({
                let log = log.clone();
                move || push(&log, "tick")
            })
            .end_with({
                let log = log.clone();
                move |interrupted| push(&log, if interrupted { "end(true)" } else { "end(false)" })
            });

        action.on_start();
        action.on_tick();
        action.on_tick();
        action.on_end(false);

        assert_eq!(
            log.borrow().as_slice(),
            ["start", "tick", "tick", "end(false)"]
        );
    }

    #[test]
    fn run_once_finishes_immediately() {
        let fired = Rc::new(Cell::new(false));
        let mut action = run_once({
            let fired = fired.clone();
            move || fired.set(true)
        });

        action.on_start();
        assert!(fired.get());
        assert!(action.is_finished());
    }

    #[test]
    fn run_never_finishes() {
        let count = Rc::new(Cell::new(0u32));
        let mut action = run({
            let count = count.clone();
            move || count.set(count.get() + 1)
        });

        action.on_start();
        for _ in 0..5 {
            action.on_tick();
        }

        assert_eq!(count.get(), 5);
        assert!(!action.is_finished());
    }

    #[test]
    fn idle_and_none_differ_only_in_finishing() {
        assert!(!idle().is_finished());
        assert!(none().is_finished());
    }
}
