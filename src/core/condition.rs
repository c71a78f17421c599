//! Conditions and edge detection for transition triggering.
//!
//! A [`Condition`] wraps a boolean-valued function. Transitions never react
//! to the level of a condition, only to its rising edge: an [`Edge`] stores
//! the previously sampled value and reports a fire exactly once per
//! false-to-true change.

use std::fmt;
use std::rc::Rc;

/// A shared, identity-comparable boolean condition.
///
/// Conditions are sampled by the engine once per tick while their owning
/// state is active. The wrapped function must be pure: no side effects, no
/// panics, and it must not re-enter the machine that polls it.
///
/// Cloning a `Condition` is cheap and preserves identity: a clone counts as
/// the *same* condition when the engine rejects duplicate registrations on
/// one state. Two conditions built from identical closures are still
/// distinct.
///
/// # Example
///
/// ```rust
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// use edgewise::Condition;
///
/// let pressed = Rc::new(Cell::new(false));
/// let cond = Condition::new({
///     let pressed = pressed.clone();
///     move || pressed.get()
/// });
///
/// assert!(!cond.sample());
/// pressed.set(true);
/// assert!(cond.sample());
/// ```
#[derive(Clone)]
pub struct Condition {
    predicate: Rc<dyn Fn() -> bool>,
    label: Option<Rc<str>>,
}

impl Condition {
    /// Create an unlabeled condition from a pure boolean function.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn() -> bool + 'static,
    {
        Condition {
            predicate: Rc::new(predicate),
            label: None,
        }
    }

    /// Create a condition with a label used by diagnostics and log output.
    ///
    /// # Example
    ///
    /// ```rust
    /// use edgewise::Condition;
    ///
    /// let cond = Condition::named("intake loaded", || true);
    /// assert_eq!(cond.label(), Some("intake loaded"));
    /// ```
    pub fn named<F>(label: impl Into<String>, predicate: F) -> Self
    where
        F: Fn() -> bool + 'static,
    {
        Condition {
            predicate: Rc::new(predicate),
            label: Some(Rc::from(label.into())),
        }
    }

    /// Sample the current value of the condition.
    pub fn sample(&self) -> bool {
        (self.predicate)()
    }

    /// The diagnostic label, if one was given.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Whether `self` and `other` are the same condition object.
    ///
    /// Identity follows the shared allocation, so clones compare equal and
    /// separately constructed conditions never do.
    pub fn same_as(&self, other: &Condition) -> bool {
        Rc::ptr_eq(&self.predicate, &other.predicate)
    }
}

impl fmt::Debug for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.label {
            Some(label) => write!(f, "Condition({:?})", label),
            None => write!(f, "Condition(<fn>)"),
        }
    }
}

/// Rising-edge detector over successive boolean samples.
///
/// The detector holds the last observed value and fires only when a sample
/// is `true` after a `false`. Seeding controls the very first comparison:
/// an edge seeded `true` stays quiet while its input remains true, which is
/// how the engine keeps a condition that is already satisfied on state
/// entry from firing immediately.
///
/// # Example
///
/// ```rust
/// use edgewise::Edge;
///
/// let mut edge = Edge::seeded(false);
/// assert!(!edge.observe(false));
/// assert!(edge.observe(true)); // rising edge fires once
/// assert!(!edge.observe(true)); // steady true stays quiet
/// assert!(!edge.observe(false));
/// assert!(edge.observe(true)); // fires again after a reset
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    previous: bool,
}

impl Edge {
    /// Create a detector whose first comparison is against `previous`.
    pub fn seeded(previous: bool) -> Self {
        Edge { previous }
    }

    /// Feed the next sample, returning whether a rising edge occurred.
    pub fn observe(&mut self, sample: bool) -> bool {
        let fired = sample && !self.previous;
        self.previous = sample;
        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn condition_samples_the_wrapped_function() {
        let value = Rc::new(Cell::new(false));
        let cond = Condition::new({
            let value = value.clone();
            move || value.get()
        });

        assert!(!cond.sample());
        value.set(true);
        assert!(cond.sample());
    }

    #[test]
    fn clones_share_identity() {
        let cond = Condition::new(|| true);
        let copy = cond.clone();

        assert!(cond.same_as(&copy));
    }

    #[test]
    fn distinct_conditions_differ_even_with_equal_behavior() {
        let a = Condition::new(|| true);
        let b = Condition::new(|| true);

        assert!(!a.same_as(&b));
    }

    #[test]
    fn label_is_preserved() {
        let cond = Condition::named("target visible", || false);

        assert_eq!(cond.label(), Some("target visible"));
        assert_eq!(Condition::new(|| false).label(), None);
    }

    #[test]
    fn edge_fires_only_on_rising_samples() {
        let mut edge = Edge::seeded(false);

        assert!(!edge.observe(false));
        assert!(edge.observe(true));
        assert!(!edge.observe(true));
        assert!(!edge.observe(false));
        assert!(edge.observe(true));
    }

    #[test]
    fn edge_seeded_true_waits_for_a_full_cycle() {
        let mut edge = Edge::seeded(true);

        assert!(!edge.observe(true));
        assert!(!edge.observe(false));
        assert!(edge.observe(true));
    }
}
