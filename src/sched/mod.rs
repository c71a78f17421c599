//! A cooperative, single-threaded task scheduler.
//!
//! The scheduler is a host for anything implementing [`Action`], state
//! machines included. One [`run`](Scheduler::run) call is one scheduling
//! period: every running task is ticked once in schedule order, tasks
//! that report finished are ended, and tasks scheduled for deferred start
//! are launched at the very end of the period so their first tick lands
//! in the next one.
//!
//! Tasks may carry [`Tag`]s. Launching a tagged task preempts every
//! running task sharing one of its tags, ending them through their end
//! hook with `interrupted = true`. Tags model mutually exclusive use of
//! something the tasks do not know about each other, like two behaviors
//! steering the same motor.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::action::Action;

/// Label marking tasks that must not run at the same time.
///
/// # Example
///
/// ```rust
/// use std::cell::RefCell;
/// use std::rc::Rc;
/// use edgewise::action::idle;
/// use edgewise::{Scheduler, Tag};
///
/// let mut sched = Scheduler::new();
/// let motor = Tag::new("motor");
/// sched.schedule_tagged(Rc::new(RefCell::new(idle())), [motor.clone()]);
/// sched.schedule_tagged(Rc::new(RefCell::new(idle())), [motor]);
///
/// // The second task preempted the first.
/// assert_eq!(sched.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tag(String);

impl Tag {
    pub fn new(name: impl Into<String>) -> Self {
        Tag(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Handle identifying a scheduled task, for cancellation and queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskToken(u64);

struct Task {
    token: TaskToken,
    tags: Vec<Tag>,
    action: Rc<RefCell<dyn Action>>,
}

/// Runs [`Action`]s cooperatively, one tick per task per period.
///
/// # Example
///
/// ```rust
/// use std::cell::RefCell;
/// use std::rc::Rc;
/// use edgewise::action::run_once;
/// use edgewise::Scheduler;
///
/// let mut sched = Scheduler::new();
/// let greeted = Rc::new(RefCell::new(false));
/// let task = {
///     let greeted = greeted.clone();
///     run_once(move || *greeted.borrow_mut() = true)
/// };
/// sched.schedule(Rc::new(RefCell::new(task)));
///
/// sched.run();
/// assert!(*greeted.borrow());
/// assert!(sched.is_empty());
/// ```
#[derive(Default)]
pub struct Scheduler {
    running: Vec<Task>,
    deferred: Vec<Task>,
    next_token: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Scheduler::default()
    }

    /// Schedule a task and start it immediately.
    pub fn schedule(&mut self, action: Rc<RefCell<dyn Action>>) -> TaskToken {
        self.schedule_tagged(action, std::iter::empty())
    }

    /// Schedule a tagged task, preempting running tasks that share one of
    /// its tags, and start it immediately.
    pub fn schedule_tagged(
        &mut self,
        action: Rc<RefCell<dyn Action>>,
        tags: impl IntoIterator<Item = Tag>,
    ) -> TaskToken {
        let task = self.new_task(action, tags);
        let token = task.token;
        self.launch(task);
        token
    }

    /// Schedule a task whose start is deferred to the end of the current
    /// (or next) [`run`](Self::run).
    pub fn schedule_deferred(&mut self, action: Rc<RefCell<dyn Action>>) -> TaskToken {
        self.schedule_deferred_tagged(action, std::iter::empty())
    }

    /// Deferred variant of [`schedule_tagged`](Self::schedule_tagged);
    /// preemption happens when the task is launched, not when it is
    /// scheduled.
    pub fn schedule_deferred_tagged(
        &mut self,
        action: Rc<RefCell<dyn Action>>,
        tags: impl IntoIterator<Item = Tag>,
    ) -> TaskToken {
        let task = self.new_task(action, tags);
        let token = task.token;
        self.deferred.push(task);
        token
    }

    fn new_task(
        &mut self,
        action: Rc<RefCell<dyn Action>>,
        tags: impl IntoIterator<Item = Tag>,
    ) -> Task {
        let token = TaskToken(self.next_token);
        self.next_token += 1;
        Task {
            token,
            tags: tags.into_iter().collect(),
            action,
        }
    }

    fn launch(&mut self, task: Task) {
        if !task.tags.is_empty() {
            self.preempt(&task.tags);
        }
        task.action.borrow_mut().on_start();
        self.running.push(task);
    }

    fn preempt(&mut self, tags: &[Tag]) {
        let mut index = 0;
        while index < self.running.len() {
            let clash = self.running[index].tags.iter().any(|tag| tags.contains(tag));
            if clash {
                let task = self.running.remove(index);
                tracing::debug!("task #{} preempted over {:?}", task.token.0, task.tags);
                task.action.borrow_mut().on_end(true);
            } else {
                index += 1;
            }
        }
    }

    /// Run one scheduling period.
    ///
    /// Every running task is ticked once in schedule order; a task
    /// reporting finished right after its tick is ended with
    /// `interrupted = false` and removed. Deferred tasks are launched
    /// after the sweep, so their first tick falls in the next period.
    pub fn run(&mut self) {
        let mut index = 0;
        while index < self.running.len() {
            self.running[index].action.borrow_mut().on_tick();
            let finished = self.running[index].action.borrow().is_finished();
            if finished {
                let task = self.running.remove(index);
                tracing::debug!("task #{} finished", task.token.0);
                task.action.borrow_mut().on_end(false);
            } else {
                index += 1;
            }
        }
        let deferred = std::mem::take(&mut self.deferred);
        for task in deferred {
            self.launch(task);
        }
    }

    /// Run `periods` scheduling periods back to back.
    pub fn run_for(&mut self, periods: usize) {
        for _ in 0..periods {
            self.run();
        }
    }

    /// Cancel a task.
    ///
    /// A running task is ended through its end hook with
    /// `interrupted = true`. A deferred task is dropped without any hook,
    /// since its start hook never ran. Returns whether the token matched
    /// anything.
    pub fn cancel(&mut self, token: TaskToken) -> bool {
        if let Some(position) = self.running.iter().position(|t| t.token == token) {
            let task = self.running.remove(position);
            task.action.borrow_mut().on_end(true);
            return true;
        }
        if let Some(position) = self.deferred.iter().position(|t| t.token == token) {
            self.deferred.remove(position);
            return true;
        }
        false
    }

    /// Cancel every task; running tasks are ended interrupted.
    pub fn cancel_all(&mut self) {
        for task in self.running.drain(..) {
            task.action.borrow_mut().on_end(true);
        }
        self.deferred.clear();
    }

    /// Whether `token` refers to a task still known to the scheduler.
    pub fn is_scheduled(&self, token: TaskToken) -> bool {
        self.running.iter().any(|t| t.token == token)
            || self.deferred.iter().any(|t| t.token == token)
    }

    /// Number of tasks, running and deferred.
    pub fn len(&self) -> usize {
        self.running.len() + self.deferred.len()
    }

    pub fn is_empty(&self) -> bool {
        self.running.is_empty() && self.deferred.is_empty()
    }
}

impl fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scheduler")
            .field("running", &self.running.len())
            .field("deferred", &self.deferred.len())
            .finish()
    }
}
