//! End-to-end lifecycle tests driving machines tick by tick, standalone
//! and under the scheduler.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use edgewise::action::FnAction;
use edgewise::{Condition, Scheduler, StateMachine, Target, TraceEvent};

type Log = Rc<RefCell<Vec<String>>>;

fn new_log() -> Log {
    Rc::new(RefCell::new(Vec::new()))
}

/// Honors `RUST_LOG` when the suite is run by hand; repeat calls are fine.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn flag() -> (Rc<Cell<bool>>, Condition) {
    let cell = Rc::new(Cell::new(false));
    let condition = Condition::new({
        let cell = cell.clone();
        move || cell.get()
    });
    (cell, condition)
}

/// Action logging every hook; finishes after `finish_after` ticks if given,
/// otherwise runs until interrupted.
fn scripted(log: &Log, tag: &str, finish_after: Option<u32>) -> FnAction {
    let tag = tag.to_string();
    let ticks = Rc::new(Cell::new(0u32));
    let mut action = FnAction::new()
        .start_with({
            let log = log.clone();
            let tag = tag.clone();
            move || log.borrow_mut().push(format!("{tag}:start"))
        })
        .tick_with({
            let log = log.clone();
            let tag = tag.clone();
            let ticks = ticks.clone();
            move || {
                ticks.set(ticks.get() + 1);
                log.borrow_mut().push(format!("{tag}:tick"));
            }
        })
        .end_with({
            let log = log.clone();
            move |interrupted| log.borrow_mut().push(format!("{tag}:end({interrupted})"))
        });
    if let Some(after) = finish_after {
        action = action.finished_when(move || ticks.get() >= after);
    }
    action
}

#[test]
fn a_single_finishing_state_runs_and_exits() {
    let log = new_log();
    let mut machine = StateMachine::new("solo");
    let p = machine.add_state("p", scripted(&log, "p", Some(1)));

    machine.start().unwrap();
    assert_eq!(machine.active_state(), None);

    machine.tick(); // tick 1: deferred entry
    assert_eq!(machine.active_state(), Some(p));
    assert_eq!(log.borrow().as_slice(), ["p:start"]);

    machine.tick(); // tick 2: first drive tick; finishes; dead end exits
    assert!(machine.is_finished());
    assert_eq!(
        log.borrow().as_slice(),
        ["p:start", "p:tick", "p:end(false)"]
    );
    assert!(machine
        .trace()
        .any(|r| matches!(&r.event, TraceEvent::ExitRequested { dead_end: true, .. })));
}

#[test]
fn completion_forward_and_condition_back() {
    let log = new_log();
    let mut machine = StateMachine::new("round-trip");
    let a = machine.add_state("a", scripted(&log, "a", Some(2)));
    let b = machine.add_state("b", scripted(&log, "b", None));
    machine.transition(a).to(b).on_completion().unwrap();
    let (back, condition) = flag();
    machine.transition(b).to(a).when(condition).unwrap();

    machine.start().unwrap();
    machine.tick(); // 1: enter a
    machine.tick(); // 2: a ticks
    machine.tick(); // 3: a ticks again and finishes
    assert_eq!(machine.active_state(), None);
    assert_eq!(machine.current_state(), Some(a));

    machine.tick(); // 4: completion edge dispatches to b
    assert_eq!(machine.current_state(), Some(b));
    assert_eq!(machine.active_state(), Some(b));

    for _ in 5..=10 {
        machine.tick(); // b keeps running
    }
    assert_eq!(machine.current_state(), Some(b));

    back.set(true);
    machine.tick(); // 11: rising edge sends the machine back to a
    assert_eq!(machine.current_state(), Some(a));
    assert_eq!(machine.stats().ticks, 11);

    assert_eq!(
        log.borrow().as_slice(),
        [
            "a:start",
            "a:tick",
            "a:tick",
            "a:end(false)",
            "b:start",
            "b:tick",
            "b:tick",
            "b:tick",
            "b:tick",
            "b:tick",
            "b:tick",
            "b:end(true)",
            "a:start",
        ]
    );
}

#[test]
fn simultaneous_fires_dispatch_the_first_registered() {
    let log = new_log();
    let cell = Rc::new(Cell::new(false));
    let watch = |cell: &Rc<Cell<bool>>| {
        let cell = cell.clone();
        Condition::new(move || cell.get())
    };

    let mut machine = StateMachine::new("contended");
    let hub = machine.add_state("hub", scripted(&log, "hub", None));
    let first = machine.add_state("first", scripted(&log, "first", None));
    let second = machine.add_state("second", scripted(&log, "second", None));
    machine.transition(hub).to(first).when(watch(&cell)).unwrap();
    machine.transition(hub).to(second).when(watch(&cell)).unwrap();
    machine.transition(hub).to(Target::Exit).when(watch(&cell)).unwrap();

    machine.start().unwrap();
    machine.tick();
    cell.set(true);
    machine.tick();

    assert_eq!(machine.current_state(), Some(first));
    assert!(!machine.is_finished());
    assert_eq!(machine.stats().ambiguous_ticks, 1);
    assert_eq!(
        log.borrow().as_slice(),
        ["hub:start", "hub:end(true)", "first:start"]
    );
}

#[test]
fn duplicate_conditions_are_rejected_and_leave_the_machine_usable() {
    let mut machine = StateMachine::new("careful");
    let a = machine.add_state("a", FnAction::new());
    let b = machine.add_state("b", FnAction::new());
    let (go, shared) = flag();

    machine.transition(a).to(b).when(shared.clone()).unwrap();
    assert!(machine
        .transition(a)
        .to(Target::Exit)
        .when(shared.clone())
        .is_err());

    machine.start().unwrap();
    machine.tick();
    go.set(true);
    machine.tick();

    assert_eq!(machine.current_state(), Some(b));
}

#[test]
fn a_scheduled_machine_is_retired_cleanly_after_its_exit() {
    init_tracing();
    let mut machine = StateMachine::new("payload");
    let work = machine.add_state("work", FnAction::new().finished_when(|| true));
    machine.transition(work).to(Target::Exit).on_completion().unwrap();

    let machine = Rc::new(RefCell::new(machine));
    let mut sched = Scheduler::new();
    sched.schedule(machine.clone());
    sched.run_for(5);

    assert!(sched.is_empty());
    let machine = machine.borrow();
    let events: Vec<TraceEvent> = machine.trace().map(|r| r.event.clone()).collect();
    assert_eq!(
        events,
        vec![
            TraceEvent::Started,
            TraceEvent::Entered {
                state: "work".to_string()
            },
            TraceEvent::Completed {
                state: "work".to_string()
            },
            TraceEvent::ExitRequested {
                state: "work".to_string(),
                dead_end: false
            },
            TraceEvent::Stopped { interrupted: false },
        ]
    );
}

#[test]
fn cancelling_the_host_task_interrupts_the_active_action() {
    init_tracing();
    let log = new_log();
    let mut machine = StateMachine::new("cancelled");
    machine.add_state("busy", scripted(&log, "busy", None));

    let machine = Rc::new(RefCell::new(machine));
    let mut sched = Scheduler::new();
    let token = sched.schedule(machine.clone());
    sched.run_for(2);
    assert!(sched.cancel(token));

    assert_eq!(
        log.borrow().as_slice(),
        ["busy:start", "busy:tick", "busy:end(true)"]
    );
    assert!(machine
        .borrow()
        .trace()
        .any(|r| r.event == TraceEvent::Stopped { interrupted: true }));
}

#[test]
fn a_machine_can_serve_as_a_state_action() {
    let log = new_log();

    let mut inner = StateMachine::new("inner");
    let x = inner.add_state("x", scripted(&log, "x", Some(1)));
    let y = inner.add_state("y", scripted(&log, "y", Some(1)));
    inner.transition(x).to(y).on_completion().unwrap();

    let mut outer = StateMachine::new("outer");
    let delegating = outer.add_state("delegating", inner);
    let done = outer.add_state("done", scripted(&log, "done", Some(1)));
    outer.transition(delegating).to(done).on_completion().unwrap();

    outer.start().unwrap();
    for _ in 0..7 {
        outer.tick();
    }

    assert!(outer.is_finished());
    assert_eq!(outer.current_state(), Some(done));
    assert_eq!(
        log.borrow().as_slice(),
        [
            "x:start",
            "x:tick",
            "x:end(false)",
            "y:start",
            "y:tick",
            "y:end(false)",
            "done:start",
            "done:tick",
            "done:end(false)",
        ]
    );
}

#[test]
fn a_stateless_machine_scheduled_as_a_task_retires_immediately() {
    let machine: Rc<RefCell<StateMachine>> =
        Rc::new(RefCell::new(StateMachine::new("hollow")));
    let mut sched = Scheduler::new();
    sched.schedule(machine.clone());

    // start() failed inside the start hook, so the first sweep retires it.
    sched.run();

    assert!(sched.is_empty());
    assert!(machine.borrow().is_finished());
}
