//! Cooperative Scheduling
//!
//! This example demonstrates machines and plain actions sharing one
//! scheduler.
//!
//! Key concepts:
//! - A machine is an action, so the scheduler hosts both alike
//! - Finished tasks retire with an uninterrupted end hook
//! - Scheduling under a held tag preempts the holder
//!
//! Run with: cargo run --example scheduled_tasks

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use edgewise::action::{run, FnAction};
use edgewise::{Scheduler, StateMachine, Tag};

/// A chore that takes a fixed number of ticks, then completes.
fn chore(name: &'static str, ticks: u32) -> FnAction {
    let elapsed = Rc::new(Cell::new(0u32));
    FnAction::new()
        .start_with(move || println!("  [{name}] started"))
        .tick_with({
            let elapsed = elapsed.clone();
            move || elapsed.set(elapsed.get() + 1)
        })
        .finished_when({
            let elapsed = elapsed.clone();
            move || elapsed.get() >= ticks
        })
        .end_with(move |interrupted| {
            if interrupted {
                println!("  [{name}] dropped");
            } else {
                println!("  [{name}] done");
            }
        })
}

/// An open-ended watcher that only reports being displaced.
fn watcher(name: &'static str) -> FnAction {
    FnAction::new()
        .start_with(move || println!("  [{name}] watching"))
        .end_with(move |_| println!("  [{name}] stood down"))
}

fn main() {
    println!("=== Cooperative Scheduling ===\n");

    let mut sched = Scheduler::new();

    // A machine sequencing two chores, hosted like any other task.
    let mut machine = StateMachine::new("chores");
    let sweep = machine.add_state("sweep", chore("sweep", 2));
    let mop = machine.add_state("mop", chore("mop", 2));
    machine.transition(sweep).to(mop).on_completion().unwrap();
    sched.schedule(Rc::new(RefCell::new(machine)));

    // A plain periodic task sharing the same scheduler.
    sched.schedule(Rc::new(RefCell::new(run(|| {
        println!("  [heartbeat] tick");
    }))));

    println!("running 8 periods:");
    sched.run_for(8);

    // A newcomer scheduled under a held tag cancels the holder.
    println!("\ntwo watchers contend for one camera:");
    let camera = Tag::new("camera");
    sched.schedule_tagged(
        Rc::new(RefCell::new(watcher("wide-angle"))),
        [camera.clone()],
    );
    sched.schedule_tagged(Rc::new(RefCell::new(watcher("zoom"))), [camera]);
    sched.run_for(2);

    sched.cancel_all();
    println!("\nall tasks cancelled; {} remain", sched.len());
    println!("\n=== Example Complete ===");
}
