//! Patrol and Chase
//!
//! This example demonstrates edge-triggered transitions interrupting a
//! running action.
//!
//! Key concepts:
//! - Conditions are edges: they fire on the change, not the level
//! - A dispatched transition interrupts the running action
//! - One condition can guard transitions from several states
//! - A state with no outgoing transitions ends the machine
//!
//! Run with: cargo run --example patrol_bot

use std::cell::Cell;
use std::rc::Rc;

use edgewise::action::FnAction;
use edgewise::{Condition, StateMachine};

/// An open-ended behavior that reports how it starts and how it ends.
fn reporting(name: &'static str) -> FnAction {
    FnAction::new()
        .start_with(move || println!("  [{name}] engaged"))
        .end_with(move |interrupted| {
            if interrupted {
                println!("  [{name}] interrupted");
            } else {
                println!("  [{name}] finished");
            }
        })
}

/// Docking takes two ticks and then completes on its own.
fn docking() -> FnAction {
    let elapsed = Rc::new(Cell::new(0u32));
    FnAction::new()
        .start_with(move || println!("  [dock] approaching the charger"))
        .tick_with({
            let elapsed = elapsed.clone();
            move || elapsed.set(elapsed.get() + 1)
        })
        .finished_when(move || elapsed.get() >= 2)
        .end_with(|_| println!("  [dock] charging"))
}

fn main() {
    println!("=== Patrol and Chase ===\n");

    let target_visible = Rc::new(Cell::new(false));
    let battery_low = Rc::new(Cell::new(false));

    let spotted = Condition::named("target spotted", {
        let visible = target_visible.clone();
        move || visible.get()
    });
    let lost = Condition::named("target lost", {
        let visible = target_visible.clone();
        move || !visible.get()
    });
    let drained = Condition::named("battery low", {
        let battery = battery_low.clone();
        move || battery.get()
    });

    let mut machine = StateMachine::new("patrol-bot");
    let patrol = machine.add_state("patrol", reporting("patrol"));
    let chase = machine.add_state("chase", reporting("chase"));
    let dock = machine.add_state("dock", docking());

    machine.transition(patrol).to(dock).when(drained.clone()).unwrap();
    machine.transition(patrol).to(chase).when(spotted).unwrap();
    machine.transition(chase).to(dock).when(drained).unwrap();
    machine.transition(chase).to(patrol).when(lost).unwrap();

    machine.start().unwrap();
    machine.tick();

    println!("\ntarget appears:");
    target_visible.set(true);
    machine.tick();

    println!("\ntarget slips away:");
    target_visible.set(false);
    machine.tick();

    println!("\nbattery runs down:");
    battery_low.set(true);
    machine.tick();
    while !machine.is_finished() {
        machine.tick();
    }

    println!("\n{}", machine.describe());
    println!("=== Example Complete ===");
}
