//! Traffic Light Sequencer
//!
//! This example demonstrates a cyclic machine of timed phases.
//!
//! Key concepts:
//! - Completion transitions chain timed phases into a cycle
//! - A labeled condition exits the cycle after three rounds
//! - The diagnostic report describes the configured graph
//!
//! Run with: cargo run --example traffic_light

use std::cell::Cell;
use std::rc::Rc;

use edgewise::action::FnAction;
use edgewise::{Condition, StateMachine, Target};

/// A light phase lasting a fixed number of ticks, running `on_enter` each
/// time it lights up.
fn timed(name: &'static str, ticks: u32, mut on_enter: impl FnMut() + 'static) -> FnAction {
    let elapsed = Rc::new(Cell::new(0u32));
    FnAction::new()
        .start_with({
            let elapsed = elapsed.clone();
            move || {
                elapsed.set(0);
                on_enter();
                println!("  {name} on");
            }
        })
        .tick_with({
            let elapsed = elapsed.clone();
            move || elapsed.set(elapsed.get() + 1)
        })
        .finished_when(move || elapsed.get() >= ticks)
}

fn phase(name: &'static str, ticks: u32) -> FnAction {
    timed(name, ticks, || {})
}

fn main() {
    println!("=== Traffic Light Sequencer ===\n");

    let cycles = Rc::new(Cell::new(0u32));

    let mut machine = StateMachine::new("traffic-light");
    let green = machine.add_state(
        "green",
        timed("green", 4, {
            let cycles = cycles.clone();
            move || cycles.set(cycles.get() + 1)
        }),
    );
    let yellow = machine.add_state("yellow", phase("yellow", 1));
    let red = machine.add_state("red", phase("red", 3));

    let shown = Condition::named("three cycles shown", {
        let cycles = cycles.clone();
        move || cycles.get() > 3
    });
    machine.transition(green).to(Target::Exit).when(shown).unwrap();
    machine.transition(green).to(yellow).on_completion().unwrap();
    machine.transition(yellow).to(red).on_completion().unwrap();
    machine.transition(red).to(green).on_completion().unwrap();

    println!("{}", machine.describe());
    println!("light sequence:");

    machine.start().unwrap();
    while !machine.is_finished() {
        machine.tick();
    }

    let stats = machine.stats();
    println!(
        "\nran {} ticks, dispatched {} transitions",
        stats.ticks, stats.dispatches
    );
    println!("\n=== Example Complete ===");
}
