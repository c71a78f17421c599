//! Integration exercise: a light bar scanner sweeping back and forth.
//!
//! Two states share one light bar. Each sweep action walks the lit index
//! one step per tick and finishes at its end of the bar; completion
//! transitions bounce the sweep direction, and a labeled condition exits
//! the machine after three full cycles.

use std::cell::RefCell;
use std::rc::Rc;

use edgewise::{Action, Condition, StateMachine, Target};

const BAR_WIDTH: usize = 8;

struct Bar {
    lit: usize,
    cycles: u32,
    frames: Vec<usize>,
}

impl Bar {
    fn new() -> Rc<RefCell<Bar>> {
        Rc::new(RefCell::new(Bar {
            lit: 0,
            cycles: 0,
            frames: Vec::new(),
        }))
    }
}

struct Sweep {
    bar: Rc<RefCell<Bar>>,
    step: isize,
    stop_at: usize,
    counts_cycles: bool,
}

impl Action for Sweep {
    fn on_start(&mut self) {
        if self.counts_cycles {
            self.bar.borrow_mut().cycles += 1;
        }
    }

    fn on_tick(&mut self) {
        let mut bar = self.bar.borrow_mut();
        bar.lit = (bar.lit as isize + self.step) as usize;
        let lit = bar.lit;
        bar.frames.push(lit);
    }

    fn is_finished(&self) -> bool {
        self.bar.borrow().lit == self.stop_at
    }
}

fn build_scanner(bar: &Rc<RefCell<Bar>>) -> StateMachine {
    let mut machine = StateMachine::new("scanner");
    let right = machine.add_state(
        "sweep right",
        Sweep {
            bar: bar.clone(),
            step: 1,
            stop_at: BAR_WIDTH - 1,
            counts_cycles: true,
        },
    );
    let left = machine.add_state(
        "sweep left",
        Sweep {
            bar: bar.clone(),
            step: -1,
            stop_at: 0,
            counts_cycles: false,
        },
    );

    let swept = Condition::named("bar swept three times", {
        let bar = bar.clone();
        move || bar.borrow().cycles > 3
    });
    machine
        .transition(right)
        .to(Target::Exit)
        .when(swept)
        .unwrap();
    machine.transition(right).to(left).on_completion().unwrap();
    machine.transition(left).to(right).on_completion().unwrap();
    machine
}

#[test]
fn the_scanner_sweeps_three_full_cycles_then_exits() {
    let bar = Bar::new();
    let mut machine = build_scanner(&bar);

    machine.start().unwrap();
    let mut ticks = 0;
    while !machine.is_finished() && ticks < 200 {
        machine.tick();
        ticks += 1;
    }

    assert!(machine.is_finished());
    // 16 ticks per out-and-back cycle, then the fourth right entry and the
    // exit dispatch.
    assert_eq!(ticks, 50);
    assert_eq!(machine.stats().dispatches, 7);

    let mut expected = Vec::new();
    for _ in 0..3 {
        expected.extend(1..BAR_WIDTH);
        expected.extend((0..BAR_WIDTH - 1).rev());
    }
    assert_eq!(bar.borrow().frames, expected);
    assert_eq!(bar.borrow().cycles, 4);
    assert_eq!(bar.borrow().lit, 0);
}

#[test]
fn the_scanner_report_documents_the_graph() {
    let bar = Bar::new();
    let machine = build_scanner(&bar);

    let report = machine.describe();
    assert!(report.findings.is_empty());

    let rendered = report.to_string();
    assert!(rendered.contains("machine \"scanner\": 2 states"));
    assert!(rendered.contains("sweep right (initial)"));
    assert!(rendered.contains("when \"bar swept three times\" -> exit"));
    assert!(rendered.contains("on completion -> sweep left"));
    assert!(rendered.contains("on completion -> sweep right"));
}
