//! Violation Forensics
//!
//! This example trips the fail-safe with a monitor double, shows the
//! forensic record that was committed to (fake) non-volatile storage, and
//! finally runs the destructive reset procedure.
//!
//! Key concepts:
//! - The ordered fault sequence: fault display, commit, monitoring stops
//! - The persisted record rendered as a fixed-width hex dump
//! - Erase via the physical reset line
//!
//! Run with: cargo run --example violation_forensics

use ampel::core::PropVector;
use ampel::diag::BufferPort;
use ampel::forensics::ForensicsStore;
use ampel::monitor::{SafetyMonitor, Verdict};
use ampel::runtime::{ControlLoop, LoopStep};
use ampel::storage::{MemoryRegion, REGION_LEN};

/// Flags the fifth control tick, standing in for a generated temporal
/// monitor observing a condition the healthy controller cannot produce.
struct TripOnFifth {
    calls: u32,
}

impl SafetyMonitor for TripOnFifth {
    fn check(&mut self, _props: PropVector) -> Verdict {
        self.calls += 1;
        if self.calls >= 5 {
            Verdict::Violation
        } else {
            Verdict::Pass
        }
    }
}

fn main() {
    println!("=== Violation Forensics ===\n");

    let forensics = ForensicsStore::new(MemoryRegion::new(REGION_LEN)).unwrap();
    let mut control = ControlLoop::new(
        0,
        TripOnFifth { calls: 0 },
        forensics,
        (),
        (),
        BufferPort::new(),
    )
    .unwrap();

    let mut now = 0u64;
    let tripped_at = loop {
        now += 50;
        match control.poll(now).unwrap() {
            LoopStep::Evaluated { tick, .. } => println!("tick {:>2}: pass", tick.value()),
            LoopStep::Tripped { tick } => {
                println!("tick {:>2}: VIOLATION", tick.value());
                break now;
            }
            _ => {}
        }
    };

    println!("\nsupervisor state: {:?}", control.supervisor_state());
    println!("displayed modes:  {:?}", control.modes());

    println!("\npersisted record:");
    print!("{}", control.forensics().render().unwrap());

    println!("\neverything sent over the diagnostic port so far:");
    println!("{}", control.diagnostics().contents());

    println!("operator reset: erasing the record...");
    control.latch().assert_reset();
    control.poll(tripped_at + 50).unwrap();

    println!("record after erase:");
    print!("{}", control.forensics().render().unwrap());

    println!("\n=== Example Complete ===");
}
