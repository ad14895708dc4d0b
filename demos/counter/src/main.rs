//! Counter Example
//!
//! Demonstrates the atom with a counter: named dispatch through an actions
//! registry, direct updates, observers, fuse composition, and trace
//! recording.

use atom_core::{state, Actions, Atom, AtomConfig, Evolution, Recorder, Value};

fn main() {
    println!("=== Atom Counter Example ===\n");

    // Actions registry: increment takes an optional step payload
    let actions = Actions::new().on("increment", |split, payload| {
        let by = payload.and_then(Value::as_int).unwrap_or(1);
        let count = split.get().get("count").and_then(Value::as_int).unwrap_or(0);
        split.update(state([("count", count + by)]))
    });

    // Record every dispatch and update
    let recorder = Recorder::new();
    let mut config = AtomConfig::default();
    config.tracer = Some(recorder.tracer());

    let mut atom = Atom::with_config(
        state([("count", 0i64)]),
        Evolution::Actions(actions),
        config,
    );

    atom.observe(|atom| {
        println!("  count is now {}", atom.get()["count"]);
        Ok(())
    });

    println!("Dispatching increment actions...");
    atom.dispatch("increment").expect("dispatch");
    atom.dispatch_with("increment", 2i64).expect("dispatch");

    println!("Merging a direct update...");
    atom.update(state([("count", 10i64)])).expect("update");

    // Compose an extra slice after construction
    println!("Fusing a reset handler...");
    let reset = Actions::new().on("reset", |split, _payload| {
        split.update(state([("count", 0i64)]))
    });
    atom.fuse(Some(state([("resettable", true)])), Some(reset))
        .expect("fuse");
    atom.dispatch("reset").expect("dispatch");

    println!("\nFinal state: {:?}", atom.get());
    println!("\n{} trace records:", recorder.len());
    for record in recorder.records() {
        match record {
            atom_core::TraceRecord::Action { action, source, .. } => {
                println!("  action #{} {} (ancestors: {})", action.seq, action.kind, source.len());
            }
            atom_core::TraceRecord::Update { delta, source, .. } => {
                println!("  update {:?} (ancestors: {})", delta.keys().collect::<Vec<_>>(), source.len());
            }
        }
    }
}
