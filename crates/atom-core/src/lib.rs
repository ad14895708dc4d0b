//! Atom - minimal reactive state container
//!
//! This crate provides a single component, the [`Atom`], composed of four
//! cooperating facilities:
//! - A state store holding a dynamic [`State`] map, replaced (never mutated
//!   in place) on every update
//! - A dispatcher routing named actions through an evolution function, or
//!   merging partial-state deltas directly
//! - An observer registry notifying listeners synchronously, in registration
//!   order, after every state change
//! - An optional trace hook receiving a structured event for every dispatch
//!   and update, including the causal chain of nested dispatches
//!
//! Everything is single-threaded and synchronous: listeners and evolution
//! functions run inline on the calling stack, and re-entrant dispatch is
//! permitted.
//!
//! # Example
//!
//! ```
//! use atom_core::{state, Atom, Value};
//!
//! let mut atom = Atom::with_evolve(state([("count", 1i64)]), |split, _action| {
//!     let count = split.get().get("count").and_then(Value::as_int).unwrap_or(0);
//!     split.update(state([("count", count + 1)]))
//! });
//!
//! atom.observe(|atom| {
//!     println!("count is now {}", atom.get()["count"]);
//!     Ok(())
//! });
//!
//! atom.dispatch("increment").unwrap();
//! assert_eq!(atom.get().get("count"), Some(&Value::Int(2)));
//! ```

mod action;
mod atom;
mod error;
mod merge;
pub mod trace;
mod value;

pub use action::{Action, ActionId};
pub use atom::{
    Actions, Atom, AtomConfig, Evolution, EvolveFn, Handler, ListenerFn, ListenerId, Split,
};
pub use error::{Error, Result};
pub use merge::{shallow_merge, MergeFn};
pub use trace::{trace_fn, Recorder, TraceEvent, TraceFn, TraceRecord};
pub use value::{state, State, Value};
