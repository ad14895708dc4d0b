//! Trace infrastructure for observing dispatches and updates
//!
//! The tracer is a pure observation channel: every named dispatch and every
//! state update produces an event carrying the causal action ancestry, and
//! emitting events never feeds back into dispatch or update semantics.
//!
//! # Example
//!
//! ```
//! use atom_core::{state, Atom, AtomConfig, Evolution, Recorder};
//!
//! let recorder = Recorder::new();
//! let mut config = AtomConfig::default();
//! config.tracer = Some(recorder.tracer());
//!
//! let mut atom = Atom::with_config(state([("count", 0i64)]), Evolution::default(), config);
//! atom.update(state([("count", 1i64)])).unwrap();
//!
//! assert_eq!(recorder.len(), 1);
//! ```

use crate::{Action, State};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;

/// Observation hook invoked for every dispatch and update
pub type TraceFn = Rc<dyn Fn(TraceEvent<'_>)>;

/// A borrowed trace event, emitted while a dispatch or update is in flight
#[derive(Debug, Clone, Copy)]
pub enum TraceEvent<'a> {
    /// A named action entered the dispatcher
    Action {
        /// The dispatched action
        action: &'a Action,
        /// Ancestor actions, outermost first (empty at top level)
        source: &'a [Action],
        /// Current state at dispatch time
        state: &'a State,
    },
    /// A direct update was merged into the state
    Update {
        /// The update delta
        delta: &'a State,
        /// Ancestor actions that led to this update
        source: &'a [Action],
        /// State before the merge
        prev: &'a State,
        /// State after the merge
        state: &'a State,
    },
}

impl TraceEvent<'_> {
    /// Copy this event into an owned record
    pub fn to_record(&self) -> TraceRecord {
        match *self {
            TraceEvent::Action {
                action,
                source,
                state,
            } => TraceRecord::Action {
                action: action.clone(),
                source: source.to_vec(),
                state: state.clone(),
            },
            TraceEvent::Update {
                delta,
                source,
                prev,
                state,
            } => TraceRecord::Update {
                delta: delta.clone(),
                source: source.to_vec(),
                prev: prev.clone(),
                state: state.clone(),
            },
        }
    }
}

/// An owned trace record, as accumulated by [`Recorder`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TraceRecord {
    /// A named action was dispatched
    Action {
        action: Action,
        source: Vec<Action>,
        state: State,
    },
    /// A direct update replaced the state
    Update {
        delta: State,
        source: Vec<Action>,
        prev: State,
        state: State,
    },
}

impl TraceRecord {
    /// The ancestor-action chain of this record
    pub fn source(&self) -> &[Action] {
        match self {
            TraceRecord::Action { source, .. } | TraceRecord::Update { source, .. } => source,
        }
    }

    /// Check if this is an action record
    pub fn is_action(&self) -> bool {
        matches!(self, TraceRecord::Action { .. })
    }

    /// Check if this is an update record
    pub fn is_update(&self) -> bool {
        matches!(self, TraceRecord::Update { .. })
    }
}

/// Accumulates trace records in a shared buffer for audit and debugging
///
/// The recorder hands out a [`TraceFn`] wired to its buffer; clones of the
/// buffer handle stay live for as long as either side needs it.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    records: Rc<RefCell<Vec<TraceRecord>>>,
    /// Maximum records to keep (0 = unlimited); oldest are dropped first
    limit: usize,
}

impl Recorder {
    /// Create an unbounded recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a recorder keeping at most `limit` records
    pub fn with_limit(limit: usize) -> Self {
        Self {
            records: Rc::new(RefCell::new(Vec::new())),
            limit,
        }
    }

    /// Produce a tracer that appends every event to this recorder's buffer
    pub fn tracer(&self) -> TraceFn {
        let records = Rc::clone(&self.records);
        let limit = self.limit;
        trace_fn(move |event| {
            let mut records = records.borrow_mut();
            records.push(event.to_record());
            if limit > 0 && records.len() > limit {
                let excess = records.len() - limit;
                records.drain(..excess);
            }
        })
    }

    /// Snapshot of all recorded events, oldest first
    pub fn records(&self) -> Vec<TraceRecord> {
        self.records.borrow().clone()
    }

    /// Drain all recorded events, leaving the buffer empty
    pub fn take(&self) -> Vec<TraceRecord> {
        std::mem::take(&mut *self.records.borrow_mut())
    }

    /// Number of records currently held
    pub fn len(&self) -> usize {
        self.records.borrow().len()
    }

    /// Check if the buffer is empty
    pub fn is_empty(&self) -> bool {
        self.records.borrow().is_empty()
    }

    /// Discard all recorded events
    pub fn clear(&self) {
        self.records.borrow_mut().clear();
    }
}

/// Wrap a closure as a [`TraceFn`]
pub fn trace_fn(f: impl Fn(TraceEvent<'_>) + 'static) -> TraceFn {
    Rc::new(f)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{state, Atom, AtomConfig, Evolution};

    fn traced_atom(recorder: &Recorder, initial: State) -> Atom {
        let mut config = AtomConfig::default();
        config.tracer = Some(recorder.tracer());
        Atom::with_config(initial, Evolution::default(), config)
    }

    #[test]
    fn test_update_record_carries_prev_state() {
        let recorder = Recorder::new();
        let mut atom = traced_atom(&recorder, state([("count", 1i64)]));

        atom.update(state([("count", 2i64)])).unwrap();

        let records = recorder.records();
        assert_eq!(records.len(), 1);
        match &records[0] {
            TraceRecord::Update {
                delta, prev, state, ..
            } => {
                assert_eq!(delta.get("count"), Some(&crate::Value::Int(2)));
                assert_eq!(prev.get("count"), Some(&crate::Value::Int(1)));
                assert_eq!(state.get("count"), Some(&crate::Value::Int(2)));
            }
            other => panic!("expected update record, got {:?}", other),
        }
    }

    #[test]
    fn test_limit_drops_oldest() {
        let recorder = Recorder::with_limit(2);
        let mut atom = traced_atom(&recorder, State::new());

        atom.update(state([("n", 1i64)])).unwrap();
        atom.update(state([("n", 2i64)])).unwrap();
        atom.update(state([("n", 3i64)])).unwrap();

        let records = recorder.records();
        assert_eq!(records.len(), 2);
        match &records[0] {
            TraceRecord::Update { delta, .. } => {
                assert_eq!(delta.get("n"), Some(&crate::Value::Int(2)));
            }
            other => panic!("expected update record, got {:?}", other),
        }
    }

    #[test]
    fn test_take_drains_buffer() {
        let recorder = Recorder::new();
        let mut atom = traced_atom(&recorder, State::new());

        atom.update(state([("n", 1i64)])).unwrap();
        assert_eq!(recorder.take().len(), 1);
        assert!(recorder.is_empty());
    }
}
