//! Merge strategies for direct state updates

use crate::State;
use std::rc::Rc;

/// A merge strategy combining the current state with an update delta
///
/// The returned map becomes the next state verbatim; no further
/// normalization is applied.
pub type MergeFn = Rc<dyn Fn(&State, &State) -> State>;

/// Default merge: shallow key overwrite
///
/// Keys in `delta` take precedence; non-overlapping keys are preserved.
pub fn shallow_merge(state: &State, delta: &State) -> State {
    let mut next = state.clone();
    for (key, value) in delta {
        next.insert(key.clone(), value.clone());
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{state, Value};

    #[test]
    fn test_delta_keys_win() {
        let current = state([("count", Value::from(1i64)), ("name", Value::from("a"))]);
        let delta = state([("count", 2i64)]);

        let next = shallow_merge(&current, &delta);
        assert_eq!(next.get("count"), Some(&Value::Int(2)));
        assert_eq!(next.get("name"), Some(&Value::String("a".into())));
    }

    #[test]
    fn test_non_overlapping_keys_preserved() {
        let current = state([("a", 1i64)]);
        let delta = state([("b", 2i64)]);

        let next = shallow_merge(&current, &delta);
        assert_eq!(next.len(), 2);
        assert_eq!(next.get("a"), Some(&Value::Int(1)));
        assert_eq!(next.get("b"), Some(&Value::Int(2)));
    }

    #[test]
    fn test_inputs_untouched() {
        let current = state([("a", 1i64)]);
        let delta = state([("a", 2i64)]);

        let _ = shallow_merge(&current, &delta);
        assert_eq!(current.get("a"), Some(&Value::Int(1)));
        assert_eq!(delta.get("a"), Some(&Value::Int(2)));
    }
}
