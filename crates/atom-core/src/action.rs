//! Actions flowing through the dispatcher

use crate::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier for an action type
///
/// String-based so handler registries can be composed from independently
/// defined slices
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionId(pub String);

impl ActionId {
    /// Create a new action ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ActionId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ActionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A dispatched action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    /// Sequence number, unique and strictly increasing within one atom
    pub seq: u64,
    /// The action type
    pub kind: ActionId,
    /// Optional payload
    pub payload: Option<Value>,
}

impl Action {
    /// Create a new action without payload
    pub fn new(seq: u64, kind: impl Into<ActionId>) -> Self {
        Self {
            seq,
            kind: kind.into(),
            payload: None,
        }
    }

    /// Attach a payload
    pub fn with_payload(mut self, payload: impl Into<Value>) -> Self {
        self.payload = Some(payload.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_id() {
        let id = ActionId::new("increment");
        assert_eq!(id.as_str(), "increment");
        assert_eq!(format!("{}", id), "increment");
        assert_eq!(ActionId::from("increment"), id);
    }

    #[test]
    fn test_action_builder() {
        let action = Action::new(1, "add").with_payload(2i64);
        assert_eq!(action.seq, 1);
        assert_eq!(action.kind.as_str(), "add");
        assert_eq!(action.payload, Some(Value::Int(2)));

        let bare = Action::new(2, "reset");
        assert!(bare.payload.is_none());
    }
}
