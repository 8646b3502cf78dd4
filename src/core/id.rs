//! Substate identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a substate inside its parent node.
///
/// Identifiers are only unique within one node; two siblings at different
/// levels of the tree may share a number.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateId(pub u32);

impl StateId {
    /// Raw numeric value.
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl From<u32> for StateId {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_hash() {
        assert_eq!(StateId(7).to_string(), "#7");
    }

    #[test]
    fn serializes_as_plain_number() {
        assert_eq!(serde_json::to_string(&StateId(12)).unwrap(), "12");
        let id: StateId = serde_json::from_str("3").unwrap();
        assert_eq!(id, StateId::from(3));
    }
}
