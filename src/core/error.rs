//! Runtime errors raised by state machine nodes.

use super::id::StateId;
use thiserror::Error;

/// Integrity and parameter-contract violations.
///
/// None of these are transient. They mean the tree was wired incorrectly, so
/// nodes never retry; they leave themselves consistent and hand the error to
/// the driver.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FsmError {
    #[error("No substate registered under id {id}")]
    UnknownStateId { id: StateId },

    #[error("Substate id {id} is already registered")]
    DuplicateStateId { id: StateId },

    #[error("Active substate {id} is missing from the substate map")]
    DanglingSelection { id: StateId },

    #[error("reselect_state returned without choosing a substate")]
    NothingSelected,

    #[error("State has no parameter slot to write into")]
    NoParameterSlot,

    #[error("No parameter bytes supplied")]
    EmptyParameters,

    #[error("Parameters of {len} bytes do not fit a slot of {capacity} bytes")]
    ParameterOverflow { len: usize, capacity: usize },

    #[error("Parameter encoding failed: {0}")]
    ParameterEncoding(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_id() {
        let err = FsmError::UnknownStateId { id: StateId(4) };
        assert_eq!(err.to_string(), "No substate registered under id #4");
    }

    #[test]
    fn overflow_reports_sizes() {
        let err = FsmError::ParameterOverflow {
            len: 9,
            capacity: 8,
        };
        assert!(err.to_string().contains("9 bytes"));
        assert!(err.to_string().contains("8 bytes"));
    }
}
