//! Build errors for state machine nodes.

use crate::core::StateId;
use thiserror::Error;

/// A single problem found while validating a node builder.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum BuildError {
    #[error("Owner not specified. Call .owner(owner) before .build()")]
    MissingOwner,

    #[error("State kind not specified. Call .kind(kind) before .build()")]
    MissingKind,

    #[error("Controller not specified. Call .controller(controller) before .build()")]
    MissingController,

    #[error("Substate id {id} registered more than once")]
    DuplicateStateId { id: StateId },

    #[error("Parameter slot must hold at least one byte")]
    EmptyParameterSlot,
}

/// Every problem found by one validation pass.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("Node failed validation with {} error(s)", .0.len())]
pub struct BuildErrors(pub Vec<BuildError>);

impl BuildErrors {
    pub fn contains(&self, error: &BuildError) -> bool {
        self.0.contains(error)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
