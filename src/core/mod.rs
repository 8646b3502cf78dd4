//! Core capabilities and value types.
//!
//! This module contains everything a behaviour tree is made of apart from
//! the nodes themselves:
//! - The `State` capability and its classification tag `StateKind`
//! - Substate identifiers and runtime errors
//! - The injected `Clock`
//! - Parameter slots and selection history

mod clock;
mod error;
mod history;
mod id;
mod kind;
mod params;
mod state;

pub use clock::{Clock, ManualClock, SharedClock, SystemClock};
pub use error::FsmError;
pub use history::{
    SelectionCause, SelectionHistory, SelectionRecord, DEFAULT_HISTORY_CAPACITY,
};
pub use id::StateId;
pub use kind::StateKind;
pub use params::ParameterSlot;
pub use state::State;
