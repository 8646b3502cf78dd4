//! Builder API for ergonomic behaviour tree construction.
//!
//! This module provides a fluent builder that validates a node's whole setup
//! in one pass, and the `state_kind!` macro for declaring tag enums with
//! minimal boilerplate.

pub mod error;
pub mod machine;
pub mod macros;

pub use error::{BuildError, BuildErrors};
pub use machine::StateMachineBuilder;
