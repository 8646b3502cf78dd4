//! Hierarchical state machine nodes.
//!
//! A [`StateMachineNode`] is itself a [`State`](crate::core::State), so nodes
//! nest to any depth. Each level delegates exactly one `execute()` per tick
//! to its active substate and asks its [`Controller`] what to run next.

mod controller;
mod machine;

pub use controller::{Controller, NodeContext};
pub use machine::StateMachineNode;
