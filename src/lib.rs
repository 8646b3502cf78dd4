//! Substate: a hierarchical finite state machine for game entity behaviour
//!
//! A behaviour tree is built from [`StateMachineNode`]s. Every node owns a
//! set of substates keyed by [`StateId`], keeps at most one of them active,
//! and runs it once per tick. Because a node is itself a [`State`], the
//! active substate can be another node, so delegation recurses to any depth.
//!
//! # Core Concepts
//!
//! - **State**: The lifecycle capability (`initialize`, `execute`,
//!   `check_completion`, `finalize`, `critical_finalize`, `state_type`)
//! - **Controller**: Per-node hooks that reselect a substate when none is
//!   active and force a switch when outside conditions demand it
//! - **Critical finalize**: Forced interruption that cascades down the active
//!   chain, as opposed to graceful completion
//! - **Snapshot**: Serializable view of what every level is doing
//!
//! # Example
//!
//! ```rust
//! use std::rc::Rc;
//! use substate::core::{FsmError, ManualClock, State, StateId};
//! use substate::node::{Controller, NodeContext};
//! use substate::{state_kind, StateMachineBuilder};
//!
//! state_kind! {
//!     enum Activity { Brain, Patrol, Flee }
//! }
//!
//! struct Leaf(Activity);
//!
//! impl State<Activity> for Leaf {
//!     fn initialize(&mut self) -> Result<(), FsmError> { Ok(()) }
//!     fn execute(&mut self) -> Result<(), FsmError> { Ok(()) }
//!     fn state_type(&self) -> Activity { self.0 }
//! }
//!
//! const PATROL: StateId = StateId(0);
//! const FLEE: StateId = StateId(1);
//!
//! struct Npc { scared: bool }
//!
//! impl Controller<u32, Activity> for Npc {
//!     fn reselect_state(&mut self, _ctx: &NodeContext<'_, u32>) -> Option<StateId> {
//!         Some(PATROL)
//!     }
//!
//!     fn check_force_state(&mut self, _ctx: &NodeContext<'_, u32>) -> Option<StateId> {
//!         self.scared.then_some(FLEE)
//!     }
//! }
//!
//! let mut brain = StateMachineBuilder::new()
//!     .owner(1u32)
//!     .kind(Activity::Brain)
//!     .controller(Npc { scared: false })
//!     .clock(Rc::new(ManualClock::default()))
//!     .substate(PATROL, Box::new(Leaf(Activity::Patrol)))
//!     .substate(FLEE, Box::new(Leaf(Activity::Flee)))
//!     .build()
//!     .unwrap();
//!
//! brain.initialize().unwrap();
//! brain.execute().unwrap();
//! assert_eq!(brain.state_type(), Activity::Patrol);
//!
//! brain.controller_mut().scared = true;
//! brain.execute().unwrap();
//! assert_eq!(brain.state_type(), Activity::Flee);
//! ```

pub mod builder;
pub mod core;
pub mod node;
pub mod snapshot;

// Re-export commonly used types
pub use builder::StateMachineBuilder;
pub use core::{Clock, FsmError, State, StateId, StateKind};
pub use node::{Controller, NodeContext, StateMachineNode};
pub use snapshot::{StateSnapshot, TreeDump};
