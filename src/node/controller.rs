//! Extension hooks supplied by each concrete node.

use crate::core::{FsmError, State, StateId, StateKind};
use chrono::{DateTime, Utc};

/// Read-only view of a node handed to its controller.
#[derive(Debug)]
pub struct NodeContext<'a, O> {
    owner: &'a O,
    current: Option<StateId>,
    prev: Option<StateId>,
    time_activated: Option<DateTime<Utc>>,
}

impl<'a, O> NodeContext<'a, O> {
    pub(crate) fn new(
        owner: &'a O,
        current: Option<StateId>,
        prev: Option<StateId>,
        time_activated: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            owner,
            current,
            prev,
            time_activated,
        }
    }

    /// The entity this node drives.
    pub fn owner(&self) -> &'a O {
        self.owner
    }

    /// Active substate, if any.
    pub fn current(&self) -> Option<StateId> {
        self.current
    }

    /// Substate that ran during the last completed tick.
    pub fn prev(&self) -> Option<StateId> {
        self.prev
    }

    /// When the node itself was last initialized.
    pub fn time_activated(&self) -> Option<DateTime<Utc>> {
        self.time_activated
    }
}

/// Decision logic for one level of a behaviour tree.
///
/// The node owns the substates and runs the lifecycle; the controller only
/// decides which substate should be active. Returning an id is how a hook
/// asks the node to select it.
///
/// # Example
///
/// ```rust
/// use substate::core::StateId;
/// use substate::node::{Controller, NodeContext};
/// # use substate::state_kind;
/// # state_kind! { enum Kind { Patrol, Flee } }
///
/// struct Guard {
///     enemy_seen: bool,
/// }
///
/// const PATROL: StateId = StateId(1);
/// const FLEE: StateId = StateId(2);
///
/// impl<O> Controller<O, Kind> for Guard {
///     fn reselect_state(&mut self, _ctx: &NodeContext<'_, O>) -> Option<StateId> {
///         Some(PATROL)
///     }
///
///     fn check_force_state(&mut self, ctx: &NodeContext<'_, O>) -> Option<StateId> {
///         (self.enemy_seen && ctx.current() != Some(FLEE)).then_some(FLEE)
///     }
/// }
/// ```
pub trait Controller<O, K: StateKind> {
    /// Pick the substate to run when none is active.
    ///
    /// Must always choose. `None` is reported as
    /// [`FsmError::NothingSelected`].
    fn reselect_state(&mut self, ctx: &NodeContext<'_, O>) -> Option<StateId>;

    /// Inspect external conditions at the start of every tick and return an
    /// id to pre-empt the active substate.
    ///
    /// Default implementation never forces a switch.
    fn check_force_state(&mut self, ctx: &NodeContext<'_, O>) -> Option<StateId> {
        let _ = ctx;
        None
    }

    /// Whether this node, seen as a substate of its parent, has finished.
    ///
    /// Default implementation returns `false`: the node runs until its
    /// parent switches away.
    fn check_completion(&self, ctx: &NodeContext<'_, O>) -> bool {
        let _ = ctx;
        false
    }

    /// Prepare a freshly selected substate before its `initialize()`.
    ///
    /// Typically writes parameters with [`State::set_parameters`].
    fn configure(
        &mut self,
        id: StateId,
        state: &mut dyn State<K>,
        ctx: &NodeContext<'_, O>,
    ) -> Result<(), FsmError> {
        let _ = (id, state, ctx);
        Ok(())
    }
}
