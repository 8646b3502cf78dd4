//! The recursive state machine node.

use crate::core::{
    FsmError, ParameterSlot, SelectionCause, SelectionHistory, SelectionRecord, SharedClock,
    State, StateId, StateKind,
};
use crate::node::controller::{Controller, NodeContext};
use crate::snapshot::StateSnapshot;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::fmt;

/// A state that owns a keyed set of substates and runs one of them per tick.
///
/// `O` is the owner handle (an entity id, a weak reference, ...). The node
/// stores it and hands it to its controller but never looks inside.
/// `K` is the classification tag and `C` the [`Controller`] deciding which
/// substate runs.
///
/// # Example
///
/// ```rust
/// use std::rc::Rc;
/// use substate::core::{FsmError, ManualClock, State, StateId};
/// use substate::node::{Controller, NodeContext, StateMachineNode};
/// use substate::state_kind;
///
/// state_kind! {
///     enum Kind { Brain, Idle }
/// }
///
/// struct Idle;
///
/// impl State<Kind> for Idle {
///     fn initialize(&mut self) -> Result<(), FsmError> { Ok(()) }
///     fn execute(&mut self) -> Result<(), FsmError> { Ok(()) }
///     fn state_type(&self) -> Kind { Kind::Idle }
/// }
///
/// struct AlwaysIdle;
///
/// impl Controller<u64, Kind> for AlwaysIdle {
///     fn reselect_state(&mut self, _ctx: &NodeContext<'_, u64>) -> Option<StateId> {
///         Some(StateId(0))
///     }
/// }
///
/// let mut brain = StateMachineNode::new(42u64, Kind::Brain, Rc::new(ManualClock::default()), AlwaysIdle);
/// brain.register(StateId(0), Box::new(Idle)).unwrap();
///
/// brain.initialize().unwrap();
/// assert_eq!(brain.state_type(), Kind::Brain);
///
/// brain.execute().unwrap();
/// assert_eq!(brain.current(), Some(StateId(0)));
/// assert_eq!(brain.state_type(), Kind::Idle);
/// ```
pub struct StateMachineNode<O, K: StateKind, C> {
    owner: O,
    kind: K,
    clock: SharedClock,
    controller: C,
    parameters: Option<ParameterSlot>,
    current: Option<StateId>,
    prev: Option<StateId>,
    time_activated: Option<DateTime<Utc>>,
    substates: HashMap<StateId, Box<dyn State<K>>>,
    history: SelectionHistory,
    ticks: u64,
}

impl<O, K: StateKind, C: Controller<O, K>> StateMachineNode<O, K, C> {
    /// Create an empty node. Register substates before the first tick.
    pub fn new(owner: O, kind: K, clock: SharedClock, controller: C) -> Self {
        Self {
            owner,
            kind,
            clock,
            controller,
            parameters: None,
            current: None,
            prev: None,
            time_activated: None,
            substates: HashMap::new(),
            history: SelectionHistory::default(),
            ticks: 0,
        }
    }

    /// Give the node a parameter slot of `capacity` bytes.
    pub fn with_parameter_slot(mut self, capacity: usize) -> Self {
        self.parameters = Some(ParameterSlot::new(capacity));
        self
    }

    /// Keep at most `capacity` selection records (0 disables the history).
    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history = SelectionHistory::with_capacity(capacity);
        self
    }

    /// Take ownership of `state` under `id`.
    ///
    /// An id can only be registered once. A duplicate is rejected, the state
    /// already stored stays in place and the rejected one is dropped.
    pub fn register(&mut self, id: StateId, state: Box<dyn State<K>>) -> Result<(), FsmError> {
        if self.substates.contains_key(&id) {
            tracing::warn!(kind = self.kind.name(), %id, "duplicate substate registration");
            return Err(FsmError::DuplicateStateId { id });
        }
        self.substates.insert(id, state);
        Ok(())
    }

    /// The substate registered under `id`.
    pub fn lookup(&self, id: StateId) -> Result<&dyn State<K>, FsmError> {
        self.substates
            .get(&id)
            .map(|state| &**state)
            .ok_or(FsmError::UnknownStateId { id })
    }

    pub fn lookup_mut(&mut self, id: StateId) -> Result<&mut dyn State<K>, FsmError> {
        match self.substates.get_mut(&id) {
            Some(state) => Ok(&mut **state),
            None => Err(FsmError::UnknownStateId { id }),
        }
    }

    /// The active substate, or `None` when nothing is selected.
    pub fn current_state(&self) -> Result<Option<&dyn State<K>>, FsmError> {
        match self.current {
            None => Ok(None),
            Some(id) => self
                .substates
                .get(&id)
                .map(|state| Some(&**state))
                .ok_or(FsmError::DanglingSelection { id }),
        }
    }

    /// Make `id` the active substate.
    ///
    /// Selecting the already active id does nothing. Otherwise the outgoing
    /// substate is critically finalized, the controller configures the new
    /// one and it is initialized. An unknown id leaves the node untouched.
    /// If configuring or initializing the new substate fails, the node is
    /// left with nothing selected and the next tick reselects.
    pub fn select(&mut self, id: StateId) -> Result<(), FsmError> {
        self.select_with(id, SelectionCause::Manual)
    }

    fn select_with(&mut self, id: StateId, cause: SelectionCause) -> Result<(), FsmError> {
        if self.current == Some(id) {
            return Ok(());
        }
        if !self.substates.contains_key(&id) {
            tracing::warn!(kind = self.kind.name(), %id, "select of unregistered substate");
            return Err(FsmError::UnknownStateId { id });
        }

        let from = self.current;
        if let Some(outgoing) = self.active_mut()? {
            outgoing.critical_finalize();
        }

        self.current = Some(id);
        if let Err(err) = self.activate(id) {
            // the outgoing substate is already torn down
            tracing::warn!(kind = self.kind.name(), %id, error = %err, "substate failed to activate");
            self.current = None;
            if from.is_some() {
                self.history.record(SelectionRecord {
                    tick: self.ticks,
                    from,
                    to: None,
                    cause: SelectionCause::Interrupted,
                });
            }
            return Err(err);
        }

        self.history.record(SelectionRecord {
            tick: self.ticks,
            from,
            to: Some(id),
            cause,
        });
        tracing::debug!(kind = self.kind.name(), ?from, to = %id, ?cause, "substate selected");
        Ok(())
    }

    /// Configure and initialize the substate that `current` points at.
    fn activate(&mut self, id: StateId) -> Result<(), FsmError> {
        let ctx = NodeContext::new(&self.owner, self.current, self.prev, self.time_activated);
        let incoming = self
            .substates
            .get_mut(&id)
            .ok_or(FsmError::DanglingSelection { id })?;
        self.controller.configure(id, &mut **incoming, &ctx)?;
        incoming.initialize()
    }

    fn active_mut(&mut self) -> Result<Option<&mut Box<dyn State<K>>>, FsmError> {
        match self.current {
            None => Ok(None),
            Some(id) => self
                .substates
                .get_mut(&id)
                .map(Some)
                .ok_or(FsmError::DanglingSelection { id }),
        }
    }

    fn reset(&mut self) {
        self.current = None;
        self.prev = None;
        self.time_activated = None;
    }

    pub fn owner(&self) -> &O {
        &self.owner
    }

    /// This node's own tag, ignoring substates.
    pub fn kind(&self) -> K {
        self.kind
    }

    pub fn current(&self) -> Option<StateId> {
        self.current
    }

    /// The substate that ran during the last tick, even if it completed.
    pub fn prev(&self) -> Option<StateId> {
        self.prev
    }

    pub fn time_activated(&self) -> Option<DateTime<Utc>> {
        self.time_activated
    }

    /// Registered ids in ascending order.
    pub fn substate_ids(&self) -> Vec<StateId> {
        let mut ids: Vec<StateId> = self.substates.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.substates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.substates.is_empty()
    }

    pub fn history(&self) -> &SelectionHistory {
        &self.history
    }

    pub fn parameters(&self) -> Option<&ParameterSlot> {
        self.parameters.as_ref()
    }

    pub fn controller(&self) -> &C {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut C {
        &mut self.controller
    }

    /// Number of `execute()` calls since construction.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

impl<O, K: StateKind, C: Controller<O, K>> State<K> for StateMachineNode<O, K, C> {
    fn initialize(&mut self) -> Result<(), FsmError> {
        self.time_activated = Some(self.clock.now());
        self.current = None;
        self.prev = None;
        tracing::trace!(kind = self.kind.name(), "node initialized");
        Ok(())
    }

    fn execute(&mut self) -> Result<(), FsmError> {
        self.ticks += 1;

        let ctx = NodeContext::new(&self.owner, self.current, self.prev, self.time_activated);
        if let Some(forced) = self.controller.check_force_state(&ctx) {
            self.select_with(forced, SelectionCause::Forced)?;
        }

        if self.current.is_none() {
            let ctx = NodeContext::new(&self.owner, self.current, self.prev, self.time_activated);
            let Some(chosen) = self.controller.reselect_state(&ctx) else {
                tracing::warn!(kind = self.kind.name(), "reselect_state chose nothing");
                return Err(FsmError::NothingSelected);
            };
            self.select_with(chosen, SelectionCause::Reselect)?;
        }

        let id = self.current.ok_or(FsmError::NothingSelected)?;
        let state = self
            .substates
            .get_mut(&id)
            .ok_or(FsmError::DanglingSelection { id })?;
        tracing::trace!(kind = self.kind.name(), %id, tick = self.ticks, "executing substate");
        state.execute()?;

        self.prev = Some(id);

        if state.check_completion() {
            state.finalize();
            self.current = None;
            self.history.record(SelectionRecord {
                tick: self.ticks,
                from: Some(id),
                to: None,
                cause: SelectionCause::Completed,
            });
            tracing::debug!(kind = self.kind.name(), %id, "substate completed");
        }
        Ok(())
    }

    fn check_completion(&self) -> bool {
        let ctx = NodeContext::new(&self.owner, self.current, self.prev, self.time_activated);
        self.controller.check_completion(&ctx)
    }

    // Graceful completion does not reach into a still active substate; only
    // critical_finalize cascades.
    fn finalize(&mut self) {
        tracing::trace!(kind = self.kind.name(), current = ?self.current, "node finalized");
        self.reset();
    }

    fn critical_finalize(&mut self) {
        if let Some(id) = self.current {
            let active = self.substates.get_mut(&id);
            debug_assert!(active.is_some(), "active substate {id} is not registered");
            if let Some(active) = active {
                active.critical_finalize();
            }
            self.history.record(SelectionRecord {
                tick: self.ticks,
                from: Some(id),
                to: None,
                cause: SelectionCause::Interrupted,
            });
            tracing::debug!(kind = self.kind.name(), %id, "node interrupted");
        }
        self.reset();
    }

    fn state_type(&self) -> K {
        match self.current.and_then(|id| self.substates.get(&id)) {
            Some(active) => active.state_type(),
            None => self.kind,
        }
    }

    fn set_parameters(&mut self, bytes: &[u8]) -> Result<(), FsmError> {
        if bytes.is_empty() {
            return Err(FsmError::EmptyParameters);
        }
        self.parameters
            .as_mut()
            .ok_or(FsmError::NoParameterSlot)?
            .write(bytes)
    }

    fn snapshot(&self) -> StateSnapshot<K> {
        StateSnapshot {
            kind: self.kind,
            current: self.current,
            prev: self.prev,
            time_activated: self.time_activated,
            substates: self.substate_ids(),
            active: self
                .current
                .and_then(|id| self.substates.get(&id))
                .map(|active| Box::new(active.snapshot())),
        }
    }
}

impl<O, K: StateKind, C> fmt::Debug for StateMachineNode<O, K, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ids: Vec<&StateId> = self.substates.keys().collect();
        ids.sort_unstable();
        f.debug_struct("StateMachineNode")
            .field("kind", &self.kind)
            .field("current", &self.current)
            .field("prev", &self.prev)
            .field("time_activated", &self.time_activated)
            .field("substates", &ids)
            .field("ticks", &self.ticks)
            .finish_non_exhaustive()
    }
}
