//! Builder for constructing state machine nodes.

use crate::builder::error::{BuildError, BuildErrors};
use crate::core::{SharedClock, State, StateId, StateKind, SystemClock, DEFAULT_HISTORY_CAPACITY};
use crate::node::{Controller, StateMachineNode};
use std::collections::HashSet;
use std::rc::Rc;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Builder for constructing state machine nodes with a fluent API.
///
/// Unlike calling [`StateMachineNode::new`] and `register` by hand, the
/// builder checks the whole setup at once and reports every problem it finds.
pub struct StateMachineBuilder<O, K: StateKind, C> {
    owner: Option<O>,
    kind: Option<K>,
    clock: Option<SharedClock>,
    controller: Option<C>,
    substates: Vec<(StateId, Box<dyn State<K>>)>,
    parameter_slot: Option<usize>,
    history_capacity: usize,
}

impl<O, K: StateKind, C: Controller<O, K>> StateMachineBuilder<O, K, C> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            owner: None,
            kind: None,
            clock: None,
            controller: None,
            substates: Vec::new(),
            parameter_slot: None,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }

    /// Set the owner handle (required).
    pub fn owner(mut self, owner: O) -> Self {
        self.owner = Some(owner);
        self
    }

    /// Set the node's own tag (required).
    pub fn kind(mut self, kind: K) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Set the controller supplying the selection hooks (required).
    pub fn controller(mut self, controller: C) -> Self {
        self.controller = Some(controller);
        self
    }

    /// Inject a clock. Defaults to [`SystemClock`].
    pub fn clock(mut self, clock: SharedClock) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Add a substate under `id`.
    pub fn substate(mut self, id: StateId, state: Box<dyn State<K>>) -> Self {
        self.substates.push((id, state));
        self
    }

    /// Give the node a parameter slot of `capacity` bytes.
    pub fn parameter_slot(mut self, capacity: usize) -> Self {
        self.parameter_slot = Some(capacity);
        self
    }

    /// Keep at most `capacity` selection records.
    pub fn history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }

    /// Check the builder, accumulating ALL problems.
    pub fn validate(&self) -> Validation<(), NonEmptyVec<BuildError>> {
        let mut checks: Vec<Validation<(), NonEmptyVec<BuildError>>> = Vec::new();

        if self.owner.is_none() {
            checks.push(Validation::fail(BuildError::MissingOwner));
        }
        if self.kind.is_none() {
            checks.push(Validation::fail(BuildError::MissingKind));
        }
        if self.controller.is_none() {
            checks.push(Validation::fail(BuildError::MissingController));
        }

        let mut seen = HashSet::new();
        for (id, _) in &self.substates {
            if !seen.insert(*id) {
                checks.push(Validation::fail(BuildError::DuplicateStateId { id: *id }));
            }
        }

        if self.parameter_slot == Some(0) {
            checks.push(Validation::fail(BuildError::EmptyParameterSlot));
        }

        Validation::all_vec(checks).map(|_| ())
    }

    /// Build the node.
    /// Returns every validation problem if the setup is incomplete.
    pub fn build(self) -> Result<StateMachineNode<O, K, C>, BuildErrors> {
        if let Validation::Failure(errors) = self.validate() {
            return Err(BuildErrors(errors.iter().cloned().collect()));
        }

        let owner = self
            .owner
            .ok_or_else(|| BuildErrors(vec![BuildError::MissingOwner]))?;
        let kind = self
            .kind
            .ok_or_else(|| BuildErrors(vec![BuildError::MissingKind]))?;
        let controller = self
            .controller
            .ok_or_else(|| BuildErrors(vec![BuildError::MissingController]))?;
        let clock = self.clock.unwrap_or_else(|| Rc::new(SystemClock));

        let mut node = StateMachineNode::new(owner, kind, clock, controller)
            .with_history_capacity(self.history_capacity);
        if let Some(capacity) = self.parameter_slot {
            node = node.with_parameter_slot(capacity);
        }
        for (id, state) in self.substates {
            node.register(id, state)
                .map_err(|_| BuildErrors(vec![BuildError::DuplicateStateId { id }]))?;
        }

        Ok(node)
    }
}

impl<O, K: StateKind, C: Controller<O, K>> Default for StateMachineBuilder<O, K, C> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{FsmError, ManualClock, State};
    use crate::node::NodeContext;
    use chrono::{TimeZone, Utc};
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
    enum TestKind {
        Brain,
        Rest,
        Eat,
    }

    impl StateKind for TestKind {
        fn name(&self) -> &str {
            match self {
                Self::Brain => "Brain",
                Self::Rest => "Rest",
                Self::Eat => "Eat",
            }
        }
    }

    struct Leaf(TestKind);

    impl State<TestKind> for Leaf {
        fn initialize(&mut self) -> Result<(), FsmError> {
            Ok(())
        }

        fn execute(&mut self) -> Result<(), FsmError> {
            Ok(())
        }

        fn state_type(&self) -> TestKind {
            self.0
        }
    }

    struct First;

    impl Controller<u32, TestKind> for First {
        fn reselect_state(&mut self, _ctx: &NodeContext<'_, u32>) -> Option<StateId> {
            Some(StateId(0))
        }
    }

    type Builder = StateMachineBuilder<u32, TestKind, First>;

    #[test]
    fn builder_reports_all_missing_fields() {
        let result = Builder::new().build();

        let errors = result.unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.contains(&BuildError::MissingOwner));
        assert!(errors.contains(&BuildError::MissingKind));
        assert!(errors.contains(&BuildError::MissingController));
    }

    #[test]
    fn builder_rejects_duplicate_ids() {
        let result = Builder::new()
            .owner(7)
            .kind(TestKind::Brain)
            .controller(First)
            .substate(StateId(0), Box::new(Leaf(TestKind::Rest)))
            .substate(StateId(0), Box::new(Leaf(TestKind::Eat)))
            .build();

        let errors = result.unwrap_err();
        assert_eq!(
            errors,
            BuildErrors(vec![BuildError::DuplicateStateId { id: StateId(0) }])
        );
    }

    #[test]
    fn builder_rejects_empty_parameter_slot() {
        let validation = Builder::new()
            .owner(7)
            .kind(TestKind::Brain)
            .controller(First)
            .parameter_slot(0)
            .validate();

        assert!(validation.is_failure());
    }

    #[test]
    fn fluent_api_builds_runnable_node() {
        let start = Utc.with_ymd_and_hms(2024, 2, 2, 0, 0, 0).unwrap();
        let mut node = Builder::new()
            .owner(7)
            .kind(TestKind::Brain)
            .controller(First)
            .clock(Rc::new(ManualClock::new(start)))
            .substate(StateId(0), Box::new(Leaf(TestKind::Rest)))
            .substate(StateId(1), Box::new(Leaf(TestKind::Eat)))
            .parameter_slot(8)
            .history_capacity(4)
            .build()
            .unwrap();

        assert_eq!(node.substate_ids(), vec![StateId(0), StateId(1)]);
        assert_eq!(node.parameters().map(|p| p.capacity()), Some(8));
        assert_eq!(node.history().capacity(), 4);

        node.initialize().unwrap();
        node.execute().unwrap();

        assert_eq!(node.time_activated(), Some(start));
        assert_eq!(node.state_type(), TestKind::Rest);
    }

    #[test]
    fn valid_builder_passes_validation() {
        let validation = Builder::new()
            .owner(1)
            .kind(TestKind::Brain)
            .controller(First)
            .validate();

        assert!(validation.is_success());
    }
}
