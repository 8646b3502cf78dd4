//! The capability every node of a behaviour tree provides.

use super::error::FsmError;
use super::kind::StateKind;
use crate::snapshot::StateSnapshot;

/// A state in a behaviour tree.
///
/// Concrete behaviours (walk to a point, play an idle animation, ...) and
/// nested [`StateMachineNode`](crate::node::StateMachineNode)s both implement
/// this trait, so a parent never knows how deep the subtree below it goes.
///
/// # Lifecycle
///
/// 1. `initialize()` - the parent selected this state
/// 2. `execute()` - called once per tick while active
/// 3. `check_completion()` - polled by the parent right after `execute()`
/// 4. then exactly one of:
///    - `finalize()` - graceful end after reporting completion
///    - `critical_finalize()` - forced interruption by the parent
///
/// # Example
///
/// ```rust
/// use substate::core::{FsmError, State, StateKind};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
/// enum Kind { Wait }
///
/// impl StateKind for Kind {
///     fn name(&self) -> &str { "Wait" }
/// }
///
/// struct WaitTicks { left: u32, total: u32 }
///
/// impl State<Kind> for WaitTicks {
///     fn initialize(&mut self) -> Result<(), FsmError> {
///         self.left = self.total;
///         Ok(())
///     }
///
///     fn execute(&mut self) -> Result<(), FsmError> {
///         self.left = self.left.saturating_sub(1);
///         Ok(())
///     }
///
///     fn check_completion(&self) -> bool {
///         self.left == 0
///     }
///
///     fn state_type(&self) -> Kind {
///         Kind::Wait
///     }
/// }
/// ```
pub trait State<K: StateKind> {
    /// Called when the parent makes this state active.
    fn initialize(&mut self) -> Result<(), FsmError>;

    /// Run one tick.
    fn execute(&mut self) -> Result<(), FsmError>;

    /// Whether the state has finished and may be finalized.
    ///
    /// Default implementation returns `false`.
    fn check_completion(&self) -> bool {
        false
    }

    /// Graceful end, after `check_completion()` returned true.
    fn finalize(&mut self) {}

    /// Forced end. The parent is switching away or being abandoned.
    fn critical_finalize(&mut self) {}

    /// Classification of what this state is doing.
    ///
    /// Nested machines report the type of their deepest active state.
    fn state_type(&self) -> K;

    /// Overwrite the state's parameter bytes.
    ///
    /// Default implementation fails with [`FsmError::NoParameterSlot`].
    fn set_parameters(&mut self, bytes: &[u8]) -> Result<(), FsmError> {
        let _ = bytes;
        Err(FsmError::NoParameterSlot)
    }

    /// Diagnostic view of this state and everything active below it.
    fn snapshot(&self) -> StateSnapshot<K> {
        StateSnapshot::leaf(self.state_type())
    }
}
