//! Classification tags reported by `State::state_type`.
//!
//! A kind is an opaque label attached to every node of a behaviour tree
//! (for example `Idle`, `Patrol`, `Attack`). The tree itself never interprets
//! it; callers use it to ask "what is this entity doing right now?".

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Debug;
use std::hash::Hash;

/// Trait for state classification tags.
///
/// Tags are small copyable values. They are compared when callers inspect a
/// tree and logged whenever the active state changes.
///
/// # Required Traits
///
/// - `Copy` + `Eq` + `Hash`: tags are plain values used as keys
/// - `Debug`: tags show up in diagnostics
/// - `Serialize` + `DeserializeOwned`: tags are part of tree snapshots
///
/// # Example
///
/// ```rust
/// use substate::core::StateKind;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
/// enum Activity {
///     Rest,
///     Patrol,
///     Flee,
/// }
///
/// impl StateKind for Activity {
///     fn name(&self) -> &str {
///         match self {
///             Self::Rest => "Rest",
///             Self::Patrol => "Patrol",
///             Self::Flee => "Flee",
///         }
///     }
/// }
///
/// assert_eq!(Activity::Flee.name(), "Flee");
/// ```
pub trait StateKind:
    Copy + Eq + Hash + Debug + Serialize + DeserializeOwned + 'static
{
    /// Get the tag's name for display/logging.
    fn name(&self) -> &str;
}
