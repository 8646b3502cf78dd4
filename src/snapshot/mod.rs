//! Diagnostic snapshots of behaviour trees.
//!
//! A snapshot captures what every level of a tree is doing at one instant:
//! which substate is active, which one ran last, and when each node was
//! activated. Snapshots can be written out as JSON for tooling or as bincode
//! for compact replay logs. They are read-only views; nothing restores a tree
//! from them.

use crate::core::{StateId, StateKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod error;

pub use error::{DumpFormat, SnapshotError};

/// Version identifier for the dump format
pub const DUMP_VERSION: u32 = 1;

/// One level of a behaviour tree at a point in time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateSnapshot<K: StateKind> {
    /// The node's own tag
    pub kind: K,

    /// Active substate
    pub current: Option<StateId>,

    /// Substate that ran during the last tick
    pub prev: Option<StateId>,

    /// When the node was last initialized
    pub time_activated: Option<DateTime<Utc>>,

    /// Registered substate ids, ascending
    pub substates: Vec<StateId>,

    /// Snapshot of the active substate
    pub active: Option<Box<StateSnapshot<K>>>,
}

impl<K: StateKind> StateSnapshot<K> {
    /// Snapshot of a plain state with no substates.
    pub fn leaf(kind: K) -> Self {
        Self {
            kind,
            current: None,
            prev: None,
            time_activated: None,
            substates: Vec::new(),
            active: None,
        }
    }

    /// Tag of the deepest active level. Matches `State::state_type`.
    pub fn effective_kind(&self) -> K {
        let mut level = self;
        while let Some(active) = &level.active {
            level = &**active;
        }
        level.kind
    }

    /// Active substate ids from this level down.
    pub fn active_path(&self) -> Vec<StateId> {
        let mut path = Vec::new();
        let mut level = Some(self);
        while let Some(node) = level {
            if let Some(id) = node.current {
                path.push(id);
            }
            level = node.active.as_deref();
        }
        path
    }

    /// Number of levels below this one that are active.
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut level = self.active.as_deref();
        while let Some(node) = level {
            depth += 1;
            level = node.active.as_deref();
        }
        depth
    }
}

/// Versioned envelope around a root snapshot.
///
/// # Example
///
/// ```rust
/// use substate::snapshot::{StateSnapshot, TreeDump};
/// use substate::state_kind;
///
/// state_kind! {
///     enum Kind { Idle }
/// }
///
/// let dump = TreeDump::new(StateSnapshot::leaf(Kind::Idle));
/// let json = dump.to_json().unwrap();
/// let restored: TreeDump<Kind> = TreeDump::from_json(&json).unwrap();
/// assert_eq!(restored.root, dump.root);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct TreeDump<K: StateKind> {
    /// Dump format version
    pub version: u32,

    /// Snapshot of the root node
    pub root: StateSnapshot<K>,
}

impl<K: StateKind> TreeDump<K> {
    pub fn new(root: StateSnapshot<K>) -> Self {
        Self {
            version: DUMP_VERSION,
            root,
        }
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        serde_json::to_string_pretty(self).map_err(|e| SnapshotError::encode(DumpFormat::Json, e))
    }

    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let dump: Self =
            serde_json::from_str(json).map_err(|e| SnapshotError::decode(DumpFormat::Json, e))?;
        dump.check_version()
    }

    pub fn to_binary(&self) -> Result<Vec<u8>, SnapshotError> {
        bincode::serialize(self).map_err(|e| SnapshotError::encode(DumpFormat::Binary, e))
    }

    pub fn from_binary(bytes: &[u8]) -> Result<Self, SnapshotError> {
        let dump: Self =
            bincode::deserialize(bytes).map_err(|e| SnapshotError::decode(DumpFormat::Binary, e))?;
        dump.check_version()
    }

    fn check_version(self) -> Result<Self, SnapshotError> {
        if self.version != DUMP_VERSION {
            return Err(SnapshotError::UnsupportedVersion {
                found: self.version,
                supported: DUMP_VERSION,
            });
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
    enum TestKind {
        Root,
        Combat,
        Attack,
    }

    impl StateKind for TestKind {
        fn name(&self) -> &str {
            match self {
                Self::Root => "Root",
                Self::Combat => "Combat",
                Self::Attack => "Attack",
            }
        }
    }

    fn three_levels() -> StateSnapshot<TestKind> {
        let mut combat = StateSnapshot::leaf(TestKind::Combat);
        combat.current = Some(StateId(4));
        combat.substates = vec![StateId(4)];
        combat.active = Some(Box::new(StateSnapshot::leaf(TestKind::Attack)));

        let mut root = StateSnapshot::leaf(TestKind::Root);
        root.current = Some(StateId(1));
        root.prev = Some(StateId(1));
        root.time_activated = Some(Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap());
        root.substates = vec![StateId(1), StateId(2)];
        root.active = Some(Box::new(combat));
        root
    }

    #[test]
    fn leaf_has_no_activity() {
        let leaf = StateSnapshot::leaf(TestKind::Attack);
        assert_eq!(leaf.effective_kind(), TestKind::Attack);
        assert!(leaf.active_path().is_empty());
        assert_eq!(leaf.depth(), 0);
    }

    #[test]
    fn effective_kind_is_deepest_level() {
        assert_eq!(three_levels().effective_kind(), TestKind::Attack);
    }

    #[test]
    fn active_path_walks_down_the_tree() {
        let snapshot = three_levels();
        assert_eq!(snapshot.active_path(), vec![StateId(1), StateId(4)]);
        assert_eq!(snapshot.depth(), 2);
    }

    #[test]
    fn json_dump_roundtrips() {
        let dump = TreeDump::new(three_levels());
        let json = dump.to_json().unwrap();
        let restored: TreeDump<TestKind> = TreeDump::from_json(&json).unwrap();
        assert_eq!(restored.root, dump.root);
        assert_eq!(restored.version, DUMP_VERSION);
    }

    #[test]
    fn binary_dump_roundtrips() {
        let dump = TreeDump::new(three_levels());
        let bytes = dump.to_binary().unwrap();
        let restored: TreeDump<TestKind> = TreeDump::from_binary(&bytes).unwrap();
        assert_eq!(restored.root, dump.root);
    }

    #[test]
    fn future_versions_are_rejected() {
        let mut dump = TreeDump::new(StateSnapshot::leaf(TestKind::Root));
        dump.version = DUMP_VERSION + 1;
        let json = dump.to_json().unwrap();

        let result = TreeDump::<TestKind>::from_json(&json);
        assert!(matches!(
            result,
            Err(SnapshotError::UnsupportedVersion { found, supported })
                if found == DUMP_VERSION + 1 && supported == DUMP_VERSION
        ));
    }

    #[test]
    fn garbage_json_is_a_decode_error() {
        let result = TreeDump::<TestKind>::from_json("{not json");
        assert!(matches!(
            result,
            Err(SnapshotError::Decode {
                format: DumpFormat::Json,
                ..
            })
        ));
    }

    #[test]
    fn truncated_binary_names_its_format() {
        let bytes = TreeDump::new(three_levels()).to_binary().unwrap();

        let err = TreeDump::<TestKind>::from_binary(&bytes[..bytes.len() / 2]).unwrap_err();

        assert!(matches!(
            err,
            SnapshotError::Decode {
                format: DumpFormat::Binary,
                ..
            }
        ));
        assert!(err.to_string().starts_with("Could not read binary tree dump"));
    }
}
