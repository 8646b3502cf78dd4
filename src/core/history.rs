//! Selection history tracking.
//!
//! Every node keeps a short, bounded log of how its active substate changed.
//! Records are stamped with the node's tick counter rather than wall time, so
//! logging never touches the clock.

use super::id::StateId;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Default number of records a node keeps.
pub const DEFAULT_HISTORY_CAPACITY: usize = 32;

/// Why the active substate changed.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum SelectionCause {
    /// Chosen by `reselect_state` because nothing was active.
    Reselect,
    /// Chosen by `check_force_state`, pre-empting the active substate.
    Forced,
    /// Selected through a direct `select` call.
    Manual,
    /// The active substate reported completion and was finalized.
    Completed,
    /// The node was torn down by `critical_finalize`.
    Interrupted,
}

/// Record of a single selection change.
///
/// # Example
///
/// ```rust
/// use substate::core::{SelectionCause, SelectionRecord, StateId};
///
/// let record = SelectionRecord {
///     tick: 3,
///     from: Some(StateId(1)),
///     to: Some(StateId(2)),
///     cause: SelectionCause::Forced,
/// };
/// assert!(record.is_switch());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct SelectionRecord {
    /// Number of `execute()` calls the node had started when this happened
    pub tick: u64,
    /// The substate that was active before
    pub from: Option<StateId>,
    /// The substate active afterwards
    pub to: Option<StateId>,
    /// What triggered the change
    pub cause: SelectionCause,
}

impl SelectionRecord {
    /// True when one substate was replaced directly by another.
    pub fn is_switch(&self) -> bool {
        self.from.is_some() && self.to.is_some()
    }
}

/// Bounded, ordered log of selection changes.
///
/// Oldest records are dropped once `capacity` is reached. A capacity of zero
/// turns recording off.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SelectionHistory {
    records: VecDeque<SelectionRecord>,
    capacity: usize,
}

impl Default for SelectionHistory {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }
}

impl SelectionHistory {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: VecDeque::new(),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Append a record, evicting the oldest one if full.
    pub fn record(&mut self, record: SelectionRecord) {
        if self.capacity == 0 {
            return;
        }
        if self.records.len() == self.capacity {
            self.records.pop_front();
        }
        self.records.push_back(record);
    }

    /// Records from oldest to newest.
    pub fn records(&self) -> impl Iterator<Item = &SelectionRecord> {
        self.records.iter()
    }

    pub fn last(&self) -> Option<&SelectionRecord> {
        self.records.back()
    }

    /// Substates that became active, in order.
    ///
    /// Completions and interruptions do not add an entry.
    ///
    /// ```rust
    /// use substate::core::{SelectionCause, SelectionHistory, SelectionRecord, StateId};
    ///
    /// let mut history = SelectionHistory::default();
    /// history.record(SelectionRecord {
    ///     tick: 0,
    ///     from: None,
    ///     to: Some(StateId(1)),
    ///     cause: SelectionCause::Reselect,
    /// });
    /// history.record(SelectionRecord {
    ///     tick: 2,
    ///     from: Some(StateId(1)),
    ///     to: None,
    ///     cause: SelectionCause::Completed,
    /// });
    /// history.record(SelectionRecord {
    ///     tick: 3,
    ///     from: None,
    ///     to: Some(StateId(2)),
    ///     cause: SelectionCause::Reselect,
    /// });
    ///
    /// assert_eq!(history.path(), vec![StateId(1), StateId(2)]);
    /// ```
    pub fn path(&self) -> Vec<StateId> {
        self.records.iter().filter_map(|r| r.to).collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selected(tick: u64, from: Option<u32>, to: u32) -> SelectionRecord {
        SelectionRecord {
            tick,
            from: from.map(StateId),
            to: Some(StateId(to)),
            cause: SelectionCause::Reselect,
        }
    }

    #[test]
    fn new_history_is_empty() {
        let history = SelectionHistory::default();
        assert!(history.is_empty());
        assert!(history.last().is_none());
        assert!(history.path().is_empty());
        assert_eq!(history.capacity(), DEFAULT_HISTORY_CAPACITY);
    }

    #[test]
    fn record_keeps_order() {
        let mut history = SelectionHistory::default();
        history.record(selected(0, None, 1));
        history.record(selected(4, Some(1), 2));

        let ticks: Vec<u64> = history.records().map(|r| r.tick).collect();
        assert_eq!(ticks, vec![0, 4]);
        assert_eq!(history.last().map(|r| r.tick), Some(4));
    }

    #[test]
    fn oldest_records_are_evicted() {
        let mut history = SelectionHistory::with_capacity(2);
        history.record(selected(0, None, 1));
        history.record(selected(1, Some(1), 2));
        history.record(selected(2, Some(2), 3));

        assert_eq!(history.len(), 2);
        assert_eq!(history.path(), vec![StateId(2), StateId(3)]);
    }

    #[test]
    fn zero_capacity_disables_recording() {
        let mut history = SelectionHistory::with_capacity(0);
        history.record(selected(0, None, 1));
        assert!(history.is_empty());
    }

    #[test]
    fn clear_drops_everything() {
        let mut history = SelectionHistory::default();
        history.record(selected(0, None, 1));
        history.clear();
        assert!(history.is_empty());
    }

    #[test]
    fn is_switch_requires_both_ends() {
        assert!(!selected(0, None, 1).is_switch());
        assert!(selected(0, Some(1), 2).is_switch());
    }

    #[test]
    fn history_serializes_correctly() {
        let mut history = SelectionHistory::with_capacity(4);
        history.record(selected(0, None, 1));

        let json = serde_json::to_string(&history).unwrap();
        let deserialized: SelectionHistory = serde_json::from_str(&json).unwrap();

        assert_eq!(deserialized.len(), 1);
        assert_eq!(deserialized.capacity(), 4);
    }

    #[test]
    fn unbounded_capacity_grows_on_demand() {
        let mut history = SelectionHistory::with_capacity(usize::MAX);
        assert!(history.is_empty());

        history.record(selected(1, None, 0));
        history.record(selected(2, Some(0), 1));

        assert_eq!(history.len(), 2);
        assert_eq!(history.capacity(), usize::MAX);
    }
}
