// Round records and the newest-first draw history.

use std::collections::{HashSet, VecDeque};

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// One completed draw. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundRecord {
    /// Opaque unique identifier.
    pub id: String,
    /// Sequential round number, starting at 1.
    pub round: u32,
    /// Winners in reveal order.
    pub winners: Vec<String>,
    /// When the round completed.
    pub timestamp: DateTime<Utc>,
}

impl RoundRecord {
    /// Create a record with a fresh random id.
    pub fn new(round: u32, winners: Vec<String>, timestamp: DateTime<Utc>) -> Self {
        RoundRecord {
            id: Uuid::new_v4().simple().to_string(),
            round,
            winners,
            timestamp,
        }
    }
}

/// All rounds of the session, newest first.
///
/// The only mutations are prepending a new round and clearing everything.
#[derive(Debug, Clone, Default)]
pub struct History {
    rounds: VecDeque<RoundRecord>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rounds.is_empty()
    }

    /// Newest-first iteration.
    pub fn iter(&self) -> impl Iterator<Item = &RoundRecord> {
        self.rounds.iter()
    }

    /// The most recent round, if any.
    pub fn latest(&self) -> Option<&RoundRecord> {
        self.rounds.front()
    }

    /// Number the next round will receive.
    pub fn next_round(&self) -> u32 {
        self.rounds.len() as u32 + 1
    }

    /// Prepend a round and return a reference to it.
    pub(crate) fn prepend(&mut self, record: RoundRecord) -> &RoundRecord {
        self.rounds.push_front(record);
        &self.rounds[0]
    }

    pub(crate) fn clear(&mut self) {
        self.rounds.clear();
    }

    /// Union of every winner across all rounds.
    pub fn all_winners(&self) -> HashSet<&str> {
        self.rounds
            .iter()
            .flat_map(|r| r.winners.iter().map(String::as_str))
            .collect()
    }

    /// Total number of winner slots across all rounds.
    pub fn total_winners(&self) -> usize {
        self.rounds.iter().map(|r| r.winners.len()).sum()
    }
}

impl<'a> IntoIterator for &'a History {
    type Item = &'a RoundRecord;
    type IntoIter = std::collections::vec_deque::Iter<'a, RoundRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.rounds.iter()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn record(round: u32, winners: &[&str]) -> RoundRecord {
        RoundRecord::new(
            round,
            winners.iter().map(|s| s.to_string()).collect(),
            Utc::now(),
        )
    }

    #[test]
    fn new_history_is_empty() {
        let history = History::new();
        assert!(history.is_empty());
        assert_eq!(history.next_round(), 1);
        assert!(history.latest().is_none());
    }

    #[test]
    fn prepend_puts_newest_first() {
        let mut history = History::new();
        history.prepend(record(1, &["Bob"]));
        history.prepend(record(2, &["Amy", "Cy"]));
        let rounds: Vec<u32> = history.iter().map(|r| r.round).collect();
        assert_eq!(rounds, vec![2, 1]);
        assert_eq!(history.latest().map(|r| r.round), Some(2));
        assert_eq!(history.next_round(), 3);
        assert_eq!(history.total_winners(), 3);
    }

    #[test]
    fn all_winners_is_a_union() {
        let mut history = History::new();
        history.prepend(record(1, &["Bob", "Amy"]));
        history.prepend(record(2, &["Amy"]));
        let winners = history.all_winners();
        assert_eq!(winners.len(), 2);
        assert!(winners.contains("Bob"));
        assert!(winners.contains("Amy"));
    }

    #[test]
    fn record_ids_are_unique() {
        let a = record(1, &["x"]);
        let b = record(1, &["x"]);
        assert_ne!(a.id, b.id);
        assert!(!a.id.is_empty());
    }

    #[test]
    fn clear_empties_history() {
        let mut history = History::new();
        history.prepend(record(1, &["Bob"]));
        history.clear();
        assert!(history.is_empty());
        assert_eq!(history.next_round(), 1);
    }
}
