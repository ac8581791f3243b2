//! Atomically replaced message-history snapshot.

use super::message::MessageHistoryItem;

/// The displayed history: always the most recent successful fetch's full
/// list, sorted newest-first. A failed fetch never touches the previous
/// snapshot; callers replace it wholesale or not at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistorySnapshot {
    items: Vec<MessageHistoryItem>,
}

impl HistorySnapshot {
    /// Builds a snapshot from a freshly fetched list, sorting it
    /// non-increasing by `created_at` falling back to `timestamp`. The sort
    /// is stable, so ties keep their fetch order.
    #[must_use]
    pub fn from_fetch(mut items: Vec<MessageHistoryItem>) -> Self {
        items.sort_by(|a, b| b.effective_time().cmp(&a.effective_time()));
        Self { items }
    }

    /// Returns the sorted items, newest first.
    #[must_use]
    pub fn items(&self) -> &[MessageHistoryItem] {
        &self.items
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when no successful fetch has populated the snapshot yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn item(id: &str, minutes_ago: i64, created_minutes_ago: Option<i64>) -> MessageHistoryItem {
        let now = Utc::now();
        MessageHistoryItem {
            id: id.to_string(),
            content: format!("message {id}"),
            sender: "web-app".to_string(),
            recipient: "+18777804236".to_string(),
            timestamp: now - Duration::minutes(minutes_ago),
            created_at: created_minutes_ago.map(|m| now - Duration::minutes(m)),
            updated_at: None,
            status: None,
            user_id: None,
        }
    }

    fn ids(snapshot: &HistorySnapshot) -> Vec<&str> {
        snapshot.items().iter().map(|m| m.id.as_str()).collect()
    }

    #[test]
    fn test_sorted_newest_first_by_created_at() {
        let snapshot =
            HistorySnapshot::from_fetch(vec![item("old", 0, Some(30)), item("new", 60, Some(1))]);
        assert_eq!(ids(&snapshot), vec!["new", "old"]);
    }

    #[test]
    fn test_falls_back_to_timestamp() {
        let snapshot = HistorySnapshot::from_fetch(vec![
            item("a", 20, None),
            item("b", 5, None),
            item("c", 10, Some(2)),
        ]);
        assert_eq!(ids(&snapshot), vec!["c", "b", "a"]);
    }

    #[test]
    fn test_ordering_is_non_increasing() {
        let snapshot = HistorySnapshot::from_fetch(vec![
            item("a", 3, None),
            item("b", 50, Some(4)),
            item("c", 1, None),
            item("d", 2, Some(90)),
        ]);
        let times: Vec<_> = snapshot.items().iter().map(|m| m.effective_time()).collect();
        assert!(times.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_ties_keep_fetch_order() {
        let shared = item("first", 10, Some(10));
        let mut second = shared.clone();
        second.id = "second".to_string();
        let mut third = shared.clone();
        third.id = "third".to_string();

        let snapshot = HistorySnapshot::from_fetch(vec![shared, second, third]);
        assert_eq!(ids(&snapshot), vec!["first", "second", "third"]);
    }
}
