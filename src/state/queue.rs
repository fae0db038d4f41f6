use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Ordered post IDs awaiting deletion. Retrieval appends to the back,
/// deletion drains from the front. Serializes as a plain JSON array so the
/// state file stays hand-inspectable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PendingQueue {
    ids: Vec<String>,
}

impl PendingQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    /// Appends the IDs not already queued, preserving arrival order.
    /// Returns how many were actually added.
    pub fn append_unique<I>(&mut self, ids: I) -> usize
    where
        I: IntoIterator<Item = String>,
    {
        let mut seen: HashSet<String> = self.ids.iter().cloned().collect();
        let mut added = 0;
        for id in ids {
            if seen.insert(id.clone()) {
                self.ids.push(id);
                added += 1;
            }
        }
        added
    }

    pub fn front(&self) -> Option<&str> {
        self.ids.first().map(String::as_str)
    }

    pub fn pop_front(&mut self) -> Option<String> {
        if self.ids.is_empty() {
            None
        } else {
            Some(self.ids.remove(0))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn queue_of(ids: &[&str]) -> PendingQueue {
        let mut queue = PendingQueue::new();
        queue.append_unique(ids.iter().map(|id| id.to_string()));
        queue
    }

    #[test]
    fn append_unique_filters_already_queued_ids() {
        let mut queue = queue_of(&["a", "b"]);
        let added = queue.append_unique(vec![
            "b".to_string(),
            "c".to_string(),
            "a".to_string(),
            "c".to_string(),
        ]);
        assert_eq!(added, 1);
        assert_eq!(queue.ids(), ["a", "b", "c"]);
    }

    #[test]
    fn drains_from_the_front_in_arrival_order() {
        let mut queue = queue_of(&["a", "b", "c"]);
        assert_eq!(queue.front(), Some("a"));
        assert_eq!(queue.pop_front().as_deref(), Some("a"));
        assert_eq!(queue.pop_front().as_deref(), Some("b"));
        assert_eq!(queue.pop_front().as_deref(), Some("c"));
        assert_eq!(queue.pop_front(), None);
        assert!(queue.is_empty());
    }

    #[test]
    fn serializes_as_a_plain_json_array() {
        let queue = queue_of(&["1", "2"]);
        let json = serde_json::to_string(&queue).unwrap();
        assert_eq!(json, r#"["1","2"]"#);

        let parsed: PendingQueue = serde_json::from_str(r#"["9","8"]"#).unwrap();
        assert_eq!(parsed.ids(), ["9", "8"]);
    }
}
