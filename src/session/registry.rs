//! Ordered, index-addressed subtopic collection.

use serde::{Deserialize, Serialize};

use super::types::{SubtopicEntry, SubtopicStatus};

/// Subtopics in presentation order.
///
/// Cardinality only changes through [`SubtopicRegistry::replace`]; entries
/// are otherwise patched in place by index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubtopicRegistry {
    entries: Vec<SubtopicEntry>,
}

impl SubtopicRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry of pending entries.
    pub fn from_topics<I, T>(topics: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let mut registry = Self::new();
        registry.replace(topics);
        registry
    }

    /// Discard every entry and start over with pending entries for `topics`.
    pub fn replace<I, T>(&mut self, topics: I)
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.entries = topics
            .into_iter()
            .enumerate()
            .map(|(index, topic)| SubtopicEntry::pending(index, topic))
            .collect();
    }

    /// Get the entry at `index`.
    pub fn get(&self, index: usize) -> Option<&SubtopicEntry> {
        self.entries.get(index)
    }

    /// Set the status at `index`. Returns `false` when the index is out of range.
    pub fn set_status(&mut self, index: usize, status: SubtopicStatus) -> bool {
        match self.entries.get_mut(index) {
            Some(entry) => {
                entry.status = status;
                true
            }
            None => false,
        }
    }

    /// All entries in order.
    pub fn all(&self) -> &[SubtopicEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries with `status`.
    pub fn count(&self, status: SubtopicStatus) -> usize {
        self.entries.iter().filter(|e| e.status == status).count()
    }

    /// Whether every entry reached a terminal status.
    pub fn is_settled(&self) -> bool {
        self.entries.iter().all(|e| e.status.is_terminal())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_topics_all_pending() {
        let registry = SubtopicRegistry::from_topics(["a", "b", "c"]);
        assert_eq!(registry.len(), 3);
        for (i, entry) in registry.all().iter().enumerate() {
            assert_eq!(entry.index, i);
            assert_eq!(entry.status, SubtopicStatus::Pending);
        }
        assert_eq!(registry.get(1).map(|e| e.topic.as_str()), Some("b"));
    }

    #[test]
    fn test_set_status() {
        let mut registry = SubtopicRegistry::from_topics(["a", "b"]);
        assert!(registry.set_status(0, SubtopicStatus::Complete));
        assert_eq!(registry.get(0).unwrap().status, SubtopicStatus::Complete);
        assert_eq!(registry.get(1).unwrap().status, SubtopicStatus::Pending);
    }

    #[test]
    fn test_set_status_out_of_range() {
        let mut registry = SubtopicRegistry::from_topics(["a"]);
        let before = registry.clone();
        assert!(!registry.set_status(1, SubtopicStatus::Complete));
        assert!(!registry.set_status(usize::MAX, SubtopicStatus::Error));
        assert_eq!(registry, before);
    }

    #[test]
    fn test_replace_discards_statuses() {
        let mut registry = SubtopicRegistry::from_topics(["a", "b"]);
        registry.set_status(1, SubtopicStatus::InProgress);

        registry.replace(["x", "y", "z"]);
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.count(SubtopicStatus::Pending), 3);
        assert_eq!(registry.get(1).unwrap().topic, "y");
    }

    #[test]
    fn test_counts_and_settled() {
        let mut registry = SubtopicRegistry::from_topics(["a", "b"]);
        assert!(!registry.is_settled());
        registry.set_status(0, SubtopicStatus::Complete);
        registry.set_status(1, SubtopicStatus::Error);
        assert!(registry.is_settled());
        assert_eq!(registry.count(SubtopicStatus::Complete), 1);
        assert!(SubtopicRegistry::new().is_settled());
    }
}
