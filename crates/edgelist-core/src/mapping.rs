use crate::error::IdSpaceExhausted;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::trace;

/// Dense identifier assigned to a label on first sight.
pub type NodeId = u64;

/// One entry of a mapping table snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Mapping {
    pub label: String,
    pub id: NodeId,
}

#[derive(Debug, Default)]
struct Labels {
    label_to_id: HashMap<Arc<str>, NodeId>,
    // Position `i` holds the label that owns id `base + i`.
    id_to_label: Vec<Arc<str>>,
}

/// Insertion-ordered bijection between observed labels and the contiguous
/// range `[base, base + len)`.
///
/// Entries are only ever added. Resolution takes `&self`: the check and the
/// insert happen under one write lock, so a table shared between threads
/// still hands out each id exactly once.
#[derive(Debug)]
pub struct MappingTable {
    base: NodeId,
    labels: RwLock<Labels>,
}

impl Default for MappingTable {
    fn default() -> Self {
        Self::new()
    }
}

impl MappingTable {
    pub fn new() -> Self {
        Self::with_base(0)
    }

    pub fn with_base(base: NodeId) -> Self {
        Self {
            base,
            labels: RwLock::new(Labels::default()),
        }
    }

    // Every mutation completes inside a single critical section, so a
    // poisoned lock still guards a consistent table.
    fn read(&self) -> RwLockReadGuard<'_, Labels> {
        self.labels.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Labels> {
        self.labels.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn id_at(&self, index: usize) -> Option<NodeId> {
        self.base.checked_add(NodeId::try_from(index).ok()?)
    }

    /// Return the id of `label`, assigning the next free one if it is new.
    ///
    /// Fails only when a new label would need an id past `NodeId::MAX`;
    /// the table is left unchanged in that case.
    pub fn resolve(&self, label: &str) -> Result<NodeId, IdSpaceExhausted> {
        {
            let labels = self.read();
            if let Some(&id) = labels.label_to_id.get(label) {
                return Ok(id);
            }
        }

        let mut labels = self.write();
        if let Some(&id) = labels.label_to_id.get(label) {
            return Ok(id);
        }

        let id = self
            .id_at(labels.id_to_label.len())
            .ok_or(IdSpaceExhausted { base: self.base })?;
        let label: Arc<str> = Arc::from(label);
        labels.label_to_id.insert(Arc::clone(&label), id);
        labels.id_to_label.push(label);
        trace!(id, "assigned fresh id");
        Ok(id)
    }

    pub fn id_of(&self, label: &str) -> Option<NodeId> {
        self.read().label_to_id.get(label).copied()
    }

    pub fn label_of(&self, id: NodeId) -> Option<Arc<str>> {
        let index = usize::try_from(id.checked_sub(self.base)?).ok()?;
        self.read().id_to_label.get(index).cloned()
    }

    /// Current contents in id order. Reflects live state at the time of the call.
    pub fn snapshot(&self) -> Vec<Mapping> {
        let labels = self.read();
        labels
            .id_to_label
            .iter()
            .enumerate()
            .map(|(index, label)| Mapping {
                label: label.to_string(),
                // every stored index was assigned, so it is in range
                id: self.base + index as NodeId,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.read().id_to_label.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The id the next unseen label will receive, if any is left.
    pub fn next_id(&self) -> Option<NodeId> {
        self.id_at(self.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::thread;

    #[test]
    fn ids_follow_first_sight() {
        let table = MappingTable::new();
        assert_eq!(table.resolve("b"), Ok(0));
        assert_eq!(table.resolve("a"), Ok(1));
        assert_eq!(table.resolve("b"), Ok(0));
        assert_eq!(table.resolve("c"), Ok(2));
        assert_eq!(table.len(), 3);
        assert_eq!(table.next_id(), Some(3));
    }

    #[test]
    fn labels_are_compared_byte_for_byte() {
        let table = MappingTable::new();
        let upper = table.resolve("Node").unwrap();
        let lower = table.resolve("node").unwrap();
        assert_ne!(upper, lower);
    }

    #[test]
    fn base_offsets_the_whole_range() {
        let table = MappingTable::with_base(100);
        table.resolve("x").unwrap();
        table.resolve("y").unwrap();
        assert_eq!(table.id_of("y"), Some(101));
        assert_eq!(table.label_of(100).as_deref(), Some("x"));
        assert_eq!(table.label_of(99), None);
        assert_eq!(table.label_of(102), None);
    }

    #[test]
    fn snapshot_is_in_id_order() {
        let table = MappingTable::new();
        for label in ["z", "y", "x", "y"] {
            table.resolve(label).unwrap();
        }
        let snapshot = table.snapshot();
        let labels: Vec<_> = snapshot.iter().map(|m| m.label.as_str()).collect();
        let ids: Vec<_> = snapshot.iter().map(|m| m.id).collect();
        assert_eq!(labels, ["z", "y", "x"]);
        assert_eq!(ids, [0, 1, 2]);
    }

    #[test]
    fn concurrent_resolution_keeps_the_bijection() {
        let table = Arc::new(MappingTable::new());
        let threads = 8;
        let per_thread = 500;

        thread::scope(|scope| {
            for _ in 0..threads {
                let table = Arc::clone(&table);
                scope.spawn(move || {
                    for i in 0..per_thread {
                        table.resolve(&format!("n{i}")).unwrap();
                    }
                });
            }
        });

        assert_eq!(table.len(), per_thread);
        let ids: HashSet<_> = table.snapshot().into_iter().map(|m| m.id).collect();
        assert_eq!(ids, (0..per_thread as NodeId).collect::<HashSet<_>>());
        for i in 0..per_thread {
            let label = format!("n{i}");
            let id = table.id_of(&label).unwrap();
            assert_eq!(table.label_of(id).as_deref(), Some(label.as_str()));
        }
    }

    #[test]
    fn last_id_is_usable_and_then_exhausted() {
        let table = MappingTable::with_base(NodeId::MAX - 1);
        assert_eq!(table.resolve("a"), Ok(NodeId::MAX - 1));
        assert_eq!(table.resolve("b"), Ok(NodeId::MAX));
        assert_eq!(table.next_id(), None);
        assert_eq!(
            table.resolve("c"),
            Err(IdSpaceExhausted { base: NodeId::MAX - 1 })
        );
        // known labels still resolve once the range is full
        assert_eq!(table.resolve("a"), Ok(NodeId::MAX - 1));
        assert_eq!(table.len(), 2);
        let ids: Vec<_> = table.snapshot().into_iter().map(|m| m.id).collect();
        assert_eq!(ids, [NodeId::MAX - 1, NodeId::MAX]);
    }
}
