use std::collections::HashSet;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::debug;

use crate::records::errors::DraftError;
use crate::records::id::{MAX_LOCAL_ID, RecordId};

/// A record that can live in a [`Replica`].
pub trait Record {
    fn id(&self) -> RecordId;

    fn set_id(&mut self, id: RecordId);

    /// Keys of records in the same collection this one depends on.
    ///
    /// When a referenced record is deleted, this record is deleted with it.
    fn references(&self) -> Vec<RecordId> {
        Vec::new()
    }
}

/// A local edit to a replica.
#[derive(Debug, Clone, PartialEq)]
pub enum ListAction<T> {
    /// Append a record; its id is replaced with a fresh local id.
    Add(T),
    /// Replace the whole record addressed by `id`. The id is preserved.
    Edit { id: RecordId, record: T },
    /// Remove a record and everything that references it.
    Delete { id: RecordId },
    /// Move a record to position `to` (clamped to the end).
    Move { id: RecordId, to: usize },
    /// Replace the entire collection, as a refresh does.
    Replace(Vec<T>),
}

/// What an applied action changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListChange {
    Added(RecordId),
    Updated(RecordId),
    /// Removed ids in removal order; the addressed record comes first.
    Removed(Vec<RecordId>),
    Moved { id: RecordId, to: usize },
    Replaced { len: usize },
}

/// Ordered collection with unique identity keys.
///
/// Order is insertion order from the last seed/replace plus local edits.
#[derive(Debug, Clone, PartialEq)]
pub struct Replica<T> {
    items: Vec<T>,
    next_local: u64,
}

impl<T> Default for Replica<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            next_local: 1,
        }
    }
}

impl<T: Record> Replica<T> {
    /// Seed a replica from server-provided records.
    pub fn seed(items: Vec<T>) -> Result<Self, DraftError> {
        ensure_unique(&items)?;
        let next_local = next_local_after(&items, 1)?;
        Ok(Self { items, next_local })
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: RecordId) -> Option<&T> {
        self.items.iter().find(|r| r.id() == id)
    }

    pub fn contains(&self, id: RecordId) -> bool {
        self.position(id).is_some()
    }

    pub fn ids(&self) -> impl Iterator<Item = RecordId> + '_ {
        self.items.iter().map(Record::id)
    }

    fn position(&self, id: RecordId) -> Option<usize> {
        self.items.iter().position(|r| r.id() == id)
    }

    /// Allocate the next local id without inserting anything.
    ///
    /// Seeding rejects local ids above [`MAX_LOCAL_ID`], so the counter
    /// starts far below `u64::MAX` and never wraps onto an existing id.
    pub fn allocate_id(&mut self) -> RecordId {
        let id = RecordId::Local(self.next_local);
        self.next_local = self.next_local.saturating_add(1);
        id
    }

    /// Append a record under a fresh local id and return that id.
    pub fn push(&mut self, mut record: T) -> RecordId {
        let id = self.allocate_id();
        record.set_id(id);
        self.items.push(record);
        debug!(event = "core.replica.record_added", id = %id);
        id
    }

    /// Apply an action in place.
    ///
    /// Every precondition is checked before the collection is touched, so a
    /// failed action leaves the replica unchanged.
    pub fn apply(&mut self, action: ListAction<T>) -> Result<ListChange, DraftError> {
        match action {
            ListAction::Add(record) => Ok(ListChange::Added(self.push(record))),
            ListAction::Edit { id, mut record } => {
                let index = self.position(id).ok_or(DraftError::NotFound { id })?;
                record.set_id(id);
                self.items[index] = record;
                debug!(event = "core.replica.record_updated", id = %id);
                Ok(ListChange::Updated(id))
            }
            ListAction::Delete { id } => {
                if !self.contains(id) {
                    return Err(DraftError::NotFound { id });
                }
                let removed = self.remove_cascade(id);
                debug!(
                    event = "core.replica.record_deleted",
                    id = %id,
                    cascaded = removed.len() - 1
                );
                Ok(ListChange::Removed(removed))
            }
            ListAction::Move { id, to } => {
                let from = self.position(id).ok_or(DraftError::NotFound { id })?;
                let record = self.items.remove(from);
                let to = to.min(self.items.len());
                self.items.insert(to, record);
                Ok(ListChange::Moved { id, to })
            }
            ListAction::Replace(items) => {
                ensure_unique(&items)?;
                self.next_local = next_local_after(&items, self.next_local)?;
                let len = items.len();
                self.items = items;
                debug!(event = "core.replica.replaced", len = len);
                Ok(ListChange::Replaced { len })
            }
        }
    }

    /// Remove `id` and, transitively, every record that references a removed one.
    fn remove_cascade(&mut self, id: RecordId) -> Vec<RecordId> {
        let mut removed = vec![id];
        let mut doomed: HashSet<RecordId> = HashSet::from([id]);

        loop {
            let newly: Vec<RecordId> = self
                .items
                .iter()
                .filter(|r| !doomed.contains(&r.id()))
                .filter(|r| r.references().iter().any(|dep| doomed.contains(dep)))
                .map(Record::id)
                .collect();
            if newly.is_empty() {
                break;
            }
            for dep in newly {
                doomed.insert(dep);
                removed.push(dep);
            }
        }

        self.items.retain(|r| !doomed.contains(&r.id()));
        removed
    }

    /// Remove every record matching `pred`, cascading within this replica.
    ///
    /// Used when the dependency lives in another collection, e.g. the
    /// connections of a deleted node.
    pub fn remove_where<F>(&mut self, pred: F) -> Vec<RecordId>
    where
        F: Fn(&T) -> bool,
    {
        let matching: Vec<RecordId> = self
            .items
            .iter()
            .filter(|r| pred(r))
            .map(Record::id)
            .collect();

        let mut removed = Vec::new();
        for id in matching {
            if self.contains(id) {
                removed.extend(self.remove_cascade(id));
            }
        }
        removed
    }
}

impl<T: Record + Clone> Replica<T> {
    /// Pure reducer: `(state, action) -> state`.
    ///
    /// The input replica is never modified.
    pub fn reduce(&self, action: ListAction<T>) -> Result<Replica<T>, DraftError> {
        let mut next = self.clone();
        next.apply(action)?;
        Ok(next)
    }
}

fn ensure_unique<T: Record>(items: &[T]) -> Result<(), DraftError> {
    let mut seen = HashSet::with_capacity(items.len());
    for item in items {
        if !seen.insert(item.id()) {
            return Err(DraftError::DuplicateId { id: item.id() });
        }
    }
    Ok(())
}

/// First local id above every local id in `items`, never below `floor`.
fn next_local_after<T: Record>(items: &[T], floor: u64) -> Result<u64, DraftError> {
    let mut next = floor;
    for item in items {
        if let RecordId::Local(n) = item.id() {
            if n > MAX_LOCAL_ID {
                return Err(DraftError::InvalidId {
                    value: item.id().to_string(),
                });
            }
            next = next.max(n + 1);
        }
    }
    Ok(next)
}

impl<T: Serialize> Serialize for Replica<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.items.serialize(serializer)
    }
}

impl<'de, T: Record + Deserialize<'de>> Deserialize<'de> for Replica<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let items = Vec::<T>::deserialize(deserializer)?;
        Replica::seed(items).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Row {
        id: RecordId,
        parent: Option<RecordId>,
        title: String,
    }

    impl Record for Row {
        fn id(&self) -> RecordId {
            self.id
        }

        fn set_id(&mut self, id: RecordId) {
            self.id = id;
        }

        fn references(&self) -> Vec<RecordId> {
            self.parent.into_iter().collect()
        }
    }

    fn row(id: i64, parent: Option<i64>, title: &str) -> Row {
        Row {
            id: RecordId::Server(id),
            parent: parent.map(RecordId::Server),
            title: title.to_string(),
        }
    }

    #[test]
    fn test_seed_rejects_duplicate_ids() {
        let result = Replica::seed(vec![row(1, None, "a"), row(1, None, "b")]);
        assert!(matches!(
            result,
            Err(DraftError::DuplicateId {
                id: RecordId::Server(1)
            })
        ));
    }

    #[test]
    fn test_add_assigns_local_ids() {
        let mut replica = Replica::seed(vec![row(1, None, "a")]).unwrap();
        let first = replica.apply(ListAction::Add(row(999, None, "new"))).unwrap();
        let second = replica.apply(ListAction::Add(row(1, None, "newer"))).unwrap();

        assert_eq!(first, ListChange::Added(RecordId::Local(1)));
        assert_eq!(second, ListChange::Added(RecordId::Local(2)));
        assert_eq!(replica.len(), 3);
        assert!(replica.contains(RecordId::Server(1)));
    }

    #[test]
    fn test_seed_with_local_ids_continues_counter() {
        let mut seeded = row(0, None, "draft");
        seeded.id = RecordId::Local(7);
        let mut replica = Replica::seed(vec![seeded]).unwrap();
        assert_eq!(replica.allocate_id(), RecordId::Local(8));
    }

    #[test]
    fn test_seed_rejects_local_id_without_headroom() {
        let mut seeded = row(0, None, "draft");
        seeded.id = RecordId::Local(u64::MAX);
        assert!(matches!(
            Replica::seed(vec![seeded.clone()]),
            Err(DraftError::InvalidId { .. })
        ));

        let mut replica = Replica::seed(vec![row(1, None, "kept")]).unwrap();
        assert!(replica.apply(ListAction::Replace(vec![seeded])).is_err());
        assert_eq!(replica.len(), 1);
    }

    #[test]
    fn test_deserialize_rejects_out_of_range_local_id() {
        let result: Result<Replica<Row>, _> = serde_json::from_str(
            r#"[{"id": "local-18446744073709551615", "parent": null, "title": "x"}]"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_edit_replaces_whole_record_and_keeps_id() {
        let mut replica = Replica::seed(vec![row(1, None, "a"), row(2, None, "b")]).unwrap();
        replica
            .apply(ListAction::Edit {
                id: RecordId::Server(2),
                record: row(50, None, "renamed"),
            })
            .unwrap();

        let edited = replica.get(RecordId::Server(2)).unwrap();
        assert_eq!(edited.title, "renamed");
        assert!(replica.get(RecordId::Server(50)).is_none());
        assert_eq!(replica.items()[1].id, RecordId::Server(2));
    }

    #[test]
    fn test_edit_unknown_id_leaves_state_untouched() {
        let mut replica = Replica::seed(vec![row(1, None, "a")]).unwrap();
        let before = replica.clone();
        let err = replica
            .apply(ListAction::Edit {
                id: RecordId::Server(9),
                record: row(9, None, "x"),
            })
            .unwrap_err();
        assert!(matches!(err, DraftError::NotFound { .. }));
        assert_eq!(replica, before);
    }

    #[test]
    fn test_delete_cascades_transitively() {
        let mut replica = Replica::seed(vec![
            row(1, None, "root"),
            row(2, Some(1), "child"),
            row(3, Some(2), "grandchild"),
            row(4, None, "other"),
        ])
        .unwrap();

        let change = replica
            .apply(ListAction::Delete {
                id: RecordId::Server(1),
            })
            .unwrap();

        assert_eq!(
            change,
            ListChange::Removed(vec![
                RecordId::Server(1),
                RecordId::Server(2),
                RecordId::Server(3)
            ])
        );
        assert_eq!(replica.ids().collect::<Vec<_>>(), vec![RecordId::Server(4)]);
    }

    #[test]
    fn test_remove_where_cascades_within_collection() {
        let mut replica = Replica::seed(vec![
            row(1, None, "keep"),
            row(2, None, "drop"),
            row(3, Some(2), "child of drop"),
        ])
        .unwrap();
        let removed = replica.remove_where(|r| r.title == "drop");
        assert_eq!(removed, vec![RecordId::Server(2), RecordId::Server(3)]);
        assert_eq!(replica.len(), 1);
    }

    #[test]
    fn test_move_clamps_target() {
        let mut replica =
            Replica::seed(vec![row(1, None, "a"), row(2, None, "b"), row(3, None, "c")]).unwrap();
        replica
            .apply(ListAction::Move {
                id: RecordId::Server(1),
                to: 99,
            })
            .unwrap();
        assert_eq!(
            replica.ids().collect::<Vec<_>>(),
            vec![RecordId::Server(2), RecordId::Server(3), RecordId::Server(1)]
        );
    }

    #[test]
    fn test_replace_keeps_local_counter_monotonic() {
        let mut replica: Replica<Row> = Replica::default();
        replica.apply(ListAction::Add(row(0, None, "a"))).unwrap();
        replica
            .apply(ListAction::Replace(vec![row(10, None, "fresh")]))
            .unwrap();
        let change = replica.apply(ListAction::Add(row(0, None, "b"))).unwrap();
        assert_eq!(change, ListChange::Added(RecordId::Local(2)));
    }

    #[test]
    fn test_reduce_does_not_touch_input() {
        let replica = Replica::seed(vec![row(1, None, "a")]).unwrap();
        let next = replica
            .reduce(ListAction::Delete {
                id: RecordId::Server(1),
            })
            .unwrap();
        assert_eq!(replica.len(), 1);
        assert!(next.is_empty());
    }

    #[test]
    fn test_deserialize_rejects_duplicates() {
        let json = r#"[{"id": 1, "parent": null, "title": "a"}, {"id": 1, "parent": null, "title": "b"}]"#;
        assert!(serde_json::from_str::<Replica<Row>>(json).is_err());
    }

    proptest! {
        #[test]
        fn prop_delete_leaves_no_reference_to_removed(
            parents in proptest::collection::vec(proptest::option::of(0usize..20), 1..20),
            victim in 0usize..20,
        ) {
            let rows: Vec<Row> = parents
                .iter()
                .enumerate()
                .map(|(i, p)| row(i as i64, p.filter(|p| *p != i).map(|p| p as i64), "r"))
                .collect();
            let victim = RecordId::Server((victim % rows.len()) as i64);
            let mut replica = Replica::seed(rows).unwrap();

            let removed = match replica.apply(ListAction::Delete { id: victim }).unwrap() {
                ListChange::Removed(ids) => ids,
                other => panic!("unexpected change {:?}", other),
            };

            prop_assert!(!replica.contains(victim));
            for r in replica.items() {
                for dep in r.references() {
                    prop_assert!(!removed.contains(&dep));
                }
            }
        }
    }
}
