//! Slot-chain operations on array and object collections.

use super::{Arena, NodeId};
use crate::data::{Collection, JsonStr, Payload, ValueKind};
use crate::error::{ErrorCode, VariantResult};

impl Arena {
    /// Slot following `slot` in its collection.
    pub(crate) fn next_slot(&self, slot: NodeId) -> Option<NodeId> {
        self.read(slot, |node| node.next)
    }

    /// Key of an object slot.
    pub(crate) fn slot_key(&self, slot: NodeId) -> Option<JsonStr> {
        self.read(slot, |node| node.key.clone())
    }

    /// Number of slots in a collection.
    pub(crate) fn collection_len(&self, collection: Collection) -> usize {
        let mut count = 0;
        let mut cursor = collection.head;
        while let Some(slot) = cursor {
            count += 1;
            cursor = self.next_slot(slot);
        }
        count
    }

    /// Slot at `index`, if the collection is that long.
    pub(crate) fn element_at(&self, collection: Collection, index: usize) -> Option<NodeId> {
        let mut cursor = collection.head;
        for _ in 0..index {
            cursor = self.next_slot(cursor?);
        }
        cursor
    }

    /// First slot whose key equals `key` byte for byte.
    pub(crate) fn member_named(&self, collection: Collection, key: &str) -> Option<NodeId> {
        let mut cursor = collection.head;
        while let Some(slot) = cursor {
            let (matches, next) = self.read(slot, |node| {
                (node.key.as_deref() == Some(key), node.next)
            });
            if matches {
                return Some(slot);
            }
            cursor = next;
        }
        None
    }

    /// Collection owned by `id` itself (links are not followed).
    pub(crate) fn own_collection(&self, id: NodeId) -> Option<(ValueKind, Collection)> {
        self.read(id, |node| {
            if node.link.is_some() {
                return None;
            }
            match node.payload {
                Payload::Array(c) => Some((ValueKind::Array, c)),
                Payload::Object(c) => Some((ValueKind::Object, c)),
                _ => None,
            }
        })
    }

    /// Collection of kind `kind` owned by `id`, turning a null node into an
    /// empty one first.
    pub(crate) fn own_collection_or_init(
        &self,
        id: NodeId,
        kind: ValueKind,
    ) -> VariantResult<Collection> {
        self.write(id, |node| {
            if node.link.is_some() {
                return Err(ErrorCode::E003_IncompatibleContainer("link"));
            }
            if node.payload.is_null() {
                node.payload = match kind {
                    ValueKind::Object => Payload::Object(Collection::default()),
                    _ => Payload::Array(Collection::default()),
                };
                return Ok(Collection::default());
            }
            match node.payload.collection() {
                Some(c) if node.payload.kind() == kind => Ok(c),
                _ => Err(ErrorCode::E003_IncompatibleContainer(
                    node.payload.kind().name(),
                )),
            }
        })
    }

    /// Replace the collection stored in `owner`, keeping its kind.
    fn store_collection(&self, owner: NodeId, collection: Collection) {
        self.write(owner, |node| match &mut node.payload {
            Payload::Array(c) | Payload::Object(c) => *c = collection,
            _ => {}
        });
    }

    /// Append `slot` to a collection that is not yet attached to any node.
    pub(crate) fn chain(&self, collection: &mut Collection, slot: NodeId) {
        if let Some(tail) = collection.tail {
            self.write(tail, |node| node.next = Some(slot));
        } else {
            collection.head = Some(slot);
        }
        collection.tail = Some(slot);
    }

    /// Allocate a slot and append it to the collection owned by `owner`.
    pub(crate) fn append_slot(&self, owner: NodeId, key: Option<JsonStr>) -> VariantResult<NodeId> {
        let Some((_, mut collection)) = self.own_collection(owner) else {
            return Err(ErrorCode::E003_IncompatibleContainer(
                self.payload(owner).kind().name(),
            ));
        };
        let slot = self.allocate_node()?;
        self.write(slot, |node| node.key = key);
        self.chain(&mut collection, slot);
        self.store_collection(owner, collection);
        Ok(slot)
    }

    /// Detach `slot` from the collection owned by `owner`. No-op if absent.
    pub(crate) fn unlink_slot(&self, owner: NodeId, slot: NodeId) {
        let Some((_, mut collection)) = self.own_collection(owner) else {
            return;
        };
        let mut previous = None;
        let mut cursor = collection.head;
        while let Some(current) = cursor {
            if current == slot {
                break;
            }
            previous = cursor;
            cursor = self.next_slot(current);
        }
        if cursor.is_none() {
            return;
        }

        let next = self.next_slot(slot);
        match previous {
            Some(prev) => self.write(prev, |node| node.next = next),
            None => collection.head = next,
        }
        if collection.tail == Some(slot) {
            collection.tail = previous;
        }
        self.write(slot, |node| node.next = None);
        self.store_collection(owner, collection);
    }

    /// Empty the collection owned by `owner`. Slots stay allocated.
    pub(crate) fn clear_collection(&self, owner: NodeId) {
        self.store_collection(owner, Collection::default());
    }
}

#[cfg(test)]
mod tests {
    use super::super::{ArenaLimits, ROOT};
    use super::*;

    fn array_of(arena: &Arena, n: i64) -> Vec<NodeId> {
        arena.replace(ROOT, Payload::Array(Collection::default()));
        (0..n)
            .map(|i| {
                let slot = arena.append_slot(ROOT, None).unwrap();
                arena.replace(slot, Payload::SignedInteger(i));
                slot
            })
            .collect()
    }

    fn root_collection(arena: &Arena) -> Collection {
        arena.own_collection(ROOT).unwrap().1
    }

    #[test]
    fn test_append_and_index() {
        let arena = Arena::default();
        let slots = array_of(&arena, 3);
        let c = root_collection(&arena);
        assert_eq!(arena.collection_len(c), 3);
        assert_eq!(arena.element_at(c, 0), Some(slots[0]));
        assert_eq!(arena.element_at(c, 2), Some(slots[2]));
        assert_eq!(arena.element_at(c, 3), None);
    }

    #[test]
    fn test_unlink_head_middle_tail() {
        let arena = Arena::default();
        let slots = array_of(&arena, 4);
        arena.unlink_slot(ROOT, slots[1]);
        arena.unlink_slot(ROOT, slots[0]);
        arena.unlink_slot(ROOT, slots[3]);
        let c = root_collection(&arena);
        assert_eq!(arena.collection_len(c), 1);
        assert_eq!(c.head, Some(slots[2]));
        assert_eq!(c.tail, Some(slots[2]));

        // Appending after removing the tail must still link correctly
        let extra = arena.append_slot(ROOT, None).unwrap();
        let c = root_collection(&arena);
        assert_eq!(arena.element_at(c, 1), Some(extra));
    }

    #[test]
    fn test_unlink_absent_is_noop() {
        let arena = Arena::default();
        let slots = array_of(&arena, 2);
        let stray = arena.allocate_node().unwrap();
        arena.unlink_slot(ROOT, stray);
        let c = root_collection(&arena);
        assert_eq!(arena.collection_len(c), 2);
        assert_eq!(c.head, Some(slots[0]));
    }

    #[test]
    fn test_member_lookup_by_key() {
        let arena = Arena::default();
        arena.replace(ROOT, Payload::Object(Collection::default()));
        let a = arena.append_slot(ROOT, Some(JsonStr::from("a"))).unwrap();
        let b = arena.append_slot(ROOT, Some(JsonStr::from("b"))).unwrap();
        let c = root_collection(&arena);
        assert_eq!(arena.member_named(c, "a"), Some(a));
        assert_eq!(arena.member_named(c, "b"), Some(b));
        assert_eq!(arena.member_named(c, "c"), None);
    }

    #[test]
    fn test_init_rejects_wrong_kind() {
        let arena = Arena::new(ArenaLimits::embedded());
        arena.replace(ROOT, Payload::Boolean(true));
        assert_eq!(
            arena.own_collection_or_init(ROOT, ValueKind::Array),
            Err(ErrorCode::E003_IncompatibleContainer("boolean"))
        );
        arena.replace(ROOT, Payload::Null);
        assert!(arena.own_collection_or_init(ROOT, ValueKind::Object).is_ok());
        assert_eq!(
            arena.own_collection_or_init(ROOT, ValueKind::Array),
            Err(ErrorCode::E003_IncompatibleContainer("object"))
        );
    }
}
