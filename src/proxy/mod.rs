//! Deferred handles to "the element at index i" / "the member named k".
//!
//! A proxy stores its container handle and its key and resolves nothing up
//! front. How it resolves depends on the operation:
//!
//! - reads go through [`resolve_readonly`] and never allocate; a missing
//!   slot reads as an unbound view
//! - `clear` and `remove` go through the existing path and never allocate
//! - writes and nested proxies go through [`resolve_or_create`], which
//!   creates the containers and slots on the way
//!
//! Resolving is idempotent: materializing the same place twice allocates once.

use std::marker::PhantomData;

use crate::arena::Arena;
use crate::data::{Payload, StringLike, ValueKind};
use crate::error::{ErrorCode, VariantResult};
use crate::view::{MutableView, ReadOnlyView, VariantRead, VariantWrite};

/// Position inside a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key<'k> {
    /// Array index
    Index(usize),
    /// Object key; `None` is the null key, which matches nothing
    Member(Option<&'k str>),
}

/// Find the slot at `key` inside `container` without allocating.
pub fn resolve_readonly<'a>(container: ReadOnlyView<'a>, key: Key<'_>) -> ReadOnlyView<'a> {
    let Some((arena, node)) = container.target() else {
        return ReadOnlyView::unbound();
    };
    let slot = match (arena.payload(node), key) {
        (Payload::Array(collection), Key::Index(index)) => arena.element_at(collection, index),
        (Payload::Object(collection), Key::Member(Some(name))) => {
            arena.member_named(collection, name)
        }
        _ => None,
    };
    ReadOnlyView::new(arena, slot)
}

/// Find the slot at `key` inside a node's own collection. Links are not
/// followed, since writes never go through them.
pub(crate) fn resolve_existing<'a>(container: MutableView<'a>, key: Key<'_>) -> Option<MutableView<'a>> {
    let arena = container.arena();
    let slot = match (arena.own_collection(container.node())?, key) {
        ((ValueKind::Array, collection), Key::Index(index)) => arena.element_at(collection, index),
        ((ValueKind::Object, collection), Key::Member(Some(name))) => {
            arena.member_named(collection, name)
        }
        _ => None,
    }?;
    Some(MutableView::new(arena, slot))
}

/// Find the slot at `key`, creating it if absent.
///
/// A null container becomes an array or object as the key requires. Arrays
/// are padded with null elements up to `index`.
///
/// # Errors
///
/// - `E001`/`E002` when the arena is exhausted
/// - `E003` when the container holds another kind or is a link
/// - `E004` for the null key
pub fn resolve_or_create<'a>(container: MutableView<'a>, key: Key<'_>) -> VariantResult<MutableView<'a>> {
    let arena = container.arena();
    let owner = container.node();
    match key {
        Key::Index(index) => {
            let collection = arena.own_collection_or_init(owner, ValueKind::Array)?;
            if let Some(slot) = arena.element_at(collection, index) {
                return Ok(MutableView::new(arena, slot));
            }
            let mut len = arena.collection_len(collection);
            let mut slot = arena.append_slot(owner, None)?;
            while len < index {
                slot = arena.append_slot(owner, None)?;
                len += 1;
            }
            tracing::trace!(owner = owner.index(), index, "materialized element");
            Ok(MutableView::new(arena, slot))
        }
        Key::Member(None) => Err(ErrorCode::E004_NullKey),
        Key::Member(Some(name)) => {
            let collection = arena.own_collection_or_init(owner, ValueKind::Object)?;
            if let Some(slot) = arena.member_named(collection, name) {
                return Ok(MutableView::new(arena, slot));
            }
            let key = arena.allocate_string(name)?;
            let slot = arena.append_slot(owner, Some(key))?;
            tracing::trace!(owner = owner.index(), key = name, "materialized member");
            Ok(MutableView::new(arena, slot))
        }
    }
}

/// The element at `index` inside whatever `U` designates.
#[derive(Debug, Clone, Copy)]
pub struct ElementProxy<'a, U> {
    upstream: U,
    index: usize,
    _arena: PhantomData<&'a Arena>,
}

impl<'a, U> ElementProxy<'a, U> {
    pub(crate) fn new(upstream: U, index: usize) -> Self {
        Self {
            upstream,
            index,
            _arena: PhantomData,
        }
    }

    /// Index this proxy designates.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Handle to the containing array.
    pub fn upstream(&self) -> &U {
        &self.upstream
    }
}

impl<'a, U: VariantWrite<'a>> VariantRead<'a> for ElementProxy<'a, U> {
    fn view(&self) -> ReadOnlyView<'a> {
        resolve_readonly(self.upstream.view(), Key::Index(self.index))
    }
}

impl<'a, U: VariantWrite<'a>> VariantWrite<'a> for ElementProxy<'a, U> {
    fn existing(&self) -> Option<MutableView<'a>> {
        resolve_existing(self.upstream.existing()?, Key::Index(self.index))
    }

    fn materialize(&self) -> VariantResult<MutableView<'a>> {
        resolve_or_create(self.upstream.materialize()?, Key::Index(self.index))
    }
}

/// The member named `key` inside whatever `U` designates.
#[derive(Debug, Clone, Copy)]
pub struct MemberProxy<'a, U, K> {
    upstream: U,
    key: K,
    _arena: PhantomData<&'a Arena>,
}

impl<'a, U, K> MemberProxy<'a, U, K> {
    pub(crate) fn new(upstream: U, key: K) -> Self {
        Self {
            upstream,
            key,
            _arena: PhantomData,
        }
    }

    /// Key this proxy designates.
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Handle to the containing object.
    pub fn upstream(&self) -> &U {
        &self.upstream
    }
}

impl<'a, U: VariantWrite<'a>, K: StringLike> VariantRead<'a> for MemberProxy<'a, U, K> {
    fn view(&self) -> ReadOnlyView<'a> {
        resolve_readonly(self.upstream.view(), Key::Member(self.key.as_json_str()))
    }
}

impl<'a, U: VariantWrite<'a>, K: StringLike> VariantWrite<'a> for MemberProxy<'a, U, K> {
    fn existing(&self) -> Option<MutableView<'a>> {
        resolve_existing(self.upstream.existing()?, Key::Member(self.key.as_json_str()))
    }

    fn materialize(&self) -> VariantResult<MutableView<'a>> {
        resolve_or_create(self.upstream.materialize()?, Key::Member(self.key.as_json_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_or_create_is_idempotent() {
        let arena = Arena::default();
        let root = arena.root();
        let first = resolve_or_create(root, Key::Member(Some("k"))).unwrap();
        let slots = arena.slot_count();
        let second = resolve_or_create(root, Key::Member(Some("k"))).unwrap();
        assert_eq!(first.node(), second.node());
        assert_eq!(arena.slot_count(), slots);
    }

    #[test]
    fn test_index_pads_with_nulls() {
        let arena = Arena::default();
        let root = arena.root();
        let slot = resolve_or_create(root, Key::Index(3)).unwrap();
        assert_eq!(arena.slot_count(), 4);
        assert_eq!(root.size(), 4);
        assert_eq!(root.get(3).node(), Some(slot.node()));
        assert!(root.elements().all(|e| e.is_null()));
    }

    #[test]
    fn test_wrong_container_kind() {
        let arena = Arena::default();
        let root = arena.root();
        root.set("text").unwrap();
        assert_eq!(
            resolve_or_create(root, Key::Index(0)).map(|_| ()),
            Err(ErrorCode::E003_IncompatibleContainer("string"))
        );
        root.to_array();
        assert_eq!(
            resolve_or_create(root, Key::Member(Some("k"))).map(|_| ()),
            Err(ErrorCode::E003_IncompatibleContainer("array"))
        );
    }

    #[test]
    fn test_null_key() {
        let arena = Arena::default();
        let root = arena.root();
        assert_eq!(
            resolve_or_create(root, Key::Member(None)).map(|_| ()),
            Err(ErrorCode::E004_NullKey)
        );
        assert!(root.is_null());
        assert!(!resolve_readonly(arena.root_readonly(), Key::Member(None)).is_bound());
    }

    #[test]
    fn test_writes_through_link_fail() {
        let arena = Arena::default();
        let root = arena.root();
        root.member("target").add(1).unwrap();
        let alias = root.get_or_add_member("alias").unwrap();
        alias.link(&root.member("target")).unwrap();

        assert_eq!(alias.get(0).as_i64(), Some(1));
        assert_eq!(
            alias.at(1).set(2),
            Err(ErrorCode::E003_IncompatibleContainer("link"))
        );
        assert!(resolve_existing(alias, Key::Index(0)).is_none());
        assert_eq!(root.get_member("target").size(), 1);
    }

    #[test]
    fn test_nested_proxy_chain() {
        let arena = Arena::default();
        let root = arena.root();
        let place = root.member("a").at(2).member("b");
        assert!(place.is_null());
        assert!(place.existing().is_none());
        assert_eq!(arena.slot_count(), 0);

        place.set(5).unwrap();
        assert_eq!(place.value::<i32>(), 5);
        // a, three elements, b
        assert_eq!(arena.slot_count(), 5);
        assert!(place.existing().is_some());
        assert_eq!(place.key(), &"b");
        assert_eq!(place.upstream().index(), 2);
    }
}
