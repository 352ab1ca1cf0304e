//! Typed handles returned by `to_array` / `to_object`.

use std::fmt;

use crate::arena::{Arena, NodeId};
use crate::data::{JsonStr, StringLike, ValueKind};
use crate::error::VariantResult;
use crate::proxy::{ElementProxy, MemberProxy};

use super::{Elements, IntoVariant, Members, MutableView, ReadOnlyView, VariantRead, VariantWrite};

/// Mutable handle to a node known to hold an array.
#[derive(Clone, Copy)]
pub struct ArrayMut<'a> {
    arena: &'a Arena,
    node: NodeId,
}

impl<'a> ArrayMut<'a> {
    pub(crate) fn new(arena: &'a Arena, node: NodeId) -> Self {
        Self { arena, node }
    }

    /// The same node as a general mutable view.
    pub fn as_variant(&self) -> MutableView<'a> {
        MutableView::new(self.arena, self.node)
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.size()
    }

    /// True when there are no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append a value.
    pub fn add<T: IntoVariant>(&self, value: T) -> VariantResult<()> {
        self.as_variant().add(value)
    }

    /// Append a null element.
    pub fn add_element(&self) -> VariantResult<MutableView<'a>> {
        self.as_variant().add_element()
    }

    /// Append an empty array.
    pub fn create_nested_array(&self) -> VariantResult<ArrayMut<'a>> {
        self.as_variant().create_nested_array()
    }

    /// Append an empty object.
    pub fn create_nested_object(&self) -> VariantResult<ObjectMut<'a>> {
        self.as_variant().create_nested_object()
    }

    /// Deferred handle to the element at `index`.
    pub fn at(&self, index: usize) -> ElementProxy<'a, MutableView<'a>> {
        self.as_variant().at(index)
    }

    /// Remove the element at `index`. No-op if absent.
    pub fn remove(&self, index: usize) {
        self.as_variant().remove(index);
    }

    /// Remove every element. Their slots stay allocated until reset.
    pub fn clear(&self) {
        if let Some((ValueKind::Array, _)) = self.arena.own_collection(self.node) {
            self.arena.clear_collection(self.node);
        }
    }

    /// Elements in order.
    pub fn iter(&self) -> Elements<'a> {
        self.elements()
    }
}

impl<'a> VariantRead<'a> for ArrayMut<'a> {
    fn view(&self) -> ReadOnlyView<'a> {
        ReadOnlyView::new(self.arena, Some(self.node))
    }
}

impl<'a> IntoIterator for ArrayMut<'a> {
    type Item = ReadOnlyView<'a>;
    type IntoIter = Elements<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements()
    }
}

impl fmt::Debug for ArrayMut<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.elements()).finish()
    }
}

/// Mutable handle to a node known to hold an object.
#[derive(Clone, Copy)]
pub struct ObjectMut<'a> {
    arena: &'a Arena,
    node: NodeId,
}

impl<'a> ObjectMut<'a> {
    pub(crate) fn new(arena: &'a Arena, node: NodeId) -> Self {
        Self { arena, node }
    }

    /// The same node as a general mutable view.
    pub fn as_variant(&self) -> MutableView<'a> {
        MutableView::new(self.arena, self.node)
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.size()
    }

    /// True when there are no members.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True when a member named `key` exists.
    pub fn contains_key<K: StringLike + ?Sized>(&self, key: &K) -> bool {
        self.get_member(key).is_bound()
    }

    /// Deferred handle to the member named `key`.
    pub fn member<K: StringLike>(&self, key: K) -> MemberProxy<'a, MutableView<'a>, K> {
        self.as_variant().member(key)
    }

    /// Member named `key`, adding it if absent.
    pub fn get_or_add<K: StringLike + ?Sized>(&self, key: &K) -> VariantResult<MutableView<'a>> {
        self.as_variant().get_or_add_member(key)
    }

    /// Remove the member named `key`. No-op if absent.
    pub fn remove<K: StringLike + ?Sized>(&self, key: &K) {
        self.as_variant().remove_member(key);
    }

    /// Remove every member. Their slots stay allocated until reset.
    pub fn clear(&self) {
        if let Some((ValueKind::Object, _)) = self.arena.own_collection(self.node) {
            self.arena.clear_collection(self.node);
        }
    }

    /// Members in insertion order.
    pub fn iter(&self) -> Members<'a> {
        self.members()
    }
}

impl<'a> VariantRead<'a> for ObjectMut<'a> {
    fn view(&self) -> ReadOnlyView<'a> {
        ReadOnlyView::new(self.arena, Some(self.node))
    }
}

impl<'a> IntoIterator for ObjectMut<'a> {
    type Item = (JsonStr, ReadOnlyView<'a>);
    type IntoIter = Members<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.members()
    }
}

impl fmt::Debug for ObjectMut<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.members()).finish()
    }
}
