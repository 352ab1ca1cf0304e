//! Capability-gated handles over arena nodes.
//!
//! [`VariantRead`] is the read-only surface shared by every handle. Nothing
//! reachable through it allocates. [`VariantWrite`] adds writes and is
//! implemented only by handles that can reach a mutable node: [`MutableView`]
//! and the proxies in [`crate::proxy`].
//!
//! # Allocation rules
//!
//! | Operation                                   | May allocate |
//! |---------------------------------------------|--------------|
//! | `is_null`, `size`, `is`, `value`, `get`...  | never        |
//! | `remove`, `remove_member`, `clear`          | never        |
//! | `set`, `add`, `to_array`, `get_or_add_*`    | yes          |
//! | `at`, `member`                              | no, but writes through the proxy do |

mod container;
mod convert;
mod iter;
mod path;

use std::fmt;
use std::rc::Rc;

use crate::arena::{Arena, NodeId};
use crate::compare::{CompareResult, Operand};
use crate::data::{JsonStr, Payload, StringLike, ValueKind};
use crate::error::VariantResult;
use crate::proxy::{resolve_or_create, resolve_readonly, ElementProxy, Key, MemberProxy};

pub use container::{ArrayMut, ObjectMut};
pub use convert::{FromVariant, IntoVariant};
pub use iter::{Elements, Members};
pub use path::lookup;

/// Read-only handle. May be unbound, in which case it reads as null.
#[derive(Clone, Copy, Default)]
pub struct ReadOnlyView<'a> {
    target: Option<(&'a Arena, NodeId)>,
}

impl<'a> ReadOnlyView<'a> {
    pub(crate) fn new(arena: &'a Arena, node: Option<NodeId>) -> Self {
        Self {
            target: node.map(|node| (arena, node)),
        }
    }

    /// A view bound to nothing.
    pub fn unbound() -> Self {
        Self { target: None }
    }

    /// True when this view reads from `arena`.
    ///
    /// The arena itself is never handed out, so a read-only view cannot be
    /// turned into a writer:
    ///
    /// ```compile_fail
    /// use variant_json::prelude::*;
    ///
    /// let arena = Arena::default();
    /// let view = arena.root_readonly();
    /// view.arena().unwrap().root().set(1).unwrap();
    /// ```
    pub fn belongs_to(&self, arena: &Arena) -> bool {
        self.target
            .is_some_and(|(own, _)| std::ptr::eq(own, arena))
    }

    /// Node this view designates.
    pub fn node(&self) -> Option<NodeId> {
        self.target.map(|(_, node)| node)
    }

    pub(crate) fn target(&self) -> Option<(&'a Arena, NodeId)> {
        self.target
    }

    /// Payload of the node, reading through links. Null when unbound.
    pub(crate) fn payload(&self) -> Payload {
        match self.target {
            Some((arena, node)) => arena.payload(node),
            None => Payload::Null,
        }
    }
}

impl fmt::Debug for ReadOnlyView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReadOnlyView")
            .field("node", &self.node())
            .field("kind", &self.kind())
            .finish()
    }
}

/// Read access shared by views, containers and proxies.
pub trait VariantRead<'a> {
    /// Read-only view of the designated node, resolved without allocating.
    fn view(&self) -> ReadOnlyView<'a>;

    /// False when the designated node does not exist.
    fn is_bound(&self) -> bool {
        self.view().target.is_some()
    }

    /// True for null and for unbound handles.
    fn is_null(&self) -> bool {
        self.view().payload().is_null()
    }

    /// Dynamic kind; `Null` when unbound.
    fn kind(&self) -> ValueKind {
        self.view().payload().kind()
    }

    /// Number of elements or members; 0 for anything else.
    fn size(&self) -> usize {
        let view = self.view();
        match (view.target, view.payload().collection()) {
            (Some((arena, _)), Some(collection)) => arena.collection_len(collection),
            _ => 0,
        }
    }

    /// Bytes owned by this value: slots, keys and strings beneath it.
    /// A link owns nothing.
    fn memory_usage(&self) -> usize {
        self.view()
            .target
            .map_or(0, |(arena, node)| arena.subtree_usage(node))
    }

    /// True when the value is stored as a `T`.
    fn is<T: FromVariant>(&self) -> bool {
        T::matches(&self.view().payload())
    }

    /// The value converted to `T`, or `T`'s default when it does not convert.
    fn value<T: FromVariant>(&self) -> T {
        T::from_payload(&self.view().payload())
    }

    /// The boolean, if the value is one.
    fn as_bool(&self) -> Option<bool> {
        self.view().payload().as_bool()
    }

    /// The integer, if the value is one that fits in an `i64`.
    fn as_i64(&self) -> Option<i64> {
        let payload = self.view().payload();
        i64::matches(&payload).then(|| i64::from_payload(&payload))
    }

    /// The integer, if the value is one that fits in a `u64`.
    fn as_u64(&self) -> Option<u64> {
        let payload = self.view().payload();
        u64::matches(&payload).then(|| u64::from_payload(&payload))
    }

    /// Any number as an `f64`.
    fn as_f64(&self) -> Option<f64> {
        let payload = self.view().payload();
        f64::matches(&payload).then(|| f64::from_payload(&payload))
    }

    /// The string, if the value is one.
    fn as_str(&self) -> Option<JsonStr> {
        match self.view().payload() {
            Payload::String(s) => Some(s),
            _ => None,
        }
    }

    /// The pre-encoded bytes, if the value is a raw fragment.
    fn as_raw(&self) -> Option<Rc<[u8]>> {
        match self.view().payload() {
            Payload::Raw(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Element at `index`, or an unbound view.
    fn get(&self, index: usize) -> ReadOnlyView<'a> {
        resolve_readonly(self.view(), Key::Index(index))
    }

    /// Member named `key`, or an unbound view.
    fn get_member<K: StringLike + ?Sized>(&self, key: &K) -> ReadOnlyView<'a> {
        resolve_readonly(self.view(), Key::Member(key.as_json_str()))
    }

    /// Array elements in order. Empty for anything but an array.
    fn elements(&self) -> Elements<'a> {
        Elements::new(self.view())
    }

    /// Object members in insertion order. Empty for anything but an object.
    fn members(&self) -> Members<'a> {
        Members::new(self.view())
    }

    /// Three-way comparison against any operand.
    fn compare<T: Operand + ?Sized>(&self, other: &T) -> CompareResult {
        crate::compare::compare(self.view(), other)
    }
}

/// Write access. Implemented by handles that can reach a mutable node.
///
/// Every provided method either resolves the node without allocating
/// ([`existing`](VariantWrite::existing)) or creates whatever is missing on
/// the way to it ([`materialize`](VariantWrite::materialize)).
pub trait VariantWrite<'a>: VariantRead<'a> {
    /// The designated node, if it already exists.
    fn existing(&self) -> Option<MutableView<'a>>;

    /// The designated node, creating missing containers and slots.
    fn materialize(&self) -> VariantResult<MutableView<'a>>;

    /// Overwrite the value, changing its kind if needed.
    fn set<T: IntoVariant>(&self, value: T) -> VariantResult<()> {
        self.materialize()?.set(value)
    }

    /// Replace the value with an empty array.
    fn to_array(&self) -> VariantResult<ArrayMut<'a>> {
        Ok(self.materialize()?.to_array())
    }

    /// Replace the value with an empty object.
    fn to_object(&self) -> VariantResult<ObjectMut<'a>> {
        Ok(self.materialize()?.to_object())
    }

    /// Alias the value to `target` without copying.
    fn link<'b, R: VariantRead<'b>>(&self, target: &R) -> VariantResult<()> {
        self.materialize()?.link(target)
    }

    /// Set the value to null.
    fn clear(&self) {
        if let Some(view) = self.existing() {
            view.clear();
        }
    }

    /// Remove the element at `index`. No-op if absent.
    fn remove(&self, index: usize) {
        if let Some(view) = self.existing() {
            view.remove(index);
        }
    }

    /// Remove the member named `key`. No-op if absent.
    fn remove_member<K: StringLike + ?Sized>(&self, key: &K) {
        if let Some(view) = self.existing() {
            view.remove_member(key);
        }
    }

    /// Append a value to the array.
    fn add<T: IntoVariant>(&self, value: T) -> VariantResult<()> {
        self.materialize()?.add(value)
    }

    /// Append a null element to the array.
    fn add_element(&self) -> VariantResult<MutableView<'a>> {
        self.materialize()?.add_element()
    }

    /// Append an empty array to the array.
    fn create_nested_array(&self) -> VariantResult<ArrayMut<'a>> {
        self.materialize()?.create_nested_array()
    }

    /// Append an empty object to the array.
    fn create_nested_object(&self) -> VariantResult<ObjectMut<'a>> {
        self.materialize()?.create_nested_object()
    }

    /// Element at `index`, padding the array with nulls up to it.
    fn get_or_add_element(&self, index: usize) -> VariantResult<MutableView<'a>> {
        self.materialize()?.get_or_add_element(index)
    }

    /// Member named `key`, adding it if absent.
    fn get_or_add_member<K: StringLike + ?Sized>(&self, key: &K) -> VariantResult<MutableView<'a>> {
        self.materialize()?.get_or_add_member(key)
    }

    /// Deferred handle to the element at `index`.
    fn at(&self, index: usize) -> ElementProxy<'a, Self>
    where
        Self: Sized + Clone,
    {
        ElementProxy::new(self.clone(), index)
    }

    /// Deferred handle to the member named `key`.
    fn member<K: StringLike>(&self, key: K) -> MemberProxy<'a, Self, K>
    where
        Self: Sized + Clone,
    {
        MemberProxy::new(self.clone(), key)
    }
}

impl<'a> VariantRead<'a> for ReadOnlyView<'a> {
    fn view(&self) -> ReadOnlyView<'a> {
        *self
    }
}

/// Handle to a node that exists and may be written.
#[derive(Clone, Copy)]
pub struct MutableView<'a> {
    arena: &'a Arena,
    node: NodeId,
}

impl<'a> MutableView<'a> {
    pub(crate) fn new(arena: &'a Arena, node: NodeId) -> Self {
        Self { arena, node }
    }

    /// Arena this view writes to.
    pub fn arena(&self) -> &'a Arena {
        self.arena
    }

    /// Node this view designates.
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Overwrite the value. On failure the node is left null.
    pub fn set<T: IntoVariant>(&self, value: T) -> VariantResult<()> {
        match value.to_payload(self.arena) {
            Ok(payload) => {
                self.arena.replace(self.node, payload);
                Ok(())
            }
            Err(err) => {
                self.arena.replace(self.node, Payload::Null);
                Err(err)
            }
        }
    }

    /// Discard the value and make the node an empty array.
    pub fn to_array(&self) -> ArrayMut<'a> {
        self.arena.replace(self.node, Payload::Array(Default::default()));
        ArrayMut::new(self.arena, self.node)
    }

    /// Discard the value and make the node an empty object.
    pub fn to_object(&self) -> ObjectMut<'a> {
        self.arena.replace(self.node, Payload::Object(Default::default()));
        ObjectMut::new(self.arena, self.node)
    }

    /// Alias this node to `target`.
    ///
    /// Reads follow the alias; writes replace it. When `target` lives in
    /// another arena, or contains this node, its value is copied instead.
    /// An unbound target makes this node null.
    pub fn link<'b, R: VariantRead<'b>>(&self, target: &R) -> VariantResult<()> {
        let source = target.view();
        let Some((arena, node)) = source.target() else {
            self.clear();
            return Ok(());
        };
        if std::ptr::eq(arena, self.arena) && !self.arena.contains(node, self.node) {
            self.arena.set_link(self.node, node);
            return Ok(());
        }
        tracing::debug!(
            node = self.node.index(),
            target = node.index(),
            "link target cannot be aliased, copying"
        );
        self.set(source)
    }

    /// Set the value to null.
    pub fn clear(&self) {
        self.arena.replace(self.node, Payload::Null);
    }

    /// Remove the element at `index`. No-op unless this is an array that
    /// long.
    pub fn remove(&self, index: usize) {
        if let Some((ValueKind::Array, collection)) = self.arena.own_collection(self.node) {
            if let Some(slot) = self.arena.element_at(collection, index) {
                self.arena.unlink_slot(self.node, slot);
            }
        }
    }

    /// Remove the member named `key`. No-op unless present.
    pub fn remove_member<K: StringLike + ?Sized>(&self, key: &K) {
        let Some(key) = key.as_json_str() else {
            return;
        };
        if let Some((ValueKind::Object, collection)) = self.arena.own_collection(self.node) {
            if let Some(slot) = self.arena.member_named(collection, key) {
                self.arena.unlink_slot(self.node, slot);
            }
        }
    }

    /// Append a value. A null node becomes an array first.
    pub fn add<T: IntoVariant>(&self, value: T) -> VariantResult<()> {
        self.arena.own_collection_or_init(self.node, ValueKind::Array)?;
        let payload = value.to_payload(self.arena)?;
        let slot = self.arena.append_slot(self.node, None)?;
        self.arena.replace(slot, payload);
        Ok(())
    }

    /// Append a null element. A null node becomes an array first.
    pub fn add_element(&self) -> VariantResult<MutableView<'a>> {
        self.arena.own_collection_or_init(self.node, ValueKind::Array)?;
        let slot = self.arena.append_slot(self.node, None)?;
        Ok(MutableView::new(self.arena, slot))
    }

    /// Append an empty array.
    pub fn create_nested_array(&self) -> VariantResult<ArrayMut<'a>> {
        Ok(self.add_element()?.to_array())
    }

    /// Append an empty object.
    pub fn create_nested_object(&self) -> VariantResult<ObjectMut<'a>> {
        Ok(self.add_element()?.to_object())
    }

    /// Element at `index`, padding with null elements up to it.
    pub fn get_or_add_element(&self, index: usize) -> VariantResult<MutableView<'a>> {
        resolve_or_create(*self, Key::Index(index))
    }

    /// Member named `key`, adding it if absent.
    pub fn get_or_add_member<K: StringLike + ?Sized>(&self, key: &K) -> VariantResult<MutableView<'a>> {
        resolve_or_create(*self, Key::Member(key.as_json_str()))
    }
}

impl fmt::Debug for MutableView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MutableView")
            .field("node", &self.node)
            .field("kind", &self.kind())
            .finish()
    }
}

impl<'a> VariantRead<'a> for MutableView<'a> {
    fn view(&self) -> ReadOnlyView<'a> {
        ReadOnlyView::new(self.arena, Some(self.node))
    }
}

impl<'a> VariantWrite<'a> for MutableView<'a> {
    fn existing(&self) -> Option<MutableView<'a>> {
        Some(*self)
    }

    fn materialize(&self) -> VariantResult<MutableView<'a>> {
        Ok(*self)
    }
}
