//! Index-based arena owning every value node of a document.
//!
//! Nodes live in a growable slab addressed by [`NodeId`]. Growth may relocate
//! the slab but never invalidates an id, and nothing is freed individually:
//! removed or overwritten slots stay allocated until [`Arena::reset`].
//!
//! # Layout
//!
//! ```text
//! nodes[0]      root node (not counted as a slot)
//! nodes[1..]    slots: payload + optional key + next link
//! ```
//!
//! Array and object payloads hold a [`Collection`], the head and tail of a
//! singly-linked chain of slots threaded through `Node::next`.
//!
//! The slab sits behind a `RefCell` so that any number of cheap `Copy` views
//! can share one arena. Every borrow is confined to a single accessor call.

mod collection;
mod limits;

use std::cell::RefCell;
use std::rc::Rc;

use serde::Serialize;

use crate::data::{Collection, JsonStr, Payload};
use crate::error::{ErrorCode, VariantResult};
use crate::view::{MutableView, ReadOnlyView};

pub use limits::ArenaLimits;

/// Handle to a node inside one arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// Position of the node in the slab.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

pub(crate) const ROOT: NodeId = NodeId(0);

/// One value node: the payload plus its place in the parent collection.
#[derive(Debug, Clone, Default)]
pub(crate) struct Node {
    pub(crate) payload: Payload,
    /// Zero-copy alias; reads follow it, writes replace it.
    pub(crate) link: Option<NodeId>,
    pub(crate) key: Option<JsonStr>,
    pub(crate) next: Option<NodeId>,
}

/// Bytes charged per slot by `memory_usage`.
pub const SLOT_SIZE: usize = std::mem::size_of::<Node>();

#[derive(Debug)]
struct Pool {
    nodes: Vec<Node>,
    string_bytes: u64,
}

impl Pool {
    fn fresh() -> Self {
        Self {
            nodes: vec![Node::default()],
            string_bytes: 0,
        }
    }
}

/// Usage snapshot of an arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ArenaStats {
    /// Slots allocated so far.
    pub slots: u64,
    /// String bytes allocated so far.
    pub string_bytes: u64,
    /// Total bytes charged (slots and strings).
    pub memory_usage: u64,
    /// Slot limit.
    pub max_slots: u64,
    /// String byte limit.
    pub max_string_bytes: u64,
}

/// Bounded storage for value nodes and strings.
#[derive(Debug)]
pub struct Arena {
    pool: RefCell<Pool>,
    limits: ArenaLimits,
}

impl Arena {
    /// Create an empty arena whose root is null.
    pub fn new(limits: ArenaLimits) -> Self {
        Self {
            pool: RefCell::new(Pool::fresh()),
            limits,
        }
    }

    /// Capacity limits of this arena.
    pub fn limits(&self) -> ArenaLimits {
        self.limits
    }

    /// Mutable view of the root node.
    pub fn root(&self) -> MutableView<'_> {
        MutableView::new(self, ROOT)
    }

    /// Read-only view of the root node.
    pub fn root_readonly(&self) -> ReadOnlyView<'_> {
        ReadOnlyView::new(self, Some(ROOT))
    }

    /// Number of slots allocated since creation or the last reset.
    pub fn slot_count(&self) -> u64 {
        (self.pool.borrow().nodes.len() - 1) as u64
    }

    /// Number of string bytes allocated since creation or the last reset.
    pub fn string_bytes(&self) -> u64 {
        self.pool.borrow().string_bytes
    }

    /// Total bytes charged against this arena.
    pub fn memory_usage(&self) -> u64 {
        self.slot_count() * SLOT_SIZE as u64 + self.string_bytes()
    }

    /// Usage snapshot.
    pub fn stats(&self) -> ArenaStats {
        ArenaStats {
            slots: self.slot_count(),
            string_bytes: self.string_bytes(),
            memory_usage: self.memory_usage(),
            max_slots: self.limits.max_slots,
            max_string_bytes: self.limits.max_string_bytes,
        }
    }

    /// Reclaim everything at once. The root becomes null.
    ///
    /// Requires exclusive access, so no view can survive a reset.
    pub fn reset(&mut self) {
        let pool = self.pool.get_mut();
        tracing::debug!(
            slots = pool.nodes.len() - 1,
            string_bytes = pool.string_bytes,
            "arena reset"
        );
        *pool = Pool::fresh();
    }

    /// Allocate a detached null slot.
    pub(crate) fn allocate_node(&self) -> VariantResult<NodeId> {
        let mut pool = self.pool.borrow_mut();
        let used = (pool.nodes.len() - 1) as u64;
        if used >= self.limits.max_slots {
            tracing::debug!(limit = self.limits.max_slots, "slot pool exhausted");
            return Err(ErrorCode::E001_SlotPoolExhausted(self.limits.max_slots));
        }
        let id = u32::try_from(pool.nodes.len())
            .map_err(|_| ErrorCode::E001_SlotPoolExhausted(self.limits.max_slots))?;
        pool.nodes.push(Node::default());
        Ok(NodeId(id))
    }

    /// Copy a string into the arena.
    pub(crate) fn allocate_string(&self, value: &str) -> VariantResult<JsonStr> {
        self.reserve_bytes(value.len())?;
        Ok(JsonStr::from(value))
    }

    /// Charge an existing shared string to this arena.
    pub(crate) fn adopt_string(&self, value: &JsonStr) -> VariantResult<JsonStr> {
        self.reserve_bytes(value.len())?;
        Ok(Rc::clone(value))
    }

    /// Copy pre-encoded bytes into the arena.
    pub(crate) fn allocate_raw(&self, bytes: &[u8]) -> VariantResult<Rc<[u8]>> {
        self.reserve_bytes(bytes.len())?;
        Ok(Rc::from(bytes))
    }

    /// Charge existing shared raw bytes to this arena.
    pub(crate) fn adopt_raw(&self, bytes: &Rc<[u8]>) -> VariantResult<Rc<[u8]>> {
        self.reserve_bytes(bytes.len())?;
        Ok(Rc::clone(bytes))
    }

    fn reserve_bytes(&self, len: usize) -> VariantResult<()> {
        let mut pool = self.pool.borrow_mut();
        let requested = len as u64;
        let available = self.limits.string_bytes_available(pool.string_bytes);
        if requested > available {
            tracing::debug!(requested, available, "string pool exhausted");
            return Err(ErrorCode::E002_StringPoolExhausted(requested, available));
        }
        pool.string_bytes += requested;
        Ok(())
    }

    /// Run `f` against a node. `f` must not touch the arena.
    pub(crate) fn read<R>(&self, id: NodeId, f: impl FnOnce(&Node) -> R) -> R {
        f(&self.pool.borrow().nodes[id.index()])
    }

    /// Run `f` against a node mutably. `f` must not touch the arena.
    pub(crate) fn write<R>(&self, id: NodeId, f: impl FnOnce(&mut Node) -> R) -> R {
        f(&mut self.pool.borrow_mut().nodes[id.index()])
    }

    /// Follow links until reaching a node that owns its payload.
    pub(crate) fn resolve(&self, mut id: NodeId) -> NodeId {
        while let Some(target) = self.read(id, |node| node.link) {
            id = target;
        }
        id
    }

    /// Payload of a node, reading through links.
    pub(crate) fn payload(&self, id: NodeId) -> Payload {
        let id = self.resolve(id);
        self.read(id, |node| node.payload.clone())
    }

    /// Overwrite a node's payload and drop any link it carried.
    pub(crate) fn replace(&self, id: NodeId, payload: Payload) {
        self.write(id, |node| {
            node.payload = payload;
            node.link = None;
        });
    }

    /// Alias `id` to `target`.
    pub(crate) fn set_link(&self, id: NodeId, target: NodeId) {
        self.write(id, |node| {
            node.payload = Payload::Null;
            node.link = Some(target);
        });
    }

    /// True if `needle` is `root` or lies somewhere beneath it.
    pub(crate) fn contains(&self, root: NodeId, needle: NodeId) -> bool {
        let mut pending = vec![root];
        while let Some(id) = pending.pop() {
            if id == needle {
                return true;
            }
            let id = self.resolve(id);
            if id == needle {
                return true;
            }
            if let Some(collection) = self.payload(id).collection() {
                self.push_slots(collection, &mut pending);
            }
        }
        false
    }

    /// Bytes owned by the subtree under `id`, links excluded.
    pub(crate) fn subtree_usage(&self, id: NodeId) -> usize {
        let mut total = 0;
        let mut pending = vec![id];
        while let Some(id) = pending.pop() {
            let (payload, linked) =
                self.read(id, |node| (node.payload.clone(), node.link.is_some()));
            if linked {
                continue;
            }
            match payload {
                Payload::String(s) => total += s.len(),
                Payload::Raw(bytes) => total += bytes.len(),
                Payload::Array(collection) | Payload::Object(collection) => {
                    let mut cursor = collection.head;
                    while let Some(slot) = cursor {
                        let key_len = self.slot_key(slot).map_or(0, |k| k.len());
                        total += SLOT_SIZE + key_len;
                        pending.push(slot);
                        cursor = self.next_slot(slot);
                    }
                }
                _ => {}
            }
        }
        total
    }

    /// True when the value under `id`, read through links, has a container
    /// nested `limit` or more levels below it. The value itself is level 0.
    pub(crate) fn exceeds_depth(&self, id: NodeId, limit: u64) -> bool {
        let mut pending = vec![(id, 0u64)];
        while let Some((id, depth)) = pending.pop() {
            let Some(collection) = self.payload(id).collection() else {
                continue;
            };
            if depth >= limit {
                return true;
            }
            let mut cursor = collection.head;
            while let Some(slot) = cursor {
                pending.push((slot, depth + 1));
                cursor = self.next_slot(slot);
            }
        }
        false
    }

    fn push_slots(&self, collection: Collection, pending: &mut Vec<NodeId>) {
        let mut cursor = collection.head;
        while let Some(slot) = cursor {
            pending.push(slot);
            cursor = self.next_slot(slot);
        }
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::new(ArenaLimits::default())
    }
}
