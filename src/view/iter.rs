//! Iteration over array elements and object members.

use crate::arena::{Arena, NodeId};
use crate::data::{JsonStr, Payload};

use super::ReadOnlyView;

/// Iterator over array elements, in order.
#[derive(Debug, Clone)]
pub struct Elements<'a> {
    arena: Option<&'a Arena>,
    cursor: Option<NodeId>,
}

impl<'a> Elements<'a> {
    pub(crate) fn new(container: ReadOnlyView<'a>) -> Self {
        match container.target() {
            Some((arena, node)) => match arena.payload(node) {
                Payload::Array(collection) => Self {
                    arena: Some(arena),
                    cursor: collection.head,
                },
                _ => Self::empty(),
            },
            None => Self::empty(),
        }
    }

    fn empty() -> Self {
        Self {
            arena: None,
            cursor: None,
        }
    }
}

impl<'a> Iterator for Elements<'a> {
    type Item = ReadOnlyView<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let arena = self.arena?;
        let slot = self.cursor?;
        self.cursor = arena.next_slot(slot);
        Some(ReadOnlyView::new(arena, Some(slot)))
    }
}

/// Iterator over object members, in insertion order.
#[derive(Debug, Clone)]
pub struct Members<'a> {
    arena: Option<&'a Arena>,
    cursor: Option<NodeId>,
}

impl<'a> Members<'a> {
    pub(crate) fn new(container: ReadOnlyView<'a>) -> Self {
        match container.target() {
            Some((arena, node)) => match arena.payload(node) {
                Payload::Object(collection) => Self {
                    arena: Some(arena),
                    cursor: collection.head,
                },
                _ => Self::empty(),
            },
            None => Self::empty(),
        }
    }

    fn empty() -> Self {
        Self {
            arena: None,
            cursor: None,
        }
    }
}

impl<'a> Iterator for Members<'a> {
    type Item = (JsonStr, ReadOnlyView<'a>);

    fn next(&mut self) -> Option<Self::Item> {
        let arena = self.arena?;
        let slot = self.cursor?;
        self.cursor = arena.next_slot(slot);
        let key = arena.slot_key(slot).unwrap_or_else(|| JsonStr::from(""));
        Some((key, ReadOnlyView::new(arena, Some(slot))))
    }
}
