//! Value kinds and payloads.
//!
//! A [`Payload`] is the tagged union stored in every arena node. Containers do
//! not own their children directly: they hold a [`Collection`], the ends of a
//! slot chain that lives in the arena.
//!
//! # Invariants
//!
//! - Array order is significant; object order is kept for iteration only
//! - Strings and raw payloads are shared `Rc` buffers charged to the arena
//!   that copied them

mod string;

use std::rc::Rc;

use crate::arena::NodeId;

pub use string::StringLike;

/// String storage shared between nodes.
pub type JsonStr = Rc<str>;

/// Head and tail of a slot chain owned by an array or object node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Collection {
    pub(crate) head: Option<NodeId>,
    pub(crate) tail: Option<NodeId>,
}

impl Collection {
    /// True when the chain has no slots.
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }
}

/// Pre-encoded JSON bytes, stored and emitted verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawJson<'b>(pub &'b [u8]);

impl<'b> RawJson<'b> {
    /// Wrap a pre-encoded fragment such as `b"[1,2]"`.
    pub fn new(bytes: &'b [u8]) -> Self {
        Self(bytes)
    }
}

/// Dynamic kind of a value node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// JSON null, or an unbound slot
    Null,
    /// true/false
    Boolean,
    /// Integer stored as i64
    SignedInteger,
    /// Integer stored as u64
    UnsignedInteger,
    /// IEEE-754 double
    Float,
    /// UTF-8 string
    String,
    /// Pre-encoded JSON bytes
    Raw,
    /// Ordered slot chain
    Array,
    /// Keyed slot chain
    Object,
}

impl ValueKind {
    /// Returns the kind name as a string for error messages.
    pub fn name(self) -> &'static str {
        match self {
            ValueKind::Null => "null",
            ValueKind::Boolean => "boolean",
            ValueKind::SignedInteger => "signed integer",
            ValueKind::UnsignedInteger => "unsigned integer",
            ValueKind::Float => "float",
            ValueKind::String => "string",
            ValueKind::Raw => "raw",
            ValueKind::Array => "array",
            ValueKind::Object => "object",
        }
    }

    /// True for the three numeric kinds.
    pub fn is_number(self) -> bool {
        matches!(
            self,
            ValueKind::SignedInteger | ValueKind::UnsignedInteger | ValueKind::Float
        )
    }
}

/// Content of one value node.
#[derive(Debug, Clone, Default)]
pub enum Payload {
    /// JSON null
    #[default]
    Null,
    /// JSON boolean
    Boolean(bool),
    /// Integer that was written from a signed source
    SignedInteger(i64),
    /// Integer that was written from an unsigned source
    UnsignedInteger(u64),
    /// JSON number with a fractional part or exponent
    Float(f64),
    /// JSON string
    String(JsonStr),
    /// Pre-encoded JSON fragment
    Raw(Rc<[u8]>),
    /// JSON array
    Array(Collection),
    /// JSON object
    Object(Collection),
}

impl Payload {
    /// Dynamic kind of this payload.
    pub fn kind(&self) -> ValueKind {
        match self {
            Payload::Null => ValueKind::Null,
            Payload::Boolean(_) => ValueKind::Boolean,
            Payload::SignedInteger(_) => ValueKind::SignedInteger,
            Payload::UnsignedInteger(_) => ValueKind::UnsignedInteger,
            Payload::Float(_) => ValueKind::Float,
            Payload::String(_) => ValueKind::String,
            Payload::Raw(_) => ValueKind::Raw,
            Payload::Array(_) => ValueKind::Array,
            Payload::Object(_) => ValueKind::Object,
        }
    }

    /// Returns true if this is a null value.
    pub fn is_null(&self) -> bool {
        matches!(self, Payload::Null)
    }

    /// Returns true if this is an array.
    pub fn is_array(&self) -> bool {
        matches!(self, Payload::Array(_))
    }

    /// Returns true if this is an object.
    pub fn is_object(&self) -> bool {
        matches!(self, Payload::Object(_))
    }

    /// Returns the boolean value if this is a Boolean, None otherwise.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Payload::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns a reference to the string if this is a String, None otherwise.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Payload::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the slot chain if this is an array or object.
    pub fn collection(&self) -> Option<Collection> {
        match self {
            Payload::Array(c) | Payload::Object(c) => Some(*c),
            _ => None,
        }
    }
}
