//! Conversions between Rust values and stored payloads.
//!
//! Reads never fail: a value that does not convert yields the target type's
//! default. Writes fail only when the arena runs out of room.

use crate::arena::{Arena, NodeId};
use crate::data::{Collection, JsonStr, Payload, RawJson, StringLike};
use crate::error::{ErrorCode, VariantResult};
use crate::proxy::{ElementProxy, MemberProxy};

use super::{ArrayMut, MutableView, ObjectMut, ReadOnlyView, VariantRead, VariantWrite};

/// Types that can be read out of a stored value.
pub trait FromVariant: Sized {
    /// True when the payload is stored as this type.
    fn matches(payload: &Payload) -> bool;

    /// Convert the payload, falling back to the type's default.
    fn from_payload(payload: &Payload) -> Self;
}

/// Types that can be written into a node.
pub trait IntoVariant {
    /// Build a payload in `arena`. Containers are built detached, so the
    /// source may be an ancestor of the node being written.
    fn to_payload(&self, arena: &Arena) -> VariantResult<Payload>;
}

macro_rules! integer_conversions {
    ($variant:ident as $wide:ty: $($t:ty),*) => {$(
        impl FromVariant for $t {
            fn matches(payload: &Payload) -> bool {
                match payload {
                    Payload::SignedInteger(i) => <$t>::try_from(*i).is_ok(),
                    Payload::UnsignedInteger(u) => <$t>::try_from(*u).is_ok(),
                    _ => false,
                }
            }

            fn from_payload(payload: &Payload) -> Self {
                match payload {
                    Payload::SignedInteger(i) => <$t>::try_from(*i).unwrap_or(0),
                    Payload::UnsignedInteger(u) => <$t>::try_from(*u).unwrap_or(0),
                    Payload::Float(f)
                        if f.is_finite() && *f >= <$t>::MIN as f64 && *f <= <$t>::MAX as f64 =>
                    {
                        *f as $t
                    }
                    Payload::Boolean(b) => <$t>::from(*b),
                    _ => 0,
                }
            }
        }

        impl IntoVariant for $t {
            fn to_payload(&self, _arena: &Arena) -> VariantResult<Payload> {
                Ok(Payload::$variant(*self as $wide))
            }
        }
    )*};
}

integer_conversions!(SignedInteger as i64: i8, i16, i32, i64, isize);
integer_conversions!(UnsignedInteger as u64: u8, u16, u32, u64, usize);

macro_rules! float_conversions {
    ($($t:ty),*) => {$(
        impl FromVariant for $t {
            fn matches(payload: &Payload) -> bool {
                payload.kind().is_number()
            }

            fn from_payload(payload: &Payload) -> Self {
                match payload {
                    Payload::Float(f) => *f as $t,
                    Payload::SignedInteger(i) => *i as $t,
                    Payload::UnsignedInteger(u) => *u as $t,
                    Payload::Boolean(b) => u8::from(*b) as $t,
                    _ => 0.0,
                }
            }
        }

        impl IntoVariant for $t {
            fn to_payload(&self, _arena: &Arena) -> VariantResult<Payload> {
                Ok(Payload::Float(f64::from(*self)))
            }
        }
    )*};
}

float_conversions!(f32, f64);

impl FromVariant for bool {
    fn matches(payload: &Payload) -> bool {
        matches!(payload, Payload::Boolean(_))
    }

    fn from_payload(payload: &Payload) -> Self {
        match payload {
            Payload::Boolean(b) => *b,
            Payload::SignedInteger(i) => *i != 0,
            Payload::UnsignedInteger(u) => *u != 0,
            Payload::Float(f) => *f != 0.0,
            _ => false,
        }
    }
}

impl FromVariant for String {
    fn matches(payload: &Payload) -> bool {
        matches!(payload, Payload::String(_))
    }

    fn from_payload(payload: &Payload) -> Self {
        payload.as_str().map(str::to_owned).unwrap_or_default()
    }
}

impl FromVariant for JsonStr {
    fn matches(payload: &Payload) -> bool {
        matches!(payload, Payload::String(_))
    }

    fn from_payload(payload: &Payload) -> Self {
        match payload {
            Payload::String(s) => s.clone(),
            _ => JsonStr::from(""),
        }
    }
}

impl IntoVariant for bool {
    fn to_payload(&self, _arena: &Arena) -> VariantResult<Payload> {
        Ok(Payload::Boolean(*self))
    }
}

/// Writes null.
impl IntoVariant for () {
    fn to_payload(&self, _arena: &Arena) -> VariantResult<Payload> {
        Ok(Payload::Null)
    }
}

impl IntoVariant for str {
    fn to_payload(&self, arena: &Arena) -> VariantResult<Payload> {
        Ok(Payload::String(arena.allocate_string(self)?))
    }
}

impl IntoVariant for String {
    fn to_payload(&self, arena: &Arena) -> VariantResult<Payload> {
        self.as_str().to_payload(arena)
    }
}

impl IntoVariant for JsonStr {
    fn to_payload(&self, arena: &Arena) -> VariantResult<Payload> {
        Ok(Payload::String(arena.adopt_string(self)?))
    }
}

impl IntoVariant for RawJson<'_> {
    fn to_payload(&self, arena: &Arena) -> VariantResult<Payload> {
        Ok(Payload::Raw(arena.allocate_raw(self.0)?))
    }
}

/// `None` writes null.
impl<T: IntoVariant> IntoVariant for Option<T> {
    fn to_payload(&self, arena: &Arena) -> VariantResult<Payload> {
        match self {
            Some(value) => value.to_payload(arena),
            None => Ok(Payload::Null),
        }
    }
}

impl<T: IntoVariant + ?Sized> IntoVariant for &T {
    fn to_payload(&self, arena: &Arena) -> VariantResult<Payload> {
        (**self).to_payload(arena)
    }
}

macro_rules! copy_from_handle {
    ($(impl[$($gen:tt)*] $handle:ty;)*) => {$(
        impl<$($gen)*> IntoVariant for $handle {
            fn to_payload(&self, arena: &Arena) -> VariantResult<Payload> {
                clone_into(self.view(), arena)
            }
        }
    )*};
}

copy_from_handle! {
    impl['a] ReadOnlyView<'a>;
    impl['a] MutableView<'a>;
    impl['a] ArrayMut<'a>;
    impl['a] ObjectMut<'a>;
    impl['a, U: VariantWrite<'a>] ElementProxy<'a, U>;
    impl['a, U: VariantWrite<'a>, K: StringLike] MemberProxy<'a, U, K>;
}

/// Deep-copy the value under `source` into `arena` as a detached payload.
/// Links in the source are read through; the copy owns everything.
pub(crate) fn clone_into(source: ReadOnlyView<'_>, arena: &Arena) -> VariantResult<Payload> {
    match source.target() {
        Some((from, node)) => copy_node(from, node, arena, 0),
        None => Ok(Payload::Null),
    }
}

// `depth` counts the containers already entered on the copy side.
fn copy_node(from: &Arena, node: NodeId, to: &Arena, depth: u64) -> VariantResult<Payload> {
    let payload = from.payload(node);
    if payload.collection().is_some() {
        let limit = to.limits().max_nesting_depth;
        if depth >= limit {
            return Err(ErrorCode::E101_NestingTooDeep(limit));
        }
    }
    Ok(match payload {
        Payload::String(s) => Payload::String(to.adopt_string(&s)?),
        Payload::Raw(bytes) => Payload::Raw(to.adopt_raw(&bytes)?),
        Payload::Array(collection) => {
            Payload::Array(copy_collection(from, collection, to, depth + 1)?)
        }
        Payload::Object(collection) => {
            Payload::Object(copy_collection(from, collection, to, depth + 1)?)
        }
        scalar => scalar,
    })
}

fn copy_collection(
    from: &Arena,
    source: Collection,
    to: &Arena,
    depth: u64,
) -> VariantResult<Collection> {
    let mut copy = Collection::default();
    let mut cursor = source.head;
    while let Some(slot) = cursor {
        let key = from
            .slot_key(slot)
            .map(|key| to.adopt_string(&key))
            .transpose()?;
        let payload = copy_node(from, slot, to, depth)?;
        let target = to.allocate_node()?;
        to.write(target, |node| {
            node.key = key;
            node.payload = payload;
        });
        to.chain(&mut copy, target);
        cursor = from.next_slot(slot);
    }
    Ok(copy)
}
