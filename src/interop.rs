//! Bridge to serde and `serde_json`.
//!
//! Text parsing and printing are left to `serde_json`. This module only moves
//! values between a `serde_json::Value` and the arena:
//!
//! - every handle implements [`Serialize`]; raw fragments are emitted verbatim
//! - `serde_json::Value` implements [`IntoVariant`], bounded by the arena's
//!   `max_nesting_depth`
//!
//! Serialization is bounded by the same limit, so a tree built deeper than
//! its arena allows through the write API fails with an error instead of
//! recursing without end.

use serde::ser::{Error as _, SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use serde_json::value::RawValue;
use serde_json::Value;

use crate::arena::Arena;
use crate::data::{Collection, Payload, StringLike};
use crate::error::{ErrorCode, VariantResult};
use crate::proxy::{ElementProxy, MemberProxy};
use crate::view::{ArrayMut, IntoVariant, MutableView, ObjectMut, ReadOnlyView, VariantRead, VariantWrite};

impl Serialize for ReadOnlyView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        Nested {
            view: *self,
            depth: 0,
        }
        .serialize(serializer)
    }
}

/// A view together with the number of containers around it.
struct Nested<'a> {
    view: ReadOnlyView<'a>,
    depth: u64,
}

impl Nested<'_> {
    fn child<'c>(&self, view: ReadOnlyView<'c>) -> Nested<'c> {
        Nested {
            view,
            depth: self.depth + 1,
        }
    }

    fn check_depth<E: serde::ser::Error>(&self) -> Result<(), E> {
        let limit = nesting_limit(self.view);
        if self.depth >= limit {
            return Err(E::custom(ErrorCode::E101_NestingTooDeep(limit)));
        }
        Ok(())
    }
}

impl Serialize for Nested<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let view = self.view;
        match view.payload() {
            Payload::Null => serializer.serialize_unit(),
            Payload::Boolean(b) => serializer.serialize_bool(b),
            Payload::SignedInteger(i) => serializer.serialize_i64(i),
            Payload::UnsignedInteger(u) => serializer.serialize_u64(u),
            Payload::Float(f) => serializer.serialize_f64(f),
            Payload::String(s) => serializer.serialize_str(&s),
            Payload::Raw(bytes) => {
                let text = std::str::from_utf8(&bytes).map_err(S::Error::custom)?;
                let raw = RawValue::from_string(text.to_owned()).map_err(S::Error::custom)?;
                raw.serialize(serializer)
            }
            Payload::Array(_) => {
                self.check_depth::<S::Error>()?;
                let mut seq = serializer.serialize_seq(Some(view.size()))?;
                for element in view.elements() {
                    seq.serialize_element(&self.child(element))?;
                }
                seq.end()
            }
            Payload::Object(_) => {
                self.check_depth::<S::Error>()?;
                let mut map = serializer.serialize_map(Some(view.size()))?;
                for (key, value) in view.members() {
                    map.serialize_entry(&*key, &self.child(value))?;
                }
                map.end()
            }
        }
    }
}

fn nesting_limit(view: ReadOnlyView<'_>) -> u64 {
    view.target()
        .map_or(0, |(arena, _)| arena.limits().max_nesting_depth)
}

/// `E101` when `view` holds containers nested past its arena's limit.
fn check_nesting(view: ReadOnlyView<'_>) -> VariantResult<()> {
    match view.target() {
        Some((arena, node)) => {
            let limit = arena.limits().max_nesting_depth;
            if arena.exceeds_depth(node, limit) {
                return Err(ErrorCode::E101_NestingTooDeep(limit));
            }
            Ok(())
        }
        None => Ok(()),
    }
}

macro_rules! serialize_through_view {
    ($(impl[$($gen:tt)*] $handle:ty;)*) => {$(
        impl<$($gen)*> Serialize for $handle {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                self.view().serialize(serializer)
            }
        }
    )*};
}

serialize_through_view! {
    impl['a] MutableView<'a>;
    impl['a] ArrayMut<'a>;
    impl['a] ObjectMut<'a>;
    impl['a, U: VariantWrite<'a>] ElementProxy<'a, U>;
    impl['a, U: VariantWrite<'a>, K: StringLike] MemberProxy<'a, U, K>;
}

impl IntoVariant for Value {
    fn to_payload(&self, arena: &Arena) -> VariantResult<Payload> {
        import(self, arena, 0)
    }
}

fn import(value: &Value, arena: &Arena, depth: u64) -> VariantResult<Payload> {
    let limit = arena.limits().max_nesting_depth;
    Ok(match value {
        Value::Null => Payload::Null,
        Value::Bool(b) => Payload::Boolean(*b),
        Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                Payload::UnsignedInteger(u)
            } else if let Some(i) = n.as_i64() {
                Payload::SignedInteger(i)
            } else {
                Payload::Float(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        Value::String(s) => Payload::String(arena.allocate_string(s)?),
        Value::Array(items) => {
            if depth >= limit {
                return Err(ErrorCode::E101_NestingTooDeep(limit));
            }
            let mut collection = Collection::default();
            for item in items {
                let payload = import(item, arena, depth + 1)?;
                let slot = arena.allocate_node()?;
                arena.write(slot, |node| node.payload = payload);
                arena.chain(&mut collection, slot);
            }
            Payload::Array(collection)
        }
        Value::Object(entries) => {
            if depth >= limit {
                return Err(ErrorCode::E101_NestingTooDeep(limit));
            }
            let mut collection = Collection::default();
            for (key, item) in entries {
                let key = arena.allocate_string(key)?;
                let payload = import(item, arena, depth + 1)?;
                let slot = arena.allocate_node()?;
                arena.write(slot, |node| {
                    node.key = Some(key);
                    node.payload = payload;
                });
                arena.chain(&mut collection, slot);
            }
            Payload::Object(collection)
        }
    })
}

/// Parse JSON text and store it at `target`.
///
/// # Errors
///
/// `E100` for malformed text, `E101` when nesting exceeds the arena's limit,
/// and the allocation errors of [`VariantWrite::set`].
pub fn parse_into<'a, W: VariantWrite<'a> + ?Sized>(target: &W, text: &str) -> VariantResult<()> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| ErrorCode::E100_InvalidJSON(e.to_string()))?;
    target.set(&value)
}

/// Render a value as compact JSON text.
///
/// # Errors
///
/// `E101` when containers nest past the arena's limit, `E100` when a raw
/// fragment is not valid JSON.
pub fn to_json<'a, V: VariantRead<'a> + ?Sized>(value: &V) -> VariantResult<String> {
    let view = value.view();
    check_nesting(view)?;
    serde_json::to_string(&view).map_err(|e| ErrorCode::E100_InvalidJSON(e.to_string()))
}

/// Convert a value into an owned `serde_json::Value`.
pub fn to_value<'a, V: VariantRead<'a> + ?Sized>(value: &V) -> VariantResult<Value> {
    let view = value.view();
    check_nesting(view)?;
    serde_json::to_value(view).map_err(|e| ErrorCode::E100_InvalidJSON(e.to_string()))
}
