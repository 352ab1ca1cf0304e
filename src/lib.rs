//! Variant JSON - dynamically typed JSON values over a bounded arena.
//!
//! Values live in an [`Arena`] and are reached through cheap handles that
//! carry their capabilities in the type:
//!
//! - [`ReadOnlyView`] reads and never allocates
//! - [`MutableView`] also writes, allocating only when a write needs room
//! - [`ElementProxy`] / [`MemberProxy`] name a place that may not exist yet,
//!   and create it only when written
//!
//! # Architecture
//!
//! - [`arena`] - index-based node storage with slot and string budgets
//! - [`data`] - value kinds, payloads and the string-like capability
//! - [`compare`] - three-way comparison and the relational operators
//! - [`view`] - read-only and mutable handles, conversions, iteration
//! - [`proxy`] - deferred index/key handles and their two resolvers
//! - [`fallback`] - the `|` default operator
//! - [`interop`] - serde and `serde_json` bridge
//! - [`error`] - numbered error codes
//!
//! # Example
//!
//! ```
//! use variant_json::prelude::*;
//!
//! let arena = Arena::new(ArenaLimits::embedded());
//! let root = arena.root();
//! root.member("sensor").set("gps").unwrap();
//! root.member("data").add(48.75).unwrap();
//! root.member("data").add(2.30).unwrap();
//!
//! assert!(root.member("sensor") == "gps");
//! assert_eq!(root.member("data").size(), 2);
//! assert!(root.member("time").is_null());
//! ```

// Exhaustion is reported through results; library code must not abort.
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(missing_docs)]

pub mod arena;
pub mod compare;
pub mod data;
pub mod error;
pub mod fallback;
pub mod interop;
pub mod proxy;
pub mod view;

// Re-export commonly used types
pub use arena::{Arena, ArenaLimits, ArenaStats, NodeId};
pub use compare::{compare, CompareResult, Operand};
pub use data::{JsonStr, RawJson, StringLike, ValueKind};
pub use error::{ErrorCode, VariantResult};
pub use fallback::{coalesce_mut, Fallback};
pub use proxy::{ElementProxy, MemberProxy};
pub use view::{
    lookup, ArrayMut, FromVariant, IntoVariant, MutableView, ObjectMut, ReadOnlyView, VariantRead,
    VariantWrite,
};

/// Everything needed to work with values, including the handle traits.
pub mod prelude {
    pub use crate::arena::{Arena, ArenaLimits};
    pub use crate::compare::CompareResult;
    pub use crate::data::{RawJson, ValueKind};
    pub use crate::error::{ErrorCode, VariantResult};
    pub use crate::view::{
        ArrayMut, MutableView, ObjectMut, ReadOnlyView, VariantRead, VariantWrite,
    };
}
