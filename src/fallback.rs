//! The `|` default operator.
//!
//! What `value | default` means depends on the static type of `default`:
//!
//! - a scalar or string: the stored value if it is stored as that type,
//!   otherwise `default`
//! - another handle: the stored value if it is not null, otherwise the
//!   default handle's value (null coalescing)
//!
//! Coalescing with `|` always yields a [`ReadOnlyView`], even when both
//! operands are writable, so the operator has one output type and never
//! allocates. [`coalesce_mut`] picks the same place but hands back a
//! [`MutableView`] that can be written through.
//!
//! ```
//! use variant_json::prelude::*;
//!
//! let arena = Arena::default();
//! let root = arena.root();
//! root.member("port").set(8080).unwrap();
//!
//! assert_eq!(root.member("port") | 80u16, 8080);
//! assert_eq!(root.member("host") | 80u16, 80);
//! assert_eq!(&*(root.member("host") | "localhost"), "localhost");
//! ```

use std::ops::BitOr;

use crate::data::{JsonStr, StringLike};
use crate::proxy::{ElementProxy, MemberProxy};
use crate::view::{ArrayMut, MutableView, ObjectMut, ReadOnlyView, VariantRead, VariantWrite};

/// Right-hand side of the `|` operator.
pub trait Fallback<'a> {
    /// Result of the operator.
    type Output;

    /// Combine the stored value with this default.
    fn fallback(self, value: ReadOnlyView<'a>) -> Self::Output;
}

macro_rules! typed_fallback {
    ($($t:ty),*) => {$(
        impl<'a> Fallback<'a> for $t {
            type Output = $t;

            fn fallback(self, value: ReadOnlyView<'a>) -> $t {
                if value.is::<$t>() {
                    value.value::<$t>()
                } else {
                    self
                }
            }
        }
    )*};
}

typed_fallback!(bool, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64, String, JsonStr);

impl<'a> Fallback<'a> for &str {
    type Output = JsonStr;

    fn fallback(self, value: ReadOnlyView<'a>) -> JsonStr {
        value.as_str().unwrap_or_else(|| JsonStr::from(self))
    }
}

macro_rules! coalescing_fallback {
    ($(impl[$($gen:tt)*] $handle:ty;)*) => {$(
        impl<$($gen)*> Fallback<'a> for $handle {
            type Output = ReadOnlyView<'a>;

            fn fallback(self, value: ReadOnlyView<'a>) -> ReadOnlyView<'a> {
                if value.is_null() {
                    self.view()
                } else {
                    value
                }
            }
        }
    )*};
}

coalescing_fallback! {
    impl['a] ReadOnlyView<'a>;
    impl['a] MutableView<'a>;
    impl['a] ArrayMut<'a>;
    impl['a] ObjectMut<'a>;
    impl['a, U: VariantWrite<'a>] ElementProxy<'a, U>;
    impl['a, U: VariantWrite<'a>, K: StringLike] MemberProxy<'a, U, K>;
}

/// Writable form of `left | right` for two writable handles.
///
/// Returns `right` when `left` is null or missing, otherwise `left`.
/// `None` when the chosen place does not exist yet; nothing is created.
///
/// ```
/// use variant_json::fallback::coalesce_mut;
/// use variant_json::prelude::*;
///
/// let arena = Arena::default();
/// let root = arena.root();
/// root.member("fallback").set(1).unwrap();
///
/// let place = coalesce_mut(&root.member("primary"), &root.member("fallback")).unwrap();
/// place.set(2).unwrap();
/// assert_eq!(root.get_member("fallback").as_i64(), Some(2));
/// ```
pub fn coalesce_mut<'a, L, R>(left: &L, right: &R) -> Option<MutableView<'a>>
where
    L: VariantWrite<'a> + ?Sized,
    R: VariantWrite<'a> + ?Sized,
{
    if left.is_null() {
        right.existing()
    } else {
        left.existing()
    }
}

macro_rules! fallback_operator {
    ($(impl[$($gen:tt)*] $handle:ty;)*) => {$(
        impl<$($gen)*, D: Fallback<'a>> BitOr<D> for $handle {
            type Output = D::Output;

            fn bitor(self, default: D) -> D::Output {
                default.fallback(self.view())
            }
        }
    )*};
}

fallback_operator! {
    impl['a] ReadOnlyView<'a>;
    impl['a] MutableView<'a>;
    impl['a] ArrayMut<'a>;
    impl['a] ObjectMut<'a>;
    impl['a, U: VariantWrite<'a>] ElementProxy<'a, U>;
    impl['a, U: VariantWrite<'a>, K: StringLike] MemberProxy<'a, U, K>;
}
