//! Relational operators for every value handle.
//!
//! `==` is `Equal`, `!=` is anything else. The ordering operators go through
//! `partial_cmp`, which maps `Incomparable` to `None`, so `<=` and `>=` are
//! both false for incomparable pairs.

use std::cmp::Ordering;

use super::{compare, CompareResult, Operand, Strategy};
use crate::data::{JsonStr, StringLike};
use crate::proxy::{ElementProxy, MemberProxy};
use crate::view::{ArrayMut, MutableView, ObjectMut, ReadOnlyView, VariantRead, VariantWrite};

impl Operand for ReadOnlyView<'_> {
    fn strategy(&self) -> Strategy<'_> {
        Strategy::Variant(*self)
    }
}

impl Operand for MutableView<'_> {
    fn strategy(&self) -> Strategy<'_> {
        Strategy::Variant(self.view())
    }
}

impl Operand for ArrayMut<'_> {
    fn strategy(&self) -> Strategy<'_> {
        Strategy::Array(self.view())
    }
}

impl Operand for ObjectMut<'_> {
    fn strategy(&self) -> Strategy<'_> {
        Strategy::Object(self.view())
    }
}

impl<'a, U: VariantWrite<'a>> Operand for ElementProxy<'a, U> {
    fn strategy(&self) -> Strategy<'_> {
        Strategy::Variant(self.view())
    }
}

impl<'a, U: VariantWrite<'a>, K: StringLike> Operand for MemberProxy<'a, U, K> {
    fn strategy(&self) -> Strategy<'_> {
        Strategy::Variant(self.view())
    }
}

macro_rules! relational_ops {
    ($(impl[$($gen:tt)*] $handle:ty;)*) => {$(
        impl<$($gen)*, Rhs: Operand + ?Sized> PartialEq<Rhs> for $handle {
            fn eq(&self, other: &Rhs) -> bool {
                compare(self.view(), other) == CompareResult::Equal
            }
        }

        impl<$($gen)*, Rhs: Operand + ?Sized> PartialOrd<Rhs> for $handle {
            fn partial_cmp(&self, other: &Rhs) -> Option<Ordering> {
                compare(self.view(), other).to_ordering()
            }
        }
    )*};
}

relational_ops! {
    impl['a] ReadOnlyView<'a>;
    impl['a] MutableView<'a>;
    impl['a] ArrayMut<'a>;
    impl['a] ObjectMut<'a>;
    impl['a, U: VariantWrite<'a>] ElementProxy<'a, U>;
    impl['a, U: VariantWrite<'a>, K: StringLike] MemberProxy<'a, U, K>;
}

// Scalars on the left of a view: `42 == view`, `"x" < view`.
macro_rules! reversed_ops {
    (@impl [$($lt:lifetime)?] $lhs:ty) => {
        reversed_ops!(@one [$($lt)?] $lhs, ReadOnlyView<'a>);
        reversed_ops!(@one [$($lt)?] $lhs, MutableView<'a>);
    };
    (@one [$($lt:lifetime)?] $lhs:ty, $handle:ty) => {
        impl<'a $(, $lt)?> PartialEq<$handle> for $lhs {
            fn eq(&self, other: &$handle) -> bool {
                compare(other.view(), self) == CompareResult::Equal
            }
        }

        impl<'a $(, $lt)?> PartialOrd<$handle> for $lhs {
            fn partial_cmp(&self, other: &$handle) -> Option<Ordering> {
                compare(other.view(), self).reverse().to_ordering()
            }
        }
    };
    ($($lhs:ty),* $(,)?) => {
        $(reversed_ops!(@impl [] $lhs);)*
    };
}

reversed_ops!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64, bool, String, JsonStr);
reversed_ops!(@impl ['s] &'s str);

#[cfg(test)]
mod tests {
    use crate::arena::Arena;
    use crate::data::RawJson;
    use crate::view::{VariantRead, VariantWrite};

    #[test]
    fn test_incomparable_operators() {
        let arena = Arena::default();
        let view = arena.root_readonly();
        // null against a number
        assert!(!(view <= 1i32));
        assert!(!(view >= 1i32));
        assert!(!(view < 1i32));
        assert!(!(view > 1i32));
        assert!(view != 1i32);
        assert!(!(view == 1i32));
        assert!(view == ());
    }

    #[test]
    fn test_reversed_operators() {
        let arena = Arena::default();
        let root = arena.root();
        root.set(10).unwrap();
        assert!(10i32 == root);
        assert!(9i32 < root);
        assert!(11.5f64 > root);
        assert!(10u64 <= arena.root_readonly());
        assert!("10" != root);

        root.set("beta").unwrap();
        assert!("alpha" < root);
        assert!(String::from("gamma") > root);
    }

    #[test]
    fn test_handles_compare_as_variants() {
        let arena = Arena::default();
        let root = arena.root();
        let list = root.member("list").to_array().unwrap();
        list.add(1).unwrap();
        list.add(2).unwrap();
        root.member("copy").set(list).unwrap();
        root.member("raw").set(RawJson(b"{}")).unwrap();

        assert!(root.member("copy") == list);
        assert!(list == root.get_member("copy"));
        assert!(root.member("list") == root.member("copy"));
        assert!(root.member("missing") == ());
        assert!(root.member("raw") == RawJson(b"{}"));
        assert_eq!(root.size(), 3);
    }
}
