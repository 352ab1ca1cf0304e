//! Three-way comparison of a stored value against a typed operand.
//!
//! The static type of the right operand picks a [`Strategy`] through the
//! [`Operand`] trait. The strategy is then matched once against the dynamic
//! kind of the left value. Comparing two variants converts the left one into
//! a typed strategy and visits the right one with it, so `compare(a, b)` and
//! `compare(b, a)` are always exact mirrors.
//!
//! # Ordering rules
//!
//! - Numbers compare by value across signed, unsigned and float storage
//! - Strings compare byte-wise; the null string equals only null
//! - Booleans compare only with booleans (`false < true`)
//! - Raw fragments compare over the shorter length only
//! - Arrays and objects are either `Equal` or `Incomparable`
//! - Containers nested past the arena's `max_nesting_depth` are `Incomparable`
//! - Every other pairing is `Incomparable`

mod numeric;
mod ops;

use std::cmp::Ordering;
use std::fmt;

use crate::data::{JsonStr, Payload, RawJson};
use crate::view::{ReadOnlyView, VariantRead};

pub use numeric::{arithmetic_compare, Number};

/// Outcome of comparing two values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareResult {
    /// Left sorts before right
    Less,
    /// Values are equal
    Equal,
    /// Left sorts after right
    Greater,
    /// No ordering relation exists between the two values
    Incomparable,
}

impl CompareResult {
    /// Swap `Less` and `Greater`.
    pub fn reverse(self) -> Self {
        match self {
            CompareResult::Less => CompareResult::Greater,
            CompareResult::Greater => CompareResult::Less,
            other => other,
        }
    }

    /// `None` for `Incomparable`.
    pub fn to_ordering(self) -> Option<Ordering> {
        match self {
            CompareResult::Less => Some(Ordering::Less),
            CompareResult::Equal => Some(Ordering::Equal),
            CompareResult::Greater => Some(Ordering::Greater),
            CompareResult::Incomparable => None,
        }
    }

    /// True for `Less` or `Equal`.
    pub fn is_less_or_equal(self) -> bool {
        matches!(self, CompareResult::Less | CompareResult::Equal)
    }

    /// True for `Greater` or `Equal`.
    pub fn is_greater_or_equal(self) -> bool {
        matches!(self, CompareResult::Greater | CompareResult::Equal)
    }

    /// Lowercase name used in CLI output.
    pub fn as_str(self) -> &'static str {
        match self {
            CompareResult::Less => "less",
            CompareResult::Equal => "equal",
            CompareResult::Greater => "greater",
            CompareResult::Incomparable => "incomparable",
        }
    }
}

impl From<Ordering> for CompareResult {
    fn from(ordering: Ordering) -> Self {
        match ordering {
            Ordering::Less => CompareResult::Less,
            Ordering::Equal => CompareResult::Equal,
            Ordering::Greater => CompareResult::Greater,
        }
    }
}

impl From<Option<Ordering>> for CompareResult {
    fn from(ordering: Option<Ordering>) -> Self {
        ordering.map_or(CompareResult::Incomparable, CompareResult::from)
    }
}

impl fmt::Display for CompareResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Right-hand operand of a comparison, reduced to what the comparison needs.
#[derive(Debug, Clone, Copy)]
pub enum Strategy<'r> {
    /// Matches only null or unbound values
    Null,
    /// Matches only booleans
    Boolean(bool),
    /// Matches any numeric kind
    Number(Number),
    /// `None` is the null string
    String(Option<&'r str>),
    /// Prefix comparison against raw fragments
    Raw(&'r [u8]),
    /// Element-wise equality against arrays
    Array(ReadOnlyView<'r>),
    /// Member-wise equality against objects
    Object(ReadOnlyView<'r>),
    /// Any stored value, compared by mirroring
    Variant(ReadOnlyView<'r>),
}

impl<'r> Strategy<'r> {
    /// Typed strategy for a stored payload. Never returns `Variant`.
    fn of(payload: &'r Payload, view: ReadOnlyView<'r>) -> Self {
        match payload {
            Payload::Null => Strategy::Null,
            Payload::Boolean(b) => Strategy::Boolean(*b),
            Payload::SignedInteger(i) => Strategy::Number(Number::Signed(*i)),
            Payload::UnsignedInteger(u) => Strategy::Number(Number::Unsigned(*u)),
            Payload::Float(f) => Strategy::Number(Number::Float(*f)),
            Payload::String(s) => Strategy::String(Some(&**s)),
            Payload::Raw(bytes) => Strategy::Raw(&**bytes),
            Payload::Array(_) => Strategy::Array(view),
            Payload::Object(_) => Strategy::Object(view),
        }
    }
}

/// Types that can appear on the right of a comparison.
pub trait Operand {
    /// Comparison strategy for this value.
    fn strategy(&self) -> Strategy<'_>;
}

/// Compare a stored value against any operand.
pub fn compare<T: Operand + ?Sized>(left: ReadOnlyView<'_>, right: &T) -> CompareResult {
    visit(left, &right.strategy(), 0)
}

/// `depth` counts the containers entered so far.
fn visit(left: ReadOnlyView<'_>, right: &Strategy<'_>, depth: u64) -> CompareResult {
    if let Strategy::Variant(other) = right {
        return mirror(left, *other, depth);
    }
    let payload = left.payload();
    match (&payload, right) {
        (Payload::Null, Strategy::Null | Strategy::String(None)) => CompareResult::Equal,
        (Payload::Boolean(a), Strategy::Boolean(b)) => a.cmp(b).into(),
        (_, Strategy::Number(rhs)) => Number::from_payload(&payload)
            .map_or(CompareResult::Incomparable, |lhs| arithmetic_compare(lhs, *rhs)),
        (Payload::String(a), Strategy::String(Some(b))) => a.as_bytes().cmp(b.as_bytes()).into(),
        (Payload::Raw(a), Strategy::Raw(b)) => compare_raw(a, b),
        (Payload::Array(_), Strategy::Array(rhs)) => compare_arrays(left, *rhs, depth),
        (Payload::Object(_), Strategy::Object(rhs)) => compare_objects(left, *rhs, depth),
        _ => CompareResult::Incomparable,
    }
}

/// Variant against variant: visit the right side with the left side's
/// strategy, then swap the roles back.
fn mirror(left: ReadOnlyView<'_>, right: ReadOnlyView<'_>, depth: u64) -> CompareResult {
    let payload = left.payload();
    visit(right, &Strategy::of(&payload, left), depth).reverse()
}

// Not a total order: a longer fragment sharing the shorter one's prefix is Equal.
fn compare_raw(lhs: &[u8], rhs: &[u8]) -> CompareResult {
    let n = lhs.len().min(rhs.len());
    lhs[..n].cmp(&rhs[..n]).into()
}

fn too_deep(view: ReadOnlyView<'_>, depth: u64) -> bool {
    match view.target() {
        Some((arena, _)) => depth >= arena.limits().max_nesting_depth,
        None => true,
    }
}

fn compare_arrays(lhs: ReadOnlyView<'_>, rhs: ReadOnlyView<'_>, depth: u64) -> CompareResult {
    if too_deep(lhs, depth) {
        return CompareResult::Incomparable;
    }
    let mut left = lhs.elements();
    let mut right = rhs.elements();
    loop {
        match (left.next(), right.next()) {
            (None, None) => return CompareResult::Equal,
            (Some(a), Some(b)) if equal_at(a, b, depth + 1) => {}
            _ => return CompareResult::Incomparable,
        }
    }
}

fn compare_objects(lhs: ReadOnlyView<'_>, rhs: ReadOnlyView<'_>, depth: u64) -> CompareResult {
    if too_deep(lhs, depth) {
        return CompareResult::Incomparable;
    }
    let mut count = 0;
    for (key, value) in lhs.members() {
        let other = rhs.get_member(&*key);
        if !other.is_bound() || !equal_at(value, other, depth + 1) {
            return CompareResult::Incomparable;
        }
        count += 1;
    }
    if count == rhs.size() {
        CompareResult::Equal
    } else {
        CompareResult::Incomparable
    }
}

fn equal_at(lhs: ReadOnlyView<'_>, rhs: ReadOnlyView<'_>, depth: u64) -> bool {
    visit(lhs, &Strategy::Variant(rhs), depth) == CompareResult::Equal
}

macro_rules! signed_operand {
    ($($t:ty),*) => {$(
        impl Operand for $t {
            fn strategy(&self) -> Strategy<'_> {
                Strategy::Number(Number::Signed(i64::from(*self)))
            }
        }
    )*};
}

macro_rules! unsigned_operand {
    ($($t:ty),*) => {$(
        impl Operand for $t {
            fn strategy(&self) -> Strategy<'_> {
                Strategy::Number(Number::Unsigned(u64::from(*self)))
            }
        }
    )*};
}

signed_operand!(i8, i16, i32, i64);
unsigned_operand!(u8, u16, u32, u64);

impl Operand for isize {
    fn strategy(&self) -> Strategy<'_> {
        Strategy::Number(Number::Signed(*self as i64))
    }
}

impl Operand for usize {
    fn strategy(&self) -> Strategy<'_> {
        Strategy::Number(Number::Unsigned(*self as u64))
    }
}

impl Operand for f32 {
    fn strategy(&self) -> Strategy<'_> {
        Strategy::Number(Number::Float(f64::from(*self)))
    }
}

impl Operand for f64 {
    fn strategy(&self) -> Strategy<'_> {
        Strategy::Number(Number::Float(*self))
    }
}

impl Operand for bool {
    fn strategy(&self) -> Strategy<'_> {
        Strategy::Boolean(*self)
    }
}

/// The unit value stands for JSON null.
impl Operand for () {
    fn strategy(&self) -> Strategy<'_> {
        Strategy::Null
    }
}

impl Operand for str {
    fn strategy(&self) -> Strategy<'_> {
        Strategy::String(Some(self))
    }
}

impl Operand for String {
    fn strategy(&self) -> Strategy<'_> {
        Strategy::String(Some(self.as_str()))
    }
}

impl Operand for JsonStr {
    fn strategy(&self) -> Strategy<'_> {
        Strategy::String(Some(&**self))
    }
}

impl Operand for Option<&str> {
    fn strategy(&self) -> Strategy<'_> {
        Strategy::String(*self)
    }
}

impl Operand for RawJson<'_> {
    fn strategy(&self) -> Strategy<'_> {
        Strategy::Raw(self.0)
    }
}

impl<T: Operand + ?Sized> Operand for &T {
    fn strategy(&self) -> Strategy<'_> {
        (**self).strategy()
    }
}
