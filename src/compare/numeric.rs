//! Mixed-representation numeric comparison.
//!
//! Integers compare exactly across signedness: a negative signed value is
//! below every unsigned value. Floats compare against integers by value,
//! without first rounding the integer to a double.

use std::cmp::Ordering;

use super::CompareResult;
use crate::data::Payload;

/// A number in one of its three stored representations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    /// i64 representation
    Signed(i64),
    /// u64 representation
    Unsigned(u64),
    /// f64 representation
    Float(f64),
}

impl Number {
    /// Numeric view of a payload, if it holds a number.
    pub fn from_payload(payload: &Payload) -> Option<Self> {
        match payload {
            Payload::SignedInteger(i) => Some(Number::Signed(*i)),
            Payload::UnsignedInteger(u) => Some(Number::Unsigned(*u)),
            Payload::Float(f) => Some(Number::Float(*f)),
            _ => None,
        }
    }
}

// 2^63 and 2^64 are exactly representable as f64.
const TWO_POW_63: f64 = 9_223_372_036_854_775_808.0;
const TWO_POW_64: f64 = 18_446_744_073_709_551_616.0;

/// Three-way comparison of two numbers by value.
pub fn arithmetic_compare(lhs: Number, rhs: Number) -> CompareResult {
    match (lhs, rhs) {
        (Number::Signed(a), Number::Signed(b)) => a.cmp(&b).into(),
        (Number::Unsigned(a), Number::Unsigned(b)) => a.cmp(&b).into(),
        (Number::Signed(a), Number::Unsigned(b)) => signed_vs_unsigned(a, b),
        (Number::Unsigned(a), Number::Signed(b)) => signed_vs_unsigned(b, a).reverse(),
        (Number::Float(a), Number::Float(b)) => a.partial_cmp(&b).into(),
        (Number::Float(a), Number::Signed(b)) => float_vs_signed(a, b),
        (Number::Signed(a), Number::Float(b)) => float_vs_signed(b, a).reverse(),
        (Number::Float(a), Number::Unsigned(b)) => float_vs_unsigned(a, b),
        (Number::Unsigned(a), Number::Float(b)) => float_vs_unsigned(b, a).reverse(),
    }
}

fn signed_vs_unsigned(lhs: i64, rhs: u64) -> CompareResult {
    match u64::try_from(lhs) {
        Ok(lhs) => lhs.cmp(&rhs).into(),
        Err(_) => CompareResult::Less,
    }
}

fn float_vs_signed(lhs: f64, rhs: i64) -> CompareResult {
    if lhs.is_nan() {
        return CompareResult::Incomparable;
    }
    if lhs >= TWO_POW_63 {
        return CompareResult::Greater;
    }
    if lhs < -TWO_POW_63 {
        return CompareResult::Less;
    }
    // In range, so the cast is exact
    let whole = lhs.trunc() as i64;
    match whole.cmp(&rhs) {
        Ordering::Equal => fraction_sign(lhs),
        ordering => ordering.into(),
    }
}

fn float_vs_unsigned(lhs: f64, rhs: u64) -> CompareResult {
    if lhs.is_nan() {
        return CompareResult::Incomparable;
    }
    if lhs < 0.0 {
        return CompareResult::Less;
    }
    if lhs >= TWO_POW_64 {
        return CompareResult::Greater;
    }
    let whole = lhs.trunc() as u64;
    match whole.cmp(&rhs) {
        Ordering::Equal => fraction_sign(lhs),
        ordering => ordering.into(),
    }
}

fn fraction_sign(value: f64) -> CompareResult {
    (value - value.trunc()).partial_cmp(&0.0).into()
}
