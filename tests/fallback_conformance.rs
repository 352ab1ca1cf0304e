//! Default-fallback operator conformance tests.
//!
//! These tests verify both meanings of `value | default`: a typed default
//! that replaces values of another type, and a handle default that coalesces
//! nulls.

use variant_json::prelude::*;
use variant_json::{coalesce_mut, JsonStr};

// ============================================================================
// Typed Defaults
// ============================================================================

#[test]
fn unbound_takes_the_default() {
    assert_eq!(ReadOnlyView::unbound() | 42i32, 42);
    assert_eq!(ReadOnlyView::unbound() | 2.5f64, 2.5);
    assert!(!(ReadOnlyView::unbound() | false));
}

#[test]
fn mismatched_type_takes_the_default() {
    let arena = Arena::default();
    let root = arena.root();
    root.set("text").unwrap();
    assert_eq!(root | 42i32, 42);
    assert!(root | true);
}

#[test]
fn matching_type_keeps_the_value() {
    let arena = Arena::default();
    let root = arena.root();
    root.set(42).unwrap();
    assert_eq!(root | 99i32, 42);
    assert_eq!(root | 99u64, 42);
    // integers are numbers, so a float default keeps them too
    assert_eq!(root | 0.5f64, 42.0);
}

#[test]
fn integer_default_rejects_out_of_range_values() {
    let arena = Arena::default();
    let root = arena.root();
    root.set(-1).unwrap();
    assert_eq!(root | 5u32, 5);
    assert_eq!(root | 5i8, -1);
}

#[test]
fn string_defaults() {
    let arena = Arena::default();
    let root = arena.root();
    root.member("name").set("kept").unwrap();
    root.member("port").set(80).unwrap();

    let name: JsonStr = root.member("name") | "fallback";
    assert_eq!(&*name, "kept");
    let port_as_text: JsonStr = root.member("port") | "none";
    assert_eq!(&*port_as_text, "none");
    assert_eq!(root.member("missing") | String::from("owned"), "owned");
}

#[test]
fn defaults_never_allocate() {
    let arena = Arena::default();
    let root = arena.root();
    let _ = root.member("a").at(3) | 1i32;
    let _ = root.member("b") | "x";
    let _ = root.member("c") | arena.root_readonly();
    assert_eq!(arena.slot_count(), 0);
}

// ============================================================================
// Handle Defaults
// ============================================================================

#[test]
fn null_proxy_takes_the_bound_proxy() {
    let arena = Arena::default();
    let root = arena.root();
    root.member("set").set("value").unwrap();
    root.member("empty").set(()).unwrap();

    let picked = root.member("empty") | root.member("set");
    assert_eq!(picked.as_str().as_deref(), Some("value"));
    let picked = root.member("absent") | root.member("set");
    assert_eq!(picked.as_str().as_deref(), Some("value"));
}

#[test]
fn bound_proxy_keeps_its_value() {
    let arena = Arena::default();
    let root = arena.root();
    root.member("primary").set(1).unwrap();
    root.member("fallback").set(2).unwrap();

    let picked = root.member("primary") | root.member("fallback");
    assert_eq!(picked.value::<i32>(), 1);
    assert!(picked == 1i32);
}

#[test]
fn defaults_may_come_from_another_arena() {
    let defaults = Arena::default();
    defaults.root().member("timeout").set(30).unwrap();

    let arena = Arena::default();
    let root = arena.root_readonly();
    let timeout = root.get_member("timeout") | defaults.root_readonly().get_member("timeout");
    assert_eq!(timeout.value::<u32>(), 30);
    assert!(timeout.belongs_to(&defaults));
    assert!(!timeout.belongs_to(&arena));
}

#[test]
fn coalescing_chains() {
    let arena = Arena::default();
    let root = arena.root();
    root.member("last").set(3).unwrap();
    let picked = root.member("first") | root.member("second") | root.member("last");
    assert_eq!(picked.value::<i32>(), 3);
    assert_eq!(root.member("first") | root.member("second") | 7i32, 7);
}

#[test]
fn writable_coalescing_targets_the_same_place() {
    let arena = Arena::default();
    let root = arena.root();
    root.member("override").set(()).unwrap();
    root.member("base").set("a").unwrap();

    let read = root.member("override") | root.member("base");
    let place = coalesce_mut(&root.member("override"), &root.member("base")).unwrap();
    assert!(place.view() == read);

    place.set("b").unwrap();
    assert_eq!(read.as_str().as_deref(), Some("b"));
    assert!(root.get_member("override").is_null());
}
