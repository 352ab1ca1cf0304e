//! Variant view conformance tests.
//!
//! These tests verify the read-only and mutable handles: which operations
//! allocate, how `set`, `to_array`/`to_object`, `link` and `remove` reshape a
//! node, and how arena exhaustion is reported.
//!
//! # Requirements Tested
//!
//! - Reads never allocate, even through a mutable view
//! - Writes overwrite and change kind; failures leave null
//! - Container coercion, append, removal and iteration
//! - Zero-copy links and their copy fallbacks

use variant_json::arena::SLOT_SIZE;
use variant_json::prelude::*;
use variant_json::{lookup, JsonStr};

fn tiny(max_slots: u64, max_string_bytes: u64) -> Arena {
    Arena::new(ArenaLimits {
        max_slots,
        max_string_bytes,
        max_nesting_depth: 10,
    })
}

// ============================================================================
// Reads
// ============================================================================

#[test]
fn reads_never_allocate() {
    let arena = Arena::default();
    let root = arena.root();
    root.member("present").set(1).unwrap();
    let slots = arena.slot_count();

    assert!(root.member("absent").is_null());
    assert_eq!(root.member("absent").size(), 0);
    assert_eq!(root.member("absent").memory_usage(), 0);
    assert!(!root.member("absent").is::<i32>());
    assert_eq!(root.member("absent").value::<i32>(), 0);
    assert!(root.member("absent").at(3).member("deep").is_null());
    assert!(root.get_member("absent").get(0).get_member("x").is_null());

    assert_eq!(arena.slot_count(), slots);
}

// Only reads are reachable from a read-only handle.
fn read_everything(view: ReadOnlyView<'_>) -> usize {
    let mut seen = view.size() + view.memory_usage();
    for element in view.elements() {
        seen += read_everything(element);
    }
    for (_, member) in view.members() {
        seen += read_everything(member);
    }
    seen + usize::from(view.get_member("absent").get(3).is_null())
}

#[test]
fn readonly_view_only_identifies_its_arena() {
    let arena = Arena::default();
    let other = Arena::default();
    arena.root().member("a").add("x").unwrap();
    let slots = arena.slot_count();
    let bytes = arena.string_bytes();

    let view = arena.root_readonly().get_member("a");
    assert!(read_everything(view) > 0);
    assert!(view.belongs_to(&arena));
    assert!(!view.belongs_to(&other));
    assert!(!ReadOnlyView::unbound().belongs_to(&arena));

    assert_eq!(arena.slot_count(), slots);
    assert_eq!(arena.string_bytes(), bytes);
}

#[test]
fn unbound_view_reads_as_defaults() {
    let view = ReadOnlyView::unbound();
    assert!(!view.is_bound());
    assert!(view.is_null());
    assert_eq!(view.kind(), ValueKind::Null);
    assert_eq!(view.value::<f64>(), 0.0);
    assert_eq!(view.value::<String>(), "");
    assert!(!view.value::<bool>());
    assert_eq!(view.as_str(), None);
    assert_eq!(view.elements().count(), 0);
    assert_eq!(view.members().count(), 0);
}

#[test]
fn typed_reads_respect_kind() {
    let arena = Arena::default();
    let root = arena.root();
    root.set(300).unwrap();
    assert!(root.is::<i32>());
    assert!(root.is::<u16>());
    assert!(!root.is::<u8>());
    assert!(!root.is::<bool>());
    assert!(!root.is::<String>());
    assert_eq!(root.value::<u8>(), 0);
    assert_eq!(root.as_f64(), Some(300.0));

    root.set(-2.75).unwrap();
    assert!(root.is::<f32>());
    assert!(!root.is::<i64>());
    assert_eq!(root.value::<i64>(), -2);
    assert_eq!(root.as_i64(), None);

    root.set(true).unwrap();
    assert!(root.is::<bool>());
    assert_eq!(root.value::<i32>(), 1);
}

// ============================================================================
// Set
// ============================================================================

#[test]
fn set_overwrites_and_changes_kind() {
    let arena = Arena::default();
    let root = arena.root();
    root.set("text").unwrap();
    assert_eq!(root.kind(), ValueKind::String);
    root.set(1.5).unwrap();
    assert_eq!(root.kind(), ValueKind::Float);
    root.set(()).unwrap();
    assert!(root.is_null());
    root.set(Some(7u8)).unwrap();
    assert_eq!(root.value::<u8>(), 7);
    root.set(None::<u8>).unwrap();
    assert!(root.is_null());
}

#[test]
fn set_copies_strings_into_the_arena() {
    let arena = Arena::default();
    let root = arena.root();
    let owned = String::from("copied");
    root.set(&owned).unwrap();
    drop(owned);
    assert_eq!(root.as_str().as_deref(), Some("copied"));
    assert_eq!(arena.string_bytes(), 6);
}

#[test]
fn set_failure_reports_exhaustion_and_leaves_null() {
    let arena = tiny(8, 4);
    let root = arena.root();
    root.set(5).unwrap();
    let err = root.set("too long").unwrap_err();
    assert_eq!(err, ErrorCode::E002_StringPoolExhausted(8, 4));
    assert!(err.is_allocation_failure());
    assert!(root.is_null());
}

#[test]
fn slot_exhaustion_is_reported() {
    let arena = tiny(2, 64);
    let root = arena.root();
    root.add(1).unwrap();
    root.add(2).unwrap();
    assert_eq!(root.add(3), Err(ErrorCode::E001_SlotPoolExhausted(2)));
    assert_eq!(root.size(), 2);
}

#[test]
fn set_from_another_arena_deep_copies() {
    let source = Arena::default();
    source.root().member("list").add("a").unwrap();
    source.root().member("list").add(2).unwrap();

    let target = Arena::default();
    target.root().member("copy").set(source.root_readonly()).unwrap();
    source.root().member("list").clear();

    assert_eq!(target.root_readonly().get_member("copy").get_member("list").size(), 2);
    assert_eq!(
        lookup(&target.root_readonly(), "copy.list[0]").as_str().as_deref(),
        Some("a")
    );
}

#[test]
fn set_to_own_ancestor_is_safe() {
    let arena = Arena::default();
    let root = arena.root();
    root.member("a").add(1).unwrap();
    let inner = root.get_or_add_member("a").unwrap().get_or_add_element(0).unwrap();
    inner.set(root).unwrap();
    assert_eq!(lookup(&root, "a[0].a[0]").value::<i32>(), 1);
}

// ============================================================================
// Containers
// ============================================================================

#[test]
fn to_array_discards_content() {
    let arena = Arena::default();
    let root = arena.root();
    root.member("x").set(1).unwrap();
    let array = root.to_array();
    assert_eq!(root.kind(), ValueKind::Array);
    assert!(array.is_empty());
    array.add(1).unwrap();
    array.add("two").unwrap();
    let nested = array.create_nested_object().unwrap();
    nested.member("k").set(true).unwrap();
    assert_eq!(array.len(), 3);
    assert_eq!(root.get(2).get_member("k").as_bool(), Some(true));
}

#[test]
fn to_object_then_members() {
    let arena = Arena::default();
    let root = arena.root();
    let object = root.to_object();
    object.member("b").set(2).unwrap();
    object.member("a").set(1).unwrap();
    object.get_or_add("b").unwrap().set(3).unwrap();
    assert!(object.contains_key("a"));
    assert!(!object.contains_key("c"));

    let keys: Vec<JsonStr> = object.iter().map(|(k, _)| k).collect();
    assert_eq!(keys.iter().map(|k| &**k).collect::<Vec<_>>(), ["b", "a"]);
    assert_eq!(root.get_member("b").value::<i32>(), 3);
}

#[test]
fn add_to_scalar_is_rejected() {
    let arena = Arena::default();
    let root = arena.root();
    root.set("scalar").unwrap();
    assert_eq!(
        root.add(1),
        Err(ErrorCode::E003_IncompatibleContainer("string"))
    );
    assert_eq!(root.as_str().as_deref(), Some("scalar"));
}

#[test]
fn remove_is_noop_when_absent() {
    let arena = Arena::default();
    let root = arena.root();
    root.add(1).unwrap();
    root.add(2).unwrap();
    root.add(3).unwrap();
    root.remove(7);
    root.remove_member("missing");
    assert_eq!(root.size(), 3);

    root.remove(1);
    let values: Vec<i32> = root.elements().map(|e| e.value::<i32>()).collect();
    assert_eq!(values, [1, 3]);
}

#[test]
fn remove_member_by_key() {
    let arena = Arena::default();
    let root = arena.root();
    root.member("a").set(1).unwrap();
    root.member("b").set(2).unwrap();
    root.remove_member("a");
    assert!(!root.get_member("a").is_bound());
    assert_eq!(root.size(), 1);
}

#[test]
fn clear_empties_containers() {
    let arena = Arena::default();
    let root = arena.root();
    let array = root.member("list").to_array().unwrap();
    array.add(1).unwrap();
    array.clear();
    assert_eq!(array.len(), 0);
    assert_eq!(root.get_member("list").kind(), ValueKind::Array);

    root.member("list").clear();
    assert!(root.get_member("list").is_null());
    assert!(root.get_member("list").is_bound());
}

// ============================================================================
// Links
// ============================================================================

#[test]
fn link_aliases_without_copying() {
    let arena = Arena::default();
    let root = arena.root();
    root.member("shared").member("name").set("value").unwrap();
    let slots = arena.slot_count();
    let bytes = arena.string_bytes();

    root.member("alias").link(&root.member("shared")).unwrap();
    // only the "alias" slot and its key
    assert_eq!(arena.slot_count(), slots + 1);
    assert_eq!(arena.string_bytes(), bytes + 5);
    assert_eq!(
        lookup(&root, "alias.name").as_str().as_deref(),
        Some("value")
    );
    assert_eq!(root.member("alias").memory_usage(), 0);

    root.member("shared").member("name").set("new").unwrap();
    assert_eq!(lookup(&root, "alias.name").as_str().as_deref(), Some("new"));
}

#[test]
fn set_replaces_a_link() {
    let arena = Arena::default();
    let root = arena.root();
    root.member("target").set(1).unwrap();
    root.member("alias").link(&root.member("target")).unwrap();
    root.member("alias").set(2).unwrap();
    assert_eq!(root.get_member("target").value::<i32>(), 1);
    assert_eq!(root.get_member("alias").value::<i32>(), 2);
}

#[test]
fn link_across_arenas_copies() {
    let other = Arena::default();
    other.root().set("elsewhere").unwrap();

    let arena = Arena::default();
    arena.root().member("v").link(&other.root_readonly()).unwrap();
    other.root().set(0).unwrap();
    assert_eq!(
        arena.root_readonly().get_member("v").as_str().as_deref(),
        Some("elsewhere")
    );
}

// ============================================================================
// Accounting
// ============================================================================

#[test]
fn memory_usage_covers_slots_and_strings() {
    let arena = Arena::default();
    let root = arena.root();
    root.member("ab").set("xyz").unwrap();
    // one slot, a 2-byte key and a 3-byte string
    assert_eq!(root.memory_usage(), SLOT_SIZE + 5);
    assert_eq!(arena.memory_usage(), (SLOT_SIZE + 5) as u64);
}

#[test]
fn reset_reclaims_the_arena() {
    let mut arena = Arena::default();
    arena.root().member("k").set("v").unwrap();
    arena.reset();
    assert_eq!(arena.slot_count(), 0);
    assert_eq!(arena.string_bytes(), 0);
    assert!(arena.root_readonly().is_null());
}

// ============================================================================
// Deep Trees
// ============================================================================

// Nesting built through the write API is not checked against the limit.
fn nest_arrays(arena: &Arena, levels: usize) {
    let mut array = arena.root().to_array();
    for _ in 1..levels {
        array = array.create_nested_array().unwrap();
    }
}

#[test]
fn trees_deeper_than_the_limit_stay_usable() {
    let arena = tiny(64, 64);
    nest_arrays(&arena, 12);
    let root = arena.root_readonly();

    assert_eq!(root.compare(&root), CompareResult::Incomparable);
    assert_eq!(root.memory_usage(), 11 * SLOT_SIZE);
    assert_eq!(
        variant_json::interop::to_json(&root),
        Err(ErrorCode::E101_NestingTooDeep(10))
    );

    let copy = tiny(64, 64);
    assert_eq!(
        copy.root().set(root),
        Err(ErrorCode::E101_NestingTooDeep(10))
    );
    assert!(copy.root_readonly().is_null());
}

#[test]
fn very_deep_trees_do_not_exhaust_the_stack() {
    let arena = Arena::new(ArenaLimits::lenient());
    nest_arrays(&arena, 200_000);
    let root = arena.root_readonly();

    assert_eq!(root.compare(&root), CompareResult::Incomparable);
    assert_eq!(root.memory_usage(), 199_999 * SLOT_SIZE);
    assert!(variant_json::interop::to_json(&root).is_err());
    // the target contains the linked node, so it is copied
    assert_eq!(
        arena.root().at(0).link(&root),
        Err(ErrorCode::E101_NestingTooDeep(128))
    );
}
