//! Allocator monotonicity and payload reseed-scan tests.

use revmark_core::ids::{seed_for, IdAllocator, DEFAULT_SEED};
use revmark_core::VisualId;
use serde_json::json;

#[test]
fn next_is_strictly_increasing_after_init() {
    let mut ids = IdAllocator::new();
    ids.init(10);

    let issued: Vec<VisualId> = (0..5).map(|_| ids.next()).collect();
    let expected: Vec<VisualId> = (11..=15).map(VisualId).collect();
    assert_eq!(issued, expected, "ids should be seed+1 .. seed+n");
}

#[test]
fn fresh_allocator_starts_from_the_default_seed() {
    let mut ids = IdAllocator::new();
    assert_eq!(ids.next(), VisualId(DEFAULT_SEED + 1));
}

#[test]
fn reseed_scan_finds_the_maximum_nested_id() {
    let payload = json!({
        "comments": [
            { "id": 3, "context": { "file": "a.go", "lineNo": 1 }, "text": "x" },
            { "id": 7, "context": { "file": "a.go", "lineNo": 2 }, "text": "y" },
            { "id": 5, "context": { "file": "b.go", "lineNo": 3 }, "text": "z" }
        ]
    });

    assert_eq!(seed_for(&payload), 7, "seed must be the max id in the payload");

    let mut ids = IdAllocator::new();
    ids.init(seed_for(&payload));
    assert_eq!(ids.next(), VisualId(8), "first id after import must not collide");
}

#[test]
fn reseed_scan_recurses_through_foreign_grouping() {
    // The scan must not depend on the payload's top-level shape.
    let payload = json!({
        "groups": [ { "items": [ { "id": 12 }, { "id": 4 } ] } ],
        "meta": { "id": 9, "nested": [ [ { "id": 2 } ] ] }
    });
    assert_eq!(seed_for(&payload), 12);
}

#[test]
fn reseed_scan_defaults_when_no_ids_exist() {
    assert_eq!(seed_for(&json!({ "comments": [] })), DEFAULT_SEED);
    assert_eq!(seed_for(&json!(null)), DEFAULT_SEED);
    // Non-integer "id" values do not count.
    assert_eq!(seed_for(&json!({ "id": "seven" })), DEFAULT_SEED);
}
