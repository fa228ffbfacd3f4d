//! Round-trip and degradation tests for the marker-block codec.
//!
//! The codec's contract is lossless prose: whatever humans wrote around the
//! block comes back byte-for-byte, and anything that is not a well-formed
//! block is treated as prose too.

use revmark_core::codec::{self, CLOSE_MARKER, OPEN_MARKER};
use serde_json::json;

#[test]
fn round_trip_preserves_payload_and_envelope() {
    let payload = json!({
        "comments": [
            { "id": 2, "context": { "file": "a.go", "lineNo": 10 }, "text": "fix this" }
        ]
    });

    let text = codec::encode("Summary\n", &payload).unwrap();
    let decoded = codec::decode(&text).expect("encoded text should decode");

    assert_eq!(decoded.payload, payload, "payload should round-trip exactly");
    assert_eq!(decoded.envelope, "Summary\n", "envelope should round-trip exactly");
}

#[test]
fn empty_envelope_gets_no_separator() {
    let text = codec::encode("", &json!({"comments": []})).unwrap();
    assert!(
        text.starts_with(OPEN_MARKER),
        "empty envelope should not gain a leading newline"
    );
    assert_eq!(codec::decode(&text).unwrap().envelope, "");
}

#[test]
fn envelope_without_trailing_whitespace_gains_one_newline() {
    let text = codec::encode("Summary", &json!({"comments": []})).unwrap();
    assert!(
        text.starts_with(&format!("Summary\n{OPEN_MARKER}")),
        "a newline should separate prose from the block"
    );
    // The inserted separator reads back as envelope text; one cycle reaches
    // the fixpoint "Summary\n" and later cycles are exact round-trips.
    assert_eq!(codec::decode(&text).unwrap().envelope, "Summary\n");
}

#[test]
fn repeated_cycles_do_not_accumulate_blank_lines() {
    let payload = json!({"comments": []});
    let mut text = codec::encode("Notes\n", &payload).unwrap();
    for _ in 0..3 {
        let decoded = codec::decode(&text).unwrap();
        text = codec::encode(&decoded.envelope, &payload).unwrap();
    }
    assert_eq!(codec::decode(&text).unwrap().envelope, "Notes\n");
}

#[test]
fn prose_on_both_sides_concatenates_into_the_envelope() {
    let payload = json!({"comments": []});
    let block = codec::encode("", &payload).unwrap();
    let text = format!("before\n{block}\nafter");

    let decoded = codec::decode(&text).unwrap();
    assert_eq!(decoded.envelope, "before\n\nafter");
    assert_eq!(decoded.payload, payload);
}

#[test]
fn absent_markers_decode_to_none() {
    assert!(codec::decode("").is_none());
    assert!(codec::decode("plain review description, no block").is_none());
    // Open marker with no close marker after it is not a block.
    assert!(codec::decode(&format!("{OPEN_MARKER} {{}}")).is_none());
    // Close before open is not a block either.
    assert!(codec::decode(&format!("{CLOSE_MARKER} then {OPEN_MARKER}")).is_none());
}

#[test]
fn malformed_json_decodes_to_none() {
    let text = format!("prose {OPEN_MARKER}\n{{not json]\n{CLOSE_MARKER} more prose");
    assert!(
        codec::decode(&text).is_none(),
        "a corrupted block must degrade to 'no payload', not an error"
    );
}

#[test]
fn first_block_wins_when_text_contains_stray_close_marker() {
    let payload = json!({"comments": []});
    let block = codec::encode("", &payload).unwrap();
    let text = format!("{block}\ntrailing prose mentioning {CLOSE_MARKER}");

    let decoded = codec::decode(&text).unwrap();
    assert_eq!(decoded.payload, payload);
    assert_eq!(
        decoded.envelope,
        format!("\ntrailing prose mentioning {CLOSE_MARKER}")
    );
}
