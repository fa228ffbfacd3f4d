//! Marker-block codec.
//!
//! The annotation payload lives inside the review page's own free-text field,
//! bounded by a fixed marker pair and surrounded by whatever prose the humans
//! on the review have written. The codec's one job is to lift the payload out
//! and put it back without disturbing a single byte of that prose (the
//! "envelope").
//!
//! Extraction is a two-phase literal scan: locate the marker tokens by plain
//! substring search, then parse the interior as JSON. No pattern matching is
//! involved, so there is no greedy/non-greedy ambiguity over the surrounding
//! text and no backtracking behavior to reason about.

use serde::Serialize;
use serde_json::Value;

/// Opening token of the embedded block.
///
/// The HTML-comment framing keeps the block invisible when the review
/// description is rendered as markdown or HTML.
pub const OPEN_MARKER: &str = "<!-- REVMARK";

/// Closing token of the embedded block.
pub const CLOSE_MARKER: &str = "REVMARK -->";

/// Result of a successful [`decode`]: the parsed payload plus the envelope —
/// the text before and after the block, concatenated verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    pub payload: Value,
    pub envelope: String,
}

/// Extracts the first marker block from `text`.
///
/// Returns `None` when no block exists, when the close marker never follows
/// the open marker, or when the interior is not valid JSON — all three are
/// treated identically as "no payload present". This function never fails
/// loudly; a corrupted block degrades to an absent one and the whole text
/// becomes envelope on the next encode.
pub fn decode(text: &str) -> Option<Decoded> {
    let open = text.find(OPEN_MARKER)?;
    let body_start = open + OPEN_MARKER.len();
    let close = body_start + text[body_start..].find(CLOSE_MARKER)?;

    let payload: Value = serde_json::from_str(&text[body_start..close]).ok()?;

    let tail = &text[close + CLOSE_MARKER.len()..];
    let mut envelope = String::with_capacity(open + tail.len());
    envelope.push_str(&text[..open]);
    envelope.push_str(tail);

    Some(Decoded { payload, envelope })
}

/// Re-inserts `payload` after `envelope`, producing the full field text.
///
/// A newline separates the envelope from the block unless the envelope is
/// empty or already ends in whitespace, so repeated decode/encode cycles do
/// not accumulate blank lines. The payload is pretty-printed: the field is
/// shared with humans and a one-line JSON blob invites hand edits that break
/// it.
///
/// Round-trip law: for any serializable `payload` and any `envelope` that
/// does not itself contain the marker token,
/// `decode(encode(envelope, payload))` yields them both back unchanged.
///
/// # Errors
///
/// Returns `serde_json::Error` if `payload` cannot be serialized (not
/// reachable for the in-tree [`crate::Payload`] type).
pub fn encode<T: Serialize>(envelope: &str, payload: &T) -> Result<String, serde_json::Error> {
    let json = serde_json::to_string_pretty(payload)?;

    let mut out = String::with_capacity(
        envelope.len() + OPEN_MARKER.len() + json.len() + CLOSE_MARKER.len() + 3,
    );
    out.push_str(envelope);
    if !envelope.is_empty() && !envelope.ends_with(char::is_whitespace) {
        out.push('\n');
    }
    out.push_str(OPEN_MARKER);
    out.push('\n');
    out.push_str(&json);
    out.push('\n');
    out.push_str(CLOSE_MARKER);
    Ok(out)
}
