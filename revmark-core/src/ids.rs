//! Annotation id allocation.
//!
//! A single reseedable counter issues every id in a session. The allocator is
//! an explicit value passed to whoever creates annotations — never hidden
//! process-global state — so tests stay deterministic and parallel-safe.
//!
//! Collision-freedom across imports is a caller contract: before building a
//! Presentation from imported data, reseed with [`seed_for`] computed over the
//! *complete* incoming payload. The scan must finish before the first `next()`
//! of the new session.

use serde_json::Value;

use crate::types::VisualId;

/// Counter value used when a payload carries no ids at all.
pub const DEFAULT_SEED: u64 = 1;

/// Monotonic id source for one process.
///
/// `next()` returns `seed + 1, seed + 2, …` — strictly increasing with no
/// repeats until `init` is called again. Single-threaded by design; there is
/// no interior locking.
#[derive(Debug, Clone)]
pub struct IdAllocator {
    counter: u64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self {
            counter: DEFAULT_SEED,
        }
    }

    /// Resets the counter to `seed`.
    ///
    /// Called right before a Presentation is constructed from imported data,
    /// with `seed` = the maximum id found anywhere in the incoming payload.
    /// Reseeding below an id that is still live in the active Presentation is
    /// a caller bug and is not detected here.
    pub fn init(&mut self, seed: u64) {
        self.counter = seed;
    }

    /// Issues the next id.
    pub fn next(&mut self) -> VisualId {
        self.counter += 1;
        VisualId(self.counter)
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

/// Computes the reseed value for an imported payload: the maximum `id` found
/// anywhere in the JSON tree, or [`DEFAULT_SEED`] when none exists.
///
/// The walk recurses through every object and array regardless of how the
/// payload groups its records, so a future change to the top-level shape
/// cannot silently shrink the scan.
pub fn seed_for(payload: &Value) -> u64 {
    max_id(payload).unwrap_or(DEFAULT_SEED)
}

/// Recursive max over every `"id"` key bearing a non-negative integer.
fn max_id(value: &Value) -> Option<u64> {
    match value {
        Value::Object(map) => map
            .iter()
            .filter_map(|(key, child)| {
                let own = if key == "id" { child.as_u64() } else { None };
                match (own, max_id(child)) {
                    (Some(a), Some(b)) => Some(a.max(b)),
                    (a, b) => a.or(b),
                }
            })
            .max(),
        Value::Array(items) => items.iter().filter_map(max_id).max(),
        _ => None,
    }
}
