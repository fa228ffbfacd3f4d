use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a single annotation, unique within one review session.
///
/// Ids are small integers issued by [`crate::ids::IdAllocator`] and persist
/// verbatim in the embedded payload, so they must survive a JSON round-trip
/// unchanged — hence the `transparent` wire form.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct VisualId(pub u64);

impl fmt::Display for VisualId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Location key of an annotation: one line within one file's diff.
///
/// Two contexts are equal iff both fields match. A context never changes
/// after creation — an annotation that moves to another line is recreated,
/// not re-pointed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Context {
    /// Repository-relative path of the file as shown on the review page.
    pub file: String,
    /// Line identifier within that file's diff.
    pub line_no: u32,
}

impl Context {
    pub fn new(file: impl Into<String>, line_no: u32) -> Self {
        Self {
            file: file.into(),
            line_no,
        }
    }
}

/// A single sticky comment ("visual") bound to a diff line.
///
/// `id` is assigned at creation by the allocator, except on the import path
/// where ids come from the payload as-is. `text` is the only field mutated
/// in place (via the Presentation's add-or-replace operation).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    pub id: VisualId,
    pub context: Context,
    pub text: String,
}

impl Annotation {
    pub fn new(id: VisualId, context: Context, text: impl Into<String>) -> Self {
        Self {
            id,
            context,
            text: text.into(),
        }
    }
}
