//! Wire schema of the payload embedded in the review field.
//!
//! The persisted shape is deliberately separate from the in-memory types in
//! `types.rs`: the wire records carry serde attributes and field spellings
//! (`lineNo`) that the model should never see. Conversions in both directions
//! preserve order, ids, contexts, and text exactly, which is what makes
//! `import(export())` an identity.

use serde::{Deserialize, Serialize};

use crate::types::{Annotation, Context, VisualId};

/// Top-level grouping of the embedded block.
///
/// The id-allocator reseed scan does NOT rely on this shape — it walks the
/// raw JSON tree (`ids::seed_for`) — so adding fields here never hides ids
/// from the scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payload {
    #[serde(default)]
    pub comments: Vec<AnnotationRecord>,
}

/// One persisted annotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationRecord {
    pub id: VisualId,
    pub context: ContextRecord,
    pub text: String,
}

/// Persisted form of [`Context`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextRecord {
    pub file: String,
    #[serde(rename = "lineNo")]
    pub line_no: u32,
}

impl Payload {
    /// Builds the persisted form of an ordered annotation sequence.
    pub fn from_visuals<'a>(visuals: impl IntoIterator<Item = &'a Annotation>) -> Self {
        Self {
            comments: visuals.into_iter().map(AnnotationRecord::from).collect(),
        }
    }

    /// Consumes the payload into the ordered annotation list it encodes.
    pub fn into_visuals(self) -> Vec<Annotation> {
        self.comments.into_iter().map(Annotation::from).collect()
    }
}

impl From<&Annotation> for AnnotationRecord {
    fn from(visual: &Annotation) -> Self {
        Self {
            id: visual.id,
            context: ContextRecord {
                file: visual.context.file.clone(),
                line_no: visual.context.line_no,
            },
            text: visual.text.clone(),
        }
    }
}

impl From<AnnotationRecord> for Annotation {
    fn from(record: AnnotationRecord) -> Self {
        Self {
            id: record.id,
            context: Context {
                file: record.context.file,
                line_no: record.context.line_no,
            },
            text: record.text,
        }
    }
}
