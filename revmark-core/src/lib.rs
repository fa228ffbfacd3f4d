//! Core model layer for revmark.
//!
//! Everything here is host-agnostic: the annotation value types, the
//! reseedable id allocator, the payload schema embedded in the review field,
//! the marker-block codec, and the `Presentation` — the ordered authoritative
//! collection of annotations with its change-notification feed. No I/O and no
//! view concerns; those live in the `revmark` app crate.

pub mod codec;
pub mod ids;
pub mod payload;
pub mod presentation;
pub mod types;

pub use ids::IdAllocator;
pub use payload::Payload;
pub use presentation::{ChangeEvent, ChangeFeed, Presentation};
pub use types::{Annotation, Context, VisualId};
