//! revmark — sticky review annotations persisted inside the review's own
//! text field.
//!
//! This crate is the orchestration layer over `revmark-core`: configuration,
//! the host-view boundary, the review-field gateway, and the sync controller
//! that keeps all three consistent. The binary in `main.rs` wires a
//! file-backed field and a console host together as a reference host.

pub mod config;
pub mod field;
pub mod host;
pub mod sync;

pub use config::{Config, Frequency};
pub use field::{FieldError, FileField, ReviewField};
pub use host::{AnnotationHost, ConsoleHost};
pub use sync::{HostAction, SyncController, SyncError};
