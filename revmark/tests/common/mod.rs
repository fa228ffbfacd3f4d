//! Shared fixtures for the revmark integration tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use revmark::field::{FieldError, ReviewField};
use revmark::host::AnnotationHost;
use revmark_core::{Annotation, VisualId};

/// In-memory review field. Clones share one text cell, so a test can hold a
/// handle to the same field the controller persists into.
#[derive(Debug, Clone, Default)]
pub struct InMemoryField {
    text: Arc<Mutex<String>>,
}

impl InMemoryField {
    pub fn with_text(text: &str) -> Self {
        Self {
            text: Arc::new(Mutex::new(text.to_owned())),
        }
    }

    pub fn text(&self) -> String {
        self.text.lock().unwrap().clone()
    }

    pub fn set_text(&self, text: &str) {
        *self.text.lock().unwrap() = text.to_owned();
    }
}

#[async_trait]
impl ReviewField for InMemoryField {
    async fn fetch_text(&self) -> Result<String, FieldError> {
        Ok(self.text.lock().unwrap().clone())
    }

    async fn write_text(&self, text: &str) -> Result<(), FieldError> {
        *self.text.lock().unwrap() = text.to_owned();
        Ok(())
    }
}

/// Host double that records every view operation for assertions.
#[derive(Debug, Default)]
pub struct RecordingHost {
    /// Sidebar rows in display order: (id, text).
    pub rows: Vec<(VisualId, String)>,
    /// Ids with a currently attached diff marker.
    pub markers: Vec<VisualId>,
    /// Every detach ever seen, in order.
    pub detached: Vec<VisualId>,
    /// Every reveal ever seen, in order.
    pub revealed: Vec<VisualId>,
    pub highlighted: Option<VisualId>,
}

impl RecordingHost {
    pub fn row_ids(&self) -> Vec<u64> {
        self.rows.iter().map(|(id, _)| id.0).collect()
    }

    pub fn row_text(&self, id: VisualId) -> Option<&str> {
        self.rows
            .iter()
            .find(|(row_id, _)| *row_id == id)
            .map(|(_, text)| text.as_str())
    }
}

impl AnnotationHost for RecordingHost {
    fn attach_marker(&mut self, visual: &Annotation) {
        self.markers.push(visual.id);
    }

    fn detach_marker(&mut self, id: VisualId) {
        self.markers.retain(|m| *m != id);
        self.detached.push(id);
    }

    fn set_marker_text(&mut self, id: VisualId, text: &str) {
        if let Some((_, row_text)) = self.rows.iter_mut().find(|(row_id, _)| *row_id == id) {
            *row_text = text.to_owned();
        }
    }

    fn insert_row(&mut self, index: usize, visual: &Annotation) {
        let index = index.min(self.rows.len());
        self.rows.insert(index, (visual.id, visual.text.clone()));
    }

    fn remove_row(&mut self, id: VisualId) {
        self.rows.retain(|(row_id, _)| *row_id != id);
    }

    fn move_row(&mut self, id: VisualId, index: usize) {
        if let Some(from) = self.rows.iter().position(|(row_id, _)| *row_id == id) {
            let row = self.rows.remove(from);
            self.rows.insert(index.min(self.rows.len()), row);
        }
    }

    fn set_highlight(&mut self, id: VisualId, on: bool) {
        if on {
            self.highlighted = Some(id);
        } else if self.highlighted == Some(id) {
            self.highlighted = None;
        }
    }

    fn reveal(&mut self, id: VisualId) {
        self.revealed.push(id);
    }
}
