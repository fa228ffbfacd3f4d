//! Host-view boundary.
//!
//! revmark renders into a page it does not own. Everything it needs from that
//! page is collected in [`AnnotationHost`]: attach/detach a sticky marker at
//! a diff line, maintain the sidebar list, highlight, and scroll. Widget and
//! DOM mechanics live entirely behind this trait — the sync controller calls
//! these methods and never touches the page directly.
//!
//! [`ConsoleHost`] is the reference implementation used by the `revmark`
//! binary: its "page" is stdout and its sidebar is a printed list.

use revmark_core::{Annotation, VisualId};

/// View injection points exposed by the host page.
///
/// Calls arrive from the sync controller's reconciliation pass and are
/// pre-deduplicated there (a marker is attached at most once per id, rows are
/// inserted at the position the Presentation dictates), so implementations
/// can be plain and stateless about ordering decisions.
pub trait AnnotationHost {
    /// Mounts a sticky marker anchored at `visual`'s diff line.
    fn attach_marker(&mut self, visual: &Annotation);

    /// Unmounts the marker for `id`.
    fn detach_marker(&mut self, id: VisualId);

    /// Updates the displayed text of an already-mounted marker.
    fn set_marker_text(&mut self, id: VisualId, text: &str);

    /// Inserts a sidebar row for `visual` at `index`.
    fn insert_row(&mut self, index: usize, visual: &Annotation);

    /// Removes the sidebar row for `id`.
    fn remove_row(&mut self, id: VisualId);

    /// Moves the sidebar row for `id` to `index`.
    fn move_row(&mut self, id: VisualId, index: usize);

    /// Toggles the selection highlight on `id`'s marker and row.
    fn set_highlight(&mut self, id: VisualId, on: bool);

    /// Scrolls `id`'s marker into view.
    fn reveal(&mut self, id: VisualId);
}

/// One sidebar row as the console host tracks it.
#[derive(Debug, Clone)]
struct Row {
    id: VisualId,
    file: String,
    line_no: u32,
    text: String,
}

/// Stdout-backed host: markers are log lines, the sidebar is a printed list.
#[derive(Debug, Default)]
pub struct ConsoleHost {
    rows: Vec<Row>,
    highlighted: Option<VisualId>,
}

impl ConsoleHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Renders the sidebar, one row per annotation in display order.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (index, row) in self.rows.iter().enumerate() {
            let mark = if self.highlighted == Some(row.id) { '*' } else { ' ' };
            out.push_str(&format!(
                "{mark}{:>3}. [{}] {}:{}  {}\n",
                index + 1,
                row.id,
                row.file,
                row.line_no,
                row.text,
            ));
        }
        out
    }
}

impl AnnotationHost for ConsoleHost {
    fn attach_marker(&mut self, visual: &Annotation) {
        tracing::debug!(id = %visual.id, file = %visual.context.file,
            line = visual.context.line_no, "marker attached");
    }

    fn detach_marker(&mut self, id: VisualId) {
        tracing::debug!(%id, "marker detached");
    }

    fn set_marker_text(&mut self, id: VisualId, text: &str) {
        // The console sidebar is the only visible surface, so marker text
        // updates land on the matching row as well.
        if let Some(row) = self.rows.iter_mut().find(|r| r.id == id) {
            row.text = text.to_owned();
        }
    }

    fn insert_row(&mut self, index: usize, visual: &Annotation) {
        let row = Row {
            id: visual.id,
            file: visual.context.file.clone(),
            line_no: visual.context.line_no,
            text: visual.text.clone(),
        };
        self.rows.insert(index.min(self.rows.len()), row);
    }

    fn remove_row(&mut self, id: VisualId) {
        self.rows.retain(|r| r.id != id);
    }

    fn move_row(&mut self, id: VisualId, index: usize) {
        if let Some(from) = self.rows.iter().position(|r| r.id == id) {
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
        tracing::debug!(%id, "scroll to marker");
    }
}
